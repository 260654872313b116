//! Basic example demonstrating geos-wrap usage.
//!
//! Run with: cargo run --example basic

use geos_wrap::{ByteOrder, WkbOptions};

fn main() -> geos_wrap::Result<()> {
    env_logger::init();

    // Initialize the engine for this thread
    geos_wrap::init()?;
    println!("GEOS version: {}", geos_wrap::geos_version());

    run()?;

    geos_wrap::shutdown();
    Ok(())
}

fn run() -> geos_wrap::Result<()> {
    println!("\n--- Building geometries ---");
    let point = geos_wrap::make_point(1.123456789, 2.987654321)?;
    println!("Point (precision 15): {}", point.to_wkt()?);
    println!("Point (precision 2):  {}", geos_wrap::to_wkt_with_precision(&point, 2)?);

    let shell = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)];
    let hole = vec![(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)];
    let polygon = geos_wrap::make_polygon(&[shell, hole])?;
    println!(
        "Polygon with {} hole(s): {}",
        polygon.num_interior_rings()?,
        geos_wrap::to_wkt_with_precision(&polygon, 0)?
    );

    println!("\n--- Binary formats ---");
    let wkb = geos_wrap::to_wkb(&point)?;
    println!("WKB ({} bytes): {:02x?}", wkb.len(), wkb);

    let big_endian = WkbOptions {
        byte_order: ByteOrder::Big,
        ..Default::default()
    };
    println!("HEX (big endian): {}", geos_wrap::to_hex_wkb_with(&point, &big_endian)?);

    let parsed = geos_wrap::from_wkb(&wkb)?;
    println!("Parsed back: {}", geos_wrap::to_wkt_with_precision(&parsed, 4)?);

    println!("\n--- Errors ---");
    match geos_wrap::from_wkt("not a geometry") {
        Ok(_) => println!("unexpectedly parsed"),
        Err(e) => println!("Parse failure: {}", e),
    }
    match geos_wrap::make_linear_ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]) {
        Ok(_) => println!("unexpectedly built"),
        Err(e) => println!("Ring failure: {}", e),
    }

    Ok(())
}
