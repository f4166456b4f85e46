//! Simple example: resolve labels for a symbol and print them without
//! touching any schematic.

use pinlabel::prelude::*;
use std::path::PathBuf;

fn main() -> Result<(), PinLabelError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 4 {
        eprintln!("Usage: cargo run --example simple_annotate <lib> <component> <pinout.csv> <schematic.sch>");
        std::process::exit(1);
    }

    let request = AnnotateRequest {
        library: PathBuf::from(&args[0]),
        component: args[1].clone(),
        pinout: PathBuf::from(&args[2]),
        schematic: PathBuf::from(&args[3]),
        output: PathBuf::from(&args[3]),
        instance: None,
    };

    let mut labels: Vec<LabelRecord> = Vec::new();
    let summary = PinLabelCore::annotate_into(&request, &LabelOptions::default(), &mut labels)?;

    println!(
        "{} placed at {}, {}",
        summary.component, summary.anchor.anchor_x, summary.anchor.anchor_y
    );
    println!("{} labels, {} unused pins\n", labels.len(), summary.skipped);
    for label in &labels {
        print!("{}", label);
    }
    Ok(())
}
