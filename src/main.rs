//! Itinerary editor CLI (for testing purposes only)
//! The main interface is through WASM bindings.
//!
//! Given a JSON page collection, prints the normalized pages or the print
//! document the PDF service would receive.

use itinerary_editor::{EditorConfig, ItineraryEditor};
use tracing_subscriber::EnvFilter;

fn usage() {
    println!("Itinerary Editor Core");
    println!("=====================");
    println!();
    println!("This is a library crate. To use it:");
    println!();
    println!("  1. Build WASM: wasm-pack build --target web");
    println!("  2. Inspect a page collection:");
    println!("       itinerary-editor pages.json          # normalized pages");
    println!("       itinerary-editor --html pages.json   # export HTML");
    println!();
    println!("Set RUST_LOG=debug for normalization diagnostics.");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (html, path) = match args.as_slice() {
        [flag, path] if flag == "--html" => (true, path),
        [path] if !path.starts_with('-') => (false, path),
        _ => {
            usage();
            return;
        }
    };

    let raw = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot read {}: {}", path, err);
            std::process::exit(1);
        }
    };
    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("invalid JSON in {}: {}", path, err);
            std::process::exit(1);
        }
    };

    let editor = ItineraryEditor::with_pages(&value, EditorConfig::default());
    if html {
        println!("{}", editor.export_html());
    } else {
        match serde_json::to_string_pretty(&editor.to_value()) {
            Ok(text) => println!("{}", text),
            Err(err) => eprintln!("{}", err),
        }
    }
}
