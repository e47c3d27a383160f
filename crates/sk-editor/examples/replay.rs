//! Load controller options (strokes, region, pan/zoom) from a JSON file and
//! write the exported region as a PNG.
//!
//! ```text
//! RUST_LOG=debug cargo run -p sk-editor --example replay -- sketch.json out.png [size]
//! ```

use sk_editor::controller::{DEFAULT_EXPORT_SIZE, ViewportController};
use std::env;
use std::fs;
use std::process::ExitCode;

fn run(args: &[String]) -> Result<(), String> {
    let input = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("crates/sk-editor/tests/fixtures/strokes.json");
    let output = args.get(2).map(String::as_str).unwrap_or("replay.png");
    let size = match args.get(3) {
        Some(s) => s
            .parse::<u32>()
            .map_err(|e| format!("invalid size {s:?}: {e}"))?,
        None => DEFAULT_EXPORT_SIZE,
    };

    let json = fs::read_to_string(input).map_err(|e| format!("{input}: {e}"))?;
    let mut controller = ViewportController::from_json(&json)?;
    controller.on_data_change(|e| {
        log::info!(
            "{} strokes in {}x{} region",
            e.strokes.len(),
            e.region_width,
            e.region_height
        );
    });
    controller.emit_current_data_change_event();

    let png = controller.export_region_png(size, size)?;
    fs::write(output, &png).map_err(|e| format!("{output}: {e}"))?;
    println!("✓ {output} ({} bytes)", png.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR {e}");
            ExitCode::FAILURE
        }
    }
}
