//! Chitra CLI - Photo-editing Core
//!
//! This is a demonstration CLI for the Chitra library.

use anyhow::{bail, Context, Result};
use chitra::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return Ok(());
    }

    match args[1].as_str() {
        "list" => list_filters(args.iter().any(|a| a == "--json")),
        "info" => {
            if args.len() < 3 {
                bail!("Please specify a filter name");
            }
            filter_info(&args[2])
        }
        "process" => {
            if args.len() < 4 {
                eprintln!(
                    "Usage: {} process <input> <output> [--filter <name>] [--intensity <v>] [--radius <v>] [--scale <v>]",
                    args[0]
                );
                bail!("Please specify input and output paths");
            }
            process_image(&args[2..])
        }
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            Ok(())
        }
        other => {
            print_usage(&args[0]);
            bail!("Unknown command: {}", other);
        }
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list [--json]          List all available filters");
    println!("  info <filter>          Show a filter's adjustable parameters");
    println!("  process <in> <out> [options]  Process an image");
    println!("  help                   Show this help message");
    println!();
    println!("Process options:");
    println!("  --filter <name>     Filter to apply (default: sepia_tone)");
    println!("  --intensity <v>     Intensity slider value");
    println!("  --radius <v>        Radius slider value");
    println!("  --scale <v>         Scale slider value");
}

fn list_filters(json: bool) -> Result<()> {
    if json {
        let listing = serde_json::json!({
            "filters": FilterCatalog::all(),
            "parameters": Parameter::registry(),
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Available filters ({} total):", FilterCatalog::len());
    println!();
    for descriptor in FilterCatalog::all() {
        println!("  {} ({})", descriptor.display_name, descriptor.name);
    }
    Ok(())
}

fn filter_info(name: &str) -> Result<()> {
    let descriptor = FilterCatalog::by_name(name)?;
    let backend = SoftwareBackend::new();
    let filter = backend.create_filter(descriptor.name)?;
    let accepted = filter.accepted_input_keys();

    println!("{} ({})", descriptor.display_name, descriptor.name);
    println!();
    println!("Adjustable parameters:");
    let mut any = false;
    for parameter in Parameter::registry() {
        if accepted.contains(parameter.engine_key) {
            println!(
                "  {:<10} range [{}, {}]",
                parameter.display_name, MIN_SLIDER_VALUE, parameter.max_value
            );
            any = true;
        }
    }
    if !any {
        println!("  (none)");
    }
    if accepted.contains(keys::CENTER) {
        println!();
        println!("Centered on the image automatically.");
    }
    Ok(())
}

fn process_image(args: &[String]) -> Result<()> {
    let input = &args[0];
    let output = &args[1];

    let mut filter_name = "sepia_tone".to_string();
    let mut values: Vec<(ParameterId, f64)> = Vec::new();

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        let Some(value) = args.get(i + 1) else {
            bail!("Missing value for {}", flag);
        };
        match flag {
            "--filter" => filter_name = value.clone(),
            "--intensity" => values.push((ParameterId::Intensity, parse(flag, value)?)),
            "--radius" => values.push((ParameterId::Radius, parse(flag, value)?)),
            "--scale" => values.push((ParameterId::Scale, parse(flag, value)?)),
            other => bail!("Unknown option: {}", other),
        }
        i += 2;
    }

    let photo = image::open(input).with_context(|| format!("failed to open {}", input))?;
    println!("Loaded {} ({}x{})", input, photo.width(), photo.height());

    let mut session = EditorSession::with_software_backend();
    session.import(photo)?;
    session.select_filter(&filter_name)?;
    for (id, value) in values {
        session.set_parameter(id, value)?;
    }

    session.export(output)?;
    println!("Wrote {} ({})", output, filter_name);
    Ok(())
}

fn parse(flag: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .with_context(|| format!("{} expects a number, got '{}'", flag, value))
}
