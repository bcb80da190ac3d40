//! Vela binding generator CLI.

use std::path::{Path, PathBuf};

use vela_diagnostic::ErrorCode;
use velac::{generate, load_description, reporting, DriverError, GenerationOutput};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "generate" => {
            let mut out_dir = PathBuf::from("generated");
            let mut input: Option<String> = None;
            let mut i = 2;
            while i < args.len() {
                if args[i] == "-o" || args[i] == "--out" {
                    if i + 1 >= args.len() {
                        eprintln!("error: `{}` needs a directory", args[i]);
                        std::process::exit(1);
                    }
                    out_dir = PathBuf::from(&args[i + 1]);
                    i += 2;
                } else if !args[i].starts_with('-') && input.is_none() {
                    input = Some(args[i].clone());
                    i += 1;
                } else {
                    eprintln!("error: unknown option `{}`", args[i]);
                    std::process::exit(1);
                }
            }
            let Some(input) = input else {
                eprintln!("Usage: vela generate <api.json> [-o <dir>]");
                std::process::exit(1);
            };
            run(Path::new(&input), Some(&out_dir));
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: vela check <api.json>");
                std::process::exit(1);
            }
            run(Path::new(&args[2]), None);
        }
        "explain" | "--explain" => {
            if args.len() < 3 {
                eprintln!("Usage: vela explain <ERROR_CODE>");
                eprintln!("Example: vela explain E2002");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Vela binding generator {}", env!("CARGO_PKG_VERSION"));
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn run(input: &Path, out_dir: Option<&Path>) {
    match run_generate(input, out_dir) {
        Ok(false) => {}
        Ok(true) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Returns whether any error-severity diagnostic was reported.
fn run_generate(input: &Path, out_dir: Option<&Path>) -> Result<bool, DriverError> {
    let description = load_description(input)?;
    let output = generate(&description);
    report(&output);

    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir).map_err(|source| DriverError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        for file in &output.files {
            let path = dir.join(&file.file_name);
            std::fs::write(&path, &file.source).map_err(|source| DriverError::Write {
                path: path.clone(),
                source,
            })?;
        }
        println!(
            "generated {} file(s) into {}",
            output.files.len(),
            dir.display()
        );
    } else {
        println!(
            "checked {} declaration(s): {} bindable",
            description.types.len(),
            output.files.len()
        );
    }
    Ok(output.has_errors())
}

fn report(output: &GenerationOutput) {
    for diag in output.diagnostics.clone().into_sorted() {
        eprintln!("{}", reporting::render(&diag, &*output.interner));
    }
    let errors = output.diagnostics.error_count();
    if errors > 0 {
        eprintln!("{errors} error(s)");
    }
}

fn explain_error(code: &str) {
    let Some(code) = parse_code(code) else {
        eprintln!("error: unknown error code `{code}`");
        std::process::exit(1);
    };
    println!("{}: {}", code.as_str(), code.description());
}

fn parse_code(s: &str) -> Option<ErrorCode> {
    match s {
        "E1001" => Some(ErrorCode::E1001),
        "E1002" => Some(ErrorCode::E1002),
        "E1003" => Some(ErrorCode::E1003),
        "E1004" => Some(ErrorCode::E1004),
        "E2001" => Some(ErrorCode::E2001),
        "E2002" => Some(ErrorCode::E2002),
        "E2003" => Some(ErrorCode::E2003),
        "E3001" => Some(ErrorCode::E3001),
        "E4001" => Some(ErrorCode::E4001),
        "E9001" => Some(ErrorCode::E9001),
        _ => None,
    }
}

/// Enable with `VELA_LOG=debug` or `VELA_LOG=vela_model=trace`.
fn init_tracing() {
    use tracing_subscriber::{prelude::*, EnvFilter};

    if let Ok(filter) = std::env::var("VELA_LOG") {
        tracing_subscriber::registry()
            .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
            .with(EnvFilter::new(filter))
            .init();
    }
}

fn print_usage() {
    println!("Vela binding generator");
    println!();
    println!("Usage: vela <command> [options]");
    println!();
    println!("Commands:");
    println!("  generate <api.json>  Generate host source from an API description");
    println!("  check <api.json>     Run generation without writing output");
    println!("  explain <code>       Explain an error code (e.g., E2002)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Generate options:");
    println!("  -o, --out <dir>      Output directory (default: generated)");
    println!();
    println!("Environment:");
    println!("  VELA_LOG=<filter>    Enable tracing output (e.g., VELA_LOG=debug)");
    println!();
    println!("Examples:");
    println!("  vela generate bindings/uikit.json -o generated/");
    println!("  vela check bindings/uikit.json");
    println!("  vela explain E3001");
}
