use std::{fs, process};

use c3_cli::{App, Command, MEMORY};
use c3_core::Model;
use clap::Parser;
use petgraph::dot::{Config, Dot};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = App::parse();
    match &app.command {
        Command::Verify(args) => verify(args),
        Command::Fmt(args) => format(args),
        Command::Schema => schema(),
        Command::Dot(args) => dot(args),
    }
}

fn verify(args: &c3_cli::VerifyArgs) {
    let model = Model::from(args.model);
    let mut any_failed = false;

    let paths = c3_cli::trace_files(&args.input_dir, &["json", "hist"]).unwrap_or_else(|e| {
        eprintln!("Failed to read input directory: {e}");
        process::exit(1);
    });

    if paths.is_empty() {
        eprintln!(
            "No .json or .hist files found in {}",
            args.input_dir.display()
        );
        process::exit(1);
    }

    for path in paths {
        let filename = path.file_name().unwrap_or_default().to_string_lossy();

        let history = match c3_cli::load_history(&path) {
            Ok(history) => history,
            Err(e) => {
                any_failed = true;
                if args.json {
                    print_json(&serde_json::json!({
                        "file": filename,
                        "ok": false,
                        "error": e.to_string(),
                    }));
                } else {
                    eprintln!("{filename}: failed to load ({e})");
                }
                continue;
            }
        };

        let result = if args.parallel {
            c3_core::consistency::par_check(&history, &MEMORY, model)
        } else {
            c3_core::check(&history, &MEMORY, model)
        };

        match result {
            Ok(witness) => {
                if args.json {
                    print_json(&serde_json::json!({
                        "file": filename,
                        "ok": true,
                        "witness": witness,
                    }));
                } else if args.verbose {
                    println!("{filename}: PASS");
                    println!("  witness: {witness:?}");
                } else {
                    println!("{filename}: PASS");
                }
            }
            Err(e) => {
                any_failed = true;
                if args.json {
                    print_json(&serde_json::json!({
                        "file": filename,
                        "ok": false,
                        "error": e,
                    }));
                } else {
                    println!("{filename}: FAIL ({e})");
                }
            }
        }
    }

    if any_failed {
        process::exit(1);
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            process::exit(1);
        }
    }
}

fn format(args: &c3_cli::FmtArgs) {
    let mut unformatted = false;

    for root in &args.paths {
        let files = if root.is_dir() {
            c3_cli::trace_files(root, &["hist"]).unwrap_or_else(|e| {
                eprintln!("Failed to read {}: {e}", root.display());
                process::exit(1);
            })
        } else {
            vec![root.clone()]
        };

        for path in files {
            let source = fs::read_to_string(&path).unwrap_or_else(|e| {
                eprintln!("Failed to read {}: {e}", path.display());
                process::exit(1);
            });
            let formatted = c3_cli::canonical_form(&source).unwrap_or_else(|e| {
                eprintln!("{}: {e}", path.display());
                process::exit(1);
            });

            if formatted == source {
                continue;
            }
            if args.check {
                println!("{}: would reformat", path.display());
                unformatted = true;
            } else {
                fs::write(&path, formatted).unwrap_or_else(|e| {
                    eprintln!("Failed to write {}: {e}", path.display());
                    process::exit(1);
                });
                println!("{}: formatted", path.display());
            }
        }
    }

    if unformatted {
        process::exit(1);
    }
}

fn schema() {
    let schema = schemars::schema_for!(c3_cli::MemoryTrace);
    match serde_json::to_string_pretty(&schema) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Failed to serialize schema: {e}");
            process::exit(1);
        }
    }
}

fn dot(args: &c3_cli::DotArgs) {
    let history = c3_cli::load_history(&args.file).unwrap_or_else(|e| {
        eprintln!("Failed to load {}: {e}", args.file.display());
        process::exit(1);
    });
    let graph = history
        .visualize(!args.no_label)
        .map(|_, node| node.clone(), |_, ()| "");
    println!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]));
}
