//! GitGraph - an interactive simulator of Git's commit graph
//!
//! This is the main entry point for the GitGraph command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;

use gitgraph::sim::{Repl, Simulator, SimulatorConfig};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    // Parse simple command line args.
    let mut config_path: Option<PathBuf> = None;
    let mut verbose = false;
    let mut execute: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config_path = Some(PathBuf::from(path)),
                    None => {
                        eprintln!("Missing value for {}", args[i - 1]);
                        return ExitCode::FAILURE;
                    }
                }
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            "-e" | "--execute" => {
                i += 1;
                match args.get(i) {
                    Some(commands) => execute = Some(commands.clone()),
                    None => {
                        eprintln!("Missing value for {}", args[i - 1]);
                        return ExitCode::FAILURE;
                    }
                }
            }
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            "--version" => {
                println!("GitGraph v{}", env!("CARGO_PKG_VERSION"));
                return ExitCode::SUCCESS;
            }
            arg => {
                eprintln!("Unknown option: {}", arg);
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    init_logging(verbose);

    let config = match config_path {
        Some(path) => match SimulatorConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => SimulatorConfig::default(),
    };

    let sim = match Simulator::new(config.verbose(verbose)) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error starting simulator: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Execute commands or run REPL.
    let result = match execute {
        Some(commands) => execute_commands(sim, &commands),
        None => run_repl(sim),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Info by default, debug with `-v`; `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn print_help() {
    println!("GitGraph - an interactive simulator of Git's commit graph");
    println!();
    println!("Usage: gitgraph [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config PATH      Load a JSON configuration file");
    println!("  -e, --execute CMDS     Run commands (separated by ';') and exit");
    println!("  -v, --verbose          Enable debug logging");
    println!("  -h, --help             Show this help message");
    println!("  --version              Show version");
    println!();
    println!("Examples:");
    println!("  gitgraph                                          Start the REPL");
    println!("  gitgraph -e 'branch feature; commit; checkout master; merge feature'");
}

fn execute_commands(mut sim: Simulator, commands: &str) -> Result<(), Box<dyn std::error::Error>> {
    for command in commands.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        println!("{}", sim.execute(command)?);
    }
    print!("{}", sim.with_graph(gitgraph::sim::render_graph));
    Ok(())
}

fn run_repl(sim: Simulator) -> Result<(), Box<dyn std::error::Error>> {
    let mut repl = Repl::new(sim);
    repl.run()?;
    Ok(())
}
