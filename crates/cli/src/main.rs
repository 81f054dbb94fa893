//! APEX cycle-accurate simulator CLI.
//!
//! This binary loads an assembly program and drives the simulator from an
//! interactive command loop:
//! 1. **`initialize`** — reset the CPU and reload the program.
//! 2. **`simulate [n]`** — advance n cycles (default 1) and display state.
//! 3. **`display`** — print the current state table.
//! 4. **`setmem <addr> <val>` / `setmem <file>`** — seed data memory.
//! 5. **`single_step`** — advance one cycle per Enter keypress.
//! 6. **`exit`** (or EOF) — quit. Any other non-empty line runs one cycle.

use std::io::{self, BufRead, Lines, StdinLock, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use clap::error::ErrorKind;

use apex_core::{Config, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    version,
    about = "APEX out-of-order pipeline simulator",
    long_about = "Simulate an APEX assembly program cycle by cycle.\n\nPass `1` as the second argument to enable the branch/call/return\npredictors; without it, branches are predicted not-taken and calls and\nreturns do not speculate.\n\nExamples:\n  sim programs/loop.asm\n  sim programs/loop.asm 1\n  sim --config fast.json programs/loop.asm"
)]
struct Cli {
    /// Assembly program to load.
    program: PathBuf,

    /// Pass `1` to enable the predictors (BTB, CTP, RAP).
    predictor_flag: Option<u32>,

    /// JSON configuration file (predictor_enabled, max_cycles).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::try_parse().unwrap_or_else(|error| {
        // Usage errors exit 1; --help/--version are not errors.
        let _ = error.print();
        match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
            _ => process::exit(1),
        }
    });

    let config = build_config(&cli);
    let mut sim = Simulator::new(config.clone());

    println!("APEX CPU Initialized");
    if config.predictor_enabled {
        println!("--- PREDICTOR ENABLED ---");
    } else {
        println!("--- PREDICTOR DISABLED ---");
    }

    // An unreadable program is reported; the session continues with an
    // empty (NOP) program.
    if let Err(error) = sim.load_program_file(&cli.program) {
        eprintln!("{error}");
    }

    command_loop(&mut sim, &cli.program);

    print!("{}", sim.cpu.stats.summary(sim.cpu.clock, sim.cpu.retired));
}

/// Builds the run configuration from the optional JSON file and the
/// positional predictor flag (the flag wins).
fn build_config(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => Config::from_json(&text).unwrap_or_else(|error| {
                eprintln!("{error}");
                process::exit(1);
            }),
            Err(error) => {
                eprintln!("cannot read config {}: {error}", path.display());
                process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(flag) = cli.predictor_flag {
        config.predictor_enabled = flag == 1;
    }
    config
}

/// Runs the interactive command loop until `exit`, EOF, or halt.
fn command_loop(sim: &mut Simulator, program_path: &Path) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(Ok(line)) = lines.next() {
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            // Empty line: single cycle.
            if simulate_and_report(sim, 1) {
                break;
            }
            continue;
        };

        match command {
            "initialize" => {
                sim.initialize();
                if let Err(error) = sim.load_program_file(program_path) {
                    eprintln!("{error}");
                }
                println!("System Initialized.");
            }
            "simulate" => {
                let cycles = tokens.next().and_then(|t| t.parse().ok()).unwrap_or(1);
                if simulate_and_report(sim, cycles) {
                    break;
                }
            }
            "display" => print!("{}", sim.display()),
            "setmem" => setmem(sim, tokens.next(), tokens.next()),
            "single_step" => {
                if single_step(sim, &mut lines) {
                    break;
                }
            }
            "exit" => break,
            _ => {
                if simulate_and_report(sim, 1) {
                    break;
                }
            }
        }
    }
}

/// Advances `cycles`, prints the state table, and reports completion.
/// Returns true when the simulation has halted.
fn simulate_and_report(sim: &mut Simulator, cycles: u64) -> bool {
    let _ = sim.step(cycles);
    print!("{}", sim.display());
    if sim.halted() {
        println!();
        println!("--- Simulation Complete. Exiting CLI. ---");
        return true;
    }
    false
}

/// `setmem <addr> <val>` writes one word; `setmem <file>` loads
/// consecutive integers starting at address 0.
fn setmem(sim: &mut Simulator, first: Option<&str>, second: Option<&str>) {
    match (first, second) {
        (Some(addr), Some(value)) => match (addr.parse(), value.parse()) {
            (Ok(addr), Ok(value)) => {
                sim.set_memory(addr, value);
                println!("Memory[{addr}] set to {value}");
            }
            _ => eprintln!("Error: Invalid arguments."),
        },
        (Some(file), None) => match sim.load_memory_file(Path::new(file)) {
            Ok(count) => println!("Loaded {count} words from {file}"),
            Err(error) => eprintln!("{error}"),
        },
        _ => eprintln!("Error: Invalid arguments."),
    }
}

/// One cycle per Enter keypress; `q` stops. Returns true when halted.
fn single_step(sim: &mut Simulator, lines: &mut Lines<StdinLock<'_>>) -> bool {
    println!("--- Single Step Mode ---");
    while !sim.halted() {
        let _ = sim.step(1);
        print!("{}", sim.display());
        println!("Press Enter to advance (or type 'q' to stop)...");
        let _ = io::stdout().flush();
        match lines.next() {
            Some(Ok(line)) if line.trim().eq_ignore_ascii_case("q") => break,
            Some(Ok(_)) => {}
            _ => break,
        }
    }
    if sim.halted() {
        println!();
        println!("--- Simulation Complete. Exiting CLI. ---");
        return true;
    }
    false
}
