// Copyright (c) 2024 Mudit Bhargava
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//

// main.rs
//
// This file contains the main entry point for the Tomasulo simulator.
// It provides a command-line interface for running a trace through the
// simulator or generating a random trace file.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tomasulo_rust::simulator::config::SimulatorConfig;
use tomasulo_rust::simulator::simulator::Simulator;
use tomasulo_rust::simulator::visualization::{OutputFormat, StateDump};
use tomasulo_rust::utils::logger::{LogLevel, Logger};
use tomasulo_rust::utils::trace_generator;

#[derive(Parser)]
#[command(name = "tomasulo_rust")]
#[command(about = "A cycle-accurate Tomasulo dynamic-scheduling simulator written in Rust")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulator on an instruction trace
    Run {
        /// Input trace file
        #[arg(short, long)]
        trace: PathBuf,

        /// Print the full state after every cycle
        #[arg(short, long)]
        step: bool,

        /// Dump per-cycle state even when not stepping
        #[arg(short, long)]
        verbose: bool,

        /// Per-cycle dump format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Seed for the initial register values
        #[arg(long)]
        seed: Option<u64>,

        /// Log level (error, warn, info, debug)
        #[arg(short, long, default_value = "info")]
        log_level: String,

        /// Cycle log file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a random trace file
    Generate {
        /// Path to save the generated trace
        #[arg(short, long, default_value = "output_trace.txt")]
        output: PathBuf,

        /// Number of instructions to generate
        #[arg(short, long, default_value = "100")]
        num: usize,

        /// Seed for random generation
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_output_format(format: &str) -> OutputFormat {
    match format.to_lowercase().as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

fn run_simulation(
    trace: &PathBuf,
    step: bool,
    verbose: bool,
    format: OutputFormat,
    seed: Option<u64>,
    output: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = SimulatorConfig::default();
    let mut simulator = match seed {
        Some(seed) => Simulator::with_seed(config, seed),
        None => Simulator::new(config),
    };

    let count = simulator.load_trace(trace)?;
    println!("Loaded {} instructions from {}", count, trace.display());

    let log_file = output.map(|path| path.to_string_lossy().to_string());
    let mut logger = Logger::new(log_file.as_deref(), LogLevel::Info)?;
    logger.info(&format!("Starting simulation of {}", trace.display()));

    let dump = StateDump::new(format);

    if step || verbose || output.is_some() {
        loop {
            let (continue_simulation, state) = simulator.run_step()?;
            let rendered = dump.render(&state);
            if step || verbose {
                println!("{}", rendered);
            }
            if output.is_some() {
                logger.info(&rendered);
            }
            if !continue_simulation {
                break;
            }
        }
    } else {
        let _ = simulator.run()?;
    }

    println!("{}", "Simulation complete.".green().bold());
    print!("{}", simulator.metrics.report());

    if let Some(log_file) = log_file {
        println!("\nCycle log written to {}", log_file);
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            trace,
            step,
            verbose,
            format,
            seed,
            log_level,
            output,
        } => {
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .init();

            let format = parse_output_format(&format);
            if let Err(e) = run_simulation(&trace, step, verbose, format, seed, output.as_ref()) {
                eprintln!("{} {}", "[ERROR]".red().bold(), e);
                process::exit(1);
            }
        },
        Commands::Generate { output, num, seed } => {
            env_logger::init();

            if let Err(e) = trace_generator::write_file(&output, num, seed) {
                eprintln!("{} {}", "[ERROR]".red().bold(), e);
                process::exit(1);
            }
            println!(
                "Generated random trace with {} instructions at {}",
                num,
                output.display()
            );
        },
    }
}
