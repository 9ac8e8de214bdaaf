//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

#[derive(Debug)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub telemetry_out: Option<PathBuf>,
    pub log_level: String,
    pub quiet: bool,
}

/// Outcome of parsing: run with options, or show usage and exit.
#[derive(Debug)]
pub enum Command {
    Run(CliOptions),
    Help,
}

pub fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<Command, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut telemetry_out = None;
    let mut log_level = None;
    let mut quiet = false;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(
                    i,
                    "missing value for --preset (expected a preset name)",
                )?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--telemetry-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --telemetry-out (expected a file path)",
                )?;
                if telemetry_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--telemetry-out provided more than once".to_string());
                }
            }
            "--log-level" => {
                i += 1;
                let level = args.next_or_err(
                    i,
                    "missing value for --log-level (expected e.g. info or debug)",
                )?;
                log_level = Some(level.to_string());
            }
            "--quiet" | "-q" => quiet = true,
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if scenario.is_none() && preset.is_none() {
        preset = Some("reference".to_string());
    }

    Ok(Command::Run(CliOptions {
        scenario,
        preset,
        telemetry_out,
        log_level: log_level.unwrap_or_else(|| "info".to_string()),
        quiet,
    }))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("ev-station-sim - EV charging station state-of-charge simulator");
    eprintln!();
    eprintln!("Usage: ev-station-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (reference, two_sessions, synthetic)");
    eprintln!("  --telemetry-out <path>   Export step records to CSV");
    eprintln!("  --log-level <filter>     Log filter when RUST_LOG is unset (default: info)");
    eprintln!("  -q, --quiet              Do not print per-step records");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("EV_SIM_PERIOD_SECONDS and EV_SIM_STEPS override the scenario timing.");
}
