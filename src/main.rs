//! EV station simulator entry point: CLI wiring and config-driven runs.

use std::process;

use tracing::error;

use ev_station_sim::cli::{self, Command};
use ev_station_sim::config::ScenarioConfig;
use ev_station_sim::io::export::export_csv;
use ev_station_sim::logging::init_logging;
use ev_station_sim::reporting::print_station_report;
use ev_station_sim::runner::run_scenario;

fn main() {
    let opts = match cli::parse_args() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            cli::print_usage();
            return;
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(2);
        }
    };

    init_logging(&opts.log_level);

    // --scenario takes priority, then --preset (cli defaults it to reference)
    let loaded = if let Some(ref path) = opts.scenario {
        ScenarioConfig::from_toml_file(path)
    } else {
        ScenarioConfig::from_preset(opts.preset.as_deref().unwrap_or("reference"))
    };
    let mut scenario = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if let Err(e) = scenario.apply_env_overrides() {
        eprintln!("{e}");
        process::exit(1);
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let summary = match run_scenario(&scenario) {
        Ok(summary) => summary,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if !opts.quiet {
        for r in &summary.records {
            println!("{r}");
        }
    }

    print_station_report(&summary.stations);

    if let Some(ref path) = opts.telemetry_out {
        if let Err(e) = export_csv(&summary.records, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {}", path.display());
    }
}
