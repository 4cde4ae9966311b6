use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};

use safetynet_alerts::cli::{Cli, Command};
use safetynet_alerts::logging::init_logging;
use safetynet_alerts::orchestrator::{
    EXIT_NOT_FOUND, EXIT_OK, Outcome, RunConfig, apply_mutation, exit_code_for, run_report,
};
use safetynet_alerts::util::envfile::{load_dotenv_if_present, write_env_template};

fn main() {
    // .env must be loaded before clap reads the SAFETYNET_* variables
    let dotenv = load_dotenv_if_present();
    let cli = Cli::parse();
    init_logging(cli.tracing);
    if let Err(e) = dotenv {
        warn!("Ignoring .env: {:#}", e);
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(exit_code_for(&e));
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    if let Command::EnvTemplate { path } = &cli.command {
        write_env_template(path)?;
        info!("Wrote env template to {}", path);
        return Ok(EXIT_OK);
    }

    let app = cli.to_app_config()?;
    let cfg = RunConfig::new(app, cli.reference_date())?;
    let store = cfg.open_store()?;

    if let Some(req) = cli.command.report_request() {
        return Ok(match run_report(&store, &cfg, &req)? {
            Outcome::Written(_) => EXIT_OK,
            Outcome::NotFound(_) => EXIT_NOT_FOUND,
        });
    }

    if let Some(m) = cli.command.mutation()? {
        let record = apply_mutation(&store, m)?;
        println!("{}", serde_json::to_string_pretty(&record)?);
    }
    Ok(EXIT_OK)
}
