use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use env_logger::Env;
use worker_advisor::{Config, CoreOverrides, SystemCores, resolve_num_workers};

#[derive(Parser)]
#[clap(version, long_version = env!("WORKER_ADVISOR_LONG_VERSION"), about)]
pub struct Cli {
    /// Path to a TOML file with a `[workers]` table
    #[clap(short = 'c', long)]
    pub config_file: Option<PathBuf>,

    /// Print the whole recommendation as JSON instead of the bare worker count
    #[clap(long, default_value_t = false)]
    pub json: bool,

    /// Use this logical core count instead of asking the OS
    #[clap(long)]
    pub logical_cores: Option<usize>,

    /// Use this physical core count instead of detecting it
    #[clap(long)]
    pub physical_cores: Option<usize>,

    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        Env::default().default_filter_or(cli.verbose.log_level_filter().as_str()),
    )
    .init();

    let config = match &cli.config_file {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let cores = CoreOverrides::new(SystemCores)
        .logical(cli.logical_cores)
        .physical(cli.physical_cores);

    let recommendation = resolve_num_workers(&cores, &config);
    log::info!("{recommendation}");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else {
        println!("{}", recommendation.num_workers);
    }

    Ok(())
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::FAILURE
        }
    }
}
