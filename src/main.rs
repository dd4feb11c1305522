use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use wmedsim::config_loader;
use wmedsim::supervisor::{MediumSupervisor, ProcessLauncher, TmuxLauncher, DEFAULT_SESSION};
use wmedsim::utils::NetnsMacResolver;
use wmedsim::wmediumd::render_config;

/// Connectivity-topology manager for wmediumd radio medium simulations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology description YAML file
    #[arg(short, long, required_unless_present = "teardown")]
    config: Option<PathBuf>,

    /// Output path for the generated wmediumd configuration
    #[arg(short, long, default_value = "wmediumd.cfg")]
    output: PathBuf,

    /// Launch wmediumd detached instead of only writing the configuration
    #[arg(long)]
    launch: bool,

    /// Terminate a previously launched wmediumd session and exit
    #[arg(long)]
    teardown: bool,

    /// Session label for launching and terminating the simulator
    #[arg(long, default_value = DEFAULT_SESSION)]
    session: String,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if args.teardown {
        info!("Tearing down wmediumd session '{}'", args.session);
        match TmuxLauncher.terminate(&args.session) {
            Ok(true) => info!("Session '{}' terminated", args.session),
            Ok(false) => warn!("Session '{}' not found", args.session),
            Err(e) => warn!("Could not terminate session '{}': {}", args.session, e),
        }
        return Ok(());
    }

    let config_path = args
        .config
        .ok_or_else(|| eyre!("--config is required unless --teardown is given"))?;
    let config = config_loader::load_config(&config_path)?;
    let mut registry = config.build_registry()?;

    if args.launch {
        let mut supervisor = MediumSupervisor::new();
        supervisor.set_session(args.session.as_str());
        supervisor.configure(&mut registry, &NetnsMacResolver, &config.medium.executable)?;
        supervisor.start()?;

        info!(
            "wmediumd running detached in session '{}' (config: {:?})",
            supervisor.session(),
            supervisor.config_path()
        );
        info!("Stop it later with: wmedsim --teardown --session {}", args.session);
        return Ok(());
    }

    let links = registry.finalize()?;
    let rendered = render_config(registry.interfaces(), &links, &NetnsMacResolver)?;
    fs::write(&args.output, &rendered)
        .wrap_err_with(|| format!("Failed to write '{}'", args.output.display()))?;

    info!("Generated wmediumd configuration: {:?}", args.output);
    info!(
        "  - {} interfaces, {} links",
        registry.interfaces().len(),
        links.len()
    );
    info!(
        "Run the simulator with: {} -c {:?}",
        config.medium.executable, args.output
    );

    Ok(())
}
