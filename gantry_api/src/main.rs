//! # Gantry Station
//!
//! Loads `gantry.toml`, claims the GPIO lines, opens the camera and serves
//! the HTTP API. Any startup failure is fatal (exit code 1) and nothing is
//! served.
//!
//! On shutdown the server drains, the station is dropped (camera released,
//! every output driven low and released), then the GPIO driver is shut down.

use clap::Parser;
use gantry_api::camera::open_camera;
use gantry_api::server::serve;
use gantry_api::{Station, router};
use gantry_common::config::{CameraSourceKind, GantryConfig};
use gantry_common::motion::CaptureFailurePolicy;
use gantry_hal::{HalCore, available_drivers};
use gantry_motion::{Gantry, PositionSequencer};
use std::path::PathBuf;
use std::process;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

/// Gantry Station: camera gantry HTTP service
#[derive(Parser, Debug)]
#[command(name = "gantry_api")]
#[command(version)]
#[command(about = "Drives a two-axis camera gantry through four corner positions")]
struct Args {
    /// Path to station configuration file.
    #[arg(short, long, default_value = "config/gantry.toml")]
    config: PathBuf,

    /// Use the simulation driver and simulated camera regardless of config.
    #[arg(long)]
    simulate: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    /// Override `[motion] on_capture_failure` ("abort" or "return_to_origin").
    #[arg(long, value_name = "POLICY")]
    on_capture_failure: Option<CaptureFailurePolicy>,

    /// List compiled-in GPIO drivers and exit.
    #[arg(long)]
    list_drivers: bool,
}

fn main() {
    let args = Args::parse();

    if args.list_drivers {
        for name in available_drivers() {
            println!("{name}");
        }
        return;
    }

    let config = GantryConfig::from_file(&args.config);
    let level = match &config {
        Ok(config) => config.shared.log_level.into(),
        Err(_) => Level::INFO,
    };
    setup_tracing(&args, level);

    info!("Gantry Station v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = match config {
        Ok(config) => run(&args, config),
        Err(e) => Err(format!("config {:?}: {e}", args.config).into()),
    };
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Gantry Station shutdown complete");
}

fn run(args: &Args, mut config: GantryConfig) -> Result<(), Box<dyn std::error::Error>> {
    if args.simulate {
        info!("Simulation mode enabled (driver and camera)");
        config.hal.driver = "simulation".to_string();
        config.camera.source = CameraSourceKind::Simulation;
    }
    if let Some(policy) = args.on_capture_failure {
        config.motion.on_capture_failure = policy;
    }

    // ── GPIO ──
    let mut hal = HalCore::new(config.hal.clone())?;
    hal.init(&config.hal.driver)?;
    let lines = hal.claim_lines()?;
    if let Some(diag) = hal.diagnostics() {
        debug!(
            "GPIO driver: {} outputs, {} inputs claimed",
            diag.outputs_claimed, diag.inputs_claimed
        );
    }

    // ── Camera ──
    let camera = open_camera(&config.camera)?;

    // ── Station ──
    let gantry = Gantry::new(lines, &config.motion);
    let sequencer = PositionSequencer::new(gantry, config.motion.on_capture_failure);
    let station = Station::new(sequencer, camera).shared();
    let app = router(station.clone(), &config.api);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("gantry-api")
        .build()?;
    let served = runtime.block_on(serve(app, config.api.bind));
    drop(runtime);

    // Station (camera + lines) goes before the driver.
    drop(station);
    hal.shutdown()?;
    served?;
    Ok(())
}

fn setup_tracing(args: &Args, configured: Level) {
    let level = if args.verbose { Level::DEBUG } else { configured };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
