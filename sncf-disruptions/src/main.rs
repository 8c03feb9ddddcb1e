use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sncf_disruptions::config::{Overrides, Settings};
use sncf_disruptions::navitia::{Backend, MockNavitiaClient, NavitiaClient};
use sncf_disruptions::report::{check_both_directions, render};
use sncf_disruptions::sensor::{DisruptionSensor, SensorMode, poll_once, run};
use sncf_disruptions::web::{AppState, create_router};

#[derive(Parser)]
#[command(author, version, about = "Vérifier les horaires et perturbations des trains entre deux stations")]
struct Cli {
    /// YAML config file
    #[arg(long, global = true, env = "SNCF_CONFIG")]
    config: Option<PathBuf>,

    /// Navitia API token
    #[arg(long, global = true, env = "TOKEN_NAVITIA", hide_env_values = true)]
    token: Option<String>,

    /// ID de la première station
    #[arg(long, global = true)]
    station1_id: Option<String>,

    /// Nom de la première station
    #[arg(long, global = true)]
    station1_name: Option<String>,

    /// ID de la deuxième station
    #[arg(long, global = true)]
    station2_id: Option<String>,

    /// Nom de la deuxième station
    #[arg(long, global = true)]
    station2_name: Option<String>,

    /// Journeys requested per search
    #[arg(long, global = true)]
    count: Option<u32>,

    /// Navitia API root
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Serve canned responses from this directory instead of calling Navitia
    #[arg(long, global = true)]
    mock_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check both directions once and print the result
    Report {
        #[arg(long, value_enum)]
        mode: Option<SensorMode>,
    },
    /// Poll one direction and keep the sensor up to date
    Watch {
        #[arg(long, value_enum)]
        mode: Option<SensorMode>,

        /// Serve the sensor as JSON on this address
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Update once, print the sensor and exit
        #[arg(long)]
        once: bool,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let mode = match &self.command {
            Command::Report { mode } | Command::Watch { mode, .. } => *mode,
        };
        Overrides {
            token: self.token.clone(),
            station1_id: self.station1_id.clone(),
            station1_name: self.station1_name.clone(),
            station2_id: self.station2_id.clone(),
            station2_name: self.station2_name.clone(),
            count: self.count,
            base_url: self.base_url.clone(),
            mode,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref(), cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let backend = match backend(&settings, cli.mock_dir.as_deref()) {
        Ok(backend) => backend,
        Err(e) => {
            error!(error = %e, "failed to create journey source");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Report { .. } => {
            let reports = check_both_directions(
                &backend,
                &settings.direction,
                Local::now().naive_local(),
                settings.count,
                settings.mode,
            )
            .await;
            print!("{}", render(&reports));
            ExitCode::SUCCESS
        }
        Command::Watch { listen, once, .. } => watch_sensor(settings, backend, listen, once).await,
    }
}

fn backend(
    settings: &Settings,
    mock_dir: Option<&Path>,
) -> Result<Backend, Box<dyn std::error::Error>> {
    if let Some(dir) = mock_dir {
        let mock = MockNavitiaClient::new(dir)?;
        info!(dir = %dir.display(), fixtures = mock.len(), "using mock journeys");
        return Ok(Backend::Mock(mock));
    }
    let client = NavitiaClient::new(settings.navitia_config()?)?;
    Ok(Backend::Live(client))
}

async fn watch_sensor(
    settings: Settings,
    backend: Backend,
    listen: Option<SocketAddr>,
    once: bool,
) -> ExitCode {
    let mut sensor = DisruptionSensor::new(settings.sensor_config());
    let (tx, rx) = watch::channel(sensor.snapshot());

    if once {
        poll_once(&mut sensor, &backend, Local::now().naive_local(), &tx).await;
        return match serde_json::to_string_pretty(&sensor.snapshot()) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "failed to serialize sensor");
                ExitCode::FAILURE
            }
        };
    }

    info!(
        sensor = sensor.name(),
        unique_id = %sensor.unique_id(),
        direction = %settings.direction,
        every_secs = settings.poll_interval_secs,
        "watching"
    );

    let poller = tokio::spawn(run(sensor, backend, settings.poll_interval(), tx));

    let Some(addr) = listen else {
        if let Err(e) = poller.await {
            error!(error = %e, "poll loop stopped");
        }
        return ExitCode::FAILURE;
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!("listening on http://{addr}");
    info!("  GET /health      - health check");
    info!("  GET /api/sensor  - sensor state and attributes");

    if let Err(e) = axum::serve(listener, create_router(AppState::new(rx))).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
