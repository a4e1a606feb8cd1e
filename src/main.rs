//! Announces sensing devices to Home Assistant over MQTT discovery.
//!
//! Usage:
//!   sensor-discovery announce --rounds 5
//!   sensor-discovery --devices devices.json announce
//!   sensor-discovery listen --topic 'homeassistant/#'

use clap::{Parser, Subcommand};
use log::{error, info};
use sensor_discovery::config::{self, Config, DeviceConfig};
use sensor_discovery::device::Device;
use sensor_discovery::error::{DiscoveryError, Result};
use sensor_discovery::mqtt::{ReportSchedule, announcer, listener};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "sensor-discovery")]
#[command(about = "Announce sensing devices to Home Assistant over MQTT")]
struct Cli {
    /// JSON file listing devices and their measurements
    #[arg(long, env = "SENSOR_DEVICES_FILE")]
    devices: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish discovery configs, then simulated readings
    Announce {
        /// Number of state rounds to publish
        #[arg(long, default_value_t = 5)]
        rounds: u32,

        /// Seconds between state rounds
        #[arg(long, default_value_t = 1)]
        interval_secs: u64,
    },
    /// Log every message on the given topics
    Listen {
        /// Topic filters to subscribe to
        #[arg(long = "topic", env = "MQTT_TOPICS", value_delimiter = ',', default_value = "#")]
        topics: Vec<String>,
    },
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn load_devices(config: &Config) -> Result<Vec<Device>> {
    let entries = match &config.devices_file {
        Some(path) => {
            info!("Loading devices from {}", path.display());
            config::load_devices(path)?
        }
        None => {
            info!("No devices file configured, using demo device");
            vec![DeviceConfig::demo()]
        }
    };

    Ok(entries
        .iter()
        .map(|entry| entry.to_device(&config.discovery))
        .collect())
}

async fn run(cli: Cli, mut config: Config) -> Result<()> {
    if cli.devices.is_some() {
        config.devices_file = cli.devices;
    }

    match cli.command {
        Commands::Announce {
            rounds,
            interval_secs,
        } => {
            let devices = load_devices(&config)?;
            for device in &devices {
                info!(
                    "  Device: {} ({}) with {} measurement(s)",
                    device.name(),
                    device.platform(),
                    device.measurements().len()
                );
            }

            let schedule = ReportSchedule {
                rounds,
                interval: Duration::from_secs(interval_secs),
            };
            announcer::run(&config.mqtt, config.discovery.clone(), &devices, schedule).await?;
        }
        Commands::Listen { topics } => {
            listener::listen(&config.mqtt, &topics).await?;
        }
    }

    Ok(())
}

fn main() {
    // Load .env file before the runtime spawns any threads
    config::load_dotenv();
    init_logger();

    let cli = Cli::parse();
    let config = Config::from_env();
    info!(
        "Broker {}:{}, discovery prefix '{}', node '{}'",
        config.mqtt.broker_host,
        config.mqtt.broker_port,
        config.discovery.prefix,
        config.discovery.node_id
    );

    let result = tokio::runtime::Runtime::new()
        .map_err(DiscoveryError::from)
        .and_then(|runtime| runtime.block_on(run(cli, config)));

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
