//! Connects to the broker, announces devices, then reports simulated state.

use super::client::{MqttClient, MqttMessage};
use super::listener::wait_connected;
use super::publisher::{DiscoveryPublisher, MessageSink};
use crate::config::{DiscoverySettings, MqttConfig};
use crate::device::Device;
use crate::error::{DiscoveryError, Result};
use crate::simulation::simulated_readings;
use log::info;
use rumqttc::AsyncClient;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Seconds to wait for queued publishes and the disconnect to be written.
pub const DISCONNECT_TIMEOUT_SECS: u64 = 10;

/// How many state rounds to publish and how far apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSchedule {
    pub rounds: u32,
    pub interval: Duration,
}

impl Default for ReportSchedule {
    fn default() -> Self {
        Self {
            rounds: 5,
            interval: Duration::from_secs(1),
        }
    }
}

/// Announce every device, then publish `schedule.rounds` rounds of readings.
///
/// Returns the total number of messages published.
pub async fn announce_and_report<S: MessageSink>(
    publisher: &DiscoveryPublisher<S>,
    devices: &[Device],
    schedule: ReportSchedule,
) -> Result<usize> {
    let mut sent = 0;

    for device in devices {
        sent += publisher.announce(device).await?;
    }

    for round in 0..schedule.rounds {
        if round > 0 {
            tokio::time::sleep(schedule.interval).await;
        }

        // ThreadRng is not Send, so draw every reading before awaiting
        let readings: Vec<_> = {
            let mut rng = rand::thread_rng();
            devices
                .iter()
                .map(|device| simulated_readings(device, &mut rng))
                .collect()
        };

        for (device, readings) in devices.iter().zip(&readings) {
            sent += publisher.publish_state(device, readings).await?;
        }
    }

    Ok(sent)
}

/// Connect with `config` and run [`announce_and_report`] over the live client.
pub async fn run(
    config: &MqttConfig,
    settings: DiscoverySettings,
    devices: &[Device],
    schedule: ReportSchedule,
) -> Result<usize> {
    info!(
        "[MQTT] Connecting to {}:{}",
        config.broker_host, config.broker_port
    );

    let mqtt_client = MqttClient::new(config);
    let client = mqtt_client.client();
    let publisher = DiscoveryPublisher::new(client.clone(), settings);

    let (msg_tx, _msg_rx) = mpsc::channel::<MqttMessage>(16);
    let (connected_tx, connected_rx) = oneshot::channel();

    let mqtt_loop = tokio::spawn(async move {
        mqtt_client.run(msg_tx, Some(connected_tx)).await;
    });

    if let Err(e) = wait_connected(connected_rx).await {
        mqtt_loop.abort();
        return Err(e);
    }

    let result = announce_and_report(&publisher, devices, schedule).await;
    let flushed = disconnect(&client, mqtt_loop).await;

    let sent = result?;
    flushed?;
    info!("[MQTT] Published {} message(s) for {} device(s)", sent, devices.len());
    Ok(sent)
}

/// Queue a disconnect behind every pending publish and wait for the event
/// loop to write it.
async fn disconnect(client: &AsyncClient, mut mqtt_loop: JoinHandle<()>) -> Result<()> {
    if let Err(e) = client.disconnect().await {
        mqtt_loop.abort();
        return Err(e.into());
    }

    match tokio::time::timeout(Duration::from_secs(DISCONNECT_TIMEOUT_SECS), &mut mqtt_loop).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(DiscoveryError::MqttConnection(format!(
            "event loop task failed: {}",
            e
        ))),
        Err(_) => {
            mqtt_loop.abort();
            Err(DiscoveryError::ConnectionTimeout(DISCONNECT_TIMEOUT_SECS))
        }
    }
}
