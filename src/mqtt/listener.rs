//! Logs every message arriving on a set of subscribed topics.

use super::client::{MqttClient, MqttMessage};
use crate::config::MqttConfig;
use crate::error::{DiscoveryError, Result};
use log::{info, warn};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Seconds to wait for the first ConnAck before giving up.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Wait for the event loop to report a connection.
pub async fn wait_connected(connected_rx: oneshot::Receiver<()>) -> Result<()> {
    match tokio::time::timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS), connected_rx).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(_)) => Err(DiscoveryError::MqttConnection(
            "connection signal channel dropped".to_string(),
        )),
        Err(_) => Err(DiscoveryError::ConnectionTimeout(CONNECT_TIMEOUT_SECS)),
    }
}

/// Subscribe to `topics` and log each message until the connection ends.
pub async fn listen(config: &MqttConfig, topics: &[String]) -> Result<()> {
    info!(
        "[MQTT] Connecting to {}:{}",
        config.broker_host, config.broker_port
    );

    let mqtt_client = MqttClient::new(config);

    // Queued until the event loop has connected
    for topic in topics {
        if let Err(e) = mqtt_client.subscribe(topic).await {
            warn!("[MQTT] Failed to subscribe to {}: {:?}", topic, e);
        }
    }

    let (msg_tx, mut msg_rx) = mpsc::channel::<MqttMessage>(64);
    let (connected_tx, connected_rx) = oneshot::channel();

    let mqtt_loop = tokio::spawn(async move {
        mqtt_client.run(msg_tx, Some(connected_tx)).await;
    });

    if let Err(e) = wait_connected(connected_rx).await {
        mqtt_loop.abort();
        return Err(e);
    }

    info!("[MQTT] Listening on {} topic(s)", topics.len());

    while let Some(msg) = msg_rx.recv().await {
        info!("{} {}", msg.topic, msg.payload);
    }

    mqtt_loop.abort();
    Ok(())
}
