//! MQTT client wrapper for broker communication.

use crate::config::MqttConfig;
use log::{debug, error, info, warn};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Message received from MQTT broker.
#[derive(Debug, Clone)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: String,
}

/// MQTT client owning the connection event loop.
pub struct MqttClient {
    client: AsyncClient,
    event_loop: EventLoop,
}

impl MqttClient {
    /// Create a new MQTT client from configuration.
    pub fn new(config: &MqttConfig) -> Self {
        let (client, event_loop) = AsyncClient::new(mqtt_options(config), 100);
        Self { client, event_loop }
    }

    /// Subscribe to a topic.
    ///
    /// May be called before [`MqttClient::run`]; the request is sent once
    /// the connection is up.
    pub async fn subscribe(&self, topic: &str) -> Result<(), rumqttc::ClientError> {
        info!("[MQTT] Subscribing to topic: {}", topic);
        self.client.subscribe(topic, QoS::AtMostOnce).await
    }

    /// Run the MQTT event loop and forward messages to the provided channel.
    ///
    /// `connected` fires on the first ConnAck. Runs until a disconnect
    /// requested through [`AsyncClient::disconnect`] has been written, or
    /// until the receiving side of `tx` is dropped. Requests queued before
    /// the disconnect are written first.
    pub async fn run(
        mut self,
        tx: mpsc::Sender<MqttMessage>,
        mut connected: Option<oneshot::Sender<()>>,
    ) {
        info!("[MQTT] Starting event loop");

        loop {
            match self.event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("[MQTT] Connected to broker");
                    if let Some(signal) = connected.take() {
                        let _ = signal.send(());
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let topic = publish.topic.clone();
                    let payload = match String::from_utf8(publish.payload.to_vec()) {
                        Ok(s) => s,
                        Err(e) => {
                            warn!("[MQTT] Invalid UTF-8 in payload on {}: {}", topic, e);
                            continue;
                        }
                    };

                    debug!("[MQTT] Received on {}: {}", topic, payload);

                    if tx.send(MqttMessage { topic, payload }).await.is_err() {
                        debug!("[MQTT] Message channel closed, stopping event loop");
                        break;
                    }
                }
                Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                    info!("[MQTT] Disconnected from broker");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("[MQTT] Connection error: {:?}", e);
                    // Wait before reconnecting
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    /// Get a clone of the async client for publishing from other tasks.
    pub fn client(&self) -> AsyncClient {
        self.client.clone()
    }
}

fn mqtt_options(config: &MqttConfig) -> MqttOptions {
    let mut options = MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
    options.set_keep_alive(Duration::from_secs(30));

    // Set credentials if provided
    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        options.set_credentials(username, password);
    }

    options
}
