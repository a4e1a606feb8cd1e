//! Publishes discovery announcements and state readings for devices.

use crate::config::DiscoverySettings;
use crate::device::Device;
use crate::discovery::{self, Readings};
use crate::error::Result;
use async_trait::async_trait;
use log::{debug, info};
use rumqttc::{AsyncClient, QoS};

/// Destination for outgoing MQTT messages.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<()>;
}

#[async_trait]
impl MessageSink for AsyncClient {
    async fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<()> {
        debug!("[MQTT] Publishing to {}: {}", topic, payload);
        AsyncClient::publish(self, topic, QoS::AtLeastOnce, retain, payload.as_bytes()).await?;
        Ok(())
    }
}

/// Announces devices to Home Assistant and reports their readings.
pub struct DiscoveryPublisher<S> {
    sink: S,
    settings: DiscoverySettings,
}

impl<S: MessageSink> DiscoveryPublisher<S> {
    pub fn new(sink: S, settings: DiscoverySettings) -> Self {
        Self { sink, settings }
    }

    /// Publish a retained config message for every measurement.
    ///
    /// Returns the number of messages sent.
    pub async fn announce(&self, device: &Device) -> Result<usize> {
        let announcements = discovery::announcements(&self.settings, device)?;
        for announcement in &announcements {
            self.sink
                .publish(&announcement.topic, &announcement.payload, true)
                .await?;
        }

        info!(
            "[MQTT] Announced {} ({} measurement(s))",
            device.name(),
            announcements.len()
        );
        Ok(announcements.len())
    }

    /// Publish current readings, one message per state topic.
    ///
    /// Returns the number of messages sent.
    pub async fn publish_state(&self, device: &Device, readings: &Readings) -> Result<usize> {
        let messages = discovery::state_messages(device, readings)?;
        for message in &messages {
            self.sink
                .publish(&message.topic, &message.payload, false)
                .await?;
            info!("[MQTT] {} {}", message.topic, message.payload);
        }
        Ok(messages.len())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Measurement;
    use crate::error::DiscoveryError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(String, String, bool)>>,
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((topic.to_string(), payload.to_string(), retain));
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl MessageSink for FailingSink {
        async fn publish(&self, _topic: &str, _payload: &str, _retain: bool) -> Result<()> {
            Err(DiscoveryError::MqttConnection("broker unreachable".to_string()))
        }
    }

    fn device() -> Device {
        Device::new("feather1", "sensor")
            .with_measurement(Measurement::new("temperature", "temperature", "home/state", "°C"))
            .with_measurement(Measurement::new("humidity", "humidity", "home/state", "%"))
    }

    #[tokio::test]
    async fn test_announce_publishes_retained_configs() {
        let publisher = DiscoveryPublisher::new(RecordingSink::default(), DiscoverySettings::default());

        let count = publisher.announce(&device()).await.unwrap();
        assert_eq!(count, 2);

        let sent = publisher.sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "homeassistant/sensor/node1/feather1_temperature/config");
        assert_eq!(sent[1].0, "homeassistant/sensor/node1/feather1_humidity/config");
        assert!(sent.iter().all(|(_, _, retain)| *retain));
    }

    #[tokio::test]
    async fn test_publish_state_not_retained() {
        let publisher = DiscoveryPublisher::new(RecordingSink::default(), DiscoverySettings::default());
        let readings: Readings = [("temperature".to_string(), 20.0), ("humidity".to_string(), 45.5)]
            .into_iter()
            .collect();

        let count = publisher.publish_state(&device(), &readings).await.unwrap();
        assert_eq!(count, 1);

        let sent = publisher.sink.sent.lock().unwrap();
        assert_eq!(sent[0].0, "home/state");
        assert!(!sent[0].2);
    }

    #[test]
    fn test_sink_error_propagates() {
        let publisher = DiscoveryPublisher::new(FailingSink, DiscoverySettings::default());
        let result = tokio_test::block_on(publisher.announce(&device()));
        assert!(matches!(result, Err(DiscoveryError::MqttConnection(_))));
    }

    #[test]
    fn test_empty_device_sends_nothing() {
        let publisher = DiscoveryPublisher::new(FailingSink, DiscoverySettings::default());
        let count = tokio_test::block_on(publisher.announce(&Device::new("d", "p"))).unwrap();
        assert_eq!(count, 0);
    }
}
