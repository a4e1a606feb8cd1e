//! MQTT transport for Home Assistant discovery.
//!
//! Wraps rumqttc to announce devices, publish their readings, and log
//! traffic on subscribed topics.

pub mod announcer;
mod client;
pub mod listener;
mod publisher;
#[cfg(test)]
mod test_broker;

pub use announcer::ReportSchedule;
pub use client::{MqttClient, MqttMessage};
pub use publisher::{DiscoveryPublisher, MessageSink};
