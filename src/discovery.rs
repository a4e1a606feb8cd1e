//! Home Assistant MQTT discovery payloads.
//!
//! Maps a [`Device`] into one retained config announcement per measurement,
//! plus state messages carrying readings keyed by device class.
//!
//! Topic layout:
//! - root: `{prefix}/{platform}/{node_id}/{device}`
//! - config: `{root}_{device_class}/config`
//! - shared state: `{root}/state`

use crate::config::DiscoverySettings;
use crate::device::{Device, Measurement};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Latest reading per device class.
pub type Readings = HashMap<String, f64>;

/// Config payload Home Assistant reads to create an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryPayload {
    pub name: String,
    pub device_class: String,
    pub state_topic: String,
    pub unit_of_measurement: String,
    pub value_template: String,
}

impl DiscoveryPayload {
    pub fn from_measurement(measurement: &Measurement) -> Self {
        Self {
            name: measurement.name().to_string(),
            device_class: measurement.device_class().to_string(),
            state_topic: measurement.state_topic().to_string(),
            unit_of_measurement: measurement.unit_of_measurement().to_string(),
            value_template: value_template(measurement.device_class()),
        }
    }
}

/// A config message ready to publish.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub topic: String,
    pub payload: String,
}

/// A state message ready to publish.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMessage {
    pub topic: String,
    pub payload: String,
}

pub fn root_topic(settings: &DiscoverySettings, platform: &str, device_name: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        settings.prefix, platform, settings.node_id, device_name
    )
}

/// Topic shared by all measurements of a device that don't set their own.
pub fn shared_state_topic(
    settings: &DiscoverySettings,
    platform: &str,
    device_name: &str,
) -> String {
    format!("{}/state", root_topic(settings, platform, device_name))
}

pub fn config_topic(
    settings: &DiscoverySettings,
    device: &Device,
    measurement: &Measurement,
) -> String {
    format!(
        "{}_{}/config",
        root_topic(settings, device.platform(), device.name()),
        measurement.device_class()
    )
}

/// Jinja template extracting this class from a JSON state payload.
pub fn value_template(device_class: &str) -> String {
    format!("{{{{ value_json.{} }}}}", device_class)
}

/// Config announcements for every measurement, in measurement order.
pub fn announcements(settings: &DiscoverySettings, device: &Device) -> Result<Vec<Announcement>> {
    device
        .measurements()
        .iter()
        .map(|m| {
            let payload = serde_json::to_string(&DiscoveryPayload::from_measurement(m))?;
            Ok(Announcement {
                topic: config_topic(settings, device, m),
                payload,
            })
        })
        .collect()
}

/// State messages grouped by state topic, in first-seen topic order.
///
/// Measurements whose class has no reading are left out; a topic with
/// nothing to report yields no message.
pub fn state_messages(device: &Device, readings: &Readings) -> Result<Vec<StateMessage>> {
    let mut grouped: Vec<(&str, serde_json::Map<String, serde_json::Value>)> = Vec::new();

    for m in device.measurements() {
        let Some(value) = readings.get(m.device_class()) else {
            continue;
        };

        let index = match grouped.iter().position(|(t, _)| *t == m.state_topic()) {
            Some(i) => i,
            None => {
                grouped.push((m.state_topic(), serde_json::Map::new()));
                grouped.len() - 1
            }
        };
        grouped[index]
            .1
            .insert(m.device_class().to_string(), serde_json::json!(value));
    }

    grouped
        .into_iter()
        .map(|(topic, fields)| {
            Ok(StateMessage {
                topic: topic.to_string(),
                payload: serde_json::to_string(&fields)?,
            })
        })
        .collect()
}
