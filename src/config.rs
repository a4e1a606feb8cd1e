use crate::device::{Device, Measurement};
use crate::discovery;
use crate::error::{DiscoveryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Load environment variables from .env file with robust parsing.
/// Handles values with spaces without requiring quotes.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

fn load_dotenv_from(env_path: &Path) {
    let Ok(content) = fs::read_to_string(env_path) else {
        return;
    };

    for (key, value) in parse_dotenv(&content) {
        // Only set if not already set (env vars take precedence)
        if std::env::var(key).is_err() {
            // SAFETY: We're single-threaded at this point (called before any async runtime)
            unsafe { std::env::set_var(key, value) };
        }
    }
}

fn parse_dotenv(content: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let mut value = value.trim();

            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }

            pairs.push((key.trim(), value));
        }
    }

    pairs
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub mqtt: MqttConfig,
    pub discovery: DiscoverySettings,
    pub devices_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Where discovery announcements are rooted on the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// Discovery prefix Home Assistant listens on
    pub prefix: String,
    /// Node identifier grouping this publisher's devices
    pub node_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mqtt: MqttConfig {
                broker_host: "localhost".to_string(),
                broker_port: 1883,
                client_id: "sensor-discovery".to_string(),
                username: None,
                password: None,
            },
            discovery: DiscoverySettings::default(),
            devices_file: None,
        }
    }
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            prefix: "homeassistant".to_string(),
            node_id: "node1".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // MQTT configuration
        if let Some(host) = lookup("MQTT_BROKER_HOST") {
            config.mqtt.broker_host = host;
        }
        if let Some(port) = lookup("MQTT_BROKER_PORT")
            && let Ok(p) = port.parse()
        {
            config.mqtt.broker_port = p;
        }
        if let Some(client_id) = lookup("MQTT_CLIENT_ID") {
            config.mqtt.client_id = client_id;
        }
        if let Some(username) = lookup("MQTT_USERNAME") {
            config.mqtt.username = Some(username);
        }
        if let Some(password) = lookup("MQTT_PASSWORD") {
            config.mqtt.password = Some(password);
        }

        // Discovery configuration
        if let Some(prefix) = lookup("DISCOVERY_PREFIX") {
            config.discovery.prefix = prefix;
        }
        if let Some(node_id) = lookup("DISCOVERY_NODE_ID") {
            config.discovery.node_id = node_id;
        }

        if let Some(path) = lookup("SENSOR_DEVICES_FILE") {
            config.devices_file = Some(PathBuf::from(path));
        }

        config
    }
}

/// One device entry in the devices file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    pub platform: String,
    #[serde(default)]
    pub measurements: Vec<MeasurementConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementConfig {
    pub name: String,
    pub device_class: String,
    pub unit_of_measurement: String,
    /// Falls back to the device's shared state topic when absent
    #[serde(default)]
    pub state_topic: Option<String>,
}

impl DeviceConfig {
    /// Build the in-memory device, filling in shared state topics.
    pub fn to_device(&self, settings: &DiscoverySettings) -> Device {
        let shared_topic =
            discovery::shared_state_topic(settings, &self.platform, &self.name);
        let mut device = Device::new(&self.name, &self.platform);

        for m in &self.measurements {
            let state_topic = m.state_topic.as_deref().unwrap_or(shared_topic.as_str());
            device.add_measurement(Measurement::new(
                &m.name,
                &m.device_class,
                state_topic,
                &m.unit_of_measurement,
            ));
        }

        device
    }

    /// Demo device used when no devices file is configured.
    pub fn demo() -> Self {
        Self {
            name: "feather1".to_string(),
            platform: "adafruit_feather_m0".to_string(),
            measurements: vec![
                MeasurementConfig {
                    name: "temperature".to_string(),
                    device_class: "temperature".to_string(),
                    unit_of_measurement: "°C".to_string(),
                    state_topic: None,
                },
                MeasurementConfig {
                    name: "humidity".to_string(),
                    device_class: "humidity".to_string(),
                    unit_of_measurement: "%".to_string(),
                    state_topic: None,
                },
            ],
        }
    }
}

/// Parse a JSON array of device entries.
pub fn parse_devices(content: &str) -> Result<Vec<DeviceConfig>> {
    let devices: Vec<DeviceConfig> = serde_json::from_str(content)?;
    if devices.is_empty() {
        return Err(DiscoveryError::InvalidDeviceFile(
            "no devices defined".to_string(),
        ));
    }
    Ok(devices)
}

/// Load device entries from a JSON file.
pub fn load_devices(path: &Path) -> Result<Vec<DeviceConfig>> {
    let content = fs::read_to_string(path)?;
    parse_devices(&content).map_err(|e| match e {
        DiscoveryError::SerdeJsonError(err) => {
            DiscoveryError::InvalidDeviceFile(format!("{}: {}", path.display(), err))
        }
        other => other,
    })
}
