//! In-memory model of a sensing device and the quantities it measures.
//!
//! A [`Device`] is built once with its name and platform, then measurement
//! descriptors are appended to it before it is handed to the discovery
//! publisher.

pub mod measurement;

pub use measurement::Measurement;

/// A physical sensing unit and its ordered list of measurements.
///
/// Measurements keep insertion order and may repeat; the list only grows.
///
/// # Example
/// ```
/// use sensor_discovery::device::{Device, Measurement};
///
/// let mut device = Device::new("feather1", "adafruit_feather_m0");
/// device.add_measurement(Measurement::new(
///     "temperature",
///     "temperature",
///     "home/feather1/temp",
///     "°C",
/// ));
/// assert_eq!(device.measurements().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    name: String,
    platform: String,
    measurements: Vec<Measurement>,
}

impl Device {
    /// Create a device with no measurements.
    pub fn new(name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
            measurements: Vec::new(),
        }
    }

    /// Append a measurement to the end of the list.
    pub fn add_measurement(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    /// Builder form of [`Device::add_measurement`].
    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.add_measurement(measurement);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Measurements in insertion order.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }
}
