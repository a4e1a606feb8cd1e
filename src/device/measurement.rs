//! Descriptor for a single sensed quantity.

/// One quantity a device can report (temperature, humidity, ...).
///
/// Fields are fixed at construction. Callers who need a different value
/// build a new `Measurement`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Measurement {
    name: String,
    device_class: String,
    state_topic: String,
    unit_of_measurement: String,
}

impl Measurement {
    /// Create a measurement descriptor.
    ///
    /// # Arguments
    /// * `name` - Human-readable name of the quantity (e.g., "temperature")
    /// * `device_class` - Category tag understood by Home Assistant (e.g., "humidity")
    /// * `state_topic` - Topic on which readings for this quantity are published
    /// * `unit_of_measurement` - Unit of the readings (e.g., "°C")
    ///
    /// Empty strings are accepted as-is.
    pub fn new(
        name: impl Into<String>,
        device_class: impl Into<String>,
        state_topic: impl Into<String>,
        unit_of_measurement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            device_class: device_class.into(),
            state_topic: state_topic.into(),
            unit_of_measurement: unit_of_measurement.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_class(&self) -> &str {
        &self.device_class
    }

    pub fn state_topic(&self) -> &str {
        &self.state_topic
    }

    pub fn unit_of_measurement(&self) -> &str {
        &self.unit_of_measurement
    }
}
