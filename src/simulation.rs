//! Simulated readings for development without real sensors.

use crate::device::Device;
use crate::discovery::Readings;
use log::debug;
use rand::Rng;

/// A reading in `[0.0, 100.0)` truncated to one decimal place.
pub fn simulated_reading<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (1000.0 * rng.r#gen::<f64>()).floor() / 10.0
}

/// One simulated reading per distinct device class of the device.
pub fn simulated_readings<R: Rng + ?Sized>(device: &Device, rng: &mut R) -> Readings {
    let mut readings = Readings::new();
    for m in device.measurements() {
        if !readings.contains_key(m.device_class()) {
            readings.insert(m.device_class().to_string(), simulated_reading(rng));
        }
    }
    debug!("[Sim] {} readings: {:?}", device.name(), readings);
    readings
}
