use sensor_discovery::device::{Device, Measurement};

#[test]
fn test_feather_with_two_measurements() {
    let mut device = Device::new("feather1", "adafruit_feather_m0");
    device.add_measurement(Measurement::new(
        "temperature",
        "temperature",
        "home/feather1/temp",
        "°C",
    ));
    device.add_measurement(Measurement::new(
        "humidity",
        "humidity",
        "home/feather1/hum",
        "%",
    ));

    let measurements = device.measurements();
    assert_eq!(measurements.len(), 2);
    assert_eq!(measurements[0].state_topic(), "home/feather1/temp");
    assert_eq!(measurements[1].unit_of_measurement(), "%");
}

#[test]
fn test_appended_copy_is_independent_of_caller() {
    let original = Measurement::new("co2", "carbon_dioxide", "home/co2", "ppm");
    let mut device = Device::new("air", "esp32");
    device.add_measurement(original.clone());
    drop(original);

    assert_eq!(device.measurements()[0].device_class(), "carbon_dioxide");
}

#[test]
fn test_many_appends_keep_order() {
    let mut device = Device::new("bench", "host");
    let expected: Vec<Measurement> = (0..50)
        .map(|i| Measurement::new(format!("m{i}"), "temperature", format!("t/{i}"), "°C"))
        .collect();

    for m in &expected {
        device.add_measurement(m.clone());
    }

    assert_eq!(device.measurements(), expected.as_slice());
    assert_eq!(device.name(), "bench");
    assert_eq!(device.platform(), "host");
}

#[test]
fn test_device_reads_are_repeatable() {
    let device = Device::new("feather1", "adafruit_feather_m0")
        .with_measurement(Measurement::new("temperature", "temperature", "home/t", "°C"))
        .with_measurement(Measurement::new("humidity", "humidity", "home/h", "%"));

    let first = device.measurements().to_vec();
    for _ in 0..3 {
        assert_eq!(device.name(), "feather1");
        assert_eq!(device.platform(), "adafruit_feather_m0");
        assert_eq!(device.measurements(), first.as_slice());
    }
}
