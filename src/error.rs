use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum DiscoveryError {
    #[error("MQTT client request failed: {0}")]
    MqttClient(#[from] rumqttc::ClientError),

    #[error("MQTT connection failed: {0}")]
    MqttConnection(String),

    #[error("MQTT connection timed out after {0} seconds")]
    ConnectionTimeout(u64),

    #[error("Invalid device file: {0}")]
    InvalidDeviceFile(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
