//! Single-connection stand-in for an MQTT broker, for tests.
//!
//! Accepts one client, answers its CONNECT with a successful CONNACK and
//! records every byte the client sends afterwards until the socket closes.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// MQTT 3.1.1 CONNACK: session not present, connection accepted.
const CONNACK: [u8; 4] = [0x20, 0x02, 0x00, 0x00];

/// Fixed header of an MQTT DISCONNECT packet.
pub const DISCONNECT: [u8; 2] = [0xE0, 0x00];

/// Bind on an ephemeral port and return it with a handle yielding the
/// bytes received after the CONNECT packet.
pub async fn start() -> (u16, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // rumqttc holds queued requests until the CONNACK arrives
        let mut connect = [0u8; 256];
        let n = socket.read(&mut connect).await.unwrap();
        assert!(n > 0 && connect[0] == 0x10, "expected CONNECT packet");
        socket.write_all(&CONNACK).await.unwrap();

        let mut received = Vec::new();
        let _ = socket.read_to_end(&mut received).await;
        received
    });

    (port, handle)
}

/// Whether `needle` occurs anywhere in `haystack`.
pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
