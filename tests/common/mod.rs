//! Shared utilities for integration testing.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use cascade::config::ServerConfig;
use cascade::http::Server;

/// Start a server on localhost with the given middleware setup.
pub async fn start_server<F>(port: u16, configure: F)
where
    F: FnOnce(&mut Server),
{
    let mut config = ServerConfig::default();
    config.listener.address = "127.0.0.1".to_string();
    config.listener.port = port;

    let mut server = Server::new(config);
    configure(&mut server);

    tokio::spawn(async move {
        let _ = server.listen().await;
    });

    // Wait for the listener to bind
    tokio::time::sleep(Duration::from_millis(300)).await;
}

/// Send raw bytes and read the full response until the server closes.
pub async fn send_raw(port: u16, payload: &[u8]) -> String {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    stream.write_all(payload).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8_lossy(&buf).into_owned()
}

/// Split a wire response into (status line, header block, body).
#[allow(dead_code)]
pub fn split_response(response: &str) -> (&str, &str, &str) {
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("response has no header terminator");
    let (status_line, headers) = head.split_once("\r\n").unwrap_or((head, ""));
    (status_line, headers, body)
}
