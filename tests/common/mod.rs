//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use qrmenu_edge::config::EdgeConfig;
use qrmenu_edge::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock upstream that answers every request with
/// `<request-target>\n<x-forwarded-host>`.
pub async fn start_echo_upstream(addr: SocketAddr) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            buf.extend_from_slice(&chunk[..n]);
                            if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }

                let head = String::from_utf8_lossy(&buf);
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("")
                    .to_string();
                let forwarded_host = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("x-forwarded-host")
                            .then(|| value.trim().to_string())
                    })
                    .unwrap_or_default();

                let body = format!("{}\n{}", target, forwarded_host);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
}

/// Start the edge in front of `upstream`. Returns the shutdown handle.
pub async fn start_edge(addr: SocketAddr, upstream: SocketAddr, base_url: &str) -> Shutdown {
    let mut config = EdgeConfig::default();
    config.listener.bind_address = addr.to_string();
    config.upstream.address = upstream.to_string();
    config.tenancy.base_url = base_url.to_string();
    config.observability.metrics_enabled = false;

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind(addr).await.unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    shutdown
}

/// GET `path_and_query` on the edge with an explicit `Host` header.
/// Returns (status, forwarded target, forwarded host).
pub async fn get_via_edge(
    edge: SocketAddr,
    host: &str,
    path_and_query: &str,
) -> (u16, String, String) {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    let res = client
        .get(format!("http://{}{}", edge, path_and_query))
        .header("Host", host)
        .send()
        .await
        .expect("Edge unreachable");

    let status = res.status().as_u16();
    let body = res.text().await.unwrap();
    let (target, forwarded_host) = body.split_once('\n').unwrap_or((body.as_str(), ""));
    (status, target.to_string(), forwarded_host.to_string())
}
