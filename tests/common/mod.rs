//! Shared mock servers for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// A request as seen on the wire by a mock server.
#[derive(Debug, Clone, Default)]
pub struct CapturedRequest {
    pub request_line: String,
    /// Header names lowercased, in wire order, duplicates kept.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_all(name).into_iter().next()
    }

    pub fn header_all(&self, name: &str) -> Vec<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .filter(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        let name = name.to_ascii_lowercase();
        self.headers.iter().position(|(n, _)| *n == name)
    }

    pub fn path(&self) -> &str {
        self.request_line.split(' ').nth(1).unwrap_or("")
    }
}

pub type Captured = Arc<Mutex<Vec<CapturedRequest>>>;

/// Serialize a complete HTTP/1.1 response with `Connection: close`.
#[allow(dead_code)]
pub fn http_response(status: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        body.len()
    );
    for (name, value) in headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");

    let mut out = head.into_bytes();
    out.extend_from_slice(body);
    out
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut reader = BufReader::new(socket);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await.ok()? == 0 {
        return None;
    }

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.ok()? == 0 {
            return None;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await.ok()?;

    Some(CapturedRequest {
        request_line: request_line.trim_end().to_string(),
        headers,
        body,
    })
}

/// Start a server that records every request and answers with `respond`.
pub async fn start_programmable_origin<F>(respond: F) -> (SocketAddr, Captured)
where
    F: Fn(&CapturedRequest) -> Vec<u8> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let log = captured.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let respond = respond.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request(&mut socket).await {
                            let response = respond(&request);
                            log.lock().unwrap().push(request);
                            let _ = socket.write_all(&response).await;
                            let _ = socket.shutdown().await;
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, captured)
}

/// Start a server that always answers with the same status and body.
#[allow(dead_code)]
pub async fn start_mock_origin(
    status: &'static str,
    body: &'static [u8],
) -> (SocketAddr, Captured) {
    start_programmable_origin(move |_| http_response(status, &[], body)).await
}

/// Start a server that accepts connections and never answers.
///
/// The flag flips once the client side of the connection has gone away.
#[allow(dead_code)]
pub async fn start_silent_origin() -> (SocketAddr, Arc<AtomicBool>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let closed = Arc::new(AtomicBool::new(false));

    let flag = closed.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let flag = flag.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) => continue,
                    }
                }
                flag.store(true, Ordering::SeqCst);
            });
        }
    });

    (addr, closed)
}

/// Start a forward proxy stand-in that demands `expected` in
/// `Proxy-Authorization` and otherwise answers 407.
#[allow(dead_code)]
pub async fn start_auth_proxy(
    expected: &'static str,
    body: &'static [u8],
) -> (SocketAddr, Captured) {
    start_programmable_origin(move |request| match request.header("proxy-authorization") {
        Some(value) if value == expected => http_response("200 OK", &[], body),
        _ => http_response(
            "407 Proxy Authentication Required",
            &[("Proxy-Authenticate", "Basic realm=\"test\"")],
            b"",
        ),
    })
    .await
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Poll `flag` until it is set or `limit` passes.
#[allow(dead_code)]
pub async fn wait_for(flag: &AtomicBool, limit: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if flag.load(Ordering::SeqCst) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    flag.load(Ordering::SeqCst)
}
