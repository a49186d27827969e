//! Minimal HTTP/1.1 server that answers S3-style `HEAD ?partNumber=1` for integration tests.
//!
//! Objects are registered by path (`/bucket/key`). Multipart objects answer with
//! 206, `Content-Range` and `x-amz-mp-parts-count`; single-part objects with a
//! plain 200. Unknown paths get 404. Objects pinned to a region answer signed
//! requests scoped to another region with 301 and `x-amz-bucket-region`.
//! Every request head is recorded.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct FakeObject {
    pub size: u64,
    pub etag: String,
    /// Some(part size) for multipart uploads.
    pub part_size: Option<u64>,
    /// Bucket region; None accepts any signing region.
    pub region: Option<String>,
}

impl FakeObject {
    pub fn single(size: u64, etag: &str) -> Self {
        Self {
            size,
            etag: etag.to_string(),
            part_size: None,
            region: None,
        }
    }

    pub fn multipart(size: u64, part_size: u64, etag: &str) -> Self {
        Self {
            size,
            etag: etag.to_string(),
            part_size: Some(part_size),
            region: None,
        }
    }

    pub fn in_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }
}

/// Region from the SigV4 credential scope (`Credential=AKID/date/REGION/s3/...`).
fn signing_region(request: &str) -> Option<&str> {
    let scope = request.split("Credential=").nth(1)?;
    scope.split('/').nth(2)
}

pub struct FakeS3 {
    pub endpoint: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeS3 {
    /// Raw request heads received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. `status_override` forces every
/// answer to that status (e.g. 403) regardless of the object table.
pub fn start(objects: HashMap<String, FakeObject>, status_override: Option<u16>) -> FakeS3 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let objects = Arc::new(objects);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let objects = Arc::clone(&objects);
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &objects, &seen, status_override));
        }
    });
    FakeS3 {
        endpoint: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    objects: &HashMap<String, FakeObject>,
    seen: &Mutex<Vec<String>>,
    status_override: Option<u16>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s.to_string(),
        Err(_) => return,
    };
    seen.lock().unwrap().push(request.clone());

    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");
    let path = target.split_once('?').map_or(target, |(p, _)| p);

    if !method.eq_ignore_ascii_case("HEAD") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    if let Some(code) = status_override {
        let response = format!("HTTP/1.1 {} Forced\r\nContent-Length: 0\r\n\r\n", code);
        let _ = stream.write_all(response.as_bytes());
        return;
    }
    let Some(obj) = objects.get(path) else {
        let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
        return;
    };

    if let (Some(home), Some(signed)) = (obj.region.as_deref(), signing_region(&request)) {
        if home != signed {
            let response = format!(
                "HTTP/1.1 301 Moved Permanently\r\nx-amz-bucket-region: {}\r\nContent-Length: 0\r\n\r\n",
                home
            );
            let _ = stream.write_all(response.as_bytes());
            return;
        }
    }

    let response = match obj.part_size {
        Some(part_size) => {
            let first = part_size.min(obj.size);
            let parts = obj.size.div_ceil(part_size).max(1);
            format!(
                "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\n\
Content-Range: bytes 0-{}/{}\r\nETag: \"{}\"\r\nx-amz-mp-parts-count: {}\r\n\r\n",
                first,
                first.saturating_sub(1),
                obj.size,
                obj.etag,
                parts
            )
        }
        None => format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nETag: \"{}\"\r\n\r\n",
            obj.size, obj.etag
        ),
    };
    let _ = stream.write_all(response.as_bytes());
}
