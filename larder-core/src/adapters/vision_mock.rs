//! Mock vision backends for testing
//!
//! Two pieces live here:
//! - `MockVision`: a deterministic in-process VisionProvider, used by the
//!   CLI's --mock flag and by service tests.
//! - `MockVisionServer`: a tiny HTTP server that speaks the chat completions
//!   protocol, for exercising the real OpenAiVision client end to end.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::domain::RecognizedItem;
use crate::ports::{VisionProvider, VisionResult};

/// Deterministic in-process vision provider
///
/// Ignores the image content and returns a fixed ingredient list, so CLI
/// demos and tests never need network access or an API key.
pub struct MockVision {
    items: Vec<RecognizedItem>,
}

impl MockVision {
    pub fn new() -> Self {
        Self {
            items: vec![
                RecognizedItem {
                    name: "tomato".to_string(),
                    quantity: Some(3.0),
                    confidence: Some(0.94),
                },
                RecognizedItem {
                    name: "egg".to_string(),
                    quantity: Some(6.0),
                    confidence: Some(0.91),
                },
                RecognizedItem {
                    name: "onion".to_string(),
                    quantity: Some(2.0),
                    confidence: Some(0.88),
                },
                RecognizedItem {
                    name: "cheese".to_string(),
                    quantity: None,
                    confidence: Some(0.72),
                },
            ],
        }
    }

    pub fn with_items(items: Vec<RecognizedItem>) -> Self {
        Self { items }
    }
}

impl Default for MockVision {
    fn default() -> Self {
        Self::new()
    }
}

impl VisionProvider for MockVision {
    fn name(&self) -> &str {
        "mock"
    }

    fn recognize(&self, _image_bytes: &[u8], _mime_type: &str) -> VisionResult<Vec<RecognizedItem>> {
        Ok(self.items.clone())
    }
}

/// Configuration for the mock HTTP server
#[derive(Debug, Clone)]
pub struct MockServerConfig {
    /// JSON the "model" puts in the message content
    pub content: String,
    /// Respond with this HTTP status instead of 200
    pub status: u16,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            content: r#"{"ingredients": [{"name": "tomato", "quantity": 2, "confidence": 0.9}]}"#
                .to_string(),
            status: 200,
            delay_ms: 0,
        }
    }
}

/// Mock chat completions server for testing
pub struct MockVisionServer {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockVisionServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockServerConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        // Non-blocking accept loop for graceful shutdown
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &cfg);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockVisionServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, config: &MockServerConfig) {
    let mut buffer = [0; 65536];

    if let Ok(n) = stream.read(&mut buffer) {
        let request = String::from_utf8_lossy(&buffer[..n]);

        if config.delay_ms > 0 {
            thread::sleep(std::time::Duration::from_millis(config.delay_ms));
        }

        let first_line = request.lines().next().unwrap_or("");
        if !first_line.starts_with("POST /chat/completions") {
            send_response(&mut stream, 404, "Not Found", r#"{"error": "not found"}"#);
            return;
        }

        if config.status != 200 {
            send_response(
                &mut stream,
                config.status,
                "Error",
                r#"{"error": {"message": "mock failure"}}"#,
            );
            return;
        }

        let body = serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": config.content }
            }]
        });
        send_response(&mut stream, 200, "OK", &body.to_string());
    }
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::OpenAiVision;
    use crate::config::VisionSettings;
    use crate::ports::VisionError;

    fn settings_for(server: &MockVisionServer) -> VisionSettings {
        VisionSettings {
            model: "gpt-4.1-mini".to_string(),
            timeout_seconds: 5,
            base_url: Some(server.base_url()),
        }
    }

    #[test]
    fn test_mock_provider_is_deterministic() {
        let mock = MockVision::new();
        let a = mock.recognize(b"img", "image/jpeg").unwrap();
        let b = mock.recognize(b"other", "image/png").unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].name, "tomato");
    }

    #[test]
    fn test_client_against_mock_server() {
        let server = MockVisionServer::start(MockServerConfig::default()).unwrap();
        let client = OpenAiVision::new("test-key", &settings_for(&server)).unwrap();

        let items = client.recognize(b"fake image bytes", "image/jpeg").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "tomato");
        assert_eq!(items[0].quantity, Some(2.0));
    }

    #[test]
    fn test_client_maps_http_error() {
        let server = MockVisionServer::start(MockServerConfig {
            status: 500,
            ..Default::default()
        })
        .unwrap();
        let client = OpenAiVision::new("test-key", &settings_for(&server)).unwrap();

        let result = client.recognize(b"img", "image/jpeg");
        assert!(matches!(result, Err(VisionError::Api(_))));
    }

    #[test]
    fn test_client_maps_timeout() {
        let server = MockVisionServer::start(MockServerConfig {
            delay_ms: 2_500,
            ..Default::default()
        })
        .unwrap();
        let settings = VisionSettings {
            timeout_seconds: 1,
            ..settings_for(&server)
        };
        let client = OpenAiVision::new("test-key", &settings).unwrap();

        let result = client.recognize(b"img", "image/jpeg");
        assert!(matches!(result, Err(VisionError::Timeout(_))));
    }

    #[test]
    fn test_client_rejects_prose_content() {
        let server = MockVisionServer::start(MockServerConfig {
            content: "I can see tomatoes and eggs in the photo.".to_string(),
            ..Default::default()
        })
        .unwrap();
        let client = OpenAiVision::new("test-key", &settings_for(&server)).unwrap();

        let result = client.recognize(b"img", "image/jpeg");
        assert!(matches!(result, Err(VisionError::NonJsonResponse(_))));
    }
}
