//! Dify Completion Client
//! Blocking POST to the completion endpoint, run off the UI thread.

use crate::dify::request::{CompletionBody, GenerationKind, GenerationRequest};
use serde::Deserialize;
use std::sync::mpsc::Sender;
use std::thread;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.dify.ai/v1/completion-messages";
pub const DEFAULT_USER: &str = "user-1";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DifyError {
    #[error("Error {code}: {message}")]
    Status { code: u16, message: String },
    #[error("{0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result of one dispatched request, delivered back to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub kind: GenerationKind,
    pub result: Result<String, DifyError>,
}

#[derive(Deserialize)]
struct AnswerBody {
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Deserialize)]
struct FailureBody {
    #[serde(default)]
    message: Option<String>,
}

/// Map a response that already has a status line into an answer or error.
pub fn interpret_response(status: u16, status_text: &str, body: &str) -> Result<String, DifyError> {
    if (200..300).contains(&status) {
        let parsed: AnswerBody = serde_json::from_str(body)
            .map_err(|e| DifyError::InvalidResponse(e.to_string()))?;
        return Ok(parsed.answer.unwrap_or_default());
    }

    let server_message = serde_json::from_str::<FailureBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty());
    let message = server_message
        .or_else(|| Some(status_text.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| canonical_reason(status).to_string());

    Err(DifyError::Status {
        code: status,
        message,
    })
}

fn canonical_reason(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        413 => "Payload Too Large",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown Status",
    }
}

/// Client for one completion endpoint.
#[derive(Clone)]
pub struct DifyClient {
    agent: ureq::Agent,
    endpoint: String,
    user: String,
}

impl DifyClient {
    pub fn new(endpoint: &str, user: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            endpoint: endpoint.to_string(),
            user: user.to_string(),
        }
    }

    /// Send one blocking completion request and return the `answer` text.
    pub fn complete(&self, api_key: &str, request: &GenerationRequest) -> Result<String, DifyError> {
        let body = CompletionBody::blocking(request, &self.user)
            .map_err(|e| DifyError::InvalidResponse(e.to_string()))?;
        let payload =
            serde_json::to_string(&body).map_err(|e| DifyError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            endpoint = %self.endpoint,
            kind = %request.kind(),
            has_key = !api_key.is_empty(),
            "sending completion request"
        );

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", api_key))
            .set("Content-Type", "application/json")
            .send_string(&payload);

        let (status, status_text, text) = match response {
            Ok(resp) => {
                let status = resp.status();
                let status_text = resp.status_text().to_string();
                let text = resp
                    .into_string()
                    .map_err(|e| DifyError::Transport(e.to_string()))?;
                (status, status_text, text)
            }
            Err(ureq::Error::Status(code, resp)) => {
                let status_text = resp.status_text().to_string();
                let text = resp.into_string().unwrap_or_default();
                (code, status_text, text)
            }
            Err(err) => {
                tracing::warn!(kind = %request.kind(), error = %err, "completion request failed");
                return Err(DifyError::Transport(err.to_string()));
            }
        };

        tracing::info!(kind = %request.kind(), status, "completion response received");
        let result = interpret_response(status, &status_text, &text);
        if let Err(e) = &result {
            tracing::warn!(kind = %request.kind(), error = %e, "completion request rejected");
        }
        result
    }

    /// Fire-and-forget: run the request on its own thread and report back on `tx`.
    pub fn dispatch(
        &self,
        api_key: String,
        request: GenerationRequest,
        tx: Sender<GenerationOutcome>,
    ) -> thread::JoinHandle<()> {
        let client = self.clone();
        thread::spawn(move || {
            let result = client.complete(&api_key, &request);
            let _ = tx.send(GenerationOutcome {
                kind: request.kind(),
                result,
            });
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dify::request::{ComicStripInputs, StoryAdaptationInputs};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc::{channel, Receiver};

    /// Serve exactly one HTTP response, returning the raw request text.
    fn one_shot_server(status_line: &str, body: &str) -> (String, Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/v1/completion-messages", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let (tx, rx) = channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());
        });

        (url, rx)
    }

    fn story_request() -> GenerationRequest {
        GenerationRequest::StoryAdaptation(StoryAdaptationInputs {
            original: "元ネタ".into(),
            ..Default::default()
        })
    }

    #[test]
    fn success_returns_answer() {
        assert_eq!(
            interpret_response(200, "OK", r#"{"answer":"result text","id":"x"}"#),
            Ok("result text".to_string())
        );
    }

    #[test]
    fn success_without_answer_is_empty() {
        assert_eq!(interpret_response(200, "OK", "{}"), Ok(String::new()));
    }

    #[test]
    fn success_with_unreadable_body_is_an_error() {
        assert_matches!(
            interpret_response(200, "OK", "<html>"),
            Err(DifyError::InvalidResponse(_))
        );
    }

    #[test]
    fn failure_message_combines_status_and_server_message() {
        let err = interpret_response(400, "Bad Request", r#"{"message":"bad request"}"#)
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("400"), "{text}");
        assert!(text.contains("bad request"), "{text}");
    }

    #[test]
    fn failure_falls_back_to_status_text() {
        assert_eq!(
            interpret_response(503, "Service Unavailable", "oops").unwrap_err(),
            DifyError::Status {
                code: 503,
                message: "Service Unavailable".to_string()
            }
        );
        assert_eq!(
            interpret_response(401, "", r#"{"message":""}"#)
                .unwrap_err()
                .to_string(),
            "Error 401: Unauthorized"
        );
    }

    #[test]
    fn complete_posts_bearer_json_body() {
        let (url, rx) = one_shot_server("200 OK", r#"{"answer":"result text"}"#);
        let client = DifyClient::new(&url, DEFAULT_USER);

        let answer = client.complete("secret-key", &story_request());
        assert_eq!(answer, Ok("result text".to_string()));

        let raw = rx.recv().unwrap();
        let lower = raw.to_ascii_lowercase();
        assert!(raw.starts_with("POST /v1/completion-messages"), "{raw}");
        assert!(lower.contains("authorization: bearer secret-key"), "{raw}");
        assert!(lower.contains("content-type: application/json"), "{raw}");

        let body = &raw[raw.find("\r\n\r\n").unwrap() + 4..];
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["response_mode"], "blocking");
        assert_eq!(body["user"], "user-1");
        assert_eq!(body["inputs"]["original"], "元ネタ");
    }

    #[test]
    fn complete_reports_http_failure() {
        let (url, _rx) = one_shot_server("400 Bad Request", r#"{"message":"bad request"}"#);
        let client = DifyClient::new(&url, DEFAULT_USER);

        let err = client.complete("k", &story_request()).unwrap_err();
        assert_eq!(
            err,
            DifyError::Status {
                code: 400,
                message: "bad request".to_string()
            }
        );
    }

    #[test]
    fn complete_reports_transport_failure() {
        // Bind then drop to get a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = DifyClient::new(&format!("http://127.0.0.1:{port}/"), DEFAULT_USER);
        assert_matches!(
            client.complete("k", &story_request()),
            Err(DifyError::Transport(_))
        );
    }

    #[test]
    fn dispatch_reports_on_channel() {
        let (url, _rx) = one_shot_server("200 OK", r#"{"answer":"[]"}"#);
        let client = DifyClient::new(&url, DEFAULT_USER);
        let (tx, rx) = channel();

        let request = GenerationRequest::ComicStrip(ComicStripInputs {
            scenario: "s".into(),
        });
        client.dispatch("k".into(), request, tx).join().unwrap();

        let outcome = rx.recv().unwrap();
        assert_eq!(outcome.kind, GenerationKind::ComicStrip);
        assert_eq!(outcome.result, Ok("[]".to_string()));
    }
}
