use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::subscriber::DefaultGuard;

use formnotifier::config::{Config, NotifierConfig, SmtpConfig, TlsMode};
use formnotifier::email::{MailError, Mailer};
use formnotifier::submission::{FormSubmissionEvent, ItemResponse};

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records every send instead of talking to an SMTP server.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail_with: Option<String>,
}

impl RecordingMailer {
    pub fn failing(message: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if let Some(message) = &self.fail_with {
            return Err(MailError::from(message.as_str()));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Log output captured from the current thread's subscriber.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl LogCapture {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.contains(needle))
            .collect()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Route logs to a buffer until the guard is dropped. Only valid on the
/// current-thread runtime `#[tokio::test]` uses by default.
#[allow(dead_code)]
pub fn capture_logs() -> (LogCapture, DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

/// Build an event from (title, answer) pairs.
#[allow(dead_code)]
pub fn event(items: &[(&str, Value)]) -> FormSubmissionEvent {
    FormSubmissionEvent::new(
        items
            .iter()
            .map(|(title, answer)| ItemResponse::new(*title, answer.clone()))
            .collect(),
    )
}

/// The trigger payload for the given (title, answer) pairs.
#[allow(dead_code)]
pub fn event_json(items: &[(&str, Value)]) -> Value {
    let item_responses: Vec<Value> = items
        .iter()
        .map(|(title, answer)| json!({ "item": { "title": title }, "response": answer }))
        .collect();
    json!({ "response": { "itemResponses": item_responses } })
}

/// A running test server instance.
#[allow(dead_code)]
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub mailer: Arc<RecordingMailer>,
}

#[allow(dead_code)]
impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a JSON event, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/v1/submissions"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit form-urlencoded data, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/v1/submissions"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

#[allow(dead_code)]
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 1_048_576,
        cors_origins: "https://forms.example.com".to_string(),
        log_level: "warn".to_string(),
        notifier: NotifierConfig::default(),
        smtp: SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            user: "user".to_string(),
            pass: "pass".to_string(),
            from: "noreply@example.com".to_string(),
            tls: TlsMode::None,
        },
    }
}

#[allow(dead_code)]
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config(), Arc::new(RecordingMailer::default())).await
}

/// Spawn the app on a random port with the given config and mailer.
#[allow(dead_code)]
pub async fn spawn_app_with(config: Config, mailer: Arc<RecordingMailer>) -> TestApp {
    let app = formnotifier::build_app(config, mailer.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        mailer,
    }
}
