use std::net::IpAddr;

pub const DEFAULT_EMAIL_KEY: &str = "電子郵件";
pub const DEFAULT_SUBJECT: &str = "感謝您的提交！";
pub const DEFAULT_BODY: &str = "您好，\n\n感謝您提交表單。我們已收到您的回應。\n\n祝好，\n團隊";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub cors_origins: String,
    pub log_level: String,
    pub notifier: NotifierConfig,
    pub smtp: SmtpConfig,
}

/// What the confirmation email looks like and where the address comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifierConfig {
    /// Exact question title of the field collecting the respondent's email.
    pub email_key: String,
    pub subject: String,
    pub body: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            email_key: DEFAULT_EMAIL_KEY.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
    pub tls: TlsMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TlsMode {
    StartTls,
    Tls,
    None,
}

impl TlsMode {
    fn parse(s: &str) -> Result<Self, String> {
        match s {
            "starttls" => Ok(TlsMode::StartTls),
            "tls" => Ok(TlsMode::Tls),
            "none" => Ok(TlsMode::None),
            other => Err(format!(
                "Invalid FORMNOTIFIER_SMTP_TLS '{other}' (expected starttls, tls or none)"
            )),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("FORMNOTIFIER_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMNOTIFIER_HOST: {e}"))?;

        let port: u16 = env_or("FORMNOTIFIER_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FORMNOTIFIER_PORT: {e}"))?;

        let max_body_size: usize = env_or("FORMNOTIFIER_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid FORMNOTIFIER_MAX_BODY_SIZE: {e}"))?;

        let cors_origins = env_or("FORMNOTIFIER_CORS_ORIGINS", "*");
        let log_level = env_or("FORMNOTIFIER_LOG_LEVEL", "info");

        let email_key = env_or("FORMNOTIFIER_EMAIL_KEY", DEFAULT_EMAIL_KEY);
        if email_key.is_empty() {
            return Err("FORMNOTIFIER_EMAIL_KEY must not be empty".to_string());
        }

        let notifier = NotifierConfig {
            email_key,
            subject: env_or("FORMNOTIFIER_SUBJECT", DEFAULT_SUBJECT),
            body: unescape_newlines(&env_or("FORMNOTIFIER_BODY", DEFAULT_BODY)),
        };

        let smtp = SmtpConfig {
            host: env_required("FORMNOTIFIER_SMTP_HOST")?,
            port: env_or("FORMNOTIFIER_SMTP_PORT", "587")
                .parse()
                .map_err(|e| format!("Invalid FORMNOTIFIER_SMTP_PORT: {e}"))?,
            user: env_required("FORMNOTIFIER_SMTP_USER")?,
            pass: env_required("FORMNOTIFIER_SMTP_PASS")?,
            from: env_required("FORMNOTIFIER_SMTP_FROM")?,
            tls: TlsMode::parse(&env_or("FORMNOTIFIER_SMTP_TLS", "starttls"))?,
        };

        Ok(Config {
            host,
            port,
            max_body_size,
            cors_origins,
            log_level,
            notifier,
            smtp,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

// .env files can't hold real newlines on one line, so accept literal `\n`.
fn unescape_newlines(s: &str) -> String {
    s.replace("\\n", "\n")
}
