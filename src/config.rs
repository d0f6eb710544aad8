use std::fmt;
use std::time::Duration;

use anyhow::Context;
use time::{macros::format_description, UtcOffset};

#[derive(Clone)]
pub struct InferenceConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub inference: InferenceConfig,
    /// Upper bound on one whole estimation, retries included.
    pub estimation_deadline: Duration,
    /// Bearer token the chat bridge must present. `None` leaves the API open.
    pub transport_token: Option<String>,
    /// Offset that defines the user's local calendar day.
    pub local_offset: UtcOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://foodlog.db?mode=rwc".into());
        let inference = InferenceConfig {
            api_key: std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?,
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".into()),
            timeout_secs: env_parse("INFERENCE_TIMEOUT_SECS").unwrap_or(60),
            max_retries: env_parse("INFERENCE_MAX_RETRIES").unwrap_or(2),
        };
        let estimation_deadline =
            Duration::from_secs(env_parse("ESTIMATION_DEADLINE_SECS").unwrap_or(90));
        let transport_token = std::env::var("TRANSPORT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let local_offset = match std::env::var("LOCAL_UTC_OFFSET") {
            Ok(raw) => parse_offset(&raw)?,
            // Fails on multi-threaded unix processes; UTC is the fallback there.
            Err(_) => UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        };

        Ok(Self {
            database_url,
            inference,
            estimation_deadline,
            transport_token,
            local_offset,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

/// Parses `+HH:MM` / `-HH:MM`.
pub fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    UtcOffset::parse(
        raw.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .with_context(|| format!("invalid LOCAL_UTC_OFFSET {raw:?}, expected +HH:MM"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_offsets() {
        assert_eq!(parse_offset("+03:00").unwrap(), UtcOffset::from_hms(3, 0, 0).unwrap());
        assert_eq!(parse_offset("-05:30").unwrap(), UtcOffset::from_hms(-5, -30, 0).unwrap());
        assert_eq!(parse_offset(" +00:00 ").unwrap(), UtcOffset::UTC);
    }

    #[test]
    fn rejects_offset_without_sign() {
        assert!(parse_offset("03:00").is_err());
        assert!(parse_offset("Europe/Berlin").is_err());
    }
}
