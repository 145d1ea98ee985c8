use chatline_messaging::UserId;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration for the chat client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the chat backend, without a trailing slash.
    pub api_url: String,
    /// Upper bound for any single backend request.
    pub request_timeout: Duration,
    /// Signed-in user, if known at startup.
    pub user_id: Option<UserId>,
    /// Conversation partner to open, if known at startup.
    pub recipient_id: Option<UserId>,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = env::var("CHATLINE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let request_timeout = match env::var("CHATLINE_REQUEST_TIMEOUT_MS") {
            Ok(raw) => {
                let ms: u64 = raw
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid CHATLINE_REQUEST_TIMEOUT_MS {raw:?}: {e}"))?;
                Duration::from_millis(ms)
            }
            Err(_) => DEFAULT_REQUEST_TIMEOUT,
        };
        let user_id = env::var("CHATLINE_USER_ID").ok().map(UserId::new);
        let recipient_id = env::var("CHATLINE_RECIPIENT_ID").ok().map(UserId::new);

        Ok(Self::default()
            .with_api_url(api_url)
            .with_request_timeout(request_timeout)
            .with_identity(user_id, recipient_id))
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_identity(mut self, user_id: Option<UserId>, recipient_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self.recipient_id = recipient_id;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_id: None,
            recipient_id: None,
        }
    }
}
