//! Login and registration.

use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::gateway::{with_timeout, AccountGateway, GatewayError};
use chatline_messaging::account::{AuthToken, Credentials, Registration};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Invalid(String),
    #[error("email already exists")]
    EmailTaken,
    #[error("no token received from server")]
    MissingToken,
    #[error("request failed: {0}")]
    Gateway(GatewayError),
}

pub type AccountResult<T> = Result<T, AccountError>;

pub struct AccountService {
    gateway: Arc<dyn AccountGateway>,
    request_timeout: Duration,
}

impl AccountService {
    pub fn new(gateway: Arc<dyn AccountGateway>) -> Self {
        Self {
            gateway,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub async fn login(&self, credentials: &Credentials) -> AccountResult<AuthToken> {
        credentials
            .validate()
            .map_err(|e| AccountError::Invalid(e.to_string()))?;

        let response = with_timeout(self.request_timeout, self.gateway.login(credentials))
            .await
            .map_err(|err| {
                warn!(email = %credentials.email, %err, "login failed");
                AccountError::Gateway(err)
            })?;

        let token = response
            .token
            .filter(|token| !token.is_empty())
            .ok_or(AccountError::MissingToken)?;
        info!(email = %credentials.email, "logged in");
        Ok(AuthToken::new(token))
    }

    pub async fn register(&self, registration: &Registration) -> AccountResult<()> {
        registration
            .validate()
            .map_err(|e| AccountError::Invalid(e.to_string()))?;

        with_timeout(self.request_timeout, self.gateway.register(registration))
            .await
            .map_err(|err| {
                warn!(email = %registration.email, %err, "registration failed");
                match err.status() {
                    Some(409) => AccountError::EmailTaken,
                    _ => AccountError::Gateway(err),
                }
            })?;

        info!(email = %registration.email, "account registered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayResult;
    use async_trait::async_trait;
    use chatline_messaging::account::LoginResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeAccounts {
        token: Option<String>,
        register_status: Option<u16>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AccountGateway for FakeAccounts {
        async fn login(&self, _credentials: &Credentials) -> GatewayResult<LoginResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LoginResponse {
                token: self.token.clone(),
            })
        }

        async fn register(&self, _registration: &Registration) -> GatewayResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.register_status {
                Some(status) => Err(GatewayError::Status {
                    status,
                    message: "rejected".into(),
                }),
                None => Ok(()),
            }
        }
    }

    fn service(token: Option<&str>, register_status: Option<u16>) -> (AccountService, Arc<FakeAccounts>) {
        let gateway = Arc::new(FakeAccounts {
            token: token.map(str::to_string),
            register_status,
            calls: AtomicUsize::new(0),
        });
        (AccountService::new(gateway.clone()), gateway)
    }

    fn registration(password: &str) -> Registration {
        Registration {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: password.into(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let (service, _) = service(Some("jwt"), None);
        let credentials = Credentials::new("alice@example.com", "pw").unwrap();
        assert_eq!(service.login(&credentials).await.unwrap().as_str(), "jwt");
    }

    #[tokio::test]
    async fn test_login_without_token_fails() {
        let (service, _) = service(None, None);
        let credentials = Credentials::new("alice@example.com", "pw").unwrap();
        assert_eq!(service.login(&credentials).await.unwrap_err(), AccountError::MissingToken);
    }

    #[tokio::test]
    async fn test_invalid_registration_skips_network() {
        let (service, gateway) = service(None, None);
        let err = service.register(&registration("short")).await.unwrap_err();
        assert!(matches!(err, AccountError::Invalid(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_conflict_maps_to_email_taken() {
        let (service, _) = service(None, Some(409));
        let err = service.register(&registration("long enough")).await.unwrap_err();
        assert_eq!(err, AccountError::EmailTaken);
    }
}
