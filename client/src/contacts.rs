//! Friends list and friend-request inbox of the signed-in user.

use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::gateway::{with_timeout, ContactsGateway, GatewayError};
use chatline_messaging::contacts::{
    AcceptFriendRequest, FriendRequest, RejectFriendRequest, UserProfile,
};
use chatline_messaging::UserId;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactsError {
    #[error("user not authenticated")]
    NotAuthenticated,
    #[error("could not load contacts: {0}")]
    Fetch(GatewayError),
    #[error("could not answer friend request: {0}")]
    Respond(GatewayError),
}

pub type ContactsResult<T> = Result<T, ContactsError>;

pub struct ContactsController {
    user_id: UserId,
    gateway: Arc<dyn ContactsGateway>,
    request_timeout: Duration,
    friends: Mutex<Vec<UserProfile>>,
    requests: Mutex<Vec<FriendRequest>>,
}

impl ContactsController {
    pub fn new(user_id: UserId, gateway: Arc<dyn ContactsGateway>) -> Self {
        Self {
            user_id,
            gateway,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            friends: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn friends(&self) -> Vec<UserProfile> {
        lock(&self.friends).clone()
    }

    pub fn requests(&self) -> Vec<FriendRequest> {
        lock(&self.requests).clone()
    }

    fn signed_in_user(&self) -> ContactsResult<&UserId> {
        if self.user_id.is_blank() {
            return Err(ContactsError::NotAuthenticated);
        }
        Ok(&self.user_id)
    }

    pub async fn load_friends(&self) -> ContactsResult<usize> {
        let user_id = self.signed_in_user()?;
        let friends = with_timeout(self.request_timeout, self.gateway.fetch_friends(user_id))
            .await
            .map_err(|err| {
                warn!(%err, "failed to fetch friends");
                ContactsError::Fetch(err)
            })?;

        let count = friends.len();
        *lock(&self.friends) = friends;
        debug!(count, "friends loaded");
        Ok(count)
    }

    pub async fn load_requests(&self) -> ContactsResult<usize> {
        let user_id = self.signed_in_user()?;
        let requests = with_timeout(self.request_timeout, self.gateway.fetch_friend_requests(user_id))
            .await
            .map_err(|err| {
                warn!(%err, "failed to fetch friend requests");
                ContactsError::Fetch(err)
            })?;

        let count = requests.len();
        *lock(&self.requests) = requests;
        debug!(count, "friend requests loaded");
        Ok(count)
    }

    /// Accepts the request sent by `sender_id` and drops it from the inbox.
    pub async fn accept_request(&self, sender_id: &UserId) -> ContactsResult<()> {
        let body = AcceptFriendRequest {
            sender_id: sender_id.clone(),
            recipient_id: self.signed_in_user()?.clone(),
        };
        with_timeout(self.request_timeout, self.gateway.accept_friend_request(&body))
            .await
            .map_err(|err| {
                warn!(sender = %sender_id, %err, "failed to accept friend request");
                ContactsError::Respond(err)
            })?;

        self.forget_request(sender_id);
        info!(sender = %sender_id, "friend request accepted");
        Ok(())
    }

    pub async fn reject_request(&self, request_id: &UserId) -> ContactsResult<()> {
        let body = RejectFriendRequest {
            request_id: request_id.clone(),
            user_id: self.signed_in_user()?.clone(),
        };
        with_timeout(self.request_timeout, self.gateway.reject_friend_request(&body))
            .await
            .map_err(|err| {
                warn!(request = %request_id, %err, "failed to reject friend request");
                ContactsError::Respond(err)
            })?;

        self.forget_request(request_id);
        info!(request = %request_id, "friend request rejected");
        Ok(())
    }

    fn forget_request(&self, id: &UserId) {
        lock(&self.requests).retain(|request| &request.id != id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayResult;
    use async_trait::async_trait;

    #[derive(Default)]
    struct FakeContacts {
        friends: Vec<UserProfile>,
        requests: Vec<FriendRequest>,
        fail_responses: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContactsGateway for FakeContacts {
        async fn fetch_friends(&self, user_id: &UserId) -> GatewayResult<Vec<UserProfile>> {
            self.calls.lock().unwrap().push(format!("friends {user_id}"));
            Ok(self.friends.clone())
        }

        async fn fetch_friend_requests(&self, user_id: &UserId) -> GatewayResult<Vec<FriendRequest>> {
            self.calls.lock().unwrap().push(format!("requests {user_id}"));
            Ok(self.requests.clone())
        }

        async fn accept_friend_request(&self, request: &AcceptFriendRequest) -> GatewayResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("accept {} -> {}", request.sender_id, request.recipient_id));
            self.respond()
        }

        async fn reject_friend_request(&self, request: &RejectFriendRequest) -> GatewayResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("reject {} by {}", request.request_id, request.user_id));
            self.respond()
        }
    }

    impl FakeContacts {
        fn respond(&self) -> GatewayResult<()> {
            if self.fail_responses {
                Err(GatewayError::Status {
                    status: 500,
                    message: "nope".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn request(id: &str) -> FriendRequest {
        FriendRequest {
            id: UserId::from(id),
            name: id.to_uppercase(),
            email: format!("{id}@example.com"),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_blank_user_is_not_authenticated() {
        let gateway = Arc::new(FakeContacts::default());
        let contacts = ContactsController::new(UserId::from(""), gateway.clone());

        assert_eq!(contacts.load_friends().await, Err(ContactsError::NotAuthenticated));
        assert_eq!(
            contacts.accept_request(&UserId::from("carol")).await,
            Err(ContactsError::NotAuthenticated)
        );
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accept_and_reject_remove_requests() {
        let gateway = Arc::new(FakeContacts {
            requests: vec![request("carol"), request("dave"), request("erin")],
            ..Default::default()
        });
        let contacts = ContactsController::new(UserId::from("alice"), gateway.clone());

        assert_eq!(contacts.load_requests().await.unwrap(), 3);
        contacts.accept_request(&UserId::from("carol")).await.unwrap();
        contacts.reject_request(&UserId::from("erin")).await.unwrap();

        let remaining: Vec<UserId> = contacts.requests().into_iter().map(|r| r.id).collect();
        assert_eq!(remaining, vec![UserId::from("dave")]);
        assert_eq!(
            *gateway.calls.lock().unwrap(),
            vec![
                "requests alice",
                "accept carol -> alice",
                "reject erin by alice"
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_response_keeps_request() {
        let gateway = Arc::new(FakeContacts {
            requests: vec![request("carol")],
            fail_responses: true,
            ..Default::default()
        });
        let contacts = ContactsController::new(UserId::from("alice"), gateway);

        contacts.load_requests().await.unwrap();
        let err = contacts.accept_request(&UserId::from("carol")).await.unwrap_err();

        assert!(matches!(err, ContactsError::Respond(_)));
        assert_eq!(contacts.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_load_friends() {
        let gateway = Arc::new(FakeContacts {
            friends: vec![UserProfile {
                id: UserId::from("bob"),
                name: "Bob".into(),
                email: None,
                image: None,
                last_seen: None,
            }],
            ..Default::default()
        });
        let contacts = ContactsController::new(UserId::from("alice"), gateway);

        assert_eq!(contacts.load_friends().await.unwrap(), 1);
        assert_eq!(contacts.friends()[0].display_name(), "Bob");
    }
}
