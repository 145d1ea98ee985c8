//! Friends and friend requests.
//!
//! A friend request is addressed to the signed-in user; the request id the
//! backend hands out is the id of the user who sent it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Public profile of a user (thread header, friends list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(rename = "lastSeen", default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Name to show, falling back when the backend has none.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Unknown User"
        } else {
            &self.name
        }
    }
}

/// A pending friend request from another user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequest {
    /// Id of the requesting user
    #[serde(rename = "_id")]
    pub id: UserId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Body of `POST /friend-request/accept`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptFriendRequest {
    #[serde(rename = "senderId")]
    pub sender_id: UserId,
    #[serde(rename = "recepientId")]
    pub recipient_id: UserId,
}

/// Body of `POST /friend-request/reject`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectFriendRequest {
    #[serde(rename = "requestId")]
    pub request_id: UserId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_fallbacks() {
        let profile: UserProfile = serde_json::from_value(json!({ "_id": "u1" })).unwrap();
        assert_eq!(profile.display_name(), "Unknown User");

        let named: UserProfile =
            serde_json::from_value(json!({ "_id": "u2", "name": "zoe", "lastSeen": "2024-05-01T09:00:00Z" }))
                .unwrap();
        assert_eq!(named.display_name(), "zoe");
        assert!(named.last_seen.is_some());
    }

    #[test]
    fn test_accept_body_uses_backend_names() {
        let body = AcceptFriendRequest {
            sender_id: UserId::from("carol"),
            recipient_id: UserId::from("alice"),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({ "senderId": "carol", "recepientId": "alice" }));
    }
}
