//! Payloads captured from the chat backend, used to pin the wire format.

use serde_json::Value;

/// `GET /messages/{userId}/{recipientId}` with a populated sender, a bare
/// sender id, and an image message.
pub const THREAD_RESPONSE: &str = r#"[
  {
    "_id": "665a1f0c9b1e8a0012c0ffee",
    "senderId": { "_id": "u-alice", "name": "Alice" },
    "recepientId": "u-bob",
    "messageType": "text",
    "message": "are we still on for tonight?",
    "imageUrl": null,
    "timeStamp": "2024-06-01T18:02:11.532Z",
    "__v": 0
  },
  {
    "_id": "665a1f0c9b1e8a0012c0fff0",
    "senderId": "u-bob",
    "recepientId": "u-alice",
    "messageType": "image",
    "imageUrl": "/files/1717264950-pizza.jpg",
    "timeStamp": "2024-06-01T18:03:40.004Z",
    "__v": 0
  }
]"#;

/// `GET /user/{id}`
pub const USER_RESPONSE: &str = r#"{
  "_id": "u-bob",
  "name": "Bob",
  "email": "bob@example.com",
  "image": "https://cdn.example.com/avatars/bob.png",
  "friendRequests": [],
  "friends": ["u-alice"],
  "sentFriendRequests": []
}"#;

/// `GET /friend-request/{userId}`
pub const FRIEND_REQUESTS_RESPONSE: &str = r#"[
  { "_id": "u-carol", "name": "Carol", "email": "carol@example.com", "image": "https://cdn.example.com/avatars/carol.png" },
  { "_id": "u-dave", "name": "Dave", "email": "dave@example.com" }
]"#;

/// `POST /login`
pub const LOGIN_RESPONSE: &str = r#"{ "token": "eyJhbGciOiJIUzI1NiJ9.e30.sig" }"#;

pub fn parse(fixture: &str) -> Value {
    serde_json::from_str(fixture).unwrap_or(Value::Null)
}
