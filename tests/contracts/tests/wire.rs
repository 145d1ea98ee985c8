use chatline_contracts::{
    parse, FRIEND_REQUESTS_RESPONSE, LOGIN_RESPONSE, THREAD_RESPONSE, USER_RESPONSE,
};
use chatline_messaging::account::LoginResponse;
use chatline_messaging::contacts::{FriendRequest, RejectFriendRequest, UserProfile};
use chatline_messaging::{DeleteMessagesRequest, Message, MessageBody, MessageId, MessageKind, UserId};
use chrono::{Datelike, Timelike};
use serde_json::json;

#[test]
fn thread_response_decodes() {
    let messages: Vec<Message> = serde_json::from_str(THREAD_RESPONSE).unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender_id, UserId::from("u-alice"));
    assert_eq!(messages[0].kind(), MessageKind::Text);
    assert_eq!(messages[0].timestamp.minute(), 2);
    assert_eq!(messages[1].sender_id, UserId::from("u-bob"));
    assert_eq!(
        messages[1].body,
        MessageBody::Image {
            url: "/files/1717264950-pizza.jpg".into()
        }
    );
    assert!(messages[0].timestamp < messages[1].timestamp);
}

#[test]
fn user_response_ignores_unknown_fields() {
    let profile: UserProfile = serde_json::from_str(USER_RESPONSE).unwrap();
    assert_eq!(profile.id, UserId::from("u-bob"));
    assert_eq!(profile.image.as_deref(), Some("https://cdn.example.com/avatars/bob.png"));
    assert!(profile.last_seen.is_none());
}

#[test]
fn friend_requests_decode() {
    let requests: Vec<FriendRequest> = serde_json::from_str(FRIEND_REQUESTS_RESPONSE).unwrap();
    assert_eq!(requests[0].name, "Carol");
    assert_eq!(requests[1].image, None);
}

#[test]
fn login_token_is_read() {
    let response: LoginResponse = serde_json::from_str(LOGIN_RESPONSE).unwrap();
    assert!(response.token.unwrap().starts_with("eyJ"));
    assert!(parse(LOGIN_RESPONSE)["token"].is_string());
}

#[test]
fn request_bodies_match_backend() {
    let delete = DeleteMessagesRequest {
        messages: vec![MessageId::from("a"), MessageId::from("b")],
    };
    assert_eq!(serde_json::to_value(&delete).unwrap(), json!({ "messages": ["a", "b"] }));

    let reject = RejectFriendRequest {
        request_id: UserId::from("u-dave"),
        user_id: UserId::from("u-alice"),
    };
    assert_eq!(
        serde_json::to_value(&reject).unwrap(),
        json!({ "requestId": "u-dave", "userId": "u-alice" })
    );
}

#[test]
fn fixtures_are_valid_json() {
    for fixture in [THREAD_RESPONSE, USER_RESPONSE, FRIEND_REQUESTS_RESPONSE, LOGIN_RESPONSE] {
        assert!(!parse(fixture).is_null());
    }
    assert_eq!(parse(THREAD_RESPONSE)[1]["timeStamp"].as_str().map(|s| &s[..4]), Some("2024"));
    let first: Message = serde_json::from_value(parse(THREAD_RESPONSE)[0].clone()).unwrap();
    assert_eq!(first.timestamp.year(), 2024);
}
