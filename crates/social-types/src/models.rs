use serde::{Deserialize, Serialize};

/// A registered user. The password travels in plain text; the API
/// echoes it back exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: i64,
    pub username: String,
    pub password: String,
}

/// A short text post owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub posted_by: i64,
    pub message_text: String,
    /// Supplied by the client; the unit is not checked.
    pub time_posted_epoch: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_uses_snake_case_wire_names() {
        let message = Message {
            message_id: 7,
            posted_by: 1,
            message_text: "hello".into(),
            time_posted_epoch: 1669947792,
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "message_id": 7,
                "posted_by": 1,
                "message_text": "hello",
                "time_posted_epoch": 1669947792
            })
        );
    }
}
