use serde::Deserialize;

// Request bodies ignore unknown fields: clients commonly send a whole
// Account or Message object back, ids included.

// -- Accounts --

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub posted_by: i64,
    pub message_text: String,
    /// Stored as 0 when omitted.
    #[serde(default)]
    pub time_posted_epoch: i64,
}

/// PATCH body. Only `message_text` is read.
#[derive(Debug, Deserialize)]
pub struct UpdateMessageRequest {
    pub message_text: String,
}
