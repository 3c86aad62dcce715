use thiserror::Error;

use social_db::Database;
use social_db::messages;
use social_db::models::MessageRow;
use social_types::api::PostMessageRequest;
use social_types::models::Message;

use super::trim_space;

/// Longest text accepted when posting, measured after trimming.
pub const MAX_POST_LEN: usize = 255;

/// Longest text accepted by an edit, measured untrimmed. One below
/// `MAX_POST_LEN`.
pub const MAX_UPDATE_LEN: usize = 254;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message text is blank")]
    BlankText,

    #[error("message text exceeds {max} characters")]
    TextTooLong { max: usize },

    #[error("message {0} does not exist")]
    NotFound(i64),

    #[error("account {0} does not exist")]
    UnknownAuthor(i64),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub struct MessageService<'a> {
    db: &'a Database,
}

impl<'a> MessageService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The caller must already have checked that `posted_by` exists.
    pub fn post(&self, req: &PostMessageRequest) -> Result<Message, MessageError> {
        let trimmed = trim_space(&req.message_text);
        if trimmed.is_empty() {
            return Err(MessageError::BlankText);
        }
        if trimmed.chars().count() > MAX_POST_LEN {
            return Err(MessageError::TextTooLong { max: MAX_POST_LEN });
        }

        let row = self
            .db
            .insert_message(req.posted_by, &req.message_text, req.time_posted_epoch)?;
        Ok(to_message(row))
    }

    pub fn get(&self, message_id: i64) -> anyhow::Result<Option<Message>> {
        Ok(self.db.find_message(message_id)?.map(to_message))
    }

    pub fn list_all(&self) -> anyhow::Result<Vec<Message>> {
        Ok(self.db.all_messages()?.into_iter().map(to_message).collect())
    }

    pub fn list_by_account(&self, account_id: i64) -> anyhow::Result<Vec<Message>> {
        Ok(self
            .db
            .messages_posted_by(account_id)?
            .into_iter()
            .map(to_message)
            .collect())
    }

    /// Returns the row as it was before deletion, or `None` if there was
    /// nothing to delete.
    pub fn delete(&self, message_id: i64) -> anyhow::Result<Option<Message>> {
        let deleted = self.db.transaction(|tx| {
            let existing = messages::find_by_id(tx, message_id)?;
            if existing.is_some() {
                messages::delete(tx, message_id)?;
            }
            Ok(existing)
        })?;

        Ok(deleted.map(to_message))
    }

    /// Replaces the text and returns the row as it is after the update.
    pub fn update(&self, message_id: i64, message_text: &str) -> Result<Message, MessageError> {
        if trim_space(message_text).is_empty() {
            return Err(MessageError::BlankText);
        }
        if message_text.chars().count() > MAX_UPDATE_LEN {
            return Err(MessageError::TextTooLong {
                max: MAX_UPDATE_LEN,
            });
        }

        let updated = self.db.transaction(|tx| {
            if !messages::update_text(tx, message_id, message_text)? {
                return Ok(None);
            }
            messages::find_by_id(tx, message_id)
        })?;

        updated
            .map(to_message)
            .ok_or(MessageError::NotFound(message_id))
    }
}

fn to_message(row: MessageRow) -> Message {
    Message {
        message_id: row.message_id,
        posted_by: row.posted_by,
        message_text: row.message_text,
        time_posted_epoch: row.time_posted_epoch,
    }
}
