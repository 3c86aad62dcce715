//! Database row types. These map directly to SQLite rows and are kept
//! separate from the social-types wire models.

use rusqlite::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    pub account_id: i64,
    pub username: String,
    pub password: String,
}

impl AccountRow {
    pub(crate) const COLUMNS: &'static str = "account_id, username, password";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            account_id: row.get(0)?,
            username: row.get(1)?,
            password: row.get(2)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub message_id: i64,
    pub posted_by: i64,
    pub message_text: String,
    pub time_posted_epoch: i64,
}

impl MessageRow {
    pub(crate) const COLUMNS: &'static str =
        "message_id, posted_by, message_text, time_posted_epoch";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            message_id: row.get(0)?,
            posted_by: row.get(1)?,
            message_text: row.get(2)?,
            time_posted_epoch: row.get(3)?,
        })
    }
}
