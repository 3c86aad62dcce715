use anyhow::Result;
use rusqlite::Connection;

use crate::models::MessageRow;
use crate::{Database, OptionalExt};

impl Database {
    pub fn all_messages(&self) -> Result<Vec<MessageRow>> {
        self.with_conn(find_all)
    }

    pub fn messages_posted_by(&self, account_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| find_all_by_posted_by(conn, account_id))
    }

    pub fn find_message(&self, message_id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| find_by_id(conn, message_id))
    }

    pub fn insert_message(
        &self,
        posted_by: i64,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<MessageRow> {
        self.with_conn_mut(|conn| insert(conn, posted_by, message_text, time_posted_epoch))
    }
}

pub fn find_all(conn: &Connection) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM message ORDER BY message_id",
        MessageRow::COLUMNS
    ))?;

    let rows = stmt
        .query_map([], MessageRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

pub fn find_all_by_posted_by(conn: &Connection, account_id: i64) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM message WHERE posted_by = ?1 ORDER BY message_id",
        MessageRow::COLUMNS
    ))?;

    let rows = stmt
        .query_map([account_id], MessageRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

pub fn find_by_id(conn: &Connection, message_id: i64) -> Result<Option<MessageRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM message WHERE message_id = ?1",
        MessageRow::COLUMNS
    ))?;

    stmt.query_row([message_id], MessageRow::from_row).optional()
}

pub fn insert(
    conn: &Connection,
    posted_by: i64,
    message_text: &str,
    time_posted_epoch: i64,
) -> Result<MessageRow> {
    let row = conn.query_row(
        &format!(
            "INSERT INTO message (posted_by, message_text, time_posted_epoch)
             VALUES (?1, ?2, ?3) RETURNING {}",
            MessageRow::COLUMNS
        ),
        rusqlite::params![posted_by, message_text, time_posted_epoch],
        MessageRow::from_row,
    )?;

    Ok(row)
}

/// Deleting an id that does not exist is not an error.
pub fn delete(conn: &Connection, message_id: i64) -> Result<()> {
    conn.execute("DELETE FROM message WHERE message_id = ?1", [message_id])?;
    Ok(())
}

/// Returns true iff a row was modified.
pub fn update_text(conn: &Connection, message_id: i64, message_text: &str) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE message SET message_text = ?1 WHERE message_id = ?2",
        rusqlite::params![message_text, message_id],
    )?;

    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts;

    fn db_with_accounts() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let alice = db
            .with_conn_mut(|conn| accounts::insert(conn, "alice", "pass1234"))
            .unwrap();
        let bob = db
            .with_conn_mut(|conn| accounts::insert(conn, "bob", "pass1234"))
            .unwrap();
        (db, alice.account_id, bob.account_id)
    }

    #[test]
    fn empty_table_lists_nothing() {
        let (db, alice, _) = db_with_accounts();

        assert!(db.all_messages().unwrap().is_empty());
        assert!(db.messages_posted_by(alice).unwrap().is_empty());
    }

    #[test]
    fn listing_by_author_filters_rows() {
        let (db, alice, bob) = db_with_accounts();
        db.insert_message(alice, "one", 1).unwrap();
        db.insert_message(bob, "two", 2).unwrap();
        db.insert_message(alice, "three", 3).unwrap();

        let texts: Vec<String> = db
            .messages_posted_by(alice)
            .unwrap()
            .into_iter()
            .map(|m| m.message_text)
            .collect();
        assert_eq!(texts, vec!["one", "three"]);
        assert_eq!(db.all_messages().unwrap().len(), 3);
    }

    #[test]
    fn insert_requires_existing_author() {
        let (db, _, _) = db_with_accounts();
        assert!(db.insert_message(9999, "orphan", 1).is_err());
    }

    #[test]
    fn delete_is_a_no_op_for_missing_rows() {
        let (db, alice, _) = db_with_accounts();
        let message = db.insert_message(alice, "bye", 5).unwrap();

        db.with_conn_mut(|conn| delete(conn, message.message_id)).unwrap();
        db.with_conn_mut(|conn| delete(conn, message.message_id)).unwrap();

        assert!(db.find_message(message.message_id).unwrap().is_none());
    }

    #[test]
    fn update_text_reports_whether_a_row_changed() {
        let (db, alice, _) = db_with_accounts();
        let message = db.insert_message(alice, "draft", 5).unwrap();

        let updated = db
            .with_conn_mut(|conn| update_text(conn, message.message_id, "final"))
            .unwrap();
        assert!(updated);
        assert_eq!(
            db.find_message(message.message_id).unwrap().map(|m| m.message_text),
            Some("final".to_string())
        );

        let missing = db.with_conn_mut(|conn| update_text(conn, 9999, "nope")).unwrap();
        assert!(!missing);
    }
}
