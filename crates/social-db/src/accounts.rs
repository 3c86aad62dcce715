use anyhow::Result;
use rusqlite::Connection;

use crate::models::AccountRow;
use crate::{Database, OptionalExt};

impl Database {
    pub fn find_account_by_id(&self, account_id: i64) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| find_by_id(conn, account_id))
    }

    pub fn find_account_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| find_by_username(conn, username))
    }
}

pub fn find_by_id(conn: &Connection, account_id: i64) -> Result<Option<AccountRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM account WHERE account_id = ?1",
        AccountRow::COLUMNS
    ))?;

    stmt.query_row([account_id], AccountRow::from_row).optional()
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<AccountRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM account WHERE username = ?1",
        AccountRow::COLUMNS
    ))?;

    stmt.query_row([username], AccountRow::from_row).optional()
}

/// Insert an account and return it with its generated id. A duplicate
/// username violates the UNIQUE constraint and comes back as an error.
pub fn insert(conn: &Connection, username: &str, password: &str) -> Result<AccountRow> {
    let row = conn.query_row(
        &format!(
            "INSERT INTO account (username, password) VALUES (?1, ?2) RETURNING {}",
            AccountRow::COLUMNS
        ),
        (username, password),
        AccountRow::from_row,
    )?;

    Ok(row)
}
