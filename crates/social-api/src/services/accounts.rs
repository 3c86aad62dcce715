use thiserror::Error;

use social_db::Database;
use social_db::accounts;
use social_db::models::AccountRow;
use social_types::api::{LoginRequest, RegisterRequest};
use social_types::models::Account;

use super::trim_space;

/// Minimum password length, counted after trimming whitespace.
pub const MIN_PASSWORD_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("username is blank")]
    BlankUsername,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub struct AccountService<'a> {
    db: &'a Database,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn register(&self, req: &RegisterRequest) -> Result<Account, AccountError> {
        if trim_space(&req.username).is_empty() {
            return Err(AccountError::BlankUsername);
        }
        if trim_space(&req.password).chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }

        // Lookup and insert share one transaction so two registrations
        // racing for the same name cannot both pass the check.
        let created = self.db.transaction(|tx| {
            if accounts::find_by_username(tx, &req.username)?.is_some() {
                return Ok(None);
            }
            accounts::insert(tx, &req.username, &req.password).map(Some)
        })?;

        created
            .map(to_account)
            .ok_or_else(|| AccountError::UsernameTaken(req.username.clone()))
    }

    /// Exact match on the stored password.
    pub fn authenticate(&self, req: &LoginRequest) -> Result<Account, AccountError> {
        let row = self
            .db
            .find_account_by_username(&req.username)?
            .ok_or(AccountError::InvalidCredentials)?;

        if row.password != req.password {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(to_account(row))
    }

    pub fn find(&self, account_id: i64) -> anyhow::Result<Option<Account>> {
        Ok(self.db.find_account_by_id(account_id)?.map(to_account))
    }
}

fn to_account(row: AccountRow) -> Account {
    Account {
        account_id: row.account_id,
        username: row.username,
        password: row.password,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_req(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    fn login_req(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn register_persists_account() {
        let db = Database::open_in_memory().unwrap();
        let service = AccountService::new(&db);

        let account = service.register(&register_req("user1", "password")).unwrap();

        assert_eq!(account.username, "user1");
        assert_eq!(account.password, "password");
        assert_eq!(service.find(account.account_id).unwrap(), Some(account));
    }

    #[test]
    fn register_rejects_blank_username() {
        let db = Database::open_in_memory().unwrap();
        let service = AccountService::new(&db);

        assert!(matches!(
            service.register(&register_req("", "password")),
            Err(AccountError::BlankUsername)
        ));
        assert!(matches!(
            service.register(&register_req(" \t ", "password")),
            Err(AccountError::BlankUsername)
        ));
    }

    #[test]
    fn register_counts_password_after_trimming() {
        let db = Database::open_in_memory().unwrap();
        let service = AccountService::new(&db);

        assert!(matches!(
            service.register(&register_req("user1", "  abc  ")),
            Err(AccountError::PasswordTooShort { min: 4 })
        ));
        assert!(service.register(&register_req("user1", "abcd")).is_ok());
    }

    #[test]
    fn register_treats_no_break_space_as_content() {
        let db = Database::open_in_memory().unwrap();
        let service = AccountService::new(&db);

        let account = service.register(&register_req("\u{00A0}", "password")).unwrap();
        assert_eq!(account.username, "\u{00A0}");
        assert!(service.register(&register_req("user2", "\u{00A0}abc")).is_ok());
    }

    #[test]
    fn register_rejects_duplicate_username() {
        let db = Database::open_in_memory().unwrap();
        let service = AccountService::new(&db);

        service.register(&register_req("user1", "password")).unwrap();
        assert!(matches!(
            service.register(&register_req("user1", "different")),
            Err(AccountError::UsernameTaken(name)) if name == "user1"
        ));
    }

    #[test]
    fn authenticate_requires_exact_password() {
        let db = Database::open_in_memory().unwrap();
        let service = AccountService::new(&db);
        let created = service.register(&register_req("user1", "password")).unwrap();

        assert_eq!(
            service.authenticate(&login_req("user1", "password")).unwrap(),
            created
        );
        assert!(matches!(
            service.authenticate(&login_req("user1", "Password")),
            Err(AccountError::InvalidCredentials)
        ));
        assert!(matches!(
            service.authenticate(&login_req("user1", "password ")),
            Err(AccountError::InvalidCredentials)
        ));
        assert!(matches!(
            service.authenticate(&login_req("nobody", "password")),
            Err(AccountError::InvalidCredentials)
        ));
    }
}
