use rusqlite::{Connection, OptionalExtension};

use crate::error::is_constraint_violation;
use crate::models::{ContactRow, UserRow};
use crate::{Database, DbError, Result, UniqueField, now};

impl Database {
    // -- Users --

    /// Insert a new user. Both timestamps are set to the current time.
    /// A collision on a unique column comes back as
    /// `DbError::UniqueViolation` naming the field.
    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let ts = now();
            match conn.execute(
                "INSERT INTO users (username, email, password, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (username, email, password_hash, &ts, &ts),
            ) {
                Ok(_) => Ok(conn.last_insert_rowid()),
                Err(e) if is_constraint_violation(&e) => {
                    Err(classify_unique_violation(conn, username, email, e)?)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", &username))
    }

    pub fn user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", &id))
    }

    /// Profile edit touches only phone, company, bio and the updated
    /// timestamp — never username, email or password.
    pub fn update_profile(&self, id: i64, phone: &str, company: &str, bio: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET phone = ?1, company = ?2, bio = ?3, updated_at = ?4
                 WHERE id = ?5",
                (phone, company, bio, now(), id),
            )?;
            Ok(())
        })
    }

    // -- Contacts --

    /// `user_id` is `None` for anonymous submissions.
    pub fn insert_contact(
        &self,
        user_id: Option<i64>,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO contacts (user_id, name, email, message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (user_id, name, email, message, now()),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Messages the given user personally submitted, newest first.
    pub fn contacts_for_user(&self, user_id: i64) -> Result<Vec<ContactRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, name, email, message, created_at
                 FROM contacts
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;

            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(ContactRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        email: row.get(3)?,
                        message: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

/// Decide which unique column the failed insert collided with by
/// checking which value already exists. Falls back to the raw SQLite
/// error when neither matches (some other constraint fired).
fn classify_unique_violation(
    conn: &Connection,
    username: &str,
    email: &str,
    original: rusqlite::Error,
) -> Result<DbError> {
    let username_taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
        [username],
        |row| row.get(0),
    )?;
    if username_taken {
        return Ok(DbError::UniqueViolation(UniqueField::Username));
    }

    let email_taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
        [email],
        |row| row.get(0),
    )?;
    if email_taken {
        return Ok(DbError::UniqueViolation(UniqueField::Email));
    }

    Ok(DbError::Sqlite(original))
}

fn query_user(
    conn: &Connection,
    predicate: &str,
    param: &dyn rusqlite::ToSql,
) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, username, email, password, phone, company, bio, avatar,
                created_at, updated_at
         FROM users WHERE {predicate}"
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([param], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                phone: row.get(4)?,
                company: row.get(5)?,
                bio: row.get(6)?,
                avatar: row.get(7)?,
                created_at: row.get(8)?,
                updated_at: row.get(9)?,
            })
        })
        .optional()?;

    Ok(row)
}
