// Session table access

use rusqlite::{params, Connection, OptionalExtension};

/// The signed-in user. Presence of the row means "signed in".
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

pub fn get(conn: &Connection) -> rusqlite::Result<Option<Session>> {
    conn.query_row(
        "SELECT email, token FROM session WHERE id = 1",
        [],
        |row| {
            Ok(Session {
                email: row.get(0)?,
                token: row.get(1)?,
            })
        },
    )
    .optional()
}

/// Fixed-key upsert: a second sign-in replaces the first session.
pub fn upsert(conn: &Connection, session: &Session) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO session (id, email, token) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET email = excluded.email, token = excluded.token",
        params![session.email, session.token],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection) -> rusqlite::Result<bool> {
    Ok(conn.execute("DELETE FROM session WHERE id = 1", [])? == 1)
}
