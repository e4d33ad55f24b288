// Location table access
//
// The catalog is replaced by diff: rows missing from a fresh fetch are
// deleted, new rows are insert-ignored so retained rows keep last_access.

use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::api::LocationRecord;

/// A catalog entry as stored locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub code: String,
    pub country: String,
    pub country_code: String,
    pub city: String,
    pub city_code: String,
    pub state: Option<String>,
    /// Epoch seconds of the last explicit selection, 0 if never selected
    pub last_access: i64,
}

impl From<LocationRecord> for Location {
    fn from(record: LocationRecord) -> Self {
        Self {
            code: record.code,
            country: record.country,
            country_code: record.country_code,
            city: record.city,
            city_code: record.city_code,
            state: record.state,
            last_access: 0,
        }
    }
}

impl Location {
    /// "City, State" when a state is present, otherwise just the city.
    pub fn display_name(&self) -> String {
        match &self.state {
            Some(state) if !state.is_empty() => format!("{}, {}", self.city, state),
            _ => self.city.clone(),
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            code: row.get(0)?,
            country: row.get(1)?,
            country_code: row.get(2)?,
            city: row.get(3)?,
            city_code: row.get(4)?,
            state: row.get(5)?,
            last_access: row.get(6)?,
        })
    }
}

const COLUMNS: &str = "code, country, country_code, city, city_code, state, last_access";

pub fn all(conn: &Connection) -> rusqlite::Result<Vec<Location>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM location ORDER BY code ASC"))?;
    let rows = stmt
        .query_map([], Location::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Insert rows, silently skipping codes that already exist.
pub fn insert_ignore(conn: &Connection, locations: &[Location]) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare(&format!(
        "INSERT OR IGNORE INTO location ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
    ))?;
    let mut inserted = 0;
    for l in locations {
        inserted += stmt.execute(params![
            l.code,
            l.country,
            l.country_code,
            l.city,
            l.city_code,
            l.state,
            l.last_access,
        ])?;
    }
    Ok(inserted)
}

/// Delete every row whose code is not in `keep`. An empty `keep` clears the
/// table.
pub fn delete_not_in(conn: &Connection, keep: &[&str]) -> rusqlite::Result<usize> {
    if keep.is_empty() {
        return conn.execute("DELETE FROM location", []);
    }
    let placeholders = vec!["?"; keep.len()].join(", ");
    let sql = format!("DELETE FROM location WHERE code NOT IN ({placeholders})");
    conn.execute(&sql, params_from_iter(keep.iter()))
}

/// Returns whether a row matched `code`.
pub fn update_last_access(
    conn: &Connection,
    code: &str,
    last_access: i64,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE location SET last_access = ?1 WHERE code = ?2",
        params![last_access, code],
    )?;
    Ok(changed == 1)
}

/// Rows that were selected at least once, oldest selection first.
pub fn recent(conn: &Connection, limit: usize) -> rusqlite::Result<Vec<Location>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM location
         WHERE last_access > 0
         ORDER BY last_access ASC, code ASC
         LIMIT ?1"
    ))?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map([limit], Location::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
