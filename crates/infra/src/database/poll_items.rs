//! Row codec for the `poll_items` table.
//!
//! Every row carries an explicit `kind` column that is decoded into
//! [`PollItem`] before anything else looks at it.

use bffhang_domain::{HangError, Poll, Response};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::errors::InfraError;

pub const POLL_PREFIX: &str = "POLL#";
pub const RESPONSE_PREFIX: &str = "RESP#";
pub const POLL_SORT_KEY: &str = "POLL";

const KIND_POLL: &str = "poll";
const KIND_RESPONSE: &str = "response";

pub const SELECT_COLUMNS: &str =
    "pk, sk, kind, title, name, days, creator_token, user_token, created_at";

pub fn partition_key(poll_id: &str) -> String {
    format!("{POLL_PREFIX}{poll_id}")
}

pub fn response_sort_key(response_id: &str) -> String {
    format!("{RESPONSE_PREFIX}{response_id}")
}

/// Decoded row of the `poll_items` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollItem {
    Poll(Poll),
    Response(Response),
}

/// Raw column values, before the `kind` discriminator is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub pk: String,
    pub sk: String,
    pub kind: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub days: String,
    pub creator_token: Option<String>,
    pub user_token: Option<String>,
    pub created_at: String,
}

impl RawItem {
    /// Read a row selected with [`SELECT_COLUMNS`].
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            pk: row.get(0)?,
            sk: row.get(1)?,
            kind: row.get(2)?,
            title: row.get(3)?,
            name: row.get(4)?,
            days: row.get(5)?,
            creator_token: row.get(6)?,
            user_token: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

impl PollItem {
    pub fn decode(raw: RawItem) -> Result<Self, InfraError> {
        let days: Vec<String> = serde_json::from_str(&raw.days)?;
        let created_at = parse_timestamp(&raw.created_at)?;

        match raw.kind.as_str() {
            KIND_POLL => {
                if raw.sk != POLL_SORT_KEY {
                    return Err(corrupt(&raw, "poll row under a response key"));
                }
                let id = strip(&raw.pk, POLL_PREFIX).ok_or_else(|| corrupt(&raw, "bad pk"))?;
                Ok(Self::Poll(Poll {
                    id,
                    title: raw.title.clone().ok_or_else(|| corrupt(&raw, "missing title"))?,
                    days,
                    creator_token: raw.creator_token.clone().unwrap_or_default(),
                    created_at,
                }))
            }
            KIND_RESPONSE => {
                let id =
                    strip(&raw.sk, RESPONSE_PREFIX).ok_or_else(|| corrupt(&raw, "bad sk"))?;
                Ok(Self::Response(Response {
                    id,
                    name: raw.name.clone().ok_or_else(|| corrupt(&raw, "missing name"))?,
                    days,
                    user_token: raw.user_token.clone().unwrap_or_default(),
                    created_at,
                }))
            }
            other => Err(corrupt(&raw, &format!("unknown kind '{other}'"))),
        }
    }
}

/// Insert the poll row unless one already exists. Returns rows affected.
pub fn insert_poll_if_absent(conn: &Connection, poll: &Poll) -> Result<usize, InfraError> {
    let days = serde_json::to_string(&poll.days)?;
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO poll_items (pk, sk, kind, title, days, creator_token, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            partition_key(&poll.id),
            POLL_SORT_KEY,
            KIND_POLL,
            poll.title,
            days,
            poll.creator_token,
            format_timestamp(&poll.created_at),
        ],
    )?;
    Ok(inserted)
}

/// Day list of the poll row, or `None` when the poll does not exist.
pub fn poll_days(conn: &Connection, poll_id: &str) -> Result<Option<Vec<String>>, InfraError> {
    let raw = conn
        .query_row(
            "SELECT days FROM poll_items WHERE pk = ?1 AND sk = ?2",
            params![partition_key(poll_id), POLL_SORT_KEY],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    raw.map(|days| serde_json::from_str(&days).map_err(InfraError::from)).transpose()
}

/// Insert or fully replace a response row.
pub fn upsert_response_row(
    conn: &Connection,
    poll_id: &str,
    response: &Response,
) -> Result<(), InfraError> {
    let days = serde_json::to_string(&response.days)?;
    conn.execute(
        "INSERT INTO poll_items (pk, sk, kind, name, days, user_token, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(pk, sk) DO UPDATE SET
            name = excluded.name,
            days = excluded.days,
            user_token = excluded.user_token,
            created_at = excluded.created_at",
        params![
            partition_key(poll_id),
            response_sort_key(&response.id),
            KIND_RESPONSE,
            response.name,
            days,
            response.user_token,
            format_timestamp(&response.created_at),
        ],
    )?;
    Ok(())
}

/// Replace the poll's day list. Returns rows affected.
pub fn update_days_row(
    conn: &Connection,
    poll_id: &str,
    days: &[String],
) -> Result<usize, InfraError> {
    let days = serde_json::to_string(days)?;
    let updated = conn.execute(
        "UPDATE poll_items SET days = ?3 WHERE pk = ?1 AND sk = ?2",
        params![partition_key(poll_id), POLL_SORT_KEY, days],
    )?;
    Ok(updated)
}

/// Every row of one poll partition.
pub fn load_partition(conn: &Connection, poll_id: &str) -> Result<Vec<PollItem>, InfraError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {SELECT_COLUMNS} FROM poll_items WHERE pk = ?1"))?;
    let rows = stmt.query_map(params![partition_key(poll_id)], RawItem::from_row)?;

    let mut items = Vec::new();
    for row in rows {
        items.push(PollItem::decode(row?)?);
    }
    Ok(items)
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, InfraError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| InfraError(HangError::Internal(format!("bad timestamp '{value}': {err}"))))
}

fn strip(key: &str, prefix: &str) -> Option<String> {
    key.strip_prefix(prefix).filter(|rest| !rest.is_empty()).map(str::to_string)
}

fn corrupt(raw: &RawItem, reason: &str) -> InfraError {
    InfraError(HangError::Internal(format!("corrupt item {}/{}: {reason}", raw.pk, raw.sk)))
}
