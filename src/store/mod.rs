//! Documentation store - durable persistence of per-category documentation.
//!
//! Observations are append-only rows (`record_section_observation`); next
//! steps are replaced wholesale (`set_next_steps`); notes accumulate with a
//! newline separator (`add_notes`). [`get_summary`] is the windowed read
//! view, and [`clear_category`] zeroes a category's text without deleting
//! history. Every operation validates against the taxonomy registry before
//! touching storage, and every write runs inside a transaction so a
//! concurrent summary read never sees a torn state.

use std::collections::BTreeMap;

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::StoreError;
use crate::taxonomy::{self, Category};

/// One qualifying observation row in a summary, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct ObservationEntry {
    pub id: i64,
    pub observation: String,
    pub timestamp: String,
}

/// The windowed read view of one category.
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    /// Section name to its qualifying observations, newest first. Sections
    /// with no qualifying rows are absent.
    pub sections: BTreeMap<String, Vec<ObservationEntry>>,
    pub next_steps: String,
    pub notes: String,
}

/// Append a timestamped observation to one section of a category.
///
/// Observations are never updated in place - a correction is a new row.
pub fn record_section_observation(
    conn: &mut Connection,
    category_id: &str,
    section_name: &str,
    observation: &str,
) -> Result<String, StoreError> {
    taxonomy::validate_section(category_id, section_name)?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO section_observations (category_id, section_name, observation, recorded_at) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            category_id,
            section_name,
            observation,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    tx.commit()?;

    tracing::debug!(category = category_id, section = section_name, "observation recorded");
    Ok(format!(
        "Observations recorded for {category_id} - {section_name}"
    ))
}

/// Replace a category's next steps. Last write wins.
pub fn set_next_steps(
    conn: &mut Connection,
    category_id: &str,
    next_steps: &str,
) -> Result<String, StoreError> {
    taxonomy::validate_category(category_id)?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT OR REPLACE INTO category_next_steps (category_id, next_steps) VALUES (?1, ?2)",
        params![category_id, next_steps],
    )?;
    tx.commit()?;

    Ok(format!("Next steps set for {category_id}"))
}

/// Append to a category's notes, separated from existing notes by a newline.
///
/// Read-modify-write runs inside one transaction.
pub fn add_notes(
    conn: &mut Connection,
    category_id: &str,
    notes: &str,
) -> Result<String, StoreError> {
    taxonomy::validate_category(category_id)?;

    let tx = conn.transaction()?;
    let existing: String = tx
        .query_row(
            "SELECT notes FROM category_notes WHERE category_id = ?1",
            params![category_id],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or_default();

    let combined = if existing.is_empty() {
        notes.to_string()
    } else {
        format!("{existing}\n{notes}")
    };

    tx.execute(
        "INSERT OR REPLACE INTO category_notes (category_id, notes) VALUES (?1, ?2)",
        params![category_id, combined],
    )?;
    tx.commit()?;

    Ok(format!("Notes added to {category_id}"))
}

/// Build the windowed summary of one category.
///
/// Only observations from the trailing `window_days` with non-empty text are
/// included; within a section they are ordered newest first, ties broken by
/// row id. `next_steps` and `notes` come back as-is (empty string when
/// nothing is on file).
pub fn get_summary(
    conn: &Connection,
    category_id: &str,
    window_days: i64,
) -> Result<CategorySummary, StoreError> {
    taxonomy::validate_category(category_id)?;

    let cutoff = (chrono::Utc::now() - chrono::Duration::days(window_days)).to_rfc3339();

    let mut stmt = conn.prepare(
        "SELECT id, section_name, observation, recorded_at \
         FROM section_observations \
         WHERE category_id = ?1 AND recorded_at >= ?2 AND observation != '' \
         ORDER BY recorded_at DESC, id DESC",
    )?;

    let mut sections: BTreeMap<String, Vec<ObservationEntry>> = BTreeMap::new();
    let rows = stmt.query_map(params![category_id, cutoff], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;
    for row in rows {
        let (id, section_name, observation, timestamp) = row?;
        sections.entry(section_name).or_default().push(ObservationEntry {
            id,
            observation,
            timestamp,
        });
    }

    let next_steps: String = conn
        .query_row(
            "SELECT next_steps FROM category_next_steps WHERE category_id = ?1",
            params![category_id],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or_default();

    let notes: String = conn
        .query_row(
            "SELECT notes FROM category_notes WHERE category_id = ?1",
            params![category_id],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or_default();

    Ok(CategorySummary {
        sections,
        next_steps,
        notes,
    })
}

/// Reset a category: empty next steps, empty notes, and zero the text of
/// every historical observation row. Rows are kept as auditable-but-blank
/// tombstones, not deleted.
pub fn clear_category(conn: &mut Connection, category_id: &str) -> Result<String, StoreError> {
    taxonomy::validate_category(category_id)?;

    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE category_next_steps SET next_steps = '' WHERE category_id = ?1",
        params![category_id],
    )?;
    tx.execute(
        "UPDATE category_notes SET notes = '' WHERE category_id = ?1",
        params![category_id],
    )?;
    tx.execute(
        "UPDATE section_observations SET observation = '' WHERE category_id = ?1",
        params![category_id],
    )?;
    tx.commit()?;

    tracing::info!(category = category_id, "category cleared");
    Ok(format!("Documentation cleared for {category_id}"))
}

/// The fixed category list. Delegates to the taxonomy registry.
pub fn list_categories() -> &'static [Category] {
    taxonomy::list_categories()
}
