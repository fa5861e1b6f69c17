//! Store initialization and one-time seeding.

use super::activity::insert_activity;
use crate::domain::first_duplicate;
use crate::error::AppError;
use crate::infra::{ensure_schema, get_connection};
use crate::infra::DbPool;
use rusqlite::{params, TransactionBehavior};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Activity name -> initial activity content.
pub type SeedData = BTreeMap<String, SeedActivity>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedActivity {
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Ensure the tables exist and, if the store holds no activities yet, load
/// `seed` in a single transaction. A non-empty store is left untouched.
pub fn initialize(pool: &DbPool, seed: Option<&SeedData>) -> Result<(), AppError> {
    let mut conn = get_connection(pool)?;
    ensure_schema(&conn)?;

    let seed = match seed {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(()),
    };

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let existing: i64 = tx.query_row("SELECT COUNT(1) FROM activity", [], |r| r.get(0))?;
    if existing > 0 {
        log::debug!("Store already holds {} activities, skipping seed", existing);
        return Ok(());
    }

    let mut signups = 0usize;
    for (name, data) in seed {
        if let Some(email) = first_duplicate(data.participants.iter().map(String::as_str)) {
            return Err(AppError::Conflict(format!(
                "{email} listed twice in seed for {name}"
            )));
        }
        if let Some(max) = data.max_participants {
            if data.participants.len() > max as usize {
                return Err(AppError::CapacityExceeded(format!(
                    "seed lists {} participants for {name}, limit is {max}",
                    data.participants.len()
                )));
            }
        }

        insert_activity(
            &tx,
            name,
            data.description.as_deref(),
            data.schedule.as_deref(),
            data.max_participants,
        )?;
        for email in &data.participants {
            tx.execute(
                "INSERT INTO participant (email, activity_name) VALUES (?1, ?2)",
                params![email, name],
            )?;
        }
        signups += data.participants.len();
    }
    tx.commit()?;

    log::info!("Seeded {} activities with {} signups", seed.len(), signups);
    Ok(())
}
