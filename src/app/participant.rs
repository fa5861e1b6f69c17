//! Participant use cases: add and remove a signup.

use super::activity::find_activity;
use crate::domain::has_room;
use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use rusqlite::{params, TransactionBehavior};

/// Sign `email` up for `activity_name`.
///
/// Checks run in a fixed order: the activity must exist, the email must not
/// already be signed up, and the activity must have room. The write lock is
/// taken before the first check, so concurrent writers cannot both pass the
/// capacity check.
pub fn add_participant(pool: &DbPool, activity_name: &str, email: &str) -> Result<(), AppError> {
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let activity = find_activity(&tx, activity_name)?
        .ok_or_else(|| AppError::NotFound(format!("activity {activity_name}")))?;

    let already: u32 = tx.query_row(
        "SELECT COUNT(1) FROM participant WHERE activity_name = ?1 AND email = ?2",
        params![activity_name, email],
        |r| r.get(0),
    )?;
    if already > 0 {
        log::warn!("{} already signed up for {}", email, activity_name);
        return Err(AppError::Conflict(format!(
            "{email} already signed up for {activity_name}"
        )));
    }

    let count: u32 = tx.query_row(
        "SELECT COUNT(1) FROM participant WHERE activity_name = ?1",
        [activity_name],
        |r| r.get(0),
    )?;
    if !has_room(activity.max_participants, count) {
        log::warn!("{} is full ({} participants)", activity_name, count);
        return Err(AppError::CapacityExceeded(format!("{activity_name} is full")));
    }

    tx.execute(
        "INSERT INTO participant (email, activity_name) VALUES (?1, ?2)",
        params![email, activity_name],
    )?;
    tx.commit()?;

    log::info!("Signed up {} for {}", email, activity_name);
    Ok(())
}

pub fn remove_participant(
    pool: &DbPool,
    activity_name: &str,
    email: &str,
) -> Result<(), AppError> {
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let changed = tx.execute(
        "DELETE FROM participant WHERE activity_name = ?1 AND email = ?2",
        params![activity_name, email],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound(format!(
            "{email} is not signed up for {activity_name}"
        )));
    }
    tx.commit()?;

    log::info!("Removed {} from {}", email, activity_name);
    Ok(())
}
