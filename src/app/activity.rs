//! Activity use cases: list, get, create.

use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Activity name -> activity record with its current participants.
pub type ActivityMap = BTreeMap<String, ActivityDto>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDto {
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub max_participants: Option<u32>,
    pub participants: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCreateReq {
    pub name: String,
    pub description: Option<String>,
    pub schedule: Option<String>,
    pub max_participants: Option<u32>,
}

/// Every activity with its participant emails, read in one transaction.
pub fn list_activities(pool: &DbPool) -> Result<ActivityMap, AppError> {
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction()?;

    let mut out = ActivityMap::new();
    {
        let mut stmt = tx.prepare(
            "SELECT name, description, schedule, max_participants FROM activity ORDER BY name",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, String>(0)?,
                ActivityDto {
                    description: r.get(1)?,
                    schedule: r.get(2)?,
                    max_participants: r.get(3)?,
                    participants: Vec::new(),
                },
            ))
        })?;
        for r in rows {
            let (name, dto) = r?;
            out.insert(name, dto);
        }

        let mut stmt =
            tx.prepare("SELECT activity_name, email FROM participant ORDER BY id")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
        for r in rows {
            let (activity_name, email) = r?;
            if let Some(dto) = out.get_mut(&activity_name) {
                dto.participants.push(email);
            }
        }
    }
    tx.commit()?;

    log::debug!("Listed {} activities", out.len());
    Ok(out)
}

pub fn get_activity(pool: &DbPool, name: &str) -> Result<ActivityDto, AppError> {
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction()?;
    let mut dto = find_activity(&tx, name)?
        .ok_or_else(|| AppError::NotFound(format!("activity {name}")))?;
    dto.participants = participant_emails(&tx, name)?;
    tx.commit()?;
    Ok(dto)
}

/// Administrative creation of a single activity with no participants.
pub fn create_activity(pool: &DbPool, req: ActivityCreateReq) -> Result<ActivityDto, AppError> {
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if find_activity(&tx, &req.name)?.is_some() {
        log::warn!("Activity already exists: {}", req.name);
        return Err(AppError::Conflict(format!("activity {} already exists", req.name)));
    }
    insert_activity(
        &tx,
        &req.name,
        req.description.as_deref(),
        req.schedule.as_deref(),
        req.max_participants,
    )?;
    tx.commit()?;

    log::info!("Created activity {}", req.name);
    Ok(ActivityDto {
        description: req.description,
        schedule: req.schedule,
        max_participants: req.max_participants,
        participants: Vec::new(),
    })
}

/// Activity row without participants, or `None` if the name is unknown.
pub(crate) fn find_activity(
    conn: &Connection,
    name: &str,
) -> Result<Option<ActivityDto>, AppError> {
    let dto = conn
        .query_row(
            "SELECT description, schedule, max_participants FROM activity WHERE name = ?1",
            [name],
            |r| {
                Ok(ActivityDto {
                    description: r.get(0)?,
                    schedule: r.get(1)?,
                    max_participants: r.get(2)?,
                    participants: Vec::new(),
                })
            },
        )
        .optional()?;
    Ok(dto)
}

pub(crate) fn insert_activity(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
    schedule: Option<&str>,
    max_participants: Option<u32>,
) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO activity (name, description, schedule, max_participants) VALUES (?1, ?2, ?3, ?4)",
        params![name, description, schedule, max_participants],
    )?;
    Ok(())
}

fn participant_emails(conn: &Connection, activity_name: &str) -> Result<Vec<String>, AppError> {
    let mut stmt =
        conn.prepare("SELECT email FROM participant WHERE activity_name = ?1 ORDER BY id")?;
    let rows = stmt.query_map([activity_name], |r| r.get(0))?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
