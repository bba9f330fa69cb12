pub mod answer_service;
pub mod candidate_service;
pub mod criteria_service;
pub mod evaluation_service;
pub mod job_service;
pub mod question_service;
pub mod summary_service;
pub mod template_service;

use sqlx::{PgConnection, PgExecutor};

use crate::error::{Error, Result};

/// Tables whose rows are referenced by id from request payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Job,
    Criterion,
    Candidate,
    Question,
}

impl Entity {
    fn label(self) -> &'static str {
        match self {
            Entity::Job => "Job",
            Entity::Criterion => "Criterion",
            Entity::Candidate => "Candidate",
            Entity::Question => "Question",
        }
    }

    fn exists_query(self) -> &'static str {
        match self {
            Entity::Job => "SELECT EXISTS(SELECT 1 FROM jobs WHERE id = $1)",
            Entity::Criterion => "SELECT EXISTS(SELECT 1 FROM criteria WHERE id = $1)",
            Entity::Candidate => "SELECT EXISTS(SELECT 1 FROM candidates WHERE id = $1)",
            Entity::Question => "SELECT EXISTS(SELECT 1 FROM questions WHERE id = $1)",
        }
    }

    fn count_query(self) -> &'static str {
        match self {
            Entity::Job => "SELECT COUNT(*) FROM jobs WHERE id = ANY($1)",
            Entity::Criterion => "SELECT COUNT(*) FROM criteria WHERE id = ANY($1)",
            Entity::Candidate => "SELECT COUNT(*) FROM candidates WHERE id = ANY($1)",
            Entity::Question => "SELECT COUNT(*) FROM questions WHERE id = ANY($1)",
        }
    }
}

pub(crate) async fn ensure_exists<'e, E>(executor: E, entity: Entity, id: i64) -> Result<()>
where
    E: PgExecutor<'e>,
{
    let exists: bool = sqlx::query_scalar(entity.exists_query())
        .bind(id)
        .fetch_one(executor)
        .await?;
    if !exists {
        return Err(Error::not_found(entity.label(), id));
    }
    Ok(())
}

/// Fails with NotFound unless every id in `ids` resolves. `ids` must be distinct.
pub(crate) async fn ensure_all_exist<'e, E>(executor: E, entity: Entity, ids: &[i64]) -> Result<()>
where
    E: PgExecutor<'e>,
{
    if ids.is_empty() {
        return Ok(());
    }
    let found: i64 = sqlx::query_scalar(entity.count_query())
        .bind(ids)
        .fetch_one(executor)
        .await?;
    if found != ids.len() as i64 {
        return Err(Error::NotFound(format!(
            "{} of the referenced {} ids do not exist",
            ids.len() as i64 - found,
            entity.label().to_lowercase()
        )));
    }
    Ok(())
}

/// Row-locks the job so criteria edits for one job run one at a time.
/// `FOR NO KEY UPDATE` leaves inserts of child rows unblocked.
pub(crate) async fn lock_job(conn: &mut PgConnection, job_id: i64) -> Result<()> {
    let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1 FOR NO KEY UPDATE")
        .bind(job_id)
        .fetch_optional(&mut *conn)
        .await?;
    match locked {
        Some(_) => Ok(()),
        None => Err(Error::not_found(Entity::Job.label(), job_id)),
    }
}
