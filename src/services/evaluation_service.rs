use sqlx::{PgExecutor, PgPool};
use tracing::info;

use crate::dto::evaluation_dto::EvaluationInput;
use crate::error::{Error, Result};
use crate::models::evaluation::Evaluation;
use crate::services::{ensure_all_exist, ensure_exists, Entity};
use crate::utils::{
    time,
    validation::{ensure_score, ensure_unique_ids},
};

#[derive(Clone)]
pub struct EvaluationService {
    pool: PgPool,
}

impl EvaluationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, candidate_id: i64) -> Result<Vec<Evaluation>> {
        ensure_exists(&self.pool, Entity::Candidate, candidate_id).await?;
        list_for_candidate(&self.pool, candidate_id).await
    }

    /// Inserts the score or overwrites the existing one for the same
    /// criterion. Concurrent writers on one key: the last commit wins.
    pub async fn upsert(
        &self,
        candidate_id: i64,
        criterion_id: i64,
        score: i32,
        comments: Option<String>,
    ) -> Result<Evaluation> {
        ensure_score(score)?;
        let job_id = candidate_job(&self.pool, candidate_id).await?;
        ensure_exists(&self.pool, Entity::Criterion, criterion_id).await?;
        ensure_same_job(&self.pool, job_id, &[criterion_id]).await?;

        let evaluation = sqlx::query_as::<_, Evaluation>(
            r#"
            WITH upserted AS (
                INSERT INTO evaluations (candidate_id, criterion_id, score, comments)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (candidate_id, criterion_id) DO UPDATE SET
                    score = EXCLUDED.score,
                    comments = EXCLUDED.comments,
                    updated_at = NOW()
                RETURNING id, candidate_id, criterion_id, score, comments, created_at, updated_at
            )
            SELECT e.id, e.candidate_id, e.criterion_id, c.name AS criterion_name,
                   e.score, e.comments, e.created_at, e.updated_at
            FROM upserted e
            JOIN criteria c ON c.id = e.criterion_id
            "#,
        )
        .bind(candidate_id)
        .bind(criterion_id)
        .bind(score)
        .bind(&comments)
        .fetch_one(&self.pool)
        .await?;

        info!(candidate_id, criterion_id, score, "evaluation saved");
        Ok(evaluation)
    }

    /// Replaces every score of the candidate with `evaluations`. Criteria
    /// missing from the list lose their score.
    pub async fn save_all(
        &self,
        candidate_id: i64,
        evaluations: &[EvaluationInput],
    ) -> Result<Vec<Evaluation>> {
        for evaluation in evaluations {
            ensure_score(evaluation.score)?;
        }
        let criterion_ids: Vec<i64> = evaluations.iter().map(|e| e.criterion_id).collect();
        ensure_unique_ids("criterion_id", criterion_ids.iter().copied())?;

        let mut tx = self.pool.begin().await?;
        let job_id = candidate_job(&mut *tx, candidate_id).await?;
        ensure_all_exist(&mut *tx, Entity::Criterion, &criterion_ids).await?;
        ensure_same_job(&mut *tx, job_id, &criterion_ids).await?;

        sqlx::query("DELETE FROM evaluations WHERE candidate_id = $1")
            .bind(candidate_id)
            .execute(&mut *tx)
            .await?;

        let now = time::now();
        for evaluation in evaluations {
            sqlx::query(
                r#"
                INSERT INTO evaluations (candidate_id, criterion_id, score, comments, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $5)
                "#,
            )
            .bind(candidate_id)
            .bind(evaluation.criterion_id)
            .bind(evaluation.score)
            .bind(&evaluation.comments)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        let saved = list_for_candidate(&mut *tx, candidate_id).await?;
        tx.commit().await?;

        info!(candidate_id, count = saved.len(), "evaluations replaced");
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM evaluations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Err(Error::not_found("Evaluation", id));
        }
        Ok(())
    }
}

async fn candidate_job<'e, E>(executor: E, candidate_id: i64) -> Result<i64>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar("SELECT job_id FROM candidates WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::not_found("Candidate", candidate_id))
}

/// A candidate is only scored on criteria of the job they applied for.
async fn ensure_same_job<'e, E>(executor: E, job_id: i64, criterion_ids: &[i64]) -> Result<()>
where
    E: PgExecutor<'e>,
{
    if criterion_ids.is_empty() {
        return Ok(());
    }
    let foreign: Option<(i64, String)> = sqlx::query_as(
        "SELECT id, name FROM criteria WHERE id = ANY($1) AND job_id <> $2 ORDER BY id LIMIT 1",
    )
    .bind(criterion_ids)
    .bind(job_id)
    .fetch_optional(executor)
    .await?;

    match foreign {
        Some((id, name)) => Err(Error::BadRequest(format!(
            "criterion {} ('{}') does not belong to job {}",
            id, name, job_id
        ))),
        None => Ok(()),
    }
}

async fn list_for_candidate<'e, E>(executor: E, candidate_id: i64) -> Result<Vec<Evaluation>>
where
    E: PgExecutor<'e>,
{
    let evaluations = sqlx::query_as::<_, Evaluation>(
        r#"
        SELECT e.id, e.candidate_id, e.criterion_id, c.name AS criterion_name,
               e.score, e.comments, e.created_at, e.updated_at
        FROM evaluations e
        JOIN criteria c ON c.id = e.criterion_id
        WHERE e.candidate_id = $1
        ORDER BY c.display_order ASC, c.created_at ASC, c.id ASC
        "#,
    )
    .bind(candidate_id)
    .fetch_all(executor)
    .await?;
    Ok(evaluations)
}
