use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};

use crate::dto::question_dto::{CreateQuestionPayload, UpdateQuestionPayload};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::services::{ensure_exists, Entity};
use crate::utils::validation::require_non_empty;

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateQuestionPayload) -> Result<Question> {
        let text = require_non_empty("text", &payload.text)?;

        let mut tx = self.pool.begin().await?;
        ensure_exists(&mut *tx, Entity::Job, payload.job_id).await?;
        check_criterion(&mut tx, payload.job_id, payload.criterion_id).await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            WITH inserted AS (
                INSERT INTO questions (job_id, criterion_id, text)
                VALUES ($1, $2, $3)
                RETURNING id, job_id, criterion_id, text, created_at, updated_at
            )
            SELECT q.id, q.job_id, q.criterion_id, c.name AS criterion_name, q.text,
                   q.created_at, q.updated_at
            FROM inserted q
            JOIN criteria c ON c.id = q.criterion_id
            "#,
        )
        .bind(payload.job_id)
        .bind(payload.criterion_id)
        .bind(&text)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(job_id = question.job_id, question_id = question.id, "question created");
        Ok(question)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Question> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT q.id, q.job_id, q.criterion_id, c.name AS criterion_name, q.text,
                   q.created_at, q.updated_at
            FROM questions q
            JOIN criteria c ON c.id = q.criterion_id
            WHERE q.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Question", id))
    }

    /// Grouped by criterion in display order, oldest question first within a group.
    pub async fn list_for_job(&self, job_id: i64) -> Result<Vec<Question>> {
        ensure_exists(&self.pool, Entity::Job, job_id).await?;

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT q.id, q.job_id, q.criterion_id, c.name AS criterion_name, q.text,
                   q.created_at, q.updated_at
            FROM questions q
            JOIN criteria c ON c.id = q.criterion_id
            WHERE q.job_id = $1
            ORDER BY c.display_order ASC, q.created_at ASC, q.id ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    pub async fn update(&self, id: i64, payload: UpdateQuestionPayload) -> Result<Question> {
        let text = require_non_empty("text", &payload.text)?;

        let mut tx = self.pool.begin().await?;
        let job_id: i64 = sqlx::query_scalar("SELECT job_id FROM questions WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::not_found("Question", id))?;
        check_criterion(&mut tx, job_id, payload.criterion_id).await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            WITH updated AS (
                UPDATE questions
                SET criterion_id = $2, text = $3, updated_at = NOW()
                WHERE id = $1
                RETURNING id, job_id, criterion_id, text, created_at, updated_at
            )
            SELECT q.id, q.job_id, q.criterion_id, c.name AS criterion_name, q.text,
                   q.created_at, q.updated_at
            FROM updated q
            JOIN criteria c ON c.id = q.criterion_id
            "#,
        )
        .bind(id)
        .bind(payload.criterion_id)
        .bind(&text)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(question)
    }

    /// Answers to the question are removed by the schema's cascade.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Err(Error::not_found("Question", id));
        }
        info!(question_id = id, "question deleted");
        Ok(())
    }
}

/// The criterion must exist. A criterion from another job is accepted but
/// logged, since nothing in the schema ties the two jobs together.
async fn check_criterion(conn: &mut PgConnection, job_id: i64, criterion_id: i64) -> Result<()> {
    let criterion_job: i64 = sqlx::query_scalar("SELECT job_id FROM criteria WHERE id = $1")
        .bind(criterion_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::not_found("Criterion", criterion_id))?;

    if criterion_job != job_id {
        warn!(
            question_job_id = job_id,
            criterion_job_id = criterion_job,
            criterion_id,
            "question references a criterion that belongs to another job"
        );
    }
    Ok(())
}
