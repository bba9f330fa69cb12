use sqlx::PgPool;
use tracing::info;

use crate::dto::candidate_dto::{CreateCandidatePayload, UpdateCandidatePayload};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateWithJob};
use crate::services::{ensure_exists, Entity};
use crate::utils::validation::require_non_empty;

#[derive(Clone)]
pub struct CandidateService {
    pool: PgPool,
}

impl CandidateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateCandidatePayload) -> Result<Candidate> {
        let name = require_non_empty("name", &payload.name)?;
        ensure_exists(&self.pool, Entity::Job, payload.job_id).await?;

        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates (job_id, name, email, phone, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, job_id, name, email, phone, description, created_at, updated_at
            "#,
        )
        .bind(payload.job_id)
        .bind(&name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.description)
        .fetch_one(&self.pool)
        .await?;

        info!(job_id = candidate.job_id, candidate_id = candidate.id, "candidate created");
        Ok(candidate)
    }

    pub async fn get_candidate(&self, id: i64) -> Result<Candidate> {
        sqlx::query_as::<_, Candidate>(
            r#"
            SELECT id, job_id, name, email, phone, description, created_at, updated_at
            FROM candidates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Candidate", id))
    }

    /// Newest first.
    pub async fn list_for_job(&self, job_id: i64) -> Result<Vec<CandidateWithJob>> {
        ensure_exists(&self.pool, Entity::Job, job_id).await?;

        let candidates = sqlx::query_as::<_, CandidateWithJob>(
            r#"
            SELECT c.id, c.job_id, c.name, c.email, c.phone, c.description,
                   c.created_at, c.updated_at, j.title AS job_title
            FROM candidates c
            JOIN jobs j ON c.job_id = j.id
            WHERE c.job_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(candidates)
    }

    pub async fn update(&self, id: i64, payload: UpdateCandidatePayload) -> Result<Candidate> {
        let name = require_non_empty("name", &payload.name)?;

        sqlx::query_as::<_, Candidate>(
            r#"
            UPDATE candidates
            SET
                name = $2,
                email = $3,
                phone = $4,
                description = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, job_id, name, email, phone, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Candidate", id))
    }

    /// Answers and evaluations are removed by the schema's cascades.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Err(Error::not_found("Candidate", id));
        }
        info!(candidate_id = id, "candidate deleted");
        Ok(())
    }
}
