use sqlx::PgPool;
use tracing::info;

use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::criterion::Criterion;
use crate::models::job::{Job, JobWithCriteria};
use crate::services::criteria_service;
use crate::utils::validation::{normalize_criterion_names, require_non_empty};

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the job and, in the same transaction, its initial criteria.
    pub async fn create(&self, payload: CreateJobPayload) -> Result<JobWithCriteria> {
        let title = require_non_empty("title", &payload.title)?;
        let names = normalize_criterion_names(&payload.criteria)?;

        let mut tx = self.pool.begin().await?;
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (title, description, requirements)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, requirements, created_at, updated_at
            "#,
        )
        .bind(&title)
        .bind(&payload.description)
        .bind(&payload.requirements)
        .fetch_one(&mut *tx)
        .await?;

        let criteria_list = criteria_service::insert_initial(&mut tx, job.id, &names).await?;
        tx.commit().await?;

        info!(job_id = job.id, criteria = criteria_list.len(), "job created");
        Ok(JobWithCriteria { job, criteria_list })
    }

    pub async fn get_by_id(&self, id: i64) -> Result<JobWithCriteria> {
        let job = self.fetch(id).await?;
        let criteria_list = sqlx::query_as::<_, Criterion>(
            r#"
            SELECT id, job_id, name, display_order, created_at, updated_at
            FROM criteria
            WHERE job_id = $1
            ORDER BY display_order ASC, created_at ASC, id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(JobWithCriteria { job, criteria_list })
    }

    pub async fn list(&self) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, description, requirements, created_at, updated_at
            FROM jobs
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    pub async fn update(&self, id: i64, payload: UpdateJobPayload) -> Result<Job> {
        let title = require_non_empty("title", &payload.title)?;

        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET
                title = $2,
                description = $3,
                requirements = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, requirements, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&title)
        .bind(&payload.description)
        .bind(&payload.requirements)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Job", id))
    }

    /// Candidates, questions and criteria go with the job through the
    /// schema's cascades, and answers and evaluations with them.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Err(Error::not_found("Job", id));
        }
        info!(job_id = id, "job deleted");
        Ok(())
    }

    async fn fetch(&self, id: i64) -> Result<Job> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, description, requirements, created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Job", id))
    }
}
