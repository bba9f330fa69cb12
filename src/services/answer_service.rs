use sqlx::PgPool;
use tracing::info;

use crate::dto::answer_dto::AnswerInput;
use crate::error::Result;
use crate::models::answer::Answer;
use crate::services::{ensure_all_exist, ensure_exists, Entity};
use crate::utils::{time, validation::ensure_unique_ids};

const LIST_BY_CANDIDATE: &str = r#"
    SELECT id, candidate_id, question_id, answer_text, created_at, updated_at
    FROM answers
    WHERE candidate_id = $1
    ORDER BY question_id ASC
"#;

#[derive(Clone)]
pub struct AnswerService {
    pool: PgPool,
}

impl AnswerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, candidate_id: i64) -> Result<Vec<Answer>> {
        ensure_exists(&self.pool, Entity::Candidate, candidate_id).await?;
        let answers = sqlx::query_as::<_, Answer>(LIST_BY_CANDIDATE)
            .bind(candidate_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(answers)
    }

    /// Replaces every answer of the candidate with `answers`. Questions
    /// missing from the list lose their answer.
    pub async fn save_all(&self, candidate_id: i64, answers: &[AnswerInput]) -> Result<Vec<Answer>> {
        let question_ids: Vec<i64> = answers.iter().map(|a| a.question_id).collect();
        ensure_unique_ids("question_id", question_ids.iter().copied())?;

        let mut tx = self.pool.begin().await?;
        ensure_exists(&mut *tx, Entity::Candidate, candidate_id).await?;
        ensure_all_exist(&mut *tx, Entity::Question, &question_ids).await?;

        sqlx::query("DELETE FROM answers WHERE candidate_id = $1")
            .bind(candidate_id)
            .execute(&mut *tx)
            .await?;

        let now = time::now();
        for answer in answers {
            sqlx::query(
                r#"
                INSERT INTO answers (candidate_id, question_id, answer_text, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $4)
                "#,
            )
            .bind(candidate_id)
            .bind(answer.question_id)
            .bind(&answer.answer_text)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        let saved = sqlx::query_as::<_, Answer>(LIST_BY_CANDIDATE)
            .bind(candidate_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(candidate_id, count = saved.len(), "answers replaced");
        Ok(saved)
    }

    /// Inserts the answer or overwrites the existing one for the same question.
    pub async fn upsert(&self, candidate_id: i64, question_id: i64, answer_text: &str) -> Result<Answer> {
        ensure_exists(&self.pool, Entity::Candidate, candidate_id).await?;
        ensure_exists(&self.pool, Entity::Question, question_id).await?;

        let answer = sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (candidate_id, question_id, answer_text)
            VALUES ($1, $2, $3)
            ON CONFLICT (candidate_id, question_id) DO UPDATE SET
                answer_text = EXCLUDED.answer_text,
                updated_at = NOW()
            RETURNING id, candidate_id, question_id, answer_text, created_at, updated_at
            "#,
        )
        .bind(candidate_id)
        .bind(question_id)
        .bind(answer_text)
        .fetch_one(&self.pool)
        .await?;
        Ok(answer)
    }
}
