use std::collections::BTreeMap;

use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::evaluation::{Evaluation, EvaluationSummary};

#[derive(Debug, Clone, FromRow)]
pub struct CandidateRef {
    pub id: i64,
    pub name: String,
}

/// Read-only comparison of the candidates of one job.
#[derive(Clone)]
pub struct SummaryService {
    pool: PgPool,
}

impl SummaryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One row per candidate of the job, best average first. Candidates,
    /// evaluations and the job title are read from a single snapshot.
    pub async fn summarize(&self, job_id: i64) -> Result<Vec<EvaluationSummary>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let job_title: String = sqlx::query_scalar("SELECT title FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::not_found("Job", job_id))?;

        let candidates = sqlx::query_as::<_, CandidateRef>(
            "SELECT id, name FROM candidates WHERE job_id = $1 ORDER BY id ASC",
        )
        .bind(job_id)
        .fetch_all(&mut *tx)
        .await?;

        let evaluations = sqlx::query_as::<_, Evaluation>(
            r#"
            SELECT e.id, e.candidate_id, e.criterion_id, c.name AS criterion_name,
                   e.score, e.comments, e.created_at, e.updated_at
            FROM evaluations e
            JOIN criteria c ON c.id = e.criterion_id
            JOIN candidates ca ON ca.id = e.candidate_id
            WHERE ca.job_id = $1
            ORDER BY e.candidate_id ASC, c.display_order ASC, c.created_at ASC, c.id ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            job_id,
            candidates = candidates.len(),
            evaluations = evaluations.len(),
            "building evaluation summary"
        );
        Ok(build_summaries(&job_title, candidates, evaluations))
    }
}

/// `candidates` must be ordered by id; candidates with equal averages keep
/// that order. Evaluations are grouped by candidate in the order given.
pub fn build_summaries(
    job_title: &str,
    candidates: Vec<CandidateRef>,
    evaluations: Vec<Evaluation>,
) -> Vec<EvaluationSummary> {
    let mut by_candidate: BTreeMap<i64, Vec<Evaluation>> = BTreeMap::new();
    for evaluation in evaluations {
        by_candidate
            .entry(evaluation.candidate_id)
            .or_default()
            .push(evaluation);
    }

    let mut summaries: Vec<EvaluationSummary> = candidates
        .into_iter()
        .map(|candidate| {
            let evaluations = by_candidate.remove(&candidate.id).unwrap_or_default();
            let average_score = average(&evaluations);
            let chart_data = evaluations
                .iter()
                .map(|e| (e.criterion_name.clone(), e.score))
                .collect();

            EvaluationSummary {
                candidate_id: candidate.id,
                candidate_name: candidate.name,
                job_title: job_title.to_string(),
                evaluations,
                average_score,
                chart_data,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    summaries
}

fn average(evaluations: &[Evaluation]) -> f64 {
    if evaluations.is_empty() {
        return 0.0;
    }
    let total: i64 = evaluations.iter().map(|e| i64::from(e.score)).sum();
    total as f64 / evaluations.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candidate(id: i64, name: &str) -> CandidateRef {
        CandidateRef {
            id,
            name: name.to_string(),
        }
    }

    fn evaluation(id: i64, candidate_id: i64, criterion: &str, score: i32) -> Evaluation {
        let now = Utc::now();
        Evaluation {
            id,
            candidate_id,
            criterion_id: id * 10,
            criterion_name: criterion.to_string(),
            score,
            comments: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn sorts_by_average_descending() {
        let summaries = build_summaries(
            "Backend Engineer",
            vec![candidate(1, "Ann"), candidate(2, "Bob"), candidate(3, "Cid")],
            vec![
                evaluation(1, 1, "Communication", 6),
                evaluation(2, 1, "Technical", 7),
                evaluation(3, 2, "Communication", 9),
                evaluation(4, 2, "Technical", 8),
                evaluation(5, 3, "Communication", 7),
            ],
        );

        let order: Vec<i64> = summaries.iter().map(|s| s.candidate_id).collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(summaries[0].average_score, 8.5);
        assert_eq!(summaries[1].average_score, 7.0);
        assert_eq!(summaries[2].average_score, 6.5);
        assert!(summaries.iter().all(|s| s.job_title == "Backend Engineer"));
    }

    #[test]
    fn unscored_candidate_averages_zero_and_sorts_last() {
        let summaries = build_summaries(
            "QA",
            vec![candidate(1, "Ann"), candidate(2, "Bob")],
            vec![evaluation(1, 2, "Technical", 1)],
        );

        assert_eq!(summaries[0].candidate_id, 2);
        assert_eq!(summaries[1].candidate_id, 1);
        assert_eq!(summaries[1].average_score, 0.0);
        assert!(summaries[1].evaluations.is_empty());
        assert!(summaries[1].chart_data.is_empty());
    }

    #[test]
    fn ties_keep_candidate_id_order() {
        let summaries = build_summaries(
            "QA",
            vec![candidate(4, "Dee"), candidate(7, "Eve"), candidate(9, "Fay")],
            vec![
                evaluation(1, 4, "Technical", 5),
                evaluation(2, 7, "Technical", 5),
                evaluation(3, 9, "Technical", 5),
            ],
        );

        let order: Vec<i64> = summaries.iter().map(|s| s.candidate_id).collect();
        assert_eq!(order, vec![4, 7, 9]);
    }

    #[test]
    fn chart_data_maps_criterion_name_to_score() {
        let summaries = build_summaries(
            "QA",
            vec![candidate(1, "Ann")],
            vec![
                evaluation(1, 1, "Communication", 8),
                evaluation(2, 1, "Technical", 6),
            ],
        );

        let chart = &summaries[0].chart_data;
        assert_eq!(chart.len(), 2);
        assert_eq!(chart.get("Communication"), Some(&8));
        assert_eq!(chart.get("Technical"), Some(&6));
        let names: Vec<&str> = summaries[0]
            .evaluations
            .iter()
            .map(|e| e.criterion_name.as_str())
            .collect();
        assert_eq!(names, vec!["Communication", "Technical"]);
    }

    #[test]
    fn no_candidates_yields_empty_summary() {
        assert!(build_summaries("QA", Vec::new(), Vec::new()).is_empty());
    }
}
