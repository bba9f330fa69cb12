use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::dto::criteria_dto::{CreateCriterionPayload, UpdateCriterionPayload};
use crate::error::{Error, Result};
use crate::models::criterion::{Criterion, CriterionDependents};
use crate::services::{ensure_exists, lock_job, Entity};
use crate::utils::validation::{
    ensure_unique_ids, name_key, normalize_criterion_names, require_non_empty,
};

const LIST_BY_JOB: &str = r#"
    SELECT id, job_id, name, display_order, created_at, updated_at
    FROM criteria
    WHERE job_id = $1
    ORDER BY display_order ASC, created_at ASC, id ASC
"#;

const LIST_BY_JOB_FOR_UPDATE: &str = r#"
    SELECT id, job_id, name, display_order, created_at, updated_at
    FROM criteria
    WHERE job_id = $1
    ORDER BY display_order ASC, created_at ASC, id ASC
    FOR UPDATE
"#;

#[derive(Clone)]
pub struct CriteriaService {
    pool: PgPool,
}

/// An existing criterion that keeps its id at a (possibly new) position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeptCriterion {
    pub id: i64,
    pub name: String,
    pub display_order: i32,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCriterion {
    pub name: String,
    pub display_order: i32,
}

/// Outcome of walking the current criteria list against a new name list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplacementPlan {
    pub keep: Vec<KeptCriterion>,
    pub create: Vec<NewCriterion>,
    pub remove: Vec<Criterion>,
}

/// Positional diff: slot `i` of `existing` takes `names[i]` and order `i`;
/// extra names become new criteria and extra existing rows are removed.
/// `existing` must already be in display order.
pub fn plan_replacement(existing: &[Criterion], names: &[String]) -> ReplacementPlan {
    let mut plan = ReplacementPlan::default();

    for (position, name) in names.iter().enumerate() {
        let display_order = position as i32;
        match existing.get(position) {
            Some(current) => plan.keep.push(KeptCriterion {
                id: current.id,
                name: name.clone(),
                display_order,
                changed: current.name != *name || current.display_order != display_order,
            }),
            None => plan.create.push(NewCriterion {
                name: name.clone(),
                display_order,
            }),
        }
    }

    plan.remove = existing.iter().skip(names.len()).cloned().collect();
    plan
}

impl CriteriaService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, job_id: i64) -> Result<Vec<Criterion>> {
        ensure_exists(&self.pool, Entity::Job, job_id).await?;
        let criteria = sqlx::query_as::<_, Criterion>(LIST_BY_JOB)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(criteria)
    }

    pub async fn get(&self, id: i64) -> Result<Criterion> {
        sqlx::query_as::<_, Criterion>(
            r#"
            SELECT id, job_id, name, display_order, created_at, updated_at
            FROM criteria
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Criterion", id))
    }

    pub async fn create(&self, job_id: i64, payload: CreateCriterionPayload) -> Result<Criterion> {
        let name = require_non_empty("name", &payload.name)?;
        if let Some(order) = payload.display_order {
            ensure_display_order(order)?;
        }

        let mut tx = self.pool.begin().await?;
        lock_job(&mut tx, job_id).await?;
        ensure_name_available(&mut tx, job_id, &name, None).await?;

        let criterion = sqlx::query_as::<_, Criterion>(
            r#"
            INSERT INTO criteria (job_id, name, display_order)
            VALUES (
                $1,
                $2,
                COALESCE($3, (SELECT COALESCE(MAX(display_order), -1) + 1 FROM criteria WHERE job_id = $1))
            )
            RETURNING id, job_id, name, display_order, created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(&name)
        .bind(payload.display_order)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(job_id, criterion_id = criterion.id, "criterion created");
        Ok(criterion)
    }

    pub async fn update(&self, id: i64, payload: UpdateCriterionPayload) -> Result<Criterion> {
        let name = require_non_empty("name", &payload.name)?;
        ensure_display_order(payload.display_order)?;

        let mut tx = self.pool.begin().await?;
        // job lock before the row lock, the same order replace_all takes them
        let job_id: i64 = sqlx::query_scalar("SELECT job_id FROM criteria WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::not_found("Criterion", id))?;
        lock_job(&mut tx, job_id).await?;
        fetch_for_update(&mut tx, id).await?;
        ensure_name_available(&mut tx, job_id, &name, Some(id)).await?;

        let criterion = sqlx::query_as::<_, Criterion>(
            r#"
            UPDATE criteria
            SET name = $2, display_order = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, job_id, name, display_order, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&name)
        .bind(payload.display_order)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(criterion)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let criterion = fetch_for_update(&mut tx, id).await?;

        let dependents = dependents_of(&mut tx, &criterion).await?;
        if !dependents.is_empty() {
            return Err(Error::blocked(dependents));
        }

        sqlx::query("DELETE FROM criteria WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(job_id = criterion.job_id, criterion_id = id, "criterion deleted");
        Ok(())
    }

    /// Sets each listed criterion's order to its position. Ids that belong to
    /// another job are left alone; criteria missing from the list keep theirs.
    pub async fn reorder(&self, job_id: i64, ordered_ids: &[i64]) -> Result<Vec<Criterion>> {
        ensure_unique_ids("criterion id", ordered_ids.iter().copied())?;

        let mut tx = self.pool.begin().await?;
        lock_job(&mut tx, job_id).await?;

        for (position, criterion_id) in ordered_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE criteria SET display_order = $1, updated_at = NOW() WHERE id = $2 AND job_id = $3",
            )
            .bind(position as i32)
            .bind(criterion_id)
            .bind(job_id)
            .execute(&mut *tx)
            .await?;
        }

        let criteria = sqlx::query_as::<_, Criterion>(LIST_BY_JOB)
            .bind(job_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(job_id, count = ordered_ids.len(), "criteria reordered");
        Ok(criteria)
    }

    /// Replaces the job's criteria with `names`, keeping criterion ids by
    /// position. Aborts without changes if a criterion to be removed is still
    /// referenced by questions or evaluations.
    pub async fn replace_all(&self, job_id: i64, names: &[String]) -> Result<Vec<Criterion>> {
        let names = normalize_criterion_names(names)?;

        let mut tx = self.pool.begin().await?;
        lock_job(&mut tx, job_id).await?;

        let existing = sqlx::query_as::<_, Criterion>(LIST_BY_JOB_FOR_UPDATE)
            .bind(job_id)
            .fetch_all(&mut *tx)
            .await?;
        let plan = plan_replacement(&existing, &names);

        for criterion in &plan.remove {
            let dependents = dependents_of(&mut tx, criterion).await?;
            if !dependents.is_empty() {
                return Err(Error::blocked(dependents));
            }
        }

        for kept in plan.keep.iter().filter(|kept| kept.changed) {
            sqlx::query(
                "UPDATE criteria SET name = $2, display_order = $3, updated_at = NOW() WHERE id = $1",
            )
            .bind(kept.id)
            .bind(&kept.name)
            .bind(kept.display_order)
            .execute(&mut *tx)
            .await?;
        }

        for new in &plan.create {
            insert_one(&mut tx, job_id, &new.name, new.display_order).await?;
        }

        if !plan.remove.is_empty() {
            let ids: Vec<i64> = plan.remove.iter().map(|c| c.id).collect();
            sqlx::query("DELETE FROM criteria WHERE id = ANY($1)")
                .bind(&ids)
                .execute(&mut *tx)
                .await?;
        }

        let criteria = sqlx::query_as::<_, Criterion>(LIST_BY_JOB)
            .bind(job_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            job_id,
            kept = plan.keep.len(),
            created = plan.create.len(),
            removed = plan.remove.len(),
            "criteria replaced"
        );
        Ok(criteria)
    }
}

/// Inserts `names` at orders `0..n` for a job with no criteria yet.
/// Names must already be normalized.
pub(crate) async fn insert_initial(
    conn: &mut PgConnection,
    job_id: i64,
    names: &[String],
) -> Result<Vec<Criterion>> {
    let mut created = Vec::with_capacity(names.len());
    for (position, name) in names.iter().enumerate() {
        created.push(insert_one(conn, job_id, name, position as i32).await?);
    }
    Ok(created)
}

async fn insert_one(
    conn: &mut PgConnection,
    job_id: i64,
    name: &str,
    display_order: i32,
) -> Result<Criterion> {
    let criterion = sqlx::query_as::<_, Criterion>(
        r#"
        INSERT INTO criteria (job_id, name, display_order)
        VALUES ($1, $2, $3)
        RETURNING id, job_id, name, display_order, created_at, updated_at
        "#,
    )
    .bind(job_id)
    .bind(name)
    .bind(display_order)
    .fetch_one(&mut *conn)
    .await?;
    Ok(criterion)
}

async fn fetch_for_update(conn: &mut PgConnection, id: i64) -> Result<Criterion> {
    sqlx::query_as::<_, Criterion>(
        r#"
        SELECT id, job_id, name, display_order, created_at, updated_at
        FROM criteria
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| Error::not_found("Criterion", id))
}

async fn dependents_of(conn: &mut PgConnection, criterion: &Criterion) -> Result<CriterionDependents> {
    let (questions, evaluations): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM questions WHERE criterion_id = $1),
            (SELECT COUNT(*) FROM evaluations WHERE criterion_id = $1)
        "#,
    )
    .bind(criterion.id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(CriterionDependents {
        criterion_id: criterion.id,
        criterion_name: criterion.name.clone(),
        questions,
        evaluations,
    })
}

async fn ensure_name_available(
    conn: &mut PgConnection,
    job_id: i64,
    name: &str,
    except_id: Option<i64>,
) -> Result<()> {
    let siblings: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, name FROM criteria WHERE job_id = $1")
            .bind(job_id)
            .fetch_all(&mut *conn)
            .await?;

    match find_name_clash(&siblings, name, except_id) {
        Some(existing) => Err(Error::BadRequest(format!(
            "job {} already has a criterion named '{}'",
            job_id, existing
        ))),
        None => Ok(()),
    }
}

/// Sibling whose name matches `name` under `name_key`, skipping `except_id`.
fn find_name_clash<'a>(
    siblings: &'a [(i64, String)],
    name: &str,
    except_id: Option<i64>,
) -> Option<&'a str> {
    let key = name_key(name);
    siblings
        .iter()
        .find(|(id, existing)| Some(*id) != except_id && name_key(existing) == key)
        .map(|(_, existing)| existing.as_str())
}

fn ensure_display_order(order: i32) -> Result<()> {
    if order < 0 {
        return Err(Error::BadRequest(format!(
            "display_order must be zero or greater, got {}",
            order
        )));
    }
    Ok(())
}
