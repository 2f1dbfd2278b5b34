use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::runs::{NewRunModel, RunModel};

/// Insert a run record and return its id.
pub async fn insert_run(pool: &SqlitePool, new_run: &NewRunModel) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO runs (run_timestamp, start_date, end_date, note)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(new_run.run_timestamp)
    .bind(new_run.start_date)
    .bind(new_run.end_date)
    .bind(&new_run.note)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Fetch runs ordered by timestamp descending (most recent first).
pub async fn fetch_runs(
    pool: &SqlitePool,
    limit: Option<i64>,
) -> Result<Vec<RunModel>, sqlx::Error> {
    sqlx::query_as::<_, RunModel>(
        r#"
        SELECT id, run_timestamp, start_date, end_date, note
        FROM runs
        ORDER BY run_timestamp DESC
        LIMIT $1
        "#,
    )
    .bind(limit.unwrap_or(-1))
    .fetch_all(pool)
    .await
}

/// Fetch a single run by id.
pub async fn get_run(pool: &SqlitePool, run_id: i64) -> Result<Option<RunModel>, sqlx::Error> {
    sqlx::query_as::<_, RunModel>(
        r#"
        SELECT id, run_timestamp, start_date, end_date, note
        FROM runs
        WHERE id = $1
        "#,
    )
    .bind(run_id)
    .fetch_optional(pool)
    .await
}

/// Fetch the most recent run, if any.
pub async fn latest_run(pool: &SqlitePool) -> Result<Option<RunModel>, sqlx::Error> {
    sqlx::query_as::<_, RunModel>(
        r#"
        SELECT id, run_timestamp, start_date, end_date, note
        FROM runs
        ORDER BY run_timestamp DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
}

/// Ids of runs whose timestamp falls within the given bounds, inclusive.
pub async fn run_ids_between(
    pool: &SqlitePool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        r#"
        SELECT id FROM runs
        WHERE run_timestamp >= $1 AND run_timestamp <= $2
        ORDER BY run_timestamp DESC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Delete a run and its prices. Prices are deleted explicitly so the result
/// does not depend on the foreign_keys pragma. Returns
/// (prices_deleted, runs_deleted).
pub async fn delete_run(pool: &SqlitePool, run_id: i64) -> Result<(u64, u64), sqlx::Error> {
    let prices = sqlx::query("DELETE FROM prices WHERE run_id = $1")
        .bind(run_id)
        .execute(pool)
        .await?
        .rows_affected();
    let runs = sqlx::query("DELETE FROM runs WHERE id = $1")
        .bind(run_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok((prices, runs))
}
