use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::prices::{NewPriceModel, PriceModel};

/// Insert or replace the observation for (run, hotel, stay-date). The key
/// is unique, so a second write for the same key wins.
pub async fn upsert_price(pool: &SqlitePool, new_price: &NewPriceModel) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO prices (run_id, hotel_id, stay_date, currency, price, source)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT(run_id, hotel_id, stay_date) DO UPDATE SET
            currency = excluded.currency,
            price = excluded.price,
            source = excluded.source
        "#,
    )
    .bind(new_price.run_id)
    .bind(new_price.hotel_id)
    .bind(new_price.stay_date)
    .bind(&new_price.currency)
    .bind(new_price.price)
    .bind(&new_price.source)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch every observation belonging to the given runs, in no particular
/// order.
pub async fn get_prices_for_runs(
    pool: &SqlitePool,
    run_ids: &[i64],
) -> Result<Vec<PriceModel>, sqlx::Error> {
    if run_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT run_id, hotel_id, stay_date, price FROM prices WHERE run_id IN (");
    let mut separated = builder.separated(", ");
    for run_id in run_ids {
        separated.push_bind(run_id);
    }
    separated.push_unseparated(")");

    builder.build_query_as::<PriceModel>().fetch_all(pool).await
}

/// Fetch all observations of a single run.
pub async fn get_prices_for_run(
    pool: &SqlitePool,
    run_id: i64,
) -> Result<Vec<PriceModel>, sqlx::Error> {
    sqlx::query_as::<_, PriceModel>(
        r#"
        SELECT run_id, hotel_id, stay_date, price
        FROM prices
        WHERE run_id = $1
        "#,
    )
    .bind(run_id)
    .fetch_all(pool)
    .await
}

/// Observation counts per run, for run listings.
pub async fn price_counts_by_run(
    pool: &SqlitePool,
    run_ids: &[i64],
) -> Result<HashMap<i64, i64>, sqlx::Error> {
    if run_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT run_id, COUNT(*) FROM prices WHERE run_id IN (");
    let mut separated = builder.separated(", ");
    for run_id in run_ids {
        separated.push_bind(run_id);
    }
    separated.push_unseparated(") GROUP BY run_id");

    let rows: Vec<(i64, i64)> = builder.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().collect())
}

/// Earliest and latest stay date observed for a run, if it has any rows.
pub async fn stay_date_bounds(
    pool: &SqlitePool,
    run_id: i64,
) -> Result<Option<(NaiveDate, NaiveDate)>, sqlx::Error> {
    let row: (Option<NaiveDate>, Option<NaiveDate>) = sqlx::query_as(
        r#"
        SELECT MIN(stay_date), MAX(stay_date)
        FROM prices
        WHERE run_id = $1
        "#,
    )
    .bind(run_id)
    .fetch_one(pool)
    .await?;

    match row {
        (Some(min), Some(max)) => Ok(Some((min, max))),
        _ => Ok(None),
    }
}
