use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::db::models::hotels::HotelModel;

/// Insert a hotel if its name is new, updating the stored API key when one
/// is provided. Returns the hotel id either way.
pub async fn upsert_hotel(
    pool: &SqlitePool,
    name: &str,
    api_key: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO hotels (name, api_key)
        VALUES ($1, $2)
        ON CONFLICT(name) DO UPDATE SET api_key = COALESCE(excluded.api_key, hotels.api_key)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(api_key)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// All hotels known to the store, ordered by name.
pub async fn list_hotels(pool: &SqlitePool) -> Result<Vec<HotelModel>, sqlx::Error> {
    sqlx::query_as::<_, HotelModel>(
        r#"
        SELECT id, name, api_key
        FROM hotels
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Mapping of hotel name to id for every stored hotel.
pub async fn get_hotel_id_map(pool: &SqlitePool) -> Result<HashMap<String, i64>, sqlx::Error> {
    let hotels = list_hotels(pool).await?;
    Ok(hotels.into_iter().map(|h| (h.name, h.id)).collect())
}
