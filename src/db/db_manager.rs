use std::collections::HashMap;

use sqlx::SqlitePool;

use super::connection;
use super::models::runs::NewRunModel;
use super::queries::{hotels as hotels_queries, runs as runs_queries};
use super::schema;
use crate::config::HotelConfig;

/// Owns the connection pool and a name -> id map of known hotels.
pub struct DbManager {
    pub pool: SqlitePool,
    pub hotel_id_map: HashMap<String, i64>,
}

impl DbManager {
    /// Creates a new database connection and initializes the schema
    pub async fn init(db_path: &str) -> Result<Self, sqlx::Error> {
        let pool = connection::create_pool(db_path).await?;

        // Ensure schema is initialized (creates tables if needed)
        schema::init_schema(&pool).await?;

        let hotel_id_map = hotels_queries::get_hotel_id_map(&pool).await?;

        Ok(Self { pool, hotel_id_map })
    }

    /// Add all configured hotels if not already present, and update
    /// `hotel_id_map`. Existing hotels pick up a configured API key.
    pub async fn sync_hotels(&mut self, hotels: &[HotelConfig]) -> Result<(), sqlx::Error> {
        for hotel in hotels {
            let id =
                hotels_queries::upsert_hotel(&self.pool, &hotel.name, hotel.key.as_deref()).await?;
            self.hotel_id_map.insert(hotel.name.clone(), id);
        }
        Ok(())
    }

    /// Hotel id for `name`, creating the hotel lazily on first reference.
    pub async fn ensure_hotel(&mut self, name: &str) -> Result<i64, sqlx::Error> {
        if let Some(id) = self.hotel_id_map.get(name) {
            return Ok(*id);
        }
        let id = hotels_queries::upsert_hotel(&self.pool, name, None).await?;
        self.hotel_id_map.insert(name.to_string(), id);
        Ok(id)
    }

    pub async fn create_run(&self, new_run: &NewRunModel) -> Result<i64, sqlx::Error> {
        runs_queries::insert_run(&self.pool, new_run).await
    }

    /// Delete everything. Returns (prices, runs, hotels) rows removed.
    pub async fn reset_all(&mut self) -> Result<(u64, u64, u64), sqlx::Error> {
        let prices = sqlx::query("DELETE FROM prices")
            .execute(&self.pool)
            .await?
            .rows_affected();
        let runs = sqlx::query("DELETE FROM runs")
            .execute(&self.pool)
            .await?
            .rows_affected();
        let hotels = sqlx::query("DELETE FROM hotels")
            .execute(&self.pool)
            .await?
            .rows_affected();
        self.hotel_id_map.clear();
        Ok((prices, runs, hotels))
    }
}
