use sqlx::FromRow;

/// A tracked hotel. Identity is the unique name; `id` is the surrogate key
/// the prices table references.
#[derive(Debug, Clone, FromRow)]
pub struct HotelModel {
    pub id: i64,
    pub name: String,
    pub api_key: Option<String>,
}
