use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// A row of the `listings` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A listing joined with its owner's name and email, for the admin panel.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ListingWithOwner {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub user_name: String,
    pub user_email: String,
}

/// Dashboard row: one of the newest listings with its owner's name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecentListing {
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user_name: String,
}

impl Listing {
    /// Every listing owned by `user_id`. The mobile ranking path loads the
    /// full owned set; the sort key is computed, so there is no SQL-side
    /// paging here.
    pub async fn all_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Listing>> {
        let rows = sqlx::query_as::<_, Listing>(
            r#"
            SELECT id, name, description, latitude, longitude, user_id, created_at, updated_at
            FROM listings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            SELECT id, name, description, latitude, longitude, user_id, created_at, updated_at
            FROM listings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(listing)
    }

    pub async fn find_with_owner(db: &PgPool, id: i64) -> anyhow::Result<Option<ListingWithOwner>> {
        let listing = sqlx::query_as::<_, ListingWithOwner>(
            r#"
            SELECT l.id, l.name, l.description, l.latitude, l.longitude, l.user_id,
                   l.created_at, l.updated_at,
                   u.name AS user_name, u.email AS user_email
            FROM listings l
            JOIN users u ON u.id = l.user_id
            WHERE l.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(listing)
    }

    pub async fn list_with_owner(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<ListingWithOwner>> {
        let rows = sqlx::query_as::<_, ListingWithOwner>(
            r#"
            SELECT l.id, l.name, l.description, l.latitude, l.longitude, l.user_id,
                   l.created_at, l.updated_at,
                   u.name AS user_name, u.email AS user_email
            FROM listings l
            JOIN users u ON u.id = l.user_id
            ORDER BY l.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM listings")
            .fetch_one(db)
            .await?;
        Ok(total)
    }

    pub async fn recent_with_owner(db: &PgPool, limit: i64) -> anyhow::Result<Vec<RecentListing>> {
        let rows = sqlx::query_as::<_, RecentListing>(
            r#"
            SELECT l.name, l.created_at, u.name AS user_name
            FROM listings l
            JOIN users u ON u.id = l.user_id
            ORDER BY l.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        description: &str,
        latitude: f64,
        longitude: f64,
        user_id: i64,
    ) -> anyhow::Result<Listing> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            INSERT INTO listings (name, description, latitude, longitude, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, latitude, longitude, user_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(latitude)
        .bind(longitude)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(listing)
    }

    /// Partial update: `None` fields keep their prior value. Returns the
    /// updated row, or `None` if the listing vanished in the meantime.
    pub async fn update(
        db: &PgPool,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        user_id: Option<i64>,
    ) -> anyhow::Result<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            UPDATE listings SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                user_id = COALESCE($6, user_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, latitude, longitude, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(latitude)
        .bind(longitude)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(listing)
    }

    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
