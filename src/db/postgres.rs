use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::store::{PlaceReviewStore, TrustEdgeStore},
    error::StoreResult,
    models::{
        Coordinates, Place, PlaceCategory, PlaceId, PlaceWithReviews, Review, TrustEdge, UserId,
    },
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the migrations under `migrations/`
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, FromRow)]
struct TrustEdgeRow {
    source_id: Uuid,
    target_id: Uuid,
    trust_level: i32,
    created_at: DateTime<Utc>,
}

impl From<TrustEdgeRow> for TrustEdge {
    fn from(row: TrustEdgeRow) -> Self {
        TrustEdge {
            source: row.source_id,
            target: row.target_id,
            trust_level: row.trust_level,
            created_at: row.created_at,
        }
    }
}

/// Trust edges in the `trust_edges` table
///
/// The `(source_id, target_id)` primary key is what guarantees one edge per
/// ordered pair; unique violations surface as `StoreError::Duplicate`.
#[derive(Clone)]
pub struct PgTrustEdgeStore {
    pool: PgPool,
}

impl PgTrustEdgeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TrustEdgeStore for PgTrustEdgeStore {
    async fn edges_from(&self, source: UserId) -> StoreResult<Vec<TrustEdge>> {
        let rows = sqlx::query_as::<_, TrustEdgeRow>(
            r#"
            SELECT source_id, target_id, trust_level, created_at
            FROM trust_edges
            WHERE source_id = $1
            "#,
        )
        .bind(source)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TrustEdge::from).collect())
    }

    async fn edges_to(&self, target: UserId) -> StoreResult<Vec<TrustEdge>> {
        let rows = sqlx::query_as::<_, TrustEdgeRow>(
            r#"
            SELECT source_id, target_id, trust_level, created_at
            FROM trust_edges
            WHERE target_id = $1
            "#,
        )
        .bind(target)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TrustEdge::from).collect())
    }

    async fn edge_exists(&self, source: UserId, target: UserId) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM trust_edges WHERE source_id = $1 AND target_id = $2
            )
            "#,
        )
        .bind(source)
        .bind(target)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_edge(&self, edge: &TrustEdge) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO trust_edges (source_id, target_id, trust_level, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(edge.source)
        .bind(edge.target)
        .bind(edge.trust_level)
        .bind(edge.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_edge(&self, source: UserId, target: UserId) -> StoreResult<()> {
        sqlx::query("DELETE FROM trust_edges WHERE source_id = $1 AND target_id = $2")
            .bind(source)
            .bind(target)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct PlaceRow {
    id: Uuid,
    name: String,
    category: String,
    city: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    description: Option<String>,
    verified: bool,
    created_at: Option<DateTime<Utc>>,
}

impl PlaceRow {
    fn into_place(self) -> Option<Place> {
        let category = match self.category.parse::<PlaceCategory>() {
            Ok(category) => category,
            Err(e) => {
                tracing::warn!(place_id = %self.id, error = %e, "Skipping place with unknown category");
                return None;
            }
        };

        let coordinates = match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        };

        Some(Place {
            id: self.id,
            name: self.name,
            category,
            city: self.city,
            coordinates,
            description: self.description,
            verified: self.verified,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ReviewRow {
    place_id: Uuid,
    reviewer_id: Uuid,
    ratings: Json<BTreeMap<String, serde_json::Value>>,
    experience_tags: Vec<String>,
    comment: Option<String>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            place_id: row.place_id,
            reviewer_id: row.reviewer_id,
            ratings: row.ratings.0,
            experience_tags: row.experience_tags.into_iter().collect::<BTreeSet<_>>(),
            comment: row.comment,
        }
    }
}

/// Places and reviews in the `places` / `reviews` tables
#[derive(Clone)]
pub struct PgPlaceStore {
    pool: PgPool,
}

impl PgPlaceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PlaceReviewStore for PgPlaceStore {
    async fn places_with_reviews(
        &self,
        city: &str,
        categories: &[PlaceCategory],
        limit: usize,
    ) -> StoreResult<Vec<PlaceWithReviews>> {
        let category_names: Vec<String> = categories.iter().map(|c| c.to_string()).collect();

        let place_rows = sqlx::query_as::<_, PlaceRow>(
            r#"
            SELECT id, name, category, city, latitude, longitude, description, verified, created_at
            FROM places
            WHERE lower(city) = lower($1)
              AND category = ANY($2)
              AND EXISTS (SELECT 1 FROM reviews r WHERE r.place_id = places.id)
            ORDER BY created_at DESC NULLS LAST, name, id
            LIMIT $3
            "#,
        )
        .bind(city.trim())
        .bind(&category_names[..])
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let places: Vec<Place> = place_rows
            .into_iter()
            .filter_map(PlaceRow::into_place)
            .collect();

        if places.is_empty() {
            return Ok(Vec::new());
        }

        let place_ids: Vec<PlaceId> = places.iter().map(|p| p.id).collect();

        let review_rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT place_id, reviewer_id, ratings, experience_tags, comment
            FROM reviews
            WHERE place_id = ANY($1)
            ORDER BY created_at
            "#,
        )
        .bind(&place_ids[..])
        .fetch_all(&self.pool)
        .await?;

        let mut reviews_by_place: HashMap<PlaceId, Vec<Review>> = HashMap::new();
        for row in review_rows {
            reviews_by_place
                .entry(row.place_id)
                .or_default()
                .push(Review::from(row));
        }

        tracing::debug!(
            city = %city,
            place_count = places.len(),
            "Loaded places with reviews"
        );

        Ok(places
            .into_iter()
            .map(|place| PlaceWithReviews {
                reviews: reviews_by_place.remove(&place.id).unwrap_or_default(),
                place,
            })
            .collect())
    }
}
