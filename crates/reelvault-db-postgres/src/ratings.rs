//! Rating repository backed by PostgreSQL.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use uuid::Uuid;

use reelvault_core::MovieRating;
use reelvault_storage::{RatingRepository, StorageError};

use crate::error::to_storage_error;

/// PostgreSQL implementation of [`RatingRepository`].
#[derive(Debug, Clone)]
pub struct PostgresRatingRepository {
    pool: PgPool,
}

impl PostgresRatingRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for PostgresRatingRepository {
    async fn rate_movie(
        &self,
        movie_id: Uuid,
        rating: i32,
        user_id: Uuid,
    ) -> Result<bool, StorageError> {
        let result = query(
            r#"
            insert into ratings (userid, movieid, rating)
            values ($1, $2, $3)
            on conflict (userid, movieid) do update
                set rating = $3
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(rating)
        .execute(&self.pool)
        .await
        .map_err(to_storage_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_rating(&self, movie_id: Uuid) -> Result<Option<f32>, StorageError> {
        let (rating,): (Option<f32>,) = query_as(
            "select round(avg(rating), 1)::real from ratings where movieid = $1",
        )
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await
        .map_err(to_storage_error)?;
        Ok(rating)
    }

    async fn get_user_rating(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Option<f32>, Option<i32>), StorageError> {
        let row: (Option<f32>, Option<i32>) = query_as(
            r#"
            select round(avg(rating), 1)::real,
                   (select rating
                    from ratings
                    where movieid = $1 and userid = $2
                    limit 1)
            from ratings
            where movieid = $1
            "#,
        )
        .bind(movie_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(to_storage_error)?;
        Ok(row)
    }

    async fn delete_rating(&self, movie_id: Uuid, user_id: Uuid) -> Result<bool, StorageError> {
        let result = query("delete from ratings where movieid = $1 and userid = $2")
            .bind(movie_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(to_storage_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_ratings_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MovieRating>, StorageError> {
        let rows: Vec<(Uuid, String, i32)> = query_as(
            r#"
            select r.movieid, m.slug, r.rating
            from ratings r
            inner join movies m on r.movieid = m.id
            where r.userid = $1
            order by m.slug
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(to_storage_error)?;

        Ok(rows
            .into_iter()
            .map(|(movie_id, slug, rating)| MovieRating {
                movie_id,
                slug,
                rating,
            })
            .collect())
    }
}
