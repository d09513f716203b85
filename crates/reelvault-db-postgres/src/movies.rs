//! Movie repository backed by PostgreSQL.

use async_trait::async_trait;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use uuid::Uuid;

use reelvault_core::{ListOptions, Movie, SortField, SortOrder};
use reelvault_storage::{MovieRepository, StorageError};

use crate::error::to_storage_error;

/// PostgreSQL implementation of [`MovieRepository`].
///
/// Rows carry the movie columns plus the aggregate rating and, when a
/// requesting user is known, that user's own rating via a second join on
/// `ratings`.
#[derive(Debug, Clone)]
pub struct PostgresMovieRepository {
    pool: PgPool,
}

impl PostgresMovieRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn genres_for(&self, movie_id: Uuid) -> Result<Vec<String>, StorageError> {
        let rows: Vec<(String,)> = query_as("select name from genres where movieid = $1")
            .bind(movie_id)
            .fetch_all(&self.pool)
            .await
            .map_err(to_storage_error)?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}

type MovieRow = (Uuid, String, i32, Option<f32>, Option<i32>);
type MovieListRow = (Uuid, String, i32, Option<Vec<String>>, Option<f32>, Option<i32>);

fn from_row(row: MovieRow, genres: Vec<String>) -> Movie {
    Movie {
        id: row.0,
        title: row.1,
        year_of_release: row.2,
        genres,
        rating: row.3,
        user_rating: row.4,
    }
}

/// ORDER BY fragment for the fixed sort-field enum. Built from enum
/// variants only, never from raw client input.
fn order_clause(options: &ListOptions) -> &'static str {
    let Some(field) = options.sort_field else {
        return "";
    };
    match (field, options.sort_order) {
        (SortField::Title, SortOrder::Ascending) => "order by m.title asc",
        (SortField::Title, SortOrder::Descending) => "order by m.title desc",
        (SortField::YearOfRelease, SortOrder::Ascending) => "order by m.yearofrelease asc",
        (SortField::YearOfRelease, SortOrder::Descending) => "order by m.yearofrelease desc",
    }
}

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn create(&self, movie: &Movie) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(to_storage_error)?;

        let result = query(
            r#"
            insert into movies (id, slug, title, yearofrelease)
            values ($1, $2, $3, $4)
            "#,
        )
        .bind(movie.id)
        .bind(movie.slug())
        .bind(&movie.title)
        .bind(movie.year_of_release)
        .execute(&mut *tx)
        .await
        .map_err(to_storage_error)?;

        for genre in &movie.genres {
            query("insert into genres (movieid, name) values ($1, $2)")
                .bind(movie.id)
                .bind(genre)
                .execute(&mut *tx)
                .await
                .map_err(to_storage_error)?;
        }

        tx.commit().await.map_err(to_storage_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_by_id(
        &self,
        id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<Option<Movie>, StorageError> {
        let row: Option<MovieRow> = query_as(
            r#"
            select m.id, m.title, m.yearofrelease,
                   round(avg(r.rating), 1)::real as rating,
                   myr.rating as userrating
            from movies m
            left join ratings r on m.id = r.movieid
            left join ratings myr on m.id = myr.movieid and myr.userid = $2
            where m.id = $1
            group by m.id, myr.rating
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(to_storage_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let genres = self.genres_for(row.0).await?;
        Ok(Some(from_row(row, genres)))
    }

    async fn get_by_slug(
        &self,
        slug: &str,
        user_id: Option<Uuid>,
    ) -> Result<Option<Movie>, StorageError> {
        let row: Option<MovieRow> = query_as(
            r#"
            select m.id, m.title, m.yearofrelease,
                   round(avg(r.rating), 1)::real as rating,
                   myr.rating as userrating
            from movies m
            left join ratings r on m.id = r.movieid
            left join ratings myr on m.id = myr.movieid and myr.userid = $2
            where m.slug = $1
            group by m.id, myr.rating
            "#,
        )
        .bind(slug)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(to_storage_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let genres = self.genres_for(row.0).await?;
        Ok(Some(from_row(row, genres)))
    }

    async fn get_all(&self, options: &ListOptions) -> Result<Vec<Movie>, StorageError> {
        let sql = format!(
            r#"
            select m.id, m.title, m.yearofrelease,
                   array_agg(distinct g.name) filter (where g.name is not null) as genres,
                   round(avg(r.rating), 1)::real as rating,
                   myr.rating as userrating
            from movies m
            left join genres g on m.id = g.movieid
            left join ratings r on m.id = r.movieid
            left join ratings myr on m.id = myr.movieid and myr.userid = $3
            where ($1::text is null or m.title like ('%' || $1 || '%'))
              and ($2::integer is null or m.yearofrelease = $2)
            group by m.id, myr.rating
            {}
            limit $4 offset $5
            "#,
            order_clause(options)
        );

        let rows: Vec<MovieListRow> = query_as(&sql)
            .bind(options.title.as_deref())
            .bind(options.year_of_release)
            .bind(options.user_id)
            .bind(i64::from(options.page_size))
            .bind(options.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(to_storage_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, title, year, genres, rating, user_rating)| Movie {
                id,
                title,
                year_of_release: year,
                genres: genres.unwrap_or_default(),
                rating,
                user_rating,
            })
            .collect())
    }

    async fn get_count(
        &self,
        title: Option<&str>,
        year_of_release: Option<i32>,
    ) -> Result<u64, StorageError> {
        let (count,): (i64,) = query_as(
            r#"
            select count(id)
            from movies
            where ($1::text is null or title like ('%' || $1 || '%'))
              and ($2::integer is null or yearofrelease = $2)
            "#,
        )
        .bind(title)
        .bind(year_of_release)
        .fetch_one(&self.pool)
        .await
        .map_err(to_storage_error)?;
        Ok(count as u64)
    }

    async fn update(&self, movie: &Movie) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(to_storage_error)?;

        let result = query(
            r#"
            update movies
            set slug = $1, title = $2, yearofrelease = $3
            where id = $4
            "#,
        )
        .bind(movie.slug())
        .bind(&movie.title)
        .bind(movie.year_of_release)
        .bind(movie.id)
        .execute(&mut *tx)
        .await
        .map_err(to_storage_error)?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        query("delete from genres where movieid = $1")
            .bind(movie.id)
            .execute(&mut *tx)
            .await
            .map_err(to_storage_error)?;

        for genre in &movie.genres {
            query("insert into genres (movieid, name) values ($1, $2)")
                .bind(movie.id)
                .bind(genre)
                .execute(&mut *tx)
                .await
                .map_err(to_storage_error)?;
        }

        tx.commit().await.map_err(to_storage_error)?;
        Ok(true)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(to_storage_error)?;

        query("delete from ratings where movieid = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(to_storage_error)?;

        query("delete from genres where movieid = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(to_storage_error)?;

        let result = query("delete from movies where id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(to_storage_error)?;

        tx.commit().await.map_err(to_storage_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
        let (exists,): (bool,) =
            query_as("select exists(select 1 from movies where id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(to_storage_error)?;
        Ok(exists)
    }
}
