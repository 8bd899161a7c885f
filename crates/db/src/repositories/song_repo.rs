//! Repository for `songs`, their artist credits and likes.

use sqlx::{PgPool, Postgres, Transaction};
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;

use crate::models::song::{CreateSong, LikeState, Song, SongFilter, UpdateSong};
use crate::Paged;

/// Song columns plus credited artist ids in credit order. Aliased `s`.
const COLUMNS: &str = "\
    s.id, s.title, s.slug, s.genre, s.duration_secs, s.audio_url, s.cover_url, \
    s.release_date, s.lyrics, s.view_count, s.like_count, \
    ARRAY(SELECT sa.artist_id FROM song_artists sa \
          WHERE sa.song_id = s.id ORDER BY sa.position, sa.artist_id) AS artist_ids, \
    s.deleted_at, s.created_at, s.updated_at";

const LIST_WHERE: &str = "s.deleted_at IS NULL \
    AND ($1::text IS NULL OR s.title ILIKE '%' || $1 || '%') \
    AND ($2::text IS NULL OR s.genre = $2) \
    AND ($3::bigint IS NULL OR EXISTS ( \
        SELECT 1 FROM song_artists sa WHERE sa.song_id = s.id AND sa.artist_id = $3))";

/// Provides CRUD operations for songs.
pub struct SongRepo;

impl SongRepo {
    /// Insert a song and its artist credits in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateSong, slug: &str) -> Result<Song, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let song_id: DbId = sqlx::query_scalar(
            "INSERT INTO songs
                (title, slug, genre, duration_secs, audio_url, cover_url, release_date, lyrics)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&input.title)
        .bind(slug)
        .bind(&input.genre)
        .bind(input.duration_secs)
        .bind(&input.audio_url)
        .bind(&input.cover_url)
        .bind(input.release_date)
        .bind(&input.lyrics)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_artists_inner(&mut tx, song_id, &input.artist_ids).await?;

        let query = format!("SELECT {COLUMNS} FROM songs s WHERE s.id = $1");
        let song = sqlx::query_as::<_, Song>(&query)
            .bind(song_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(song)
    }

    /// Find a song by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Song>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM songs s WHERE s.id = $1 AND s.deleted_at IS NULL");
        sqlx::query_as::<_, Song>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &SongFilter,
        page: Page,
    ) -> Result<Paged<Song>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM songs s WHERE {LIST_WHERE}
             ORDER BY s.created_at DESC, s.id DESC
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, Song>(&query)
            .bind(&filter.q)
            .bind(&filter.genre)
            .bind(filter.artist_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM songs s WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.q)
            .bind(&filter.genre)
            .bind(filter.artist_id)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    /// Update a song. When `artist_ids` is present the credits are replaced
    /// in the same transaction.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSong,
        slug: Option<&str>,
    ) -> Result<Option<Song>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE songs SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                genre = COALESCE($4, genre),
                duration_secs = COALESCE($5, duration_secs),
                audio_url = COALESCE($6, audio_url),
                cover_url = COALESCE($7, cover_url),
                release_date = COALESCE($8, release_date),
                lyrics = COALESCE($9, lyrics)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id",
        )
        .bind(id)
        .bind(&input.title)
        .bind(slug)
        .bind(&input.genre)
        .bind(input.duration_secs)
        .bind(&input.audio_url)
        .bind(&input.cover_url)
        .bind(input.release_date)
        .bind(&input.lyrics)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(artist_ids) = &input.artist_ids {
            Self::set_artists_inner(&mut tx, id, artist_ids).await?;
        }

        let query = format!("SELECT {COLUMNS} FROM songs s WHERE s.id = $1");
        let song = sqlx::query_as::<_, Song>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(song))
    }

    /// Soft-delete a song. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE songs SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Likes
    // -----------------------------------------------------------------------

    /// Like a song. Repeating the like is a no-op.
    ///
    /// Returns `None` when the song does not exist.
    pub async fn like(
        pool: &PgPool,
        song_id: DbId,
        user_id: DbId,
    ) -> Result<Option<LikeState>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock_like_count(&mut tx, song_id).await? else {
            return Ok(None);
        };

        let inserted = sqlx::query(
            "INSERT INTO song_likes (user_id, song_id) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_song_likes_user_song DO NOTHING",
        )
        .bind(user_id)
        .bind(song_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let like_count = if inserted > 0 {
            sqlx::query_scalar(
                "UPDATE songs SET like_count = like_count + 1 WHERE id = $1 RETURNING like_count",
            )
            .bind(song_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            current
        };

        tx.commit().await?;
        Ok(Some(LikeState {
            liked: true,
            like_count,
        }))
    }

    /// Remove a like. Unliking a song that was never liked is a no-op.
    pub async fn unlike(
        pool: &PgPool,
        song_id: DbId,
        user_id: DbId,
    ) -> Result<Option<LikeState>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(current) = Self::lock_like_count(&mut tx, song_id).await? else {
            return Ok(None);
        };

        let deleted = sqlx::query("DELETE FROM song_likes WHERE user_id = $1 AND song_id = $2")
            .bind(user_id)
            .bind(song_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let like_count = if deleted > 0 {
            sqlx::query_scalar(
                "UPDATE songs SET like_count = GREATEST(like_count - 1, 0)
                 WHERE id = $1 RETURNING like_count",
            )
            .bind(song_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            current
        };

        tx.commit().await?;
        Ok(Some(LikeState {
            liked: false,
            like_count,
        }))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn lock_like_count(
        tx: &mut Transaction<'_, Postgres>,
        song_id: DbId,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT like_count FROM songs WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(song_id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Replace artist credits within an existing transaction.
    async fn set_artists_inner(
        tx: &mut Transaction<'_, Postgres>,
        song_id: DbId,
        artist_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM song_artists WHERE song_id = $1")
            .bind(song_id)
            .execute(&mut **tx)
            .await?;

        for (position, &artist_id) in artist_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO song_artists (song_id, artist_id, position) VALUES ($1, $2, $3)
                 ON CONFLICT (song_id, artist_id) DO NOTHING",
            )
            .bind(song_id)
            .bind(artist_id)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
