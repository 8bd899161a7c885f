//! Repository for `playlists` and their ordered `playlist_songs`.

use sqlx::PgPool;
use soundstage_core::pagination::Page;
use soundstage_core::types::DbId;

use crate::models::playlist::{
    CreatePlaylist, Playlist, PlaylistEntry, PlaylistFilter, UpdatePlaylist,
};
use crate::Paged;

/// Playlist columns with the live song count. Aliased `p`.
const COLUMNS: &str = "\
    p.id, p.name, p.description, p.owner_id, p.is_public, \
    (SELECT COUNT(*) FROM playlist_songs ps \
       JOIN songs s ON s.id = ps.song_id AND s.deleted_at IS NULL \
      WHERE ps.playlist_id = p.id) AS song_count, \
    p.deleted_at, p.created_at, p.updated_at";

/// `$3` lifts the privacy filter, `$4` is the viewer.
const LIST_WHERE: &str = "p.deleted_at IS NULL \
    AND ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%') \
    AND ($2::bigint IS NULL OR p.owner_id = $2) \
    AND ($3::bool OR p.is_public OR p.owner_id = $4::bigint)";

/// Provides CRUD operations for playlists.
pub struct PlaylistRepo;

impl PlaylistRepo {
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreatePlaylist,
    ) -> Result<Playlist, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO playlists (name, description, owner_id, is_public)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(owner_id)
        .bind(input.is_public)
        .fetch_one(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM playlists p WHERE p.id = $1");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a playlist by ID regardless of visibility. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Playlist>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM playlists p WHERE p.id = $1 AND p.deleted_at IS NULL");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List playlists visible to `viewer_id`. With `include_private` every
    /// playlist is visible.
    pub async fn list(
        pool: &PgPool,
        filter: &PlaylistFilter,
        viewer_id: Option<DbId>,
        include_private: bool,
        page: Page,
    ) -> Result<Paged<Playlist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM playlists p WHERE {LIST_WHERE}
             ORDER BY p.updated_at DESC, p.id DESC
             LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, Playlist>(&query)
            .bind(&filter.q)
            .bind(filter.owner_id)
            .bind(include_private)
            .bind(viewer_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM playlists p WHERE {LIST_WHERE}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.q)
            .bind(filter.owner_id)
            .bind(include_private)
            .bind(viewer_id)
            .fetch_one(pool)
            .await?;

        Ok(Paged::new(items, total, page))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlaylist,
    ) -> Result<Option<Playlist>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE playlists SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_public = COALESCE($4, is_public)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_public)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Soft-delete a playlist. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE playlists SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Entries
    // -----------------------------------------------------------------------

    /// Songs of a playlist in play order, skipping soft-deleted songs.
    pub async fn list_songs(
        pool: &PgPool,
        playlist_id: DbId,
    ) -> Result<Vec<PlaylistEntry>, sqlx::Error> {
        sqlx::query_as::<_, PlaylistEntry>(
            "SELECT ps.song_id, s.title, s.slug, ps.position, ps.added_at
             FROM playlist_songs ps
             JOIN songs s ON s.id = ps.song_id AND s.deleted_at IS NULL
             WHERE ps.playlist_id = $1
             ORDER BY ps.position ASC",
        )
        .bind(playlist_id)
        .fetch_all(pool)
        .await
    }

    /// Insert a song at `position` (0-based, clamped), shifting later entries
    /// down. Appends when `position` is `None`.
    ///
    /// Returns `false` when the song is already on the playlist.
    pub async fn add_song(
        pool: &PgPool,
        playlist_id: DbId,
        song_id: DbId,
        position: Option<i32>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Serialise concurrent edits of the same playlist.
        sqlx::query("SELECT id FROM playlists WHERE id = $1 FOR UPDATE")
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM playlist_songs WHERE playlist_id = $1 AND song_id = $2)",
        )
        .bind(playlist_id)
        .bind(song_id)
        .fetch_one(&mut *tx)
        .await?;
        if exists {
            return Ok(false);
        }

        let len: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlist_songs WHERE playlist_id = $1")
            .bind(playlist_id)
            .fetch_one(&mut *tx)
            .await?;
        let len = i32::try_from(len).unwrap_or(i32::MAX);
        let at = position.map_or(len, |p| p.clamp(0, len));

        sqlx::query(
            "UPDATE playlist_songs SET position = position + 1
             WHERE playlist_id = $1 AND position >= $2",
        )
        .bind(playlist_id)
        .bind(at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO playlist_songs (playlist_id, song_id, position) VALUES ($1, $2, $3)")
            .bind(playlist_id)
            .bind(song_id)
            .bind(at)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE playlists SET updated_at = NOW() WHERE id = $1")
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Remove a song and close the gap in positions. Returns `false` when the
    /// song was not on the playlist.
    pub async fn remove_song(
        pool: &PgPool,
        playlist_id: DbId,
        song_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed: Option<i32> = sqlx::query_scalar(
            "DELETE FROM playlist_songs WHERE playlist_id = $1 AND song_id = $2 RETURNING position",
        )
        .bind(playlist_id)
        .bind(song_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(position) = removed else {
            return Ok(false);
        };

        sqlx::query(
            "UPDATE playlist_songs SET position = position - 1
             WHERE playlist_id = $1 AND position > $2",
        )
        .bind(playlist_id)
        .bind(position)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE playlists SET updated_at = NOW() WHERE id = $1")
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
