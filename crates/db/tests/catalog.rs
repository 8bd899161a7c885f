//! Integration tests for catalogue writes: song credits, likes, soft delete,
//! playlists and moderation.

use soundstage_db::models::artist::CreateArtist;
use soundstage_db::models::playlist::CreatePlaylist;
use soundstage_db::models::report::{CreateReport, UpdateReportStatus};
use soundstage_db::models::song::{CreateSong, SongFilter, UpdateSong};
use soundstage_db::models::user::CreateUser;
use soundstage_db::repositories::{
    ArtistRepo, PlaylistRepo, ReportRepo, SongRepo, UserRepo,
};
use soundstage_core::pagination::Page;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            role_id: 3,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_artist(pool: &PgPool, name: &str) -> i64 {
    ArtistRepo::create(
        pool,
        &CreateArtist {
            name: name.to_string(),
            slug: None,
            bio: None,
            country: None,
            image_url: None,
            user_id: None,
        },
        &name.to_lowercase().replace(' ', "-"),
    )
    .await
    .unwrap()
    .id
}

fn new_song(title: &str, artist_ids: Vec<i64>) -> CreateSong {
    CreateSong {
        title: title.to_string(),
        slug: None,
        genre: Some("jazz".to_string()),
        duration_secs: Some(215),
        audio_url: None,
        cover_url: None,
        release_date: None,
        lyrics: None,
        artist_ids,
    }
}

// ---------------------------------------------------------------------------
// Songs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn song_credits_keep_order_and_can_be_replaced(pool: PgPool) {
    let a = new_artist(&pool, "Alpha").await;
    let b = new_artist(&pool, "Beta").await;

    let song = SongRepo::create(&pool, &new_song("Duet", vec![b, a]), "duet")
        .await
        .unwrap();
    assert_eq!(song.artist_ids, vec![b, a]);

    let update = UpdateSong {
        artist_ids: Some(vec![a]),
        ..Default::default()
    };
    let updated = SongRepo::update(&pool, song.id, &update, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.artist_ids, vec![a]);
    assert_eq!(updated.title, "Duet");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_credit_insert_rolls_back_the_song(pool: PgPool) {
    let err = SongRepo::create(&pool, &new_song("Orphan", vec![424_242]), "orphan").await;
    assert!(err.is_err());

    let page = SongRepo::list(&pool, &SongFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn soft_deleted_song_is_hidden_and_frozen(pool: PgPool) {
    let a = new_artist(&pool, "Gamma").await;
    let song = SongRepo::create(&pool, &new_song("Gone", vec![a]), "gone")
        .await
        .unwrap();

    assert!(SongRepo::soft_delete(&pool, song.id).await.unwrap());
    assert!(!SongRepo::soft_delete(&pool, song.id).await.unwrap());

    assert!(SongRepo::find_by_id(&pool, song.id).await.unwrap().is_none());
    let filter = SongFilter {
        artist_id: Some(a),
        ..Default::default()
    };
    let page = SongRepo::list(&pool, &filter, Page::default()).await.unwrap();
    assert!(page.items.is_empty());

    let update = UpdateSong {
        title: Some("Back".to_string()),
        ..Default::default()
    };
    assert!(SongRepo::update(&pool, song.id, &update, None)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn likes_are_idempotent(pool: PgPool) {
    let user_id = new_user(&pool, "fan").await;
    let a = new_artist(&pool, "Delta").await;
    let song = SongRepo::create(&pool, &new_song("Hit", vec![a]), "hit")
        .await
        .unwrap();

    let first = SongRepo::like(&pool, song.id, user_id).await.unwrap().unwrap();
    let second = SongRepo::like(&pool, song.id, user_id).await.unwrap().unwrap();
    assert_eq!(first.like_count, 1);
    assert_eq!(second.like_count, 1);

    let unliked = SongRepo::unlike(&pool, song.id, user_id).await.unwrap().unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.like_count, 0);

    let again = SongRepo::unlike(&pool, song.id, user_id).await.unwrap().unwrap();
    assert_eq!(again.like_count, 0);
}

// ---------------------------------------------------------------------------
// Playlists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn playlist_positions_stay_contiguous(pool: PgPool) {
    let owner = new_user(&pool, "curator").await;
    let a = new_artist(&pool, "Epsilon").await;
    let mut songs = Vec::new();
    for title in ["one", "two", "three"] {
        songs.push(
            SongRepo::create(&pool, &new_song(title, vec![a]), title)
                .await
                .unwrap()
                .id,
        );
    }

    let playlist = PlaylistRepo::create(
        &pool,
        owner,
        &CreatePlaylist {
            name: "Mix".to_string(),
            description: None,
            is_public: false,
        },
    )
    .await
    .unwrap();

    assert!(PlaylistRepo::add_song(&pool, playlist.id, songs[0], None).await.unwrap());
    assert!(PlaylistRepo::add_song(&pool, playlist.id, songs[1], None).await.unwrap());
    assert!(PlaylistRepo::add_song(&pool, playlist.id, songs[2], Some(0)).await.unwrap());
    assert!(!PlaylistRepo::add_song(&pool, playlist.id, songs[2], None).await.unwrap());

    let order: Vec<i64> = PlaylistRepo::list_songs(&pool, playlist.id)
        .await
        .unwrap()
        .iter()
        .map(|e| e.song_id)
        .collect();
    assert_eq!(order, vec![songs[2], songs[0], songs[1]]);

    assert!(PlaylistRepo::remove_song(&pool, playlist.id, songs[0]).await.unwrap());
    let entries = PlaylistRepo::list_songs(&pool, playlist.id).await.unwrap();
    let positions: Vec<i32> = entries.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![0, 1]);

    let reloaded = PlaylistRepo::find_by_id(&pool, playlist.id).await.unwrap().unwrap();
    assert_eq!(reloaded.song_count, 2);
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_open_report_violates_unique_index(pool: PgPool) {
    let reporter = new_user(&pool, "watchdog").await;
    let a = new_artist(&pool, "Zeta").await;
    let song = SongRepo::create(&pool, &new_song("Loud", vec![a]), "loud")
        .await
        .unwrap();

    let input = CreateReport {
        entity_type: "song".to_string(),
        entity_id: song.id,
        reason: "spam".to_string(),
        details: None,
    };
    ReportRepo::create(&pool, reporter, &input).await.unwrap();
    let err = ReportRepo::create(&pool, reporter, &input).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_reports_open_per_reporter"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolving_with_hide_soft_deletes_the_content(pool: PgPool) {
    let reporter = new_user(&pool, "reporter").await;
    let moderator = new_user(&pool, "moderator").await;
    let a = new_artist(&pool, "Eta").await;
    let song = SongRepo::create(&pool, &new_song("Stolen", vec![a]), "stolen")
        .await
        .unwrap();

    let report = ReportRepo::create(
        &pool,
        reporter,
        &CreateReport {
            entity_type: "song".to_string(),
            entity_id: song.id,
            reason: "copyright".to_string(),
            details: Some("Uploaded without permission".to_string()),
        },
    )
    .await
    .unwrap();

    let reviewing = UpdateReportStatus {
        status: "reviewing".to_string(),
        resolution_note: None,
        hide_content: false,
    };
    ReportRepo::update_status(&pool, report.id, "open", &reviewing, moderator)
        .await
        .unwrap()
        .unwrap();

    let resolve = UpdateReportStatus {
        status: "resolved".to_string(),
        resolution_note: Some("Taken down".to_string()),
        hide_content: true,
    };
    let resolved = ReportRepo::update_status(&pool, report.id, "reviewing", &resolve, moderator)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(resolved.resolved_by, Some(moderator));
    assert!(resolved.resolved_at.is_some());
    assert!(SongRepo::find_by_id(&pool, song.id).await.unwrap().is_none());
}
