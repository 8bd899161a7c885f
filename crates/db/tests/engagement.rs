//! Integration tests for view/click deduplication.

use chrono::{Duration, Utc};
use soundstage_core::engagement::{EventKind, TargetKind, ViewerKey};
use soundstage_db::models::article::CreateArticle;
use soundstage_db::models::user::CreateUser;
use soundstage_db::repositories::{ArticleRepo, EngagementRepo, UserRepo};
use sqlx::PgPool;

async fn seed_article(pool: &PgPool) -> (i64, i64) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: "reader".to_string(),
            email: "reader@example.com".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role_id: 3,
        },
    )
    .await
    .unwrap();
    let article = ArticleRepo::create(
        pool,
        user.id,
        &CreateArticle {
            title: "Festival season".to_string(),
            slug: None,
            summary: None,
            body: "Lineups announced.".to_string(),
            cover_url: None,
            status: Some("published".to_string()),
        },
        "festival-season",
    )
    .await
    .unwrap();
    (user.id, article.id)
}

fn anon(ip: &str, ua: &str) -> ViewerKey {
    ViewerKey::Anonymous {
        ip: ip.to_string(),
        user_agent: ua.to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeat_anonymous_view_within_window_is_not_counted(pool: PgPool) {
    let (_, article_id) = seed_article(&pool).await;
    let now = Utc::now();
    let viewer = anon("203.0.113.9", "Mozilla/5.0");

    let first = EngagementRepo::record(&pool, TargetKind::Article, article_id, EventKind::View, &viewer, now)
        .await
        .unwrap()
        .unwrap();
    assert!(first.counted);
    assert_eq!(first.count, 1);

    let second = EngagementRepo::record(
        &pool,
        TargetKind::Article,
        article_id,
        EventKind::View,
        &viewer,
        now + Duration::hours(3),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(!second.counted);
    assert_eq!(second.count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn different_viewers_each_count(pool: PgPool) {
    let (user_id, article_id) = seed_article(&pool).await;
    let now = Utc::now();

    for viewer in [
        anon("203.0.113.9", "Mozilla/5.0"),
        anon("203.0.113.9", "curl/8.0"),
        anon("198.51.100.1", "Mozilla/5.0"),
        ViewerKey::User(user_id),
    ] {
        let outcome =
            EngagementRepo::record(&pool, TargetKind::Article, article_id, EventKind::View, &viewer, now)
                .await
                .unwrap()
                .unwrap();
        assert!(outcome.counted);
    }

    let article = ArticleRepo::find_by_id(&pool, article_id).await.unwrap().unwrap();
    assert_eq!(article.view_count, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn view_counts_again_after_window(pool: PgPool) {
    let (user_id, article_id) = seed_article(&pool).await;
    let viewer = ViewerKey::User(user_id);
    let earlier = Utc::now() - Duration::hours(25);

    EngagementRepo::record(&pool, TargetKind::Article, article_id, EventKind::View, &viewer, earlier)
        .await
        .unwrap();
    let later = EngagementRepo::record(
        &pool,
        TargetKind::Article,
        article_id,
        EventKind::View,
        &viewer,
        Utc::now(),
    )
    .await
    .unwrap()
    .unwrap();

    assert!(later.counted);
    assert_eq!(later.count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_target_records_nothing(pool: PgPool) {
    let outcome = EngagementRepo::record(
        &pool,
        TargetKind::Song,
        9_999,
        EventKind::View,
        &anon("203.0.113.9", "Mozilla/5.0"),
        Utc::now(),
    )
    .await
    .unwrap();
    assert!(outcome.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn retention_purge_keeps_counters(pool: PgPool) {
    let (_, article_id) = seed_article(&pool).await;
    let old = Utc::now() - Duration::days(120);

    EngagementRepo::record(
        &pool,
        TargetKind::Article,
        article_id,
        EventKind::View,
        &anon("203.0.113.9", "Mozilla/5.0"),
        old,
    )
    .await
    .unwrap();
    EngagementRepo::record(
        &pool,
        TargetKind::Article,
        article_id,
        EventKind::View,
        &anon("198.51.100.1", "Mozilla/5.0"),
        Utc::now(),
    )
    .await
    .unwrap();

    let purged = EngagementRepo::delete_older_than(&pool, Utc::now() - Duration::days(90))
        .await
        .unwrap();
    assert_eq!(purged, 1);

    let totals = EngagementRepo::totals_since(&pool, Utc::now() - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].events, 1);

    let article = ArticleRepo::find_by_id(&pool, article_id).await.unwrap().unwrap();
    assert_eq!(article.view_count, 2);
}
