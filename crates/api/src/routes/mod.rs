pub mod ad_campaigns;
pub mod ad_spots;
pub mod admin;
pub mod articles;
pub mod artists;
pub mod auth;
pub mod clients;
pub mod events;
pub mod health;
pub mod playlists;
pub mod reports;
pub mod service_providers;
pub mod songs;
pub mod subscription_plans;
pub mod subscriptions;
pub mod uploads;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register, /auth/login, /auth/refresh       public
/// /auth/logout, /auth/me                           requires auth
///
/// /admin/users[/{id}[/reset-password]]             admin
/// /admin/subscriptions/expire-due                  admin
/// /admin/analytics/summary                         admin
///
/// /artists, /songs, /articles, /events             public reads, editor writes
/// /service-providers                               public reads, editor writes
/// /songs/{id}/like                                 requires auth
/// /{songs,articles,events}/{id}/view               public, optional auth
///
/// /clients                                         admin
/// /ad-spots                                        public reads, admin writes
/// /ad-spots/{id}/campaigns/live                    public
/// /ad-spots/{id}/availability                      public
/// /ad-campaigns                                    admin
/// /ad-campaigns/{id}/view, /{id}/click             public, optional auth
///
/// /subscription-plans                              public reads, admin writes
/// /subscriptions                                   requires auth
///
/// /playlists                                       public/owner reads, owner writes
/// /reports                                         auth files, editor moderates
/// /uploads                                         editor
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/artists", artists::router())
        .nest("/songs", songs::router())
        .nest("/articles", articles::router())
        .nest("/events", events::router())
        .nest("/clients", clients::router())
        .nest("/ad-spots", ad_spots::router())
        .nest("/ad-campaigns", ad_campaigns::router())
        .nest("/subscription-plans", subscription_plans::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/service-providers", service_providers::router())
        .nest("/playlists", playlists::router())
        .nest("/reports", reports::router())
        .nest("/uploads", uploads::router(config.upload_max_bytes))
}
