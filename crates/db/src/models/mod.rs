//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - A `Deserialize` list filter carrying `limit` / `offset`

pub mod ad_campaign;
pub mod ad_spot;
pub mod article;
pub mod artist;
pub mod client;
pub mod engagement;
pub mod event;
pub mod playlist;
pub mod report;
pub mod role;
pub mod service_provider;
pub mod session;
pub mod song;
pub mod subscription;
pub mod user;
