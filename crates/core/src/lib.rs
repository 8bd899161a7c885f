//! Domain rules for the Soundstage admin backend.
//!
//! This crate has no I/O and no internal dependencies so it can be shared by
//! the repository layer, the HTTP layer, and any future tooling.

pub mod ad_slots;
pub mod engagement;
pub mod error;
pub mod media;
pub mod moderation;
pub mod pagination;
pub mod roles;
pub mod slug;
pub mod subscription;
pub mod types;
