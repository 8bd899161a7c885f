//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000002_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_USER: &str = "user";

/// Whether `role` may manage catalogue content (songs, articles, reports).
pub fn can_edit_content(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_EDITOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_editor_can_edit() {
        assert!(can_edit_content(ROLE_ADMIN));
        assert!(can_edit_content(ROLE_EDITOR));
    }

    #[test]
    fn plain_user_cannot_edit() {
        assert!(!can_edit_content(ROLE_USER));
        assert!(!can_edit_content(""));
    }
}
