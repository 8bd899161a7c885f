//! URL slug generation for catalogue entities.

/// Longest slug produced by [`slugify`].
pub const MAX_SLUG_LENGTH: usize = 120;

/// Turn a display name into a lowercase, hyphen-separated ASCII slug.
///
/// Non-alphanumeric runs collapse into a single hyphen; leading and trailing
/// hyphens are dropped. Returns an empty string when nothing usable remains.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
        if slug.len() >= MAX_SLUG_LENGTH {
            break;
        }
    }

    slug.truncate(MAX_SLUG_LENGTH);
    slug.trim_end_matches('-').to_string()
}

/// Use the client-provided slug when present, otherwise derive one from `name`.
pub fn slug_or_derive(explicit: Option<&str>, name: &str) -> String {
    match explicit.map(slugify) {
        Some(s) if !s.is_empty() => s,
        _ => slugify(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_punctuation_and_spaces() {
        assert_eq!(slugify("  The Beatles -- Live!  "), "the-beatles-live");
    }

    #[test]
    fn non_ascii_is_dropped() {
        assert_eq!(slugify("Björk"), "bj-rk");
        assert_eq!(slugify("日本"), "");
    }

    #[test]
    fn length_is_capped() {
        let long = "a".repeat(500);
        assert_eq!(slugify(&long).len(), MAX_SLUG_LENGTH);
    }

    #[test]
    fn explicit_slug_wins_when_usable() {
        assert_eq!(slug_or_derive(Some("My Slug"), "Name"), "my-slug");
        assert_eq!(slug_or_derive(Some("!!!"), "Name Here"), "name-here");
        assert_eq!(slug_or_derive(None, "Name Here"), "name-here");
    }
}
