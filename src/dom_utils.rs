//! dom_utils.rs – thin helper layer for class-token manipulation.
//!
//! Every backend stores classes as a single space separated `class`
//! attribute, so add / remove / has are plain string operations that are
//! easy to unit test without a browser.

/// Does the whitespace separated `list` contain `token`?
pub fn has_token(list: &str, token: &str) -> bool {
    !token.is_empty() && list.split_whitespace().any(|t| t == token)
}

/// Return `list` with `token` appended when it is not already present.
pub fn add_token(list: &str, token: &str) -> String {
    if token.is_empty() || has_token(list, token) {
        return list.to_string();
    }
    let trimmed = list.trim();
    if trimmed.is_empty() {
        token.to_string()
    } else {
        format!("{} {}", trimmed, token)
    }
}

/// Return `list` with every occurrence of `token` removed.
pub fn remove_token(list: &str, token: &str) -> String {
    list.split_whitespace()
        .filter(|t| *t != token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join class fragments with single spaces, skipping empty ones.
pub fn join_classes<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let once = add_token("a b", "c");
        assert_eq!(once, "a b c");
        assert_eq!(add_token(&once, "c"), "a b c");
        assert_eq!(add_token("", "c"), "c");
    }

    #[test]
    fn remove_drops_every_occurrence() {
        assert_eq!(remove_token("a c b c", "c"), "a b");
        assert_eq!(remove_token("a", "zzz"), "a");
    }

    #[test]
    fn has_token_matches_whole_words_only() {
        assert!(has_token("ReactModal__Body--open x", "ReactModal__Body--open"));
        assert!(!has_token("ReactModal__Body--opened", "ReactModal__Body--open"));
        assert!(!has_token("a b", ""));
    }

    #[test]
    fn join_skips_blank_fragments() {
        assert_eq!(join_classes(["base", "", "  ", "extra "]), "base extra");
    }
}
