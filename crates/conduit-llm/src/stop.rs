//! Client-side stop-token enforcement.
//!
//! The hosted endpoint does not reliably honour stop sequences, so the
//! generated text is cut after the fact.

/// Truncate `text` strictly before the earliest occurrence of any stop token.
///
/// The cut point is the smallest match position across all tokens, not the
/// match of the first-listed token.  Empty tokens are ignored.  Text without
/// any match is returned unchanged.
pub fn enforce_stop_tokens<S: AsRef<str>>(text: &str, stop: &[S]) -> String {
    let cut = stop
        .iter()
        .map(AsRef::as_ref)
        .filter(|token| !token.is_empty())
        .filter_map(|token| text.find(token))
        .min();

    match cut {
        Some(end) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_before_stop_token() {
        assert_eq!(enforce_stop_tokens("Hello world, friend", &["world"]), "Hello ");
    }

    #[test]
    fn earliest_position_wins_over_list_order() {
        let text = "alpha beta gamma";
        assert_eq!(enforce_stop_tokens(text, &["gamma", "beta"]), "alpha ");
    }

    #[test]
    fn no_match_returns_text_unchanged() {
        assert_eq!(enforce_stop_tokens("Hello", &["xyz"]), "Hello");
    }

    #[test]
    fn empty_token_list_is_a_no_op() {
        let none: [&str; 0] = [];
        assert_eq!(enforce_stop_tokens("Hello", &none), "Hello");
    }

    #[test]
    fn empty_tokens_are_ignored() {
        assert_eq!(enforce_stop_tokens("Hello world", &["", "wor"]), "Hello ");
    }

    #[test]
    fn stop_at_start_yields_empty_text() {
        assert_eq!(enforce_stop_tokens("\nHuman: hi", &["\n"]), "");
    }

    #[test]
    fn handles_multibyte_text() {
        assert_eq!(enforce_stop_tokens("héllo wörld", &["wö"]), "héllo ");
    }
}
