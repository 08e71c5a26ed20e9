pub mod gemini;
pub mod newsapi;
pub mod traits;

pub use gemini::GeminiClient;
pub use newsapi::NewsApiClient;
pub use traits::{ChatTurn, GenerationError, NewsSource, Role, TextGenerator};

/// Collapse a response body into a single short line for error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const BODY_CAP_CHARS: usize = 300;
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > BODY_CAP_CHARS {
        let cut: String = flat.chars().take(BODY_CAP_CHARS).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_flattens_and_caps() {
        assert_eq!(truncate_body("a\n  b\tc"), "a b c");
        let long = "x".repeat(400);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 303);
    }
}
