//! Reusable field filters
//!
//! These filters normalize request text before validation

/// Filter: trim surrounding whitespace
pub fn trim() -> impl Fn(String) -> String + Send + Sync + Clone {
    |value: String| {
        let trimmed = value.trim();
        if trimmed.len() == value.len() {
            value
        } else {
            trimmed.to_string()
        }
    }
}

/// Filter: collapse runs of inner whitespace into a single space
pub fn collapse_whitespace() -> impl Fn(String) -> String + Send + Sync + Clone {
    |value: String| value.split_whitespace().collect::<Vec<_>>().join(" ")
}
