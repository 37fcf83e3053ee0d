//! Text matching for AST assertions

#[derive(Debug, Clone)]
pub enum TextMatch {
    Exact(String),
    StartsWith(String),
    Contains(String),
}

impl TextMatch {
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => actual == expected,
            TextMatch::StartsWith(prefix) => actual.starts_with(prefix.as_str()),
            TextMatch::Contains(needle) => actual.contains(needle.as_str()),
        }
    }

    /// Panic with `context` when `actual` does not match.
    pub fn assert(&self, actual: &str, context: &str) {
        let (relation, expected) = match self {
            TextMatch::Exact(text) => ("be", text),
            TextMatch::StartsWith(text) => ("start with", text),
            TextMatch::Contains(text) => ("contain", text),
        };
        assert!(
            self.matches(actual),
            "{}: Expected text to {} {:?}, found {:?}",
            context,
            relation,
            expected,
            actual
        );
    }
}
