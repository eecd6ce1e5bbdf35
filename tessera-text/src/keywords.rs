//! Keyword highlighting — which lines get the keyword text style.
//!
//! Keywords arrive as one comma-separated string from the settings form
//! (`"sale, today ,NEW"`). Terms are trimmed, lowercased and empty ones
//! dropped; order is kept because the first matching term wins.

/// Parsed keyword list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordList {
    terms: Vec<String>,
}

impl KeywordList {
    pub fn parse(raw: &str) -> Self {
        let terms = raw
            .split(',')
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// First term (in list order) contained in `content`, ignoring case.
    pub fn first_match(&self, content: &str) -> Option<&str> {
        if self.terms.is_empty() {
            return None;
        }
        let haystack = content.to_lowercase();
        self.terms
            .iter()
            .find(|term| haystack.contains(term.as_str()))
            .map(String::as_str)
    }
}
