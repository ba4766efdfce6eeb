//! Resource paths: ordered segments resolved to `<base>/<a>/<b>.json`.

use std::fmt;

/// Suffix selecting the JSON encoding of every resource.
pub const FORMAT_SUFFIX: &str = ".json";

/// An ordered list of string or integer segments naming an API endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    pub fn new(root: impl fmt::Display) -> Self {
        Self {
            segments: vec![root.to_string()],
        }
    }

    /// Appends one segment.
    pub fn push(mut self, segment: impl fmt::Display) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Full URL for this path under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{self}{FORMAT_SUFFIX}", base_url.trim_end_matches('/'))
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment() {
        let path = ResourcePath::new("groups");
        assert_eq!(path.url("https://convore.com/api"), "https://convore.com/api/groups.json");
    }

    #[test]
    fn mixed_string_and_integer_segments() {
        let path = ResourcePath::new("groups").push(42).push("members");
        assert_eq!(path.to_string(), "groups/42/members");
        assert_eq!(
            path.url("https://convore.com/api/"),
            "https://convore.com/api/groups/42/members.json"
        );
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let path = ResourcePath::new("users").push(3);
        assert_eq!(path.url("http://localhost:3000///"), "http://localhost:3000/users/3.json");
    }
}
