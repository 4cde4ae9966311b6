use serde::{Deserialize, Serialize};

pub fn normalize_text(input: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    // Remove diacritics by decomposing to NFD and filtering combining marks
    input
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// How two text fields are compared at one matching site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    #[default]
    Exact,
    IgnoreCase,
    /// Case-, accent- and surrounding-whitespace-insensitive.
    Folded,
}

impl TextMatch {
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            Self::Exact => a == b,
            Self::IgnoreCase => a == b || a.to_lowercase() == b.to_lowercase(),
            Self::Folded => normalize_text(a) == normalize_text(b),
        }
    }

    /// Key under which values compare equal, for hash lookups.
    pub fn key(self, s: &str) -> String {
        match self {
            Self::Exact => s.to_string(),
            Self::IgnoreCase => s.to_lowercase(),
            Self::Folded => normalize_text(s),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::IgnoreCase => "ignore_case",
            Self::Folded => "folded",
        }
    }
}

impl std::fmt::Display for TextMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One comparison mode per matching site used by the alert reports.
///
/// The defaults keep address and name joins exact while city and last-name
/// lookups ignore case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    pub address: TextMatch,
    pub name: TextMatch,
    pub city: TextMatch,
    pub last_name: TextMatch,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            address: TextMatch::Exact,
            name: TextMatch::Exact,
            city: TextMatch::IgnoreCase,
            last_name: TextMatch::IgnoreCase,
        }
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "address={} name={} city={} last_name={}",
            self.address, self.name, self.city, self.last_name
        )
    }
}

impl MatchPolicy {
    pub fn same_address(&self, a: &str, b: &str) -> bool {
        self.address.matches(a, b)
    }

    pub fn same_name(&self, first_a: &str, last_a: &str, first_b: &str, last_b: &str) -> bool {
        self.name.matches(first_a, first_b) && self.name.matches(last_a, last_b)
    }

    pub fn same_city(&self, a: &str, b: &str) -> bool {
        self.city.matches(a, b)
    }

    pub fn same_last_name(&self, a: &str, b: &str) -> bool {
        self.last_name.matches(a, b)
    }
}
