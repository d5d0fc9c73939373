use serde::{Deserialize, Serialize};

/// Fixed category set for gallery prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Nature,
    Art,
    Design,
    Characters,
    Fantasy,
    Architecture,
    Abstract,
    Portrait,
}

impl Category {
    pub const ALL: [Self; 8] = [
        Self::Nature,
        Self::Art,
        Self::Design,
        Self::Characters,
        Self::Fantasy,
        Self::Architecture,
        Self::Abstract,
        Self::Portrait,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nature => "nature",
            Self::Art => "art",
            Self::Design => "design",
            Self::Characters => "characters",
            Self::Fantasy => "fantasy",
            Self::Architecture => "architecture",
            Self::Abstract => "abstract",
            Self::Portrait => "portrait",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order for gallery listings. `Popular` (usage-based) is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    Recent,
    MostLiked,
    #[default]
    Popular,
}

impl SortBy {
    /// Unrecognized values fall back to the default rather than erroring.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "recent" => Self::Recent,
            "mostLiked" => Self::MostLiked,
            _ => Self::Popular,
        }
    }
}

/// Optional filters for listing prompts, combined with logical AND.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub category: Option<Category>,
    pub min_likes: Option<i32>,
    pub sort_by: SortBy,
}

/// A validated prompt submission, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewPrompt {
    pub title: String,
    pub prompt_text: String,
    pub description: String,
    pub category: Category,
}
