//! Category - Life area a quest belongs to

use serde::{Deserialize, Serialize};

/// Quest category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Body,
    Mind,
    Environment,
    #[default]
    Projects,
    Social,
}

impl Category {
    /// Display name shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Category::Body => "Corps",
            Category::Mind => "Esprit",
            Category::Environment => "Environnement",
            Category::Projects => "Projets",
            Category::Social => "Social",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Body => write!(f, "body"),
            Category::Mind => write!(f, "mind"),
            Category::Environment => write!(f, "environment"),
            Category::Projects => write!(f, "projects"),
            Category::Social => write!(f, "social"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "body" => Ok(Category::Body),
            "mind" => Ok(Category::Mind),
            "environment" => Ok(Category::Environment),
            "projects" => Ok(Category::Projects),
            "social" => Ok(Category::Social),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}
