//! Feedback - Thumbs up/down attached to a quest after the fact

use serde::{Deserialize, Serialize};

/// User feedback on a generated quest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Up,
    Down,
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feedback::Up => write!(f, "up"),
            Feedback::Down => write!(f, "down"),
        }
    }
}

impl std::str::FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Feedback::Up),
            "down" => Ok(Feedback::Down),
            _ => Err(format!("Unknown feedback: {}", s)),
        }
    }
}
