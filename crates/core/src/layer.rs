use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Life area a document belongs to.
///
/// Purely a user-facing categorisation; no rule depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Life,
    Growth,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Life => "life",
            Layer::Growth => "growth",
        }
    }
}

impl core::str::FromStr for Layer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "life" => Ok(Layer::Life),
            "growth" => Ok(Layer::Growth),
            other => Err(DomainError::validation(format!(
                "layer must be one of: life, growth (got '{other}')"
            ))),
        }
    }
}
