use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::wizard::WizardSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Fake,
}

/// Background tint used by the presentation layer for mood tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Yellow,
    Red,
    Blue,
    Green,
    Orange,
    Purple,
    Gray,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mood {
    pub name: String,
    pub emoji: String,
    pub tint: Tint,
}

impl Mood {
    pub fn new(name: &str, emoji: &str, tint: Tint) -> Self {
        Self {
            name: name.to_string(),
            emoji: emoji.to_string(),
            tint,
        }
    }

    pub fn same_as(&self, other: &Mood) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTypeOption {
    pub name: String,
    #[serde(default)]
    pub emoji: Option<String>,
}

impl MealTypeOption {
    pub fn new(name: &str, emoji: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            emoji: emoji.map(str::to_string),
        }
    }

    pub fn same_as(&self, other: &MealTypeOption) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuisineOption {
    pub name: String,
}

/// Set of cuisine names, unique by name, kept in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CuisineSelection(Vec<String>);

impl CuisineSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the cuisine if absent, remove it if present.
    pub fn toggle(&mut self, name: &str) {
        if let Some(pos) = self.0.iter().position(|c| c == name) {
            self.0.remove(pos);
        } else {
            self.0.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRecommendation {
    pub name: String,
    pub description: String,
    pub reason: String,
}

/// A dispatched provider call, tagged with the submit generation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub generation: u64,
    pub mood: String,
    pub meal_type: String,
    pub cuisines: Vec<String>,
}

/// Events published by the controller for presentation layers.
#[derive(Debug, Clone)]
pub enum WizardEvent {
    StateChanged {
        // Boxed to keep the event small; snapshots carry the full result set.
        snapshot: Box<WizardSnapshot>,
    },
    Info(InfoEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InfoEvent {
    Dispatched { generation: u64 },
    DiscardedStale { generation: u64 },
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Dispatched { generation } => {
                format!("Asking the kitchen for ideas (request #{generation})")
            }
            InfoEvent::DiscardedStale { generation } => {
                format!("Ignored a late answer from request #{generation}")
            }
        }
    }
}

/// Serializable output of a one-shot run in JSON mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub generated_at: String,
    pub provider: String,
    pub model: String,
    pub mood: String,
    pub meal_type: String,
    pub cuisines: Vec<String>,
    pub recommendations: Vec<FoodRecommendation>,
}
