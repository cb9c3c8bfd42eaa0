//! Photo gallery entries.

use core::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::GalleryImageId;

/// Gallery category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryCategory {
    Event,
    Training,
    Race,
    Community,
    Location,
}

impl GalleryCategory {
    /// All categories in display order.
    pub const ALL: [Self; 5] = [
        Self::Event,
        Self::Training,
        Self::Race,
        Self::Community,
        Self::Location,
    ];

    /// Slug used in data files and filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Training => "training",
            Self::Race => "race",
            Self::Community => "community",
            Self::Location => "location",
        }
    }

    /// Heading shown on filter chips.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Event => "EVENTS",
            Self::Training => "TRAINING",
            Self::Race => "RACES",
            Self::Community => "COMMUNITY",
            Self::Location => "LOCATIONS",
        }
    }
}

impl fmt::Display for GalleryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GalleryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid gallery category: {s}"))
    }
}

/// A photo in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: GalleryImageId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    pub category: GalleryCategory,
    pub location: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub photographer: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub views: Option<u64>,
    pub width: u32,
    pub height: u32,
}
