//! Run configuration.
//!
//! The built-in configuration names eleven stock images expected in the
//! working directory and the fifty-five asset paths a site template
//! references under `images/`. A JSON file can replace any of these fields.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::EngineError;
use crate::model::DestinationSpec;

const DEFAULT_SOURCES: &[&str] = &[
    "download (1).jpg",
    "download (2).jpg",
    "download (3).jpg",
    "download (4).jpg",
    "download.jpg",
    "images (1).jpg",
    "images (2).jpg",
    "images (3).jpg",
    "images (4).jpg",
    "images (5).jpg",
    "images.jpg",
];

const DEFAULT_DESTINATIONS: &[&str] = &[
    "images/1.svg",
    "images/2.svg",
    "images/3.svg",
    "images/alumni_m.jpg",
    "images/alumni.jpg",
    "images/aops-academy.svg",
    "images/aops-ba.svg",
    "images/aops-logo-dev.svg",
    "images/aops-logo.png",
    "images/aops-logo.svg",
    "images/aops-modal-help-sprite.png",
    "images/aops-online-footer.svg",
    "images/aops-online-mobile.svg",
    "images/aops-online.svg",
    "images/bellevue.png",
    "images/bg-hive.svg",
    "images/bronze.svg",
    "images/fa-chevron-right.svg",
    "images/facebook.svg",
    "images/frisco.png",
    "images/gold.svg",
    "images/hamburger.svg",
    "images/hero-circle.svg",
    "images/hero-galaxy-curve-dt.png",
    "images/hero-galaxy-curve.png",
    "images/icon-academy.svg",
    "images/icon-ba.svg",
    "images/icon-online.svg",
    "images/icon-search.svg",
    "images/IMO-2024-full-team-mobile.jpg",
    "images/IMO-2024-full-team.jpg",
    "images/member0.png",
    "images/member1.png",
    "images/member2.png",
    "images/member3.png",
    "images/member4.png",
    "images/member5.png",
    "images/online-android-chrome-192x192.png",
    "images/online-apple-touch-icon.png",
    "images/online-favicon.ico",
    "images/pattern-aops.png",
    "images/pattern-online-gray.png",
    "images/pinterest.svg",
    "images/princeton.png",
    "images/sandiego-cv.png",
    "images/santaclara.png",
    "images/silver.svg",
    "images/sp-atlantic.svg",
    "images/sp-forbes.svg",
    "images/sp-newyorker.svg",
    "images/sp-quanta.svg",
    "images/sp-wired.svg",
    "images/subscribe_blob.svg",
    "images/twitter.svg",
    "images/wasc.png",
];

/// What to copy from, what to produce, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicatorConfig {
    /// Candidate source file names, relative to the root
    pub sources: Vec<String>,

    /// Destination paths; only the basename is used inside `destination_dir`
    pub destinations: Vec<String>,

    /// Output directory, relative to the root
    pub destination_dir: PathBuf,

    /// Name of the mapping CSV written inside `destination_dir`
    pub mapping_file: String,
}

impl Default for DuplicatorConfig {
    fn default() -> Self {
        DuplicatorConfig {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            destinations: DEFAULT_DESTINATIONS.iter().map(|s| s.to_string()).collect(),
            destination_dir: PathBuf::from("images"),
            mapping_file: "mapping.csv".to_string(),
        }
    }
}

impl DuplicatorConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, EngineError> {
        let text = fs::read_to_string(path).map_err(|e| EngineError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| EngineError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn destination_specs(&self) -> Vec<DestinationSpec> {
        self.destinations
            .iter()
            .map(|d| DestinationSpec::new(d))
            .collect()
    }

    pub fn destination_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.destination_dir)
    }

    pub fn mapping_path(&self, root: &Path) -> PathBuf {
        self.destination_dir(root).join(&self.mapping_file)
    }
}
