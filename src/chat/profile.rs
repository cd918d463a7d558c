//! Structured requirement profile emitted by the recommendation assistant.
//!
//! The assistant embeds a JSON object somewhere in a prose reply. Extraction
//! takes the span from the first `{` to the last `}` and parses it; anything
//! that does not parse is treated as "no profile yet".

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationProfile {
    /// Budget in INR
    pub budget: f64,
    #[serde(default)]
    pub use_cases: UseCases,
    #[serde(default)]
    pub technical_preferences: TechnicalPreferences,
    #[serde(default)]
    pub performance_priorities: PerformancePriorities,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UseCase {
    pub needed: bool,
    /// 0-10
    pub intensity: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UseCases {
    pub gaming: UseCase,
    pub video_editing: UseCase,
    #[serde(rename = "rendering3D")]
    pub rendering_3d: UseCase,
    pub programming: UseCase,
    pub office_work: UseCase,
    pub streaming: UseCase,
}

impl UseCases {
    /// Needed use cases, most intense first.
    pub fn needed(&self) -> Vec<(&'static str, f32)> {
        let mut needed: Vec<(&'static str, f32)> = [
            ("gaming", &self.gaming),
            ("video editing", &self.video_editing),
            ("3D rendering", &self.rendering_3d),
            ("programming", &self.programming),
            ("office work", &self.office_work),
            ("streaming", &self.streaming),
        ]
        .into_iter()
        .filter(|(_, uc)| uc.needed)
        .map(|(name, uc)| (name, uc.intensity))
        .collect();
        needed.sort_by(|a, b| b.1.total_cmp(&a.1));
        needed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalPreferences {
    pub cpu_platform: String,
    pub gpu_platform: String,
    pub form_factor: String,
    pub rgb_importance: f32,
    pub noise_level: String,
    pub upgrade_path_importance: f32,
    pub storage: StoragePreferences,
    pub connectivity: Connectivity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoragePreferences {
    pub ssd_capacity: String,
    pub hdd_capacity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Connectivity {
    pub wifi: bool,
    pub bluetooth: bool,
    pub usb_ports: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformancePriorities {
    pub cpu: f32,
    pub gpu: f32,
    pub ram: f32,
    pub storage_speed: f32,
}

/// Pull a profile out of an assistant reply, if it carries one.
pub fn extract_profile(text: &str) -> Option<RecommendationProfile> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    match serde_json::from_str(&text[start..=end]) {
        Ok(profile) => Some(profile),
        Err(e) => {
            debug!(error = %e, "reply has braces but no parseable profile");
            None
        }
    }
}
