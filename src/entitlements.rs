// Feature/entitlement checks injected into the engine

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AiNoticeGeneration,
    EVoting,
}

pub trait EntitlementCheck: Send + Sync {
    fn is_enabled(&self, feature: Feature) -> bool;
}

/// Fixed set of enabled features, usually built from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticEntitlements {
    enabled: HashSet<Feature>,
}

impl StaticEntitlements {
    pub fn new<I: IntoIterator<Item = Feature>>(features: I) -> Self {
        Self {
            enabled: features.into_iter().collect(),
        }
    }

    pub fn all() -> Self {
        Self::new([Feature::AiNoticeGeneration, Feature::EVoting])
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_config(features: &crate::config::FeatureConfig) -> Self {
        let mut enabled = HashSet::new();
        if features.ai_notice_generation {
            enabled.insert(Feature::AiNoticeGeneration);
        }
        if features.e_voting {
            enabled.insert(Feature::EVoting);
        }
        Self { enabled }
    }
}

impl EntitlementCheck for StaticEntitlements {
    fn is_enabled(&self, feature: Feature) -> bool {
        self.enabled.contains(&feature)
    }
}
