//! Static crop baselines and production cost models.

mod tables;

use crate::domain::crop::{CostModel, CropId, CropProfile};

pub use tables::{COST_MODELS, CROP_PROFILES, DEFAULT_COST_MODEL};

/// Read-only lookup over the crop baselines. Iteration follows table order,
/// which is also the tie-break order used when ranking.
#[derive(Clone, Copy, Debug)]
pub struct PriceCatalog {
    profiles: &'static [CropProfile],
}

impl PriceCatalog {
    pub fn new(profiles: &'static [CropProfile]) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &'static [CropProfile] {
        self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn find(&self, crop: &CropId) -> Option<&'static CropProfile> {
        self.profiles.iter().find(|profile| profile.name == crop.as_str())
    }
}

impl Default for PriceCatalog {
    fn default() -> Self {
        Self::new(CROP_PROFILES)
    }
}

/// Cost model for `crop`, or the generic default when none is tabulated.
pub fn cost_model(crop: &CropId) -> &'static CostModel {
    COST_MODELS
        .iter()
        .find(|(name, _)| *name == crop.as_str())
        .map(|(_, model)| model)
        .unwrap_or(&DEFAULT_COST_MODEL)
}
