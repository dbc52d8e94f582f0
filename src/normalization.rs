//! Feature normalization metadata.
//!
//! Produced by the preprocessing stage and carried untouched into exported
//! predictors, where serving applies it to raw features.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How a raw feature is normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    Binary,
    Probability,
    Continuous,
    Boxcox,
    Enum,
    Quantile,
}

/// Normalization of a single feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParameters {
    pub feature_type: FeatureType,
    #[serde(default)]
    pub mean: Option<f32>,
    #[serde(default)]
    pub stddev: Option<f32>,
    #[serde(default)]
    pub boxcox_lambda: Option<f32>,
    #[serde(default)]
    pub boxcox_shift: Option<f32>,
    #[serde(default)]
    pub possible_values: Option<Vec<i64>>,
    #[serde(default)]
    pub quantiles: Option<Vec<f32>>,
}

impl NormalizationParameters {
    pub fn continuous(mean: f32, stddev: f32) -> Self {
        Self {
            feature_type: FeatureType::Continuous,
            mean: Some(mean),
            stddev: Some(stddev),
            boxcox_lambda: None,
            boxcox_shift: None,
            possible_values: None,
            quantiles: None,
        }
    }

    pub fn binary() -> Self {
        Self {
            feature_type: FeatureType::Binary,
            mean: None,
            stddev: None,
            boxcox_lambda: None,
            boxcox_shift: None,
            possible_values: None,
            quantiles: None,
        }
    }
}

/// Normalization per feature name
pub type NormalizationTable = BTreeMap<String, NormalizationParameters>;

/// Extra feature kinds the serving side must know about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalFeatureTypes {
    /// Whether integer features are fed alongside float features
    pub int_features: bool,
}
