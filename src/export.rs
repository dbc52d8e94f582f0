//! Predictor export.
//!
//! A [`DdpgPredictor`] is a self-contained artifact: the definition of one
//! trained network, its weights and the normalization metadata a serving
//! runtime needs to feed it. Weights go through burn's `BinBytesRecorder`
//! in full precision, the artifact itself through serde.

use burn::{
    module::{AutodiffModule, Module},
    prelude::*,
    record::{BinBytesRecorder, FullPrecisionSettings, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
    algo::ddpg::DdpgTrainer,
    error::{DdpgError, Result},
    nn::{ActorNetwork, ActorNetworkConfig, CriticNetwork, CriticNetworkConfig},
    normalization::{AdditionalFeatureTypes, NormalizationTable},
};

type WeightRecorder = BinBytesRecorder<FullPrecisionSettings>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum PredictorKind {
    Actor,
    Critic,
}

/// Definition of the exported network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExportedNetwork {
    Actor(ActorNetworkConfig),
    Critic(CriticNetworkConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdpgPredictor {
    network: ExportedNetwork,
    weights: Vec<u8>,
    state_normalization: NormalizationTable,
    /// Present for critics only, actors take no action input
    action_normalization: Option<NormalizationTable>,
    int_features: bool,
}

impl DdpgPredictor {
    /// Export the trainer's live actor
    pub fn export_actor<B: AutodiffBackend>(
        trainer: &DdpgTrainer<B>,
        state_normalization: &NormalizationTable,
        feature_types: &AdditionalFeatureTypes,
    ) -> Result<Self> {
        let weights = record_bytes::<B, _>(trainer.actor())?;

        Ok(Self {
            network: ExportedNetwork::Actor(trainer.actor_config().clone()),
            weights,
            state_normalization: state_normalization.clone(),
            action_normalization: None,
            int_features: feature_types.int_features,
        })
    }

    /// Export the trainer's live critic
    pub fn export_critic<B: AutodiffBackend>(
        trainer: &DdpgTrainer<B>,
        state_normalization: &NormalizationTable,
        action_normalization: &NormalizationTable,
        feature_types: &AdditionalFeatureTypes,
    ) -> Result<Self> {
        let weights = record_bytes::<B, _>(trainer.critic())?;

        Ok(Self {
            network: ExportedNetwork::Critic(trainer.critic_config().clone()),
            weights,
            state_normalization: state_normalization.clone(),
            action_normalization: Some(action_normalization.clone()),
            int_features: feature_types.int_features,
        })
    }

    pub fn kind(&self) -> PredictorKind {
        match self.network {
            ExportedNetwork::Actor(_) => PredictorKind::Actor,
            ExportedNetwork::Critic(_) => PredictorKind::Critic,
        }
    }

    /// Rebuild the exported actor on backend `B`
    pub fn load_actor<B: Backend>(&self, device: &B::Device) -> Result<ActorNetwork<B>> {
        match &self.network {
            ExportedNetwork::Actor(config) => {
                let actor = config.init::<B>(device)?;
                let record = WeightRecorder::new()
                    .load(self.weights.clone(), device)
                    .map_err(|e| DdpgError::Record(e.to_string()))?;
                Ok(actor.load_record(record))
            }
            ExportedNetwork::Critic(_) => Err(self.kind_error(PredictorKind::Actor)),
        }
    }

    /// Rebuild the exported critic on backend `B`
    pub fn load_critic<B: Backend>(&self, device: &B::Device) -> Result<CriticNetwork<B>> {
        match &self.network {
            ExportedNetwork::Critic(config) => {
                let critic = config.init::<B>(device)?;
                let record = WeightRecorder::new()
                    .load(self.weights.clone(), device)
                    .map_err(|e| DdpgError::Record(e.to_string()))?;
                Ok(critic.load_record(record))
            }
            ExportedNetwork::Actor(_) => Err(self.kind_error(PredictorKind::Critic)),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn network(&self) -> &ExportedNetwork {
        &self.network
    }

    pub fn state_normalization(&self) -> &NormalizationTable {
        &self.state_normalization
    }

    pub fn action_normalization(&self) -> Option<&NormalizationTable> {
        self.action_normalization.as_ref()
    }

    pub fn int_features(&self) -> bool {
        self.int_features
    }

    fn kind_error(&self, requested: PredictorKind) -> DdpgError {
        DdpgError::Record(format!("requested a {requested} but the predictor holds a {}", self.kind()))
    }
}

/// Weights of the evaluation copy of `module`
fn record_bytes<B, M>(module: &M) -> Result<Vec<u8>>
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
{
    WeightRecorder::new()
        .record(module.valid().into_record(), ())
        .map_err(|e| DdpgError::Record(e.to_string()))
}
