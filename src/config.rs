//! Construction-time configuration of the trainer.
//!
//! All types derive burn's [`Config`], so they load from and save to JSON
//! files with `Config::load` / `Config::save`.

use std::str::FromStr;

use burn::config::Config;

use crate::{
    error::{DdpgError, Result},
    exploration::OrnsteinUhlenbeckConfig,
};

/// Actor network and optimizer settings
#[derive(Config, Debug)]
pub struct ActorTrainingConfig {
    /// Layer widths; the first and last entries are replaced by the
    /// environment's state and action dimensions
    pub layers: Vec<usize>,
    /// One activation name per layer boundary
    pub activations: Vec<String>,
    #[config(default = 1e-3)]
    pub learning_rate: f64,
}

/// Critic network and optimizer settings
#[derive(Config, Debug)]
pub struct CriticTrainingConfig {
    /// Layer widths; the first entry is replaced by the state dimension and
    /// the last by 1
    pub layers: Vec<usize>,
    /// One activation name per layer boundary
    pub activations: Vec<String>,
    #[config(default = 1e-3)]
    pub learning_rate: f64,
    /// L2 weight decay of the critic optimizer
    #[config(default = 0.0)]
    pub l2_decay: f32,
}

/// Full trainer configuration
#[derive(Config, Debug)]
pub struct DdpgTrainerConfig {
    pub actor: ActorTrainingConfig,
    pub critic: CriticTrainingConfig,
    /// Optimizer name, only `"ADAM"` is supported
    pub optimizer: String,
    /// Discount factor γ
    #[config(default = 0.9)]
    pub gamma: f32,
    /// Soft update coefficient τ shared by both target networks
    #[config(default = 0.01)]
    pub target_update_rate: f32,
    /// Bound of the uniform init of both output layers
    #[config(default = 0.003)]
    pub final_layer_init: f64,
    /// Batch size the preprocessing stage is expected to produce
    #[config(default = 1024)]
    pub minibatch_size: usize,
    #[config(default = "OrnsteinUhlenbeckConfig::new()")]
    pub noise: OrnsteinUhlenbeckConfig,
}

impl DdpgTrainerConfig {
    /// Check that γ and τ lie in (0, 1]
    pub fn validate(&self) -> Result<()> {
        unit_interval("gamma", self.gamma)?;
        unit_interval("target_update_rate", self.target_update_rate)
    }
}

fn unit_interval(name: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(DdpgError::OutOfRange { name, value })
    }
}

/// Environment facts the networks are sized from
#[derive(Config, Debug)]
pub struct EnvDetails {
    pub state_dim: usize,
    pub action_dim: usize,
    /// Scale of continuous actions; `None` for discrete action spaces
    pub action_range: Option<f32>,
}

/// Supported update rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerKind {
    Adam,
}

impl FromStr for OptimizerKind {
    type Err = DdpgError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "ADAM" => Ok(Self::Adam),
            other => Err(DdpgError::UnsupportedOptimizer(other.to_string())),
        }
    }
}
