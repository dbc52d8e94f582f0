//! Deep Deterministic Policy Gradient (DDPG) trainer.
//!
//! The crate trains an actor (state → action) and a critic
//! ((state, action) → value) from batches of transitions, keeps slowly
//! blended target copies of both, and perturbs actions at inference time
//! with Ornstein–Uhlenbeck noise.
//!
//! ```rust,ignore
//! use burn::backend::{Autodiff, NdArray};
//! use ddpg::{algo::ddpg::DdpgTrainer, config::*};
//!
//! type Backend = Autodiff<NdArray>;
//!
//! let config = DdpgTrainerConfig::new(
//!     ActorTrainingConfig::new(vec![0, 64, 0], vec!["relu".into(), "tanh".into()]),
//!     CriticTrainingConfig::new(
//!         vec![0, 64, 64, 0],
//!         vec!["relu".into(), "relu".into(), "linear".into()],
//!     ),
//!     "ADAM".to_string(),
//! );
//! let env = EnvDetails::new(3, 1).with_action_range(Some(2.0));
//! let mut trainer = DdpgTrainer::<Backend>::new(
//!     &config,
//!     env,
//!     Default::default(),
//!     Default::default(),
//!     Default::default(),
//!     &Default::default(),
//! )?;
//!
//! let metrics = trainer.train(&batch, None, None)?;
//! let actions = trainer.internal_prediction(&states, true)?;
//! ```

pub mod algo;
pub mod batch;
pub mod config;
pub mod error;
pub mod exploration;
pub mod export;
pub mod nn;
pub mod normalization;
pub mod traits;

pub use error::{DdpgError, Result};
