//! Exploration noise applied to actions at inference time.

mod ou_noise;

pub use ou_noise::{OrnsteinUhlenbeckConfig, OrnsteinUhlenbeckNoise};
