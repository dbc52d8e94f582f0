/// Deep Deterministic Policy Gradient
pub mod ddpg;
