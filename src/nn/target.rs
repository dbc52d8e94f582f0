//! Target networks and the soft (Polyak) update.
//!
//! θ′ ← τθ + (1 − τ)θ′

use burn::{
    module::{Module, Param, RunningState},
    nn::{BatchNorm, Linear},
    prelude::*,
};

use super::{ActorNetwork, CriticNetwork};

/// Networks that can be snapshotted and blended towards a live copy.
pub trait SoftUpdate: Sized {
    /// An independent copy that never takes part in backpropagation.
    fn snapshot(&self) -> Self;

    /// Blend `live` into `self` by factor `tau`, parameter by parameter.
    ///
    /// Batch norm running statistics are buffers and are left alone.
    fn soft_update(&mut self, live: &Self, tau: f32);
}

/// A lagged copy of a live network.
///
/// Created once from the live network and afterwards only moved through
/// [`TargetNetwork::update`].
#[derive(Debug, Clone)]
pub struct TargetNetwork<M> {
    model: M,
    tau: f32,
}

impl<M: SoftUpdate> TargetNetwork<M> {
    pub fn new(live: &M, tau: f32) -> Self {
        Self {
            model: live.snapshot(),
            tau,
        }
    }

    /// Soft update towards `live`
    pub fn update(&mut self, live: &M) {
        self.model.soft_update(live, self.tau);
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn tau(&self) -> f32 {
        self.tau
    }
}

impl<B: Backend> SoftUpdate for ActorNetwork<B> {
    fn snapshot(&self) -> Self {
        let mut target = self.clone().no_grad();
        target.batch_norms.iter_mut().for_each(own_running_stats);
        target
    }

    fn soft_update(&mut self, live: &Self, tau: f32) {
        for (target, live) in self.layers.iter_mut().zip(live.layers.iter()) {
            soft_update_linear(target, live, tau);
        }
        for (target, live) in self.batch_norms.iter_mut().zip(live.batch_norms.iter()) {
            soft_update_batch_norm(target, live, tau);
        }
    }
}

impl<B: Backend> SoftUpdate for CriticNetwork<B> {
    fn snapshot(&self) -> Self {
        let mut target = self.clone().no_grad();
        target.batch_norms.iter_mut().for_each(own_running_stats);
        target
    }

    fn soft_update(&mut self, live: &Self, tau: f32) {
        for (target, live) in self.layers.iter_mut().zip(live.layers.iter()) {
            soft_update_linear(target, live, tau);
        }
        for (target, live) in self.batch_norms.iter_mut().zip(live.batch_norms.iter()) {
            soft_update_batch_norm(target, live, tau);
        }
    }
}

/// Cloned batch norms share their running statistics; give `norm` its own.
fn own_running_stats<B: Backend>(norm: &mut BatchNorm<B, 0>) {
    norm.running_mean = RunningState::new(norm.running_mean.value_sync());
    norm.running_var = RunningState::new(norm.running_var.value_sync());
}

fn soft_update_tensor<B: Backend, const D: usize>(
    this: &mut Param<Tensor<B, D>>,
    that: &Param<Tensor<B, D>>,
    tau: f32,
) {
    // Both sides detached, otherwise the autodiff graph keeps growing step after step
    *this = this
        .clone()
        .map(|tensor| tensor.detach() * (1.0 - tau) + that.val().detach() * tau);
}

fn soft_update_linear<B: Backend>(this: &mut Linear<B>, that: &Linear<B>, tau: f32) {
    soft_update_tensor(&mut this.weight, &that.weight, tau);

    if let (Some(b1), Some(b2)) = (&mut this.bias, &that.bias) {
        soft_update_tensor(b1, b2, tau);
    }
}

fn soft_update_batch_norm<B: Backend>(
    this: &mut BatchNorm<B, 0>,
    that: &BatchNorm<B, 0>,
    tau: f32,
) {
    soft_update_tensor(&mut this.gamma, &that.gamma, tau);
    soft_update_tensor(&mut this.beta, &that.beta, tau);
}
