//! What a training step reports back.

/// Outcome of one training step
#[derive(Clone, Debug, Default)]
pub struct TrainingMetrics {
    /// Mean squared Bellman error of the live critic before its update
    pub critic_loss: f32,

    /// Negated summed Q-value of the live actor's actions
    pub actor_loss: f32,

    /// Q(s, a) of the live critic for every sample, before its update
    pub critic_predictions: Vec<f32>,

    /// Number of transitions in the batch
    pub batch_size: usize,
}

/// Collaborator that tracks training quality
///
/// Called once per training step when supplied. Whatever it computes is
/// read-only output and never feeds back into training.
pub trait Evaluator {
    fn report(&mut self, episode_values: &[f32], critic_predictions: &[f32], critic_loss: f32);
}
