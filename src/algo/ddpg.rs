//! Deep Deterministic Policy Gradient (DDPG)
//!
//! DDPG is an off-policy actor-critic algorithm. It learns a deterministic
//! policy π(s) together with an action-value function Q(s, a):
//! - **Actor network**: outputs actions a = π(s)
//! - **Critic network**: estimates Q(s, a), with the action joining at the
//!   second layer
//! - **Target networks**: slowly blended copies of both, used to build the
//!   Bellman target
//! - **Ornstein–Uhlenbeck noise**: temporally correlated exploration noise
//!   added to actions at inference time
//!
//! # Training step
//!
//! For a batch of transitions (s, a, r, s', done, Δt):
//!
//! ```text
//! y            = r + (1 - done) · γ^Δt · Q'(s', π'(s'))
//! critic loss  = mean((Q(s, a) - y)²)
//! actor loss   = -Σ Q(s, π(s))
//! θ'           ← τθ + (1 - τ)θ'     for both target networks
//! ```
//!
//! Δt is the number of decision steps the transition spans, so samples
//! aggregated over several steps are discounted accordingly.
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use burn::backend::{Autodiff, NdArray};
//! use ddpg::{algo::ddpg::DdpgTrainer, batch::TransitionBatch, config::*};
//!
//! type Backend = Autodiff<NdArray>;
//!
//! let config = DdpgTrainerConfig::new(
//!     ActorTrainingConfig::new(vec![0, 400, 300, 0], vec!["relu".into(), "relu".into(), "tanh".into()]),
//!     CriticTrainingConfig::new(vec![0, 400, 300, 0], vec!["relu".into(), "relu".into(), "linear".into()])
//!         .with_l2_decay(0.01),
//!     "ADAM".to_string(),
//! )
//! .with_gamma(0.99)
//! .with_target_update_rate(0.001);
//!
//! let mut trainer = DdpgTrainer::<Backend>::new(
//!     &config,
//!     EnvDetails::new(3, 1).with_action_range(Some(2.0)),
//!     Default::default(),
//!     Default::default(),
//!     Default::default(),
//!     &Default::default(),
//! )?;
//!
//! for batch in batches {
//!     let metrics = trainer.train(&batch, None, None)?;
//!     println!("critic loss: {}", metrics.critic_loss);
//! }
//!
//! let actions = trainer.internal_prediction(&states, true)?;
//! ```
//!
//! Reference: "Continuous control with deep reinforcement learning" (Lillicrap et al., 2015)

use burn::{
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{
        adaptor::OptimizerAdaptor, decay::WeightDecayConfig, Adam, AdamConfig, GradientsParams,
        Optimizer,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use tracing::{debug, info, trace};

use crate::{
    batch::{check_rows, TransitionBatch},
    config::{DdpgTrainerConfig, EnvDetails, OptimizerKind},
    error::{DdpgError, Result},
    exploration::OrnsteinUhlenbeckNoise,
    export::DdpgPredictor,
    nn::{
        resolve_layers, ActorNetwork, ActorNetworkConfig, CriticNetwork, CriticNetworkConfig,
        TargetNetwork,
    },
    normalization::{AdditionalFeatureTypes, NormalizationTable},
    traits::{
        to_tensor::{into_rows, into_vec},
        BoolToTensor, Evaluator, ToTensor, TrainingMetrics,
    },
};

/// Optimizer of one network, picked from [`OptimizerKind`] at construction
pub enum TrainerOptimizer<M, B>
where
    M: AutodiffModule<B>,
    B: AutodiffBackend,
{
    Adam(OptimizerAdaptor<Adam, M, B>),
}

impl<M, B> TrainerOptimizer<M, B>
where
    M: AutodiffModule<B>,
    B: AutodiffBackend,
{
    /// `l2_decay` of zero disables weight decay
    pub fn new(kind: OptimizerKind, l2_decay: f32) -> Self {
        match kind {
            OptimizerKind::Adam => {
                let config = AdamConfig::new().with_epsilon(1e-8);
                let config = if l2_decay > 0.0 {
                    config.with_weight_decay(Some(WeightDecayConfig::new(l2_decay)))
                } else {
                    config
                };
                Self::Adam(config.init())
            }
        }
    }

    pub fn step(&mut self, lr: f64, module: M, grads: GradientsParams) -> M {
        match self {
            Self::Adam(optimizer) => optimizer.step(lr, module, grads),
        }
    }
}

/// `γ^Δt` per sample
pub fn discount_factors<B: Backend, const D: usize>(gamma: f32, time_diffs: Tensor<B, D>) -> Tensor<B, D> {
    Tensor::full(time_diffs.shape(), gamma, &time_diffs.device()).powf(time_diffs)
}

/// Bellman target `r + not_done · discount · Q'(s', a')`
///
/// Terminal samples (`not_done = 0`) get exactly their reward.
pub fn bellman_targets<B: Backend, const D: usize>(
    rewards: Tensor<B, D>,
    not_done: Tensor<B, D>,
    discounts: Tensor<B, D>,
    next_q_values: Tensor<B, D>,
) -> Tensor<B, D> {
    rewards + discounts * (not_done * next_q_values)
}

/// DDPG trainer
///
/// Owns the live actor and critic, their target copies, one optimizer per
/// live network and the exploration process. Every method that changes any
/// of them takes `&mut self`.
pub struct DdpgTrainer<B: AutodiffBackend> {
    actor: ActorNetwork<B>,
    actor_target: TargetNetwork<ActorNetwork<B>>,
    critic: CriticNetwork<B>,
    critic_target: TargetNetwork<CriticNetwork<B>>,

    actor_optimizer: TrainerOptimizer<ActorNetwork<B>, B>,
    critic_optimizer: TrainerOptimizer<CriticNetwork<B>, B>,

    noise: OrnsteinUhlenbeckNoise,

    // Network definitions, kept for export
    actor_config: ActorNetworkConfig,
    critic_config: CriticNetworkConfig,

    // Metadata forwarded to predictors
    state_normalization: NormalizationTable,
    action_normalization: NormalizationTable,
    feature_types: AdditionalFeatureTypes,

    // Hyperparameters
    env: EnvDetails,
    gamma: f32,
    actor_lr: f64,
    critic_lr: f64,
    minibatch_size: usize,

    device: B::Device,
}

impl<B: AutodiffBackend> DdpgTrainer<B> {
    /// Build the live networks, snapshot them as targets and set up the
    /// optimizers.
    ///
    /// Fails with a configuration error on an unsupported optimizer name, a
    /// γ or τ outside (0, 1], a layer schema shorter than 3 entries or an
    /// unknown activation.
    pub fn new(
        config: &DdpgTrainerConfig,
        env: EnvDetails,
        state_normalization: NormalizationTable,
        action_normalization: NormalizationTable,
        feature_types: AdditionalFeatureTypes,
        device: &B::Device,
    ) -> Result<Self> {
        let optimizer: OptimizerKind = config.optimizer.parse()?;
        config.validate()?;
        let tau = config.target_update_rate;

        let actor_config = ActorNetworkConfig::new(
            resolve_layers("actor", &config.actor.layers, env.state_dim, env.action_dim)?,
            config.actor.activations.clone(),
        )
        .with_final_layer_init(config.final_layer_init);
        let actor = actor_config.init::<B>(device)?;
        let actor_target = TargetNetwork::new(&actor, tau);

        let critic_config = CriticNetworkConfig::new(
            resolve_layers("critic", &config.critic.layers, env.state_dim, 1)?,
            config.critic.activations.clone(),
            env.action_dim,
        )
        .with_final_layer_init(config.final_layer_init);
        let critic = critic_config.init::<B>(device)?;
        let critic_target = TargetNetwork::new(&critic, tau);

        info!(
            actor_layers = ?actor_config.layers,
            critic_layers = ?critic_config.layers,
            gamma = config.gamma,
            tau,
            action_range = ?env.action_range,
            "built DDPG trainer"
        );

        Ok(Self {
            actor,
            actor_target,
            critic,
            critic_target,
            actor_optimizer: TrainerOptimizer::new(optimizer, 0.0),
            critic_optimizer: TrainerOptimizer::new(optimizer, config.critic.l2_decay),
            noise: OrnsteinUhlenbeckNoise::new(env.action_dim, &config.noise),
            actor_config,
            critic_config,
            state_normalization,
            action_normalization,
            feature_types,
            gamma: config.gamma,
            actor_lr: config.actor.learning_rate,
            critic_lr: config.critic.learning_rate,
            minibatch_size: config.minibatch_size,
            env,
            device: device.clone(),
        })
    }

    /// One DDPG update on `batch`: critic step, actor step, then both
    /// target networks are blended towards their live networks.
    ///
    /// `evaluator` and `episode_values` go together; when given, the
    /// evaluator receives the critic predictions and loss of this step.
    /// The batch and the evaluator pairing are checked before anything is
    /// updated.
    pub fn train(
        &mut self,
        batch: &TransitionBatch,
        evaluator: Option<&mut dyn Evaluator>,
        episode_values: Option<&[f32]>,
    ) -> Result<TrainingMetrics> {
        let evaluation = match (evaluator, episode_values) {
            (Some(evaluator), Some(values)) => Some((evaluator, values)),
            (None, None) => None,
            _ => return Err(DdpgError::EvaluatorMismatch),
        };
        let batch_size = batch.validate(self.env.state_dim, self.env.action_dim)?;

        let device = &self.device;
        let states: Tensor<B, 2> = batch.states.as_slice().to_tensor(device);
        let actions: Tensor<B, 2> = batch.actions.as_slice().to_tensor(device);
        let next_states: Tensor<B, 2> = batch.next_states.as_slice().to_tensor(device);

        let rewards: Tensor<B, 1> = batch.rewards.as_slice().to_tensor(device);
        let time_diffs: Tensor<B, 1> = batch.time_diffs.as_slice().to_tensor(device);
        let not_done: Tensor<B, 1> = batch.terminals.as_slice().to_not_done_mask(device);

        let rewards = rewards.reshape([batch_size, 1]);
        let not_done = not_done.reshape([batch_size, 1]);
        let discounts = discount_factors(self.gamma, time_diffs.reshape([batch_size, 1]));

        let (critic_loss, critic_predictions) =
            self.update_critic(&states, actions, next_states, rewards, not_done, discounts)?;
        let actor_loss = self.update_actor(states);
        self.soft_update_targets();

        debug!(batch_size, critic_loss, actor_loss, "ddpg training step");

        if let Some((evaluator, values)) = evaluation {
            evaluator.report(values, &critic_predictions, critic_loss);
        }

        Ok(TrainingMetrics {
            critic_loss,
            actor_loss,
            critic_predictions,
            batch_size,
        })
    }

    /// Regress Q(s, a) onto the Bellman target, returns the loss and the
    /// critic's predictions before the update
    fn update_critic(
        &mut self,
        states: &Tensor<B, 2>,
        actions: Tensor<B, 2>,
        next_states: Tensor<B, 2>,
        rewards: Tensor<B, 2>,
        not_done: Tensor<B, 2>,
        discounts: Tensor<B, 2>,
    ) -> Result<(f32, Vec<f32>)> {
        // Targets never take part in backpropagation
        let next_actions = self.actor_target.model().forward(next_states.clone()).detach();
        let next_q_values = self
            .critic_target
            .model()
            .forward(next_states, next_actions)
            .detach();
        let targets = bellman_targets(rewards, not_done, discounts, next_q_values).detach();

        let q_values = self.critic.forward(states.clone(), actions);
        let predictions = into_vec(q_values.clone().detach())?;

        let loss = MseLoss::new().forward(q_values, targets, Reduction::Mean);
        let loss_value = loss.clone().into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(loss.backward(), &self.critic);
        self.critic = self
            .critic_optimizer
            .step(self.critic_lr, self.critic.clone(), grads);

        Ok((loss_value, predictions))
    }

    /// Ascend Q(s, π(s)) with respect to the actor only
    fn update_actor(&mut self, states: Tensor<B, 2>) -> f32 {
        let actions = self.actor.forward(states.clone());

        // Maximize Q-value = minimize -Q
        let loss = self.critic.forward(states, actions).sum().neg();
        let loss_value = loss.clone().into_scalar().elem::<f32>();

        // Only actor parameters are collected, the critic is left untouched
        let grads = GradientsParams::from_grads(loss.backward(), &self.actor);
        self.actor = self
            .actor_optimizer
            .step(self.actor_lr, self.actor.clone(), grads);

        loss_value
    }

    /// Soft update target networks
    #[inline]
    fn soft_update_targets(&mut self) {
        self.actor_target.update(&self.actor);
        self.critic_target.update(&self.critic);
    }

    /// Actions of the live actor for `states`.
    ///
    /// The actor runs in evaluation mode: batch norm uses its running
    /// statistics and no gradients are tracked. With `noisy`, a single noise
    /// sample is drawn and added to every row. With an action range, actions
    /// are clipped to `[-1, 1]` and scaled by the range.
    pub fn internal_prediction(&mut self, states: &[Vec<f32>], noisy: bool) -> Result<Vec<Vec<f32>>> {
        check_rows("states", states, self.env.state_dim)?;
        if states.is_empty() {
            return Ok(Vec::new());
        }

        let actor = self.actor.valid();
        let input: Tensor<B::InnerBackend, 2> = states.to_tensor(&self.device);
        let mut actions = actor.forward(input);

        if noisy {
            let noise: Tensor<B::InnerBackend, 1> = self.noise.sample().as_slice().to_tensor(&self.device);
            actions = actions + noise.unsqueeze::<2>();
        }

        if let Some(range) = self.env.action_range {
            actions = actions.clamp(-1.0, 1.0).mul_scalar(range);
        }

        into_rows(actions)
    }

    /// Reset the exploration process, typically between episodes
    pub fn clear_noise(&mut self) {
        trace!("clearing exploration noise");
        self.noise.clear();
    }

    /// Export the live actor (`actor == true`) or critic as a predictor,
    /// with the normalization metadata this trainer was built with.
    pub fn predictor(&self, actor: bool) -> Result<DdpgPredictor> {
        if actor {
            DdpgPredictor::export_actor(self, &self.state_normalization, &self.feature_types)
        } else {
            DdpgPredictor::export_critic(
                self,
                &self.state_normalization,
                &self.action_normalization,
                &self.feature_types,
            )
        }
    }

    pub fn actor(&self) -> &ActorNetwork<B> {
        &self.actor
    }

    pub fn critic(&self) -> &CriticNetwork<B> {
        &self.critic
    }

    pub fn actor_target(&self) -> &TargetNetwork<ActorNetwork<B>> {
        &self.actor_target
    }

    pub fn critic_target(&self) -> &TargetNetwork<CriticNetwork<B>> {
        &self.critic_target
    }

    pub fn actor_config(&self) -> &ActorNetworkConfig {
        &self.actor_config
    }

    pub fn critic_config(&self) -> &CriticNetworkConfig {
        &self.critic_config
    }

    pub fn state_normalization(&self) -> &NormalizationTable {
        &self.state_normalization
    }

    pub fn action_normalization(&self) -> &NormalizationTable {
        &self.action_normalization
    }

    pub fn feature_types(&self) -> &AdditionalFeatureTypes {
        &self.feature_types
    }

    pub fn noise(&self) -> &OrnsteinUhlenbeckNoise {
        &self.noise
    }

    pub fn env(&self) -> &EnvDetails {
        &self.env
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    pub fn minibatch_size(&self) -> usize {
        self.minibatch_size
    }
}
