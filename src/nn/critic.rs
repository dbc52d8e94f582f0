//! Value network: (state, action) → Q-value.

use burn::{
    module::{Ignored, Module},
    nn::{BatchNorm, BatchNormConfig, Linear, LinearConfig},
    prelude::*,
};

use super::{activation::Activation, check_layer_schema, init};
use crate::error::Result;

/// Configuration for [`CriticNetwork`]
#[derive(Config, Debug)]
pub struct CriticNetworkConfig {
    /// Layer widths, `[state_dim, hidden.., 1]`
    pub layers: Vec<usize>,
    /// One activation name per layer boundary
    pub activations: Vec<String>,
    /// Width of the action vector injected at the second layer
    pub action_dim: usize,
    /// Bound of the uniform init of the output layer
    #[config(default = 0.003)]
    pub final_layer_init: f64,
}

/// Critic network
///
/// Only the state path is batch normalized. The action joins at the second
/// layer, concatenated after that layer's batch norm, and is never
/// normalized itself. Layers after the second take the previous output as is.
#[derive(Module, Debug)]
pub struct CriticNetwork<B: Backend> {
    pub(crate) layers: Vec<Linear<B>>,
    pub(crate) batch_norms: Vec<BatchNorm<B, 0>>,
    activations: Ignored<Vec<Activation>>,
}

impl CriticNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<CriticNetwork<B>> {
        check_layer_schema("critic", &self.layers)?;
        let activations =
            Activation::resolve_all("critic", &self.activations, self.layers.len() - 1)?;

        let last = self.layers.len() - 2;
        let mut layers = Vec::with_capacity(last + 1);
        let mut batch_norms = Vec::with_capacity(2);

        for (i, widths) in self.layers.windows(2).enumerate() {
            let d_input = match i {
                1 => widths[0] + self.action_dim,
                _ => widths[0],
            };
            let initializer = if i == last {
                init::bounded_uniform(self.final_layer_init)
            } else {
                init::fan_in_uniform(d_input)
            };

            layers.push(
                LinearConfig::new(d_input, widths[1])
                    .with_initializer(initializer)
                    .init(device),
            );
            if i < 2 {
                batch_norms.push(BatchNormConfig::new(widths[0]).init(device));
            }
        }

        Ok(CriticNetwork {
            layers,
            batch_norms,
            activations: Ignored(activations),
        })
    }
}

impl<B: Backend> CriticNetwork<B> {
    /// `([batch, state_dim], [batch, action_dim])` → `[batch, 1]`
    pub fn forward(&self, state: Tensor<B, 2>, action: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = state;

        for (i, (layer, activation)) in self.layers.iter().zip(self.activations.iter()).enumerate() {
            match i {
                0 => x = self.batch_norms[0].forward(x),
                1 => x = Tensor::cat(vec![self.batch_norms[1].forward(x), action.clone()], 1),
                _ => {}
            }
            x = activation.apply(layer.forward(x));
        }

        x
    }

    /// Forward pass on a `[batch, state_dim + action_dim]` input.
    ///
    /// The split point is the input width of the first layer, so the caller
    /// must have concatenated state before action.
    pub fn forward_state_action(&self, state_action: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch, width] = state_action.dims();
        let state_dim = self.state_dim();

        let state = state_action.clone().slice([0..batch, 0..state_dim]);
        let action = state_action.slice([0..batch, state_dim..width]);

        self.forward(state, action)
    }

    /// Number of linear layers
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn state_dim(&self) -> usize {
        self.layers[0].weight.val().dims()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::DdpgError, nn::actor::tests::set_linear};
    use burn::backend::{
        ndarray::{NdArray, NdArrayDevice},
        Autodiff,
    };

    fn config(layers: Vec<usize>, activations: &[&str], action_dim: usize) -> CriticNetworkConfig {
        CriticNetworkConfig::new(
            layers,
            activations.iter().map(|a| a.to_string()).collect(),
            action_dim,
        )
    }

    #[test]
    fn test_layer_shapes() {
        let device = NdArrayDevice::default();
        let critic = config(vec![4, 32, 16, 1], &["relu", "relu", "linear"], 2)
            .init::<NdArray>(&device)
            .unwrap();

        assert_eq!(critic.num_layers(), 3);
        assert_eq!(critic.batch_norms.len(), 2);
        assert_eq!(critic.state_dim(), 4);
        // Action joins at the second layer only
        assert_eq!(critic.layers[1].weight.val().dims(), [34, 16]);
        assert_eq!(critic.layers[2].weight.val().dims(), [16, 1]);

        let state = Tensor::<NdArray, 2>::random([6, 4], burn::tensor::Distribution::Default, &device);
        let action = Tensor::<NdArray, 2>::random([6, 2], burn::tensor::Distribution::Default, &device);
        assert_eq!(critic.forward(state, action).dims(), [6, 1]);
    }

    #[test]
    fn test_minimal_schema() {
        let device = NdArrayDevice::default();
        let critic = config(vec![3, 8, 1], &["relu", "linear"], 1)
            .init::<NdArray>(&device)
            .unwrap();

        assert_eq!(critic.num_layers(), 2);
        assert_eq!(critic.layers[1].weight.val().dims(), [9, 1]);
    }

    #[test]
    fn test_short_layer_schema_rejected() {
        let device = NdArrayDevice::default();
        let err = config(vec![3, 1], &["linear"], 1)
            .init::<NdArray>(&device)
            .unwrap_err();

        assert!(matches!(err, DdpgError::InvalidLayerSchema { network: "critic", .. }));
    }

    #[test]
    fn test_action_is_not_normalized() {
        // Autodiff backend: batch norm on batch statistics
        let device = NdArrayDevice::default();
        let mut critic = config(vec![1, 1, 1, 1], &["relu", "relu", "linear"], 1)
            .init::<Autodiff<NdArray>>(&device)
            .unwrap();
        set_linear(&mut critic.layers[0], [[1.0]], [0.0], &device);
        set_linear(&mut critic.layers[1], [[1.0], [2.0]], [0.0], &device);
        set_linear(&mut critic.layers[2], [[1.0]], [0.5], &device);

        let state = Tensor::<Autodiff<NdArray>, 2>::from_floats([[1.0], [3.0]], &device);
        let action = Tensor::<Autodiff<NdArray>, 2>::from_floats([[5.0], [7.0]], &device);
        let output = critic.forward(state, action).to_data();
        let output = output.as_slice::<f32>().unwrap();

        // state: [1, 3] -> [-1, 1] -> relu -> [0, 1] -> [-1, 1]
        // layer 1: h + 2a = [9, 15], layer 2: + 0.5
        assert!((output[0] - 9.5).abs() < 1e-3, "got {}", output[0]);
        assert!((output[1] - 15.5).abs() < 1e-3, "got {}", output[1]);
    }

    #[test]
    fn test_forward_state_action_splits_at_state_dim() {
        let device = NdArrayDevice::default();
        let critic = config(vec![3, 16, 8, 1], &["relu", "relu", "linear"], 2)
            .init::<NdArray>(&device)
            .unwrap();

        let state = Tensor::<NdArray, 2>::random([4, 3], burn::tensor::Distribution::Default, &device);
        let action = Tensor::<NdArray, 2>::random([4, 2], burn::tensor::Distribution::Default, &device);

        let split = critic.forward(state.clone(), action.clone()).to_data();
        let joined = critic
            .forward_state_action(Tensor::cat(vec![state, action], 1))
            .to_data();

        assert_eq!(
            split.as_slice::<f32>().unwrap(),
            joined.as_slice::<f32>().unwrap()
        );
    }
}
