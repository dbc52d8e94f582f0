//! Policy network: state → action.

use burn::{
    module::{Ignored, Module},
    nn::{BatchNorm, BatchNormConfig, Linear, LinearConfig},
    prelude::*,
};

use super::{activation::Activation, check_layer_schema, init};
use crate::error::Result;

/// Configuration for [`ActorNetwork`]
#[derive(Config, Debug)]
pub struct ActorNetworkConfig {
    /// Layer widths, `[state_dim, hidden.., action_dim]`
    pub layers: Vec<usize>,
    /// One activation name per layer boundary
    pub activations: Vec<String>,
    /// Bound of the uniform init of the output layer
    #[config(default = 0.003)]
    pub final_layer_init: f64,
}

/// Actor network
///
/// Every linear layer is preceded by a batch norm over its input. The
/// activation of a layer is skipped when it is `linear`, which lets the
/// output stay unsaturated while batch norm keeps the pre-activation range
/// in check.
#[derive(Module, Debug)]
pub struct ActorNetwork<B: Backend> {
    pub(crate) layers: Vec<Linear<B>>,
    pub(crate) batch_norms: Vec<BatchNorm<B, 0>>,
    activations: Ignored<Vec<Activation>>,
}

impl ActorNetworkConfig {
    /// Build the network, failing on a malformed layer schema or an unknown
    /// activation name.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<ActorNetwork<B>> {
        check_layer_schema("actor", &self.layers)?;
        let activations =
            Activation::resolve_all("actor", &self.activations, self.layers.len() - 1)?;

        let last = self.layers.len() - 2;
        let mut layers = Vec::with_capacity(last + 1);
        let mut batch_norms = Vec::with_capacity(last + 1);

        for (i, widths) in self.layers.windows(2).enumerate() {
            let (d_input, d_output) = (widths[0], widths[1]);
            let initializer = if i == last {
                init::bounded_uniform(self.final_layer_init)
            } else {
                init::fan_in_uniform(d_input)
            };

            layers.push(
                LinearConfig::new(d_input, d_output)
                    .with_initializer(initializer)
                    .init(device),
            );
            batch_norms.push(BatchNormConfig::new(d_input).init(device));
        }

        Ok(ActorNetwork {
            layers,
            batch_norms,
            activations: Ignored(activations),
        })
    }
}

impl<B: Backend> ActorNetwork<B> {
    /// `[batch, state_dim]` → `[batch, action_dim]`
    ///
    /// Batch norm runs on batch statistics on an autodiff backend and on the
    /// running statistics otherwise, so call this on `valid()` for inference.
    pub fn forward(&self, state: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = state;

        for ((layer, norm), activation) in self
            .layers
            .iter()
            .zip(self.batch_norms.iter())
            .zip(self.activations.iter())
        {
            x = norm.forward(x);
            x = activation.apply(layer.forward(x));
        }

        x
    }

    /// Number of linear layers
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn state_dim(&self) -> usize {
        self.layers[0].weight.val().dims()[0]
    }

    pub fn action_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].weight.val().dims()[1]
    }
}
