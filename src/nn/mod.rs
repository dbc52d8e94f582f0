//! Actor and critic networks, their building blocks and target copies.

pub mod activation;
pub mod actor;
pub mod critic;
pub mod init;
pub mod target;

pub use activation::Activation;
pub use actor::{ActorNetwork, ActorNetworkConfig};
pub use critic::{CriticNetwork, CriticNetworkConfig};
pub use target::{SoftUpdate, TargetNetwork};

use crate::error::{DdpgError, Result};

/// Both networks need an input, at least one hidden and an output layer.
pub(crate) fn check_layer_schema(network: &'static str, layers: &[usize]) -> Result<()> {
    if layers.len() < 3 {
        return Err(DdpgError::InvalidLayerSchema {
            network,
            layers: layers.to_vec(),
        });
    }
    Ok(())
}

/// Copy of `layers` with the first and last widths replaced by the
/// environment's input and output sizes.
pub fn resolve_layers(
    network: &'static str,
    layers: &[usize],
    input_dim: usize,
    output_dim: usize,
) -> Result<Vec<usize>> {
    check_layer_schema(network, layers)?;

    let mut layers = layers.to_vec();
    let last = layers.len() - 1;
    layers[0] = input_dim;
    layers[last] = output_dim;
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_layers_overwrites_ends() {
        let layers = resolve_layers("actor", &[0, 64, 32, 0], 5, 2).unwrap();
        assert_eq!(layers, vec![5, 64, 32, 2]);
    }

    #[test]
    fn test_resolve_layers_rejects_short_schema() {
        assert!(resolve_layers("critic", &[0, 0], 5, 1).is_err());
        assert!(resolve_layers("critic", &[], 5, 1).is_err());
    }
}
