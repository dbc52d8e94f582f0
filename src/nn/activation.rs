//! Activation lookup by name.

use burn::{prelude::*, tensor::activation};
use strum::{Display, EnumIter, EnumString};

use crate::error::{DdpgError, Result};

/// Transfer function applied after a linear layer.
///
/// Names follow the functional names used in network configs
/// (`"relu"`, `"tanh"`, `"leaky_relu"`, ...). `Linear` is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Tanh,
    Sigmoid,
    LeakyRelu,
    Softplus,
    Gelu,
    Silu,
}

impl Activation {
    /// Look up an activation by name.
    pub fn parse(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| DdpgError::UnknownActivation(name.to_string()))
    }

    /// Resolve one activation per layer boundary of `network`.
    pub fn resolve_all(
        network: &'static str,
        names: &[String],
        expected: usize,
    ) -> Result<Vec<Self>> {
        if names.len() != expected {
            return Err(DdpgError::ActivationCount {
                network,
                expected,
                actual: names.len(),
            });
        }
        names.iter().map(|name| Self::parse(name)).collect()
    }

    pub fn apply<B: Backend, const D: usize>(self, x: Tensor<B, D>) -> Tensor<B, D> {
        match self {
            Self::Linear => x,
            Self::Relu => activation::relu(x),
            Self::Tanh => activation::tanh(x),
            Self::Sigmoid => activation::sigmoid(x),
            Self::LeakyRelu => activation::leaky_relu(x, 0.01),
            Self::Softplus => activation::softplus(x, 1.0),
            Self::Gelu => activation::gelu(x),
            Self::Silu => activation::silu(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(Activation::parse("linear").unwrap(), Activation::Linear);
        assert_eq!(Activation::parse("relu").unwrap(), Activation::Relu);
        assert_eq!(Activation::parse("leaky_relu").unwrap(), Activation::LeakyRelu);

        // Every variant round-trips through its display name
        for activation in Activation::iter() {
            assert_eq!(Activation::parse(&activation.to_string()).unwrap(), activation);
        }
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = Activation::parse("swish").unwrap_err();
        assert!(matches!(err, DdpgError::UnknownActivation(ref name) if name == "swish"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_resolve_all_checks_count() {
        let names = vec!["relu".to_string(), "tanh".to_string()];
        assert_eq!(
            Activation::resolve_all("actor", &names, 2).unwrap(),
            vec![Activation::Relu, Activation::Tanh]
        );

        let err = Activation::resolve_all("actor", &names, 3).unwrap_err();
        assert!(matches!(
            err,
            DdpgError::ActivationCount { expected: 3, actual: 2, .. }
        ));
    }

    #[test]
    fn test_linear_is_identity() {
        let device = NdArrayDevice::default();
        let input = Tensor::<NdArray, 2>::from_floats([[-2.0, 0.5], [3.0, -0.25]], &device);

        let output = Activation::Linear.apply(input.clone());

        assert_eq!(
            output.to_data().as_slice::<f32>().unwrap(),
            input.to_data().as_slice::<f32>().unwrap()
        );
    }

    #[test]
    fn test_relu_and_tanh() {
        let device = NdArrayDevice::default();
        let input = Tensor::<NdArray, 1>::from_floats([-1.0, 0.0, 2.0], &device);

        let relu = Activation::Relu.apply(input.clone()).to_data();
        assert_eq!(relu.as_slice::<f32>().unwrap(), &[0.0, 0.0, 2.0]);

        let tanh = Activation::Tanh.apply(input).to_data();
        for (value, expected) in tanh
            .as_slice::<f32>()
            .unwrap()
            .iter()
            .zip([-1.0_f32.tanh(), 0.0, 2.0_f32.tanh()])
        {
            assert!((value - expected).abs() < 1e-6);
        }
    }
}
