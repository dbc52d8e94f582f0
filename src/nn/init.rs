//! Weight initialization schemes from the DDPG paper.

use burn::nn::Initializer;

/// Uniform in `±1/sqrt(fan_in)`, used for every hidden layer.
pub fn fan_in_uniform(fan_in: usize) -> Initializer {
    let bound = 1.0 / (fan_in.max(1) as f64).sqrt();
    Initializer::Uniform {
        min: -bound,
        max: bound,
    }
}

/// Uniform in `±bound`, used for the output layer so the initial policy and
/// value estimates start near zero.
pub fn bounded_uniform(bound: f64) -> Initializer {
    Initializer::Uniform {
        min: -bound,
        max: bound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::ndarray::{NdArray, NdArrayDevice},
        nn::LinearConfig,
    };

    fn max_abs(values: &[f32]) -> f32 {
        values.iter().fold(0.0_f32, |acc, v| acc.max(v.abs()))
    }

    #[test]
    fn test_fan_in_bounds_weight_and_bias() {
        let device = NdArrayDevice::default();
        let layer = LinearConfig::new(16, 8)
            .with_initializer(fan_in_uniform(16))
            .init::<NdArray>(&device);

        let weight = layer.weight.val().to_data();
        assert!(max_abs(weight.as_slice::<f32>().unwrap()) <= 0.25);

        let bias = layer.bias.as_ref().unwrap().val().to_data();
        assert!(max_abs(bias.as_slice::<f32>().unwrap()) <= 0.25);
    }

    #[test]
    fn test_bounded_uniform() {
        let device = NdArrayDevice::default();
        let layer = LinearConfig::new(64, 2)
            .with_initializer(bounded_uniform(0.003))
            .init::<NdArray>(&device);

        let weight = layer.weight.val().to_data();
        assert!(max_abs(weight.as_slice::<f32>().unwrap()) <= 0.003);
    }
}
