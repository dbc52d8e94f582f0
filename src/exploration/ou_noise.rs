use burn::config::Config;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Parameters of the Ornstein–Uhlenbeck process
#[derive(Config, Debug)]
pub struct OrnsteinUhlenbeckConfig {
    /// Mean reversion rate
    #[config(default = 0.15)]
    pub theta: f32,
    /// Volatility
    #[config(default = 0.02)]
    pub sigma: f32,
    /// Long-run mean
    #[config(default = 0.0)]
    pub mu: f32,
    /// Seed of the gaussian source, drawn from entropy when unset
    pub seed: Option<u64>,
}

/// Temporally correlated exploration noise.
///
/// dx = θ(μ − x) + σε, with ε ~ N(0, 1) drawn per call and per dimension.
/// Unlike i.i.d. gaussian noise, consecutive samples keep their direction,
/// which is what moves a system with momentum.
///
/// The process is stateful; a single owner drives it through
/// [`sample`](Self::sample) and [`clear`](Self::clear).
#[derive(Debug, Clone)]
pub struct OrnsteinUhlenbeckNoise {
    theta: f32,
    sigma: f32,
    mu: f32,
    state: Vec<f32>,
    rng: StdRng,
}

impl OrnsteinUhlenbeckNoise {
    pub fn new(action_dim: usize, config: &OrnsteinUhlenbeckConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            theta: config.theta,
            sigma: config.sigma,
            mu: config.mu,
            state: vec![0.0; action_dim],
            rng,
        }
    }

    /// Advance the process one step and return the new noise vector
    pub fn sample(&mut self) -> Vec<f32> {
        let Self {
            theta,
            sigma,
            mu,
            state,
            rng,
        } = self;
        advance(state, *theta, *sigma, *mu, rng)
    }

    /// Same as [`sample`](Self::sample) with gaussian draws taken from `rng`
    pub fn sample_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<f32> {
        advance(&mut self.state, self.theta, self.sigma, self.mu, rng)
    }

    /// Reset the process to the zero vector
    pub fn clear(&mut self) {
        self.state.iter_mut().for_each(|x| *x = 0.0);
    }

    pub fn state(&self) -> &[f32] {
        &self.state
    }

    pub fn action_dim(&self) -> usize {
        self.state.len()
    }
}

fn advance<R: Rng + ?Sized>(state: &mut [f32], theta: f32, sigma: f32, mu: f32, rng: &mut R) -> Vec<f32> {
    for x in state.iter_mut() {
        let epsilon: f32 = rng.sample(StandardNormal);
        *x += theta * (mu - *x) + sigma * epsilon;
    }
    state.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrnsteinUhlenbeckConfig::new();
        assert_eq!(config.theta, 0.15);
        assert_eq!(config.sigma, 0.02);
        assert_eq!(config.mu, 0.0);

        let noise = OrnsteinUhlenbeckNoise::new(3, &config);
        assert_eq!(noise.state(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_seeded_processes_match() {
        let config = OrnsteinUhlenbeckConfig::new().with_seed(Some(7));
        let mut a = OrnsteinUhlenbeckNoise::new(2, &config);
        let mut b = OrnsteinUhlenbeckNoise::new(2, &config);

        for _ in 0..50 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_same_draws_same_sequence() {
        let config = OrnsteinUhlenbeckConfig::new().with_sigma(0.3);
        let mut a = OrnsteinUhlenbeckNoise::new(4, &config);
        let mut b = OrnsteinUhlenbeckNoise::new(4, &config);
        let mut rng_a = StdRng::seed_from_u64(11);
        let mut rng_b = StdRng::seed_from_u64(11);

        for _ in 0..20 {
            assert_eq!(a.sample_with(&mut rng_a), b.sample_with(&mut rng_b));
        }
    }

    #[test]
    fn test_own_rng_matches_external_draws() {
        let config = OrnsteinUhlenbeckConfig::new().with_sigma(0.4).with_seed(Some(5));
        let mut own = OrnsteinUhlenbeckNoise::new(3, &config);
        let mut external = OrnsteinUhlenbeckNoise::new(3, &config);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..10 {
            assert_eq!(own.sample(), external.sample_with(&mut rng));
        }
    }

    #[test]
    fn test_recurrence() {
        let config = OrnsteinUhlenbeckConfig::new().with_theta(0.2).with_sigma(0.5);
        let mut noise = OrnsteinUhlenbeckNoise::new(2, &config);
        let mut rng = StdRng::seed_from_u64(3);
        let mut draws = StdRng::seed_from_u64(3);

        let mut expected = [0.0_f32; 2];
        for _ in 0..10 {
            for x in expected.iter_mut() {
                let epsilon: f32 = draws.sample(StandardNormal);
                *x += 0.2 * (0.0 - *x) + 0.5 * epsilon;
            }
            assert_eq!(noise.sample_with(&mut rng), expected.to_vec());
        }
    }

    #[test]
    fn test_mean_reversion_without_volatility() {
        let config = OrnsteinUhlenbeckConfig::new()
            .with_theta(0.5)
            .with_sigma(0.0)
            .with_mu(1.0);
        let mut noise = OrnsteinUhlenbeckNoise::new(1, &config);

        assert_eq!(noise.sample(), vec![0.5]);
        assert_eq!(noise.sample(), vec![0.75]);
        assert_eq!(noise.sample(), vec![0.875]);
    }

    #[test]
    fn test_clear_resets_to_zero() {
        let config = OrnsteinUhlenbeckConfig::new().with_sigma(1.0).with_seed(Some(1));
        let mut noise = OrnsteinUhlenbeckNoise::new(3, &config);
        for _ in 0..25 {
            noise.sample();
        }
        assert!(noise.state().iter().any(|x| *x != 0.0));

        noise.clear();

        assert_eq!(noise.state(), &[0.0, 0.0, 0.0]);
    }
}
