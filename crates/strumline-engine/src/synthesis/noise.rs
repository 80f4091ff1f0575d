//! Noise synthesis for the point's click.

use rand::Rng;
use rand_pcg::Pcg32;

use super::Synthesizer;

/// Uniform white noise in `[-1, 1)`, one fresh draw per sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseBurst;

impl Synthesizer for NoiseBurst {
    fn synthesize(&self, num_samples: usize, _sample_rate: f64, rng: &mut Pcg32) -> Vec<f64> {
        (0..num_samples).map(|_| rng.gen_range(-1.0..1.0)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_white_noise_statistics() {
        let samples = NoiseBurst.synthesize(20_000, 44100.0, &mut create_rng(9));

        assert!(samples.iter().all(|s| (-1.0..1.0).contains(s)));

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.03, "mean {}", mean);

        // Uniform(-1, 1) has variance 1/3
        let variance =
            samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!((variance - 1.0 / 3.0).abs() < 0.02, "variance {}", variance);
    }
}
