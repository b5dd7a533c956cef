//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG plus the handful of continuous distributions the
//! passenger-flow model samples from.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers → same simulation result.
//! Inter-arrival gaps, passenger classes, flight deadlines and service
//! durations are all drawn from one `RngManager`, in event order.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use airport_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let gap = rng.exponential(2.0);
/// let service = rng.normal(3.0, 1.0);
/// assert!(gap >= 0.0);
/// assert!(service.is_finite());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 (xorshift cannot leave the all-zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Get current RNG state (for replay)
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    ///
    /// # Example
    /// ```
    /// use airport_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(12345);
    /// let probability = rng.next_f64();
    /// assert!(probability >= 0.0 && probability < 1.0);
    /// ```
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Top 53 bits → [0.0, 1.0)
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform f64 in [min, max). Returns `min` when the interval is empty.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.next_f64()
    }

    /// Exponential sample with the given rate (mean = 1 / rate).
    ///
    /// A non-positive rate yields `f64::INFINITY` (the event never happens).
    pub fn exponential(&mut self, rate: f64) -> f64 {
        if rate <= 0.0 {
            return f64::INFINITY;
        }
        // 1 - u lies in (0, 1], so ln never sees zero
        let u = 1.0 - self.next_f64();
        -u.ln() / rate
    }

    /// Normal sample via the Box-Muller transform.
    ///
    /// With `std_dev == 0` the mean is returned exactly.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + std_dev * self.standard_normal()
    }

    fn standard_normal(&mut self) -> f64 {
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&val),
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_uniform_stays_in_bounds() {
        let mut rng = RngManager::new(7);
        for _ in 0..1000 {
            let v = rng.uniform(60.0, 180.0);
            assert!((60.0..180.0).contains(&v));
        }
        assert_eq!(rng.uniform(5.0, 5.0), 5.0);
    }

    #[test]
    fn test_exponential_mean_close_to_inverse_rate() {
        let mut rng = RngManager::new(99);
        let n = 20_000;
        let sum: f64 = (0..n).map(|_| rng.exponential(2.0)).sum();
        let mean = sum / n as f64;
        assert!((mean - 0.5).abs() < 0.03, "mean was {}", mean);
    }

    #[test]
    fn test_exponential_zero_rate_is_infinite() {
        let mut rng = RngManager::new(1);
        assert_eq!(rng.exponential(0.0), f64::INFINITY);
    }

    #[test]
    fn test_normal_zero_std_returns_mean() {
        let mut rng = RngManager::new(3);
        for _ in 0..10 {
            assert_eq!(rng.normal(0.5, 0.0), 0.5);
        }
    }

    #[test]
    fn test_normal_sample_moments() {
        let mut rng = RngManager::new(2024);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.normal(3.0, 1.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 3.0).abs() < 0.05, "mean was {}", mean);
        assert!((var - 1.0).abs() < 0.08, "variance was {}", var);
    }
}
