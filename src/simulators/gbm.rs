// src/simulators/gbm.rs

use crate::config::{MAX_PATH_SAMPLES, PRICE_CEILING, PRICE_FLOOR};
use crate::error::SimulationError;
use crate::types::path::{PricePath, PricePoint};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Geometric Brownian motion sampler for a whole session's price path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GBMSimulator {
    initial_price: f64,
    drift: f64,
    volatility: f64,
}

impl GBMSimulator {
    pub fn new(initial_price: f64, drift: f64, volatility: f64) -> Self {
        Self {
            initial_price,
            drift,
            volatility,
        }
    }

    /// Samples `floor(horizon / step)` prices on a uniform grid from 0 to
    /// `horizon`. Each call draws fresh shocks from `rng`.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        horizon: f64,
        step: f64,
        rng: &mut R,
    ) -> Result<PricePath, SimulationError> {
        self.validate(horizon, step)?;
        let ratio = horizon / step;
        if !ratio.is_finite() || ratio > MAX_PATH_SAMPLES as f64 {
            return Err(SimulationError::InvalidParameters(format!(
                "horizon {horizon} over step {step} exceeds {MAX_PATH_SAMPLES} samples"
            )));
        }
        let n = sample_count(horizon, step);
        if n == 0 {
            return Err(SimulationError::InvalidParameters(format!(
                "horizon {horizon} is shorter than one step of {step}"
            )));
        }

        // Discretized Wiener path: cumulative shocks scaled by sqrt(dt).
        let sqrt_step = step.sqrt();
        let mut wiener = 0.0;
        // Ito correction, ref: the mu - sigma^2/2 term of the GBM closed form.
        let log_drift = self.drift - 0.5 * self.volatility.powi(2);

        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let shock: f64 = StandardNormal.sample(rng);
            wiener += shock * sqrt_step;
            let time = grid_time(i, n, horizon);
            let log_return = log_drift * time + self.volatility * wiener;
            let price = (self.initial_price * log_return.exp()).clamp(PRICE_FLOOR, PRICE_CEILING);
            points.push(PricePoint { time, price });
        }
        Ok(PricePath::new(points))
    }

    fn validate(&self, horizon: f64, step: f64) -> Result<(), SimulationError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SimulationError::InvalidParameters(format!(
                    "{name} must be a positive number, got {v}"
                )))
            }
        };
        positive("initial price", self.initial_price)?;
        positive("horizon", horizon)?;
        positive("step", step)?;
        if !self.drift.is_finite() {
            return Err(SimulationError::InvalidParameters(format!(
                "drift must be finite, got {}",
                self.drift
            )));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(SimulationError::InvalidParameters(format!(
                "volatility must be finite and non-negative, got {}",
                self.volatility
            )));
        }
        Ok(())
    }
}

/// Convenience wrapper over [`GBMSimulator::simulate`].
pub fn simulate<R: Rng + ?Sized>(
    initial_price: f64,
    drift: f64,
    volatility: f64,
    horizon: f64,
    step: f64,
    rng: &mut R,
) -> Result<PricePath, SimulationError> {
    GBMSimulator::new(initial_price, drift, volatility).simulate(horizon, step, rng)
}

/// `floor(horizon / step)`, nudged so a ratio like `1 / (1/252)` that lands a
/// few ulps under an integer still counts that last step.
pub fn sample_count(horizon: f64, step: f64) -> usize {
    let ratio = horizon / step;
    (ratio * (1.0 + 4.0 * f64::EPSILON)).floor() as usize
}

// linspace(0, horizon, n); a single sample sits at t = 0.
#[inline]
fn grid_time(i: usize, n: usize, horizon: f64) -> f64 {
    if n == 1 {
        0.0
    } else {
        i as f64 / (n - 1) as f64 * horizon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn daily_grid_has_252_points_spanning_the_horizon() {
        let mut rng = StdRng::seed_from_u64(7);
        let path = simulate(150.0, 0.0005, 0.02, 1.0, 1.0 / 252.0, &mut rng).unwrap();

        assert_eq!(path.len(), 252);
        let points = path.points();
        assert_eq!(points[0].time, 0.0);
        assert_eq!(points[251].time, 1.0);
        assert!(points.windows(2).all(|w| w[1].time > w[0].time));
    }

    #[test]
    fn same_seed_same_path() {
        let sim = GBMSimulator::new(180.0, 0.05, 0.3);
        let a = sim.simulate(1.0, 0.01, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = sim.simulate(1.0, 0.01, &mut StdRng::seed_from_u64(11)).unwrap();
        let c = sim.simulate(1.0, 0.01, &mut StdRng::seed_from_u64(12)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn zero_volatility_follows_the_drift_exactly() {
        let mut rng = StdRng::seed_from_u64(1);
        let path = simulate(150.0, 0.1, 0.0, 2.0, 0.5, &mut rng).unwrap();
        assert_eq!(path.len(), 4);
        for p in path.points() {
            let expected = 150.0 * (0.1 * p.time).exp();
            assert!((p.price - expected).abs() < 1e-9, "{} vs {}", p.price, expected);
        }
    }

    #[test]
    fn wild_paths_are_clamped_into_the_band() {
        let mut rng = StdRng::seed_from_u64(3);
        let path = simulate(250.0, 0.0, 10.0, 1.0, 0.01, &mut rng).unwrap();
        assert!(path.prices().iter().all(|p| (PRICE_FLOOR..=PRICE_CEILING).contains(p)));
        // The Ito term alone drags this path onto the floor by the end.
        assert_eq!(path.last_price(), Some(PRICE_FLOOR));
    }

    #[test]
    fn prices_outside_the_band_start_at_the_wall() {
        let mut rng = StdRng::seed_from_u64(5);
        let path = simulate(20.0, 0.0, 0.0, 1.0, 0.1, &mut rng).unwrap();
        assert!(path.prices().iter().all(|&p| p == PRICE_FLOOR));
    }

    #[test]
    fn single_sample_sits_at_time_zero() {
        let mut rng = StdRng::seed_from_u64(9);
        let path = simulate(150.0, 0.0, 0.2, 1.0, 0.75, &mut rng).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.points()[0].time, 0.0);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let cases = [
            (150.0, 0.0, 0.2, 1.0, 0.0),
            (150.0, 0.0, 0.2, 0.0, 0.1),
            (150.0, 0.0, 0.2, -1.0, 0.1),
            (0.0, 0.0, 0.2, 1.0, 0.1),
            (150.0, 0.0, -0.2, 1.0, 0.1),
            (150.0, f64::NAN, 0.2, 1.0, 0.1),
            (150.0, 0.0, 0.2, 1.0, 2.0), // step longer than the horizon
        ];
        for (s0, mu, sigma, horizon, step) in cases {
            let res = simulate(s0, mu, sigma, horizon, step, &mut rng);
            assert!(
                matches!(res, Err(SimulationError::InvalidParameters(_))),
                "expected rejection for {:?}",
                (s0, mu, sigma, horizon, step)
            );
        }
    }

    #[test]
    fn oversized_grids_are_rejected_before_allocating() {
        let mut rng = StdRng::seed_from_u64(0);
        for (horizon, step) in [(1e30, 1e-10), (1.0, f64::MIN_POSITIVE), (2.0, 1e-6)] {
            let res = simulate(150.0, 0.0, 0.2, horizon, step, &mut rng);
            assert!(
                matches!(res, Err(SimulationError::InvalidParameters(_))),
                "expected rejection for horizon {horizon}, step {step}"
            );
        }

        let at_cap = simulate(150.0, 0.0, 0.2, MAX_PATH_SAMPLES as f64, 1.0, &mut rng).unwrap();
        assert_eq!(at_cap.len(), MAX_PATH_SAMPLES);
    }

    #[test]
    fn sample_count_survives_reciprocal_rounding() {
        assert_eq!(sample_count(1.0, 1.0 / 252.0), 252);
        assert_eq!(sample_count(1.0, 0.1), 10);
        assert_eq!(sample_count(1.0, 0.3), 3);
        assert_eq!(sample_count(0.5, 1.0), 0);
    }

    proptest! {
        #[test]
        fn paths_keep_length_band_and_grid(
            s0 in 1.0f64..1000.0,
            mu in -1.0f64..1.0,
            sigma in 0.0f64..2.0,
            horizon in 0.1f64..10.0,
            steps in 1usize..400,
            seed in any::<u64>(),
        ) {
            let step = horizon / steps as f64;
            let mut rng = StdRng::seed_from_u64(seed);
            let path = simulate(s0, mu, sigma, horizon, step, &mut rng).unwrap();

            prop_assert_eq!(path.len(), sample_count(horizon, step));
            prop_assert_eq!(path.points()[0].time, 0.0);
            if path.len() > 1 {
                prop_assert!((path.points()[path.len() - 1].time - horizon).abs() < 1e-12);
            }
            prop_assert!(path.points().windows(2).all(|w| w[1].time > w[0].time));
            prop_assert!(path.prices().iter().all(|p| (PRICE_FLOOR..=PRICE_CEILING).contains(p)));
        }
    }
}
