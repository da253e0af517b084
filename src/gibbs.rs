//! Two-variable Gibbs sampling.

use rand::Rng;

use crate::chain::{run_chain, Chain, Trace};
use crate::error::{Error, Result};

/// Gibbs kernel over a bivariate target, built from its two full
/// conditionals.
///
/// Each closure draws one coordinate exactly from its conditional law given
/// the other coordinate's current value. Because conditional draws are exact,
/// every sweep is accepted.
pub struct GibbsChain<A, B, R> {
    cond_first: A,
    cond_second: B,
    rng: R,
    position: [f64; 2],
}

impl<A, B, R> GibbsChain<A, B, R>
where
    A: FnMut(&mut R, f64) -> Result<f64>,
    B: FnMut(&mut R, f64) -> Result<f64>,
    R: Rng,
{
    pub fn new(cond_first: A, cond_second: B, rng: R) -> Self {
        Self {
            cond_first,
            cond_second,
            rng,
            position: [0.0; 2],
        }
    }
}

impl<A, B, R> Chain for GibbsChain<A, B, R>
where
    A: FnMut(&mut R, f64) -> Result<f64>,
    B: FnMut(&mut R, f64) -> Result<f64>,
    R: Rng,
{
    fn set_position(&mut self, position: &[f64]) -> Result<()> {
        if position.len() != 2 {
            return Err(Error::parameter(
                "position",
                format!("bivariate chain, got dimension {}", position.len()),
            ));
        }
        self.position.copy_from_slice(position);
        Ok(())
    }

    fn draw(&mut self) -> Result<(Box<[f64]>, bool)> {
        self.position[0] = (self.cond_first)(&mut self.rng, self.position[1])?;
        self.position[1] = (self.cond_second)(&mut self.rng, self.position[0])?;
        let position: Box<[f64]> = Box::new(self.position);
        Ok((position, true))
    }

    fn dim(&self) -> usize {
        2
    }
}

/// Run a two-variable Gibbs sampler from `initial` for `iterations` sweeps.
///
/// Takes the generator by value; pass `&mut rng` to keep using it
/// afterwards.
pub fn gibbs<A, B, R>(
    cond_first: A,
    cond_second: B,
    initial: [f64; 2],
    iterations: u64,
    rng: R,
) -> Result<Trace>
where
    A: FnMut(&mut R, f64) -> Result<f64>,
    B: FnMut(&mut R, f64) -> Result<f64>,
    R: Rng,
{
    let mut chain = GibbsChain::new(cond_first, cond_second, rng);
    run_chain(&mut chain, &initial, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::Normal;
    use crate::estimator;
    use crate::seeded_rng;

    #[test]
    fn bivariate_normal_marginals() {
        // standard bivariate normal with correlation rho: each conditional
        // is Normal(rho * other, sqrt(1 - rho^2))
        let rho = 0.6_f64;
        let sigma = (1.0 - rho * rho).sqrt();
        let mut rng = seeded_rng(41);
        let trace = gibbs(
            |rng, other| Ok(Normal::new(rho * other, sigma)?.sample(rng)),
            |rng, other| Ok(Normal::new(rho * other, sigma)?.sample(rng)),
            [0.0, 0.0],
            50_000,
            &mut rng,
        )
        .unwrap();

        for coord in 0..2 {
            let xs = trace.coordinate(coord);
            let mean = estimator::mean(&xs).unwrap();
            let var = estimator::variance(&xs).unwrap();
            assert!(mean.abs() < 0.05, "coord {coord} mean {mean}");
            assert!((var - 1.0).abs() < 0.1, "coord {coord} variance {var}");
        }

        // empirical correlation should recover rho
        let xs = trace.coordinate(0);
        let ys = trace.coordinate(1);
        let cov = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| x * y)
            .sum::<f64>()
            / xs.len() as f64;
        assert!((cov - rho).abs() < 0.05, "covariance {cov}");
    }

    #[test]
    fn every_sweep_is_accepted() {
        let mut rng = seeded_rng(42);
        let trace = gibbs(
            |rng, _| Ok(Normal::new(0.0, 1.0)?.sample(rng)),
            |rng, _| Ok(Normal::new(0.0, 1.0)?.sample(rng)),
            [0.0, 0.0],
            100,
            &mut rng,
        )
        .unwrap();
        assert_eq!(trace.accepted(), 100);
        assert!((trace.acceptance_rate() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn driver_leaves_a_borrowed_generator_usable() {
        let mut rng = seeded_rng(45);
        let first = gibbs(
            |rng, _| Ok(Normal::new(0.0, 1.0)?.sample(rng)),
            |rng, _| Ok(Normal::new(0.0, 1.0)?.sample(rng)),
            [0.0, 0.0],
            50,
            &mut rng,
        )
        .unwrap();
        // the same handle drives a second run, which must continue the
        // stream rather than repeat it
        let second = gibbs(
            |rng, _| Ok(Normal::new(0.0, 1.0)?.sample(rng)),
            |rng, _| Ok(Normal::new(0.0, 1.0)?.sample(rng)),
            [0.0, 0.0],
            50,
            &mut rng,
        )
        .unwrap();
        assert_eq!(first.positions().len(), 50);
        assert_ne!(first.positions(), second.positions());
    }

    #[test]
    fn conditional_error_aborts_the_sweep() {
        let mut rng = seeded_rng(43);
        let result = gibbs(
            |_rng: &mut _, _| Err(Error::EmptyInput),
            |rng, _| Ok(Normal::new(0.0, 1.0)?.sample(rng)),
            [0.0, 0.0],
            10,
            &mut rng,
        );
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn wrong_initial_dimension_is_rejected() {
        let rng = seeded_rng(44);
        let mut chain = GibbsChain::new(
            |rng: &mut _, _| Ok(Normal::new(0.0, 1.0)?.sample(rng)),
            |rng: &mut _, _| Ok(Normal::new(0.0, 1.0)?.sample(rng)),
            rng,
        );
        assert!(chain.set_position(&[0.0]).is_err());
    }
}
