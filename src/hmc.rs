//! Hamiltonian Monte Carlo with a fixed step size and trajectory length.

use rand::Rng;

use crate::chain::{run_chain, Chain, LogpFunc, LogpGradFunc, Trace};
use crate::dist::standard_normal;
use crate::error::{Error, Result};
use crate::math::{axpy, vector_dot};

/// Adapter turning an infallible closure into a [`LogpGradFunc`]. The
/// closure fills the gradient slice and returns the log-density.
pub struct GradientFn<F> {
    dim: usize,
    logp_grad: F,
}

impl<F: FnMut(&[f64], &mut [f64]) -> f64> GradientFn<F> {
    pub fn new(dim: usize, logp_grad: F) -> Self {
        Self { dim, logp_grad }
    }
}

impl<F: FnMut(&[f64], &mut [f64]) -> f64> LogpFunc for GradientFn<F> {
    type Err = std::convert::Infallible;

    fn dim(&self) -> usize {
        self.dim
    }

    fn logp(&mut self, position: &[f64]) -> std::result::Result<f64, Self::Err> {
        let mut grad = vec![0.0; self.dim];
        Ok((self.logp_grad)(position, &mut grad))
    }
}

impl<F: FnMut(&[f64], &mut [f64]) -> f64> LogpGradFunc for GradientFn<F> {
    fn logp_grad(
        &mut self,
        position: &[f64],
        grad: &mut [f64],
    ) -> std::result::Result<f64, Self::Err> {
        Ok((self.logp_grad)(position, grad))
    }
}

/// HMC kernel: momentum drawn from independent standard normals, a leapfrog
/// trajectory of `leapfrog_steps` steps of size `step_size`, then a
/// Metropolis correction on the Hamiltonian difference.
///
/// Both tuning constants stay fixed for the whole run; there is no
/// adaptation.
pub struct HmcChain<T, R> {
    target: T,
    rng: R,
    step_size: f64,
    leapfrog_steps: u64,
    position: Vec<f64>,
    momentum: Vec<f64>,
    candidate: Vec<f64>,
    grad: Vec<f64>,
    logp: Option<f64>,
}

impl<T, R> HmcChain<T, R>
where
    T: LogpGradFunc,
    R: Rng,
{
    pub fn new(target: T, step_size: f64, leapfrog_steps: u64, rng: R) -> Result<Self> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(Error::parameter(
                "step_size",
                format!("must be positive and finite, got {step_size}"),
            ));
        }
        if leapfrog_steps == 0 {
            return Err(Error::parameter(
                "leapfrog_steps",
                "must be at least one",
            ));
        }
        let dim = target.dim();
        Ok(Self {
            target,
            rng,
            step_size,
            leapfrog_steps,
            position: vec![0.0; dim],
            momentum: vec![0.0; dim],
            candidate: vec![0.0; dim],
            grad: vec![0.0; dim],
            logp: None,
        })
    }

    /// Run the leapfrog integrator from `self.candidate` in place, returning
    /// the log-density at the endpoint.
    fn leapfrog(&mut self) -> Result<f64> {
        let eps = self.step_size;
        let mut logp = self
            .target
            .logp_grad(&self.candidate, &mut self.grad)
            .map_err(Error::target)?;
        axpy(&self.grad, &mut self.momentum, eps / 2.0);
        for step in 0..self.leapfrog_steps {
            axpy(&self.momentum, &mut self.candidate, eps);
            logp = self
                .target
                .logp_grad(&self.candidate, &mut self.grad)
                .map_err(Error::target)?;
            let momentum_step = if step + 1 == self.leapfrog_steps {
                eps / 2.0
            } else {
                eps
            };
            axpy(&self.grad, &mut self.momentum, momentum_step);
        }
        Ok(logp)
    }
}

impl<T, R> Chain for HmcChain<T, R>
where
    T: LogpGradFunc,
    R: Rng,
{
    fn set_position(&mut self, position: &[f64]) -> Result<()> {
        if position.len() != self.position.len() {
            return Err(Error::parameter(
                "position",
                format!(
                    "dimension mismatch: chain has {}, position has {}",
                    self.position.len(),
                    position.len()
                ),
            ));
        }
        self.position.copy_from_slice(position);
        self.logp = None;
        Ok(())
    }

    fn draw(&mut self) -> Result<(Box<[f64]>, bool)> {
        let current_logp = match self.logp {
            Some(v) => v,
            None => {
                let v = self
                    .target
                    .logp_grad(&self.position, &mut self.grad)
                    .map_err(Error::target)?;
                self.logp = Some(v);
                v
            }
        };

        for p in self.momentum.iter_mut() {
            *p = standard_normal(&mut self.rng);
        }
        let kinetic_start = 0.5 * vector_dot(&self.momentum, &self.momentum);

        self.candidate.copy_from_slice(&self.position);
        let proposed_logp = self.leapfrog()?;
        let kinetic_end = 0.5 * vector_dot(&self.momentum, &self.momentum);

        let h_start = kinetic_start - current_logp;
        let h_end = kinetic_end - proposed_logp;
        // NaN from a divergent trajectory compares false and rejects
        let accepted = self.rng.random::<f64>() < (h_start - h_end).exp();
        if accepted {
            std::mem::swap(&mut self.position, &mut self.candidate);
            self.logp = Some(proposed_logp);
        }
        Ok((self.position.clone().into_boxed_slice(), accepted))
    }

    fn dim(&self) -> usize {
        self.position.len()
    }
}

/// Run an HMC chain over an infallible log-density-with-gradient closure.
pub fn hmc<F, R>(
    dim: usize,
    logp_grad: F,
    initial: &[f64],
    iterations: u64,
    step_size: f64,
    leapfrog_steps: u64,
    rng: &mut R,
) -> Result<Trace>
where
    F: FnMut(&[f64], &mut [f64]) -> f64,
    R: Rng,
{
    let target = GradientFn::new(dim, logp_grad);
    let mut chain = HmcChain::new(target, step_size, leapfrog_steps, rng)?;
    run_chain(&mut chain, initial, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator;
    use crate::seeded_rng;

    fn standard_normal_logp(x: &[f64], grad: &mut [f64]) -> f64 {
        let mut logp = 0.0;
        for (g, &xi) in grad.iter_mut().zip(x) {
            *g = -xi;
            logp -= 0.5 * xi * xi;
        }
        logp
    }

    #[test]
    fn standard_normal_target_moments() {
        let mut rng = seeded_rng(51);
        let trace = hmc(
            1,
            standard_normal_logp,
            &[0.5],
            20_000,
            0.2,
            10,
            &mut rng,
        )
        .unwrap();
        let xs = trace.coordinate(0);
        let mean = estimator::mean(&xs).unwrap();
        let var = estimator::variance(&xs).unwrap();
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.1, "variance {var}");
        // well-tuned leapfrog should accept nearly everything
        assert!(trace.acceptance_rate() > 0.9, "{}", trace.acceptance_rate());
    }

    #[test]
    fn shifted_three_dimensional_target() {
        let mut rng = seeded_rng(52);
        let mu = [1.0, -2.0, 0.5];
        let trace = hmc(
            3,
            move |x, grad| {
                let mut logp = 0.0;
                for i in 0..3 {
                    let d = x[i] - mu[i];
                    grad[i] = -d;
                    logp -= 0.5 * d * d;
                }
                logp
            },
            &mu,
            20_000,
            0.15,
            12,
            &mut rng,
        )
        .unwrap();
        for (i, &target_mean) in mu.iter().enumerate() {
            let mean = estimator::mean(&trace.coordinate(i)).unwrap();
            assert!((mean - target_mean).abs() < 0.1, "coord {i} mean {mean}");
        }
    }

    #[test]
    fn bad_tuning_constants_are_rejected() {
        let rng = seeded_rng(53);
        let target = GradientFn::new(1, standard_normal_logp);
        assert!(HmcChain::new(target, 0.0, 10, rng).is_err());
        let rng = seeded_rng(53);
        let target = GradientFn::new(1, standard_normal_logp);
        assert!(HmcChain::new(target, 0.1, 0, rng).is_err());
    }

    #[test]
    fn oversized_step_still_terminates() {
        // a wildly large step diverges; every proposal is rejected rather
        // than aborting
        let mut rng = seeded_rng(54);
        let trace = hmc(
            1,
            standard_normal_logp,
            &[0.0],
            200,
            50.0,
            5,
            &mut rng,
        )
        .unwrap();
        assert_eq!(trace.positions().len(), 200);
        assert!(trace.acceptance_rate() < 0.5);
    }
}
