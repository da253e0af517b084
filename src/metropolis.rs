//! Random-walk Metropolis-Hastings.

use rand::Rng;

use crate::chain::{run_chain, Chain, DensityFn, LogpFunc, Trace};
use crate::dist::standard_normal;
use crate::error::{Error, Result};

/// Metropolis-Hastings kernel over a caller log-density.
///
/// The proposal closure reads the current position and fills the candidate
/// buffer. It must be symmetric: q(x'|x) = q(x|x'). For an asymmetric
/// proposal, fold the proposal-density ratio into the target instead.
/// Densities need not be normalized.
pub struct MetropolisChain<T, P, R> {
    target: T,
    proposal: P,
    rng: R,
    position: Vec<f64>,
    candidate: Vec<f64>,
    logp: Option<f64>,
}

impl<T, P, R> MetropolisChain<T, P, R>
where
    T: LogpFunc,
    P: FnMut(&mut R, &[f64], &mut [f64]),
    R: Rng,
{
    pub fn new(target: T, proposal: P, rng: R) -> Self {
        let dim = target.dim();
        Self {
            target,
            proposal,
            rng,
            position: vec![0.0; dim],
            candidate: vec![0.0; dim],
            logp: None,
        }
    }
}

impl<T, P, R> Chain for MetropolisChain<T, P, R>
where
    T: LogpFunc,
    P: FnMut(&mut R, &[f64], &mut [f64]),
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
        let current = match self.logp {
            Some(v) => v,
            None => {
                let v = self.target.logp(&self.position).map_err(Error::target)?;
                self.logp = Some(v);
                v
            }
        };

        (self.proposal)(&mut self.rng, &self.position, &mut self.candidate);
        let proposed = self.target.logp(&self.candidate).map_err(Error::target)?;

        // NaN (e.g. -inf minus -inf on a zero-density target) compares
        // false and rejects
        let accept = (proposed - current).exp();
        let accepted = self.rng.random::<f64>() < accept;
        if accepted {
            std::mem::swap(&mut self.position, &mut self.candidate);
            self.logp = Some(proposed);
        }
        Ok((self.position.clone().into_boxed_slice(), accepted))
    }

    fn dim(&self) -> usize {
        self.target.dim()
    }
}

/// Symmetric Gaussian random-walk proposal with the given step scale.
pub fn gaussian_step<R: Rng>(scale: f64) -> impl FnMut(&mut R, &[f64], &mut [f64]) {
    move |rng, position, candidate| {
        for (c, &p) in candidate.iter_mut().zip(position) {
            *c = p + scale * standard_normal(rng);
        }
    }
}

/// Run a Gaussian random-walk Metropolis-Hastings chain over an infallible
/// log-density closure.
pub fn metropolis_hastings<F, R>(
    dim: usize,
    logp: F,
    initial: &[f64],
    iterations: u64,
    step_scale: f64,
    rng: &mut R,
) -> Result<Trace>
where
    F: FnMut(&[f64]) -> f64,
    R: Rng,
{
    if !(step_scale.is_finite() && step_scale > 0.0) {
        return Err(Error::parameter(
            "step_scale",
            format!("must be positive and finite, got {step_scale}"),
        ));
    }
    let target = DensityFn::new(dim, logp);
    let mut chain = MetropolisChain::new(target, gaussian_step(step_scale), rng);
    run_chain(&mut chain, initial, iterations)
}
