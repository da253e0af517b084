//! Markov-chain abstractions shared by the MCMC transition kernels.

use std::convert::Infallible;

use crate::error::{Error, Result};

/// An unnormalized log-density over a fixed-dimension state space.
///
/// Evaluation is fallible; a failure aborts the chain that called it, with
/// the source preserved in [`Error::TargetEvaluation`].
pub trait LogpFunc {
    type Err: std::error::Error + Send + Sync + 'static;

    fn dim(&self) -> usize;

    fn logp(&mut self, position: &[f64]) -> std::result::Result<f64, Self::Err>;
}

/// A log-density that can also fill its gradient at a position.
///
/// `logp_grad` writes the gradient into `grad` and returns the log-density
/// value, one evaluation for both.
pub trait LogpGradFunc: LogpFunc {
    fn logp_grad(
        &mut self,
        position: &[f64],
        grad: &mut [f64],
    ) -> std::result::Result<f64, Self::Err>;
}

/// Adapter turning an infallible closure into a [`LogpFunc`].
pub struct DensityFn<F> {
    dim: usize,
    logp: F,
}

impl<F: FnMut(&[f64]) -> f64> DensityFn<F> {
    pub fn new(dim: usize, logp: F) -> Self {
        Self { dim, logp }
    }
}

impl<F: FnMut(&[f64]) -> f64> LogpFunc for DensityFn<F> {
    type Err = Infallible;

    fn dim(&self) -> usize {
        self.dim
    }

    fn logp(&mut self, position: &[f64]) -> std::result::Result<f64, Self::Err> {
        Ok((self.logp)(position))
    }
}

/// A Markov-chain transition kernel.
pub trait Chain {
    /// Overwrite the current position. The chain re-evaluates its target on
    /// the next draw.
    fn set_position(&mut self, position: &[f64]) -> Result<()>;

    /// Advance one step, returning the new position and whether the proposal
    /// was accepted.
    fn draw(&mut self) -> Result<(Box<[f64]>, bool)>;

    fn dim(&self) -> usize;
}

/// The ordered output of one chain run.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    positions: Vec<Box<[f64]>>,
    accepted: u64,
    iterations: u64,
}

impl Trace {
    pub fn positions(&self) -> &[Box<[f64]>] {
        &self.positions
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Fraction of proposals accepted over the run.
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted as f64 / self.iterations as f64
        }
    }

    /// A run that never moved. Happens when every proposal landed in a
    /// zero-density region, leaving the trace stuck at its initial position.
    pub fn is_degenerate(&self) -> bool {
        self.iterations > 0 && self.accepted == 0
    }

    /// Values of coordinate `index` across the trace.
    pub fn coordinate(&self, index: usize) -> Vec<f64> {
        self.positions.iter().map(|p| p[index]).collect()
    }
}

/// Drive `chain` from `initial` for `iterations` draws, collecting every
/// position into a [`Trace`]. Any draw error aborts the run with no partial
/// trace.
pub fn run_chain<C: Chain>(chain: &mut C, initial: &[f64], iterations: u64) -> Result<Trace> {
    if initial.len() != chain.dim() {
        return Err(Error::parameter(
            "initial",
            format!(
                "dimension mismatch: chain has {}, initial position has {}",
                chain.dim(),
                initial.len()
            ),
        ));
    }
    chain.set_position(initial)?;
    let mut positions = Vec::with_capacity(iterations as usize);
    let mut accepted = 0u64;
    for _ in 0..iterations {
        let (position, was_accepted) = chain.draw()?;
        if was_accepted {
            accepted += 1;
        }
        positions.push(position);
    }
    Ok(Trace {
        positions,
        accepted,
        iterations,
    })
}
