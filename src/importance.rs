//! Importance sampling over a scalar target density.

use rand::Rng;

use crate::error::{Error, Result};

/// One draw from the proposal together with its importance weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportanceSample {
    pub value: f64,
    /// Raw weight target(x) / proposal(x).
    pub weight: f64,
    /// Weight divided by the sum of all raw weights in the batch.
    pub normalized_weight: f64,
}

/// Draw `n` values from the proposal and weight each by
/// target(x) / proposal(x).
///
/// The proposal must cover the target's support: a draw where the proposal
/// density underestimates the target inflates its weight without bound, and
/// that coverage is the caller's obligation. Densities need not be
/// normalized; normalization constants cancel in the normalized weights.
///
/// A batch whose raw weights are all zero (the target vanished at every
/// drawn point) has no defined normalization; its normalized weights are
/// NaN and so is any estimate built on them. Check the raw weights before
/// trusting a batch from a mismatched proposal.
pub fn importance_sample<T, D, Q, E, R>(
    mut target: T,
    mut proposal_draw: D,
    proposal_density: Q,
    n: usize,
    rng: &mut R,
) -> Result<Vec<ImportanceSample>>
where
    T: FnMut(f64) -> std::result::Result<f64, E>,
    D: FnMut(&mut R) -> f64,
    Q: Fn(f64) -> f64,
    E: std::error::Error + Send + Sync + 'static,
    R: Rng + ?Sized,
{
    if n == 0 {
        return Err(Error::parameter("n", "must draw at least one sample"));
    }
    let mut samples = Vec::with_capacity(n);
    let mut weight_sum = 0.0;
    for _ in 0..n {
        let value = proposal_draw(rng);
        let weight = target(value).map_err(Error::target)? / proposal_density(value);
        weight_sum += weight;
        samples.push(ImportanceSample {
            value,
            weight,
            normalized_weight: 0.0,
        });
    }
    for sample in samples.iter_mut() {
        sample.normalized_weight = sample.weight / weight_sum;
    }
    Ok(samples)
}

/// Self-normalized importance estimate of the target mean.
pub fn weighted_mean(samples: &[ImportanceSample]) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(samples
        .iter()
        .map(|s| s.value * s.normalized_weight)
        .sum())
}
