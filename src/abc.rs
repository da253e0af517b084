//! Approximate Bayesian computation by simulation matching.

use rand::Rng;

use crate::error::{Error, Result};

/// Collect `particles` approximate posterior draws: repeatedly draw θ from
/// the prior, simulate a summary statistic under θ, and keep θ when the
/// summary lands within `tolerance` of the observed value.
///
/// There is no attempt limit. A tolerance the simulator rarely hits makes
/// the loop arbitrarily slow; choosing a feasible tolerance is the caller's
/// obligation.
pub fn abc_sample<P, S, E, R>(
    mut prior_draw: P,
    mut simulate: S,
    observed: f64,
    tolerance: f64,
    particles: usize,
    rng: &mut R,
) -> Result<Vec<f64>>
where
    P: FnMut(&mut R) -> f64,
    S: FnMut(&mut R, f64) -> std::result::Result<f64, E>,
    E: std::error::Error + Send + Sync + 'static,
    R: Rng + ?Sized,
{
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(Error::parameter(
            "tolerance",
            format!("must be positive and finite, got {tolerance}"),
        ));
    }
    if particles == 0 {
        return Err(Error::parameter("particles", "must be at least one"));
    }
    let mut accepted = Vec::with_capacity(particles);
    while accepted.len() < particles {
        let theta = prior_draw(rng);
        let summary = simulate(rng, theta).map_err(Error::target)?;
        if (summary - observed).abs() < tolerance {
            accepted.push(theta);
        }
    }
    Ok(accepted)
}
