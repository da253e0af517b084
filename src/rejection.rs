//! Rejection sampling under a caller-supplied envelope.

use rand::Rng;

use crate::error::{Error, Result};

/// Accepted samples together with the total number of proposal attempts,
/// for acceptance-rate diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectionRun {
    pub samples: Vec<f64>,
    pub attempts: u64,
}

impl RejectionRun {
    /// Fraction of attempts that were accepted. The theoretical rate is
    /// 1/M when both densities are normalized.
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.samples.len() as f64 / self.attempts as f64
        }
    }
}

fn check_envelope(envelope: f64, max_attempts: u64) -> Result<()> {
    if !(envelope.is_finite() && envelope > 0.0) {
        return Err(Error::parameter(
            "envelope",
            format!("must be positive and finite, got {envelope}"),
        ));
    }
    if max_attempts == 0 {
        return Err(Error::parameter("max_attempts", "must be at least one"));
    }
    Ok(())
}

/// One accepted draw plus the attempts it took.
fn accept_one<T, D, Q, E, R>(
    target: &mut T,
    proposal_draw: &mut D,
    proposal_density: &Q,
    envelope: f64,
    max_attempts: u64,
    rng: &mut R,
) -> Result<(f64, u64)>
where
    T: FnMut(f64) -> std::result::Result<f64, E>,
    D: FnMut(&mut R) -> f64,
    Q: Fn(f64) -> f64,
    E: std::error::Error + Send + Sync + 'static,
    R: Rng + ?Sized,
{
    for attempt in 1..=max_attempts {
        let x = proposal_draw(rng);
        let bound = envelope * proposal_density(x);
        let density = target(x).map_err(Error::target)?;
        if rng.random::<f64>() * bound < density {
            return Ok((x, attempt));
        }
    }
    Err(Error::RejectionExhausted {
        attempts: max_attempts,
    })
}

/// Draw one sample from the target by rejection against
/// `envelope * proposal_density`.
///
/// The envelope constant must satisfy target(x) <= envelope * proposal(x)
/// over the target's support; a violated bound silently skews the output
/// toward the proposal. Gives up with [`Error::RejectionExhausted`] after
/// `max_attempts` rejected proposals.
pub fn rejection_sample<T, D, Q, E, R>(
    mut target: T,
    mut proposal_draw: D,
    proposal_density: Q,
    envelope: f64,
    max_attempts: u64,
    rng: &mut R,
) -> Result<f64>
where
    T: FnMut(f64) -> std::result::Result<f64, E>,
    D: FnMut(&mut R) -> f64,
    Q: Fn(f64) -> f64,
    E: std::error::Error + Send + Sync + 'static,
    R: Rng + ?Sized,
{
    check_envelope(envelope, max_attempts)?;
    accept_one(
        &mut target,
        &mut proposal_draw,
        &proposal_density,
        envelope,
        max_attempts,
        rng,
    )
    .map(|(x, _)| x)
}

/// Draw `n` samples, each individually bounded by `max_attempts`, and
/// report the total attempt count.
pub fn rejection_sample_n<T, D, Q, E, R>(
    mut target: T,
    mut proposal_draw: D,
    proposal_density: Q,
    envelope: f64,
    max_attempts: u64,
    n: usize,
    rng: &mut R,
) -> Result<RejectionRun>
where
    T: FnMut(f64) -> std::result::Result<f64, E>,
    D: FnMut(&mut R) -> f64,
    Q: Fn(f64) -> f64,
    E: std::error::Error + Send + Sync + 'static,
    R: Rng + ?Sized,
{
    check_envelope(envelope, max_attempts)?;
    let mut samples = Vec::with_capacity(n);
    let mut attempts = 0u64;
    for _ in 0..n {
        let (x, used) = accept_one(
            &mut target,
            &mut proposal_draw,
            &proposal_density,
            envelope,
            max_attempts,
            rng,
        )?;
        attempts += used;
        samples.push(x);
    }
    Ok(RejectionRun { samples, attempts })
}
