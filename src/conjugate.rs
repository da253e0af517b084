//! Closed-form conjugate posterior updates.
//!
//! These are deterministic arithmetic on parameter structs; no randomness is
//! involved. Updating with empty data returns the prior unchanged.

use crate::dist::{Beta, Normal};
use crate::error::{Error, Result};

/// Parameters of a Beta law, the conjugate prior for a Bernoulli or
/// Binomial success probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaParams {
    alpha: f64,
    beta: f64,
}

impl BetaParams {
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if !(alpha.is_finite() && alpha > 0.0 && beta.is_finite() && beta > 0.0) {
            return Err(Error::parameter(
                "BetaParams",
                format!("alpha and beta must be positive and finite, got alpha={alpha}, beta={beta}"),
            ));
        }
        Ok(Self { alpha, beta })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Posterior after observing `successes` out of `trials` Bernoulli
    /// outcomes: Beta(α + k, β + n − k).
    pub fn update(&self, successes: u64, trials: u64) -> Result<Self> {
        if successes > trials {
            return Err(Error::parameter(
                "update",
                format!("successes ({successes}) exceed trials ({trials})"),
            ));
        }
        Ok(Self {
            alpha: self.alpha + successes as f64,
            beta: self.beta + (trials - successes) as f64,
        })
    }

    /// The sampling law with these parameters.
    pub fn dist(&self) -> Result<Beta> {
        Beta::new(self.alpha, self.beta)
    }
}

/// Parameters of a Normal law, the conjugate prior for a Normal mean with
/// known observation variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalParams {
    mean: f64,
    variance: f64,
}

impl NormalParams {
    pub fn new(mean: f64, variance: f64) -> Result<Self> {
        if !(mean.is_finite() && variance.is_finite() && variance > 0.0) {
            return Err(Error::parameter(
                "NormalParams",
                format!("requires finite mean and variance > 0, got mean={mean}, variance={variance}"),
            ));
        }
        Ok(Self { mean, variance })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Posterior for the mean after observing `data` with known
    /// `likelihood_variance`, by precision-weighted averaging. Empty data
    /// returns the prior unchanged.
    pub fn update(&self, likelihood_variance: f64, data: &[f64]) -> Result<Self> {
        if !(likelihood_variance.is_finite() && likelihood_variance > 0.0) {
            return Err(Error::parameter(
                "likelihood_variance",
                format!("must be positive and finite, got {likelihood_variance}"),
            ));
        }
        if data.is_empty() {
            return Ok(*self);
        }
        let n = data.len() as f64;
        let data_sum: f64 = data.iter().sum();
        let prior_precision = 1.0 / self.variance;
        let data_precision = n / likelihood_variance;
        let posterior_variance = 1.0 / (prior_precision + data_precision);
        let posterior_mean = posterior_variance
            * (self.mean * prior_precision + data_sum / likelihood_variance);
        Ok(Self {
            mean: posterior_mean,
            variance: posterior_variance,
        })
    }

    /// The sampling law with these parameters.
    pub fn dist(&self) -> Result<Normal> {
        Normal::new(self.mean, self.variance.sqrt())
    }
}
