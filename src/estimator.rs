//! Summary statistics and resampling estimators over sample sequences.
//!
//! Every function rejects empty input with [`Error::EmptyInput`] rather than
//! returning NaN. Variance is the population form (divide by n), matching the
//! plug-in convention used throughout this crate.

use std::collections::HashMap;

use rand::Rng;

use crate::error::{Error, Result};
use crate::math::inverse_normal_cdf;

pub fn mean(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Population variance, dividing by n.
pub fn variance(samples: &[f64]) -> Result<f64> {
    let m = mean(samples)?;
    let ss = samples.iter().map(|x| (x - m) * (x - m)).sum::<f64>();
    Ok(ss / samples.len() as f64)
}

pub fn std_dev(samples: &[f64]) -> Result<f64> {
    Ok(variance(samples)?.sqrt())
}

pub fn median(samples: &[f64]) -> Result<f64> {
    percentile(samples, 50.0)
}

/// Nearest-rank percentile: sorts a copy and indexes at
/// round(p/100 * (n - 1)).
pub fn percentile(samples: &[f64], p: f64) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(Error::parameter(
            "percentile",
            format!("rank must lie in [0, 100], got {p}"),
        ));
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let idx = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    Ok(sorted[idx])
}

/// Most frequent value; ties break toward the smallest value.
pub fn mode(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut counts: HashMap<u64, u64> = HashMap::new();
    for &x in samples {
        *counts.entry(x.to_bits()).or_insert(0) += 1;
    }
    let mut best = f64::INFINITY;
    let mut best_count = 0;
    for (bits, count) in counts {
        let value = f64::from_bits(bits);
        if count > best_count || (count == best_count && value < best) {
            best = value;
            best_count = count;
        }
    }
    Ok(best)
}

/// Plug-in Shannon entropy in bits, −Σ p̂ log2 p̂ over the empirical
/// frequencies of distinct values. No bias correction; bounded above by
/// log2 of the number of distinct values.
pub fn entropy(samples: &[f64]) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }
    let mut counts: HashMap<u64, u64> = HashMap::new();
    for &x in samples {
        *counts.entry(x.to_bits()).or_insert(0) += 1;
    }
    let n = samples.len() as f64;
    Ok(counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum())
}

/// Bootstrap distribution of a statistic: `b` resamples of size n drawn with
/// replacement, the statistic applied to each.
pub fn bootstrap<R, F>(samples: &[f64], b: usize, mut statistic: F, rng: &mut R) -> Result<Vec<f64>>
where
    R: Rng + ?Sized,
    F: FnMut(&[f64]) -> f64,
{
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }
    let n = samples.len();
    let mut resample = vec![0.0; n];
    let mut stats = Vec::with_capacity(b);
    for _ in 0..b {
        for slot in resample.iter_mut() {
            *slot = samples[rng.random_range(0..n)];
        }
        stats.push(statistic(&resample));
    }
    Ok(stats)
}

/// Jackknife replicates: the statistic applied to each leave-one-out
/// subsample. Needs at least two observations.
pub fn jackknife<F>(samples: &[f64], mut statistic: F) -> Result<Vec<f64>>
where
    F: FnMut(&[f64]) -> f64,
{
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }
    if samples.len() < 2 {
        return Err(Error::parameter(
            "jackknife",
            "needs at least two observations",
        ));
    }
    let n = samples.len();
    let mut held_out = Vec::with_capacity(n - 1);
    let mut stats = Vec::with_capacity(n);
    for i in 0..n {
        held_out.clear();
        held_out.extend_from_slice(&samples[..i]);
        held_out.extend_from_slice(&samples[i + 1..]);
        stats.push(statistic(&held_out));
    }
    Ok(stats)
}

/// Asymptotic normal confidence interval for the mean:
/// mean ± z · stddev / √n with z = Φ⁻¹((1 + level) / 2).
pub fn confidence_interval(samples: &[f64], level: f64) -> Result<(f64, f64)> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }
    if !(0.0 < level && level < 1.0) {
        return Err(Error::parameter(
            "confidence_interval",
            format!("level must lie in (0, 1), got {level}"),
        ));
    }
    let m = mean(samples)?;
    let sd = std_dev(samples)?;
    let z = inverse_normal_cdf((1.0 + level) / 2.0);
    let half_width = z * sd / (samples.len() as f64).sqrt();
    Ok((m - half_width, m + half_width))
}
