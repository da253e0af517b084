//! Samplers for named probability laws.
//!
//! Every law is a small immutable struct whose constructor validates the
//! parameters and whose `sample` method maps uniform draws from the caller's
//! random source to one value in the law's support. [`Dist`] wraps all laws
//! in one tagged enum for callers that select a law at runtime.

use rand::Rng;

use crate::error::{Error, Result};

/// One draw from the standard normal via Box-Muller.
///
/// Consumes two uniform draws and keeps only the cosine branch; the
/// companion sine value is discarded. That costs one extra uniform per
/// normal sample and is a documented inefficiency, not a defect.
pub(crate) fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // 1 - u in (0, 1] keeps the logarithm finite
    let u1 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

fn require(cond: bool, name: &'static str, reason: &str) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(Error::parameter(name, reason))
    }
}

/// Continuous uniform on `[low, high)`, sampled by inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    low: f64,
    high: f64,
}

impl Uniform {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        require(
            low.is_finite() && high.is_finite() && low < high,
            "Uniform",
            &format!("requires finite low < high, got low={low}, high={high}"),
        )?;
        Ok(Self { low, high })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.low + (self.high - self.low) * rng.random::<f64>()
    }
}

/// Uniform over the integers `low..=high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscreteUniform {
    low: i64,
    high: i64,
}

impl DiscreteUniform {
    pub fn new(low: i64, high: i64) -> Result<Self> {
        require(
            low <= high,
            "DiscreteUniform",
            &format!("requires low <= high, got low={low}, high={high}"),
        )?;
        Ok(Self { low, high })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.low..=self.high) as f64
    }
}

/// Bernoulli trial returning 0.0 or 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    pub fn new(p: f64) -> Result<Self> {
        require(
            (0.0..=1.0).contains(&p),
            "Bernoulli",
            &format!("probability must lie in [0, 1], got {p}"),
        )?;
        Ok(Self { p })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if rng.random::<f64>() < self.p {
            1.0
        } else {
            0.0
        }
    }
}

/// Binomial(n, p) as a sum of n Bernoulli draws. O(n) uniforms per sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binomial {
    n: u64,
    p: f64,
}

impl Binomial {
    pub fn new(n: u64, p: f64) -> Result<Self> {
        require(
            (0.0..=1.0).contains(&p),
            "Binomial",
            &format!("probability must lie in [0, 1], got {p}"),
        )?;
        Ok(Self { n, p })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mut successes = 0u64;
        for _ in 0..self.n {
            if rng.random::<f64>() < self.p {
                successes += 1;
            }
        }
        successes as f64
    }
}

/// Geometric: number of Bernoulli trials up to and including the first
/// success. Support {1, 2, ...}, mean 1/p, expected 1/p uniform draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometric {
    p: f64,
}

impl Geometric {
    pub fn new(p: f64) -> Result<Self> {
        require(
            p > 0.0 && p <= 1.0,
            "Geometric",
            &format!("probability must lie in (0, 1], got {p}"),
        )?;
        Ok(Self { p })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mut trials = 1.0;
        while rng.random::<f64>() >= self.p {
            trials += 1.0;
        }
        trials
    }
}

/// Poisson via Knuth's product method in log space: unit-exponential
/// inter-arrival times are accumulated until the sum passes λ, the count of
/// complete arrivals is the draw. Uses O(λ) draws.
///
/// The log-space form avoids the product-of-uniforms variant, whose
/// exp(-λ) threshold underflows to zero near λ ≈ 745 and biases the counts
/// low.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    pub fn new(lambda: f64) -> Result<Self> {
        require(
            lambda.is_finite() && lambda > 0.0,
            "Poisson",
            &format!("rate must be positive and finite, got {lambda}"),
        )?;
        Ok(Self { lambda })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mut count = 0u64;
        let mut arrival = -(1.0 - rng.random::<f64>()).ln();
        while arrival < self.lambda {
            count += 1;
            arrival += -(1.0 - rng.random::<f64>()).ln();
        }
        count as f64
    }
}

/// Exponential with rate λ, sampled by inversion of the CDF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    pub fn new(rate: f64) -> Result<Self> {
        require(
            rate.is_finite() && rate > 0.0,
            "Exponential",
            &format!("rate must be positive and finite, got {rate}"),
        )?;
        Ok(Self { rate })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        -(1.0 - rng.random::<f64>()).ln() / self.rate
    }
}

/// Weibull(shape k, scale λ) by inversion: λ·(-ln(1-u))^(1/k).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weibull {
    shape: f64,
    scale: f64,
}

impl Weibull {
    pub fn new(shape: f64, scale: f64) -> Result<Self> {
        require(
            shape.is_finite() && shape > 0.0 && scale.is_finite() && scale > 0.0,
            "Weibull",
            &format!("shape and scale must be positive and finite, got shape={shape}, scale={scale}"),
        )?;
        Ok(Self { shape, scale })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.scale * (-(1.0 - rng.random::<f64>()).ln()).powf(1.0 / self.shape)
    }
}

/// Pareto with minimum `scale` and tail index `shape`, by inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pareto {
    scale: f64,
    shape: f64,
}

impl Pareto {
    pub fn new(scale: f64, shape: f64) -> Result<Self> {
        require(
            scale.is_finite() && scale > 0.0 && shape.is_finite() && shape > 0.0,
            "Pareto",
            &format!("scale and shape must be positive and finite, got scale={scale}, shape={shape}"),
        )?;
        Ok(Self { scale, shape })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.scale / (1.0 - rng.random::<f64>()).powf(1.0 / self.shape)
    }
}

/// Laplace (double exponential), by inversion of the two-sided CDF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Laplace {
    location: f64,
    scale: f64,
}

impl Laplace {
    pub fn new(location: f64, scale: f64) -> Result<Self> {
        require(
            location.is_finite() && scale.is_finite() && scale > 0.0,
            "Laplace",
            &format!("scale must be positive and finite, got {scale}"),
        )?;
        Ok(Self { location, scale })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let x = rng.random::<f64>() - 0.5;
        self.location - self.scale * x.signum() * (1.0 - 2.0 * x.abs()).ln()
    }
}

/// Cauchy, by inversion: location + scale·tan(π(u - 1/2)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cauchy {
    location: f64,
    scale: f64,
}

impl Cauchy {
    pub fn new(location: f64, scale: f64) -> Result<Self> {
        require(
            location.is_finite() && scale.is_finite() && scale > 0.0,
            "Cauchy",
            &format!("scale must be positive and finite, got {scale}"),
        )?;
        Ok(Self { location, scale })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.random();
        self.location + self.scale * (std::f64::consts::PI * (u - 0.5)).tan()
    }
}

/// Triangular on `[min, max]` peaking at `mode`, by inversion of the
/// piecewise quadratic CDF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangular {
    min: f64,
    mode: f64,
    max: f64,
}

impl Triangular {
    pub fn new(min: f64, mode: f64, max: f64) -> Result<Self> {
        require(
            min.is_finite() && mode.is_finite() && max.is_finite(),
            "Triangular",
            "parameters must be finite",
        )?;
        require(
            min <= mode && mode <= max && min < max,
            "Triangular",
            &format!("requires min <= mode <= max and min < max, got {min}, {mode}, {max}"),
        )?;
        Ok(Self { min, mode, max })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let (a, b, c) = (self.min, self.mode, self.max);
        let u: f64 = rng.random();
        let split = (b - a) / (c - a); // CDF at the mode
        if u < split {
            a + ((c - a) * (b - a) * u).sqrt()
        } else {
            c - ((c - a) * (c - b) * (1.0 - u)).sqrt()
        }
    }
}

/// Normal(μ, σ) via Box-Muller on two uniform draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        require(
            mu.is_finite() && sigma.is_finite() && sigma > 0.0,
            "Normal",
            &format!("requires finite mu and sigma > 0, got mu={mu}, sigma={sigma}"),
        )?;
        Ok(Self { mu, sigma })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.mu + self.sigma * standard_normal(rng)
    }
}

/// Log-normal: exp of a Normal(μ, σ) draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormal {
    mu: f64,
    sigma: f64,
}

impl LogNormal {
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        require(
            mu.is_finite() && sigma.is_finite() && sigma > 0.0,
            "LogNormal",
            &format!("requires finite mu and sigma > 0, got mu={mu}, sigma={sigma}"),
        )?;
        Ok(Self { mu, sigma })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        (self.mu + self.sigma * standard_normal(rng)).exp()
    }
}

/// Gamma(shape k, scale θ) via Marsaglia-Tsang squeeze rejection.
///
/// For k >= 1 the expected number of rejection rounds is O(1). For k < 1
/// a Gamma(k+1, θ) draw is boosted by U^(1/k).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamma {
    shape: f64,
    scale: f64,
}

impl Gamma {
    pub fn new(shape: f64, scale: f64) -> Result<Self> {
        require(
            shape.is_finite() && shape > 0.0 && scale.is_finite() && scale > 0.0,
            "Gamma",
            &format!("shape and scale must be positive and finite, got shape={shape}, scale={scale}"),
        )?;
        Ok(Self { shape, scale })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        sample_gamma(rng, self.shape, self.scale)
    }
}

fn sample_gamma<R: Rng + ?Sized>(rng: &mut R, shape: f64, scale: f64) -> f64 {
    if shape < 1.0 {
        let boost = rng.random::<f64>().powf(1.0 / shape);
        return sample_gamma(rng, shape + 1.0, scale) * boost;
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let x = standard_normal(rng);
        let v = (1.0 + c * x).powi(3);
        if v <= 0.0 {
            continue;
        }
        let u: f64 = rng.random();
        // squeeze check avoids the logarithm on most rounds
        if u < 1.0 - 0.0331 * x.powi(4) {
            return d * v * scale;
        }
        if u.ln() < 0.5 * x * x + d * (1.0 - v + v.ln()) {
            return d * v * scale;
        }
    }
}

/// Beta(α, β) as X/(X+Y) for X ~ Gamma(α, 1), Y ~ Gamma(β, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beta {
    alpha: f64,
    beta: f64,
}

impl Beta {
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        require(
            alpha.is_finite() && alpha > 0.0 && beta.is_finite() && beta > 0.0,
            "Beta",
            &format!("alpha and beta must be positive and finite, got alpha={alpha}, beta={beta}"),
        )?;
        Ok(Self { alpha, beta })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let x = sample_gamma(rng, self.alpha, 1.0);
        let y = sample_gamma(rng, self.beta, 1.0);
        x / (x + y)
    }
}

/// Chi-square(k) = Gamma(k/2, 2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquare {
    df: f64,
}

impl ChiSquare {
    pub fn new(df: f64) -> Result<Self> {
        require(
            df.is_finite() && df > 0.0,
            "ChiSquare",
            &format!("degrees of freedom must be positive and finite, got {df}"),
        )?;
        Ok(Self { df })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        sample_gamma(rng, self.df / 2.0, 2.0)
    }
}

/// Student's t(ν) = N(0,1) / sqrt(χ²(ν)/ν).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentT {
    df: f64,
}

impl StudentT {
    pub fn new(df: f64) -> Result<Self> {
        require(
            df.is_finite() && df > 0.0,
            "StudentT",
            &format!("degrees of freedom must be positive and finite, got {df}"),
        )?;
        Ok(Self { df })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z = standard_normal(rng);
        let chi2 = sample_gamma(rng, self.df / 2.0, 2.0);
        z / (chi2 / self.df).sqrt()
    }
}

/// F(d1, d2) as the ratio of two scaled chi-square draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FisherF {
    d1: f64,
    d2: f64,
}

impl FisherF {
    pub fn new(d1: f64, d2: f64) -> Result<Self> {
        require(
            d1.is_finite() && d1 > 0.0 && d2.is_finite() && d2 > 0.0,
            "FisherF",
            &format!("degrees of freedom must be positive and finite, got d1={d1}, d2={d2}"),
        )?;
        Ok(Self { d1, d2 })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let x1 = sample_gamma(rng, self.d1 / 2.0, 2.0);
        let x2 = sample_gamma(rng, self.d2 / 2.0, 2.0);
        (x1 / self.d1) / (x2 / self.d2)
    }
}

/// Categorical over indices `0..weights.len()`, sampled by scanning the
/// cumulative weights against one scaled uniform draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Categorical {
    cumulative: Vec<f64>,
    total: f64,
}

impl Categorical {
    pub fn new(weights: &[f64]) -> Result<Self> {
        require(!weights.is_empty(), "Categorical", "weights must be non-empty")?;
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for &w in weights {
            require(
                w.is_finite() && w >= 0.0,
                "Categorical",
                &format!("weights must be finite and non-negative, got {w}"),
            )?;
            total += w;
            cumulative.push(total);
        }
        require(total > 0.0, "Categorical", "at least one weight must be positive")?;
        Ok(Self { cumulative, total })
    }

    /// Index of the sampled category.
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u = rng.random::<f64>() * self.total;
        self.cumulative
            .iter()
            .position(|&c| u < c)
            // accumulated rounding can leave u just at the total
            .unwrap_or(self.cumulative.len() - 1)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sample_index(rng) as f64
    }
}

/// Zipf over `{1, ..., n}` with p(k) ∝ k^(-s).
///
/// Rejection-inversion against the closed-form envelope of Hörmann and
/// Derflinger (1996); expected O(1) rejection rounds for any n and s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zipf {
    n: f64,
    exponent: f64,
    h_x1: f64,
    h_n: f64,
    cutoff: f64,
}

impl Zipf {
    pub fn new(n: u64, exponent: f64) -> Result<Self> {
        require(n >= 1, "Zipf", "requires at least one element")?;
        require(
            exponent.is_finite() && exponent > 0.0,
            "Zipf",
            &format!("exponent must be positive and finite, got {exponent}"),
        )?;
        let n = n as f64;
        let h_x1 = h_integral(1.5, exponent) - 1.0;
        let h_n = h_integral(n + 0.5, exponent);
        let cutoff = 2.0 - h_integral_inv(h_integral(2.5, exponent) - h(2.0, exponent), exponent);
        Ok(Self {
            n,
            exponent,
            h_x1,
            h_n,
            cutoff,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let s = self.exponent;
        loop {
            let u = self.h_n + rng.random::<f64>() * (self.h_x1 - self.h_n);
            let x = h_integral_inv(u, s);
            let k = x.round().clamp(1.0, self.n);
            if k - x <= self.cutoff || u >= h_integral(k + 0.5, s) - h(k, s) {
                return k;
            }
        }
    }
}

/// H(x) = ∫ t^(-s) dt, the envelope's antiderivative.
fn h_integral(x: f64, s: f64) -> f64 {
    if s == 1.0 {
        x.ln()
    } else {
        (x.powf(1.0 - s) - 1.0) / (1.0 - s)
    }
}

fn h_integral_inv(y: f64, s: f64) -> f64 {
    if s == 1.0 {
        y.exp()
    } else {
        (1.0 + (1.0 - s) * y).powf(1.0 / (1.0 - s))
    }
}

fn h(x: f64, s: f64) -> f64 {
    x.powf(-s)
}

/// A named law with validated parameters and one sampling procedure.
#[derive(Debug, Clone, PartialEq)]
pub enum Dist {
    Uniform(Uniform),
    DiscreteUniform(DiscreteUniform),
    Bernoulli(Bernoulli),
    Binomial(Binomial),
    Geometric(Geometric),
    Poisson(Poisson),
    Exponential(Exponential),
    Weibull(Weibull),
    Pareto(Pareto),
    Laplace(Laplace),
    Cauchy(Cauchy),
    Triangular(Triangular),
    Normal(Normal),
    LogNormal(LogNormal),
    Gamma(Gamma),
    Beta(Beta),
    ChiSquare(ChiSquare),
    StudentT(StudentT),
    FisherF(FisherF),
    Categorical(Categorical),
    Zipf(Zipf),
}

macro_rules! dist_constructors {
    ($($fn_name:ident => $law:ident ($($arg:ident : $ty:ty),*);)*) => {
        impl Dist {
            $(
                pub fn $fn_name($($arg: $ty),*) -> Result<Self> {
                    Ok(Dist::$law($law::new($($arg),*)?))
                }
            )*
        }
    };
}

dist_constructors! {
    uniform => Uniform(low: f64, high: f64);
    discrete_uniform => DiscreteUniform(low: i64, high: i64);
    bernoulli => Bernoulli(p: f64);
    binomial => Binomial(n: u64, p: f64);
    geometric => Geometric(p: f64);
    poisson => Poisson(lambda: f64);
    exponential => Exponential(rate: f64);
    weibull => Weibull(shape: f64, scale: f64);
    pareto => Pareto(scale: f64, shape: f64);
    laplace => Laplace(location: f64, scale: f64);
    cauchy => Cauchy(location: f64, scale: f64);
    triangular => Triangular(min: f64, mode: f64, max: f64);
    normal => Normal(mu: f64, sigma: f64);
    log_normal => LogNormal(mu: f64, sigma: f64);
    gamma => Gamma(shape: f64, scale: f64);
    beta => Beta(alpha: f64, beta: f64);
    chi_square => ChiSquare(df: f64);
    student_t => StudentT(df: f64);
    fisher_f => FisherF(d1: f64, d2: f64);
    zipf => Zipf(n: u64, exponent: f64);
}

impl Dist {
    pub fn categorical(weights: &[f64]) -> Result<Self> {
        Ok(Dist::Categorical(Categorical::new(weights)?))
    }

    /// Draw one value from the law.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Dist::Uniform(d) => d.sample(rng),
            Dist::DiscreteUniform(d) => d.sample(rng),
            Dist::Bernoulli(d) => d.sample(rng),
            Dist::Binomial(d) => d.sample(rng),
            Dist::Geometric(d) => d.sample(rng),
            Dist::Poisson(d) => d.sample(rng),
            Dist::Exponential(d) => d.sample(rng),
            Dist::Weibull(d) => d.sample(rng),
            Dist::Pareto(d) => d.sample(rng),
            Dist::Laplace(d) => d.sample(rng),
            Dist::Cauchy(d) => d.sample(rng),
            Dist::Triangular(d) => d.sample(rng),
            Dist::Normal(d) => d.sample(rng),
            Dist::LogNormal(d) => d.sample(rng),
            Dist::Gamma(d) => d.sample(rng),
            Dist::Beta(d) => d.sample(rng),
            Dist::ChiSquare(d) => d.sample(rng),
            Dist::StudentT(d) => d.sample(rng),
            Dist::FisherF(d) => d.sample(rng),
            Dist::Categorical(d) => d.sample(rng),
            Dist::Zipf(d) => d.sample(rng),
        }
    }

    /// Draw `n` i.i.d. values.
    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

/// Multinomial counts: `trials` categorical draws, each a cumulative-weight
/// scan, tallied per category.
pub fn multinomial<R: Rng + ?Sized>(rng: &mut R, trials: u64, weights: &[f64]) -> Result<Vec<u64>> {
    let law = Categorical::new(weights)?;
    let mut counts = vec![0u64; weights.len()];
    for _ in 0..trials {
        counts[law.sample_index(rng)] += 1;
    }
    Ok(counts)
}
