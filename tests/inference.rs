//! Cross-component checks: the MCMC kernels and cheap approximations must
//! agree with the closed-form conjugate answers.

use std::convert::Infallible;

use rand::Rng;

use bet_prob::{
    abc_sample, estimator, importance_sample, metropolis_hastings, rejection_sample_n,
    seeded_rng, weighted_mean, BetaParams, Dist, NormalParams,
};

#[test]
fn metropolis_matches_conjugate_posterior() {
    // observe 7 successes in 10 trials under a flat prior; the posterior is
    // Beta(8, 4) with mean 2/3
    let posterior = BetaParams::new(1.0, 1.0).unwrap().update(7, 10).unwrap();
    let exact_mean = posterior.mean();

    // log posterior of the success probability, -inf outside (0, 1)
    let logp = |x: &[f64]| {
        let p = x[0];
        if p <= 0.0 || p >= 1.0 {
            f64::NEG_INFINITY
        } else {
            7.0 * p.ln() + 3.0 * (1.0 - p).ln()
        }
    };

    let mut rng = seeded_rng(1001);
    let trace = metropolis_hastings(1, logp, &[0.5], 100_000, 0.15, &mut rng).unwrap();
    let ps = trace.coordinate(0);
    // drop the first tenth as warmup
    let kept = &ps[10_000..];
    let mcmc_mean = estimator::mean(kept).unwrap();
    assert!(
        (mcmc_mean - exact_mean).abs() < 0.01,
        "mcmc {mcmc_mean} vs exact {exact_mean}"
    );

    // the chain must also match the exact posterior spread,
    // Var = ab / ((a+b)^2 (a+b+1))
    let exact_var = 8.0 * 4.0 / (12.0_f64.powi(2) * 13.0);
    let mcmc_var = estimator::variance(kept).unwrap();
    assert!(
        (mcmc_var - exact_var).abs() < 0.005,
        "mcmc {mcmc_var} vs exact {exact_var}"
    );
}

#[test]
fn importance_sampling_matches_conjugate_posterior() {
    // Normal-Normal model: prior N(0, 4), one observation 3.0 with noise
    // variance 1
    let posterior = NormalParams::new(0.0, 4.0)
        .unwrap()
        .update(1.0, &[3.0])
        .unwrap();

    let target = |x: f64| {
        let prior = -0.5 * x * x / 4.0;
        let lik = -0.5 * (3.0 - x) * (3.0 - x);
        Ok::<_, Infallible>((prior + lik).exp())
    };
    let proposal = Dist::normal(0.0, 4.0).unwrap();
    let proposal_density = |x: f64| (-0.5 * x * x / 16.0).exp() / (4.0 * (std::f64::consts::TAU).sqrt());

    let mut rng = seeded_rng(1002);
    let samples = importance_sample(
        target,
        |rng| proposal.sample(rng),
        proposal_density,
        100_000,
        &mut rng,
    )
    .unwrap();
    let est = weighted_mean(&samples).unwrap();
    assert!(
        (est - posterior.mean()).abs() < 0.03,
        "estimate {est} vs exact {}",
        posterior.mean()
    );
}

#[test]
fn rejection_sampling_recovers_a_beta_posterior() {
    // sample Beta(8, 4) by rejection under a uniform proposal; the
    // unnormalized density p^7 (1-p)^3 peaks at p = 0.7
    let peak = 0.7_f64.powi(7) * 0.3_f64.powi(3);
    let mut rng = seeded_rng(1003);
    let run = rejection_sample_n(
        |p: f64| Ok::<_, Infallible>(p.powi(7) * (1.0 - p).powi(3)),
        |rng| rng.random::<f64>(),
        |_| 1.0,
        peak,
        100_000,
        20_000,
        &mut rng,
    )
    .unwrap();
    let mean = estimator::mean(&run.samples).unwrap();
    assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean {mean}");
}

#[test]
fn abc_matches_the_normal_normal_posterior_loosely() {
    let posterior = NormalParams::new(0.0, 4.0)
        .unwrap()
        .update(1.0, &[3.0])
        .unwrap();
    let prior = Dist::normal(0.0, 2.0).unwrap();
    let noise = Dist::normal(0.0, 1.0).unwrap();

    let mut rng = seeded_rng(1004);
    let particles = abc_sample(
        |rng| prior.sample(rng),
        |rng, theta| Ok::<_, Infallible>(theta + noise.sample(rng)),
        3.0,
        0.1,
        5_000,
        &mut rng,
    )
    .unwrap();
    let mean = estimator::mean(&particles).unwrap();
    assert!(
        (mean - posterior.mean()).abs() < 0.1,
        "abc {mean} vs exact {}",
        posterior.mean()
    );
}

#[test]
fn bootstrap_interval_covers_the_true_mean() {
    let mut rng = seeded_rng(1005);
    let law = Dist::exponential(0.5).unwrap();
    let samples = law.sample_n(&mut rng, 2_000);

    let stats = estimator::bootstrap(&samples, 1_000, |s| estimator::mean(s).unwrap(), &mut rng)
        .unwrap();
    let lo = estimator::percentile(&stats, 2.5).unwrap();
    let hi = estimator::percentile(&stats, 97.5).unwrap();
    // true mean is 2
    assert!(lo < 2.0 && 2.0 < hi, "[{lo}, {hi}]");
    assert!(hi - lo < 0.4, "interval width {}", hi - lo);
}

#[test]
fn entropy_of_categorical_draws_approaches_the_law_entropy() {
    let mut rng = seeded_rng(1006);
    let law = Dist::categorical(&[0.5, 0.25, 0.25]).unwrap();
    let samples = law.sample_n(&mut rng, 100_000);
    let h = estimator::entropy(&samples).unwrap();
    // H = 1.5 bits for (1/2, 1/4, 1/4)
    assert!((h - 1.5).abs() < 0.01, "entropy {h}");
    assert!(h <= (3.0_f64).log2() + 1e-9);
}
