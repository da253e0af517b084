use itertools::izip;

/// 1/√(2π)
const FRAC_1_SQRT_2PI: f64 = 0.3989422804014326779399460599343818684758586311649;

/// y += a * x
pub(crate) fn axpy(x: &[f64], y: &mut [f64], a: f64) {
    assert!(x.len() == y.len());
    izip!(x, y).for_each(|(x, y)| {
        *y += a * x;
    });
}

pub(crate) fn vector_dot(a: &[f64], b: &[f64]) -> f64 {
    assert!(a.len() == b.len());
    izip!(a, b).map(|(a, b)| a * b).sum()
}

/// Standard normal CDF Φ(x).
///
/// Abramowitz & Stegun 26.2.17, maximum absolute error below 7.5e-8.
pub fn standard_normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }

    let abs_x = x.abs();
    let k = 1.0 / (1.0 + 0.2316419 * abs_x);
    let phi = FRAC_1_SQRT_2PI * (-0.5 * abs_x * abs_x).exp();
    let poly = k
        * (0.319381530
            + k * (-0.356563782 + k * (1.781477937 + k * (-1.821255978 + k * 1.330274429))));

    let cdf_abs = 1.0 - phi * poly;
    if x >= 0.0 {
        cdf_abs
    } else {
        1.0 - cdf_abs
    }
}

/// Inverse standard normal CDF Φ⁻¹(p) for p in (0, 1).
///
/// Abramowitz & Stegun 26.2.23, maximum absolute error below 4.5e-4.
/// Returns NaN outside [0, 1] and ±∞ at the endpoints.
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let (q, sign) = if p > 0.5 { (1.0 - p, 1.0) } else { (p, -1.0) };
    let t = (-2.0 * q.ln()).sqrt();

    const C0: f64 = 2.515517;
    const C1: f64 = 0.802853;
    const C2: f64 = 0.010328;
    const D1: f64 = 1.432788;
    const D2: f64 = 0.189269;
    const D3: f64 = 0.001308;

    let z = t - (C0 + C1 * t + C2 * t * t) / (1.0 + D1 * t + D2 * t * t + D3 * t * t * t);
    sign * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cdf_in_unit_interval(x in -8f64..8f64) {
            let c = standard_normal_cdf(x);
            prop_assert!((0.0..=1.0).contains(&c));
        }

        #[test]
        fn cdf_symmetry(x in 0f64..6f64) {
            let sum = standard_normal_cdf(x) + standard_normal_cdf(-x);
            prop_assert!((sum - 1.0).abs() < 1e-7);
        }

        #[test]
        fn inverse_roundtrip(p in 0.001f64..0.999) {
            let z = inverse_normal_cdf(p);
            let back = standard_normal_cdf(z);
            prop_assert!((back - p).abs() < 5e-3);
        }

        #[test]
        fn axpy_matches_reference(
            a in -10f64..10f64,
            vals in proptest::collection::vec(-100f64..100f64, 1..32),
        ) {
            let x = vals.clone();
            let mut y = vals.iter().map(|v| v * 0.5).collect::<Vec<_>>();
            let expect: Vec<f64> = izip!(&x, &y).map(|(x, y)| y + a * x).collect();
            axpy(&x, &mut y, a);
            for (got, want) in izip!(&y, &expect) {
                prop_assert!((got - want).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn cdf_extremes() {
        assert_eq!(standard_normal_cdf(f64::INFINITY), 1.0);
        assert_eq!(standard_normal_cdf(f64::NEG_INFINITY), 0.0);
        assert_eq!(inverse_normal_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(inverse_normal_cdf(1.0), f64::INFINITY);
        assert!(inverse_normal_cdf(1.5).is_nan());
    }

    #[test]
    fn known_quantiles() {
        assert!((inverse_normal_cdf(0.975) - 1.96).abs() < 0.01);
        assert!((standard_normal_cdf(1.96) - 0.975).abs() < 1e-3);
        assert!(inverse_normal_cdf(0.5).abs() < 1e-4);
    }

    #[test]
    fn dot_product() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        assert_eq!(vector_dot(&a, &b), 32.0);
    }
}
