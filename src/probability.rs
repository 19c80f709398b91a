//! Collision-probability kernel: numerical integration of the LSH
//! false-positive / false-negative densities used to score candidate
//! `(K, L)` band parameters.
//!
//! The kernel is pure and stateless; callers (principally
//! [`crate::forest::LshForest::optimal_kl`]) treat it as a cost oracle.

/// Integration step used by rectangle-rule integration, matching the
/// configured build-time default of `0.01`.
pub const DEFAULT_PRECISION: f64 = 0.01;

/// Transform a containment variable `tau` into the similarity value the LSH
/// collision function operates on, given indexed size `x` and query size `q`.
fn transformed_similarity(tau: f64, x: f64, q: f64) -> f64 {
    tau / (1.0 + x / q - tau)
}

/// LSH collision probability for similarity `s` under `l` bands of width `k`.
fn collision_probability(s: f64, k: u32, l: u32) -> f64 {
    1.0 - (1.0 - s.powi(k as i32)).powi(l as i32)
}

/// False-positive density at `tau`.
fn false_positive_density(tau: f64, x: f64, q: f64, k: u32, l: u32) -> f64 {
    collision_probability(transformed_similarity(tau, x, q), k, l)
}

/// False-negative density at `tau`.
fn false_negative_density(tau: f64, x: f64, q: f64, k: u32, l: u32) -> f64 {
    1.0 - collision_probability(transformed_similarity(tau, x, q), k, l)
}

/// Rectangle-rule integral of `f` over `[lower, upper]` with step `precision`.
fn integral<F: Fn(f64) -> f64>(f: F, lower: f64, upper: f64, precision: f64) -> f64 {
    if upper <= lower {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut tau = lower;
    while tau < upper {
        sum += f(tau) * precision;
        tau += precision;
    }
    sum
}

/// Cumulative false-positive and false-negative probabilities at threshold
/// `t`, for indexed size `x`, query size `q`, band parameters `(k, l)`.
///
/// Integration bounds depend on the ratio `xq = x / q`:
/// - `xq >= 1`: `fp` over `[0, t]`, `fn` over `[t, 1]`.
/// - `t <= xq < 1`: `fp` over `[0, t]`, `fn` over `[t, xq]`.
/// - `xq < t`: `fp` over `[0, xq]`, `fn = 0`.
#[must_use]
pub fn false_positive_and_negative(
    x: f64,
    q: f64,
    k: u32,
    l: u32,
    t: f64,
    precision: f64,
) -> (f64, f64) {
    let xq = x / q;
    if xq >= 1.0 {
        let fp = integral(|tau| false_positive_density(tau, x, q, k, l), 0.0, t, precision);
        let fnr = integral(|tau| false_negative_density(tau, x, q, k, l), t, 1.0, precision);
        (fp, fnr)
    } else if xq >= t {
        let fp = integral(|tau| false_positive_density(tau, x, q, k, l), 0.0, t, precision);
        let fnr = integral(|tau| false_negative_density(tau, x, q, k, l), t, xq, precision);
        (fp, fnr)
    } else {
        let fp = integral(|tau| false_positive_density(tau, x, q, k, l), 0.0, xq, precision);
        (fp, 0.0)
    }
}

/// Cumulative false-positive probability alone, for callers that only need
/// one side (matching the original source's split accessors).
#[must_use]
pub fn prob_false_positive(x: f64, q: f64, k: u32, l: u32, t: f64, precision: f64) -> f64 {
    false_positive_and_negative(x, q, k, l, t, precision).0
}

/// Cumulative false-negative probability alone.
#[must_use]
pub fn prob_false_negative(x: f64, q: f64, k: u32, l: u32, t: f64, precision: f64) -> f64 {
    false_positive_and_negative(x, q, k, l, t, precision).1
}
