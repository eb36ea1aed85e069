// Priors for probabilistic YIN
//
// Beta distribution over YIN thresholds and a truncated Boltzmann (geometric)
// prior favouring earlier troughs.

/// Binomial coefficient as f64
fn binomial(n: u32, k: u32) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// CDF of Beta(a, b) for integer shape parameters
///
/// Uses the binomial expansion of the regularized incomplete beta function.
pub fn beta_cdf(x: f64, a: u32, b: u32) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let n = a + b - 1;
    (a..=n)
        .map(|j| binomial(n, j) * x.powi(j as i32) * (1.0 - x).powi((n - j) as i32))
        .sum()
}

/// Probability mass of each threshold interval `[t_k, t_k+1)`
///
/// Thresholds are `n_thresholds + 1` evenly spaced points on [0, 1].
pub fn threshold_probs(n_thresholds: usize, a: u32, b: u32) -> (Vec<f64>, Vec<f64>) {
    let thresholds: Vec<f64> = (0..=n_thresholds)
        .map(|i| i as f64 / n_thresholds as f64)
        .collect();
    let cdf: Vec<f64> = thresholds.iter().map(|&t| beta_cdf(t, a, b)).collect();
    let probs = cdf.windows(2).map(|w| w[1] - w[0]).collect();
    (thresholds, probs)
}

/// Truncated Boltzmann pmf at `k` for `n` outcomes with rate `lambda`
pub fn boltzmann_pmf(k: usize, lambda: f64, n: usize) -> f64 {
    if k >= n {
        return 0.0;
    }
    (1.0 - (-lambda).exp()) * (-lambda * k as f64).exp() / (1.0 - (-lambda * n as f64).exp())
}
