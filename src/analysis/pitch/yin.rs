// YIN module - cumulative mean normalized difference and trough helpers
//
// The difference function is evaluated as energy(0) + energy(tau) - 2·acf(tau)
// over a window starting one sample into the frame. Near-zero energy and
// autocorrelation terms are flushed to exactly zero so silent frames produce
// a flat (trough-free) curve.

/// Terms smaller than this are treated as zero
const FLUSH_EPSILON: f64 = 1e-6;

/// Cumulative mean normalized difference for lags `min_period..=max_period`
///
/// # Arguments
/// * `frame` - analysis frame, at least `1 + win_length + max_period` long
/// * `win_length` - integration window of the difference function
///
/// # Returns
/// `max_period - min_period + 1` values; index 0 is lag `min_period`
pub fn cumulative_mean_normalized_difference(
    frame: &[f32],
    win_length: usize,
    min_period: usize,
    max_period: usize,
) -> Vec<f64> {
    debug_assert!(frame.len() > win_length + max_period);

    let window = |tau: usize| &frame[1 + tau..1 + tau + win_length];

    let energy = |tau: usize| -> f64 {
        let e: f64 = window(tau).iter().map(|&x| (x as f64) * (x as f64)).sum();
        if e.abs() < FLUSH_EPSILON {
            0.0
        } else {
            e
        }
    };

    let base = window(0);
    let energy_0 = energy(0);

    let mut difference = Vec::with_capacity(max_period + 1);
    difference.push(0.0);
    for tau in 1..=max_period {
        let acf: f64 = base
            .iter()
            .zip(window(tau))
            .map(|(&a, &b)| a as f64 * b as f64)
            .sum();
        let acf = if acf.abs() < FLUSH_EPSILON { 0.0 } else { acf };
        difference.push(energy_0 + energy(tau) - 2.0 * acf);
    }

    let mut running = 0.0f64;
    let mut cumulative_mean = vec![0.0f64; max_period + 1];
    for tau in 1..=max_period {
        running += difference[tau];
        cumulative_mean[tau] = running / tau as f64;
    }

    (min_period..=max_period)
        .map(|tau| difference[tau] / (cumulative_mean[tau] + f64::MIN_POSITIVE))
        .collect()
}

/// Sub-sample offsets of each point from a parabola through its neighbours
///
/// Endpoints and points where the fit is degenerate get a zero shift.
pub fn parabolic_shifts(curve: &[f64]) -> Vec<f64> {
    let mut shifts = vec![0.0; curve.len()];
    for i in 1..curve.len().saturating_sub(1) {
        let a = curve[i + 1] + curve[i - 1] - 2.0 * curve[i];
        let b = (curve[i + 1] - curve[i - 1]) / 2.0;
        if b.abs() < a.abs() {
            shifts[i] = -b / a;
        }
    }
    shifts
}

/// Indices of troughs in the curve
///
/// Interior points must be strictly below the left neighbour and not above
/// the right one. The first point counts when it is below the second; the
/// last when it is below the one before it.
pub fn trough_indices(curve: &[f64]) -> Vec<usize> {
    let n = curve.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n)
        .filter(|&i| {
            if i == 0 {
                curve[0] < curve[1]
            } else if i == n - 1 {
                curve[i] < curve[i - 1]
            } else {
                curve[i] < curve[i - 1] && curve[i] <= curve[i + 1]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_frame(period: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * i as f32 / period).sin())
            .collect()
    }

    #[test]
    fn test_silent_frame_is_flat() {
        let frame = vec![0.0f32; 2048];
        let cmnd = cumulative_mean_normalized_difference(&frame, 1024, 10, 337);
        assert_eq!(cmnd.len(), 328);
        assert!(cmnd.iter().all(|&v| v == 0.0));
        assert!(trough_indices(&cmnd).is_empty());
    }

    #[test]
    fn test_periodic_frame_dips_at_period() {
        let frame = sine_frame(100.0, 2048);
        let cmnd = cumulative_mean_normalized_difference(&frame, 1024, 10, 337);
        let troughs = trough_indices(&cmnd);
        let first = troughs[0] + 10;
        assert!((99..=101).contains(&first), "first trough at lag {}", first);
        assert!(cmnd[troughs[0]] < 0.05);
    }

    #[test]
    fn test_parabolic_shift_recovers_vertex() {
        // y = (x - 2.25)^2 sampled at integers; vertex sits between 2 and 3
        let curve: Vec<f64> = (0..5).map(|x| (x as f64 - 2.25).powi(2)).collect();
        let shifts = parabolic_shifts(&curve);
        assert!((shifts[2] - 0.25).abs() < 1e-9);
        assert_eq!(shifts[0], 0.0);
        assert_eq!(shifts[4], 0.0);
    }

    #[test]
    fn test_trough_edges() {
        assert_eq!(trough_indices(&[0.1, 0.5, 0.2, 0.3, 0.05]), vec![0, 2, 4]);
        assert_eq!(trough_indices(&[0.5, 0.5, 0.5]), Vec::<usize>::new());
    }
}
