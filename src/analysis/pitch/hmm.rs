// HMM module - pitch/voicing state transitions and Viterbi decoding
//
// State layout: `0..n_bins` are voiced pitch bins, `n_bins..2 * n_bins` the
// matching unvoiced states. A transition (v, i) -> (v', j) has probability
// switch[v][v'] · local[i][j], where `local` is a row-normalized triangular
// band of half-width `width / 2` bins. Decoding works in the log domain and
// only visits the band explicitly; every out-of-band transition carries the
// same floor probability, so its best candidate is the best previous state.

/// Log of the probability floor used for impossible events
fn log_floor() -> f64 {
    f64::MIN_POSITIVE.ln()
}

/// Banded pitch transition model with voicing switch
pub struct PitchTransitions {
    n_bins: usize,
    half_width: usize,
    /// log local[i][j] for j in band(i), stored by offset `j - i + half_width`
    log_local: Vec<Vec<f64>>,
    log_stay: f64,
    log_switch: f64,
}

impl PitchTransitions {
    /// # Arguments
    /// * `n_bins` - pitch bins per voicing half
    /// * `width` - odd triangular window width in bins
    /// * `switch_prob` - probability of changing voicing between frames
    pub fn new(n_bins: usize, width: usize, switch_prob: f64) -> Self {
        let half_width = width / 2;
        let denom = (width + 1) as f64 / 2.0;

        let log_local = (0..n_bins)
            .map(|i| {
                let weights: Vec<f64> = (0..=2 * half_width)
                    .map(|offset| {
                        let j = i as isize + offset as isize - half_width as isize;
                        if j < 0 || j >= n_bins as isize {
                            0.0
                        } else {
                            let d = (offset as f64 - half_width as f64).abs();
                            1.0 - d / denom
                        }
                    })
                    .collect();
                let total: f64 = weights.iter().sum();
                weights
                    .into_iter()
                    .map(|w| (w / total + f64::MIN_POSITIVE).ln())
                    .collect()
            })
            .collect();

        Self {
            n_bins,
            half_width,
            log_local,
            log_stay: (1.0 - switch_prob).ln(),
            log_switch: switch_prob.ln(),
        }
    }

    pub fn n_states(&self) -> usize {
        2 * self.n_bins
    }

    /// Most likely state sequence for per-frame observation probabilities
    ///
    /// # Arguments
    /// * `observations` - one vector of `n_states` probabilities per frame
    /// * `initial` - prior over states for the first frame
    pub fn viterbi(&self, observations: &[Vec<f64>], initial: &[f64]) -> Vec<usize> {
        let n_states = self.n_states();
        let n_frames = observations.len();
        if n_frames == 0 {
            return Vec::new();
        }

        let log_obs = |p: f64| (p + f64::MIN_POSITIVE).ln();

        let mut value: Vec<f64> = (0..n_states)
            .map(|s| log_obs(observations[0][s]) + log_obs(initial[s]))
            .collect();
        let mut pointers: Vec<Vec<usize>> = Vec::with_capacity(n_frames);
        pointers.push(vec![0; n_states]);

        for frame in observations.iter().skip(1) {
            let (best_prev, best_prev_state) = argmax(&value);
            let floor_candidate = best_prev + log_floor();

            let mut next = vec![0.0f64; n_states];
            let mut ptr = vec![0usize; n_states];

            for (target, (slot, back)) in next.iter_mut().zip(ptr.iter_mut()).enumerate() {
                let target_voiced = target < self.n_bins;
                let j = target % self.n_bins;
                let lo = j.saturating_sub(self.half_width);
                let hi = (j + self.half_width).min(self.n_bins - 1);

                let mut best = f64::NEG_INFINITY;
                let mut best_state = 0usize;
                // Source states in ascending order so ties keep the first
                for source_voiced in [true, false] {
                    let half_offset = if source_voiced { 0 } else { self.n_bins };
                    let log_voicing = if source_voiced == target_voiced {
                        self.log_stay
                    } else {
                        self.log_switch
                    };
                    for i in lo..=hi {
                        let offset = j + self.half_width - i;
                        let candidate =
                            value[half_offset + i] + log_voicing + self.log_local[i][offset];
                        if candidate > best {
                            best = candidate;
                            best_state = half_offset + i;
                        }
                    }
                }

                if floor_candidate > best {
                    best = floor_candidate;
                    best_state = best_prev_state;
                }

                *slot = best + log_obs(frame[target]);
                *back = best_state;
            }

            value = next;
            pointers.push(ptr);
        }

        let mut states = vec![0usize; n_frames];
        states[n_frames - 1] = argmax(&value).1;
        for t in (1..n_frames).rev() {
            states[t - 1] = pointers[t][states[t]];
        }
        states
    }
}

/// Maximum value and its first index
fn argmax(values: &[f64]) -> (f64, usize) {
    values
        .iter()
        .enumerate()
        .fold((f64::NEG_INFINITY, 0), |best, (i, &v)| {
            if v > best.0 {
                (v, i)
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_rows_are_normalized() {
        let model = PitchTransitions::new(20, 5, 0.01);
        for row in &model.log_local {
            let total: f64 = row.iter().map(|lp| lp.exp()).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_viterbi_follows_strong_observations() {
        let model = PitchTransitions::new(10, 5, 0.01);
        let n = model.n_states();
        let mut frames = Vec::new();
        for bin in [3usize, 4, 4, 5] {
            let mut obs = vec![0.001; n];
            obs[bin] = 0.9;
            frames.push(obs);
        }
        let initial = vec![1.0 / n as f64; n];
        assert_eq!(model.viterbi(&frames, &initial), vec![3, 4, 4, 5]);
    }

    #[test]
    fn test_viterbi_stays_unvoiced_without_evidence() {
        let model = PitchTransitions::new(10, 5, 0.01);
        let n = model.n_states();
        let mut obs = vec![0.0; n];
        for p in obs.iter_mut().skip(10) {
            *p = 0.1;
        }
        let mut initial = vec![0.0; n];
        for p in initial.iter_mut().skip(10) {
            *p = 0.1;
        }
        let states = model.viterbi(&vec![obs; 6], &initial);
        assert!(states.iter().all(|&s| s >= 10));
    }

    #[test]
    fn test_empty_sequence() {
        let model = PitchTransitions::new(4, 3, 0.01);
        assert!(model.viterbi(&[], &[0.125; 8]).is_empty());
    }
}
