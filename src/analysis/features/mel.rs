// Mel module - Slaney-style mel filterbank and orthonormal DCT
//
// Mel scale: linear below 1 kHz (200/3 Hz per mel), logarithmic above with
// step ln(6.4)/27. Filters are triangular on the mel grid and area-normalized
// (2 / bandwidth in Hz).

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Convert Hz to mels (Slaney scale)
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Convert mels back to Hz (Slaney scale)
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Triangular mel filterbank applied to power spectra
pub struct MelFilterbank {
    /// `n_mels` rows of `n_fft / 2 + 1` weights
    weights: Vec<Vec<f32>>,
}

impl MelFilterbank {
    /// Build a filterbank spanning 0 Hz to Nyquist
    pub fn new(sample_rate: u32, n_fft: usize, n_mels: usize) -> Self {
        let n_bins = n_fft / 2 + 1;
        let nyquist = sample_rate as f64 / 2.0;

        let fft_freqs: Vec<f64> = (0..n_bins)
            .map(|i| i as f64 * sample_rate as f64 / n_fft as f64)
            .collect();

        let max_mel = hz_to_mel(nyquist);
        let mel_points: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz(max_mel * i as f64 / (n_mels + 1) as f64))
            .collect();

        let weights = (0..n_mels)
            .map(|m| {
                let (left, center, right) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
                let enorm = 2.0 / (right - left);
                fft_freqs
                    .iter()
                    .map(|&f| {
                        let lower = (f - left) / (center - left);
                        let upper = (right - f) / (right - center);
                        (lower.min(upper).max(0.0) * enorm) as f32
                    })
                    .collect()
            })
            .collect();

        Self { weights }
    }

    pub fn n_mels(&self) -> usize {
        self.weights.len()
    }

    /// Project one power spectrum onto the mel bands
    pub fn apply(&self, power: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .map(|row| row.iter().zip(power).map(|(w, p)| w * p).sum())
            .collect()
    }
}

/// Orthonormal DCT-II, truncated to the first `n_out` coefficients
pub struct Dct {
    basis: Vec<Vec<f32>>,
}

impl Dct {
    pub fn new(n_in: usize, n_out: usize) -> Self {
        let n = n_in as f64;
        let basis = (0..n_out)
            .map(|k| {
                let scale = if k == 0 {
                    (1.0 / n).sqrt()
                } else {
                    (2.0 / n).sqrt()
                };
                (0..n_in)
                    .map(|i| {
                        let angle =
                            std::f64::consts::PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n);
                        (scale * angle.cos()) as f32
                    })
                    .collect()
            })
            .collect();
        Self { basis }
    }

    pub fn apply(&self, input: &[f32]) -> Vec<f32> {
        self.basis
            .iter()
            .map(|row| row.iter().zip(input).map(|(b, x)| b * x).sum())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_scale_roundtrip() {
        for hz in [0.0, 100.0, 999.0, 1000.0, 4000.0, 11_025.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            assert!((back - hz).abs() < 1e-6, "{} -> {}", hz, back);
        }
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_filterbank_shape_and_non_negative() {
        let bank = MelFilterbank::new(22_050, 2048, 128);
        assert_eq!(bank.n_mels(), 128);
        for row in &bank.weights {
            assert_eq!(row.len(), 1025);
            assert!(row.iter().all(|&w| w >= 0.0));
            assert!(row.iter().any(|&w| w > 0.0));
        }
    }

    #[test]
    fn test_dct_of_constant_is_dc_only() {
        let dct = Dct::new(8, 4);
        let out = dct.apply(&[1.0; 8]);
        assert!((out[0] - 8.0f32.sqrt()).abs() < 1e-5);
        for &c in &out[1..] {
            assert!(c.abs() < 1e-5);
        }
    }
}
