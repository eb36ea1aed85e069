// FFT module - short-time power spectra
//
// Centered STFT framing with zero padding and a periodic Hann window. The
// power spectrum of each frame feeds the mel filterbank.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// FFT processor that computes power spectra from audio frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Periodic Hann window (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - FFT window size (2048 for MFCC extraction)
    pub fn new(fft_size: usize) -> Self {
        // Periodic Hann: the window repeats with period N, not N - 1
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - ((2.0 * std::f32::consts::PI * i as f32) / fft_size as f32).cos())
            })
            .collect();

        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(fft_size),
            fft_size,
            window,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of STFT frames produced for a signal of `len` samples
    ///
    /// With centered framing this is `1 + len / hop`.
    ///
    /// # Panics
    /// If `hop` is zero.
    pub fn frame_count(len: usize, hop: usize) -> usize {
        1 + len / hop
    }

    /// Compute the power spectrogram of a signal
    ///
    /// The signal is padded with `fft_size / 2` zeros on the left so frame
    /// `t` is centered on sample `t * hop`, and with enough zeros on the right
    /// for the last frame to fit.
    ///
    /// # Returns
    /// One power spectrum (`fft_size / 2 + 1` bins) per frame
    pub fn power_spectrogram(&self, signal: &[f32], hop: usize) -> Vec<Vec<f32>> {
        let pad = self.fft_size / 2;
        let mut padded = vec![0.0f32; signal.len() + self.fft_size];
        padded[pad..pad + signal.len()].copy_from_slice(signal);

        let n_frames = Self::frame_count(signal.len(), hop);
        let mut scratch = vec![Complex::new(0.0, 0.0); self.fft.get_inplace_scratch_len()];
        let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); self.fft_size];

        (0..n_frames)
            .map(|t| {
                let frame = &padded[t * hop..t * hop + self.fft_size];
                for ((slot, &sample), &w) in buffer.iter_mut().zip(frame).zip(&self.window) {
                    *slot = Complex::new(sample * w, 0.0);
                }
                self.fft.process_with_scratch(&mut buffer, &mut scratch);
                buffer[..self.fft_size / 2 + 1]
                    .iter()
                    .map(|c| c.norm_sqr())
                    .collect()
            })
            .collect()
    }
}
