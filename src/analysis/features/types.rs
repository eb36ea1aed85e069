// Types module - the fixed-shape feature matrix consumed by both classifiers

use ndarray::{Array2, Array3, Axis};

/// Cepstral coefficients per frame
pub const N_MFCC: usize = 40;

/// Frames per matrix after truncation/padding
pub const MAX_FRAMES: usize = 174;

/// MFCC matrix of exactly `N_MFCC` × `MAX_FRAMES`
///
/// Rows are coefficients, columns are frames. The shape is checked at every
/// construction site, so holders can rely on it without re-validating.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Array2<f32>,
}

impl FeatureMatrix {
    /// Wrap an existing array, rejecting any other shape
    pub fn try_from_array(data: Array2<f32>) -> Option<Self> {
        if data.dim() == (N_MFCC, MAX_FRAMES) {
            Some(Self { data })
        } else {
            None
        }
    }

    /// Truncate or zero-pad raw coefficients (`N_MFCC` rows × any frames)
    ///
    /// Frames past `MAX_FRAMES` are dropped; missing frames are filled with
    /// zero columns on the right.
    ///
    /// # Panics
    /// If `raw` does not have `N_MFCC` rows.
    pub fn fix_length(raw: &Array2<f32>) -> Self {
        assert_eq!(raw.nrows(), N_MFCC, "raw MFCC must have {} rows", N_MFCC);
        let mut data = Array2::<f32>::zeros((N_MFCC, MAX_FRAMES));
        let keep = raw.ncols().min(MAX_FRAMES);
        data.slice_mut(ndarray::s![.., ..keep])
            .assign(&raw.slice(ndarray::s![.., ..keep]));
        Self { data }
    }

    pub fn zeros() -> Self {
        Self {
            data: Array2::zeros((N_MFCC, MAX_FRAMES)),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn as_array(&self) -> &Array2<f32> {
        &self.data
    }

    /// Copy with a leading batch axis of size 1, shaped for model input
    pub fn to_batch(&self) -> Array3<f32> {
        self.data.clone().insert_axis(Axis(0))
    }
}
