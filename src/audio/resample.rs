// Resampler - offline sample rate conversion via rubato
//
// Converts a whole mono signal at once. The sinc resampler's output delay is
// trimmed and the result is cut to ceil(len * to / from) samples so the
// output lines up with the input in time.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::AudioError;

const SINC_LEN: usize = 128;
const OVERSAMPLING_FACTOR: usize = 128;
const RESAMPLE_CHUNK_SIZE: usize = 1024;

fn make_sinc_params() -> SincInterpolationParameters {
    SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: rubato::calculate_cutoff(SINC_LEN, WindowFunction::BlackmanHarris2),
        interpolation: SincInterpolationType::Cubic,
        oversampling_factor: OVERSAMPLING_FACTOR,
        window: WindowFunction::BlackmanHarris2,
    }
}

/// Expected output length for a conversion, rounded up
pub fn resampled_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    let num = input_len as u64 * to_rate as u64;
    num.div_ceil(from_rate as u64) as usize
}

/// Resample a mono signal from `from_rate` to `to_rate`
pub fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(AudioError::ResampleFailed {
            reason: format!("invalid sample rates {} -> {}", from_rate, to_rate),
        });
    }
    if from_rate == to_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler =
        SincFixedIn::<f32>::new(ratio, 1.0, make_sinc_params(), RESAMPLE_CHUNK_SIZE, 1).map_err(
            |e| AudioError::ResampleFailed {
                reason: e.to_string(),
            },
        )?;

    let expected = resampled_len(input.len(), from_rate, to_rate);
    let delay = resampler.output_delay();
    let mut output: Vec<f32> = Vec::with_capacity(expected + delay + RESAMPLE_CHUNK_SIZE);

    let mut pos = 0usize;
    while input.len() - pos >= resampler.input_frames_next() {
        let needed = resampler.input_frames_next();
        let block: [&[f32]; 1] = [&input[pos..pos + needed]];
        let chunk = resampler
            .process(&block[..], None)
            .map_err(|e| AudioError::ResampleFailed {
                reason: e.to_string(),
            })?;
        output.extend_from_slice(&chunk[0]);
        pos += needed;
    }

    if pos < input.len() {
        let tail: [&[f32]; 1] = [&input[pos..]];
        let chunk = resampler
            .process_partial(Some(&tail[..]), None)
            .map_err(|e| AudioError::ResampleFailed {
                reason: e.to_string(),
            })?;
        output.extend_from_slice(&chunk[0]);
    }

    // Flush the filter tail until the delayed samples are out
    while output.len() < expected + delay {
        let chunk = resampler
            .process_partial(None::<&[&[f32]]>, None)
            .map_err(|e| AudioError::ResampleFailed {
                reason: e.to_string(),
            })?;
        if chunk[0].is_empty() {
            break;
        }
        output.extend_from_slice(&chunk[0]);
    }

    let start = delay.min(output.len());
    let mut trimmed = output.split_off(start);
    trimmed.resize(expected, 0.0);
    Ok(trimmed)
}
