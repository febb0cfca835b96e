//! Raw little-endian 64-bit float PCM, as produced by `-f f64le`.

use std::path::Path;

use slideshow_common::error::SlideshowResult;

const SAMPLE_BYTES: usize = std::mem::size_of::<f64>();

/// Decode samples; a trailing partial sample is dropped.
pub fn bytes_to_f64_samples(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(SAMPLE_BYTES)
        .map(|chunk| {
            let mut arr = [0u8; SAMPLE_BYTES];
            arr.copy_from_slice(chunk);
            f64::from_le_bytes(arr)
        })
        .collect()
}

pub fn f64_samples_to_bytes(samples: &[f64]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Split interleaved frames into one buffer per channel. A trailing
/// incomplete frame is dropped.
pub fn deinterleave(samples: &[f64], channels: usize) -> Vec<Vec<f64>> {
    if channels == 0 {
        return Vec::new();
    }

    let frames = samples.len() / channels;
    let mut out = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel, &sample) in out.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    out
}

/// Inverse of [`deinterleave`]. Stops at the shortest channel.
pub fn interleave(channels: &[Vec<f64>]) -> Vec<f64> {
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * channels.len());
    for i in 0..frames {
        out.extend(channels.iter().map(|channel| channel[i]));
    }
    out
}

pub fn read_pcm(path: &Path) -> SlideshowResult<Vec<f64>> {
    let bytes = std::fs::read(path)?;
    if bytes.len() % SAMPLE_BYTES != 0 {
        tracing::warn!(
            path = %path.display(),
            bytes = bytes.len(),
            "PCM file ends with a partial sample; ignoring it"
        );
    }
    Ok(bytes_to_f64_samples(&bytes))
}

pub fn write_pcm(path: &Path, samples: &[f64]) -> SlideshowResult<()> {
    std::fs::write(path, f64_samples_to_bytes(samples))?;
    Ok(())
}
