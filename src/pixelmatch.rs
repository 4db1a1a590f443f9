//! Threshold-driven pixel comparison.
//!
//! Takes two equal-sized RGBA canvases and a sensitivity threshold, returns
//! the count of differing pixels plus an annotated diff image. Per-pixel
//! distance is measured in YIQ color space after blending semi-transparent
//! pixels over white, so a fully transparent pixel compares equal to any
//! other fully transparent pixel regardless of its RGB bytes — the canvas
//! padding strategy in [`crate::canvas`] relies on this.

use crate::canvas::{BYTES_PER_PIXEL, RawImage};

/// Maximum possible YIQ delta between two opaque pixels; the `[0, 1]`
/// threshold is scaled against this
const MAX_YIQ_DELTA: f64 = 35215.0;

/// How much of the reference shows through on unchanged diff pixels
const UNCHANGED_FADE: f64 = 0.1;

/// Output of a pixel comparison
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Number of pixels whose color delta exceeded the threshold
    pub diff_count: u64,

    /// Annotated diff: changed pixels solid red, unchanged pixels a faded
    /// grayscale of the reference
    pub diff_image: RawImage,
}

/// Compare two equal-sized canvases.
///
/// `threshold` is the sensitivity in `[0, 1]`; lower values flag smaller
/// per-pixel color deltas. Byte-identical canvases always produce a zero
/// count.
///
/// # Panics
///
/// Panics if the canvases differ in size. Callers normalize first; unequal
/// inputs here are a bug in the caller, not a runtime condition.
pub fn compare(a: &RawImage, b: &RawImage, threshold: f64) -> Comparison {
    assert!(
        a.width() == b.width() && a.height() == b.height(),
        "compare() requires equal-sized canvases ({}x{} vs {}x{}); normalize first",
        a.width(),
        a.height(),
        b.width(),
        b.height()
    );

    let max_delta = MAX_YIQ_DELTA * threshold * threshold;
    let pixel_count = a.width() as usize * a.height() as usize;
    let pa = a.pixels();
    let pb = b.pixels();

    let mut out = vec![0u8; pixel_count * BYTES_PER_PIXEL];
    let mut diff_count = 0u64;

    for idx in 0..pixel_count {
        let o = idx * BYTES_PER_PIXEL;
        let ca = blend_over_white(&pa[o..o + 4]);
        let cb = blend_over_white(&pb[o..o + 4]);
        if color_delta(ca, cb) > max_delta {
            out[o..o + 4].copy_from_slice(&[255, 0, 0, 255]);
            diff_count += 1;
        } else {
            let gray = 255.0 + (luminance(ca) - 255.0) * UNCHANGED_FADE;
            let v = gray.round().clamp(0.0, 255.0) as u8;
            out[o..o + 4].copy_from_slice(&[v, v, v, 255]);
        }
    }

    // Buffer length matches dimensions by construction.
    let diff_image = RawImage::from_raw_rgba(a.width(), a.height(), out)
        .unwrap_or_else(|_| unreachable!("diff buffer sized from input dimensions"));

    Comparison {
        diff_count,
        diff_image,
    }
}

/// Composite an RGBA pixel over a white background
fn blend_over_white(px: &[u8]) -> [f64; 3] {
    let alpha = f64::from(px[3]) / 255.0;
    [
        255.0 + (f64::from(px[0]) - 255.0) * alpha,
        255.0 + (f64::from(px[1]) - 255.0) * alpha,
        255.0 + (f64::from(px[2]) - 255.0) * alpha,
    ]
}

/// Squared perceptual distance between two blended RGB values in YIQ space
fn color_delta(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dy = luminance(a) - luminance(b);
    let di = chroma_i(a) - chroma_i(b);
    let dq = chroma_q(a) - chroma_q(b);
    0.5053 * dy * dy + 0.299 * di * di + 0.1957 * dq * dq
}

fn luminance(c: [f64; 3]) -> f64 {
    c[0] * 0.29889531 + c[1] * 0.58662247 + c[2] * 0.11448223
}

fn chroma_i(c: [f64; 3]) -> f64 {
    c[0] * 0.59597799 - c[1] * 0.27417610 - c[2] * 0.32180189
}

fn chroma_q(c: [f64; 3]) -> f64 {
    c[0] * 0.21147017 - c[1] * 0.52261711 + c[2] * 0.31114694
}
