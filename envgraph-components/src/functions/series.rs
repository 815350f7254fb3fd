//! Expansion of hourly weather series to tick resolution.

/// Linearly interpolate `original` by an integer `scale` factor.
///
/// Each source sample is expanded into `scale` steps running linearly to
/// the next sample; the series wraps, so the last hour ramps back towards
/// the first. An hourly array of length 24 at `scale = 3600` yields one
/// sample per second.
pub fn interpolate_hourly(original: &[f64], scale: usize) -> Vec<f64> {
    debug_assert!(scale > 0);
    let mut out = Vec::with_capacity(original.len() * scale);
    for (i, &start) in original.iter().enumerate() {
        let end = original[(i + 1) % original.len()];
        for j in 0..scale {
            let alpha = j as f64 / scale as f64;
            out.push(start + (end - start) * alpha);
        }
    }
    out
}
