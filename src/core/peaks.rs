//! Local maxima selection for down-sampling mostly flat signals.

use itertools::Itertools;

/// Find the indices of the peaks in the signal.
///
/// A peak is a sample greater than both neighbours. For flat plateaus the middle sample
/// is taken, rounding down. Edge samples are never peaks.
///
/// Peaks closer than `distance` samples to a higher (or equally high and later) peak are dropped.
/// The remaining peaks must then have at least `min_prominence`.
#[must_use]
pub fn find_peaks(signal: &[f64], distance: usize, min_prominence: f64) -> Vec<usize> {
    let peaks = select_by_distance(signal, &local_maxima(signal), distance);
    peaks.into_iter().filter(|&peak| prominence(signal, peak) >= min_prominence).collect()
}

fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    let Some(last) = signal.len().checked_sub(1) else {
        return peaks;
    };
    let mut index = 1;
    while index < last {
        if signal[index - 1] < signal[index] {
            let mut ahead = index + 1;
            while ahead < last && signal[ahead] == signal[index] {
                ahead += 1;
            }
            if signal[ahead] < signal[index] {
                peaks.push(usize::midpoint(index, ahead - 1));
                index = ahead;
            }
        }
        index += 1;
    }
    peaks
}

fn select_by_distance(signal: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];
    let by_priority = (0..peaks.len())
        .sorted_by(|&lhs, &rhs| signal[peaks[lhs]].total_cmp(&signal[peaks[rhs]]))
        .rev();
    for position in by_priority {
        if !keep[position] {
            continue;
        }
        let peak = peaks[position];
        for other in (0..position).rev().take_while(|&other| peak - peaks[other] < distance) {
            keep[other] = false;
        }
        for other in (position + 1..peaks.len()).take_while(|&other| peaks[other] - peak < distance)
        {
            keep[other] = false;
        }
    }
    peaks.iter().zip(keep).filter_map(|(peak, keep)| keep.then_some(*peak)).collect()
}

/// Height of the peak above the higher of its two surrounding minima.
fn prominence(signal: &[f64], peak: usize) -> f64 {
    let height = signal[peak];
    let left_base = signal[..=peak]
        .iter()
        .rev()
        .take_while(|&&value| value <= height)
        .fold(height, |base, &value| base.min(value));
    let right_base = signal[peak..]
        .iter()
        .take_while(|&&value| value <= height)
        .fold(height, |base, &value| base.min(value));
    height - left_base.max(right_base)
}
