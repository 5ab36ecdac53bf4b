//! Trailing-window aggregation helpers shared by the indicator library.
//!
//! All windows are causal: position `i` aggregates positions `i-w+1 ..= i`.
//! A window produces `None` until `w` values exist, and whenever any value in
//! the window is `None` (undefined inputs propagate, matching the warm-up
//! convention).

/// Rolling arithmetic mean over a trailing window.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| {
        Some(w.iter().sum::<f64>() / w.len() as f64)
    })
}

/// Rolling sum over a trailing window.
pub fn rolling_sum(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| Some(w.iter().sum::<f64>()))
}

/// Rolling sample standard deviation (N-1 denominator) over a trailing window.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| {
        if w.len() < 2 {
            return None;
        }
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        let var = w.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (w.len() - 1) as f64;
        Some(var.sqrt())
    })
}

/// Rolling maximum over a trailing window.
pub fn rolling_max(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| w.iter().copied().reduce(f64::max))
}

/// Rolling minimum over a trailing window.
pub fn rolling_min(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| w.iter().copied().reduce(f64::min))
}

/// Running maximum from the start of the series (all positions defined).
pub fn running_max(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        max = max.max(v);
        out.push(max);
    }
    out
}

/// First differences: `None` at position 0, `x[i] - x[i-1]` afterwards.
pub fn diffs(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| if i == 0 { None } else { Some(v - values[i - 1]) })
        .collect()
}

/// Proportional change: `None` at position 0 and where the previous value is
/// zero, `x[i]/x[i-1] - 1` otherwise.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i == 0 || values[i - 1] == 0.0 {
                None
            } else {
                Some(v / values[i - 1] - 1.0)
            }
        })
        .collect()
}

fn rolling_apply<F>(values: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    let mut buf = Vec::with_capacity(window);
    for i in (window - 1)..values.len() {
        buf.clear();
        let slice = &values[i + 1 - window..=i];
        if slice.iter().all(|v| v.is_some()) {
            buf.extend(slice.iter().flatten());
            out[i] = f(&buf);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn defined(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|&v| Some(v)).collect()
    }

    #[test]
    fn mean_has_warmup() {
        let out = rolling_mean(&defined(&[1.0, 2.0, 3.0, 4.0]), 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_relative_eq!(out[2].unwrap(), 2.0);
        assert_relative_eq!(out[3].unwrap(), 3.0);
    }

    #[test]
    fn undefined_input_poisons_its_windows() {
        let mut values = defined(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        values[2] = None;
        let out = rolling_mean(&values, 2);
        assert_relative_eq!(out[1].unwrap(), 1.5);
        assert_eq!(out[2], None);
        assert_eq!(out[3], None);
        assert_relative_eq!(out[4].unwrap(), 4.5);
    }

    #[test]
    fn sample_std_matches_hand_calc() {
        let out = rolling_std(&defined(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 8);
        // Sample variance of this set is 32/7.
        assert_relative_eq!(out[7].unwrap(), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn std_of_constant_window_is_zero() {
        let out = rolling_std(&defined(&[5.0, 5.0, 5.0]), 3);
        assert_relative_eq!(out[2].unwrap(), 0.0);
    }

    #[test]
    fn max_and_min() {
        let values = defined(&[3.0, 1.0, 4.0, 1.0, 5.0]);
        let max = rolling_max(&values, 3);
        let min = rolling_min(&values, 3);
        assert_relative_eq!(max[2].unwrap(), 4.0);
        assert_relative_eq!(min[2].unwrap(), 1.0);
        assert_relative_eq!(max[4].unwrap(), 5.0);
        assert_relative_eq!(min[4].unwrap(), 1.0);
    }

    #[test]
    fn running_max_is_monotone() {
        let out = running_max(&[1.0, 3.0, 2.0, 5.0, 4.0]);
        assert_eq!(out, vec![1.0, 3.0, 3.0, 5.0, 5.0]);
    }

    #[test]
    fn diffs_and_pct_change_undefined_at_start() {
        let d = diffs(&[100.0, 102.0, 101.0]);
        assert_eq!(d[0], None);
        assert_relative_eq!(d[1].unwrap(), 2.0);
        assert_relative_eq!(d[2].unwrap(), -1.0);

        let p = pct_change(&[100.0, 110.0]);
        assert_eq!(p[0], None);
        assert_relative_eq!(p[1].unwrap(), 0.1);
    }

    #[test]
    fn window_larger_than_input_is_all_undefined() {
        let out = rolling_sum(&defined(&[1.0, 2.0]), 5);
        assert!(out.iter().all(|v| v.is_none()));
    }
}
