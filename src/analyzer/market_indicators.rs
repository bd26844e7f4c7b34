// Trailing-window statistics over a price series.
//
// Every function returns one entry per input value. Positions without a
// full window of history are `None`, never partial-window estimates.

/// Simple moving average over the `window` most recent values.
pub fn rolling_mean(data: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(data, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Rolling standard deviation (population, divides by `window`).
pub fn rolling_std(data: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(data, window, |w| {
        let count = w.len() as f64;
        let mean = w.iter().sum::<f64>() / count;
        let variance = w.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / count;
        variance.sqrt()
    })
}

/// Period-over-period change in percent. Undefined at the first position
/// and wherever the previous value is zero.
pub fn pct_change(data: &[f64]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(data.len());
    if data.is_empty() {
        return result;
    }
    result.push(None);
    result.extend(data.windows(2).map(|w| {
        if w[0] == 0.0 {
            None
        } else {
            Some((w[1] - w[0]) / w[0] * 100.0)
        }
    }));
    result
}

/// Mean of the defined entries, `None` when there are none.
pub fn mean_defined(values: &[Option<f64>]) -> Option<f64> {
    let defined: Vec<f64> = values.iter().flatten().copied().collect();
    if defined.is_empty() {
        return None;
    }
    Some(defined.iter().sum::<f64>() / defined.len() as f64)
}

pub fn max_defined(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::max)
}

pub fn min_defined(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::min)
}

fn rolling<F>(data: &[f64], window: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    if window == 0 || data.len() < window {
        return vec![None; data.len()];
    }
    let mut result = vec![None; window - 1];
    result.extend(data.windows(window).map(|w| Some(stat(w))));
    result
}
