//! Population statistics over small sample sets

/// Summary statistics for a slice of values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// Arithmetic mean
    pub mean: f64,
    /// Population variance (divides by n)
    pub variance: f64,
    /// Population standard deviation
    pub std_dev: f64,
}

impl Summary {
    /// Compute summary statistics. An empty slice yields all zeros and a
    /// single value has zero variance.
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        if values.len() == 1 {
            return Self {
                mean,
                variance: 0.0,
                std_dev: 0.0,
            };
        }

        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        Self {
            mean,
            variance,
            std_dev: variance.sqrt(),
        }
    }
}

/// Mean gap between consecutive values of an ordered sequence, 0 with fewer than two
pub fn mean_gap(ordered: &[f64]) -> f64 {
    if ordered.len() < 2 {
        return 0.0;
    }
    let span: f64 = ordered.windows(2).map(|w| w[1] - w[0]).sum();
    span / (ordered.len() - 1) as f64
}

/// Count burst onsets in an ordered sequence of event times.
///
/// A burst starts at the first consecutive pair no more than `max_gap` apart;
/// following close pairs extend the same burst until a wider gap ends it.
pub fn burst_onsets(ordered: &[f64], max_gap: f64) -> usize {
    let mut onsets = 0;
    let mut in_burst = false;

    for pair in ordered.windows(2) {
        if pair[1] - pair[0] <= max_gap {
            if !in_burst {
                onsets += 1;
                in_burst = true;
            }
        } else {
            in_burst = false;
        }
    }

    onsets
}
