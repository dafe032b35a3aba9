use serde::Serialize;

/// Range and mean of a chart series.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl SeriesSummary {
    /// Single pass; `None` for an empty series.
    pub fn of(values: &[f64]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let mut summary = Self {
            min: first,
            max: first,
            mean: 0.0,
        };
        let mut sum = first;
        for &v in rest {
            summary.min = summary.min.min(v);
            summary.max = summary.max.max(v);
            sum += v;
        }
        summary.mean = sum / values.len() as f64;
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::SeriesSummary;

    #[test]
    fn summary_of_observations() {
        let s = SeriesSummary::of(&[12.3, 8.5, 4.2]).unwrap();
        assert_eq!((s.min, s.max), (4.2, 12.3));
        assert!((s.mean - 8.333_333_333).abs() < 1e-6);
    }

    #[test]
    fn single_and_empty() {
        assert_eq!(
            SeriesSummary::of(&[7.0]),
            Some(SeriesSummary {
                min: 7.0,
                max: 7.0,
                mean: 7.0
            })
        );
        assert_eq!(SeriesSummary::of(&[]), None);
    }
}
