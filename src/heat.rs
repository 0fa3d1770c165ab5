//! Bucketing of raw metric values into heat levels.
//!
//! A [`HeatScheme`] is plain data: ascending thresholds, one bar length,
//! color token and legend label per bucket. The two default schemes cover
//! lines of code (6 buckets) and commits per day (5 buckets).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tree::HeatNode;

/// Color token for a bucket. The presentation layer decides what it looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatColor {
    Blue,
    Cyan,
    Green,
    Yellow,
    Orange,
    Red,
}

/// Which metric drives the heat bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Size,
    ChangeRate,
}

impl Metric {
    pub fn toggled(self) -> Self {
        match self {
            Metric::Size => Metric::ChangeRate,
            Metric::ChangeRate => Metric::Size,
        }
    }

    pub fn value(self, node: &HeatNode) -> f64 {
        match self {
            Metric::Size => node.line_count as f64,
            Metric::ChangeRate => node.change_rate,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Size => "Lines of Code",
            Metric::ChangeRate => "Change Frequency",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatScheme {
    /// Exclusive upper bound of every bucket except the last, ascending.
    pub thresholds: Vec<f64>,
    pub bar_lengths: Vec<usize>,
    pub colors: Vec<HeatColor>,
    pub labels: Vec<String>,
}

impl HeatScheme {
    /// Lines of code: <50, <100, <200, <500, <1000, 1000+
    pub fn size() -> Self {
        Self {
            thresholds: vec![50.0, 100.0, 200.0, 500.0, 1000.0],
            bar_lengths: vec![1, 2, 3, 5, 7, 10],
            colors: vec![
                HeatColor::Blue,
                HeatColor::Cyan,
                HeatColor::Green,
                HeatColor::Yellow,
                HeatColor::Orange,
                HeatColor::Red,
            ],
            labels: ["< 50", "50-100", "100-200", "200-500", "500-1000", "1000+"]
                .map(String::from)
                .to_vec(),
        }
    }

    /// Commits per day: <1.7, <3.4, <5.2, <6.9, 6.9+
    pub fn change_rate() -> Self {
        Self {
            thresholds: vec![1.7, 3.4, 5.2, 6.9],
            bar_lengths: vec![1, 3, 5, 7, 10],
            colors: vec![
                HeatColor::Blue,
                HeatColor::Cyan,
                HeatColor::Green,
                HeatColor::Yellow,
                HeatColor::Red,
            ],
            labels: [
                "< 1.7/day",
                "1.7-3.4/day",
                "3.4-5.2/day",
                "5.2-6.9/day",
                "6.9+/day",
            ]
            .map(String::from)
            .to_vec(),
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.thresholds.len() + 1
    }

    /// Index of the lowest bucket whose upper threshold exceeds `value`.
    /// The last bucket is unbounded above.
    pub fn classify(&self, value: f64) -> usize {
        self.thresholds.partition_point(|&t| t <= value)
    }

    /// Bar length for `value`, clamped to `max_width`. Zero means "no data"
    /// and always draws nothing.
    pub fn bar_length(&self, value: f64, max_width: usize) -> usize {
        if value == 0.0 {
            return 0;
        }
        let bucket = self.classify(value);
        self.bar_lengths
            .get(bucket)
            .copied()
            .unwrap_or(max_width)
            .min(max_width)
    }

    pub fn color(&self, bucket: usize) -> HeatColor {
        self.colors
            .get(bucket)
            .or_else(|| self.colors.last())
            .copied()
            .unwrap_or(HeatColor::Red)
    }

    /// (color, label) per bucket, lowest first
    pub fn legend(&self) -> impl Iterator<Item = (HeatColor, &str)> + '_ {
        self.colors
            .iter()
            .copied()
            .zip(self.labels.iter().map(String::as_str))
    }

    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let buckets = self.bucket_count();
        if self.bar_lengths.len() != buckets
            || self.colors.len() != buckets
            || self.labels.len() != buckets
        {
            return Err(ConfigError::Invalid {
                details: format!(
                    "heat scheme `{name}` has {} thresholds, so it needs {buckets} bar lengths, colors and labels",
                    self.thresholds.len()
                ),
            });
        }

        let ascending = self.thresholds.windows(2).all(|w| w[0] < w[1]);
        let finite = self.thresholds.iter().all(|t| t.is_finite() && *t >= 0.0);
        if !ascending || !finite {
            return Err(ConfigError::Invalid {
                details: format!(
                    "heat scheme `{name}` thresholds must be finite, non-negative and strictly ascending"
                ),
            });
        }

        if self.bar_lengths.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConfigError::Invalid {
                details: format!("heat scheme `{name}` bar lengths must not decrease"),
            });
        }

        Ok(())
    }
}

/// One scheme per metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatSchemes {
    pub size: HeatScheme,
    pub change_rate: HeatScheme,
}

impl Default for HeatSchemes {
    fn default() -> Self {
        Self {
            size: HeatScheme::size(),
            change_rate: HeatScheme::change_rate(),
        }
    }
}

impl HeatSchemes {
    pub fn scheme(&self, metric: Metric) -> &HeatScheme {
        match metric {
            Metric::Size => &self.size,
            Metric::ChangeRate => &self.change_rate,
        }
    }
}
