use itertools::Itertools;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use std::ops::RangeInclusive;

use crate::pmf::{Pmf, PmfError};
use crate::util::{mean, std_dev};

const VALUE_HEADER: &str = "weeks";
const COLUMN_GAP: usize = 2;

/// rendering options, passed to every renderer instead of living in globals
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    pub precision: usize,
    pub weeks: RangeInclusive<u32>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: 4,
            weeks: 35..=45,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Summary {
    pub label: String,
    pub observations: usize,
    pub support: usize,
    pub mean: f64,
    pub variance: f64,
    pub std: f64,
    pub raw_mean: Option<f64>,
    pub raw_std_dev: Option<f64>,
}

impl Summary {
    pub fn new(pmf: &Pmf<u32>, samples: &[u32]) -> Result<Self, PmfError> {
        let raw = samples.iter().map(|s| *s as f64).collect::<Vec<f64>>();

        Ok(Self {
            label: pmf.label().unwrap_or_default().to_string(),
            observations: samples.len(),
            support: pmf.len(),
            mean: pmf.mean()?,
            variance: pmf.variance()?,
            std: pmf.std()?,
            raw_mean: mean(&raw),
            raw_std_dev: std_dev(&raw),
        })
    }

    pub fn render(&self, precision: usize) -> String {
        format!(
            "{}: n={} support={} mean={:.p$} var={:.p$} std={:.p$}",
            self.label,
            self.observations,
            self.support,
            self.mean,
            self.variance,
            self.std,
            p = precision
        )
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct WeekDiff {
    pub week: u32,
    /// percentage points, first minus other
    pub diff: f64,
}

pub fn week_diffs(
    first: &Pmf<u32>,
    other: &Pmf<u32>,
    weeks: RangeInclusive<u32>,
) -> Vec<WeekDiff> {
    weeks
        .map(|week| WeekDiff {
            week,
            diff: 100.0 * (first.prob(&week) - other.prob(&week)),
        })
        .collect()
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", " ".repeat(fill), text)
}

/// one row per value in the union of supports, one column per pmf
pub fn render_pmf_table(pmfs: &[&Pmf<u32>], config: &ReportConfig) -> String {
    let headers = pmfs
        .iter()
        .enumerate()
        .map(|(idx, pmf)| match pmf.label() {
            Some(label) => label.to_string(),
            None => format!("pmf{}", idx + 1),
        })
        .collect::<Vec<String>>();

    let number_width = config.precision + 2;
    let widths = headers
        .iter()
        .map(|h| h.width().max(number_width) + COLUMN_GAP)
        .collect::<Vec<usize>>();

    let mut lines = vec![];
    lines.push(
        std::iter::once(VALUE_HEADER.to_string())
            .chain(headers.iter().zip(&widths).map(|(h, w)| pad(h, *w)))
            .join(""),
    );

    let values = pmfs
        .iter()
        .flat_map(|pmf| pmf.values().copied())
        .sorted()
        .dedup();

    for value in values {
        let row = std::iter::once(pad(&value.to_string(), VALUE_HEADER.width()))
            .chain(pmfs.iter().zip(&widths).map(|(pmf, w)| {
                pad(&format!("{:.p$}", pmf.prob(&value), p = config.precision), *w)
            }))
            .join("");
        lines.push(row);
    }

    lines.join("\n")
}

pub fn render_diffs(diffs: &[WeekDiff], config: &ReportConfig) -> String {
    let header = "percentage points";
    let width = header.width() + COLUMN_GAP;

    std::iter::once(format!("{}{}", VALUE_HEADER, pad(header, width)))
        .chain(diffs.iter().map(|d| {
            format!(
                "{}{}",
                pad(&d.week.to_string(), VALUE_HEADER.width()),
                pad(&format!("{:+.p$}", d.diff, p = config.precision), width)
            )
        }))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first() -> Pmf<u32> {
        Pmf::from_samples(vec![39, 39, 40, 41]).with_label("first")
    }

    fn other() -> Pmf<u32> {
        Pmf::from_samples(vec![38, 39, 39, 39]).with_label("other")
    }

    #[test]
    fn test_summary() {
        let samples = vec![35, 36, 36, 37, 37, 37, 38, 40];
        let pmf = Pmf::from_samples(samples.clone()).with_label("live");
        let summary = Summary::new(&pmf, &samples).unwrap();

        assert_eq!(summary.label, "live");
        assert_eq!(summary.observations, 8);
        assert_eq!(summary.support, 5);
        assert_eq!(summary.mean, 37.0);
        assert_eq!(summary.variance, 2.0);
        assert_eq!(summary.raw_mean, Some(37.0));
        assert_eq!(
            summary.render(2),
            "live: n=8 support=5 mean=37.00 var=2.00 std=1.41"
        );
    }

    #[test]
    fn test_summary_empty() {
        let pmf = Pmf::from_samples(Vec::<u32>::new());
        let summary = Summary::new(&pmf, &[]).unwrap();

        assert_eq!(summary.label, "");
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.variance, 0.0);
        assert_eq!(summary.raw_mean, None);
        assert_eq!(summary.raw_std_dev, None);
    }

    #[test]
    fn test_week_diffs() {
        let diffs = week_diffs(&first(), &other(), 38..=41);

        assert_eq!(
            diffs,
            vec![
                WeekDiff { week: 38, diff: -25.0 },
                WeekDiff { week: 39, diff: -25.0 },
                WeekDiff { week: 40, diff: 25.0 },
                WeekDiff { week: 41, diff: 25.0 },
            ]
        );
    }

    #[test]
    fn test_render_pmf_table() {
        let config = ReportConfig {
            precision: 2,
            ..ReportConfig::default()
        };
        let table = render_pmf_table(&[&first(), &other()], &config);

        assert_eq!(
            table,
            [
                "weeks  first  other",
                "   38   0.00   0.25",
                "   39   0.50   0.75",
                "   40   0.25   0.00",
                "   41   0.25   0.00",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_render_unlabelled() {
        let pmf = Pmf::from_samples(vec![40u32]);
        let table = render_pmf_table(&[&pmf], &ReportConfig::default());

        assert_eq!(table, "weeks    pmf1\n   40  1.0000");
    }

    #[test]
    fn test_render_diffs() {
        let config = ReportConfig {
            precision: 1,
            ..ReportConfig::default()
        };
        let diffs = week_diffs(&first(), &other(), 39..=40);

        assert_eq!(
            render_diffs(&diffs, &config),
            "weeks  percentage points\n   39              -25.0\n   40              +25.0"
        );
    }
}
