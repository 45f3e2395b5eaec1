//! Scatter plots of rule metrics using Plotters

use crate::rules::RuleRecord;
use plotters::prelude::*;
use std::ops::Range;

/// The plotted metric arrays, each sorted ascending on its own
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricSeries {
    pub sup: Vec<f64>,
    pub conf: Vec<f64>,
    pub lift: Vec<f64>,
    pub cosine: Vec<f64>,
    pub jaccard: Vec<f64>,
    pub cf: Vec<f64>,
}

impl MetricSeries {
    pub fn from_rules(rules: &[RuleRecord]) -> Self {
        let column = |metric: fn(&RuleRecord) -> f64| {
            let mut values: Vec<f64> = rules.iter().map(metric).collect();
            values.sort_by(f64::total_cmp);
            values
        };

        Self {
            sup: column(|r| r.sup as f64),
            conf: column(|r| r.conf),
            lift: column(|r| r.lift),
            cosine: column(|r| r.cosine),
            jaccard: column(|r| r.jaccard),
            cf: column(|r| r.cf),
        }
    }

    pub fn len(&self) -> usize {
        self.sup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sup.is_empty()
    }

    /// The four (x, y) pairings drawn by [`create_metric_plots`]
    pub fn panels(&self) -> [Panel<'_>; 4] {
        [
            Panel::new("Support vs. Confidence", "Support", &self.sup, "Confidence", &self.conf, BLUE),
            Panel::new("Lift vs. Cosine", "Lift", &self.lift, "Cosine", &self.cosine, GREEN),
            Panel::new("Lift vs. Jaccard", "Lift", &self.lift, "Jaccard", &self.jaccard, RED),
            Panel::new(
                "Lift vs. Certainty Factor",
                "Lift",
                &self.lift,
                "Certainty Factor",
                &self.cf,
                MAGENTA,
            ),
        ]
    }
}

/// One scatter plot of the grid
pub struct Panel<'a> {
    pub title: &'static str,
    pub x_label: &'static str,
    pub x: &'a [f64],
    pub y_label: &'static str,
    pub y: &'a [f64],
    pub color: RGBColor,
}

impl<'a> Panel<'a> {
    fn new(
        title: &'static str,
        x_label: &'static str,
        x: &'a [f64],
        y_label: &'static str,
        y: &'a [f64],
        color: RGBColor,
    ) -> Self {
        Self {
            title,
            x_label,
            x,
            y_label,
            y,
            color,
        }
    }
}

/// Axis range covering `values` with 5% padding; never zero-width
pub fn padded_range(values: &[f64]) -> Range<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max > min { (max - min) * 0.05 } else { 0.5 };
    (min - pad)..(max + pad)
}

/// Draw the 2x2 metric scatter grid into a PNG file
///
/// # Arguments
/// * `series` - Sorted metric arrays
/// * `output_path` - Path to save the PNG plot
pub fn create_metric_plots(series: &MetricSeries, output_path: &str) -> crate::Result<()> {
    if series.is_empty() {
        anyhow::bail!("No strong rules to plot");
    }

    let root = BitMapBackend::new(output_path, (1200, 1000)).into_drawing_area();
    root.fill(&WHITE)?;

    for (area, panel) in root.split_evenly((2, 2)).iter().zip(series.panels()) {
        let mut chart = ChartBuilder::on(area)
            .caption(panel.title, ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(padded_range(panel.x), padded_range(panel.y))?;

        chart
            .configure_mesh()
            .x_desc(panel.x_label)
            .y_desc(panel.y_label)
            .axis_desc_style(("sans-serif", 15))
            .draw()?;

        let color = panel.color;
        chart.draw_series(
            panel
                .x
                .iter()
                .zip(panel.y)
                .map(|(&x, &y)| Circle::new((x, y), 3, color.filled())),
        )?;
    }

    root.present()?;
    println!("Metric plots saved to: {}", output_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemset::ItemSet;
    use crate::rules::Rule;

    fn record(sup: usize, conf: f64, lift: f64, cf: f64) -> RuleRecord {
        RuleRecord {
            rule: Rule(ItemSet::singleton("a"), ItemSet::singleton("b")),
            sup,
            rsup: sup as f64 / 10.0,
            conf,
            lift,
            cosine: conf / 2.0,
            jaccard: conf / 3.0,
            cf,
        }
    }

    #[test]
    fn test_series_sorted_independently() {
        let rules = vec![
            record(5, 0.9, 1.2, -0.3),
            record(2, 0.6, 0.8, 0.4),
            record(7, 0.7, 2.5, 0.1),
        ];
        let series = MetricSeries::from_rules(&rules);

        assert_eq!(series.len(), 3);
        assert_eq!(series.sup, vec![2.0, 5.0, 7.0]);
        assert_eq!(series.conf, vec![0.6, 0.7, 0.9]);
        assert_eq!(series.lift, vec![0.8, 1.2, 2.5]);
        assert_eq!(series.cf, vec![-0.3, 0.1, 0.4]);
        assert!(series.cosine.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_panels() {
        let series = MetricSeries::from_rules(&[record(1, 0.5, 1.0, 0.0)]);
        let panels = series.panels();

        assert_eq!(panels[0].title, "Support vs. Confidence");
        assert_eq!(panels[3].y_label, "Certainty Factor");
        assert!(panels.iter().all(|panel| panel.x.len() == panel.y.len()));
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(&[]), 0.0..1.0);
        assert_eq!(padded_range(&[2.0, 2.0]), 1.5..2.5);

        let range = padded_range(&[0.0, 10.0]);
        assert!(range.start < 0.0 && range.end > 10.0);
    }

    #[test]
    fn test_plot_requires_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let result = create_metric_plots(&MetricSeries::default(), path.to_str().unwrap());
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
