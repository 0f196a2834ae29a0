use binboard_core::{ChartBucket, sanitize};
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

/// Smallest area the line chart is drawn in; below it the chart is skipped.
const MIN_WIDTH: u16 = 24;
const MIN_HEIGHT: u16 = 8;

/// Built line chart of pickups per route.
///
/// Owned by the app and replaced as a whole on every dashboard load.
#[derive(Debug)]
pub(crate) struct RouteChart {
    labels: Vec<String>,
    points: Vec<(f64, f64)>,
    max_count: f64,
}

impl RouteChart {
    pub(crate) fn new(buckets: &[ChartBucket]) -> Self {
        let labels = buckets
            .iter()
            .map(|bucket| sanitize(&bucket.label).into_owned())
            .collect();
        let points: Vec<(f64, f64)> = buckets
            .iter()
            .zip(0_u32..)
            .map(|(bucket, position)| (f64::from(position), count_as_f64(bucket.count)))
            .collect();
        let max_count = points.iter().map(|(_, count)| *count).fold(0.0, f64::max);
        Self {
            labels,
            points,
            max_count,
        }
    }

    pub(crate) fn labels(&self) -> &[String] {
        &self.labels
    }

    pub(crate) fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Draw the chart, or nothing when `area` is too small for it.
    pub(crate) fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            return;
        }

        let dataset = Dataset::default()
            .name("Pickups (last 7 days)")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightBlue))
            .data(&self.points);

        let x_max = count_as_f64(u64::try_from(self.points.len().saturating_sub(1)).unwrap_or(0));
        let y_max = self.max_count.max(1.0).ceil();

        let chart = Chart::new(vec![dataset])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Pickups per route (last 7 days)"),
            )
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max.max(1.0)])
                    .labels(self.labels.iter().map(String::as_str)),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels(["0".to_owned(), format!("{y_max}")]),
            )
            .legend_position(None);

        frame.render_widget(chart, area);
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "pickup counts stay far below 2^52"
)]
fn count_as_f64(count: u64) -> f64 {
    count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_point_per_bucket_in_order() {
        let chart = RouteChart::new(&[
            ChartBucket {
                label: "Morning North".to_owned(),
                count: 3,
            },
            ChartBucket {
                label: "Route Unknown".to_owned(),
                count: 1,
            },
        ]);
        assert_eq!(chart.labels(), ["Morning North", "Route Unknown"]);
        assert_eq!(chart.points(), [(0.0, 3.0), (1.0, 1.0)]);
    }

    #[test]
    fn labels_are_sanitized() {
        let chart = RouteChart::new(&[ChartBucket {
            label: "\u{1b}[31mRed".to_owned(),
            count: 0,
        }]);
        assert!(
            chart.labels().iter().all(|label| !label.contains('\u{1b}')),
            "escape removed"
        );
    }
}
