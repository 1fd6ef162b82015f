//! Server-rendered trend chart for the admin dashboard.

use rust_decimal::prelude::ToPrimitive;

use crate::api::RevenueTrend;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 280.0;
const PAD: f64 = 32.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLabel {
    pub x: String,
    pub text: String,
}

/// Two polylines (revenue and order count) over the months of
/// `revenueTrends`. Each series is scaled to its own maximum so the order
/// count stays readable next to revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub width: u32,
    pub height: u32,
    pub baseline: String,
    pub revenue_points: String,
    pub order_points: String,
    pub labels: Vec<ChartLabel>,
    pub max_revenue: String,
    pub max_orders: u64,
}

fn fmt(value: f64) -> String {
    format!("{value:.1}")
}

fn polyline(values: &[f64], xs: &[f64]) -> String {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    values
        .iter()
        .zip(xs)
        .map(|(value, x)| {
            let ratio = if max > 0.0 { value / max } else { 0.0 };
            let y = (HEIGHT - PAD) - ratio * (HEIGHT - 2.0 * PAD);
            format!("{},{}", fmt(*x), fmt(y))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl TrendChart {
    /// Lay out the chart, or `None` when there is nothing to plot.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(trends: &[RevenueTrend]) -> Option<Self> {
        if trends.is_empty() {
            return None;
        }

        let span = WIDTH - 2.0 * PAD;
        let xs: Vec<f64> = if trends.len() == 1 {
            vec![WIDTH / 2.0]
        } else {
            let step = span / (trends.len() - 1) as f64;
            (0..trends.len()).map(|i| PAD + step * i as f64).collect()
        };

        let revenue: Vec<f64> = trends
            .iter()
            .map(|t| t.revenue.amount().to_f64().unwrap_or(0.0))
            .collect();
        let orders: Vec<f64> = trends.iter().map(|t| t.orders as f64).collect();

        let max_revenue = trends
            .iter()
            .map(|t| t.revenue)
            .max()
            .unwrap_or_default();

        Some(Self {
            width: WIDTH as u32,
            height: HEIGHT as u32,
            baseline: fmt(HEIGHT - PAD),
            revenue_points: polyline(&revenue, &xs),
            order_points: polyline(&orders, &xs),
            labels: trends
                .iter()
                .zip(&xs)
                .map(|(t, x)| ChartLabel {
                    x: fmt(*x),
                    text: t.month.clone(),
                })
                .collect(),
            max_revenue: max_revenue.display(),
            max_orders: trends.iter().map(|t| t.orders).max().unwrap_or(0),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopeasy_core::Price;

    use super::*;

    fn trend(month: &str, cents: i64, orders: u64) -> RevenueTrend {
        RevenueTrend {
            month: month.to_string(),
            revenue: Price::from_cents(cents),
            orders,
        }
    }

    #[test]
    fn test_empty_trends_render_nothing() {
        assert!(TrendChart::new(&[]).is_none());
    }

    #[test]
    fn test_points_span_the_plot() {
        let chart = TrendChart::new(&[
            trend("Jan", 0, 0),
            trend("Feb", 50_000, 4),
            trend("Mar", 100_000, 2),
        ])
        .unwrap();
        assert_eq!(chart.revenue_points, "32.0,248.0 320.0,140.0 608.0,32.0");
        assert_eq!(chart.order_points, "32.0,248.0 320.0,32.0 608.0,140.0");
        assert_eq!(chart.labels[1].text, "Feb");
        assert_eq!(chart.max_revenue, "$1,000.00");
        assert_eq!(chart.max_orders, 4);
    }

    #[test]
    fn test_single_point_centered() {
        let chart = TrendChart::new(&[trend("Jan", 100, 1)]).unwrap();
        assert_eq!(chart.revenue_points, "320.0,32.0");
    }
}
