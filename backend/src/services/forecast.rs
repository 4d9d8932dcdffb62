//! Forecast Formatter.

use chrono::NaiveDate;

use crate::api::{ForecastRow, FORECAST_PLACEHOLDER};

/// Rows in the forecast panel.
pub const FORECAST_DAYS: usize = 7;

/// Weekday and month/day, e.g. `Sun 09/07`.
pub const DAY_LABEL_FORMAT: &str = "%a %m/%d";

fn probability_label(value: Option<&Option<f64>>) -> String {
    match value.copied().flatten() {
        Some(p) if p.is_finite() && (0.0..=100.0).contains(&p) => format!("{:.0}%", p),
        _ => FORECAST_PLACEHOLDER.to_string(),
    }
}

fn hours_label(value: Option<&Option<f64>>) -> String {
    match value.copied().flatten() {
        Some(h) if h.is_finite() && (0.0..=24.0).contains(&h) => format!("{:.1} hours", h),
        _ => FORECAST_PLACEHOLDER.to_string(),
    }
}

/// Render exactly [`FORECAST_DAYS`] rows from day-aligned arrays.
///
/// Missing, null or out-of-range entries become [`FORECAST_PLACEHOLDER`].
pub fn format_forecast_rows(
    daily_probabilities: &[Option<f64>],
    daily_hours: &[Option<f64>],
    reference_dates: &[Option<NaiveDate>],
) -> Vec<ForecastRow> {
    (0..FORECAST_DAYS)
        .map(|i| ForecastRow {
            day_label: reference_dates
                .get(i)
                .copied()
                .flatten()
                .map(|d| d.format(DAY_LABEL_FORMAT).to_string())
                .unwrap_or_else(|| FORECAST_PLACEHOLDER.to_string()),
            probability: probability_label(daily_probabilities.get(i)),
            hours: hours_label(daily_hours.get(i)),
        })
        .collect()
}
