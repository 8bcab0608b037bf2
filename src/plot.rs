//! Chart rendering for the sunset analysis
//!
//! Two stacked panels: the sunset-time curve in UTC decimal hours (the UTC
//! reference keeps the curve free of daylight-saving discontinuities) and
//! the day-over-day derivative with a zero baseline. Vertical markers flag
//! the supplied daylight-saving transition dates and the solstice dates.

use chrono::NaiveDate;
use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use tracing::info;

use crate::Result;
use crate::derivative::{DerivativeSeries, DstTransition};
use crate::error::SunfallError;
use crate::models::SunsetSeries;
use crate::report::SeasonalReport;

/// Rendered chart dimensions in pixels
pub const CHART_SIZE: (u32, u32) = (1200, 1000);

const DARK_ORANGE: RGBColor = RGBColor(255, 140, 0);
const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const DARK_BLUE: RGBColor = RGBColor(0, 0, 139);
const PURPLE: RGBColor = RGBColor(128, 0, 128);
const BROWN: RGBColor = RGBColor(165, 42, 42);

/// Render the two-panel analysis chart as an SVG artifact at `path`
pub fn render(
    series: &SunsetSeries,
    derivative: &DerivativeSeries,
    report: &SeasonalReport,
    transitions: &[DstTransition],
    path: &str,
) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(to_render_error)?;
    let (top, bottom) = root.split_vertically(CHART_SIZE.1 / 2);

    draw_sunset_panel(&top, series, transitions)?;
    draw_derivative_panel(&bottom, derivative, report)?;

    root.present().map_err(to_render_error)?;
    info!("Wrote sunset analysis chart to {path}");
    Ok(())
}

fn draw_sunset_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    series: &SunsetSeries,
    transitions: &[DstTransition],
) -> Result<()> {
    let dates = series.dates();
    let hours = series.hours_utc()?;
    let (y_min, y_max) = padded_range(&hours, 1.0);
    let title = format!(
        "Sunset Times in {} Throughout {} (UTC, no DST)",
        series.location().city,
        series.year()
    );

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(title, ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(dates[0]..dates[dates.len() - 1], y_min..y_max)
        .map_err(to_render_error)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Sunset Time UTC (hours)")
        .x_labels(12)
        .y_label_formatter(&|h| format!("{:02}:00", *h as i32))
        .draw()
        .map_err(to_render_error)?;

    chart
        .draw_series(LineSeries::new(
            dates.iter().copied().zip(hours.iter().copied()),
            DARK_ORANGE.stroke_width(2),
        ))
        .map_err(to_render_error)?;

    for transition in transitions {
        let (color, label) = if transition.shift_minutes > 0 {
            (GREEN, "DST Start")
        } else {
            (BROWN, "DST End")
        };
        draw_vertical_marker(&mut chart, transition.date, y_min, y_max, color)?;
        chart
            .draw_series(std::iter::once(Text::new(
                format!("{label} ({})", transition.date.format("%b %d")),
                (transition.date, y_max - 0.3),
                ("sans-serif", 14).into_font(),
            )))
            .map_err(to_render_error)?;
    }

    Ok(())
}

fn draw_derivative_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    derivative: &DerivativeSeries,
    report: &SeasonalReport,
) -> Result<()> {
    let points = derivative.points();
    let rates: Vec<f64> = points.iter().map(|p| p.minutes_per_day).collect();
    let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
    let (mut y_min, mut y_max) = padded_range(&rates, 0.5);
    y_min = y_min.min(-0.5);
    y_max = y_max.max(0.5);
    let title = format!("Rate of Change in Sunset Time Throughout {}", report.year);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(title, ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(dates[0]..dates[dates.len() - 1], y_min..y_max)
        .map_err(to_render_error)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Rate of Change (minutes/day)")
        .x_labels(12)
        .draw()
        .map_err(to_render_error)?;

    chart
        .draw_series(LineSeries::new(
            dates.iter().copied().zip(rates.iter().copied()),
            STEEL_BLUE.stroke_width(2),
        ))
        .map_err(to_render_error)?;

    // Zero baseline separates lengthening from shortening evenings
    chart
        .draw_series(LineSeries::new(
            [(dates[0], 0.0), (dates[dates.len() - 1], 0.0)],
            &RED,
        ))
        .map_err(to_render_error)?;

    draw_vertical_marker(
        &mut chart,
        report.winter_solstice(),
        y_min,
        y_max,
        DARK_BLUE,
    )?;
    draw_vertical_marker(&mut chart, report.summer_solstice(), y_min, y_max, PURPLE)?;

    let dy = (y_max - y_min) * 0.05;
    let annotations = [
        (
            report.winter_solstice(),
            y_max - dy,
            format!(
                "Winter Solstice ({})",
                report.winter_solstice().format("%b %d")
            ),
        ),
        (
            report.summer_solstice(),
            y_max - dy,
            format!(
                "Summer Solstice ({})",
                report.summer_solstice().format("%b %d")
            ),
        ),
        (
            report.max_increase.date,
            report.max_increase.minutes_per_day + dy,
            format!(
                "Max increase {:.2} min/day ({})",
                report.max_increase.minutes_per_day,
                report.max_increase.date.format("%b %d")
            ),
        ),
        (
            report.max_decrease.date,
            report.max_decrease.minutes_per_day - dy,
            format!(
                "Max decrease {:.2} min/day ({})",
                report.max_decrease.minutes_per_day,
                report.max_decrease.date.format("%b %d")
            ),
        ),
    ];
    for (date, y, label) in annotations {
        chart
            .draw_series(std::iter::once(Text::new(
                label,
                (date, y),
                ("sans-serif", 14).into_font(),
            )))
            .map_err(to_render_error)?;
    }

    Ok(())
}

fn draw_vertical_marker<CT>(
    chart: &mut ChartContext<'_, SVGBackend<'_>, CT>,
    date: NaiveDate,
    y_min: f64,
    y_max: f64,
    color: RGBColor,
) -> Result<()>
where
    CT: CoordTranslate<From = (NaiveDate, f64)>,
{
    chart
        .draw_series(LineSeries::new(
            [(date, y_min), (date, y_max)],
            color.stroke_width(2),
        ))
        .map_err(to_render_error)?;
    Ok(())
}

fn padded_range(values: &[f64], pad: f64) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(*v);
        max = max.max(*v);
    }
    (min - pad, max + pad)
}

fn to_render_error<E: std::fmt::Display>(e: E) -> SunfallError {
    SunfallError::render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivative::DerivativeSeries;
    use crate::models::{Location, SunsetSample};
    use crate::report::SeasonalReport;

    fn synthetic_series() -> SunsetSeries {
        let location = Location::new("Testville", "Nowhere", "UTC", 50.0, 10.0);
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let samples: Vec<SunsetSample> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| {
                // A gentle seasonal swing around 18:00 UTC
                let day = chrono::Datelike::ordinal(&date) as f64;
                let hours = 18.0 + 2.0 * (day / 365.0 * std::f64::consts::TAU).sin();
                let seconds = (hours * 3600.0) as u32;
                let utc = date
                    .and_hms_opt(seconds / 3600, (seconds % 3600) / 60, seconds % 60)
                    .unwrap()
                    .and_utc();
                SunsetSample::setting(date, utc, chrono_tz::UTC)
            })
            .collect();
        SunsetSeries::from_samples(location, 2025, samples).unwrap()
    }

    #[test]
    fn test_render_writes_svg_artifact() {
        let series = synthetic_series();
        let derivative = DerivativeSeries::from_series(&series, &[]).unwrap();
        let report = SeasonalReport::analyze(&series, &derivative).unwrap();
        let transitions = [
            DstTransition::spring_forward(NaiveDate::from_ymd_opt(2025, 3, 30).unwrap()),
            DstTransition::fall_back(NaiveDate::from_ymd_opt(2025, 10, 26).unwrap()),
        ];

        let path = std::env::temp_dir().join("sunfall_render_test.svg");
        let path_str = path.to_str().unwrap();
        render(&series, &derivative, &report, &transitions, path_str).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<svg"));
        std::fs::remove_file(&path).ok();
    }
}
