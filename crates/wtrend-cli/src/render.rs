//! Plain-text screens

use chrono::NaiveDate;
use std::fmt::Write;
use wtrend_archive::WeatherReport;
use wtrend_core::MonthlyAggregate;

pub const TITLE: &str = "Weather Trend Analyzer";
pub const LOADING: &str = "Loading weather data...";
pub const GOODBYE: &str = "Thank you for using Weather Trend Analyzer!";

const COLUMN_WIDTH: usize = 10;
const HEADERS: [&str; 7] = [
    "Month", "Avg High", "Avg Low", "Max", "Min", "Humidity", "Precip",
];

/// `Jul 15`
fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

fn row<I: IntoIterator<Item = String>>(cells: I) -> String {
    let mut line = String::new();
    for cell in cells {
        let _ = write!(line, "{:<width$}", cell, width = COLUMN_WIDTH);
    }
    line.trim_end().to_string()
}

fn month_row(m: &MonthlyAggregate) -> String {
    let values = [
        m.avg_max_temp,
        m.avg_min_temp,
        m.max_temp,
        m.min_temp,
        m.avg_humidity,
        m.total_precip,
    ];
    row(std::iter::once(m.month_name().to_string()).chain(values.iter().map(|v| format!("{v:.1}"))))
}

/// Location prompt, with the last error if any
pub fn input_screen(error: Option<&str>) -> String {
    let mut s = format!("{TITLE}\n\n");
    s.push_str("Location (City, State):\n");
    s.push_str("Press Enter to analyze weather trends\n");
    s.push_str("Type q to quit\n");
    if let Some(err) = error {
        let _ = writeln!(s, "\nError: {err}");
    }
    s
}

/// Annual statistics and the monthly table for one location-year
pub fn report(report: &WeatherReport) -> String {
    let annual = &report.annual;
    let mut s = format!("{TITLE}\n\n");

    let _ = writeln!(s, "Weather analysis for: {}\n", report.location);

    s.push_str("Annual Statistics\n");
    let _ = writeln!(
        s,
        "Highest Temperature: {:.1}°C (on {})",
        annual.max_temp,
        short_date(annual.max_temp_date)
    );
    let _ = writeln!(
        s,
        "Lowest Temperature: {:.1}°C (on {})",
        annual.min_temp,
        short_date(annual.min_temp_date)
    );
    let _ = writeln!(s, "Average Temperature: {:.1}°C", annual.avg_temp);
    let _ = writeln!(s, "Total Precipitation: {:.1} mm\n", annual.total_precip);

    s.push_str("Monthly Breakdown\n");
    s.push_str(&row(HEADERS.iter().map(|h| h.to_string())));
    s.push('\n');
    for month in &report.monthly {
        s.push_str(&month_row(month));
        s.push('\n');
    }

    s.push_str("\nPress Enter to analyze another location\n");
    s.push_str("Press Q to quit\n");
    s
}
