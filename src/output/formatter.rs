use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::estimate::{Estimate, Field, FieldError, InputSpec};

use super::report::EstimateReport;

const LABEL_WIDTH: usize = 26; // fits "Delivery Type Adjustment"
const PARAM_WIDTH: usize = 21; // fits "Package Weight (kg)"

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format an estimate in days with two decimals: "2.50 days"
pub fn format_days(days: f64) -> String {
    format!("{:.2} days", days)
}

/// Format a signed adjustment: "+2.00", "-1.00", " 0.00"
pub fn format_adjustment(days: f64) -> String {
    if days == 0.0 {
        " 0.00".to_string()
    } else {
        format!("{:+.2}", days)
    }
}

/// One-line headline for an estimate
pub fn format_estimate(estimate: &Estimate, use_colors: bool) -> String {
    let days = format_days(estimate.days);
    if use_colors {
        format!("Estimated Delivery Time: {}", days.green().bold())
    } else {
        format!("Estimated Delivery Time: {}", days)
    }
}

/// Two-column Parameter/Value table of the input
pub fn format_input_table(input: &InputSpec, use_colors: bool) -> String {
    let header = format!("{:<width$}  {}", "Parameter", "Value", width = PARAM_WIDTH);
    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for (label, value) in input.rows() {
        let label = format!("{:<width$}", label, width = PARAM_WIDTH);
        if use_colors {
            lines.push(format!("{}  {}", label.dimmed(), value));
        } else {
            lines.push(format!("{}  {}", label, value));
        }
    }
    lines.join("\n")
}

/// Horizontal bar around a center axis. Negative values grow to the left.
/// `half_width` is the number of cells on each side of the axis.
pub(crate) fn signed_bar(days: f64, max_magnitude: f64, half_width: usize) -> (String, String) {
    let cells = if max_magnitude > 0.0 {
        ((days.abs() / max_magnitude) * half_width as f64).round() as usize
    } else {
        0
    };
    let cells = cells.min(half_width);
    let bar = "█".repeat(cells);

    if days < 0.0 {
        (
            format!("{:>width$}", bar, width = half_width),
            " ".repeat(half_width),
        )
    } else {
        (
            " ".repeat(half_width),
            format!("{:<width$}", bar, width = half_width),
        )
    }
}

/// Cells per side of the breakdown chart axis
fn breakdown_bar_width() -> usize {
    match get_terminal_width() {
        Some(width) => (width.saturating_sub(LABEL_WIDTH + 10) / 2).clamp(5, 20),
        None => 10,
    }
}

/// Breakdown table with a signed bar per factor, the uncapped total, and
/// notes when the urgent cap or the floor changed the final estimate.
pub fn format_breakdown(estimate: &Estimate, use_colors: bool) -> String {
    format_breakdown_with_width(estimate, use_colors, breakdown_bar_width())
}

fn format_breakdown_with_width(estimate: &Estimate, use_colors: bool, half_width: usize) -> String {
    let max = estimate.breakdown.max_magnitude();
    let mut lines = Vec::new();

    let header = format!("{:<width$}  {:>5}", "Factor", "Days", width = LABEL_WIDTH);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for adjustment in &estimate.breakdown.adjustments {
        let label = format!("{:<width$}", adjustment.factor.label(), width = LABEL_WIDTH);
        let value = format_adjustment(adjustment.days);
        let (left, right) = signed_bar(adjustment.days, max, half_width);

        if use_colors {
            lines.push(format!(
                "{}  {}  {}│{}",
                label,
                value.bold(),
                left.green(),
                right.yellow()
            ));
        } else {
            lines.push(format!("{}  {}  {}│{}", label, value, left, right));
        }
    }

    let total_label = format!("{:<width$}", "Total (before caps)", width = LABEL_WIDTH);
    let total = format_adjustment(estimate.total);
    if use_colors {
        lines.push(format!("{}  {}", total_label.bold(), total.bold()));
    } else {
        lines.push(format!("{}  {}", total_label, total));
    }

    if estimate.urgent_cap_applied {
        let note = "Urgent priority caps the estimate at 2 days.";
        lines.push(if use_colors {
            note.yellow().to_string()
        } else {
            note.to_string()
        });
    }
    if estimate.floor_applied {
        let note = "Estimate raised to the 1 day minimum.";
        lines.push(if use_colors {
            note.yellow().to_string()
        } else {
            note.to_string()
        });
    }

    lines.join("\n")
}

pub(crate) fn short_header(field: Field) -> &'static str {
    match field {
        Field::ProductCategory => "Category",
        Field::CustomerLocation => "Location",
        Field::ShippingMethod => "Method",
        Field::ShippingPriority => "Priority",
        Field::Weather => "Weather",
        Field::PackageWeight => "Kg",
        Field::PackageSize => "Size",
        Field::Distance => "Km",
        Field::WarehouseProximity => "Warehouse",
        Field::DeliveryType => "Delivery",
    }
}

/// Format the sample dataset as a table with one column per field.
/// Headers shrink to short names when the full table would not fit the terminal.
pub fn format_sample_table(rows: &[InputSpec], use_colors: bool) -> String {
    let full = render_sample_table(rows, use_colors, |f| f.label());
    match get_terminal_width() {
        Some(width) if full.lines().any(|l| l.chars().count() > width) => {
            render_sample_table(rows, use_colors, short_header)
        }
        _ => full,
    }
}

fn render_sample_table(
    rows: &[InputSpec],
    use_colors: bool,
    header: impl Fn(Field) -> &'static str,
) -> String {
    let widths: Vec<usize> = Field::ALL
        .iter()
        .map(|field| {
            rows.iter()
                .map(|row| row.value_label(*field).chars().count())
                .chain(std::iter::once(header(*field).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line = Field::ALL
        .iter()
        .zip(&widths)
        .map(|(field, width)| format!("{:<width$}", header(*field), width = *width))
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = vec![if use_colors {
        header_line.trim_end().bold().to_string()
    } else {
        header_line.trim_end().to_string()
    }];

    for row in rows {
        let line = Field::ALL
            .iter()
            .zip(&widths)
            .map(|(field, width)| {
                let value = row.value_label(*field);
                if field.is_numeric() {
                    format!("{:>width$}", value, width = *width)
                } else {
                    format!("{:<width$}", value, width = *width)
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Tab-separated output for scripting: the estimate, then one row per factor
pub fn format_tsv(estimate: &Estimate) -> String {
    let mut lines = vec![format!("estimated_days\t{:.2}", estimate.days)];
    for (label, days) in estimate.breakdown.pairs() {
        lines.push(format!("{}\t{}", label, days));
    }
    lines.join("\n")
}

/// Pretty JSON, same shape as the HTTP response
pub fn format_json(estimate: &Estimate) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&EstimateReport::from(estimate))?)
}

/// One "  - field: problem" line per validation error
pub fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
