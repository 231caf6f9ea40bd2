pub mod formatter;
pub mod report;

pub use formatter::{
    format_adjustment, format_breakdown, format_days, format_estimate, format_field_errors,
    format_input_table, format_json, format_sample_table, format_tsv, should_use_colors,
};
pub use report::{ErrorReport, EstimateReport, FieldErrorReport};
