pub mod formatter;

pub use formatter::{
    format_formula_note, format_json, format_percentage, format_result, should_use_colors,
};
