pub mod engine;
pub mod types;
pub mod validation;

pub use engine::{compute, A_LEVEL_BONUS, MAX_AGGREGATE};
pub use types::*;
pub use validation::{parse_mark, validate_input, InvalidInput, MarkPart};
