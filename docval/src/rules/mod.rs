//! Built-in rules.

pub mod date_range;
pub mod readability;
pub mod required_properties;
pub mod spelling;
pub mod write_good;

pub use date_range::DateRange;
pub use readability::Readability;
pub use required_properties::RequiredProperties;
pub use spelling::Spelling;
pub use write_good::WriteGood;

use crate::rule::Rule;

/// Fresh instances of every built-in rule.
#[must_use]
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(DateRange::default()),
        Box::new(Readability),
        Box::new(RequiredProperties),
        Box::new(Spelling),
        Box::new(WriteGood),
    ]
}
