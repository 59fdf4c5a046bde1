//! Spoken expense recognition
//!
//! Pure functions over transcripts produced by the speech recognizer. Nothing
//! here holds state; every table is a compile-time constant and every regex is
//! compiled once on first use.

pub mod amount;
pub mod category;
pub mod parser;

pub use amount::extract_amount;
pub use category::{canonical_or_other, normalize_category, CanonicalCategory};
pub use parser::{
    extract_original_category, parse_expense_from_voice, sanitize_original_label, ParsedExpense,
};
