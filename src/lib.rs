//! Kolki: quick expense capture by voice
//!
//! `speech` turns Spanish transcripts into expense candidates, `capture`
//! decides what to do with them, and `db` persists the result.

pub mod capture;
pub mod db;
pub mod models;
pub mod settings;
pub mod speech;

pub use capture::{CaptureOutcome, EntryError, ManualEntry, VoiceCapture};
pub use db::{ExpenseStore, SqliteStore};
pub use models::{Expense, Income};
pub use settings::VoiceSettings;
pub use speech::{
    extract_amount, extract_original_category, normalize_category, parse_expense_from_voice,
    sanitize_original_label, CanonicalCategory, ParsedExpense,
};
