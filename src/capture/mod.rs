//! Turning recognized speech and form input into stored records
//!
//! The parser only proposes a candidate; this module decides what happens
//! with it based on the user's voice settings: save it, keep the raw phrase as
//! a zero-amount voice note, or just report what was heard.

use anyhow::Result;
use thiserror::Error;

use crate::db::ExpenseStore;
use crate::models::{Expense, Income};
use crate::settings::VoiceSettings;
use crate::speech::{
    canonical_or_other, extract_original_category, normalize_category, parse_expense_from_voice,
    ParsedExpense,
};

/// Category used for raw voice notes without a recognizable label
pub const VOICE_NOTE_CATEGORY: &str = "Voz";

const NOTE_PREVIEW_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Parsed and stored
    Saved(Expense),
    /// Not parseable, stored as a zero-amount voice note
    SavedRaw(Expense),
    /// Nothing stored
    Recognized {
        transcript: String,
        candidate: Option<ParsedExpense>,
    },
}

impl CaptureOutcome {
    /// One-line confirmation for the user
    pub fn summary(&self, currency_symbol: &str) -> String {
        match self {
            Self::Saved(expense) => format!(
                "Gasto guardado: {} - {} {:.2}",
                expense.category, currency_symbol, expense.amount
            ),
            Self::SavedRaw(expense) => {
                let note: String = expense
                    .comment
                    .as_deref()
                    .unwrap_or_default()
                    .chars()
                    .take(NOTE_PREVIEW_CHARS)
                    .collect();
                format!("Guardado (nota de voz): {}", note)
            }
            Self::Recognized { transcript, .. } => format!("Reconocido: {}", transcript),
        }
    }
}

/// Applies the voice settings to final transcripts and writes to a store.
pub struct VoiceCapture<S: ExpenseStore> {
    settings: VoiceSettings,
    store: S,
}

impl<S: ExpenseStore> VoiceCapture<S> {
    pub fn new(settings: VoiceSettings, store: S) -> Self {
        Self { settings, store }
    }

    pub fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Handle a final transcript from the recognizer.
    pub fn handle_transcript(&mut self, transcript: &str) -> Result<CaptureOutcome> {
        let candidate = parse_expense_from_voice(transcript);

        if !self.settings.auto_save {
            return Ok(CaptureOutcome::Recognized {
                transcript: transcript.to_string(),
                candidate,
            });
        }

        match candidate {
            Some(parsed) => {
                let spoken = extract_original_category(transcript);
                let expense = Expense::from_parsed(parsed.with_original_category(spoken));
                self.store.insert_expense(&expense)?;
                log::info!("Voice expense saved: {} - {:.2}", expense.category, expense.amount);
                Ok(CaptureOutcome::Saved(expense))
            }
            None if self.settings.fallback_save_raw && !transcript.trim().is_empty() => {
                let expense = raw_voice_note(transcript);
                self.store.insert_expense(&expense)?;
                log::warn!("Transcript not understood, stored as voice note: {}", transcript);
                Ok(CaptureOutcome::SavedRaw(expense))
            }
            None => Ok(CaptureOutcome::Recognized {
                transcript: transcript.to_string(),
                candidate: None,
            }),
        }
    }
}

fn raw_voice_note(transcript: &str) -> Expense {
    let spoken = extract_original_category(transcript);
    let category = spoken
        .clone()
        .unwrap_or_else(|| VOICE_NOTE_CATEGORY.to_string());

    Expense {
        original_category: spoken,
        comment: Some(transcript.to_string()),
        ..Expense::new(category, 0.0)
    }
}

/// Parse an interim transcript to pre-fill the entry form while the user is
/// still speaking. Only candidates with a positive amount are useful there.
pub fn preview_partial(partial: &str) -> Option<ParsedExpense> {
    parse_expense_from_voice(partial).filter(|parsed| parsed.amount > 0.0)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("Ingrese la categoría")]
    MissingCategory,
    #[error("Ingrese el emisor")]
    MissingEmitter,
    #[error("Ingrese el monto")]
    MissingAmount,
    #[error("Monto inválido: {0}")]
    InvalidAmount(String),
}

/// Raw form input for a manually entered expense
#[derive(Debug, Clone, Default)]
pub struct ManualEntry {
    pub category: String,
    pub amount: String,
    pub comment: String,
}

/// Validate form input. The category is reduced to the canonical set, with
/// the typed text kept as the original label.
pub fn build_manual_expense(entry: &ManualEntry) -> Result<Expense, EntryError> {
    let raw_category = entry.category.trim();
    if raw_category.is_empty() {
        return Err(EntryError::MissingCategory);
    }
    let amount = parse_form_amount(&entry.amount)?;

    let category = canonical_or_other(&normalize_category(raw_category));
    let comment = entry.comment.trim();

    Ok(Expense {
        original_category: Some(raw_category.to_string()),
        comment: (!comment.is_empty()).then(|| comment.to_string()),
        ..Expense::new(category.as_str().to_string(), amount)
    })
}

pub fn build_income(emitter: &str, amount: &str) -> Result<Income, EntryError> {
    let emitter = emitter.trim();
    if emitter.is_empty() {
        return Err(EntryError::MissingEmitter);
    }
    let amount = parse_form_amount(amount)?;
    Ok(Income::new(emitter.to_string(), amount))
}

/// Form amounts are plain decimals ("12.5"), strictly positive.
fn parse_form_amount(text: &str) -> Result<f64, EntryError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(EntryError::MissingAmount);
    }
    match text.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(EntryError::InvalidAmount(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;

    fn capture(settings: VoiceSettings) -> VoiceCapture<SqliteStore> {
        VoiceCapture::new(settings, SqliteStore::open_in_memory().unwrap())
    }

    #[test]
    fn test_saves_parsed_expense_with_spoken_label() {
        let mut capture = capture(VoiceSettings::default());
        let outcome = capture.handle_transcript("Cena, 45, con amigos").unwrap();

        let CaptureOutcome::Saved(expense) = &outcome else {
            panic!("expected Saved, got {:?}", outcome);
        };
        assert_eq!(expense.category, "Alimentación");
        assert_eq!(expense.original_category.as_deref(), Some("Cena"));
        assert_eq!(expense.amount, 45.0);
        assert_eq!(expense.comment.as_deref(), Some("con amigos"));

        let stored = capture.store().expenses().unwrap();
        assert_eq!(stored, vec![expense.clone()]);
        assert_eq!(outcome.summary("S/"), "Gasto guardado: Alimentación - S/ 45.00");
    }

    #[test]
    fn test_raw_fallback_keeps_transcript() {
        let mut capture = capture(VoiceSettings::default());
        let outcome = capture.handle_transcript("Recordar pagar al gasfitero").unwrap();

        let CaptureOutcome::SavedRaw(expense) = &outcome else {
            panic!("expected SavedRaw, got {:?}", outcome);
        };
        assert_eq!(expense.amount, 0.0);
        assert_eq!(expense.category, "Recordar");
        assert_eq!(expense.original_category.as_deref(), Some("Recordar"));
        assert_eq!(expense.comment.as_deref(), Some("Recordar pagar al gasfitero"));
        assert_eq!(
            outcome.summary("S/"),
            "Guardado (nota de voz): Recordar pagar al gasfitero"
        );
        assert_eq!(capture.store().expenses().unwrap().len(), 1);
    }

    #[test]
    fn test_raw_fallback_disabled() {
        let settings = VoiceSettings {
            fallback_save_raw: false,
            ..VoiceSettings::default()
        };
        let mut capture = capture(settings);
        let outcome = capture.handle_transcript("hola como estas").unwrap();

        assert_eq!(
            outcome,
            CaptureOutcome::Recognized {
                transcript: "hola como estas".to_string(),
                candidate: None,
            }
        );
        assert!(capture.store().expenses().unwrap().is_empty());
    }

    #[test]
    fn test_blank_transcript_is_never_stored() {
        let mut capture = capture(VoiceSettings::default());
        let outcome = capture.handle_transcript("   ").unwrap();
        assert!(matches!(outcome, CaptureOutcome::Recognized { candidate: None, .. }));
        assert!(capture.into_store().expenses().unwrap().is_empty());
    }

    #[test]
    fn test_auto_save_off_only_reports() {
        let settings = VoiceSettings {
            auto_save: false,
            ..VoiceSettings::default()
        };
        let mut capture = capture(settings);
        let outcome = capture.handle_transcript("taxi, 12 con 50").unwrap();

        let CaptureOutcome::Recognized { candidate, .. } = &outcome else {
            panic!("expected Recognized, got {:?}", outcome);
        };
        assert_eq!(candidate.as_ref().map(|c| c.amount), Some(12.5));
        assert_eq!(outcome.summary("S/"), "Reconocido: taxi, 12 con 50");
        assert!(capture.store().expenses().unwrap().is_empty());
    }

    #[test]
    fn test_raw_summary_is_truncated() {
        let expense = raw_voice_note("anotar cambio de llanta del carro el lunes");
        let summary = CaptureOutcome::SavedRaw(expense).summary("S/");
        assert_eq!(summary, "Guardado (nota de voz): anotar cambio de llanta del carr");
    }

    #[test]
    fn test_preview_partial() {
        assert_eq!(preview_partial("comida 18").map(|p| p.amount), Some(18.0));
        assert_eq!(preview_partial("comida"), None);
        assert_eq!(preview_partial("comida 0"), None);
    }

    #[test]
    fn test_manual_expense_canonicalizes() {
        let entry = ManualEntry {
            category: " almuerzo ".to_string(),
            amount: "15.5".to_string(),
            comment: "  ".to_string(),
        };
        let expense = build_manual_expense(&entry).unwrap();
        assert_eq!(expense.category, "Alimentación");
        assert_eq!(expense.original_category.as_deref(), Some("almuerzo"));
        assert_eq!(expense.amount, 15.5);
        assert_eq!(expense.comment, None);
    }

    #[test]
    fn test_manual_expense_unknown_category_is_otros() {
        let entry = ManualEntry {
            category: "regalo".to_string(),
            amount: "30".to_string(),
            comment: "cumpleaños".to_string(),
        };
        let expense = build_manual_expense(&entry).unwrap();
        assert_eq!(expense.category, "Otros");
        assert_eq!(expense.original_category.as_deref(), Some("regalo"));
        assert_eq!(expense.comment.as_deref(), Some("cumpleaños"));
    }

    #[test]
    fn test_manual_expense_errors() {
        let mut entry = ManualEntry::default();
        assert_eq!(build_manual_expense(&entry), Err(EntryError::MissingCategory));

        entry.category = "taxi".to_string();
        assert_eq!(build_manual_expense(&entry), Err(EntryError::MissingAmount));

        entry.amount = "diez".to_string();
        assert_eq!(
            build_manual_expense(&entry),
            Err(EntryError::InvalidAmount("diez".to_string()))
        );

        entry.amount = "-4".to_string();
        assert!(matches!(
            build_manual_expense(&entry),
            Err(EntryError::InvalidAmount(_))
        ));
        assert_eq!(EntryError::MissingAmount.to_string(), "Ingrese el monto");
    }

    #[test]
    fn test_build_income() {
        let income = build_income(" Sueldo ", "2500").unwrap();
        assert_eq!(income.emitter, "Sueldo");
        assert_eq!(income.amount, 2500.0);
        assert_eq!(build_income("", "10"), Err(EntryError::MissingEmitter));
        assert_eq!(build_income("Freelance", "0"), Err(EntryError::InvalidAmount("0".to_string())));
    }
}
