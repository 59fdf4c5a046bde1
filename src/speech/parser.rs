//! Voice expense parsing
//!
//! Turns a free-form Spanish transcript into an expense candidate. The phrase
//! has no fixed grammar, so a cascade of increasingly permissive strategies is
//! tried until one of them finds an amount:
//!
//! 1. comma-delimited: `"comida, 25, menu del dia"`
//! 2. leading pair: `"comida 25 menu del dia"`
//! 3. amount scan: `"ayer gaste 30 en taxi"`

use serde::{Deserialize, Serialize};

use super::amount::{extract_amount, RE_SOLES, RE_SOL_DOT};
use super::category::{normalize_category, CanonicalCategory};

/// Expense candidate produced from a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedExpense {
    pub category: String,
    /// Literal spoken label, filled by callers via `extract_original_category`
    pub original_category: Option<String>,
    pub amount: f64,
    pub comment: Option<String>,
}

impl ParsedExpense {
    fn new(category_token: &str, amount: f64, comment: Option<String>) -> Self {
        Self {
            category: normalize_category(category_token),
            original_category: None,
            amount,
            comment,
        }
    }

    pub fn with_original_category(mut self, label: Option<String>) -> Self {
        self.original_category = label;
        self
    }
}

/// Lowercased transcript and its whitespace tokens.
struct Utterance<'a> {
    text: &'a str,
    words: Vec<&'a str>,
}

type Stage = fn(&Utterance<'_>) -> Option<ParsedExpense>;

const CASCADE: &[(&str, Stage)] = &[
    ("comma_delimited", parse_comma_delimited),
    ("leading_pair", parse_leading_pair),
    ("amount_scan", parse_amount_scan),
];

/// Parse a transcript into an expense candidate.
///
/// Returns `None` when no strategy finds an amount; that is the normal outcome
/// for phrases that are not expenses.
pub fn parse_expense_from_voice(transcript: &str) -> Option<ParsedExpense> {
    let lowered = transcript.to_lowercase();
    let text = lowered.trim();
    let utterance = Utterance {
        text,
        words: text.split_whitespace().collect(),
    };

    for (name, stage) in CASCADE {
        if let Some(parsed) = stage(&utterance) {
            log::debug!(
                "Voice parse via {}: {} {:.2} ({:?})",
                name,
                parsed.category,
                parsed.amount,
                parsed.comment
            );
            return Some(parsed);
        }
    }

    log::debug!("No amount found in transcript: {}", text);
    None
}

/// `"categoria, monto, comentario..."`
fn parse_comma_delimited(utterance: &Utterance<'_>) -> Option<ParsedExpense> {
    let parts: Vec<&str> = utterance.text.split(',').map(str::trim).collect();
    if parts.len() < 2 {
        return None;
    }

    let amount = extract_amount(parts[1])?;
    let comment = non_blank(parts[2..].join(", "));
    Some(ParsedExpense::new(parts[0], amount, comment))
}

/// First token is the category, second the amount, the rest the comment.
fn parse_leading_pair(utterance: &Utterance<'_>) -> Option<ParsedExpense> {
    let words = &utterance.words;
    if words.len() < 2 {
        return None;
    }

    let amount = extract_amount(&strip_currency_words(words[1]))?;
    let comment = non_blank(words[2..].join(" "));
    Some(ParsedExpense::new(words[0], amount, comment))
}

/// Find the first amount-like token anywhere; its neighbour is the category.
fn parse_amount_scan(utterance: &Utterance<'_>) -> Option<ParsedExpense> {
    let words = &utterance.words;
    if words.is_empty() {
        return None;
    }

    let (amount_index, amount) = match words
        .iter()
        .enumerate()
        .find_map(|(i, w)| probe_amount(w).map(|a| (i, a)))
    {
        Some(found) => found,
        None => {
            // Number split across tokens: take it from the whole phrase and
            // anchor on the first token with a digit.
            let amount = extract_amount(utterance.text)?;
            let index = words
                .iter()
                .position(|w| w.chars().any(|c| c.is_ascii_digit()))
                .unwrap_or(1);
            (index, amount)
        }
    };

    let category_index = if amount_index + 1 < words.len() && !is_amount_word(words[amount_index + 1]) {
        Some(amount_index + 1)
    } else if amount_index >= 1 && !is_amount_word(words[amount_index - 1]) {
        Some(amount_index - 1)
    } else {
        None
    };

    let category_token = category_index
        .map(|i| words[i])
        .unwrap_or(CanonicalCategory::Otros.as_str());

    let comment_words: Vec<&str> = words
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != amount_index && Some(*i) != category_index)
        .map(|(_, w)| *w)
        .collect();

    Some(ParsedExpense::new(
        category_token,
        amount,
        non_blank(comment_words.join(" ")),
    ))
}

/// Recover the user's literal category wording from a transcript.
///
/// With commas, the first segment is the label. Otherwise every token before
/// the first amount-like token is, or the first token when the amount leads
/// the phrase or there is none.
pub fn extract_original_category(transcript: &str) -> Option<String> {
    let clean = transcript.trim();
    if clean.is_empty() {
        return None;
    }

    if clean.contains(',') {
        return sanitize_original_label(clean.split(',').next());
    }

    let words: Vec<&str> = clean.split_whitespace().collect();
    let label = match words.iter().position(|w| is_amount_word(w)) {
        Some(index) if index > 0 => words[..index].join(" "),
        _ => words.first()?.to_string(),
    };

    sanitize_original_label(Some(&label))
}

/// Clean a spoken label: cut at the first digit, drop currency markers and
/// collapse whitespace. Case is kept as spoken.
pub fn sanitize_original_label(label: Option<&str>) -> Option<String> {
    let mut s = label?.trim();
    if let Some(idx) = s.find(|c: char| c.is_ascii_digit()) {
        s = &s[..idx];
    }

    let s = RE_SOL_DOT.replace_all(s, " ");
    let s = RE_SOLES.replace_all(&s, " ");
    let s = s.replace('$', " ");

    non_blank(s.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Amount from the token as-is, or with spoken currency words removed.
fn probe_amount(token: &str) -> Option<f64> {
    extract_amount(token).or_else(|| extract_amount(&strip_currency_words(token)))
}

fn is_amount_word(token: &str) -> bool {
    probe_amount(token).is_some()
}

fn strip_currency_words(token: &str) -> String {
    token.replace("soles", "").replace("s/", "").replace('$', "")
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
