//! Amount extraction from spoken fragments
//!
//! Finds a plausible monetary value in a piece of transcript. Handles the
//! currency markers people actually say or the recognizer emits ("s/.", "soles",
//! "$", "pen"), the "12 con 50" idiom, Peruvian/European thousands and decimal
//! separators, plain integers and a small vocabulary of spelled-out numbers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Spanish number words recognized when a fragment contains no digits at all.
pub const NUMBER_WORDS: &[(&str, u32)] = &[
    ("cero", 0),
    ("uno", 1),
    ("dos", 2),
    ("tres", 3),
    ("cuatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("siete", 7),
    ("ocho", 8),
    ("nueve", 9),
    ("diez", 10),
    ("once", 11),
    ("doce", 12),
    ("trece", 13),
    ("catorce", 14),
    ("quince", 15),
    ("dieciséis", 16),
    ("diecisiete", 17),
    ("dieciocho", 18),
    ("diecinueve", 19),
    ("veinte", 20),
    ("veintiuno", 21),
    ("veintidós", 22),
    ("veintitrés", 23),
    ("veinticuatro", 24),
    ("veinticinco", 25),
    ("treinta", 30),
    ("cuarenta", 40),
    ("cincuenta", 50),
    ("sesenta", 60),
    ("setenta", 70),
    ("ochenta", 80),
    ("noventa", 90),
    ("cien", 100),
    ("ciento", 100),
];

// Currency markers, applied in order. "s/." must go before "s/".
pub(crate) static RE_SOL_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)s\s*/\.?").unwrap());
static RE_SOL_SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)s\s*/").unwrap());
static RE_DOLLAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$").unwrap());
pub(crate) static RE_SOLES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)soles?").unwrap());
static RE_PEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pen").unwrap());

static RE_CON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s+con\s+([0-9]{1,2})").unwrap());

// `regex` has no lookaround, so the boundary characters are consumed and the
// number itself is read from group 1.
static RE_DECORATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|[^a-z0-9])([0-9]{1,3}(?:[.,][0-9]{3})*[.,][0-9]{1,2}|[0-9]+[.,][0-9]{1,2})(?:[^a-z0-9]|$)",
    )
    .unwrap()
});

static RE_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Extract the first plausible amount from a text fragment.
///
/// Stages are tried in order and the first one that matches wins:
/// "N con M", a separator-decorated number, a bare integer, and finally the sum
/// of any spelled-out number words. Returns `None` when nothing matches or the
/// value is not finite.
///
/// ```ignore
/// assert_eq!(extract_amount("s/ 12.50"), Some(12.5));
/// assert_eq!(extract_amount("1.234,56"), Some(1234.56));
/// ```
pub fn extract_amount(text: &str) -> Option<f64> {
    let normalized = strip_currency(&text.to_lowercase());

    if let Some(caps) = RE_CON.captures(&normalized) {
        let whole = caps[1].parse::<f64>().ok();
        let cents = caps[2].parse::<u32>().ok();
        if let (Some(whole), Some(cents)) = (whole, cents) {
            return finite(whole + f64::from(cents) / 100.0);
        }
    }

    if let Some(caps) = RE_DECORATED.captures(&normalized) {
        return parse_decorated(&caps[1]);
    }

    if let Some(m) = RE_INTEGER.find(&normalized) {
        return m.as_str().parse::<f64>().ok().and_then(finite);
    }

    sum_number_words(&normalized)
}

/// Replace every currency marker with a single space and trim the result.
pub(crate) fn strip_currency(text: &str) -> String {
    let s = RE_SOL_DOT.replace_all(text.trim(), " ");
    let s = RE_SOL_SLASH.replace_all(&s, " ");
    let s = RE_DOLLAR.replace_all(&s, " ");
    let s = RE_SOLES.replace_all(&s, " ");
    let s = RE_PEN.replace_all(&s, " ");
    s.trim().to_string()
}

/// Normalize separators: with both present `.` groups thousands and `,` is the
/// decimal mark; a lone `,` is a decimal mark.
fn parse_decorated(candidate: &str) -> Option<f64> {
    let cleaned = if candidate.contains('.') && candidate.contains(',') {
        candidate.replace('.', "").replace(',', ".")
    } else {
        candidate.replace(',', ".")
    };
    cleaned.parse::<f64>().ok().and_then(finite)
}

/// Sum every recognized number word. Additive on purpose so that split words
/// like "veinte y cinco" come out as 25; unrelated number words are summed too.
fn sum_number_words(text: &str) -> Option<f64> {
    let total: u32 = text
        .split_whitespace()
        .map(clean_word)
        .filter_map(|word| number_word_value(&word))
        .sum();

    if total > 0 {
        Some(f64::from(total))
    } else {
        None
    }
}

fn clean_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_lowercase() || "áéíóúñü".contains(*c))
        .collect()
}

fn number_word_value(word: &str) -> Option<u32> {
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, value)| *value)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
