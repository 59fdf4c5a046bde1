use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::speech::ParsedExpense;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub category: String,
    /// Category as the user typed or said it, e.g. "cena"
    pub original_category: Option<String>,
    pub amount: f64,
    pub comment: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(category: String, amount: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            category,
            original_category: None,
            amount,
            comment: None,
            date: now,
            created_at: now,
        }
    }

    pub fn from_parsed(parsed: ParsedExpense) -> Self {
        Self {
            original_category: parsed.original_category,
            comment: parsed.comment,
            ..Self::new(parsed.category, parsed.amount)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub emitter: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Income {
    pub fn new(emitter: String, amount: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            emitter,
            amount,
            date: now,
            created_at: now,
        }
    }
}
