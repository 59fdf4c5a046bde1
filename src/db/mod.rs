//! Expense storage
//!
//! `ExpenseStore` is the port the capture flow writes through; `SqliteStore`
//! is the on-device adapter.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;

use crate::models::{Expense, Income};

/// Storage port for expenses and incomes.
pub trait ExpenseStore {
    fn insert_expense(&mut self, expense: &Expense) -> Result<()>;

    fn update_expense(&mut self, expense: &Expense) -> Result<()>;

    fn delete_expense(&mut self, id: &str) -> Result<()>;

    fn insert_income(&mut self, income: &Income) -> Result<()>;

    /// All expenses, most recent first
    fn expenses(&self) -> Result<Vec<Expense>>;

    /// Expenses dated within `[start, end]`, most recent first
    fn expenses_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Expense>>;

    /// All incomes, most recent first
    fn incomes(&self) -> Result<Vec<Income>>;

    /// Total income minus total spending
    fn remaining(&self) -> Result<f64>;

    fn clear_all(&mut self) -> Result<()>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                id TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                original_category TEXT,
                amount REAL NOT NULL,
                comment TEXT,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS incomes (
                id TEXT PRIMARY KEY,
                emitter TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
            "#,
        )?;

        run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

/// Bring tables created by older builds up to date
fn run_migrations(conn: &Connection) -> Result<()> {
    fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
        let sql = format!("PRAGMA table_info({})", table);
        if let Ok(mut stmt) = conn.prepare(&sql) {
            if let Ok(rows) = stmt.query_map([], |row| row.get::<_, String>(1)) {
                for name in rows.flatten() {
                    if name == column {
                        return true;
                    }
                }
            }
        }
        false
    }

    // Spoken label kept next to the canonical category
    if !column_exists(conn, "expenses", "original_category") {
        conn.execute("ALTER TABLE expenses ADD COLUMN original_category TEXT", [])?;
        log::info!("Migration: Added original_category column to expenses");
    }

    Ok(())
}

const EXPENSE_COLUMNS: &str = "id, category, original_category, amount, comment, date, created_at";

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        category: row.get(1)?,
        original_category: row.get(2)?,
        amount: row.get(3)?,
        comment: row.get(4)?,
        date: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl ExpenseStore for SqliteStore {
    fn insert_expense(&mut self, expense: &Expense) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO expenses ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                EXPENSE_COLUMNS
            ),
            params![
                expense.id,
                expense.category,
                expense.original_category,
                expense.amount,
                expense.comment,
                expense.date,
                expense.created_at,
            ],
        )?;
        log::debug!("Expense saved: {} - {:.2}", expense.category, expense.amount);
        Ok(())
    }

    fn update_expense(&mut self, expense: &Expense) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE expenses SET category = ?2, original_category = ?3, amount = ?4, comment = ?5, date = ?6
             WHERE id = ?1",
            params![
                expense.id,
                expense.category,
                expense.original_category,
                expense.amount,
                expense.comment,
                expense.date,
            ],
        )?;
        if changed == 0 {
            return Err(anyhow!("Expense {} not found", expense.id));
        }
        Ok(())
    }

    fn delete_expense(&mut self, id: &str) -> Result<()> {
        self.conn.execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn insert_income(&mut self, income: &Income) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO incomes (id, emitter, amount, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![income.id, income.emitter, income.amount, income.date, income.created_at],
        )?;
        log::debug!("Income saved: {} - {:.2}", income.emitter, income.amount);
        Ok(())
    }

    fn expenses(&self) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM expenses ORDER BY date DESC, created_at DESC",
            EXPENSE_COLUMNS
        ))?;
        let rows = stmt.query_map([], expense_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn expenses_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE date BETWEEN ?1 AND ?2 ORDER BY date DESC",
            EXPENSE_COLUMNS
        ))?;
        let rows = stmt.query_map(params![start, end], expense_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn incomes(&self) -> Result<Vec<Income>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, emitter, amount, date, created_at FROM incomes
             ORDER BY date DESC, created_at DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Income {
                id: row.get(0)?,
                emitter: row.get(1)?,
                amount: row.get(2)?,
                date: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn remaining(&self) -> Result<f64> {
        let income: f64 =
            self.conn
                .query_row("SELECT COALESCE(SUM(amount), 0) FROM incomes", [], |row| row.get(0))?;
        let spent: f64 =
            self.conn
                .query_row("SELECT COALESCE(SUM(amount), 0) FROM expenses", [], |row| row.get(0))?;
        Ok(income - spent)
    }

    fn clear_all(&mut self) -> Result<()> {
        self.conn.execute_batch("DELETE FROM expenses; DELETE FROM incomes;")?;
        log::info!("All expenses and incomes cleared");
        Ok(())
    }
}
