//! Reporting aggregates over a user's transactions.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::transactions_model::{Transaction, TransactionType};
use crate::account_books::AccountBook;

const RATIO_SCALE: u32 = 4;

/// Income and expense totals of one account book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub account_book_id: String,
    pub account_book_name: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

/// Income and expense totals of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRatio {
    pub category: String,
    pub total: Decimal,
    /// Share of all expenses, between 0 and 1.
    pub ratio: Decimal,
}

#[derive(Default)]
struct Totals {
    income: Decimal,
    expense: Decimal,
}

impl Totals {
    fn add(&mut self, tx: &Transaction) {
        match tx.transaction_type {
            TransactionType::Income => self.income += tx.amount,
            TransactionType::Expense => self.expense += tx.amount,
        }
    }
}

/// Per-book totals ordered by book name. Books without transactions are
/// reported with zero totals.
pub fn book_summaries(books: &[AccountBook], transactions: &[Transaction]) -> Vec<BookSummary> {
    let mut totals: HashMap<&str, Totals> = HashMap::new();
    for tx in transactions {
        totals.entry(tx.account_book_id.as_str()).or_default().add(tx);
    }

    let mut summaries: Vec<BookSummary> = books
        .iter()
        .map(|book| {
            let t = totals.remove(book.id.as_str()).unwrap_or_default();
            BookSummary {
                account_book_id: book.id.clone(),
                account_book_name: book.name.clone(),
                total_income: t.income,
                total_expense: t.expense,
            }
        })
        .collect();
    summaries.sort_by(|a, b| {
        a.account_book_name
            .cmp(&b.account_book_name)
            .then_with(|| a.account_book_id.cmp(&b.account_book_id))
    });
    summaries
}

/// Per-month totals in ascending month order.
pub fn monthly_summaries(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<String, Totals> = BTreeMap::new();
    for tx in transactions {
        months
            .entry(tx.date.format("%Y-%m").to_string())
            .or_default()
            .add(tx);
    }
    months
        .into_iter()
        .map(|(month, t)| MonthlySummary {
            month,
            total_income: t.income,
            total_expense: t.expense,
        })
        .collect()
}

/// Expense totals per category, largest first (ties by category name).
pub fn expense_categories(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| tx.transaction_type == TransactionType::Expense)
    {
        *totals.entry(tx.category.as_str()).or_default() += tx.amount;
    }

    let mut categories: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    categories.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    categories
}

pub fn top_categories(transactions: &[Transaction], limit: usize) -> Vec<CategoryTotal> {
    let mut categories = expense_categories(transactions);
    categories.truncate(limit);
    categories
}

/// Every expense category with its share of total expenses.
pub fn category_ratios(transactions: &[Transaction]) -> Vec<CategoryRatio> {
    let categories = expense_categories(transactions);
    let grand_total: Decimal = categories.iter().map(|c| c.total).sum();

    categories
        .into_iter()
        .map(|c| {
            let ratio = c
                .total
                .checked_div(grand_total)
                .unwrap_or(Decimal::ZERO)
                .round_dp_with_strategy(RATIO_SCALE, RoundingStrategy::MidpointAwayFromZero);
            CategoryRatio {
                category: c.category,
                total: c.total,
                ratio,
            }
        })
        .collect()
}
