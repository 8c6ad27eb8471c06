//! Income/expense totals over a set of transactions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_core::{NormalizedTransaction, TxnType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    /// Expense totals keyed by category
    pub by_category: BTreeMap<String, f64>,
    pub count: usize,
    pub budget_remaining: Option<f64>,
    /// One entry per configured category limit, in category order
    #[serde(default)]
    pub category_budgets: Vec<CategoryBudget>,
}

/// Spending against one category's limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
}

impl CategoryBudget {
    pub fn exceeded(&self) -> bool {
        self.spent > self.limit
    }
}

impl Summary {
    pub fn with_budget(mut self, monthly: f64) -> Self {
        self.budget_remaining = Some(monthly - self.expenses);
        self
    }

    /// Compare expense totals against per-category limits. Categories with a
    /// limit but no spending show up with `spent == 0`.
    pub fn with_category_limits(mut self, limits: &BTreeMap<String, f64>) -> Self {
        self.category_budgets = limits
            .iter()
            .map(|(category, &limit)| {
                let spent = self.by_category.get(category).copied().unwrap_or(0.0);
                CategoryBudget {
                    category: category.clone(),
                    limit,
                    spent,
                    remaining: limit - spent,
                }
            })
            .collect();
        self
    }

    pub fn exceeded_categories(&self) -> impl Iterator<Item = &CategoryBudget> {
        self.category_budgets.iter().filter(|b| b.exceeded())
    }

    /// Share of income left after expenses, as a whole percentage.
    pub fn savings_rate(&self) -> Option<i64> {
        (self.income > 0.0).then(|| ((self.net / self.income) * 100.0).round() as i64)
    }

    pub fn top_category(&self) -> Option<(&str, f64)> {
        self.by_category
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(c, v)| (c.as_str(), *v))
    }
}

/// Amounts are summed by magnitude, so statements that sign debits negative
/// and ones that don't give the same totals. Types other than income and
/// expense only add to `count`.
pub fn summarize<'a, I>(txns: I) -> Summary
where
    I: IntoIterator<Item = &'a NormalizedTransaction>,
{
    let mut s = Summary::default();
    for t in txns {
        s.count += 1;
        match t.txn_type {
            TxnType::Income => s.income += t.amount.abs(),
            TxnType::Expense => {
                s.expenses += t.amount.abs();
                *s.by_category.entry(t.category.clone()).or_insert(0.0) += t.amount.abs();
            }
            TxnType::Other(_) => {}
        }
    }
    s.net = s.income - s.expenses;
    s
}

/// Summary restricted to `YYYY-MM-DD` dates within one calendar month.
pub fn summarize_month(txns: &[NormalizedTransaction], year: i32, month: u32) -> Summary {
    summarize(txns.iter().filter(|t| t.in_month(year, month)))
}
