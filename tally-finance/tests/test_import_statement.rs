use chrono::{TimeZone, Utc};
use std::path::PathBuf;
use tally_core::TxnType;
use tally_finance::{
    ImportPolicy, ManualEntry, SkipReason, SortDirection, SortKey, Statement, StatementLimits,
    combine, import_statement, paginate, sort_transactions, summarize_month,
};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("statement.csv")
}

fn load() -> Statement {
    let uploaded_at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
    Statement::read("stmt-20240115", fixture_path(), b',', StatementLimits::default(), uploaded_at)
        .expect("should read fixture statement")
}

#[test]
fn test_snapshot_from_fixture() {
    let s = load();
    assert_eq!(s.file_name, "statement.csv");
    assert_eq!(s.row_count, 7);
    assert_eq!(s.headers[0], "Txn_Date");
    assert_eq!(s.transactions().count(), 7);
}

#[test]
fn test_import_fixture() {
    let s = load();
    let out = import_statement(&s, ImportPolicy::default());

    assert_eq!(out.accepted.len(), 5);
    assert_eq!(
        out.skipped.iter().map(|r| (r.row_index, r.reason)).collect::<Vec<_>>(),
        vec![(4, SkipReason::MissingDate), (5, SkipReason::ZeroAmount)]
    );

    let salary = &out.accepted[0];
    assert_eq!(salary.id, "stmt-20240115_0");
    assert_eq!(salary.txn_type, TxnType::Income);
    assert_eq!(salary.amount, 50000.0);
    assert_eq!(salary.description, "Opening salary credit");
    assert_eq!(salary.category, "Other");

    let rent = &out.accepted[1];
    assert_eq!(rent.txn_type, TxnType::Expense);
    assert_eq!(rent.amount, 12000.0);
    assert_eq!(rent.description, "Rent, January");

    let groceries = &out.accepted[2];
    assert_eq!(groceries.amount, 1250.75);
}

#[test]
fn test_reimport_is_not_deduplicated() {
    let first = load();
    let mut second = load();
    second.id = "stmt-20240116".to_string();

    let a = import_statement(&first, ImportPolicy::default());
    let b = import_statement(&second, ImportPolicy::default());

    let all = combine(a.accepted, b.accepted);
    assert_eq!(all.len(), 10);
}

#[test]
fn test_ledger_and_summary_over_imported_rows() {
    let s = load();
    let out = import_statement(&s, ImportPolicy::default());

    let manual = ManualEntry {
        date: Some("2024-01-12".to_string()),
        category: Some("Food".to_string()),
        amount: Some("450".to_string()),
        description: Some("Dinner".to_string()),
        ..Default::default()
    };
    manual.validate().unwrap();
    let manual = vec![manual.into_transaction("tx-1")];

    let mut all = combine(manual, out.accepted);
    assert_eq!(all[0].id, "tx-1");
    assert_eq!(all[1].description, "Electricity bill");

    let summary = summarize_month(&all, 2024, 1).with_budget(20000.0);
    assert_eq!(summary.income, 50320.0);
    assert_eq!(summary.expenses, 12000.0 + 1250.75 + 2100.0 + 450.0);
    assert_eq!(summary.by_category["Food"], 450.0);
    assert_eq!(summary.budget_remaining, Some(20000.0 - summary.expenses));

    sort_transactions(&mut all, SortKey::Amount, SortDirection::Desc);
    let page = paginate(&all, 0, 2);
    assert_eq!(page.pages, 3);
    assert_eq!(page.items[0].amount, 50000.0);
    assert_eq!(page.items[1].amount, 12000.0);
}
