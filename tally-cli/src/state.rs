use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::NormalizedTransaction;
use tally_finance::Statement;
use tracing::debug;

/// `$TALLY_HOME`, or `~/.tally`.
pub fn tally_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TALLY_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Local JSON store: one file per statement, plus the manual and imported
/// transaction lists.
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let statements = root.join("statements");
        fs::create_dir_all(&statements)
            .with_context(|| format!("create {}", statements.display()))?;
        Ok(Self { root })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(ensure_tally_home()?)
    }

    fn statements_dir(&self) -> PathBuf {
        self.root.join("statements")
    }

    fn manual_path(&self) -> PathBuf {
        self.root.join("manual.json")
    }

    fn imported_path(&self) -> PathBuf {
        self.root.join("imported.json")
    }

    pub fn save_statement(&self, statement: &Statement) -> Result<PathBuf> {
        let p = self.statements_dir().join(format!("{}.json", statement.id));
        write_json(&p, statement)?;
        debug!(path = %p.display(), "saved statement");
        Ok(p)
    }

    /// All stored statements, oldest upload first.
    pub fn load_statements(&self) -> Result<Vec<Statement>> {
        let dir = self.statements_dir();
        let mut out = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            let statement: Statement =
                serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
            out.push(statement);
        }
        out.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    pub fn manual(&self) -> Result<Vec<NormalizedTransaction>> {
        read_json(&self.manual_path())
    }

    pub fn imported(&self) -> Result<Vec<NormalizedTransaction>> {
        read_json(&self.imported_path())
    }

    pub fn append_manual(&self, txn: NormalizedTransaction) -> Result<()> {
        let mut all = self.manual()?;
        all.push(txn);
        write_json(&self.manual_path(), &all)
    }

    /// Drop the manual transaction with `id`. Returns false when there is none.
    pub fn remove_manual(&self, id: &str) -> Result<bool> {
        let mut all = self.manual()?;
        let before = all.len();
        all.retain(|t| t.id != id);
        if all.len() == before {
            return Ok(false);
        }
        write_json(&self.manual_path(), &all)?;
        debug!(id, "removed manual transaction");
        Ok(true)
    }

    pub fn append_imported(&self, txns: &[NormalizedTransaction]) -> Result<usize> {
        let mut all = self.imported()?;
        all.extend_from_slice(txns);
        write_json(&self.imported_path(), &all)?;
        Ok(all.len())
    }
}

pub fn statement_id(now: DateTime<Utc>) -> String {
    format!("stmt-{}", now.format("%Y%m%d%H%M%S%3f"))
}

pub fn manual_id(now: DateTime<Utc>) -> String {
    format!("tx-{}", now.timestamp_millis())
}
