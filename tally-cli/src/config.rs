use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tally_finance::{ImportPolicy, StatementLimits};

use crate::state::ensure_tally_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub import: ImportSection,
    pub ledger: LedgerSection,
    pub budget: BudgetSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSection {
    /// Rows imported per statement
    pub max_rows: usize,
    /// Rows kept for previews
    pub sample_rows: usize,
    /// Rows kept in the stored snapshot
    pub max_persist_rows: usize,
    /// Single-character field delimiter; `\t` for tab
    pub delimiter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    pub page_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSection {
    /// Monthly spending limit; summaries show what is left of it
    pub monthly: Option<f64>,
    /// Per-category spending limits, `[budget.categories]`
    pub categories: BTreeMap<String, f64>,
}

impl Default for ImportSection {
    fn default() -> Self {
        let limits = StatementLimits::default();
        Self {
            max_rows: ImportPolicy::default().max_rows,
            sample_rows: limits.sample_rows,
            max_persist_rows: limits.max_persist_rows,
            delimiter: ",".to_string(),
        }
    }
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

impl ImportSection {
    pub fn policy(&self) -> ImportPolicy {
        ImportPolicy {
            max_rows: self.max_rows,
        }
    }

    pub fn limits(&self) -> StatementLimits {
        StatementLimits {
            sample_rows: self.sample_rows,
            max_persist_rows: self.max_persist_rows,
        }
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_str() {
            "\\t" | "\t" => Ok(b'\t'),
            d if d.len() == 1 => Ok(d.as_bytes()[0]),
            d => bail!("import.delimiter must be a single ASCII character, got {:?}", d),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

impl Config {
    /// One line per section with the values a command will actually use.
    pub fn describe(&self) -> Vec<String> {
        let i = &self.import;
        let mut lines = vec![
            format!(
                "[import] max_rows={} sample_rows={} max_persist_rows={} delimiter={:?}",
                i.max_rows, i.sample_rows, i.max_persist_rows, i.delimiter
            ),
            format!("[ledger] page_size={}", self.ledger.page_size),
        ];
        lines.push(match self.budget.monthly {
            Some(m) => format!("[budget] monthly={m:.2}"),
            None => "[budget] monthly=unset".to_string(),
        });
        if self.budget.categories.is_empty() {
            lines.push("[budget.categories] none".to_string());
        } else {
            let limits: Vec<String> = self
                .budget
                .categories
                .iter()
                .map(|(c, l)| format!("{c}={l:.2}"))
                .collect();
            lines.push(format!("[budget.categories] {}", limits.join(" ")));
        }
        lines
    }
}

pub fn write_config(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))
}

/// Write defaults to `p` unless a file is already there. Returns whether it wrote.
pub fn init_config_at(p: &Path) -> Result<bool> {
    if p.exists() {
        return Ok(false);
    }
    write_config(p, &Config::default())?;
    Ok(true)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if init_config_at(&p)? {
        println!("Wrote {}", p.display());
    } else {
        println!("Config already exists: {}", p.display());
    }
    for line in load_config_from(&p)?.describe() {
        println!("  {line}");
    }
    Ok(())
}
