use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row returned by an Odoo RPC call. Field values keep their raw JSON
/// representation; many2one fields arrive as `[id, display_name]` pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn new(data: HashMap<String, serde_json::Value>) -> Self {
        Self { data }
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    pub fn f64_field(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(|v| v.as_f64())
    }

    pub fn i64_field(&self, key: &str) -> Option<i64> {
        self.data.get(key).and_then(|v| v.as_i64())
    }

    /// Decodes an Odoo many2one value (`[id, name]`, or `false` when unset).
    pub fn many2one(&self, key: &str) -> Option<(i64, String)> {
        let value = self.data.get(key)?.as_array()?;
        let id = value.first()?.as_i64()?;
        let name = value
            .get(1)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("#{}", id));
        Some((id, name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    Title,
    Section,
    Sub,
}

/// A flattened, print-ready piece of guide content. Interactive structure
/// (tabs, collapsed sections) has already been linearized by the time blocks
/// are produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintBlock {
    Heading { level: HeadingLevel, text: String },
    Paragraph(String),
    ListItem(String),
    PageBreak,
}

#[derive(Debug, Clone, Default)]
pub struct PrintDocument {
    pub title: String,
    pub blocks: Vec<PrintBlock>,
}

impl PrintDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: PrintBlock) {
        self.blocks.push(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of content blocks, page breaks excluded.
    pub fn content_blocks(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| !matches!(b, PrintBlock::PageBreak))
            .count()
    }
}

/// Result of a completed export run.
#[derive(Debug, Clone)]
pub struct ExportReceipt {
    pub output_path: String,
    pub pages: usize,
    pub bytes_written: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyAmount {
    pub period: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyAmount {
    pub week: String,
    pub week_num: u32,
    pub start_date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAmount {
    pub date: NaiveDate,
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalKind {
    Bank,
    /// Intercompany rekening-courant, receivable side (12* accounts).
    CurrentAccountClaim,
    /// Intercompany rekening-courant, payable side (14* accounts).
    CurrentAccountDebt,
}

impl JournalKind {
    pub fn is_current_account(&self) -> bool {
        !matches!(self, Self::Bank)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bank => "Bank",
            Self::CurrentAccountClaim => "Vordering",
            Self::CurrentAccountDebt => "Schuld",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalBalance {
    pub journal: String,
    pub company: String,
    pub account_code: String,
    pub balance: f64,
    pub kind: JournalKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerBalance {
    pub partner_id: i64,
    pub name: String,
    pub total: f64,
    pub open_items: usize,
}

/// Net VAT position for one month, built from the 15* accounts.
/// Positive `net` means VAT payable, negative means reclaimable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VatMonth {
    pub month: String,
    pub input_vat: f64,
    pub output_vat: f64,
    pub net: f64,
}

/// Key figures for the maandafsluiting export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseReport {
    pub period: String,
    pub entity: String,
    pub revenue: f64,
    pub costs: f64,
    pub result: f64,
    pub bank_total: f64,
    pub receivables_total: f64,
    pub payables_total: f64,
    pub vat_net: f64,
}

impl CloseReport {
    pub fn result_margin(&self) -> f64 {
        if self.revenue.abs() < f64::EPSILON {
            0.0
        } else {
            self.result / self.revenue
        }
    }
}
