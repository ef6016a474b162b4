//! Maandafsluiting: declaration periods, access gate and report export.
//!
//! The close view is password protected. A missing password means the view
//! is locked but the rest of the dashboard keeps working; a wrong password
//! is a distinct outcome so the caller can phrase the message accordingly.

use crate::config::dashboard_config::CloseSection;
use crate::domain::model::CloseReport;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{Datelike, NaiveDate};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const CLOSE_PASSWORD_ENV: &str = "FINANCIAL_CLOSE_PASSWORD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFrequency {
    Monthly,
    Quarterly,
}

/// One BTW declaration period: a calendar month or a quarter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationPeriod {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DeclarationPeriod {
    /// The declaration period containing the given month.
    pub fn for_month(year: i32, month: u32, frequency: DeclarationFrequency) -> Option<Self> {
        match frequency {
            DeclarationFrequency::Monthly => {
                let start = NaiveDate::from_ymd_opt(year, month, 1)?;
                Some(Self {
                    label: format!("{}-{:02}", year, month),
                    start,
                    end: last_day_of_month(year, month)?,
                })
            }
            DeclarationFrequency::Quarterly => {
                let quarter = (month - 1) / 3 + 1;
                let first_month = (quarter - 1) * 3 + 1;
                let start = NaiveDate::from_ymd_opt(year, first_month, 1)?;
                Some(Self {
                    label: format!("Q{} {}", quarter, year),
                    start,
                    end: last_day_of_month(year, first_month + 2)?,
                })
            }
        }
    }

    /// The period directly before this one, for the comparison column.
    pub fn previous(&self, frequency: DeclarationFrequency) -> Option<Self> {
        let before = self.start.pred_opt()?;
        Self::for_month(before.year(), before.month(), frequency)
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAccess {
    Granted,
    /// No password configured anywhere; the view degrades gracefully.
    NotConfigured,
    Denied,
}

/// Resolves the close password: config first, environment fallback.
pub fn close_password(section: &CloseSection) -> Option<String> {
    section
        .password
        .clone()
        .filter(|pw| !pw.is_empty())
        .or_else(|| std::env::var(CLOSE_PASSWORD_ENV).ok().filter(|pw| !pw.is_empty()))
}

pub fn verify_close_password(configured: Option<&str>, input: &str) -> CloseAccess {
    match configured {
        None => CloseAccess::NotConfigured,
        Some(expected) if expected.is_empty() => CloseAccess::NotConfigured,
        Some(expected) if expected == input => CloseAccess::Granted,
        Some(_) => CloseAccess::Denied,
    }
}

/// Dutch euro formatting: `€1.234,56`.
pub fn format_eur(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!(
        "{}€{},{:02}",
        if negative { "-" } else { "" },
        grouped,
        fraction
    )
}

/// Plain-text rendering of the close report, for the TXT attachment.
pub fn render_close_text(report: &CloseReport) -> String {
    let mut out = String::new();
    out.push_str("MAANDAFSLUITING LAB GROEP\n");
    out.push_str("=========================\n");
    out.push_str(&format!("Periode:    {}\n", report.period));
    out.push_str(&format!("Entiteit:   {}\n\n", report.entity));
    out.push_str(&format!("Omzet:      {}\n", format_eur(report.revenue)));
    out.push_str(&format!("Kosten:     {}\n", format_eur(report.costs)));
    out.push_str(&format!("Resultaat:  {}\n", format_eur(report.result)));
    out.push_str(&format!("Marge:      {:.1}%\n\n", report.result_margin() * 100.0));
    out.push_str(&format!("Banksaldo:  {}\n", format_eur(report.bank_total)));
    out.push_str(&format!(
        "Debiteuren: {}\n",
        format_eur(report.receivables_total)
    ));
    out.push_str(&format!(
        "Crediteuren: {}\n",
        format_eur(report.payables_total)
    ));
    out.push_str(&format!("BTW netto:  {}\n", format_eur(report.vat_net)));
    out
}

/// Builds the export bundle: report.json, report.csv and report.txt in one
/// ZIP archive.
pub fn build_close_bundle(report: &CloseReport) -> Result<Vec<u8>> {
    let zip_data = {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file::<_, ()>("report.json", FileOptions::default())?;
        let json_data = serde_json::to_string_pretty(report)?;
        zip.write_all(json_data.as_bytes())?;

        zip.start_file::<_, ()>("report.csv", FileOptions::default())?;
        let csv_data = render_close_csv(report)?;
        zip.write_all(&csv_data)?;

        zip.start_file::<_, ()>("report.txt", FileOptions::default())?;
        zip.write_all(render_close_text(report).as_bytes())?;

        let cursor = zip.finish()?;
        cursor.into_inner()
    };
    Ok(zip_data)
}

fn render_close_csv(report: &CloseReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "periode",
        "entiteit",
        "omzet",
        "kosten",
        "resultaat",
        "banksaldo",
        "debiteuren",
        "crediteuren",
        "btw_netto",
    ])?;
    writer.write_record([
        report.period.clone(),
        report.entity.clone(),
        report.revenue.to_string(),
        report.costs.to_string(),
        report.result.to_string(),
        report.bank_total.to_string(),
        report.receivables_total.to_string(),
        report.payables_total.to_string(),
        report.vat_net.to_string(),
    ])?;
    writer
        .into_inner()
        .map_err(|e| crate::utils::error::ReportError::render(e.to_string()))
}

/// Writes the bundle through the storage port and returns the stored name.
pub async fn export_close_bundle<S: Storage>(
    storage: &S,
    report: &CloseReport,
    filename: &str,
) -> Result<String> {
    let bundle = build_close_bundle(report)?;
    tracing::debug!("Writing close bundle ({} bytes) to storage", bundle.len());
    storage.write_file(filename, &bundle).await?;
    Ok(filename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> CloseReport {
        CloseReport {
            period: "2026-01".to_string(),
            entity: "LAB Shops".to_string(),
            revenue: 125_430.55,
            costs: 98_210.10,
            result: 27_220.45,
            bank_total: 40_000.0,
            receivables_total: 15_500.0,
            payables_total: 9_300.0,
            vat_net: 4_210.99,
        }
    }

    #[test]
    fn monthly_period_covers_the_calendar_month() {
        let period =
            DeclarationPeriod::for_month(2026, 2, DeclarationFrequency::Monthly).unwrap();
        assert_eq!(period.label, "2026-02");
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }

    #[test]
    fn quarterly_period_snaps_to_the_quarter() {
        let period =
            DeclarationPeriod::for_month(2026, 8, DeclarationFrequency::Quarterly).unwrap();
        assert_eq!(period.label, "Q3 2026");
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2026, 9, 30).unwrap());
    }

    #[test]
    fn previous_period_crosses_year_boundaries() {
        let january =
            DeclarationPeriod::for_month(2026, 1, DeclarationFrequency::Monthly).unwrap();
        let before = january.previous(DeclarationFrequency::Monthly).unwrap();
        assert_eq!(before.label, "2025-12");

        let q1 = DeclarationPeriod::for_month(2026, 2, DeclarationFrequency::Quarterly).unwrap();
        let before_q1 = q1.previous(DeclarationFrequency::Quarterly).unwrap();
        assert_eq!(before_q1.label, "Q4 2025");
    }

    #[test]
    fn password_gate_distinguishes_unconfigured_from_wrong() {
        assert_eq!(
            verify_close_password(None, "geheim"),
            CloseAccess::NotConfigured
        );
        assert_eq!(
            verify_close_password(Some(""), "geheim"),
            CloseAccess::NotConfigured
        );
        assert_eq!(
            verify_close_password(Some("geheim"), "geheim"),
            CloseAccess::Granted
        );
        assert_eq!(
            verify_close_password(Some("geheim"), "fout"),
            CloseAccess::Denied
        );
    }

    #[test]
    fn close_password_prefers_config_over_environment() {
        std::env::set_var(CLOSE_PASSWORD_ENV, "uit-env");

        let from_config = CloseSection {
            password: Some("uit-config".to_string()),
        };
        assert_eq!(close_password(&from_config).as_deref(), Some("uit-config"));

        let empty = CloseSection { password: None };
        assert_eq!(close_password(&empty).as_deref(), Some("uit-env"));

        std::env::remove_var(CLOSE_PASSWORD_ENV);
        assert_eq!(close_password(&empty), None);
    }

    #[test]
    fn euro_formatting_uses_dutch_separators() {
        assert_eq!(format_eur(1234.56), "€1.234,56");
        assert_eq!(format_eur(0.5), "€0,50");
        assert_eq!(format_eur(-300.0), "-€300,00");
        assert_eq!(format_eur(1_000_000.0), "€1.000.000,00");
    }

    #[test]
    fn text_report_lists_the_key_figures() {
        let text = render_close_text(&sample_report());
        assert!(text.contains("Periode:    2026-01"));
        assert!(text.contains("Omzet:      €125.430,55"));
        assert!(text.contains("Resultaat:  €27.220,45"));
    }

    #[test]
    fn bundle_contains_all_three_attachments() {
        let bundle = build_close_bundle(&sample_report()).unwrap();
        let cursor = std::io::Cursor::new(bundle);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();

        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["report.csv", "report.json", "report.txt"]);

        let parsed: CloseReport = {
            let json_file = archive.by_name("report.json").unwrap();
            serde_json::from_reader(json_file).unwrap()
        };
        assert_eq!(parsed.period, "2026-01");
        assert_eq!(parsed.revenue, 125_430.55);
    }
}
