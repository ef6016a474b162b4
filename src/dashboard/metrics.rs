//! Aggregated accounting metrics for the dashboard.
//!
//! Everything that can be aggregated server-side goes through `read_group`
//! so no record limits apply; only the open-items views (receivables and
//! payables per partner) read rows. Results are cached with the TTLs from
//! the dashboard configuration.
//!
//! Account code conventions of the LAB administrations:
//! 15* VAT, 4*/6*/7* costs, 8* revenue, bank journals on 11*, intercompany
//! rekening-courant on 12* (claims) and 14* (debts).

use crate::dashboard::cache::TtlCache;
use crate::dashboard::odoo::{CallOptions, OdooClient};
use crate::domain::model::{
    DailyAmount, JournalBalance, JournalKind, MonthlyAmount, PartnerBalance, Record, VatMonth,
    WeeklyAmount,
};
use crate::utils::error::Result;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

pub const COMPANIES: &[(i64, &str)] = &[
    (1, "LAB Conceptstore"),
    (2, "LAB Shops"),
    (3, "LAB Projects"),
];

/// Partner ids of the group companies, filtered out of external views.
pub const INTERCOMPANY_PARTNERS: &[i64] = &[1, 7, 8];

pub fn company_name(id: i64) -> Option<&'static str> {
    COMPANIES
        .iter()
        .find(|(company_id, _)| *company_id == id)
        .map(|(_, name)| *name)
}

pub struct MetricsService {
    client: OdooClient,
    monthly_cache: TtlCache<String, Vec<MonthlyAmount>>,
    balances_cache: TtlCache<String, Vec<JournalBalance>>,
}

impl MetricsService {
    pub fn new(client: OdooClient, metrics_ttl: Duration, balances_ttl: Duration) -> Self {
        Self {
            client,
            monthly_cache: TtlCache::new(metrics_ttl),
            balances_cache: TtlCache::new(balances_ttl),
        }
    }

    /// Monthly turnover from the 8* accounts. Odoo books revenue as credit,
    /// so the summed balance is negated into a positive amount.
    pub async fn monthly_revenue(
        &self,
        year: i32,
        company_id: Option<i64>,
    ) -> Result<Vec<MonthlyAmount>> {
        let key = format!("omzet:{}:{:?}", year, company_id);
        if let Some(cached) = self.monthly_cache.get(&key) {
            return Ok(cached);
        }

        let domain = account_range_domain(year, 800_000, 900_000, company_id, IcFilter::All);
        let rows = self.grouped_balances(domain).await?;
        let result = merge_monthly(vec![rows], true);
        self.monthly_cache.insert(key, result.clone());
        Ok(result)
    }

    /// Monthly costs from the 4*, 6* and 7* account ranges, merged per
    /// month.
    pub async fn monthly_costs(
        &self,
        year: i32,
        company_id: Option<i64>,
    ) -> Result<Vec<MonthlyAmount>> {
        let key = format!("kosten:{}:{:?}", year, company_id);
        if let Some(cached) = self.monthly_cache.get(&key) {
            return Ok(cached);
        }

        let mut ranges = Vec::new();
        for (lo, hi) in COST_RANGES {
            let domain = account_range_domain(year, *lo, *hi, company_id, IcFilter::All);
            ranges.push(self.grouped_balances(domain).await?);
        }
        let result = merge_monthly(ranges, false);
        self.monthly_cache.insert(key, result.clone());
        Ok(result)
    }

    /// Intercompany-only slice of the monthly turnover, for IC-excluded
    /// views.
    pub async fn intercompany_revenue(
        &self,
        year: i32,
        company_id: Option<i64>,
    ) -> Result<Vec<MonthlyAmount>> {
        let key = format!("omzet-ic:{}:{:?}", year, company_id);
        if let Some(cached) = self.monthly_cache.get(&key) {
            return Ok(cached);
        }

        let domain =
            account_range_domain(year, 800_000, 900_000, company_id, IcFilter::IntercompanyOnly);
        let rows = self.grouped_balances(domain).await?;
        let result = merge_monthly(vec![rows], true);
        self.monthly_cache.insert(key, result.clone());
        Ok(result)
    }

    /// Intercompany-only slice of the monthly costs.
    pub async fn intercompany_costs(
        &self,
        year: i32,
        company_id: Option<i64>,
    ) -> Result<Vec<MonthlyAmount>> {
        let key = format!("kosten-ic:{}:{:?}", year, company_id);
        if let Some(cached) = self.monthly_cache.get(&key) {
            return Ok(cached);
        }

        let mut ranges = Vec::new();
        for (lo, hi) in COST_RANGES {
            let domain =
                account_range_domain(year, *lo, *hi, company_id, IcFilter::IntercompanyOnly);
            ranges.push(self.grouped_balances(domain).await?);
        }
        let result = merge_monthly(ranges, false);
        self.monthly_cache.insert(key, result.clone());
        Ok(result)
    }

    /// Weekly turnover, grouped server-side per ISO week.
    pub async fn weekly_revenue(
        &self,
        year: i32,
        company_id: Option<i64>,
        exclude_intercompany: bool,
    ) -> Result<Vec<WeeklyAmount>> {
        let filter = if exclude_intercompany {
            IcFilter::ExcludeIntercompany
        } else {
            IcFilter::All
        };
        let domain = account_range_domain(year, 800_000, 900_000, company_id, filter);
        let rows = self
            .client
            .read_group(
                "account.move.line",
                domain,
                &["balance:sum"],
                &["date:week"],
            )
            .await?;

        let mut weekly: Vec<WeeklyAmount> = rows
            .iter()
            .filter_map(|row| {
                let label = row.str_field("date:week")?;
                let amount = -row.f64_field("balance").unwrap_or(0.0);
                if amount == 0.0 {
                    return None;
                }
                let (week_num, week_year) = parse_week_label(label)?;
                let start_date = week_start(week_year, week_num)?;
                Some(WeeklyAmount {
                    week: label.to_string(),
                    week_num,
                    start_date,
                    amount,
                })
            })
            .collect();
        weekly.sort_by_key(|w| w.start_date);
        Ok(weekly)
    }

    /// Daily turnover, grouped server-side per day.
    pub async fn daily_revenue(
        &self,
        year: i32,
        company_id: Option<i64>,
        exclude_intercompany: bool,
    ) -> Result<Vec<DailyAmount>> {
        let filter = if exclude_intercompany {
            IcFilter::ExcludeIntercompany
        } else {
            IcFilter::All
        };
        let domain = account_range_domain(year, 800_000, 900_000, company_id, filter);
        let rows = self
            .client
            .read_group(
                "account.move.line",
                domain,
                &["balance:sum"],
                &["date:day"],
            )
            .await?;

        let mut daily: Vec<DailyAmount> = rows
            .iter()
            .filter_map(|row| {
                let label = row.str_field("date:day")?;
                let amount = -row.f64_field("balance").unwrap_or(0.0);
                if amount == 0.0 {
                    return None;
                }
                let date = parse_day_label(label)?;
                Some(DailyAmount {
                    date,
                    label: label.to_string(),
                    amount,
                })
            })
            .collect();
        daily.sort_by_key(|d| d.date);
        Ok(daily)
    }

    /// Current balances of every bank-type journal, classified into real
    /// bank accounts and intercompany rekening-courant accounts.
    pub async fn journal_balances(&self) -> Result<Vec<JournalBalance>> {
        let key = "journals".to_string();
        if let Some(cached) = self.balances_cache.get(&key) {
            return Ok(cached);
        }

        let journals = self
            .client
            .search_read(
                "account.journal",
                json!([["type", "=", "bank"]]),
                &[
                    "name",
                    "company_id",
                    "default_account_id",
                    "current_statement_balance",
                    "code",
                ],
                CallOptions::default(),
            )
            .await?;

        let account_ids: Vec<i64> = journals
            .iter()
            .filter_map(|j| j.many2one("default_account_id").map(|(id, _)| id))
            .collect();

        let mut account_codes: HashMap<i64, String> = HashMap::new();
        if !account_ids.is_empty() {
            let accounts = self
                .client
                .search_read(
                    "account.account",
                    json!([["id", "in", account_ids]]),
                    &["id", "code", "name"],
                    CallOptions::default(),
                )
                .await?;
            for account in &accounts {
                if let (Some(id), Some(code)) =
                    (account.i64_field("id"), account.str_field("code"))
                {
                    account_codes.insert(id, code.to_string());
                }
            }
        }

        let balances: Vec<JournalBalance> = journals
            .iter()
            .map(|journal| {
                let name = journal.str_field("name").unwrap_or("").to_string();
                let company = journal
                    .many2one("company_id")
                    .map(|(_, company)| company)
                    .unwrap_or_default();
                let account_code = journal
                    .many2one("default_account_id")
                    .and_then(|(id, _)| account_codes.get(&id).cloned())
                    .unwrap_or_default();
                let kind = classify_journal(&name, &account_code);
                JournalBalance {
                    journal: name,
                    company,
                    account_code,
                    balance: journal.f64_field("current_statement_balance").unwrap_or(0.0),
                    kind,
                }
            })
            .collect();

        self.balances_cache.insert(key, balances.clone());
        Ok(balances)
    }

    pub async fn bank_balances(&self) -> Result<Vec<JournalBalance>> {
        Ok(self
            .journal_balances()
            .await?
            .into_iter()
            .filter(|b| !b.kind.is_current_account())
            .collect())
    }

    /// Rekening-courant balances between the group companies.
    pub async fn current_account_balances(&self) -> Result<Vec<JournalBalance>> {
        Ok(self
            .journal_balances()
            .await?
            .into_iter()
            .filter(|b| b.kind.is_current_account())
            .collect())
    }

    /// Open receivables per partner, largest first.
    pub async fn receivables_by_partner(
        &self,
        company_id: Option<i64>,
    ) -> Result<Vec<PartnerBalance>> {
        self.open_items_by_partner("asset_receivable", company_id, false)
            .await
    }

    /// Open payables per partner, largest first. Amounts are reported as
    /// positive obligations.
    pub async fn payables_by_partner(
        &self,
        company_id: Option<i64>,
    ) -> Result<Vec<PartnerBalance>> {
        self.open_items_by_partner("liability_payable", company_id, true)
            .await
    }

    async fn open_items_by_partner(
        &self,
        account_type: &str,
        company_id: Option<i64>,
        absolute: bool,
    ) -> Result<Vec<PartnerBalance>> {
        let mut domain = vec![
            json!(["account_id.account_type", "=", account_type]),
            json!(["parent_state", "=", "posted"]),
            json!(["amount_residual", "!=", 0]),
        ];
        if let Some(company) = company_id {
            domain.push(json!(["company_id", "=", company]));
        }

        let rows = self
            .client
            .search_read(
                "account.move.line",
                Value::Array(domain),
                &["company_id", "amount_residual", "partner_id"],
                CallOptions::with_limit(5000).archived(),
            )
            .await?;

        let mut per_partner: HashMap<i64, PartnerBalance> = HashMap::new();
        for row in &rows {
            let Some((partner_id, name)) = row.many2one("partner_id") else {
                continue;
            };
            let mut amount = row.f64_field("amount_residual").unwrap_or(0.0);
            if absolute {
                amount = amount.abs();
            }
            let entry = per_partner
                .entry(partner_id)
                .or_insert_with(|| PartnerBalance {
                    partner_id,
                    name,
                    total: 0.0,
                    open_items: 0,
                });
            entry.total += amount;
            entry.open_items += 1;
        }

        let mut balances: Vec<PartnerBalance> = per_partner.into_values().collect();
        balances.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(balances)
    }

    /// Monthly VAT position from the 15* accounts over a date range.
    pub async fn vat_months(
        &self,
        company_id: Option<i64>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<VatMonth>> {
        let mut domain = vec![
            json!(["date", ">=", from.format("%Y-%m-%d").to_string()]),
            json!(["date", "<=", to.format("%Y-%m-%d").to_string()]),
            json!(["parent_state", "=", "posted"]),
            json!(["account_id.code", "like", "15%"]),
        ];
        if let Some(company) = company_id {
            domain.push(json!(["company_id", "=", company]));
        }

        let rows = self
            .client
            .read_group(
                "account.move.line",
                Value::Array(domain),
                &["debit:sum", "credit:sum"],
                &["date:month"],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let input_vat = row.f64_field("debit").unwrap_or(0.0);
                let output_vat = row.f64_field("credit").unwrap_or(0.0);
                VatMonth {
                    month: row.str_field("date:month").unwrap_or("Onbekend").to_string(),
                    input_vat,
                    output_vat,
                    net: output_vat - input_vat,
                }
            })
            .collect())
    }

    async fn grouped_balances(&self, domain: Value) -> Result<Vec<Record>> {
        self.client
            .read_group(
                "account.move.line",
                domain,
                &["balance:sum"],
                &["date:month"],
            )
            .await
    }
}

const COST_RANGES: &[(i64, i64)] = &[(400_000, 500_000), (600_000, 700_000), (700_000, 800_000)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IcFilter {
    All,
    IntercompanyOnly,
    ExcludeIntercompany,
}

fn account_range_domain(
    year: i32,
    lo: i64,
    hi: i64,
    company_id: Option<i64>,
    ic: IcFilter,
) -> Value {
    let mut domain = vec![
        json!(["account_id.code", ">=", lo.to_string()]),
        json!(["account_id.code", "<", hi.to_string()]),
        json!(["date", ">=", format!("{}-01-01", year)]),
        json!(["date", "<=", format!("{}-12-31", year)]),
        json!(["parent_state", "=", "posted"]),
    ];
    match ic {
        IcFilter::All => {}
        IcFilter::IntercompanyOnly => {
            domain.push(json!(["partner_id", "in", INTERCOMPANY_PARTNERS]));
        }
        IcFilter::ExcludeIntercompany => {
            domain.push(json!(["partner_id", "not in", INTERCOMPANY_PARTNERS]));
        }
    }
    if let Some(company) = company_id {
        domain.push(json!(["company_id", "=", company]));
    }
    Value::Array(domain)
}

/// Sums grouped rows per month label, preserving first-seen order. Revenue
/// balances are negated (credit bookings), cost balances are kept as-is.
fn merge_monthly(groups: Vec<Vec<Record>>, negate: bool) -> Vec<MonthlyAmount> {
    let mut merged: Vec<MonthlyAmount> = Vec::new();
    for rows in groups {
        for row in rows {
            let period = row
                .str_field("date:month")
                .unwrap_or("Onbekend")
                .to_string();
            let mut amount = row.f64_field("balance").unwrap_or(0.0);
            if negate {
                amount = -amount;
            }
            match merged.iter_mut().find(|m| m.period == period) {
                Some(existing) => existing.amount += amount,
                None => merged.push(MonthlyAmount { period, amount }),
            }
        }
    }
    merged
}

/// Parses Odoo week labels like `"W01 2025"` or `"Week 1 2025"`.
pub fn parse_week_label(label: &str) -> Option<(u32, i32)> {
    let re = Regex::new(r"(?i)W(?:eek\s*)?(\d+)\s+(\d{4})").unwrap();
    let caps = re.captures(label)?;
    let week = caps[1].parse::<u32>().ok()?;
    let year = caps[2].parse::<i32>().ok()?;
    Some((week, year))
}

/// Monday of the given ISO week.
pub fn week_start(year: i32, week: u32) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Mon)
}

/// Parses Odoo day labels like `"01 jan 2025"`. Dutch month abbreviations
/// first, English fallbacks for the few that differ.
pub fn parse_day_label(label: &str) -> Option<NaiveDate> {
    const MONTHS: &[(&str, u32)] = &[
        ("jan", 1),
        ("feb", 2),
        ("mrt", 3),
        ("apr", 4),
        ("mei", 5),
        ("jun", 6),
        ("jul", 7),
        ("aug", 8),
        ("sep", 9),
        ("okt", 10),
        ("nov", 11),
        ("dec", 12),
        ("mar", 3),
        ("may", 5),
        ("oct", 10),
    ];

    let parts: Vec<&str> = label.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }
    let day = parts[0].parse::<u32>().ok()?;
    let month_key = parts[1].to_lowercase();
    let month = MONTHS
        .iter()
        .find(|(name, _)| month_key.starts_with(name))
        .map(|(_, number)| *number)?;
    let year = parts[2].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// R/C detection: journal name mentions R/C, or the account code sits in the
/// intercompany ranges (12* claims, 14* debts).
pub fn classify_journal(name: &str, account_code: &str) -> JournalKind {
    if account_code.starts_with("12") {
        return JournalKind::CurrentAccountClaim;
    }
    if account_code.starts_with("14") {
        return JournalKind::CurrentAccountDebt;
    }
    if name.contains("R/C") || name.contains("RC ") {
        return JournalKind::CurrentAccountDebt;
    }
    JournalKind::Bank
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn service_for(server: &MockServer) -> MetricsService {
        let client = OdooClient::new(
            server.url("/jsonrpc"),
            "lab-test-db",
            37,
            "test-key",
            Duration::from_secs(5),
        )
        .unwrap();
        MetricsService::new(client, Duration::from_secs(60), Duration::from_secs(60))
    }

    #[test]
    fn week_labels_parse_in_both_spellings() {
        assert_eq!(parse_week_label("W01 2025"), Some((1, 2025)));
        assert_eq!(parse_week_label("Week 14 2025"), Some((14, 2025)));
        assert_eq!(parse_week_label("maart 2025"), None);
    }

    #[test]
    fn week_start_is_a_monday() {
        let date = week_start(2025, 1).unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2024-12-30");
    }

    #[test]
    fn day_labels_parse_dutch_months() {
        assert_eq!(
            parse_day_label("01 jan 2025"),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(
            parse_day_label("15 mrt 2025"),
            NaiveDate::from_ymd_opt(2025, 3, 15)
        );
        assert_eq!(
            parse_day_label("03 May 2025"),
            NaiveDate::from_ymd_opt(2025, 5, 3)
        );
        assert_eq!(parse_day_label("zomaar tekst"), None);
    }

    #[test]
    fn journal_classification_follows_code_and_name() {
        assert_eq!(classify_journal("Triodos", "110010"), JournalKind::Bank);
        assert_eq!(
            classify_journal("R/C LAB Shops", "120010"),
            JournalKind::CurrentAccountClaim
        );
        assert_eq!(
            classify_journal("RC Holding", "140010"),
            JournalKind::CurrentAccountDebt
        );
        assert_eq!(
            classify_journal("R/C zonder code", ""),
            JournalKind::CurrentAccountDebt
        );
    }

    #[test]
    fn merge_monthly_sums_ranges_per_month() {
        let row = |month: &str, balance: f64| {
            let mut data = HashMap::new();
            data.insert("date:month".to_string(), serde_json::json!(month));
            data.insert("balance".to_string(), serde_json::json!(balance));
            Record::new(data)
        };

        let merged = merge_monthly(
            vec![
                vec![row("januari 2026", 100.0), row("februari 2026", 50.0)],
                vec![row("januari 2026", 25.0)],
            ],
            false,
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].period, "januari 2026");
        assert_eq!(merged[0].amount, 125.0);
        assert_eq!(merged[1].amount, 50.0);
    }

    #[tokio::test]
    async fn monthly_revenue_negates_balances_and_caches() {
        let server = MockServer::start();
        let rpc_mock = server.mock(|when, then| {
            when.method(POST).path("/jsonrpc");
            then.status(200).json_body(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": [
                    {"date:month": "januari 2026", "balance": -12500.0},
                    {"date:month": "februari 2026", "balance": -9800.0}
                ]
            }));
        });

        let service = service_for(&server);
        let first = service.monthly_revenue(2026, None).await.unwrap();
        let second = service.monthly_revenue(2026, None).await.unwrap();

        // Second read comes from the cache, not the server.
        rpc_mock.assert_hits(1);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].amount, 12500.0);
        assert_eq!(second[1].amount, 9800.0);
    }

    #[tokio::test]
    async fn journal_balances_split_bank_and_current_accounts() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/jsonrpc")
                .body_contains("account.journal");
            then.status(200).json_body(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": [
                    {
                        "id": 1, "name": "Triodos Zakelijk", "code": "BNK1",
                        "company_id": [1, "LAB Conceptstore"],
                        "default_account_id": [11, "Bank"],
                        "current_statement_balance": 15000.0
                    },
                    {
                        "id": 2, "name": "R/C LAB Projects", "code": "RC1",
                        "company_id": [2, "LAB Shops"],
                        "default_account_id": [12, "Vordering groep"],
                        "current_statement_balance": -2500.0
                    }
                ]
            }));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/jsonrpc")
                .body_contains("account.account");
            then.status(200).json_body(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": [
                    {"id": 11, "code": "110010", "name": "Bank"},
                    {"id": 12, "code": "120030", "name": "Vordering groep"}
                ]
            }));
        });

        let service = service_for(&server);
        let banks = service.bank_balances().await.unwrap();
        let rc = service.current_account_balances().await.unwrap();

        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].journal, "Triodos Zakelijk");
        assert_eq!(rc.len(), 1);
        assert_eq!(rc[0].kind, JournalKind::CurrentAccountClaim);
        assert_eq!(rc[0].kind.label(), "Vordering");
    }

    #[tokio::test]
    async fn payables_are_grouped_per_partner_as_positive_totals() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/jsonrpc");
            then.status(200).json_body(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": [
                    {"partner_id": [501, "Sigma Coatings"], "amount_residual": -1200.0,
                     "company_id": [2, "LAB Shops"]},
                    {"partner_id": [501, "Sigma Coatings"], "amount_residual": -300.0,
                     "company_id": [2, "LAB Shops"]},
                    {"partner_id": [502, "Arte Behang"], "amount_residual": -80.0,
                     "company_id": [2, "LAB Shops"]},
                    {"partner_id": false, "amount_residual": -999.0,
                     "company_id": [2, "LAB Shops"]}
                ]
            }));
        });

        let service = service_for(&server);
        let payables = service.payables_by_partner(Some(2)).await.unwrap();

        assert_eq!(payables.len(), 2);
        assert_eq!(payables[0].name, "Sigma Coatings");
        assert_eq!(payables[0].total, 1500.0);
        assert_eq!(payables[0].open_items, 2);
        assert_eq!(payables[1].total, 80.0);
    }

    #[test]
    fn company_lookup_knows_the_group() {
        assert_eq!(company_name(1), Some("LAB Conceptstore"));
        assert_eq!(company_name(9), None);
    }
}
