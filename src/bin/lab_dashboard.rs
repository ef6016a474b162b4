use chrono::Datelike;
use clap::Parser;
use lab_reporting::config::dashboard_config::DashboardConfig;
use lab_reporting::dashboard::close::{
    close_password, export_close_bundle, format_eur, verify_close_password, CloseAccess,
    DeclarationFrequency, DeclarationPeriod,
};
use lab_reporting::dashboard::metrics::{company_name, MetricsService};
use lab_reporting::dashboard::odoo::OdooClient;
use lab_reporting::domain::model::CloseReport;
use lab_reporting::utils::error::ErrorSeverity;
use lab_reporting::utils::{logger, validation::Validate};
use lab_reporting::{DashboardSession, LocalStorage, ReportError};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "lab-dashboard")]
#[command(about = "LAB Groep financial dashboard: bootstrap and overview")]
struct Args {
    /// Path to the dashboard configuration file
    #[arg(short, long, default_value = "lab-dashboard.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Limit the overview to one entity (1=LAB Conceptstore, 2=LAB Shops, 3=LAB Projects)
    #[arg(long)]
    company: Option<i64>,

    /// Reporting year; defaults to the current year
    #[arg(long)]
    year: Option<i32>,

    /// Exclude intercompany turnover and costs from the overview
    #[arg(long)]
    exclude_intercompany: bool,

    /// Write the maandafsluiting bundle (json/csv/txt in zip) to this path
    #[arg(long)]
    close_export: Option<String>,

    /// Password for the maandafsluiting export
    #[arg(long)]
    close_password: Option<String>,

    /// Use quarterly BTW declaration periods instead of monthly
    #[arg(long)]
    quarterly: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("🚀 Starting LAB Groep dashboard");

    if let Err(e) = run(&args).await {
        tracing::error!(
            "❌ Dashboard failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestie: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(args: &Args) -> lab_reporting::Result<()> {
    let config = if std::path::Path::new(&args.config).exists() {
        tracing::info!("📁 Loading configuration from: {}", args.config);
        DashboardConfig::from_file(&args.config)?
    } else {
        tracing::info!(
            "📁 No configuration file at '{}', using the built-in defaults",
            args.config
        );
        DashboardConfig::default()
    };
    config.validate()?;

    // Page bootstrap: exactly once, before anything is rendered.
    let mut session = DashboardSession::new();
    session.configure_page(config.page_config()?)?;
    let page = session.begin_render()?;

    println!("{} {} [{}]", page.icon, page.title, page.layout);
    println!();

    let client = OdooClient::from_config(&config)?;
    let service = MetricsService::new(
        client,
        Duration::from_secs(config.cache.metrics_ttl_seconds),
        Duration::from_secs(config.cache.balances_ttl_seconds),
    );

    let today = chrono::Local::now().date_naive();
    let year = args.year.unwrap_or_else(|| today.year());
    let entity = args
        .company
        .and_then(company_name)
        .unwrap_or("Alle entiteiten");

    println!("📋 Overzicht {} | {}", year, entity);

    let mut revenue: f64 = service
        .monthly_revenue(year, args.company)
        .await?
        .iter()
        .map(|m| m.amount)
        .sum();
    let mut costs: f64 = service
        .monthly_costs(year, args.company)
        .await?
        .iter()
        .map(|m| m.amount)
        .sum();

    if args.exclude_intercompany {
        let ic_revenue: f64 = service
            .intercompany_revenue(year, args.company)
            .await?
            .iter()
            .map(|m| m.amount)
            .sum();
        let ic_costs: f64 = service
            .intercompany_costs(year, args.company)
            .await?
            .iter()
            .map(|m| m.amount)
            .sum();
        revenue -= ic_revenue;
        costs -= ic_costs;
        println!("  (intercompany gefilterd)");
    }

    println!("  Omzet:      {}", format_eur(revenue));
    println!("  Kosten:     {}", format_eur(costs));
    println!("  Resultaat:  {}", format_eur(revenue - costs));
    println!();

    println!("🏦 Banksaldi:");
    let banks = service.bank_balances().await?;
    let bank_total: f64 = banks.iter().map(|b| b.balance).sum();
    for bank in &banks {
        println!(
            "  {:<30} {:<20} {}",
            bank.journal,
            bank.company,
            format_eur(bank.balance)
        );
    }
    println!("  Totaal: {}", format_eur(bank_total));

    let current_accounts = service.current_account_balances().await?;
    if !current_accounts.is_empty() {
        println!();
        println!("🔁 Rekening-courant (intercompany):");
        for rc in &current_accounts {
            println!(
                "  {:<30} {:<10} {}",
                rc.journal,
                rc.kind.label(),
                format_eur(rc.balance)
            );
        }
    }

    let receivables = service.receivables_by_partner(args.company).await?;
    let payables = service.payables_by_partner(args.company).await?;
    let receivables_total: f64 = receivables.iter().map(|p| p.total).sum();
    let payables_total: f64 = payables.iter().map(|p| p.total).sum();
    println!();
    println!(
        "📒 Debiteuren: {} ({} partners) | Crediteuren: {} ({} partners)",
        format_eur(receivables_total),
        receivables.len(),
        format_eur(payables_total),
        payables.len()
    );

    if let Some(bundle_path) = &args.close_export {
        run_close_export(
            args,
            &config,
            &service,
            bundle_path,
            year,
            today.month(),
            entity,
            bank_total,
            receivables_total,
            payables_total,
            revenue,
            costs,
        )
        .await?;
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_close_export(
    args: &Args,
    config: &DashboardConfig,
    service: &MetricsService,
    bundle_path: &str,
    year: i32,
    month: u32,
    entity: &str,
    bank_total: f64,
    receivables_total: f64,
    payables_total: f64,
    revenue: f64,
    costs: f64,
) -> lab_reporting::Result<()> {
    let configured = close_password(&config.close);
    let input = args.close_password.clone().unwrap_or_default();
    match verify_close_password(configured.as_deref(), &input) {
        CloseAccess::NotConfigured => {
            // Graceful degradation: the dashboard stays usable without the
            // close password, only the export is skipped.
            eprintln!("⚠️ Geen maandafsluiting-wachtwoord geconfigureerd, export overgeslagen");
            return Ok(());
        }
        CloseAccess::Denied => {
            return Err(ReportError::configuration(
                "maandafsluiting-wachtwoord onjuist",
            ));
        }
        CloseAccess::Granted => {}
    }

    let frequency = if args.quarterly {
        DeclarationFrequency::Quarterly
    } else {
        DeclarationFrequency::Monthly
    };
    let period = DeclarationPeriod::for_month(year, month, frequency)
        .ok_or_else(|| ReportError::configuration("ongeldige afsluitperiode"))?;

    let vat_net: f64 = service
        .vat_months(args.company, period.start, period.end)
        .await?
        .iter()
        .map(|m| m.net)
        .sum();

    let report = CloseReport {
        period: period.label.clone(),
        entity: entity.to_string(),
        revenue,
        costs,
        result: revenue - costs,
        bank_total,
        receivables_total,
        payables_total,
        vat_net,
    };

    let storage = LocalStorage::new(".".to_string());
    let written = export_close_bundle(&storage, &report, bundle_path).await?;
    println!();
    println!("🧾 Maandafsluiting {} geëxporteerd naar: {}", period.label, written);
    Ok(())
}
