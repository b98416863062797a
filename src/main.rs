use anyhow::Context;
use clap::Parser;
use contact_match::config::cli::StoreArgs;
use contact_match::config::Command;
use contact_match::core::csv_import;
use contact_match::utils::error::{CrmError, ErrorSeverity};
use contact_match::utils::{logger, validation::Validate};
use contact_match::{AppConfig, CliConfig, ContactEngine, InMemoryStore, NormalizedContactCandidate};
use serde::Serialize;

const MISSING_FILTER: &str =
    "at least one of --buyer, --realtor, --attorney or --lender is required";

#[derive(Serialize)]
struct PreviewRecord<'a> {
    row: usize,
    valid: bool,
    problems: String,
    name: &'a str,
    #[serde(rename = "type")]
    category: &'a str,
    email: &'a str,
    phone: &'a str,
    company: &'a str,
    branch: &'a str,
    address: &'a str,
    salesperson: &'a str,
    drinks: Option<bool>,
}

impl<'a> From<&'a NormalizedContactCandidate> for PreviewRecord<'a> {
    fn from(c: &'a NormalizedContactCandidate) -> Self {
        Self {
            row: c.row_number,
            valid: c.is_valid(),
            problems: c.missing_fields().join("; "),
            name: &c.name,
            category: c.category.map(|t| t.as_str()).unwrap_or(c.raw_category.as_str()),
            email: c.email.as_deref().unwrap_or(""),
            phone: c.phone.as_deref().unwrap_or(""),
            company: c.company.as_deref().unwrap_or(""),
            branch: c.branch.as_deref().unwrap_or(""),
            address: c.address.as_deref().unwrap_or(""),
            salesperson: c.salesperson.as_deref().unwrap_or(""),
            drinks: c.drinks,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (未指定時使用預設值)
    let config = match &cli.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    // 初始化日誌
    if config.json_logging() {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, &config).await {
        let Some(crm) = e.downcast_ref::<CrmError>() else {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        };

        tracing::error!(
            "❌ Command failed: {:#} (Category: {:?}, Severity: {:?})",
            e,
            crm.category(),
            crm.severity()
        );
        eprintln!("❌ {}", crm.user_friendly_message());
        eprintln!("💡 Suggestion: {}", crm.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match crm.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn open_engine(
    config: &AppConfig,
    args: &StoreArgs,
) -> anyhow::Result<(ContactEngine<InMemoryStore>, String)> {
    let path = config.snapshot_path(args.store.clone())?;
    let store = InMemoryStore::load(&path)?;
    let engine = ContactEngine::new(store)
        .with_expander(config.nickname_expander()?)
        .with_import_options(config.import_options());
    Ok((engine, path))
}

async fn run(cli: &CliConfig, config: &AppConfig) -> anyhow::Result<()> {
    match &cli.command {
        Command::Expand { phrase } => {
            let expander = config.nickname_expander()?;
            for variant in expander.expand(phrase) {
                println!("{}", variant);
            }
        }

        Command::Search { store, json, .. } => {
            let filters = cli.command.filters().unwrap_or_default();
            if filters.is_empty() {
                return Err(CrmError::ValidationError {
                    message: MISSING_FILTER.to_string(),
                }
                .into());
            }

            let (engine, _) = open_engine(config, store)?;
            let outcome = engine.search(&filters).await?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }

            if outcome.is_empty() {
                println!("✅ No matching contacts");
            }
            for m in &outcome.results {
                println!(
                    "{:<9} {:<32} {:>4.2}  {}",
                    m.matched_category.label(),
                    m.contact.name,
                    m.score,
                    m.contact.salesperson_label()
                );
            }
            if let Some(crossover) = &outcome.crossover {
                println!("⚠️  Crossover detected: {}", crossover);
            }
        }

        Command::Conflict { store, name, json } => {
            let (engine, _) = open_engine(config, store)?;
            let report = engine.conflict_check(name).await?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.is_clear() {
                println!("✅ \"{}\" is not in the system yet", report.term);
            } else {
                println!(
                    "⚠️  Potential conflict: {} matching contact(s) for \"{}\"",
                    report.matches.len(),
                    report.term
                );
                for contact in &report.matches {
                    let category = contact.category.map(|c| c.label()).unwrap_or("Unknown");
                    println!(
                        "  {:<32} {:<9} assigned to {}",
                        contact.name,
                        category,
                        contact.salesperson_label()
                    );
                }
            }
        }

        Command::Preview { file, out } => {
            let raw = std::fs::read_to_string(file).with_context(|| format!("reading {}", file))?;
            let rows = csv_import::preview(&raw)?;

            for row in &rows {
                let status = if row.is_valid() { "✅" } else { "❌" };
                println!(
                    "{} row {:>4}  {:<32} {}",
                    status,
                    row.row_number,
                    row.name,
                    row.category.map(|c| c.label()).unwrap_or(row.raw_category.as_str())
                );
            }

            if let Some(out) = out {
                let mut writer = csv::Writer::from_path(out)?;
                for row in &rows {
                    writer.serialize(PreviewRecord::from(row))?;
                }
                writer.flush()?;
                tracing::info!("📁 Preview written to: {}", out);
            }
        }

        Command::Import {
            store,
            file,
            dry_run,
        } => {
            let raw = std::fs::read_to_string(file).with_context(|| format!("reading {}", file))?;
            let (engine, path) = open_engine(config, store)?;
            let rows = engine.preview(&raw)?;
            let report = engine.import(&rows).await?;

            println!("✅ Imported: {}", report.success);
            println!("❌ Failed:   {}", report.failed);
            for error in &report.errors {
                println!("  {}", error);
            }

            if *dry_run {
                tracing::info!("🔍 DRY RUN MODE - snapshot not saved");
            } else {
                engine.store().save(&path).await?;
                tracing::info!("📁 Snapshot saved to: {}", path);
            }
        }
    }

    Ok(())
}
