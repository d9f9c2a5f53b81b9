use clap::{Args, Parser, Subcommand};
use dx_core::constants::{ENV_LOOKUP_URL, ENV_MAX_LIST, ENV_PRIORITY_KEYWORDS, ENV_SEARCH_FIELDS};
use dx_core::{
    CategoryStyle, Code, CoreConfig, InMemoryLookup, PatientRecord, ReportService, SortField,
    SortOrder, TableOptions,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod input;

use input::{apply_mutations, load_patients, Mutation};

#[derive(Parser)]
#[command(name = "dxreport")]
#[command(about = "Enrich patient diagnosis codes with ICD-10 descriptions and report on them")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sorted patient records as JSON
    Report {
        /// JSON file containing an array of patients
        input: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Print a colour-coded table of patient diagnoses
    Table {
        /// JSON file containing an array of patients
        input: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        table: TableArgs,
    },
    /// Look up individual codes
    Lookup {
        /// Codes to look up
        #[arg(required = true)]
        codes: Vec<String>,
        /// Resolve codes from a JSON object of code -> description instead of the network
        #[arg(long)]
        lookup_fixture: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Field to sort by (patient_id, diagnoses, malformed_diagnoses, priority_diagnoses,
    /// resolved_diagnoses); unknown names sort by priority_diagnoses
    #[arg(long, default_value = "priority_diagnoses")]
    sort: String,
    /// Sort ascending instead of descending
    #[arg(long)]
    ascending: bool,
    /// Add a diagnosis before reporting (ID:CODE, repeatable)
    #[arg(long = "add", value_name = "ID:CODE")]
    adds: Vec<Mutation>,
    /// Cure a diagnosis before reporting (ID:CODE, repeatable)
    #[arg(long = "cure", value_name = "ID:CODE")]
    cures: Vec<Mutation>,
    /// Resolve codes from a JSON object of code -> description instead of the network
    #[arg(long)]
    lookup_fixture: Option<PathBuf>,
}

#[derive(Args)]
struct TableArgs {
    /// Show only this patient
    #[arg(long)]
    patient: Option<i64>,
    /// Stop hoisting priority diagnoses; they are shown with the non-priority ones
    #[arg(long)]
    no_priority: bool,
    /// Hide non-priority valid diagnoses
    #[arg(long)]
    no_non_priority: bool,
    /// Hide malformed codes
    #[arg(long)]
    no_malformed: bool,
    /// Hide resolved diagnoses
    #[arg(long)]
    no_resolved: bool,
    #[arg(long, default_value = "red")]
    priority_color: String,
    #[arg(long, default_value = "yellow")]
    non_priority_color: String,
    #[arg(long, default_value = "magenta")]
    malformed_color: String,
    #[arg(long, default_value = "green")]
    resolved_color: String,
    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,
}

/// JSON envelope printed by `dxreport report`.
#[derive(Serialize)]
struct ReportDocument {
    generated_at: chrono::DateTime<chrono::Utc>,
    sort_by: SortField,
    descending: bool,
    patients: Vec<PatientRecord>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dx=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn config_from_env() -> anyhow::Result<CoreConfig> {
    let cfg = CoreConfig::from_env_values(
        std::env::var(ENV_LOOKUP_URL).ok(),
        std::env::var(ENV_SEARCH_FIELDS).ok(),
        std::env::var(ENV_MAX_LIST).ok(),
        std::env::var(ENV_PRIORITY_KEYWORDS).ok(),
    )?;
    Ok(cfg)
}

fn build_service(cfg: CoreConfig, fixture: Option<&Path>) -> anyhow::Result<ReportService> {
    let cfg = Arc::new(cfg);
    match fixture {
        Some(path) => {
            let lookup = InMemoryLookup::from_json_file(path)?;
            tracing::info!("using {} fixture descriptions from {}", lookup.len(), path.display());
            Ok(ReportService::new(cfg, Box::new(lookup)))
        }
        None => Ok(ReportService::with_nlm_client(cfg)?),
    }
}

impl TableArgs {
    fn into_options(self, field: SortField, order: SortOrder) -> TableOptions {
        TableOptions {
            priority: CategoryStyle::new(!self.no_priority, self.priority_color),
            non_priority: CategoryStyle::new(!self.no_non_priority, self.non_priority_color),
            malformed: CategoryStyle::new(!self.no_malformed, self.malformed_color),
            resolved: CategoryStyle::new(!self.no_resolved, self.resolved_color),
            sort_field: field,
            sort_order: order,
            patient_id: self.patient,
            colorize: !self.no_color,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let cfg = config_from_env()?;

    match cli.command {
        Some(Commands::Report { input, common }) => {
            let service = build_service(cfg, common.lookup_fixture.as_deref())?;
            let mut patients = load_patients(&input)?;
            apply_mutations(&service, &mut patients, &common.adds, &common.cures);

            let field = SortField::parse_lenient(&common.sort);
            let order = SortOrder::from_descending(!common.ascending);
            let document = ReportDocument {
                generated_at: chrono::Utc::now(),
                sort_by: field,
                descending: order.is_descending(),
                patients: service.build_report(&patients, field, order),
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Some(Commands::Table {
            input,
            common,
            table,
        }) => {
            let service = build_service(cfg, common.lookup_fixture.as_deref())?;
            let mut patients = load_patients(&input)?;
            apply_mutations(&service, &mut patients, &common.adds, &common.cures);

            let options = table.into_options(
                SortField::parse_lenient(&common.sort),
                SortOrder::from_descending(!common.ascending),
            );
            println!("{}", service.render_table(&patients, &options));
        }
        Some(Commands::Lookup {
            codes,
            lookup_fixture,
        }) => {
            let service = build_service(cfg, lookup_fixture.as_deref())?;
            for code in codes {
                match service.describe(&Code::from(code.as_str())) {
                    Some(description) => println!("{code}\t{description}"),
                    None => println!("{code}\tunresolved"),
                }
            }
        }
        None => {
            println!("Use 'dxreport --help' for commands");
        }
    }

    Ok(())
}
