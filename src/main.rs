use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fetp_dce::analysis::national::{resolve_assumptions, simulate};
use fetp_dce::analysis::sensitivity::sensitivity;
use fetp_dce::analysis::{RawAssumptions, SensitivityPoint, SimulationResult};
use fetp_dce::coefficients::CoefficientStore;
use fetp_dce::config::{Config, ConfigOverrides};
use fetp_dce::evaluation::evaluator::evaluate;
use fetp_dce::evaluation::Evaluation;
use fetp_dce::output::csv::{
    comparison_to_csv, contributions_to_csv, evaluation_to_csv, scenarios_to_csv,
    sensitivity_to_csv, simulation_to_csv,
};
use fetp_dce::output::json::render_json;
use fetp_dce::output::table::{
    render_coefficients_table, render_comparison_table, render_contributions_table,
    render_evaluation_table, render_scenarios_table, render_sensitivity_table,
    render_simulation_table,
};
use fetp_dce::resolver::{resolve_config, LevelInput, RawConfig};
use fetp_dce::scenario::{compare_scenarios, ComparisonReport, ScenarioFile, ScenarioStore};
use fetp_dce::server::run_server;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "fetp-dce",
    about = "Decision aid for scaling field epidemiology training programmes"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// TOML file replacing the built-in coefficient and WTP tables
    #[arg(long)]
    coefficients: Option<PathBuf>,
    #[arg(long)]
    currency: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args, Clone, Default)]
struct ScenarioArgs {
    /// frontline | intermediate | advanced
    #[arg(long)]
    program: Option<String>,
    /// average | supporters
    #[arg(long)]
    model: Option<String>,
    /// certificate | uni | govpath
    #[arg(long)]
    career: Option<String>,
    /// low | medium | high
    #[arg(long)]
    mentorship: Option<String>,
    /// blended | inperson | online
    #[arg(long)]
    delivery: Option<String>,
    /// response time in days: 30 | 15 | 7
    #[arg(long)]
    response: Option<String>,
    #[arg(long = "cohort-size")]
    cohort_size: Option<f64>,
    /// cost per trainee per month
    #[arg(long = "cost")]
    cost_per_trainee: Option<f64>,
    #[arg(
        long = "opportunity-cost",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    include_opportunity_cost: Option<bool>,
}

impl From<ScenarioArgs> for RawConfig {
    fn from(value: ScenarioArgs) -> Self {
        let level = |raw: Option<String>| raw.map(LevelInput::Text);
        Self {
            program: level(value.program),
            preference_model: level(value.model),
            career: level(value.career),
            mentorship: level(value.mentorship),
            delivery: level(value.delivery),
            response: level(value.response),
            cohort_size: value.cohort_size,
            cost_per_trainee: value.cost_per_trainee,
            include_opportunity_cost: value.include_opportunity_cost,
        }
    }
}

#[derive(Debug, clap::Args, Clone, Default)]
struct AssumptionArgs {
    #[arg(long)]
    cohorts: Option<f64>,
    #[arg(long = "fellows-per-district")]
    fellows_per_district: Option<f64>,
    #[arg(long = "value-per-graduate")]
    value_per_graduate: Option<f64>,
    #[arg(long = "outbreaks-per-100")]
    outbreaks_per_100_graduates: Option<f64>,
    #[arg(long = "value-per-outbreak")]
    value_per_outbreak: Option<f64>,
}

impl From<AssumptionArgs> for RawAssumptions {
    fn from(value: AssumptionArgs) -> Self {
        Self {
            num_cohorts: value.cohorts,
            fellows_per_district: value.fellows_per_district,
            value_per_graduate: value.value_per_graduate,
            outbreaks_per_100_graduates: value.outbreaks_per_100_graduates,
            value_per_outbreak: value.value_per_outbreak,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    Evaluate {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// also show per-attribute WTP and the cost breakdown
        #[arg(long)]
        detail: bool,
    },
    Sensitivity {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    Simulate {
        #[command(flatten)]
        scenario: ScenarioArgs,
        #[command(flatten)]
        assumptions: AssumptionArgs,
    },
    Compare {
        /// TOML file with one `[[scenario]]` table per design
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        a: Option<usize>,
        #[arg(long)]
        b: Option<usize>,
    },
    Coefficients,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(config_path.as_path()))?;
    config.apply_overrides(ConfigOverrides {
        coefficients_path: cli.coefficients.clone(),
        currency: cli.currency.clone(),
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let tables =
        CoefficientStore::load_or_builtin(config.resolved_coefficients_path().as_deref())?;
    let currency = config.display.currency.clone();

    match cli.command {
        Commands::Evaluate { scenario, detail } => {
            let resolved = resolve_config(&RawConfig::from(scenario).or(&config.scenario));
            let evaluation = evaluate(&tables, &resolved);
            print_evaluation(&evaluation, detail, cli.output, &currency)?;
        }
        Commands::Sensitivity { scenario } => {
            let resolved = resolve_config(&RawConfig::from(scenario).or(&config.scenario));
            let points = sensitivity(&tables, &resolved);
            print_sensitivity(&points, cli.output, &currency)?;
        }
        Commands::Simulate {
            scenario,
            assumptions,
        } => {
            let resolved = resolve_config(&RawConfig::from(scenario).or(&config.scenario));
            let assumptions =
                resolve_assumptions(&RawAssumptions::from(assumptions).or(&config.simulation));
            let per_cohort = evaluate(&tables, &resolved).result;
            let result = simulate(&resolved, &per_cohort, &assumptions);
            print_simulation(&result, cli.output, &currency)?;
        }
        Commands::Compare { file, a, b } => {
            let scenario_file = ScenarioFile::load(&file)?;
            let mut store = ScenarioStore::new();
            scenario_file.evaluate_into(&tables, &config.scenario, &mut store);
            let comparison = if store.len() < 2 && a.is_none() && b.is_none() {
                None
            } else {
                let a = a.unwrap_or(0);
                let b = b.unwrap_or(store.len().saturating_sub(1));
                Some(compare_scenarios(&store, a, b).with_context(|| {
                    format!("cannot compare scenarios from {}", file.display())
                })?)
            };
            let report = ComparisonReport {
                scenarios: store.list(),
                comparison,
            };
            print_comparison(&report, cli.output, &currency)?;
        }
        Commands::Coefficients => match cli.output {
            OutputFormat::Table => println!("{}", render_coefficients_table(&tables)),
            OutputFormat::Json => println!("{}", render_json(&tables)?),
            OutputFormat::Csv => {
                warn!("CSV output for coefficients not implemented, using JSON");
                println!("{}", render_json(&tables)?);
            }
        },
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            return run_server(config, tables, addr).await;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &PathBuf) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_evaluation(
    evaluation: &Evaluation,
    detail: bool,
    format: OutputFormat,
    currency: &str,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_evaluation_table(evaluation, currency));
            if detail {
                println!("{}", render_contributions_table(evaluation, currency));
            }
        }
        OutputFormat::Json => println!("{}", render_json(evaluation)?),
        OutputFormat::Csv => {
            println!("{}", evaluation_to_csv(evaluation)?);
            if detail {
                println!("{}", contributions_to_csv(evaluation)?);
            }
        }
    }
    Ok(())
}

fn print_sensitivity(
    points: &[SensitivityPoint],
    format: OutputFormat,
    currency: &str,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_sensitivity_table(points, currency)),
        OutputFormat::Json => println!("{}", render_json(points)?),
        OutputFormat::Csv => println!("{}", sensitivity_to_csv(points)?),
    }
    Ok(())
}

fn print_simulation(
    result: &SimulationResult,
    format: OutputFormat,
    currency: &str,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_simulation_table(result, currency)),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => println!("{}", simulation_to_csv(result)?),
    }
    Ok(())
}

fn print_comparison(
    report: &ComparisonReport<'_>,
    format: OutputFormat,
    currency: &str,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_scenarios_table(report.scenarios, currency));
            if let Some(comparison) = &report.comparison {
                println!("{}", render_comparison_table(comparison, currency));
            }
        }
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => {
            println!("{}", scenarios_to_csv(report.scenarios)?);
            if let Some(comparison) = &report.comparison {
                println!("{}", comparison_to_csv(comparison)?);
            }
        }
    }
    Ok(())
}
