//! Campaign Calculator — pharmacy vaccination campaign ROI, break-even and
//! earnings from the command line.
//!
//! Flags fill in the calculator form; anything left out comes from the config
//! file or environment. Reports go to stdout, logs to stderr.

use campaign_core::{AppConfig, CampaignParameters, VaccineFee};
use campaign_economics::{
    compute_break_even, compute_coadministration_revenue, compute_potential_earnings, compute_roi,
};
use campaign_reporting::{format_amount, CalculationReport, ReportBuilder};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-calculator")]
#[command(about = "Pharmacy vaccination campaign ROI and break-even calculator")]
#[command(version)]
struct Cli {
    /// TOML config file (prices, form defaults, report settings)
    #[arg(long, global = true, env = "CAMPAIGN_CALC_CONFIG")]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Print the report as CSV
    #[arg(long, global = true, conflicts_with = "json")]
    csv: bool,

    /// Also print a mailto: link (`--email=ADDR`); bare `--email` uses the configured recipient
    #[arg(
        long,
        global = true,
        value_name = "ADDR",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = ""
    )]
    email: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Revenue, retained customers, break-even and ROI for a campaign
    Roi {
        /// Campaign cost ($)
        #[arg(long)]
        campaign_cost: Option<f64>,

        /// Expected patients
        #[arg(long)]
        patients: Option<u64>,

        /// Average spend per patient ($)
        #[arg(long)]
        avg_spend: Option<f64>,

        /// Retention rate (%)
        #[arg(long)]
        retention: Option<f64>,

        /// Co-administered vaccine fee as NAME=AMOUNT (up to two)
        #[arg(long = "fee", value_parser = parse_named_amount)]
        fees: Vec<(String, f64)>,

        /// Skip the default co-administration fee
        #[arg(long, conflicts_with = "fees")]
        no_fee: bool,

        /// Per-patient add-on boost as NAME=AMOUNT (adds to configured boosts)
        #[arg(long = "boost", value_parser = parse_named_amount)]
        boosts: Vec<(String, f64)>,

        /// Basket size per patient ($)
        #[arg(long)]
        basket_size: Option<f64>,

        /// Flat program cost ($)
        #[arg(long)]
        program_cost: Option<f64>,
    },

    /// Break-even patient counts for avg spend and co-administration fees
    BreakEven {
        /// Campaign cost ($)
        #[arg(long)]
        campaign_cost: Option<f64>,

        /// Average spend per patient ($)
        #[arg(long)]
        avg_spend: Option<f64>,

        /// Co-administered vaccine fee as NAME=AMOUNT (up to two)
        #[arg(long = "fee", value_parser = parse_named_amount)]
        fees: Vec<(String, f64)>,
    },

    /// Potential earnings for one or two vaccines over a target patient count
    Earnings {
        /// Vaccine name from the price table (give once or twice)
        #[arg(long = "vaccine", required = true, num_args = 1)]
        vaccines: Vec<String>,

        /// Target number of patients
        #[arg(long)]
        target: u64,

        /// Flat program cost ($)
        #[arg(long)]
        program_cost: Option<f64>,

        /// Basket size per patient ($)
        #[arg(long)]
        basket_size: Option<f64>,
    },

    /// Revenue from a base vaccine plus an optional co-administered one
    Coadmin {
        /// Base vaccine
        #[arg(long)]
        base: String,

        /// Co-administered vaccine ("None" for no add-on)
        #[arg(long)]
        co: Option<String>,

        /// Number of people
        #[arg(long, default_value_t = 1)]
        people: u64,
    },

    /// List the configured vaccine prices
    Prices,
}

fn parse_named_amount(s: &str) -> Result<(String, f64), String> {
    let (name, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing name in '{s}'"));
    }
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|e| format!("invalid amount in '{s}': {e}"))?;
    Ok((name.to_string(), amount))
}

fn to_fees(fees: Vec<(String, f64)>) -> Vec<VaccineFee> {
    fees.into_iter()
        .map(|(name, fee)| VaccineFee::new(name, fee))
        .collect()
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => Ok(AppConfig::load_from(Some(path))?),
        None => Ok(AppConfig::load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        })),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_calculator=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let prices = config.price_table()?;
    let builder = ReportBuilder::from_config(&config.report);
    let defaults = &config.defaults;

    let report = match cli.command {
        Commands::Roi {
            campaign_cost,
            patients,
            avg_spend,
            retention,
            fees,
            no_fee,
            boosts,
            basket_size,
            program_cost,
        } => {
            let mut params = CampaignParameters::new(
                campaign_cost.unwrap_or(defaults.campaign_cost),
                patients.unwrap_or(defaults.expected_patients),
                avg_spend.unwrap_or(defaults.avg_spend_per_patient),
                retention.unwrap_or(defaults.retention_rate_percent),
            );
            params.vaccine_fees = if fees.is_empty() && !no_fee {
                vec![VaccineFee::new("Co-administration", defaults.coadmin_fee)]
            } else {
                to_fees(fees)
            };
            params.add_on_boosts = config.pricing.add_on_boosts.clone();
            params.add_on_boosts.extend(boosts);
            params.basket_size = basket_size.unwrap_or(defaults.basket_size);
            params.program_cost = program_cost.unwrap_or(defaults.program_cost);

            info!(
                campaign_cost = params.campaign_cost,
                patients = params.expected_patients,
                fees = params.vaccine_fees.len(),
                boosts = params.add_on_boosts.len(),
                "Calculating ROI"
            );
            builder.roi(&compute_roi(&params)?)
        }
        Commands::BreakEven {
            campaign_cost,
            avg_spend,
            fees,
        } => {
            let cost = campaign_cost.unwrap_or(defaults.campaign_cost);
            let fees = if fees.is_empty() {
                vec![VaccineFee::new("Co-administration", defaults.coadmin_fee)]
            } else {
                to_fees(fees)
            };
            info!(campaign_cost = cost, fees = fees.len(), "Calculating break-even");
            let result = compute_break_even(
                cost,
                avg_spend.unwrap_or(defaults.avg_spend_per_patient),
                &fees,
            )?;
            builder.break_even(cost, &result)
        }
        Commands::Earnings {
            vaccines,
            target,
            program_cost,
            basket_size,
        } => {
            info!(vaccines = ?vaccines, target, "Calculating potential earnings");
            let total = compute_potential_earnings(
                &prices,
                vaccines.as_slice(),
                target,
                program_cost.unwrap_or(defaults.program_cost),
                basket_size.unwrap_or(defaults.basket_size),
            )?;
            builder.earnings(vaccines.as_slice(), target, total)
        }
        Commands::Coadmin { base, co, people } => {
            let co = co.filter(|name| !name.eq_ignore_ascii_case("none"));
            info!(base = %base, co = ?co, people, "Calculating co-administration revenue");
            let revenue = compute_coadministration_revenue(&prices, &base, co.as_deref(), people)?;
            builder.coadministration(&revenue)
        }
        Commands::Prices => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&prices)?);
            } else {
                for (name, price) in prices.iter() {
                    println!(
                        "{:<40} {}{}",
                        name,
                        config.report.currency_symbol,
                        format_amount(price)
                    );
                }
            }
            return Ok(());
        }
    };

    print_report(&report, cli.json, cli.csv)?;

    if let Some(recipient) = cli.email {
        let recipient = if recipient.is_empty() {
            config.report.recipient.as_str()
        } else {
            recipient.as_str()
        };
        let link = report.mailto_link(recipient, &config.report.subject)?;
        println!();
        println!("{link}");
    }

    Ok(())
}

fn print_report(report: &CalculationReport, json: bool, csv: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", report.export_json()?);
    } else if csv {
        print!("{}", report.export_csv());
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}
