use clap::Args;
use serde_json::Value;

use mortgage_core::amortization::calculator::{self, MortgageInput};
use mortgage_core::amortization::payment;
use mortgage_core::amortization::schedule::{self, AmortizationInput};
use mortgage_core::history::{HistoryStore, NewHistoryEntry};
use mortgage_core::LoanParameters;

use crate::config::Config;
use crate::input;

/// Arguments for the monthly payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<f64>,

    /// Nominal annual rate in percent (6.5 = 6.5%)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: LoanParameters = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        loan_from_flags(args.principal, args.rate, args.years)?
    };

    let result = payment::calculate_payment(&params);
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long, allow_hyphen_values = true)]
    pub principal: Option<f64>,

    /// Nominal annual rate in percent
    #[arg(long)]
    pub rate: Option<f64>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Fixed monthly payment; auto-calculated when omitted or zero
    #[arg(long)]
    pub payment: Option<f64>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let loan = loan_from_flags(args.principal, args.rate, args.years)?;
        AmortizationInput {
            principal: loan.principal,
            annual_rate_percent: loan.annual_rate_percent,
            term_years: loan.term_years,
            monthly_payment: args.payment,
        }
    };

    let result = schedule::build_amortization(&amort_input);
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the home purchase calculator
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price of the home
    #[arg(long)]
    pub home_price: Option<f64>,

    /// Down payment as a percentage of the price
    #[arg(long, default_value_t = 20.0)]
    pub down_payment_percent: f64,

    /// Nominal annual rate in percent
    #[arg(long)]
    pub rate: Option<f64>,

    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    pub years: u32,

    /// Annual property tax as a percentage of the price
    #[arg(long, default_value_t = 0.0)]
    pub tax_rate: f64,

    /// Monthly homeowner's insurance
    #[arg(long, default_value_t = 0.0)]
    pub insurance: f64,

    /// Monthly HOA dues
    #[arg(long, default_value_t = 0.0)]
    pub hoa: f64,

    /// Save inputs and results to history
    #[arg(long)]
    pub save: bool,

    /// Label stored with the saved entry
    #[arg(long, requires = "save")]
    pub label: Option<String>,
}

pub fn run_calculate(
    args: CalculateArgs,
    config: &Config,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        MortgageInput {
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment_percent: args.down_payment_percent,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.years,
            property_tax_rate_percent: args.tax_rate,
            insurance_monthly: args.insurance,
            hoa_monthly: args.hoa,
        }
    };

    let result = calculator::calculate_mortgage(&mortgage_input);
    let mut value = serde_json::to_value(&result)?;

    if args.save {
        let store = config.open_history().map_err(|e| format!("{e:#}"))?;
        let mut entry = NewHistoryEntry::new(
            serde_json::to_value(&mortgage_input)?,
            serde_json::to_value(result.result)?,
        );
        entry.label = args.label;
        let saved = store.add(entry)?;
        if let Value::Object(ref mut map) = value {
            map.insert("history_entry".into(), serde_json::to_value(saved)?);
        }
    }

    Ok(value)
}

fn loan_from_flags(
    principal: Option<f64>,
    rate: Option<f64>,
    years: Option<u32>,
) -> Result<LoanParameters, Box<dyn std::error::Error>> {
    Ok(LoanParameters::new(
        principal.ok_or("--principal is required (or provide --input)")?,
        rate.ok_or("--rate is required (or provide --input)")?,
        years.ok_or("--years is required (or provide --input)")?,
    ))
}
