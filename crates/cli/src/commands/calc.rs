//! Offline calculation from explicit inputs.

use anyhow::{Context, Result};
use clap::Args;
use condor_core::{OuterLegPolicy, RoundingMode};
use condor_range::{
    plan_condor, round_strike, CondorPlan, MarketObservation, ResolvedVolatility, ONE_SD,
};

/// Arguments for the calc command.
#[derive(Args, Debug)]
pub struct CalcArgs {
    /// Last traded price of the underlying
    #[arg(long)]
    pub price: f64,

    /// Trading days to expiry
    #[arg(long)]
    pub days: i64,

    /// Implied volatilities in percent: call ATM, call next, put ATM, put next
    #[arg(long, value_parser = parse_iv)]
    pub iv: ResolvedVolatility,

    /// Strike interval
    #[arg(long, default_value_t = 50)]
    pub step: i64,

    /// Inner band width in standard deviations
    #[arg(long, default_value_t = ONE_SD)]
    pub sd: f64,

    /// Outer leg placement: fixed[:steps] or band[:multiplier]
    #[arg(long, default_value = "fixed:4")]
    pub outer: OuterLegPolicy,

    /// ATM strike rounding: ceiling, floor or nearest
    #[arg(long, default_value = "ceiling")]
    pub atm_rounding: RoundingMode,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_iv(s: &str) -> std::result::Result<ResolvedVolatility, String> {
    ResolvedVolatility::parse_list(s).map_err(|e| e.to_string())
}

/// Runs the calculation and prints the plan.
pub fn run(args: CalcArgs) -> Result<()> {
    let atm_strike = round_strike(args.price, args.step, args.atm_rounding)
        .context("Failed to locate ATM strike")?;
    let observation = MarketObservation::new(args.price, args.step, args.days);
    let plan = plan_condor(&observation, &args.iv, args.sd, args.outer)
        .context("Failed to compute condor")?;

    if args.json {
        let output = serde_json::json!({ "atm_strike": atm_strike, "plan": plan });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_plan(atm_strike, &plan);
    }
    Ok(())
}

fn print_plan(atm_strike: i64, plan: &CondorPlan) {
    let inner = &plan.inner;
    let obs = &plan.observation;

    println!("\n=== Volatility Range ===\n");
    println!("  Price          {:.2}", obs.last_traded_price);
    println!("  ATM strike     {atm_strike}");
    println!("  Days           {}", obs.trading_days_to_expiry);
    println!("  CIV            {:.2}%", inner.cumulative_iv);
    println!("  DV             {:.4}%", inner.daily_volatility);
    println!("  MV             {:.4}%", inner.period_volatility);
    println!("  Band ({}SD)     {:.2} .. {:.2}", inner.sd_multiplier, inner.lower_bound, inner.upper_bound);
    if let Some(outer) = &plan.outer {
        println!("  Band ({}SD)   {:.2} .. {:.2}", outer.sd_multiplier, outer.lower_bound, outer.upper_bound);
    }

    println!("\n=== Iron Condor ({}) ===\n", plan.policy);
    for order in plan.legs.orders() {
        println!("  {:<4} {} {}", order.action.to_string(), order.right, order.strike);
    }
    println!(
        "\n  Wings: put {} / call {}",
        plan.legs.put_wing_width(),
        plan.legs.call_wing_width()
    );
}
