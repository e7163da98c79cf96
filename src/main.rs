//! Finance Engine CLI
//!
//! Command-line interface for debt payoff projections, debt risk analytics,
//! retirement plan evaluation and budget analytics.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use finance_engine::accounts::{self, loader::parse_date, DebtAccount};
use finance_engine::assumptions::PlanAssumptions;
use finance_engine::budget::{self, BudgetBook, TrendRange};
use finance_engine::projection::{self, DebtAnalytics, PayoffConfig, PayoffEngine, PayoffStrategy};
use finance_engine::retirement::{self, AfterTaxMode, PlanRequest, TaxDiversification, TaxRates};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliStrategy {
    Avalanche,
    Snowball,
}

impl From<CliStrategy> for PayoffStrategy {
    fn from(value: CliStrategy) -> Self {
        match value {
            CliStrategy::Avalanche => PayoffStrategy::Avalanche,
            CliStrategy::Snowball => PayoffStrategy::Snowball,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTaxMode {
    Flat,
    Bucketed,
    Custom,
}

impl From<CliTaxMode> for AfterTaxMode {
    fn from(value: CliTaxMode) -> Self {
        match value {
            CliTaxMode::Flat => AfterTaxMode::Flat,
            CliTaxMode::Bucketed => AfterTaxMode::Bucketed,
            CliTaxMode::Custom => AfterTaxMode::Custom,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "finance_engine",
    about = "Debt payoff and retirement projections for a personal-finance dashboard"
)]
struct Cli {
    /// Directory of assumption tables
    #[arg(long, global = true, default_value = "data/assumptions")]
    assumptions: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Month 0 of projections (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    start: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate paying down every account
    Payoff {
        #[arg(long)]
        accounts: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        extra: f64,
        #[arg(long, value_enum, default_value_t = CliStrategy::Avalanche)]
        strategy: CliStrategy,
        /// Print per-account monthly rows
        #[arg(long)]
        detailed: bool,
    },
    /// Snowball vs avalanche on the same accounts
    Compare {
        #[arg(long)]
        accounts: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        extra: f64,
    },
    /// Debt danger score
    Danger {
        #[arg(long)]
        accounts: PathBuf,
        /// Monthly income, defaults to the assumption table
        #[arg(long)]
        income: Option<f64>,
    },
    /// Balances after one month of configured payments
    NextMonth {
        #[arg(long)]
        accounts: PathBuf,
    },
    /// Totals, interest breakdown, amortization and what-if extra payment
    Summary {
        #[arg(long)]
        accounts: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        extra: f64,
        /// Total assets for net worth
        #[arg(long, default_value_t = 0.0)]
        assets: f64,
    },
    /// Evaluate the retirement plan and health score
    Retirement {
        #[arg(long)]
        accounts: PathBuf,
        /// Earlier monthly snapshots
        #[arg(long)]
        history: Option<PathBuf>,
        #[arg(long)]
        age: Option<f64>,
        /// Month being evaluated (YYYY-MM)
        #[arg(long)]
        as_of: Option<String>,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        one_time: Option<f64>,
        #[arg(long, value_enum, default_value_t = CliTaxMode::Bucketed)]
        tax_mode: CliTaxMode,
        /// Flat withdrawal tax rate in percent
        #[arg(long, default_value_t = 20.0)]
        flat_rate: f64,
    },
    /// Split a monthly contribution across tax buckets
    Allocate {
        /// Monthly amount; computed from the plan profile when omitted
        #[arg(long)]
        required: Option<f64>,
        /// Current balance used when computing the requirement
        #[arg(long)]
        balance: Option<f64>,
        #[arg(long)]
        age: Option<f64>,
    },
    /// Spending breakdown, trend and insights
    Budget {
        #[arg(long)]
        expenses: PathBuf,
        /// 1M, 3M, 6M, YTD, 1Y, 3Y, 5Y or All
        #[arg(long, default_value = "6M")]
        range: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let assumptions = load_assumptions(&cli.assumptions)?;
    let today = match cli.start.as_deref() {
        Some(raw) => parse_date(raw).context("invalid --start")?,
        None => Local::now().date_naive(),
    };

    match &cli.command {
        Command::Payoff {
            accounts,
            extra,
            strategy,
            detailed,
        } => {
            let debts = load_debts(accounts)?;
            let config = PayoffConfig {
                strategy: (*strategy).into(),
                extra_payment: *extra,
                start_date: today,
                detailed_output: *detailed,
            };
            let result = PayoffEngine::new(assumptions.debt.clone(), config).simulate(&debts);

            if cli.json {
                return print_json(&result);
            }
            println!("{} payoff, extra ${:.2}/mo", result.strategy, result.extra_payment);
            println!("  Starting balance: ${:.2}", result.starting_balance);
            println!("  Months: {} ({} years)", result.months, result.years);
            println!("  Payoff date: {}", result.payoff_date);
            println!("  Total interest: ${:.2}", result.total_interest_paid);
            if result.hit_horizon_cap {
                println!("  WARNING: balances remain after {} months", result.months);
            }
            if *detailed {
                println!();
                println!(
                    "{:>5} {:<16} {:>12} {:>10} {:>10} {:>10} {:>12}",
                    "Month", "Account", "BOP", "Interest", "Payment", "Extra", "EOP"
                );
                println!("{}", "-".repeat(81));
                for row in &result.rows {
                    println!(
                        "{:>5} {:<16} {:>12.2} {:>10.2} {:>10.2} {:>10.2} {:>12.2}",
                        row.month, row.account_id, row.bop_balance, row.interest, row.payment, row.extra_applied,
                        row.eop_balance
                    );
                }
            }
        }
        Command::Compare { accounts, extra } => {
            let debts = load_debts(accounts)?;
            let comparison = projection::compare_strategies_with(&assumptions.debt, &debts, *extra, today);

            if cli.json {
                return print_json(&comparison);
            }
            println!("{:<10} {:>7} {:>14} {:>12}", "Strategy", "Months", "Interest", "Payoff");
            println!("{}", "-".repeat(46));
            for result in [&comparison.avalanche, &comparison.snowball] {
                println!(
                    "{:<10} {:>7} {:>14.2} {:>12}",
                    result.strategy.to_string(),
                    result.months,
                    result.total_interest_paid,
                    result.payoff_date
                );
            }
            println!(
                "\nAvalanche saves ${:.2} in interest ({} is cheaper)",
                comparison.avalanche_interest_savings(),
                comparison.cheaper()
            );
        }
        Command::Danger { accounts, income } => {
            let debts = load_debts(accounts)?;
            let mut rules = assumptions.debt.clone();
            if let Some(income) = income {
                rules.monthly_income = *income;
            }
            let danger = projection::danger_score_with(&rules, &debts);

            if cli.json {
                return print_json(&danger);
            }
            println!("Danger score: {} ({})", danger.score, danger.category);
            println!(
                "  Weighted APR: {:.2}% -> {:.1}",
                danger.details.weighted_apr, danger.details.apr_score
            );
            println!(
                "  Debt-to-income: {:.2}% -> {:.1}",
                danger.details.dti_percent, danger.details.dti_score
            );
            for category in &danger.details.categories {
                println!(
                    "  {:<16} ${:>12.2} ({:.1}%, {} accounts)",
                    category.account_type.label(),
                    category.balance,
                    category.share_percent,
                    category.accounts
                );
            }
        }
        Command::NextMonth { accounts } => {
            let debts = load_debts(accounts)?;
            let next = projection::project_next_month(&debts);

            if cli.json {
                return print_json(&next);
            }
            println!("Next month");
            println!("  Interest: ${:.2}", next.projected_interest);
            println!("  Principal paid: ${:.2}", next.principal_paid);
            println!("  Projected balance: ${:.2}", next.projected_balance);
        }
        Command::Summary { accounts, extra, assets } => {
            let debts = load_debts(accounts)?;
            print_summary(&debts, &assumptions, today, *extra, *assets, cli.json)?;
        }
        Command::Retirement {
            accounts,
            history,
            age,
            as_of,
            target,
            one_time,
            tax_mode,
            flat_rate,
        } => {
            let buckets = accounts::load_retirement_accounts(accounts)
                .with_context(|| format!("loading {}", accounts.display()))?;
            let snapshots = match history {
                Some(path) => accounts::load_retirement_history(path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => Vec::new(),
            };
            let as_of = as_of.as_deref().map(parse_date).transpose().context("invalid --as-of")?;

            let request = PlanRequest {
                current_age: *age,
                as_of,
                target_portfolio_value: *target,
                actual_monthly_contribution: Some(buckets.iter().map(|b| b.contribution).sum()),
                one_time_additions: *one_time,
                accounts: buckets.clone(),
                ..Default::default()
            };
            let profile = &assumptions.profile;
            let plan = retirement::evaluate_plan(&request, profile, &snapshots, today);
            let diversification = TaxDiversification::from_accounts(&buckets);
            let contributions = request.actual_monthly_contribution.unwrap_or(0.0);
            let health = retirement::financial_health_score(Some(&plan), contributions, &diversification);
            let rates = TaxRates {
                flat: flat_rate / 100.0,
                ..TaxRates::default()
            };
            let tax_rate = retirement::effective_withdrawal_tax_rate(
                (*tax_mode).into(),
                &rates,
                &buckets,
                plan.remaining_months,
                profile.annual_return_percent,
            );

            if cli.json {
                #[derive(Serialize)]
                struct RetirementReport<'a> {
                    plan: &'a retirement::RetirementPlanResult,
                    health: &'a retirement::HealthScore,
                    diversification: &'a TaxDiversification,
                    effective_withdrawal_tax_rate: f64,
                }
                return print_json(&RetirementReport {
                    plan: &plan,
                    health: &health,
                    diversification: &diversification,
                    effective_withdrawal_tax_rate: tax_rate,
                });
            }

            println!("Retirement plan as of {}: {}", plan.as_of, plan.status);
            println!("  Target path balance: ${:.2}", plan.current_target_balance);
            println!("  Actual balance: ${:.2}", plan.actual_balance);
            println!("  Difference: ${:.2} ({:+.2}%)", plan.difference_amount, plan.difference_percent);
            println!("  Months to target age: {}", plan.remaining_months);
            if let Some(required) = plan.required_monthly_contribution {
                println!("  Required monthly contribution: ${required:.2}");
            }
            println!("  {}", plan.commentary);

            if !plan.account_scorecards.is_empty() {
                println!();
                println!(
                    "{:<14} {:>12} {:>12} {:>12} {:>8}  {}",
                    "Account", "Balance", "YTD Contrib", "YTD Growth", "Growth%", "Status"
                );
                for card in &plan.account_scorecards {
                    println!(
                        "{:<14} {:>12.2} {:>12.2} {:>12.2} {:>8.2}  {}",
                        card.account_type,
                        card.balance,
                        card.ytd_contributions,
                        card.ytd_growth_dollars,
                        card.ytd_growth_percent,
                        card.status.label()
                    );
                }
            }

            println!();
            println!(
                "Tax mix: {:.1}% tax-free, {:.1}% tax-deferred, {:.1}% taxable",
                diversification.tax_free_percent, diversification.tax_deferred_percent, diversification.taxable_percent
            );
            println!("Effective withdrawal tax rate: {:.2}%", tax_rate * 100.0);
            println!();
            println!("Health score: {}", health.score);
            for adjustment in &health.adjustments {
                println!("  {:+.1}  {}", adjustment.points, adjustment.reason);
            }
            println!("  Next step: {}", health.action);
        }
        Command::Allocate { required, balance, age } => {
            let profile = &assumptions.profile;
            let monthly = match required {
                Some(amount) => *amount,
                None => {
                    let age = age.unwrap_or(profile.start_age);
                    retirement::required_monthly_contribution(
                        balance.unwrap_or(profile.starting_balance),
                        profile.target_portfolio_value,
                        profile.remaining_months(age),
                        profile.annual_return_percent,
                    )
                }
            };
            let allocations = retirement::allocate_contributions(monthly, &assumptions.limits);

            if cli.json {
                return print_json(&allocations);
            }
            println!("Allocating ${monthly:.2}/mo");
            for allocation in &allocations {
                let cap = allocation
                    .monthly_cap
                    .map(|c| format!("{c:.2}"))
                    .unwrap_or_else(|| "none".to_string());
                println!(
                    "  {:<10} ${:>10.2}  (cap {})",
                    allocation.bucket.label(),
                    allocation.monthly_amount,
                    cap
                );
            }
        }
        Command::Budget { expenses, range } => {
            let expenses = accounts::load_expenses(expenses)
                .with_context(|| format!("loading {}", expenses.display()))?;
            let range: TrendRange = range.parse()?;
            print_budget(&expenses, range, today, &assumptions, cli.json)?;
        }
    }

    Ok(())
}

fn load_assumptions(dir: &Path) -> Result<PlanAssumptions> {
    PlanAssumptions::from_csv_path(dir).with_context(|| format!("loading assumptions from {}", dir.display()))
}

fn load_debts(path: &Path) -> Result<Vec<DebtAccount>> {
    accounts::load_debt_accounts(path).with_context(|| format!("loading {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(
    debts: &[DebtAccount],
    assumptions: &PlanAssumptions,
    today: NaiveDate,
    extra: f64,
    assets: f64,
    json: bool,
) -> Result<()> {
    let analytics = DebtAnalytics::new(assumptions.debt.clone(), today);
    let summary = projection::debt_summary(debts);
    let interest = projection::interest_breakdown(debts);
    let amortization: Vec<_> = debts.iter().map(|d| projection::amortize(d, today)).collect();
    let by_category = analytics.payoff_timeline_by_category(debts, extra);
    let trap = analytics.minimum_payment_trap(debts);
    let what_if = analytics.simulate_extra_payment(debts, extra, PayoffStrategy::Avalanche);
    let net_worth = projection::net_worth(assets, summary.total_debt);

    if json {
        #[derive(Serialize)]
        struct SummaryReport<'a> {
            summary: &'a projection::DebtSummary,
            interest: &'a projection::InterestBreakdown,
            high_apr: Vec<&'a str>,
            priorities: Vec<(String, Option<u32>)>,
            amortization: &'a [projection::AmortizationSummary],
            minimum_payment_trap: &'a projection::MinimumPaymentTrap,
            months_saved: i64,
            interest_saved: f64,
            net_worth: f64,
        }
        return print_json(&SummaryReport {
            summary: &summary,
            interest: &interest,
            high_apr: projection::high_apr_accounts(debts, 3)
                .into_iter()
                .map(|a| a.id.as_str())
                .collect(),
            priorities: projection::payoff_priorities(debts),
            amortization: &amortization,
            minimum_payment_trap: &trap,
            months_saved: what_if.months_saved,
            interest_saved: what_if.interest_saved,
            net_worth,
        });
    }

    println!("Total debt: ${:.2} across {} accounts ({} active)", summary.total_debt, summary.total_accounts, summary.active_accounts);
    println!("  Credit cards: ${:.2}", summary.credit_card_debt);
    println!("  Personal loans: ${:.2}", summary.personal_loan_debt);
    println!("  Auto loans: ${:.2}", summary.auto_loan_debt);
    println!("  Other: ${:.2}", summary.other_debt);
    println!("Monthly payments: ${:.2}, monthly interest: ${:.2}", summary.total_monthly_payment, interest.total);
    println!("Net worth: ${net_worth:.2}");

    println!();
    println!("{:<16} {:>10} {:>8} {:>12}", "Account", "Principal", "Months", "Payoff");
    for row in &amortization {
        println!(
            "{:<16} {:>10.2} {:>8} {:>12}",
            row.account_id,
            row.principal_per_month,
            row.months_left.map(|m| m.to_string()).unwrap_or_else(|| "never".to_string()),
            row.payoff_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
        );
    }

    println!();
    println!("Payoff by category (avalanche, extra ${extra:.2}):");
    for (label, result) in [
        ("Credit cards", &by_category.credit_cards),
        ("Personal loans", &by_category.personal_loans),
        ("Auto loans", &by_category.auto_loans),
        ("Overall", &by_category.overall),
    ] {
        println!(
            "  {:<15} {:>4} months  ${:>10.2} interest",
            label, result.months, result.total_interest_paid
        );
    }
    println!(
        "Minimum payments only: {} years, ${:.2} interest",
        trap.years, trap.total_interest
    );
    if extra > 0.0 {
        println!(
            "Adding ${extra:.2}/mo saves {} months and ${:.2}",
            what_if.months_saved, what_if.interest_saved
        );
    }
    Ok(())
}

fn print_budget(
    expenses: &[budget::Expense],
    range: TrendRange,
    today: NaiveDate,
    assumptions: &PlanAssumptions,
    json: bool,
) -> Result<()> {
    let book = BudgetBook::new(assumptions.budget.expense_budget);
    let this_month = budget::expenses_in_month(expenses, today.year(), today.month());
    let last_month_start = today
        .with_day(1)
        .and_then(|d| d.checked_sub_months(chrono::Months::new(1)))
        .context("date out of range")?;
    let last_month = budget::expenses_in_month(expenses, last_month_start.year(), last_month_start.month());

    let breakdown = budget::category_breakdown(&this_month);
    let trend = budget::trend_stats(expenses, range, today, &book);
    let insights = budget::generate_insights(&this_month, &last_month);
    let spent: f64 = this_month.iter().map(|e| e.amount).sum();
    let progress = budget::budget_progress(spent, book.for_date(today));

    if json {
        #[derive(Serialize)]
        struct BudgetReport<'a> {
            progress: &'a budget::BudgetProgress,
            categories: &'a [budget::CategorySpend],
            trend: &'a [budget::PeriodStats],
            insights: &'a [budget::Insight],
        }
        return print_json(&BudgetReport {
            progress: &progress,
            categories: &breakdown,
            trend: &trend,
            insights: &insights,
        });
    }

    println!(
        "Spent ${:.2} of ${:.2} this month ({:.0}%)",
        progress.spent, progress.budget, progress.percent
    );
    for category in &breakdown {
        println!("  {:<14} ${:>9.2} {:>5.1}%", category.category, category.amount, category.percentage);
    }
    println!();
    for period in &trend {
        let flag = if period.is_over_budget { " over" } else { "" };
        println!("  {:<9} ${:>9.2} / ${:>9.2}{}", period.label, period.total_spent, period.budget, flag);
    }
    if !insights.is_empty() {
        println!();
        for insight in &insights {
            println!("  [{:?}] {} {}", insight.kind, insight.message, insight.details);
        }
    }
    Ok(())
}
