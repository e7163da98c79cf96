//! Month-by-month payoff simulation for a group of debt accounts

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::state::{PayoffState, SimAccount};
use super::timeline::{MonthlyPayoffRow, SimulationResult, StrategyComparison, TimelinePoint};
use crate::accounts::DebtAccount;
use crate::assumptions::DebtAssumptions;

/// Order in which accounts receive the extra payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoffStrategy {
    /// Highest APR first
    #[default]
    Avalanche,
    /// Smallest balance first
    Snowball,
}

impl PayoffStrategy {
    /// Ordering between two active accounts
    fn compare(self, a: &SimAccount, b: &SimAccount) -> Ordering {
        match self {
            PayoffStrategy::Avalanche => b.apr.total_cmp(&a.apr),
            PayoffStrategy::Snowball => a.balance.total_cmp(&b.balance),
        }
    }
}

impl FromStr for PayoffStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avalanche" => Ok(PayoffStrategy::Avalanche),
            "snowball" => Ok(PayoffStrategy::Snowball),
            other => Err(format!("unknown strategy '{other}' (expected avalanche or snowball)")),
        }
    }
}

impl fmt::Display for PayoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoffStrategy::Avalanche => f.write_str("Avalanche"),
            PayoffStrategy::Snowball => f.write_str("Snowball"),
        }
    }
}

/// Configuration for a payoff run
#[derive(Debug, Clone)]
pub struct PayoffConfig {
    pub strategy: PayoffStrategy,

    /// Extra money applied every month on top of scheduled payments
    pub extra_payment: f64,

    /// Month 0 of the timeline
    pub start_date: NaiveDate,

    /// Whether to record per-account monthly rows
    pub detailed_output: bool,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            strategy: PayoffStrategy::Avalanche,
            extra_payment: 0.0,
            start_date: Local::now().date_naive(),
            detailed_output: false,
        }
    }
}

/// Payoff simulation engine
pub struct PayoffEngine {
    rules: DebtAssumptions,
    config: PayoffConfig,
}

impl PayoffEngine {
    pub fn new(rules: DebtAssumptions, config: PayoffConfig) -> Self {
        Self { rules, config }
    }

    pub fn config(&self) -> &PayoffConfig {
        &self.config
    }

    /// Simulate paying down `accounts` until every balance is zero or the horizon is reached.
    /// The caller's accounts are never touched.
    pub fn simulate(&self, accounts: &[DebtAccount]) -> SimulationResult {
        let extra = self.config.extra_payment.max(0.0);
        let mut working: Vec<SimAccount> = accounts.iter().map(SimAccount::from_account).collect();
        let mut state = PayoffState::new(self.config.start_date);
        let mut result = SimulationResult::new(self.config.strategy, extra, self.config.start_date);

        result.starting_balance = total_balance(&working);
        result.add_point(TimelinePoint {
            month: 0,
            date: state.date,
            balance: result.starting_balance,
        });

        for acc in working.iter().filter(|a| a.is_active()) {
            if acc.scheduled_payment(&self.rules) <= acc.monthly_interest() {
                warn!(
                    "Account {} payment of {:.2} does not cover {:.2} monthly interest",
                    acc.id,
                    acc.scheduled_payment(&self.rules),
                    acc.monthly_interest()
                );
            }
        }

        debug!(
            "Simulating {} accounts ({} strategy, extra {:.2}, balance {:.2})",
            working.len(),
            self.config.strategy,
            extra,
            result.starting_balance
        );

        while working.iter().any(SimAccount::is_active) && state.month < self.rules.max_months {
            state.advance_month(extra);
            self.order_accounts(&mut working);
            self.pay_month(&mut working, &mut state, &mut result.rows);

            result.add_point(TimelinePoint {
                month: state.month,
                date: state.date,
                balance: total_balance(&working),
            });
        }

        result.months = state.month;
        result.years = (state.month as f64 / 12.0 * 10.0).round() / 10.0;
        result.payoff_date = state.date;
        result.total_interest_paid = state.total_interest_paid;
        result.hit_horizon_cap = working.iter().any(SimAccount::is_active);

        if result.hit_horizon_cap {
            warn!(
                "Balances still outstanding after {} months ({:.2} remaining)",
                state.month,
                result.final_balance()
            );
        }

        debug!(
            "Payoff in {} months, {:.2} total interest",
            result.months, result.total_interest_paid
        );

        result
    }

    /// Paid-off accounts last; active accounts by strategy
    fn order_accounts(&self, accounts: &mut [SimAccount]) {
        let strategy = self.config.strategy;
        accounts.sort_by(|a, b| match (a.is_active(), b.is_active()) {
            (true, true) => strategy.compare(a, b),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        });
    }

    /// Apply one month of interest and payments. The first active account takes the
    /// extra pool; anything paid beyond an account's balance flows to the next one.
    fn pay_month(
        &self,
        accounts: &mut [SimAccount],
        state: &mut PayoffState,
        rows: &mut Vec<MonthlyPayoffRow>,
    ) {
        for acc in accounts.iter_mut().filter(|a| a.is_active()) {
            let bop_balance = acc.balance;
            let interest = acc.monthly_interest();
            state.total_interest_paid += interest;

            let scheduled = acc.scheduled_payment(&self.rules);
            let mut payment = scheduled + state.drain_pool();

            let owed = acc.balance + interest;
            if payment > owed {
                state.pool += payment - owed;
                payment = owed;
            }

            let principal = payment - interest;
            acc.balance -= principal;
            if acc.balance < self.rules.dust_threshold {
                acc.balance = 0.0;
            }

            if self.config.detailed_output {
                rows.push(MonthlyPayoffRow {
                    month: state.month,
                    account_id: acc.id.clone(),
                    bop_balance,
                    interest,
                    scheduled_payment: scheduled,
                    extra_applied: (payment - scheduled).max(0.0),
                    payment,
                    principal,
                    eop_balance: acc.balance,
                });
            }
        }
    }
}

fn total_balance(accounts: &[SimAccount]) -> f64 {
    accounts.iter().map(|a| a.balance).sum()
}

/// Simulate a group payoff with the standard payment rules, starting today
pub fn simulate_group_payoff(
    accounts: &[DebtAccount],
    extra_payment: f64,
    strategy: PayoffStrategy,
) -> SimulationResult {
    let config = PayoffConfig {
        strategy,
        extra_payment,
        ..Default::default()
    };
    PayoffEngine::new(DebtAssumptions::default(), config).simulate(accounts)
}

/// Run snowball and avalanche on the same inputs
pub fn compare_strategies(accounts: &[DebtAccount], extra_payment: f64) -> StrategyComparison {
    compare_strategies_with(&DebtAssumptions::default(), accounts, extra_payment, Local::now().date_naive())
}

pub fn compare_strategies_with(
    rules: &DebtAssumptions,
    accounts: &[DebtAccount],
    extra_payment: f64,
    start_date: NaiveDate,
) -> StrategyComparison {
    let run = |strategy| {
        let config = PayoffConfig {
            strategy,
            extra_payment,
            start_date,
            detailed_output: false,
        };
        PayoffEngine::new(rules.clone(), config).simulate(accounts)
    };

    StrategyComparison {
        snowball: run(PayoffStrategy::Snowball),
        avalanche: run(PayoffStrategy::Avalanche),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountType;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    fn engine(strategy: PayoffStrategy, extra: f64, detailed: bool) -> PayoffEngine {
        PayoffEngine::new(
            DebtAssumptions::default(),
            PayoffConfig {
                strategy,
                extra_payment: extra,
                start_date: start(),
                detailed_output: detailed,
            },
        )
    }

    fn card(id: &str, balance: f64, apr: f64, payment: f64) -> DebtAccount {
        DebtAccount::new(id, id, AccountType::CreditCard, balance, apr, Some(payment))
    }

    fn mixed_accounts() -> Vec<DebtAccount> {
        vec![
            card("store", 900.0, 27.0, 40.0),
            card("travel", 6400.0, 22.5, 190.0),
            DebtAccount::new("loan", "Loan", AccountType::PersonalLoan, 2500.0, 11.0, Some(110.0)),
            DebtAccount::new("car", "Car", AccountType::AutoLoan, 14000.0, 5.9, Some(320.0)),
        ]
    }

    #[test]
    fn test_first_month_of_single_card() {
        let accounts = vec![card("cc", 3000.0, 20.0, 120.0)];
        let result = engine(PayoffStrategy::Avalanche, 0.0, true).simulate(&accounts);

        let first = &result.rows[0];
        assert_relative_eq!(first.interest, 50.0, epsilon = 1e-9);
        assert_relative_eq!(first.principal, 70.0, epsilon = 1e-9);
        assert_relative_eq!(first.eop_balance, 2930.0, epsilon = 1e-9);
        assert_relative_eq!(result.timeline[1].balance, 2930.0, epsilon = 1e-9);
        assert_eq!(result.timeline[1].date, NaiveDate::from_ymd_opt(2026, 2, 15).unwrap());
    }

    #[test]
    fn test_empty_accounts() {
        let result = engine(PayoffStrategy::Avalanche, 100.0, false).simulate(&[]);
        assert_eq!(result.months, 0);
        assert_eq!(result.total_interest_paid, 0.0);
        assert_eq!(result.timeline.len(), 1);
        assert_eq!(result.timeline[0].balance, 0.0);
        assert_eq!(result.timeline[0].date, start());
        assert_eq!(result.payoff_date, start());
        assert!(!result.hit_horizon_cap);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let accounts = mixed_accounts();
        let before = accounts.clone();
        let _ = engine(PayoffStrategy::Snowball, 200.0, false).simulate(&accounts);
        assert_eq!(accounts, before);
    }

    #[test]
    fn test_avalanche_extra_goes_to_highest_apr_then_rolls() {
        let accounts = vec![
            DebtAccount::new("A", "A", AccountType::CreditCard, 1000.0, 25.0, Some(50.0)),
            DebtAccount::new("B", "B", AccountType::PersonalLoan, 5000.0, 10.0, Some(100.0)),
        ];
        let result = engine(PayoffStrategy::Avalanche, 50.0, true).simulate(&accounts);

        let a_rows: Vec<_> = result.rows_for("A").collect();
        let a_paid_month = a_rows.last().unwrap().month;
        assert_eq!(a_rows.last().unwrap().eop_balance, 0.0);

        for row in &a_rows[..a_rows.len() - 1] {
            assert_relative_eq!(row.extra_applied, 50.0, epsilon = 1e-9);
        }
        for row in result.rows_for("B").filter(|r| r.month < a_paid_month) {
            assert_eq!(row.extra_applied, 0.0);
        }
        let b_rows: Vec<_> = result.rows_for("B").collect();
        let b_last = b_rows.last().unwrap();
        assert_eq!(b_last.eop_balance, 0.0);
        // Final month: scheduled payment alone covers the balance
        assert_eq!(b_last.extra_applied, 0.0);
        for row in b_rows.iter().filter(|r| r.month > a_paid_month) {
            let headroom = row.bop_balance + row.interest - row.scheduled_payment;
            assert_relative_eq!(row.extra_applied, 50.0_f64.min(headroom).max(0.0), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_overpayment_waterfalls_within_month() {
        // Small card is cleared in month 1; what it doesn't need lands on the loan
        let accounts = vec![
            card("small", 30.0, 24.0, 25.0),
            DebtAccount::new("loan", "Loan", AccountType::PersonalLoan, 2000.0, 8.0, Some(100.0)),
        ];
        let result = engine(PayoffStrategy::Avalanche, 100.0, true).simulate(&accounts);

        let small = result.rows_for("small").next().unwrap();
        assert_eq!(small.eop_balance, 0.0);
        assert_relative_eq!(small.payment, 30.0 + 0.6, epsilon = 1e-9);

        let loan = result.rows_for("loan").next().unwrap();
        let overflow = 125.0 - small.payment;
        assert_relative_eq!(loan.extra_applied, overflow, epsilon = 1e-9);
    }

    #[test]
    fn test_snowball_targets_smallest_balance() {
        let accounts = vec![
            card("big-high", 8000.0, 29.0, 200.0),
            card("small-low", 600.0, 12.0, 30.0),
        ];
        let result = engine(PayoffStrategy::Snowball, 100.0, true).simulate(&accounts);
        let first_small = result.rows_for("small-low").next().unwrap();
        assert_relative_eq!(first_small.extra_applied, 100.0, epsilon = 1e-9);
        let first_big = result.rows_for("big-high").next().unwrap();
        assert_eq!(first_big.extra_applied, 0.0);
    }

    #[test]
    fn test_unpayable_balance_hits_cap() {
        // $25 floor against $62.50 of monthly interest
        let accounts = vec![card("trap", 3000.0, 25.0, 10.0)];
        let result = engine(PayoffStrategy::Avalanche, 0.0, false).simulate(&accounts);
        assert_eq!(result.months, 360);
        assert!(result.hit_horizon_cap);
        assert_eq!(result.timeline.len(), 361);
        assert!(result.final_balance() > 3000.0);
        assert_eq!(result.payoff_date, NaiveDate::from_ymd_opt(2056, 1, 15).unwrap());
    }

    #[test]
    fn test_missing_payment_uses_fallback() {
        let accounts = vec![DebtAccount::new("x", "X", AccountType::PersonalLoan, 1000.0, 0.0, None)];
        let result = engine(PayoffStrategy::Avalanche, 0.0, true).simulate(&accounts);
        // 2% of 1000 is below the $25 floor
        assert_relative_eq!(result.rows[0].payment, 25.0);
        assert_eq!(result.months, 40);
        assert_eq!(result.total_interest_paid, 0.0);
    }

    #[test]
    fn test_avalanche_beats_snowball_on_interest() {
        let comparison = compare_strategies_with(&DebtAssumptions::default(), &mixed_accounts(), 250.0, start());
        assert!(comparison.avalanche.total_interest_paid <= comparison.snowball.total_interest_paid);
        assert!(comparison.avalanche_interest_savings() >= 0.0);
        assert_eq!(comparison.cheaper(), PayoffStrategy::Avalanche);
        assert_eq!(comparison.snowball.strategy, PayoffStrategy::Snowball);
    }

    #[test]
    fn test_years_rounded_to_one_decimal() {
        let accounts = vec![card("cc", 1000.0, 0.0, 100.0)];
        let result = engine(PayoffStrategy::Avalanche, 0.0, false).simulate(&accounts);
        assert_eq!(result.months, 10);
        assert_eq!(result.years, 0.8);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Snowball".parse::<PayoffStrategy>().unwrap(), PayoffStrategy::Snowball);
        assert!("random".parse::<PayoffStrategy>().is_err());
        assert_eq!(PayoffStrategy::default(), PayoffStrategy::Avalanche);
    }

    fn payable_accounts() -> impl Strategy<Value = Vec<DebtAccount>> {
        prop::collection::vec((100u32..20_000, 0u32..3000, 0u32..4), 0..6).prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (balance, apr_bp, kind))| {
                    let balance = balance as f64;
                    let apr = apr_bp as f64 / 100.0;
                    // Comfortably above the first month's interest
                    let payment = balance * (apr / 100.0 / 12.0) + balance / 120.0 + 10.0;
                    let account_type = match kind {
                        0 => AccountType::CreditCard,
                        1 => AccountType::PersonalLoan,
                        _ => AccountType::AutoLoan,
                    };
                    DebtAccount::new(format!("acc-{i}"), "acc", account_type, balance, apr, Some(payment))
                })
                .collect()
        })
    }

    fn any_strategy() -> impl Strategy<Value = PayoffStrategy> {
        prop_oneof![Just(PayoffStrategy::Avalanche), Just(PayoffStrategy::Snowball)]
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_extra_payment_never_costs_more(
            accounts in payable_accounts(),
            extra in 1u32..1500,
            strategy in any_strategy(),
        ) {
            let base = engine(strategy, 0.0, false).simulate(&accounts);
            let boosted = engine(strategy, extra as f64, false).simulate(&accounts);
            prop_assert!(boosted.total_interest_paid <= base.total_interest_paid + 1e-6);
            prop_assert!(boosted.months <= base.months);
        }

        #[test]
        fn prop_timeline_non_increasing_and_reaches_zero(
            accounts in payable_accounts(),
            extra in 0u32..500,
            strategy in any_strategy(),
        ) {
            let result = engine(strategy, extra as f64, false).simulate(&accounts);
            prop_assert_eq!(result.timeline.len() as u32, result.months + 1);
            for pair in result.timeline.windows(2) {
                prop_assert!(pair[1].balance <= pair[0].balance + 1e-6);
            }
            prop_assert!(result.months <= 360);
            prop_assert_eq!(result.final_balance(), 0.0);
            prop_assert!(!result.hit_horizon_cap);
        }
    }
}
