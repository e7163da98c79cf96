//! Scenario runner for batch payoff simulations
//!
//! Holds one set of assumptions and runs many simulations against it in
//! parallel: extra-payment sweeps, strategy grids, or many households.

use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;

use crate::accounts::DebtAccount;
use crate::assumptions::PlanAssumptions;
use crate::error::LoadResult;
use crate::projection::{PayoffConfig, PayoffEngine, PayoffStrategy, SimulationResult};

/// One row of a sweep: a strategy and extra payment with its outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub strategy: PayoffStrategy,
    pub extra_payment: f64,
    pub months: u32,
    pub years: f64,
    pub payoff_date: NaiveDate,
    pub total_interest_paid: f64,
    /// Interest saved relative to paying no extra under the same strategy
    pub interest_saved: f64,
    pub hit_horizon_cap: bool,
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
/// let sweep = runner.run_extra_payment_sweep(&accounts, PayoffStrategy::Avalanche, &[0.0, 100.0, 250.0]);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    assumptions: PlanAssumptions,
    start_date: NaiveDate,
}

impl ScenarioRunner {
    /// Built-in assumptions, starting today
    pub fn new() -> Self {
        Self::with_assumptions(PlanAssumptions::standard())
    }

    /// Assumptions loaded from data/assumptions
    pub fn from_csv() -> LoadResult<Self> {
        Ok(Self::with_assumptions(PlanAssumptions::from_csv()?))
    }

    pub fn from_csv_path(path: &std::path::Path) -> LoadResult<Self> {
        Ok(Self::with_assumptions(PlanAssumptions::from_csv_path(path)?))
    }

    pub fn with_assumptions(assumptions: PlanAssumptions) -> Self {
        Self {
            assumptions,
            start_date: Local::now().date_naive(),
        }
    }

    /// Fix month 0 of every simulation
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn assumptions(&self) -> &PlanAssumptions {
        &self.assumptions
    }

    pub fn assumptions_mut(&mut self) -> &mut PlanAssumptions {
        &mut self.assumptions
    }

    fn config(&self, strategy: PayoffStrategy, extra_payment: f64) -> PayoffConfig {
        PayoffConfig {
            strategy,
            extra_payment,
            start_date: self.start_date,
            detailed_output: false,
        }
    }

    /// Run a single simulation with the given config
    pub fn run(&self, accounts: &[DebtAccount], config: PayoffConfig) -> SimulationResult {
        PayoffEngine::new(self.assumptions.debt.clone(), config).simulate(accounts)
    }

    /// Run several configs against the same accounts, in parallel
    pub fn run_scenarios(&self, accounts: &[DebtAccount], configs: &[PayoffConfig]) -> Vec<SimulationResult> {
        configs
            .par_iter()
            .map(|config| self.run(accounts, config.clone()))
            .collect()
    }

    /// Run the same config for many households, in parallel
    pub fn run_batch(&self, households: &[Vec<DebtAccount>], config: PayoffConfig) -> Vec<SimulationResult> {
        households
            .par_iter()
            .map(|accounts| self.run(accounts, config.clone()))
            .collect()
    }

    /// One simulation per extra-payment amount, in input order
    pub fn run_extra_payment_sweep(
        &self,
        accounts: &[DebtAccount],
        strategy: PayoffStrategy,
        extras: &[f64],
    ) -> Vec<SweepPoint> {
        let baseline = self.run(accounts, self.config(strategy, 0.0));

        extras
            .par_iter()
            .map(|&extra| {
                let result = self.run(accounts, self.config(strategy, extra));
                SweepPoint {
                    strategy,
                    extra_payment: result.extra_payment,
                    months: result.months,
                    years: result.years,
                    payoff_date: result.payoff_date,
                    total_interest_paid: result.total_interest_paid,
                    interest_saved: baseline.total_interest_paid - result.total_interest_paid,
                    hit_horizon_cap: result.hit_horizon_cap,
                }
            })
            .collect()
    }

    /// Sweep every extra payment under both strategies, avalanche first
    pub fn run_strategy_grid(&self, accounts: &[DebtAccount], extras: &[f64]) -> Vec<SweepPoint> {
        [PayoffStrategy::Avalanche, PayoffStrategy::Snowball]
            .into_iter()
            .flat_map(|strategy| self.run_extra_payment_sweep(accounts, strategy, extras))
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountType;

    fn accounts() -> Vec<DebtAccount> {
        vec![
            DebtAccount::new("cc", "Card", AccountType::CreditCard, 4800.0, 24.5, Some(145.0)),
            DebtAccount::new("pl", "Loan", AccountType::PersonalLoan, 9600.0, 11.75, Some(325.0)),
            DebtAccount::new("auto", "Car", AccountType::AutoLoan, 18_000.0, 6.5, Some(455.0)),
        ]
    }

    fn runner() -> ScenarioRunner {
        ScenarioRunner::new().with_start_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    }

    #[test]
    fn test_sweep_is_monotonic() {
        let sweep = runner().run_extra_payment_sweep(&accounts(), PayoffStrategy::Avalanche, &[0.0, 100.0, 250.0, 500.0]);
        assert_eq!(sweep.len(), 4);
        assert_eq!(sweep[0].interest_saved, 0.0);
        for pair in sweep.windows(2) {
            assert!(pair[1].months <= pair[0].months);
            assert!(pair[1].total_interest_paid <= pair[0].total_interest_paid);
            assert!(pair[1].interest_saved >= pair[0].interest_saved);
        }
    }

    #[test]
    fn test_strategy_grid_covers_both() {
        let grid = runner().run_strategy_grid(&accounts(), &[0.0, 200.0]);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0].strategy, PayoffStrategy::Avalanche);
        assert_eq!(grid[3].strategy, PayoffStrategy::Snowball);
        assert!(grid[1].total_interest_paid <= grid[3].total_interest_paid);
    }

    #[test]
    fn test_custom_horizon_from_assumptions() {
        let mut runner = runner();
        runner.assumptions_mut().debt.max_months = 12;
        let result = runner.run(&accounts(), runner.config(PayoffStrategy::Avalanche, 0.0));
        assert_eq!(result.months, 12);
        assert!(result.hit_horizon_cap);
    }

    #[test]
    fn test_batch_and_scenarios() {
        let runner = runner();
        let households = vec![accounts(), accounts()[..1].to_vec(), Vec::new()];
        let results = runner.run_batch(&households, runner.config(PayoffStrategy::Snowball, 50.0));
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].months, 0);
        assert!(results[1].months < results[0].months);

        let configs = vec![
            runner.config(PayoffStrategy::Avalanche, 0.0),
            runner.config(PayoffStrategy::Avalanche, 300.0),
        ];
        let scenarios = runner.run_scenarios(&accounts(), &configs);
        assert!(scenarios[1].total_interest_paid < scenarios[0].total_interest_paid);
    }
}
