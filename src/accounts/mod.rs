//! Debt and retirement account records plus file loaders

mod data;
pub mod loader;

pub use data::{AccountStatus, AccountType, DebtAccount, GoalType, RetirementAccount};
pub use loader::{
    load_debt_accounts, load_debt_accounts_from_reader, load_debt_accounts_json, load_expenses,
    load_expenses_from_reader,
    load_retirement_accounts, load_retirement_accounts_from_reader, load_retirement_history,
    load_retirement_history_from_reader,
};
