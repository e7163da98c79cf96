//! Compound growth with monthly contributions

/// Monthly rate from an annual percentage
fn monthly_rate(annual_percent: f64) -> f64 {
    annual_percent / 100.0 / 12.0
}

/// Future value of `pv` plus `pmt` per month for `n` months at `annual_percent`.
///
/// `FV = PV(1+r)^n + PMT((1+r)^n - 1)/r`, `PV + PMT*n` when the rate is zero,
/// and `PV` when `n <= 0`.
pub fn project_balance(pv: f64, pmt: f64, n: i64, annual_percent: f64) -> f64 {
    if n <= 0 {
        return pv;
    }
    let r = monthly_rate(annual_percent);
    let growth = (1.0 + r).powf(n as f64);
    if r == 0.0 || growth == 1.0 {
        return pv + pmt * n as f64;
    }
    pv * growth + pmt * (growth - 1.0) / r
}

/// Monthly contribution that grows `pv` into `target` over `n` months.
/// Zero when growth alone reaches the target or when no months remain.
pub fn required_monthly_contribution(pv: f64, target: f64, n: i64, annual_percent: f64) -> f64 {
    if n <= 0 {
        return 0.0;
    }
    let shortfall = target - project_balance(pv, 0.0, n, annual_percent);
    if shortfall <= 0.0 {
        return 0.0;
    }

    let r = monthly_rate(annual_percent);
    let growth = (1.0 + r).powf(n as f64);
    // Rates too small to move (1+r)^n behave as zero
    if r == 0.0 || growth == 1.0 {
        return shortfall / n as f64;
    }
    shortfall * r / (growth - 1.0)
}

/// Month-by-month balances from month 0 through `n`
pub fn growth_path(pv: f64, pmt: f64, n: i64, annual_percent: f64) -> Vec<f64> {
    (0..=n.max(0)).map(|m| project_balance(pv, pmt, m, annual_percent)).collect()
}
