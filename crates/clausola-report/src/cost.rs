//! Time and cost savings estimate.

use serde::Serialize;

use clausola_core::CostParams;

/// Savings for reviewing `n` clauses with assisted analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    pub current_time_min: f64,
    pub reduced_time_min: f64,
    /// Whole minutes saved. Fractions are dropped, not rounded.
    pub saved_time_min: u64,
    /// Rounded to two decimals.
    pub saved_cost: f64,
}

/// Estimate the minutes and money saved on `n_clauses`.
///
/// `params.efficiency` must lie in `[0, 1]`.
pub fn estimate_cost(n_clauses: usize, params: &CostParams) -> CostEstimate {
    debug_assert!(
        (0.0..=1.0).contains(&params.efficiency),
        "efficiency out of range: {}",
        params.efficiency
    );

    let current_time_min = n_clauses as f64 * f64::from(params.minutes_per_clause);
    let reduced_time_min = current_time_min * (1.0 - params.efficiency);
    let saved_time_min = current_time_min - reduced_time_min;
    let saved_cost = (saved_time_min / 60.0) * params.hourly_rate;

    CostEstimate {
        current_time_min,
        reduced_time_min,
        saved_time_min: saved_time_min.trunc() as u64,
        saved_cost: round2(saved_cost),
    }
}

/// Two-decimal rounding of the exact binary value, so ties such as
/// 0.125 (stored exactly) go to even and 2.675 (stored just below) goes down.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(efficiency: f64, hourly_rate: f64) -> CostParams {
        CostParams {
            efficiency,
            hourly_rate,
            minutes_per_clause: 15,
        }
    }

    #[test]
    fn test_zero_clauses() {
        let est = estimate_cost(0, &CostParams::default());
        assert_eq!(est.saved_time_min, 0);
        assert_eq!(est.saved_cost, 0.0);
    }

    #[test]
    fn test_ten_clauses_defaults() {
        let est = estimate_cost(10, &CostParams::default());
        assert_eq!(est.current_time_min, 150.0);
        assert_eq!(est.saved_time_min, 120);
        assert_eq!(est.saved_cost, 200.0);
    }

    #[test]
    fn test_cost_ties_round_half_even() {
        // 7.5 minutes at 1/h = 0.125 exactly
        assert_eq!(estimate_cost(1, &params(0.5, 1.0)).saved_cost, 0.12);
        // 22.5 minutes at 1/h = 0.375 exactly
        assert_eq!(estimate_cost(3, &params(0.5, 1.0)).saved_cost, 0.38);
    }

    #[test]
    fn test_round2_uses_binary_value() {
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(8.3325), 8.33);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(200.0), 200.0);
    }

    #[test]
    fn test_saved_minutes_truncate() {
        // 15 min at 50%: 7.5 minutes saved, reported as 7
        let est = estimate_cost(1, &params(0.5, 100.0));
        assert_eq!(est.saved_time_min, 7);
        assert_eq!(est.saved_cost, 12.5);
    }

    #[test]
    fn test_cost_rounded_to_cents() {
        // 2 clauses, 30 min, half saved = 15 min at 33.33/h = 8.3325
        let est = estimate_cost(2, &params(0.5, 33.33));
        assert_eq!(est.saved_time_min, 15);
        assert_eq!(est.saved_cost, 8.33);
    }

    #[test]
    fn test_single_clause_defaults() {
        let est = estimate_cost(1, &CostParams::default());
        assert_eq!(est.saved_time_min, 12);
        assert_eq!(est.saved_cost, 20.0);
    }
}
