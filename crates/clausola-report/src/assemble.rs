//! Report assembly: per-tier counts merged with the savings estimate.

use tracing::info;

use crate::cost::estimate_cost;
use clausola_core::{Clause, CostParams, Report, RiskLevel, Summary};

/// Count clauses per tier and attach the savings estimate.
pub fn summarize(clauses: &[Clause], params: &CostParams) -> Summary {
    let mut summary = Summary {
        n_clauses: clauses.len(),
        ..Default::default()
    };
    for clause in clauses {
        match clause.risk {
            RiskLevel::High => summary.n_high += 1,
            RiskLevel::Medium => summary.n_medium += 1,
            RiskLevel::Low => summary.n_low += 1,
        }
    }

    let estimate = estimate_cost(summary.n_clauses, params);
    summary.saved_time_min = estimate.saved_time_min;
    summary.saved_cost_eur = estimate.saved_cost;
    summary
}

/// Build the report for one document from its scored clauses.
pub fn assemble(clauses: Vec<Clause>, params: &CostParams) -> Report {
    let summary = summarize(&clauses, params);
    info!(
        "Report assembled: {} clauses ({} high, {} medium, {} low), {} min / {:.2} EUR saved",
        summary.n_clauses,
        summary.n_high,
        summary.n_medium,
        summary.n_low,
        summary.saved_time_min,
        summary.saved_cost_eur
    );
    Report {
        summary,
        ai_opinion: None,
        clauses,
    }
}
