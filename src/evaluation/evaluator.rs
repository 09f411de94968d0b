use tracing::debug;

use crate::coefficients::CoefficientStore;
use crate::evaluation::benefit::compute_benefits;
use crate::evaluation::choice::compute_choice;
use crate::evaluation::cost::{compute_cost, cost_breakdown};
use crate::evaluation::recommend::recommend;
use crate::evaluation::{Evaluation, EvaluationResult};
use crate::resolver::Configuration;

pub fn evaluate(store: &CoefficientStore, config: &Configuration) -> Evaluation {
    let choice = compute_choice(store, config);
    let benefit = compute_benefits(store, config, choice.uptake_prob);
    let cost = compute_cost(config);
    let result = build_result(choice.uptake_prob, benefit.total_benefit, cost.total_cost);
    let recommendation = recommend(result.uptake_prob, result.bcr);

    debug!(
        program = %config.program(),
        model = %config.preference_model(),
        uptake = result.uptake_prob,
        bcr = result.bcr,
        "evaluated configuration"
    );

    Evaluation {
        config: *config,
        cost_breakdown: cost_breakdown(store, config, cost.total_cost),
        choice,
        benefit,
        cost,
        result,
        recommendation,
        provisional_tables: store.is_provisional(config.preference_model()),
    }
}

pub fn build_result(uptake_prob: f64, total_benefit: f64, total_cost: f64) -> EvaluationResult {
    EvaluationResult {
        uptake_prob,
        total_benefit,
        total_cost,
        net_benefit: total_benefit - total_cost,
        bcr: benefit_cost_ratio(total_benefit, total_cost),
    }
}

/// Zero when there is no positive cost to divide by.
pub fn benefit_cost_ratio(total_benefit: f64, total_cost: f64) -> f64 {
    if total_cost > 0.0 {
        total_benefit / total_cost
    } else {
        0.0
    }
}
