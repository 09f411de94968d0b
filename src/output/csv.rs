use anyhow::Result;

use crate::analysis::{SensitivityPoint, SimulationResult};
use crate::attributes::AttributeLevel;
use crate::evaluation::{Evaluation, Recommendation};
use crate::scenario::{SavedScenario, ScenarioComparison};

fn verdict_field(recommendation: Option<&Recommendation>) -> String {
    recommendation
        .map(|r| r.verdict.as_slug().to_string())
        .unwrap_or_default()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn evaluation_to_csv(evaluation: &Evaluation) -> Result<String> {
    let config = &evaluation.config;
    let result = &evaluation.result;
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "preference_model",
        "program",
        "career",
        "mentorship",
        "delivery",
        "response",
        "cohort_size",
        "duration_months",
        "cost_per_trainee",
        "include_opportunity_cost",
        "uptake_prob",
        "total_benefit",
        "total_cost",
        "net_benefit",
        "bcr",
        "verdict",
    ])?;
    writer.write_record([
        config.preference_model().as_slug().to_string(),
        config.levels().program.as_slug().to_string(),
        config.levels().career.as_slug().to_string(),
        config.levels().mentorship.as_slug().to_string(),
        config.levels().delivery.as_slug().to_string(),
        config.levels().response.as_slug().to_string(),
        config.cohort_size().to_string(),
        config.duration_months().to_string(),
        format!("{:.2}", config.cost_per_trainee()),
        config.include_opportunity_cost().to_string(),
        format!("{:.6}", result.uptake_prob),
        format!("{:.2}", result.total_benefit),
        format!("{:.2}", result.total_cost),
        format!("{:.2}", result.net_benefit),
        format!("{:.4}", result.bcr),
        verdict_field(evaluation.recommendation.as_ref()),
    ])?;
    finish(writer)
}

pub fn contributions_to_csv(evaluation: &Evaluation) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["attribute", "level", "is_reference", "wtp_thousands"])?;
    for contribution in &evaluation.benefit.contributions {
        writer.write_record([
            contribution.attribute.as_slug().to_string(),
            contribution.level.clone(),
            contribution.is_reference.to_string(),
            format!("{:.2}", contribution.value),
        ])?;
    }
    finish(writer)
}

pub fn sensitivity_to_csv(points: &[SensitivityPoint]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "multiplier",
        "cost_per_trainee",
        "uptake_prob",
        "total_benefit",
        "total_cost",
        "net_benefit",
        "bcr",
        "verdict",
    ])?;
    for point in points {
        writer.write_record([
            format!("{:.1}", point.multiplier),
            format!("{:.2}", point.cost_per_trainee),
            format!("{:.6}", point.result.uptake_prob),
            format!("{:.2}", point.result.total_benefit),
            format!("{:.2}", point.result.total_cost),
            format!("{:.2}", point.result.net_benefit),
            format!("{:.4}", point.result.bcr),
            verdict_field(point.recommendation.as_ref()),
        ])?;
    }
    finish(writer)
}

pub fn simulation_to_csv(result: &SimulationResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "num_cohorts",
        "cohort_size",
        "total_cost",
        "total_benefit",
        "total_net",
        "effective_graduates",
        "district_coverage",
        "outbreaks_averted",
        "epi_benefit_total",
    ])?;
    writer.write_record([
        result.assumptions.num_cohorts.to_string(),
        result.cohort_size.to_string(),
        format!("{:.2}", result.total_cost),
        format!("{:.2}", result.total_benefit),
        format!("{:.2}", result.total_net),
        format!("{:.3}", result.effective_graduates),
        format!("{:.3}", result.district_coverage),
        format!("{:.3}", result.outbreaks_averted),
        format!("{:.2}", result.epi_benefit_total),
    ])?;
    finish(writer)
}

pub fn scenarios_to_csv(scenarios: &[SavedScenario]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "index",
        "name",
        "preference_model",
        "program",
        "career",
        "mentorship",
        "delivery",
        "response",
        "cohort_size",
        "cost_per_trainee",
        "uptake_prob",
        "total_benefit",
        "total_cost",
        "net_benefit",
        "bcr",
        "verdict",
        "saved_at",
    ])?;
    for scenario in scenarios {
        let levels = scenario.config.levels();
        writer.write_record([
            scenario.index.to_string(),
            scenario.name.clone(),
            scenario.config.preference_model().as_slug().to_string(),
            levels.program.as_slug().to_string(),
            levels.career.as_slug().to_string(),
            levels.mentorship.as_slug().to_string(),
            levels.delivery.as_slug().to_string(),
            levels.response.as_slug().to_string(),
            scenario.config.cohort_size().to_string(),
            format!("{:.2}", scenario.config.cost_per_trainee()),
            format!("{:.6}", scenario.result.uptake_prob),
            format!("{:.2}", scenario.result.total_benefit),
            format!("{:.2}", scenario.result.total_cost),
            format!("{:.2}", scenario.result.net_benefit),
            format!("{:.4}", scenario.result.bcr),
            verdict_field(scenario.recommendation.as_ref()),
            scenario.saved_at.to_rfc3339(),
        ])?;
    }
    finish(writer)
}

pub fn comparison_to_csv(comparison: &ScenarioComparison) -> Result<String> {
    let (a, b, delta) = (&comparison.a.result, &comparison.b.result, &comparison.delta);
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["metric", "a", "b", "delta"])?;
    let rows = [
        ("uptake_prob", a.uptake_prob, b.uptake_prob, delta.uptake_prob),
        ("total_benefit", a.total_benefit, b.total_benefit, delta.total_benefit),
        ("total_cost", a.total_cost, b.total_cost, delta.total_cost),
        ("net_benefit", a.net_benefit, b.net_benefit, delta.net_benefit),
        ("bcr", a.bcr, b.bcr, delta.bcr),
    ];
    for (metric, before, after, change) in rows {
        writer.write_record([
            metric.to_string(),
            format!("{before:.6}"),
            format!("{after:.6}"),
            format!("{change:.6}"),
        ])?;
    }
    finish(writer)
}
