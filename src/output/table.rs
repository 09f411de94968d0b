use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::analysis::{SensitivityPoint, SimulationResult};
use crate::attributes::{Attribute, PreferenceModel};
use crate::coefficients::{AttributeEffects, CoefficientStore};
use crate::evaluation::{Evaluation, Recommendation, Verdict};
use crate::output::{format_currency, format_percent, format_ratio};
use crate::scenario::{SavedScenario, ScenarioComparison};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn verdict_cell(recommendation: Option<&Recommendation>) -> Cell {
    let Some(recommendation) = recommendation else {
        return Cell::new("-");
    };
    let color = match recommendation.verdict {
        Verdict::StrongSupportGoodValue | Verdict::BroadlyAttractive => Color::Green,
        Verdict::SupportBelowBreakEven | Verdict::ValueWithLowEndorsement => Color::Yellow,
        Verdict::NotAttractive => Color::Red,
    };
    Cell::new(recommendation.verdict.to_string()).fg(color)
}

pub fn render_evaluation_table(evaluation: &Evaluation, currency: &str) -> String {
    let config = &evaluation.config;
    let result = &evaluation.result;

    let mut table = new_table();
    table.set_header(vec!["Item", "Value"]);
    table.add_row(vec![
        "Preference model".to_string(),
        config.preference_model().to_string(),
    ]);
    for attribute in Attribute::ALL {
        table.add_row(vec![attribute.to_string(), config.levels().label(attribute)]);
    }
    table.add_row(vec![
        "Cohort size".to_string(),
        config.cohort_size().to_string(),
    ]);
    table.add_row(vec![
        "Duration (months)".to_string(),
        config.duration_months().to_string(),
    ]);
    table.add_row(vec![
        "Cost per trainee per month".to_string(),
        format_currency(config.cost_per_trainee(), currency),
    ]);
    table.add_row(vec![
        "Opportunity cost included".to_string(),
        if config.include_opportunity_cost() { "yes" } else { "no" }.to_string(),
    ]);
    table.add_row(vec![
        "Utility (enroll / opt out)".to_string(),
        format!(
            "{:.3} / {:.3}",
            evaluation.choice.utility_enroll, evaluation.choice.utility_opt_out
        ),
    ]);
    table.add_row(vec![
        "Predicted uptake".to_string(),
        format_percent(result.uptake_prob),
    ]);
    table.add_row(vec![
        "Total benefit".to_string(),
        format_currency(result.total_benefit, currency),
    ]);
    table.add_row(vec![
        "Total cost".to_string(),
        format_currency(result.total_cost, currency),
    ]);
    table.add_row(vec![
        "Net benefit".to_string(),
        format_currency(result.net_benefit, currency),
    ]);
    table.add_row(vec!["Benefit-cost ratio".to_string(), format_ratio(result.bcr)]);
    table.add_row(Row::from(vec![
        Cell::new("Recommendation"),
        verdict_cell(evaluation.recommendation.as_ref()),
    ]));

    let mut out = table.to_string();
    if let Some(recommendation) = &evaluation.recommendation {
        out.push_str(&format!("\n{}", recommendation.message));
    }
    if evaluation.provisional_tables {
        out.push_str(&format!(
            "\nNote: {} tables are provisional.",
            evaluation.preference_model()
        ));
    }
    out
}

pub fn render_contributions_table(evaluation: &Evaluation, currency: &str) -> String {
    let mut table = new_table();
    table.set_header(vec!["Attribute", "Level", "WTP (thousands/month)"]);
    for contribution in &evaluation.benefit.contributions {
        let level = if contribution.is_reference {
            format!("{} (reference)", contribution.level)
        } else {
            contribution.level.clone()
        };
        table.add_row(vec![
            contribution.attribute.to_string(),
            level,
            format!("{:.2}", contribution.value),
        ]);
    }
    table.add_row(vec![
        "Total".to_string(),
        String::new(),
        format!("{:.2}", evaluation.benefit.wtp_total_thousands),
    ]);

    let mut costs = new_table();
    costs.set_header(vec!["Cost component", "Share", "Amount"]);
    for line in &evaluation.cost_breakdown {
        costs.add_row(vec![
            line.component.to_string(),
            format_percent(line.share),
            format_currency(line.amount, currency),
        ]);
    }
    format!("{table}\n{costs}")
}

pub fn render_sensitivity_table(points: &[SensitivityPoint], currency: &str) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Cost change",
        "Cost per trainee",
        "Uptake",
        "Total cost",
        "Net benefit",
        "BCR",
        "Verdict",
    ]);
    for point in points {
        table.add_row(Row::from(vec![
            Cell::new(format!("{:+.0}%", (point.multiplier - 1.0) * 100.0)),
            Cell::new(format_currency(point.cost_per_trainee, currency)),
            Cell::new(format_percent(point.result.uptake_prob)),
            Cell::new(format_currency(point.result.total_cost, currency)),
            Cell::new(format_currency(point.result.net_benefit, currency)),
            Cell::new(format_ratio(point.result.bcr)),
            verdict_cell(point.recommendation.as_ref()),
        ]));
    }
    table.to_string()
}

pub fn render_simulation_table(result: &SimulationResult, currency: &str) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    let rows = vec![
        ("Cohorts", result.assumptions.num_cohorts.to_string()),
        ("Trainees per cohort", result.cohort_size.to_string()),
        ("Total cost", format_currency(result.total_cost, currency)),
        ("Total benefit (WTP)", format_currency(result.total_benefit, currency)),
        ("Net benefit (WTP)", format_currency(result.total_net, currency)),
        ("Effective graduates", format!("{:.1}", result.effective_graduates)),
        ("Districts covered", format!("{:.1}", result.district_coverage)),
        ("Outbreaks averted", format!("{:.1}", result.outbreaks_averted)),
        (
            "Epidemiological benefit",
            format_currency(result.epi_benefit_total, currency),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    table.to_string()
}

pub fn render_scenarios_table(scenarios: &[SavedScenario], currency: &str) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "#", "Name", "Model", "Program", "Cohort", "Uptake", "Net benefit", "BCR", "Verdict",
    ]);
    for scenario in scenarios {
        table.add_row(Row::from(vec![
            Cell::new(scenario.index.to_string()),
            Cell::new(scenario.name.clone()),
            Cell::new(scenario.config.preference_model().as_slug()),
            Cell::new(scenario.config.program().to_string()),
            Cell::new(scenario.config.cohort_size().to_string()),
            Cell::new(format_percent(scenario.result.uptake_prob)),
            Cell::new(format_currency(scenario.result.net_benefit, currency)),
            Cell::new(format_ratio(scenario.result.bcr)),
            verdict_cell(scenario.recommendation.as_ref()),
        ]));
    }
    table.to_string()
}

pub fn render_comparison_table(comparison: &ScenarioComparison, currency: &str) -> String {
    let (a, b, delta) = (&comparison.a, &comparison.b, &comparison.delta);
    let mut table = new_table();
    table.set_header(vec![
        "Metric".to_string(),
        a.name.clone(),
        b.name.clone(),
        "Change".to_string(),
    ]);
    table.add_row(vec![
        "Uptake".to_string(),
        format_percent(a.result.uptake_prob),
        format_percent(b.result.uptake_prob),
        format!("{:+.1} pts", delta.uptake_prob * 100.0),
    ]);
    let money = [
        ("Total benefit", a.result.total_benefit, b.result.total_benefit, delta.total_benefit),
        ("Total cost", a.result.total_cost, b.result.total_cost, delta.total_cost),
        ("Net benefit", a.result.net_benefit, b.result.net_benefit, delta.net_benefit),
    ];
    for (label, before, after, change) in money {
        table.add_row(vec![
            label.to_string(),
            format_currency(before, currency),
            format_currency(after, currency),
            format_currency(change, currency),
        ]);
    }
    table.add_row(vec![
        "BCR".to_string(),
        format_ratio(a.result.bcr),
        format_ratio(b.result.bcr),
        format!("{:+.2}", delta.bcr),
    ]);

    let changed = if comparison.differing_attributes.is_empty() {
        "none".to_string()
    } else {
        comparison
            .differing_attributes
            .iter()
            .map(|attribute| {
                format!(
                    "{}: {} -> {}",
                    attribute,
                    a.config.levels().label(*attribute),
                    b.config.levels().label(*attribute)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("{table}\nChanged attributes: {changed}")
}

pub fn render_coefficients_table(store: &CoefficientStore) -> String {
    let mut table = new_table();
    let mut header = vec!["Term".to_string()];
    for model in PreferenceModel::ALL {
        header.push(format!("{} beta", model.as_slug()));
        header.push(format!("{} WTP", model.as_slug()));
    }
    table.set_header(header);

    let intercepts: [(&str, fn(&CoefficientStore, PreferenceModel) -> f64); 3] = [
        ("ASC enroll", |s, m| s.coefficients(m).asc_enroll),
        ("ASC opt out", |s, m| s.coefficients(m).asc_opt_out),
        ("Cost (per thousand)", |s, m| s.coefficients(m).cost_per_thousand),
    ];
    for (label, beta) in intercepts {
        let mut row = vec![label.to_string()];
        for model in PreferenceModel::ALL {
            row.push(format!("{:.3}", beta(store, model)));
            row.push("-".to_string());
        }
        table.add_row(row);
    }

    for (label, pick) in level_terms() {
        let mut row = vec![label.to_string()];
        for model in PreferenceModel::ALL {
            row.push(format!("{:.3}", pick(&store.coefficients(model).effects)));
            row.push(format!("{:.2}", pick(store.wtp(model))));
        }
        table.add_row(row);
    }

    let provisional = PreferenceModel::ALL
        .into_iter()
        .filter(|model| store.is_provisional(*model))
        .map(|model| model.as_slug())
        .collect::<Vec<_>>();
    let mut out = table.to_string();
    if !provisional.is_empty() {
        out.push_str(&format!("\nProvisional tables: {}", provisional.join(", ")));
    }
    out.push_str(&format!("\nFingerprint: {}", store.fingerprint()));
    out
}

type LevelTerm = (&'static str, fn(&AttributeEffects) -> f64);

fn level_terms() -> [LevelTerm; 10] {
    [
        ("Program: intermediate", |e| e.program.intermediate),
        ("Program: advanced", |e| e.program.advanced),
        ("Career: university", |e| e.career.uni),
        ("Career: government path", |e| e.career.govpath),
        ("Mentorship: medium", |e| e.mentorship.medium),
        ("Mentorship: high", |e| e.mentorship.high),
        ("Delivery: in person", |e| e.delivery.inperson),
        ("Delivery: online", |e| e.delivery.online),
        ("Response: 15 days", |e| e.response.days_15),
        ("Response: 7 days", |e| e.response.days_7),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluator::evaluate;
    use crate::resolver::Configuration;

    #[test]
    fn evaluation_table_shows_formatted_figures() {
        let evaluation = evaluate(&CoefficientStore::builtin(), &Configuration::default());
        let rendered = render_evaluation_table(&evaluation, "INR");
        assert!(rendered.contains("Predicted uptake"));
        assert!(rendered.contains("INR 60,000,000"));
        assert!(rendered.contains("Benefit-cost ratio"));
    }

    #[test]
    fn coefficients_table_flags_provisional_models() {
        let rendered = render_coefficients_table(&CoefficientStore::builtin());
        assert!(rendered.contains("Provisional tables: supporters"));
        assert!(rendered.contains("Mentorship: high"));
    }
}
