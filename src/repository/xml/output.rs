//! Layout of the results document.

use serde::Serialize;

use crate::engine::Report;

#[derive(Serialize)]
#[serde(rename = "GenerationOutput", rename_all = "PascalCase")]
pub struct GenerationOutput<'a> {
    totals: Totals<'a>,
    max_emission_generators: MaxEmissionGenerators<'a>,
    actual_heat_rates: ActualHeatRates<'a>,
}

impl<'a> From<&'a Report> for GenerationOutput<'a> {
    fn from(report: &'a Report) -> Self {
        Self {
            totals: Totals {
                generators: report
                    .totals
                    .iter()
                    .map(|total| Total { name: &total.name, total: total.total_value })
                    .collect(),
            },
            max_emission_generators: MaxEmissionGenerators {
                days: report
                    .max_emissions
                    .iter()
                    .map(|row| MaxEmissionDay {
                        name: &row.generator_name,
                        date: row.date.format("%Y-%m-%dT00:00:00+00:00").to_string(),
                        emission: row.emission,
                    })
                    .collect(),
            },
            actual_heat_rates: ActualHeatRates {
                heat_rates: report
                    .heat_rates
                    .iter()
                    .map(|row| ActualHeatRate { name: &row.generator_name, heat_rate: row.heat_rate })
                    .collect(),
            },
        }
    }
}

#[derive(Serialize)]
struct Totals<'a> {
    #[serde(rename = "Generator")]
    generators: Vec<Total<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Total<'a> {
    name: &'a str,
    total: f64,
}

#[derive(Serialize)]
struct MaxEmissionGenerators<'a> {
    #[serde(rename = "Day")]
    days: Vec<MaxEmissionDay<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct MaxEmissionDay<'a> {
    name: &'a str,
    date: String,
    emission: f64,
}

#[derive(Serialize)]
struct ActualHeatRates<'a> {
    #[serde(rename = "ActualHeatRate")]
    heat_rates: Vec<ActualHeatRate<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ActualHeatRate<'a> {
    name: &'a str,
    heat_rate: f64,
}
