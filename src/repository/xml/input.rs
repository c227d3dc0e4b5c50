//! Layout of the incoming generation reports.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::{
    model::{DayGeneration, Generator, GeneratorKind},
    prelude::*,
};

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenerationReport {
    #[serde(default)]
    wind: WindGenerators,

    #[serde(default)]
    gas: GasGenerators,

    #[serde(default)]
    coal: CoalGenerators,
}

impl GenerationReport {
    /// Wind generators come first, then gas, then coal: each group in document order.
    pub fn try_into_generators(self) -> Result<Vec<Generator>, String> {
        let wind = self.wind.generators.into_iter().map(|generator| -> Result<_, String> {
            let name = try_into_name(generator.name)?;
            let location = generator.location.unwrap_or_default().trim().to_owned();
            let days = generator.generation.try_into_days(&name)?;
            Ok(Generator::builder()
                .name(name)
                .kind(GeneratorKind::Wind { location })
                .days(days)
                .build())
        });
        let gas = self.gas.generators.into_iter().map(|generator| -> Result<_, String> {
            let name = try_into_name(generator.name)?;
            let emissions_rating =
                parse_number(&name, "EmissionsRating", generator.emissions_rating.as_deref());
            let days = generator.generation.try_into_days(&name)?;
            Ok(Generator::builder()
                .name(name)
                .kind(GeneratorKind::Gas { emissions_rating })
                .days(days)
                .build())
        });
        let coal = self.coal.generators.into_iter().map(|generator| -> Result<_, String> {
            let name = try_into_name(generator.name)?;
            let kind = GeneratorKind::Coal {
                emissions_rating: parse_number(
                    &name,
                    "EmissionsRating",
                    generator.emissions_rating.as_deref(),
                ),
                total_heat_input: parse_number(
                    &name,
                    "TotalHeatInput",
                    generator.total_heat_input.as_deref(),
                ),
                actual_net_generation: parse_number(
                    &name,
                    "ActualNetGeneration",
                    generator.actual_net_generation.as_deref(),
                ),
            };
            let days = generator.generation.try_into_days(&name)?;
            Ok(Generator::builder().name(name).kind(kind).days(days).build())
        });
        wind.chain(gas).chain(coal).collect()
    }
}

#[derive(Default, Deserialize)]
struct WindGenerators {
    #[serde(rename = "WindGenerator", default)]
    generators: Vec<WindGenerator>,
}

#[derive(Default, Deserialize)]
struct GasGenerators {
    #[serde(rename = "GasGenerator", default)]
    generators: Vec<GasGenerator>,
}

#[derive(Default, Deserialize)]
struct CoalGenerators {
    #[serde(rename = "CoalGenerator", default)]
    generators: Vec<CoalGenerator>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WindGenerator {
    name: Option<String>,

    #[serde(default)]
    generation: Generation,

    location: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GasGenerator {
    name: Option<String>,

    #[serde(default)]
    generation: Generation,

    emissions_rating: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CoalGenerator {
    name: Option<String>,

    #[serde(default)]
    generation: Generation,

    total_heat_input: Option<String>,

    actual_net_generation: Option<String>,

    emissions_rating: Option<String>,
}

fn try_into_name(name: Option<String>) -> Result<String, String> {
    name.map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| "generator without a name".to_owned())
}

#[derive(Default, Deserialize)]
struct Generation {
    #[serde(rename = "Day", default)]
    days: Vec<Day>,
}

impl Generation {
    fn try_into_days(self, generator: &str) -> Result<Vec<DayGeneration>, String> {
        self.days
            .into_iter()
            .map(|day| -> Result<_, String> {
                let date = parse_date(day.date.as_deref())
                    .map_err(|reason| format!("generator `{generator}`: {reason}"))?;
                Ok(DayGeneration::new(
                    date,
                    parse_number(generator, "Energy", day.energy.as_deref()),
                    parse_number(generator, "Price", day.price.as_deref()),
                ))
            })
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Day {
    date: Option<String>,
    energy: Option<String>,
    price: Option<String>,
}

/// Parse a numeric field, falling back to zero when it is missing or malformed.
fn parse_number(generator: &str, field: &'static str, value: Option<&str>) -> f64 {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        debug!(generator, field, "missing value, defaulting to zero");
        return 0.0;
    };
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => {
            warn!(generator, field, value, "malformed number, defaulting to zero");
            0.0
        }
    }
}

/// Parse the day of a timestamp: the date in the timestamp's own offset is kept.
fn parse_date(value: Option<&str>) -> Result<NaiveDate, String> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| "day without a date".to_owned())?;
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.date_naive())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").map(|timestamp| timestamp.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|error| format!("invalid date `{value}`: {error}"))
}
