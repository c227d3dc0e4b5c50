//! Report calculations over the generators of a single data drop.
//!
//! All functions here are pure: they only read the generators and factors, so they can be
//! called from any number of processing tasks at once.

use std::cmp::Reverse;

use chrono::NaiveDate;
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::model::{Factors, Generator, GeneratorKind, OFFSHORE};

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationTotal {
    pub name: String,
    pub total_value: f64,
}

/// The highest emitter on a given day.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct DailyMaxEmission {
    pub generator_name: String,
    pub date: NaiveDate,
    pub emission: f64,
}

#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct HeatRate {
    pub generator_name: String,
    pub heat_rate: f64,
}

/// All three reports computed for one input file.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub totals: Vec<GenerationTotal>,
    pub max_emissions: Vec<DailyMaxEmission>,
    pub heat_rates: Vec<HeatRate>,
}

impl Report {
    pub fn compute(generators: &[Generator], factors: &Factors) -> Self {
        Self {
            totals: total_generation(generators, factors),
            max_emissions: max_emissions_per_day(generators, factors),
            heat_rates: heat_rates(generators),
        }
    }
}

/// Revenue-weighted generation: one row per generator, in input order.
pub fn total_generation(generators: &[Generator], factors: &Factors) -> Vec<GenerationTotal> {
    generators
        .iter()
        .map(|generator| {
            let value_factor = value_factor(&generator.kind, factors);
            GenerationTotal {
                name: generator.name.clone(),
                total_value: generator
                    .days
                    .iter()
                    .fold(0.0, |total, day| total + day.energy * day.price * value_factor),
            }
        })
        .collect()
}

/// The generator with the highest positive emission for every date, ordered by date.
///
/// When several generators emit the same maximum on a date, the first one in input order wins.
/// Dates without a positive emitter produce no row.
pub fn max_emissions_per_day(
    generators: &[Generator],
    factors: &Factors,
) -> Vec<DailyMaxEmission> {
    generators
        .iter()
        .flat_map(|generator| {
            let emission_per_unit = emission_per_unit(&generator.kind, factors);
            generator
                .days
                .iter()
                .map(move |day| (day.date, (generator, emission_per_unit * day.energy)))
        })
        .into_group_map()
        .into_iter()
        .filter_map(|(date, candidates)| {
            // `min_by_key` returns the first of equal keys, so reversing the key keeps the first maximum.
            let (generator, emission) = candidates
                .into_iter()
                .min_by_key(|(_, emission)| Reverse(OrderedFloat(*emission)))?;
            (emission > 0.0).then(|| DailyMaxEmission {
                generator_name: generator.name.clone(),
                date,
                emission,
            })
        })
        .sorted_by_key(|row| row.date)
        .collect()
}

/// Heat rates of the coal generators; other kinds are skipped entirely.
pub fn heat_rates(generators: &[Generator]) -> Vec<HeatRate> {
    generators
        .iter()
        .filter_map(|generator| match generator.kind {
            GeneratorKind::Coal { total_heat_input, actual_net_generation, .. } => {
                Some(HeatRate {
                    generator_name: generator.name.clone(),
                    heat_rate: if actual_net_generation == 0.0 {
                        0.0
                    } else {
                        total_heat_input / actual_net_generation
                    },
                })
            }
            GeneratorKind::Wind { .. } | GeneratorKind::Gas { .. } => None,
        })
        .collect()
}

fn value_factor(kind: &GeneratorKind, factors: &Factors) -> f64 {
    match kind {
        GeneratorKind::Wind { location } if location == OFFSHORE => factors.value.low,
        GeneratorKind::Wind { .. } => factors.value.high,
        GeneratorKind::Gas { .. } | GeneratorKind::Coal { .. } => factors.value.medium,
    }
}

fn emission_per_unit(kind: &GeneratorKind, factors: &Factors) -> f64 {
    match *kind {
        GeneratorKind::Wind { .. } => 0.0,
        GeneratorKind::Gas { emissions_rating } => emissions_rating * factors.emissions.medium,
        GeneratorKind::Coal { emissions_rating, .. } => emissions_rating * factors.emissions.high,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::model::{DayGeneration, FactorLevels};

    const UNIT_FACTORS: Factors = Factors {
        value: FactorLevels { high: 1.0, medium: 1.0, low: 1.0 },
        emissions: FactorLevels { high: 1.0, medium: 1.0, low: 1.0 },
    };

    const REFERENCE_FACTORS: Factors = Factors {
        value: FactorLevels { high: 0.946, medium: 0.696, low: 0.265 },
        emissions: FactorLevels { high: 0.812, medium: 0.562, low: 0.312 },
    };

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 1, day).unwrap()
    }

    fn wind(name: &str, location: &str, days: Vec<DayGeneration>) -> Generator {
        Generator::builder()
            .name(name)
            .kind(GeneratorKind::Wind { location: location.to_owned() })
            .days(days)
            .build()
    }

    fn gas(name: &str, emissions_rating: f64, days: Vec<DayGeneration>) -> Generator {
        Generator::builder().name(name).kind(GeneratorKind::Gas { emissions_rating }).days(days).build()
    }

    fn coal(name: &str, emissions_rating: f64, days: Vec<DayGeneration>) -> Generator {
        Generator::builder()
            .name(name)
            .kind(GeneratorKind::Coal {
                emissions_rating,
                total_heat_input: 0.0,
                actual_net_generation: 0.0,
            })
            .days(days)
            .build()
    }

    fn coal_heat(name: &str, total_heat_input: f64, actual_net_generation: f64) -> Generator {
        Generator::builder()
            .name(name)
            .kind(GeneratorKind::Coal {
                emissions_rating: 0.0,
                total_heat_input,
                actual_net_generation,
            })
            .build()
    }

    #[test]
    fn test_total_generation_gas() {
        let generators = [gas("GasGen1", 0.0, vec![DayGeneration::new(date(1), 100.0, 5.0)])];
        let totals = total_generation(&generators, &UNIT_FACTORS);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].name, "GasGen1");
        assert_abs_diff_eq!(totals[0].total_value, 500.0);
    }

    #[test]
    fn test_total_generation_value_factors() {
        let day = DayGeneration::new(date(1), 10.0, 2.0);
        let generators = [
            wind("Offshore", OFFSHORE, vec![day]),
            wind("Onshore", "Onshore", vec![day]),
            gas("Gas", 0.1, vec![day]),
            coal("Coal", 0.1, vec![day]),
        ];
        let totals = total_generation(&generators, &REFERENCE_FACTORS);
        assert_abs_diff_eq!(totals[0].total_value, 20.0 * 0.265, epsilon = 1e-12);
        assert_abs_diff_eq!(totals[1].total_value, 20.0 * 0.946, epsilon = 1e-12);
        assert_abs_diff_eq!(totals[2].total_value, 20.0 * 0.696, epsilon = 1e-12);
        assert_abs_diff_eq!(totals[3].total_value, 20.0 * 0.696, epsilon = 1e-12);
    }

    #[test]
    fn test_total_generation_keeps_order_and_empty_generators() {
        let generators = [
            coal("B", 0.5, vec![DayGeneration::new(date(1), 1.0, 1.0)]),
            wind("A", "Onshore", Vec::new()),
            coal("B", 0.5, Vec::new()),
        ];
        let totals = total_generation(&generators, &REFERENCE_FACTORS);
        let names = totals.iter().map(|total| total.name.as_str()).collect_vec();
        assert_eq!(names, ["B", "A", "B"]);
        assert_eq!(totals[1].total_value, 0.0);
        assert!(totals[1].total_value.is_sign_positive());
        assert_eq!(totals[2].total_value, 0.0);
    }

    #[test]
    fn test_total_generation_sums_days() {
        let generators = [wind(
            "Wind[Offshore]",
            OFFSHORE,
            vec![
                DayGeneration::new(date(1), 100.368, 20.148),
                DayGeneration::new(date(2), 90.843, 25.516),
                DayGeneration::new(date(3), 87.843, 55.578),
            ],
        )];
        let totals = total_generation(&generators, &REFERENCE_FACTORS);
        let expected = (100.368 * 20.148 + 90.843 * 25.516 + 87.843 * 55.578) * 0.265;
        assert_abs_diff_eq!(totals[0].total_value, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_total_generation_is_linear_in_energy() {
        let days = vec![
            DayGeneration::new(date(1), 12.5, 3.0),
            DayGeneration::new(date(2), 7.25, 4.5),
        ];
        let scaled_days = days
            .iter()
            .map(|day| DayGeneration { energy: day.energy * 3.0, ..*day })
            .collect_vec();
        let original = total_generation(&[gas("G", 0.1, days)], &REFERENCE_FACTORS);
        let scaled = total_generation(&[gas("G", 0.1, scaled_days)], &REFERENCE_FACTORS);
        assert_abs_diff_eq!(scaled[0].total_value, original[0].total_value * 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_max_emissions_coal_beats_gas() {
        let generators = [
            gas("GasGen1", 0.05, vec![DayGeneration::new(date(1), 100.0, 0.0)]),
            coal("CoalGen1", 0.1, vec![DayGeneration::new(date(1), 200.0, 0.0)]),
        ];
        let emissions = max_emissions_per_day(&generators, &UNIT_FACTORS);
        assert_eq!(emissions.len(), 1);
        assert_eq!(emissions[0].generator_name, "CoalGen1");
        assert_eq!(emissions[0].date, date(1));
        assert_abs_diff_eq!(emissions[0].emission, 20.0);
    }

    #[test]
    fn test_max_emissions_single_gas_generator() {
        let generators = [gas("GasGen1", 0.05, vec![DayGeneration::new(date(1), 100.0, 0.0)])];
        let emissions = max_emissions_per_day(&generators, &UNIT_FACTORS);
        assert_eq!(emissions.len(), 1);
        assert_eq!(emissions[0].generator_name, "GasGen1");
        assert_abs_diff_eq!(emissions[0].emission, 5.0);
    }

    #[test]
    fn test_max_emissions_applies_factors() {
        let generators = [
            gas("Gas", 0.5, vec![DayGeneration::new(date(1), 10.0, 0.0)]),
            coal("Coal", 0.5, vec![DayGeneration::new(date(2), 10.0, 0.0)]),
        ];
        let emissions = max_emissions_per_day(&generators, &REFERENCE_FACTORS);
        assert_eq!(emissions.len(), 2);
        assert_abs_diff_eq!(emissions[0].emission, 5.0 * 0.562, epsilon = 1e-12);
        assert_abs_diff_eq!(emissions[1].emission, 5.0 * 0.812, epsilon = 1e-12);
    }

    #[test]
    fn test_max_emissions_tie_keeps_first_in_input_order() {
        let generators = [
            gas("GasGen1", 0.5, vec![DayGeneration::new(date(1), 20.0, 0.0)]),
            coal("CoalGen1", 0.25, vec![DayGeneration::new(date(1), 40.0, 0.0)]),
            gas("GasGen2", 0.5, vec![DayGeneration::new(date(1), 20.0, 0.0)]),
        ];
        let emissions = max_emissions_per_day(&generators, &UNIT_FACTORS);
        assert_eq!(emissions.len(), 1);
        assert_eq!(emissions[0].generator_name, "GasGen1");
        assert_eq!(emissions[0].emission, 10.0);

        let reversed = [generators[1].clone(), generators[0].clone()];
        let emissions = max_emissions_per_day(&reversed, &UNIT_FACTORS);
        assert_eq!(emissions.len(), 1);
        assert_eq!(emissions[0].generator_name, "CoalGen1");
    }

    #[test]
    fn test_max_emissions_excludes_wind() {
        let generators = [wind(
            "WindGen1",
            "Onshore",
            vec![DayGeneration::new(date(1), 100.0, 1.0), DayGeneration::new(date(2), 50.0, 1.0)],
        )];
        assert!(max_emissions_per_day(&generators, &UNIT_FACTORS).is_empty());
        assert!(heat_rates(&generators).is_empty());
        assert_eq!(total_generation(&generators, &UNIT_FACTORS).len(), 1);
    }

    #[test]
    fn test_max_emissions_skips_days_without_positive_emitter() {
        let generators = [
            wind("Wind", "Onshore", vec![DayGeneration::new(date(1), 100.0, 1.0)]),
            gas(
                "Gas",
                0.1,
                vec![DayGeneration::new(date(1), 0.0, 1.0), DayGeneration::new(date(2), 3.0, 1.0)],
            ),
        ];
        let emissions = max_emissions_per_day(&generators, &UNIT_FACTORS);
        assert_eq!(emissions.len(), 1);
        assert_eq!(emissions[0].date, date(2));
        assert!(emissions.iter().all(|row| row.emission > 0.0));
    }

    #[test]
    fn test_max_emissions_ordered_by_date_with_row_maximum() {
        let generators = [
            gas(
                "Gas",
                0.2,
                vec![
                    DayGeneration::new(date(3), 10.0, 0.0),
                    DayGeneration::new(date(1), 10.0, 0.0),
                    DayGeneration::new(date(2), 1.0, 0.0),
                ],
            ),
            coal(
                "Coal",
                0.1,
                vec![
                    DayGeneration::new(date(2), 30.0, 0.0),
                    DayGeneration::new(date(1), 5.0, 0.0),
                ],
            ),
        ];
        let emissions = max_emissions_per_day(&generators, &UNIT_FACTORS);
        let rows = emissions
            .iter()
            .map(|row| (row.date, row.generator_name.as_str()))
            .collect_vec();
        assert_eq!(rows, [(date(1), "Gas"), (date(2), "Coal"), (date(3), "Gas")]);
        assert_abs_diff_eq!(emissions[1].emission, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_max_emissions_empty_input() {
        assert!(max_emissions_per_day(&[], &UNIT_FACTORS).is_empty());
    }

    #[test]
    fn test_heat_rate() {
        let rates = heat_rates(&[coal_heat("CoalGen1", 500.0, 250.0)]);
        assert_eq!(rates, [HeatRate { generator_name: "CoalGen1".to_owned(), heat_rate: 2.0 }]);
    }

    #[test]
    fn test_heat_rate_zero_net_generation() {
        let rates = heat_rates(&[coal_heat("CoalGen1", 500.0, 0.0)]);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].heat_rate, 0.0);
        assert!(rates[0].heat_rate.is_finite());
    }

    #[test]
    fn test_heat_rates_multiple_coal_generators() {
        let generators = [
            coal_heat("CoalGen1", 600.0, 300.0),
            gas("GasGen1", 0.1, Vec::new()),
            coal_heat("CoalGen2", 800.0, 200.0),
        ];
        let rates = heat_rates(&generators);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].generator_name, "CoalGen1");
        assert_abs_diff_eq!(rates[0].heat_rate, 2.0);
        assert_eq!(rates[1].generator_name, "CoalGen2");
        assert_abs_diff_eq!(rates[1].heat_rate, 4.0);
    }

    #[test]
    fn test_heat_rates_skip_non_coal() {
        let generators = [gas("GasGen1", 0.1, Vec::new()), wind("WindGen1", OFFSHORE, Vec::new())];
        assert!(heat_rates(&generators).is_empty());
    }

    #[test]
    fn test_report_compute() {
        let generators = [
            wind("Wind", OFFSHORE, vec![DayGeneration::new(date(1), 10.0, 1.0)]),
            coal_heat("Coal", 10.0, 5.0),
        ];
        let report = Report::compute(&generators, &REFERENCE_FACTORS);
        assert_eq!(report.totals.len(), 2);
        assert!(report.max_emissions.is_empty());
        assert_eq!(report.heat_rates.len(), 1);
    }
}
