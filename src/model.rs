use chrono::NaiveDate;

/// Wind farm location which earns the low value factor.
pub const OFFSHORE: &str = "Offshore";

#[must_use]
#[derive(Clone, Debug, PartialEq, bon::Builder)]
pub struct Generator {
    #[builder(into)]
    pub name: String,

    pub kind: GeneratorKind,

    /// Daily records in the order they were read.
    #[builder(default)]
    pub days: Vec<DayGeneration>,
}

#[derive(Clone, Debug, PartialEq, derive_more::Display)]
pub enum GeneratorKind {
    #[display("wind")]
    Wind { location: String },

    #[display("gas")]
    Gas { emissions_rating: f64 },

    #[display("coal")]
    Coal { emissions_rating: f64, total_heat_input: f64, actual_net_generation: f64 },
}

/// Output and market price of a generator on one day.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DayGeneration {
    pub date: NaiveDate,
    pub energy: f64,
    pub price: f64,
}

impl DayGeneration {
    pub const fn new(date: NaiveDate, energy: f64, price: f64) -> Self {
        Self { date, energy, price }
    }
}

/// Weighting constants, loaded once and shared read-only between processing tasks.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Factors {
    pub value: FactorLevels,
    pub emissions: FactorLevels,
}

#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FactorLevels {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}
