use std::{
    io,
    num::ParseFloatError,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    model::{FactorLevels, Factors},
    prelude::*,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ReferenceDataError {
    #[display("reference data file `{}` does not exist", path.display())]
    Missing { path: PathBuf },

    #[display("failed to read `{}`", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[display("`{}` is not valid reference data", path.display())]
    Malformed { path: PathBuf, source: quick_xml::DeError },

    #[display("`{}`: {factor}/{level} is not a number: `{value}`", path.display())]
    InvalidValue {
        path: PathBuf,
        factor: &'static str,
        level: &'static str,
        value: String,
        source: ParseFloatError,
    },

    #[display("`{}`: {factor}/{level} must be finite, got `{value}`", path.display())]
    NonFinite { path: PathBuf, factor: &'static str, level: &'static str, value: f64 },
}

/// Load the value and emissions factors.
///
/// A missing individual value falls back to zero without affecting its siblings.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn load_factors(path: &Path) -> Result<Factors, ReferenceDataError> {
    if !tokio::fs::metadata(path).await.is_ok_and(|metadata| metadata.is_file()) {
        return Err(ReferenceDataError::Missing { path: path.to_owned() });
    }
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReferenceDataError::Read { path: path.to_owned(), source })?;
    let document: ReferenceDocument = quick_xml::de::from_str(&text)
        .map_err(|source| ReferenceDataError::Malformed { path: path.to_owned(), source })?;
    let factors = Factors {
        value: document.factors.value_factor.try_into_levels(path, "ValueFactor")?,
        emissions: document.factors.emissions_factor.try_into_levels(path, "EmissionsFactor")?,
    };
    info!(?factors.value, ?factors.emissions, "loaded the reference data");
    Ok(factors)
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ReferenceDocument {
    #[serde(default)]
    factors: FactorsElement,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FactorsElement {
    #[serde(default)]
    value_factor: LevelsElement,

    #[serde(default)]
    emissions_factor: LevelsElement,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LevelsElement {
    high: Option<String>,
    medium: Option<String>,
    low: Option<String>,
}

impl LevelsElement {
    fn try_into_levels(
        self,
        path: &Path,
        factor: &'static str,
    ) -> Result<FactorLevels, ReferenceDataError> {
        Ok(FactorLevels {
            high: parse_level(path, factor, "High", self.high.as_deref())?,
            medium: parse_level(path, factor, "Medium", self.medium.as_deref())?,
            low: parse_level(path, factor, "Low", self.low.as_deref())?,
        })
    }
}

fn parse_level(
    path: &Path,
    factor: &'static str,
    level: &'static str,
    value: Option<&str>,
) -> Result<f64, ReferenceDataError> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        warn!(factor, level, "missing factor, defaulting to zero");
        return Ok(0.0);
    };
    let number = value.parse::<f64>().map_err(|source| ReferenceDataError::InvalidValue {
        path: path.to_owned(),
        factor,
        level,
        value: value.to_owned(),
        source,
    })?;
    if !number.is_finite() {
        return Err(ReferenceDataError::NonFinite {
            path: path.to_owned(),
            factor,
            level,
            value: number,
        });
    }
    Ok(number)
}
