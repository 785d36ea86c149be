//! Derived ordinal rating from the numeric quality score

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::error::AnalysisError;
use super::loader::QUALITY_COLUMN;

/// Name of the derived rating column
pub const RATING_COLUMN: &str = "rating";

/// Three-level ordinal bucketing of the quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Quality below 5
    Bad,
    /// Quality 5 or 6
    Average,
    /// Quality 7 and above
    Good,
}

impl Rating {
    /// All ratings in ascending order
    pub const ALL: [Rating; 3] = [Rating::Bad, Rating::Average, Rating::Good];

    pub fn from_quality(quality: i64) -> Self {
        match quality {
            q if q < 5 => Rating::Bad,
            5 | 6 => Rating::Average,
            _ => Rating::Good,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Bad => "bad",
            Rating::Average => "average",
            Rating::Good => "good",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bad" => Ok(Rating::Bad),
            "average" => Ok(Rating::Average),
            "good" => Ok(Rating::Good),
            _ => Err(format!(
                "Unknown rating: '{}'. Use 'bad', 'average' or 'good'.",
                s
            )),
        }
    }
}

/// Add the `rating` column derived from `quality`.
///
/// Deriving twice replaces the column with identical values.
pub fn derive_rating(df: &mut DataFrame) -> Result<()> {
    let ratings: Vec<&str> = quality_scores(df)?
        .into_iter()
        .map(|q| Rating::from_quality(q).as_str())
        .collect();

    df.with_column(Column::new(RATING_COLUMN.into(), ratings))
        .context("Failed to add rating column")?;
    log::debug!("Derived '{}' for {} rows", RATING_COLUMN, df.height());
    Ok(())
}

/// Read the rating column back as typed values
pub fn rating_column(df: &DataFrame) -> Result<Vec<Rating>> {
    let column = df
        .column(RATING_COLUMN)
        .map_err(|_| AnalysisError::ColumnNotFound {
            column: RATING_COLUMN.to_string(),
            available: df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })?;

    column
        .str()?
        .into_iter()
        .map(|value| {
            value
                .unwrap_or_default()
                .parse::<Rating>()
                .map_err(anyhow::Error::msg)
        })
        .collect()
}

/// Quality scores as integers, in row order
pub fn quality_scores(df: &DataFrame) -> Result<Vec<i64>> {
    let column = df
        .column(QUALITY_COLUMN)
        .map_err(|_| AnalysisError::ColumnNotFound {
            column: QUALITY_COLUMN.to_string(),
            available: df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })?;
    let cast = column.cast(&DataType::Int64)?;
    Ok(cast.i64()?.into_iter().flatten().collect())
}
