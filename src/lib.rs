//! Sommelier: exploratory data analysis of red wine quality
//!
//! Loads the physicochemical wine dataset, derives a categorical rating from
//! the quality score, and produces descriptive statistics, correlations,
//! charts and two illustrative regression models.

pub mod cli;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod utils;
