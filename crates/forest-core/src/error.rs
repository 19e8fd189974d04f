//! Error types for `forest-core`.

use thiserror::Error;

use crate::{plot::PlotId, ranger::RangerId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("plot not found: {0}")]
  PlotNotFound(PlotId),

  #[error("ranger not found: {0}")]
  RangerNotFound(RangerId),

  #[error("invalid survey date {0:?}; expected YYYY-MM-DD")]
  InvalidSurveyDate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
