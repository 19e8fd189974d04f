//! Rangers and their assignments to plots.
//!
//! A ranger is created implicitly the first time it is named and is never
//! updated or deleted. Assignments are append-only links keyed by the
//! `(ranger, plot)` pair.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plot::PlotId;

/// Storage-generated primary key of a ranger.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RangerId(pub i64);

impl fmt::Display for RangerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A person who can be assigned oversight of plots. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranger {
  pub id:   RangerId,
  pub name: String,
}

/// A timestamped link between one ranger and one plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub ranger_id:   RangerId,
  pub plot_id:     PlotId,
  /// Store-assigned; never changes after creation.
  pub assigned_at: DateTime<Utc>,
}

/// One row of a plot's assignment list, joined with the ranger's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedRanger {
  pub ranger_id:   RangerId,
  pub ranger_name: String,
  pub assigned_at: DateTime<Utc>,
}
