//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Survey dates are stored as `YYYY-MM-DD` so that lexical order is
//! chronological order. Timestamps are stored as fixed-width RFC 3339 strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use forest_core::{
  plot::{Plot, PlotId, PlotSummary, SURVEY_DATE_FORMAT},
  ranger::{AssignedRanger, RangerId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Fixed-width (microseconds, `Z`) so that stored timestamps sort lexically.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.format(SURVEY_DATE_FORMAT).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, SURVEY_DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("survey date {s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `forest_plots` row.
pub struct RawPlot {
  pub id:          i64,
  pub name:        String,
  pub location:    String,
  pub survey_date: Option<String>,
  pub notes:       Option<String>,
}

impl RawPlot {
  pub fn into_plot(self) -> Result<Plot> {
    Ok(Plot {
      id:          PlotId(self.id),
      name:        self.name,
      location:    self.location,
      survey_date: self.survey_date.as_deref().map(decode_date).transpose()?,
      notes:       self.notes,
    })
  }
}

/// Raw values for one line of the plot list.
pub struct RawPlotSummary {
  pub id:          i64,
  pub name:        String,
  pub location:    String,
  pub survey_date: Option<String>,
}

impl RawPlotSummary {
  pub fn into_summary(self) -> Result<PlotSummary> {
    Ok(PlotSummary {
      id:          PlotId(self.id),
      name:        self.name,
      location:    self.location,
      survey_date: self.survey_date.as_deref().map(decode_date).transpose()?,
    })
  }
}

/// Raw values from `assignments` joined with `rangers`.
pub struct RawAssignedRanger {
  pub ranger_id:       i64,
  pub ranger_name:     String,
  pub assignment_date: String,
}

impl RawAssignedRanger {
  pub fn into_assigned(self) -> Result<AssignedRanger> {
    Ok(AssignedRanger {
      ranger_id:   RangerId(self.ranger_id),
      ranger_name: self.ranger_name,
      assigned_at: decode_dt(&self.assignment_date)?,
    })
  }
}
