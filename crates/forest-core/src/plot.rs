//! Plot types — a surveyed forest parcel and its editable field set.
//!
//! A plot's `id` is assigned by the store and never changes. Every other field
//! is overwritten wholesale by an update.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Wire and display format for survey dates.
pub const SURVEY_DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Identity ────────────────────────────────────────────────────────────────

/// Storage-generated primary key of a plot.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlotId(pub i64);

impl fmt::Display for PlotId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Plot ────────────────────────────────────────────────────────────────────

/// A full forest survey record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
  pub id:          PlotId,
  pub name:        String,
  pub location:    String,
  /// Date of the most recent survey, if one has been recorded.
  pub survey_date: Option<NaiveDate>,
  pub notes:       Option<String>,
}

impl Plot {
  /// The mutable part of the record, e.g. to pre-fill an edit form.
  pub fn fields(&self) -> PlotFields {
    PlotFields {
      name:        self.name.clone(),
      location:    self.location.clone(),
      survey_date: self.survey_date,
      notes:       self.notes.clone(),
    }
  }
}

/// One row of the plot list; notes are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotSummary {
  pub id:          PlotId,
  pub name:        String,
  pub location:    String,
  pub survey_date: Option<NaiveDate>,
}

// ─── PlotFields ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::PlotStore::add_plot`] and
/// [`crate::store::PlotStore::update_plot`].
/// `id` is never accepted from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotFields {
  pub name:        String,
  pub location:    String,
  pub survey_date: Option<NaiveDate>,
  pub notes:       Option<String>,
}

impl PlotFields {
  /// Convenience constructor with the optional fields left empty.
  pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      location: location.into(),
      survey_date: None,
      notes: None,
    }
  }

  pub fn with_survey_date(mut self, date: NaiveDate) -> Self {
    self.survey_date = Some(date);
    self
  }

  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    self.notes = Some(notes.into());
    self
  }
}

// ─── Date input ──────────────────────────────────────────────────────────────

/// Parse a survey date typed by the operator.
///
/// Blank input means "no date". Anything else must be `YYYY-MM-DD`.
pub fn parse_survey_date(input: &str) -> Result<Option<NaiveDate>> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Ok(None);
  }
  NaiveDate::parse_from_str(trimmed, SURVEY_DATE_FORMAT)
    .map(Some)
    .map_err(|_| Error::InvalidSurveyDate(trimmed.to_owned()))
}

/// Render an optional survey date the way the list and detail views show it.
pub fn format_survey_date(date: Option<NaiveDate>) -> String {
  date
    .map(|d| d.format(SURVEY_DATE_FORMAT).to_string())
    .unwrap_or_else(|| "—".to_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_date_is_none() {
    assert_eq!(parse_survey_date("").unwrap(), None);
    assert_eq!(parse_survey_date("   ").unwrap(), None);
  }

  #[test]
  fn iso_date_parses() {
    let d = parse_survey_date(" 2024-06-01 ").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 1));
  }

  #[test]
  fn malformed_date_is_rejected() {
    let err = parse_survey_date("01.06.2024").unwrap_err();
    assert!(matches!(err, Error::InvalidSurveyDate(ref s) if s == "01.06.2024"));
    assert!(parse_survey_date("2024-02-30").is_err());
  }

  #[test]
  fn fields_copy_everything_but_the_id() {
    let plot = Plot {
      id:          PlotId(7),
      name:        "North ridge".into(),
      location:    "Sector 4".into(),
      survey_date: NaiveDate::from_ymd_opt(2023, 5, 17),
      notes:       Some("windthrow".into()),
    };
    let fields = plot.fields();
    assert_eq!(fields.name, "North ridge");
    assert_eq!(fields.location, "Sector 4");
    assert_eq!(fields.survey_date, plot.survey_date);
    assert_eq!(fields.notes.as_deref(), Some("windthrow"));
  }

  #[test]
  fn missing_date_formats_as_dash() {
    assert_eq!(format_survey_date(None), "—");
    assert_eq!(
      format_survey_date(NaiveDate::from_ymd_opt(2024, 1, 1)),
      "2024-01-01"
    );
  }
}
