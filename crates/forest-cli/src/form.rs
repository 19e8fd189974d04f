//! Text buffers behind the plot edit form.

use forest_core::plot::{Plot, PlotFields, SURVEY_DATE_FORMAT, parse_survey_date};

/// The form's input fields, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
  #[default]
  Name,
  Location,
  SurveyDate,
  Notes,
}

impl FormField {
  pub const ALL: [FormField; 4] = [
    FormField::Name,
    FormField::Location,
    FormField::SurveyDate,
    FormField::Notes,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Self::Name => "Plot name",
      Self::Location => "Location",
      Self::SurveyDate => "Survey date",
      Self::Notes => "Notes",
    }
  }

  pub fn next(self) -> Self {
    match self {
      Self::Name => Self::Location,
      Self::Location => Self::SurveyDate,
      Self::SurveyDate => Self::Notes,
      Self::Notes => Self::Name,
    }
  }

  pub fn prev(self) -> Self {
    match self {
      Self::Name => Self::Notes,
      Self::Location => Self::Name,
      Self::SurveyDate => Self::Location,
      Self::Notes => Self::SurveyDate,
    }
  }
}

/// Raw text typed into the form. Converted to [`PlotFields`] on submit.
#[derive(Debug, Clone, Default)]
pub struct PlotForm {
  pub name:        String,
  pub location:    String,
  /// `YYYY-MM-DD` or empty.
  pub survey_date: String,
  pub notes:       String,
  pub focus:       FormField,
}

impl PlotForm {
  /// Replace the form contents with `plot`.
  pub fn fill(&mut self, plot: &Plot) {
    self.name = plot.name.clone();
    self.location = plot.location.clone();
    self.survey_date = plot
      .survey_date
      .map(|d| d.format(SURVEY_DATE_FORMAT).to_string())
      .unwrap_or_default();
    self.notes = plot.notes.clone().unwrap_or_default();
    self.focus = FormField::Name;
  }

  pub fn clear(&mut self) { *self = Self::default(); }

  pub fn value(&self, field: FormField) -> &str {
    match field {
      FormField::Name => &self.name,
      FormField::Location => &self.location,
      FormField::SurveyDate => &self.survey_date,
      FormField::Notes => &self.notes,
    }
  }

  fn value_mut(&mut self, field: FormField) -> &mut String {
    match field {
      FormField::Name => &mut self.name,
      FormField::Location => &mut self.location,
      FormField::SurveyDate => &mut self.survey_date,
      FormField::Notes => &mut self.notes,
    }
  }

  /// Type `c` into the focused field.
  pub fn push(&mut self, c: char) {
    let focus = self.focus;
    self.value_mut(focus).push(c);
  }

  /// Delete the last character of the focused field.
  pub fn pop(&mut self) {
    let focus = self.focus;
    self.value_mut(focus).pop();
  }

  /// Validate the buffers. Only the survey date can fail; empty notes are
  /// stored as no notes.
  pub fn to_fields(&self) -> forest_core::Result<PlotFields> {
    let notes = (!self.notes.trim().is_empty()).then(|| self.notes.clone());
    Ok(PlotFields {
      name: self.name.clone(),
      location: self.location.clone(),
      survey_date: parse_survey_date(&self.survey_date)?,
      notes,
    })
  }
}
