//! Application state machine and event dispatcher.
//!
//! Key handling never touches the store: it schedules [`Request`]s on the
//! worker channel. Results come back through [`App::apply`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use forest_core::{
  plot::{Plot, PlotId, PlotSummary},
  ranger::AssignedRanger,
  selection::Selection,
};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
  form::PlotForm,
  worker::{Action, Completion, LoadPurpose, Request},
};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// The add/edit form.
  Form,
  /// The plot list.
  PlotList,
}

/// A modal dialog drawn over the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
  /// Read-only view of one plot.
  Detail(Plot),
  /// Ranger name input for an assignment.
  AssignRanger { plot_id: PlotId, name: String },
  /// Rangers assigned to a plot.
  Assignments {
    plot_id: PlotId,
    entries: Vec<AssignedRanger>,
  },
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  pub popup: Option<Popup>,

  /// Latest snapshot of the plot list.
  pub plots: Vec<PlotSummary>,

  /// Current fuzzy-filter string (only active when `filter_active`).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* plot list.
  pub list_cursor: usize,

  pub form: PlotForm,

  /// Which plot, if any, the form is editing.
  pub selection: Selection,

  /// An add or save from the form is in flight.
  pub form_busy: bool,

  /// Requests sent to the worker that have not completed yet.
  pub pending: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  requests: UnboundedSender<Request>,
}

impl App {
  pub fn new(requests: UnboundedSender<Request>) -> Self {
    Self {
      screen: Screen::Form,
      popup: None,
      plots: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      form: PlotForm::default(),
      selection: Selection::new(),
      form_busy: false,
      pending: 0,
      status_msg: String::new(),
      requests,
    }
  }

  // ── Requests ──────────────────────────────────────────────────────────────

  /// Hand `request` to the worker. Returns `false` if the worker is gone.
  fn request(&mut self, request: Request) -> bool {
    let action = request.action();
    if self.requests.send(request).is_err() {
      tracing::error!(%action, "storage worker is gone");
      self.status_msg = format!("Error {action}: storage worker stopped");
      return false;
    }
    self.pending += 1;
    true
  }

  /// Fetch a fresh plot list.
  pub fn reload(&mut self) {
    self.request(Request::ListPlots);
  }

  // ── Completions ───────────────────────────────────────────────────────────

  /// Fold a finished storage call into the UI state.
  pub fn apply(&mut self, completion: Completion) {
    self.pending = self.pending.saturating_sub(1);

    match completion {
      Completion::Plots(plots) => {
        self.plots = plots;
        let len = self.filtered_plots().len();
        if self.list_cursor >= len {
          self.list_cursor = len.saturating_sub(1);
        }
      }

      Completion::PlotLoaded { id, plot: None, .. } => {
        self.status_msg = format!("Plot {id} no longer exists");
        self.reload();
      }
      Completion::PlotLoaded { purpose: LoadPurpose::View, plot: Some(plot), .. } => {
        self.popup = Some(Popup::Detail(plot));
      }
      Completion::PlotLoaded { purpose: LoadPurpose::Edit, plot: Some(plot), .. } => {
        self.begin_edit(&plot);
      }

      Completion::PlotAdded(plot) => {
        self.form_busy = false;
        self.selection.complete_add();
        self.form.clear();
        self.status_msg = format!("Added plot {} ({})", plot.id, plot.name);
        self.reload();
      }

      Completion::PlotUpdated { id, found } => {
        self.form_busy = false;
        if self.selection.complete_save(id) {
          self.form.clear();
        }
        self.status_msg = if found {
          format!("Saved plot {id}")
        } else {
          format!("Plot {id} no longer exists; nothing saved")
        };
        self.reload();
      }

      Completion::PlotDeleted { id, found } => {
        if self.selection.invalidate(id) {
          self.form.clear();
          self.status_msg = format!("Deleted plot {id}; its unsaved edit was discarded");
        } else if found {
          self.status_msg = format!("Deleted plot {id}");
        } else {
          self.status_msg = format!("Plot {id} was already gone");
        }
        if matches!(&self.popup, Some(Popup::Detail(p)) if p.id == id) {
          self.popup = None;
        }
        self.reload();
      }

      Completion::RangerAssigned { plot_id, ranger, created } => {
        self.status_msg = if created {
          format!("{} assigned to plot {plot_id}", ranger.name)
        } else {
          format!("{} was already assigned to plot {plot_id}", ranger.name)
        };
      }

      Completion::Assignments { plot_id, entries } => {
        self.popup = Some(Popup::Assignments { plot_id, entries });
      }

      Completion::Failed { action, message } => {
        if matches!(action, Action::AddPlot | Action::UpdatePlot(_)) {
          self.form_busy = false;
        }
        self.status_msg = format!("Error {action}: {message}");
      }
    }
  }

  fn begin_edit(&mut self, plot: &Plot) {
    self.selection.begin_edit(plot.id);
    self.form.fill(plot);
    self.screen = Screen::Form;
    self.status_msg = format!("Editing plot {}", plot.id);
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Returns plots that match the current filter query.
  pub fn filtered_plots(&self) -> Vec<&PlotSummary> {
    if self.filter.is_empty() {
      return self.plots.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .plots
      .iter()
      .filter(|p| {
        let haystack = format!("{} {} {}", p.id, p.name, p.location);
        matcher.fuzzy_match(&haystack, &self.filter).is_some()
      })
      .collect()
  }

  /// The plot under the list cursor in the filtered view, if any.
  pub fn cursor_plot(&self) -> Option<&PlotSummary> {
    self.filtered_plots().get(self.list_cursor).copied()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global: Ctrl-C quits from anywhere.
    if ctrl && key.code == KeyCode::Char('c') {
      return false;
    }

    // A status message lasts until the next key; then the hints come back.
    self.status_msg.clear();

    if self.popup.is_some() {
      self.handle_popup_key(key);
      return true;
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return true;
    }

    match key.code {
      KeyCode::F(1) => {
        self.screen = Screen::Form;
        return true;
      }
      KeyCode::F(2) => {
        self.screen = Screen::PlotList;
        return true;
      }
      _ => {}
    }

    match self.screen {
      Screen::Form => {
        self.handle_form_key(key);
        true
      }
      Screen::PlotList => self.handle_list_key(key),
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      match key.code {
        KeyCode::Char('n') => self.submit_add(),
        KeyCode::Char('s') => self.submit_save(),
        _ => {}
      }
      return;
    }

    match key.code {
      KeyCode::Esc => {
        if self.selection.cancel() {
          self.form.clear();
          self.status_msg = "Edit cancelled".into();
        } else {
          self.screen = Screen::PlotList;
        }
      }
      KeyCode::Tab | KeyCode::Down => self.form.focus = self.form.focus.next(),
      KeyCode::BackTab | KeyCode::Up => self.form.focus = self.form.focus.prev(),
      KeyCode::Enter => {
        if self.form.focus == crate::form::FormField::Notes {
          self.form.push('\n');
        } else {
          self.form.focus = self.form.focus.next();
        }
      }
      KeyCode::Backspace => self.form.pop(),
      KeyCode::Char(c) => self.form.push(c),
      _ => {}
    }
  }

  /// Insert the form as a new plot, whatever the edit state.
  fn submit_add(&mut self) {
    if self.form_busy {
      return;
    }
    match self.form.to_fields() {
      Ok(fields) => self.form_busy = self.request(Request::AddPlot(fields)),
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  /// Save the form over the plot being edited. Does nothing while idle.
  fn submit_save(&mut self) {
    if self.form_busy {
      return;
    }
    let Some(id) = self.selection.save_target() else {
      self.status_msg = "No plot loaded; Ctrl-N adds a new one".into();
      return;
    };
    match self.form.to_fields() {
      Ok(fields) => self.form_busy = self.request(Request::UpdatePlot { id, fields }),
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }

  fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    let cursor_id = self.cursor_plot().map(|p| p.id);

    match key.code {
      // Quit
      KeyCode::Char('q') => return false,

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_plots().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Esc => self.screen = Screen::Form,

      // Actions on the plot under the cursor
      KeyCode::Enter | KeyCode::Char('v') => {
        if let Some(id) = cursor_id {
          self.request(Request::LoadPlot { id, purpose: LoadPurpose::View });
        }
      }
      KeyCode::Char('e') => {
        if let Some(id) = cursor_id {
          self.request(Request::LoadPlot { id, purpose: LoadPurpose::Edit });
        }
      }
      KeyCode::Char('d') => {
        if let Some(id) = cursor_id {
          self.request(Request::DeletePlot(id));
        }
      }
      KeyCode::Char('a') => {
        if let Some(plot_id) = cursor_id {
          self.popup = Some(Popup::AssignRanger { plot_id, name: String::new() });
        }
      }
      KeyCode::Char('r') => {
        if let Some(id) = cursor_id {
          self.request(Request::ListAssignments(id));
        }
      }

      // Filter
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      KeyCode::Char('R') => self.reload(),

      _ => {}
    }
    true
  }

  fn handle_popup_key(&mut self, key: KeyEvent) {
    let Some(popup) = self.popup.as_mut() else {
      return;
    };

    match popup {
      Popup::Detail(plot) => match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.popup = None,
        KeyCode::Char('e') => {
          let plot = plot.clone();
          self.popup = None;
          self.begin_edit(&plot);
        }
        _ => {}
      },

      Popup::AssignRanger { plot_id, name } => match key.code {
        KeyCode::Esc => self.popup = None,
        KeyCode::Backspace => {
          name.pop();
        }
        KeyCode::Char(c) => name.push(c),
        KeyCode::Enter => {
          let plot_id = *plot_id;
          let ranger_name = name.trim().to_owned();
          if ranger_name.is_empty() {
            self.status_msg = "Ranger name must not be empty".into();
            return;
          }
          self.popup = None;
          self.request(Request::AssignRanger { plot_id, ranger_name });
        }
        _ => {}
      },

      Popup::Assignments { .. } => {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
          self.popup = None;
        }
      }
    }
  }
}
