//! The edit-form selection state machine.
//!
//! The form is either empty ([`EditState::Idle`], save/cancel disabled) or has
//! one plot loaded ([`EditState::Editing`]). Storage calls are scheduled by the
//! UI; this type only decides what is allowed and how completed calls move the
//! state.
//!
//! ```text
//!   Idle ──add──▶ Idle
//!   Idle ──edit(id)──▶ Editing(id)
//!   Editing(a) ──edit(b)──▶ Editing(b)
//!   Editing(id) ──save ok──▶ Idle
//!   Editing(id) ──cancel──▶ Idle
//!   Editing(id) ──add ok──▶ Idle
//!   Editing(id) ──deleted(id)──▶ Idle
//! ```
//!
//! A failed storage call never moves the state.

use crate::plot::PlotId;

/// What the edit form currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
  /// Nothing loaded; the form adds new plots.
  #[default]
  Idle,
  /// Plot `id` is loaded; the form can save over it.
  Editing(PlotId),
}

/// A validated reference to the plot loaded in the edit form.
#[derive(Debug, Clone, Default)]
pub struct Selection {
  state: EditState,
}

impl Selection {
  pub fn new() -> Self { Self::default() }

  pub fn state(&self) -> EditState { self.state }

  /// The plot being edited, if any.
  pub fn editing(&self) -> Option<PlotId> {
    match self.state {
      EditState::Idle => None,
      EditState::Editing(id) => Some(id),
    }
  }

  /// Whether save and cancel are enabled.
  pub fn is_editing(&self) -> bool { self.editing().is_some() }

  /// Load `id` into the form. Replaces any previous session.
  pub fn begin_edit(&mut self, id: PlotId) { self.state = EditState::Editing(id); }

  /// The id an update may be issued for. `None` while idle, which is the
  /// only guard against updating without a loaded plot.
  pub fn save_target(&self) -> Option<PlotId> { self.editing() }

  /// A save of `id` finished successfully.
  ///
  /// Returns `true` if the session ended. A completion for a plot that is no
  /// longer loaded (the operator moved on meanwhile) leaves the state alone.
  pub fn complete_save(&mut self, id: PlotId) -> bool {
    if self.state == EditState::Editing(id) {
      self.state = EditState::Idle;
      true
    } else {
      false
    }
  }

  /// Discard the session without touching storage. Returns `true` if there
  /// was one.
  pub fn cancel(&mut self) -> bool {
    let was_editing = self.is_editing();
    self.state = EditState::Idle;
    was_editing
  }

  /// An add from the form finished successfully; the form always resets.
  pub fn complete_add(&mut self) { self.state = EditState::Idle; }

  /// Plot `deleted` no longer exists.
  ///
  /// Returns `true` if it was the one being edited, in which case the session
  /// has been dropped and the form must be cleared.
  pub fn invalidate(&mut self, deleted: PlotId) -> bool {
    if self.state == EditState::Editing(deleted) {
      self.state = EditState::Idle;
      true
    } else {
      false
    }
  }
}
