//! The `PlotStore` trait and supporting configuration types.
//!
//! The trait is implemented by storage backends (e.g. `forest-store-sqlite`).
//! The terminal UI depends on this abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  plot::{Plot, PlotFields, PlotId, PlotSummary},
  ranger::{AssignedRanger, Assignment, Ranger, RangerId},
};

// ─── Orphan policy ───────────────────────────────────────────────────────────

/// What happens to a plot's assignments when the plot is deleted.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
  /// Assignments stay behind as history of the deleted plot.
  #[default]
  Retain,
  /// Assignments are deleted together with the plot.
  Cascade,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a plot registry backend.
///
/// Every method maps to one storage statement, except
/// [`delete_plot`](PlotStore::delete_plot) under [`OrphanPolicy::Cascade`],
/// which runs two deletes in one transaction.
///
/// All methods return `Send` futures so a store can be moved into a worker
/// task on a multi-threaded tokio runtime.
pub trait PlotStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Plots ─────────────────────────────────────────────────────────────

  /// All plots, newest survey first. Plots without a survey date come last;
  /// ties are broken by ascending id.
  fn list_plots(
    &self,
  ) -> impl Future<Output = Result<Vec<PlotSummary>, Self::Error>> + Send + '_;

  /// Retrieve a plot by id. Returns `None` if not found.
  fn get_plot(
    &self,
    id: PlotId,
  ) -> impl Future<Output = Result<Option<Plot>, Self::Error>> + Send + '_;

  /// Insert a new plot and return it with its generated id.
  fn add_plot(
    &self,
    fields: PlotFields,
  ) -> impl Future<Output = Result<Plot, Self::Error>> + Send + '_;

  /// Overwrite every mutable field of plot `id`.
  ///
  /// Returns `false` (not an error) when no such plot exists.
  fn update_plot(
    &self,
    id: PlotId,
    fields: PlotFields,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete plot `id`. Returns `false` when no such plot exists.
  ///
  /// Whether its assignments are removed too depends on the store's
  /// [`OrphanPolicy`].
  fn delete_plot(
    &self,
    id: PlotId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Rangers ───────────────────────────────────────────────────────────

  /// Look up a ranger by name, creating it if absent. Atomic; calling it
  /// twice with the same name yields the same ranger.
  fn ensure_ranger<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Ranger, Self::Error>> + Send + 'a;

  /// All rangers, ordered by name.
  fn list_rangers(
    &self,
  ) -> impl Future<Output = Result<Vec<Ranger>, Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  /// Assign a ranger to a plot.
  ///
  /// Returns the new [`Assignment`], or `None` if the pair was already
  /// assigned (the existing row is left untouched).
  fn assign_ranger(
    &self,
    plot_id: PlotId,
    ranger_id: RangerId,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  /// Rangers assigned to `plot_id`, oldest assignment first.
  fn list_assignments(
    &self,
    plot_id: PlotId,
  ) -> impl Future<Output = Result<Vec<AssignedRanger>, Self::Error>> + Send + '_;
}
