//! Storage worker: runs store calls off the UI thread.
//!
//! The UI sends [`Request`]s and never awaits the store. A single task owns
//! the store, executes requests strictly in the order they were sent, and
//! posts one [`Completion`] per request. When the request channel closes the
//! task ends and hands the store back so it can be closed.

use std::fmt;

use forest_core::{
  plot::{Plot, PlotFields, PlotId, PlotSummary},
  ranger::{AssignedRanger, Ranger},
  store::PlotStore,
};
use tokio::{sync::mpsc, task::JoinHandle};

/// Why a plot is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPurpose {
  /// Read-only detail popup.
  View,
  /// Load into the edit form.
  Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
  ListPlots,
  LoadPlot { id: PlotId, purpose: LoadPurpose },
  AddPlot(PlotFields),
  UpdatePlot { id: PlotId, fields: PlotFields },
  DeletePlot(PlotId),
  /// Find-or-create the ranger by name, then assign it.
  AssignRanger { plot_id: PlotId, ranger_name: String },
  ListAssignments(PlotId),
}

/// A request stripped of its payload; names a failed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  ListPlots,
  LoadPlot(PlotId),
  AddPlot,
  UpdatePlot(PlotId),
  DeletePlot(PlotId),
  AssignRanger(PlotId),
  ListAssignments(PlotId),
}

impl Request {
  pub fn action(&self) -> Action {
    match self {
      Self::ListPlots => Action::ListPlots,
      Self::LoadPlot { id, .. } => Action::LoadPlot(*id),
      Self::AddPlot(_) => Action::AddPlot,
      Self::UpdatePlot { id, .. } => Action::UpdatePlot(*id),
      Self::DeletePlot(id) => Action::DeletePlot(*id),
      Self::AssignRanger { plot_id, .. } => Action::AssignRanger(*plot_id),
      Self::ListAssignments(id) => Action::ListAssignments(*id),
    }
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::ListPlots => write!(f, "loading plots"),
      Self::LoadPlot(id) => write!(f, "loading plot {id}"),
      Self::AddPlot => write!(f, "adding plot"),
      Self::UpdatePlot(id) => write!(f, "saving plot {id}"),
      Self::DeletePlot(id) => write!(f, "deleting plot {id}"),
      Self::AssignRanger(id) => write!(f, "assigning ranger to plot {id}"),
      Self::ListAssignments(id) => write!(f, "loading rangers of plot {id}"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
  Plots(Vec<PlotSummary>),
  PlotLoaded {
    id:      PlotId,
    purpose: LoadPurpose,
    plot:    Option<Plot>,
  },
  PlotAdded(Plot),
  PlotUpdated { id: PlotId, found: bool },
  PlotDeleted { id: PlotId, found: bool },
  RangerAssigned {
    plot_id: PlotId,
    ranger:  Ranger,
    /// `false` if the ranger was already assigned to the plot.
    created: bool,
  },
  Assignments {
    plot_id: PlotId,
    entries: Vec<AssignedRanger>,
  },
  /// The request was abandoned; nothing changed on the UI side.
  Failed { action: Action, message: String },
}

/// Start the worker task on the current tokio runtime.
pub fn spawn<S>(
  store: S,
) -> (
  mpsc::UnboundedSender<Request>,
  mpsc::UnboundedReceiver<Completion>,
  JoinHandle<S>,
)
where
  S: PlotStore + 'static,
{
  let (request_tx, mut request_rx) = mpsc::unbounded_channel::<Request>();
  let (completion_tx, completion_rx) = mpsc::unbounded_channel();

  let handle = tokio::spawn(async move {
    while let Some(request) = request_rx.recv().await {
      let completion = execute(&store, request).await;
      if completion_tx.send(completion).is_err() {
        break;
      }
    }
    tracing::debug!("storage worker stopped");
    store
  });

  (request_tx, completion_rx, handle)
}

/// Run one request against `store`. Store errors become
/// [`Completion::Failed`] and are logged; they are never retried.
pub async fn execute<S: PlotStore>(store: &S, request: Request) -> Completion {
  let action = request.action();
  tracing::debug!(%action, "storage request");

  match run(store, request).await {
    Ok(completion) => completion,
    Err(e) => {
      tracing::error!(%action, error = %e, "storage request failed");
      Completion::Failed { action, message: e.to_string() }
    }
  }
}

async fn run<S: PlotStore>(store: &S, request: Request) -> Result<Completion, S::Error> {
  let completion = match request {
    Request::ListPlots => Completion::Plots(store.list_plots().await?),
    Request::LoadPlot { id, purpose } => Completion::PlotLoaded {
      id,
      purpose,
      plot: store.get_plot(id).await?,
    },
    Request::AddPlot(fields) => Completion::PlotAdded(store.add_plot(fields).await?),
    Request::UpdatePlot { id, fields } => Completion::PlotUpdated {
      id,
      found: store.update_plot(id, fields).await?,
    },
    Request::DeletePlot(id) => Completion::PlotDeleted {
      id,
      found: store.delete_plot(id).await?,
    },
    Request::AssignRanger { plot_id, ranger_name } => {
      // Two steps without rollback: a ranger created here stays even if the
      // assignment fails.
      let ranger = store.ensure_ranger(&ranger_name).await?;
      let created = store.assign_ranger(plot_id, ranger.id).await?.is_some();
      tracing::info!(%plot_id, ranger = %ranger.name, created, "ranger assigned");
      Completion::RangerAssigned { plot_id, ranger, created }
    }
    Request::ListAssignments(plot_id) => Completion::Assignments {
      plot_id,
      entries: store.list_assignments(plot_id).await?,
    },
  };
  Ok(completion)
}

#[cfg(test)]
mod tests {
  use forest_store_sqlite::SqliteStore;

  use super::*;

  async fn store() -> SqliteStore {
    SqliteStore::open_in_memory()
      .await
      .expect("in-memory store")
  }

  #[tokio::test]
  async fn requests_complete_in_order() {
    let (tx, mut rx, handle) = spawn(store().await);

    tx.send(Request::AddPlot(PlotFields::new("A", "B"))).unwrap();
    tx.send(Request::ListPlots).unwrap();

    let added = match rx.recv().await.unwrap() {
      Completion::PlotAdded(plot) => plot,
      other => panic!("unexpected completion: {other:?}"),
    };
    match rx.recv().await.unwrap() {
      Completion::Plots(plots) => {
        assert_eq!(plots.len(), 1);
        assert_eq!(plots[0].id, added.id);
      }
      other => panic!("unexpected completion: {other:?}"),
    }

    drop(tx);
    let store = handle.await.unwrap();
    store.close().await.unwrap();
  }

  #[tokio::test]
  async fn assign_ranger_creates_ranger_once() {
    let s = store().await;
    let plot = s.add_plot(PlotFields::new("A", "B")).await.unwrap();

    let request = || Request::AssignRanger {
      plot_id:     plot.id,
      ranger_name: "X".into(),
    };

    let first = execute(&s, request()).await;
    let second = execute(&s, request()).await;

    let (r1, r2) = match (first, second) {
      (
        Completion::RangerAssigned { ranger: r1, created: true, .. },
        Completion::RangerAssigned { ranger: r2, created: false, .. },
      ) => (r1, r2),
      other => panic!("unexpected completions: {other:?}"),
    };
    assert_eq!(r1.id, r2.id);
    assert_eq!(s.list_assignments(plot.id).await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn store_errors_become_failed_completions() {
    let s = store().await;
    let completion = execute(&s, Request::AssignRanger {
      plot_id:     PlotId(404),
      ranger_name: "X".into(),
    })
    .await;

    assert!(matches!(
      completion,
      Completion::Failed { action: Action::AssignRanger(PlotId(404)), .. }
    ));
  }

  #[tokio::test]
  async fn loading_a_missing_plot_is_not_an_error() {
    let s = store().await;
    let completion = execute(&s, Request::LoadPlot {
      id:      PlotId(5),
      purpose: LoadPurpose::Edit,
    })
    .await;

    assert_eq!(completion, Completion::PlotLoaded {
      id:      PlotId(5),
      purpose: LoadPurpose::Edit,
      plot:    None,
    });
  }
}
