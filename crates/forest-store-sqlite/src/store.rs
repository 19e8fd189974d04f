//! [`SqliteStore`] — the SQLite implementation of [`PlotStore`].

use std::path::{Path, PathBuf};

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;

use forest_core::{
  plot::{Plot, PlotFields, PlotId, PlotSummary},
  ranger::{AssignedRanger, Assignment, Ranger, RangerId},
  store::{OrphanPolicy, PlotStore},
};

use crate::{
  encode::{encode_date, encode_dt, RawAssignedRanger, RawPlot, RawPlotSummary},
  schema::SCHEMA,
  Error, Result,
};

/// Result of the existence checks and insert done by `assign_ranger` in a
/// single connection call.
enum AssignOutcome {
  PlotMissing,
  RangerMissing,
  AlreadyAssigned,
  Created,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A plot registry backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Statements
/// from all clones are executed one at a time on the connection's thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  orphans: OrphanPolicy,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// Any failure here is reported as [`Error::Connection`].
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path)
      .await
      .map_err(|source| Error::Connection { path: path.clone(), source })?;
    Self::init(conn, path).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let path = PathBuf::from(":memory:");
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(|source| Error::Connection { path: path.clone(), source })?;
    Self::init(conn, path).await
  }

  async fn init(conn: tokio_rusqlite::Connection, path: PathBuf) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(|source| Error::Connection { path: path.clone(), source })?;

    tracing::info!(path = %path.display(), "opened plot store");
    Ok(Self { conn, orphans: OrphanPolicy::default() })
  }

  /// Choose what [`PlotStore::delete_plot`] does with a plot's assignments.
  pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
    self.orphans = policy;
    self
  }

  /// Close the underlying connection. Other clones fail afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    tracing::info!("closed plot store");
    Ok(())
  }
}

// ─── PlotStore impl ──────────────────────────────────────────────────────────

impl PlotStore for SqliteStore {
  type Error = Error;

  // ── Plots ─────────────────────────────────────────────────────────────────

  async fn list_plots(&self) -> Result<Vec<PlotSummary>> {
    let raws: Vec<RawPlotSummary> = self
      .conn
      .call(|conn| {
        // NULL sorts lowest in SQLite, so undated plots land at the end.
        let mut stmt = conn.prepare(
          "SELECT id, name, location, survey_date
           FROM forest_plots
           ORDER BY survey_date DESC, id ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawPlotSummary {
              id:          row.get(0)?,
              name:        row.get(1)?,
              location:    row.get(2)?,
              survey_date: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlotSummary::into_summary).collect()
  }

  async fn get_plot(&self, id: PlotId) -> Result<Option<Plot>> {
    let raw: Option<RawPlot> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, name, location, survey_date, notes
             FROM forest_plots WHERE id = ?1",
            rusqlite::params![id.0],
            |row| {
              Ok(RawPlot {
                id:          row.get(0)?,
                name:        row.get(1)?,
                location:    row.get(2)?,
                survey_date: row.get(3)?,
                notes:       row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPlot::into_plot).transpose()
  }

  async fn add_plot(&self, fields: PlotFields) -> Result<Plot> {
    let name     = fields.name.clone();
    let location = fields.location.clone();
    let date_str = fields.survey_date.map(encode_date);
    let notes    = fields.notes.clone();

    let rowid: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO forest_plots (name, location, survey_date, notes)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![name, location, date_str, notes],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    let plot = Plot {
      id:          PlotId(rowid),
      name:        fields.name,
      location:    fields.location,
      survey_date: fields.survey_date,
      notes:       fields.notes,
    };
    tracing::debug!(plot_id = %plot.id, "added plot");
    Ok(plot)
  }

  async fn update_plot(&self, id: PlotId, fields: PlotFields) -> Result<bool> {
    let date_str = fields.survey_date.map(encode_date);

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE forest_plots
           SET name = ?1, location = ?2, survey_date = ?3, notes = ?4
           WHERE id = ?5",
          rusqlite::params![fields.name, fields.location, date_str, fields.notes, id.0],
        )?;
        Ok(n > 0)
      })
      .await?;

    if changed {
      tracing::debug!(plot_id = %id, "updated plot");
    } else {
      tracing::warn!(plot_id = %id, "update matched no plot");
    }
    Ok(changed)
  }

  async fn delete_plot(&self, id: PlotId) -> Result<bool> {
    let policy = self.orphans;

    let deleted = self
      .conn
      .call(move |conn| {
        let n = match policy {
          OrphanPolicy::Retain => conn.execute(
            "DELETE FROM forest_plots WHERE id = ?1",
            rusqlite::params![id.0],
          )?,
          OrphanPolicy::Cascade => {
            let tx = conn.transaction()?;
            tx.execute(
              "DELETE FROM assignments WHERE plot_id = ?1",
              rusqlite::params![id.0],
            )?;
            let n = tx.execute(
              "DELETE FROM forest_plots WHERE id = ?1",
              rusqlite::params![id.0],
            )?;
            tx.commit()?;
            n
          }
        };
        Ok(n > 0)
      })
      .await?;

    tracing::debug!(plot_id = %id, deleted, ?policy, "delete plot");
    Ok(deleted)
  }

  // ── Rangers ───────────────────────────────────────────────────────────────

  async fn ensure_ranger(&self, name: &str) -> Result<Ranger> {
    let lookup = name.to_owned();

    // Names compare case-insensitively. The no-op DO UPDATE keeps the first
    // spelling and makes RETURNING yield the existing row.
    let (id, name): (i64, String) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO rangers (name) VALUES (?1)
           ON CONFLICT(name) DO UPDATE SET name = rangers.name
           RETURNING id, name",
          rusqlite::params![lookup],
          |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
      })
      .await?;

    Ok(Ranger { id: RangerId(id), name })
  }

  async fn list_rangers(&self) -> Result<Vec<Ranger>> {
    let rangers = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id, name FROM rangers ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Ranger { id: RangerId(row.get(0)?), name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rangers)
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn assign_ranger(
    &self,
    plot_id:   PlotId,
    ranger_id: RangerId,
  ) -> Result<Option<Assignment>> {
    let assigned_at = Utc::now().trunc_subsecs(6);
    let at_str      = encode_dt(assigned_at);

    let outcome = self
      .conn
      .call(move |conn| {
        let plot_exists = conn
          .query_row(
            "SELECT 1 FROM forest_plots WHERE id = ?1",
            rusqlite::params![plot_id.0],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !plot_exists {
          return Ok(AssignOutcome::PlotMissing);
        }

        let ranger_exists = conn
          .query_row(
            "SELECT 1 FROM rangers WHERE id = ?1",
            rusqlite::params![ranger_id.0],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !ranger_exists {
          return Ok(AssignOutcome::RangerMissing);
        }

        let n = conn.execute(
          "INSERT OR IGNORE INTO assignments (ranger_id, plot_id, assignment_date)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![ranger_id.0, plot_id.0, at_str],
        )?;
        Ok(if n > 0 {
          AssignOutcome::Created
        } else {
          AssignOutcome::AlreadyAssigned
        })
      })
      .await?;

    match outcome {
      AssignOutcome::PlotMissing => {
        Err(forest_core::Error::PlotNotFound(plot_id).into())
      }
      AssignOutcome::RangerMissing => {
        Err(forest_core::Error::RangerNotFound(ranger_id).into())
      }
      AssignOutcome::AlreadyAssigned => Ok(None),
      AssignOutcome::Created => {
        tracing::debug!(%plot_id, %ranger_id, "assigned ranger");
        Ok(Some(Assignment { ranger_id, plot_id, assigned_at }))
      }
    }
  }

  async fn list_assignments(&self, plot_id: PlotId) -> Result<Vec<AssignedRanger>> {
    let raws: Vec<RawAssignedRanger> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT r.id, r.name, a.assignment_date
           FROM assignments a
           JOIN rangers r ON r.id = a.ranger_id
           WHERE a.plot_id = ?1
           ORDER BY a.assignment_date, r.name",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![plot_id.0], |row| {
            Ok(RawAssignedRanger {
              ranger_id:       row.get(0)?,
              ranger_name:     row.get(1)?,
              assignment_date: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignedRanger::into_assigned).collect()
  }
}
