//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use forest_core::{
  plot::{PlotFields, PlotId},
  ranger::RangerId,
  store::{OrphanPolicy, PlotStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn plot(name: &str) -> PlotFields { PlotFields::new(name, "Sector 1") }

// ─── Plots ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_plot_then_list_shows_exact_values() {
  let s = store().await;

  let added = s
    .add_plot(
      PlotFields::new("A", "B")
        .with_survey_date(date(2024, 1, 1))
        .with_notes("n"),
    )
    .await
    .unwrap();

  let plots = s.list_plots().await.unwrap();
  assert_eq!(plots.len(), 1);
  assert_eq!(plots[0].id, added.id);
  assert_eq!(plots[0].name, "A");
  assert_eq!(plots[0].location, "B");
  assert_eq!(plots[0].survey_date, Some(date(2024, 1, 1)));

  let fetched = s.get_plot(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.notes.as_deref(), Some("n"));
  assert_eq!(fetched, added);
}

#[tokio::test]
async fn generated_ids_are_fresh() {
  let s = store().await;
  let a = s.add_plot(plot("one")).await.unwrap();
  let b = s.add_plot(plot("two")).await.unwrap();
  assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn add_plot_without_date_or_notes() {
  let s = store().await;
  let added = s.add_plot(plot("bare")).await.unwrap();

  let fetched = s.get_plot(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.survey_date, None);
  assert_eq!(fetched.notes, None);
}

#[tokio::test]
async fn get_plot_missing_returns_none() {
  let s = store().await;
  assert!(s.get_plot(PlotId(42)).await.unwrap().is_none());
}

#[tokio::test]
async fn update_then_get_roundtrips_new_values() {
  let s = store().await;
  let added = s
    .add_plot(plot("old").with_survey_date(date(2020, 3, 3)).with_notes("x"))
    .await
    .unwrap();

  let new_fields = PlotFields::new("new", "Sector 9").with_survey_date(date(2025, 7, 14));
  assert!(s.update_plot(added.id, new_fields.clone()).await.unwrap());

  let fetched = s.get_plot(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, added.id);
  assert_eq!(fetched.fields(), new_fields);
  assert_eq!(fetched.notes, None);
}

#[tokio::test]
async fn update_missing_plot_is_a_silent_noop() {
  let s = store().await;
  let changed = s.update_plot(PlotId(99), plot("ghost")).await.unwrap();
  assert!(!changed);
  assert!(s.list_plots().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_removes_from_list_and_get() {
  let s = store().await;
  let keep = s.add_plot(plot("keep")).await.unwrap();
  let gone = s.add_plot(plot("gone")).await.unwrap();

  assert!(s.delete_plot(gone.id).await.unwrap());

  let ids: Vec<_> = s.list_plots().await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![keep.id]);
  assert!(s.get_plot(gone.id).await.unwrap().is_none());

  assert!(!s.delete_plot(gone.id).await.unwrap());
}

// ─── Ordering ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_orders_by_survey_date_descending() {
  let s = store().await;
  let older = s
    .add_plot(plot("older").with_survey_date(date(2023, 1, 1)))
    .await
    .unwrap();
  let newer = s
    .add_plot(plot("newer").with_survey_date(date(2024, 1, 1)))
    .await
    .unwrap();

  let ids: Vec<_> = s.list_plots().await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![newer.id, older.id]);
}

#[tokio::test]
async fn undated_plots_sort_last() {
  let s = store().await;
  let p1 = s.add_plot(plot("P1")).await.unwrap();
  let p2 = s
    .add_plot(plot("P2").with_survey_date(date(2024, 6, 1)))
    .await
    .unwrap();
  let p3 = s.add_plot(plot("P3")).await.unwrap();

  let ids: Vec<_> = s.list_plots().await.unwrap().into_iter().map(|p| p.id).collect();
  // Undated plots keep insertion (id) order among themselves.
  assert_eq!(ids, vec![p2.id, p1.id, p3.id]);
}

#[tokio::test]
async fn update_moves_plot_in_ordering() {
  let s = store().await;
  let a = s
    .add_plot(plot("a").with_survey_date(date(2024, 1, 1)))
    .await
    .unwrap();
  let b = s
    .add_plot(plot("b").with_survey_date(date(2022, 1, 1)))
    .await
    .unwrap();

  s.update_plot(b.id, plot("b").with_survey_date(date(2025, 1, 1)))
    .await
    .unwrap();

  let ids: Vec<_> = s.list_plots().await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![b.id, a.id]);
}

// ─── Rangers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_ranger_is_idempotent_by_name() {
  let s = store().await;
  let first = s.ensure_ranger("X").await.unwrap();
  let second = s.ensure_ranger("X").await.unwrap();
  assert_eq!(first.id, second.id);
  assert_eq!(second.name, "X");

  let all = s.list_rangers().await.unwrap();
  assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn distinct_names_get_distinct_rangers() {
  let s = store().await;
  let a = s.ensure_ranger("Ivanov").await.unwrap();
  let b = s.ensure_ranger("Petrova").await.unwrap();
  assert_ne!(a.id, b.id);

  let names: Vec<_> = s
    .list_rangers()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.name)
    .collect();
  assert_eq!(names, vec!["Ivanov", "Petrova"]);
}

#[tokio::test]
async fn ranger_names_match_case_insensitively() {
  let s = store().await;
  let first = s.ensure_ranger("Ivanov").await.unwrap();
  let second = s.ensure_ranger("IVANOV").await.unwrap();

  assert_eq!(first.id, second.id);
  assert_eq!(second.name, "Ivanov", "the first spelling is kept");
  assert_eq!(s.list_rangers().await.unwrap().len(), 1);
}

// ─── Assignments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn assign_twice_yields_one_row() {
  let s = store().await;
  let p = s.add_plot(plot("p")).await.unwrap();
  let r = s.ensure_ranger("X").await.unwrap();

  let first = s.assign_ranger(p.id, r.id).await.unwrap();
  let assignment = first.expect("first assignment is new");
  assert_eq!(assignment.plot_id, p.id);
  assert_eq!(assignment.ranger_id, r.id);

  let second = s.assign_ranger(p.id, r.id).await.unwrap();
  assert!(second.is_none());

  let listed = s.list_assignments(p.id).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].ranger_name, "X");
  assert_eq!(listed[0].assigned_at, assignment.assigned_at);
}

#[tokio::test]
async fn list_assignments_only_covers_the_given_plot() {
  let s = store().await;
  let p1 = s.add_plot(plot("p1")).await.unwrap();
  let p2 = s.add_plot(plot("p2")).await.unwrap();
  let a = s.ensure_ranger("A").await.unwrap();
  let b = s.ensure_ranger("B").await.unwrap();

  s.assign_ranger(p1.id, a.id).await.unwrap();
  s.assign_ranger(p1.id, b.id).await.unwrap();
  s.assign_ranger(p2.id, b.id).await.unwrap();

  let mut names: Vec<_> = s
    .list_assignments(p1.id)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.ranger_name)
    .collect();
  names.sort();
  assert_eq!(names, vec!["A", "B"]);

  let p2_names: Vec<_> = s
    .list_assignments(p2.id)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.ranger_name)
    .collect();
  assert_eq!(p2_names, vec!["B"]);
}

#[tokio::test]
async fn assign_to_missing_plot_errors() {
  let s = store().await;
  let r = s.ensure_ranger("X").await.unwrap();

  let err = s.assign_ranger(PlotId(404), r.id).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(forest_core::Error::PlotNotFound(PlotId(404)))
  ));
}

#[tokio::test]
async fn assign_unknown_ranger_errors() {
  let s = store().await;
  let p = s.add_plot(plot("p")).await.unwrap();

  let err = s.assign_ranger(p.id, RangerId(77)).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(forest_core::Error::RangerNotFound(RangerId(77)))
  ));
}

// ─── Orphan policy ───────────────────────────────────────────────────────────

#[tokio::test]
async fn retain_policy_keeps_assignments_after_delete() {
  let s = store().await;

  let p = s.add_plot(plot("p")).await.unwrap();
  let r = s.ensure_ranger("X").await.unwrap();
  s.assign_ranger(p.id, r.id).await.unwrap();

  assert!(s.delete_plot(p.id).await.unwrap());
  assert_eq!(s.list_assignments(p.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn cascade_policy_removes_assignments_with_plot() {
  let s = store().await.with_orphan_policy(OrphanPolicy::Cascade);

  let p = s.add_plot(plot("p")).await.unwrap();
  let other = s.add_plot(plot("other")).await.unwrap();
  let r = s.ensure_ranger("X").await.unwrap();
  s.assign_ranger(p.id, r.id).await.unwrap();
  s.assign_ranger(other.id, r.id).await.unwrap();

  assert!(s.delete_plot(p.id).await.unwrap());
  assert!(s.list_assignments(p.id).await.unwrap().is_empty());
  assert_eq!(s.list_assignments(other.id).await.unwrap().len(), 1);

  // Rangers themselves are never deleted.
  assert_eq!(s.list_rangers().await.unwrap().len(), 1);
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_file_store_persists_across_reopen() {
  let dir = std::env::temp_dir().join(format!("forest-store-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("plots.db");
  let _ = std::fs::remove_file(&path);

  let s = SqliteStore::open(&path).await.unwrap();
  let added = s.add_plot(plot("durable")).await.unwrap();
  s.close().await.unwrap();

  let reopened = SqliteStore::open(&path).await.unwrap();
  let fetched = reopened.get_plot(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "durable");
  reopened.close().await.unwrap();

  let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn open_in_missing_directory_is_a_connection_error() {
  let path = std::env::temp_dir()
    .join("forest-no-such-dir")
    .join("nested")
    .join("plots.db");

  let err = SqliteStore::open(&path).await.err().expect("open must fail");
  assert!(matches!(err, crate::Error::Connection { path: ref p, .. } if *p == path));
}
