//! TUI rendering — orchestrates all panes.

pub mod plot_form;
pub mod plot_list;
pub mod popup;

use chrono::Local;
use forest_core::selection::EditState;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Popup, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Form => plot_form::draw(f, rows[1], app),
    Screen::PlotList => plot_list::draw(f, rows[1], app),
  }
  if let Some(popup) = &app.popup {
    popup::draw(f, rows[1], popup);
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn tab_span(label: &str, active: bool) -> Span<'static> {
  let style = if active {
    Style::default()
      .fg(Color::Black)
      .bg(Color::White)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::White)
  };
  Span::styled(format!(" {label} "), style)
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let busy = if app.pending > 0 { "working… " } else { "" };

  let left = vec![
    Span::styled(
      " forest ",
      Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD),
    ),
    tab_span("F1 Plot form", app.screen == Screen::Form),
    Span::raw(" "),
    tab_span("F2 Plot list", app.screen == Screen::PlotList),
  ];
  let right = Span::styled(
    format!("{busy}{date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width: usize = left.iter().map(|s| s.content.chars().count()).sum();
  let right_width = right.content.chars().count();
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let mut spans = left;
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let editing_label;
  let (mode_label, hints): (&str, &str) = match (&app.popup, app.screen) {
    (Some(Popup::Detail(_)), _) => ("VIEW", "e edit  Esc close"),
    (Some(Popup::AssignRanger { .. }), _) => ("ASSIGN", "Type a ranger name  Enter assign  Esc cancel"),
    (Some(Popup::Assignments { .. }), _) => ("RANGERS", "Esc close"),
    (None, Screen::PlotList) if app.filter_active => (
      "SEARCH",
      "Type to filter  Esc clear  Enter done",
    ),
    (None, Screen::PlotList) => (
      "LIST",
      "↑↓/jk move  Enter view  e edit  d delete  a assign  r rangers  / filter  q quit",
    ),
    (None, Screen::Form) => match app.selection.state() {
      EditState::Idle => ("NEW", "Tab next field  Ctrl-N add  Esc list"),
      EditState::Editing(id) => {
        editing_label = format!("EDIT #{id}");
        (
          editing_label.as_str(),
          "Tab next field  Ctrl-S save  Esc cancel  Ctrl-N add as new",
        )
      }
    },
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::Gray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
