//! Modal popups drawn over the body: plot detail, ranger assignment and the
//! assigned-rangers list.

use forest_core::{
  plot::{Plot, PlotId, format_survey_date},
  ranger::AssignedRanger,
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::Popup;

/// Render `popup` centred inside `area`.
pub fn draw(f: &mut Frame, area: Rect, popup: &Popup) {
  match popup {
    Popup::Detail(plot) => draw_detail(f, centered(area, 60, 60), plot),
    Popup::AssignRanger { plot_id, name } => {
      draw_assign(f, centered(area, 50, 20), *plot_id, name)
    }
    Popup::Assignments { plot_id, entries } => {
      draw_assignments(f, centered(area, 50, 50), *plot_id, entries)
    }
  }
}

/// A rectangle of `pct_x` × `pct_y` percent of `area`, centred.
fn centered(area: Rect, pct_x: u16, pct_y: u16) -> Rect {
  let vertical = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Percentage((100 - pct_y) / 2),
      Constraint::Percentage(pct_y),
      Constraint::Percentage((100 - pct_y) / 2),
    ])
    .split(area);
  Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage((100 - pct_x) / 2),
      Constraint::Percentage(pct_x),
      Constraint::Percentage((100 - pct_x) / 2),
    ])
    .split(vertical[1])[1]
}

fn popup_block(title: String) -> Block<'static> {
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan))
}

fn labelled(label: &str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<14}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

fn draw_detail(f: &mut Frame, area: Rect, plot: &Plot) {
  let mut lines = vec![
    labelled("Plot", plot.name.clone()),
    labelled("Location", plot.location.clone()),
    labelled("Survey date", format_survey_date(plot.survey_date)),
    Line::from(""),
  ];
  match &plot.notes {
    Some(notes) => lines.extend(notes.lines().map(|l| Line::from(l.to_string()))),
    None => lines.push(Line::from(Span::styled(
      "No notes.",
      Style::default().fg(Color::DarkGray),
    ))),
  }

  f.render_widget(Clear, area);
  f.render_widget(
    Paragraph::new(lines)
      .wrap(Wrap { trim: false })
      .block(popup_block(format!(" Plot #{} ", plot.id))),
    area,
  );
}

fn draw_assign(f: &mut Frame, area: Rect, plot_id: PlotId, name: &str) {
  let lines = vec![
    labelled("Ranger name", format!("{name}_")),
    Line::from(""),
    Line::from(Span::styled(
      "Enter assigns; a new name creates the ranger.",
      Style::default().fg(Color::DarkGray),
    )),
  ];

  f.render_widget(Clear, area);
  f.render_widget(
    Paragraph::new(lines).block(popup_block(format!(" Assign ranger to plot #{plot_id} "))),
    area,
  );
}

fn draw_assignments(f: &mut Frame, area: Rect, plot_id: PlotId, entries: &[AssignedRanger]) {
  let lines: Vec<Line> = if entries.is_empty() {
    vec![Line::from(Span::styled(
      "No rangers assigned.",
      Style::default().fg(Color::DarkGray),
    ))]
  } else {
    entries
      .iter()
      .map(|e| {
        labelled(
          &e.ranger_name,
          e.assigned_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        )
      })
      .collect()
  };

  f.render_widget(Clear, area);
  f.render_widget(
    Paragraph::new(lines).block(popup_block(format!(" Rangers of plot #{plot_id} "))),
    area,
  );
}
