//! Plot list pane.

use forest_core::plot::format_survey_date;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

/// Render the plot list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_plots();
  let total = app.plots.len();

  // Title with count.
  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Plots ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Plots ({}) ", total)
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let editing = app.selection.editing();

  // One line per plot: id, name, location, survey date.
  let items: Vec<ListItem> = filtered
    .iter()
    .map(|plot| {
      let marker = if Some(plot.id) == editing { "✎ " } else { "  " };
      ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(
          format!("{:>4}  ", plot.id.0),
          Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("{:<24}", plot.name)),
        Span::styled(
          format!("{:<24}", plot.location),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw(format_survey_date(plot.survey_date)),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // If filter is active or set, show a filter bar at the bottom of the inner area.
  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if filtered.is_empty() {
    let hint = if total == 0 {
      "No plots yet. Press F1 to add one."
    } else {
      "No plots match the filter."
    };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  // Scrollable list with cursor tracking.
  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
