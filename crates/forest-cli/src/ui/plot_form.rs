//! Add/edit form pane.

use forest_core::selection::EditState;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{app::App, form::FormField};

const LABEL_WIDTH: usize = 14;

/// Render the form into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let title = match app.selection.state() {
    EditState::Idle => " New plot ".to_string(),
    EditState::Editing(id) => format!(" Editing plot #{id} "),
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  // Three single-line fields, the notes area, then the button row.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),
      Constraint::Length(1),
      Constraint::Length(1),
      Constraint::Length(1),
      Constraint::Min(3),
      Constraint::Length(1),
    ])
    .split(inner);

  for (row, field) in [
    (rows[0], FormField::Name),
    (rows[1], FormField::Location),
    (rows[2], FormField::SurveyDate),
  ] {
    f.render_widget(Paragraph::new(field_line(app, field)), row);
  }

  f.render_widget(Paragraph::new(field_line(app, FormField::Notes)), rows[3]);
  let notes_style = field_style(app.form.focus == FormField::Notes);
  let mut notes = app.form.notes.clone();
  if app.form.focus == FormField::Notes {
    notes.push('_');
  }
  f.render_widget(
    Paragraph::new(notes)
      .style(notes_style)
      .wrap(Wrap { trim: false })
      .block(Block::default().borders(Borders::LEFT)),
    rows[4],
  );

  f.render_widget(Paragraph::new(button_line(app)), rows[5]);
}

fn field_style(focused: bool) -> Style {
  if focused {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
  } else {
    Style::default()
  }
}

fn field_line(app: &App, field: FormField) -> Line<'static> {
  let focused = app.form.focus == field;
  let label = Span::styled(
    format!("{:<width$}", format!("{}:", field.label()), width = LABEL_WIDTH),
    Style::default().fg(Color::Cyan),
  );
  if field == FormField::Notes {
    return Line::from(label);
  }

  let mut value = app.form.value(field).to_string();
  if focused {
    value.push('_');
  } else if field == FormField::SurveyDate && value.is_empty() {
    value = "YYYY-MM-DD".into();
  }
  Line::from(vec![label, Span::styled(value, field_style(focused))])
}

/// Save and cancel are only enabled while a plot is loaded.
fn button_line(app: &App) -> Line<'static> {
  let enabled = Style::default().fg(Color::Black).bg(Color::Green);
  let disabled = Style::default().fg(Color::DarkGray);
  let editing = app.selection.is_editing();

  let add_style = if app.form_busy { disabled } else { enabled };
  let edit_style = if editing && !app.form_busy { enabled } else { disabled };

  Line::from(vec![
    Span::styled(" Ctrl-N Add plot ", add_style),
    Span::raw("  "),
    Span::styled(" Ctrl-S Save ", edit_style),
    Span::raw("  "),
    Span::styled(" Esc Cancel ", if editing { enabled } else { disabled }),
  ])
}
