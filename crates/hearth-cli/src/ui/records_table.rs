//! Records table — the main pane.

use hearth_core::{Field, RecordStore};
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::App;

/// Render the table of records into `area`, in display order.
pub fn draw<S: RecordStore + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let table = app.controller.table();

  let block = Block::default()
    .title(format!(" Family Members ({}) ", table.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if table.is_empty() {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(Line::from("No family members. Press n to add one."))
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let header = Row::new(Field::all().map(|field| Cell::from(field.label())))
    .style(
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    );

  let rows = table.rows().map(|record| {
    Row::new(Field::all().map(|field| Cell::from(record.get(field).to_string())))
  });

  let widths = [
    Constraint::Percentage(28),
    Constraint::Percentage(28),
    Constraint::Percentage(12),
    Constraint::Percentage(32),
  ];

  let mut state = TableState::default();
  state.select(Some(app.cursor));

  f.render_stateful_widget(
    Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}
