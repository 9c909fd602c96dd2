//! Modal input dialog drawn over the table.

use hearth_core::Field;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::controller::Form;

const LABEL_WIDTH: usize = 14;

/// A `width` × `height` rectangle centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [rect] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  rect
}

/// Render `form` as a centred modal.
pub fn draw(f: &mut Frame, area: Rect, form: &Form) {
  let rect = centered(area, area.width.min(60), 10);
  f.render_widget(Clear, rect);

  let block = Block::default()
    .title(format!(" {} ", form.title()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(rect);
  f.render_widget(block, rect);

  let lines = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // id
      Constraint::Length(1),
      Constraint::Length(4), // fields
      Constraint::Length(1),
      Constraint::Length(1), // hints
    ])
    .split(inner);

  let id_label = if form.id.is_sentinel() {
    "new record".to_string()
  } else {
    format!("id {}", form.id)
  };
  f.render_widget(
    Paragraph::new(id_label).style(Style::default().fg(Color::DarkGray)),
    lines[0],
  );

  let fields: Vec<Line> = Field::all()
    .map(|field| {
      let focused = field == form.focus;
      let value_style = if focused {
        Style::default()
          .fg(Color::White)
          .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
      } else {
        Style::default()
      };
      let cursor = if focused { "_" } else { "" };
      Line::from(vec![
        Span::styled(
          format!("{:<LABEL_WIDTH$}", field.label()),
          Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("{}{cursor}", form.fields.get(field)), value_style),
      ])
    })
    .collect();
  f.render_widget(Paragraph::new(fields), lines[2]);

  f.render_widget(
    Paragraph::new("Enter save  Esc close").style(Style::default().fg(Color::DarkGray)),
    lines[4],
  );
}
