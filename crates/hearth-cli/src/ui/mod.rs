//! TUI rendering — orchestrates all panes.

pub mod record_form;
pub mod records_table;

use chrono::Local;
use hearth_core::RecordStore;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::{app::App, controller::Status};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: RecordStore + 'static>(f: &mut Frame, app: &App<S>) {
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

  draw_header(f, rows[0]);
  records_table::draw(f, rows[1], app);
  draw_status(f, rows[2], app);

  if let Some(form) = app.controller.dialog().form() {
    record_form::draw(f, area, form);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " hearth  family members",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.len() as u16;
  let right_width = right.content.len() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: RecordStore + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = if app.controller.dialog().is_open() {
    ("FORM", "Tab/↑↓ field  Enter save  Esc cancel")
  } else {
    ("TABLE", "↑↓/jk move  n new  e edit  d delete  r refresh  q quit")
  };

  let (text, color) = match app.controller.status() {
    Some(Status::Error(msg)) => (msg.clone(), Color::Red),
    Some(Status::Info(msg)) => (msg.clone(), Color::Green),
    None => (hints.to_string(), Color::DarkGray),
  };

  let mut spans = vec![Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  )];
  if app.controller.in_flight() > 0 {
    spans.push(Span::styled(
      "  syncing…",
      Style::default().fg(Color::Yellow),
    ));
  }
  spans.push(Span::styled(format!("  {text}"), Style::default().fg(color)));

  f.render_widget(
    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black)),
    area,
  );
}
