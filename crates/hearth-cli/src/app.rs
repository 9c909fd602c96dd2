//! Application state and key dispatcher for the TUI.
//!
//! Store work never runs on the event loop: each job is spawned onto the
//! runtime and its outcome comes back over a channel, which the loop drains
//! between frames.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hearth_core::{RecordId, RecordStore};
use tokio::sync::mpsc;

use crate::controller::{Controller, Job, Outcome};

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S: RecordStore> {
  pub controller: Controller<S>,

  /// Cursor position within the displayed rows.
  pub cursor: usize,

  outcomes_tx: mpsc::UnboundedSender<Outcome<S::Error>>,
  outcomes_rx: mpsc::UnboundedReceiver<Outcome<S::Error>>,
}

impl<S: RecordStore + 'static> App<S> {
  pub fn new(store: S) -> Self {
    let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
    Self {
      controller: Controller::new(Arc::new(store)),
      cursor: 0,
      outcomes_tx,
      outcomes_rx,
    }
  }

  /// Record id under the cursor, if any.
  pub fn cursor_id(&self) -> Option<RecordId> {
    self.controller.table().row(self.cursor).map(|r| r.id.clone())
  }

  // ── Jobs ──────────────────────────────────────────────────────────────────

  /// Kick off the initial load without waiting for it; the first frames show
  /// an empty table while it is in flight.
  pub fn start(&mut self) {
    let job = self.controller.begin_refresh();
    self.dispatch(job);
  }

  /// Run `job` on its own task; the outcome is picked up by
  /// [`Self::drain_outcomes`].
  fn dispatch(&self, job: Job) {
    let store = Arc::clone(self.controller.store());
    let tx = self.outcomes_tx.clone();
    tokio::spawn(async move {
      let outcome = job.run(store.as_ref()).await;
      // The receiver only goes away when the app is shutting down.
      let _ = tx.send(outcome);
    });
  }

  /// Apply every outcome that has arrived. Returns `true` if any did.
  pub fn drain_outcomes(&mut self) -> bool {
    let mut any = false;
    while let Ok(outcome) = self.outcomes_rx.try_recv() {
      self.apply(outcome);
      any = true;
    }
    any
  }

  /// Wait for the next outcome and apply it.
  #[cfg(test)]
  pub async fn next_outcome(&mut self) {
    if let Some(outcome) = self.outcomes_rx.recv().await {
      self.apply(outcome);
    }
  }

  fn apply(&mut self, outcome: Outcome<S::Error>) {
    // Failures are reported through the controller's status line.
    let _ = self.controller.finish(outcome);
    self.clamp_cursor();
  }

  fn clamp_cursor(&mut self) {
    let len = self.controller.table().len();
    if self.cursor >= len {
      self.cursor = len.saturating_sub(1);
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    if self.controller.dialog().is_open() {
      self.handle_dialog_key(key);
      return true;
    }
    self.handle_table_key(key)
  }

  fn handle_table_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      // Quit
      KeyCode::Char('q') => return false,

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.controller.table().len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }
      KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
      KeyCode::End | KeyCode::Char('G') => {
        self.cursor = self.controller.table().len().saturating_sub(1);
      }

      // Actions
      KeyCode::Char('n') => {
        self.controller.open_form(RecordId::sentinel());
      }
      KeyCode::Enter | KeyCode::Char('e') => {
        if let Some(id) = self.cursor_id() {
          self.controller.open_form(id);
        }
      }
      KeyCode::Char('d') | KeyCode::Delete => {
        if let Some(id) = self.cursor_id() {
          let job = self.controller.begin_delete(id);
          self.dispatch(job);
        }
      }
      KeyCode::Char('r') => {
        let job = self.controller.begin_refresh();
        self.dispatch(job);
      }

      _ => {}
    }
    true
  }

  fn handle_dialog_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => self.controller.close_form(),
      KeyCode::Enter => {
        if let Some(job) = self.controller.begin_save() {
          self.dispatch(job);
        }
      }
      KeyCode::Tab | KeyCode::Down => {
        if let Some(form) = self.controller.dialog_mut().form_mut() {
          form.focus_next();
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        if let Some(form) = self.controller.dialog_mut().form_mut() {
          form.focus_prev();
        }
      }
      KeyCode::Backspace => {
        if let Some(form) = self.controller.dialog_mut().form_mut() {
          form.pop();
        }
      }
      KeyCode::Char(c) => {
        if let Some(form) = self.controller.dialog_mut().form_mut() {
          form.push(c);
        }
      }
      _ => {}
    }
  }
}
