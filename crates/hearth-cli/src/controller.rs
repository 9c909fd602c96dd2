//! View controller — keeps the displayed table in step with the remote
//! collection and owns the input dialog.
//!
//! Every mutation is followed by a full re-fetch; the table is only ever
//! replaced wholesale from a list result, never patched. Work is split into a
//! synchronous half that touches controller state ([`Controller::begin_save`],
//! [`Controller::finish`], …) and a [`Job`] that talks to the store, so the
//! TUI can run jobs on spawned tasks while tests await them inline.

use std::{
  collections::HashMap,
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
};

use hearth_core::{Field, Record, RecordFields, RecordId, RecordStore};
use thiserror::Error;

pub const CREATE_TITLE: &str = "Create Family Member";
pub const EDIT_TITLE: &str = "Edit Family Member";

// ─── Table ────────────────────────────────────────────────────────────────────

/// The last applied list result.
///
/// Rows display in reverse fetch order: the last record fetched is shown
/// first.
#[derive(Debug, Default)]
pub struct Table {
  /// Fetch order.
  records: Vec<Record>,
  index:   HashMap<RecordId, usize>,
}

impl Table {
  /// Replace the whole table with `records`.
  ///
  /// A repeated id keeps its first occurrence; the rest are dropped.
  pub fn replace(&mut self, records: Vec<Record>) {
    self.records.clear();
    self.index.clear();
    for record in records {
      if self.index.contains_key(&record.id) {
        tracing::warn!(id = %record.id, "dropping duplicate record id from list result");
        continue;
      }
      self.index.insert(record.id.clone(), self.records.len());
      self.records.push(record);
    }
  }

  /// Rows in display order.
  pub fn rows(&self) -> impl ExactSizeIterator<Item = &Record> + DoubleEndedIterator {
    self.records.iter().rev()
  }

  /// The row at display position `i`.
  pub fn row(&self, i: usize) -> Option<&Record> {
    let n = self.records.len();
    i.checked_add(1)
      .and_then(|k| n.checked_sub(k))
      .map(|j| &self.records[j])
  }

  pub fn find(&self, id: &RecordId) -> Option<&Record> {
    self.index.get(id).map(|&i| &self.records[i])
  }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

// ─── Dialog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Edit,
}

impl FormMode {
  pub fn title(self) -> &'static str {
    match self {
      FormMode::Create => CREATE_TITLE,
      FormMode::Edit => EDIT_TITLE,
    }
  }
}

/// The contents of the open input dialog: four editable fields bound to an
/// id. The sentinel id means the dialog is creating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
  pub id:     RecordId,
  pub fields: RecordFields,
  pub focus:  Field,
}

impl Form {
  pub fn mode(&self) -> FormMode {
    if self.id.is_sentinel() {
      FormMode::Create
    } else {
      FormMode::Edit
    }
  }

  pub fn title(&self) -> &'static str { self.mode().title() }

  pub fn focus_next(&mut self) {
    let fields: Vec<_> = Field::all().collect();
    let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
    self.focus = fields[(i + 1) % fields.len()];
  }

  pub fn focus_prev(&mut self) {
    let fields: Vec<_> = Field::all().collect();
    let i = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
    self.focus = fields[(i + fields.len() - 1) % fields.len()];
  }

  pub fn push(&mut self, c: char) { self.fields.get_mut(self.focus).push(c); }

  pub fn pop(&mut self) { self.fields.get_mut(self.focus).pop(); }

  /// Overwrite one field, whatever has focus.
  pub fn set(&mut self, field: Field, value: impl Into<String>) {
    *self.fields.get_mut(field) = value.into();
  }
}

/// Input dialog state. Starts closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Dialog {
  #[default]
  Closed,
  Open(Form),
}

impl Dialog {
  pub fn form(&self) -> Option<&Form> {
    match self {
      Dialog::Open(form) => Some(form),
      Dialog::Closed => None,
    }
  }

  pub fn form_mut(&mut self) -> Option<&mut Form> {
    match self {
      Dialog::Open(form) => Some(form),
      Dialog::Closed => None,
    }
  }

  pub fn is_open(&self) -> bool { matches!(self, Dialog::Open(_)) }
}

// ─── Jobs ─────────────────────────────────────────────────────────────────────

/// A remote change to make before re-fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
  Create(RecordFields),
  Update(RecordId, RecordFields),
  Delete(RecordId),
}

impl Mutation {
  fn verb(&self) -> &'static str {
    match self {
      Mutation::Create(_) => "create",
      Mutation::Update(..) => "update",
      Mutation::Delete(_) => "delete",
    }
  }
}

/// What a mutation did, as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
  Created(Record),
  /// `None` when the store no longer had the record.
  Updated(RecordId, Option<Record>),
  /// `None` when the store had no record or answered with an empty body.
  Deleted(RecordId, Option<Record>),
}

impl Applied {
  /// One-line summary for the status bar.
  pub fn summary(&self) -> String {
    match self {
      Applied::Created(r) => {
        format!("Created {} {} (id {})", r.first_name, r.last_name, r.id)
      }
      Applied::Updated(_, Some(r)) => {
        format!("Updated {} {} (id {})", r.first_name, r.last_name, r.id)
      }
      Applied::Updated(id, None) => format!("Record {id} no longer exists"),
      Applied::Deleted(id, _) => format!("Deleted record {id}"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Failure<E: std::error::Error + 'static> {
  #[error("{verb} failed: {source}")]
  Mutation {
    verb:   &'static str,
    #[source]
    source: E,
  },

  #[error("refresh failed: {source}")]
  Refresh {
    applied: Option<Applied>,
    #[source]
    source:  E,
  },
}

/// An optional mutation followed by a full list.
///
/// The list is numbered from a counter shared by every job of one controller
/// at the moment it is sent, so list results can be ordered by issue time
/// whatever order their jobs were dispatched or finished in.
#[derive(Debug, Clone)]
pub struct Job {
  mutation: Option<Mutation>,
  lists:    Arc<AtomicU64>,
}

/// A list result ready to be applied.
#[derive(Debug)]
pub struct Synced {
  /// Issue number of the list request that produced `records`.
  pub seq:     u64,
  pub applied: Option<Applied>,
  pub records: Vec<Record>,
}

#[derive(Debug)]
pub struct Outcome<E: std::error::Error + 'static> {
  pub result: Result<Synced, Failure<E>>,
}

impl Job {
  pub fn mutation(&self) -> Option<&Mutation> { self.mutation.as_ref() }

  /// Run the mutation, if any, then re-fetch. A failed mutation skips the
  /// re-fetch.
  pub async fn run<S: RecordStore>(self, store: &S) -> Outcome<S::Error> {
    let applied = match self.mutation {
      None => None,
      Some(mutation) => match apply(store, mutation).await {
        Ok(applied) => Some(applied),
        Err(failure) => return Outcome { result: Err(failure) },
      },
    };
    let seq = self.lists.fetch_add(1, Ordering::SeqCst) + 1;
    let result = match store.list_all().await {
      Ok(records) => Ok(Synced { seq, applied, records }),
      Err(source) => Err(Failure::Refresh { applied, source }),
    };
    Outcome { result }
  }
}

async fn apply<S: RecordStore>(
  store: &S,
  mutation: Mutation,
) -> Result<Applied, Failure<S::Error>> {
  let verb = mutation.verb();
  let applied = match mutation {
    Mutation::Create(fields) => store.create(fields).await.map(Applied::Created),
    Mutation::Update(id, fields) => store
      .update(id.clone(), fields)
      .await
      .map(|r| Applied::Updated(id, r)),
    Mutation::Delete(id) => store
      .delete(id.clone())
      .await
      .map(|r| Applied::Deleted(id, r)),
  }
  .map_err(|source| Failure::Mutation { verb, source })?;

  match &applied {
    Applied::Created(r) => tracing::info!(record = ?r, "created family member"),
    Applied::Updated(_, r) => tracing::info!(record = ?r, "updated family member"),
    Applied::Deleted(_, r) => tracing::info!(record = ?r, "deleted family member"),
  }
  Ok(applied)
}

// ─── Status line ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
  Info(String),
  Error(String),
}

// ─── Controller ───────────────────────────────────────────────────────────────

/// Owns the displayed table, the dialog and the store handle.
pub struct Controller<S> {
  store:      Arc<S>,
  table:      Table,
  dialog:     Dialog,
  status:     Option<Status>,
  /// Issue counter shared with every job's list request.
  lists:      Arc<AtomicU64>,
  /// Issue number of the list result on display.
  shown:      u64,
  in_flight:  usize,
}

impl<S: RecordStore> Controller<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      table: Table::default(),
      dialog: Dialog::Closed,
      status: None,
      lists: Arc::new(AtomicU64::new(0)),
      shown: 0,
      in_flight: 0,
    }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn table(&self) -> &Table { &self.table }

  pub fn dialog(&self) -> &Dialog { &self.dialog }

  pub fn dialog_mut(&mut self) -> &mut Dialog { &mut self.dialog }

  pub fn status(&self) -> Option<&Status> { self.status.as_ref() }

  /// Jobs dispatched but not yet finished.
  pub fn in_flight(&self) -> usize { self.in_flight }

  fn job(&mut self, mutation: Option<Mutation>) -> Job {
    self.in_flight += 1;
    Job {
      mutation,
      lists: Arc::clone(&self.lists),
    }
  }

  // ── Dialog ──────────────────────────────────────────────────────────────

  /// Open the dialog bound to `id`.
  ///
  /// The sentinel opens a blank create form. Any other id seeds the form from
  /// the displayed record with that id; if no such row is displayed the
  /// dialog stays as it was and `false` is returned.
  pub fn open_form(&mut self, id: RecordId) -> bool {
    let fields = if id.is_sentinel() {
      RecordFields::default()
    } else {
      match self.table.find(&id) {
        Some(record) => record.fields(),
        None => {
          self.status = Some(Status::Error(format!("Record {id} is not displayed")));
          return false;
        }
      }
    };
    self.dialog = Dialog::Open(Form {
      id,
      fields,
      focus: Field::FirstName,
    });
    true
  }

  /// Close the dialog without saving.
  pub fn close_form(&mut self) { self.dialog = Dialog::Closed; }

  // ── Dispatch ────────────────────────────────────────────────────────────

  pub fn begin_refresh(&mut self) -> Job { self.job(None) }

  /// Close the dialog and build the job that saves its contents: a create
  /// for the sentinel id, otherwise an update of the bound id. `None` if the
  /// dialog was not open.
  pub fn begin_save(&mut self) -> Option<Job> {
    let Dialog::Open(form) = std::mem::take(&mut self.dialog) else {
      return None;
    };
    let mutation = if form.id.is_sentinel() {
      Mutation::Create(form.fields)
    } else {
      Mutation::Update(form.id, form.fields)
    };
    Some(self.job(Some(mutation)))
  }

  pub fn begin_delete(&mut self, id: RecordId) -> Job {
    self.job(Some(Mutation::Delete(id)))
  }

  /// Apply a finished job.
  ///
  /// A list result replaces the table only if it was requested after the one
  /// on display. A failure leaves the table untouched.
  pub fn finish(
    &mut self,
    outcome: Outcome<S::Error>,
  ) -> Result<Option<Applied>, Failure<S::Error>> {
    self.in_flight = self.in_flight.saturating_sub(1);
    match outcome.result {
      Ok(Synced { seq, applied, records }) => {
        if seq > self.shown {
          self.shown = seq;
          self.table.replace(records);
        } else {
          tracing::debug!(
            seq,
            shown = self.shown,
            "discarding list result requested before the one on display"
          );
        }
        self.status = applied.as_ref().map(|a| Status::Info(a.summary()));
        Ok(applied)
      }
      Err(failure) => {
        tracing::warn!(error = %failure, "sync failed");
        self.status = Some(Status::Error(failure.to_string()));
        Err(failure)
      }
    }
  }

  // ── Awaiting variants ───────────────────────────────────────────────────

  async fn run(&mut self, job: Job) -> Result<Option<Applied>, Failure<S::Error>> {
    let outcome = job.run(self.store.as_ref()).await;
    self.finish(outcome)
  }

  /// Re-fetch the collection and replace the table.
  pub async fn refresh(&mut self) -> Result<(), Failure<S::Error>> {
    let job = self.begin_refresh();
    self.run(job).await.map(|_| ())
  }

  /// Save the open dialog, then re-fetch. The dialog is closed before the
  /// store is contacted. `Ok(None)` if the dialog was not open.
  pub async fn save(&mut self) -> Result<Option<Applied>, Failure<S::Error>> {
    match self.begin_save() {
      Some(job) => self.run(job).await,
      None => Ok(None),
    }
  }

  /// Delete the record at `id`, then re-fetch.
  pub async fn delete_record(
    &mut self,
    id: RecordId,
  ) -> Result<Option<Applied>, Failure<S::Error>> {
    let job = self.begin_delete(id);
    self.run(job).await
  }
}
