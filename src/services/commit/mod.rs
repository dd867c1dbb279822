//! Persistence boundary for committed gestures.
//!
//! The grid hands over a `CommitRequest`; a committer writes it to the store
//! and reports back through a `PendingCommit` the UI polls once per frame.
//! On failure the host reloads the week, which rolls the block back.

use std::sync::mpsc::{self, Receiver, TryRecvError};

use rusqlite::{Connection, Transaction, TransactionBehavior};
use thiserror::Error;

use crate::grid::{collision, CommitRequest, GestureOutcome, OccupancyIndex, TimeGrid, WeekColumns};
use crate::models::appointment::Appointment;
use crate::services::appointment::AppointmentService;

mod worker;

pub use worker::BackgroundCommitter;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("appointment {0} no longer exists")]
    NotFound(i64),

    #[error("placement no longer fits: {0}")]
    Conflict(collision::PlacementRejection),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("commit worker disconnected")]
    Disconnected,
}

pub type CommitResult = Result<Appointment, CommitError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CommitPoll {
    Pending,
    Done(CommitResult),
}

/// A submitted commit whose result may not have arrived yet.
pub struct PendingCommit {
    request: CommitRequest,
    rx: Receiver<CommitResult>,
}

impl PendingCommit {
    pub fn new(request: CommitRequest, rx: Receiver<CommitResult>) -> Self {
        Self { request, rx }
    }

    /// A commit that has already finished.
    pub fn ready(request: CommitRequest, result: CommitResult) -> Self {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(result);
        Self::new(request, rx)
    }

    pub fn request(&self) -> CommitRequest {
        self.request
    }

    /// Non-blocking check for the result.
    pub fn poll(&self) -> CommitPoll {
        match self.rx.try_recv() {
            Ok(result) => CommitPoll::Done(result),
            Err(TryRecvError::Empty) => CommitPoll::Pending,
            Err(TryRecvError::Disconnected) => CommitPoll::Done(Err(CommitError::Disconnected)),
        }
    }

    /// Block until the result arrives.
    pub fn wait(self) -> CommitResult {
        self.rx.recv().unwrap_or(Err(CommitError::Disconnected))
    }
}

/// Anything that can persist a `CommitRequest`.
#[cfg_attr(test, mockall::automock)]
pub trait AppointmentCommitter {
    fn submit(&self, request: CommitRequest) -> PendingCommit;
}

/// Submit the request carried by `outcome`, if any.
pub fn submit_outcome(
    committer: &dyn AppointmentCommitter,
    outcome: GestureOutcome,
) -> Option<PendingCommit> {
    match outcome {
        GestureOutcome::Committed(request) => Some(committer.submit(request)),
        _ => None,
    }
}

/// Runs the commit on the caller's connection before returning.
#[cfg(test)]
pub struct ImmediateCommitter<'a> {
    conn: &'a Connection,
    grid: TimeGrid,
}

#[cfg(test)]
impl<'a> ImmediateCommitter<'a> {
    pub fn new(conn: &'a Connection, grid: TimeGrid) -> Self {
        Self { conn, grid }
    }
}

#[cfg(test)]
impl AppointmentCommitter for ImmediateCommitter<'_> {
    fn submit(&self, request: CommitRequest) -> PendingCommit {
        PendingCommit::ready(request, commit_to_store(self.conn, self.grid, &request))
    }
}

/// Apply `request` to the store after re-checking it against stored state.
///
/// Read, check and write share one `BEGIN IMMEDIATE` transaction, so no other
/// writer can land between the collision check and the update.
pub fn commit_to_store(conn: &Connection, grid: TimeGrid, request: &CommitRequest) -> CommitResult {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|err| storage_error(err.into()))?;
    // An early return drops `tx`, which rolls it back
    let saved = apply_checked(&tx, grid, request)?;
    tx.commit().map_err(|err| storage_error(err.into()))?;

    log::info!("Committed {:?}", request);
    Ok(saved)
}

fn apply_checked(conn: &Connection, grid: TimeGrid, request: &CommitRequest) -> CommitResult {
    let service = AppointmentService::new(conn, grid);
    let id = request.id();

    let current = service
        .get(id)
        .map_err(storage_error)?
        .ok_or(CommitError::NotFound(id))?;
    let updated = request.apply_to(&current);

    // The gesture was checked against a snapshot; another write may have landed since
    let columns = WeekColumns::starting(updated.day);
    let stored = service.list_for_week(&columns).map_err(storage_error)?;
    let index = OccupancyIndex::build(&grid, &columns, &stored, Some(id));
    collision::check(&grid, &index, &updated.placement()).map_err(|rejection| {
        log::warn!("Commit {:?} rejected: {}", request, rejection);
        CommitError::Conflict(rejection)
    })?;

    service.apply(request).map_err(storage_error)
}

fn storage_error(err: anyhow::Error) -> CommitError {
    log::error!("Commit failed: {:#}", err);
    CommitError::Storage(format!("{:#}", err))
}
