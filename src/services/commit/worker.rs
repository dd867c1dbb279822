use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::{commit_to_store, AppointmentCommitter, CommitError, CommitResult, PendingCommit};
use crate::grid::{CommitRequest, TimeGrid};
use crate::services::database::Database;

struct CommitJob {
    request: CommitRequest,
    reply: Sender<CommitResult>,
}

/// Writes commits on one worker thread that owns its own connection.
///
/// Jobs run strictly in submission order. Needs a file-backed database; an
/// in-memory path would open an empty one.
pub struct BackgroundCommitter {
    jobs: Sender<CommitJob>,
}

impl BackgroundCommitter {
    pub fn new(db_path: impl Into<String>, grid: TimeGrid) -> Self {
        let (jobs, rx) = mpsc::channel();
        let db_path = db_path.into();

        thread::spawn(move || run_worker(&db_path, grid, rx));

        Self { jobs }
    }
}

impl AppointmentCommitter for BackgroundCommitter {
    fn submit(&self, request: CommitRequest) -> PendingCommit {
        let (reply, rx) = mpsc::channel();
        if self.jobs.send(CommitJob { request, reply }).is_err() {
            // The reply sender went down with the job, so the commit polls as Disconnected
            log::error!("Commit worker is gone; dropping {:?}", request);
        }
        PendingCommit::new(request, rx)
    }
}

/// Serve jobs until every `BackgroundCommitter` handle is dropped.
fn run_worker(db_path: &str, grid: TimeGrid, jobs: Receiver<CommitJob>) {
    let database = Database::new(db_path).map_err(|err| {
        log::error!("Commit worker could not open {}: {:#}", db_path, err);
        CommitError::Storage(format!("{:#}", err))
    });

    for job in jobs {
        let result = match &database {
            Ok(db) => commit_to_store(db.connection(), grid, &job.request),
            Err(err) => Err(err.clone()),
        };
        let _ = job.reply.send(result);
    }
    log::debug!("Commit worker for {} stopped", db_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::Appointment;
    use crate::services::appointment::AppointmentService;
    use chrono::NaiveDate;

    #[test]
    fn test_background_commit_resizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.db");
        let path = path.to_str().unwrap();
        let db = Database::new(path).unwrap();
        db.initialize_schema().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let id = AppointmentService::new(db.connection(), TimeGrid::reference())
            .create(Appointment::new("a1", day, 0, 30).unwrap())
            .unwrap()
            .id
            .unwrap();

        let committer = BackgroundCommitter::new(path, TimeGrid::reference());
        let saved = committer
            .submit(CommitRequest::Resize {
                id,
                duration_minutes: 50,
            })
            .wait()
            .unwrap();

        assert_eq!(saved.duration_minutes, 50);
        let stored = AppointmentService::new(db.connection(), TimeGrid::reference())
            .get(id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.duration_minutes, 50);
    }

    #[test]
    fn test_background_commit_without_schema_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");

        let committer = BackgroundCommitter::new(path.to_str().unwrap(), TimeGrid::reference());
        let result = committer
            .submit(CommitRequest::Resize {
                id: 1,
                duration_minutes: 30,
            })
            .wait();

        assert!(matches!(result, Err(CommitError::Storage(_))));
    }

    fn seeded(path: &str, entries: &[(&str, usize)]) -> (Database, Vec<i64>) {
        let db = Database::new(path).unwrap();
        db.initialize_schema().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let service = AppointmentService::new(db.connection(), TimeGrid::reference());
        let ids = entries
            .iter()
            .map(|(label, slot)| {
                service
                    .create(Appointment::new(*label, day, *slot, 30).unwrap())
                    .unwrap()
                    .id
                    .unwrap()
            })
            .collect();
        (db, ids)
    }

    #[test]
    fn test_resize_then_move_keeps_both_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.db");
        let path = path.to_str().unwrap();
        let (db, ids) = seeded(path, &[("a1", 0)]);
        let id = ids[0];
        let committer = BackgroundCommitter::new(path, TimeGrid::reference());
        let service = AppointmentService::new(db.connection(), TimeGrid::reference());

        for round in 0..50 {
            let minutes = if round % 2 == 0 { 60 } else { 45 };
            let slot = if round % 2 == 0 { 20 } else { 10 };
            let resize = committer.submit(CommitRequest::Resize {
                id,
                duration_minutes: minutes,
            });
            let moved = committer.submit(CommitRequest::Move {
                id,
                day: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                start_slot: slot,
            });

            assert_eq!(resize.wait().unwrap().duration_minutes, minutes);
            let saved = moved.wait().unwrap();
            assert_eq!((saved.start_slot, saved.duration_minutes), (slot, minutes));

            let stored = service.get(id).unwrap().unwrap();
            assert_eq!((stored.start_slot, stored.duration_minutes), (slot, minutes));
        }
    }

    #[test]
    fn test_move_into_slot_vacated_by_earlier_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.db");
        let path = path.to_str().unwrap();
        let (db, ids) = seeded(path, &[("x", 4), ("y", 10)]);
        let day = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let committer = BackgroundCommitter::new(path, TimeGrid::reference());

        let away = committer.submit(CommitRequest::Move {
            id: ids[0],
            day,
            start_slot: 20,
        });
        let into = committer.submit(CommitRequest::Move {
            id: ids[1],
            day,
            start_slot: 4,
        });

        assert_eq!(away.wait().unwrap().start_slot, 20);
        assert_eq!(into.wait().unwrap().start_slot, 4);
        let service = AppointmentService::new(db.connection(), TimeGrid::reference());
        assert_eq!(service.get(ids[1]).unwrap().unwrap().start_slot, 4);
    }
}
