//! Single-writer actor for all database mutations.
//!
//! SQLite permits one writer at a time; funnelling every mutation through
//! one dedicated thread turns write contention into an orderly queue. Each
//! job runs inside one immediate transaction, so a job that both mutates an
//! entity and appends its changelog record commits or rolls back as a unit.
//! This serialization is also what makes per-user `max + 1` sequence
//! assignment race-free: no two appends for the same user can interleave.

use diesel::sqlite::SqliteConnection;
use log::{error, warn};
use tokio::sync::{mpsc, oneshot};

use taskdeck_core::errors::{DatabaseError, Error, Result};

use super::DbPool;
use crate::errors::StorageError;

const WRITE_QUEUE_DEPTH: usize = 64;

type WriteJob = Box<dyn FnOnce(&mut SqliteConnection) + Send>;

/// Internal adapter so diesel's transaction wrapper can carry either a
/// BEGIN/COMMIT failure or the job's own error out of the closure.
enum TxFailure {
    App(Error),
    Sql(diesel::result::Error),
}

impl From<diesel::result::Error> for TxFailure {
    fn from(err: diesel::result::Error) -> Self {
        Self::Sql(err)
    }
}

/// Cloneable handle used by repositories to submit write jobs.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<WriteJob>,
}

impl WriteHandle {
    /// Run `job` on the writer thread inside an immediate transaction.
    ///
    /// Returning `Err` from the job rolls the whole transaction back; the
    /// error is handed back to the caller unchanged.
    pub async fn exec<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let wrapped: WriteJob = Box::new(move |conn| {
            let outcome = conn
                .immediate_transaction::<_, TxFailure, _>(|tx| job(tx).map_err(TxFailure::App))
                .map_err(|failure| match failure {
                    TxFailure::App(err) => err,
                    TxFailure::Sql(err) => StorageError::from(err).into(),
                });
            if reply_tx.send(outcome).is_err() {
                warn!("Write job finished but its caller went away");
            }
        });

        self.tx.send(wrapped).await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Database writer is not running".to_string(),
            ))
        })?;
        reply_rx.await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "Database writer dropped the job".to_string(),
            ))
        })?
    }
}

/// Spawn the writer thread and return the handle repositories clone.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<WriteJob>(WRITE_QUEUE_DEPTH);
    std::thread::Builder::new()
        .name("taskdeck-db-writer".to_string())
        .spawn(move || {
            while let Some(job) = rx.blocking_recv() {
                match pool.get() {
                    Ok(mut conn) => job(&mut conn),
                    Err(err) => {
                        // Dropping the job closes its reply channel; the
                        // caller sees a writer error rather than a hang.
                        error!("Writer could not obtain a connection: {err}");
                    }
                }
            }
        })
        .expect("failed to spawn database writer thread");
    WriteHandle { tx }
}
