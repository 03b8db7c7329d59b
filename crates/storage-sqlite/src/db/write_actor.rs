use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use diesel::SqliteConnection;
use log::{debug, error};
use tokio::sync::{mpsc, oneshot};

use super::{get_connection, DbPool};
use crate::errors::StorageError;
use finbook_core::errors::{Error, Result};

// A job runs against the writer's connection and returns a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type ErasedReply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, ErasedReply)>,
}

impl WriteHandle {
    /// Executes `job` on the writer's dedicated connection inside an
    /// immediate transaction. An `Err` from the job rolls the transaction
    /// back and is returned as is.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| Error::Unexpected("Database writer has stopped".to_string()))?;

        let boxed = ret_rx
            .await
            .map_err(|_| Error::Unexpected("Database writer dropped the reply".to_string()))??;
        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::Unexpected("Unexpected database writer result type".to_string()))
    }
}

/// Spawns a background Tokio task that is the only writer to the database.
///
/// The actor owns one pooled connection for its whole life and runs jobs
/// one at a time, which serializes every read-modify-write sequence.
pub fn spawn_writer(pool: &DbPool) -> Result<WriteHandle> {
    let mut conn = get_connection(pool)?;
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, ErasedReply)>(1024);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| run_job(job, c).map_err(StorageError::from))
                .map_err(|e: StorageError| {
                    if !matches!(e, StorageError::Core(_)) {
                        error!("Write transaction failed: {}", e);
                    }
                    e.into()
                });

            // The requester may have gone away (timeout); nothing to do then.
            let _ = reply_tx.send(result);
        }
        debug!("All write handles dropped, stopping database writer");
    });

    Ok(WriteHandle { tx })
}

// A panicking job fails its own request and rolls back; the writer keeps going.
fn run_job(job: ErasedJob, conn: &mut SqliteConnection) -> Result<Box<dyn Any + Send + 'static>> {
    panic::catch_unwind(AssertUnwindSafe(|| job(conn))).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown cause".to_string());
        error!("Write job panicked: {}", reason);
        Err(Error::Unexpected(format!("Write job panicked: {}", reason)))
    })
}
