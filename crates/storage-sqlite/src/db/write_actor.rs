use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use log::error;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};
use tradebook_core::errors::Result;

// Type alias for the job to be executed by the writer actor.
// It takes a mutable reference to a SqliteConnection and returns a Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type BoxedAny = Box<dyn Any + Send + 'static>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    // Each job is a boxed closure paired with a oneshot sender for the reply.
    // The job's return type is erased to `Box<dyn Any + Send>`.
    #[allow(clippy::type_complexity)]
    tx: mpsc::Sender<(Job<BoxedAny>, oneshot::Sender<Result<BoxedAny>>)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside one immediate transaction: everything it writes
    /// commits together or not at all.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as BoxedAny)),
                ret_tx,
            ))
            .await
            .map_err(|_| StorageError::WriterUnavailable("writer actor has stopped".to_string()))?;

        let boxed = ret_rx.await.map_err(|_| {
            StorageError::WriterUnavailable("writer actor dropped the reply".to_string())
        })??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            StorageError::WriterUnavailable("unexpected writer result type".to_string()).into()
        })
    }
}

/// Spawns a background Tokio task that acts as a single writer to the database.
/// This actor owns one database connection from the pool and processes write jobs serially.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    // The channel is bounded; 1024 is an arbitrary size.
    let (tx, mut rx) = mpsc::channel::<(Job<BoxedAny>, oneshot::Sender<Result<BoxedAny>>)>(1024);

    tokio::spawn(async move {
        // Held for the lifetime of the actor.
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer actor could not get a database connection: {}", e);
                let message = e.to_string();
                while let Some((_, reply_tx)) = rx.recv().await {
                    let _ = reply_tx.send(Err(
                        StorageError::WriterUnavailable(message.clone()).into()
                    ));
                }
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<BoxedAny> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| e.into());

            // The receiver may have dropped (request timed out or was cancelled).
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
