//! Background snapshot writer.
//!
//! Mutations hand a snapshot to [`PersistWorker::submit`] and return at once.
//! The worker thread writes the newest queued snapshot and drops the older
//! ones, so the stored tree is always the last one submitted.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use anyhow::Result;
use tracing::{debug, warn};

use crate::model::diet::DietState;
use crate::repository::traits::DietRepository;

/// Called on the worker thread whenever a write fails.
pub type ErrorHook = Box<dyn Fn(&anyhow::Error) + Send>;

enum Message {
    Save(DietState),
    Flush(Sender<()>),
}

pub struct PersistWorker {
    sender: Option<Sender<Message>>,
    handle: Option<JoinHandle<()>>,
}

pub fn log_error_hook() -> ErrorHook {
    Box::new(|e| warn!(error = %e, "failed to persist diet state"))
}

impl PersistWorker {
    pub fn spawn<R>(repo: R, on_error: ErrorHook) -> Result<Self>
    where
        R: DietRepository + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("dietlog-persist".to_string())
            .spawn(move || run(repo, receiver, on_error))?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    pub fn submit(&self, state: DietState) {
        if let Some(sender) = &self.sender {
            if sender.send(Message::Save(state)).is_err() {
                warn!("persist worker is gone, snapshot dropped");
            }
        }
    }

    /// Blocks until every snapshot submitted so far has been handled.
    pub fn flush(&self) {
        let Some(sender) = &self.sender else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if sender.send(Message::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for PersistWorker {
    fn drop(&mut self) {
        // Closing the channel lets the worker finish its queue and exit.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("persist worker panicked");
            }
        }
    }
}

fn run<R: DietRepository>(repo: R, receiver: Receiver<Message>, on_error: ErrorHook) {
    while let Ok(first) = receiver.recv() {
        let mut latest = None;
        let mut acks = Vec::new();

        for message in std::iter::once(first).chain(receiver.try_iter()) {
            match message {
                Message::Save(state) => latest = Some(state),
                Message::Flush(ack) => acks.push(ack),
            }
        }

        if let Some(state) = latest {
            match repo.save(&state) {
                Ok(()) => debug!("diet state persisted"),
                Err(e) => on_error(&e),
            }
        }

        for ack in acks {
            let _ = ack.send(());
        }
    }
}
