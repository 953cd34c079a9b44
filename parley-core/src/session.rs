use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::backend::ChatBackend;
use crate::controller::{ChatController, SendOutcome, SendTicket, StatusReset};

/// Drives a [`ChatController`] against a [`ChatBackend`].
///
/// The controller lock is released while the backend is awaited, so the UI keeps
/// rendering (and can observe the `sending` state) during a request.
#[derive(Clone)]
pub struct ChatSession {
    controller: Arc<Mutex<ChatController>>,
    backend: Arc<dyn ChatBackend>,
    status_reset_delay: Duration,
}

impl ChatSession {
    pub fn new(
        controller: ChatController,
        backend: Arc<dyn ChatBackend>,
        status_reset_delay: Duration,
    ) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            backend,
            status_reset_delay,
        }
    }

    pub fn controller(&self) -> &Arc<Mutex<ChatController>> {
        &self.controller
    }

    pub fn backend(&self) -> &Arc<dyn ChatBackend> {
        &self.backend
    }

    /// Sends the composer buffer. Returns `false` without touching the backend when
    /// the buffer is blank or a send is already in flight.
    pub async fn submit(&self) -> bool {
        let ticket = self.controller.lock().await.begin_send();
        match ticket {
            Some(ticket) => {
                self.dispatch(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Performs the network half of a send started with
    /// [`ChatController::begin_send`] and merges the result.
    pub async fn dispatch(&self, ticket: SendTicket) {
        info!(
            generation = ticket.generation,
            backend = %self.backend.describe(),
            "sending message"
        );
        let result = self.backend.send_message(&ticket.text).await;

        let outcome = self.controller.lock().await.complete_send(&ticket, result);
        if let SendOutcome::Merged { reset: Some(reset) } = outcome {
            self.schedule_reset(reset);
        }
    }

    /// Runs [`dispatch`](Self::dispatch) on the runtime without waiting for it.
    pub fn spawn_dispatch(&self, ticket: SendTicket) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move { session.dispatch(ticket).await })
    }

    fn schedule_reset(&self, reset: StatusReset) {
        let controller = Arc::clone(&self.controller);
        let delay = self.status_reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let applied = controller.lock().await.apply_status_reset(reset);
            debug!(generation = reset.generation, applied, "status reset fired");
        });
    }

    /// Fetches remote statuses once and merges them if still current.
    pub async fn poll_status(&self) -> bool {
        let poll = self.controller.lock().await.begin_status_poll();
        let statuses = self.backend.fetch_status(&poll.last_known).await;
        self.controller
            .lock()
            .await
            .apply_status_poll(&poll, statuses)
    }

    pub fn spawn_status_polling(&self, every: Duration) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                session.poll_status().await;
            }
        })
    }
}
