//! Agent message poller
//!
//! Drains pending inter-agent messages on a fixed interval and drives
//! the target agents' reasoning loops. Exactly one poller instance is
//! expected per deployment; the claim update is conditional anyway, so
//! a second instance degrades to skipped rows instead of
//! double-processing.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::manager::AgentManager;
use crate::db::Database;

pub const DEFAULT_BATCH_SIZE: usize = 10;

pub struct MessagePoller {
    db: Arc<Database>,
    manager: Arc<AgentManager>,
    interval: Duration,
    batch_size: usize,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl MessagePoller {
    pub fn new(db: Arc<Database>, manager: Arc<AgentManager>, interval: Duration) -> Self {
        MessagePoller {
            db,
            manager,
            interval,
            batch_size: DEFAULT_BATCH_SIZE,
            cancel: CancellationToken::new(),
            handle: Mutex::new(None),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Spawn the polling task. Successive ticks are independent of any
    /// one message's duration; a long reasoning call delays the rest of
    /// its own batch, not future sends.
    pub fn start(self: Arc<Self>) {
        let poller = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            log::info!(
                "[POLLER] Started with interval {:?}, batch size {}",
                poller.interval,
                poller.batch_size
            );
            loop {
                tokio::select! {
                    _ = poller.cancel.cancelled() => {
                        log::info!("[POLLER] Stopped");
                        break;
                    }
                    _ = tokio::time::sleep(poller.interval) => {
                        poller.tick().await;
                    }
                }
            }
        });
        *self.handle.lock() = Some(handle);
    }

    /// Signal the polling task to exit. Forces the task down even if a
    /// reasoning call inside the current tick is still running.
    pub fn stop(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }

    /// Process one batch of pending messages, oldest first. Returns the
    /// number of messages that reached a terminal status this tick.
    pub async fn tick(&self) -> usize {
        let pending = match self.db.list_pending_agent_messages(self.batch_size) {
            Ok(pending) => pending,
            Err(e) => {
                log::error!("[POLLER] Failed to fetch pending messages: {}", e);
                return 0;
            }
        };

        let mut completed = 0;
        for message in pending {
            // Claim before processing so the next tick cannot pick the
            // same row up again. Losing the claim means another worker
            // got there first; just move on.
            match self.db.claim_agent_message(message.id) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    log::error!("[POLLER] Failed to claim message {}: {}", message.id, e);
                    continue;
                }
            }

            let engine = match self.manager.get(&message.to_agent) {
                Some(engine) => engine,
                None => {
                    let error = format!("Target agent '{}' not found", message.to_agent);
                    log::warn!("[POLLER] Message {}: {}", message.message_id, error);
                    if let Err(e) = self.db.mark_agent_message_failed(message.id, &error) {
                        log::error!("[POLLER] Failed to mark message {} failed: {}", message.id, e);
                    }
                    completed += 1;
                    continue;
                }
            };

            let input = format!(
                "Message from agent '{}' with intent '{}'. Payload: {}",
                message.from_agent, message.intent, message.payload
            );
            let metadata = serde_json::json!({
                "from_agent": message.from_agent,
                "intent": message.intent,
            });

            match engine.reason(&input, Some(&metadata)).await {
                Ok(result) => {
                    if let Err(e) = self.db.mark_agent_message_processed(message.id, &result) {
                        log::error!(
                            "[POLLER] Failed to mark message {} processed: {}",
                            message.id,
                            e
                        );
                    }
                }
                Err(e) => {
                    log::warn!(
                        "[POLLER] Message {} to '{}' failed: {}",
                        message.message_id,
                        message.to_agent,
                        e
                    );
                    if let Err(db_err) =
                        self.db.mark_agent_message_failed(message.id, &e.to_string())
                    {
                        log::error!(
                            "[POLLER] Failed to mark message {} failed: {}",
                            message.id,
                            db_err
                        );
                    }
                }
            }
            completed += 1;
        }
        completed
    }
}
