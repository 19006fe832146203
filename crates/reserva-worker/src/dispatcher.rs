//! Reminder dispatch loop.
//!
//! Shutdown: [`ReminderDispatcher::shutdown`] signals the loop to stop; it
//! does not wait for an in-flight pass. Overlapping passes (e.g. two drivers)
//! stay safe only because marking a reminder sent is atomic in the store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use reserva_services::{Notifier, ReminderScheduler};

#[derive(Clone)]
pub struct ReminderDispatcherConfig {
    /// Seconds between dispatch passes.
    pub poll_interval_secs: u64,
}

impl Default for ReminderDispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 120,
        }
    }
}

pub struct ReminderDispatcher {
    shutdown_tx: mpsc::Sender<()>,
}

impl ReminderDispatcher {
    /// Spawn the dispatch loop on the current runtime.
    pub fn start(
        scheduler: ReminderScheduler,
        notifier: Arc<dyn Notifier>,
        config: ReminderDispatcherConfig,
    ) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let interval = Duration::from_secs(config.poll_interval_secs.max(1));

        tokio::spawn(async move {
            tracing::info!(interval_secs = interval.as_secs(), "reminder dispatcher started");
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        tracing::info!("reminder dispatcher stopping");
                        break;
                    }
                    _ = sleep(interval) => {
                        match scheduler.process_due(notifier.as_ref()).await {
                            Ok(0) => {}
                            Ok(delivered) => {
                                tracing::info!(delivered, "reminder pass complete");
                            }
                            Err(err) => {
                                tracing::error!(error = %err, "reminder pass failed");
                            }
                        }
                    }
                }
            }
        });

        Self { shutdown_tx }
    }

    /// Signal the loop to stop after the current pass.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}
