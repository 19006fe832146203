//! Reminder scheduling and dispatch.

use async_trait::async_trait;

use chrono::Utc;
use reserva_core::models::{plan_reminders, Booking, BookingStatus, ReminderKind};
use reserva_core::AppError;
use reserva_db::{BookingRepository, ScheduledReminderRepository};

/// Delivery boundary for due reminders. Implementations must tolerate being
/// invoked again for the same reminder after a reported failure; this core
/// gives at-least-once delivery, deduplicated only by the mark-sent gate.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, booking: &Booking, kind: ReminderKind) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct ReminderScheduler {
    reminders: ScheduledReminderRepository,
    bookings: BookingRepository,
}

impl ReminderScheduler {
    pub fn new(reminders: ScheduledReminderRepository, bookings: BookingRepository) -> Self {
        Self { reminders, bookings }
    }

    /// Register the fixed-offset reminders still in the future for a
    /// confirmed booking; a no-op for any other status. Nothing here guards
    /// against duplicate registration; callers invoke this once per
    /// confirmation.
    #[tracing::instrument(skip(self, booking), fields(booking_id = %booking.id))]
    pub async fn schedule_for_booking(&self, booking: &Booking) -> Result<(), AppError> {
        if booking.status != BookingStatus::Confirmed {
            return Ok(());
        }
        for (kind, remind_at) in plan_reminders(booking.start_at, Utc::now()) {
            self.reminders.create(booking.id, remind_at, kind).await?;
            tracing::debug!(%kind, %remind_at, "reminder scheduled");
        }
        Ok(())
    }

    /// One dispatch pass over due reminders. A booking no longer CONFIRMED is
    /// suppressed (marked sent without notifying); a failed delivery stays
    /// unsent and is retried next pass. Returns the number delivered.
    #[tracing::instrument(skip(self, notifier))]
    pub async fn process_due(&self, notifier: &dyn Notifier) -> Result<usize, AppError> {
        let due = self.reminders.list_due(Utc::now()).await?;
        let mut delivered = 0;
        for reminder in due {
            let booking = self
                .bookings
                .get_by_id(reminder.booking_id)
                .await?
                .filter(|b| b.status == BookingStatus::Confirmed);
            let Some(booking) = booking else {
                self.reminders.mark_sent(reminder.id).await?;
                tracing::debug!(reminder_id = %reminder.id, "reminder suppressed");
                continue;
            };
            match notifier.notify(&booking, reminder.kind).await {
                Ok(()) => {
                    if self.reminders.mark_sent(reminder.id).await? {
                        delivered += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        reminder_id = %reminder.id,
                        booking_id = %booking.id,
                        error = %err,
                        "reminder delivery failed, will retry next pass"
                    );
                }
            }
        }
        Ok(delivered)
    }

    /// Re-seed reminders for confirmed future bookings, e.g. after restoring
    /// a database without its reminder table. Bookings that already have
    /// reminder rows are skipped. Returns the number of bookings seeded.
    #[tracing::instrument(skip(self))]
    pub async fn rebuild_for_future(&self) -> Result<usize, AppError> {
        let mut seeded = 0;
        for booking in self.bookings.list_confirmed_from(Utc::now()).await? {
            if self.reminders.exists_for_booking(booking.id).await? {
                continue;
            }
            self.schedule_for_booking(&booking).await?;
            seeded += 1;
        }
        Ok(seeded)
    }
}
