use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::machine::{ReminderEvent, ReminderPhase, ReminderState, ReminderStateMachine};
use super::ReminderSpec;
use crate::error::ReminderError;
use crate::surface::{NotificationSurface, PromptChoice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmOutcome {
    /// Timer started from idle
    Armed,
    /// Timer was already running and has been restarted
    Rearmed,
    /// The user already confirmed the action; nothing scheduled
    AlreadyAcknowledged,
}

type SharedMachine = Arc<Mutex<ReminderStateMachine>>;

fn lock(machine: &SharedMachine) -> MutexGuard<'_, ReminderStateMachine> {
    machine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cancellable, restartable recurring reminder
///
/// At most one background task runs per scheduler. The task sleeps, prompts,
/// waits for the answer and only then sleeps again, so ticks never overlap.
/// Dropping the scheduler aborts the task.
pub struct ReminderScheduler {
    spec: ReminderSpec,
    machine: SharedMachine,
    surface: Arc<dyn NotificationSurface>,
    task: Option<JoinHandle<()>>,
}

impl ReminderScheduler {
    pub fn new(spec: ReminderSpec, surface: Arc<dyn NotificationSurface>) -> Self {
        let machine = Arc::new(Mutex::new(ReminderStateMachine::new(spec.key.clone())));
        Self {
            spec,
            machine,
            surface,
            task: None,
        }
    }

    pub fn spec(&self) -> &ReminderSpec {
        &self.spec
    }

    /// Start or restart the timer
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, interval: Duration) -> Result<ArmOutcome, ReminderError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ReminderError::NoRuntime {
            reminder: self.spec.key.clone(),
        })?;

        let outcome = {
            let mut machine = lock(&self.machine);
            let outcome = match machine.phase() {
                ReminderPhase::Acknowledged => return Ok(ArmOutcome::AlreadyAcknowledged),
                ReminderPhase::Idle => ArmOutcome::Armed,
                ReminderPhase::Armed | ReminderPhase::Notifying => ArmOutcome::Rearmed,
            };
            machine.handle(&ReminderEvent::Arm { interval });
            outcome
        };

        self.stop_task();
        self.task = Some(runtime.spawn(run_reminder_loop(
            self.spec.clone(),
            interval,
            Arc::clone(&self.machine),
            Arc::clone(&self.surface),
        )));

        Ok(outcome)
    }

    /// Mark the tracked action as done; no further prompts for this reminder
    pub fn acknowledge(&mut self) {
        lock(&self.machine).handle(&ReminderEvent::MarkDone);
        self.stop_task();
    }

    /// Stop without marking acknowledged
    pub fn disarm(&mut self) {
        lock(&self.machine).handle(&ReminderEvent::Disarm);
        self.stop_task();
    }

    pub fn phase(&self) -> ReminderPhase {
        lock(&self.machine).phase()
    }

    pub fn state(&self) -> ReminderState {
        lock(&self.machine).snapshot()
    }

    /// How many times the user has been prompted
    pub fn notifications(&self) -> u32 {
        lock(&self.machine).notifications()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn stop_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(reminder = %self.spec.key, "Reminder task stopped");
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.stop_task();
    }
}

async fn run_reminder_loop(
    spec: ReminderSpec,
    interval: Duration,
    machine: SharedMachine,
    surface: Arc<dyn NotificationSurface>,
) {
    loop {
        tokio::time::sleep(interval).await;

        {
            let mut machine = lock(&machine);
            if machine.phase() != ReminderPhase::Armed {
                break;
            }
            machine.handle(&ReminderEvent::Tick);
        }

        let choice = surface.prompt(&spec).await;

        let phase = {
            let mut machine = lock(&machine);
            match choice {
                PromptChoice::RemindAgain => machine.handle(&ReminderEvent::RemindAgain),
                PromptChoice::Acknowledge => machine.handle(&ReminderEvent::MarkDone),
            }
        };

        match phase {
            ReminderPhase::Armed => continue,
            ReminderPhase::Acknowledged => {
                info!(reminder = %spec.key, "Reminder completed by user");
                break;
            }
            other => {
                warn!(reminder = %spec.key, phase = ?other, "Reminder stopped while prompting");
                break;
            }
        }
    }
}
