use statig::prelude::*;
use std::time::Duration;

/// Events driving a reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderEvent {
    Arm { interval: Duration },
    Tick,
    RemindAgain,
    MarkDone,
    Disarm,
}

/// Externally visible reminder phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderPhase {
    Idle,
    Armed,
    Notifying,
    Acknowledged,
}

/// Snapshot of a reminder
///
/// `active` and `acknowledged` are never both true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderState {
    pub active: bool,
    pub acknowledged: bool,
    pub interval_ms: u64,
}

#[derive(Debug, Default)]
pub struct ReminderMachine {
    pub key: String,
    interval: Duration,
    notifications: u32,
}

impl ReminderMachine {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl ReminderMachine {
    #[state]
    fn idle(&mut self, event: &ReminderEvent) -> Outcome<State> {
        match event {
            ReminderEvent::Arm { interval } => {
                self.interval = *interval;
                tracing::info!(
                    reminder = %self.key,
                    interval_ms = %interval.as_millis(),
                    "Reminder armed"
                );
                Transition(State::armed())
            }
            ReminderEvent::MarkDone => {
                tracing::info!(reminder = %self.key, "Reminder acknowledged before arming");
                Transition(State::acknowledged())
            }
            _ => Handled,
        }
    }

    #[state]
    fn armed(&mut self, event: &ReminderEvent) -> Outcome<State> {
        match event {
            ReminderEvent::Arm { interval } => {
                self.interval = *interval;
                tracing::info!(
                    reminder = %self.key,
                    interval_ms = %interval.as_millis(),
                    "Reminder timer restarted"
                );
                Handled
            }
            ReminderEvent::Tick => {
                self.notifications += 1;
                tracing::info!(
                    reminder = %self.key,
                    notifications = %self.notifications,
                    "Reminder due, prompting user"
                );
                Transition(State::notifying())
            }
            ReminderEvent::MarkDone => {
                tracing::info!(reminder = %self.key, "Reminder acknowledged");
                Transition(State::acknowledged())
            }
            ReminderEvent::Disarm => {
                tracing::info!(reminder = %self.key, "Reminder disarmed");
                Transition(State::idle())
            }
            ReminderEvent::RemindAgain => Handled,
        }
    }

    #[state]
    fn notifying(&mut self, event: &ReminderEvent) -> Outcome<State> {
        match event {
            ReminderEvent::RemindAgain => {
                tracing::info!(reminder = %self.key, "User asked to be reminded again");
                Transition(State::armed())
            }
            ReminderEvent::Arm { interval } => {
                self.interval = *interval;
                Transition(State::armed())
            }
            ReminderEvent::MarkDone => {
                tracing::info!(reminder = %self.key, "Reminder marked as done");
                Transition(State::acknowledged())
            }
            ReminderEvent::Disarm => {
                tracing::info!(reminder = %self.key, "Reminder disarmed while prompting");
                Transition(State::idle())
            }
            ReminderEvent::Tick => Handled,
        }
    }

    #[state]
    fn acknowledged(&mut self, event: &ReminderEvent) -> Outcome<State> {
        match event {
            // Unchecking the triggering option resets the reminder entirely
            ReminderEvent::Disarm => {
                tracing::info!(reminder = %self.key, "Acknowledged reminder reset");
                Transition(State::idle())
            }
            _ => Handled,
        }
    }
}

/// Owns the generated state machine and maps it onto `ReminderPhase`
pub struct ReminderStateMachine {
    machine: StateMachine<ReminderMachine>,
}

impl ReminderStateMachine {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            machine: ReminderMachine::new(key).state_machine(),
        }
    }

    pub fn handle(&mut self, event: &ReminderEvent) -> ReminderPhase {
        self.machine.handle(event);
        self.phase()
    }

    pub fn phase(&self) -> ReminderPhase {
        match self.machine.state() {
            State::Idle { .. } => ReminderPhase::Idle,
            State::Armed { .. } => ReminderPhase::Armed,
            State::Notifying { .. } => ReminderPhase::Notifying,
            State::Acknowledged { .. } => ReminderPhase::Acknowledged,
        }
    }

    pub fn interval(&self) -> Duration {
        self.machine.inner().interval
    }

    pub fn notifications(&self) -> u32 {
        self.machine.inner().notifications
    }

    pub fn snapshot(&self) -> ReminderState {
        let phase = self.phase();
        ReminderState {
            active: matches!(phase, ReminderPhase::Armed | ReminderPhase::Notifying),
            acknowledged: phase == ReminderPhase::Acknowledged,
            interval_ms: self.interval().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arm() -> ReminderEvent {
        ReminderEvent::Arm { interval: Duration::from_secs(60) }
    }

    #[test]
    fn test_full_cycle() {
        let mut sm = ReminderStateMachine::new("newspaper");
        assert_eq!(sm.phase(), ReminderPhase::Idle);

        assert_eq!(sm.handle(&arm()), ReminderPhase::Armed);
        assert_eq!(sm.handle(&ReminderEvent::Tick), ReminderPhase::Notifying);
        assert_eq!(sm.handle(&ReminderEvent::RemindAgain), ReminderPhase::Armed);
        assert_eq!(sm.handle(&ReminderEvent::Tick), ReminderPhase::Notifying);
        assert_eq!(sm.handle(&ReminderEvent::MarkDone), ReminderPhase::Acknowledged);
        assert_eq!(sm.notifications(), 2);
    }

    #[test]
    fn test_acknowledged_ignores_arm_and_ticks() {
        let mut sm = ReminderStateMachine::new("newspaper");
        sm.handle(&arm());
        sm.handle(&ReminderEvent::MarkDone);

        assert_eq!(sm.handle(&arm()), ReminderPhase::Acknowledged);
        assert_eq!(sm.handle(&ReminderEvent::Tick), ReminderPhase::Acknowledged);
        assert_eq!(sm.notifications(), 0);
    }

    #[test]
    fn test_acknowledge_is_idempotent() {
        let mut sm = ReminderStateMachine::new("newspaper");
        assert_eq!(sm.handle(&ReminderEvent::MarkDone), ReminderPhase::Acknowledged);
        assert_eq!(sm.handle(&ReminderEvent::MarkDone), ReminderPhase::Acknowledged);
    }

    #[test]
    fn test_disarm_from_acknowledged_allows_rearm() {
        let mut sm = ReminderStateMachine::new("newspaper");
        sm.handle(&arm());
        sm.handle(&ReminderEvent::MarkDone);
        assert_eq!(sm.handle(&ReminderEvent::Disarm), ReminderPhase::Idle);
        assert_eq!(sm.handle(&arm()), ReminderPhase::Armed);
    }

    #[test]
    fn test_snapshot_never_active_and_acknowledged() {
        let mut sm = ReminderStateMachine::new("newspaper");
        let events = [
            arm(),
            ReminderEvent::Tick,
            ReminderEvent::RemindAgain,
            ReminderEvent::Disarm,
            arm(),
            ReminderEvent::MarkDone,
            arm(),
        ];
        for event in &events {
            sm.handle(event);
            let snapshot = sm.snapshot();
            assert!(!(snapshot.active && snapshot.acknowledged));
        }
        assert!(sm.snapshot().acknowledged);
        assert_eq!(sm.snapshot().interval_ms, 60_000);
    }
}
