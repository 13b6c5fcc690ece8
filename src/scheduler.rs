//! Resource scheduler: battery regeneration and the bonus event timer.
//!
//! Timers are polled rather than callback driven. Each periodic timer is
//! re-armed one interval after the poll that fired it, like `setInterval`
//! restarted on every tick: lateness is not caught up, and a timer fires at
//! most once per poll. The bonus expiry is a one-shot armed by the bonus
//! timer and disarmed by a claim.

use tracing::debug;

use crate::config::EngineConfig;

/// Something the scheduler wants the engine to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScheduledEvent {
    /// The unclaimed bonus window closed.
    BonusExpire,
    /// Add `charge_level` to the battery.
    Regenerate,
    /// Raise the "bonus available" flag.
    BonusSpawn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Timer {
    interval_ms: u64,
    due_at: Option<u64>,
}

impl Timer {
    fn armed(interval_ms: u64, now: u64) -> Self {
        let mut t = Self::disarmed(interval_ms);
        t.arm(now);
        t
    }

    fn disarmed(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            due_at: None,
        }
    }

    fn arm(&mut self, now: u64) {
        self.due_at = Some(now.saturating_add(self.interval_ms));
    }

    fn disarm(&mut self) {
        self.due_at = None;
    }

    fn due(&self, now: u64) -> Option<u64> {
        self.due_at.filter(|&at| at <= now)
    }
}

/// The engine's timers, cancelled together by `cancel`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduler {
    regen: Timer,
    bonus: Timer,
    bonus_expiry: Timer,
    cancelled: bool,
}

impl Scheduler {
    /// Arm both periodic timers relative to `now`.
    pub fn new(config: &EngineConfig, now: u64) -> Self {
        Self {
            regen: Timer::armed(config.regen_interval_ms, now),
            bonus: Timer::armed(config.bonus_interval_ms, now),
            bonus_expiry: Timer::disarmed(config.bonus_window_ms),
            cancelled: false,
        }
    }

    /// Collect everything due at `now`, in due-time order, and re-arm.
    pub fn poll(&mut self, now: u64) -> Vec<ScheduledEvent> {
        if self.cancelled {
            return Vec::new();
        }

        let mut due: Vec<(u64, ScheduledEvent)> = [
            (self.bonus_expiry.due(now), ScheduledEvent::BonusExpire),
            (self.regen.due(now), ScheduledEvent::Regenerate),
            (self.bonus.due(now), ScheduledEvent::BonusSpawn),
        ]
        .into_iter()
        .filter_map(|(at, ev)| at.map(|at| (at, ev)))
        .collect();
        due.sort();

        for (at, event) in &due {
            match event {
                ScheduledEvent::BonusExpire => self.bonus_expiry.disarm(),
                ScheduledEvent::Regenerate => self.regen.arm(now),
                ScheduledEvent::BonusSpawn => {
                    self.bonus.arm(now);
                    self.bonus_expiry.arm(now);
                }
            }
            debug!(?event, due_at = at, now, "scheduler fired");
        }
        due.into_iter().map(|(_, ev)| ev).collect()
    }

    /// Restart the regeneration period from `now`.
    pub fn rearm_regen(&mut self, now: u64) {
        if !self.cancelled {
            self.regen.arm(now);
        }
    }

    /// Drop the pending bonus expiry (the bonus was claimed).
    pub fn cancel_bonus_expiry(&mut self) {
        self.bonus_expiry.disarm();
    }

    pub fn bonus_expiry_pending(&self) -> bool {
        self.bonus_expiry.due_at.is_some()
    }

    /// Cancel every timer. Nothing fires after this.
    pub fn cancel(&mut self) {
        self.regen.disarm();
        self.bonus.disarm();
        self.bonus_expiry.disarm();
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Earliest pending deadline, for hosts that sleep until the next fire.
    pub fn next_due(&self) -> Option<u64> {
        [self.regen.due_at, self.bonus.due_at, self.bonus_expiry.due_at]
            .into_iter()
            .flatten()
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sched() -> Scheduler {
        Scheduler::new(&EngineConfig::default(), 0)
    }

    #[test]
    fn nothing_due_before_first_interval() {
        let mut s = sched();
        assert!(s.poll(299).is_empty());
    }

    #[test]
    fn regen_fires_each_interval() {
        let mut s = sched();
        assert_eq!(s.poll(300), vec![ScheduledEvent::Regenerate]);
        assert!(s.poll(599).is_empty());
        assert_eq!(s.poll(600), vec![ScheduledEvent::Regenerate]);
    }

    #[test]
    fn late_poll_fires_once_and_rearms_from_now() {
        let mut s = sched();
        // 1000ms late: one regen, next one 300ms after this poll
        assert_eq!(s.poll(1_300), vec![ScheduledEvent::Regenerate]);
        assert!(s.poll(1_599).is_empty());
        assert_eq!(s.poll(1_600), vec![ScheduledEvent::Regenerate]);
    }

    #[test]
    fn bonus_spawn_arms_expiry() {
        let mut s = sched();
        let events = s.poll(15_000);
        assert!(events.contains(&ScheduledEvent::BonusSpawn));
        assert!(s.bonus_expiry_pending());
        let events = s.poll(18_000);
        assert!(events.contains(&ScheduledEvent::BonusExpire));
        assert!(!s.bonus_expiry_pending());
    }

    #[test]
    fn claimed_bonus_does_not_expire() {
        let mut s = sched();
        s.poll(15_000);
        s.cancel_bonus_expiry();
        assert!(!s.poll(18_000).contains(&ScheduledEvent::BonusExpire));
    }

    #[test]
    fn events_sorted_by_due_time() {
        let mut s = sched();
        // regen due at 300, bonus at 15000; poll way late
        assert_eq!(
            s.poll(20_000),
            vec![ScheduledEvent::Regenerate, ScheduledEvent::BonusSpawn]
        );
    }

    #[test]
    fn rearm_regen_restarts_period() {
        let mut s = sched();
        s.rearm_regen(200);
        assert!(s.poll(300).is_empty());
        assert_eq!(s.poll(500), vec![ScheduledEvent::Regenerate]);
    }

    #[test]
    fn cancel_stops_everything() {
        let mut s = sched();
        s.poll(15_000);
        s.cancel();
        assert!(s.is_cancelled());
        assert!(s.poll(1_000_000).is_empty());
        assert_eq!(s.next_due(), None);
        s.rearm_regen(1_000_000);
        assert!(s.poll(2_000_000).is_empty());
    }

    #[test]
    fn next_due_is_earliest_deadline() {
        let s = sched();
        assert_eq!(s.next_due(), Some(300));
    }
}
