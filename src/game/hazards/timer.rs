//! # Hazard Timer
//!
//! Countdown bookkeeping for self-arming hazards and the background task that
//! drives it once per interval.
//!
//! The task and the room session talk only through channels: the session
//! sends [`TimerCommand`]s, the task answers with [`TimerSignal`]s. After a
//! `Primed` signal the clock freezes until the session acknowledges it, so a
//! hazard never primes twice before the session has fired it.

use super::HazardId;
use log::{debug, warn};
use std::collections::BTreeMap;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};

/// Session → timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start counting for a hazard. `elapsed` is the head start in seconds.
    Arm {
        id: HazardId,
        period: u32,
        elapsed: u32,
    },
    /// Stop counting for a hazard.
    Disarm { id: HazardId },
    /// The last `Primed` batch has been fired.
    Acknowledge,
}

/// Timer → session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerSignal {
    /// These hazards reached their period and are ready to fire.
    Primed(Vec<HazardId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Dormant,
    Primed,
}

#[derive(Debug, Clone, Copy)]
struct Countdown {
    period: u32,
    elapsed: u32,
    phase: TimerPhase,
}

/// Pure countdown state, advanced one second per [`HazardClock::tick`].
///
/// # Examples
///
/// ```
/// use cryptwalk::HazardClock;
///
/// let mut clock = HazardClock::new();
/// clock.arm(7, 3, 1);
/// assert!(clock.tick().is_empty());
/// assert_eq!(clock.tick(), vec![7]);
/// assert_eq!(clock.advanced_seconds(), 2);
///
/// // Frozen until the batch is acknowledged
/// assert!(clock.tick().is_empty());
/// clock.acknowledge();
/// ```
#[derive(Debug, Default)]
pub struct HazardClock {
    timers: BTreeMap<HazardId, Countdown>,
    awaiting_ack: bool,
    advanced: u64,
}

impl HazardClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) a countdown. A head start beyond the period is
    /// capped at the period.
    pub fn arm(&mut self, id: HazardId, period: u32, elapsed: u32) {
        self.timers.insert(
            id,
            Countdown {
                period,
                elapsed: elapsed.min(period),
                phase: TimerPhase::Dormant,
            },
        );
    }

    pub fn disarm(&mut self, id: HazardId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Releases the freeze and returns primed hazards to dormant.
    pub fn acknowledge(&mut self) {
        self.awaiting_ack = false;
        for countdown in self.timers.values_mut() {
            countdown.phase = TimerPhase::Dormant;
        }
    }

    pub fn apply(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Arm {
                id,
                period,
                elapsed,
            } => self.arm(id, period, elapsed),
            TimerCommand::Disarm { id } => {
                self.disarm(id);
            }
            TimerCommand::Acknowledge => self.acknowledge(),
        }
    }

    /// One interval. Hazards already at their period prime without the clock
    /// moving; otherwise every countdown advances a second and those that
    /// reach their period prime. Primed countdowns restart from zero.
    pub fn tick(&mut self) -> Vec<HazardId> {
        if self.awaiting_ack || self.timers.is_empty() {
            return Vec::new();
        }

        let mut ready = self.ready();
        if ready.is_empty() {
            for countdown in self.timers.values_mut() {
                countdown.elapsed = countdown.elapsed.saturating_add(1);
            }
            self.advanced += 1;
            ready = self.ready();
        }

        for id in &ready {
            if let Some(countdown) = self.timers.get_mut(id) {
                countdown.elapsed = 0;
                countdown.phase = TimerPhase::Primed;
            }
        }
        self.awaiting_ack = !ready.is_empty();
        ready
    }

    fn ready(&self) -> Vec<HazardId> {
        self.timers
            .iter()
            .filter(|(_, countdown)| countdown.elapsed >= countdown.period)
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn phase(&self, id: HazardId) -> Option<TimerPhase> {
        self.timers.get(&id).map(|countdown| countdown.phase)
    }

    pub fn elapsed(&self, id: HazardId) -> Option<u32> {
        self.timers.get(&id).map(|countdown| countdown.elapsed)
    }

    pub fn is_awaiting_ack(&self) -> bool {
        self.awaiting_ack
    }

    /// Seconds the clock has actually advanced.
    pub fn advanced_seconds(&self) -> u64 {
        self.advanced
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// Handle to a running clock task.
pub struct HazardTimer {
    commands: mpsc::UnboundedSender<TimerCommand>,
    signals: mpsc::UnboundedReceiver<TimerSignal>,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl HazardTimer {
    /// Spawns the clock task on `runtime`. The first tick lands one
    /// `interval` after spawning.
    pub fn spawn(runtime: &Handle, interval: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let task = runtime.spawn(run_clock(interval, command_rx, signal_tx, cancel_rx));

        Self {
            commands: command_tx,
            signals: signal_rx,
            cancel: Some(cancel_tx),
            task,
        }
    }

    /// Queues a command. False when the task has already exited.
    pub fn send(&self, command: TimerCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Next pending signal, without waiting.
    pub fn try_signal(&mut self) -> Option<TimerSignal> {
        self.signals.try_recv().ok()
    }

    /// Cancels the task and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Err(err) = self.task.await {
            warn!("hazard timer task ended abnormally: {}", err);
        }
    }
}

async fn run_clock(
    interval: Duration,
    mut commands: mpsc::UnboundedReceiver<TimerCommand>,
    signals: mpsc::UnboundedSender<TimerSignal>,
    mut cancel: oneshot::Receiver<()>,
) {
    let mut clock = HazardClock::new();
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut cancel => break,
            command = commands.recv() => match command {
                Some(command) => clock.apply(command),
                None => break,
            },
            _ = ticker.tick() => {
                let primed = clock.tick();
                if !primed.is_empty() {
                    debug!("hazards primed: {:?}", primed);
                    if signals.send(TimerSignal::Primed(primed)).is_err() {
                        break;
                    }
                }
            }
        }
    }

    debug!(
        "hazard clock stopped after {} seconds",
        clock.advanced_seconds()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primes_after_period_minus_head_start() {
        for period in 1..=12u32 {
            for k in 1..=4u32 {
                let mut clock = HazardClock::new();
                clock.arm(1, period, period / k);
                let mut ticks = 0;
                while clock.tick().is_empty() {
                    ticks += 1;
                    assert!(ticks <= period, "period {} k {} never primed", period, k);
                }
                assert_eq!(
                    clock.advanced_seconds(),
                    u64::from(period - period / k),
                    "period {} k {}",
                    period,
                    k
                );
                assert_eq!(clock.phase(1), Some(TimerPhase::Primed));
                assert_eq!(clock.elapsed(1), Some(0));
            }
        }
    }

    #[test]
    fn test_never_primes_twice_without_ack() {
        let mut clock = HazardClock::new();
        clock.arm(1, 2, 0);
        clock.arm(2, 5, 0);
        assert!(clock.tick().is_empty());
        assert_eq!(clock.tick(), vec![1]);

        for _ in 0..20 {
            assert!(clock.tick().is_empty());
        }
        assert_eq!(clock.advanced_seconds(), 2);

        clock.acknowledge();
        assert_eq!(clock.phase(1), Some(TimerPhase::Dormant));
        assert!(clock.tick().is_empty());
        assert_eq!(clock.tick(), vec![1]);
        assert_eq!(clock.elapsed(2), Some(4));
    }

    #[test]
    fn test_simultaneous_hazards_prime_together() {
        let mut clock = HazardClock::new();
        clock.arm(3, 2, 1);
        clock.arm(4, 4, 3);
        assert_eq!(clock.tick(), vec![3, 4]);
    }

    #[test]
    fn test_disarm_stops_countdown() {
        let mut clock = HazardClock::new();
        clock.arm(1, 1, 0);
        assert!(clock.disarm(1));
        assert!(!clock.disarm(1));
        assert!(clock.tick().is_empty());
        assert_eq!(clock.advanced_seconds(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_task_primes_and_waits_for_ack() {
        let mut timer = HazardTimer::spawn(&Handle::current(), Duration::from_secs(1));
        assert!(timer.send(TimerCommand::Arm {
            id: 9,
            period: 3,
            elapsed: 1
        }));

        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(timer.try_signal(), Some(TimerSignal::Primed(vec![9])));

        time::sleep(Duration::from_secs(3)).await;
        assert_eq!(timer.try_signal(), None);

        assert!(timer.send(TimerCommand::Acknowledge));
        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(timer.try_signal(), Some(TimerSignal::Primed(vec![9])));

        timer.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_hazard_never_signals() {
        let mut timer = HazardTimer::spawn(&Handle::current(), Duration::from_secs(1));
        timer.send(TimerCommand::Arm {
            id: 1,
            period: 2,
            elapsed: 0,
        });
        timer.send(TimerCommand::Disarm { id: 1 });

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(timer.try_signal(), None);
        timer.stop().await;
    }
}
