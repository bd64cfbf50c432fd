//! Tick scheduling.
//!
//! The registry never runs its own loop; a scheduler implementation tells the
//! host *when* each session wants an engine update, and the host (or the
//! [`runner`](crate::runner)) calls back into the registry. Tests bypass
//! wall-clock time entirely by advancing a [`ManualScheduler`] directly.

use arena_core::SessionId;

/// Opaque handle for one scheduled periodic tick, owned by the scheduler.
pub type TaskHandle = u64;

/// Interval-scheduling abstraction injected into the registry.
///
/// `schedule` is called at session registration, `cancel` at unregistration;
/// cancellation always happens before the session's state is torn down so a
/// late tick can never observe removed state.
pub trait TickScheduler {
    /// Request a periodic tick for `session` every `every` base ticks.
    fn schedule(&mut self, session: SessionId, every: u64) -> TaskHandle;

    /// Cancel a previously scheduled tick.
    fn cancel(&mut self, handle: TaskHandle);
}

#[derive(Debug)]
struct ScheduledTick {
    handle: TaskHandle,
    session: SessionId,
    every: u64,
    next_due: u64,
}

/// In-memory scheduler driven by explicit [`advance`](ManualScheduler::advance)
/// calls.
///
/// Time is a monotone base-tick counter; each scheduled session fires every
/// `every` base ticks, starting one full period after scheduling.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: u64,
    next_handle: TaskHandle,
    tasks: Vec<ScheduledTick>,
}

impl ManualScheduler {
    /// Create an empty scheduler at tick zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current base-tick count.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of live scheduled tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Advance the clock by `ticks` base ticks and return every session tick
    /// that came due in the advanced window, in due-time order; tasks due at
    /// the same base tick fire in registration order. A session whose period
    /// fits several times into the window fires several times.
    pub fn advance(&mut self, ticks: u64) -> Vec<SessionId> {
        self.now += ticks;
        let mut due = Vec::new();
        // Round-robin in due-time order so interleaved cadences fire fairly.
        loop {
            let mut earliest: Option<&mut ScheduledTick> = None;
            for task in &mut self.tasks {
                if task.next_due <= self.now
                    && earliest
                        .as_ref()
                        .map_or(true, |best| task.next_due < best.next_due)
                {
                    earliest = Some(task);
                }
            }
            match earliest {
                Some(task) => {
                    due.push(task.session.clone());
                    task.next_due += task.every;
                }
                None => break,
            }
        }
        due
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, session: SessionId, every: u64) -> TaskHandle {
        let every = every.max(1);
        let handle = self.next_handle;
        self.next_handle += 1;
        self.tasks.push(ScheduledTick {
            handle,
            session,
            every,
            next_due: self.now + every,
        });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.tasks.retain(|task| task.handle != handle);
    }
}
