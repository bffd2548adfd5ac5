use std::time::Duration;

/// Handle returned by [`Scheduler::schedule`]; repeating timers keep theirs across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TimerId,
    deadline: Duration,
    seq: u64,
    repeat: Option<Duration>,
    task: T,
}

/// 以虛擬時鐘取代瀏覽器計時器。 / Timer queue driven by a virtual clock instead of the browser event loop.
///
/// Nothing fires on its own: callers advance the clock and run whatever
/// tasks come due, in deadline order (ties keep scheduling order).
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// 排程一次性工作。 / Runs `task` once after `delay`.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        self.insert(delay, None, task)
    }

    /// Runs `task` every `interval` until cancelled. Zero intervals are bumped to one millisecond.
    pub fn schedule_repeating(&mut self, interval: Duration, task: T) -> TimerId {
        let interval = interval.max(Duration::from_millis(1));
        self.insert(interval, Some(interval), task)
    }

    fn insert(&mut self, delay: Duration, repeat: Option<Duration>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.entries.push(Entry {
            id,
            deadline: self.now + delay,
            seq,
            repeat,
            task,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// 推進時鐘並回傳到期的工作。 / Advances the clock by `by` and returns every task that came due.
    ///
    /// Tasks scheduled while handling the result are timed from the end of the
    /// window; use [`Scheduler::pop_due`] when handlers schedule follow-ups.
    pub fn advance(&mut self, by: Duration) -> Vec<T> {
        let target = self.now + by;
        let mut due = Vec::new();
        while let Some(task) = self.pop_due(target) {
            due.push(task);
        }
        self.settle(target);
        due
    }

    /// 取出下一個於 `target` 前到期的工作。 / Takes the earliest task due at or before `target`.
    ///
    /// The clock moves to that task's deadline, so anything the caller
    /// schedules while running it is timed from when it fired.
    pub fn pop_due(&mut self, target: Duration) -> Option<T> {
        let index = self.next_due(target)?;
        let entry = self.entries.remove(index);
        self.now = self.now.max(entry.deadline);
        if let Some(interval) = entry.repeat {
            let seq = self.bump_seq();
            self.entries.push(Entry {
                id: entry.id,
                deadline: entry.deadline + interval,
                seq,
                repeat: entry.repeat,
                task: entry.task.clone(),
            });
        }
        Some(entry.task)
    }

    /// Moves the clock forward to `target` without running anything.
    pub fn settle(&mut self, target: Duration) {
        self.now = self.now.max(target);
    }

    fn next_due(&self, target: Duration) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= target)
            .min_by_key(|(_, entry)| (entry.deadline, entry.seq))
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn tasks_fire_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(300), "hide");
        scheduler.schedule(ms(100), "slide-in");
        scheduler.schedule(ms(100), "second");
        assert!(scheduler.advance(ms(99)).is_empty());
        assert_eq!(scheduler.advance(ms(1)), vec!["slide-in", "second"]);
        assert_eq!(scheduler.advance(ms(500)), vec!["hide"]);
        assert_eq!(scheduler.now(), ms(600));
    }

    #[test]
    fn follow_ups_are_timed_from_their_parent() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(3_000), "hide");
        let target = scheduler.now() + ms(3_400);
        let mut fired = Vec::new();
        while let Some(task) = scheduler.pop_due(target) {
            if task == "hide" {
                assert_eq!(scheduler.now(), ms(3_000));
                scheduler.schedule(ms(300), "remove");
            }
            fired.push(task);
        }
        scheduler.settle(target);
        assert_eq!(fired, vec!["hide", "remove"]);
        assert_eq!(scheduler.now(), ms(3_400));
    }

    #[test]
    fn repeating_timers_rearm_until_cancelled() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_repeating(ms(60_000), "clock");
        assert_eq!(scheduler.advance(ms(180_000)).len(), 3);
        assert!(scheduler.is_pending(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.advance(ms(600_000)).is_empty());
    }
}
