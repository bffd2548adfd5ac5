use std::time::Duration;

/// 防抖：安靜一段時間後才觸發一次。 / Fires once after calls have been quiet for `wait`.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    /// Records a call at `now`, pushing the deadline back.
    pub fn call(&mut self, now: Duration) {
        self.deadline = Some(now + self.wait);
    }

    /// Returns `true` exactly once when the quiet period has elapsed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// 節流：每段時間最多放行一次。 / Admits at most one call per `limit`.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    limit: Duration,
    open_at: Option<Duration>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            open_at: None,
        }
    }

    pub fn try_call(&mut self, now: Duration) -> bool {
        if self.open_at.map_or(true, |open_at| now >= open_at) {
            self.open_at = Some(now + self.limit);
            true
        } else {
            false
        }
    }
}
