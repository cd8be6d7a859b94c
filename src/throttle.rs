/// What to do with an event arriving at a given time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    Run,
    /// Run once after this many milliseconds; later events in the window are covered by it.
    Defer(u32),
    Skip,
}

/// Leading-edge throttle with a single trailing run, so the last event in a
/// burst is always handled.
#[derive(Debug, Clone)]
pub struct Throttle {
    limit_ms: f64,
    last_run: Option<f64>,
    trailing: bool,
}

impl Throttle {
    pub fn new(limit_ms: u32) -> Self {
        Self {
            limit_ms: limit_ms as f64,
            last_run: None,
            trailing: false,
        }
    }

    pub fn poll(&mut self, now_ms: f64) -> Decision {
        if self.trailing {
            return Decision::Skip;
        }
        match self.last_run {
            Some(last) if now_ms - last < self.limit_ms => {
                self.trailing = true;
                Decision::Defer((self.limit_ms - (now_ms - last)).ceil().max(0.0) as u32)
            }
            _ => {
                self.last_run = Some(now_ms);
                Decision::Run
            }
        }
    }

    /// Records that the deferred run happened.
    pub fn ran_deferred(&mut self, now_ms: f64) {
        self.trailing = false;
        self.last_run = Some(now_ms);
    }
}
