/// Bounded "poll until found" primitive.
///
/// Some DOM targets only appear a few frames after the page that should host
/// them is shown. Instead of observing mutations, callers re-probe once per
/// animation frame through `tick` until the probe succeeds or a fixed attempt
/// budget runs out.
///
/// Cancellation is simply dropping the `BoundedPoll`.
pub(crate) struct BoundedPoll {
    attempts_left: u32,
}

/// What a single `tick` of a `BoundedPoll` concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PollOutcome {
    /// The probe succeeded. The poll is finished.
    Found,

    /// The probe failed but attempts remain. Tick again on the next frame.
    Retry,

    /// The probe failed and the attempt budget is exhausted. The poll is
    /// finished and the caller should give up on the target.
    Exhausted,
}

impl BoundedPoll {
    /// Create a `BoundedPoll` allowing up to `max_attempts` probes.
    pub(crate) fn new(max_attempts: u32) -> Self {
        Self {
            attempts_left: max_attempts,
        }
    }

    /// Run one probe attempt.
    ///
    /// Calling `tick` after it returned `Found` or `Exhausted` keeps returning
    /// `Exhausted`: a finished poll never comes back to life.
    pub(crate) fn tick(&mut self, probe: impl FnOnce() -> bool) -> PollOutcome {
        if self.attempts_left == 0 {
            return PollOutcome::Exhausted;
        }
        self.attempts_left -= 1;
        if probe() {
            self.attempts_left = 0;
            PollOutcome::Found
        } else if self.attempts_left == 0 {
            PollOutcome::Exhausted
        } else {
            PollOutcome::Retry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_on_first_probe() {
        let mut poll = BoundedPoll::new(3);
        assert_eq!(poll.tick(|| true), PollOutcome::Found);
        assert_eq!(poll.tick(|| true), PollOutcome::Exhausted);
    }

    #[test]
    fn test_exhausts_after_exactly_max_attempts() {
        let mut poll = BoundedPoll::new(40);
        let mut probes = 0;
        for _ in 0..39 {
            let outcome = poll.tick(|| {
                probes += 1;
                false
            });
            assert_eq!(outcome, PollOutcome::Retry);
        }
        let outcome = poll.tick(|| {
            probes += 1;
            false
        });
        assert_eq!(outcome, PollOutcome::Exhausted);
        assert_eq!(probes, 40);

        // No probe runs once the budget is spent.
        let outcome = poll.tick(|| {
            probes += 1;
            true
        });
        assert_eq!(outcome, PollOutcome::Exhausted);
        assert_eq!(probes, 40);
    }

    #[test]
    fn test_found_on_last_attempt() {
        let mut poll = BoundedPoll::new(2);
        assert_eq!(poll.tick(|| false), PollOutcome::Retry);
        assert_eq!(poll.tick(|| true), PollOutcome::Found);
    }

    #[test]
    fn test_zero_budget_never_probes() {
        let mut poll = BoundedPoll::new(0);
        assert_eq!(poll.tick(|| true), PollOutcome::Exhausted);
    }
}
