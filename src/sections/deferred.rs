use crate::utils::poll::{BoundedPoll, PollOutcome};
use crate::utils::session_store::SessionStore;
use crate::Logger;

/// Session flag naming the section another page asked to be scrolled to once
/// the home page is ready.
pub(crate) const PENDING_SCROLL_KEY: &str = "pending_scroll_to";

/// How many animation frames the target element gets to appear before the
/// pending request is dropped.
pub(crate) const MAX_TARGET_PROBES: u32 = 40;

/// Consumes a cross-page "scroll to this section once home" request.
///
/// The target element usually mounts a few frames after the page shell, so
/// the request is held and the DOM probed once per frame through a
/// `BoundedPoll`. Whatever the outcome, the session flag is cleared so the
/// request fires at most once.
pub(crate) struct DeferredScroll {
    active: Option<(String, BoundedPoll)>,
}

impl DeferredScroll {
    pub(crate) fn new() -> Self {
        Self { active: None }
    }

    /// Pick up the pending request from the session flags, when there is one.
    ///
    /// Returns `true` when a poll is now running and the caller must feed it
    /// animation frames.
    pub(crate) fn begin(&mut self, store: &dyn SessionStore) -> bool {
        match store.get(PENDING_SCROLL_KEY) {
            Some(key) => {
                self.active = Some((key, BoundedPoll::new(MAX_TARGET_PROBES)));
                true
            }
            None => {
                self.active = None;
                false
            }
        }
    }

    /// Abandon the running poll without touching the session flag (used when
    /// the gate closes again before the target was found).
    pub(crate) fn cancel(&mut self) {
        self.active = None;
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Probe once for the target element.
    ///
    /// Returns the key to scroll to when the element was found. On both
    /// success and budget exhaustion the request is cleared from the session
    /// flags; exhaustion is silent apart from a debug log.
    pub(crate) fn on_frame(
        &mut self,
        probe: impl FnOnce(&str) -> bool,
        store: &mut dyn SessionStore,
    ) -> Option<String> {
        let Some((key, poll)) = self.active.as_mut() else {
            return None;
        };
        match poll.tick(|| probe(key.as_str())) {
            PollOutcome::Found => {
                let key = key.clone();
                self.active = None;
                store.remove(PENDING_SCROLL_KEY);
                Some(key)
            }
            PollOutcome::Retry => None,
            PollOutcome::Exhausted => {
                Logger::debug("Sections: deferred scroll target never appeared, dropping request");
                self.active = None;
                store.remove(PENDING_SCROLL_KEY);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::session_store::testing::MemoryStore;

    #[test]
    fn test_found_target_clears_the_flag() {
        let mut store = MemoryStore::default();
        store.set(PENDING_SCROLL_KEY, "projects");

        let mut deferred = DeferredScroll::new();
        assert!(deferred.begin(&store));

        // Target shows up on the third frame.
        assert_eq!(deferred.on_frame(|_| false, &mut store), None);
        assert_eq!(deferred.on_frame(|_| false, &mut store), None);
        assert_eq!(
            deferred.on_frame(|key| key == "projects", &mut store),
            Some("projects".to_string())
        );
        assert!(!deferred.is_active());
        assert_eq!(store.get(PENDING_SCROLL_KEY), None);
    }

    #[test]
    fn test_request_dropped_after_exact_budget() {
        let mut store = MemoryStore::default();
        store.set(PENDING_SCROLL_KEY, "ghost");

        let mut deferred = DeferredScroll::new();
        assert!(deferred.begin(&store));

        let mut probes = 0;
        for _ in 0..MAX_TARGET_PROBES {
            assert!(deferred
                .on_frame(
                    |_| {
                        probes += 1;
                        false
                    },
                    &mut store
                )
                .is_none());
        }
        assert_eq!(probes, MAX_TARGET_PROBES);
        assert!(!deferred.is_active());
        assert_eq!(store.get(PENDING_SCROLL_KEY), None);

        // Further frames probe nothing.
        assert_eq!(deferred.on_frame(|_| true, &mut store), None);
        assert_eq!(probes, MAX_TARGET_PROBES);
    }

    #[test]
    fn test_begin_without_flag_stays_idle() {
        let store = MemoryStore::default();
        let mut deferred = DeferredScroll::new();
        assert!(!deferred.begin(&store));
        assert!(!deferred.is_active());
    }

    #[test]
    fn test_cancel_keeps_the_flag_for_a_later_visit() {
        let mut store = MemoryStore::default();
        store.set(PENDING_SCROLL_KEY, "skills");

        let mut deferred = DeferredScroll::new();
        deferred.begin(&store);
        deferred.cancel();
        assert!(!deferred.is_active());
        assert_eq!(store.get(PENDING_SCROLL_KEY), Some("skills".to_string()));
    }
}
