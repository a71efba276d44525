use crate::sections::deferred::PENDING_SCROLL_KEY;
use crate::utils::session_store::SessionStore;

/// Session flag marking the entry gate as already opened.
pub(crate) const GATE_OPEN_KEY: &str = "gate_open";

/// The entry screen gating the main site content for the current browsing
/// session.
///
/// Whether it was opened survives in-session navigation and reloads through
/// the session flags, but nothing longer-lived: a fresh session always starts
/// with the gate closed.
pub(crate) struct Gate {
    is_open: bool,
}

impl Gate {
    /// Restore the gate from the session flags.
    pub(crate) fn restored(store: &dyn SessionStore) -> Self {
        Self {
            is_open: store.get(GATE_OPEN_KEY).as_deref() == Some("true"),
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.is_open
    }

    /// Open the gate and persist that for the session. Returns `true` when it
    /// was closed before.
    pub(crate) fn open(&mut self, store: &mut dyn SessionStore) -> bool {
        if self.is_open {
            return false;
        }
        self.is_open = true;
        store.set(GATE_OPEN_KEY, "true");
        true
    }

    /// Close the gate again for a fresh entry experience, dropping both
    /// session flags (an un-consumed deferred scroll makes no sense behind a
    /// closed gate). Returns `true` when it was open before.
    pub(crate) fn reset(&mut self, store: &mut dyn SessionStore) -> bool {
        store.remove(GATE_OPEN_KEY);
        store.remove(PENDING_SCROLL_KEY);
        let was_open = self.is_open;
        self.is_open = false;
        was_open
    }

    /// Which background loop the page should play: the intro loop while the
    /// gate still blocks the home page, the ambient loop everywhere else.
    pub(crate) fn background_source<'a>(
        &self,
        is_home: bool,
        intro_url: &'a str,
        ambient_url: &'a str,
    ) -> &'a str {
        if is_home && !self.is_open {
            intro_url
        } else {
            ambient_url
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::session_store::testing::MemoryStore;

    #[test]
    fn test_fresh_session_starts_closed() {
        let store = MemoryStore::default();
        assert!(!Gate::restored(&store).is_open());
    }

    #[test]
    fn test_open_persists_for_the_session() {
        let mut store = MemoryStore::default();
        let mut gate = Gate::restored(&store);
        assert!(gate.open(&mut store));
        assert!(!gate.open(&mut store));

        // A later page shell in the same session sees it open.
        assert!(Gate::restored(&store).is_open());
    }

    #[test]
    fn test_reset_clears_both_flags() {
        let mut store = MemoryStore::default();
        store.set(PENDING_SCROLL_KEY, "projects");
        let mut gate = Gate::restored(&store);
        gate.open(&mut store);

        assert!(gate.reset(&mut store));
        assert!(!gate.is_open());
        assert_eq!(store.get(GATE_OPEN_KEY), None);
        assert_eq!(store.get(PENDING_SCROLL_KEY), None);
    }

    #[test]
    fn test_background_follows_gate_and_route() {
        let mut store = MemoryStore::default();
        let mut gate = Gate::restored(&store);
        assert_eq!(gate.background_source(true, "/intro.mp4", "/ambient.mp4"), "/intro.mp4");
        assert_eq!(gate.background_source(false, "/intro.mp4", "/ambient.mp4"), "/ambient.mp4");
        gate.open(&mut store);
        assert_eq!(gate.background_source(true, "/intro.mp4", "/ambient.mp4"), "/ambient.mp4");
    }
}
