use crate::bindings::{jsStorageGet, jsStorageRemove, jsStorageSet};

/// Key/value flags scoped to the current browsing session.
///
/// The page only persists two of them (whether the entry gate was already
/// opened and which section a cross-page navigation wants scrolled to), but
/// every consumer goes through this trait rather than reaching for ambient
/// browser storage, so the flags can be exercised without a browser behind
/// them.
pub(crate) trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// `SessionStore` backed by the page's `sessionStorage` through the JavaScript
/// bindings.
pub(crate) struct JsSessionStore;

impl SessionStore for JsSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        jsStorageGet(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        jsStorageSet(key, value);
    }

    fn remove(&mut self, key: &str) {
        jsStorageRemove(key);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::SessionStore;
    use std::collections::HashMap;

    /// In-memory `SessionStore` for tests.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        values: HashMap<String, String>,
    }

    impl SessionStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) {
            self.values.insert(key.to_string(), value.to_string());
        }

        fn remove(&mut self, key: &str) {
            self.values.remove(key);
        }
    }
}
