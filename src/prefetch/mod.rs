use std::collections::HashSet;

use crate::bindings::IdleCallbackId;
use crate::channels::ChannelList;

/// Primes the network cache for the channels adjacent to the current one, so
/// switching feels instant.
///
/// The work runs at low priority: it is scheduled through the idle-callback
/// binding and harvested only when the browser reports the page idle. Tuning
/// to another channel before that moment cancels the pending work and arms a
/// new one for the new neighborhood.
pub(crate) struct PrefetchScheduler {
    /// Idle work armed but not fired yet.
    pending: Option<IdleCallbackId>,

    /// URLs already handed out for prefetching. A URL is never prefetched
    /// twice, however often the visitor zaps past its channel.
    already_requested: HashSet<String>,
}

impl PrefetchScheduler {
    pub(crate) fn new() -> Self {
        Self {
            pending: None,
            already_requested: HashSet::new(),
        }
    }

    /// Forget the currently armed idle work, handing its id back so the caller
    /// can cancel it on the JavaScript-side.
    pub(crate) fn take_pending(&mut self) -> Option<IdleCallbackId> {
        self.pending.take()
    }

    /// Record freshly scheduled idle work.
    pub(crate) fn arm(&mut self, id: IdleCallbackId) {
        self.pending = Some(id);
    }

    /// The idle work identified by `id` fired: compute which URLs to prefetch
    /// now.
    ///
    /// Only the armed id is honored; anything else is a leftover of work that
    /// was superseded and yields nothing. URLs that were already requested
    /// once are filtered out.
    pub(crate) fn harvest(
        &mut self,
        id: IdleCallbackId,
        list: &ChannelList,
        current_index: usize,
    ) -> Vec<String> {
        match self.pending {
            Some(pending) if pending == id => {}
            _ => return vec![],
        }
        self.pending = None;
        adjacent_sources(list, current_index)
            .into_iter()
            .filter(|url| self.already_requested.insert(url.clone()))
            .collect()
    }
}

/// Source URLs of the video-backed neighbors of `index`, next first, with
/// wraparound. A neighborhood collapsing onto itself (lists of one or two
/// entries) yields each URL once.
fn adjacent_sources(list: &ChannelList, index: usize) -> Vec<String> {
    if list.is_empty() {
        return vec![];
    }
    let len = list.len();
    let next = (index + 1) % len;
    let prev = (index + len - 1) % len;
    let mut urls: Vec<String> = vec![];
    for neighbor in [next, prev] {
        if neighbor == index {
            continue;
        }
        if let Some(url) = list.get(neighbor).and_then(|c| c.source_url()) {
            if !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }
    }
    urls
}
