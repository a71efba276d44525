use crate::Logger;

pub(crate) mod deferred;

/// Height subtracted from a section's document offset when scrolling to it,
/// used whenever the real header cannot be measured.
pub(crate) const DEFAULT_NAV_OFFSET: f64 = 84.;

/// Upper bound on the measured header height. Anything taller is assumed to
/// be a mis-measurement (e.g. an expanded mobile menu).
pub(crate) const MAX_NAV_OFFSET: f64 = 200.;

/// The offset to subtract from a section's top when scrolling to it, from the
/// measured header height when one is available.
pub(crate) fn nav_offset(measured_header_height: Option<f64>) -> f64 {
    measured_header_height
        .map(|h| h.clamp(0., MAX_NAV_OFFSET))
        .unwrap_or(DEFAULT_NAV_OFFSET)
}

/// One scrollable region of the home page, addressed by the DOM id of its
/// anchor element.
#[derive(Clone, Debug)]
pub(crate) struct Section {
    key: String,
    title: String,
    subtitle: String,
}

impl Section {
    pub(crate) fn new(key: String, title: String, subtitle: String) -> Self {
        Self {
            key,
            title,
            subtitle,
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }
}

/// Index of the most visible section: greatest strictly-positive ratio, ties
/// resolved to the earliest index in configured order.
///
/// `None` when no section intersects at all.
pub(crate) fn most_visible(ratios: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &ratio) in ratios.iter().enumerate() {
        if ratio > 0. && best.map_or(true, |(_, b)| ratio > b) {
            best = Some((index, ratio));
        }
    }
    best.map(|(index, _)| index)
}

/// Tracks which configured section is the most visible one.
///
/// Individual ratio updates are folded into a table indexed by configured
/// order; the active section is always derived from the whole table, so the
/// outcome does not depend on the order in which per-section updates arrive.
pub(crate) struct SectionTracker {
    sections: Vec<Section>,

    /// Last known intersection ratio per section, in configured order. Zero
    /// until the section first intersects.
    ratios: Vec<f64>,

    /// Index of the active section. Always a valid index into `sections`
    /// whenever `sections` is non-empty.
    active_index: usize,
}

impl SectionTracker {
    pub(crate) fn new() -> Self {
        Self {
            sections: vec![],
            ratios: vec![],
            active_index: 0,
        }
    }

    /// Replace the configured section list.
    ///
    /// The active section carries over by key when it still exists in the new
    /// list; otherwise it falls back to the first entry. All ratios restart
    /// from zero.
    ///
    /// Returns `true` when the active key changed.
    pub(crate) fn configure(&mut self, sections: Vec<Section>) -> bool {
        let previous_key = self.active_key().map(str::to_string);
        let carried = previous_key
            .as_deref()
            .and_then(|key| sections.iter().position(|s| s.key() == key));
        if carried.is_none() && !self.sections.is_empty() {
            Logger::debug("Sections: active section no longer configured, falling back to first");
        }
        self.active_index = carried.unwrap_or(0);
        self.ratios = vec![0.; sections.len()];
        self.sections = sections;
        self.active_key().map(str::to_string) != previous_key
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub(crate) fn section_keys(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(Section::key)
    }

    pub(crate) fn active_key(&self) -> Option<&str> {
        self.sections.get(self.active_index).map(Section::key)
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.sections.iter().any(|s| s.key() == key)
    }

    /// Fold one intersection update into the ratio table and re-derive the
    /// active section.
    ///
    /// Returns `true` when the active key changed. Updates for unknown keys
    /// are ignored.
    pub(crate) fn apply(&mut self, key: &str, ratio: f64) -> bool {
        let Some(index) = self.sections.iter().position(|s| s.key() == key) else {
            Logger::warn("Sections: dropping ratio update for an unconfigured key");
            return false;
        };
        self.ratios[index] = ratio;
        // While nothing intersects, the previously active section stays put.
        let Some(new_active) = most_visible(&self.ratios) else {
            return false;
        };
        if new_active == self.active_index {
            return false;
        }
        self.active_index = new_active;
        true
    }

    /// Key of the section one step before or after the active one, clamped at
    /// both ends (no wraparound). Used for keyboard navigation.
    pub(crate) fn step(&self, forward: bool) -> Option<&str> {
        if self.sections.is_empty() {
            return None;
        }
        let index = if forward {
            (self.active_index + 1).min(self.sections.len() - 1)
        } else {
            self.active_index.saturating_sub(1)
        };
        self.sections.get(index).map(Section::key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(key: &str) -> Section {
        Section::new(key.to_string(), key.to_uppercase(), String::new())
    }

    fn home_tracker() -> SectionTracker {
        let mut tracker = SectionTracker::new();
        tracker.configure(vec![
            section("overview"),
            section("education"),
            section("skills"),
            section("projects"),
        ]);
        tracker
    }

    #[test]
    fn test_greatest_ratio_wins() {
        let mut tracker = home_tracker();
        assert!(tracker.apply("education", 0.3));
        assert_eq!(tracker.active_key(), Some("education"));
        assert!(tracker.apply("skills", 0.6));
        assert_eq!(tracker.active_key(), Some("skills"));
        // A weaker section does not take over.
        assert!(!tracker.apply("projects", 0.2));
        assert_eq!(tracker.active_key(), Some("skills"));
    }

    #[test]
    fn test_outcome_independent_of_update_order() {
        let updates = [("overview", 0.1), ("education", 0.5), ("skills", 0.3)];
        let mut forward = home_tracker();
        for (key, ratio) in updates {
            forward.apply(key, ratio);
        }
        let mut backward = home_tracker();
        for &(key, ratio) in updates.iter().rev() {
            backward.apply(key, ratio);
        }
        assert_eq!(forward.active_key(), backward.active_key());
        assert_eq!(forward.active_key(), Some("education"));
    }

    #[test]
    fn test_ties_resolve_to_earliest_configured() {
        let mut tracker = home_tracker();
        tracker.apply("skills", 0.4);
        tracker.apply("education", 0.4);
        assert_eq!(tracker.active_key(), Some("education"));
    }

    #[test]
    fn test_no_intersection_keeps_previous_active() {
        let mut tracker = home_tracker();
        tracker.apply("skills", 0.5);
        assert!(!tracker.apply("skills", 0.));
        assert_eq!(tracker.active_key(), Some("skills"));
    }

    #[test]
    fn test_reconfigure_falls_back_to_first_key() {
        let mut tracker = home_tracker();
        tracker.apply("projects", 0.8);
        assert_eq!(tracker.active_key(), Some("projects"));

        let changed = tracker.configure(vec![section("overview"), section("skills")]);
        assert!(changed);
        assert_eq!(tracker.active_key(), Some("overview"));
    }

    #[test]
    fn test_reconfigure_carries_active_key_over() {
        let mut tracker = home_tracker();
        tracker.apply("skills", 0.8);

        let changed = tracker.configure(vec![section("skills"), section("projects")]);
        assert!(!changed);
        assert_eq!(tracker.active_key(), Some("skills"));
    }

    #[test]
    fn test_step_clamps_at_both_ends() {
        let mut tracker = home_tracker();
        assert_eq!(tracker.step(false), Some("overview"));
        assert_eq!(tracker.step(true), Some("education"));
        tracker.apply("projects", 0.9);
        assert_eq!(tracker.step(true), Some("projects"));
    }

    #[test]
    fn test_nav_offset_clamps_and_defaults() {
        assert_eq!(nav_offset(None), DEFAULT_NAV_OFFSET);
        assert_eq!(nav_offset(Some(64.)), 64.);
        assert_eq!(nav_offset(Some(500.)), MAX_NAV_OFFSET);
        assert_eq!(nav_offset(Some(-20.)), 0.);
    }
}
