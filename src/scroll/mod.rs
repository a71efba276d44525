/// Converts document scroll position into a `[0, 1]` progress ratio.
///
/// While the smooth-scroll engine drives the page its events may carry an
/// explicit progress value, which is used as-is (clamped). Otherwise the
/// ratio is derived from the raw scroll metrics, with a document shorter than
/// the viewport reporting `0`.
pub(crate) struct ScrollProgressReporter {
    progress: f64,
}

impl ScrollProgressReporter {
    pub(crate) fn new() -> Self {
        Self { progress: 0. }
    }

    pub(crate) fn progress(&self) -> f64 {
        self.progress
    }

    /// Event from the smooth-scroll engine. Returns `true` when the ratio
    /// changed.
    pub(crate) fn on_engine_scroll(
        &mut self,
        offset: f64,
        limit: f64,
        explicit_progress: Option<f64>,
    ) -> bool {
        let next = match explicit_progress {
            Some(progress) => clamp01(progress),
            None => ratio(offset, limit),
        };
        self.update(next)
    }

    /// Native scroll or resize metrics, used when no engine drives the page.
    /// Returns `true` when the ratio changed.
    pub(crate) fn on_native_scroll(
        &mut self,
        scroll_top: f64,
        scroll_height: f64,
        client_height: f64,
    ) -> bool {
        self.update(ratio(scroll_top, scroll_height - client_height))
    }

    fn update(&mut self, next: f64) -> bool {
        if next == self.progress {
            return false;
        }
        self.progress = next;
        true
    }
}

fn ratio(offset: f64, limit: f64) -> f64 {
    if limit > 0. {
        clamp01(offset / limit)
    } else {
        0.
    }
}

fn clamp01(n: f64) -> f64 {
    f64::min(1., f64::max(0., n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_ratio_is_clamped() {
        let mut reporter = ScrollProgressReporter::new();
        reporter.on_native_scroll(500., 2000., 1000.);
        assert_eq!(reporter.progress(), 0.5);
        reporter.on_native_scroll(5000., 2000., 1000.);
        assert_eq!(reporter.progress(), 1.);
        reporter.on_native_scroll(-200., 2000., 1000.);
        assert_eq!(reporter.progress(), 0.);
    }

    #[test]
    fn test_short_document_reports_zero() {
        let mut reporter = ScrollProgressReporter::new();
        reporter.on_native_scroll(100., 2000., 1000.);
        // Document shorter than the viewport: denominator is not positive.
        reporter.on_native_scroll(100., 500., 1000.);
        assert_eq!(reporter.progress(), 0.);
        reporter.on_native_scroll(0., 1000., 1000.);
        assert_eq!(reporter.progress(), 0.);
    }

    #[test]
    fn test_explicit_engine_progress_is_preferred() {
        let mut reporter = ScrollProgressReporter::new();
        reporter.on_engine_scroll(10., 10000., Some(0.25));
        assert_eq!(reporter.progress(), 0.25);
        reporter.on_engine_scroll(10., 10000., Some(7.));
        assert_eq!(reporter.progress(), 1.);
    }

    #[test]
    fn test_engine_event_without_progress_uses_metrics() {
        let mut reporter = ScrollProgressReporter::new();
        reporter.on_engine_scroll(250., 1000., None);
        assert_eq!(reporter.progress(), 0.25);
        reporter.on_engine_scroll(250., 0., None);
        assert_eq!(reporter.progress(), 0.);
    }

    #[test]
    fn test_pathological_inputs_stay_in_bounds() {
        let mut reporter = ScrollProgressReporter::new();
        for (offset, limit) in [
            (f64::NAN, 100.),
            (100., f64::NAN),
            (f64::INFINITY, 100.),
            (100., f64::INFINITY),
            (-1., -1.),
        ] {
            reporter.on_engine_scroll(offset, limit, None);
            let p = reporter.progress();
            assert!((0. ..=1.).contains(&p), "out of bounds for {offset}/{limit}");
        }
        reporter.on_engine_scroll(0., 0., Some(f64::NAN));
        assert!((0. ..=1.).contains(&reporter.progress()));
    }

    #[test]
    fn test_change_detection() {
        let mut reporter = ScrollProgressReporter::new();
        assert!(reporter.on_native_scroll(500., 2000., 1000.));
        assert!(!reporter.on_native_scroll(500., 2000., 1000.));
    }
}
