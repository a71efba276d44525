use crate::bindings::{
    jsAnnounceMediaReady, jsClearVideoSource, jsMountVideoSource, jsPauseVideo, jsRequestPlay,
    SourceId, VideoElementId,
};
use crate::dispatcher::MediaEventKind;
use crate::Logger;

mod gesture;

pub(crate) use gesture::{GestureWatch, WatchDirective};

/// Side effects a `VideoController` can have on its video element.
///
/// The production implementation forwards to the JavaScript bindings; tests
/// substitute a recording fake so the controller's ordering guarantees can be
/// checked without a media element behind it.
pub(crate) trait MediaHandle {
    /// Give the element a source to load, stamped with the `SourceId` that every
    /// event observed under it will repeat.
    fn mount(&mut self, source_id: SourceId, url: &str, poster: Option<&str>);

    /// Detach the element's source and release its resources.
    fn unmount(&mut self);

    /// Start an asynchronous play attempt. Its resolution comes back later
    /// through `VideoController::on_play_result` with the same `SourceId`.
    fn request_play(&mut self, source_id: SourceId);

    /// Pause the element.
    fn pause(&mut self);

    /// Tell the UI the element may be faded in (or must be hidden again).
    fn announce_ready(&mut self, ready: bool);
}

/// `MediaHandle` controlling a page video element through the JavaScript
/// bindings.
pub(crate) struct JsMediaHandle {
    video_id: VideoElementId,
}

impl JsMediaHandle {
    pub(crate) fn new(video_id: VideoElementId) -> Self {
        Self { video_id }
    }
}

impl MediaHandle for JsMediaHandle {
    fn mount(&mut self, source_id: SourceId, url: &str, poster: Option<&str>) {
        jsMountVideoSource(self.video_id, source_id, url, poster);
    }

    fn unmount(&mut self) {
        jsClearVideoSource(self.video_id);
    }

    fn request_play(&mut self, source_id: SourceId) {
        jsRequestPlay(self.video_id, source_id);
    }

    fn pause(&mut self) {
        jsPauseVideo(self.video_id);
    }

    fn announce_ready(&mut self, ready: bool) {
        jsAnnounceMediaReady(self.video_id, ready);
    }
}

/// Where the controlled element currently stands in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlaybackPhase {
    /// The element holds no source. For lazy elements this lasts until they
    /// first enter their proximity margin, so no network request for the source
    /// can have been made yet.
    Unmounted,

    /// A source has been assigned but no decoded frame is available yet.
    Loading,

    /// At least one frame of the current source has been decoded, the element
    /// may be faded in.
    Ready,
}

/// Governs the lifecycle of one page video element: deferred mount for lazy
/// elements, play attempts gated behind decoded data, autoplay-rejection
/// recovery on the next user gesture, pause when the element scrolls out of
/// reach and resume when it comes back.
///
/// Every source assignment gets its own `SourceId`; signals that come back
/// carrying a superseded id are discarded, so a fast sequence of reassignments
/// can never let an old source mark the new one ready.
pub(crate) struct VideoController<H> {
    handle: H,

    /// If `true`, the element is not given its source (hence performs no
    /// network request for it) until it first enters the proximity margin.
    lazy: bool,

    /// Poster image shown before the current source produces a frame.
    poster: Option<String>,

    /// URL the element should be playing. For a lazy element this may be set
    /// while the element is still unmounted.
    wanted_url: Option<String>,

    /// Identity of the source currently mounted on the element, `None` while
    /// unmounted.
    current_source: Option<SourceId>,

    /// Next value handed out as a `SourceId`.
    next_source_id: SourceId,

    phase: PlaybackPhase,

    /// `true` while a play attempt is in flight on the element. At most one
    /// attempt may be pending at any instant, and the flag is released on every
    /// resolution, rejected or not, so a rejection can never wedge the element
    /// into "never try again".
    attempt_lock: bool,

    /// `true` once a play attempt for the current source has succeeded.
    started: bool,

    /// `true` while the element is, as far as the controller asked, playing.
    playing: bool,

    /// `true` when the last play attempt was rejected by the platform and the
    /// controller waits for a user gesture to retry.
    awaiting_gesture: bool,

    /// Last known proximity state reported by the visibility observer.
    in_view: bool,

    /// Whether the readiness fade-in has been announced for the current source.
    /// At most one announcement is made per source assignment.
    announced_ready: bool,
}

impl<H: MediaHandle> VideoController<H> {
    pub(crate) fn new(handle: H, lazy: bool, poster: Option<String>) -> Self {
        Self {
            handle,
            lazy,
            poster,
            wanted_url: None,
            current_source: None,
            next_source_id: 0,
            phase: PlaybackPhase::Unmounted,
            attempt_lock: false,
            started: false,
            playing: false,
            awaiting_gesture: false,
            // A non-lazy element plays from the start; the observer corrects
            // this on its first report if the element is actually out of reach.
            in_view: !lazy,
            announced_ready: false,
        }
    }

    /// Change what the element should be playing.
    ///
    /// `Some(url)` supersedes whatever source was assigned before and restarts
    /// the lifecycle for the new one. `None` tears the element down.
    pub(crate) fn set_source(&mut self, url: Option<String>) {
        match url {
            Some(url) => self.assign(url),
            None => self.teardown(),
        }
    }

    /// Like `set_source`, but a no-op when the element already wants that
    /// URL, so re-deriving the same target (route changes, gate transitions)
    /// does not restart a loop that is already playing.
    pub(crate) fn ensure_source(&mut self, url: String) {
        if self.wanted_url.as_deref() == Some(url.as_str()) {
            return;
        }
        self.assign(url);
    }

    /// Remove the element's source and reset the controller.
    pub(crate) fn teardown(&mut self) {
        let was_mounted = self.current_source.is_some();
        self.reset_source_state();
        self.wanted_url = None;
        if was_mounted {
            self.handle.unmount();
        }
    }

    /// Proximity boundary crossing reported by the visibility observer.
    pub(crate) fn on_visibility(&mut self, is_intersecting: bool) {
        if self.in_view == is_intersecting {
            return;
        }
        self.in_view = is_intersecting;
        if is_intersecting {
            if self.phase == PlaybackPhase::Unmounted && self.wanted_url.is_some() {
                Logger::debug("Playback: element entered its margin, mounting deferred source");
                self.mount_wanted();
            } else {
                self.try_play();
            }
        } else if self.playing {
            self.handle.pause();
            self.playing = false;
        }
    }

    /// A media event was observed on the element for the source identified by
    /// `source_id`.
    ///
    /// Returns `false` when the event belonged to a superseded source and was
    /// discarded.
    pub(crate) fn on_media_event(&mut self, source_id: SourceId, kind: MediaEventKind) -> bool {
        if self.current_source != Some(source_id) {
            Logger::debug("Playback: discarding media event from a superseded source");
            return false;
        }
        match kind {
            MediaEventKind::LoadedMetadata => self.try_play(),
            MediaEventKind::FirstFrame => {
                self.phase = PlaybackPhase::Ready;
                if !self.announced_ready {
                    self.announced_ready = true;
                    self.handle.announce_ready(true);
                }
            }
            MediaEventKind::Playing => {
                if self.in_view {
                    self.playing = true;
                } else {
                    // The element managed to start while out of reach (e.g. a
                    // gesture retry racing a scroll): the last visibility wins.
                    self.handle.pause();
                    self.playing = false;
                }
            }
            MediaEventKind::CanPlay | MediaEventKind::Waiting => {}
            MediaEventKind::Error => {
                Logger::warn("Playback: media element reported an error, staying not ready");
            }
        }
        true
    }

    /// Resolution of a play attempt started through the handle.
    pub(crate) fn on_play_result(&mut self, source_id: SourceId, succeeded: bool) {
        // The lock brackets the element's single in-flight attempt, so it is
        // released whichever source the resolution belongs to.
        self.attempt_lock = false;
        if self.current_source != Some(source_id) {
            Logger::debug("Playback: discarding play result from a superseded source");
            return;
        }
        if succeeded {
            self.started = true;
            self.awaiting_gesture = false;
            if self.in_view {
                self.playing = true;
            } else {
                self.handle.pause();
                self.playing = false;
            }
        } else {
            Logger::debug("Playback: play attempt rejected, retrying on the next user gesture");
            self.awaiting_gesture = true;
        }
    }

    /// A user gesture happened somewhere on the page.
    pub(crate) fn on_gesture(&mut self) {
        if self.awaiting_gesture {
            self.awaiting_gesture = false;
            self.try_play();
        }
    }

    /// `true` while the controller waits for a user gesture to retry playback.
    pub(crate) fn awaiting_gesture(&self) -> bool {
        self.awaiting_gesture
    }

    /// `true` once the current source has produced a decoded frame.
    pub(crate) fn is_ready(&self) -> bool {
        self.phase == PlaybackPhase::Ready
    }

    pub(crate) fn has_source(&self) -> bool {
        self.wanted_url.is_some()
    }

    fn assign(&mut self, url: String) {
        self.reset_source_state();
        self.wanted_url = Some(url);
        if self.lazy && !self.in_view {
            Logger::debug("Playback: source assigned out of reach, deferring mount");
            return;
        }
        self.mount_wanted();
    }

    /// Mount the wanted source on the element, stamping a fresh `SourceId`.
    fn mount_wanted(&mut self) {
        let Some(url) = self.wanted_url.clone() else {
            return;
        };
        self.next_source_id += 1;
        let source_id = self.next_source_id;
        self.current_source = Some(source_id);
        self.phase = PlaybackPhase::Loading;
        self.handle.mount(source_id, &url, self.poster.as_deref());
    }

    /// Forget everything tied to the current source assignment.
    fn reset_source_state(&mut self) {
        if self.announced_ready {
            self.handle.announce_ready(false);
        }
        self.announced_ready = false;
        self.attempt_lock = false;
        self.started = false;
        self.playing = false;
        self.awaiting_gesture = false;
        self.current_source = None;
        self.phase = PlaybackPhase::Unmounted;
    }

    /// Start a play attempt if the element is in a position to play and no
    /// other attempt is in flight.
    fn try_play(&mut self) {
        if self.attempt_lock {
            Logger::debug("Playback: play attempt already in flight");
            return;
        }
        if self.playing || !self.in_view {
            return;
        }
        let Some(source_id) = self.current_source else {
            return;
        };
        self.attempt_lock = true;
        self.handle.request_play(source_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        Mount(SourceId, String),
        Unmount,
        Play(SourceId),
        Pause,
        Ready(bool),
    }

    #[derive(Default)]
    struct FakeHandle {
        calls: Vec<Call>,
    }

    impl FakeHandle {
        fn plays(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Play(_)))
                .count()
        }

        fn mounts(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Mount(..)))
                .count()
        }
    }

    impl MediaHandle for FakeHandle {
        fn mount(&mut self, source_id: SourceId, url: &str, _poster: Option<&str>) {
            self.calls.push(Call::Mount(source_id, url.to_string()));
        }

        fn unmount(&mut self) {
            self.calls.push(Call::Unmount);
        }

        fn request_play(&mut self, source_id: SourceId) {
            self.calls.push(Call::Play(source_id));
        }

        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }

        fn announce_ready(&mut self, ready: bool) {
            self.calls.push(Call::Ready(ready));
        }
    }

    fn eager_controller() -> VideoController<FakeHandle> {
        VideoController::new(FakeHandle::default(), false, None)
    }

    #[test]
    fn test_single_play_attempt_in_flight() {
        let mut ctrl = eager_controller();
        ctrl.set_source(Some("/a.mp4".to_string()));
        let source = ctrl.current_source.unwrap();

        // Metadata arriving several times must not stack attempts.
        ctrl.on_media_event(source, MediaEventKind::LoadedMetadata);
        ctrl.on_media_event(source, MediaEventKind::LoadedMetadata);
        ctrl.on_media_event(source, MediaEventKind::LoadedMetadata);
        assert_eq!(ctrl.handle.plays(), 1);

        // Resolution releases the lock, a later retry is allowed again.
        ctrl.on_play_result(source, false);
        ctrl.on_gesture();
        assert_eq!(ctrl.handle.plays(), 2);
    }

    #[test]
    fn test_rejection_always_releases_the_lock() {
        let mut ctrl = eager_controller();
        ctrl.set_source(Some("/a.mp4".to_string()));
        let source = ctrl.current_source.unwrap();

        ctrl.on_media_event(source, MediaEventKind::LoadedMetadata);
        ctrl.on_play_result(source, false);
        assert!(!ctrl.attempt_lock);
        assert!(ctrl.awaiting_gesture());

        // Next gesture retries; rejection again re-enlists instead of wedging.
        ctrl.on_gesture();
        ctrl.on_play_result(source, false);
        assert!(ctrl.awaiting_gesture());
        assert_eq!(ctrl.handle.plays(), 2);
    }

    #[test]
    fn test_stale_readiness_does_not_leak_into_new_source() {
        let mut ctrl = eager_controller();
        ctrl.set_source(Some("/a.mp4".to_string()));
        let first = ctrl.current_source.unwrap();
        ctrl.set_source(Some("/b.mp4".to_string()));
        let second = ctrl.current_source.unwrap();
        assert_ne!(first, second);

        // The first source's frame arrives late: discarded, no fade-in.
        assert!(!ctrl.on_media_event(first, MediaEventKind::FirstFrame));
        assert!(!ctrl.is_ready());
        assert!(!ctrl.handle.calls.contains(&Call::Ready(true)));

        // The current source's frame is honored, exactly once.
        assert!(ctrl.on_media_event(second, MediaEventKind::FirstFrame));
        ctrl.on_media_event(second, MediaEventKind::FirstFrame);
        let fades = ctrl
            .handle
            .calls
            .iter()
            .filter(|c| **c == Call::Ready(true))
            .count();
        assert_eq!(fades, 1);
    }

    #[test]
    fn test_stale_play_result_releases_lock_without_state_change() {
        let mut ctrl = eager_controller();
        ctrl.set_source(Some("/a.mp4".to_string()));
        let first = ctrl.current_source.unwrap();
        ctrl.on_media_event(first, MediaEventKind::LoadedMetadata);

        ctrl.set_source(Some("/b.mp4".to_string()));
        ctrl.on_play_result(first, true);
        assert!(!ctrl.playing);
        assert!(!ctrl.started);
        assert!(!ctrl.attempt_lock);
    }

    #[test]
    fn test_rapid_visibility_toggles_settle_on_last_value() {
        let mut ctrl = eager_controller();
        ctrl.set_source(Some("/a.mp4".to_string()));
        let source = ctrl.current_source.unwrap();
        ctrl.on_media_event(source, MediaEventKind::LoadedMetadata);

        // Toggle while the attempt is still in flight, ending hidden.
        ctrl.on_visibility(false);
        ctrl.on_visibility(true);
        ctrl.on_visibility(false);
        ctrl.on_play_result(source, true);
        assert!(!ctrl.playing);
        assert_eq!(ctrl.handle.calls.last(), Some(&Call::Pause));

        // Same dance ending visible: the controller must be playing.
        ctrl.on_visibility(true);
        ctrl.on_play_result(ctrl.current_source.unwrap(), true);
        assert!(ctrl.playing);
    }

    #[test]
    fn test_pause_and_resume_on_boundary_crossings() {
        let mut ctrl = eager_controller();
        ctrl.set_source(Some("/a.mp4".to_string()));
        let source = ctrl.current_source.unwrap();
        ctrl.on_media_event(source, MediaEventKind::LoadedMetadata);
        ctrl.on_play_result(source, true);
        assert!(ctrl.playing);

        ctrl.on_visibility(false);
        assert!(!ctrl.playing);
        assert_eq!(ctrl.handle.calls.last(), Some(&Call::Pause));

        // Repeated identical reports are not boundary crossings.
        let pauses_before = ctrl.handle.calls.len();
        ctrl.on_visibility(false);
        assert_eq!(ctrl.handle.calls.len(), pauses_before);

        ctrl.on_visibility(true);
        assert_eq!(ctrl.handle.calls.last(), Some(&Call::Play(source)));
    }

    #[test]
    fn test_lazy_element_mounts_nothing_until_proximity() {
        let mut ctrl = VideoController::new(FakeHandle::default(), true, None);
        ctrl.set_source(Some("/far-below.mp4".to_string()));
        assert_eq!(ctrl.handle.mounts(), 0);
        assert_eq!(ctrl.phase, PlaybackPhase::Unmounted);

        ctrl.on_visibility(true);
        assert_eq!(ctrl.handle.mounts(), 1);
        assert_eq!(ctrl.phase, PlaybackPhase::Loading);
    }

    #[test]
    fn test_ensure_source_does_not_restart_identical_target() {
        let mut ctrl = eager_controller();
        ctrl.ensure_source("/ambient.mp4".to_string());
        ctrl.ensure_source("/ambient.mp4".to_string());
        assert_eq!(ctrl.handle.mounts(), 1);

        ctrl.ensure_source("/intro.mp4".to_string());
        assert_eq!(ctrl.handle.mounts(), 2);
    }

    #[test]
    fn test_teardown_hides_and_unmounts() {
        let mut ctrl = eager_controller();
        ctrl.set_source(Some("/a.mp4".to_string()));
        let source = ctrl.current_source.unwrap();
        ctrl.on_media_event(source, MediaEventKind::FirstFrame);
        assert!(ctrl.is_ready());

        ctrl.teardown();
        assert!(!ctrl.has_source());
        assert!(ctrl.handle.calls.contains(&Call::Ready(false)));
        assert_eq!(ctrl.handle.calls.last(), Some(&Call::Unmount));
    }
}
