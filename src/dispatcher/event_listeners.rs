use crate::{
    bindings::{IdleCallbackId, SourceId, VideoElementId},
    wasm_bindgen,
};

use super::Dispatcher;

/// Methods triggered on JavaScript events by the JavaScript code
///
/// Those functions are voluntarly written a certain way to put in evidence
/// that those should just be bindings converting to the right types without
/// directly interacting with the `Dispatcher`'s state (e.g. methods are
/// called with an explicit `Dispatcher` reference).
#[wasm_bindgen]
impl Dispatcher {
    /// Called by the JavaScript code each time the visibility observer of a
    /// registered video element reports a proximity boundary crossing.
    ///
    /// # Arguments
    ///
    /// * `video_id` - The identifier returned when the video element was
    ///   registered.
    ///
    /// * `is_intersecting` - Whether the element is now within its proximity
    ///   margin.
    pub fn on_video_visibility(&mut self, video_id: VideoElementId, is_intersecting: bool) {
        Dispatcher::handle_video_visibility(self, video_id, is_intersecting);
    }

    /// Called by the JavaScript code each time a media event is observed on a
    /// registered video element.
    ///
    /// # Arguments
    ///
    /// * `video_id` - The identifier returned when the video element was
    ///   registered.
    ///
    /// * `source_id` - The identifier the source was mounted under, repeated
    ///   here so events from a superseded source can be recognized.
    ///
    /// * `kind` - Which media event was observed.
    pub fn on_media_event(
        &mut self,
        video_id: VideoElementId,
        source_id: SourceId,
        kind: MediaEventKind,
    ) {
        Dispatcher::handle_media_event(self, video_id, source_id, kind);
    }

    /// Called by the JavaScript code when a play attempt started through
    /// `jsRequestPlay` resolved.
    ///
    /// # Arguments
    ///
    /// * `video_id` - The identifier returned when the video element was
    ///   registered.
    ///
    /// * `source_id` - The identifier given to `jsRequestPlay`.
    ///
    /// * `succeeded` - `false` when the platform rejected the attempt, which
    ///   is expected behavior before the first user gesture.
    pub fn on_play_result(
        &mut self,
        video_id: VideoElementId,
        source_id: SourceId,
        succeeded: bool,
    ) {
        Dispatcher::handle_play_result(self, video_id, source_id, succeeded);
    }

    /// Called by the JavaScript code when a user input was observed while the
    /// gesture watch installed through `jsStartGestureWatch` was active.
    pub fn on_global_gesture(&mut self) {
        Dispatcher::handle_gesture(self);
    }

    /// Called by the JavaScript code when idle work scheduled through
    /// `jsScheduleIdle` fired.
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier returned by `jsScheduleIdle`, so superseded
    ///   idle work can be recognized and ignored.
    pub fn on_idle_fired(&mut self, id: IdleCallbackId) {
        Dispatcher::handle_idle(self, id);
    }

    /// Called by the JavaScript code once per animation frame, while frame
    /// forwarding was enabled through `jsStartFrameTicks`.
    pub fn on_animation_frame(&mut self) {
        Dispatcher::handle_frame(self);
    }

    /// Called by the JavaScript code each time the section observer reports a
    /// new intersection ratio for an observed section.
    ///
    /// # Arguments
    ///
    /// * `key` - The DOM id of the observed section.
    ///
    /// * `ratio` - Its intersection ratio with the observed viewport band.
    ///
    /// * `is_intersecting` - `false` when the section left the band entirely,
    ///   whatever ratio was reported with it.
    pub fn on_section_ratio(&mut self, key: &str, ratio: f64, is_intersecting: bool) {
        Dispatcher::handle_section_ratio(self, key, ratio, is_intersecting);
    }

    /// Called by the JavaScript code on each scroll event of the smooth-scroll
    /// engine.
    ///
    /// # Arguments
    ///
    /// * `offset` - The engine's reported scroll offset.
    ///
    /// * `limit` - The engine's reported maximum scroll offset.
    ///
    /// * `progress` - The engine's own progress value, when it carries one.
    pub fn on_engine_scroll(&mut self, offset: f64, limit: f64, progress: Option<f64>) {
        Dispatcher::handle_engine_scroll(self, offset, limit, progress);
    }

    /// Called by the JavaScript code on native scroll events when no
    /// smooth-scroll engine drives the page.
    pub fn on_native_scroll(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) {
        Dispatcher::handle_native_scroll(self, scroll_top, scroll_height, client_height);
    }

    /// Called by the JavaScript code when the viewport was resized, with the
    /// same metrics as `on_native_scroll` (a resize changes the scroll limit
    /// without any scroll event).
    pub fn on_viewport_resize(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) {
        Dispatcher::handle_native_scroll(self, scroll_top, scroll_height, client_height);
    }

    /// Called by the JavaScript code when a route was shown.
    ///
    /// # Arguments
    ///
    /// * `is_home` - Whether the shown route is the home page (the only one
    ///   carrying sections and the gate).
    pub fn on_page_shown(&mut self, is_home: bool) {
        Dispatcher::handle_page_shown(self, is_home);
    }

    /// Called by the JavaScript code when some UI element broadcast the
    /// page-wide "reset the entry gate" signal.
    pub fn on_gate_reset_request(&mut self) {
        Dispatcher::handle_gate_reset(self);
    }
}

/// Media events the JavaScript glue observes on video elements and forwards
/// into the `Dispatcher`.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaEventKind {
    /// The element learned the dimensions and duration of its source
    /// (`loadedmetadata`).
    LoadedMetadata = 0,

    /// The element decoded the first frame of its source (`loadeddata`),
    /// enough for the fade-in.
    FirstFrame = 1,

    /// The element believes it can play through (`canplay`).
    CanPlay = 2,

    /// The element stalled waiting for data (`waiting`).
    Waiting = 3,

    /// The element started or resumed rendering playback (`playing`).
    Playing = 4,

    /// The element failed to fetch or decode its source (`error`).
    Error = 5,
}
