use crate::wasm_bindgen;
use std::fmt;

/// # js_functions
///
/// This file lists all JavaScript functions that are callable from Rust as well as
/// struct and enumeration used by those functions.

// Log the given text in the JavaScript console, with the log level given.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    pub fn jsLog(log_level: LogLevel, log: &str);
}

// On non-wasm targets (the test harness) there is no JavaScript console to
// forward to, so the imported binding is replaced by a no-op with the same
// signature. Leaves wasm behavior unchanged.
#[cfg(not(target_arch = "wasm32"))]
pub fn jsLog(_log_level: LogLevel, _log: &str) {}

#[wasm_bindgen]
extern "C" {
    // Schedule low-priority work for the next moment the page is idle.
    //
    // Once the browser decides that moment has come, and unless `jsCancelIdle` has
    // been called since with the `IdleCallbackId` returned by this function, the
    // `on_idle_fired` method of the `Dispatcher` will be called with the
    // corresponding `IdleCallbackId`.
    //
    // On platforms without `requestIdleCallback`, the JavaScript-side falls back
    // to a short timeout (around 400 milliseconds), which keeps the same contract.
    pub fn jsScheduleIdle() -> IdleCallbackId;

    // Cancel idle work scheduled with `jsScheduleIdle`.
    pub fn jsCancelIdle(id: IdleCallbackId);

    // Assign a source URL to the video element registered under `video_id`, after
    // first setting the given poster (when one is provided) so the browser can
    // paint something immediately, then call `load()` on it.
    //
    // The `source_id` given here will be repeated by the JavaScript-side in every
    // media event and play resolution it reports for that source, so the
    // `Dispatcher` can discard signals from a source that has been superseded
    // since.
    //
    // This is the only function through which a video element ever receives a
    // source URL: as long as it is not called for a given element, no network
    // request for its media can have been started.
    pub fn jsMountVideoSource(
        video_id: VideoElementId,
        source_id: SourceId,
        url: &str,
        poster: Option<&str>,
    );

    // Detach any source from the video element registered under `video_id`:
    // pause it, remove its `src` attribute and call `load()` so the element
    // releases its decoder and network resources.
    pub fn jsClearVideoSource(video_id: VideoElementId);

    // Set only the poster image of the video element registered under `video_id`.
    //
    // Used for lazy elements that are still unmounted: the poster is what the
    // visitor sees until the element comes close enough to the viewport for its
    // real source to be mounted.
    pub fn jsSetVideoPoster(video_id: VideoElementId, poster: &str);

    // Call `play()` on the video element registered under `video_id`.
    //
    // The returned promise is never awaited on the Rust side: its resolution or
    // rejection is reported asynchronously through the `on_play_result` method of
    // the `Dispatcher`, with the same `source_id`.
    //
    // Rejection is an expected outcome on autoplay-restricted platforms and is
    // communicated like any other result, not thrown.
    pub fn jsRequestPlay(video_id: VideoElementId, source_id: SourceId);

    // Call `pause()` on the video element registered under `video_id`.
    pub fn jsPauseVideo(video_id: VideoElementId);

    // Start watching the viewport proximity of the video element registered under
    // `video_id`, with the given margin in pixels around the viewport.
    //
    // Boundary crossings are reported through the `on_video_visibility` method of
    // the `Dispatcher`.
    pub fn jsObserveVideoVisibility(video_id: VideoElementId, margin: f64);

    // Stop watching the viewport proximity of the given video element and free
    // the underlying observer.
    pub fn jsUnobserveVideoVisibility(video_id: VideoElementId);

    // Start watching how much of the section element whose DOM id equals `key`
    // intersects the viewport band left between the top and bottom reservations
    // (the navigation bar and the dock areas).
    //
    // Ratio changes are reported through the `on_section_ratio` method of the
    // `Dispatcher`.
    pub fn jsObserveSection(key: &str);

    // Stop watching every section observed through `jsObserveSection` and free
    // the underlying observer.
    pub fn jsDisconnectSectionObserver();

    // Install the global input listeners (pointer, touch, keyboard) used to
    // detect the user gesture that unlocks autoplay-restricted playback.
    //
    // A single detected input is reported through the `on_global_gesture` method
    // of the `Dispatcher`.
    pub fn jsStartGestureWatch();

    // Remove the global input listeners installed by `jsStartGestureWatch`.
    pub fn jsStopGestureWatch();

    // Start forwarding animation frames to the `on_animation_frame` method of the
    // `Dispatcher`, one call per frame.
    //
    // Frames are only needed while some bounded per-frame work is pending (the
    // deferred scroll poll, the scroll-to-top request after a gate reset), so the
    // `Dispatcher` stops them again as soon as that work is done.
    pub fn jsStartFrameTicks();

    // Stop forwarding animation frames started with `jsStartFrameTicks`.
    pub fn jsStopFrameTicks();

    // Returns the rendered height in pixels of the fixed page header, when one
    // is currently in the document.
    pub fn jsMeasureHeaderHeight() -> Option<f64>;

    // Returns the top offset, relative to the whole document, of the section
    // element whose DOM id equals `key`, or `None` when no such element exists.
    pub fn jsSectionTop(key: &str) -> Option<f64>;

    // Returns `true` when an element with the given DOM id currently exists.
    pub fn jsElementExists(key: &str) -> bool;

    // Scroll the document so that its top reaches the `top` position, animated
    // through the smooth-scroll engine unless `instant` is set, in which case the
    // jump happens without animation.
    pub fn jsScrollTo(top: f64, instant: bool);

    // Returns `true` when the visitor asked the platform for reduced motion.
    pub fn jsPrefersReducedMotion() -> bool;

    // Ask the JavaScript-side to pre-warm its network cache for the given media
    // URL (a `<link rel="prefetch">` insertion).
    pub fn jsPrefetchMedia(url: &str);

    // Open the given URL outside of the page, as a fallback when a channel jump
    // targets a URL no configured channel serves.
    pub fn jsOpenExternal(url: &str);

    // Read the value stored under `key` for the current browsing session.
    pub fn jsStorageGet(key: &str) -> Option<String>;

    // Store `value` under `key` for the current browsing session.
    pub fn jsStorageSet(key: &str, value: &str);

    // Remove the value stored under `key` for the current browsing session.
    pub fn jsStorageRemove(key: &str);

    // Announces that the video element registered under `video_id` either became
    // ready to be faded in (first decoded frame available) or stopped being
    // ready (its source was reassigned or torn down).
    pub fn jsAnnounceMediaReady(video_id: VideoElementId, ready: bool);

    // Announces that the TV screen entered or left its buffering state, so the
    // UI can show or hide its loading overlay.
    pub fn jsAnnounceBuffering(is_buffering: bool);

    // Announces that the current channel changed.
    //
    // `switch_token` increases on every change and is only meant to retrigger
    // the one-shot switch-flash animation.
    pub fn jsAnnounceChannelChange(index: u32, switch_token: u32);

    // Announces that the most visible section changed.
    pub fn jsAnnounceActiveSection(key: &str);

    // Announces a new overall scroll progress ratio, between `0` and `1`.
    pub fn jsAnnounceScrollProgress(progress: f64);

    // Announces that the entry gate opened or closed.
    pub fn jsAnnounceGateStatus(is_open: bool);

    // Announces that a minor problem occured while handling an API call.
    pub fn jsSendPageError(code: PageErrorCode, message: Option<&str>);
}

/// Levels with which a log can be emitted.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd)]
pub enum LogLevel {
    /// Log level reserved for very important errors and highly unexpected events.
    Error = 0,

    /// Log level reserved for less important errors and unexpected events.
    Warn = 1,

    /// Log level reserved for important events
    Info = 2,

    /// Log level used when debugging. Small-ish yet impactful events should be logged with it.
    Debug = 3,
}

/// Categories of problems reported to the JavaScript-side through
/// `jsSendPageError`.
///
/// None of those are fatal: the `Dispatcher` keeps running after reporting one.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageErrorCode {
    /// An API call named a section key that is not configured.
    UnknownSection,

    /// An API call named a video element id that was never registered.
    UnknownVideoElement,

    /// A channel operation was performed while no video element was attached as
    /// the TV screen.
    TvScreenNotAttached,

    /// A channel was declared as video-backed without a source URL.
    ChannelWithoutSource,
}

/// Identify a video element registered on the JavaScript-side.
pub type VideoElementId = u32;

/// Identify one source assignment made on a video element.
///
/// Every media event and play resolution reported for that element repeats the
/// `SourceId` it was observed under, which is how signals from a superseded
/// source are recognized and discarded.
pub type SourceId = u32;

/// Identify pending idle work.
pub type IdleCallbackId = f64;

/// The nature of a channel in the TV playlist, as declared by the
/// JavaScript-side at startup.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    /// The channel plays a looping video.
    Video = 0,

    /// The channel shows the "no signal" placeholder.
    NoSignal = 1,

    /// The channel shows the "coming soon" placeholder.
    ComingSoon = 2,
}

impl fmt::Display for ChannelKind {
    /// When wanting to display the value, just format it the way the HUD names
    /// those channels.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ChannelKind::Video => "video",
                ChannelKind::NoSignal => "no signal",
                ChannelKind::ComingSoon => "coming soon",
            }
        )
    }
}
