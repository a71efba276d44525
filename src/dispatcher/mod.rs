use crate::{
    bindings::VideoElementId,
    channels::{ChannelList, ChannelSwitcher},
    gate::Gate,
    playback::{GestureWatch, JsMediaHandle, VideoController},
    prefetch::PrefetchScheduler,
    scroll::ScrollProgressReporter,
    sections::{deferred::DeferredScroll, Section, SectionTracker},
    utils::session_store::JsSessionStore,
    wasm_bindgen,
};

mod api;
mod core;
mod event_listeners;

pub use event_listeners::MediaEventKind;

/// The `Dispatcher` is the page core exported to the JavaScript-side: it owns
/// every video element lifecycle, the TV channel switcher, the section
/// activity tracker, the scroll progress and the session-scoped gate state,
/// and reacts to the browser events the JavaScript glue forwards in.
#[wasm_bindgen]
pub struct Dispatcher {
    /// One `VideoController` per registered page video element, keyed by the
    /// id handed out at registration.
    videos: Vec<(VideoElementId, VideoController<JsMediaHandle>)>,

    /// Next value handed out as a `VideoElementId`.
    next_video_id: VideoElementId,

    /// Keeps the global gesture listeners installed exactly while some
    /// controller waits for an autoplay unlock.
    gesture_watch: GestureWatch,

    /// The fixed TV playlist, declared once at startup.
    channels: ChannelList,

    /// Which channel the TV is tuned to.
    switcher: ChannelSwitcher,

    /// The registered video element acting as the TV screen, once attached.
    tv_screen: Option<VideoElementId>,

    /// Idle-time pre-warming of the channels around the current one.
    prefetch: PrefetchScheduler,

    /// Which home page section is the most visible one.
    tracker: SectionTracker,

    /// Sections declared since the last (re)start of section tracking.
    staged_sections: Vec<Section>,

    /// Cross-page "scroll to section X once home" consumption.
    deferred_scroll: DeferredScroll,

    /// Overall document scroll progress.
    progress: ScrollProgressReporter,

    /// The entry gate, restored from the session flags at construction.
    gate: Gate,

    /// Session-scoped flags behind the gate and the deferred scroll.
    store: JsSessionStore,

    /// Whether the home route is the one currently shown.
    is_home: bool,

    /// Whether the JavaScript-side currently forwards animation frames.
    frame_ticks: bool,

    /// An instantaneous scroll to the document top was requested for the next
    /// animation frame (gate reset).
    scroll_top_queued: bool,

    /// The background video layer and its two looping sources, once
    /// configured.
    background: Option<BackgroundConfig>,
}

/// The background video layer swaps between two looping sources depending on
/// route and gate state.
struct BackgroundConfig {
    video_id: VideoElementId,

    /// Loop shown behind the entry screen.
    intro_url: String,

    /// Loop shown behind the regular pages.
    ambient_url: String,
}

/// Result of asking the TV to tune to a channel by URL.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpResult {
    /// A configured channel serves that URL and the TV switched to it.
    SwitchedChannel = 0,

    /// No configured channel serves that URL; it was opened outside the TV
    /// instead and the current channel is untouched.
    OpenedExternally = 1,
}
