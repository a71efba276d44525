use crate::{
    bindings::{
        jsObserveSection, jsObserveVideoVisibility, jsOpenExternal, jsSetVideoPoster,
        jsUnobserveVideoVisibility, ChannelKind, VideoElementId,
    },
    channels::{Channel, ChannelFeed, ChannelList, ChannelSwitcher, JumpOutcome},
    errors::PageApiError,
    gate::Gate,
    playback::{GestureWatch, JsMediaHandle, VideoController},
    prefetch::PrefetchScheduler,
    scroll::ScrollProgressReporter,
    sections::{deferred::DeferredScroll, Section, SectionTracker},
    utils::session_store::{JsSessionStore, SessionStore},
    wasm_bindgen, Logger,
};

use super::{BackgroundConfig, Dispatcher, JumpResult};

/// Methods exposed to the JavaScript-side.
///
/// Note that these are not the only methods callable by JavaScript. There's
/// also "event_listeners" which as its name point at, should be called when
/// particular events happen. Such "event_listeners" are defined in their own
/// file.
#[wasm_bindgen]
impl Dispatcher {
    /// Create a new `Dispatcher` for the page, restoring the session-scoped
    /// gate state left by an earlier page shell of the same session.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let store = JsSessionStore;
        let gate = Gate::restored(&store);
        Dispatcher {
            videos: vec![],
            next_video_id: 0,
            gesture_watch: GestureWatch::new(),
            channels: ChannelList::new(),
            switcher: ChannelSwitcher::new(),
            tv_screen: None,
            prefetch: PrefetchScheduler::new(),
            tracker: SectionTracker::new(),
            staged_sections: vec![],
            deferred_scroll: DeferredScroll::new(),
            progress: ScrollProgressReporter::new(),
            gate,
            store,
            is_home: true,
            frame_ticks: false,
            scroll_top_queued: false,
            background: None,
        }
    }

    /// Register a page video element and start watching its viewport
    /// proximity.
    ///
    /// The returned id is how the JavaScript-side and this `Dispatcher` refer
    /// to the element from now on: the glue binds it to the actual
    /// HTMLVideoElement and repeats it in every event it forwards.
    ///
    /// With `lazy` set, the element receives no source (and thus starts no
    /// network request) until it first comes within `proximity_margin` pixels
    /// of the viewport; `poster` is what it shows until then.
    pub fn register_video(
        &mut self,
        lazy: bool,
        proximity_margin: f64,
        poster: Option<String>,
    ) -> VideoElementId {
        self.next_video_id += 1;
        let video_id = self.next_video_id;
        if let Some(poster) = poster.as_deref() {
            jsSetVideoPoster(video_id, poster);
        }
        let controller = VideoController::new(JsMediaHandle::new(video_id), lazy, poster);
        self.videos.push((video_id, controller));
        jsObserveVideoVisibility(video_id, proximity_margin);
        Logger::debug("API: video element registered");
        video_id
    }

    /// Assign a source to a registered video element, or tear its source down
    /// with `None`.
    pub fn set_video_source(&mut self, video_id: VideoElementId, url: Option<String>) {
        let Some(controller) = self.controller_mut(video_id) else {
            Dispatcher::report_api_error(&PageApiError::UnknownVideoElement { id: video_id });
            return;
        };
        controller.set_source(url);
        self.sync_gesture_watch();
    }

    /// Unregister a video element, tearing down its source, its observer and
    /// anything else tied to it.
    pub fn remove_video(&mut self, video_id: VideoElementId) {
        let Some(position) = self.videos.iter().position(|(id, _)| *id == video_id) else {
            Dispatcher::report_api_error(&PageApiError::UnknownVideoElement { id: video_id });
            return;
        };
        let (_, mut controller) = self.videos.remove(position);
        controller.teardown();
        jsUnobserveVideoVisibility(video_id);
        if self.tv_screen == Some(video_id) {
            self.tv_screen = None;
        }
        if self
            .background
            .as_ref()
            .is_some_and(|cfg| cfg.video_id == video_id)
        {
            self.background = None;
        }
        self.sync_gesture_watch();
    }

    /// Declare a registered video element as the page background layer,
    /// giving the two looping sources it swaps between: `intro_url` behind
    /// the entry screen, `ambient_url` behind the regular pages.
    pub fn configure_background(
        &mut self,
        video_id: VideoElementId,
        intro_url: String,
        ambient_url: String,
    ) {
        if self.controller_mut(video_id).is_none() {
            Dispatcher::report_api_error(&PageApiError::UnknownVideoElement { id: video_id });
            return;
        }
        self.background = Some(BackgroundConfig {
            video_id,
            intro_url,
            ambient_url,
        });
        self.refresh_background();
    }

    /// Declare one channel of the TV playlist. Channels are declared once at
    /// startup, in playlist order.
    pub fn add_channel(
        &mut self,
        kind: ChannelKind,
        id: u32,
        display_name: String,
        source_url: Option<String>,
    ) {
        let feed = match (kind, source_url) {
            (ChannelKind::Video, Some(source_url)) => ChannelFeed::Video { source_url },
            (ChannelKind::Video, None) => {
                Dispatcher::report_api_error(&PageApiError::ChannelWithoutSource {
                    name: display_name,
                });
                return;
            }
            (ChannelKind::NoSignal, _) => ChannelFeed::NoSignal,
            (ChannelKind::ComingSoon, _) => ChannelFeed::ComingSoon,
        };
        self.channels.push(Channel::new(id, display_name, feed));
    }

    /// Attach a registered video element as the TV screen and tune it to the
    /// current channel.
    pub fn attach_tv_screen(&mut self, video_id: VideoElementId) {
        if self.controller_mut(video_id).is_none() {
            Dispatcher::report_api_error(&PageApiError::UnknownVideoElement { id: video_id });
            return;
        }
        self.tv_screen = Some(video_id);
        if !self.channels.is_empty() {
            self.retune_tv();
            self.rearm_prefetch();
        }
    }

    /// Tune the TV to the next channel, wrapping past the end of the
    /// playlist.
    pub fn next_channel(&mut self) {
        if self.channels.is_empty() {
            Logger::warn("API: channel change requested on an empty playlist");
            return;
        }
        let previous = self.switcher.current_index();
        self.switcher.next(&self.channels);
        self.after_channel_change(previous);
    }

    /// Tune the TV to the previous channel, wrapping past the start of the
    /// playlist.
    pub fn prev_channel(&mut self) {
        if self.channels.is_empty() {
            Logger::warn("API: channel change requested on an empty playlist");
            return;
        }
        let previous = self.switcher.current_index();
        self.switcher.prev(&self.channels);
        self.after_channel_change(previous);
    }

    /// Tune the TV to the channel serving `url`.
    ///
    /// When no configured channel serves it, the URL is opened outside the TV
    /// instead and the current channel stays tuned.
    pub fn jump_to_channel_url(&mut self, url: &str) -> JumpResult {
        let previous = self.switcher.current_index();
        match self.switcher.jump_to_url(&self.channels, url) {
            JumpOutcome::Switched(_) => {
                self.after_channel_change(previous);
                JumpResult::SwitchedChannel
            }
            JumpOutcome::OpenExternally => {
                jsOpenExternal(url);
                JumpResult::OpenedExternally
            }
        }
    }

    /// Declare one home page section. Sections are declared in page order,
    /// followed by one `start_section_tracking` call.
    pub fn declare_section(&mut self, key: String, title: String, subtitle: String) {
        self.staged_sections.push(Section::new(key, title, subtitle));
    }

    /// (Re)start section tracking over the sections declared since the last
    /// start.
    ///
    /// The previously active section carries over when it is still declared;
    /// otherwise tracking restarts from the first section.
    pub fn start_section_tracking(&mut self) {
        let sections = std::mem::take(&mut self.staged_sections);
        if sections.is_empty() {
            Logger::warn("API: section tracking started without any declared section");
            return;
        }
        self.restart_section_observation(sections);
    }

    /// Scroll the page so the given section sits below the navigation bar.
    pub fn scroll_to_section(&mut self, key: &str) {
        if !self.tracker.contains(key) {
            Dispatcher::report_api_error(&PageApiError::UnknownSection {
                key: key.to_string(),
            });
            return;
        }
        self.perform_section_scroll(key);
    }

    /// Move one section backward or forward from the active one (keyboard
    /// navigation on the focused dock), clamped at both ends, and scroll to
    /// it.
    pub fn step_section(&mut self, forward: bool) {
        let Some(key) = self.tracker.step(forward).map(str::to_string) else {
            return;
        };
        self.perform_section_scroll(&key);
    }

    /// Remember that the next time the home page (and its gate) is ready, the
    /// page should scroll to the given section. Used by navigation actions
    /// taken on other pages.
    pub fn queue_scroll_to(&mut self, key: &str) {
        self.store
            .set(crate::sections::deferred::PENDING_SCROLL_KEY, key);
    }

    /// Open the entry gate and persist that for the browsing session.
    pub fn open_gate(&mut self) {
        Dispatcher::handle_gate_open(self);
    }

    /// Close the entry gate again, clearing the session flags and returning
    /// the page to the top.
    pub fn reset_gate(&mut self) {
        Dispatcher::handle_gate_reset(self);
    }

    pub fn is_gate_open(&self) -> bool {
        self.gate.is_open()
    }

    /// Tear down everything this `Dispatcher` put in place on the
    /// JavaScript-side: observers, listeners, frame forwarding and pending
    /// idle work. To call when the page shell unmounts.
    pub fn dispose(&mut self) {
        Logger::info("API: disposing");
        for (video_id, controller) in self.videos.iter_mut() {
            controller.teardown();
            jsUnobserveVideoVisibility(*video_id);
        }
        self.videos.clear();
        self.tv_screen = None;
        self.background = None;
        if !self.tracker.is_empty() {
            crate::bindings::jsDisconnectSectionObserver();
        }
        self.tracker = SectionTracker::new();
        if let Some(stale) = self.prefetch.take_pending() {
            crate::bindings::jsCancelIdle(stale);
        }
        self.deferred_scroll.cancel();
        self.scroll_top_queued = false;
        self.update_frame_ticks();
        self.sync_gesture_watch();
    }

    /// Key of the currently most visible section.
    pub fn active_section(&self) -> Option<String> {
        self.tracker.active_key().map(str::to_string)
    }

    /// Overall document scroll progress, between `0` and `1`.
    pub fn scroll_progress(&self) -> f64 {
        self.progress.progress()
    }

    /// Index of the channel the TV is currently tuned to.
    pub fn current_channel_index(&self) -> u32 {
        self.switcher.current_index() as u32
    }

    /// Counter bumped on every channel change, retriggering the one-shot
    /// switch-flash animation.
    pub fn switch_token(&self) -> u32 {
        self.switcher.switch_token()
    }

    /// Whether the TV screen is waiting for its current source to become
    /// playable.
    pub fn is_buffering(&self) -> bool {
        self.switcher.is_buffering()
    }
}

impl Dispatcher {
    /// (Re)configure the tracker and the JavaScript-side section observer for
    /// the given sections.
    fn restart_section_observation(&mut self, sections: Vec<Section>) {
        if !self.tracker.is_empty() {
            crate::bindings::jsDisconnectSectionObserver();
        }
        self.tracker.configure(sections);
        for key in self.tracker.section_keys() {
            jsObserveSection(key);
        }
        if let Some(key) = self.tracker.active_key() {
            crate::bindings::jsAnnounceActiveSection(key);
        }
    }
}
