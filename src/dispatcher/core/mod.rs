use crate::{
    bindings::{
        jsAnnounceActiveSection, jsAnnounceBuffering, jsAnnounceChannelChange,
        jsAnnounceGateStatus, jsAnnounceScrollProgress, jsCancelIdle, jsElementExists,
        jsMeasureHeaderHeight, jsPrefersReducedMotion, jsPrefetchMedia, jsScheduleIdle, jsScrollTo,
        jsSectionTop, jsSendPageError, jsStartFrameTicks, jsStartGestureWatch, jsStopFrameTicks,
        jsStopGestureWatch, IdleCallbackId, SourceId, VideoElementId,
    },
    errors::PageApiError,
    playback::{JsMediaHandle, VideoController, WatchDirective},
    sections::nav_offset,
    Logger,
};

use super::{Dispatcher, MediaEventKind};

impl Dispatcher {
    /// The controller of the video element registered under `video_id`.
    pub(super) fn controller_mut(
        &mut self,
        video_id: VideoElementId,
    ) -> Option<&mut VideoController<JsMediaHandle>> {
        self.videos
            .iter_mut()
            .find(|(id, _)| *id == video_id)
            .map(|(_, controller)| controller)
    }

    /// Log an API misuse and report it to the JavaScript-side. The
    /// `Dispatcher` keeps running afterwards.
    pub(super) fn report_api_error(error: &PageApiError) {
        let message = error.to_string();
        Logger::warn(&message);
        jsSendPageError(error.code(), Some(&message));
    }

    pub(super) fn handle_video_visibility(
        &mut self,
        video_id: VideoElementId,
        is_intersecting: bool,
    ) {
        let Some(controller) = self.controller_mut(video_id) else {
            Logger::warn("Core: visibility reported for an unregistered video element");
            return;
        };
        controller.on_visibility(is_intersecting);
    }

    pub(super) fn handle_media_event(
        &mut self,
        video_id: VideoElementId,
        source_id: SourceId,
        kind: MediaEventKind,
    ) {
        let is_tv_screen = self.tv_screen == Some(video_id);
        let Some(controller) = self.controller_mut(video_id) else {
            Logger::warn("Core: media event reported for an unregistered video element");
            return;
        };
        let fresh = controller.on_media_event(source_id, kind);
        // Only signals of the source actually tuned in may drive the TV's
        // buffering overlay.
        if fresh && is_tv_screen && self.switcher.on_media_event(kind) {
            jsAnnounceBuffering(self.switcher.is_buffering());
        }
    }

    pub(super) fn handle_play_result(
        &mut self,
        video_id: VideoElementId,
        source_id: SourceId,
        succeeded: bool,
    ) {
        let Some(controller) = self.controller_mut(video_id) else {
            Logger::warn("Core: play result reported for an unregistered video element");
            return;
        };
        controller.on_play_result(source_id, succeeded);
        self.sync_gesture_watch();
    }

    /// One user input unlocks every controller currently waiting for a
    /// gesture; each retries independently.
    pub(super) fn handle_gesture(&mut self) {
        for (_, controller) in self.videos.iter_mut() {
            controller.on_gesture();
        }
        self.sync_gesture_watch();
    }

    /// Keep the JavaScript-side gesture listeners installed exactly while
    /// some controller waits for an unlock.
    pub(super) fn sync_gesture_watch(&mut self) {
        let any_waiting = self.videos.iter().any(|(_, c)| c.awaiting_gesture());
        match self.gesture_watch.reconcile(any_waiting) {
            Some(WatchDirective::Install) => jsStartGestureWatch(),
            Some(WatchDirective::Remove) => jsStopGestureWatch(),
            None => {}
        }
    }

    /// Announce a channel change, retune the TV screen when the tuned index
    /// actually moved, and re-arm prefetching around the new position.
    pub(super) fn after_channel_change(&mut self, previous_index: usize) {
        let index = self.switcher.current_index();
        jsAnnounceChannelChange(index as u32, self.switcher.switch_token());
        if index != previous_index {
            self.retune_tv();
        }
        self.rearm_prefetch();
    }

    /// Point the TV screen's controller at the current channel's feed:
    /// video-backed channels get their source, placeholders tear the screen's
    /// source down.
    pub(super) fn retune_tv(&mut self) {
        let source = match self.channels.get(self.switcher.current_index()) {
            Some(channel) => channel.source_url().map(str::to_string),
            None => return,
        };
        let is_video = source.is_some();
        let Some(tv_id) = self.tv_screen else {
            Logger::debug("Core: channel changed with no TV screen attached");
            return;
        };
        if let Some(controller) = self.controller_mut(tv_id) {
            controller.set_source(source);
        }
        if self.switcher.begin_switch(is_video) {
            jsAnnounceBuffering(self.switcher.is_buffering());
        }
        self.sync_gesture_watch();
    }

    /// Supersede any pending idle prefetch work and schedule new work for the
    /// current channel neighborhood.
    pub(super) fn rearm_prefetch(&mut self) {
        if self.channels.is_empty() {
            return;
        }
        if let Some(stale) = self.prefetch.take_pending() {
            jsCancelIdle(stale);
        }
        let id = jsScheduleIdle();
        self.prefetch.arm(id);
    }

    pub(super) fn handle_idle(&mut self, id: IdleCallbackId) {
        let urls = self
            .prefetch
            .harvest(id, &self.channels, self.switcher.current_index());
        for url in urls {
            Logger::lazy_debug(&|| format!("Core: pre-warming cache for \"{url}\""));
            jsPrefetchMedia(&url);
        }
    }

    pub(super) fn handle_frame(&mut self) {
        if self.scroll_top_queued {
            self.scroll_top_queued = false;
            jsScrollTo(0., true);
        }
        if let Some(key) = self
            .deferred_scroll
            .on_frame(jsElementExists, &mut self.store)
        {
            self.perform_section_scroll(&key);
        }
        self.update_frame_ticks();
    }

    pub(super) fn handle_section_ratio(&mut self, key: &str, ratio: f64, is_intersecting: bool) {
        let effective_ratio = if is_intersecting { ratio } else { 0. };
        if self.tracker.apply(key, effective_ratio) {
            if let Some(active) = self.tracker.active_key() {
                jsAnnounceActiveSection(active);
            }
        }
    }

    pub(super) fn handle_engine_scroll(
        &mut self,
        offset: f64,
        limit: f64,
        explicit_progress: Option<f64>,
    ) {
        if self.progress.on_engine_scroll(offset, limit, explicit_progress) {
            jsAnnounceScrollProgress(self.progress.progress());
        }
    }

    pub(super) fn handle_native_scroll(
        &mut self,
        scroll_top: f64,
        scroll_height: f64,
        client_height: f64,
    ) {
        if self
            .progress
            .on_native_scroll(scroll_top, scroll_height, client_height)
        {
            jsAnnounceScrollProgress(self.progress.progress());
        }
    }

    pub(super) fn handle_page_shown(&mut self, is_home: bool) {
        self.is_home = is_home;
        self.refresh_background();
        if is_home && self.gate.is_open() {
            self.deferred_scroll.begin(&self.store);
        } else {
            // Leaving home abandons the poll but keeps the session flag, so a
            // later visit can still consume the request.
            self.deferred_scroll.cancel();
        }
        self.update_frame_ticks();
    }

    pub(super) fn handle_gate_open(&mut self) {
        if !self.gate.open(&mut self.store) {
            return;
        }
        Logger::info("Core: entry gate opened");
        jsAnnounceGateStatus(true);
        self.refresh_background();
        if self.is_home {
            self.deferred_scroll.begin(&self.store);
        }
        self.update_frame_ticks();
    }

    pub(super) fn handle_gate_reset(&mut self) {
        self.gate.reset(&mut self.store);
        self.deferred_scroll.cancel();
        Logger::info("Core: entry gate reset");
        jsAnnounceGateStatus(false);
        self.refresh_background();
        self.scroll_top_queued = true;
        self.update_frame_ticks();
    }

    /// Swap the background layer onto whichever loop the current route and
    /// gate state call for. Reassigning the same URL is a no-op so route
    /// changes do not restart the loop.
    pub(super) fn refresh_background(&mut self) {
        let Some(cfg) = self.background.as_ref() else {
            return;
        };
        let url = self
            .gate
            .background_source(self.is_home, &cfg.intro_url, &cfg.ambient_url)
            .to_string();
        let video_id = cfg.video_id;
        if let Some(controller) = self.controller_mut(video_id) {
            controller.ensure_source(url);
        }
    }

    /// Scroll so the element with the given key sits right below the
    /// navigation bar, instantaneously when the visitor asked for reduced
    /// motion.
    pub(super) fn perform_section_scroll(&self, key: &str) {
        let Some(top) = jsSectionTop(key) else {
            Logger::debug("Core: scroll target is not in the document, ignoring");
            return;
        };
        let offset = nav_offset(jsMeasureHeaderHeight());
        jsScrollTo(top - offset, jsPrefersReducedMotion());
    }

    /// Keep animation frames flowing exactly while some per-frame work is
    /// pending.
    pub(super) fn update_frame_ticks(&mut self) {
        let wanted = self.scroll_top_queued || self.deferred_scroll.is_active();
        if wanted && !self.frame_ticks {
            self.frame_ticks = true;
            jsStartFrameTicks();
        } else if !wanted && self.frame_ticks {
            self.frame_ticks = false;
            jsStopFrameTicks();
        }
    }
}
