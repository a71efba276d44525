use crate::bindings::ChannelKind;
use crate::dispatcher::MediaEventKind;
use crate::Logger;

/// What a channel feeds to the TV screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ChannelFeed {
    /// A looping video served from `source_url`.
    Video { source_url: String },

    /// The "no signal" placeholder.
    NoSignal,

    /// The "coming soon" placeholder.
    ComingSoon,
}

/// One entry of the fixed TV playlist, constructed once at startup and
/// immutable afterwards.
#[derive(Clone, Debug)]
pub(crate) struct Channel {
    /// Stable channel number shown by the HUD.
    id: u32,

    /// Name shown by the HUD next to the channel number.
    display_name: String,

    feed: ChannelFeed,
}

impl Channel {
    pub(crate) fn new(id: u32, display_name: String, feed: ChannelFeed) -> Self {
        Self {
            id,
            display_name,
            feed,
        }
    }

    pub(crate) fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn display_name(&self) -> &str {
        &self.display_name
    }

    pub(crate) fn kind(&self) -> ChannelKind {
        match self.feed {
            ChannelFeed::Video { .. } => ChannelKind::Video,
            ChannelFeed::NoSignal => ChannelKind::NoSignal,
            ChannelFeed::ComingSoon => ChannelKind::ComingSoon,
        }
    }

    /// The URL this channel plays, when it is video-backed.
    pub(crate) fn source_url(&self) -> Option<&str> {
        match &self.feed {
            ChannelFeed::Video { source_url } => Some(source_url),
            _ => None,
        }
    }
}

/// The ordered playlist the TV cycles through.
pub(crate) struct ChannelList {
    channels: Vec<Channel>,
}

impl ChannelList {
    pub(crate) fn new() -> Self {
        Self { channels: vec![] }
    }

    pub(crate) fn push(&mut self, channel: Channel) {
        self.channels.push(channel);
    }

    pub(crate) fn len(&self) -> usize {
        self.channels.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Index of the channel serving `url`, when one does.
    pub(crate) fn position_of_url(&self, url: &str) -> Option<usize> {
        self.channels
            .iter()
            .position(|c| c.source_url() == Some(url))
    }
}

/// Outcome of a `jump_to_url` request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum JumpOutcome {
    /// A channel serves that URL; the switcher moved to it.
    Switched(usize),

    /// No channel serves that URL; the caller should open it outside the TV.
    OpenExternally,
}

/// Owns which channel the TV is tuned to and whether its screen is currently
/// buffering.
pub(crate) struct ChannelSwitcher {
    /// Index into the channel list. Wraps modulo the list length on
    /// `next`/`prev`.
    current_index: usize,

    /// Bumped on every channel change. Only used to retrigger the one-shot
    /// switch-flash animation, never load-bearing.
    switch_token: u32,

    /// `true` between assigning a video source and its first playable frame
    /// (or its failure). Always `false` while tuned to a placeholder channel.
    is_buffering: bool,
}

impl ChannelSwitcher {
    pub(crate) fn new() -> Self {
        Self {
            current_index: 0,
            switch_token: 0,
            is_buffering: false,
        }
    }

    pub(crate) fn current_index(&self) -> usize {
        self.current_index
    }

    pub(crate) fn switch_token(&self) -> u32 {
        self.switch_token
    }

    pub(crate) fn is_buffering(&self) -> bool {
        self.is_buffering
    }

    /// Tune to the next channel, wrapping past the end of the list.
    pub(crate) fn next(&mut self, list: &ChannelList) -> usize {
        if !list.is_empty() {
            self.current_index = (self.current_index + 1) % list.len();
            self.switch_token = self.switch_token.wrapping_add(1);
        }
        self.current_index
    }

    /// Tune to the previous channel, wrapping past the start of the list.
    pub(crate) fn prev(&mut self, list: &ChannelList) -> usize {
        if !list.is_empty() {
            self.current_index = (self.current_index + list.len() - 1) % list.len();
            self.switch_token = self.switch_token.wrapping_add(1);
        }
        self.current_index
    }

    /// Tune to the channel serving `url`.
    ///
    /// When no channel serves it, the switcher stays where it is and the URL
    /// is left for the caller to open externally.
    pub(crate) fn jump_to_url(&mut self, list: &ChannelList, url: &str) -> JumpOutcome {
        match list.position_of_url(url) {
            Some(index) => {
                self.current_index = index;
                self.switch_token = self.switch_token.wrapping_add(1);
                JumpOutcome::Switched(index)
            }
            None => {
                Logger::info("Channels: no channel serves the requested URL, opening externally");
                JumpOutcome::OpenExternally
            }
        }
    }

    /// Record that the TV screen is being retargeted. Buffering starts only
    /// for video-backed channels.
    ///
    /// Returns `true` when the buffering flag changed.
    pub(crate) fn begin_switch(&mut self, is_video: bool) -> bool {
        let previous = self.is_buffering;
        self.is_buffering = is_video;
        previous != self.is_buffering
    }

    /// Fold a (non-stale) media event of the TV screen into the buffering
    /// flag. Returns `true` when the flag changed.
    pub(crate) fn on_media_event(&mut self, kind: MediaEventKind) -> bool {
        let previous = self.is_buffering;
        match kind {
            MediaEventKind::Waiting => self.is_buffering = true,
            MediaEventKind::CanPlay | MediaEventKind::Playing | MediaEventKind::FirstFrame => {
                self.is_buffering = false
            }
            // A dead source will never produce a frame; drop the overlay
            // rather than showing "loading" forever over it.
            MediaEventKind::Error => self.is_buffering = false,
            MediaEventKind::LoadedMetadata => {}
        }
        previous != self.is_buffering
    }
}
