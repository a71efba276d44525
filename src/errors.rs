use thiserror::Error;

use crate::bindings::PageErrorCode;

/// Problems arising while handling a UI-facing API call.
///
/// None of those unwind across the FFI boundary: they are reported to the
/// JavaScript-side through `jsSendPageError` and the `Dispatcher` keeps
/// running.
#[derive(Error, Debug)]
pub(crate) enum PageApiError {
    #[error("No section is configured under the key \"{key}\".")]
    UnknownSection { key: String },

    #[error("No video element is registered under id {id}.")]
    UnknownVideoElement { id: u32 },

    #[error("No video element is attached as the TV screen.")]
    TvScreenNotAttached,

    #[error("Channel \"{name}\" was declared video-backed without a source URL.")]
    ChannelWithoutSource { name: String },
}

impl PageApiError {
    /// The error code communicated to the JavaScript-side for this error.
    pub(crate) fn code(&self) -> PageErrorCode {
        match self {
            PageApiError::UnknownSection { .. } => PageErrorCode::UnknownSection,
            PageApiError::UnknownVideoElement { .. } => PageErrorCode::UnknownVideoElement,
            PageApiError::TvScreenNotAttached => PageErrorCode::TvScreenNotAttached,
            PageApiError::ChannelWithoutSource { .. } => PageErrorCode::ChannelWithoutSource,
        }
    }
}
