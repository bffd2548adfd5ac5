use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use voltbill_dom::{Document, Scheduler};
use voltbill_settings::{LanguageCode, TextCatalog};
use voltbill_widgets::{show_toast, NoticeHandle, WidgetTask};

/// What gets shared: the page title, a blurb and the page address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl ShareRequest {
    /// Localized share sheet text for the bill at `url`.
    pub fn for_bill(catalog: &TextCatalog, language: LanguageCode, url: &str) -> Self {
        let text = |key: &str| catalog.text(language, key).unwrap_or(key).to_string();
        Self {
            title: text("share.title"),
            text: text("share.text"),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareFailure {
    #[error("not supported on this platform")]
    Unavailable,
    #[error("{0}")]
    Failed(String),
}

/// 平台提供的分享能力。 / Sharing facilities the host platform may offer.
pub trait ShareCapabilities {
    fn native_share(&mut self, request: &ShareRequest) -> Result<(), ShareFailure>;
    fn clipboard_write(&mut self, text: &str) -> Result<(), ShareFailure>;
}

/// A platform with neither native share nor clipboard access.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShare;

impl ShareCapabilities for NoShare {
    fn native_share(&mut self, _request: &ShareRequest) -> Result<(), ShareFailure> {
        Err(ShareFailure::Unavailable)
    }

    fn clipboard_write(&mut self, _text: &str) -> Result<(), ShareFailure> {
        Err(ShareFailure::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The link went to the clipboard and a confirmation toast is showing.
    Copied(NoticeHandle),
    /// Nothing could share the link; a toast names the feature instead.
    Notice(NoticeHandle),
}

/// 分享頁面：原生分享，失敗則複製連結，再不行就顯示提示。 / Native share, then clipboard, then a notice.
///
/// Each step is tried once.
pub fn share<C: ShareCapabilities + ?Sized>(
    doc: &mut Document,
    scheduler: &mut Scheduler<WidgetTask>,
    capabilities: &mut C,
    catalog: &TextCatalog,
    language: LanguageCode,
    url: &str,
    toast_duration: Duration,
) -> ShareOutcome {
    let request = ShareRequest::for_bill(catalog, language, url);
    match capabilities.native_share(&request) {
        Ok(()) => return ShareOutcome::Shared,
        Err(ShareFailure::Unavailable) => {}
        Err(err) => warn!(error = %err, "native share failed, falling back"),
    }

    let toast = |doc: &mut Document, scheduler: &mut Scheduler<WidgetTask>, key: &str| {
        let message = catalog.text(language, key).unwrap_or(key).to_string();
        show_toast(doc, scheduler, &message, toast_duration)
    };
    match capabilities.clipboard_write(url) {
        Ok(()) => ShareOutcome::Copied(toast(doc, scheduler, "share.copied")),
        Err(err) => {
            debug!(error = %err, "clipboard unavailable");
            ShareOutcome::Notice(toast(doc, scheduler, "share.unavailable"))
        }
    }
}
