use std::fmt;

use tracing::debug;
use voltbill_dom::{Document, NodeId};
use voltbill_settings::{LanguageCode, TextCatalog};

use crate::notice::{element_with, localized, NoticeHandle, NoticeKind};

/// Where the user clicked inside an open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogTarget {
    Confirm,
    Cancel,
    Backdrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Resolved(bool),
    AlreadyResolved,
}

type Continuation = Box<dyn FnOnce(bool)>;

/// 確認對話框；續行函式至多呼叫一次。 / Confirm dialog whose continuation runs at most once.
pub struct ConfirmDialog {
    overlay: NodeId,
    continuation: Option<Continuation>,
}

impl fmt::Debug for ConfirmDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmDialog")
            .field("overlay", &self.overlay)
            .field("resolved", &self.continuation.is_none())
            .finish()
    }
}

impl ConfirmDialog {
    pub fn open<F>(
        doc: &mut Document,
        language: LanguageCode,
        catalog: &TextCatalog,
        message: &str,
        continuation: F,
    ) -> Self
    where
        F: FnOnce(bool) + 'static,
    {
        let overlay = element_with(doc, "div", "confirm-dialog-overlay", None);
        let dialog = element_with(doc, "div", "confirm-dialog", None);
        let content = element_with(doc, "div", "confirm-dialog-content", None);
        let title = localized(catalog, language, "confirm.title");
        let heading = element_with(doc, "h3", "confirm-dialog-title", Some(&title));
        let body = element_with(doc, "p", "confirm-dialog-message", Some(message));
        let actions = element_with(doc, "div", "confirm-dialog-actions", None);
        let cancel_label = localized(catalog, language, "confirm.cancel");
        let cancel = element_with(doc, "button", "btn btn-secondary confirm-cancel", Some(&cancel_label));
        let ok_label = localized(catalog, language, "confirm.ok");
        let ok = element_with(doc, "button", "btn btn-primary confirm-ok", Some(&ok_label));

        doc.append_child(actions, cancel);
        doc.append_child(actions, ok);
        doc.append_child(content, heading);
        doc.append_child(content, body);
        doc.append_child(content, actions);
        doc.append_child(dialog, content);
        doc.append_child(overlay, dialog);

        doc.set_style_text(
            overlay,
            "position: fixed; top: 0; left: 0; right: 0; bottom: 0; \
             background: rgba(0, 0, 0, 0.5); display: flex; align-items: center; \
             justify-content: center; z-index: 1001;",
        );
        doc.set_style_text(
            dialog,
            "background: var(--background); border-radius: var(--radius); \
             padding: var(--space-6); max-width: 400px; width: 90%; \
             box-shadow: var(--shadow-elevated);",
        );
        doc.set_style_text(
            actions,
            "display: flex; gap: var(--space-3); justify-content: flex-end; \
             margin-top: var(--space-5);",
        );

        let page = doc.body();
        doc.append_child(page, overlay);

        Self {
            overlay,
            continuation: Some(Box::new(continuation)),
        }
    }

    pub fn handle(&self) -> NoticeHandle {
        NoticeHandle {
            node: self.overlay,
            kind: NoticeKind::Dialog,
        }
    }

    pub fn is_open(&self) -> bool {
        self.continuation.is_some()
    }

    /// 處理點擊：移除遮罩並回報結果。 / Removes the overlay and resolves; later clicks are ignored.
    pub fn click(&mut self, doc: &mut Document, target: DialogTarget) -> DialogOutcome {
        let Some(continuation) = self.continuation.take() else {
            return DialogOutcome::AlreadyResolved;
        };
        // An overlay already dismissed elsewhere can only resolve as cancelled.
        let shown = doc.remove(self.overlay);
        let accepted = shown && target == DialogTarget::Confirm;
        debug!(?target, accepted, "confirm dialog resolved");
        continuation(accepted);
        DialogOutcome::Resolved(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::Dismissal;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn open(doc: &mut Document, language: LanguageCode) -> (ConfirmDialog, Rc<RefCell<Vec<bool>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let dialog = ConfirmDialog::open(
            doc,
            language,
            &TextCatalog::chrome(),
            "Delete this meter?",
            move |accepted| sink.borrow_mut().push(accepted),
        );
        (dialog, calls)
    }

    #[test]
    fn labels_follow_language() {
        let mut doc = Document::new();
        let (dialog, _) = open(&mut doc, LanguageCode::Zh);
        let title = doc.first_by_class("confirm-dialog-title").unwrap();
        assert_eq!(doc.text_content(title), "确认操作");
        let ok = doc.first_by_class("confirm-ok").unwrap();
        assert_eq!(doc.text_content(ok), "确认");
        assert!(dialog.is_open());
    }

    #[test]
    fn continuation_runs_exactly_once() {
        let mut doc = Document::new();
        let (mut dialog, calls) = open(&mut doc, LanguageCode::En);
        assert_eq!(dialog.click(&mut doc, DialogTarget::Confirm), DialogOutcome::Resolved(true));
        assert_eq!(dialog.click(&mut doc, DialogTarget::Backdrop), DialogOutcome::AlreadyResolved);
        assert_eq!(*calls.borrow(), vec![true]);
        assert!(doc.query_class("confirm-dialog-overlay").is_empty());
    }

    #[test]
    fn dismissed_dialog_cannot_be_confirmed() {
        let mut doc = Document::new();
        let (mut dialog, calls) = open(&mut doc, LanguageCode::En);
        assert_eq!(crate::notice::dismiss(&mut doc, dialog.handle()), Dismissal::Removed);
        assert_eq!(dialog.click(&mut doc, DialogTarget::Confirm), DialogOutcome::Resolved(false));
        assert_eq!(dialog.click(&mut doc, DialogTarget::Confirm), DialogOutcome::AlreadyResolved);
        assert_eq!(*calls.borrow(), vec![false]);
    }

    #[test]
    fn backdrop_and_cancel_decline() {
        let mut doc = Document::new();
        let (mut first, first_calls) = open(&mut doc, LanguageCode::En);
        let (mut second, second_calls) = open(&mut doc, LanguageCode::En);
        assert_eq!(doc.query_class("confirm-dialog-overlay").len(), 2);
        first.click(&mut doc, DialogTarget::Backdrop);
        second.click(&mut doc, DialogTarget::Cancel);
        assert_eq!(*first_calls.borrow(), vec![false]);
        assert_eq!(*second_calls.borrow(), vec![false]);
    }
}
