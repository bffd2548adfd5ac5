use std::time::Duration;

use tracing::trace;
use voltbill_dom::{Document, Scheduler};

use crate::notice::{ensure_style, NoticeHandle, NoticeKind, WidgetTask};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2_000);

const TOAST_KEYFRAMES: &str = "@keyframes fadeInOut { \
0% { opacity: 0; transform: translate(-50%, -50%) scale(0.8); } \
15% { opacity: 1; transform: translate(-50%, -50%) scale(1); } \
85% { opacity: 1; transform: translate(-50%, -50%) scale(1); } \
100% { opacity: 0; transform: translate(-50%, -50%) scale(0.8); } }";

/// 顯示提示訊息；先移除既有的 toast。 / Shows a toast, replacing any toast already on the page.
///
/// At most one `.toast` node is attached at any time. The replaced toast's
/// pending removal still fires later but finds nothing to remove.
pub fn show_toast(
    doc: &mut Document,
    scheduler: &mut Scheduler<WidgetTask>,
    message: &str,
    duration: Duration,
) -> NoticeHandle {
    for existing in doc.query_class("toast") {
        doc.remove(existing);
    }

    let toast = doc.create_element("div");
    doc.set_attr(toast, "class", "toast");
    doc.set_text_content(toast, message);
    doc.set_style_text(
        toast,
        &format!(
            "position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); \
             background: rgba(0, 0, 0, 0.8); color: white; padding: 12px 20px; \
             border-radius: 8px; font-size: 14px; z-index: 10000; \
             animation: fadeInOut {}ms ease-in-out;",
            duration.as_millis()
        ),
    );
    ensure_style(doc, "toastAnimation", TOAST_KEYFRAMES);

    let body = doc.body();
    doc.append_child(body, toast);
    scheduler.schedule(duration, WidgetTask::Remove(toast));
    trace!(message, "toast shown");

    NoticeHandle {
        node: toast,
        kind: NoticeKind::Toast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::run_due;

    #[test]
    fn second_toast_replaces_first() {
        let mut doc = Document::new();
        let mut scheduler = Scheduler::new();
        let first = show_toast(&mut doc, &mut scheduler, "Date selector clicked", DEFAULT_TOAST_DURATION);
        let second = show_toast(&mut doc, &mut scheduler, "Switch account feature", DEFAULT_TOAST_DURATION);

        assert!(!doc.is_attached(first.node));
        let toasts = doc.query_class("toast");
        assert_eq!(toasts, vec![second.node]);
        assert_eq!(doc.text_content(second.node), "Switch account feature");
        assert_eq!(doc.style(second.node, "animation"), Some("fadeInOut 2000ms ease-in-out"));
    }

    #[test]
    fn toast_removes_itself_after_duration() {
        let mut doc = Document::new();
        let mut scheduler = Scheduler::new();
        let handle = show_toast(&mut doc, &mut scheduler, "hi", Duration::from_millis(500));
        run_due(&mut doc, &mut scheduler, Duration::from_millis(499));
        assert!(doc.is_attached(handle.node));
        run_due(&mut doc, &mut scheduler, Duration::from_millis(1));
        assert!(doc.query_class("toast").is_empty());
    }
}
