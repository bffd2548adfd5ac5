use std::time::Duration;

use voltbill_dom::{Document, NodeId, Scheduler};
use voltbill_settings::PageConfig;

use crate::notice::{element_with, Dismissal, NoticeHandle, NoticeKind, WidgetTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }

    fn border_color(self) -> &'static str {
        match self {
            NotificationKind::Success => "var(--success)",
            NotificationKind::Error => "var(--error)",
            NotificationKind::Warning => "var(--warning)",
            NotificationKind::Info => "var(--info)",
        }
    }
}

/// 通知的計時設定。 / Timing for notifications. A zero `duration` keeps the notification until closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTimings {
    pub slide_in: Duration,
    pub duration: Duration,
    pub hide: Duration,
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self::from(&PageConfig::default())
    }
}

impl From<&PageConfig> for NotificationTimings {
    fn from(config: &PageConfig) -> Self {
        Self {
            slide_in: config.notification_slide_in(),
            duration: config.notification_duration(),
            hide: config.notification_hide(),
        }
    }
}

/// Shows a notification in the top-right corner. Notifications stack.
pub fn show_notification(
    doc: &mut Document,
    scheduler: &mut Scheduler<WidgetTask>,
    message: &str,
    kind: NotificationKind,
    timings: NotificationTimings,
) -> NoticeHandle {
    let notification = element_with(
        doc,
        "div",
        &format!("notification notification-{}", kind.as_str()),
        None,
    );
    let content = element_with(doc, "div", "notification-content", None);
    let text = element_with(doc, "span", "notification-message", Some(message));
    let close = element_with(doc, "button", "notification-close", Some("×"));
    doc.append_child(content, text);
    doc.append_child(content, close);
    doc.append_child(notification, content);

    doc.set_style_text(
        notification,
        "position: fixed; top: 20px; right: 20px; background: var(--background); \
         border: var(--border); border-radius: var(--radius); padding: var(--space-4); \
         box-shadow: var(--shadow-elevated); z-index: 1000; transform: translateX(100%); \
         transition: transform 0.3s ease;",
    );
    doc.set_style(notification, "border-left-color", kind.border_color());
    doc.set_style(notification, "border-left-width", "4px");

    let body = doc.body();
    doc.append_child(body, notification);

    scheduler.schedule(timings.slide_in, WidgetTask::SlideIn(notification));
    if !timings.duration.is_zero() {
        scheduler.schedule(
            timings.duration,
            WidgetTask::Hide {
                node: notification,
                remove_after: timings.hide,
            },
        );
    }

    NoticeHandle {
        node: notification,
        kind: NoticeKind::Notification,
    }
}

/// 關閉按鈕的行為：滑出後移除。 / Close-button behaviour: slide out, then remove after `remove_after`.
pub fn hide_notification(
    doc: &mut Document,
    scheduler: &mut Scheduler<WidgetTask>,
    handle: NoticeHandle,
    remove_after: Duration,
) -> Dismissal {
    begin_hide(doc, scheduler, handle.node, remove_after)
}

pub(crate) fn begin_hide(
    doc: &mut Document,
    scheduler: &mut Scheduler<WidgetTask>,
    node: NodeId,
    remove_after: Duration,
) -> Dismissal {
    if !doc.is_attached(node) {
        return Dismissal::AlreadyGone;
    }
    doc.set_style(node, "transform", "translateX(100%)");
    scheduler.schedule(remove_after, WidgetTask::Remove(node));
    Dismissal::Removed
}
