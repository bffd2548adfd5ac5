use std::time::Duration;

use voltbill_dom::{Document, NodeId, Scheduler};
use voltbill_settings::{LanguageCode, TextCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Toast,
    Notification,
    Dialog,
    Spinner,
}

/// 暫時性提示的控制代碼。 / Handle to a transient notice's root node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeHandle {
    pub node: NodeId,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    Removed,
    AlreadyGone,
}

/// Deferred widget work queued on the page scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetTask {
    Remove(NodeId),
    SlideIn(NodeId),
    Hide { node: NodeId, remove_after: Duration },
    Restyle {
        node: NodeId,
        property: &'static str,
        value: &'static str,
    },
}

/// 移除提示；重複呼叫回傳 `AlreadyGone`。 / Removes a notice; repeated calls report `AlreadyGone`.
pub fn dismiss(doc: &mut Document, handle: NoticeHandle) -> Dismissal {
    if doc.remove(handle.node) {
        Dismissal::Removed
    } else {
        Dismissal::AlreadyGone
    }
}

/// Executes one task that came due on the scheduler.
pub fn run_task(doc: &mut Document, scheduler: &mut Scheduler<WidgetTask>, task: WidgetTask) {
    match task {
        WidgetTask::Remove(node) => {
            doc.remove(node);
        }
        WidgetTask::SlideIn(node) => {
            if doc.is_attached(node) {
                doc.set_style(node, "transform", "translateX(0)");
            }
        }
        WidgetTask::Hide { node, remove_after } => {
            crate::notification::begin_hide(doc, scheduler, node, remove_after);
        }
        WidgetTask::Restyle {
            node,
            property,
            value,
        } => doc.set_style(node, property, value),
    }
}

/// 推進時鐘並逐一執行到期的工作。 / Advances the clock by `elapsed`, running due tasks one deadline at a time.
///
/// A task queued by another task (a notification's removal after it hides) is
/// timed from when its parent fired and still runs within this window if due.
pub fn run_due(doc: &mut Document, scheduler: &mut Scheduler<WidgetTask>, elapsed: Duration) -> usize {
    let target = scheduler.now() + elapsed;
    let mut ran = 0;
    while let Some(task) = scheduler.pop_due(target) {
        run_task(doc, scheduler, task);
        ran += 1;
    }
    scheduler.settle(target);
    ran
}

/// Injects a `<style id=...>` into `<head>` once.
pub(crate) fn ensure_style(doc: &mut Document, id: &str, css: &str) {
    if doc.element_by_id(id).is_some() {
        return;
    }
    let head = doc.head();
    let style = doc.create_element("style");
    doc.set_attr(style, "id", id);
    doc.set_text_content(style, css);
    doc.append_child(head, style);
}

/// Catalog text for `language`, then English, then the key itself.
pub(crate) fn localized(catalog: &TextCatalog, language: LanguageCode, key: &str) -> String {
    catalog
        .text(language, key)
        .or_else(|| catalog.text(LanguageCode::En, key))
        .unwrap_or(key)
        .to_string()
}

pub(crate) fn element_with(doc: &mut Document, tag: &str, class: &str, text: Option<&str>) -> NodeId {
    let node = doc.create_element(tag);
    doc.set_attr(node, "class", class);
    if let Some(text) = text {
        doc.set_text_content(node, text);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_twice_is_a_no_op() {
        let mut doc = Document::new();
        let body = doc.body();
        let node = doc.create_element("div");
        doc.append_child(body, node);
        let handle = NoticeHandle {
            node,
            kind: NoticeKind::Toast,
        };
        assert_eq!(dismiss(&mut doc, handle), Dismissal::Removed);
        assert_eq!(dismiss(&mut doc, handle), Dismissal::AlreadyGone);
    }

    #[test]
    fn style_is_injected_once() {
        let mut doc = Document::new();
        ensure_style(&mut doc, "toastAnimation", "@keyframes fadeInOut {}");
        ensure_style(&mut doc, "toastAnimation", "@keyframes fadeInOut {}");
        assert_eq!(doc.query_tag("style").len(), 1);
    }
}
