use voltbill_dom::{Document, NodeId};
use voltbill_settings::{LanguageCode, TextCatalog};

use crate::notice::{element_with, ensure_style, localized, Dismissal, NoticeHandle, NoticeKind};

const SPIN_KEYFRAMES: &str =
    "@keyframes spin { 0% { transform: rotate(0deg); } 100% { transform: rotate(360deg); } }";

/// 在元素上顯示載入中指示。 / Dims `host` and overlays a loading spinner with a localized label.
pub fn show_loading(
    doc: &mut Document,
    host: NodeId,
    language: LanguageCode,
    catalog: &TextCatalog,
) -> NoticeHandle {
    doc.set_style(host, "opacity", "0.6");
    doc.set_style(host, "pointer-events", "none");

    let loader = element_with(doc, "div", "loading-spinner", None);
    let spinner = element_with(doc, "div", "spinner", None);
    let label = localized(catalog, language, "loading");
    let text = doc.create_element("span");
    doc.set_text_content(text, &label);
    doc.append_child(loader, spinner);
    doc.append_child(loader, text);

    doc.set_style_text(
        loader,
        "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); \
         display: flex; flex-direction: column; align-items: center; gap: var(--space-2); \
         color: var(--text-secondary); font-size: 14px;",
    );
    doc.set_style_text(
        spinner,
        "width: 20px; height: 20px; border: 2px solid var(--divider); \
         border-top: 2px solid var(--accent); border-radius: 50%; \
         animation: spin 1s linear infinite;",
    );
    ensure_style(doc, "spinner-keyframes", SPIN_KEYFRAMES);

    doc.set_style(host, "position", "relative");
    doc.append_child(host, loader);

    NoticeHandle {
        node: loader,
        kind: NoticeKind::Spinner,
    }
}

/// Restores `host` and removes its spinner; safe to call when none is shown.
pub fn hide_loading(doc: &mut Document, host: NodeId) -> Dismissal {
    doc.set_style(host, "opacity", "1");
    doc.set_style(host, "pointer-events", "auto");
    match doc.find_class_in(host, "loading-spinner") {
        Some(loader) => {
            doc.remove(loader);
            Dismissal::Removed
        }
        None => Dismissal::AlreadyGone,
    }
}
