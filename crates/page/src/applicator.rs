use tracing::{debug, trace};
use voltbill_dom::{Document, NodeId};
use voltbill_settings::{LanguageCode, Lookup, TextCatalog};

use crate::bindings::{Binding, BindingRegistry, BindingTarget};

pub const LANGUAGE_SELECT_ID: &str = "language-select";
pub const LANGUAGE_TOGGLE_ID: &str = "langToggle";

/// A binding left untouched because its source has no text for the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingText {
    pub node: NodeId,
    pub target: BindingTarget,
    /// Catalog key, or `None` for inline strings.
    pub key: Option<String>,
}

/// 套用語言後的統計。 / What an application pass changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub language: LanguageCode,
    pub updated: usize,
    pub unchanged: usize,
    pub missing: Vec<MissingText>,
}

impl ApplyReport {
    fn new(language: LanguageCode) -> Self {
        Self {
            language,
            updated: 0,
            unchanged: 0,
            missing: Vec::new(),
        }
    }

    /// `true` when the pass changed nothing in the document.
    pub fn is_noop(&self) -> bool {
        self.updated == 0
    }

    fn record(&mut self, changed: bool) {
        if changed {
            self.updated += 1;
        } else {
            self.unchanged += 1;
        }
    }
}

/// 將目前語言寫入所有已登錄的綁定。 / Writes the active language into every registered binding.
#[derive(Debug, Clone, Copy)]
pub struct TextApplicator<'a> {
    registry: &'a BindingRegistry,
    catalog: &'a TextCatalog,
}

impl<'a> TextApplicator<'a> {
    pub fn new(registry: &'a BindingRegistry, catalog: &'a TextCatalog) -> Self {
        Self { registry, catalog }
    }

    /// Applies `language`. Bindings without text keep their current content,
    /// and a second pass with the same language changes nothing.
    pub fn apply(&self, doc: &mut Document, language: LanguageCode) -> ApplyReport {
        let mut report = ApplyReport::new(language);

        for binding in self.registry.bindings() {
            match binding.source.resolve(self.catalog, language) {
                Lookup::Found(text) => {
                    let changed = write_binding(doc, binding, text);
                    report.record(changed);
                }
                Lookup::Missing => {
                    trace!(node = ?binding.node, target = ?binding.target, "no text for binding");
                    report.missing.push(MissingText {
                        node: binding.node,
                        target: binding.target,
                        key: binding.source.key().map(str::to_string),
                    });
                }
            }
        }

        let root = doc.root();
        let changed = write_attr(doc, root, "lang", language.html_lang());
        report.record(changed);

        if let Some(select) = doc.element_by_id(LANGUAGE_SELECT_ID) {
            let changed = write_attr(doc, select, "value", language.code());
            report.record(changed);
        }

        let label = doc
            .element_by_id(LANGUAGE_TOGGLE_ID)
            .and_then(|toggle| doc.find_class_in(toggle, "lang-text"));
        if let Some(label) = label {
            let changed = write_text(doc, label, language.toggle_label());
            report.record(changed);
        }

        debug!(
            language = %language,
            updated = report.updated,
            unchanged = report.unchanged,
            missing = report.missing.len(),
            "applied language"
        );
        report
    }
}

fn write_binding(doc: &mut Document, binding: &Binding, text: &str) -> bool {
    let node = binding.node;
    match binding.target {
        BindingTarget::Text => write_text(doc, node, text),
        BindingTarget::Value => write_attr(doc, node, "value", text),
        BindingTarget::Placeholder => write_attr(doc, node, "placeholder", text),
        BindingTarget::Title => write_attr(doc, node, "title", text),
        BindingTarget::DocumentTitle => {
            if doc.title().as_deref() == Some(text) {
                false
            } else {
                doc.set_title(text);
                true
            }
        }
    }
}

fn write_text(doc: &mut Document, node: NodeId, text: &str) -> bool {
    if doc.text_content(node) == text {
        return false;
    }
    doc.set_text_content(node, text);
    true
}

fn write_attr(doc: &mut Document, node: NodeId, name: &str, value: &str) -> bool {
    if doc.attr(node, name) == Some(value) {
        return false;
    }
    doc.set_attr(node, name, value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html lang="en"><head><title data-zh="电费账单" data-en="Electricity Bill">Electricity Bill</title></head><body>
<select id="language-select"><option value="zh">中文</option><option value="en">English</option></select>
<button id="langToggle"><span class="lang-text">中</span></button>
<h2 id="usage" data-i18n="current-usage">Current Usage</h2>
<input id="search" placeholder="Search" data-zh-placeholder="搜索" data-en-placeholder="Search"/>
<input id="send" type="submit" value="Send" data-zh="发送" data-en="Send"/>
<span id="stale" data-i18n="not-in-catalog">keep me</span>
</body></html>"#;

    fn setup() -> (Document, BindingRegistry, TextCatalog) {
        let doc = Document::parse(PAGE).expect("page parses");
        let catalog = TextCatalog::bill();
        let registry = BindingRegistry::scan(&doc, &catalog);
        (doc, registry, catalog)
    }

    #[test]
    fn applies_every_target_and_page_chrome() {
        let (mut doc, registry, catalog) = setup();
        let report = TextApplicator::new(&registry, &catalog).apply(&mut doc, LanguageCode::Zh);

        assert_eq!(doc.title().as_deref(), Some("电费账单"));
        let usage = doc.element_by_id("usage").unwrap();
        assert_eq!(doc.text_content(usage), "本期电量");
        let search = doc.element_by_id("search").unwrap();
        assert_eq!(doc.attr(search, "placeholder"), Some("搜索"));
        let send = doc.element_by_id("send").unwrap();
        assert_eq!(doc.attr(send, "value"), Some("发送"));
        assert_eq!(doc.attr(doc.root(), "lang"), Some("zh-CN"));
        let select = doc.element_by_id("language-select").unwrap();
        assert_eq!(doc.attr(select, "value"), Some("zh"));
        let label = doc.first_by_class("lang-text").unwrap();
        assert_eq!(doc.text_content(label), "EN");

        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].key.as_deref(), Some("not-in-catalog"));
        let stale = doc.element_by_id("stale").unwrap();
        assert_eq!(doc.text_content(stale), "keep me");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let (mut doc, registry, catalog) = setup();
        let applicator = TextApplicator::new(&registry, &catalog);
        let first = applicator.apply(&mut doc, LanguageCode::Zh);
        assert!(!first.is_noop());
        let before = doc.to_markup().unwrap();
        let second = applicator.apply(&mut doc, LanguageCode::Zh);
        assert!(second.is_noop());
        assert_eq!(doc.to_markup().unwrap(), before);
    }
}
