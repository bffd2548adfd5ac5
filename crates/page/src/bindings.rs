use tracing::debug;
use voltbill_dom::{Document, NodeId};
use voltbill_settings::{LanguageCode, Lookup, TextCatalog};

/// Attribute naming a catalog key instead of carrying inline strings.
pub const CATALOG_KEY_ATTR: &str = "data-i18n";

/// 綁定寫入的位置。 / Where a binding writes its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingTarget {
    Text,
    /// `value` of an `<input type="submit">`.
    Value,
    Placeholder,
    /// The `title` attribute (tooltip).
    Title,
    /// The document title, for a `<title>` element.
    DocumentTitle,
}

/// 綁定文字的來源。 / Where a binding reads its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingSource {
    /// Per-language strings captured from the element's attributes at scan time.
    Inline { zh: String, en: String },
    Catalog { key: String },
}

impl BindingSource {
    /// Empty inline strings count as missing, as an empty attribute would in the page.
    pub fn resolve<'a>(&'a self, catalog: &'a TextCatalog, language: LanguageCode) -> Lookup<'a> {
        match self {
            BindingSource::Inline { zh, en } => {
                let text = match language {
                    LanguageCode::Zh => zh,
                    LanguageCode::En => en,
                };
                if text.is_empty() {
                    Lookup::Missing
                } else {
                    Lookup::Found(text.as_str())
                }
            }
            BindingSource::Catalog { key } => catalog.lookup(language, key),
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            BindingSource::Catalog { key } => Some(key.as_str()),
            BindingSource::Inline { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub node: NodeId,
    pub target: BindingTarget,
    pub source: BindingSource,
}

/// An element that declares a string for only one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteBinding {
    pub node: NodeId,
    pub present: String,
    pub absent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub bound: usize,
    pub incomplete: Vec<IncompleteBinding>,
    /// `data-i18n` keys with no entry in any language.
    pub unknown_keys: Vec<String>,
}

/// 初始化時建立一次的可翻譯元素登錄表。 / Translatable elements, recorded once when the page initialises.
///
/// Switching languages walks this list instead of re-querying the document.
/// Elements added to the page later are not bound unless [`BindingRegistry::rescan`]
/// is called.
#[derive(Debug, Clone, Default)]
pub struct BindingRegistry {
    bindings: Vec<Binding>,
    report: ScanReport,
}

impl BindingRegistry {
    pub fn scan(doc: &Document, catalog: &TextCatalog) -> Self {
        let mut bindings = Vec::new();
        let mut report = ScanReport::default();

        let root = doc.root();
        for node in std::iter::once(root).chain(doc.descendants(root)) {
            let content = content_target(doc, node);

            match inline_pair(doc, node, "data-zh", "data-en", &mut report) {
                Some(source) => bindings.push(Binding {
                    node,
                    target: content,
                    source,
                }),
                None => {
                    if let Some(key) = doc.attr(node, CATALOG_KEY_ATTR) {
                        if !LanguageCode::ALL
                            .iter()
                            .any(|language| catalog.contains(*language, key))
                        {
                            report.unknown_keys.push(key.to_string());
                        }
                        bindings.push(Binding {
                            node,
                            target: content,
                            source: BindingSource::Catalog {
                                key: key.to_string(),
                            },
                        });
                    }
                }
            }

            if let Some(source) = inline_pair(
                doc,
                node,
                "data-zh-placeholder",
                "data-en-placeholder",
                &mut report,
            ) {
                bindings.push(Binding {
                    node,
                    target: BindingTarget::Placeholder,
                    source,
                });
            }
            if let Some(source) = inline_pair(doc, node, "data-zh-title", "data-en-title", &mut report) {
                bindings.push(Binding {
                    node,
                    target: BindingTarget::Title,
                    source,
                });
            }
        }

        report.bound = bindings.len();
        debug!(
            bound = report.bound,
            incomplete = report.incomplete.len(),
            unknown_keys = report.unknown_keys.len(),
            "scanned translatable elements"
        );
        Self { bindings, report }
    }

    /// Rebuilds the registry after the page gained or lost translatable elements.
    pub fn rescan(&mut self, doc: &Document, catalog: &TextCatalog) {
        *self = Self::scan(doc, catalog);
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn report(&self) -> &ScanReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn for_node(&self, node: NodeId) -> impl Iterator<Item = &Binding> + '_ {
        self.bindings.iter().filter(move |binding| binding.node == node)
    }
}

/// 依元素種類決定內容寫入位置。 / Picks where an element's main string goes.
fn content_target(doc: &Document, node: NodeId) -> BindingTarget {
    match doc.tag(node) {
        Some("title") => BindingTarget::DocumentTitle,
        Some("input") if doc.attr(node, "type") == Some("submit") => BindingTarget::Value,
        _ if doc.has_attr(node, "placeholder") => BindingTarget::Placeholder,
        _ => BindingTarget::Text,
    }
}

fn inline_pair(
    doc: &Document,
    node: NodeId,
    zh_attr: &str,
    en_attr: &str,
    report: &mut ScanReport,
) -> Option<BindingSource> {
    match (doc.attr(node, zh_attr), doc.attr(node, en_attr)) {
        (Some(zh), Some(en)) => Some(BindingSource::Inline {
            zh: zh.to_string(),
            en: en.to_string(),
        }),
        (Some(_), None) => {
            report.incomplete.push(IncompleteBinding {
                node,
                present: zh_attr.to_string(),
                absent: en_attr.to_string(),
            });
            None
        }
        (None, Some(_)) => {
            report.incomplete.push(IncompleteBinding {
                node,
                present: en_attr.to_string(),
                absent: zh_attr.to_string(),
            });
            None
        }
        (None, None) => None,
    }
}
