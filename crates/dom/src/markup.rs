use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;
use tracing::trace;

use crate::document::{Document, NodeId, NodeKind};

/// Elements written without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Error)]
pub enum DomError {
    #[error("malformed markup at byte {position}: {source}")]
    Markup {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("malformed attribute at byte {position}: {source}")]
    Attribute {
        position: usize,
        #[source]
        source: AttrError,
    },
    #[error("failed to serialize markup: {0}")]
    Serialize(#[from] quick_xml::Error),
    #[error("markup contains no root element")]
    Empty,
}

impl Document {
    /// 解析格式正確的標記。 / Parses well-formed (XHTML-style) markup.
    ///
    /// A top-level `<html>` becomes the root. Any other top-level content is
    /// placed inside a fresh `<body>`.
    pub fn parse(markup: &str) -> Result<Self, DomError> {
        let mut reader = Reader::from_str(markup);
        let mut doc: Option<Document> = None;
        let mut stack: Vec<NodeId> = Vec::new();
        let mut doctype = None;

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|source| DomError::Markup { position, source })?;
            match event {
                Event::Start(start) => {
                    let node = attach_element(&mut doc, &stack, &start, position)?;
                    stack.push(node);
                }
                Event::Empty(start) => {
                    attach_element(&mut doc, &stack, &start, position)?;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(text) => {
                    let Some(parent) = stack.last().copied() else {
                        continue;
                    };
                    let value = text
                        .unescape_with(html_entity)
                        .map_err(|source| DomError::Markup { position, source })?;
                    if let Some(doc) = doc.as_mut() {
                        let node = doc.create_text(&value);
                        doc.append_child(parent, node);
                    }
                }
                Event::CData(data) => {
                    let Some(parent) = stack.last().copied() else {
                        continue;
                    };
                    let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    if let Some(doc) = doc.as_mut() {
                        let node = doc.create_text(&value);
                        doc.append_child(parent, node);
                    }
                }
                Event::Eof => break,
                Event::DocType(text) => {
                    let value = String::from_utf8_lossy(&text.into_inner()).trim().to_string();
                    doctype = Some(value);
                }
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) => {}
            }
        }

        let mut doc = doc.ok_or(DomError::Empty)?;
        doc.doctype = doctype;
        trace!(nodes = doc.descendants(doc.root()).len(), "parsed markup");
        Ok(doc)
    }

    /// 序列化為標記字串。 / Serializes the attached tree back to markup.
    pub fn to_markup(&self) -> Result<String, DomError> {
        let mut writer = Writer::new(Vec::new());
        if let Some(doctype) = &self.doctype {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
            writer.get_mut().push(b'\n');
        }
        self.write_node(&mut writer, self.root())?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, node: NodeId) -> Result<(), DomError> {
        let tag = match &self.node(node).kind {
            NodeKind::Text(text) => {
                writer.write_event(Event::Text(BytesText::new(text)))?;
                return Ok(());
            }
            NodeKind::Element(data) => data.tag.as_str(),
        };

        let mut start = BytesStart::new(tag);
        for (key, value) in self.attrs(node) {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        let style = self.style_text(node);
        if !style.is_empty() {
            start.push_attribute(("style", style.as_str()));
        }

        let children = self.children(node);
        if children.is_empty() && VOID_ELEMENTS.contains(&tag) {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        for child in children {
            self.write_node(writer, *child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }
}

/// Creates the element for `start` under the current open element, or under
/// `<body>` when nothing is open. A leading `<html>` becomes the root itself.
fn attach_element(
    doc: &mut Option<Document>,
    stack: &[NodeId],
    start: &BytesStart<'_>,
    position: usize,
) -> Result<NodeId, DomError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
    if doc.is_none() && name == "html" {
        let created = doc.insert(Document::with_root("html"));
        let root = created.root();
        copy_attributes(created, root, start, position)?;
        return Ok(root);
    }

    let document = doc.get_or_insert_with(Document::new);
    let parent = match stack.last().copied() {
        Some(parent) => parent,
        None => document.body(),
    };
    let node = document.create_element(&name);
    copy_attributes(document, node, start, position)?;
    document.append_child(parent, node);
    Ok(node)
}

fn copy_attributes(
    doc: &mut Document,
    node: NodeId,
    start: &BytesStart<'_>,
    position: usize,
) -> Result<(), DomError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|source| DomError::Attribute { position, source })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value_with(html_entity)
            .map_err(|source| DomError::Markup { position, source })?;
        doc.set_attr(node, &key, &value);
    }
    Ok(())
}

fn html_entity(name: &str) -> Option<&'static str> {
    match name {
        "nbsp" => Some("\u{a0}"),
        "times" => Some("×"),
        "copy" => Some("©"),
        "middot" => Some("·"),
        "hellip" => Some("…"),
        "rarr" => Some("→"),
        "larr" => Some("←"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attributes_text_and_entities() {
        let doc = Document::parse(
            r#"<html lang="en"><head><title data-zh="电费账单" data-en="Electricity Bill">Electricity Bill</title></head>
            <body><button class="notification-close">&times;</button><input id="q" placeholder="Search"/></body></html>"#,
        )
        .unwrap();
        assert_eq!(doc.attr(doc.root(), "lang"), Some("en"));
        assert_eq!(doc.title().as_deref(), Some("Electricity Bill"));
        let close = doc.first_by_class("notification-close").unwrap();
        assert_eq!(doc.text_content(close), "×");
        let input = doc.element_by_id("q").unwrap();
        assert_eq!(doc.attr(input, "placeholder"), Some("Search"));
    }

    #[test]
    fn fragments_are_wrapped_in_body() {
        let doc = Document::parse(r#"<div id="a">x</div><div id="b">y</div>"#).unwrap();
        let body = doc.child_by_tag(doc.root(), "body").unwrap();
        assert_eq!(doc.element_children(body).len(), 2);
        assert!(doc.child_by_tag(doc.root(), "head").is_some());
    }

    #[test]
    fn serializes_styles_and_void_elements() {
        let mut doc = Document::parse(r#"<html><body><input id="q"/><p style="color: red">a &lt; b</p></body></html>"#).unwrap();
        let input = doc.element_by_id("q").unwrap();
        doc.set_attr(input, "placeholder", "搜索");
        let markup = doc.to_markup().unwrap();
        assert!(markup.contains(r#"<input id="q" placeholder="搜索"/>"#), "{markup}");
        assert!(markup.contains(r#"<p style="color: red;">a &lt; b</p>"#), "{markup}");
    }

    #[test]
    fn doctype_survives_round_trip() {
        let doc = Document::parse("<!DOCTYPE html>\n<html><body><p>x</p></body></html>").unwrap();
        assert_eq!(doc.doctype(), Some("html"));
        let markup = doc.to_markup().unwrap();
        assert!(markup.starts_with("<!DOCTYPE html>\n<html>"), "{markup}");
        assert_eq!(Document::parse("<p>x</p>").unwrap().to_markup().unwrap().find("DOCTYPE"), None);
    }

    #[test]
    fn malformed_markup_is_reported() {
        let err = Document::parse("<html><body></div></html>").unwrap_err();
        assert!(matches!(err, DomError::Markup { .. }));
        assert!(matches!(Document::parse("   "), Err(DomError::Empty)));
    }
}
