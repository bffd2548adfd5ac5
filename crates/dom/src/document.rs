/// 文件節點的識別碼。 / Handle to a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) style: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// 以陣列儲存的文件樹。 / Arena-backed document tree rooted at `<html>`.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    pub(crate) doctype: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// 建立含 `<head>` 與 `<body>` 的空白文件。 / Creates an empty document with `<head>` and `<body>`.
    pub fn new() -> Self {
        let mut doc = Self::with_root("html");
        doc.head();
        doc.body();
        doc
    }

    pub(crate) fn with_root(tag: &str) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            doctype: None,
        };
        doc.root = doc.create_element(tag);
        doc
    }

    /// The `<!DOCTYPE ...>` body the markup was parsed with, e.g. `html`.
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns `<head>`, creating it as the first child of the root if needed.
    pub fn head(&mut self) -> NodeId {
        if let Some(head) = self.child_by_tag(self.root, "head") {
            return head;
        }
        let head = self.create_element("head");
        let first = self.nodes[self.root.0].children.first().copied();
        match first {
            Some(first) => self.insert_before(self.root, head, first),
            None => self.append_child(self.root, head),
        }
        head
    }

    /// Returns `<body>`, creating it at the end of the root if needed.
    pub fn body(&mut self) -> NodeId {
        if let Some(body) = self.child_by_tag(self.root, "body") {
            return body;
        }
        let body = self.create_element("body");
        self.append_child(self.root, body);
        body
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: Vec::new(),
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// 附加子節點；若已有父節點會先移出。 / Appends `child`, moving it if it already has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Inserts `child` before `reference`; appends when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|existing| *existing == reference);
        self.nodes[child.0].parent = Some(parent);
        match position {
            Some(index) => self.nodes[parent.0].children.insert(index, child),
            None => self.nodes[parent.0].children.push(child),
        }
    }

    /// 自父節點移除；重複呼叫無副作用。 / Detaches the node; returns `false` if it had no parent.
    pub fn remove(&mut self, node: NodeId) -> bool {
        self.detach(node)
    }

    fn detach(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return false;
        };
        self.nodes[parent.0]
            .children
            .retain(|existing| *existing != node);
        true
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Child elements only, skipping text nodes.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].kind, NodeKind::Element(_))
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|data| data.tag.as_str())
    }

    pub(crate) fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.0]
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if name == "style" {
            self.set_style_text(node, value);
            return;
        }
        if let Some(data) = self.element_mut(node) {
            match data.attrs.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => data.attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> bool {
        let Some(data) = self.element_mut(node) else {
            return false;
        };
        let before = data.attrs.len();
        data.attrs.retain(|(key, _)| key != name);
        data.attrs.len() != before
    }

    pub fn attrs(&self, node: NodeId) -> &[(String, String)] {
        self.element(node)
            .map(|data| data.attrs.as_slice())
            .unwrap_or(&[])
    }

    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.attr(node, "class")
            .map(|value| value.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).contains(&class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let mut classes: Vec<String> = self.classes(node).into_iter().map(str::to_string).collect();
        classes.push(class.to_string());
        self.set_attr(node, "class", &classes.join(" "));
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> bool {
        if !self.has_class(node, class) {
            return false;
        }
        let remaining: Vec<String> = self
            .classes(node)
            .into_iter()
            .filter(|existing| *existing != class)
            .map(str::to_string)
            .collect();
        if remaining.is_empty() {
            self.remove_attr(node, "class");
        } else {
            self.set_attr(node, "class", &remaining.join(" "));
        }
        true
    }

    /// 切換 class 並回傳新的狀態。 / Toggles a class and returns whether it is now present.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.remove_class(node, class) {
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?
            .style
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.as_str())
    }

    /// Sets one inline style property; an empty value clears it.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(data) = self.element_mut(node) else {
            return;
        };
        if value.is_empty() {
            data.style.retain(|(key, _)| key != property);
            return;
        }
        match data.style.iter_mut().find(|(key, _)| key == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => data
                .style
                .push((property.to_string(), value.to_string())),
        }
    }

    /// 以 CSS 字串取代整組行內樣式。 / Replaces all inline styles from a `cssText`-style declaration list.
    pub fn set_style_text(&mut self, node: NodeId, css: &str) {
        let Some(data) = self.element_mut(node) else {
            return;
        };
        data.style = parse_declarations(css);
    }

    pub fn style_text(&self, node: NodeId) -> String {
        self.element(node)
            .map(|data| {
                data.style
                    .iter()
                    .map(|(key, value)| format!("{key}: {value};"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    /// 串接所有後代文字。 / Concatenated text of every descendant text node.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for child in &self.nodes[node.0].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Replaces every child with a single text node (or updates a text node in place).
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if let NodeKind::Text(existing) = &mut self.nodes[node.0].kind {
            *existing = text.to_string();
            return;
        }
        let sole_text = match self.nodes[node.0].children.as_slice() {
            [only] if !self.is_element(*only) => Some(*only),
            _ => None,
        };
        if let (Some(only), false) = (sole_text, text.is_empty()) {
            self.nodes[only.0].kind = NodeKind::Text(text.to_string());
            return;
        }
        let children = std::mem::take(&mut self.nodes[node.0].children);
        let mut reusable = None;
        for child in children {
            self.nodes[child.0].parent = None;
            if reusable.is_none() && !self.is_element(child) {
                reusable = Some(child);
            }
        }
        if text.is_empty() {
            return;
        }
        let text_node = match reusable {
            Some(existing) => {
                self.nodes[existing.0].kind = NodeKind::Text(text.to_string());
                existing
            }
            None => self.create_text(text),
        };
        self.append_child(node, text_node);
    }

    /// 依文件順序列出後代元素（不含自身）。 / Descendant elements in document order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if !self.is_element(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    fn attached_elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(self.root).chain(self.descendants(self.root))
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.attached_elements()
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.attached_elements()
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    pub fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.attached_elements()
            .find(|node| self.has_class(*node, class))
    }

    pub fn query_tag(&self, tag: &str) -> Vec<NodeId> {
        self.attached_elements()
            .filter(|node| self.tag(*node) == Some(tag))
            .collect()
    }

    pub fn query_attr(&self, name: &str) -> Vec<NodeId> {
        self.attached_elements()
            .filter(|node| self.has_attr(*node, name))
            .collect()
    }

    /// First descendant of `scope` carrying `class`.
    pub fn find_class_in(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|node| self.has_class(*node, class))
    }

    pub fn find_tag_in(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.tag(*node) == Some(tag))
            .collect()
    }

    pub fn child_by_tag(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|child| self.tag(*child) == Some(tag))
    }

    /// Text of the first `<title>`.
    pub fn title(&self) -> Option<String> {
        self.query_tag("title")
            .first()
            .map(|title| self.text_content(*title))
    }

    pub fn set_title(&mut self, text: &str) {
        let title = match self.query_tag("title").first().copied() {
            Some(title) => title,
            None => {
                let head = self.head();
                let title = self.create_element("title");
                self.append_child(head, title);
                title
            }
        };
        self.set_text_content(title, text);
    }
}

fn parse_declarations(css: &str) -> Vec<(String, String)> {
    css.split(';')
        .filter_map(|declaration| {
            let (key, value) = declaration.split_once(':')?;
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                None
            } else {
                Some((key.to_string(), value.to_string()))
            }
        })
        .collect()
}
