//! A minimal node tree for building page fragments.
//!
//! Text and attribute values are stored unescaped and only escaped when
//! serialised, and the DOM mounter in [`crate::dom`] creates text nodes and
//! attributes directly, so user supplied strings never become markup.

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "source"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attributes: Vec::new(),
        children: Vec::new(),
    }
}

impl Element {
    /// Sets an attribute, replacing an earlier value under the same name.
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();

        match self.attributes.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }

        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn flag(self, name: &'static str) -> Self {
        self.attr(name, "")
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn attributes(&self) -> &[(&'static str, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map_or(false, |classes| classes.split_whitespace().any(|c| c == class))
    }

    /// This element and every element below it, in document order.
    pub fn find_all(&self, matches: impl Fn(&Element) -> bool + Copy) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect(matches, &mut found);
        found
    }

    fn collect<'a>(&'a self, matches: impl Fn(&Element) -> bool + Copy, found: &mut Vec<&'a Element>) {
        if matches(self) {
            found.push(self);
        }

        for child in &self.children {
            if let Node::Element(element) = child {
                element.collect(matches, found);
            }
        }
    }

    pub fn text_content(&self) -> String {
        let mut text = String::new();

        for child in &self.children {
            match child {
                Node::Text(value) => text.push_str(value),
                Node::Element(element) => text.push_str(&element.text_content()),
            }
        }

        text
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html);
        html
    }

    fn write_html(&self, html: &mut String) {
        html.push('<');
        html.push_str(self.tag);

        for (name, value) in &self.attributes {
            html.push(' ');
            html.push_str(name);
            if !value.is_empty() {
                html.push_str("=\"");
                html.push_str(&escape(value));
                html.push('"');
            }
        }

        html.push('>');

        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            match child {
                Node::Text(value) => html.push_str(&escape(value)),
                Node::Element(element) => element.write_html(html),
            }
        }

        html.push_str("</");
        html.push_str(self.tag);
        html.push('>');
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_owned())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());

    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}
