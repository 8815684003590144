//! Node types of the content tree.

/// A single attribute with its unescaped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified name, e.g. `office:value-type`
    pub name: String,
    /// Unescaped value
    pub value: String,
}

/// An XML element with its attributes (in source order) and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified name, e.g. `table:table-cell`
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<Attribute>,
    /// Child nodes
    pub children: Vec<Node>,
}

/// A node of the content tree.
///
/// The engine only interprets [`Node::Element`] and [`Node::Text`]; every
/// other variant is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element node
    Element(Element),
    /// Character data, unescaped
    Text(String),
    /// `<![CDATA[...]]>` content
    CData(String),
    /// `<!--...-->` content
    Comment(String),
    /// `<?...?>` processing instruction content
    Instruction(String),
    /// `<?xml ...?>` declaration content
    Declaration(String),
    /// `<!DOCTYPE ...>` content
    DocType(String),
    /// Literal markup emitted as-is, never escaped
    Markup(String),
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Whether this element has the given qualified name.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Name without its namespace prefix (`x:row` → `row`).
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Value of the first attribute with the given local name, whatever its
    /// prefix (`r:id`, `id`).
    pub fn attribute_local(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| local_name(&attr.name) == local)
            .map(|attr| attr.value.as_str())
    }

    /// Value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Whether an attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    /// Set an attribute, replacing the value in place or appending it.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|attr| attr.name == name)?;
        Some(self.attributes.remove(index).value)
    }

    /// Iterate over child elements, skipping text and passthrough nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated character data of all descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(&self.children, &mut text);
        text
    }
}

/// Strip a namespace prefix from a qualified name.
#[inline]
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) | Node::CData(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
            _ => {},
        }
    }
}

impl Node {
    /// The element, if this node is one.
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// The element, mutably, if this node is one.
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}
