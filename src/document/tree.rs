//! Owned XML tree built from quick-xml events
//!
//! Parsing is strict: end tags must match, every element must be closed,
//! and there must be exactly one root element. Whitespace-only text nodes
//! are dropped. Everything else is kept verbatim, including the raw start
//! tag bytes, so attributes and namespace declarations survive a round trip
//! untouched.

use crate::document::{DocumentError, DocumentResult};
use quick_xml::events::{BytesCData, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// A node inside an element
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Text as it appeared in the source, still escaped
    Text(BytesText<'static>),
    CData(BytesCData<'static>),
    Comment(BytesText<'static>),
    Instruction(BytesPI<'static>),
}

/// An element and its children
#[derive(Debug, Clone)]
pub struct Element {
    start: BytesStart<'static>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes and no children
    pub fn new(name: &str) -> Self {
        Self {
            start: BytesStart::new(name.to_string()),
            children: Vec::new(),
        }
    }

    /// Creates an element holding a single text node
    pub fn with_text_content(name: &str, text: &str) -> Self {
        Self::new(name).with_text(text)
    }

    /// Qualified name, including any namespace prefix
    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    /// Returns true if the element's local name (prefix ignored) matches
    pub fn is(&self, local_name: &str) -> bool {
        self.start.local_name().as_ref() == local_name.as_bytes()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct child elements, in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First direct child element with the given local name
    pub fn child(&self, local_name: &str) -> Option<&Element> {
        self.elements().find(|element| element.is(local_name))
    }

    /// First descendant element with the given local name, depth first
    pub fn find(&self, local_name: &str) -> Option<&Element> {
        for element in self.elements() {
            if element.is(local_name) {
                return Some(element);
            }
            if let Some(found) = element.find(local_name) {
                return Some(found);
            }
        }
        None
    }

    /// Unescaped text of all descendant text and CDATA nodes, concatenated
    pub fn text(&self) -> DocumentResult<String> {
        let mut text = String::new();
        self.collect_text(&mut text)?;
        Ok(text)
    }

    fn collect_text(&self, out: &mut String) -> DocumentResult<()> {
        for node in &self.children {
            match node {
                Node::Element(element) => element.collect_text(out)?,
                Node::Text(raw) => {
                    let text = raw
                        .unescape()
                        .map_err(|e| DocumentError::Text(e.to_string()))?;
                    out.push_str(&text);
                }
                Node::CData(raw) => out.push_str(&String::from_utf8_lossy(raw)),
                Node::Comment(_) | Node::Instruction(_) => {}
            }
        }
        Ok(())
    }

    /// Text of the first direct child with the given local name
    pub fn child_text(&self, local_name: &str) -> DocumentResult<Option<String>> {
        self.child(local_name).map(Element::text).transpose()
    }

    /// Copy of this element whose children are replaced by a single text node
    pub fn with_text(&self, text: &str) -> Self {
        self.with_children(vec![Node::Text(BytesText::new(text).into_owned())])
    }

    /// Copy of this element with a new set of children
    pub fn with_children(&self, children: Vec<Node>) -> Self {
        Self {
            start: self.start.clone(),
            children,
        }
    }

    /// Copy of this element with the text of its first `local_name` child
    /// replaced, appending such a child if there is none
    pub fn with_child_text(&self, local_name: &str, text: &str) -> Self {
        let mut children = self.children.clone();
        let existing = children
            .iter_mut()
            .find_map(|node| match node {
                Node::Element(element) if element.is(local_name) => Some(element),
                _ => None,
            });

        match existing {
            Some(element) => *element = element.with_text(text),
            None => children.push(Node::Element(Element::with_text_content(local_name, text))),
        }

        self.with_children(children)
    }

    /// Copy of this element with the first descendant named `local_name`
    /// (depth first) passed through `replace`
    ///
    /// Returns `None` when no such descendant exists.
    pub fn with_first_replaced(
        &self,
        local_name: &str,
        replace: &mut dyn FnMut(&Element) -> Element,
    ) -> Option<Self> {
        for (index, node) in self.children.iter().enumerate() {
            let Node::Element(element) = node else {
                continue;
            };

            let replacement = if element.is(local_name) {
                Some(replace(element))
            } else {
                element.with_first_replaced(local_name, replace)
            };

            if let Some(replacement) = replacement {
                let mut children = self.children.clone();
                children[index] = Node::Element(replacement);
                return Some(self.with_children(children));
            }
        }
        None
    }

    /// Appends a child node; used when assembling new elements
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }
}

/// A parsed XML document
#[derive(Debug, Clone)]
pub struct Document {
    /// Declaration, doctype, comments and instructions before the root
    prolog: Vec<Event<'static>>,
    root: Element,
    /// Comments and instructions after the root
    epilog: Vec<Event<'static>>,
}

impl Document {
    /// Parses a document, rejecting anything that is not well formed
    pub fn parse(xml: &str) -> DocumentResult<Self> {
        let mut reader = Reader::from_str(xml);
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|e| DocumentError::Malformed {
                position: reader.buffer_position() as u64,
                message: e.to_string(),
            })?;
            let position = reader.buffer_position() as u64;

            let node = match event {
                Event::Start(start) => {
                    stack.push(Element {
                        start: start.into_owned(),
                        children: Vec::new(),
                    });
                    continue;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| DocumentError::Malformed {
                        position,
                        message: "unmatched end tag".to_string(),
                    })?;
                    Node::Element(element)
                }
                Event::Empty(start) => Node::Element(Element {
                    start: start.into_owned(),
                    children: Vec::new(),
                }),
                Event::Text(text) => {
                    if text.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    if stack.is_empty() {
                        return Err(DocumentError::Malformed {
                            position,
                            message: "text outside the root element".to_string(),
                        });
                    }
                    Node::Text(text.into_owned())
                }
                Event::CData(cdata) => Node::CData(cdata.into_owned()),
                Event::Comment(comment) => Node::Comment(comment.into_owned()),
                Event::PI(instruction) => Node::Instruction(instruction.into_owned()),
                Event::Decl(decl) => {
                    if root.is_some() || !stack.is_empty() || !prolog.is_empty() {
                        return Err(DocumentError::Malformed {
                            position,
                            message: "XML declaration must come first".to_string(),
                        });
                    }
                    prolog.push(Event::Decl(decl.into_owned()));
                    continue;
                }
                Event::DocType(doctype) => {
                    if root.is_some() || !stack.is_empty() {
                        return Err(DocumentError::Malformed {
                            position,
                            message: "doctype after the root element".to_string(),
                        });
                    }
                    prolog.push(Event::DocType(doctype.into_owned()));
                    continue;
                }
                Event::Eof => break,
            };

            if let Some(parent) = stack.last_mut() {
                parent.push(node);
                continue;
            }

            match node {
                Node::Element(element) => {
                    if root.is_some() {
                        return Err(DocumentError::Malformed {
                            position,
                            message: "more than one root element".to_string(),
                        });
                    }
                    root = Some(element);
                }
                Node::Comment(comment) => {
                    let event = Event::Comment(comment);
                    if root.is_some() {
                        epilog.push(event);
                    } else {
                        prolog.push(event);
                    }
                }
                Node::Instruction(instruction) => {
                    let event = Event::PI(instruction);
                    if root.is_some() {
                        epilog.push(event);
                    } else {
                        prolog.push(event);
                    }
                }
                Node::Text(_) | Node::CData(_) => {
                    return Err(DocumentError::Malformed {
                        position,
                        message: "character data outside the root element".to_string(),
                    });
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(DocumentError::Malformed {
                position: reader.buffer_position() as u64,
                message: format!("unclosed element <{}>", open.name()),
            });
        }

        let root = root.ok_or(DocumentError::MissingElement("root".to_string()))?;

        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Copy of this document with a different root, keeping prolog and epilog
    pub fn with_root(&self, root: Element) -> Self {
        Self {
            prolog: self.prolog.clone(),
            root,
            epilog: self.epilog.clone(),
        }
    }

    /// Serializes the document with two-space indentation and a trailing newline
    pub fn to_xml(&self) -> DocumentResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        for event in &self.prolog {
            write(&mut writer, event.clone())?;
        }
        write_element(&mut writer, &self.root)?;
        for event in &self.epilog {
            write(&mut writer, event.clone())?;
        }

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| DocumentError::Serialize(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> DocumentResult<()> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::Serialize(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> DocumentResult<()> {
    if element.children.is_empty() {
        return write(writer, Event::Empty(element.start.clone()));
    }

    write(writer, Event::Start(element.start.clone()))?;
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => write(writer, Event::Text(text.clone()))?,
            Node::CData(cdata) => write(writer, Event::CData(cdata.clone()))?,
            Node::Comment(comment) => write(writer, Event::Comment(comment.clone()))?,
            Node::Instruction(instruction) => write(writer, Event::PI(instruction.clone()))?,
        }
    }
    write(writer, Event::End(BytesEnd::new(element.name())))
}
