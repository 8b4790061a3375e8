//! A tagged XML document of the intermediate representation.
//!
//! ```xml
//! <graph>
//!   <container>
//!     <entry key="0" key-type="integer"><scalar type="integer">1</scalar></entry>
//!     <entry key="p" key-type="string">
//!       <object type="Point">
//!         <property name="x"><scalar type="float">1.5</scalar></property>
//!       </object>
//!     </entry>
//!     <entry key="1" key-type="integer"><reference index="0"/></entry>
//!   </container>
//! </graph>
//! ```
//!
//! Text inside `<scalar>` is kept verbatim. Whitespace between elements is
//! ignored.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use knot_object::Key;

use super::Strategy;
use crate::config::Limits;
use crate::error::StrategyError;
use crate::ir::{FIXED_PARENT, Node, Scalar, ScalarKind};

const GRAPH: &str = "graph";
const SCALAR: &str = "scalar";
const CONTAINER: &str = "container";
const ENTRY: &str = "entry";
const OBJECT: &str = "object";
const PROPERTY: &str = "property";
const REFERENCE: &str = "reference";
const FIXED: &str = "fixed";

const KEY_INTEGER: &str = "integer";
const KEY_STRING: &str = "string";

// -----------------------------------------------------------------------------
// XmlStrategy

/// Writes and reads the XML document form.
#[derive(Debug, Clone, Copy)]
pub struct XmlStrategy {
    indent: Option<usize>,
    max_depth: usize,
}

impl Default for XmlStrategy {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl XmlStrategy {
    #[inline]
    pub const fn new() -> Self {
        Self {
            indent: None,
            max_depth: Limits::DEFAULT.document_depth(),
        }
    }

    /// Indents nested elements by `width` spaces.
    #[inline]
    pub const fn with_indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// The deepest element nesting accepted when reading.
    ///
    /// Defaults to [`Limits::document_depth`] of [`Limits::DEFAULT`].
    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Strategy for XmlStrategy {
    type Output = String;

    fn encode(&self, node: &Node) -> Result<String, StrategyError> {
        let writer = match self.indent {
            Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
            None => Writer::new(Vec::new()),
        };
        let mut out = XmlWriter { writer };

        out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        out.start(BytesStart::new(GRAPH))?;
        out.node(node)?;
        out.end(GRAPH)?;

        String::from_utf8(out.writer.into_inner()).map_err(|e| StrategyError::Xml(e.to_string()))
    }

    fn decode(&self, output: String) -> Result<Node, StrategyError> {
        let root = parse_document(&output, self.max_depth)?;
        if root.name != GRAPH {
            return Err(StrategyError::Malformed(format!(
                "expected a `<{GRAPH}>` root, found `<{}>`",
                root.name
            )));
        }
        let child = root.single_child()?;
        read_node(child)
    }
}

// -----------------------------------------------------------------------------
// Writing

struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn event(&mut self, event: Event<'_>) -> Result<(), StrategyError> {
        self.writer
            .write_event(event)
            .map_err(|e| StrategyError::Xml(e.to_string()))
    }

    #[inline]
    fn start(&mut self, start: BytesStart<'_>) -> Result<(), StrategyError> {
        self.event(Event::Start(start))
    }

    #[inline]
    fn end(&mut self, name: &str) -> Result<(), StrategyError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn node(&mut self, node: &Node) -> Result<(), StrategyError> {
        match node {
            Node::Scalar(scalar) => self.scalar(scalar),
            Node::Container(entries) => {
                self.start(BytesStart::new(CONTAINER))?;
                self.entries(entries)?;
                self.end(CONTAINER)
            }
            Node::Object {
                type_name,
                properties,
            } => {
                self.start(BytesStart::new(OBJECT).with_attributes([("type", type_name.as_str())]))?;
                for (name, value) in properties {
                    self.start(BytesStart::new(PROPERTY).with_attributes([("name", name.as_str())]))?;
                    self.node(value)?;
                    self.end(PROPERTY)?;
                }
                self.end(OBJECT)
            }
            Node::Reference(index) => {
                let index = index.to_string();
                self.event(Event::Empty(
                    BytesStart::new(REFERENCE).with_attributes([("index", index.as_str())]),
                ))
            }
            Node::Fixed { type_name, entries } => {
                self.start(
                    BytesStart::new(FIXED)
                        .with_attributes([("type", type_name.as_str()), ("parent", FIXED_PARENT)]),
                )?;
                self.entries(entries)?;
                self.end(FIXED)
            }
        }
    }

    fn entries(&mut self, entries: &[(Key, Node)]) -> Result<(), StrategyError> {
        for (key, value) in entries {
            let (text, key_type) = match key {
                Key::Int(i) => (i.to_string(), KEY_INTEGER),
                Key::Str(s) => (s.clone(), KEY_STRING),
            };
            self.start(
                BytesStart::new(ENTRY)
                    .with_attributes([("key", text.as_str()), ("key-type", key_type)]),
            )?;
            self.node(value)?;
            self.end(ENTRY)?;
        }
        Ok(())
    }

    fn scalar(&mut self, scalar: &Scalar) -> Result<(), StrategyError> {
        let start = BytesStart::new(SCALAR).with_attributes([("type", scalar.kind().tag())]);
        let text = match scalar {
            Scalar::Null => return self.event(Event::Empty(start)),
            Scalar::Boolean(b) => b.to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::String(s) => s.clone(),
        };
        self.start(start)?;
        // Written even when empty, so the closing tag stays on the same line.
        self.event(Event::Text(BytesText::new(&text)))?;
        self.end(SCALAR)
    }
}

// -----------------------------------------------------------------------------
// Reading

/// A parsed element. `text` concatenates every text and CDATA child.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn attribute(&self, name: &str) -> Result<&str, StrategyError> {
        self.attributes
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v.as_str()))
            .ok_or_else(|| {
                StrategyError::Malformed(format!("`<{}>` lacks the `{name}` attribute", self.name))
            })
    }

    fn single_child(&self) -> Result<&Element, StrategyError> {
        match self.children.as_slice() {
            [child] => Ok(child),
            children => Err(StrategyError::Malformed(format!(
                "`<{}>` must have exactly one child element, found {}",
                self.name,
                children.len()
            ))),
        }
    }

    fn check_name(&self, name: &str) -> Result<(), StrategyError> {
        if self.name == name {
            Ok(())
        } else {
            Err(StrategyError::Malformed(format!(
                "expected `<{name}>`, found `<{}>`",
                self.name
            )))
        }
    }
}

fn parse_element(start: &BytesStart<'_>) -> Result<Element, StrategyError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| StrategyError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| StrategyError::Xml(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn check_depth(depth: usize, max_depth: usize) -> Result<(), StrategyError> {
    if depth >= max_depth {
        return Err(StrategyError::Malformed(format!(
            "element nesting exceeds {max_depth}"
        )));
    }
    Ok(())
}

fn parse_document(text: &str, max_depth: usize) -> Result<Element, StrategyError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    fn attach(
        stack: &mut [Element],
        root: &mut Option<Element>,
        element: Element,
    ) -> Result<(), StrategyError> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_none() => *root = Some(element),
            None => return Err(StrategyError::malformed("more than one root element")),
        }
        Ok(())
    }

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                check_depth(stack.len(), max_depth)?;
                stack.push(parse_element(&start)?);
            }
            Ok(Event::End(_)) => {
                let Some(element) = stack.pop() else {
                    return Err(StrategyError::malformed("unbalanced closing tag"));
                };
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Empty(start)) => {
                check_depth(stack.len(), max_depth)?;
                let element = parse_element(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().map_err(|e| StrategyError::Xml(e.to_string()))?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(StrategyError::malformed("text outside the root element")),
                }
            }
            Ok(Event::CData(data)) => {
                let data = String::from_utf8_lossy(&data.into_inner()).into_owned();
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&data),
                    None => return Err(StrategyError::malformed("CDATA outside the root element")),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(StrategyError::Xml(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(StrategyError::malformed("unexpected end of document"));
    }
    root.ok_or_else(|| StrategyError::malformed("empty document"))
}

fn read_node(element: &Element) -> Result<Node, StrategyError> {
    if element.name != SCALAR && !element.text.trim().is_empty() {
        return Err(StrategyError::Malformed(format!(
            "unexpected text inside `<{}>`",
            element.name
        )));
    }

    match element.name.as_str() {
        SCALAR => read_scalar(element).map(Node::Scalar),
        CONTAINER => Ok(Node::Container(read_entries(element)?)),
        OBJECT => {
            let type_name = element.attribute("type")?.to_owned();
            let mut properties = Vec::with_capacity(element.children.len());
            for property in &element.children {
                property.check_name(PROPERTY)?;
                let name = property.attribute("name")?.to_owned();
                properties.push((name, read_node(property.single_child()?)?));
            }
            Ok(Node::Object {
                type_name,
                properties,
            })
        }
        REFERENCE => {
            let index = element.attribute("index")?;
            index
                .parse()
                .map(Node::Reference)
                .map_err(|_| StrategyError::Malformed(format!("invalid reference index `{index}`")))
        }
        FIXED => {
            let parent = element.attribute("parent")?;
            if parent != FIXED_PARENT {
                return Err(StrategyError::Malformed(format!(
                    "fixed container with parent `{parent}`"
                )));
            }
            Ok(Node::Fixed {
                type_name: element.attribute("type")?.to_owned(),
                entries: read_entries(element)?,
            })
        }
        other => Err(StrategyError::Malformed(format!("unknown element `<{other}>`"))),
    }
}

fn read_entries(element: &Element) -> Result<Vec<(Key, Node)>, StrategyError> {
    let mut entries = Vec::with_capacity(element.children.len());
    for entry in &element.children {
        entry.check_name(ENTRY)?;
        let key = entry.attribute("key")?;
        let key = match entry.attribute("key-type")? {
            KEY_INTEGER => Key::Int(
                key.parse()
                    .map_err(|_| StrategyError::Malformed(format!("invalid integer key `{key}`")))?,
            ),
            KEY_STRING => Key::Str(key.to_owned()),
            other => {
                return Err(StrategyError::Malformed(format!("unknown key type `{other}`")));
            }
        };
        entries.push((key, read_node(entry.single_child()?)?));
    }
    Ok(entries)
}

fn read_scalar(element: &Element) -> Result<Scalar, StrategyError> {
    let tag = element.attribute("type")?;
    let text = element.text.as_str();
    let invalid = || StrategyError::Malformed(format!("invalid {tag} scalar `{text}`"));

    Ok(match ScalarKind::from_tag(tag) {
        Some(ScalarKind::Null) => Scalar::Null,
        Some(ScalarKind::Boolean) => match text.trim() {
            "true" | "1" => Scalar::Boolean(true),
            "false" | "0" | "" => Scalar::Boolean(false),
            _ => return Err(invalid()),
        },
        Some(ScalarKind::Integer) => Scalar::Integer(text.trim().parse().map_err(|_| invalid())?),
        Some(ScalarKind::Float) => Scalar::Float(text.trim().parse().map_err(|_| invalid())?),
        Some(ScalarKind::String) => Scalar::String(text.to_owned()),
        None => {
            return Err(StrategyError::Malformed(format!("unknown scalar type `{tag}`")));
        }
    })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use knot_object::Key;

    use super::XmlStrategy;
    use crate::ir::{Node, Scalar};
    use crate::strategy::Strategy;

    fn sample() -> Node {
        Node::Container(vec![
            (Key::Int(0), Node::Scalar(Scalar::String("  <a & \"b\">\n ".into()))),
            (Key::from("empty"), Node::Scalar(Scalar::String(String::new()))),
            (
                Key::from("p"),
                Node::Object {
                    type_name: "app.Point".into(),
                    properties: vec![
                        ("x".into(), Node::Scalar(Scalar::Float(-0.25))),
                        ("self".into(), Node::Reference(0)),
                        ("n".into(), Node::null()),
                    ],
                },
            ),
            (
                Key::Int(1),
                Node::Fixed {
                    type_name: "FixedArray".into(),
                    entries: vec![(Key::Int(0), Node::Scalar(Scalar::Boolean(true)))],
                },
            ),
        ])
    }

    #[test]
    fn round_trip() {
        for strategy in [XmlStrategy::new(), XmlStrategy::new().with_indent(2)] {
            let text = strategy.encode(&sample()).unwrap();
            assert_eq!(strategy.decode(text).unwrap(), sample());
        }
    }

    #[test]
    fn escaping() {
        let text = XmlStrategy::new().encode(&sample()).unwrap();
        assert!(text.contains("&lt;a &amp;"));
        assert!(text.contains(r#"type="app.Point""#));
    }

    #[test]
    fn malformed_documents() {
        let strategy = XmlStrategy::new();
        assert!(strategy.decode("<graph></graph>".into()).is_err());
        assert!(strategy.decode("<other><scalar type=\"NULL\"/></other>".into()).is_err());
        assert!(strategy.decode("<graph><reference index=\"x\"/></graph>".into()).is_err());
        assert!(strategy.decode("<graph><scalar type=\"integer\">1.5</scalar></graph>".into()).is_err());
        assert!(strategy.decode("<graph><container>".into()).is_err());
    }

    #[test]
    fn depth_limit() {
        let strategy = XmlStrategy::new().with_max_depth(3);
        let deep = "<graph><container><entry key=\"0\" key-type=\"integer\"><container/></entry></container></graph>";
        assert!(strategy.decode(deep.into()).is_err());
        assert!(XmlStrategy::new().decode(deep.into()).is_ok());
    }
}
