//! Owned element tree built from quick-xml events
//!
//! USLM titles are parsed once into a small DOM so the section parser can look ahead
//! (tables, opening quotes) before committing to a walk. Namespace prefixes are
//! resolved while reading; elements carry their namespace URI.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::statute::error::{ParseError, ParseResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn identifier(&self) -> Option<&str> {
        self.attr("identifier")
    }

    /// True for an element of the given local name in the USLM namespace. Elements
    /// with no namespace at all are accepted too, for hand-written fragments.
    pub fn is_uslm(&self, name: &str) -> bool {
        self.name == name
            && matches!(self.namespace.as_deref(), None | Some(super::USLM_NAMESPACE))
    }

    pub fn is_xhtml(&self, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(super::XHTML_NAMESPACE)
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// Whether any strict descendant satisfies `pred`.
    pub fn any_descendant(&self, pred: &dyn Fn(&XmlElement) -> bool) -> bool {
        self.elements()
            .any(|child| pred(child) || child.any_descendant(pred))
    }

    /// Concatenated text of the element and all of its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// Parses a whole document and returns its root element.
pub fn parse_document(xml: &str) -> ParseResult<XmlElement> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| ParseError::Xml(e.to_string()))?;
        match event {
            Event::Start(start) => {
                let el = open_element(ns, &start)?;
                stack.push(el);
            }
            Event::Empty(start) => {
                let el = open_element(ns, &start)?;
                attach(&mut stack, &mut root, XmlNode::Element(el))?;
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| ParseError::Xml("unbalanced end tag".into()))?;
                attach(&mut stack, &mut root, XmlNode::Element(el))?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ParseError::Xml(e.to_string()))?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&mut stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::Xml("unexpected end of document".into()));
    }
    root.ok_or_else(|| ParseError::Xml("document has no root element".into()))
}

fn open_element(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> ParseResult<XmlElement> {
    let namespace = match ns {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        _ => None,
    };
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError::Xml(e.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::Xml(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        namespace,
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    node: XmlNode,
) -> ParseResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => match node {
            XmlNode::Element(el) if root.is_none() => *root = Some(el),
            _ => return Err(ParseError::Xml("content after the root element".into())),
        },
    }
    Ok(())
}

// Pretty-printing whitespace between elements carries no text.
fn push_text(stack: &mut [XmlElement], text: &str) {
    if text.trim().is_empty() && text.contains('\n') {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        match parent.children.last_mut() {
            Some(XmlNode::Text(prev)) => prev.push_str(text),
            _ => parent.children.push(XmlNode::Text(text.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statute::uslm::{USLM_NAMESPACE, XHTML_NAMESPACE};

    #[test]
    fn resolves_default_and_prefixed_namespaces() {
        let xml = format!(
            r#"<section xmlns="{USLM_NAMESPACE}" xmlns:x="{XHTML_NAMESPACE}" identifier="/us/usc/t1/s1">
  <content>A <x:b>bold</x:b> word &amp; more</content>
</section>"#
        );
        let root = parse_document(&xml).unwrap();
        assert!(root.is_uslm("section"));
        assert_eq!(root.identifier(), Some("/us/usc/t1/s1"));
        let content = root.elements().next().unwrap();
        assert!(content.is_uslm("content"));
        assert!(content.elements().next().unwrap().is_xhtml("b"));
        assert_eq!(content.text(), "A bold word & more");
    }

    #[test]
    fn drops_formatting_whitespace_only() {
        let root = parse_document("<a>\n  <b> </b>\n</a>").unwrap();
        assert_eq!(root.children.len(), 1);
        let b = root.elements().next().unwrap();
        assert_eq!(b.text(), " ");
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(matches!(
            parse_document("<a><b></a>"),
            Err(ParseError::Xml(_))
        ));
    }

    #[test]
    fn any_descendant_searches_deeply() {
        let root = parse_document("<a><b><c><layout/></c></b></a>").unwrap();
        assert!(root.any_descendant(&|el| el.name == "layout"));
        assert!(!root.any_descendant(&|el| el.name == "table"));
    }
}
