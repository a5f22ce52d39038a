// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Cursor;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::FeedError;

/// iTunes podcast extension namespace URI
pub const ITUNES_NS: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";

/// Atom namespace URI, used for the feed self-link
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// XML namespace of a feed element
///
/// Part of an element's identity, not decoration: `<image>` and
/// `<itunes:image>` are different element types that coexist in one
/// channel. Both prefixes are declared once on the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Default RSS 2.0 namespace (no prefix)
    Rss,
    ITunes,
    Atom,
}

impl Namespace {
    pub fn prefix(self) -> Option<&'static str> {
        match self {
            Namespace::Rss => None,
            Namespace::ITunes => Some("itunes"),
            Namespace::Atom => Some("atom"),
        }
    }

    pub fn uri(self) -> Option<&'static str> {
        match self {
            Namespace::Rss => None,
            Namespace::ITunes => Some(ITUNES_NS),
            Namespace::Atom => Some(ATOM_NS),
        }
    }
}

/// One node of the feed document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub ns: Namespace,
    pub name: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(ns: Namespace, name: &'static str) -> Self {
        Self {
            ns,
            name,
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Shorthand for a leaf element carrying only text
    pub fn text(ns: Namespace, name: &'static str, text: impl Into<String>) -> Self {
        let mut element = Self::new(ns, name);
        element.text = Some(text.into());
        element
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    fn qualified_name(&self) -> String {
        match self.ns.prefix() {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.to_string(),
        }
    }

    /// Find the first direct child with the given namespace and name
    pub fn find(&self, ns: Namespace, name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|c| c.ns == ns && c.name == name)
    }
}

/// Render a document tree to XML text
///
/// Emits the UTF-8 declaration and two-space indented elements; text and
/// attribute values are escaped by the writer. Childless, textless
/// elements render self-closing.
pub fn render(root: &Element) -> Result<String, FeedError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(FeedError::RenderFailed)?;
    write_element(&mut writer, root)?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

fn write_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    element: &Element,
) -> Result<(), FeedError> {
    let tag = element.qualified_name();

    let mut start = BytesStart::new(tag.as_str());
    for (name, value) in &element.attrs {
        start.push_attribute((*name, value.as_str()));
    }

    if element.text.is_none() && element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(FeedError::RenderFailed);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(FeedError::RenderFailed)?;

    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(FeedError::RenderFailed)?;
    }

    for child in &element.children {
        write_element(writer, child)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(tag.as_str())))
        .map_err(FeedError::RenderFailed)
}

/// Render the tree and write it to `path`, creating parent directories
///
/// Creates or overwrites exactly one file; never deletes or appends.
pub fn write_feed(root: &Element, path: &Path) -> Result<(), FeedError> {
    let xml = render(root)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| FeedError::CreateDirectoryFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, xml).map_err(|e| FeedError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn render_starts_with_declaration() {
        let root = Element::new(Namespace::Rss, "rss");
        let xml = render(&root).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    }

    #[test]
    fn render_indents_nested_elements_two_spaces() {
        let mut root = Element::new(Namespace::Rss, "rss");
        let mut channel = Element::new(Namespace::Rss, "channel");
        channel.push(Element::text(Namespace::Rss, "title", "Show"));
        root.push(channel);

        let xml = render(&root).unwrap();
        assert!(xml.contains("\n  <channel>"));
        assert!(xml.contains("\n    <title>Show</title>"));
    }

    #[test]
    fn render_prefixes_namespaced_elements() {
        let mut root = Element::new(Namespace::Rss, "channel");
        root.push(Element::text(Namespace::ITunes, "author", "Someone"));
        root.push(
            Element::new(Namespace::Atom, "link").attr("rel", "self"),
        );

        let xml = render(&root).unwrap();
        assert!(xml.contains("<itunes:author>Someone</itunes:author>"));
        assert!(xml.contains("<atom:link rel=\"self\"/>"));
    }

    #[test]
    fn render_escapes_text_and_attributes() {
        let mut root = Element::new(Namespace::Rss, "item");
        root.push(Element::text(Namespace::Rss, "title", "Fish & Chips <live>"));
        root.push(
            Element::new(Namespace::Rss, "enclosure")
                .attr("url", "https://example.com/a.mp3?rlkey=k&dl=1"),
        );

        let xml = render(&root).unwrap();
        assert!(xml.contains("Fish &amp; Chips &lt;live&gt;"));
        assert!(xml.contains("url=\"https://example.com/a.mp3?rlkey=k&amp;dl=1\""));
    }

    #[test]
    fn empty_element_self_closes() {
        let root = Element::new(Namespace::ITunes, "image").attr("href", "https://x/c.jpg");
        let xml = render(&root).unwrap();
        assert!(xml.contains("<itunes:image href=\"https://x/c.jpg\"/>"));
    }

    #[test]
    fn write_feed_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs").join("feed.xml");
        let root = Element::new(Namespace::Rss, "rss");

        write_feed(&root, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<rss/>"));
    }

    #[test]
    fn write_feed_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feed.xml");
        std::fs::write(&path, "stale content").unwrap();

        let root = Element::new(Namespace::Rss, "rss");
        write_feed(&root, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale"));
    }
}
