// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Owned element tree for L5X documents.
//!
//! Input is parsed with `roxmltree` and copied into [`Element`] values so the
//! codec can both read what a file contains and emit new elements of the same
//! shape. The writer is deterministic: attributes keep insertion order and
//! indentation is fixed, which keeps re-emitted files diffable.

use crate::error::Result;
use std::fmt::Write as _;

/// A single XML element with ordered attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse XML text and return its root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        Ok(Self::from_node(doc.root_element()))
    }

    /// Copy a `roxmltree` node (and its subtree) into an owned element.
    ///
    /// Whitespace-only text is dropped; CDATA sections arrive as text.
    pub fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = Self::new(node.tag_name().name());
        for attr in node.attributes() {
            element
                .attributes
                .push((attr.name().to_string(), attr.value().to_string()));
        }

        let mut text = String::new();
        for child in node.children() {
            if child.is_element() {
                element.children.push(Self::from_node(child));
            } else if child.is_text() {
                if let Some(t) = child.text() {
                    text.push_str(t);
                }
            }
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            element.text = Some(trimmed.to_string());
        }
        element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attributes.push((key, value));
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// First direct child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children with the given tag name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Pre-order traversal including `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Serialize this element (without an XML declaration).
    pub fn to_xml(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write_into(&mut out, 0, indent);
        out
    }

    fn write_into(&self, out: &mut String, depth: usize, indent: usize) {
        let pad = " ".repeat(depth * indent);
        let _ = write!(out, "{pad}<{}", self.name);
        for (k, v) in &self.attributes {
            let _ = write!(out, " {k}=\"{}\"", escape(v));
        }

        match (&self.text, self.children.is_empty()) {
            (None, true) => out.push_str("/>"),
            (Some(text), true) => {
                let _ = write!(out, ">{}</{}>", escape(text), self.name);
            }
            (text, false) => {
                out.push('>');
                if let Some(text) = text {
                    out.push_str(&escape(text));
                }
                for child in &self.children {
                    if indent > 0 {
                        out.push('\n');
                    }
                    child.write_into(out, depth + 1, indent);
                }
                if indent > 0 {
                    out.push('\n');
                    out.push_str(&pad);
                }
                let _ = write!(out, "</{}>", self.name);
            }
        }
    }
}

/// Iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A parsed interchange document.
///
/// Regions are looked up under the `Controller` element, which is either the
/// root itself or a direct child of the `RSLogix5000Content` root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn parse(xml: &str) -> Result<Self> {
        Ok(Self {
            root: Element::parse(xml)?,
        })
    }

    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn controller(&self) -> Option<&Element> {
        if self.root.name() == "Controller" {
            Some(&self.root)
        } else {
            self.root.child("Controller")
        }
    }

    /// Children of `Controller/<region>` named `item`.
    pub fn region<'a>(&'a self, region: &'a str, item: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.controller()
            .and_then(|c| c.child(region))
            .into_iter()
            .flat_map(move |r| r.children_named(item))
    }

    /// Controller-scoped tags.
    pub fn tags(&self) -> impl Iterator<Item = &Element> + '_ {
        self.region("Tags", "Tag")
    }

    pub fn to_xml(&self, indent: usize) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        out.push_str(&self.root.to_xml(indent));
        out.push('\n');
        out
    }
}
