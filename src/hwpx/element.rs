use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::escape::escape_xml;
use crate::error::{HwpError, Result};

/// 출력 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XmlFormat {
    /// 태그 사이 공백 없이 한 줄로 출력 (텍스트 내부 공백은 유지)
    #[default]
    Compact,
    /// 2칸 들여쓰기
    Pretty,
}

/// 요소 트리의 자식 노드
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// HWPX 마크업 요소.
///
/// 속성은 추가한 순서대로 직렬화된다. 텍스트는 원문 그대로 보관하고
/// 직렬화할 때 한 번만 이스케이프한다.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl ToString) -> Self {
        self.set_attr(key, value);
        self
    }

    /// 같은 키가 있으면 값을 교체
    pub fn set_attr(&mut self, key: &'static str, value: impl ToString) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 속성 값을 숫자로 읽는다 (테스트와 크기 합산용)
    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        self.get_attr(key).and_then(|v| v.parse().ok())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// 이름이 같은 직계 자식 중 첫 번째
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.name == name)
    }

    /// 이름이 같은 모든 하위 요소 (문서 순서, 자기 자신 포함)
    pub fn descendants(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        if self.name == name {
            found.push(self);
        }
        for child in self.child_elements() {
            child.collect_descendants(name, found);
        }
    }

    /// 하위 텍스트 노드를 문서 순서대로 이어 붙인 값
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Element(el) => el.collect_text(out),
                Node::Text(text) => out.push_str(text),
            }
        }
    }

    /// XML 선언 없이 요소만 직렬화
    pub fn to_xml(&self, format: XmlFormat) -> Result<String> {
        let mut writer = new_writer(format);
        write_element(&mut writer, self)?;
        into_string(writer)
    }
}

/// `<?xml ... standalone="yes"?>` 선언과 함께 루트 요소를 직렬화
pub fn to_document(root: &Element, format: XmlFormat) -> Result<String> {
    let mut writer = new_writer(format);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_error)?;
    if format == XmlFormat::Compact {
        writer.get_mut().push(b'\n');
    }
    write_element(&mut writer, root)?;
    into_string(writer)
}

fn new_writer(format: XmlFormat) -> Writer<Vec<u8>> {
    match format {
        XmlFormat::Compact => Writer::new(Vec::new()),
        XmlFormat::Pretty => Writer::new_with_indent(Vec::new(), b' ', 2),
    }
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner()).map_err(|e| HwpError::Xml(e.to_string()))
}

fn xml_error(err: impl std::fmt::Display) -> HwpError {
    HwpError::Xml(err.to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name);
    for (key, value) in &element.attributes {
        start.push_attribute((*key, value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::from_escaped(escape_xml(text))))
                .map_err(xml_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name)))
        .map_err(xml_error)
}
