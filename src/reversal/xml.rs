//! Reading and rewriting the root element of reversal configuration files

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};
use roxmltree::Document;

pub const NAME_ATTRIBUTE: &str = "name";
pub const WRITING_SYSTEM_ATTRIBUTE: &str = "writingSystem";

/// The identifying attributes of a reversal configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalHeader {
    pub name: Option<String>,
    pub writing_system: Option<String>,
}

pub fn read_header(content: &str) -> Result<ReversalHeader, String> {
    let doc = Document::parse(content).map_err(|e| e.to_string())?;
    let root = doc.root_element();
    Ok(ReversalHeader {
        name: root.attribute(NAME_ATTRIBUTE).map(str::to_string),
        writing_system: root
            .attribute(WRITING_SYSTEM_ATTRIBUTE)
            .map(str::to_string),
    })
}

/// Copy `template`, replacing the root element's name and writing system
/// attributes. Everything else is written through unchanged.
pub fn rewrite_header(template: &str, name: &str, writing_system: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(template);
    let mut writer = Writer::new(Vec::new());
    let mut root_seen = false;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;
        let event = match event {
            Event::Eof => break,
            Event::Start(start) if !root_seen => {
                root_seen = true;
                Event::Start(with_header(&start, name, writing_system)?)
            }
            Event::Empty(start) if !root_seen => {
                root_seen = true;
                Event::Empty(with_header(&start, name, writing_system)?)
            }
            other => other,
        };
        writer.write_event(event).map_err(|e| e.to_string())?;
    }

    if !root_seen {
        return Err("template has no root element".to_string());
    }
    String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())
}

fn with_header(start: &BytesStart<'_>, name: &str, writing_system: &str) -> Result<BytesStart<'static>, String> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = BytesStart::new(tag);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = attribute.key.as_ref();
        if key == NAME_ATTRIBUTE.as_bytes() || key == WRITING_SYSTEM_ATTRIBUTE.as_bytes() {
            continue;
        }
        element.push_attribute(attribute);
    }

    element.push_attribute((NAME_ATTRIBUTE, name));
    element.push_attribute((WRITING_SYSTEM_ATTRIBUTE, writing_system));
    Ok(element)
}
