/*!
 * Lossless XML event stream for document parts.
 *
 * Parts are read into a flat list of events so paragraphs can be located by
 * index and rewritten without disturbing the surrounding markup. Attribute
 * values are kept in their raw, already-escaped form.
 */

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::DocumentError;

/// A single XML event of a part
#[derive(Clone, Debug, PartialEq)]
pub enum XmlEvent {
    Decl {
        version: String,
        encoding: Option<String>,
        standalone: Option<String>,
    },
    Start {
        name: String,
        attrs: Vec<(String, String)>,
    },
    End {
        name: String,
    },
    Empty {
        name: String,
        attrs: Vec<(String, String)>,
    },
    /// Unescaped character data
    Text {
        text: String,
    },
    CData {
        text: String,
    },
    Comment {
        text: String,
    },
    PI {
        content: String,
    },
    DocType {
        text: String,
    },
}

impl XmlEvent {
    /// Start tag without attributes
    pub fn start(name: &str) -> Self {
        Self::Start { name: name.to_string(), attrs: Vec::new() }
    }

    /// End tag
    pub fn end(name: &str) -> Self {
        Self::End { name: name.to_string() }
    }

    /// Self-closing tag without attributes
    pub fn empty(name: &str) -> Self {
        Self::Empty { name: name.to_string(), attrs: Vec::new() }
    }

    /// Attribute value by qualified name, for start-like events
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            Self::Start { attrs, .. } | Self::Empty { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// Parse a part into events
pub fn parse_events(xml_bytes: &[u8]) -> Result<Vec<XmlEvent>, DocumentError> {
    let mut reader = Reader::from_reader(xml_bytes);
    reader.config_mut().trim_text(false);

    let mut events = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            DocumentError::Parse(format!(
                "malformed XML at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;
        match event {
            Event::Eof => break,
            Event::Decl(d) => {
                let version = d.version().map(bytes_to_string).map_err(parse_error)?;
                let encoding = d
                    .encoding()
                    .transpose()
                    .map_err(parse_error)?
                    .map(bytes_to_string);
                let standalone = d
                    .standalone()
                    .transpose()
                    .map_err(parse_error)?
                    .map(bytes_to_string);
                events.push(XmlEvent::Decl { version, encoding, standalone });
            }
            Event::Start(s) => events.push(XmlEvent::Start {
                name: bytes_to_string(s.name().as_ref()),
                attrs: collect_attrs(&s)?,
            }),
            Event::End(e) => events.push(XmlEvent::End {
                name: bytes_to_string(e.name().as_ref()),
            }),
            Event::Empty(s) => events.push(XmlEvent::Empty {
                name: bytes_to_string(s.name().as_ref()),
                attrs: collect_attrs(&s)?,
            }),
            Event::Text(t) => {
                let text = t.unescape().map_err(parse_error)?.into_owned();
                events.push(XmlEvent::Text { text });
            }
            Event::CData(t) => events.push(XmlEvent::CData {
                text: bytes_to_string(t.into_inner()),
            }),
            Event::Comment(t) => events.push(XmlEvent::Comment {
                text: bytes_to_string(t.into_inner()),
            }),
            Event::PI(t) => {
                let target = bytes_to_string(t.target());
                let content = bytes_to_string(t.content());
                events.push(XmlEvent::PI { content: format!("{target}{content}") });
            }
            Event::DocType(t) => events.push(XmlEvent::DocType {
                text: bytes_to_string(t.into_inner()),
            }),
        }
    }

    if !stack_is_balanced(&events) {
        return Err(DocumentError::Parse("unbalanced XML elements".to_string()));
    }

    Ok(events)
}

fn stack_is_balanced(events: &[XmlEvent]) -> bool {
    let mut stack: Vec<&str> = Vec::new();
    for event in events {
        match event {
            XmlEvent::Start { name, .. } => stack.push(name),
            XmlEvent::End { name } => {
                if stack.pop() != Some(name.as_str()) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

fn collect_attrs(s: &BytesStart<'_>) -> Result<Vec<(String, String)>, DocumentError> {
    let mut attrs = Vec::new();
    for a in s.attributes() {
        let a = a.map_err(|e| DocumentError::Parse(format!("bad attribute: {}", e)))?;
        // Raw value; re-escaping on write would corrupt character references.
        attrs.push((bytes_to_string(a.key.as_ref()), bytes_to_string(a.value.as_ref())));
    }
    Ok(attrs)
}

fn parse_error(error: impl std::fmt::Display) -> DocumentError {
    DocumentError::Parse(error.to_string())
}

fn bytes_to_string(bytes: impl AsRef<[u8]>) -> String {
    String::from_utf8_lossy(bytes.as_ref()).into_owned()
}

/// Serialize events back into XML bytes
///
/// Fails when character data holds a character XML 1.0 does not allow.
pub fn write_events(events: &[XmlEvent]) -> Result<Vec<u8>, DocumentError> {
    let mut out: Vec<u8> = Vec::new();

    for event in events {
        match event {
            XmlEvent::Decl { version, encoding, standalone } => {
                out.extend_from_slice(b"<?xml version=\"");
                out.extend_from_slice(version.as_bytes());
                out.push(b'"');
                if let Some(encoding) = encoding {
                    out.extend_from_slice(b" encoding=\"");
                    out.extend_from_slice(encoding.as_bytes());
                    out.push(b'"');
                }
                if let Some(standalone) = standalone {
                    out.extend_from_slice(b" standalone=\"");
                    out.extend_from_slice(standalone.as_bytes());
                    out.push(b'"');
                }
                out.extend_from_slice(b"?>");
            }
            XmlEvent::Start { name, attrs } => write_start_like(&mut out, name, attrs, false),
            XmlEvent::End { name } => {
                out.extend_from_slice(b"</");
                out.extend_from_slice(name.as_bytes());
                out.push(b'>');
            }
            XmlEvent::Empty { name, attrs } => write_start_like(&mut out, name, attrs, true),
            XmlEvent::Text { text } => escape_text_into(&mut out, text)?,
            XmlEvent::CData { text } => {
                out.extend_from_slice(b"<![CDATA[");
                out.extend_from_slice(text.as_bytes());
                out.extend_from_slice(b"]]>");
            }
            XmlEvent::Comment { text } => {
                out.extend_from_slice(b"<!--");
                out.extend_from_slice(text.as_bytes());
                out.extend_from_slice(b"-->");
            }
            XmlEvent::PI { content } => {
                out.extend_from_slice(b"<?");
                out.extend_from_slice(content.as_bytes());
                out.extend_from_slice(b"?>");
            }
            XmlEvent::DocType { text } => {
                out.extend_from_slice(b"<!DOCTYPE");
                out.extend_from_slice(text.as_bytes());
                out.push(b'>');
            }
        }
    }

    Ok(out)
}

/// The XML 1.0 `Char` production
pub fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn escape_text_into(out: &mut Vec<u8>, text: &str) -> Result<(), DocumentError> {
    for ch in text.chars() {
        match ch {
            '&' => out.extend_from_slice(b"&amp;"),
            '<' => out.extend_from_slice(b"&lt;"),
            '>' => out.extend_from_slice(b"&gt;"),
            _ if !is_xml_char(ch) => {
                return Err(DocumentError::Serialization(format!(
                    "character U+{:04X} is not allowed in XML text",
                    ch as u32
                )));
            }
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    Ok(())
}

fn write_start_like(out: &mut Vec<u8>, name: &str, attrs: &[(String, String)], empty: bool) {
    out.push(b'<');
    out.extend_from_slice(name.as_bytes());
    for (k, v) in attrs {
        out.push(b' ');
        out.extend_from_slice(k.as_bytes());
        out.extend_from_slice(b"=\"");
        out.extend_from_slice(v.as_bytes());
        out.push(b'"');
    }
    if empty {
        out.extend_from_slice(b"/>");
    } else {
        out.push(b'>');
    }
}
