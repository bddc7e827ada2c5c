/*!
 * Body paragraphs of a WordprocessingML main part.
 *
 * Only paragraphs that are direct children of `w:body` are elements; those
 * nested in tables, text boxes or other containers are left alone. A
 * paragraph's text is the content of its runs, either directly under the
 * paragraph or under a hyperlink.
 */

use crate::errors::DocumentError;

use super::xml::XmlEvent;

const BODY: &str = "w:body";
const PARAGRAPH: &str = "w:p";
const PARAGRAPH_PROPS: &str = "w:pPr";
const HYPERLINK: &str = "w:hyperlink";
const RUN: &str = "w:r";
const RUN_PROPS: &str = "w:rPr";
const TEXT: &str = "w:t";
const TAB: &str = "w:tab";
const BREAK: &str = "w:br";
const CARRIAGE_RETURN: &str = "w:cr";

/// Event range covering one body paragraph, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphSpan {
    pub start: usize,
    pub end: usize,
}

/// Locate the body paragraphs in document order
pub fn locate_paragraphs(events: &[XmlEvent]) -> Result<Vec<ParagraphSpan>, DocumentError> {
    let mut spans = Vec::new();
    let mut stack: Vec<&str> = Vec::new();
    let mut saw_body = false;
    let mut open: Option<(usize, usize)> = None;

    for (idx, event) in events.iter().enumerate() {
        match event {
            XmlEvent::Start { name, .. } => {
                if name == BODY {
                    saw_body = true;
                }
                if name == PARAGRAPH && open.is_none() && stack.last() == Some(&BODY) {
                    open = Some((idx, stack.len()));
                }
                stack.push(name);
            }
            XmlEvent::End { .. } => {
                stack.pop();
                if let Some((start, depth)) = open {
                    if stack.len() == depth {
                        spans.push(ParagraphSpan { start, end: idx });
                        open = None;
                    }
                }
            }
            XmlEvent::Empty { name, .. } => {
                if name == BODY {
                    saw_body = true;
                }
                if name == PARAGRAPH && open.is_none() && stack.last() == Some(&BODY) {
                    spans.push(ParagraphSpan { start: idx, end: idx });
                }
            }
            _ => {}
        }
    }

    if !saw_body {
        return Err(DocumentError::MissingPart(BODY.to_string()));
    }
    Ok(spans)
}

/// Whether the open elements, paragraph first, put us directly inside a run
fn inside_run(path: &[&str]) -> bool {
    matches!(path, [PARAGRAPH, RUN] | [PARAGRAPH, HYPERLINK, RUN])
}

/// Text content of the paragraph at `span`
pub fn paragraph_text(events: &[XmlEvent], span: ParagraphSpan) -> String {
    let mut text = String::new();
    let mut path: Vec<&str> = Vec::new();

    for event in &events[span.start..=span.end] {
        match event {
            XmlEvent::Start { name, .. } => path.push(name),
            XmlEvent::End { .. } => {
                path.pop();
            }
            XmlEvent::Text { text: chunk } => {
                if let Some((&TEXT, parent)) = path.split_last() {
                    if inside_run(parent) {
                        text.push_str(chunk);
                    }
                }
            }
            XmlEvent::Empty { name, .. } if inside_run(&path) => match name.as_str() {
                TAB => text.push('\t'),
                CARRIAGE_RETURN => text.push('\n'),
                BREAK if is_line_break(event) => text.push('\n'),
                _ => {}
            },
            _ => {}
        }
    }

    text
}

fn is_line_break(event: &XmlEvent) -> bool {
    matches!(event.attr("w:type"), None | Some("textWrapping"))
}

/// Events of the subtree starting at `start`, which must be a start-like event
fn subtree(events: &[XmlEvent], start: usize) -> &[XmlEvent] {
    if let XmlEvent::Empty { .. } = events[start] {
        return &events[start..=start];
    }
    let mut depth = 0usize;
    for (offset, event) in events[start..].iter().enumerate() {
        match event {
            XmlEvent::Start { .. } => depth += 1,
            XmlEvent::End { .. } => {
                depth -= 1;
                if depth == 0 {
                    return &events[start..=start + offset];
                }
            }
            _ => {}
        }
    }
    &events[start..]
}

/// Replacement events for the paragraph at `span` carrying `text`.
///
/// Paragraph properties and the first run's properties are kept; all other
/// content is replaced by a single run. Tabs and line breaks in `text` become
/// `w:tab` and `w:br`.
pub fn rewrite_paragraph(events: &[XmlEvent], span: ParagraphSpan, text: &str) -> Vec<XmlEvent> {
    let paragraph_attrs = match &events[span.start] {
        XmlEvent::Start { attrs, .. } | XmlEvent::Empty { attrs, .. } => attrs.clone(),
        _ => Vec::new(),
    };

    let mut paragraph_props: Vec<XmlEvent> = Vec::new();
    let mut run_props: Option<Vec<XmlEvent>> = None;
    if span.end > span.start {
        let mut path: Vec<&str> = Vec::new();
        for idx in span.start..=span.end {
            let event = &events[idx];
            let name = match event {
                XmlEvent::Start { name, .. } | XmlEvent::Empty { name, .. } => Some(name.as_str()),
                _ => None,
            };
            if path.len() == 1 && name == Some(PARAGRAPH_PROPS) && paragraph_props.is_empty() {
                paragraph_props = subtree(events, idx).to_vec();
            }
            if run_props.is_none() && name == Some(RUN_PROPS) && inside_run(&path) {
                run_props = Some(subtree(events, idx).to_vec());
            }
            match event {
                XmlEvent::Start { name, .. } => path.push(name),
                XmlEvent::End { .. } => {
                    path.pop();
                }
                _ => {}
            }
        }
    }

    let mut out = vec![XmlEvent::Start {
        name: PARAGRAPH.to_string(),
        attrs: paragraph_attrs,
    }];
    out.extend(paragraph_props);
    if !text.is_empty() {
        out.push(XmlEvent::start(RUN));
        out.extend(run_props.unwrap_or_default());
        push_run_content(&mut out, text);
        out.push(XmlEvent::end(RUN));
    }
    out.push(XmlEvent::end(PARAGRAPH));
    out
}

fn push_run_content(out: &mut Vec<XmlEvent>, text: &str) {
    let mut pending = String::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\t' => {
                flush_text(out, &mut pending);
                out.push(XmlEvent::empty(TAB));
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                flush_text(out, &mut pending);
                out.push(XmlEvent::empty(BREAK));
            }
            _ => pending.push(ch),
        }
    }
    flush_text(out, &mut pending);
}

fn flush_text(out: &mut Vec<XmlEvent>, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let mut attrs = Vec::new();
    if pending.starts_with(char::is_whitespace) || pending.ends_with(char::is_whitespace) {
        attrs.push(("xml:space".to_string(), "preserve".to_string()));
    }
    out.push(XmlEvent::Start { name: TEXT.to_string(), attrs });
    out.push(XmlEvent::Text { text: std::mem::take(pending) });
    out.push(XmlEvent::end(TEXT));
}
