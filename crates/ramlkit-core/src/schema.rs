//! Resolution of body `schema` / `example` payloads.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map as JsonMap, Value as JsonValue};

/// Resolves a schema or example value to its content.
///
/// Implementations must return the original value when it cannot be resolved.
pub trait SchemaLoader {
    fn load(&self, value: &JsonValue) -> JsonValue;
}

/// Decodes string payloads that hold inline JSON or XML; everything else
/// passes through.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineSchemaLoader;

impl SchemaLoader for InlineSchemaLoader {
    fn load(&self, value: &JsonValue) -> JsonValue {
        match value {
            JsonValue::String(s) => serde_json::from_str(s)
                .ok()
                .or_else(|| xml_to_json(s))
                .unwrap_or_else(|| JsonValue::String(s.clone())),
            other => other.clone(),
        }
    }
}

/// An element under construction.
#[derive(Default)]
struct Element {
    name: String,
    fields: JsonMap<String, JsonValue>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Option<Self> {
        let mut element = Element {
            name: std::str::from_utf8(start.name().as_ref()).ok()?.to_string(),
            ..Element::default()
        };
        for attr in start.attributes() {
            let attr = attr.ok()?;
            let key = std::str::from_utf8(attr.key.as_ref()).ok()?;
            let value = attr.unescape_value().ok()?;
            element
                .fields
                .insert(format!("@{}", key), JsonValue::String(value.into_owned()));
        }
        Some(element)
    }

    /// Children repeated under one name collect into a sequence.
    fn add_child(&mut self, name: String, value: JsonValue) {
        match self.fields.get_mut(&name) {
            Some(JsonValue::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = JsonValue::Array(vec![first, value]);
            }
            None => {
                self.fields.insert(name, value);
            }
        }
    }

    /// A bare element is its text (or `null` when empty); anything with
    /// attributes or children becomes a mapping with the text under `#text`.
    fn close(mut self) -> (String, JsonValue) {
        let value = match (self.fields.is_empty(), self.text.is_empty()) {
            (true, true) => JsonValue::Null,
            (true, false) => JsonValue::String(self.text),
            (false, text_empty) => {
                if !text_empty {
                    self.fields.insert("#text".to_string(), JsonValue::String(self.text));
                }
                JsonValue::Object(self.fields)
            }
        };
        (self.name, value)
    }
}

/// Convert an XML document into a JSON mapping keyed by the root element.
///
/// Attributes are prefixed with `@`. Returns `None` for anything that is not
/// a single well-formed XML document.
fn xml_to_json(text: &str) -> Option<JsonValue> {
    if !text.trim_start().starts_with('<') {
        return None;
    }
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<JsonValue> = None;
    loop {
        let finished = match reader.read_event().ok()? {
            Event::Start(start) => {
                stack.push(Element::open(&start)?);
                None
            }
            Event::Empty(start) => Some(Element::open(&start)?.close()),
            Event::End(_) => Some(stack.pop()?.close()),
            Event::Text(t) => {
                stack.last_mut()?.text.push_str(&t.unescape().ok()?);
                None
            }
            Event::CData(data) => {
                let data = String::from_utf8(data.into_inner().into_owned()).ok()?;
                stack.last_mut()?.text.push_str(&data);
                None
            }
            Event::Eof => break,
            _ => None,
        };
        if let Some((name, value)) = finished {
            match stack.last_mut() {
                Some(parent) => parent.add_child(name, value),
                None if root.is_none() => {
                    let mut document = JsonMap::new();
                    document.insert(name, value);
                    root = Some(JsonValue::Object(document));
                }
                // a second top-level element
                None => return None,
            }
        }
    }
    if stack.is_empty() {
        root
    } else {
        None
    }
}
