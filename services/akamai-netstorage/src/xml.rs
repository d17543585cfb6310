// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Decode NetStorage xml responses into json values.
//!
//! The shape follows the common xml-to-json convention used by the
//! NetStorage tooling:
//!
//! - the document becomes `{root_name: root_value}`
//! - attributes become keys prefixed with `_`
//! - child elements become keys, repeated children become arrays
//! - an element with neither attributes nor children becomes its text
//! - text next to attributes or children is kept under `__text`

use std::fmt::Debug;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

/// Prefix of attribute keys.
const ATTRIBUTE_PREFIX: &str = "_";
/// Key of mixed text content.
const TEXT_KEY: &str = "__text";

/// DecodeXml turns a response body into a json value.
pub trait DecodeXml: Debug + Send + Sync + 'static {
    /// Decode `xml`, returns `None` if the input can't be parsed.
    fn decode(&self, xml: &str) -> Option<Value>;
}

/// XmlDecoder is the default [`DecodeXml`] backed by quick-xml.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDecoder;

impl DecodeXml for XmlDecoder {
    fn decode(&self, xml: &str) -> Option<Value> {
        decode_document(xml)
    }
}

#[derive(Debug)]
struct Element {
    name: String,
    attrs: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Element {
    fn start(e: &BytesStart) -> Option<Self> {
        let mut attrs = Map::new();
        for attr in e.attributes() {
            let attr = attr.ok()?;
            let key = String::from_utf8_lossy(attr.key.as_ref());
            let value = attr.unescape_value().ok()?;
            attrs.insert(
                format!("{ATTRIBUTE_PREFIX}{key}"),
                Value::String(value.into_owned()),
            );
        }

        Some(Self {
            name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
            attrs,
            children: Map::new(),
            text: String::new(),
        })
    }

    fn push_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }

    fn finish(self) -> (String, Value) {
        if self.attrs.is_empty() && self.children.is_empty() {
            return (self.name, Value::String(self.text));
        }

        let mut m = self.attrs;
        m.extend(self.children);
        if !self.text.is_empty() {
            m.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        (self.name, Value::Object(m))
    }
}

fn decode_document(xml: &str) -> Option<Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        let finished = match reader.read_event().ok()? {
            Event::Start(e) => {
                if root.is_some() {
                    return None;
                }
                stack.push(Element::start(&e)?);
                None
            }
            Event::Empty(e) => {
                if root.is_some() {
                    return None;
                }
                Some(Element::start(&e)?)
            }
            Event::End(_) => Some(stack.pop()?),
            Event::Text(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&e.unescape().ok()?);
                }
                None
            }
            Event::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e));
                }
                None
            }
            Event::Eof => break,
            _ => None,
        };

        if let Some(element) = finished {
            let (name, value) = element.finish();
            match stack.last_mut() {
                Some(parent) => parent.push_child(name, value),
                None => {
                    let mut m = Map::with_capacity(1);
                    m.insert(name, value);
                    root = Some(Value::Object(m));
                }
            }
        }
    }

    if !stack.is_empty() {
        return None;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_stat() {
        let xml = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<stat directory="/12345/dir">
<file type="file" name="file.txt" mtime="1462104000" size="11" md5="5eb63bbbe01eeed093cb22bb8f5acdc3"/>
</stat>"#;

        assert_eq!(
            XmlDecoder.decode(xml),
            Some(json!({
                "stat": {
                    "_directory": "/12345/dir",
                    "file": {
                        "_type": "file",
                        "_name": "file.txt",
                        "_mtime": "1462104000",
                        "_size": "11",
                        "_md5": "5eb63bbbe01eeed093cb22bb8f5acdc3"
                    }
                }
            }))
        );
    }

    #[test]
    fn test_decode_repeated_children() {
        let xml = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<list>
<file type="dir" name="a"/>
<file type="file" name="b"/>
<file type="file" name="c"/>
<resume start="/12345/c"/>
</list>"#;

        assert_eq!(
            XmlDecoder.decode(xml),
            Some(json!({
                "list": {
                    "file": [
                        {"_type": "dir", "_name": "a"},
                        {"_type": "file", "_name": "b"},
                        {"_type": "file", "_name": "c"}
                    ],
                    "resume": {"_start": "/12345/c"}
                }
            }))
        );
    }

    #[test]
    fn test_decode_text() {
        let xml = r#"<?xml version="1.0"?><du-info><files>3</files><bytes>1024</bytes><note lang="en">a &amp; b</note><empty/></du-info>"#;

        assert_eq!(
            XmlDecoder.decode(xml),
            Some(json!({
                "du-info": {
                    "files": "3",
                    "bytes": "1024",
                    "note": {"_lang": "en", "__text": "a & b"},
                    "empty": ""
                }
            }))
        );
    }

    #[test]
    fn test_decode_cdata() {
        let xml = r#"<?xml version="1.0"?><message><![CDATA[<raw>]]></message>"#;
        assert_eq!(XmlDecoder.decode(xml), Some(json!({"message": "<raw>"})));
    }

    #[test]
    fn test_decode_invalid() {
        let cases = vec![
            "",
            "<?xml version=\"1.0\"?>",
            "<?xml version=\"1.0\"?><stat>",
            "<?xml version=\"1.0\"?><stat></list>",
            "<?xml version=\"1.0\"?><a/><b/>",
        ];

        for xml in cases {
            assert_eq!(XmlDecoder.decode(xml), None, "input: {xml}");
        }
    }
}
