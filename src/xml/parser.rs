//! XML parser implementation

use indexmap::IndexMap;

use crate::config::Config;
use crate::cursor::Cursor;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::node::XmlNode;

/// XML parser producing an [`XmlNode`] tree
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default limits
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
        }
    }

    /// Parse a complete document and return its root element
    pub fn parse(&mut self) -> Result<XmlNode> {
        let len = self.cursor.remaining().len();
        if self.config.size_exceeded(len) {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                0,
                1,
                1,
            ));
        }

        if self.cursor.starts_with(UTF8_BOM) {
            self.cursor.advance_by(UTF8_BOM.len());
        }
        self.skip_misc()?;
        if self.cursor.is_eof() {
            return Err(self.error_here("missing root element"));
        }
        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.error_here("content after root element"));
        }

        Ok(root)
    }

    /// Skip whitespace, comments, processing instructions and doctype outside the root
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
            } else if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
            } else if self.cursor.starts_with(b"<!DOCTYPE") {
                self.cursor.advance_by(9);
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self) -> Result<XmlNode> {
        self.depth = self.depth.saturating_add(1);
        if self.config.depth_exceeded(self.depth) {
            let pos = self.cursor.position();
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                pos.offset,
                pos.line,
                pos.col,
            ));
        }

        self.expect_byte(b'<')?;
        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;
        let mut node = XmlNode {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        };

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.depth = self.depth.saturating_sub(1);
            return Ok(node);
        }
        self.expect_byte(b'>')?;

        loop {
            if self.cursor.starts_with(b"</") {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != node.name {
                    return Err(self.error_here(&format!(
                        "mismatched closing tag: expected </{}>, found </{close_name}>",
                        node.name
                    )));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                self.cursor.advance_by(9);
                let cdata = self.take_until(b"]]>")?;
                self.check_chars(&cdata)?;
                node.text.push_str(&cdata);
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                node.children.push(child);
                continue;
            }

            if self.cursor.is_eof() {
                return Err(self.error_here(&format!("unclosed element <{}>", node.name)));
            }

            if let Some(text) = self.parse_text()? {
                node.text.push_str(&text);
            }
        }

        self.depth = self.depth.saturating_sub(1);
        Ok(node)
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            let had_space = matches!(
                self.cursor.current(),
                Some(b' ' | b'\t' | b'\r' | b'\n')
            );
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) if !had_space => {
                    return Err(self.error_here("expected whitespace before attribute"));
                }
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input")),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_here(&format!("duplicate attribute `{name}`")));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = self.bytes_to_string(raw)?;
                self.check_chars(&text)?;
                return self.decode_entities(&text);
            }
            if b == b'<' {
                return Err(self.error_here("`<` in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = self.bytes_to_string(raw)?;
        self.check_chars(&text)?;
        if text.contains("]]>") {
            return Err(self.error_here("`]]>` in character data"));
        }
        let text = self.decode_entities(&text)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            _ => return Err(self.error_here("expected name")),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        self.bytes_to_string(raw)
    }

    fn skip_doctype(&mut self) -> Result<()> {
        // internal subsets nest one level of brackets
        let mut in_subset = false;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match b {
                b'[' => in_subset = true,
                b']' => in_subset = false,
                b'>' if !in_subset => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here("unterminated doctype"))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        self.take_raw_until(pattern).map(|_| ())
    }

    fn take_until(&mut self, pattern: &[u8]) -> Result<String> {
        let raw = self.take_raw_until(pattern)?;
        self.bytes_to_string(raw)
    }

    fn take_raw_until(&mut self, pattern: &[u8]) -> Result<&'a [u8]> {
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(pattern.len());
                return Ok(raw);
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here(&format!("expected `{}`", char::from(expected))))
        }
    }

    fn error_here(&self, message: &str) -> Error {
        Error::with_message(
            ErrorKind::MalformedXml,
            Span::at(self.cursor.position()),
            format!("malformed xml: {message}"),
        )
    }

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| self.error_here("invalid utf-8"))
    }

    fn check_chars(&self, text: &str) -> Result<()> {
        match text.chars().find(|&ch| !is_xml_char(ch)) {
            Some(ch) => Err(self.error_here(&format!(
                "invalid character U+{:04X}",
                u32::from(ch)
            ))),
            None => Ok(()),
        }
    }

    fn decode_entities(&self, input: &str) -> Result<String> {
        if !input.contains('&') {
            return Ok(input.to_string());
        }

        let mut result = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(amp) = rest.find('&') {
            let (before, after) = rest.split_at(amp);
            result.push_str(before);

            let Some(semi) = after.find(';') else {
                return Err(self.error_here("unterminated entity reference"));
            };
            let entity = after.get(1..semi).unwrap_or_default();
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => decode_numeric_entity(entity),
            };
            match decoded {
                Some(ch) => result.push(ch),
                None => return Err(self.error_here(&format!("invalid entity `&{entity};`"))),
            }
            rest = after.get(semi + 1..).unwrap_or_default();
        }
        result.push_str(rest);

        Ok(result)
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The `Char` production of XML 1.0
fn is_xml_char(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF
    )
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };
    char::from_u32(code).filter(|&ch| is_xml_char(ch))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;

    fn parse(input: &str) -> Result<XmlNode> {
        Parser::new(input.as_bytes()).parse()
    }

    #[test]
    fn test_parse_simple_element() {
        let root = parse("<webthumb></webthumb>").unwrap();
        assert_eq!(root.name, "webthumb");
        assert!(root.children.is_empty());
        assert_eq!(root.text(), None);
    }

    #[test]
    fn test_parse_with_attributes_in_order() {
        let root = parse("<job estimate='20' url=\"http://a\" cost='1'/>").unwrap();
        let keys: Vec<_> = root.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["estimate", "url", "cost"]);
        assert_eq!(root.attribute("url"), Some("http://a"));
    }

    #[test]
    fn test_parse_text_only_element() {
        let root = parse("<credits><reserve>45587.1</reserve></credits>").unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].text(), Some("45587.1"));
        assert_eq!(root.text(), None);
    }

    #[test]
    fn test_parse_self_closing_with_attributes() {
        let root = parse("<jobStatus><status id='x' inProcess='1' /></jobStatus>").unwrap();
        let status = &root.children[0];
        assert_eq!(status.name, "status");
        assert_eq!(status.attribute("inProcess"), Some("1"));
        assert!(status.children.is_empty());
        assert_eq!(status.text(), None);
    }

    #[test]
    fn test_whitespace_between_children_is_dropped() {
        let root = parse("<webthumb>\n\t<jobs>\n\t</jobs>\n</webthumb>").unwrap();
        assert_eq!(root.text, "");
        assert_eq!(root.children[0].name, "jobs");
    }

    #[test]
    fn test_prolog_comments_and_cdata() {
        let input = "<?xml version='1.0'?>\n<!DOCTYPE webthumb>\n<!-- c -->\
                     <webthumb><job><![CDATA[a<b]]></job><!-- inner --></webthumb>\n<!-- end -->";
        let root = parse(input).unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].text(), Some("a<b"));
    }

    #[test]
    fn test_entities_are_decoded() {
        let root = parse("<job url='a?b=1&amp;c=2'>x &lt; y &#65;&#x42;</job>").unwrap();
        assert_eq!(root.attribute("url"), Some("a?b=1&c=2"));
        assert_eq!(root.text(), Some("x < y AB"));
    }

    #[test]
    fn test_malformed_inputs() {
        let cases = [
            "",
            "   ",
            "<jobs>",
            "<jobs></job>",
            "<jobs><job></jobs>",
            "<job a='1' a='2'/>",
            "<job a=1/>",
            "<job a='<'/>",
            "<job>&bogus;</job>",
            "<job>&amp</job>",
            "<a/><b/>",
            "</a>",
            "<job a='1'b='2'/>",
            "<!-- never closed",
            "<job>wt\u{1}x</job>",
            "<job a='\u{8}'/>",
            "<job>&#0;</job>",
            "<job>&#x1F;</job>",
            "<job a='&#xFFFE;'/>",
            "<job>a ]]> b</job>",
            "<job><![CDATA[\u{2}]]></job>",
        ];
        for case in cases {
            let err = parse(case).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::MalformedXml, "input: {case:?}");
        }
    }

    #[test]
    fn test_allowed_control_characters() {
        let root = parse("<job a='x&#9;y'>a\tb\r\nc &#xD7FF;&#x10000;</job>").unwrap();
        assert_eq!(root.attribute("a"), Some("x\ty"));
        assert_eq!(root.text(), Some("a\tb\r\nc \u{D7FF}\u{10000}"));
    }

    #[test]
    fn test_leading_byte_order_mark_is_skipped() {
        let root = parse("\u{feff}<?xml version='1.0'?><webthumb><jobs/></webthumb>").unwrap();
        assert_eq!(root.name, "webthumb");
        assert_eq!(root.children.len(), 1);

        let err = parse("<webthumb/>\u{feff}").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedXml);
    }

    #[test]
    fn test_mismatched_tag_reports_position() {
        let err = parse("<webthumb>\n  <jobs></job>\n</webthumb>").unwrap_err();
        assert_eq!(err.span().start.line, 2);
        assert!(err.message().contains("expected </jobs>"));
    }

    #[test]
    fn test_depth_limit() {
        let config = Config::new(2, 0);
        let ok = Parser::with_config(b"<a><b/></a>", config).parse();
        assert!(ok.is_ok());
        let err = Parser::with_config(b"<a><b><c/></b></a>", config)
            .parse()
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxDepthExceeded { max: 2 });
    }

    #[test]
    fn test_size_limit() {
        let config = Config::new(0, 8);
        let err = Parser::with_config(b"<webthumb/>", config).parse().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxSizeExceeded { max: 8 });
    }
}
