//! Parser for YouTube timedtext caption XML.
//!
//! The caption endpoint returns a document shaped like
//! `<transcript><text start="0.5" dur="1.2">Hello</text>...</transcript>`.
//! Text content is entity-encoded twice (XML, then HTML), and may carry
//! inline formatting tags which are dropped.

use super::TranscriptEntry;
use crate::error::{Result, TranscriptError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

/// Timedtext XML parser.
pub struct TimedTextParser {
    tag_regex: Regex,
}

/// A `<text>` element being read.
struct OpenEntry {
    start: f64,
    duration: f64,
    raw: String,
}

impl TimedTextParser {
    pub fn new() -> Self {
        let tag_regex = Regex::new(r"<[^>]*>").expect("Invalid regex");
        Self { tag_regex }
    }

    /// Parse a timedtext document into entries, in document order.
    ///
    /// Elements without text content are skipped. An empty body, malformed
    /// XML, or a document without a `<transcript>` root is a parse error.
    pub fn parse(&self, xml: &str) -> Result<Vec<TranscriptEntry>> {
        if xml.trim().is_empty() {
            return Err(TranscriptError::Parse(
                "Caption document is empty".to_string(),
            ));
        }

        let mut reader = Reader::from_str(xml);
        let mut entries = Vec::new();
        let mut has_root = false;
        let mut open: Option<OpenEntry> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                TranscriptError::Parse(format!(
                    "Invalid caption XML at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(element) => match element.name().as_ref() {
                    b"transcript" => has_root = true,
                    b"text" => {
                        open = Some(OpenEntry {
                            start: float_attribute(&element, "start"),
                            duration: float_attribute(&element, "dur"),
                            raw: String::new(),
                        })
                    }
                    _ => {}
                },
                Event::Empty(element) if element.name().as_ref() == b"transcript" => {
                    has_root = true;
                }
                Event::Text(text) => {
                    if let Some(entry) = open.as_mut() {
                        let decoded = text
                            .unescape()
                            .map_err(|e| TranscriptError::Parse(format!("Invalid caption text: {}", e)))?;
                        entry.raw.push_str(&decoded);
                    }
                }
                Event::CData(data) => {
                    if let Some(entry) = open.as_mut() {
                        entry.raw.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::End(element) if element.name().as_ref() == b"text" => {
                    if let Some(entry) = open.take() {
                        if !entry.raw.is_empty() {
                            entries.push(self.finish_entry(entry));
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !has_root {
            return Err(TranscriptError::Parse(
                "Caption document has no <transcript> root".to_string(),
            ));
        }

        Ok(entries)
    }

    /// Apply the HTML layer YouTube adds on top of XML escaping, then drop markup.
    fn finish_entry(&self, entry: OpenEntry) -> TranscriptEntry {
        let text = html_escape::decode_html_entities(&entry.raw);
        let text = self.tag_regex.replace_all(&text, "").into_owned();
        TranscriptEntry::new(text, entry.start, entry.duration)
    }
}

impl Default for TimedTextParser {
    fn default() -> Self {
        Self::new()
    }
}

fn float_attribute(element: &BytesStart<'_>, name: &str) -> f64 {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok())
        .and_then(|value| value.parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_document() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="1.25">Hello</text><text start="1.75" dur="2">world</text></transcript>"#;
        let entries = TimedTextParser::new().parse(xml).unwrap();

        assert_eq!(
            entries,
            vec![
                TranscriptEntry::new("Hello", 0.5, 1.25),
                TranscriptEntry::new("world", 1.75, 2.0),
            ]
        );
    }

    #[test]
    fn test_skips_elements_without_text() {
        let xml = r#"<transcript><text start="0" dur="1"/><text start="1" dur="1"></text><text start="2" dur="1">kept</text></transcript>"#;
        let entries = TimedTextParser::new().parse(xml).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "kept");
        assert_eq!(entries[0].start, 2.0);
    }

    #[test]
    fn test_double_encoded_entities() {
        let xml = r#"<transcript><text start="0" dur="1">it&amp;#39;s &amp;quot;fine&amp;quot; &amp;amp; done</text></transcript>"#;
        let entries = TimedTextParser::new().parse(xml).unwrap();

        assert_eq!(entries[0].text, "it's \"fine\" & done");
    }

    #[test]
    fn test_html5_named_entities() {
        let xml = r#"<transcript><text start="0" dur="1">caf&amp;eacute; &amp;copy; &amp;hellip;</text></transcript>"#;
        let entries = TimedTextParser::new().parse(xml).unwrap();

        assert_eq!(entries[0].text, "café © …");
    }

    #[test]
    fn test_strips_formatting_tags() {
        let xml = r#"<transcript><text start="0" dur="1">&lt;i&gt;music&lt;/i&gt; plays</text></transcript>"#;
        let entries = TimedTextParser::new().parse(xml).unwrap();

        assert_eq!(entries[0].text, "music plays");
    }

    #[test]
    fn test_multiline_text_is_kept() {
        let xml = "<transcript><text start=\"0\" dur=\"1\">first line\nsecond line</text></transcript>";
        let entries = TimedTextParser::new().parse(xml).unwrap();

        assert_eq!(entries[0].text, "first line\nsecond line");
    }

    #[test]
    fn test_missing_duration_defaults_to_zero() {
        let xml = r#"<transcript><text start="3.5">no dur</text></transcript>"#;
        let entries = TimedTextParser::new().parse(xml).unwrap();

        assert_eq!(entries[0].start, 3.5);
        assert_eq!(entries[0].duration, 0.0);
    }

    #[test]
    fn test_transcript_without_entries() {
        let entries = TimedTextParser::new().parse("<transcript></transcript>").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let parser = TimedTextParser::new();

        assert!(matches!(parser.parse(""), Err(TranscriptError::Parse(_))));
        assert!(matches!(parser.parse("  \n"), Err(TranscriptError::Parse(_))));
    }

    #[test]
    fn test_html_page_is_an_error() {
        let err = TimedTextParser::new()
            .parse("<html><body>Sorry, something went wrong</body></html>")
            .unwrap_err();

        assert!(matches!(err, TranscriptError::Parse(_)));
        assert!(err.to_string().contains("<transcript>"));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let err = TimedTextParser::new()
            .parse("<transcript><text start=\"0\">open</transcript>")
            .unwrap_err();

        assert!(matches!(err, TranscriptError::Parse(_)));
    }
}
