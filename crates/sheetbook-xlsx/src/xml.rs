//! Small helpers shared by the part readers

use std::io::BufRead;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};

/// Unescaped value of attribute `key`, if present and well formed
pub(crate) fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}

/// Attribute `key` parsed as `T`
///
/// Missing and unparseable values both yield `None`; the caller keeps its
/// previous value.
pub(crate) fn attr_parse<T: FromStr>(e: &BytesStart<'_>, key: &[u8]) -> Option<T> {
    let raw = attr_string(e, key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::debug!(
                "ignoring unparseable {}=\"{}\" on <{}>",
                String::from_utf8_lossy(key),
                raw,
                String::from_utf8_lossy(e.name().as_ref())
            );
            None
        }
    }
}

/// Check whether attribute `key` is present, regardless of its value
pub(crate) fn has_attr(e: &BytesStart<'_>, key: &[u8]) -> bool {
    e.attributes().flatten().any(|attr| attr.key.as_ref() == key)
}

/// Visit every event inside an element whose start tag was just consumed
///
/// Stops after the element's own end tag, which is not passed to `visit`.
/// `name` is only used for the error on a truncated document.
pub(crate) fn read_subtree<R, F>(reader: &mut Reader<R>, name: &[u8], mut visit: F) -> XlsxResult<()>
where
    R: BufRead,
    F: FnMut(&Event<'_>) -> XlsxResult<()>,
{
    let mut buf = Vec::new();
    let mut depth = 0usize;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::End(_) if depth == 0 => break,
            Event::Eof => {
                return Err(XlsxError::Parse(format!(
                    "document ended inside <{}>",
                    String::from_utf8_lossy(name)
                )))
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            _ => {}
        }
        visit(&event)?;
        buf.clear();
    }

    Ok(())
}

/// Concatenated text content of an element whose start tag was just consumed
pub(crate) fn read_element_text<R: BufRead>(reader: &mut Reader<R>, name: &[u8]) -> XlsxResult<String> {
    let mut text = String::new();
    read_subtree(reader, name, |event| {
        match event {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e)),
            _ => {}
        }
        Ok(())
    })?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_after<'a>(reader: &mut Reader<&'a [u8]>, name: &[u8]) {
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf).unwrap() {
                Event::Start(e) if e.name().as_ref() == name => return,
                Event::Eof => panic!("no <{}>", String::from_utf8_lossy(name)),
                _ => {}
            }
            buf.clear();
        }
    }

    #[test]
    fn test_subtree_stops_at_own_end_tag() {
        let xml = br#"<a><b><c x="1"/><b/></b><d/></a>"#;
        let mut reader = Reader::from_reader(&xml[..]);
        start_after(&mut reader, b"b");

        let mut seen = Vec::new();
        read_subtree(&mut reader, b"b", |event| {
            if let Event::Start(e) | Event::Empty(e) = event {
                seen.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec!["c", "b"]);

        // The reader is positioned right after </b>
        let mut buf = Vec::new();
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Empty(e) => assert_eq!(e.name().as_ref(), b"d"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_subtree_reports_truncation() {
        let xml = b"<a><b><c/>";
        let mut reader = Reader::from_reader(&xml[..]);
        start_after(&mut reader, b"b");
        assert!(read_subtree(&mut reader, b"b", |_| Ok(())).is_err());
    }

    #[test]
    fn test_element_text_unescapes() {
        let xml = br#"<n>Sheet1!$A$1&amp;B<![CDATA[<x>]]></n>"#;
        let mut reader = Reader::from_reader(&xml[..]);
        start_after(&mut reader, b"n");
        assert_eq!(read_element_text(&mut reader, b"n").unwrap(), "Sheet1!$A$1&B<x>");
    }

    #[test]
    fn test_attr_helpers() {
        let xml = br#"<v a="12" b="x" c="&lt;"/>"#;
        let mut reader = Reader::from_reader(&xml[..]);
        let mut buf = Vec::new();
        let Event::Empty(e) = reader.read_event_into(&mut buf).unwrap() else {
            panic!("expected empty element");
        };
        assert_eq!(attr_parse::<i32>(&e, b"a"), Some(12));
        assert_eq!(attr_parse::<i32>(&e, b"b"), None);
        assert_eq!(attr_parse::<i32>(&e, b"missing"), None);
        assert_eq!(attr_string(&e, b"c").as_deref(), Some("<"));
        assert!(has_attr(&e, b"b"));
        assert!(!has_attr(&e, b"d"));
    }
}
