pub mod document;
pub mod dom;
pub mod rels;

use std::io::Read;
use std::path::Path;

use crate::error::Error;

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const WPD_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const MC_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

pub const DOCUMENT_XML: &str = "word/document.xml";
pub const DOCUMENT_XML_RELS: &str = "word/_rels/document.xml.rels";
pub const MEDIA_DIR: &str = "word/media/";

/// Archive directory that relationship targets of the main document are relative to.
pub const PART_ROOT: &str = "word/";

pub fn is_document_xml(name: &str) -> bool {
    name == DOCUMENT_XML
}

pub fn is_document_xml_rels(name: &str) -> bool {
    name == DOCUMENT_XML_RELS
}

pub fn is_media(name: &str) -> bool {
    name.starts_with(MEDIA_DIR)
}

/// Fails unless the root element has local name `expected`.
pub(crate) fn validate_root(
    xml: &roxmltree::Document,
    expected: &'static str,
    part: &'static str,
) -> Result<(), Error> {
    let actual = xml.root_element().tag_name().name();
    if actual != expected {
        return Err(Error::MalformedDocument {
            part,
            expected,
            actual: actual.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn read_part(data: &mut dyn Read) -> Result<String, Error> {
    let mut content = String::new();
    data.read_to_string(&mut content)?;
    Ok(content)
}

pub(crate) fn read_part_file(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })
}

/// Parses the leading integer of `val` (optional sign, then digits), ignoring
/// surrounding whitespace and any trailing garbage. `None` if there are no digits.
pub(crate) fn parse_int_prefix(val: &str) -> Option<i64> {
    let s = val.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
