#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

pub const IMAGE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

/// Output directory: tests/output/<name>/, emptied first.
pub fn output_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(name);
    fs::remove_dir_all(&dir).ok();
    fs::create_dir_all(&dir).expect("Cannot create output dir");
    dir
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn image_size(path: &Path) -> (u32, u32) {
    let img = image::open(path).unwrap_or_else(|e| panic!("open {}: {e}", path.display()));
    (img.width(), img.height())
}

pub fn rels_xml(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, rel_type, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
  xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
  xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
  xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"
  xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
  xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape"
  xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006">
<w:body>{body}</w:body>
</w:document>"#
    )
}

/// `l,t,r,b` as `a:srcRect` attributes, e.g. `l="25000" r="25000"`.
pub fn blip_fill(embed: &str, src_rect: Option<&str>) -> String {
    let rect = src_rect
        .map(|attrs| format!("<a:srcRect {attrs}/>"))
        .unwrap_or_default();
    format!(
        r#"<pic:pic><pic:blipFill><a:blip r:embed="{embed}"/>{rect}<a:stretch><a:fillRect/></a:stretch></pic:blipFill></pic:pic>"#
    )
}

pub fn inline_drawing(embed: &str, src_rect: Option<&str>) -> String {
    format!(
        r#"<w:r><w:drawing><wp:inline><wp:extent cx="952500" cy="952500"/><a:graphic><a:graphicData>{}</a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#,
        blip_fill(embed, src_rect)
    )
}

pub fn anchor_drawing(embed: &str, src_rect: Option<&str>, cx: u64, cy: u64) -> String {
    format!(
        r#"<w:r><w:drawing><wp:anchor behindDoc="0"><wp:extent cx="{cx}" cy="{cy}"/><a:graphic><a:graphicData>{}</a:graphicData></a:graphic></wp:anchor></w:drawing></w:r>"#,
        blip_fill(embed, src_rect)
    )
}

pub fn paragraph(content: &str) -> String {
    format!("<w:p>{content}</w:p>")
}

pub fn heading(style: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

pub fn text_paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
}

/// Writes a ZIP container with `entries` in the given order.
pub fn write_zip(path: &Path, entries: &[(&str, Vec<u8>)]) {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).expect("create fixture dir");
    }
    let file = fs::File::create(path).expect("create fixture");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).expect("add dir");
        } else {
            zip.start_file(*name, options).expect("start file");
            zip.write_all(data).expect("write entry");
        }
    }
    zip.finish().expect("finish zip");
}

/// A minimal DOCX: content types, document part, its relationships and media.
pub fn write_docx(
    path: &Path,
    body: &str,
    rels: &[(&str, &str, &str)],
    media: &[(&str, Vec<u8>)],
) {
    let mut entries: Vec<(&str, Vec<u8>)> = vec![
        (
            "[Content_Types].xml",
            br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#.to_vec(),
        ),
        ("word/", Vec::new()),
        ("word/_rels/document.xml.rels", rels_xml(rels).into_bytes()),
        ("word/document.xml", document_xml(body).into_bytes()),
    ];
    entries.extend(media.iter().map(|(name, data)| (*name, data.clone())));
    entries.push(("word/styles.xml", b"<w:styles/>".to_vec()));
    write_zip(path, &entries);
}
