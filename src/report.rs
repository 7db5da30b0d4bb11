use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::docx::rels::Relationships;
use crate::error::Error;
use crate::extract::Extraction;
use crate::model::{DocxImageRef, Outcome};

fn format_src_rect(image: &DocxImageRef) -> Option<String> {
    let r = image.src_rect?;
    let edge = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
    Some(format!(
        "l={} t={} r={} b={}",
        edge(r.l),
        edge(r.t),
        edge(r.r),
        edge(r.b)
    ))
}

/// Text listing of image relationships and image references.
pub fn format_listing(
    relationships: Option<&Relationships>,
    images: Option<&[DocxImageRef]>,
) -> String {
    let mut out = String::new();
    if let Some(rels) = relationships {
        let _ = writeln!(
            out,
            "\n{} imageRels (image lookups - map an id to a target):",
            rels.len()
        );
        for rel in rels.iter() {
            let _ = writeln!(out, "{} {}", rel.id, rel.target);
        }
    }

    if let Some(images) = images {
        let _ = writeln!(
            out,
            "\n{} images (the order the images appear in the document):",
            images.len()
        );
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for image in images {
            let count = occurrences.entry(image.embed.as_str()).or_insert(0);
            *count += 1;
            let target = match relationships.and_then(|r| r.get(&image.embed)) {
                Some(rel) => rel.target.as_str(),
                None if relationships.is_none() => "unknown target (no imageRels loaded)",
                None => "unknown target",
            };
            let _ = write!(out, "embed={} count={count} target={target}", image.embed);
            if let Some(rect) = format_src_rect(image) {
                let _ = write!(out, " srcRect=[{rect}]");
            }
            if let Some(extent) = image.extent {
                let dim = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
                let _ = write!(out, " extent=[cx={} cy={}]", dim(extent.cx), dim(extent.cy));
            }
            if let Some(heading) = &image.context.heading {
                let _ = write!(out, " heading=\"{}\"", heading.text);
            }
            out.push('\n');
        }
    }
    out
}

/// Text summary of an extraction, one line per occurrence.
pub fn format_results(extraction: &Extraction) -> String {
    let mut out = format_listing(Some(&extraction.relationships), Some(&extraction.images));
    let _ = writeln!(out, "\n{} extracted files:", extraction.extracted.len());
    for entry in &extraction.extracted {
        let _ = writeln!(out, "{} -> {}", entry.entry_path, entry.output_path.display());
    }
    let _ = writeln!(out);
    for (i, o) in extraction.outcomes.iter().enumerate() {
        let _ = match &o.outcome {
            Outcome::NotCropped(path) => writeln!(
                out,
                "{i} {} {} not cropped: {}",
                o.image.embed,
                o.relationship.target,
                path.display()
            ),
            Outcome::Cropped(c) => writeln!(
                out,
                "{i} {} {} cropped: {} {}x{} -> {:.0}x{:.0} at ({:.0}, {:.0})",
                o.image.embed,
                o.relationship.target,
                c.output_path.display(),
                c.old.width,
                c.old.height,
                c.new.width,
                c.new.height,
                c.new.left,
                c.new.top
            ),
            Outcome::Failed { error, index } => writeln!(
                out,
                "{i} {} {} failed (image #{index}): {error}",
                o.image.embed, o.relationship.target
            ),
        };
    }
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// `path` as a link relative to `base_dir`, with `/` separators.
fn link(path: &Path, base_dir: &Path) -> String {
    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    escape_html(&relative.to_string_lossy().replace('\\', "/"))
}

/// Image links are relative to `base_dir`, the folder the report is written to.
pub fn render_html(extraction: &Extraction, base_dir: &Path) -> String {
    let mut html = String::new();
    html.push_str(
        "<!DOCTYPE html>\n<meta charset=\"utf-8\">\n<style>\nhtml, body {\n  font-family: Tahoma, sans-serif;\n}\n</style>\n",
    );
    html.push_str("<h1>docx-images Report</h1>\n");

    let _ = writeln!(
        html,
        "<h2>Extracted Images ({})</h2>",
        extraction.extracted.len()
    );
    for (i, entry) in extraction.extracted.iter().enumerate() {
        let src = link(&entry.output_path, base_dir);
        let _ = writeln!(html, "<div>[{i}] {src}</div>\n<div><img src=\"{src}\"></div>");
    }

    let cropped: Vec<_> = extraction.cropped().collect();
    let _ = writeln!(html, "<h2>Cropped Images ({})</h2>", cropped.len());
    for c in cropped {
        let src = link(&c.output_path, base_dir);
        let _ = writeln!(
            html,
            "<h3>{src}</h3>\n<div><img src=\"{src}\"></div>\n<pre>source: {}\nold: {}x{}\nnew: {:.0}x{:.0} at ({:.0}, {:.0})</pre>",
            link(&c.src_path, base_dir),
            c.old.width,
            c.old.height,
            c.new.width,
            c.new.height,
            c.new.left,
            c.new.top
        );
    }

    let failures: Vec<_> = extraction.failures().collect();
    if !failures.is_empty() {
        let _ = writeln!(html, "<h2>Failures ({})</h2>", failures.len());
        for o in failures {
            if let Outcome::Failed { error, index } = &o.outcome {
                let _ = writeln!(
                    html,
                    "<div>[{index}] {} {}: {}</div>",
                    escape_html(&o.image.embed),
                    escape_html(&o.relationship.target),
                    escape_html(&error.to_string())
                );
            }
        }
    }
    html
}

pub fn write_html_report(path: &Path, extraction: &Extraction) -> Result<(), Error> {
    let base_dir = path.parent().unwrap_or(Path::new(""));
    std::fs::create_dir_all(base_dir)?;
    std::fs::write(path, render_html(extraction, base_dir))?;
    Ok(())
}
