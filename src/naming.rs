//! Output path decisions for extracted entries and image occurrences.
//!
//! Both decisions can be overridden with a callback; a callback returning
//! `None` falls back to the defaults here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::archive::EntryMeta;
use crate::model::{DocxImageRef, ExtractedEntry, Relationship};

pub struct EntryPathContext<'a> {
    pub entry: &'a EntryMeta,
    pub output_dir: &'a Path,
    pub image_prefix: &'a str,
}

pub struct OccurrenceContext<'a> {
    pub image: &'a DocxImageRef,
    /// Position of the occurrence among all image references.
    pub index: usize,
    pub relationship: &'a Relationship,
    pub source: &'a ExtractedEntry,
    /// 1-based count of occurrences of `source` so far, this one included.
    pub occurrence: usize,
}

pub type EntryPathFn = Box<dyn FnMut(&EntryPathContext) -> Option<PathBuf>>;
pub type OccurrencePathFn = Box<dyn FnMut(&OccurrenceContext) -> Option<PathBuf>>;

/// `output_dir/<entry dir>/<prefix><entry file name>`.
pub fn default_entry_path(entry_name: &str, output_dir: &Path, image_prefix: &str) -> PathBuf {
    let (dir, base) = match entry_name.rsplit_once('/') {
        Some((d, b)) => (d, b),
        None => ("", entry_name),
    };
    output_dir.join(dir).join(format!("{image_prefix}{base}"))
}

fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

/// `<dir>/<stem>.<occurrence><ext>` next to the extracted source file.
pub fn default_occurrence_path(source_output: &Path, occurrence: usize) -> PathBuf {
    let (stem, ext) = split_name(source_output);
    source_output.with_file_name(format!("{stem}.{occurrence}{ext}"))
}

fn sanitize(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Names each occurrence after its nearest preceding heading:
/// `<dir>/<heading text>.<n><ext>`, counting per heading name.
/// Declines occurrences without a heading.
pub fn name_by_heading() -> OccurrencePathFn {
    let mut counts: HashMap<String, usize> = HashMap::new();
    Box::new(move |ctx: &OccurrenceContext| {
        let heading = ctx.image.context.heading.as_ref()?;
        let base = sanitize(&heading.text);
        if base.is_empty() {
            return None;
        }
        let count = counts.entry(base.clone()).or_insert(0);
        *count += 1;
        let (_, ext) = split_name(&ctx.source.output_path);
        Some(
            ctx.source
                .output_path
                .with_file_name(format!("{base}.{count}{ext}")),
        )
    })
}
