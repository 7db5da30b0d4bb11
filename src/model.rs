use std::path::PathBuf;

use crate::error::Error;

/// A `<Relationship>` record from `word/_rels/document.xml.rels`.
#[derive(Clone, Debug, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// `a:srcRect` crop insets in 1/100000ths of the image size.
/// Each edge is independently optional; a missing or non-numeric edge is 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SrcRect {
    pub l: Option<i64>,
    pub t: Option<i64>,
    pub r: Option<i64>,
    pub b: Option<i64>,
}

impl SrcRect {
    /// True when at least one edge insets (or outsets) the image.
    pub fn has_crop(&self) -> bool {
        [self.l, self.t, self.r, self.b]
            .iter()
            .any(|edge| edge.unwrap_or(0) != 0)
    }
}

/// `wp:extent` of a floating drawing, in EMU.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    pub cx: Option<u64>,
    pub cy: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    Inline,
    Anchored,
    Other,
}

/// Summary of a `w:p` element, detached from the parsed XML.
#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphInfo {
    pub style: Option<String>,
    pub text: String,
}

/// Where an image reference sits in the document structure.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuralContext {
    pub placement: Placement,
    /// Inside an `mc:Fallback` branch (legacy alternative content).
    pub in_fallback: bool,
    /// The outermost related body paragraph.
    pub paragraph: Option<ParagraphInfo>,
    /// The nearest heading at or before `paragraph`.
    pub heading: Option<ParagraphInfo>,
}

/// One `a:blip` occurrence, in document order.
#[derive(Clone, Debug, PartialEq)]
pub struct DocxImageRef {
    pub embed: String,
    pub src_rect: Option<SrcRect>,
    pub extent: Option<Extent>,
    pub context: StructuralContext,
}

impl DocxImageRef {
    pub fn has_crop(&self) -> bool {
        self.src_rect.is_some_and(|r| r.has_crop())
    }
}

/// Crop rectangle in (fractional) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn full(width: u32, height: u32) -> Self {
        CropRect {
            left: 0.0,
            top: 0.0,
            width: width as f64,
            height: height as f64,
        }
    }
}

/// Crop rectangle rounded to whole pixels, as handed to the raster backend.
/// Signed so that out-of-range document values survive until the backend rejects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

/// A raw archive entry copied to disk.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedEntry {
    pub entry_path: String,
    pub output_path: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CropResult {
    pub src_path: PathBuf,
    pub output_path: PathBuf,
    pub old: CropRect,
    pub new: CropRect,
}

pub enum Outcome {
    NotCropped(PathBuf),
    Cropped(CropResult),
    Failed { error: Error, index: usize },
}

impl Outcome {
    /// The file this occurrence ended up in, if any.
    pub fn output_path(&self) -> Option<&PathBuf> {
        match self {
            Outcome::NotCropped(path) => Some(path),
            Outcome::Cropped(result) => Some(&result.output_path),
            Outcome::Failed { .. } => None,
        }
    }
}

/// Terminal record for one image occurrence.
pub struct ImageOutcome {
    pub image: DocxImageRef,
    pub relationship: Relationship,
    pub source: Option<ExtractedEntry>,
    pub outcome: Outcome,
}
