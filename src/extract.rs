//! Extract images from a DOCX archive and reproduce their document crop.
//!
//! The archive is read in one sequential pass. The relationships part and the
//! document part are parsed as they stream by, and media entries are copied
//! to disk. Once the archive is consumed, the image references are replayed
//! in document order: each is matched to its extracted file and, if the
//! document crops it, a cropped copy is written for that occurrence.

use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::archive::{self, EntryHandler, EntryMeta};
use crate::crop::{compute_crop_rect, is_noop, to_pixel_rect};
use crate::docx::rels::{
    Relationships, entry_path_for_target, parse_relationships_str,
    resolve_relationship_for_entry,
};
use crate::docx::document::parse_image_references_str;
use crate::docx::{self, read_part};
use crate::error::Error;
use crate::model::{
    CropRect, CropResult, DocxImageRef, ExtractedEntry, ImageOutcome, Outcome, Relationship,
};
use crate::naming::{
    EntryPathContext, EntryPathFn, OccurrenceContext, OccurrencePathFn, default_entry_path,
    default_occurrence_path,
};
use crate::raster::{ImageCrateBackend, RasterBackend};

pub struct ExtractOptions {
    pub output_dir: PathBuf,
    /// Prepended to the file name of every extracted entry.
    pub image_prefix: String,
    /// Skip occurrences inside `mc:Fallback` alternative content.
    pub ignore_fallback_images: bool,
    pub entry_path: Option<EntryPathFn>,
    pub occurrence_path: Option<OccurrencePathFn>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            output_dir: PathBuf::from("."),
            image_prefix: String::new(),
            ignore_fallback_images: false,
            entry_path: None,
            occurrence_path: None,
        }
    }
}

impl ExtractOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        ExtractOptions {
            output_dir: output_dir.into(),
            ..ExtractOptions::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Reading,
    Finalizing,
    Done,
    Failed,
}

/// Everything one run produced.
pub struct Extraction {
    pub relationships: Relationships,
    pub images: Vec<DocxImageRef>,
    pub extracted: Vec<ExtractedEntry>,
    pub outcomes: Vec<ImageOutcome>,
}

impl Extraction {
    pub fn cropped(&self) -> impl Iterator<Item = &CropResult> {
        self.outcomes.iter().filter_map(|o| match &o.outcome {
            Outcome::Cropped(result) => Some(result),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &ImageOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Failed { .. }))
    }
}

pub struct Extractor<B: RasterBackend = ImageCrateBackend> {
    options: ExtractOptions,
    backend: B,
    state: State,
    relationships: Option<Relationships>,
    images: Option<Vec<DocxImageRef>>,
    extracted: Vec<ExtractedEntry>,
    outcomes: Vec<ImageOutcome>,
}

/// Per-source bookkeeping while occurrences are replayed.
#[derive(Default)]
struct Occurrences {
    counts: HashMap<PathBuf, usize>,
    /// Sources whose extracted file already stands for an uncropped occurrence.
    claimed: HashSet<PathBuf>,
}

impl Extractor<ImageCrateBackend> {
    pub fn new(options: ExtractOptions) -> Self {
        Extractor::with_backend(options, ImageCrateBackend)
    }
}

impl<B: RasterBackend> Extractor<B> {
    pub fn with_backend(options: ExtractOptions, backend: B) -> Self {
        Extractor {
            options,
            backend,
            state: State::Idle,
            relationships: None,
            images: None,
            extracted: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn outcomes(&self) -> &[ImageOutcome] {
        &self.outcomes
    }

    pub fn run(&mut self, input: &Path) -> Result<(), Error> {
        let file = archive::open_input(input)?;
        self.run_from(file)
    }

    pub fn run_from<R: Read + Seek>(&mut self, reader: R) -> Result<(), Error> {
        self.state = State::Reading;
        let result = archive::read_archive_from(reader, self);
        if result.is_err() {
            self.state = State::Failed;
        }
        result
    }

    pub fn into_extraction(self) -> Extraction {
        Extraction {
            relationships: self.relationships.unwrap_or_default(),
            images: self.images.unwrap_or_default(),
            extracted: self.extracted,
            outcomes: self.outcomes,
        }
    }

    fn is_image_entry(&self, name: &str) -> bool {
        if !docx::is_media(name) {
            return false;
        }
        match &self.relationships {
            Some(rels) => resolve_relationship_for_entry(name, rels).is_some(),
            // relationships not seen yet: keep it, correlation happens at the end
            None => true,
        }
    }

    fn handle_image(&mut self, entry: &EntryMeta, data: &mut dyn Read) -> Result<(), Error> {
        let ctx = EntryPathContext {
            entry,
            output_dir: &self.options.output_dir,
            image_prefix: &self.options.image_prefix,
        };
        let output_path = self
            .options
            .entry_path
            .as_mut()
            .and_then(|f| f(&ctx))
            .unwrap_or_else(|| {
                default_entry_path(&entry.name, &self.options.output_dir, &self.options.image_prefix)
            });
        let bytes = archive::write_stream(data, &output_path)?;
        log::debug!("Extracted {} ({bytes} bytes) to {}", entry.name, output_path.display());
        self.extracted.push(ExtractedEntry {
            entry_path: entry.name.clone(),
            output_path,
        });
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), Error> {
        let images = self.images.take().ok_or_else(|| {
            Error::InvalidDocx("missing word/document.xml (is this a DOCX file?)".into())
        })?;
        let rels = self.relationships.take().unwrap_or_default();
        let mut occurrences = Occurrences::default();

        for (index, image) in images.iter().enumerate() {
            if self.options.ignore_fallback_images && image.context.in_fallback {
                log::debug!("Skipping fallback image {} (#{index})", image.embed);
                continue;
            }
            let Some(rel) = rels.get(&image.embed) else {
                log::debug!("No image relationship for {} (#{index})", image.embed);
                continue;
            };

            let entry_path = entry_path_for_target(&rel.target);
            let source = self
                .extracted
                .iter()
                .find(|e| e.entry_path == entry_path)
                .cloned();

            let result = match &source {
                Some(source) => {
                    self.process_occurrence(index, image, rel, source, &mut occurrences)
                }
                None => Err(Error::MissingMedia {
                    target: rel.target.clone(),
                }),
            };
            let outcome = result.unwrap_or_else(|error| {
                log::warn!("{} {}: {error}", image.embed, rel.target);
                Outcome::Failed { error, index }
            });
            log_outcome(image, rel, &outcome);

            self.outcomes.push(ImageOutcome {
                image: image.clone(),
                relationship: rel.clone(),
                source,
                outcome,
            });
        }

        self.images = Some(images);
        self.relationships = Some(rels);
        Ok(())
    }

    fn process_occurrence(
        &mut self,
        index: usize,
        image: &DocxImageRef,
        rel: &Relationship,
        source: &ExtractedEntry,
        occurrences: &mut Occurrences,
    ) -> Result<Outcome, Error> {
        let count = occurrences
            .counts
            .entry(source.output_path.clone())
            .or_insert(0);
        *count += 1;
        let ctx = OccurrenceContext {
            image,
            index,
            relationship: rel,
            source,
            occurrence: *count,
        };

        let src_rect = match image.src_rect {
            Some(r) if r.has_crop() => r,
            _ => return self.keep_uncropped(&ctx, occurrences),
        };

        let decoded = self.backend.decode(&source.output_path)?;
        let (width, height) = (decoded.width(), decoded.height());
        let rect = compute_crop_rect(&src_rect, width, height);
        if is_noop(&rect, width, height) {
            return self.keep_uncropped(&ctx, occurrences);
        }

        let output_path = self.occurrence_path(&ctx);
        let cropped = self
            .backend
            .crop(&decoded, to_pixel_rect(&rect), &source.output_path)?;
        self.backend.encode(&cropped, &output_path)?;

        Ok(Outcome::Cropped(CropResult {
            src_path: source.output_path.clone(),
            output_path,
            old: CropRect::full(width, height),
            new: rect,
        }))
    }

    /// The first uncropped occurrence of a source is the extracted file
    /// itself; later ones get a copy of it.
    fn keep_uncropped(
        &mut self,
        ctx: &OccurrenceContext,
        occurrences: &mut Occurrences,
    ) -> Result<Outcome, Error> {
        let src = &ctx.source.output_path;
        if occurrences.claimed.insert(src.clone()) {
            return Ok(Outcome::NotCropped(src.clone()));
        }
        let output_path = self.occurrence_path(ctx);
        if let Some(dir) = output_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::copy(src, &output_path)?;
        Ok(Outcome::NotCropped(output_path))
    }

    fn occurrence_path(&mut self, ctx: &OccurrenceContext) -> PathBuf {
        self.options
            .occurrence_path
            .as_mut()
            .and_then(|f| f(ctx))
            .unwrap_or_else(|| default_occurrence_path(&ctx.source.output_path, ctx.occurrence))
    }
}

fn log_outcome(image: &DocxImageRef, rel: &Relationship, outcome: &Outcome) {
    match outcome {
        Outcome::NotCropped(path) => log::info!(
            "{} {} {}: image was not cropped",
            image.embed,
            rel.target,
            path.display()
        ),
        Outcome::Cropped(result) => log::info!(
            "{} {}: image was cropped to {}, old-size: {}x{}, new-size: {:.0}x{:.0}",
            image.embed,
            rel.target,
            result.output_path.display(),
            result.old.width,
            result.old.height,
            result.new.width,
            result.new.height
        ),
        Outcome::Failed { .. } => {}
    }
}

impl<B: RasterBackend> EntryHandler for Extractor<B> {
    fn should_process(&mut self, entry: &EntryMeta) -> bool {
        docx::is_document_xml_rels(&entry.name)
            || docx::is_document_xml(&entry.name)
            || docx::is_media(&entry.name)
    }

    fn on_entry(&mut self, entry: &EntryMeta, data: &mut dyn Read) -> Result<(), Error> {
        if docx::is_document_xml_rels(&entry.name) {
            let rels = parse_relationships_str(&read_part(data)?)?;
            log::debug!("Found {} image relationships", rels.len());
            self.relationships = Some(rels);
            return Ok(());
        }
        if docx::is_document_xml(&entry.name) {
            self.images = Some(parse_image_references_str(&read_part(data)?)?);
            return Ok(());
        }
        if self.is_image_entry(&entry.name) {
            return self.handle_image(entry, data);
        }
        archive::ignore_stream(data)
    }

    fn on_complete(&mut self) -> Result<(), Error> {
        self.state = State::Finalizing;
        self.finalize()?;
        self.state = State::Done;
        Ok(())
    }
}
