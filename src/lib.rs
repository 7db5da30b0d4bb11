pub mod archive;
pub mod crop;
pub mod docx;
mod error;
pub mod extract;
pub mod model;
pub mod naming;
pub mod raster;
pub mod report;

pub use error::Error;
pub use extract::{ExtractOptions, Extraction, Extractor};

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use archive::{EntryHandler, EntryMeta};
use docx::rels::Relationships;
use model::DocxImageRef;

/// Extracts the images of `input` into `options.output_dir` and writes a
/// cropped copy for every occurrence the document crops.
pub fn extract_and_crop(input: &Path, options: ExtractOptions) -> Result<Extraction, Error> {
    let t0 = Instant::now();

    let mut extractor = Extractor::new(options);
    extractor.run(input)?;
    let extraction = extractor.into_extraction();

    log::info!(
        "Timing: total={:.1}ms ({} files extracted, {} occurrences, {} cropped, {} failed)",
        t0.elapsed().as_secs_f64() * 1000.0,
        extraction.extracted.len(),
        extraction.outcomes.len(),
        extraction.cropped().count(),
        extraction.failures().count(),
    );

    Ok(extraction)
}

/// Image relationships and image references of a DOCX, read without
/// extracting anything.
pub struct ImageListing {
    pub relationships: Option<Relationships>,
    pub images: Option<Vec<DocxImageRef>>,
}

pub fn list_images(input: &Path) -> Result<ImageListing, Error> {
    struct Lister(ImageListing);

    impl EntryHandler for Lister {
        fn should_process(&mut self, entry: &EntryMeta) -> bool {
            docx::is_document_xml(&entry.name) || docx::is_document_xml_rels(&entry.name)
        }

        fn on_entry(&mut self, entry: &EntryMeta, data: &mut dyn Read) -> Result<(), Error> {
            let content = docx::read_part(data)?;
            if docx::is_document_xml_rels(&entry.name) {
                self.0.relationships = Some(docx::rels::parse_relationships_str(&content)?);
            } else {
                self.0.images = Some(docx::document::parse_image_references_str(&content)?);
            }
            Ok(())
        }
    }

    let t0 = Instant::now();
    let mut lister = Lister(ImageListing {
        relationships: None,
        images: None,
    });
    archive::read_archive(input, &mut lister)?;
    log::info!(
        "Timing: list={:.1}ms",
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(lister.0)
}
