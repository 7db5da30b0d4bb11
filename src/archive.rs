//! Sequential, single-pass iteration over the entries of a ZIP container.
//!
//! Entries are handed out strictly one at a time in archive order: the next
//! entry is not opened until the handler for the current one has returned.
//! A handler error stops the iteration immediately. Entry names are
//! sanitised first; an entry whose path would leave the archive root is
//! skipped.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Component, Path};

use crate::error::Error;

/// Metadata of an archive entry, available before its data is opened.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryMeta {
    pub index: usize,
    /// Virtual path inside the archive, e.g. `word/media/image1.png`.
    pub name: String,
}

impl EntryMeta {
    pub fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }
}

pub trait EntryHandler {
    /// Entries rejected here are never opened.
    fn should_process(&mut self, _entry: &EntryMeta) -> bool {
        true
    }

    fn on_entry(&mut self, entry: &EntryMeta, data: &mut dyn Read) -> Result<(), Error>;

    /// Called once after the last entry.
    fn on_complete(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

pub(crate) fn open_input(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, path.display()),
        )),
        _ => Error::Io(e),
    })
}

pub fn read_archive<H: EntryHandler + ?Sized>(path: &Path, handler: &mut H) -> Result<(), Error> {
    let file = open_input(path)?;
    read_archive_from(file, handler)
}

pub fn read_archive_from<R, H>(reader: R, handler: &mut H) -> Result<(), Error>
where
    R: Read + Seek,
    H: EntryHandler + ?Sized,
{
    let mut zip = zip::ZipArchive::new(reader)
        .map_err(|e| Error::InvalidDocx(format!("file is not a ZIP archive ({e})")))?;

    for index in 0..zip.len() {
        let Some(raw_name) = zip.name_for_index(index).map(String::from) else {
            continue;
        };
        if raw_name.ends_with('/') {
            log::debug!("Skipping directory {raw_name}");
            continue;
        }

        let enclosed = zip
            .by_index_raw(index)
            .map(|file| file.enclosed_name())
            .map_err(|e| Error::ArchiveEntry {
                entry: raw_name.clone(),
                source: Box::new(Error::InvalidDocx(e.to_string())),
            })?;
        let Some(name) = enclosed.as_deref().and_then(entry_name) else {
            log::warn!("Skipping entry {raw_name}: path leaves the archive root");
            continue;
        };

        let meta = EntryMeta { index, name };
        if !handler.should_process(&meta) {
            log::debug!("Skipping entry {}", meta.name);
            continue;
        }

        let annotate = |source: Error| Error::ArchiveEntry {
            entry: meta.name.clone(),
            source: Box::new(source),
        };
        let mut data = zip
            .by_index(index)
            .map_err(|e| annotate(Error::InvalidDocx(e.to_string())))?;
        handler.on_entry(&meta, &mut data).map_err(annotate)?;
    }

    handler.on_complete()
}

/// `/`-joined form of a sanitised entry path; `None` when nothing is left.
fn entry_name(path: &Path) -> Option<String> {
    let parts: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Copies every processed entry to `output_dir/<entry path>`.
pub fn extract_entries(
    path: &Path,
    output_dir: &Path,
    filter: Option<fn(&str) -> bool>,
) -> Result<Vec<std::path::PathBuf>, Error> {
    struct Copier<'a> {
        output_dir: &'a Path,
        filter: Option<fn(&str) -> bool>,
        written: Vec<std::path::PathBuf>,
    }

    impl EntryHandler for Copier<'_> {
        fn should_process(&mut self, entry: &EntryMeta) -> bool {
            self.filter.is_none_or(|f| f(&entry.name))
        }

        fn on_entry(&mut self, entry: &EntryMeta, data: &mut dyn Read) -> Result<(), Error> {
            let output_path = self.output_dir.join(&entry.name);
            log::debug!("Extracting {} to {}", entry.name, output_path.display());
            write_stream(data, &output_path)?;
            self.written.push(output_path);
            Ok(())
        }
    }

    let mut copier = Copier {
        output_dir,
        filter,
        written: Vec::new(),
    };
    read_archive(path, &mut copier)?;
    Ok(copier.written)
}

/// Streams `data` into `output_path`, creating parent directories.
pub(crate) fn write_stream(data: &mut dyn Read, output_path: &Path) -> Result<u64, Error> {
    if let Some(dir) = output_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut out = File::create(output_path)?;
    Ok(std::io::copy(data, &mut out)?)
}

/// Drains `data` without buffering it.
pub(crate) fn ignore_stream(data: &mut dyn Read) -> Result<(), Error> {
    std::io::copy(data, &mut std::io::sink())?;
    Ok(())
}
