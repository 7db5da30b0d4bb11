use std::fmt;
use std::path::PathBuf;

use crate::model::PixelRect;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    FileNotFound(PathBuf),
    InvalidDocx(String),
    Xml(roxmltree::Error),
    /// The root element of a part is not the one the part must have.
    MalformedDocument {
        part: &'static str,
        expected: &'static str,
        actual: String,
    },
    /// An entry handler failed; `entry` is the archive path of the entry.
    ArchiveEntry {
        entry: String,
        source: Box<Error>,
    },
    MissingMedia {
        target: String,
    },
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    InvalidCrop {
        path: PathBuf,
        rect: PixelRect,
        width: u32,
        height: u32,
    },
    Options(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::FileNotFound(path) => write!(f, "File not found {}", path.display()),
            Error::InvalidDocx(msg) => write!(f, "Invalid DOCX: {msg}"),
            Error::Xml(e) => write!(f, "XML parse error: {e}"),
            Error::MalformedDocument {
                part,
                expected,
                actual,
            } => write!(
                f,
                "root element is \"{actual}\" when \"{expected}\" was expected. Check that document is really a \"{part}\"."
            ),
            Error::ArchiveEntry { entry, source } => write!(f, "{entry}: {source}"),
            Error::MissingMedia { target } => {
                write!(f, "no media entry was extracted for relationship target {target}")
            }
            Error::Image { path, source } => {
                write!(f, "image {} could not be processed: {source}", path.display())
            }
            Error::InvalidCrop {
                path,
                rect,
                width,
                height,
            } => write!(
                f,
                "crop {}x{}+{}+{} lies outside the {width}x{height} image {}",
                rect.width,
                rect.height,
                rect.left,
                rect.top,
                path.display()
            ),
            Error::Options(msg) => write!(f, "Invalid options: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Xml(e) => Some(e),
            Error::ArchiveEntry { source, .. } => Some(source.as_ref()),
            Error::Image { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl Error {
    /// Unwraps `ArchiveEntry` annotations down to the error a handler raised.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::ArchiveEntry { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
