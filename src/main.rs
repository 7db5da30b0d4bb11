use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgGroup, Parser, Subcommand};
use serde::Deserialize;

use docx_images::docx::document::parse_image_references_file;
use docx_images::docx::rels::parse_relationships_file;
use docx_images::{Error, ExtractOptions, naming, report};

/// Extract images from DOCX files, cropped the way the document shows them
#[derive(Parser, Debug)]
#[command(name = "docx-images", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the images and write a cropped copy per cropped occurrence
    Extract {
        /// The path to the docx file
        #[arg(long)]
        docx: PathBuf,

        /// Output folder for the extracted file(s)
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// A prefix to use for the extracted image name(s)
        #[arg(long)]
        image_prefix: Option<String>,

        /// JSON options file: {"image_prefix", "ignore_fallback_images", "name_by_heading"}
        #[arg(long, visible_alias = "opts-module")]
        opts_file: Option<PathBuf>,

        /// Skip images that only appear as legacy fallback content
        #[arg(long, default_value_t = false)]
        ignore_fallback_images: bool,

        /// Name cropped images after the nearest preceding heading
        #[arg(long, default_value_t = false)]
        name_by_heading: bool,

        /// Do not write images.html into the output folder
        #[arg(long, default_value_t = false)]
        no_report: bool,
    },
    /// List the image relationships and the images in document order
    #[command(group(
        ArgGroup::new("input")
            .required(true)
            .args(["docx", "document_xml", "document_xml_rels"])
    ))]
    List {
        /// The path to the docx file
        #[arg(long)]
        docx: Option<PathBuf>,

        /// The path to an already-extracted document.xml file
        #[arg(long = "documentXml")]
        document_xml: Option<PathBuf>,

        /// The path to an already-extracted document.xml.rels file
        #[arg(long = "documentXmlRels")]
        document_xml_rels: Option<PathBuf>,
    },
    /// Print the version
    Version,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct OptionsFile {
    image_prefix: Option<String>,
    ignore_fallback_images: bool,
    name_by_heading: bool,
}

fn load_options_file(path: &Path) -> Result<OptionsFile, Error> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Options(format!("{}: {e}", path.display())))
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Extract {
            docx,
            output_dir,
            image_prefix,
            opts_file,
            ignore_fallback_images,
            name_by_heading,
            no_report,
        } => {
            let file_opts = match opts_file {
                Some(path) => load_options_file(&path)?,
                None => OptionsFile::default(),
            };

            let mut options = ExtractOptions::new(output_dir.clone());
            options.image_prefix = image_prefix
                .or(file_opts.image_prefix)
                .unwrap_or_default();
            options.ignore_fallback_images =
                ignore_fallback_images || file_opts.ignore_fallback_images;
            if name_by_heading || file_opts.name_by_heading {
                options.occurrence_path = Some(naming::name_by_heading());
            }

            let extraction = docx_images::extract_and_crop(&docx, options)?;
            print!("{}", report::format_results(&extraction));

            if !no_report {
                let report_path = output_dir.join("images.html");
                report::write_html_report(&report_path, &extraction)?;
                log::info!("Report written to {}", report_path.display());
            }
        }
        Command::List {
            docx,
            document_xml,
            document_xml_rels,
        } => {
            let listing = if let Some(path) = document_xml_rels {
                println!("Loading document.xml.rels from {}", path.display());
                docx_images::ImageListing {
                    relationships: Some(parse_relationships_file(&path)?),
                    images: None,
                }
            } else if let Some(path) = document_xml {
                println!("Loading document.xml from {}", path.display());
                docx_images::ImageListing {
                    relationships: None,
                    images: Some(parse_image_references_file(&path)?),
                }
            } else if let Some(path) = docx {
                println!("Loading docx from {}", path.display());
                docx_images::list_images(&path)?
            } else {
                return Err(Error::Options(
                    "one of --docx, --documentXml or --documentXmlRels is required".into(),
                ));
            };
            print!(
                "{}",
                report::format_listing(listing.relationships.as_ref(), listing.images.as_deref())
            );
        }
        Command::Version => println!("{}", env!("CARGO_PKG_VERSION")),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
