//! Image references of `word/document.xml`.
//!
//! Images are `a:blip` elements whose `r:embed` names a relationship. A
//! sibling `a:srcRect` in the enclosing `pic:blipFill` says how the image is
//! cropped, each edge an inset in 1/100000ths of the image size:
//!
//! ```xml
//! <a:srcRect l="25510" t="40988" r="63045" b="33006"/>
//! ```

use std::path::Path;

use crate::error::Error;
use crate::model::{DocxImageRef, Extent, Placement, SrcRect, StructuralContext};

use super::dom::{
    closest, find_outermost_related_paragraph, find_previous_heading, in_fallback,
    is_heading, paragraph_info,
};
use super::{REL_NS, WPD_NS, parse_int_prefix, read_part_file, validate_root};

fn child_named<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn parse_src_rect(blip: roxmltree::Node) -> Option<SrcRect> {
    let blip_fill = blip.parent().and_then(|p| closest(p, "blipFill"))?;
    let rect = child_named(blip_fill, "srcRect")?;
    let edge = |name: &str| rect.attribute(name).and_then(parse_int_prefix);
    Some(SrcRect {
        l: edge("l"),
        t: edge("t"),
        r: edge("r"),
        b: edge("b"),
    })
}

fn parse_extent(blip: roxmltree::Node) -> Option<Extent> {
    let anchor = closest(blip, "anchor")?;
    let extent = child_named(anchor, "extent")?;
    let dim = |name: &str| extent.attribute(name).and_then(|v| v.trim().parse::<u64>().ok());
    Some(Extent {
        cx: dim("cx"),
        cy: dim("cy"),
    })
}

fn placement(blip: roxmltree::Node) -> Placement {
    blip.ancestors()
        .find(|n| n.tag_name().namespace() == Some(WPD_NS))
        .map(|n| match n.tag_name().name() {
            "inline" => Placement::Inline,
            "anchor" => Placement::Anchored,
            _ => Placement::Other,
        })
        .unwrap_or(Placement::Other)
}

fn structural_context(blip: roxmltree::Node) -> StructuralContext {
    let paragraph = find_outermost_related_paragraph(Some(blip));
    let heading = paragraph.and_then(|p| {
        if is_heading(p) {
            Some(p)
        } else {
            find_previous_heading(p)
        }
    });
    StructuralContext {
        placement: placement(blip),
        in_fallback: in_fallback(blip),
        paragraph: paragraph.map(paragraph_info),
        heading: heading.map(paragraph_info),
    }
}

/// Every image reference of a parsed `document.xml`, in document order.
pub fn parse_image_references(xml: &roxmltree::Document) -> Result<Vec<DocxImageRef>, Error> {
    validate_root(xml, "document", "document.xml")?;

    let images = xml
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "blip")
        .filter_map(|blip| {
            let embed = blip
                .attribute((REL_NS, "embed"))
                .filter(|id| !id.is_empty())?;
            Some(DocxImageRef {
                embed: embed.to_string(),
                src_rect: parse_src_rect(blip),
                extent: parse_extent(blip),
                context: structural_context(blip),
            })
        })
        .collect::<Vec<_>>();

    log::debug!("Found {} image references in document.xml", images.len());
    Ok(images)
}

pub fn parse_image_references_str(xml_content: &str) -> Result<Vec<DocxImageRef>, Error> {
    let xml = roxmltree::Document::parse(xml_content)?;
    parse_image_references(&xml)
}

/// Image references of an already-extracted `document.xml` file.
pub fn parse_image_references_file(path: &Path) -> Result<Vec<DocxImageRef>, Error> {
    parse_image_references_str(&read_part_file(path)?)
}
