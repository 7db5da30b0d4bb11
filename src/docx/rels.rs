//! Image relationships of the main document part.
//!
//! ```xml
//! <Relationship Id="rId648"
//!   Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image"
//!   Target="media/image335.jpeg"/>
//! ```

use std::collections::HashMap;
use std::path::Path;

use crate::error::Error;
use crate::model::Relationship;

use super::{PART_ROOT, read_part_file, validate_root};

pub const IMAGE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Relationships keyed by id, iterated in the order they appear in the part.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Relationships {
    rels: Vec<Relationship>,
    by_id: HashMap<String, usize>,
}

impl Relationships {
    pub fn insert(&mut self, rel: Relationship) {
        match self.by_id.get(&rel.id) {
            Some(&i) => self.rels[i] = rel,
            None => {
                self.by_id.insert(rel.id.clone(), self.rels.len());
                self.rels.push(rel);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&i| &self.rels[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn find_by_target(&self, target: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.target == target)
    }
}

impl FromIterator<Relationship> for Relationships {
    fn from_iter<I: IntoIterator<Item = Relationship>>(iter: I) -> Self {
        let mut rels = Relationships::default();
        for rel in iter {
            rels.insert(rel);
        }
        rels
    }
}

pub fn is_image_rel(rel: &Relationship) -> bool {
    rel.rel_type.ends_with("/image")
}

/// Every `<Relationship>` element of a relationships part, in document order.
pub fn all_relationships(xml: &roxmltree::Document) -> Result<Vec<Relationship>, Error> {
    validate_root(xml, "Relationships", "document.xml.rels")?;
    Ok(xml
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "Relationship")
        .filter_map(|n| {
            Some(Relationship {
                id: n.attribute("Id")?.to_string(),
                rel_type: n.attribute("Type").unwrap_or("").to_string(),
                target: n.attribute("Target").unwrap_or("").to_string(),
            })
        })
        .collect())
}

/// Image relationships of a parsed relationships part.
pub fn parse_relationships(xml: &roxmltree::Document) -> Result<Relationships, Error> {
    Ok(all_relationships(xml)?
        .into_iter()
        .filter(is_image_rel)
        .collect())
}

pub fn parse_relationships_str(xml_content: &str) -> Result<Relationships, Error> {
    let xml = roxmltree::Document::parse(xml_content)?;
    parse_relationships(&xml)
}

/// Image relationships of an already-extracted `document.xml.rels` file.
pub fn parse_relationships_file(path: &Path) -> Result<Relationships, Error> {
    parse_relationships_str(&read_part_file(path)?)
}

/// Archive path of the entry a relationship target points at.
/// Targets are relative to `word/` unless absolute.
pub fn entry_path_for_target(target: &str) -> String {
    target
        .strip_prefix('/')
        .map(String::from)
        .unwrap_or_else(|| format!("{PART_ROOT}{target}"))
}

/// The relationship whose target is the archive entry `entry_path`.
/// `None` for entries no relationship points at, e.g. `word/document.xml`.
pub fn resolve_relationship_for_entry<'a>(
    entry_path: &str,
    rels: &'a Relationships,
) -> Option<&'a Relationship> {
    let relative = entry_path.strip_prefix(PART_ROOT)?;
    rels.find_by_target(relative).or_else(|| {
        rels.iter()
            .find(|r| r.target.strip_prefix('/') == Some(entry_path))
    })
}
