//! In-process document service using lopdf and pdf-extract.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use tracing::debug;

use super::{DocumentService, Result, SplitPage, split_page_path};
use crate::error::DocumentError;

/// Document service backed by lopdf (split, merge) and pdf-extract (text).
#[derive(Debug, Clone, Default)]
pub struct NativeDocumentService;

impl NativeDocumentService {
    pub fn new() -> Self {
        Self
    }

    /// Load a PDF, decrypting empty-password documents. Also returns the
    /// (decrypted) bytes for pdf-extract.
    fn load(&self, path: &Path) -> Result<(Document, Vec<u8>)> {
        let data = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |reason: String| DocumentError::Parse {
            path: path.to_path_buf(),
            reason,
        };

        let mut doc = Document::load_mem(&data).map_err(|e| parse_error(e.to_string()))?;
        if !doc.is_encrypted() {
            return Ok((doc, data));
        }

        if doc.decrypt("").is_err() {
            return Err(DocumentError::Encrypted(path.to_path_buf()));
        }
        debug!("Decrypted {} with empty password", path.display());

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted)
            .map_err(|e| parse_error(format!("failed to save decrypted PDF: {e}")))?;
        Ok((doc, decrypted))
    }
}

impl DocumentService for NativeDocumentService {
    fn split_pages(&self, path: &Path) -> Result<Vec<SplitPage>> {
        let (doc, _) = self.load(path)?;
        let page_count = doc.get_pages().len() as u32;
        let split_error = |reason: String| DocumentError::Split {
            path: path.to_path_buf(),
            reason,
        };

        if page_count == 0 {
            return Err(split_error("PDF has no pages".to_string()));
        }

        let mut pages = Vec::with_capacity(page_count as usize);
        for number in 1..=page_count {
            let mut page_doc = doc.clone();

            // Delete in reverse so earlier page numbers stay valid.
            for other in (1..=page_count).rev().filter(|&n| n != number) {
                page_doc.delete_pages(&[other]);
            }
            page_doc.prune_objects();
            page_doc.compress();

            let page_path = split_page_path(path, number);
            page_doc
                .save(&page_path)
                .map_err(|e| split_error(format!("page {number}: {e}")))?;
            pages.push(SplitPage {
                number,
                path: page_path,
            });
        }

        debug!("Split {} into {} pages", path.display(), pages.len());
        Ok(pages)
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        let (_, data) = self.load(path)?;
        pdf_extract::extract_text_from_mem(&data).map_err(|e| DocumentError::TextExtraction {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn merge_pages(&self, first: &Path, second: &Path, target: &Path) -> Result<()> {
        let (first_doc, _) = self.load(first)?;
        let (second_doc, _) = self.load(second)?;
        let merge_error = |reason: String| DocumentError::Merge {
            target: target.to_path_buf(),
            reason,
        };

        let mut merged = merge_documents(first_doc, second_doc).map_err(merge_error)?;
        merged
            .save(target)
            .map_err(|e| merge_error(format!("save failed: {e}")))?;

        debug!(
            "Merged {} + {} into {}",
            first.display(),
            second.display(),
            target.display()
        );
        Ok(())
    }
}

/// Append the pages of `source` to `dest`, remapping object ids past
/// `dest.max_id`.
fn merge_documents(mut dest: Document, source: Document) -> std::result::Result<Document, String> {
    let mut page_refs: Vec<ObjectId> = dest.get_pages().values().copied().collect();
    let source_pages: Vec<ObjectId> = source.get_pages().values().copied().collect();
    let offset = dest.max_id;

    let remapped: BTreeMap<ObjectId, Object> = source
        .objects
        .into_iter()
        .map(|(id, object)| ((id.0 + offset, id.1), remap_object_refs(object, offset)))
        .collect();
    dest.objects.extend(remapped);

    page_refs.extend(source_pages.into_iter().map(|id| (id.0 + offset, id.1)));
    dest.max_id = dest.max_id.max(source.max_id + offset);

    // Point every page at the destination page tree.
    let pages_id = pages_root(&dest)?;
    for page_id in &page_refs {
        if let Some(Object::Dictionary(page)) = dest.objects.get_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    match dest.objects.get_mut(&pages_id) {
        Some(Object::Dictionary(pages)) => {
            let kids = page_refs.iter().map(|&id| Object::Reference(id)).collect();
            pages.set("Kids", Object::Array(kids));
            pages.set("Count", Object::Integer(page_refs.len() as i64));
        }
        _ => return Err("invalid pages dictionary".to_string()),
    }

    dest.compress();
    Ok(dest)
}

fn pages_root(doc: &Document) -> std::result::Result<ObjectId, String> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| "no Root reference in trailer".to_string())?;

    doc.get_object(catalog_id)
        .and_then(Object::as_dict)
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| "no Pages reference in catalog".to_string())
}

fn remap_object_refs(object: Object, offset: u32) -> Object {
    match object {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(items) => Object::Array(
            items
                .into_iter()
                .map(|item| remap_object_refs(item, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}
