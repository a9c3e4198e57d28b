//! Page tree manipulation on lopdf documents.
//!
//! Pages are imported one at a time: the page dictionary is flattened so it
//! no longer depends on attributes inherited from its old parents, then
//! every object it references is copied across. Other page tree nodes are
//! never followed, so importing one page does not drag the rest of the
//! source document along.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::BTreeSet;

use super::{CapabilityError, CapabilityResult};

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page tree depth beyond which the parent chain is treated as cyclic.
const MAX_TREE_DEPTH: usize = 64;

/// Build an empty document with a catalog and an empty page tree.
pub(crate) fn empty_document(version: &str) -> Document {
    let mut doc = Document::with_version(version);

    let pages_id = doc.new_object_id();
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => 0,
    };
    doc.objects.insert(pages_id, pages.into());

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Object id of the root `Pages` node.
pub(crate) fn pages_root(doc: &Document) -> CapabilityResult<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| CapabilityError::copy(format!("Failed to get pages reference: {e}")))
}

/// Copy of the page dictionary with inherited attributes made explicit and
/// the `Parent` link removed.
pub(crate) fn flattened_page(doc: &Document, page_id: ObjectId) -> CapabilityResult<Dictionary> {
    let mut page = doc
        .get_dictionary(page_id)
        .map_err(|e| CapabilityError::copy(format!("Failed to get page {page_id:?}: {e}")))?
        .clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            return Err(CapabilityError::copy("Page tree is too deep or cyclic"));
        }

        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };

        for key in INHERITABLE {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key, value.clone());
            }
        }

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    page.remove(b"Parent");
    Ok(page)
}

/// Import the page `page_id` of `source` into `target` without attaching it
/// to the page tree.
///
/// `source` must already be renumbered so its ids do not collide with
/// `target`'s. The page keeps its id.
pub(crate) fn import_page(
    target: &mut Document,
    source: &Document,
    page_id: ObjectId,
) -> CapabilityResult<ObjectId> {
    let page = flattened_page(source, page_id)?;

    let mut visited = BTreeSet::from([page_id]);
    for (_, value) in page.iter() {
        copy_references(target, source, value, &mut visited);
    }

    target.objects.insert(page_id, Object::Dictionary(page));
    target.max_id = target.max_id.max(page_id.0);

    Ok(page_id)
}

/// Copy every object reachable from `obj` into `target`.
///
/// Page and page tree nodes are not followed; references to them are left
/// as they are.
fn copy_references(
    target: &mut Document,
    source: &Document,
    obj: &Object,
    visited: &mut BTreeSet<ObjectId>,
) {
    match obj {
        Object::Reference(ref_id) => {
            if !visited.insert(*ref_id) || target.objects.contains_key(ref_id) {
                return;
            }
            let Ok(referenced) = source.get_object(*ref_id) else {
                return;
            };
            if is_page_tree_node(referenced) {
                return;
            }
            target.objects.insert(*ref_id, referenced.clone());
            target.max_id = target.max_id.max(ref_id.0);
            copy_references(target, source, referenced, visited);
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                copy_references(target, source, value, visited);
            }
        }
        Object::Array(items) => {
            for item in items {
                copy_references(target, source, item, visited);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                copy_references(target, source, value, visited);
            }
        }
        _ => {}
    }
}

fn is_page_tree_node(obj: &Object) -> bool {
    let dict = match obj {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page") | Ok(b"Pages")
    )
}

/// Attach an imported page at the end of the document's page tree.
pub(crate) fn append_page(doc: &mut Document, page_id: ObjectId) -> CapabilityResult<()> {
    let pages_id = pages_root(doc)?;

    let page = doc
        .get_dictionary_mut(page_id)
        .map_err(|e| CapabilityError::copy(format!("Copied page {page_id:?} is missing: {e}")))?;
    page.set("Parent", pages_id);

    let pages = doc
        .get_dictionary_mut(pages_id)
        .map_err(|e| CapabilityError::copy(format!("Failed to get pages object: {e}")))?;

    match pages.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.push(Object::Reference(page_id)),
        Ok(_) => return Err(CapabilityError::copy("Kids is not an array")),
        Err(_) => pages.set("Kids", vec![Object::Reference(page_id)]),
    }

    let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    pages.set("Count", count + 1);

    Ok(())
}
