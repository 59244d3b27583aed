use std::io::{Read, Seek};

use fnv::FnvHashSet;

use super::{dict_types, Document, K_KIDS, K_PAGES, K_TYPE};
use crate::{
    error::Result,
    pdf::{Dictionary, Object, ObjectId, Reference},
};

/// A leaf of the page tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageEntry {
    /// `None` for pages written directly into a `/Kids` array.
    pub reference: Option<Reference>,
    pub dictionary: Dictionary,
}

enum Step<'a> {
    Enter(&'a Object),
    /// All kids of the node are done.
    Leave(ObjectId),
}

/// Collect the `/Type /Page` leaves below the catalog's `/Pages`, pre-order
/// and left to right.
pub(crate) fn flatten<R: Read + Seek>(document: &Document<R>) -> Result<Vec<PageEntry>> {
    let root = Object::Reference(document.root());
    let catalog = document.resolve_dictionary(&root, "/Root")?;
    let tree = catalog
        .get(K_PAGES)
        .ok_or_else(|| document.format_error(None, "catalog has no /Pages"))?;

    let mut pages = Vec::new();
    let mut visited = FnvHashSet::default();
    // intermediate nodes on the path from the root to the current node
    let mut ancestors = FnvHashSet::default();
    let mut stack = vec![Step::Enter(tree)];

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Enter(node) => node,
            Step::Leave(id) => {
                ancestors.remove(&id);
                continue;
            }
        };

        let reference = node.reference().copied();
        if let Some(reference) = reference {
            if ancestors.contains(&reference.index()) {
                return Err(document.format_error(None, format!("page tree cycle at {}", reference)));
            }
            if !visited.insert(reference.index()) {
                return Err(document.format_error(
                    None,
                    format!("page tree node {} appears more than once", reference),
                ));
            }
        }

        let dict = document.resolve_dictionary(node, "page tree node")?;
        let node_type = dict.get(K_TYPE).and_then(Object::name);
        match (node_type, dict.get(K_KIDS)) {
            (Some(dict_types::PAGE), _) => pages.push(PageEntry {
                reference,
                dictionary: dict.clone(),
            }),
            (Some(dict_types::PAGES) | None, Some(kids)) => {
                let kids = document.resolve(kids)?.array().ok_or_else(|| {
                    document.format_error(None, format!("/Kids of {} is not an array", describe(reference)))
                })?;
                if let Some(reference) = reference {
                    ancestors.insert(reference.index());
                    stack.push(Step::Leave(reference.index()));
                }
                // reversed, so the first kid is visited next
                stack.extend(kids.iter().rev().map(Step::Enter));
            }
            (node_type, _) => log::warn!(
                "{}: skipping page tree node {} of type {}",
                document.source_id(),
                describe(reference),
                node_type.map_or_else(|| "<none>".into(), String::from_utf8_lossy)
            ),
        }
    }

    log::debug!("flattened page tree into {} pages", pages.len());
    Ok(pages)
}

fn describe(reference: Option<Reference>) -> String {
    reference.map_or_else(|| "<direct object>".to_owned(), |r| r.to_string())
}
