//! Page-tree access on the base document

use lopdf::{Document, Object, ObjectId};

use crate::error::AssemblyError;

/// US Letter, the fallback when the base document carries no usable MediaBox.
const LETTER: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// MediaBox of the base document's first page as `[x, y, width, height]`.
///
/// Appended signature sheets take their size from this so the output reads as
/// one document.
pub fn first_page_media_box(doc: &Document) -> [f64; 4] {
    let Some((_, first)) = doc.get_pages().into_iter().next() else {
        return LETTER;
    };
    media_box_of(doc, first).unwrap_or(LETTER)
}

fn media_box_of(doc: &Document, page_id: ObjectId) -> Option<[f64; 4]> {
    let dict = doc.get_object(page_id).ok()?.as_dict().ok()?;

    if let Ok(obj) = dict.get(b"MediaBox") {
        return parse_rect(doc, obj);
    }

    // inheritable attribute: fall back to the parent node
    let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
    let parent = doc.get_object(parent_id).ok()?.as_dict().ok()?;
    parse_rect(doc, parent.get(b"MediaBox").ok()?)
}

/// Parse a PDF rectangle `[x1 y1 x2 y2]` into `[x, y, width, height]`.
fn parse_rect(doc: &Document, obj: &Object) -> Option<[f64; 4]> {
    let arr = match obj {
        Object::Array(a) => a.clone(),
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?.clone(),
        _ => return None,
    };
    if arr.len() != 4 {
        return None;
    }

    let mut values = [0.0f64; 4];
    for (i, item) in arr.iter().enumerate() {
        values[i] = number(doc, item)?;
    }

    Some([
        values[0],
        values[1],
        values[2] - values[0],
        values[3] - values[1],
    ])
}

fn number(doc: &Document, obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        Object::Reference(id) => number(doc, doc.get_object(*id).ok()?),
        _ => None,
    }
}

/// The root Pages node referenced by the catalog.
pub fn pages_root(doc: &Document) -> Result<ObjectId, AssemblyError> {
    let catalog = doc
        .catalog()
        .map_err(|e| AssemblyError::Render(format!("failed to get catalog: {}", e)))?;
    catalog
        .get(b"Pages")
        .and_then(|obj| obj.as_reference())
        .map_err(|_| AssemblyError::Render("catalog has no Pages reference".into()))
}

/// Append already-registered page objects to the root Kids array and bump
/// Count by the number of added leaves.
pub fn append_pages(doc: &mut Document, new_pages: &[ObjectId]) -> Result<(), AssemblyError> {
    let pages_id = pages_root(doc)?;

    let (mut kids, count) = {
        let dict = doc
            .get_object(pages_id)
            .and_then(|obj| obj.as_dict())
            .map_err(|e| AssemblyError::Render(format!("failed to get page tree: {}", e)))?;

        let kids = match dict.get(b"Kids") {
            Ok(Object::Array(a)) => a.clone(),
            Ok(Object::Reference(id)) => doc
                .get_object(*id)
                .and_then(|obj| obj.as_array())
                .map_err(|_| AssemblyError::Render("Kids reference is not an array".into()))?
                .clone(),
            _ => return Err(AssemblyError::Render("page tree has no Kids array".into())),
        };

        let count = dict
            .get(b"Count")
            .ok()
            .and_then(|obj| obj.as_i64().ok())
            .unwrap_or(kids.len() as i64);

        (kids, count)
    };

    kids.extend(new_pages.iter().map(|id| Object::Reference(*id)));

    let dict = doc
        .get_object_mut(pages_id)
        .and_then(|obj| obj.as_dict_mut())
        .map_err(|e| AssemblyError::Render(format!("failed to update page tree: {}", e)))?;
    dict.set("Kids", Object::Array(kids));
    dict.set("Count", count + new_pages.len() as i64);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::base_pdf;
    use lopdf::dictionary;

    #[test]
    fn test_media_box_of_fixture() {
        let doc = Document::load_mem(&base_pdf(612.0, 520.0)).unwrap();
        assert_eq!(first_page_media_box(&doc), [0.0, 0.0, 612.0, 520.0]);
    }

    #[test]
    fn test_media_box_falls_back_to_letter() {
        let doc = Document::new();
        assert_eq!(first_page_media_box(&doc), [0.0, 0.0, 612.0, 792.0]);
    }

    #[test]
    fn test_append_pages_grows_page_tree() {
        let mut doc = Document::load_mem(&base_pdf(612.0, 792.0)).unwrap();
        let pages_id = pages_root(&doc).unwrap();

        let extra = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => Object::Array(vec![
                0.into(),
                0.into(),
                Object::Real(612.0),
                Object::Real(792.0),
            ]),
        });
        append_pages(&mut doc, &[extra]).unwrap();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        let reloaded = Document::load_mem(&buffer).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }
}
