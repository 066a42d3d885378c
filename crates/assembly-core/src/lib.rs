//! Document assembler
//!
//! Composites every collected signature plus resident metadata onto the
//! uploaded base document: the base pages are carried over untouched and one
//! or more signature sheets are appended, one roster row per resident,
//! paginating as space runs out.
//!
//! Layout is a pure function of the inputs and the constants in `layout`, so
//! assembling the same book twice yields byte-identical output (the
//! generated-on date is an explicit input for exactly that reason).

pub mod content;
pub mod error;
pub mod image_xobject;
pub mod layout;
pub mod page;

pub use error::AssemblyError;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{NaiveDate, Utc};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::warn;

use shared_types::{Roster, SignatureBook, SignatureRecord};

use crate::content::{image_op, rule_op, text_op};
use crate::image_xobject::{add_image_xobject, decode_signature_png, EmbeddedImage};

/// One signature sheet being laid out: accumulated content operators plus the
/// image XObjects its resources must reference.
struct Sheet {
    ops: String,
    images: Vec<(String, EmbeddedImage)>,
}

impl Sheet {
    fn new() -> Self {
        Self {
            ops: String::new(),
            images: Vec::new(),
        }
    }
}

/// Assemble with today's date stamped in the sheet header.
pub fn assemble(
    base_pdf: &[u8],
    roster: &Roster,
    book: &SignatureBook,
) -> Result<Vec<u8>, AssemblyError> {
    assemble_at(base_pdf, roster, book, Utc::now().date_naive())
}

/// Assemble the signed document: base pages plus appended signature sheets.
///
/// Residents are visited in roster order, never store order. A row either
/// carries the resident's name, date and trimmed signature image, or the
/// not-signed marker; a malformed stored image degrades that one row to the
/// marker instead of failing the whole assembly.
pub fn assemble_at(
    base_pdf: &[u8],
    roster: &Roster,
    book: &SignatureBook,
    generated_on: NaiveDate,
) -> Result<Vec<u8>, AssemblyError> {
    let mut doc =
        Document::load_mem(base_pdf).map_err(|e| AssemblyError::Parse(e.to_string()))?;

    let media_box = page::first_page_media_box(&doc);
    let (page_width, page_height) = (media_box[2], media_box[3]);

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let signed = roster.iter().filter(|r| book.contains_key(&r.id)).count();

    let mut sheets: Vec<Sheet> = Vec::new();
    let mut sheet = Sheet::new();
    sheet.ops += &header_ops(true, page_width, page_height, generated_on, signed, roster.len());
    let mut y = layout::first_row_y(page_height, true);

    for resident in roster.iter() {
        if y < layout::BOTTOM_MARGIN {
            sheets.push(sheet);
            sheet = Sheet::new();
            sheet.ops +=
                &header_ops(false, page_width, page_height, generated_on, signed, roster.len());
            y = layout::first_row_y(page_height, false);
        }

        sheet.ops += &text_op(layout::COL_APT_X, y, 10.0, &resident.id.to_string());
        match book.get(&resident.id) {
            Some(record) => draw_signed_row(&mut doc, &mut sheet, record, y),
            None => {
                sheet.ops += &text_op(layout::COL_NAME_X, y, 10.0, layout::NOT_SIGNED_MARKER);
            }
        }

        y -= layout::ROW_HEIGHT;
    }
    sheets.push(sheet);

    let pages_id = page::pages_root(&doc)?;
    let mut new_page_ids = Vec::new();
    for sheet in sheets {
        new_page_ids.push(materialize_sheet(
            &mut doc, sheet, pages_id, font_id, page_width, page_height,
        ));
    }
    page::append_pages(&mut doc, &new_page_ids)?;

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AssemblyError::Render(e.to_string()))?;
    Ok(buffer)
}

/// Title block (first sheet only), column headers and the rule beneath them.
fn header_ops(
    first_sheet: bool,
    page_width: f64,
    page_height: f64,
    generated_on: NaiveDate,
    signed: usize,
    total: usize,
) -> String {
    let mut ops = String::new();

    if first_sheet {
        ops += &text_op(
            layout::MARGIN_X,
            page_height - layout::TITLE_OFFSET,
            18.0,
            layout::SHEET_TITLE,
        );
        ops += &text_op(
            layout::MARGIN_X,
            page_height - layout::GENERATED_OFFSET,
            11.0,
            &format!("Generated: {}", generated_on.format("%Y-%m-%d")),
        );
        let percentage = ((signed as f64 / total as f64) * 100.0).round() as u32;
        ops += &text_op(
            layout::MARGIN_X,
            page_height - layout::PROGRESS_OFFSET,
            12.0,
            &format!("Signed: {}/{} ({}%)", signed, total, percentage),
        );
    }

    let header_y = layout::table_top(page_height, first_sheet);
    ops += &text_op(layout::COL_APT_X, header_y, 11.0, "Apt");
    ops += &text_op(layout::COL_NAME_X, header_y, 11.0, "Name");
    ops += &text_op(layout::COL_DATE_X, header_y, 11.0, "Date");
    ops += &text_op(layout::COL_SIGNATURE_X, header_y, 11.0, "Signature");
    ops += &rule_op(layout::MARGIN_X, page_width - layout::MARGIN_X, header_y - 6.0);

    ops
}

fn draw_signed_row(doc: &mut Document, sheet: &mut Sheet, record: &SignatureRecord, y: f64) {
    sheet.ops += &text_op(layout::COL_NAME_X, y, 10.0, &record.full_name);
    sheet.ops += &text_op(layout::COL_DATE_X, y, 10.0, &record.date_value);

    match embed_signature(doc, record) {
        Ok(embedded) => {
            let scale = layout::SIGNATURE_TARGET_WIDTH / embedded.width as f64;
            let width = layout::SIGNATURE_TARGET_WIDTH;
            let height = embedded.height as f64 * scale;
            let name = format!("Sig{}", record.resident_id);
            sheet.ops += &image_op(&name, layout::COL_SIGNATURE_X, y - 5.0, width, height);
            sheet.images.push((name, embedded));
        }
        Err(reason) => {
            warn!(
                "skipping signature image for apartment {}: {}",
                record.resident_id, reason
            );
            sheet.ops += &text_op(layout::COL_SIGNATURE_X, y, 10.0, layout::NOT_SIGNED_MARKER);
        }
    }
}

fn embed_signature(doc: &mut Document, record: &SignatureRecord) -> Result<EmbeddedImage, String> {
    let png = BASE64
        .decode(&record.signature_png)
        .map_err(|e| e.to_string())?;
    let raster = decode_signature_png(&png)?;
    add_image_xobject(doc, &raster)
}

fn materialize_sheet(
    doc: &mut Document,
    sheet: Sheet,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_width: f64,
    page_height: f64,
) -> ObjectId {
    let content_id = doc.add_object(Stream::new(dictionary! {}, sheet.ops.into_bytes()));

    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    if !sheet.images.is_empty() {
        let mut xobjects = Dictionary::new();
        for (name, embedded) in &sheet.images {
            xobjects.set(name.as_bytes().to_vec(), Object::Reference(embedded.object_id));
        }
        resources.set("XObject", Object::Dictionary(xobjects));
    }

    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => Object::Array(vec![
            0.into(),
            0.into(),
            Object::Real(page_width as f32),
            Object::Real(page_height as f32),
        ]),
        "Resources" => Object::Dictionary(resources),
        "Contents" => Object::Reference(content_id),
    })
}

#[cfg(test)]
pub(crate) mod testutil;
