//! Canvas to PDF serialization
//!
//! Text uses the standard Helvetica faces with WinAnsiEncoding, so no font
//! program is embedded. Content streams and image samples are zlib
//! compressed; transparent rasters carry a DeviceGray soft mask.

use crate::layout::canvas::{Canvas, DrawOp, Page, RasterImage};
use crate::layout::fonts::FontFace;
use crate::pdf::encoding;
use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use miniz_oxide::deflate::compress_to_vec_zlib;
use thiserror::Error;

const PDF_VERSION: &str = "1.5";
const COMPRESSION_LEVEL: u8 = 6;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Document has no pages")]
    EmptyDocument,

    #[error("Failed to encode page {page} content: {reason}")]
    Content { page: usize, reason: String },

    #[error("Failed to write document: {0}")]
    Write(String),
}

/// Values for the document information dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub producer: String,
    /// The only timestamp embedded in the output
    pub created_at: DateTime<Utc>,
}

impl DocumentInfo {
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            producer: concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")).to_string(),
            created_at,
        }
    }
}

fn literal(bytes: Vec<u8>) -> Object {
    Object::String(bytes, StringFormat::Literal)
}

fn pdf_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("D:%Y%m%d%H%M%SZ").to_string()
}

fn flate_stream(mut dict: Dictionary, data: &[u8]) -> Stream {
    dict.set("Filter", "FlateDecode");
    Stream::new(dict, compress_to_vec_zlib(data, COMPRESSION_LEVEL))
}

fn add_image(document: &mut Document, image: &RasterImage) -> ObjectId {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(image.width()),
        "Height" => i64::from(image.height()),
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };

    if let Some(alpha) = image.alpha() {
        let mask = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.width()),
            "Height" => i64::from(image.height()),
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        };
        let mask_id = document.add_object(flate_stream(mask, alpha));
        dict.set("SMask", mask_id);
    }

    document.add_object(flate_stream(dict, image.rgb()))
}

/// Content operations for one page plus the image XObjects it references
fn page_content(
    document: &mut Document,
    page: &Page,
) -> (Vec<Operation>, Vec<(String, ObjectId)>) {
    let mut operations = Vec::new();
    let mut images = Vec::new();

    for op in page.ops() {
        match op {
            DrawOp::Text {
                x,
                y,
                text,
                face,
                size,
            } => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![face.resource_name().into(), (*size).into()],
                ));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                operations.push(Operation::new("Tj", vec![literal(encoding::encode(text))]));
                operations.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rect { rect, line_width } => {
                operations.push(Operation::new("q", vec![]));
                operations.push(Operation::new("w", vec![(*line_width).into()]));
                operations.push(Operation::new(
                    "re",
                    vec![
                        rect.x.into(),
                        rect.y.into(),
                        rect.width.into(),
                        rect.height.into(),
                    ],
                ));
                operations.push(Operation::new("S", vec![]));
                operations.push(Operation::new("Q", vec![]));
            }
            DrawOp::Image { rect, image } => {
                let name = format!("Im{}", images.len() + 1);
                images.push((name.clone(), add_image(document, image)));
                operations.push(Operation::new("q", vec![]));
                operations.push(Operation::new(
                    "cm",
                    vec![
                        rect.width.into(),
                        0.into(),
                        0.into(),
                        rect.height.into(),
                        rect.x.into(),
                        rect.y.into(),
                    ],
                ));
                operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
                operations.push(Operation::new("Q", vec![]));
            }
        }
    }

    (operations, images)
}

/// Serialize every page of `canvas` into a standalone PDF
///
/// Object numbering follows drawing order, so identical canvases and info
/// produce identical bytes.
pub fn write_pdf(canvas: &Canvas, info: &DocumentInfo) -> Result<Vec<u8>, PdfError> {
    if canvas.page_count() == 0 {
        return Err(PdfError::EmptyDocument);
    }

    let mut document = Document::with_version(PDF_VERSION);
    let pages_id = document.new_object_id();

    let mut fonts = Dictionary::new();
    for face in [FontFace::Regular, FontFace::Bold] {
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }

    let format = canvas.format();
    let mut kids = Vec::with_capacity(canvas.page_count());
    for (index, page) in canvas.pages().iter().enumerate() {
        let (operations, images) = page_content(&mut document, page);
        let content = Content { operations }
            .encode()
            .map_err(|e| PdfError::Content {
                page: index,
                reason: e.to_string(),
            })?;
        let content_id = document.add_object(flate_stream(Dictionary::new(), &content));

        let mut resources = dictionary! { "Font" => fonts.clone() };
        if !images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (name, id) in images {
                xobjects.set(name, id);
            }
            resources.set("XObject", xobjects);
        }

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::from(0),
                Object::from(0),
                Object::from(format.width),
                Object::from(format.height),
            ],
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = document.add_object(dictionary! {
        "Title" => literal(encoding::encode(&info.title)),
        "Producer" => literal(encoding::encode(&info.producer)),
        "CreationDate" => literal(pdf_date(info.created_at).into_bytes()),
    });
    document.trailer.set("Root", catalog_id);
    document.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| PdfError::Write(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::Rect;
    use chrono::TimeZone;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn info() -> DocumentInfo {
        DocumentInfo::new(
            "Relatório de Temperatura",
            Utc.with_ymd_and_hms(2024, 6, 4, 3, 0, 0).unwrap(),
        )
    }

    fn sample_canvas() -> Canvas {
        let mut canvas = Canvas::default();
        let page = canvas.ensure_page();
        canvas
            .draw_text(page, 75.0, 700.0, "TEMPERATURA (°C)", FontFace::Bold, 11.0)
            .unwrap();
        canvas
            .draw_rect(page, Rect::new(47.1, 575.8, 39.2, 17.6), 0.7)
            .unwrap();

        let mut png = Cursor::new(Vec::new());
        RgbaImage::from_pixel(4, 2, Rgba([0, 0, 139, 0]))
            .write_to(&mut png, ImageFormat::Png)
            .unwrap();
        canvas
            .draw_image(page, Rect::new(70.0, 80.0, 200.0, 65.0), png.get_ref())
            .unwrap();

        let second = canvas.add_page();
        canvas
            .draw_text(second, 25.0, 791.9, "continuação", FontFace::Regular, 10.0)
            .unwrap();
        canvas
    }

    #[test]
    fn test_written_document_reloads_with_all_pages() {
        let bytes = write_pdf(&sample_canvas(), &info()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let document = Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 2);
    }

    #[test]
    fn test_identical_input_is_byte_identical() {
        let canvas = sample_canvas();
        assert_eq!(
            write_pdf(&canvas, &info()).unwrap(),
            write_pdf(&canvas, &info()).unwrap()
        );
    }

    #[test]
    fn test_empty_canvas_is_rejected() {
        let err = write_pdf(&Canvas::default(), &info()).unwrap_err();
        assert!(matches!(err, PdfError::EmptyDocument));
    }

    #[test]
    fn test_creation_date_format() {
        assert_eq!(
            pdf_date(Utc.with_ymd_and_hms(2024, 6, 4, 3, 0, 0).unwrap()),
            "D:20240604030000Z"
        );
    }
}
