//! PDF output for contact sheets, built on `lopdf`.
//!
//! Each page gets one content stream and its own resource dictionary:
//! the shared Helvetica font plus the image XObjects drawn on that page.
//! Images are re-encoded as JPEG (`DCTDecode`) at the configured DPI for
//! their placed size, so a sheet of camera originals stays small.
//!
//! Rotated images are drawn inside a `q … Q` block with the cell origin
//! translated and a quarter-turn `cm`, matching
//! [`fit`](crate::layout::fit)'s frame.

use crate::config::{Config, ConfigError, parse_color};
use crate::imaging::{Quality, encode_jpeg_within};
use crate::layout::label::win_ansi_bytes;
use crate::layout::{CanvasError, Fit, Orientation, Rect, SheetCanvas};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;

const FONT_NAME: &str = "F1";
const STROKE_WIDTH: f32 = 0.5;

/// Colors and encoding settings for a [`PdfCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStyle {
    pub page_size: (f32, f32),
    /// Page fill; `None` leaves pages white.
    pub background: Option<[f32; 3]>,
    pub label: [f32; 3],
    pub cell_border: [f32; 3],
    pub image_border: [f32; 3],
    pub dpi: u32,
    pub quality: Quality,
}

impl PdfStyle {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let sheet = &config.sheet;
        let colors = &config.colors;
        let background = if sheet.background {
            Some(parse_color(&colors.background)?)
        } else {
            None
        };
        Ok(Self {
            page_size: (
                crate::layout::cm_to_pt(sheet.page_width_cm),
                crate::layout::cm_to_pt(sheet.page_height_cm),
            ),
            background,
            label: parse_color(&colors.label)?,
            cell_border: parse_color(&colors.cell_border)?,
            image_border: parse_color(&colors.image_border)?,
            dpi: sheet.image_dpi,
            quality: Quality::new(sheet.jpeg_quality),
        })
    }
}

/// An image XObject registered in the document.
#[derive(Debug, Clone)]
pub struct PdfImage {
    name: String,
    id: ObjectId,
}

/// A [`SheetCanvas`] that assembles a `lopdf::Document` in memory.
pub struct PdfCanvas {
    doc: Document,
    style: PdfStyle,
    pages_id: ObjectId,
    font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    /// Operations of the page being drawn, `None` before the first page.
    ops: Option<Vec<Operation>>,
    /// XObjects referenced by the page being drawn.
    page_images: Vec<PdfImage>,
    images_added: usize,
}

fn reals(values: &[f32]) -> Vec<Object> {
    values.iter().map(|v| (*v).into()).collect()
}

fn op(operator: &str, operands: &[f32]) -> Operation {
    Operation::new(operator, reals(operands))
}

/// `cm` operators that move user space into the drawing frame of a cell.
fn frame_ops(origin: (f32, f32), orientation: Orientation) -> Vec<Operation> {
    let mut ops = vec![op("cm", &[1.0, 0.0, 0.0, 1.0, origin.0, origin.1])];
    if orientation == Orientation::Rotated {
        ops.push(op("cm", &[0.0, 1.0, -1.0, 0.0, 0.0, 0.0]));
    }
    ops
}

impl PdfCanvas {
    pub fn new(style: PdfStyle) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        Self {
            doc,
            style,
            pages_id,
            font_id,
            page_ids: Vec::new(),
            ops: None,
            page_images: Vec::new(),
            images_added: 0,
        }
    }

    fn push(&mut self, operation: Operation) {
        if let Some(ops) = self.ops.as_mut() {
            ops.push(operation);
        }
    }

    fn open_page_ops(&self) -> Vec<Operation> {
        let mut ops = vec![op("w", &[STROKE_WIDTH])];
        if let Some(fill) = self.style.background {
            let (w, h) = self.style.page_size;
            ops.push(op("rg", &fill));
            ops.push(op("re", &[0.0, 0.0, w, h]));
            ops.push(Operation::new("f", vec![]));
        }
        ops
    }

    /// Write the current page's content stream and page object.
    fn close_page(&mut self) -> Result<(), CanvasError> {
        let Some(operations) = self.ops.take() else {
            return Ok(());
        };
        let content = Content { operations }
            .encode()
            .map_err(|e| CanvasError::Document(e.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), content));

        let mut xobjects = Dictionary::new();
        for image in self.page_images.drain(..) {
            xobjects.set(image.name, image.id);
        }
        let resources = dictionary! {
            "Font" => dictionary! { FONT_NAME => self.font_id },
            "XObject" => xobjects,
        };

        let (w, h) = self.style.page_size;
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => reals(&[0.0, 0.0, w, h]),
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn stroke_rect(&mut self, color: [f32; 3], rect: Rect) {
        self.push(op("RG", &color));
        self.push(op("re", &[rect.x, rect.y, rect.width, rect.height]));
        self.push(Operation::new("S", vec![]));
    }
}

impl SheetCanvas for PdfCanvas {
    type Image = PdfImage;
    type Output = Document;

    fn begin_page(&mut self) -> Result<(), CanvasError> {
        self.close_page()?;
        self.ops = Some(self.open_page_ops());
        Ok(())
    }

    fn prepare_image(&mut self, path: &Path, placed: (f32, f32)) -> Result<PdfImage, CanvasError> {
        let jpeg = encode_jpeg_within(path, placed, self.style.dpi, self.style.quality)?;
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => jpeg.width as i64,
            "Height" => jpeg.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        };
        // Already JPEG; deflating it again only costs time.
        let id = self
            .doc
            .add_object(Stream::new(dict, jpeg.data).with_compression(false));
        self.images_added += 1;
        Ok(PdfImage {
            name: format!("Im{}", self.images_added),
            id,
        })
    }

    fn stroke_cell(&mut self, cell: Rect) {
        self.stroke_rect(self.style.cell_border, cell);
    }

    fn draw_label(&mut self, text: &str, x: f32, baseline: f32, font_size: f32) {
        let color = self.style.label;
        self.push(op("rg", &color));
        self.push(Operation::new("BT", vec![]));
        self.push(Operation::new(
            "Tf",
            vec![FONT_NAME.into(), font_size.into()],
        ));
        self.push(op("Td", &[x, baseline]));
        self.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi_bytes(text))],
        ));
        self.push(Operation::new("ET", vec![]));
    }

    fn draw_image(&mut self, image: PdfImage, origin: (f32, f32), fit: &Fit) {
        let (w, h) = fit.scaled;
        let (u, v) = fit.offset;
        self.push(Operation::new("q", vec![]));
        for operation in frame_ops(origin, fit.orientation) {
            self.push(operation);
        }
        self.push(op("cm", &[w, 0.0, 0.0, h, u, v]));
        self.push(Operation::new("Do", vec![Object::Name(image.name.as_bytes().to_vec())]));
        self.push(Operation::new("Q", vec![]));
        self.page_images.push(image);
    }

    fn stroke_image(&mut self, origin: (f32, f32), fit: &Fit) {
        let (w, h) = fit.scaled;
        let (u, v) = fit.offset;
        self.push(Operation::new("q", vec![]));
        for operation in frame_ops(origin, fit.orientation) {
            self.push(operation);
        }
        self.stroke_rect(self.style.image_border, Rect::new(u, v, w, h));
        self.push(Operation::new("Q", vec![]));
    }

    fn finish(&mut self) -> Result<Document, CanvasError> {
        self.close_page()?;

        let (w, h) = self.style.page_size;
        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
            "MediaBox" => reals(&[0.0, 0.0, w, h]),
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        Ok(std::mem::replace(
            &mut self.doc,
            Document::with_version("1.5"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CellStyle, GridLayout, GridSpec, ImageDescriptor};
    use crate::test_helpers::{create_test_jpeg, create_test_png};

    fn style() -> PdfStyle {
        PdfStyle::from_config(&Config::default()).unwrap()
    }

    fn page_ops(doc: &Document, page: ObjectId) -> Vec<String> {
        let content = doc.get_and_decode_page_content(page).unwrap();
        content.operations.into_iter().map(|o| o.operator).collect()
    }

    #[test]
    fn style_from_default_config() {
        let style = style();
        assert!((style.page_size.0 - 792.0).abs() < 0.01);
        assert!((style.page_size.1 - 1224.0).abs() < 0.01);
        assert_eq!(style.background, None);
        assert_eq!(style.image_border, [0.4, 0.4, 0.4]);
    }

    #[test]
    fn background_color_only_when_enabled() {
        let mut config = Config::default();
        config.sheet.background = true;
        config.colors.background = "#fff".into();
        let style = PdfStyle::from_config(&config).unwrap();
        assert_eq!(style.background, Some([1.0, 1.0, 1.0]));
    }

    #[test]
    fn empty_sheet_is_one_blank_page() {
        let mut canvas = PdfCanvas::new(style());
        canvas.begin_page().unwrap();
        let doc = canvas.finish().unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn images_are_embedded_per_page() {
        let tmp = tempfile::TempDir::new().unwrap();
        let wide = tmp.path().join("wide.jpg");
        let tall = tmp.path().join("tall.png");
        create_test_jpeg(&wide, 300, 200);
        create_test_png(&tall, 200, 300);

        let spec = GridSpec {
            cols: 1,
            rows: 1,
            ..GridSpec::default()
        };
        let mut grid = GridLayout::new(spec, CellStyle::default(), PdfCanvas::new(style())).unwrap();
        grid.place(&ImageDescriptor::new(&wide, 300, 200)).unwrap();
        grid.place(&ImageDescriptor::new(&tall, 200, 300)).unwrap();
        let doc = grid.finish().unwrap();

        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);
        for page in pages.values() {
            let ops = page_ops(&doc, *page);
            assert_eq!(ops.iter().filter(|o| *o == "Do").count(), 1);
            assert_eq!(ops.iter().filter(|o| *o == "Tj").count(), 1);
        }
    }

    #[test]
    fn label_is_written_as_win_ansi() {
        let mut canvas = PdfCanvas::new(style());
        canvas.begin_page().unwrap();
        canvas.draw_label("Café.jpg", 10.0, 10.0, 6.0);
        let doc = canvas.finish().unwrap();

        let page = *doc.get_pages().values().next().unwrap();
        let content = doc.get_and_decode_page_content(page).unwrap();
        let shown = content
            .operations
            .iter()
            .find(|o| o.operator == "Tj")
            .and_then(|o| o.operands[0].as_str().ok())
            .unwrap()
            .to_vec();
        assert_eq!(shown, b"Caf\xe9.jpg".to_vec());
    }

    #[test]
    fn rotated_image_uses_quarter_turn() {
        let tmp = tempfile::TempDir::new().unwrap();
        let tall = tmp.path().join("tall.jpg");
        create_test_jpeg(&tall, 100, 200);

        let mut grid =
            GridLayout::new(GridSpec::default(), CellStyle::default(), PdfCanvas::new(style())).unwrap();
        grid.place(&ImageDescriptor::new(&tall, 100, 200)).unwrap();
        let doc = grid.finish().unwrap();

        let page = *doc.get_pages().values().next().unwrap();
        let content = doc.get_and_decode_page_content(page).unwrap();
        let quarter_turn = content.operations.iter().any(|o| {
            o.operator == "cm"
                && o.operands.iter().map(|v| v.as_float().unwrap_or(f32::NAN)).collect::<Vec<_>>()
                    == vec![0.0, 1.0, -1.0, 0.0, 0.0, 0.0]
        });
        assert!(quarter_turn);
    }

    #[test]
    fn background_fill_is_first_on_page() {
        let mut config = Config::default();
        config.sheet.background = true;
        let mut canvas = PdfCanvas::new(PdfStyle::from_config(&config).unwrap());
        canvas.begin_page().unwrap();
        let doc = canvas.finish().unwrap();

        let page = *doc.get_pages().values().next().unwrap();
        assert_eq!(page_ops(&doc, page), vec!["w", "rg", "re", "f"]);
    }

    #[test]
    fn saved_document_reloads() {
        let tmp = tempfile::TempDir::new().unwrap();
        let img = tmp.path().join("a.jpg");
        create_test_jpeg(&img, 64, 48);

        let mut grid =
            GridLayout::new(GridSpec::default(), CellStyle::default(), PdfCanvas::new(style())).unwrap();
        grid.place(&ImageDescriptor::new(&img, 64, 48)).unwrap();
        let mut doc = grid.finish().unwrap();

        let out = tmp.path().join("sheet.pdf");
        doc.save(&out).unwrap();
        let reloaded = Document::load(&out).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }
}
