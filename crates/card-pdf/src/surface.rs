use crate::types::{PdfError, Result};
use card_layout::constants::{HELVETICA_CHAR_WIDTH_RATIO, mm_to_pt};
use card_layout::{DrawingSurface, ImageAsset, TextRun};
use printpdf::*;
use std::collections::HashMap;

/// Baseline-to-baseline distance as a multiple of the font size
const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Underline stroke relative to the font size
const UNDERLINE_THICKNESS_FACTOR: f32 = 0.05;
const UNDERLINE_OFFSET_FACTOR: f32 = 0.12;

struct PageInProgress {
    width_mm: f32,
    height_mm: f32,
    ops: Vec<Op>,
}

/// A [`DrawingSurface`] that accumulates printpdf pages.
///
/// Text uses the PDF built-in fonts, so no font files are embedded.
pub struct PdfSurface {
    doc: PdfDocument,
    pages: Vec<PdfPage>,
    current: Option<PageInProgress>,
    // Keyed by (data pointer, length) so shared assets embed once
    images: HashMap<(usize, usize), XObjectId>,
    opacity_warned: bool,
}

impl PdfSurface {
    pub fn new(title: &str) -> Self {
        Self {
            doc: PdfDocument::new(title),
            pages: Vec::new(),
            current: None,
            images: HashMap::new(),
            opacity_warned: false,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    /// Close the last page and serialize the document
    pub fn finish(mut self) -> Vec<u8> {
        self.flush_page();
        self.doc.pages = self.pages;

        let mut warnings = Vec::new();
        let bytes = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::debug!("PDF serialization produced {} warnings", warnings.len());
        }
        bytes
    }

    fn flush_page(&mut self) {
        if let Some(page) = self.current.take() {
            self.pages.push(PdfPage::new(
                Mm(page.width_mm),
                Mm(page.height_mm),
                page.ops,
            ));
        }
    }

    fn page(&mut self) -> Result<&mut PageInProgress> {
        self.current
            .as_mut()
            .ok_or_else(|| PdfError::Pdf("Drawing before the first page was started".to_string()))
    }

    fn embed(&mut self, image: &ImageAsset) -> Result<XObjectId> {
        let key = (image.data().as_ptr() as usize, image.data().len());
        if let Some(id) = self.images.get(&key) {
            return Ok(id.clone());
        }

        let raw = raw_image(image.data())?;
        let id = self.doc.add_image(&raw);
        self.images.insert(key, id.clone());
        Ok(id)
    }
}

impl DrawingSurface for PdfSurface {
    type Error = PdfError;

    fn begin_page(&mut self, width_mm: f32, height_mm: f32) -> Result<()> {
        self.flush_page();
        self.current = Some(PageInProgress {
            width_mm,
            height_mm,
            ops: Vec::new(),
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: &card_layout::Rect, color: card_layout::Color) -> Result<()> {
        let page = self.page()?;
        let polygon = rect_polygon(rect, page.height_mm, PaintMode::Fill);
        page.ops.extend([
            Op::SaveGraphicsState,
            Op::SetFillColor { col: pdf_color(color) },
            Op::DrawPolygon { polygon },
            Op::RestoreGraphicsState,
        ]);
        Ok(())
    }

    fn stroke_rect(
        &mut self,
        rect: &card_layout::Rect,
        color: card_layout::Color,
        line_width_mm: f32,
    ) -> Result<()> {
        let page = self.page()?;
        let polygon = rect_polygon(rect, page.height_mm, PaintMode::Stroke);
        page.ops.extend([
            Op::SaveGraphicsState,
            Op::SetOutlineColor { col: pdf_color(color) },
            Op::SetOutlineThickness {
                pt: Pt(mm_to_pt(line_width_mm)),
            },
            Op::DrawPolygon { polygon },
            Op::RestoreGraphicsState,
        ]);
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun) -> Result<()> {
        let font = builtin_font(&run.font_family, run.bold, run.italic);
        let lines = match run.max_width_mm {
            Some(width) => wrap_text(&run.text, mm_to_pt(width), run.font_size_pt),
            None => vec![run.text.clone()],
        };

        let page = self.page()?;
        let x = mm_to_pt(run.x_mm);
        let first_baseline = mm_to_pt(page.height_mm - run.baseline_mm);
        let line_height = run.font_size_pt * LINE_HEIGHT_FACTOR;

        page.ops.push(Op::SaveGraphicsState);
        page.ops.push(Op::SetFillColor {
            col: pdf_color(run.color),
        });
        for (i, line) in lines.iter().enumerate() {
            let baseline = first_baseline - i as f32 * line_height;
            page.ops.push(Op::StartTextSection);
            page.ops.push(Op::SetFontSizeBuiltinFont {
                font,
                size: Pt(run.font_size_pt),
            });
            page.ops.push(Op::SetTextMatrix {
                matrix: TextMatrix::Translate(Pt(x), Pt(baseline)),
            });
            page.ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.clone())],
                font,
            });
            page.ops.push(Op::EndTextSection);

            if run.underline && !line.is_empty() {
                let y = baseline - run.font_size_pt * UNDERLINE_OFFSET_FACTOR;
                let width = estimate_width_pt(line, run.font_size_pt);
                page.ops.push(Op::SetOutlineColor {
                    col: pdf_color(run.color),
                });
                page.ops.push(Op::SetOutlineThickness {
                    pt: Pt(run.font_size_pt * UNDERLINE_THICKNESS_FACTOR),
                });
                page.ops.push(Op::DrawLine {
                    line: Line {
                        points: vec![
                            LinePoint {
                                p: Point { x: Pt(x), y: Pt(y) },
                                bezier: false,
                            },
                            LinePoint {
                                p: Point {
                                    x: Pt(x + width),
                                    y: Pt(y),
                                },
                                bezier: false,
                            },
                        ],
                        is_closed: false,
                    },
                });
            }
        }
        page.ops.push(Op::RestoreGraphicsState);
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &ImageAsset,
        rect: &card_layout::Rect,
        opacity_percent: u8,
    ) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Err(PdfError::Image("image has no pixels".to_string()));
        }
        if opacity_percent < 100 && !self.opacity_warned {
            log::warn!("Image opacity is not supported in PDF output; drawing opaque");
            self.opacity_warned = true;
        }

        self.page()?;
        let id = self.embed(image)?;
        let page = self.page()?;
        // At 72 dpi one pixel is one point
        let transform = XObjectTransform {
            translate_x: Some(Pt(mm_to_pt(rect.x))),
            translate_y: Some(Pt(mm_to_pt(page.height_mm - rect.bottom()))),
            scale_x: Some(mm_to_pt(rect.width) / image.width() as f32),
            scale_y: Some(mm_to_pt(rect.height) / image.height() as f32),
            dpi: Some(72.0),
            ..Default::default()
        };
        page.ops.push(Op::UseXobject { id, transform });
        Ok(())
    }
}

/// Decode encoded image bytes into the raw pixels printpdf embeds
pub(crate) fn raw_image(data: &[u8]) -> Result<RawImage> {
    let decoded = ::image::load_from_memory(data).map_err(|e| PdfError::Image(e.to_string()))?;
    let (width, height) = (decoded.width() as usize, decoded.height() as usize);
    let (pixels, data_format) = if decoded.color().has_alpha() {
        (decoded.into_rgba8().into_raw(), RawImageFormat::RGBA8)
    } else {
        (decoded.into_rgb8().into_raw(), RawImageFormat::RGB8)
    };
    Ok(RawImage {
        pixels: RawImageData::U8(pixels),
        width,
        height,
        data_format,
        tag: Vec::new(),
    })
}

fn pdf_color(color: card_layout::Color) -> printpdf::Color {
    let (r, g, b) = color.to_unit();
    printpdf::Color::Rgb(Rgb::new(r, g, b, None))
}

/// Closed rectangle path in PDF coordinates (origin bottom-left)
fn rect_polygon(rect: &card_layout::Rect, page_height_mm: f32, mode: PaintMode) -> Polygon {
    let left = mm_to_pt(rect.x);
    let right = mm_to_pt(rect.right());
    let top = mm_to_pt(page_height_mm - rect.y);
    let bottom = mm_to_pt(page_height_mm - rect.bottom());

    let corner = |x: f32, y: f32| LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    };

    Polygon {
        rings: vec![PolygonRing {
            points: vec![
                corner(left, bottom),
                corner(right, bottom),
                corner(right, top),
                corner(left, top),
            ],
        }],
        mode,
        winding_order: WindingOrder::NonZero,
    }
}

/// Map a font family name onto the closest PDF built-in font
pub(crate) fn builtin_font(family: &str, bold: bool, italic: bool) -> BuiltinFont {
    let family = family.to_ascii_lowercase();
    if family.contains("times") || (family.contains("serif") && !family.contains("sans")) {
        match (bold, italic) {
            (false, false) => BuiltinFont::TimesRoman,
            (true, false) => BuiltinFont::TimesBold,
            (false, true) => BuiltinFont::TimesItalic,
            (true, true) => BuiltinFont::TimesBoldItalic,
        }
    } else if family.contains("courier") || family.contains("mono") {
        match (bold, italic) {
            (false, false) => BuiltinFont::Courier,
            (true, false) => BuiltinFont::CourierBold,
            (false, true) => BuiltinFont::CourierOblique,
            (true, true) => BuiltinFont::CourierBoldOblique,
        }
    } else {
        match (bold, italic) {
            (false, false) => BuiltinFont::Helvetica,
            (true, false) => BuiltinFont::HelveticaBold,
            (false, true) => BuiltinFont::HelveticaOblique,
            (true, true) => BuiltinFont::HelveticaBoldOblique,
        }
    }
}

fn estimate_width_pt(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * font_size_pt * HELVETICA_CHAR_WIDTH_RATIO
}

/// Greedy word wrap against an estimated glyph width.
///
/// Explicit newlines always break. A word wider than the line is split
/// between characters.
pub(crate) fn wrap_text(text: &str, max_width_pt: f32, font_size_pt: f32) -> Vec<String> {
    let char_width = font_size_pt * HELVETICA_CHAR_WIDTH_RATIO;
    let max_chars = if char_width > 0.0 {
        ((max_width_pt / char_width).floor() as usize).max(1)
    } else {
        usize::MAX
    };

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_chars = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            let needed = if line_chars == 0 {
                word.len()
            } else {
                line_chars + 1 + word.len()
            };
            if needed <= max_chars {
                if line_chars > 0 {
                    line.push(' ');
                }
                line.extend(word.iter());
                line_chars = needed;
                continue;
            }

            if line_chars > 0 {
                lines.push(std::mem::take(&mut line));
            }
            while word.len() > max_chars {
                let rest = word.split_off(max_chars);
                lines.push(word.iter().collect());
                word = rest;
            }
            line = word.iter().collect();
            line_chars = word.len();
        }
        lines.push(line);
    }
    lines
}

// =============================================================================
// Tests
// =============================================================================
