//! Thin wrapper over the PDF backend
//!
//! Exposes a cursor-based sheet: text runs at a baseline, horizontal
//! rules, and page breaks. Coordinates are millimeters; the backend
//! origin is bottom-left, so the cursor walks downwards from the top.

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::error::{TicketError, TicketResult};

/// 1 typographic point in millimeters.
const PT_TO_MM: f32 = 25.4 / 72.0;

/// Font faces available on a sheet. Builtin fonts only - no font files
/// shipped, receipts must print anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Face {
    Regular,
    Bold,
    Mono,
    MonoBold,
}

pub(crate) struct Sheet {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
    mono_bold: IndirectFontRef,
    page_width: f32,
    page_height: f32,
    /// Current baseline, mm from the bottom edge
    y: f32,
}

impl Sheet {
    pub fn new(
        title: &str,
        width_mm: f32,
        height_mm: f32,
        top_margin_mm: f32,
    ) -> TicketResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(width_mm as _), Mm(height_mm as _), "content");
        let layer = doc.get_page(page).get_layer(layer);

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| TicketError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| TicketError::Pdf(e.to_string()))?;
        let mono = doc
            .add_builtin_font(BuiltinFont::Courier)
            .map_err(|e| TicketError::Pdf(e.to_string()))?;
        let mono_bold = doc
            .add_builtin_font(BuiltinFont::CourierBold)
            .map_err(|e| TicketError::Pdf(e.to_string()))?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            mono,
            mono_bold,
            page_width: width_mm,
            page_height: height_mm,
            y: height_mm - top_margin_mm,
        })
    }

    fn font(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Mono => &self.mono,
            Face::MonoBold => &self.mono_bold,
        }
    }

    /// Approximate rendered width in mm. Exact for the monospaced faces
    /// (Courier advance is 0.6 em), estimated for Helvetica.
    pub fn text_width_mm(face: Face, size_pt: f32, text: &str) -> f32 {
        let factor = match face {
            Face::Mono | Face::MonoBold => 0.6,
            Face::Regular | Face::Bold => 0.5,
        };
        text.chars().count() as f32 * size_pt * factor * PT_TO_MM
    }

    /// Draw text at `x` on the current baseline without moving the cursor.
    pub fn text_at(&self, x_mm: f32, size_pt: f32, face: Face, text: &str) {
        self.layer.use_text(
            text,
            size_pt as _,
            Mm(x_mm as _),
            Mm(self.y as _),
            self.font(face),
        );
    }

    /// Draw text right-aligned so it ends at `right_edge_mm`.
    pub fn text_right(&self, right_edge_mm: f32, size_pt: f32, face: Face, text: &str) {
        let x = right_edge_mm - Self::text_width_mm(face, size_pt, text);
        self.text_at(x.max(0.0), size_pt, face, text);
    }

    /// Draw text centered on the page width.
    pub fn text_centered(&self, size_pt: f32, face: Face, text: &str) {
        let x = (self.page_width - Self::text_width_mm(face, size_pt, text)) / 2.0;
        self.text_at(x.max(0.0), size_pt, face, text);
    }

    /// Horizontal rule across [x1, x2] slightly above the current baseline.
    pub fn rule(&self, x1_mm: f32, x2_mm: f32) {
        self.layer.set_outline_thickness(0.3);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1_mm as _), Mm((self.y + 1.0) as _)), false),
                (Point::new(Mm(x2_mm as _), Mm((self.y + 1.0) as _)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    /// Move the baseline down.
    pub fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Start a new page if fewer than `needed_mm` remain above the bottom
    /// margin. Returns true when a page break happened.
    pub fn ensure_space(
        &mut self,
        needed_mm: f32,
        top_margin_mm: f32,
        bottom_margin_mm: f32,
    ) -> bool {
        if self.y - needed_mm >= bottom_margin_mm {
            return false;
        }
        let (page, layer) = self.doc.add_page(
            Mm(self.page_width as _),
            Mm(self.page_height as _),
            "content",
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.page_height - top_margin_mm;
        true
    }

    pub fn finish(self) -> TicketResult<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| TicketError::Pdf(e.to_string()))
    }
}
