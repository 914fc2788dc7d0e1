//! Single-page A4 PV layout.
//!
//! The layout is a list of [`DrawOp`]s in millimetres, origin top-left.
//! Turning them into PDF bytes is the job of a [`PdfRenderer`].

use serde::Serialize;

use crate::error::CoreError;
use crate::models::Language;
use crate::types::{format_timestamp_fr, Timestamp};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const BORDER_INSET_MM: f64 = 10.0;
pub const QR_SIZE_MM: f64 = 30.0;
const LEFT_MM: f64 = 20.0;
const DATE_X_MM: f64 = 120.0;
const PROJECT_VALUE_X_MM: f64 = 60.0;
const DETAIL_X_MM: f64 = 25.0;
const LINE_HEIGHT_MM: f64 = 7.0;
const DETAIL_LINE_HEIGHT_MM: f64 = 8.0;

/// Approximate characters per line of 12 pt body text across the
/// printable width.
pub const WRAP_COLUMNS: usize = 80;

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfLabels {
    pub title: &'static str,
    pub pv_number: &'static str,
    pub date: &'static str,
    pub project: &'static str,
    pub description: &'static str,
    pub details: &'static str,
    pub generated_on: &'static str,
}

pub fn labels(language: Language) -> PdfLabels {
    match language {
        Language::Fr => PdfLabels {
            title: "PROCÈS-VERBAL",
            pv_number: "N° PV",
            date: "Date",
            project: "Projet",
            description: "Description",
            details: "Détails",
            generated_on: "Généré le",
        },
        Language::En => PdfLabels {
            title: "MINUTES",
            pv_number: "PV Number",
            date: "Date",
            project: "Project",
            description: "Description",
            details: "Details",
            generated_on: "Generated on",
        },
        Language::Ar => PdfLabels {
            title: "محضر اجتماع",
            pv_number: "رقم المحضر",
            date: "التاريخ",
            project: "المشروع",
            description: "الوصف",
            details: "التفاصيل",
            generated_on: "تم إنشاؤه في",
        },
        Language::Es => PdfLabels {
            title: "ACTA",
            pv_number: "N° Acta",
            date: "Fecha",
            project: "Proyecto",
            description: "Descripción",
            details: "Detalles",
            generated_on: "Generado el",
        },
    }
}

// ---------------------------------------------------------------------------
// Draw operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Font {
        style: FontStyle,
        size_pt: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        align: Align,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(skip)]
        png: Vec<u8>,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
    },
}

/// Content of a PV page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PvDocument {
    pub pv_number: String,
    /// Date as printed, `dd/mm/yyyy`.
    pub date: String,
    pub title: String,
    pub project_name: String,
    pub description: String,
    pub details: Vec<(String, String)>,
}

/// Serializes draw operations into a PDF file.
pub trait PdfRenderer {
    fn render(&self, width_mm: f64, height_mm: f64, ops: &[DrawOp]) -> Result<Vec<u8>, CoreError>;
}

/// `PV_<pv number>_<date>.pdf`, slashes in the date replaced.
pub fn pdf_filename(pv_number: &str, date: &str) -> String {
    format!("PV_{pv_number}_{}.pdf", date.replace('/', "-"))
}

/// Greedy word wrap on `columns` characters, keeping explicit line breaks.
/// A single word longer than a line is left unbroken.
pub fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > columns && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

fn font(style: FontStyle, size_pt: f64) -> DrawOp {
    DrawOp::Font { style, size_pt }
}

fn text(x: f64, y: f64, value: impl Into<String>) -> DrawOp {
    DrawOp::Text {
        x,
        y,
        text: value.into(),
        align: Align::Left,
    }
}

fn centered(y: f64, value: impl Into<String>) -> DrawOp {
    DrawOp::Text {
        x: PAGE_WIDTH_MM / 2.0,
        y,
        text: value.into(),
        align: Align::Center,
    }
}

/// Lay out the PV page.
pub fn layout_pv(
    doc: &PvDocument,
    language: Language,
    qr_png: Option<Vec<u8>>,
    generated_at: Timestamp,
) -> Vec<DrawOp> {
    let t = labels(language);
    let mut ops = Vec::new();
    let mut y = 20.0;

    ops.push(font(FontStyle::Bold, 20.0));
    ops.push(centered(y, t.title));
    y += 20.0;

    ops.push(font(FontStyle::Normal, 12.0));
    ops.push(text(LEFT_MM, y, format!("{}: {}", t.pv_number, doc.pv_number)));
    ops.push(text(DATE_X_MM, y, format!("{}: {}", t.date, doc.date)));
    y += 15.0;

    ops.push(font(FontStyle::Bold, 12.0));
    ops.push(text(LEFT_MM, y, format!("{}:", t.project)));
    ops.push(font(FontStyle::Normal, 12.0));
    ops.push(text(PROJECT_VALUE_X_MM, y, doc.project_name.clone()));
    y += 15.0;

    ops.push(font(FontStyle::Bold, 12.0));
    ops.push(text(LEFT_MM, y, doc.title.clone()));
    y += 20.0;

    ops.push(text(LEFT_MM, y, format!("{}:", t.description)));
    y += 10.0;
    ops.push(font(FontStyle::Normal, 12.0));
    let lines = wrap_text(&doc.description, WRAP_COLUMNS);
    for (i, line) in lines.iter().enumerate() {
        ops.push(text(LEFT_MM, y + i as f64 * LINE_HEIGHT_MM, line.clone()));
    }
    y += lines.len() as f64 * LINE_HEIGHT_MM + 15.0;

    if !doc.details.is_empty() {
        ops.push(font(FontStyle::Bold, 12.0));
        ops.push(text(LEFT_MM, y, format!("{}:", t.details)));
        y += 10.0;
        ops.push(font(FontStyle::Normal, 12.0));
        for (label, value) in &doc.details {
            ops.push(text(DETAIL_X_MM, y, format!("• {label}: {value}")));
            y += DETAIL_LINE_HEIGHT_MM;
        }
    }

    if let Some(png) = qr_png {
        ops.push(DrawOp::Image {
            x: PAGE_WIDTH_MM - QR_SIZE_MM - 30.0,
            y: PAGE_HEIGHT_MM - QR_SIZE_MM - 20.0,
            width: QR_SIZE_MM,
            height: QR_SIZE_MM,
            png,
        });
    }

    ops.push(font(FontStyle::Italic, 10.0));
    ops.push(centered(
        PAGE_HEIGHT_MM - 20.0,
        format!("{} {}", t.generated_on, format_timestamp_fr(generated_at)),
    ));

    ops.push(DrawOp::Rect {
        x: BORDER_INSET_MM,
        y: BORDER_INSET_MM,
        width: PAGE_WIDTH_MM - 2.0 * BORDER_INSET_MM,
        height: PAGE_HEIGHT_MM - 2.0 * BORDER_INSET_MM,
        line_width: 0.5,
    });

    ops
}
