//! # Certificate of Signature
//!
//! Renders a one-page A4 PDF proving a signature. Rendering is pure: the same
//! record and config always give the same bytes.
//!
//! ## Layout (millimetres from the top-left corner)
//!
//! | Element                    | Position        | Size   |
//! |----------------------------|-----------------|--------|
//! | "Certificate of Signature" | centered, y=20  | 20pt   |
//! | "Document: ..."            | x=20, y=40      | 12pt   |
//! | "Signer: ..."              | x=20, y=50      | 12pt   |
//! | "Date: ..."                | x=20, y=60      | 12pt   |
//! | Signature image            | x=20, y=80      | 80x40  |
//!
//! The document line is left out for legacy signatures, which have no
//! document name.

use chrono::format::{Item, StrftimeItems};
use chrono::FixedOffset;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use serde::{Deserialize, Serialize};
use shared_types::{ClientId, SignatureRecord, Timestamp};

use super::errors::CertificateError;

pub const CERTIFICATE_TITLE: &str = "Certificate of Signature";
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const TITLE_SIZE: i64 = 20;
const BODY_SIZE: i64 = 12;

/// How signed-at times are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateConfig {
    /// Offset of the portal's local time from UTC.
    pub utc_offset_minutes: i32,
    /// strftime pattern.
    pub date_format: String,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl CertificateConfig {
    pub fn validate(&self) -> Result<(), CertificateError> {
        self.offset()?;
        if self.date_format.is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(CertificateError::InvalidDateFormat(self.date_format.clone()));
        }
        Ok(())
    }

    fn offset(&self) -> Result<FixedOffset, CertificateError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(CertificateError::InvalidOffset(self.utc_offset_minutes))
    }

    /// `at` in portal-local time.
    pub fn localize(&self, at: Timestamp) -> Result<String, CertificateError> {
        self.validate()?;
        Ok(at
            .with_timezone(&self.offset()?)
            .format(&self.date_format)
            .to_string())
    }
}

/// A rendered certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `Receipt_<username>.pdf` or `Receipt_<username>_<document>.pdf`.
pub fn certificate_file_name(client: &ClientId, doc_name: Option<&str>) -> String {
    let user = sanitize(client.local_part());
    match doc_name
        .map(sanitize)
        .filter(|d| d.chars().any(|c| c.is_ascii_alphanumeric()))
    {
        Some(doc) => format!("Receipt_{user}_{doc}.pdf"),
        None => format!("Receipt_{user}.pdf"),
    }
}

/// Keeps ASCII alphanumerics, `-` and `_`; every other run becomes one `_`.
fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Renders the certificate for one history record of `client`.
pub fn render_certificate(
    client: &ClientId,
    record: &SignatureRecord,
    config: &CertificateConfig,
) -> Result<Certificate, CertificateError> {
    let signed_at = config.localize(record.signed_at)?;
    let (width, height, rgb) = flatten_on_white(record.image.png_bytes())?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        },
        rgb,
    ));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => dictionary! { "Im1" => image_id },
    });

    let mut operations = Vec::new();
    let title_x = (PAGE_WIDTH as f64 - text_width(CERTIFICATE_TITLE, TITLE_SIZE)) / 2.0;
    text(&mut operations, CERTIFICATE_TITLE, TITLE_SIZE, title_x.round() as i64, 20.0);
    if let Some(name) = &record.doc_name {
        text(&mut operations, &format!("Document: {name}"), BODY_SIZE, mm(20.0), 40.0);
    }
    text(&mut operations, &format!("Signer: {}", record.signer), BODY_SIZE, mm(20.0), 50.0);
    text(&mut operations, &format!("Date: {signed_at}"), BODY_SIZE, mm(20.0), 60.0);
    operations.extend([
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                mm(80.0).into(),
                0_i64.into(),
                0_i64.into(),
                mm(40.0).into(),
                mm(20.0).into(),
                (PAGE_HEIGHT - mm(80.0 + 40.0)).into(),
            ],
        ),
        Operation::new("Do", vec!["Im1".into()]),
        Operation::new("Q", vec![]),
    ]);

    let content = Content { operations }
        .encode()
        .map_err(|e| CertificateError::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| CertificateError::Pdf(e.to_string()))?;

    Ok(Certificate {
        file_name: certificate_file_name(client, record.doc_name.as_deref()),
        bytes,
    })
}

/// Millimetres to whole points.
fn mm(value: f64) -> i64 {
    (value * 72.0 / 25.4).round() as i64
}

/// One line of text with its baseline `y_mm` below the top edge.
fn text(ops: &mut Vec<Operation>, line: &str, size: i64, x: i64, y_mm: f64) {
    ops.extend([
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), size.into()]),
        Operation::new("Td", vec![x.into(), (PAGE_HEIGHT - mm(y_mm)).into()]),
        Operation::new(
            "Tj",
            vec![Object::String(win_ansi(line), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]);
}

/// Latin-1 subset of WinAnsiEncoding; anything else becomes `?`.
fn win_ansi(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| match u32::from(c) {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

/// Helvetica advance widths for 0x20..=0x7E, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

fn text_width(line: &str, size: i64) -> f64 {
    let units: u32 = win_ansi(line)
        .into_iter()
        .map(|b| match b {
            0x20..=0x7E => u32::from(HELVETICA_WIDTHS[usize::from(b - 0x20)]),
            _ => 556,
        })
        .sum();
    f64::from(units) * size as f64 / 1000.0
}

/// Decodes the PNG and composites it over white, giving packed RGB.
fn flatten_on_white(png: &[u8]) -> Result<(u32, u32, Vec<u8>), CertificateError> {
    let rgba = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .map_err(|e| CertificateError::Image(e.to_string()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for pixel in rgba.pixels() {
        let alpha = u32::from(pixel[3]);
        for channel in &pixel.0[..3] {
            let blended = (u32::from(*channel) * alpha + 255 * (255 - alpha)) / 255;
            rgb.push(blended as u8);
        }
    }
    Ok((width, height, rgb))
}
