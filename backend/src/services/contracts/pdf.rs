//! Builds the signed contract document.
//!
//! Synthesis always produces a **new** fixed-layout document from the
//! template's display name, the signer's details and the captured signature
//! raster; it never fills fields into the uploaded PDF. The result is
//! returned as a `data:application/pdf;base64,...` string ready to be
//! stored, downloaded or relayed as-is.

use crate::error::ContractError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Local;
use common::model::signer::SignerInfo;
use genpdf::elements::{Break, Image as PdfImage, Paragraph};
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element, Scale};
use image::DynamicImage;
use log::warn;
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use std::error::Error;
use tempfile::NamedTempFile;

const PDF_DATA_PREFIX: &str = "data:application/pdf;base64,";

/// Substituted for any value containing characters the bundled fonts cannot
/// draw. The font layer errors out mid-render on unsupported glyphs, so the
/// substitution happens before any text reaches the page.
const UNSUPPORTED_TEXT_FALLBACK: &str = "[Unsupported Text]";

/// Rendered in the signature slot when the captured raster cannot be
/// embedded. A degraded document still completes the signing run.
const SIGNATURE_FALLBACK: &str = "[Signature unavailable]";

const TITLE_FONT_SIZE: u8 = 16;
const SIGNATURE_SCALE: f64 = 0.5;

/// Renders the contract for `template_name` and `signer`, embedding the
/// signature raster at half its natural size.
///
/// `signature` is the pad's `data:image/png;base64,...` string, or empty
/// when no strokes were captured. A payload that does not even base64-decode
/// is malformed input and fails the attempt; a payload whose pixels cannot
/// be parsed or embedded degrades to the fallback marker instead.
pub fn synthesize(
    template_name: &str,
    signer: &SignerInfo,
    signature: &str,
) -> Result<String, ContractError> {
    let mut doc = configure_document().map_err(synthesis_err)?;

    doc.push(
        Paragraph::new(sanitize_text(template_name))
            .aligned(Alignment::Center)
            .styled(Style::new().bold().with_font_size(TITLE_FONT_SIZE)),
    );
    doc.push(Break::new(1));
    doc.push(Paragraph::new(format!(
        "Date: {}",
        Local::now().format("%Y-%m-%d")
    )));
    doc.push(Break::new(1));

    for line in agreement_lines(template_name, signer) {
        if line.is_empty() {
            doc.push(Break::new(1));
        } else {
            doc.push(Paragraph::new(line));
        }
    }
    doc.push(Break::new(2));
    doc.push(Paragraph::new("Signature:").styled(Style::new().bold()));

    // The temp file must outlive rendering; genpdf reads it back at render
    // time.
    let _signature_file = match decode_signature(signature)? {
        Some(bytes) => match embed_signature(&mut doc, &bytes) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!("signature image could not be embedded: {e}");
                doc.push(Paragraph::new(SIGNATURE_FALLBACK));
                None
            }
        },
        None => {
            doc.push(Paragraph::new(SIGNATURE_FALLBACK));
            None
        }
    };

    let mut bytes = Vec::new();
    doc.render(&mut bytes).map_err(synthesis_err)?;
    Ok(format!("{PDF_DATA_PREFIX}{}", BASE64.encode(bytes)))
}

/// Load the font family. Tries a local `./fonts` directory first, then the
/// usual system location of the Liberation fonts.
pub fn load_font() -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, Box<dyn Error>> {
    if let Ok(family) = genpdf::fonts::from_files("./fonts", "LiberationSans", None) {
        return Ok(family);
    }
    genpdf::fonts::from_files(
        "/usr/share/fonts/truetype/liberation",
        "LiberationSans",
        None,
    )
    .map_err(Into::into)
}

/// Configure a single-page A4 document. Content is flow-laid-out, so a body
/// that outgrows the page simply continues on the next one.
fn configure_document() -> Result<Document, Box<dyn Error>> {
    let font_family = load_font()?;
    let mut doc = Document::new(font_family);
    doc.set_title("Signed contract");
    doc.set_paper_size(genpdf::PaperSize::A4);
    doc.set_font_size(11);
    doc.set_line_spacing(1.25);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(15);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

/// The fixed agreement body with the signer's details interpolated. Every
/// value passes through `sanitize_text` before it may reach the font layer;
/// phone, email and date of birth are usually plain ASCII already but are
/// not assumed safe.
fn agreement_lines(template_name: &str, signer: &SignerInfo) -> Vec<String> {
    let title = sanitize_text(template_name);
    let name = sanitize_text(&signer.name);
    let phone = sanitize_text(&signer.phone);
    let email = sanitize_text(&signer.email);
    let address = sanitize_text(&signer.address);
    let birth_date = sanitize_text(&signer.birth_date);

    vec![
        format!(
            "This agreement is entered into between the undersigned member and the \
             facility under the \"{title}\" terms."
        ),
        format!("Member name: {name}"),
        format!("Date of birth: {birth_date}"),
        format!("Phone: {phone}"),
        format!("Email: {email}"),
        format!("Address: {address}"),
        String::new(),
        "The member confirms that the personal details above are accurate and agrees \
         to the terms and conditions presented during signing, including the facility \
         usage rules and the applicable cancellation policy."
            .to_string(),
        "A signed copy of this document is stored by the facility and a duplicate is \
         sent to the email address on file."
            .to_string(),
    ]
}

/// The bundled fonts cover printable ASCII only. A value containing any
/// character outside that repertoire is replaced whole rather than stripped,
/// so the substitution is visible in the output.
pub(crate) fn sanitize_text(raw: &str) -> String {
    if raw.chars().all(|c| matches!(c, ' '..='~')) {
        raw.to_string()
    } else {
        UNSUPPORTED_TEXT_FALLBACK.to_string()
    }
}

/// Splits the base64 payload out of the pad's data URL and decodes it.
/// Returns `None` for the explicit empty signal (no strokes captured).
pub(crate) fn decode_signature(signature: &str) -> Result<Option<Vec<u8>>, ContractError> {
    let trimmed = signature.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let payload = match trimmed.split_once(',') {
        Some((head, rest)) if head.starts_with("data:") => rest,
        _ => trimmed,
    };
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| ContractError::Synthesis(format!("signature payload is not valid base64: {e}")))?;
    Ok(Some(bytes))
}

/// Flattens the pad raster over a white background, re-encodes it as an RGB
/// PNG in a temp file and embeds it at half its natural size. The temp file
/// is returned so the caller can keep it alive until rendering finishes.
fn embed_signature(doc: &mut Document, bytes: &[u8]) -> Result<NamedTempFile, Box<dyn Error>> {
    let img = image::load_from_memory(bytes)?;

    // The pad delivers RGBA with a transparent background; the PDF image
    // layer takes RGB only.
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut background = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut background, &rgba, 0, 0);
    let rgb_image = DynamicImage::ImageRgba8(background).to_rgb8();
    let raw = rgb_image.into_raw();

    let mut tmp = NamedTempFile::new()?;
    {
        let file = tmp.as_file_mut();
        let mut encoder = PngEncoder::new(file, w, h);
        encoder.set_color(PngColorType::Rgb);
        encoder.set_depth(PngBitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&raw)?;
    }

    let mut element = PdfImage::from_path(tmp.path())?;
    element.set_scale(Scale::new(SIGNATURE_SCALE, SIGNATURE_SCALE));
    doc.push(element);
    Ok(tmp)
}

fn synthesis_err(err: impl std::fmt::Display) -> ContractError {
    ContractError::Synthesis(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn signer() -> SignerInfo {
        SignerInfo {
            name: "Hong Gildong".to_string(),
            phone: "010-1234-5678".to_string(),
            email: "hong@x.com".to_string(),
            address: "Seoul".to_string(),
            birth_date: "1990-01-01".to_string(),
        }
    }

    fn png_data_url() -> String {
        let image = image::RgbaImage::from_pixel(40, 16, image::Rgba([20, 20, 20, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", BASE64.encode(png))
    }

    #[test]
    fn supported_text_passes_through_verbatim() {
        assert_eq!(sanitize_text("Membership Agreement"), "Membership Agreement");
        assert_eq!(sanitize_text("010-1234-5678"), "010-1234-5678");
        assert_eq!(sanitize_text(""), "");
    }

    #[test]
    fn unsupported_text_is_replaced_whole() {
        assert_eq!(sanitize_text("가입신청서"), UNSUPPORTED_TEXT_FALLBACK);
        assert_eq!(sanitize_text("Hong 홍"), UNSUPPORTED_TEXT_FALLBACK);
        assert_eq!(sanitize_text("café"), UNSUPPORTED_TEXT_FALLBACK);
    }

    #[test]
    fn body_keeps_latin_fields_and_falls_back_per_value() {
        let mut signer = signer();
        signer.address = "서울시 강남구".to_string();

        let lines = agreement_lines("가입신청서", &signer).join("\n");
        assert!(lines.contains("Member name: Hong Gildong"));
        assert!(lines.contains("Phone: 010-1234-5678"));
        assert!(lines.contains(&format!("Address: {UNSUPPORTED_TEXT_FALLBACK}")));
        assert!(lines.contains(&format!("\"{UNSUPPORTED_TEXT_FALLBACK}\" terms")));
    }

    #[test]
    fn empty_signature_is_the_no_strokes_signal() {
        assert_eq!(decode_signature("").unwrap(), None);
        assert_eq!(decode_signature("   ").unwrap(), None);
    }

    #[test]
    fn data_url_prefix_is_stripped_before_decoding() {
        let decoded = decode_signature("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(decoded, Some(b"hello".to_vec()));
    }

    #[test]
    fn garbage_signature_payload_is_a_synthesis_error() {
        let err = decode_signature("data:image/png;base64,not base64!!").unwrap_err();
        assert!(matches!(err, ContractError::Synthesis(_)));
    }

    #[test]
    fn synthesize_embeds_a_valid_signature() {
        if load_font().is_err() {
            eprintln!("skipping: LiberationSans fonts not installed");
            return;
        }

        let document = synthesize("Membership Agreement", &signer(), &png_data_url()).unwrap();
        assert!(document.starts_with(PDF_DATA_PREFIX));

        let bytes = BASE64
            .decode(document.trim_start_matches(PDF_DATA_PREFIX))
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn undecodable_raster_degrades_instead_of_aborting() {
        if load_font().is_err() {
            eprintln!("skipping: LiberationSans fonts not installed");
            return;
        }

        // Valid base64, but the bytes are not a PNG.
        let signature = format!("data:image/png;base64,{}", BASE64.encode(b"not a png"));
        let document = synthesize("Membership Agreement", &signer(), &signature).unwrap();
        assert!(document.starts_with(PDF_DATA_PREFIX));
    }

    #[test]
    fn unsupported_title_never_aborts_synthesis() {
        if load_font().is_err() {
            eprintln!("skipping: LiberationSans fonts not installed");
            return;
        }

        let document = synthesize("가입신청서", &signer(), "").unwrap();
        assert!(document.starts_with(PDF_DATA_PREFIX));
    }
}
