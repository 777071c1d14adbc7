use crate::options::ExportOptions;
use crate::types::{ExportError, Result};
use image::DynamicImage;
use paper_split::PageSize;
use paper_split::constants::{MANUAL_PAGE_WIDTH_MM, mm_to_pt};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, RawImage, RawImageData, RawImageFormat,
    XObjectTransform,
};
use std::path::Path;

/// Images are embedded at 72 dpi so one pixel is one point before scaling
const EMBED_DPI: f32 = 72.0;

pub async fn generate_pdf(
    images: Vec<DynamicImage>,
    options: &ExportOptions,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    let options = options.clone();
    let output_path = output_path.as_ref().to_owned();
    let page_count = images.len();

    // PDF generation is CPU-bound, spawn blocking
    let bytes = tokio::task::spawn_blocking(move || generate_pdf_bytes(&images, &options)).await??;

    tokio::fs::write(&output_path, bytes).await?;
    log::info!(
        "Exported {} pages → {}",
        page_count,
        output_path.display()
    );

    Ok(())
}

/// Page size in mm for a segment of `width` x `height` pixels.
///
/// `Manual` pages are A4 wide and as tall as the segment's aspect ratio needs.
pub fn page_size_mm(page_size: PageSize, width: u32, height: u32) -> Result<(f32, f32)> {
    match page_size.dimensions_mm() {
        Some((w, h)) if w > 0.0 && h > 0.0 => Ok((w, h)),
        Some((w, h)) => Err(ExportError::InvalidPage(format!("{} x {} mm", w, h))),
        None if width == 0 || height == 0 => {
            Err(ExportError::InvalidPage("empty segment".to_string()))
        }
        None => Ok((
            MANUAL_PAGE_WIDTH_MM,
            MANUAL_PAGE_WIDTH_MM * height as f32 / width as f32,
        )),
    }
}

/// Where an image lands on its page, in points from the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x_pt: f32,
    pub y_pt: f32,
    pub scale: f32,
}

/// Fit an image (1px = 1pt) inside the page margins, keeping its aspect
/// ratio, and center it.
pub fn place_image(
    width: u32,
    height: u32,
    page_width_pt: f32,
    page_height_pt: f32,
    margin_pt: f32,
) -> ImagePlacement {
    let available_width = (page_width_pt - 2.0 * margin_pt).max(0.0);
    let available_height = (page_height_pt - 2.0 * margin_pt).max(0.0);

    let scale = (available_width / width.max(1) as f32).min(available_height / height.max(1) as f32);

    ImagePlacement {
        x_pt: (page_width_pt - width as f32 * scale) / 2.0,
        y_pt: (page_height_pt - height as f32 * scale) / 2.0,
        scale,
    }
}

pub fn generate_pdf_bytes(images: &[DynamicImage], options: &ExportOptions) -> Result<Vec<u8>> {
    if images.is_empty() {
        return Err(ExportError::NoSegments);
    }

    let mut doc = PdfDocument::new(&options.title);
    let margin_pt = mm_to_pt(options.margin_mm);

    for image in images {
        let (width, height) = (image.width(), image.height());
        let (page_width_mm, page_height_mm) = page_size_mm(options.page_size, width, height)?;
        let placement = place_image(
            width,
            height,
            mm_to_pt(page_width_mm),
            mm_to_pt(page_height_mm),
            margin_pt,
        );

        let raw = RawImage {
            pixels: RawImageData::U8(image.to_rgb8().into_raw()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let image_id = doc.add_image(&raw);

        let ops = vec![Op::UseXobject {
            id: image_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(placement.x_pt)),
                translate_y: Some(Pt(placement.y_pt)),
                scale_x: Some(placement.scale),
                scale_y: Some(placement.scale),
                dpi: Some(EMBED_DPI),
                ..Default::default()
            },
        }];

        doc.pages
            .push(PdfPage::new(Mm(page_width_mm), Mm(page_height_mm), ops));
    }

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("PDF export produced {} warnings", warnings.len());
    }

    Ok(bytes)
}
