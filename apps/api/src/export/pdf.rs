//! Single-page PDF writer for a captured bitmap.
//!
//! The page is A4 portrait. The bitmap is embedded as one DeviceGray image,
//! scaled proportionally to fit inside the page and centered on it.

use chrono::{DateTime, Utc};

use super::raster::Bitmap;

pub const A4_WIDTH_PT: f64 = 595.28;
pub const A4_HEIGHT_PT: f64 = 841.89;

const PRODUCER: &str = "ResumeFlow";

/// Where the image lands on the page, in points from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scales an `image_w` × `image_h` image to fit the page without distortion
/// and centers it.
pub fn fit_and_center(image_w: usize, image_h: usize) -> Placement {
    let (w, h) = (image_w.max(1) as f64, image_h.max(1) as f64);
    let scale = (A4_WIDTH_PT / w).min(A4_HEIGHT_PT / h);
    let width = w * scale;
    let height = h * scale;
    Placement {
        x: (A4_WIDTH_PT - width) / 2.0,
        y: (A4_HEIGHT_PT - height) / 2.0,
        width,
        height,
    }
}

/// PackBits-style encoding understood by the `RunLengthDecode` filter.
pub fn run_length_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 4 + 2);
    let mut i = 0;
    while i < data.len() {
        let mut run = 1;
        while i + run < data.len() && run < 128 && data[i + run] == data[i] {
            run += 1;
        }
        if run > 1 {
            out.push((257 - run) as u8);
            out.push(data[i]);
            i += run;
            continue;
        }

        // Literal span up to the next repeat.
        let start = i;
        while i < data.len() && i - start < 128 {
            if i + 1 < data.len() && data[i] == data[i + 1] {
                break;
            }
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&data[start..i]);
    }
    out.push(128);
    out
}

pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ if c.is_ascii() => result.push(c),
            _ => result.push('?'),
        }
    }
    result
}

/// Writes a complete single-page PDF around `bitmap`.
pub fn encode_pdf(bitmap: &Bitmap, title: &str, created: DateTime<Utc>) -> Vec<u8> {
    let placement = fit_and_center(bitmap.width(), bitmap.height());
    let image = run_length_encode(bitmap.pixels());
    let content = format!(
        "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im0 Do\nQ",
        placement.width, placement.height, placement.x, placement.y
    );

    let mut pdf = Vec::new();
    pdf.extend_from_slice(b"%PDF-1.4\n");
    pdf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let mut offsets: Vec<usize> = Vec::with_capacity(6);

    offsets.push(pdf.len());
    pdf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    offsets.push(pdf.len());
    pdf.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    offsets.push(pdf.len());
    pdf.extend_from_slice(
        format!(
            "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {A4_WIDTH_PT:.2} {A4_HEIGHT_PT:.2}] \
             /Contents 4 0 R /Resources << /XObject << /Im0 5 0 R >> >> >>\nendobj\n"
        )
        .as_bytes(),
    );

    offsets.push(pdf.len());
    pdf.extend_from_slice(
        format!(
            "4 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
            content.len(),
            content
        )
        .as_bytes(),
    );

    offsets.push(pdf.len());
    pdf.extend_from_slice(
        format!(
            "5 0 obj\n<< /Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /DeviceGray /BitsPerComponent 8 /Filter /RunLengthDecode /Length {} >>\nstream\n",
            bitmap.width(),
            bitmap.height(),
            image.len()
        )
        .as_bytes(),
    );
    pdf.extend_from_slice(&image);
    pdf.extend_from_slice(b"\nendstream\nendobj\n");

    offsets.push(pdf.len());
    pdf.extend_from_slice(
        format!(
            "6 0 obj\n<< /Title ({}) /Producer ({PRODUCER}) /CreationDate ({}) >>\nendobj\n",
            escape_pdf_string(title),
            created.format("D:%Y%m%d%H%M%SZ")
        )
        .as_bytes(),
    );

    let xref_start = pdf.len();
    pdf.extend_from_slice(b"xref\n");
    pdf.extend_from_slice(format!("0 {}\n", offsets.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for pos in &offsets {
        pdf.extend_from_slice(format!("{pos:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(b"trailer\n");
    pdf.extend_from_slice(
        format!("<< /Size {} /Root 1 0 R /Info 6 0 R >>\n", offsets.len() + 1).as_bytes(),
    );
    pdf.extend_from_slice(format!("startxref\n{xref_start}\n%%EOF\n").as_bytes());
    pdf
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run_length_decode(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < data.len() {
            let len = data[i] as usize;
            i += 1;
            match len {
                128 => break,
                0..=127 => {
                    out.extend_from_slice(&data[i..i + len + 1]);
                    i += len + 1;
                }
                _ => {
                    out.extend(std::iter::repeat(data[i]).take(257 - len));
                    i += 1;
                }
            }
        }
        out
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_run_length_decodes_back() {
        let mut data = vec![255u8; 300];
        data.extend([1, 2, 3, 4, 4, 4, 5]);
        data.extend((0..=255u8).cycle().take(400));
        assert_eq!(run_length_decode(&run_length_encode(&data)), data);
        assert_eq!(run_length_encode(&[]), vec![128]);
    }

    #[test]
    fn test_uniform_rows_compress() {
        let data = vec![255u8; 10_000];
        assert!(run_length_encode(&data).len() < 200);
    }

    #[test]
    fn test_placement_fits_and_centers() {
        for (w, h) in [(1190, 1684), (1190, 3000), (2000, 100), (1, 1)] {
            let p = fit_and_center(w, h);
            assert!(p.width <= A4_WIDTH_PT + 1e-6);
            assert!(p.height <= A4_HEIGHT_PT + 1e-6);
            assert!((p.x - (A4_WIDTH_PT - p.width) / 2.0).abs() < 1e-6);
            assert!((p.y - (A4_HEIGHT_PT - p.height) / 2.0).abs() < 1e-6);
            // Aspect ratio preserved.
            assert!((p.width / p.height - w as f64 / h as f64).abs() < 1e-6);
        }
    }

    #[test]
    fn test_tall_image_fills_height() {
        let p = fit_and_center(1190, 3000);
        assert!((p.height - A4_HEIGHT_PT).abs() < 1e-6);
        assert!(p.x > 0.0);
    }

    #[test]
    fn test_pdf_structure() {
        let bitmap = Bitmap::new(40, 60);
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let pdf = encode_pdf(&bitmap, "Ada (CV)", created);

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert!(find(&pdf, b"/Count 1").is_some());
        assert!(find(&pdf, b"/Filter /RunLengthDecode").is_some());
        assert!(find(&pdf, b"/Title (Ada \\(CV\\))").is_some());
        assert!(find(&pdf, b"/CreationDate (D:20240301120000Z)").is_some());
        assert!(find(&pdf, b"/MediaBox [0 0 595.28 841.89]").is_some());

        // xref entry for object 3 points at its header.
        let obj3 = find(&pdf, b"3 0 obj").unwrap();
        let xref = find(&pdf, b"xref\n").unwrap();
        let table = String::from_utf8_lossy(&pdf[xref..]);
        let entry = table.lines().nth(5).unwrap();
        assert_eq!(entry, format!("{obj3:010} 00000 n "));
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("a\\b(c)"), "a\\\\b\\(c\\)");
        assert_eq!(escape_pdf_string("Zoë"), "Zo?");
    }
}
