use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, [100, 50, 200, 128]);

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_is_decode_failed() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, TwibbonError::DecodeFailed(_)));
}

#[test]
fn svg_sniffing() {
    assert!(looks_like_svg(br#"<svg xmlns="http://www.w3.org/2000/svg"/>"#));
    assert!(looks_like_svg(
        b"  <?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"/>"
    ));
    assert!(!looks_like_svg(&png_bytes(1, 1, [0, 0, 0, 255])));
    assert!(!looks_like_svg(b"<html></html>"));
    assert!(!looks_like_svg(b"<!-- unterminated comment <svg"));
}

const RED_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#ff0000"/></svg>"##;

fn assert_red_center(frame: &PreparedImage) {
    assert_eq!((frame.width, frame.height), (40, 50));
    let center = ((25 * 40 + 20) * 4) as usize;
    assert_eq!(&frame.rgba8_premul[center..center + 4], &[255, 0, 0, 255]);
}

#[test]
fn svg_with_leading_comment_is_rasterized() {
    let doc = format!("<!-- overlay exported by editor -->\n{RED_SQUARE}");
    assert!(looks_like_svg(doc.as_bytes()));
    let frame = decode_frame(doc.as_bytes(), Canvas::new(40, 50).unwrap()).unwrap();
    assert_red_center(&frame);
}

#[test]
fn svg_with_doctype_is_rasterized() {
    let doc = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
         \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n{RED_SQUARE}"
    );
    assert!(looks_like_svg(doc.as_bytes()));
    let frame = decode_frame(doc.as_bytes(), Canvas::new(40, 50).unwrap()).unwrap();
    assert_red_center(&frame);
}

#[test]
fn svg_sniff_survives_split_multibyte_char() {
    let mut doc = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><!-- "#);
    if doc.len() % 2 == 0 {
        doc.push('a');
    }
    // Two-byte characters starting at odd offsets straddle every even cut point.
    while doc.len() < 5000 {
        doc.push('\u{e9}');
    }
    doc.push_str(r##" --><rect width="10" height="10" fill="#ff0000"/></svg>"##);
    assert!(!doc.is_char_boundary(4096));
    assert!(looks_like_svg(doc.as_bytes()));
    let frame = decode_frame(doc.as_bytes(), Canvas::new(40, 50).unwrap()).unwrap();
    assert_red_center(&frame);
}

#[test]
fn svg_frame_rasterizes_at_canvas_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="5">
        <rect x="0" y="0" width="4" height="5" fill="#ff0000"/>
    </svg>"##;
    let canvas = Canvas::new(40, 50).unwrap();
    let frame = decode_frame(svg, canvas).unwrap();
    assert_eq!((frame.width, frame.height), (40, 50));
    let center = ((25 * 40 + 20) * 4) as usize;
    assert_eq!(&frame.rgba8_premul[center..center + 4], &[255, 0, 0, 255]);
}

#[test]
fn raster_frame_keeps_native_size() {
    let canvas = Canvas::new(40, 50).unwrap();
    let frame = decode_frame(&png_bytes(8, 10, [0, 0, 0, 255]), canvas).unwrap();
    assert_eq!((frame.width, frame.height), (8, 10));
}

#[test]
fn decode_svg_parse_err() {
    assert!(parse_svg(b"<svg").is_err());
}

#[tokio::test]
async fn async_decode_matches_sync() {
    let buf = png_bytes(3, 2, [10, 20, 30, 255]);
    let sync = decode_image(&buf).unwrap();
    let shared: Arc<[u8]> = Arc::from(buf);
    let asynced = decode_image_async(shared).await.unwrap();
    assert_eq!(sync.rgba8_premul, asynced.rgba8_premul);
}
