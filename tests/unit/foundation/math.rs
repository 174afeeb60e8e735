use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_and_clears_transparent() {
    let mut px = vec![10u8, 20, 30, 255, 200, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);

    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);
}

#[test]
fn unpremultiply_half_alpha() {
    let mut px = vec![64u8, 0, 128, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![128, 0, 255, 128]);
}

#[test]
fn fingerprint_is_stable_and_content_sensitive() {
    assert_eq!(fingerprint(b"frame"), fingerprint(b"frame"));
    assert_ne!(fingerprint(b"frame"), fingerprint(b"frame2"));
}
