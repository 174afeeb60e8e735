use super::*;
use crate::foundation::core::Rgba8Premul;
use crate::scene::frame::FrameInfo;
use crate::scene::photo::PhotoTransform;

const GREEN: [u8; 4] = [0, 200, 0, 255];
const BLUE: [u8; 4] = [0, 0, 220, 255];
const RED: [u8; 4] = [230, 0, 0, 255];

fn canvas() -> Canvas {
    Canvas::new(40, 50).unwrap()
}

fn image_from_fn(w: u32, h: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> Arc<PreparedImage> {
    let mut bytes = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let [r, g, b, a] = f(x, y);
            let p = Rgba8Premul::from_straight_rgba(r, g, b, a);
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
    }
    Arc::new(PreparedImage::from_premul(w, h, bytes).unwrap())
}

fn solid(w: u32, h: u32, c: [u8; 4]) -> Arc<PreparedImage> {
    image_from_fn(w, h, |_, _| c)
}

/// Opaque bands at the top and bottom ten rows, transparent cutout elsewhere.
fn banded_frame() -> FrameState {
    let img = image_from_fn(40, 50, |_, y| {
        if !(10..40).contains(&y) {
            RED
        } else {
            [0, 0, 0, 0]
        }
    });
    FrameState::with_image(FrameInfo::default(), img)
}

fn assert_px(s: &Surface, x: u32, y: u32, expected: [u8; 4]) {
    let p = s.pixel(x, y).unwrap();
    let got = [p.r, p.g, p.b, p.a];
    let close = got
        .iter()
        .zip(expected.iter())
        .all(|(a, b)| (i16::from(*a) - i16::from(*b)).abs() <= 3);
    assert!(close, "pixel ({x},{y}) = {got:?}, expected ~{expected:?}");
}

#[test]
fn nothing_loaded_renders_blank() {
    let mut c = Compositor::new(canvas()).unwrap();
    let s = c.render(&PhotoState::empty(), &FrameState::default()).unwrap();
    assert_eq!((s.width, s.height), (40, 50));
    assert!(s.data.iter().all(|&b| b == 0));
}

#[test]
fn identity_landscape_photo_is_centered_vertically() {
    let mut c = Compositor::new(canvas()).unwrap();
    // 16:9 -> 40 x 22.5 drawn at y = 13.75.
    let photo = PhotoState::with_image(solid(32, 18, BLUE));
    let s = c.render(&photo, &FrameState::default()).unwrap();

    assert_px(&s, 20, 25, BLUE);
    assert_px(&s, 1, 20, BLUE);
    assert_px(&s, 38, 30, BLUE);
    assert_px(&s, 20, 5, [0, 0, 0, 0]);
    assert_px(&s, 20, 45, [0, 0, 0, 0]);
}

#[test]
fn frame_occludes_photo_and_cutout_reveals_it() {
    let mut c = Compositor::new(canvas()).unwrap();
    let frame = banded_frame();
    let transforms = [
        PhotoTransform::IDENTITY,
        PhotoTransform {
            rotation_deg: 37.0,
            scale: 2.0,
            offset_x: 3.0,
            offset_y: -4.0,
        },
        PhotoTransform {
            rotation_deg: -180.0,
            scale: 0.5,
            ..PhotoTransform::IDENTITY
        },
    ];
    for t in transforms {
        let mut photo = PhotoState::with_image(solid(30, 30, GREEN));
        photo.transform = t;
        let s = c.render(&photo, &frame).unwrap();
        assert_px(&s, 20, 3, RED);
        assert_px(&s, 5, 46, RED);
        assert_px(&s, 20, 25, GREEN);
    }
}

#[test]
fn frame_renders_without_photo() {
    let mut c = Compositor::new(canvas()).unwrap();
    let s = c.render(&PhotoState::empty(), &banded_frame()).unwrap();
    assert_px(&s, 20, 3, RED);
    assert_px(&s, 20, 25, [0, 0, 0, 0]);
}

#[test]
fn half_turn_pivots_on_canvas_center_not_photo_center() {
    let mut c = Compositor::new(canvas()).unwrap();
    // Square photo: 50x50 drawn at x = -5 + offset. Left half green, right half blue.
    let img = image_from_fn(20, 20, |x, _| if x < 10 { GREEN } else { BLUE });
    let mut photo = PhotoState::with_image(img);
    photo.transform.offset_x = 10.0;

    let upright = c.render(&photo, &FrameState::default()).unwrap();
    assert_px(&upright, 5, 25, GREEN);
    assert_px(&upright, 37, 25, BLUE);

    photo.transform.rotation_deg = 180.0;
    let turned = c.render(&photo, &FrameState::default()).unwrap();
    // About the canvas center (20, 25) the photo spans x in [-15, 35] after the turn.
    assert_px(&turned, 5, 25, BLUE);
    assert_px(&turned, 15, 25, GREEN);
    assert_px(&turned, 37, 25, [0, 0, 0, 0]);
}

#[test]
fn rendering_is_deterministic() {
    let mut c = Compositor::new(canvas()).unwrap();
    let img = image_from_fn(23, 17, |x, y| [(x * 11) as u8, (y * 13) as u8, 90, 255]);
    let mut photo = PhotoState::with_image(img);
    photo.transform = PhotoTransform {
        offset_x: 2.5,
        offset_y: -1.25,
        scale: 1.7,
        rotation_deg: 33.0,
    };
    let frame = banded_frame();
    let a = c.render(&photo, &frame).unwrap();
    let b = c.render(&photo, &frame).unwrap();
    let mut fresh = Compositor::new(canvas()).unwrap();
    let d = fresh.render(&photo, &frame).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, d);
}

#[test]
fn replacing_the_photo_invalidates_the_paint() {
    let mut c = Compositor::new(canvas()).unwrap();
    let mut photo = PhotoState::with_image(solid(10, 10, GREEN));
    let first = c.render(&photo, &FrameState::default()).unwrap();
    photo.replace_image(solid(10, 10, BLUE));
    let second = c.render(&photo, &FrameState::default()).unwrap();
    assert_px(&first, 20, 25, GREEN);
    assert_px(&second, 20, 25, BLUE);
}

#[test]
fn non_finite_transform_is_rejected() {
    let mut c = Compositor::new(canvas()).unwrap();
    let mut photo = PhotoState::with_image(solid(10, 10, GREEN));
    photo.transform.scale = f64::NAN;
    assert!(matches!(
        c.render(&photo, &FrameState::default()),
        Err(TwibbonError::Validation(_))
    ));
    photo.transform.scale = 0.0;
    assert!(c.render(&photo, &FrameState::default()).is_err());
}
