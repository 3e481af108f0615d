use super::*;
use crate::foundation::core::Rgba8Premul;

fn surface(w: u32, h: u32) -> Surface {
    Surface::new(BackingSize {
        width: w,
        height: h,
    })
    .unwrap()
}

#[test]
fn over_respects_alpha_and_opacity() {
    let dst = [0, 0, 255, 255];
    assert_eq!(over(dst, [255, 0, 0, 255], 1.0), [255, 0, 0, 255]);
    assert_eq!(over(dst, [255, 0, 0, 255], 0.0), dst);
    assert_eq!(over(dst, [0, 0, 0, 0], 1.0), dst);
    let half = over(dst, [255, 0, 0, 255], 0.5);
    assert_eq!(half[3], 255);
    assert!(half[0] > 120 && half[0] < 135);
    assert!(half[2] > 120 && half[2] < 135);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn image_covers_only_its_box() {
    let img = ImagePaint::from_premul_bytes(&[0, 255, 0, 255].repeat(32), 4, 8).unwrap();
    let mut s = surface(8, 8);
    s.clear(Rgba8Premul::transparent());
    let mut painter = CpuPainter::new();
    painter
        .paint(
            &mut s,
            &[PaintOp::Image {
                image: &img,
                transform: Affine::IDENTITY,
                opacity: 1.0,
            }],
        )
        .unwrap();
    let f = s.readback();
    assert_eq!(f.pixel(1, 4), Some([0, 255, 0, 255]));
    assert_eq!(f.pixel(6, 4), Some([0, 0, 0, 0]));
}

#[test]
fn paint_accumulates_over_existing_contents() {
    let img = ImagePaint::from_premul_bytes(&[255, 0, 0, 255].repeat(8), 2, 4).unwrap();
    let mut s = surface(4, 4);
    s.clear(Rgba8Premul::from_straight_rgba(0, 0, 255, 255));
    let mut painter = CpuPainter::new();
    painter
        .paint(
            &mut s,
            &[PaintOp::Image {
                image: &img,
                transform: Affine::IDENTITY,
                opacity: 1.0,
            }],
        )
        .unwrap();
    let f = s.readback();
    assert_eq!(f.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(f.pixel(3, 0), Some([0, 0, 255, 255]));
}

#[test]
fn zero_opacity_image_leaves_surface_untouched() {
    let img = ImagePaint::from_premul_bytes(&[255, 0, 0, 255].repeat(4), 2, 2).unwrap();
    let mut s = surface(2, 2);
    s.clear(Rgba8Premul::from_straight_rgba(0, 0, 255, 255));
    CpuPainter::new()
        .paint(
            &mut s,
            &[PaintOp::Image {
                image: &img,
                transform: Affine::IDENTITY,
                opacity: 0.0,
            }],
        )
        .unwrap();
    assert_eq!(s.readback().pixel(1, 1), Some([0, 0, 255, 255]));
}

#[test]
fn image_paint_is_scaled_by_transform() {
    let img = ImagePaint::from_premul_bytes(&[200, 10, 10, 255].repeat(4), 2, 2).unwrap();
    let mut s = surface(8, 8);
    s.clear(Rgba8Premul::transparent());
    let mut painter = CpuPainter::new();
    painter
        .paint(
            &mut s,
            &[PaintOp::Image {
                image: &img,
                transform: Affine::scale(4.0),
                opacity: 1.0,
            }],
        )
        .unwrap();
    let f = s.readback();
    assert_eq!(f.pixel(0, 0), Some([200, 10, 10, 255]));
    assert_eq!(f.pixel(7, 7), Some([200, 10, 10, 255]));
}

#[test]
fn image_paint_validates_length() {
    assert!(ImagePaint::from_premul_bytes(&[0u8; 12], 2, 2).is_err());
}
