use super::*;

fn frame(pixels: &[[u8; 4]], width: u32) -> FrameRGBA {
    let height = pixels.len() as u32 / width;
    FrameRGBA::new(width, height, pixels.concat()).unwrap()
}

#[test]
fn identical_frames_match_at_full_precision() {
    let a = FrameRGBA::solid(4, 4, [9, 9, 9, 255]);
    let m = PixelComparator::strict().compare(&a, &a.clone(), 1.0);
    assert!(m.matched);
    assert_eq!(m.similarity, Some(1.0));
}

#[test]
fn one_differing_pixel_in_four() {
    let a = frame(&[[0, 0, 0, 255]; 4], 2);
    let b = frame(
        &[[0, 0, 0, 255], [0, 0, 0, 255], [0, 0, 0, 255], [200, 0, 0, 255]],
        2,
    );
    let cmp = PixelComparator::strict();
    assert_eq!(cmp.similarity(&a, &b), 0.75);
    assert!(!cmp.compare(&a, &b, 1.0).matched);
    assert!(cmp.compare(&a, &b, 0.75).matched);
}

#[test]
fn tolerance_absorbs_small_channel_drift() {
    let a = FrameRGBA::solid(2, 2, [100, 100, 100, 255]);
    let b = FrameRGBA::solid(2, 2, [103, 98, 100, 255]);
    assert_eq!(PixelComparator::strict().similarity(&a, &b), 0.0);
    assert_eq!(
        PixelComparator::strict()
            .with_channel_tolerance(3)
            .similarity(&a, &b),
        1.0
    );
}

#[test]
fn size_mismatch_never_matches() {
    let a = FrameRGBA::solid(2, 2, [0, 0, 0, 255]);
    let b = FrameRGBA::solid(4, 1, [0, 0, 0, 255]);
    let m = PixelComparator::strict().compare(&a, &b, 0.01);
    assert!(!m.matched);
    assert_eq!(m.similarity, Some(0.0));
}
