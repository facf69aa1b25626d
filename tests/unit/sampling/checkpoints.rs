use super::*;
use crate::config::resolver::OverrideTable;

fn resolver() -> ConfigResolver {
    ConfigResolver::new(
        OverrideTable::new([(
            "Zoom",
            SnapshotConfiguration::default().with_alternate_variant(),
        )])
        .unwrap(),
    )
}

fn size(w: f64, h: f64) -> RenderSize {
    RenderSize::new(w, h).unwrap()
}

#[test]
fn default_variant_always_gets_five_increasing_checkpoints() {
    let r = resolver();
    let s = CheckpointSampler::new(&r);
    for id in ["Zoom", "Spin"] {
        let cps = s.checkpoints_for(id, RenderVariant::Default);
        assert_eq!(cps.len(), 5);
        assert_eq!(cps.first().unwrap().progress(), 0.0);
        assert_eq!(cps.last().unwrap().progress(), 1.0);
        assert!(cps.windows(2).all(|w| w[0].progress() < w[1].progress()));
    }
}

#[test]
fn alternate_variant_requires_opt_in() {
    let r = resolver();
    let s = CheckpointSampler::new(&r);
    assert!(s.checkpoints_for("Spin", RenderVariant::Alternate).is_empty());
    assert_eq!(s.checkpoints_for("Zoom", RenderVariant::Alternate).len(), 5);
}

#[test]
fn wide_sample_is_clamped_on_width() {
    let r = resolver();
    let s = CheckpointSampler::new(&r);
    let out = s.output_size_for(size(1000.0, 250.0));
    assert_eq!(out, size(500.0, 125.0));
}

#[test]
fn tall_and_square_samples_are_clamped_on_height() {
    let r = resolver();
    let s = CheckpointSampler::new(&r);
    assert_eq!(s.output_size_for(size(300.0, 1200.0)), size(125.0, 500.0));
    assert_eq!(s.output_size_for(size(800.0, 800.0)), size(500.0, 500.0));
}

#[test]
fn small_samples_keep_native_size() {
    let r = resolver();
    let s = CheckpointSampler::new(&r);
    assert_eq!(s.output_size_for(size(16.0, 16.0)), size(16.0, 16.0));
}

#[test]
fn output_size_preserves_aspect_and_respects_cap() {
    let r = resolver();
    let s = CheckpointSampler::with_max_dimension(&r, 320.0).unwrap();
    for (w, h) in [
        (1920.0, 1080.0),
        (1080.0, 1920.0),
        (333.3, 777.7),
        (5.0, 3.0),
        (4096.0, 17.0),
    ] {
        let input = size(w, h);
        let out = s.output_size_for(input);
        assert!(out.width <= 320.0 && out.height <= 320.0);
        assert!((out.aspect_ratio() - input.aspect_ratio()).abs() < 1e-9);
    }
}

#[test]
fn custom_cap_must_be_positive() {
    let r = resolver();
    assert!(CheckpointSampler::with_max_dimension(&r, 0.0).is_err());
    assert!(CheckpointSampler::with_max_dimension(&r, f64::INFINITY).is_err());
}
