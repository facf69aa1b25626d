use super::*;

#[test]
fn sample_id_rejects_separators_and_empty() {
    assert!(SampleId::new("Spin").is_ok());
    assert!(SampleId::new("Issues-issue_1169").is_ok());
    assert!(SampleId::new("").is_err());
    assert!(SampleId::new("Nested/Spin").is_err());
    assert!(SampleId::new("Nested\\Spin").is_err());
}

#[test]
fn sample_id_is_case_sensitive() {
    let a = SampleId::new("spin").unwrap();
    let b = SampleId::new("Spin").unwrap();
    assert_ne!(a, b);
}

#[test]
fn sample_id_deserialize_validates() {
    let ok: SampleId = serde_json::from_str("\"Spin\"").unwrap();
    assert_eq!(ok.as_str(), "Spin");
    assert!(serde_json::from_str::<SampleId>("\"a/b\"").is_err());
}

#[test]
fn checkpoints_are_strictly_increasing() {
    let progress: Vec<f64> = Checkpoint::ALL.iter().map(|c| c.progress()).collect();
    assert_eq!(progress, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    let mut sorted = Checkpoint::ALL;
    sorted.sort();
    assert_eq!(sorted, Checkpoint::ALL);
}

#[test]
fn checkpoint_labels_parse_back() {
    for c in Checkpoint::ALL {
        assert_eq!(Checkpoint::from_label(c.label()), Some(c));
    }
    assert_eq!(Checkpoint::from_label("33%"), None);
    assert_eq!(Checkpoint::End.to_string(), "100%");
}

#[test]
fn render_size_rejects_degenerate_dimensions() {
    assert!(RenderSize::new(0.0, 10.0).is_err());
    assert!(RenderSize::new(10.0, -1.0).is_err());
    assert!(RenderSize::new(f64::NAN, 1.0).is_err());
    assert_eq!(RenderSize::new(2.4, 0.2).unwrap().pixel_dims(), (2, 1));
}

#[test]
fn frame_checks_buffer_length() {
    assert!(FrameRGBA::new(2, 2, vec![0; 16]).is_ok());
    assert!(FrameRGBA::new(2, 2, vec![0; 15]).is_err());
    let f = FrameRGBA::solid(3, 1, [1, 2, 3, 4]);
    assert_eq!(f.data, vec![1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    let img = f.clone().into_rgba_image().unwrap();
    assert_eq!(FrameRGBA::from_rgba_image(img), f);
}
