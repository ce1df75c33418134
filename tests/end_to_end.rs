//! Full predict workflow driven through `Session`, against demo models
//! written to a temporary model root.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use rand::{rngs::StdRng, SeedableRng};

use plant_doctor::demo::write_demo_model;
use plant_doctor::ui::{Phase, PreviewRegistry, ResultView};
use plant_doctor::workflow::{PredictWorkflow, GUIDANCE_MESSAGE, MODEL_LOAD_FAILED, PREPROCESS_FAILED};
use plant_doctor::{AppConfig, Plant, Session};

fn leaf_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([40, (100 + (x + y) % 120) as u8, 30]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut out, ImageOutputFormat::Png).unwrap();
    out.into_inner()
}

fn seeded_root(plants: &[Plant]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    for &plant in plants {
        write_demo_model(dir.path(), plant, 224, &mut rng).unwrap();
    }
    dir
}

fn session(root: &Path) -> (Session, PreviewRegistry) {
    let config = AppConfig { model_root: root.to_path_buf(), ..AppConfig::default() };
    let previews = PreviewRegistry::new();
    (Session::new(PredictWorkflow::from_config(&config), previews.clone()), previews)
}

#[test]
fn tomato_upload_yields_numeric_result() {
    let root = seeded_root(&[Plant::Tomato]);
    let (mut session, _) = session(root.path());

    session.select_plant(Some(Plant::Tomato));
    session.select_file("leaf.png", leaf_png(500, 300));
    assert!(session.state().can_predict());

    session.predict();

    let state = session.state();
    assert_eq!(state.phase(), Phase::ResultShown);
    assert!(!state.is_loading);
    let Some(ResultView::Scores { line, top_label, diagnosis }) = &state.prediction else {
        panic!("expected scores, got {:?}", state.prediction);
    };
    let values: Vec<f32> = line.split(',').map(|v| v.parse().unwrap()).collect();
    // default batch of 32, three tomato classes
    assert_eq!(values.len(), 32 * 3);
    let row_sum: f32 = values[..3].iter().sum();
    assert!((row_sum - 1.0).abs() < 1e-4);
    assert!(top_label.as_deref().unwrap().starts_with("Tomato_"));
    let diagnosis = diagnosis.as_ref().unwrap();
    assert!(diagnosis.summary.starts_with("The tomato plant is Tomato_"));
    assert_ne!(diagnosis.description, plant_doctor::plant::NO_DISEASE_INFO);
}

#[test]
fn predict_without_file_shows_guidance() {
    let root = seeded_root(&[]);
    let (mut session, _) = session(root.path());
    session.select_plant(Some(Plant::Potato));

    assert!(session.begin_predict().is_none());
    let state = session.state();
    assert!(!state.is_loading);
    assert_eq!(state.prediction.as_ref().map(ResultView::text), Some(GUIDANCE_MESSAGE));
}

#[test]
fn clear_resets_inputs_and_preview() {
    let root = seeded_root(&[Plant::Cotton]);
    let (mut session, previews) = session(root.path());

    session.select_plant(Some(Plant::Cotton));
    session.select_file("leaf.png", leaf_png(64, 64));
    let preview = session.state().preview.unwrap();
    assert!(previews.get(preview).is_some());

    session.hover_clear(true);
    session.clear();

    let state = session.state();
    assert!(state.is_reset());
    assert_eq!(state.file_input_generation, 1);
    assert!(previews.get(preview).is_none());
    assert!(previews.is_empty());
}

#[test]
fn missing_model_reports_load_error() {
    let root = seeded_root(&[Plant::Potato, Plant::Tomato]);
    let (mut session, _) = session(root.path());

    session.select_plant(Some(Plant::Cotton));
    session.select_file("leaf.png", leaf_png(100, 100));
    session.predict();

    let state = session.state();
    assert_eq!(state.prediction.as_ref().map(ResultView::text), Some(MODEL_LOAD_FAILED));
    assert!(state.can_predict());
}

#[test]
fn corrupt_upload_reports_processing_error() {
    let root = seeded_root(&[Plant::Potato]);
    let (mut session, _) = session(root.path());

    session.select_plant(Some(Plant::Potato));
    session.select_file("leaf.jpg", b"not really a jpeg".to_vec());
    session.predict();

    assert_eq!(
        session.state().prediction.as_ref().map(ResultView::text),
        Some(PREPROCESS_FAILED)
    );
}

#[test]
fn in_flight_prediction_blocks_second_run() {
    let root = seeded_root(&[Plant::Tomato]);
    let (mut session, _) = session(root.path());
    session.select_plant(Some(Plant::Tomato));
    session.select_file("leaf.png", leaf_png(50, 80));

    let run = session.begin_predict().expect("first run starts");
    assert_eq!(session.state().phase(), Phase::Predicting);
    assert!(!session.state().can_predict());
    assert!(session.begin_predict().is_none());

    let finished = run.execute();
    session.finish_predict(finished);
    assert_eq!(session.state().phase(), Phase::ResultShown);
    assert!(session.state().can_predict());
}

#[test]
fn clear_during_run_discards_late_result() {
    let root = seeded_root(&[Plant::Tomato]);
    let (mut session, _) = session(root.path());
    session.select_plant(Some(Plant::Tomato));
    session.select_file("leaf.png", leaf_png(50, 80));

    let run = session.begin_predict().unwrap();
    session.clear();
    session.finish_predict(run.execute());
    assert!(session.state().is_reset());
}

#[test]
fn previews_are_released_on_replacement_and_teardown() {
    let root = seeded_root(&[]);
    let (mut session, previews) = session(root.path());

    session.select_file("a.png", leaf_png(10, 10));
    let first = session.state().preview.unwrap();
    session.select_file("b.png", leaf_png(12, 12));
    let second = session.state().preview.unwrap();

    assert_ne!(first, second);
    assert!(previews.get(first).is_none());
    assert_eq!(previews.get(second).unwrap().content_type, "image/png");
    assert_eq!(previews.len(), 1);

    drop(session);
    assert!(previews.is_empty());
}

#[test]
fn every_plant_loads_or_returns_none() {
    use plant_doctor::{ModelSource, ModelStore};

    let root = seeded_root(&[Plant::Potato]);
    let store = ModelStore::new(root.path());
    for plant in Plant::ALL {
        let loaded = store.load(plant);
        assert_eq!(loaded.is_some(), plant == Plant::Potato);
    }
}
