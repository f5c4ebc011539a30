//! DatasetService: records built from settings.

use formgen::application::services::{write_records, DatasetService, FormPromptRecord};
use formgen::config::Settings;

fn seeded(seed: u64) -> Settings {
    Settings {
        seed: Some(seed),
        ..Settings::default()
    }
}

#[test]
fn given_same_seed_when_generating_batches_then_records_identical() {
    let first = DatasetService::from_settings(&seeded(5))
        .unwrap()
        .generate_batch(3)
        .unwrap();
    let second = DatasetService::from_settings(&seeded(5))
        .unwrap()
        .generate_batch(3)
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn given_record_when_inspecting_then_renderings_agree() {
    let record = DatasetService::from_settings(&seeded(17))
        .unwrap()
        .generate_record()
        .unwrap();

    let removed_header = record.removed_node.lines().next().unwrap().trim_start();
    let removed_id = removed_header
        .split(' ')
        .nth(1)
        .expect("form/field header has an id");
    assert!(record.removed_node_english.contains(&format!("whose id is '{removed_id}'")));

    let parent = record.removed_node_context.parent.as_ref().unwrap();
    assert!(record
        .removed_node_context_english
        .contains(&format!("It was a child of a form whose id is '{}'", parent.data.id)));
    assert!(record
        .removed_node_context_english
        .lines()
        .all(|line| line.starts_with("* ")));
}

#[test]
fn given_pretty_output_when_writing_then_json_array_round_trips() {
    let records = DatasetService::from_settings(&seeded(23))
        .unwrap()
        .generate_batch(2)
        .unwrap();
    let mut buffer = Vec::new();

    write_records(&records, &mut buffer, true).unwrap();

    let decoded: Vec<FormPromptRecord> = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(decoded, records);
}
