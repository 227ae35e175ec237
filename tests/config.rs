//! Configuration loading and startup tests.

use std::fs;
use std::path::Path;

use pariksha::{Action, ParikshaConfig, ParikshaError, SurfaceDetectionRequest, SurfaceService};
use tempfile::TempDir;

const SAMPLE: &str = include_str!("../pariksha.toml");

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("pariksha.toml");
    fs::write(&path, content).unwrap();
    path
}

/// Sample config without the given `[section]`.
fn without_section(section: &str) -> String {
    let header = format!("[{}]", section);
    let mut out = String::new();
    let mut skipping = false;
    for line in SAMPLE.lines() {
        if line.starts_with('[') {
            skipping = line.trim() == header;
        }
        if !skipping {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

#[test]
fn test_load_sample_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SAMPLE);

    let config = ParikshaConfig::load(&path).unwrap();

    assert_eq!(config.service.workers, 4);
    assert_eq!(config.robot_scan.num_scan_points, 12);
    assert_eq!(config.surface_detection.min_cluster_size, 100);
    assert_eq!(config.parameter_set().blending_plan, config.blending_plan);
}

#[test]
fn test_missing_parameter_section_fails() {
    for section in ["robot_scan", "surface_detection", "blending_plan"] {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, &without_section(section));
        let result = ParikshaConfig::load(&path);
        assert!(
            matches!(result, Err(ParikshaError::Config(_))),
            "missing [{}] accepted",
            section
        );
    }
}

#[test]
fn test_missing_field_fails() {
    let text = SAMPLE.replace("safe_traverse_height = 0.05\n", "");
    assert!(matches!(
        ParikshaConfig::parse(&text),
        Err(ParikshaError::Config(_))
    ));
}

#[test]
fn test_optional_sections_default() {
    let text = without_section("simulation");
    let text = text
        .split("[robot_scan]")
        .nth(1)
        .map(|rest| format!("[robot_scan]{}", rest))
        .unwrap();

    let config = ParikshaConfig::parse(&text).unwrap();

    assert!(!config.service.publish_region_point_cloud);
    assert_eq!(config.service.publish_period_ms, 1000);
    assert_eq!(config.simulation.patch_size, 0.1);
}

#[test]
fn test_missing_file_fails() {
    let result = ParikshaConfig::load(Path::new("/nonexistent/pariksha.toml"));
    assert!(matches!(result, Err(ParikshaError::Config(_))));
}

#[test]
fn test_stage_init_failure_aborts_startup() {
    let text = SAMPLE.replace("patch_size = 0.1", "patch_size = 0.0");
    let config = ParikshaConfig::parse(&text).unwrap();

    let result = SurfaceService::simulated(&config);

    assert!(matches!(result, Err(ParikshaError::StageInit(_))));
}

#[test]
fn test_simulated_service_end_to_end() {
    let mut config = ParikshaConfig::parse(SAMPLE).unwrap();
    config.service.publish_region_point_cloud = true;
    config.service.publish_period_ms = 10;

    let service = SurfaceService::simulated(&config).unwrap();
    let previews = service.topics().scan_path_preview.subscribe();
    let clouds = service.topics().region_colored_cloud.subscribe();
    let client = service.client();

    let resp = client
        .detect(SurfaceDetectionRequest::with_defaults(Action::ScanFindAndReturn))
        .unwrap();

    assert!(resp.surfaces_found);
    assert_eq!(resp.surfaces.len(), 12);
    assert_eq!(previews.try_recv().unwrap().poses.len(), 12);

    let cloud = clouds
        .recv_timeout(std::time::Duration::from_secs(2))
        .unwrap();
    assert_eq!(cloud.len(), 12 * 121);
    assert!(!client.process_path().unwrap().succeeded);

    service.shutdown();
}
