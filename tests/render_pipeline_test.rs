//! Single-image rendering through the config and service layers.

mod common;

use common::fixtures::{self, INK, PAPER};
use halftone::ShapeKind;
use pretty_assertions::assert_eq;
use reticulate::error::{ConfigError, ImageError};
use reticulate::models::{StyleConfig, StyleOverrides};
use reticulate::services::RenderService;

#[tokio::test]
async fn test_render_file_from_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("style.yaml");
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    std::fs::write(&config_path, fixtures::style_yaml(4)).unwrap();
    fixtures::write_png(&input, &fixtures::split_image(16, 8));

    let config = StyleConfig::resolve(Some(&config_path)).unwrap();
    let service = RenderService::from_config(&config).unwrap();
    let outcome = service.render_file(&input, &output).await.unwrap();
    assert_eq!((outcome.width, outcome.height), (16, 8));

    let out = common::read_png(&output);
    common::assert_dimensions(&out, 16, 8);
    // Black half tiles with full squares, white half stays background
    common::assert_columns(&out, 0..8, INK);
    common::assert_columns(&out, 8..16, PAPER);
}

#[tokio::test]
async fn test_invert_override_flips_halves() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    fixtures::write_png(&input, &fixtures::split_image(16, 8));

    let mut config: StyleConfig = serde_yaml::from_str(&fixtures::style_yaml(4)).unwrap();
    config.apply(&StyleOverrides {
        invert: Some(true),
        ..Default::default()
    });
    RenderService::from_config(&config)
        .unwrap()
        .render_file(&input, &output)
        .await
        .unwrap();

    let out = common::read_png(&output);
    common::assert_columns(&out, 0..8, PAPER);
    common::assert_columns(&out, 8..16, INK);
}

#[tokio::test]
async fn test_large_input_is_capped() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    fixtures::write_png(&input, &fixtures::split_image(300, 100));

    let config = StyleConfig {
        max_dimension: 60,
        ..Default::default()
    };
    let outcome = RenderService::from_config(&config)
        .unwrap()
        .render_file(&input, &output)
        .await
        .unwrap();

    assert_eq!((outcome.width, outcome.height), (60, 20));
    common::assert_dimensions(&common::read_png(&output), 60, 20);
}

#[tokio::test]
async fn test_transparent_background_survives_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");
    fixtures::write_png(&input, &fixtures::split_image(16, 8));

    let mut config: StyleConfig = serde_yaml::from_str(&fixtures::style_yaml(4)).unwrap();
    config.background = "transparent".to_string();
    config.optimize_png = true;
    RenderService::from_config(&config)
        .unwrap()
        .render_file(&input, &output)
        .await
        .unwrap();

    let out = common::read_png(&output);
    common::assert_columns(&out, 0..8, INK);
    for y in 0..8 {
        for x in 8..16 {
            assert_eq!(out.pixel(x, y)[3], 0, "({x}, {y}) should be transparent");
        }
    }
}

#[test]
fn test_every_shape_name_loads() {
    for kind in ShapeKind::ALL {
        let config = StyleConfig {
            shape: kind.name().to_string(),
            ..Default::default()
        };
        let service = RenderService::from_config(&config).unwrap();
        assert_eq!(service.settings().shape, kind);
    }
}

#[test]
fn test_bad_config_values_are_rejected() {
    let config = StyleConfig {
        foreground: "chartreuse-ish".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        RenderService::from_config(&config),
        Err(ConfigError::InvalidColor {
            field: "foreground",
            ..
        })
    ));
}

#[tokio::test]
async fn test_non_png_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.jpg");
    std::fs::write(&input, [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0]).unwrap();

    let result = RenderService::from_config(&StyleConfig::default())
        .unwrap()
        .render_file(&input, &dir.path().join("out.png"))
        .await;
    assert!(matches!(result, Err(ImageError::UnsupportedFormat(_))));
}
