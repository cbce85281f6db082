use card_merge::*;
use std::path::PathBuf;

#[test]
fn test_validation_zero_items_per_page() {
    let options = GridOptions {
        items_per_page: Some(0),
        ..Default::default()
    };
    match options.validate() {
        Err(MergeError::InvalidLayout(msg)) => assert!(msg.contains("at least 1")),
        other => panic!("Expected InvalidLayout, got {:?}", other),
    }
}

#[test]
fn test_validation_margins() {
    let mut options = GridOptions::default();
    assert!(options.validate().is_ok());

    options.page.margin_mm = -1.0;
    assert!(matches!(options.validate(), Err(MergeError::Config(_))));

    // A6 portrait is 105mm wide
    options.page = PageSpec {
        size: PaperSize::A6,
        orientation: Orientation::Portrait,
        margin_mm: 60.0,
    };
    assert!(matches!(
        options.validate(),
        Err(MergeError::InvalidLayout(_))
    ));
}

#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let mut options = GridOptions::default();
    options.page = PageSpec::new(PaperSize::A5, Orientation::Landscape);
    options.items_per_page = Some(3);
    options.title_field = Some("name".to_string());
    options.image_field = Some("photo".to_string());
    options.merge.background = Some(PathBuf::from("background.png"));
    options.merge.fetch_timeout_secs = 5;

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    options.save(path).await.unwrap();
    let loaded = GridOptions::load(path).await.unwrap();

    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_load_partial_options_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), r#"{"items_per_page": 2}"#)
        .await
        .unwrap();

    let loaded = GridOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.items_per_page, Some(2));
    assert_eq!(loaded.page, PageSpec::default());
    assert_eq!(loaded.features_field, "features");
    assert_eq!(loaded.merge, MergeOptions::default());
}

#[tokio::test]
async fn test_load_invalid_options() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), "{ not json").await.unwrap();

    let result = GridOptions::load(temp_file.path()).await;
    assert!(matches!(result, Err(MergeError::Config(_))));
}

#[test]
fn test_statistics() {
    let stats = calculate_statistics(11, 5).unwrap();
    assert_eq!(
        stats,
        MergeStatistics {
            records: 11,
            items_per_page: 5,
            pages: 3,
            blank_slots: 4,
        }
    );

    let stats = calculate_statistics(0, 5).unwrap();
    assert_eq!(stats.pages, 0);
    assert_eq!(stats.blank_slots, 0);

    assert!(calculate_statistics(3, 0).is_err());
}

#[test]
fn test_grid_statistics_use_paper_defaults() {
    let mut options = GridOptions::default();
    assert_eq!(grid_statistics(6, &options).unwrap().items_per_page, 5);

    options.page.orientation = Orientation::Landscape;
    assert_eq!(grid_statistics(6, &options).unwrap().items_per_page, 5);

    options.page = PageSpec::new(PaperSize::A6, Orientation::Portrait);
    let stats = grid_statistics(3, &options).unwrap();
    assert_eq!(stats.items_per_page, 1);
    assert_eq!(stats.pages, 3);
}

#[test]
fn test_layout_statistics_explicit_grid() {
    let json = r#"{
        "page": {"size": "A5", "orient": "L"},
        "objects": [
            {"left": 0, "top": 0, "width": 300, "height": 300,
             "meta": {"type": "repeaterArea", "cols": 2, "rows": 2}},
            {"left": 0, "top": 0, "width": 100, "height": 100, "meta": {"bind": "name"}}
        ]
    }"#;
    let layout = Layout::from_json_str(json).unwrap();
    let stats = layout_statistics(9, &layout).unwrap();
    assert_eq!(stats.items_per_page, 4);
    assert_eq!(stats.pages, 3);
    assert_eq!(stats.blank_slots, 3);
}

#[test]
fn test_layout_statistics_reject_overflowing_grid() {
    let json = r#"{
        "objects": [
            {"left": 0, "top": 0, "width": 300, "height": 300,
             "meta": {"type": "repeaterArea", "cols": 9223372036854775807, "rows": 4}},
            {"left": 0, "top": 0, "width": 100, "height": 100, "meta": {"bind": "name"}}
        ]
    }"#;
    let layout = Layout::from_json_str(json).unwrap();
    assert!(matches!(
        layout_statistics(3, &layout),
        Err(MergeError::InvalidLayout(_))
    ));
}
