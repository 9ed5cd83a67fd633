use std::path::PathBuf;

use pagescroll_core::scenario::{replay, Scenario};

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/profile.toml")
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_demo_profile_replay() {
    let scenario = Scenario::from_path(&demo_path()).unwrap();
    let frames = replay(&scenario).unwrap();
    assert_eq!(frames.len(), scenario.steps.len());

    // Header collapsing
    assert_eq!(frames[0].container_y, 70.0);
    assert!(approx_eq(frames[0].progress, 0.5));
    assert!(!frames[0].collapsed);

    // Scrolling into the first page
    assert_eq!(frames[2].container_y, 140.0);
    assert_eq!(frames[2].page_y, Some(260.0));
    assert!(frames[2].collapsed);

    // Unvisited page starts at the container offset
    assert_eq!(frames[3].active_page, 1);
    assert_eq!(frames[3].overlay_y, 140.0);
    assert_eq!(frames[3].overlay_content_height, 1140.0);

    // Nested page scroll drives the overlay
    assert_eq!(frames[4].overlay_y, 260.0);

    // First page restored
    assert_eq!(frames[5].overlay_y, 400.0);
    assert_eq!(frames[5].page_y, Some(260.0));
    assert_eq!(frames[5].overlay_content_height, 2640.0);

    // Overscroll resets the page and parks the resize
    assert_eq!(frames[7].container_y, -30.0);
    assert_eq!(frames[7].page_y, Some(0.0));
    assert!(frames[7].progress < 0.0);
    assert_eq!(frames[8].overlay_content_height, 2640.0);

    // Back at zero the parked size lands
    assert_eq!(frames[10].overlay_content_height, 3240.0);

    // Taller header
    assert_eq!(frames[11].overlay_content_height, 3280.0);

    // Late view is only tracked once the page is re-selected
    assert_eq!(frames[13].page_y, None);
    assert_eq!(frames[14].overlay_content_height, 1780.0);

    let last = frames.last().unwrap();
    assert_eq!(last.active_page, 3);
    assert_eq!(last.container_y, 180.0);
    assert_eq!(last.page_y, Some(320.0));
    assert!(approx_eq(last.progress, 1.0));
}

#[test]
fn test_out_of_range_page_rejected() {
    let content = r#"
    {
        "viewport": { "width": 100.0, "height": 100.0 },
        "pages": [ { "content_height": 10.0 } ],
        "steps": [ { "action": "select_page", "index": 4 } ]
    }
    "#;
    let err = Scenario::from_json_str(content).unwrap_err();
    assert!(err.to_string().contains("page 4"));
}
