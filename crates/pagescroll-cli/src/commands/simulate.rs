use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use pagescroll_core::scenario::{replay, Frame, Scenario};

pub fn run(path: &Path, json: bool) -> Result<()> {
    let scenario = Scenario::from_path(path)
        .with_context(|| format!("Failed to load scenario {}", path.display()))?;
    debug!(
        pages = scenario.pages.len(),
        steps = scenario.steps.len(),
        "Replaying scenario"
    );

    let frames = replay(&scenario)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&frames)?);
    } else {
        print_table(&frames);
    }
    Ok(())
}

fn print_table(frames: &[Frame]) {
    println!(
        "{:>4}  {:<22} {:>4} {:>10} {:>10} {:>10} {:>9} {:>10}  {}",
        "STEP", "ACTION", "PAGE", "CONTAINER", "OVERLAY", "PAGE_Y", "PROGRESS", "HEIGHT", "REGIME"
    );
    println!("{}", "-".repeat(100));

    for frame in frames {
        let page_y = frame
            .page_y
            .map(|y| format!("{:.1}", y))
            .unwrap_or_else(|| "-".to_string());
        let regime = if frame.collapsed { "collapsed" } else { "expanding" };
        println!(
            "{:>4}  {:<22} {:>4} {:>10.1} {:>10.1} {:>10} {:>9.3} {:>10.1}  {}",
            frame.step,
            frame.label,
            frame.active_page,
            frame.container_y,
            frame.overlay_y,
            page_y,
            frame.progress,
            frame.overlay_content_height,
            regime
        );
    }
}
