use super::ui;
use crate::core::{FxHistory, FxHistoryProvider};
use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

const BAR_WIDTH: usize = 24;

fn bar(close: f64, min: f64, max: f64) -> String {
    let span = max - min;
    let filled = if span > 0.0 {
        (((close - min) / span) * BAR_WIDTH as f64).round() as usize
    } else {
        BAR_WIDTH
    };
    "█".repeat(filled.clamp(1, BAR_WIDTH))
}

pub fn render_history(history: &FxHistory) -> String {
    let (Some(min), Some(max)) = (history.min(), history.max()) else {
        return format!("No rates available for {}", history.pair());
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Rate"),
        ui::header_cell(""),
    ]);
    for point in &history.points {
        table.add_row(vec![
            Cell::new(point.date.format("%a %d %b").to_string()),
            ui::number_cell(format!("{:.6}", point.close)),
            Cell::new(bar(point.close, min, max)).fg(comfy_table::Color::Blue),
        ]);
    }

    let change = match history.change_pct() {
        Some(pct) if pct >= 0.0 => ui::style_text(&format!("+{pct:.2}%"), ui::StyleType::TotalValue),
        Some(pct) => ui::style_text(&format!("{pct:.2}%"), ui::StyleType::Error),
        None => "-".to_string(),
    };

    format!(
        "{}\n\n{}\n\n{} {:.6}  {} {:.6}  {} {}",
        ui::style_text(&format!("Exchange Rate {}", history.pair()), ui::StyleType::Title),
        table,
        ui::style_text("Low", ui::StyleType::TotalLabel),
        min,
        ui::style_text("High", ui::StyleType::TotalLabel),
        max,
        ui::style_text("Change", ui::StyleType::TotalLabel),
        change
    )
}

pub async fn run(provider: &dyn FxHistoryProvider, from: &str, to: &str, days: u32) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching {from}/{to} history..."));
    let result = provider.fetch_history(from, to, days).await;
    pb.finish_and_clear();

    let history = result?;
    debug!("Rendering {} FX points", history.points.len());
    println!("{}", render_history(&history));
    Ok(())
}
