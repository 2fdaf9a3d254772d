use super::ui;
use crate::core::costs::{self, CurrencySummary, NormalizedTotal};
use crate::core::currency::CurrencyRole;
use crate::core::itinerary::Trip;
use crate::core::{ExchangeRateProvider, RateState};
use anyhow::Result;
use comfy_table::Cell;
use tracing::{debug, warn};

/// Per-currency table with the grand total underneath. `total` is `Pending`
/// when drawn before the rate fetch settles; `run` draws only after it does.
pub fn render_costs(
    summaries: &[CurrencySummary],
    total: &NormalizedTotal,
    show_items: bool,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Total"),
        ui::header_cell("Items"),
        ui::header_cell("Average"),
    ]);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(&summary.currency),
            ui::amount_cell(summary.total, &summary.currency),
            ui::number_cell(summary.item_count.to_string()),
            ui::amount_cell(summary.average_per_item, &summary.currency),
        ]);
    }

    let mut output = format!(
        "{}\n\n{}",
        ui::style_text("Cost Analytics", ui::StyleType::Title),
        table
    );

    if show_items {
        for summary in summaries {
            output.push_str(&format!("\n\n{}\n", render_breakdown(summary)));
        }
    }

    let (label, style) = match total {
        NormalizedTotal::Pending => ("Loading conversion...".to_string(), ui::StyleType::Subtle),
        NormalizedTotal::Failed(_) => ("Could not fetch rates".to_string(), ui::StyleType::Error),
        NormalizedTotal::Total {
            currency, amount, ..
        } => {
            let formatted = CurrencyRole::from(currency.as_str()).format_amount(*amount);
            let style = if total.is_partial() {
                ui::StyleType::Error
            } else {
                ui::StyleType::TotalValue
            };
            (formatted, style)
        }
    };
    output.push_str(&format!(
        "\n\n{}: {}",
        ui::style_text("Total Trip Cost", ui::StyleType::TotalLabel),
        ui::style_text(&label, style)
    ));

    if let NormalizedTotal::Total { unrated, .. } = total {
        if !unrated.is_empty() {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!("Partial total: no rate for {}", unrated.join(", ")),
                    ui::StyleType::Error
                )
            ));
        }
    }

    let breakdown: Vec<String> = summaries
        .iter()
        .map(|s| format!("{:.2} {}", s.total, s.currency))
        .collect();
    if !breakdown.is_empty() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(&breakdown.join(" + "), ui::StyleType::Subtle)
        ));
    }

    output
}

fn render_breakdown(summary: &CurrencySummary) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Day"),
        ui::header_cell("Item"),
        ui::header_cell("Notes"),
        ui::header_cell("Amount"),
    ]);
    for item in &summary.items {
        table.add_row(vec![
            ui::number_cell(item.day.to_string()),
            Cell::new(&item.title),
            Cell::new(item.notes.as_deref().unwrap_or("")),
            ui::amount_cell(item.amount, &summary.currency),
        ]);
    }
    format!(
        "{} Breakdown\n{}",
        ui::style_text(&summary.currency, ui::StyleType::TotalLabel),
        table
    )
}

pub async fn run(
    trips: &[Trip],
    rate_provider: &(dyn ExchangeRateProvider + Send + Sync),
    reference_currency: &str,
    show_items: bool,
) -> Result<()> {
    let summaries = costs::summarize(trips.iter().flat_map(|t| t.days.iter()));
    if summaries.is_empty() {
        println!("No priced activities found in the itinerary.");
        return Ok(());
    }

    let pb = ui::new_spinner("Fetching exchange rates...");
    let mut rates = RateState::default();
    let outcome = rate_provider.latest_rates(reference_currency).await;
    if let Err(e) = &outcome {
        warn!("Error fetching exchange rates: {:#}", e);
    }
    rates.settle(outcome);
    pb.finish_and_clear();

    let total = costs::normalize(&summaries, &rates, reference_currency);
    debug!("Normalized total: {:?}", total);
    println!("{}", render_costs(&summaries, &total, show_items));
    Ok(())
}
