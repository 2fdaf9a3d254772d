use super::ui;
use crate::core::itinerary::{
    Countdown, DayItinerary, ItineraryFilter, Price, Trip, activity_count,
};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use comfy_table::Cell;
use tracing::debug;

fn price_cell(price: &Price) -> Cell {
    if price.amount == 0.0 {
        Cell::new("Free").fg(comfy_table::Color::Green)
    } else {
        ui::amount_cell(price.amount, &price.currency)
    }
}

fn render_day(day: &DayItinerary) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Time"),
        ui::header_cell("Activity"),
        ui::header_cell("Location"),
        ui::header_cell("Price"),
    ]);
    for item in &day.items {
        let mut activity = item.title.clone();
        if !item.description.is_empty() {
            activity.push('\n');
            activity.push_str(&item.description);
        }
        if !item.note.is_empty() {
            activity.push_str(&format!("\nNote: {}", item.note));
        }
        table.add_row(vec![
            Cell::new(&item.time),
            Cell::new(activity),
            Cell::new(&item.location.name),
            price_cell(&item.price),
        ]);
    }
    format!(
        "{}\n{}",
        ui::style_text(
            &format!("Day {}: {} ({})", day.day, day.title, day.date),
            ui::StyleType::TotalLabel
        ),
        table
    )
}

fn render_countdown(trip: &Trip, now: NaiveDateTime) -> Option<String> {
    let start = trip.start_date()?.and_hms_opt(0, 0, 0)?;
    let countdown = Countdown::until(start, now);
    (!countdown.is_over()).then(|| {
        ui::style_text(&format!("Starts in {countdown}"), ui::StyleType::Subtle)
    })
}

/// Renders every trip after filtering. Trips with nothing left are omitted.
/// Trips that have not started yet get a countdown line.
pub fn render_timeline(trips: &[Trip], filter: &ItineraryFilter, now: NaiveDateTime) -> String {
    let mut sections = Vec::new();
    let mut activities = 0;
    let mut days = 0;

    for trip in trips {
        let filtered = filter.apply(&trip.days);
        if filtered.is_empty() {
            continue;
        }
        activities += activity_count(&filtered);
        days += filtered.len();

        let rendered: Vec<String> = filtered.iter().map(render_day).collect();
        let mut heading = ui::style_text(&trip.name, ui::StyleType::Title);
        if let Some(countdown) = render_countdown(trip, now) {
            heading.push('\n');
            heading.push_str(&countdown);
        }
        sections.push(format!("{}\n\n{}", heading, rendered.join("\n\n")));
    }

    if sections.is_empty() {
        return "No activities match the current filters.".to_string();
    }

    let mut output = sections.join("\n\n");
    if filter.is_active() {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("Showing {activities} activities across {days} days"),
                ui::StyleType::Subtle
            )
        ));
    }
    output
}

pub fn run(trips: &[Trip], filter: &ItineraryFilter) -> Result<()> {
    debug!("Rendering timeline with filter {:?}", filter);
    println!(
        "{}",
        render_timeline(trips, filter, Local::now().naive_local())
    );
    Ok(())
}
