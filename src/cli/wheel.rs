use super::ui;
use crate::core::clock::spawn_ticker;
use crate::core::config::AppConfig;
use crate::core::schedule::{
    self, MINUTES_PER_DAY, NightRest, ScheduleWheel, Segment, current_marker_angle,
};
use crate::core::theme::{Theme, ThemeStore};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDate, Timelike};
use comfy_table::Cell;
use std::f64::consts::FRAC_PI_2;
use std::time::Duration;
use tracing::{debug, info};

/// Angle in degrees clockwise from 12 o'clock, the way the wheel is read.
fn clock_degrees(radians: f64) -> f64 {
    (radians + FRAC_PI_2).to_degrees()
}

fn segment_row(segment: &Segment, active: bool, theme: Theme) -> Vec<Cell> {
    let (emoji, description) = segment.kind.display_info();
    let (start, end) = segment.arc();
    let marker = if active { "▶" } else { "" };
    vec![
        Cell::new(marker),
        Cell::new(format!("{emoji} {}", segment.kind))
            .fg(ui::palette_color(theme, segment.kind.palette_role())),
        Cell::new(description),
        Cell::new(schedule::format_minutes(segment.start_minutes)),
        Cell::new(schedule::format_minutes(segment.end_minutes)),
        ui::number_cell(format!(
            "{:.1}° → {:.1}°",
            clock_degrees(start),
            clock_degrees(end)
        )),
        ui::number_cell(format!(
            "{}h {:02}m",
            segment.duration_minutes() / 60,
            segment.duration_minutes() % 60
        )),
    ]
}

/// One-line description of where "now" sits on the wheel.
pub fn render_marker(wheel: &ScheduleWheel, now: &DateTime<Local>) -> String {
    let minutes = now.hour() * 60 + now.minute();
    let angle = clock_degrees(current_marker_angle(now));
    let period = wheel
        .active_at(minutes)
        .map_or("-".to_string(), |s| s.kind.to_string());
    format!(
        "Now {} at {:.1}° ({})",
        schedule::format_minutes(minutes),
        angle,
        period
    )
}

pub fn render_wheel(wheel: &ScheduleWheel, now: &DateTime<Local>, theme: Theme) -> String {
    let active = wheel
        .active_at(now.hour() * 60 + now.minute())
        .map(|s| s.kind);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Period"),
        ui::header_cell(""),
        ui::header_cell("Start"),
        ui::header_cell("End"),
        ui::header_cell("Arc"),
        ui::header_cell("Length"),
    ]);
    for segment in &wheel.segments {
        table.add_row(segment_row(segment, active == Some(segment.kind), theme));
    }

    let cycle_end = wheel
        .segments
        .last()
        .map_or(0, |s| s.end_minutes.saturating_sub(MINUTES_PER_DAY));
    let (icon, label) = theme.display_info();
    format!(
        "Time Wheel: {} ({}) {icon} {label}\n\n{}\n\nNight rest until next Fajr at {}\n{}",
        ui::style_text(&wheel.city, ui::StyleType::Title),
        wheel.date,
        table,
        schedule::format_minutes(cycle_end),
        ui::style_text(&render_marker(wheel, now), ui::StyleType::TotalLabel)
    )
}

fn select_date(config_dates: &[NaiveDate], requested: Option<NaiveDate>) -> Option<NaiveDate> {
    match requested {
        Some(date) => Some(date),
        None => {
            let today = Local::now().date_naive();
            if config_dates.contains(&today) {
                Some(today)
            } else {
                config_dates.first().copied()
            }
        }
    }
}

pub fn build_wheel(
    config: &AppConfig,
    city: Option<&str>,
    date: Option<NaiveDate>,
    night_rest: NightRest,
) -> Result<ScheduleWheel> {
    let city_times = match city {
        Some(name) => config
            .city(name)
            .with_context(|| format!("No prayer times configured for {name}"))?,
        None => config
            .prayer_times
            .first()
            .context("No prayer times configured")?,
    };

    let dates: Vec<NaiveDate> = city_times.schedule.iter().map(|s| s.date).collect();
    let date = select_date(&dates, date)
        .with_context(|| format!("No schedule dates for {}", city_times.city))?;
    debug!("Building wheel for {} on {}", city_times.city, date);

    ScheduleWheel::build(city_times, date, night_rest)
        .ok_or_else(|| anyhow!("No schedule for {} on {}", city_times.city, date))
}

pub async fn run(
    config: &AppConfig,
    city: Option<&str>,
    date: Option<NaiveDate>,
    night_rest: NightRest,
    live: Option<Duration>,
) -> Result<()> {
    let wheel = build_wheel(config, city, date, night_rest)?;
    let theme = ThemeStore::open(config.theme_path()?).current();
    println!("{}", render_wheel(&wheel, &Local::now(), theme));

    let Some(period) = live else {
        return Ok(());
    };

    info!("Refreshing marker every {:?}, press Ctrl-C to stop", period);
    let mut ticker = spawn_ticker(period);
    // The ticker fires immediately; that instant was already printed above
    ticker.ticks.recv().await;
    loop {
        tokio::select! {
            tick = ticker.ticks.recv() => match tick {
                Some(now) => println!("{}", render_marker(&wheel, &now)),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                debug!("Ctrl-C received, stopping marker refresh");
                ticker.stop();
                break;
            }
        }
    }
    Ok(())
}
