//! Prayer-time wheel: partitions a 24-hour cycle into prayer periods and maps
//! times of day onto the circle.
use chrono::{Days, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, warn};

pub const MINUTES_PER_DAY: u32 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    Shab,
}

/// The five prayers in declaration order.
pub const PRAYERS: [SegmentKind; 5] = [
    SegmentKind::Fajr,
    SegmentKind::Dhuhr,
    SegmentKind::Asr,
    SegmentKind::Maghrib,
    SegmentKind::Isha,
];

/// Palette slot a segment is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteRole {
    Background,
    Text,
    Primary,
    Secondary,
    Accent,
}

impl SegmentKind {
    /// Returns the emoji and description for the segment
    pub fn display_info(&self) -> (&'static str, &'static str) {
        match self {
            SegmentKind::Fajr => ("🌅", "Sunrise"),
            SegmentKind::Dhuhr => ("☀️", "Midday Sun"),
            SegmentKind::Asr => ("🌤️", "Day Clouds"),
            SegmentKind::Maghrib => ("🌇", "Sunset"),
            SegmentKind::Isha => ("🌙", "Night Clear"),
            SegmentKind::Shab => ("✨", "Night Rest"),
        }
    }

    pub fn palette_role(&self) -> PaletteRole {
        match self {
            SegmentKind::Fajr | SegmentKind::Maghrib => PaletteRole::Accent,
            SegmentKind::Dhuhr => PaletteRole::Primary,
            SegmentKind::Asr => PaletteRole::Secondary,
            SegmentKind::Isha => PaletteRole::Text,
            SegmentKind::Shab => PaletteRole::Background,
        }
    }
}

impl Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SegmentKind::Fajr => "Fajr",
                SegmentKind::Dhuhr => "Dhuhr",
                SegmentKind::Asr => "Asr",
                SegmentKind::Maghrib => "Maghrib",
                SegmentKind::Isha => "Isha",
                SegmentKind::Shab => "Shab",
            }
        )
    }
}

/// One day's prayer times, each as an "H:MM AM/PM" string.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PrayerSchedule {
    pub date: NaiveDate,
    pub day: String,
    #[serde(rename = "Fajr")]
    pub fajr: String,
    #[serde(rename = "Dhuhr")]
    pub dhuhr: String,
    #[serde(rename = "Asr")]
    pub asr: String,
    #[serde(rename = "Maghrib")]
    pub maghrib: String,
    #[serde(rename = "Isha")]
    pub isha: String,
}

impl PrayerSchedule {
    /// Raw time string for one of the five prayers. `Shab` has no time of its own.
    pub fn time_of(&self, kind: SegmentKind) -> Option<&str> {
        match kind {
            SegmentKind::Fajr => Some(&self.fajr),
            SegmentKind::Dhuhr => Some(&self.dhuhr),
            SegmentKind::Asr => Some(&self.asr),
            SegmentKind::Maghrib => Some(&self.maghrib),
            SegmentKind::Isha => Some(&self.isha),
            SegmentKind::Shab => None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CityPrayerTimes {
    pub city: String,
    pub schedule: Vec<PrayerSchedule>,
}

impl CityPrayerTimes {
    pub fn find_day(&self, date: NaiveDate) -> Option<&PrayerSchedule> {
        self.schedule.iter().find(|s| s.date == date)
    }

    /// Schedule for the calendar day after `date`, if the city has one.
    pub fn next_day(&self, date: NaiveDate) -> Option<&PrayerSchedule> {
        let next = date.checked_add_days(Days::new(1))?;
        self.find_day(next)
    }
}

/// Where the night-rest arc begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightRest {
    /// Isha runs until the next Fajr; the night-rest arc has no width.
    #[default]
    NextFajr,
    /// Isha ends halfway between Maghrib and the next Fajr.
    Midpoint,
}

impl FromStr for NightRest {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "next_fajr" => Ok(NightRest::NextFajr),
            "midpoint" => Ok(NightRest::Midpoint),
            _ => Err(anyhow::anyhow!("Invalid night rest policy: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub label: String,
}

impl Segment {
    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes.saturating_sub(self.start_minutes)
    }

    /// Start and end angle of the arc. The end is pushed a full turn forward
    /// when it would otherwise land before the start.
    pub fn arc(&self) -> (f64, f64) {
        let start = minutes_to_angle(self.start_minutes);
        let mut end = minutes_to_angle(self.end_minutes);
        if end < start {
            end += TAU;
        }
        (start, end)
    }

    fn contains(&self, minutes: u32) -> bool {
        (self.start_minutes..self.end_minutes).contains(&minutes)
    }
}

/// A built wheel for one city and date.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleWheel {
    pub city: String,
    pub date: NaiveDate,
    pub segments: Vec<Segment>,
}

impl ScheduleWheel {
    pub fn build(
        city: &CityPrayerTimes,
        date: NaiveDate,
        night_rest: NightRest,
    ) -> Option<ScheduleWheel> {
        let schedule = city.find_day(date)?;
        let next_day = city.next_day(date);
        if next_day.is_none() {
            debug!(
                "No schedule for the day after {} in {}, using same-day Fajr",
                date, city.city
            );
        }
        Some(ScheduleWheel {
            city: city.city.clone(),
            date,
            segments: build_segments(schedule, next_day, night_rest),
        })
    }

    /// Segment covering a time of day. Times before the first Fajr are looked
    /// up on the wrapped (next day) side of the cycle.
    pub fn active_at(&self, minutes_of_day: u32) -> Option<&Segment> {
        let minutes = minutes_of_day % MINUTES_PER_DAY;
        self.segments
            .iter()
            .find(|s| s.contains(minutes))
            .or_else(|| {
                self.segments
                    .iter()
                    .find(|s| s.contains(minutes + MINUTES_PER_DAY))
            })
    }
}

fn try_parse_time_of_day(text: &str) -> Option<u32> {
    let mut parts = text.split_whitespace();
    let clock = parts.next()?;
    let meridiem = parts.next().map(|m| m.to_uppercase());
    if parts.next().is_some() {
        return None;
    }

    let (hour, minute) = clock.split_once(':')?;
    let mut hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if minute > 59 {
        return None;
    }

    match meridiem.as_deref() {
        Some("AM") | Some("PM") if !(1..=12).contains(&hour) => return None,
        Some("PM") if hour < 12 => hour += 12,
        Some("AM") if hour == 12 => hour = 0,
        Some("AM") | Some("PM") => {}
        Some(_) => return None,
        None if hour > 23 => return None,
        None => {}
    }

    Some(hour * 60 + minute)
}

/// Parses "H:MM AM/PM" into minutes from midnight. Malformed input is read
/// as midnight so one bad record cannot block the whole wheel.
pub fn parse_time_of_day(text: &str) -> u32 {
    try_parse_time_of_day(text).unwrap_or_else(|| {
        warn!("Malformed time of day {:?}, treating as midnight", text);
        0
    })
}

/// Maps minutes from midnight onto the circle, with midnight at 12 o'clock.
pub fn minutes_to_angle(minutes: u32) -> f64 {
    (f64::from(minutes) / f64::from(MINUTES_PER_DAY)) * TAU - FRAC_PI_2
}

/// Angle of the "now" marker. Only the wall-clock time is used, never the date.
pub fn current_marker_angle<T: Timelike>(now: &T) -> f64 {
    minutes_to_angle(now.hour() * 60 + now.minute())
}

/// Formats minutes from midnight as "H:MM AM/PM", wrapping past midnight.
pub fn format_minutes(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    let (hour, minute) = (minutes / 60, minutes % 60);
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour}:{minute:02} {meridiem}")
}

/// Splits one prayer day into five prayer periods plus the night rest,
/// sorted by start minute and ending at the next day's Fajr.
pub fn build_segments(
    schedule: &PrayerSchedule,
    next_day: Option<&PrayerSchedule>,
    night_rest: NightRest,
) -> Vec<Segment> {
    let times: Vec<(SegmentKind, &str, u32)> = PRAYERS
        .iter()
        .filter_map(|kind| {
            schedule
                .time_of(*kind)
                .map(|time| (*kind, time, parse_time_of_day(time)))
        })
        .collect();

    let next_fajr = parse_time_of_day(&next_day.unwrap_or(schedule).fajr) + MINUTES_PER_DAY;
    let maghrib = parse_time_of_day(&schedule.maghrib);
    let isha = parse_time_of_day(&schedule.isha);
    // Isha never ends before it starts, even when it falls past the midpoint
    let night_start = match night_rest {
        NightRest::NextFajr => next_fajr,
        NightRest::Midpoint => (maghrib + next_fajr.saturating_sub(maghrib) / 2)
            .max(isha)
            .min(next_fajr),
    };

    let mut segments: Vec<Segment> = times
        .iter()
        .enumerate()
        .map(|(i, (kind, time, start))| Segment {
            kind: *kind,
            start_minutes: *start,
            end_minutes: times.get(i + 1).map_or(night_start, |next| next.2),
            label: time.to_string(),
        })
        .collect();

    segments.push(Segment {
        kind: SegmentKind::Shab,
        start_minutes: night_start,
        end_minutes: next_fajr,
        label: SegmentKind::Shab.display_info().1.to_string(),
    });

    segments.sort_by_key(|s| s.start_minutes);
    debug!(
        "Built {} segments for {} ending at {}",
        segments.len(),
        schedule.date,
        next_fajr
    );
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn schedule(date: &str, fajr: &str) -> PrayerSchedule {
        PrayerSchedule {
            date: date.parse().unwrap(),
            day: "Thursday".to_string(),
            fajr: fajr.to_string(),
            dhuhr: "11:27 AM".to_string(),
            asr: "2:12 PM".to_string(),
            maghrib: "4:30 PM".to_string(),
            isha: "5:54 PM".to_string(),
        }
    }

    fn assert_contiguous(segments: &[Segment], start: u32, end: u32) {
        assert_eq!(segments.first().unwrap().start_minutes, start);
        assert_eq!(segments.last().unwrap().end_minutes, end);
        for pair in segments.windows(2) {
            assert!(pair[0].start_minutes <= pair[1].start_minutes);
            assert_eq!(pair[0].end_minutes, pair[1].start_minutes);
        }
        for s in segments {
            assert!(s.start_minutes <= s.end_minutes);
        }
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("12:00 AM"), 0);
        assert_eq!(parse_time_of_day("12:00 PM"), 720);
        assert_eq!(parse_time_of_day("1:05 PM"), 785);
        assert_eq!(parse_time_of_day("4:50 AM"), 290);
        assert_eq!(parse_time_of_day("11:59 PM"), 1439);
        assert_eq!(parse_time_of_day("05:54 pm"), 1074);
        assert_eq!(parse_time_of_day("17:54"), 1074);
    }

    #[test]
    fn test_parse_time_of_day_malformed_is_midnight() {
        assert_eq!(parse_time_of_day(""), 0);
        assert_eq!(parse_time_of_day("noon"), 0);
        assert_eq!(parse_time_of_day("4:xx AM"), 0);
        assert_eq!(parse_time_of_day("4:75 AM"), 0);
        assert_eq!(parse_time_of_day("13:00 PM"), 0);
        assert_eq!(parse_time_of_day("4:50 XM"), 0);
    }

    #[test]
    fn test_parse_covers_whole_day() {
        let mut seen = std::collections::HashSet::new();
        for minutes in 0..MINUTES_PER_DAY {
            let text = format_minutes(minutes);
            let parsed = parse_time_of_day(&text);
            assert_eq!(parsed, minutes, "round trip failed for {text}");
            seen.insert(parsed);
        }
        assert_eq!(seen.len(), MINUTES_PER_DAY as usize);
    }

    #[test]
    fn test_minutes_to_angle() {
        assert_eq!(minutes_to_angle(0), -FRAC_PI_2);
        assert!((minutes_to_angle(720) - FRAC_PI_2).abs() < 1e-12);
        let wrapped = (minutes_to_angle(MINUTES_PER_DAY) - minutes_to_angle(0)).rem_euclid(TAU);
        assert!(wrapped < 1e-9 || (TAU - wrapped) < 1e-9);
    }

    #[test]
    fn test_build_segments_with_next_day() {
        let today = schedule("2025-11-20", "4:50 AM");
        let tomorrow = schedule("2025-11-21", "4:51 AM");
        let segments = build_segments(&today, Some(&tomorrow), NightRest::NextFajr);

        assert_eq!(segments.len(), 6);
        assert_contiguous(&segments, 290, 1731);
        let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Fajr,
                SegmentKind::Dhuhr,
                SegmentKind::Asr,
                SegmentKind::Maghrib,
                SegmentKind::Isha,
                SegmentKind::Shab,
            ]
        );
        assert_eq!(segments[4].end_minutes, 1731);
        assert_eq!(segments[5].duration_minutes(), 0);
        assert_eq!(segments[0].label, "4:50 AM");
        assert_eq!(segments[5].label, "Night Rest");
    }

    #[test]
    fn test_build_segments_falls_back_to_same_day_fajr() {
        let today = schedule("2025-11-20", "4:50 AM");
        let segments = build_segments(&today, None, NightRest::NextFajr);
        assert_eq!(segments.len(), 6);
        assert_contiguous(&segments, 290, 290 + MINUTES_PER_DAY);
    }

    #[test]
    fn test_build_segments_midpoint_night_rest() {
        let today = schedule("2025-11-20", "4:50 AM");
        let tomorrow = schedule("2025-11-21", "4:51 AM");
        let segments = build_segments(&today, Some(&tomorrow), NightRest::Midpoint);

        assert_eq!(segments.len(), 6);
        assert_contiguous(&segments, 290, 1731);
        // Maghrib 990, next Fajr 1731: midpoint 1360
        assert_eq!(segments[4].kind, SegmentKind::Isha);
        assert_eq!(segments[4].end_minutes, 1360);
        assert_eq!(segments[5].kind, SegmentKind::Shab);
        assert_eq!(segments[5].duration_minutes(), 371);
    }

    #[test]
    fn test_midpoint_never_cuts_into_late_isha() {
        let summer = PrayerSchedule {
            date: "2025-06-21".parse().unwrap(),
            day: "Saturday".to_string(),
            fajr: "1:00 AM".to_string(),
            dhuhr: "12:30 PM".to_string(),
            asr: "5:00 PM".to_string(),
            maghrib: "7:00 PM".to_string(),
            isha: "11:30 PM".to_string(),
        };
        let segments = build_segments(&summer, None, NightRest::Midpoint);

        assert_eq!(segments.len(), 6);
        assert_contiguous(&segments, 60, 60 + MINUTES_PER_DAY);
        // Midpoint 1320 falls before Isha at 1410, so the night starts with Isha
        assert_eq!(segments[4].kind, SegmentKind::Isha);
        assert_eq!(segments[4].start_minutes, 1410);
        assert_eq!(segments[4].duration_minutes(), 0);
        assert_eq!(segments[5].kind, SegmentKind::Shab);
        assert_eq!(segments[5].start_minutes, 1410);
        assert_eq!(segments[5].end_minutes, 1500);
    }

    #[test]
    fn test_build_segments_is_deterministic() {
        let today = schedule("2025-11-20", "4:50 AM");
        let tomorrow = schedule("2025-11-21", "4:51 AM");
        assert_eq!(
            build_segments(&today, Some(&tomorrow), NightRest::Midpoint),
            build_segments(&today, Some(&tomorrow), NightRest::Midpoint)
        );
    }

    #[test]
    fn test_segment_arc_never_runs_backwards() {
        let today = schedule("2025-11-20", "4:50 AM");
        for segment in build_segments(&today, None, NightRest::Midpoint) {
            let (start, end) = segment.arc();
            assert!(end >= start, "{} arc runs backwards", segment.kind);
        }
    }

    #[test]
    fn test_current_marker_angle_ignores_date() {
        let noon = NaiveTime::from_hms_opt(12, 0, 30).unwrap();
        assert!((current_marker_angle(&noon) - FRAC_PI_2).abs() < 1e-12);
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert_eq!(current_marker_angle(&midnight), -FRAC_PI_2);
    }

    #[test]
    fn test_wheel_lookup_and_active_segment() {
        let city = CityPrayerTimes {
            city: "Tokyo".to_string(),
            schedule: vec![
                schedule("2025-11-20", "4:50 AM"),
                schedule("2025-11-21", "4:51 AM"),
            ],
        };
        let date: NaiveDate = "2025-11-20".parse().unwrap();
        let wheel = ScheduleWheel::build(&city, date, NightRest::Midpoint).unwrap();
        assert_eq!(wheel.segments.last().unwrap().end_minutes, 1731);

        assert_eq!(wheel.active_at(600).unwrap().kind, SegmentKind::Fajr);
        assert_eq!(wheel.active_at(1100).unwrap().kind, SegmentKind::Isha);
        // 2:00 AM sits in the wrapped part of the night
        assert_eq!(wheel.active_at(120).unwrap().kind, SegmentKind::Shab);

        let missing: NaiveDate = "2025-12-01".parse().unwrap();
        assert!(ScheduleWheel::build(&city, missing, NightRest::NextFajr).is_none());
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "12:00 AM");
        assert_eq!(format_minutes(785), "1:05 PM");
        assert_eq!(format_minutes(1731), "4:51 AM");
    }

    #[test]
    fn test_prayer_schedule_deserialization() {
        let yaml = r#"
date: "2025-11-23"
day: Sunday
Fajr: "4:59 AM"
Dhuhr: "11:33 AM"
Asr: "2:16 PM"
Maghrib: "4:35 PM"
Isha: "5:59 PM"
"#;
        let s: PrayerSchedule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.date, NaiveDate::from_ymd_opt(2025, 11, 23).unwrap());
        assert_eq!(s.time_of(SegmentKind::Maghrib), Some("4:35 PM"));
        assert_eq!(s.time_of(SegmentKind::Shab), None);
    }
}
