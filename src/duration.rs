use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DURATION: Regex = Regex::new(r"^PT(?:(\d+)M)?(?:(\d+)S)?").unwrap();
}

/// Decodes a `PT<N>M<N>S` duration into minutes, rounded to two decimals.
///
/// Both segments are optional. Text that does not start with `PT` decodes
/// to zero instead of failing. Segments are read as floats, so digit runs
/// too long for an integer still count.
pub fn parse(text: &str) -> f64 {
    let caps = match DURATION.captures(text) {
        Some(caps) => caps,
        None => return 0.0,
    };
    let segment = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    let total = segment(1) + segment(2) / 60.0;
    (total * 100.0).round() / 100.0
}

/// Renders minutes as `"2h 10m"`, `"1h"` or `"59m"`.
///
/// The minutes past the hour are rounded half away from zero. When they
/// round up to 60 the hour is carried, so `119.7` renders as `"2h"` and
/// never as `"1h 60m"`.
pub fn format(minutes: f64) -> String {
    if minutes >= 60.0 {
        let mut hours = (minutes / 60.0).floor() as u64;
        let mut mins = (minutes % 60.0).round() as u64;
        if mins == 60 {
            hours += 1;
            mins = 0;
        }
        if mins > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}h", hours)
        }
    } else {
        format!("{}m", minutes.round() as u64)
    }
}
