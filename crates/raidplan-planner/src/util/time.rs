/// `min(max(lo, n), hi)`. Unlike `f64::clamp` this never panics when the
/// range is inverted; `hi` wins.
pub fn clamp(lo: f64, n: f64, hi: f64) -> f64 {
    n.max(lo).min(hi)
}

/// End of the time axis: the next multiple of ten strictly past `max_time`.
pub fn axis_end(max_time: f64) -> f64 {
    max_time + (10.0 - max_time.rem_euclid(10.0))
}

/// `65` -> `"1m5s"`.
pub fn seconds_and_minutes(seconds: u64) -> String {
    format!("{}m{}s", (seconds / 60) % 60, seconds % 60)
}

pub fn tick_label(seconds: u64) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else {
        seconds_and_minutes(seconds)
    }
}
