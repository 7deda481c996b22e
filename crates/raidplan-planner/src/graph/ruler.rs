use serde::Serialize;

use crate::graph::parse::MAX_EVENT_TIME;
use crate::util::time::{axis_end, tick_label};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub second: u64,
    pub left: f64,
    pub major: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One tick per second up to and including the axis end; every tenth
/// second is major and labelled. Times are capped at
/// [`MAX_EVENT_TIME`].
pub fn ruler(max_time: f64, h_scale: f64, x_offset: f64) -> Vec<Tick> {
    let end = axis_end(max_time.clamp(0.0, MAX_EVENT_TIME)).floor() as u64;
    (0..=end)
        .map(|second| {
            let major = second % 10 == 0;
            Tick {
                second,
                left: x_offset + second as f64 * h_scale,
                major,
                label: major.then(|| tick_label(second)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_run_to_next_ten() {
        let ticks = ruler(13.0, 38.0, 29.0);
        assert_eq!(ticks.len(), 21);
        assert_eq!(ticks.last().map(|t| t.second), Some(20));
        assert_eq!(ticks[1].left, 29.0 + 38.0);
    }

    #[test]
    fn majors_carry_labels() {
        let ticks = ruler(65.0, 10.0, 0.0);
        let labels: Vec<&str> = ticks.iter().filter_map(|t| t.label.as_deref()).collect();
        assert_eq!(labels, vec!["0s", "10s", "20s", "30s", "40s", "50s", "1m0s", "1m10s"]);
        assert!(ticks.iter().filter(|t| !t.major).all(|t| t.label.is_none()));
    }

    #[test]
    fn huge_times_are_capped() {
        let ticks = ruler(1e300, 1.0, 0.0);
        assert_eq!(ticks.last().map(|t| t.second), Some(86_410));
    }
}
