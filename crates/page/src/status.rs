use chrono::{NaiveTime, Timelike};
use voltbill_dom::Document;

pub const BATTERY_OK: &str = "#34c759";
pub const BATTERY_LOW: &str = "#ff3b30";

const LOW_BATTERY_THRESHOLD: u8 = 20;

/// 更新狀態列時間。 / Writes `HH:MM` into `.status-time`.
pub fn update_clock(doc: &mut Document, time: NaiveTime) -> bool {
    let Some(node) = doc.first_by_class("status-time") else {
        return false;
    };
    let text = format!("{:02}:{:02}", time.hour(), time.minute());
    doc.set_text_content(node, &text);
    true
}

/// Shows `level` in `.battery-level` and sizes `.battery-fill`; both must exist.
pub fn update_battery(doc: &mut Document, level: u8) -> bool {
    let (Some(label), Some(fill)) = (
        doc.first_by_class("battery-level"),
        doc.first_by_class("battery-fill"),
    ) else {
        return false;
    };
    let percent = format!("{level}%");
    let color = if level > LOW_BATTERY_THRESHOLD {
        BATTERY_OK
    } else {
        BATTERY_LOW
    };
    doc.set_text_content(label, &percent);
    doc.set_style(label, "color", color);
    doc.set_style(fill, "width", &percent);
    doc.set_style(fill, "background-color", color);
    true
}

/// 模擬電量，介於 90 與 100 之間。 / Simulated battery level in `90..=100`.
pub fn simulated_battery_level(rng: &mut fastrand::Rng) -> u8 {
    rng.u8(90..=100)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = r#"<div class="status-bar"><span class="status-time">9:41</span>
<span class="battery-level">100%</span><div class="battery"><div class="battery-fill"></div></div></div>"#;

    #[test]
    fn clock_is_zero_padded() {
        let mut doc = Document::parse(STATUS).unwrap();
        assert!(update_clock(&mut doc, NaiveTime::from_hms_opt(7, 5, 59).unwrap()));
        let node = doc.first_by_class("status-time").unwrap();
        assert_eq!(doc.text_content(node), "07:05");
    }

    #[test]
    fn battery_colour_depends_on_level() {
        let mut doc = Document::parse(STATUS).unwrap();
        update_battery(&mut doc, 95);
        let label = doc.first_by_class("battery-level").unwrap();
        let fill = doc.first_by_class("battery-fill").unwrap();
        assert_eq!(doc.text_content(label), "95%");
        assert_eq!(doc.style(fill, "width"), Some("95%"));
        assert_eq!(doc.style(label, "color"), Some(BATTERY_OK));

        update_battery(&mut doc, 20);
        assert_eq!(doc.style(fill, "background-color"), Some(BATTERY_LOW));
    }

    #[test]
    fn battery_needs_both_nodes() {
        let mut doc = Document::parse(r#"<span class="battery-level">1%</span>"#).unwrap();
        assert!(!update_battery(&mut doc, 93));
    }

    #[test]
    fn simulated_level_stays_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let level = simulated_battery_level(&mut rng);
            assert!((90..=100).contains(&level));
        }
    }
}
