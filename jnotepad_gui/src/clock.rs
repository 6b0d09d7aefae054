use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};

/// 時鐘格式。 / Status bar clock format.
pub const CLOCK_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// 時鐘更新間隔。 / How often the clock asks for a repaint.
pub const CLOCK_REFRESH: Duration = Duration::from_secs(1);

/// 狀態列時鐘。 / Wall clock shown at the right edge of the status bar.
#[derive(Debug, Default)]
pub struct Clock {
    last: String,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得目前時間字串。 / Current local time, formatted.
    pub fn tick(&mut self) -> &str {
        self.last = format_time(&Local::now());
        &self.last
    }
}

pub fn format_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format(CLOCK_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn formats_with_zero_padding() {
        let time = Utc
            .with_ymd_and_hms(2024, 3, 7, 9, 5, 2)
            .single()
            .expect("valid timestamp");
        assert_eq!(format_time(&time), "2024/03/07 09:05:02");
    }

    #[test]
    fn tick_produces_formatted_text() {
        let mut clock = Clock::new();
        let text = clock.tick();
        assert_eq!(text.len(), "yyyy/MM/dd HH:mm:ss".len());
        assert_eq!(&text[4..5], "/");
    }
}
