use time::{
    format_description::FormatItem, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

/// Stored timestamp layout. The first ten characters are the calendar date,
/// which is what day-scoped queries compare against.
pub const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Wall clock pinned to the user's local offset.
#[derive(Debug, Clone, Copy)]
pub struct LocalClock {
    offset: UtcOffset,
}

impl LocalClock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_utc().to_offset(self.offset);
        PrimitiveDateTime::new(now.date(), now.time())
    }

    pub fn today(&self) -> Date {
        self.now().date()
    }
}

pub fn format_timestamp(at: PrimitiveDateTime) -> String {
    // The layout only has numeric components, formatting cannot fail.
    at.format(TIMESTAMP_FORMAT).unwrap_or_default()
}

pub fn format_date(day: Date) -> String {
    day.format(DATE_FORMAT).unwrap_or_default()
}

pub fn parse_timestamp(raw: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(raw, TIMESTAMP_FORMAT)
}
