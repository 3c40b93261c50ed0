//! OFX date/time formatting.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse an IANA zone name like "GMT" or "America/New_York".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Midnight of `date` in `tz`, formatted as `YYYYMMDDHHMMSS.XXX[gmt offset:tz name]`.
pub fn ofx_datetime(date: NaiveDate, tz: Tz) -> Result<String> {
    let ndt = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid midnight for {date}"))?;

    // Zones that skip midnight on a DST change fall back to the earliest valid instant.
    let local = tz
        .from_local_datetime(&ndt)
        .earliest()
        .ok_or_else(|| anyhow::anyhow!("no local midnight on {date} in {tz}"))?;

    let offset_secs = local.offset().fix().local_minus_utc();
    Ok(format!(
        "{}[{}:{}]",
        local.format("%Y%m%d%H%M%S%.3f"),
        format_offset(offset_secs),
        local.offset()
    ))
}

/// Server timestamp in UTC.
pub fn ofx_timestamp_utc(dt: DateTime<Utc>) -> String {
    format!("{}[0:UTC]", dt.format("%Y%m%d%H%M%S%.3f"))
}

fn format_offset(secs: i32) -> String {
    if secs % 3600 == 0 {
        return format!("{}", secs / 3600);
    }
    // e.g. +5:30 is written as 5.50
    let hours = secs as f64 / 3600.0;
    format!("{hours:.2}")
}
