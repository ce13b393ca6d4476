use chrono::{DateTime, Duration as TimeDelta, FixedOffset, NaiveDate, Offset, TimeZone, Timelike};
use std::fmt;
use std::time::Duration;

use crate::error::{Error, ParameterError, Result};

const MAX_RANGE_DAYS: i64 = 30;
const SETTLEMENT_PERIODS_PER_DAY: u32 = 48;
const MAX_BLOCK_HOURS: u64 = 24;

/// One of the API resources, holding already-validated parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resource {
    Current,
    At(DateTime<FixedOffset>),
    Date(NaiveDate),
    SettlementPeriod(NaiveDate, u32),
    Today,
    Between(DateTime<FixedOffset>, DateTime<FixedOffset>),
    Forward24h(DateTime<FixedOffset>),
    Forward48h(DateTime<FixedOffset>),
    Past24h(DateTime<FixedOffset>),
    Factors,
    Statistics(DateTime<FixedOffset>, DateTime<FixedOffset>),
    StatisticsBlocks(DateTime<FixedOffset>, DateTime<FixedOffset>, u64),
}

impl Resource {
    pub(crate) fn settlement_period(date: NaiveDate, period: u32) -> Result<Self> {
        if !(1..=SETTLEMENT_PERIODS_PER_DAY).contains(&period) {
            return Err(ParameterError::SettlementPeriod(period).into());
        }
        Ok(Resource::SettlementPeriod(date, period))
    }

    pub(crate) fn between(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> Result<Self> {
        let (from, to) = (to_minute(from), to_minute(to));
        validate_range(&from, &to)?;
        Ok(Resource::Between(from, to))
    }

    pub(crate) fn statistics(
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
    ) -> Result<Self> {
        let (from, to) = (to_minute(from), to_minute(to));
        validate_range(&from, &to)?;
        Ok(Resource::Statistics(from, to))
    }

    pub(crate) fn statistics_blocks(
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
        block: Duration,
    ) -> Result<Self> {
        let (from, to) = (to_minute(from), to_minute(to));
        validate_range(&from, &to)?;
        let hours = block_hours(block)?;
        Ok(Resource::StatisticsBlocks(from, to, hours))
    }

    /// Path of this resource relative to the API base address.
    pub(crate) fn path(&self) -> String {
        match self {
            Resource::Current => "/intensity".to_string(),
            Resource::At(t) => format!("/intensity/{}", format_timestamp(t)),
            Resource::Date(d) => format!("/intensity/date/{}", format_date(d)),
            Resource::SettlementPeriod(d, p) => {
                format!("/intensity/date/{}/{}", format_date(d), p)
            }
            Resource::Today => "/intensity/date".to_string(),
            Resource::Between(from, to) => format!(
                "/intensity/{}/{}",
                format_timestamp(from),
                format_timestamp(to)
            ),
            Resource::Forward24h(from) => format!("/intensity/{}/fw24h", format_timestamp(from)),
            Resource::Forward48h(from) => format!("/intensity/{}/fw48h", format_timestamp(from)),
            Resource::Past24h(from) => format!("/intensity/{}/pt24h", format_timestamp(from)),
            Resource::Factors => "/intensity/factors".to_string(),
            Resource::Statistics(from, to) => format!(
                "/intensity/stats/{}/{}",
                format_timestamp(from),
                format_timestamp(to)
            ),
            Resource::StatisticsBlocks(from, to, hours) => format!(
                "/intensity/stats/{}/{}/{}",
                format_timestamp(from),
                format_timestamp(to),
                hours
            ),
        }
    }
}

/// Checks that `from..to` is non-empty and spans at most 30 days.
pub(crate) fn validate_range<Tz: TimeZone>(from: &DateTime<Tz>, to: &DateTime<Tz>) -> Result<()>
where
    Tz::Offset: fmt::Display,
{
    if from >= to {
        return Err(Error::InvalidRange {
            from: from.to_rfc3339(),
            to: to.to_rfc3339(),
        });
    }
    if to.clone().signed_duration_since(from.clone()) > TimeDelta::days(MAX_RANGE_DAYS) {
        return Err(Error::RangeTooLarge {
            from: from.to_rfc3339(),
            to: to.to_rfc3339(),
        });
    }
    Ok(())
}

/// Drops seconds and sub-seconds, matching the precision sent in the URL.
fn to_minute(t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    t - TimeDelta::seconds(i64::from(t.second())) - TimeDelta::nanoseconds(i64::from(t.nanosecond()))
}

/// Truncates `block` to whole hours, which must lie in `1..=24`.
pub(crate) fn block_hours(block: Duration) -> Result<u64> {
    let hours = block.as_secs() / 3600;
    if !(1..=MAX_BLOCK_HOURS).contains(&hours) {
        return Err(ParameterError::BlockSize(block).into());
    }
    Ok(hours)
}

/// Formats `t` with minute precision: `2018-01-20T12:00Z` for UTC,
/// `2018-06-20T12:00+01:00` for any other offset.
pub(crate) fn format_timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    if t.offset().fix().local_minus_utc() == 0 {
        t.format("%Y-%m-%dT%H:%MZ").to_string()
    } else {
        t.format("%Y-%m-%dT%H:%M%:z").to_string()
    }
}

fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
