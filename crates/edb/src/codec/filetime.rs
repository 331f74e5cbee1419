//! FILETIME-style timestamp codec: a 64-bit little-endian count of
//! 100-nanosecond ticks since 1601-01-01T00:00:00Z, used by the
//! `DateCreated`, `DateReceived` and `DateSent` columns.

use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, Utc};

use super::{CodecError, CodecResult};

/// Ticks between 1601-01-01 and the Unix epoch.
const UNIX_EPOCH_TICKS: u64 = 116_444_736_000_000_000;
const TICKS_PER_SECOND: i128 = 10_000_000;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TimestampValue {
    Valid(DateTime<Utc>),
    /// The all-zero sentinel: the column carries no value. Not an error.
    Absent,
}

/// Decodes exactly 8 bytes into a UTC instant with the 100ns fraction
/// preserved. No timezone adjustment is applied; display timezones are the
/// caller's concern.
pub fn decode_filetime(data: &[u8]) -> CodecResult<TimestampValue> {
    if data.len() != 8 {
        return Err(CodecError::InvalidLength(data.len()));
    }

    let ticks = LittleEndian::read_u64(data);
    if ticks == 0 {
        return Ok(TimestampValue::Absent);
    }

    let relative = i128::from(ticks) - i128::from(UNIX_EPOCH_TICKS);
    let seconds = i64::try_from(relative.div_euclid(TICKS_PER_SECOND))
        .map_err(|_| CodecError::TimestampOutOfRange(ticks))?;
    let nanos = (relative.rem_euclid(TICKS_PER_SECOND) * 100) as u32;

    DateTime::<Utc>::from_timestamp(seconds, nanos)
        .map(TimestampValue::Valid)
        .ok_or(CodecError::TimestampOutOfRange(ticks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_ticks(ticks: u64) -> TimestampValue {
        decode_filetime(&ticks.to_le_bytes()).unwrap()
    }

    #[test]
    fn test_zero_is_absent() {
        assert_eq!(decode_ticks(0), TimestampValue::Absent);
    }

    #[test]
    fn test_unix_epoch() {
        let TimestampValue::Valid(instant) = decode_ticks(UNIX_EPOCH_TICKS) else {
            panic!("epoch ticks should decode");
        };
        assert_eq!(instant.to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_known_instant() {
        // 2020-01-01T00:00:00Z
        let TimestampValue::Valid(instant) = decode_ticks(132_223_104_000_000_000) else {
            panic!("ticks should decode");
        };
        assert_eq!(instant.timestamp(), 1_577_836_800);
        assert_eq!(instant.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_fraction_preserved() {
        // One tick past the epoch is exactly 100ns, not rounded away.
        let TimestampValue::Valid(instant) = decode_ticks(UNIX_EPOCH_TICKS + 1) else {
            panic!("ticks should decode");
        };
        assert_eq!(instant.timestamp(), 0);
        assert_eq!(instant.timestamp_subsec_nanos(), 100);
    }

    #[test]
    fn test_pre_unix_instant() {
        let TimestampValue::Valid(instant) = decode_ticks(UNIX_EPOCH_TICKS - 10_000_000) else {
            panic!("ticks should decode");
        };
        assert_eq!(instant.to_rfc3339(), "1969-12-31T23:59:59+00:00");
    }

    #[test]
    fn test_wrong_width_is_rejected() {
        let Err(CodecError::InvalidLength(len)) = decode_filetime(&[0; 7]) else {
            panic!("7 bytes should violate the contract");
        };
        assert_eq!(len, 7);
    }
}
