//! Optional codecs, built on the public codec contract.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::codec::{ValDecoder, ValEncoder, downcast_mut, downcast_ref};
use crate::error::{JsonErrorKind, Result};
use crate::{Reader, Writer, registry};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Encodes [`SystemTime`] as an integer count of `precision` units since the
/// Unix epoch, e.g. milliseconds with `Duration::from_millis(1)`.
///
/// Encoding truncates toward the epoch. A zero precision counts nanoseconds.
#[derive(Debug, Clone, Copy)]
pub struct TimeAsInt64Codec {
    unit_nanos: i128,
}

impl TimeAsInt64Codec {
    /// A codec counting in units of `precision`.
    pub fn new(precision: Duration) -> Self {
        let unit_nanos = i128::try_from(precision.as_nanos().max(1)).unwrap_or(i128::MAX);
        TimeAsInt64Codec { unit_nanos }
    }
}

fn unix_nanos(time: SystemTime) -> i128 {
    let (magnitude, negative) = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => (after, false),
        Err(err) => (err.duration(), true),
    };
    let nanos = i128::try_from(magnitude.as_nanos()).unwrap_or(i128::MAX);
    if negative { -nanos } else { nanos }
}

fn from_unix_nanos(nanos: i128) -> Option<SystemTime> {
    let abs = nanos.unsigned_abs();
    let magnitude = Duration::new(
        u64::try_from(abs / NANOS_PER_SEC).ok()?,
        u32::try_from(abs % NANOS_PER_SEC).ok()?,
    );
    if nanos >= 0 {
        UNIX_EPOCH.checked_add(magnitude)
    } else {
        UNIX_EPOCH.checked_sub(magnitude)
    }
}

impl ValDecoder for TimeAsInt64Codec {
    fn decode(&self, target: &mut dyn Any, reader: &mut Reader<'_>) -> Result<()> {
        if reader.read_null()? {
            return Ok(());
        }
        let ticks = reader.read_i64()?;
        let time = i128::from(ticks)
            .checked_mul(self.unit_nanos)
            .and_then(from_unix_nanos);
        let Some(time) = time else {
            return Err(reader.report(JsonErrorKind::NumberOutOfRange {
                value: ticks.to_string(),
                target_type: "SystemTime",
            }));
        };
        *downcast_mut::<SystemTime>(target)? = time;
        Ok(())
    }
}

impl ValEncoder for TimeAsInt64Codec {
    fn encode(&self, value: &dyn Any, writer: &mut Writer<'_>) -> Result<()> {
        let time = *downcast_ref::<SystemTime>(value)?;
        match i64::try_from(unix_nanos(time) / self.unit_nanos) {
            Ok(ticks) => {
                writer.write_i64(ticks);
                Ok(())
            }
            Err(_) => Err(writer.report(JsonErrorKind::UnsupportedValue(
                "time too far from the epoch for this precision",
            ))),
        }
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        value.downcast_ref::<SystemTime>() == Some(&UNIX_EPOCH)
    }
}

/// Encode and decode every [`SystemTime`] through [`TimeAsInt64Codec`] with
/// `precision`, in the global [`registry`](crate::registry()).
pub fn register_time_as_int64_codec(precision: Duration) {
    let codec = Arc::new(TimeAsInt64Codec::new(precision));
    registry().register_type_decoder::<SystemTime>(codec.clone());
    registry().register_type_encoder::<SystemTime>(codec);
}
