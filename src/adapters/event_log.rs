//! Append-only activity log in NVS.
//!
//! Each line is a postcard-encoded record in its own slot of the
//! "activity" namespace; a separate counter key holds how many slots are
//! in use.  The log never wraps: once every slot is taken, appends fail
//! with [`StorageError::Full`] until the user clears it.
//!
//! ```text
//!   activity::count  = 3 (u32 LE)
//!   activity::e0     = "time: 00:00:00 - Power on"
//!   activity::e1     = "time: 00:00:12 - Light ON"
//!   activity::e2     = "time: 00:00:40 - Light OFF"
//! ```

use log::{info, warn};

use crate::app::ports::{EventLogPort, StoragePort};
use crate::error::StorageError;
use crate::notifier::{RECORD_BYTES, Record};

/// Upper bound on slots, whatever the configured capacity.
pub const MAX_RECORDS: usize = 256;

const LOG_NAMESPACE: &str = "activity";
const COUNT_KEY: &str = "count";

/// Postcard length prefix plus the record body.
const SLOT_BUF: usize = RECORD_BYTES + 4;

pub struct NvsEventLog<S: StoragePort> {
    storage: S,
    count: usize,
    capacity: usize,
}

impl<S: StoragePort> NvsEventLog<S> {
    /// Open the log, recovering the record count left by a previous boot.
    pub fn open(storage: S, capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_RECORDS);
        let mut buf = [0u8; 4];
        let count = match storage.read(LOG_NAMESPACE, COUNT_KEY, &mut buf) {
            Ok(4) => (u32::from_le_bytes(buf) as usize).min(capacity),
            Ok(_) => {
                warn!("Activity log: corrupt counter, starting empty");
                0
            }
            Err(_) => 0,
        };
        info!("Activity log: {} of {} records in use", count, capacity);
        Self {
            storage,
            count,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn slot_key(index: usize) -> heapless::String<16> {
        let mut s = heapless::String::new();
        let _ = core::fmt::Write::write_fmt(&mut s, format_args!("e{}", index));
        s
    }

    fn store_count(&mut self, count: usize) -> Result<(), StorageError> {
        let bytes = (count as u32).to_le_bytes();
        self.storage.write(LOG_NAMESPACE, COUNT_KEY, &bytes)
    }
}

impl<S: StoragePort> EventLogPort for NvsEventLog<S> {
    fn append(&mut self, event: &str) -> Result<(), StorageError> {
        if self.count >= self.capacity {
            return Err(StorageError::Full);
        }
        let mut record = Record::new();
        for c in event.chars() {
            if record.push(c).is_err() {
                break;
            }
        }
        let bytes = postcard::to_allocvec(&record).map_err(|_| StorageError::Corrupted)?;
        self.storage
            .write(LOG_NAMESPACE, &Self::slot_key(self.count), &bytes)?;
        self.store_count(self.count + 1)?;
        self.count += 1;
        Ok(())
    }

    fn read_all(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.count);
        for i in 0..self.count {
            let mut buf = [0u8; SLOT_BUF];
            match self.storage.read(LOG_NAMESPACE, &Self::slot_key(i), &mut buf) {
                Ok(len) => match postcard::from_bytes::<Record>(&buf[..len]) {
                    Ok(record) => out.push(record.as_str().to_owned()),
                    Err(_) => warn!("Activity log: slot {} unreadable", i),
                },
                Err(e) => warn!("Activity log: slot {} missing ({})", i, e),
            }
        }
        out
    }

    fn usage(&self) -> (usize, usize) {
        (self.count * RECORD_BYTES, self.capacity * RECORD_BYTES)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        for i in 0..self.count {
            self.storage.delete(LOG_NAMESPACE, &Self::slot_key(i))?;
        }
        self.storage.delete(LOG_NAMESPACE, COUNT_KEY)?;
        info!("Activity log: cleared {} records", self.count);
        self.count = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::nvs::NvsAdapter;

    fn fresh(capacity: usize) -> NvsEventLog<NvsAdapter> {
        NvsEventLog::open(NvsAdapter::new().unwrap(), capacity)
    }

    #[test]
    fn starts_empty() {
        let log = fresh(8);
        assert!(log.is_empty());
        assert!(log.read_all().is_empty());
        assert_eq!(log.usage(), (0, 8 * RECORD_BYTES));
    }

    #[test]
    fn appends_in_order() {
        let mut log = fresh(8);
        log.append("time: 00:00:00 - Power on").unwrap();
        log.append("time: 00:00:05 - Light ON").unwrap();
        assert_eq!(
            log.read_all(),
            ["time: 00:00:00 - Power on", "time: 00:00:05 - Light ON"]
        );
        assert_eq!(log.usage().0, 2 * RECORD_BYTES);
    }

    #[test]
    fn refuses_when_full() {
        let mut log = fresh(2);
        log.append("a").unwrap();
        log.append("b").unwrap();
        assert_eq!(log.append("c"), Err(StorageError::Full));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn clear_frees_every_slot() {
        let mut log = fresh(2);
        log.append("a").unwrap();
        log.append("b").unwrap();
        log.clear().unwrap();
        assert!(log.is_empty());
        let mut buf = [0u8; SLOT_BUF];
        for key in ["e0", COUNT_KEY] {
            assert_eq!(
                log.storage().read(LOG_NAMESPACE, key, &mut buf),
                Err(StorageError::NotFound)
            );
        }
        log.append("c").unwrap();
        assert_eq!(log.read_all(), ["c"]);
    }

    #[test]
    fn count_survives_reopen() {
        let mut log = fresh(4);
        log.append("a").unwrap();
        log.append("b").unwrap();
        let reopened = NvsEventLog::open(log.storage, 4);
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.read_all(), ["a", "b"]);
    }

    #[test]
    fn long_lines_are_truncated() {
        let mut log = fresh(1);
        log.append(&"x".repeat(100)).unwrap();
        assert_eq!(log.read_all()[0].len(), RECORD_BYTES);
    }

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(fresh(10_000).capacity(), MAX_RECORDS);
        assert_eq!(fresh(0).capacity(), 1);
    }
}
