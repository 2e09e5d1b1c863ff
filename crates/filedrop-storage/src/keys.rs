//! Object key derivation for uploaded files.
//!
//! Key format: `<MM-DD-YYYY>/<filename><nanos>_<filename>`, where `nanos` is
//! the upload time in nanoseconds since the Unix epoch.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::{StorageError, StorageResult};

/// `strftime` format of the date partition (MM-DD-YYYY).
pub const DATE_PARTITION_FORMAT: &str = "%m-%d-%Y";

const KEY_DELIMITER: char = '_';
/// Byte budget for one copy of the filename. The key's last segment holds two
/// copies plus up to 19 timestamp digits and the delimiter, and must fit the
/// 255-byte file name limit of common filesystems.
pub const MAX_FILENAME_BYTES: usize = 117;
/// Extensions up to this many bytes survive truncation.
const MAX_KEPT_EXTENSION_BYTES: usize = 16;

/// Derives object keys for uploads.
///
/// Timestamps handed out by one deriver are strictly increasing, so two
/// uploads of the same filename through the same deriver never share a key
/// even if the clock is coarse or steps backwards.
#[derive(Debug, Default)]
pub struct KeyDeriver {
    last_nanos: AtomicI64,
}

impl KeyDeriver {
    pub const fn new() -> Self {
        Self {
            last_nanos: AtomicI64::new(0),
        }
    }

    /// Derive a key for `original_filename` using the current time.
    pub fn derive(&self, original_filename: &str) -> StorageResult<String> {
        self.derive_at(original_filename, Utc::now())
    }

    /// Derive a key for `original_filename` as if uploaded at `now`.
    pub fn derive_at(&self, original_filename: &str, now: DateTime<Utc>) -> StorageResult<String> {
        let filename = sanitize_filename(original_filename)?;
        let date = now.format(DATE_PARTITION_FORMAT);
        // Out of range past 2262; the monotonic guard still keeps keys unique.
        let nanos = self.next_nanos(now.timestamp_nanos_opt().unwrap_or(0));

        Ok(format!(
            "{date}/{filename}{nanos}{KEY_DELIMITER}{filename}"
        ))
    }

    fn next_nanos(&self, observed: i64) -> i64 {
        let mut last = self.last_nanos.load(Ordering::Acquire);
        loop {
            let next = if observed > last { observed } else { last + 1 };
            match self.last_nanos.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}

/// Reduce a client-supplied filename to something safe to embed in a key.
///
/// Only the final path component is kept and control characters become `_`.
/// Names longer than [`MAX_FILENAME_BYTES`] are cut on a char boundary,
/// keeping a short extension. Empty names, `.` and `..` are rejected.
pub fn sanitize_filename(original: &str) -> StorageResult<String> {
    let name = original
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(original)
        .trim();

    let sanitized: String = name
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return Err(StorageError::InvalidKey(format!(
            "Invalid filename: {:?}",
            original
        )));
    }

    Ok(truncate_filename(&sanitized))
}

fn truncate_filename(name: &str) -> String {
    if name.len() <= MAX_FILENAME_BYTES {
        return name.to_string();
    }

    let extension = name
        .rfind('.')
        .filter(|&dot| dot > 0 && name.len() - dot <= MAX_KEPT_EXTENSION_BYTES)
        .map(|dot| &name[dot..])
        .unwrap_or("");
    let stem = &name[..name.len() - extension.len()];

    let mut end = MAX_FILENAME_BYTES - extension.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}{}", &stem[..end], extension)
}
