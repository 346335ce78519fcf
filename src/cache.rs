use chrono::{DateTime, Duration, Utc};

/// a single loaded value reused until it ages out or a write invalidates it
#[derive(Debug, Clone)]
pub struct SnapshotCache<T> {
    ttl: Duration,
    entry: Option<(DateTime<Utc>, T)>,
}

impl<T> SnapshotCache<T> {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl: Duration::seconds(
                i64::try_from(ttl_seconds)
                    .unwrap_or(i64::MAX)
                    .min(i64::MAX / 1000),
            ),
            entry: None,
        }
    }

    /// cached value when it was stored less than the ttl before `now`
    pub fn get(&self, now: DateTime<Utc>) -> Option<&T> {
        match &self.entry {
            Some((loaded_at, value)) if now - *loaded_at < self.ttl => Some(value),
            _ => None,
        }
    }

    pub fn put(&mut self, now: DateTime<Utc>, value: T) -> &T {
        let (_, value) = self.entry.insert((now, value));
        value
    }

    /// cached value, or a fresh one from `load` when the entry is missing or
    /// stale; a failed load leaves the cache empty
    pub fn get_or_try_load<E>(
        &mut self,
        now: DateTime<Utc>,
        load: impl FnOnce() -> Result<T, E>,
    ) -> Result<&T, E> {
        if self.get(now).is_none() {
            self.entry = None;
        }
        let entry = match self.entry.take() {
            Some(entry) => entry,
            None => (now, load()?),
        };
        let (_, value) = self.entry.insert(entry);
        Ok(value)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_warm(&self) -> bool {
        self.entry.is_some()
    }
}
