//! Memoizing decorator for any [`DataPort`].
//!
//! Price requests are cached per `(symbol, start, end)` for a fixed
//! time-to-live so that recomputing indicators for the same instrument does
//! not hit the upstream source again. The cache holds at most `capacity`
//! entries; inserting into a full cache first drops expired entries, then
//! the oldest one. Errors are never cached.

use crate::domain::error::PlotosError;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_CAPACITY: usize = 64;

type CacheKey = (String, NaiveDate, NaiveDate);
type Clock = Box<dyn Fn() -> Instant + Send + Sync>;

struct Entry {
    series: PriceSeries,
    inserted: Instant,
}

pub struct CachedDataPort<P> {
    inner: P,
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<CacheKey, Entry>>,
    clock: Clock,
}

impl<P: DataPort> CachedDataPort<P> {
    pub fn new(inner: P, ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(inner, ttl, capacity, Box::new(Instant::now))
    }

    pub fn with_clock(inner: P, ttl: Duration, capacity: usize, clock: Clock) -> Self {
        Self {
            inner,
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Entry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lookup(&self, key: &CacheKey, now: Instant) -> Option<PriceSeries> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if now.duration_since(entry.inserted) < self.ttl => {
                Some(entry.series.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn store(&self, key: CacheKey, series: PriceSeries, now: Instant) {
        let mut entries = self.lock();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let ttl = self.ttl;
            entries.retain(|_, e| now.duration_since(e.inserted) < ttl);
        }
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted)
                .map(|(k, _)| k.clone())
            {
                tracing::debug!(symbol = %oldest.0, "evicting cached series");
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            Entry {
                series,
                inserted: now,
            },
        );
    }
}

impl<P: DataPort> DataPort for CachedDataPort<P> {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, PlotosError> {
        let key = (symbol.to_string(), start_date, end_date);
        let now = (self.clock)();

        if let Some(series) = self.lookup(&key, now) {
            tracing::debug!(symbol, %start_date, %end_date, "price cache hit");
            return Ok(series);
        }

        tracing::debug!(symbol, %start_date, %end_date, "price cache miss");
        let series = self.inner.fetch_prices(symbol, start_date, end_date)?;
        self.store(key, series.clone(), now);
        Ok(series)
    }

    fn list_symbols(&self) -> Result<Vec<String>, PlotosError> {
        self.inner.list_symbols()
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PlotosError> {
        self.inner.get_data_range(symbol)
    }
}
