// Global protocol log for setupvar

use spin::Mutex;

const MAX_LOG_ENTRIES: usize = 128;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn tag(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub level: Level,
    pub message: &'static str,
}

struct Ring {
    entries: [Option<Entry>; MAX_LOG_ENTRIES],
    count: usize, // Total entries written
}

static LOG: Mutex<Ring> = Mutex::new(Ring {
    entries: [None; MAX_LOG_ENTRIES],
    count: 0,
});

pub fn log(level: Level, message: &'static str) {
    let mut ring = LOG.lock();
    let idx = ring.count % MAX_LOG_ENTRIES; // Ring buffer wrap-around
    ring.entries[idx] = Some(Entry { level, message });
    ring.count += 1;
}

/// Iterator over a window of the ring in chronological order.
///
/// Each step takes the lock briefly, so a concurrent writer may overwrite
/// entries not yet visited.
pub struct LogIterator {
    start_idx: usize,
    current: usize,
    remaining: usize,
}

impl Iterator for LogIterator {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let idx = (self.start_idx + self.current) % MAX_LOG_ENTRIES;
        self.current += 1;
        self.remaining -= 1;

        LOG.lock().entries[idx]
    }
}

/// All retained entries, oldest first.
pub fn entries() -> LogIterator {
    last(MAX_LOG_ENTRIES)
}

/// The last `n` retained entries, oldest first.
pub fn last(n: usize) -> LogIterator {
    let total_count = LOG.lock().count;
    let available = total_count.min(MAX_LOG_ENTRIES);
    let num_logs = n.min(available);

    LogIterator {
        start_idx: (total_count - num_logs) % MAX_LOG_ENTRIES,
        current: 0,
        remaining: num_logs,
    }
}

pub fn log_count() -> usize {
    LOG.lock().count.min(MAX_LOG_ENTRIES)
}

pub fn total_log_count() -> usize {
    LOG.lock().count
}

#[macro_export]
macro_rules! log_trace {
    ($msg:expr) => {
        $crate::logger::log($crate::logger::Level::Trace, $msg)
    };
}

#[macro_export]
macro_rules! log_info {
    ($msg:expr) => {
        $crate::logger::log($crate::logger::Level::Info, $msg)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($msg:expr) => {
        $crate::logger::log($crate::logger::Level::Warn, $msg)
    };
}

#[macro_export]
macro_rules! log_error {
    ($msg:expr) => {
        $crate::logger::log($crate::logger::Level::Error, $msg)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // The ring is process-global and tests run in parallel, so only
    // monotonic properties are asserted here.

    #[test]
    fn test_total_count_grows() {
        let before = total_log_count();
        log(Level::Info, "logger::test_total_count_grows");
        assert!(total_log_count() > before);
        assert!(log_count() <= MAX_LOG_ENTRIES);
    }

    #[test]
    fn test_last_is_bounded() {
        log_warn!("logger::test_last_is_bounded");
        assert!(last(1).count() <= 1);
        assert!(entries().count() <= MAX_LOG_ENTRIES);
    }

    #[test]
    fn test_wraps_without_losing_capacity() {
        for _ in 0..(MAX_LOG_ENTRIES + 3) {
            log(Level::Trace, "logger::wrap");
        }
        assert_eq!(log_count(), MAX_LOG_ENTRIES);
        assert_eq!(entries().count(), MAX_LOG_ENTRIES);
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error > Level::Warn);
        assert_eq!(Level::Info.tag(), "INFO");
    }
}
