//! Capture and report statistics for a run

use std::{fmt::Display, time::Duration};

use indexmap::IndexMap;

use crate::memory::heap::HeapStats;

#[derive(Default, Debug)]
pub struct Timings {
    timings: IndexMap<String, Duration>,
}

impl Timings {
    pub fn record<T: AsRef<str>>(&mut self, name: T, elapsed: Duration) {
        self.timings.insert(name.as_ref().to_string(), elapsed);
    }

    pub fn get<T: AsRef<str>>(&self, name: T) -> Option<Duration> {
        self.timings.get(name.as_ref()).copied()
    }
}

impl Display for Timings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.timings.keys().map(|k| k.len()).max().unwrap_or(0) + 1;

        for (k, v) in &self.timings {
            writeln!(f, "{:width$}: {:14.9}s", k, v.as_secs_f64(), width = width)?;
        }
        Ok(())
    }
}

/// The statistics captured during a run
#[derive(Default, Debug)]
pub struct Statistics {
    integers_read: u64,
    heap: Option<HeapStats>,
    timings: Timings,
}

impl Statistics {
    pub fn set_integers_read(&mut self, count: u64) {
        self.integers_read = count;
    }

    pub fn set_heap(&mut self, stats: HeapStats) {
        self.heap = Some(stats);
    }

    pub fn heap(&self) -> Option<&HeapStats> {
        self.heap.as_ref()
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn timings_mut(&mut self) -> &mut Timings {
        &mut self.timings
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Integers Read  : {:10}", self.integers_read)?;
        if let Some(heap) = &self.heap {
            write!(f, "{heap}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.timings)
    }
}

#[cfg(test)]
pub mod tests {

    use regex::Regex;

    use super::*;

    #[test]
    pub fn test_display() {
        let mut stats = Statistics::default();
        stats.set_integers_read(3);
        stats.set_heap(HeapStats {
            allocations: 2,
            bytes_requested: 20,
            words_allocated: 4,
            words_free: 4,
        });
        stats.timings_mut().record("alloc", Duration::from_millis(5));

        let text = format!("{stats}");
        assert!(Regex::new(r"Integers Read\s*:\s+3\n").unwrap().is_match(&text));
        assert!(Regex::new(r"Heap Allocs\s*:\s+2\n").unwrap().is_match(&text));
        assert!(Regex::new(r"alloc\s*:\s+0\.005000000s").unwrap().is_match(&text));
    }

    #[test]
    pub fn test_empty_timings() {
        assert_eq!(format!("{}", Timings::default()), "");
    }
}
