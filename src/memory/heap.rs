//! The bump heap implementation

use std::cell::Cell;
use std::fmt::Display;
use std::ptr::NonNull;

use thiserror::Error;

use super::region::{Region, RegionError};
use super::{HEAP_SIZE, WORD_SIZE};

/// Heap errors, each fatal to generated code
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeapError {
    /// Host allocator could not provide the backing region
    #[error("failed to acquire {size} byte heap")]
    AcquisitionFailed { size: usize },
    /// Request would move the cursor beyond the end of the region
    #[error(
        "heap exhausted: requested {requested} bytes (cursor: word {cursor}, end: word {end})"
    )]
    HeapExhausted {
        requested: u64,
        cursor: usize,
        end: usize,
    },
    /// Allocation attempted before the heap was initialised
    #[error("heap used before initialisation")]
    NotInitialized,
    /// Heap size is not a whole number of words
    #[error("heap size {size} is not a non-zero multiple of the {} byte word", WORD_SIZE)]
    BadConfiguration { size: usize },
}

impl HeapError {
    /// Process exit status for a fatal error of this kind
    pub fn exit_code(&self) -> i32 {
        match self {
            HeapError::AcquisitionFailed { .. } => 1,
            HeapError::HeapExhausted { .. } => 2,
            HeapError::NotInitialized => 3,
            HeapError::BadConfiguration { .. } => 4,
        }
    }
}

impl From<RegionError> for HeapError {
    fn from(e: RegionError) -> Self {
        match e {
            RegionError::BadSize(size) => HeapError::BadConfiguration { size },
            RegionError::OOM(size) => HeapError::AcquisitionFailed { size },
        }
    }
}

/// Heap sizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapConfig {
    heap_size: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            heap_size: HEAP_SIZE,
        }
    }
}

impl HeapConfig {
    pub fn with_heap_size(mut self, heap_size: usize) -> Self {
        self.heap_size = heap_size;
        self
    }

    pub fn heap_size(&self) -> usize {
        self.heap_size
    }

    pub fn words(&self) -> usize {
        self.heap_size / WORD_SIZE
    }

    pub fn validate(&self) -> Result<(), HeapError> {
        if self.heap_size == 0 || self.heap_size % WORD_SIZE != 0 {
            Err(HeapError::BadConfiguration {
                size: self.heap_size,
            })
        } else {
            Ok(())
        }
    }
}

/// Number of words needed to hold `size_in_bytes`
pub fn words_for(size_in_bytes: u64) -> u64 {
    size_in_bytes.div_ceil(WORD_SIZE as u64)
}

/// A successful allocation: a word offset into the heap and the
/// corresponding address
///
/// The memory behind a handle is not initialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    offset: usize,
    ptr: NonNull<u64>,
}

impl Handle {
    /// Offset from the start of the region in words
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Offset from the start of the region in bytes
    pub fn offset_bytes(&self) -> usize {
        self.offset * WORD_SIZE
    }

    pub fn as_ptr(&self) -> *mut u64 {
        self.ptr.as_ptr()
    }

    pub fn as_non_null(&self) -> NonNull<u64> {
        self.ptr
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Successful allocations
    pub allocations: u64,
    /// Total bytes requested by successful allocations
    pub bytes_requested: u64,
    /// Words handed out
    pub words_allocated: usize,
    /// Words remaining
    pub words_free: usize,
}

impl Display for HeapStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Heap Allocs    : {:10}", self.allocations)?;
        writeln!(f, "Bytes Requested: {:10}", self.bytes_requested)?;
        writeln!(f, "Words Used     : {:10}", self.words_allocated)?;
        writeln!(f, "Words Free     : {:10}", self.words_free)
    }
}

/// A bump heap over a single region (with interior mutability)
///
/// `cursor` and `end` are word offsets into the region. `end` is
/// fixed at creation and `cursor` only ever increases.
pub struct Heap {
    region: Region,
    cursor: Cell<usize>,
    end: usize,
    allocations: Cell<u64>,
    bytes_requested: Cell<u64>,
}

impl std::fmt::Debug for Heap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:p} {}:{}:{}",
            self.region.as_ptr(),
            self.region.size(),
            self.cursor.get(),
            self.end
        )
    }
}

impl Heap {
    /// Acquire a heap of the default size
    pub fn new() -> Result<Self, HeapError> {
        Self::with_config(&HeapConfig::default())
    }

    pub fn with_config(config: &HeapConfig) -> Result<Self, HeapError> {
        let region = Region::new(config.heap_size())?;
        let end = region.words();
        Ok(Heap {
            region,
            cursor: Cell::new(0),
            end,
            allocations: Cell::new(0),
            bytes_requested: Cell::new(0),
        })
    }

    /// Bump the cursor by enough words to hold `size_in_bytes`
    pub fn allocate(&self, size_in_bytes: u64) -> Result<Handle, HeapError> {
        let cursor = self.cursor.get();
        let next = usize::try_from(words_for(size_in_bytes))
            .ok()
            .and_then(|words| cursor.checked_add(words))
            .filter(|next| *next <= self.end)
            .ok_or(HeapError::HeapExhausted {
                requested: size_in_bytes,
                cursor,
                end: self.end,
            })?;

        self.cursor.set(next);
        self.allocations.set(self.allocations.get() + 1);
        self.bytes_requested
            .set(self.bytes_requested.get().saturating_add(size_in_bytes));

        Ok(Handle {
            offset: cursor,
            ptr: self.region.word_ptr(cursor),
        })
    }

    /// Next free word offset
    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    /// Exclusive upper bound word offset
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn capacity_bytes(&self) -> usize {
        self.end * WORD_SIZE
    }

    pub fn used_bytes(&self) -> usize {
        self.cursor.get() * WORD_SIZE
    }

    pub fn free_bytes(&self) -> usize {
        (self.end - self.cursor.get()) * WORD_SIZE
    }

    /// Address of the next free word
    pub fn free_ptr(&self) -> *mut u64 {
        self.region.word_ptr(self.cursor.get()).as_ptr()
    }

    /// Address one past the last word of the region
    pub fn heap_end(&self) -> *mut u64 {
        self.region.word_ptr(self.end).as_ptr()
    }

    /// Whether `ptr` was handed out by this heap
    pub fn contains<T>(&self, ptr: NonNull<T>) -> bool {
        self.region
            .word_offset_of(ptr)
            .is_some_and(|offset| offset < self.cursor.get())
    }

    pub fn stats(&self) -> HeapStats {
        HeapStats {
            allocations: self.allocations.get(),
            bytes_requested: self.bytes_requested.get(),
            words_allocated: self.cursor.get(),
            words_free: self.end - self.cursor.get(),
        }
    }
}
