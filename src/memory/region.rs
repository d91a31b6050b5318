//! The backing region acquired from the host allocator

use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

use thiserror::Error;

use super::WORD_SIZE;

/// A word-aligned block of memory allocated by the upstream allocator
#[derive(Debug, PartialEq)]
pub struct Region {
    /// Pointer to first word
    ptr: NonNull<u64>,
    /// Size of region in bytes
    size: usize,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    #[error("region size {0} is not a non-zero multiple of the word size")]
    BadSize(usize),
    #[error("failed to acquire {0} byte region")]
    OOM(usize),
}

// The region owns its memory outright, as a Box would.
unsafe impl Send for Region {}

impl Region {
    pub fn new(size: usize) -> Result<Self, RegionError> {
        if size == 0 || size % WORD_SIZE != 0 {
            Err(RegionError::BadSize(size))
        } else {
            Ok(Region {
                ptr: Self::alloc_region(size)?,
                size,
            })
        }
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Size in words
    pub fn words(&self) -> usize {
        self.size / WORD_SIZE
    }

    pub fn as_ptr(&self) -> *mut u64 {
        self.ptr.as_ptr()
    }

    /// Pointer to the word at `offset`, which may be one past the last
    /// word of the region
    pub fn word_ptr(&self, offset: usize) -> NonNull<u64> {
        assert!(offset <= self.words());
        unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(offset)) }
    }

    /// Word offset of `ptr` if it lies within the region
    pub fn word_offset_of<T>(&self, ptr: NonNull<T>) -> Option<usize> {
        let base = self.ptr.as_ptr() as usize;
        let addr = ptr.as_ptr() as usize;
        if addr >= base && addr < base + self.size {
            Some((addr - base) / WORD_SIZE)
        } else {
            None
        }
    }

    fn layout(size: usize) -> Result<Layout, RegionError> {
        Layout::from_size_align(size, WORD_SIZE).map_err(|_| RegionError::OOM(size))
    }

    fn alloc_region(size: usize) -> Result<NonNull<u64>, RegionError> {
        let layout = Self::layout(size)?;
        let ptr = unsafe { alloc(layout) } as *mut u64;
        NonNull::new(ptr).ok_or(RegionError::OOM(size))
    }

    fn dealloc_region(ptr: NonNull<u64>, size: usize) {
        unsafe {
            dealloc(
                ptr.as_ptr() as *mut u8,
                Layout::from_size_align_unchecked(size, WORD_SIZE),
            )
        }
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        Self::dealloc_region(self.ptr, self.size);
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_bad_size() {
        assert_eq!(Region::new(0), Err(RegionError::BadSize(0)));
        assert_eq!(Region::new(999), Err(RegionError::BadSize(999)));
    }

    #[test]
    fn test_unrepresentable_size() {
        let size = usize::MAX & !(WORD_SIZE - 1);
        assert_eq!(Region::new(size), Err(RegionError::OOM(size)));
    }

    #[test]
    fn test_word_aligned() {
        let region = Region::new(0x8000).unwrap();
        assert_eq!(region.words(), 0x1000);
        assert_eq!(region.as_ptr() as usize % WORD_SIZE, 0);
    }

    #[test]
    fn test_word_offsets() {
        let region = Region::new(64).unwrap();
        let third = region.word_ptr(3);
        assert_eq!(region.word_offset_of(third), Some(3));
        assert_eq!(region.word_offset_of(region.word_ptr(8)), None);
    }
}
