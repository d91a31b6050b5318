//! Overall high-level error type for the driver
use std::io;

use thiserror::Error;

use crate::io::ScalarError;
use crate::memory::heap::HeapError;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Heap(#[from] HeapError),
    #[error(transparent)]
    Scalar(#[from] ScalarError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DriverError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::Heap(e) => e.exit_code(),
            _ => 1,
        }
    }
}
