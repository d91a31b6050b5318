//! C ABI entry points linked against generated code
//!
//! Generated code has no error path for heap failures, so they are
//! reported on stderr and end the process here. After every
//! successful heap operation `free_ptr` and `heap_end` hold the
//! current bounds so that code can compare them inline. They are
//! mirrors only: allocation always goes through `allocate`.
#![allow(non_upper_case_globals)]

use std::io::{self, Write};
use std::process;
use std::ptr;

use crate::io::{read_int_from, ScalarError};
use crate::memory::heap::HeapError;
use crate::memory::store;

/// Address of the next free word of the process heap
///
/// Read-only mirror of the heap cursor, rewritten after every
/// `initialize` and `allocate`. The heap never reads it back: code
/// that bumps it inline gets memory `allocate` will hand out again.
#[no_mangle]
pub static mut free_ptr: *mut i64 = ptr::null_mut();

/// Address one past the end of the process heap
///
/// Read-only mirror; writes to it are ignored by the heap.
#[no_mangle]
pub static mut heap_end: *mut i64 = ptr::null_mut();

fn publish_bounds() {
    if let Some((free, end)) = store::bounds() {
        unsafe {
            free_ptr = free.cast();
            heap_end = end.cast();
        }
    }
}

fn fatal(error: &HeapError) -> ! {
    eprintln!("Error: {error}");
    if let HeapError::HeapExhausted { .. } = error {
        if let Some((free, end)) = store::bounds() {
            eprintln!("Current free_ptr: {free:p}, heap_end: {end:p}");
        }
    }
    process::exit(error.exit_code())
}

/// Acquire the process heap. Repeat calls are no-ops.
#[no_mangle]
pub extern "C" fn initialize() {
    match store::initialize() {
        Ok(()) => publish_bounds(),
        Err(e) => fatal(&e),
    }
}

/// Obtain `size_in_bytes` (rounded up to whole words) of uninitialised
/// heap memory
#[no_mangle]
pub extern "C" fn allocate(size_in_bytes: u64) -> *mut i64 {
    match store::allocate(size_in_bytes) {
        Ok(handle) => {
            publish_bounds();
            handle.as_ptr().cast()
        }
        Err(e) => fatal(&e),
    }
}

/// Read an integer from stdin, or 0 if none can be read
#[no_mangle]
pub extern "C" fn read_int() -> i64 {
    match read_int_from(&mut io::stdin().lock()) {
        Ok(i) => i,
        Err(ScalarError::EndOfInput) => 0,
        Err(e) => {
            eprintln!("read_int: {e}");
            0
        }
    }
}

/// Print an integer to stdout with no newline
///
/// Output is flushed as generated code may exit without unwinding
/// through Rust.
#[no_mangle]
pub extern "C" fn print_int(x: i64) {
    let mut out = io::stdout().lock();
    let _ = crate::io::print_int_to(&mut out, x).and_then(|_| out.flush());
}
