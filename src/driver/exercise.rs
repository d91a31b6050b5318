//! Commands that drive the runtime from the command line

use std::io::{BufRead, Write};
use std::time::Instant;

use crate::io::{print_int_to, read_int_from, ScalarError};
use crate::memory::heap::{Heap, HeapConfig};
use crate::memory::WORD_SIZE;

use super::error::DriverError;
use super::statistics::Statistics;

/// Describe the heap configuration
pub fn info<W: Write>(config: &HeapConfig, out: &mut W) -> Result<(), DriverError> {
    config.validate()?;
    writeln!(out, "heap size : {} bytes", config.heap_size())?;
    writeln!(out, "word size : {} bytes", WORD_SIZE)?;
    writeln!(out, "words     : {}", config.words())?;
    Ok(())
}

/// Copy integers from input to output, one per line, until input is
/// exhausted
pub fn echo<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    statistics: &mut Statistics,
) -> Result<(), DriverError> {
    let t = Instant::now();
    let mut count = 0;

    let result: Result<(), DriverError> = loop {
        match read_int_from(input) {
            Ok(i) => {
                count += 1;
                print_int_to(out, i)?;
                writeln!(out)?;
            }
            Err(ScalarError::EndOfInput) => break Ok(()),
            Err(e) => break Err(e.into()),
        }
    };

    statistics.set_integers_read(count);
    statistics.timings_mut().record("echo", t.elapsed());
    result
}

/// Allocate each size in turn from a fresh heap, printing the offset
/// of each allocation and the cursor after it (both in bytes)
pub fn alloc<W: Write>(
    config: &HeapConfig,
    sizes: &[u64],
    out: &mut W,
    statistics: &mut Statistics,
) -> Result<(), DriverError> {
    let t = Instant::now();
    let heap = Heap::with_config(config)?;

    let result = sizes.iter().try_for_each(|size| -> Result<(), DriverError> {
        let handle = heap.allocate(*size)?;
        writeln!(out, "{} {}", handle.offset_bytes(), heap.used_bytes())?;
        Ok(())
    });

    statistics.set_heap(heap.stats());
    statistics.timings_mut().record("alloc", t.elapsed());
    result
}
