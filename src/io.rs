//! Scalar I/O for generated code
//!
//! Integers are read as whitespace-delimited base 10 tokens with an
//! optional sign and written in plain decimal with no separator.

use std::io::{self, BufRead, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScalarError {
    #[error("expected an integer but reached end of input")]
    EndOfInput,
    #[error("expected an integer but found '{0}'")]
    Malformed(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Read the next whitespace-delimited token, skipping leading
/// whitespace. `None` at end of input.
fn next_token<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut token = Vec::new();

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buf.is_empty() {
            break;
        }

        let mut used = 0;
        let mut complete = false;
        for &byte in buf {
            if byte.is_ascii_whitespace() {
                if !token.is_empty() {
                    complete = true;
                    break;
                }
            } else {
                token.push(byte);
            }
            used += 1;
        }
        reader.consume(used);

        if complete {
            break;
        }
    }

    if token.is_empty() {
        Ok(None)
    } else {
        Ok(Some(String::from_utf8_lossy(&token).into_owned()))
    }
}

/// Read one decimal integer from `reader`
///
/// The whole token must be an integer in range; a malformed token is
/// consumed and reported.
pub fn read_int_from<R: BufRead>(reader: &mut R) -> Result<i64, ScalarError> {
    let token = next_token(reader)?.ok_or(ScalarError::EndOfInput)?;
    token
        .parse::<i64>()
        .map_err(|_| ScalarError::Malformed(token))
}

/// Write the decimal form of `x` to `writer`
pub fn print_int_to<W: Write>(writer: &mut W, x: i64) -> io::Result<()> {
    write!(writer, "{x}")
}

/// Read one decimal integer from standard input
pub fn read_int() -> Result<i64, ScalarError> {
    read_int_from(&mut io::stdin().lock())
}

/// Write the decimal form of `x` to standard output
pub fn print_int(x: i64) -> io::Result<()> {
    print_int_to(&mut io::stdout().lock(), x)
}
