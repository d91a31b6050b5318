extern crate bumprt;

use std::io::{self, Write};
use std::process;

use bumprt::driver::exercise;
use bumprt::driver::options::{BumprtOptions, Mode};
use bumprt::driver::statistics::Statistics;

pub fn main() {
    let opt = BumprtOptions::from_args();
    let mut statistics = Statistics::default();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match opt.mode() {
        Mode::Info => exercise::info(opt.heap(), &mut out),
        Mode::Echo => exercise::echo(&mut io::stdin().lock(), &mut out, &mut statistics),
        Mode::Alloc => exercise::alloc(opt.heap(), opt.sizes(), &mut out, &mut statistics),
    };
    let _ = out.flush();

    match result {
        Ok(()) => exit(&opt, 0, &statistics),
        Err(e) => {
            eprintln!("Error: {e}");
            exit(&opt, e.exit_code(), &statistics)
        }
    }
}

/// Optionally dump stats to stderr then exit
pub fn exit(opts: &BumprtOptions, code: i32, stats: &Statistics) -> ! {
    if opts.statistics() {
        eprintln!();
        eprintln!("~~~~~~~~~~");
        eprintln!("STATISTICS");
        eprintln!("~~~~~~~~~~");
        eprintln!();
        eprintln!("{stats}");
    }
    process::exit(code)
}
