extern crate clap;
extern crate indexmap;
extern crate thiserror;
#[macro_use]
extern crate lazy_static;

pub mod driver;
pub mod ffi;
pub mod io;
pub mod memory;
