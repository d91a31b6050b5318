//! Command line driver
pub mod error;
pub mod exercise;
pub mod options;
pub mod statistics;
