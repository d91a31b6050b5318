//! Command line argument handling with clap v4 and subcommands.

use clap::{Args, Parser, Subcommand};

use crate::memory::heap::HeapConfig;
use crate::memory::HEAP_SIZE;

/// bumprt - runtime support for compiled programs
#[derive(Parser, Debug, Clone)]
#[command(name = "bumprt")]
#[command(about = "Runtime support for compiled programs: heap and integer I/O")]
#[command(version)]
pub struct BumprtCli {
    /// Print heap statistics to stderr before exiting
    #[arg(short = 'S', long = "statistics", global = true)]
    pub statistics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show heap configuration
    Info,
    /// Read integers from stdin and print each on its own line
    Echo,
    /// Allocate the given byte sizes from a fresh heap
    Alloc(AllocArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AllocArgs {
    /// Size of the heap in bytes
    #[arg(short = 'H', long = "heap-size", default_value_t = HEAP_SIZE)]
    pub heap_size: usize,

    /// Allocation sizes in bytes, in request order
    #[arg(value_name = "SIZES")]
    pub sizes: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Info,
    Echo,
    Alloc,
}

/// Options resolved from the command line
#[derive(Debug, Clone, Default)]
pub struct BumprtOptions {
    mode: Mode,
    heap: HeapConfig,
    sizes: Vec<u64>,
    statistics: bool,
}

impl From<BumprtCli> for BumprtOptions {
    fn from(cli: BumprtCli) -> Self {
        let mut options = BumprtOptions::default();
        if cli.statistics {
            options = options.with_statistics();
        }

        match cli.command {
            Commands::Info => options,
            Commands::Echo => options.echo(),
            Commands::Alloc(args) => options.allocating(args.sizes).with_heap_size(args.heap_size),
        }
    }
}

impl BumprtOptions {
    /// Parse command line arguments
    pub fn from_args() -> Self {
        BumprtOptions::from(BumprtCli::parse())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn heap(&self) -> &HeapConfig {
        &self.heap
    }

    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    pub fn statistics(&self) -> bool {
        self.statistics
    }

    pub fn echo(mut self) -> Self {
        self.mode = Mode::Echo;
        self
    }

    pub fn allocating(mut self, sizes: Vec<u64>) -> Self {
        self.mode = Mode::Alloc;
        self.sizes = sizes;
        self
    }

    pub fn with_heap_size(mut self, heap_size: usize) -> Self {
        self.heap = self.heap.with_heap_size(heap_size);
        self
    }

    pub fn with_statistics(mut self) -> Self {
        self.statistics = true;
        self
    }
}
