// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// a Rust struct and attributes (the #[...] things).
//
// Usage:
//   ecos-help-generator <ECOS_IP> [OUTPUT_DIR] [--port N] [--quiet] [--check] [--json]
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

use crate::ecos::DEFAULT_PORT;

#[derive(Parser, Debug)]
#[command(
    name = "ecos-help-generator",
    version = "0.1.0",
    about = "Generates HTML pages from the ECoSNet protocol help of an ESU Command Station",
    long_about = "ecos-help-generator connects to an ECoS, fetches the complete help() documentation \
                  of the ECoSNet protocol and writes it as a set of linked HTML pages. \
                  With --check it re-reads the written pages afterwards and reports any link \
                  that points to a missing page or bookmark."
)]
pub struct Cli {
    /// IP address of ECoS
    pub ecos_ip: String,

    /// Directory for generated files
    ///
    /// Created if it does not exist. Existing pages are overwritten.
    #[arg(default_value = "output")]
    pub output_dir: PathBuf,

    /// TCP port of the ECoSNet interface
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Only print warnings and errors (no "Wrote: ..." lines)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verify the links between the generated pages afterwards
    #[arg(long)]
    pub check: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}
