//! clwrap - run an OpenCL kernel described by an XML job file
//!
//! # Usage
//!
//! ```bash
//! clwrap job.xml
//! clwrap --verbose job.xml
//! RUST_LOG=debug clwrap job.xml
//! ```

use clap::Parser;
use clwrap::{job, logging};
use clwrap_gpu::{Compute, Parameter};
use log::info;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "clwrap")]
#[command(version = "0.1.0")]
#[command(about = "Run an OpenCL kernel described by an XML job file", long_about = None)]
struct Cli {
    /// Path to the XML job file
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let job = match job::load(&cli.config) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    let mut compute = Compute::native();
    if let Err(e) = compute.set_parameter(Parameter::TargetDevice(job.target)) {
        eprintln!("Error: {}", e);
        process::exit(e.status());
    }

    info!(
        "job: kernel `{}` from {} on {} devices",
        job.name,
        job.file.display(),
        job.target
    );

    // TODO: build job.file, bind buffers and dispatch job.name once job files
    // can describe kernel arguments and data sizes.
    unimplemented!("running kernel jobs");
}
