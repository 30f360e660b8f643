//! Kernel job files.
//!
//! A job names an OpenCL source file, the kernel to run from it and
//! optionally the class of device to run it on:
//!
//! ```xml
//! <kernel file="kernels/scale.cl" name="scale">
//!     <target type="gpu"/>
//! </kernel>
//! ```
//!
//! The kernel file path is taken as is, so relative paths resolve against
//! the working directory.

use std::io;
use std::path::{Path, PathBuf};

use clwrap_gpu::DeviceType;
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelJob {
    pub file: PathBuf,
    pub name: String,
    /// `ALL` unless the job names a device class.
    pub target: DeviceType,
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("cannot read job file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("job file is not well-formed XML: {0}")]
    Malformed(#[from] roxmltree::Error),

    #[error("kernel file not provided")]
    MissingFile,

    #[error("kernel file {} does not exist", .0.display())]
    KernelFileNotFound(PathBuf),

    #[error("kernel name not provided")]
    MissingName,
}

impl JobError {
    /// Process exit code the driver reports for this error. Unreadable and
    /// malformed job files both count as "could not open".
    pub fn exit_code(&self) -> i32 {
        match self {
            JobError::Read { .. } | JobError::Malformed(_) => -1,
            JobError::MissingFile | JobError::KernelFileNotFound(_) | JobError::MissingName => -3,
        }
    }
}

/// Read and parse the job file at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<KernelJob, JobError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| JobError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded job file {}", path.display());
    parse(&text)
}

/// Parse a job document.
pub fn parse(text: &str) -> Result<KernelJob, JobError> {
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();
    let kernel = root.has_tag_name("kernel").then_some(root);

    let attribute = |name: &str| {
        kernel
            .and_then(|node| node.attribute(name))
            .filter(|value| !value.is_empty())
    };

    let file = PathBuf::from(attribute("file").ok_or(JobError::MissingFile)?);
    if !file.is_file() {
        return Err(JobError::KernelFileNotFound(file));
    }
    let name = attribute("name").ok_or(JobError::MissingName)?.to_string();

    let target = match kernel.and_then(target_type) {
        None => DeviceType::ALL,
        Some(value) => value.parse().unwrap_or_else(|err| {
            warn!("{}; searching all device types", err);
            DeviceType::ALL
        }),
    };

    Ok(KernelJob { file, name, target })
}

/// `type` of the first `target` child that has one. Empty counts as absent.
fn target_type<'a>(kernel: roxmltree::Node<'a, '_>) -> Option<&'a str> {
    kernel
        .children()
        .filter(|child| child.has_tag_name("target"))
        .find_map(|child| child.attribute("type"))
        .filter(|value| !value.is_empty())
}
