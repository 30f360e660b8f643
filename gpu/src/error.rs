//! Error type for the compute wrapper.
//!
//! Failures coming out of the compute API keep their raw status code; the
//! wrapper's own checks are mapped onto the status code the API itself would
//! have reported, so `Error::status()` is always meaningful to callers that
//! still think in `cl_int`.

/// Raw status codes used by the wrapper.
pub mod status {
    pub const SUCCESS: i32 = 0;
    pub const DEVICE_NOT_FOUND: i32 = -1;
    pub const BUILD_PROGRAM_FAILURE: i32 = -11;
    pub const INVALID_VALUE: i32 = -30;
    pub const INVALID_EVENT: i32 = -58;
    pub const INVALID_OPERATION: i32 = -59;
    pub const INVALID_BUFFER_SIZE: i32 = -61;
    pub const INVALID_GLOBAL_WORK_SIZE: i32 = -63;
    pub const PLATFORM_NOT_FOUND_KHR: i32 = -1001;
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{call} failed with status {status}")]
    Api { call: &'static str, status: i32 },

    #[error("program build failed with status {status}:\n{log}")]
    Build { status: i32, log: String },

    #[error("no available device with a compiler matches the target")]
    DeviceNotFound,

    #[error("target device cannot change once a device has been selected")]
    TargetLocked,

    #[error("invalid target device mask {0:#x}")]
    InvalidTarget(u64),

    #[error("problem size must be greater than zero")]
    EmptyWorkSize,

    #[error("no operation has been issued yet")]
    NoEvent,

    #[error("transfer of {requested} elements exceeds buffer capacity {capacity}")]
    BufferTooSmall { capacity: usize, requested: usize },

    #[error("{len} elements of {elem_size} bytes overflow the buffer size")]
    BufferOverflow { len: usize, elem_size: usize },

    #[error("failed to read kernel source from {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no compute backend was compiled in (enable the `opencl-backend` feature)")]
    Unavailable,
}

impl Error {
    pub fn api(call: &'static str, status: i32) -> Self {
        Error::Api { call, status }
    }

    pub(crate) fn io(origin: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            origin: origin.into(),
            source,
        }
    }

    /// Status code equivalent of this error.
    pub fn status(&self) -> i32 {
        match self {
            Error::Api { status, .. } | Error::Build { status, .. } => *status,
            Error::DeviceNotFound => status::DEVICE_NOT_FOUND,
            Error::TargetLocked => status::INVALID_OPERATION,
            Error::InvalidTarget(_) => status::INVALID_VALUE,
            Error::EmptyWorkSize => status::INVALID_GLOBAL_WORK_SIZE,
            Error::NoEvent => status::INVALID_EVENT,
            Error::BufferTooSmall { .. } => status::INVALID_VALUE,
            Error::BufferOverflow { .. } => status::INVALID_BUFFER_SIZE,
            Error::Io { .. } => status::INVALID_VALUE,
            Error::Unavailable => status::PLATFORM_NOT_FOUND_KHR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_status_passes_through() {
        let err = Error::api("clCreateContext", -6);
        assert_eq!(err.status(), -6);
        assert_eq!(err.to_string(), "clCreateContext failed with status -6");
    }

    #[test]
    fn test_wrapper_errors_map_to_api_codes() {
        assert_eq!(Error::DeviceNotFound.status(), status::DEVICE_NOT_FOUND);
        assert_eq!(Error::TargetLocked.status(), status::INVALID_OPERATION);
        assert_eq!(Error::InvalidTarget(0x10).status(), status::INVALID_VALUE);
        assert_eq!(Error::NoEvent.status(), status::INVALID_EVENT);
        assert_eq!(
            Error::BufferOverflow {
                len: usize::MAX,
                elem_size: 8
            }
            .status(),
            status::INVALID_BUFFER_SIZE
        );
    }

    #[test]
    fn test_build_error_keeps_log() {
        let err = Error::Build {
            status: status::BUILD_PROGRAM_FAILURE,
            log: "error: use of undeclared identifier 'x'".to_string(),
        };
        assert_eq!(err.status(), -11);
        assert!(err.to_string().contains("undeclared identifier"));
    }
}
