//! OpenCL C compilation — source → cl_program → cl_kernel

use opencl3::context::Context;
use opencl3::device::Device;
use opencl3::error_codes::CL_BUILD_PROGRAM_FAILURE;
use opencl3::kernel::Kernel;
use opencl3::program::Program;
use opencl3::types::cl_device_id;

use crate::error::{Error, Result};

/// Create a program from `source` and build it for every device in `devices`.
///
/// A failed build reports the first non-empty device build log.
pub fn build_program(
    context: &Context,
    devices: &[Device],
    source: &str,
    options: &str,
) -> Result<Program> {
    let mut program = Program::create_from_source(context, source)
        .map_err(|e| Error::api("clCreateProgramWithSource", e.0))?;

    let ids: Vec<cl_device_id> = devices.iter().map(Device::id).collect();
    if let Err(e) = program.build(&ids, options) {
        if e.0 != CL_BUILD_PROGRAM_FAILURE {
            return Err(Error::api("clBuildProgram", e.0));
        }
        let log = ids
            .iter()
            .filter_map(|id| program.get_build_log(*id).ok())
            .find(|log| !log.trim().is_empty())
            .unwrap_or_default();
        return Err(Error::Build { status: e.0, log });
    }

    Ok(program)
}

/// Look up kernel `name` in a built program.
pub fn create_kernel(program: &Program, name: &str) -> Result<Kernel> {
    Kernel::create(program, name).map_err(|e| Error::api("clCreateKernel", e.0))
}
