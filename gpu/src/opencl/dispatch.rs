//! OpenCL kernel dispatch — argument binding and NDRange enqueue.

use std::ptr;

use opencl3::command_queue::CommandQueue;
use opencl3::event::Event;
use opencl3::kernel::Kernel;
use opencl3::memory::{Buffer, ClMem};
use opencl3::types::cl_uchar;

use crate::backend::Scalar;
use crate::error::{Error, Result};
use crate::grid::GridSize;

pub fn set_scalar(kernel: &Kernel, index: u32, value: Scalar) -> Result<()> {
    // SAFETY: each value is passed with its own size; the kernel signature
    // decides whether the size matches, and a mismatch comes back as
    // CL_INVALID_ARG_SIZE rather than a bad read.
    let result = unsafe {
        match value {
            Scalar::I32(v) => kernel.set_arg(index, &v),
            Scalar::U32(v) => kernel.set_arg(index, &v),
            Scalar::I64(v) => kernel.set_arg(index, &v),
            Scalar::U64(v) => kernel.set_arg(index, &v),
            Scalar::F32(v) => kernel.set_arg(index, &v),
            Scalar::F64(v) => kernel.set_arg(index, &v),
        }
    };
    result.map_err(|e| Error::api("clSetKernelArg", e.0))
}

pub fn set_buffer(kernel: &Kernel, index: u32, buffer: &Buffer<cl_uchar>) -> Result<()> {
    // SAFETY: a cl_mem handle is what buffer parameters expect.
    unsafe { kernel.set_arg(index, &buffer.get()) }
        .map_err(|e| Error::api("clSetKernelArg", e.0))
}

/// Enqueue `kernel` over a one-dimensional grid.
pub fn enqueue(queue: &CommandQueue, kernel: &Kernel, grid: GridSize) -> Result<Event> {
    let global = [grid.global];
    let local = [grid.local];
    // SAFETY: both size arrays hold exactly `work_dim` (1) entries and
    // outlive the call.
    unsafe {
        queue.enqueue_nd_range_kernel(
            kernel.get(),
            1,
            ptr::null(),
            global.as_ptr(),
            local.as_ptr(),
            &[],
        )
    }
    .map_err(|e| Error::api("clEnqueueNDRangeKernel", e.0))
}
