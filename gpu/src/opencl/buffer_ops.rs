//! OpenCL buffer operations — device memory allocation and blocking transfers

use std::ptr;

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::event::Event;
use opencl3::memory::{Buffer, CL_MEM_READ_WRITE};
use opencl3::types::{cl_uchar, CL_BLOCKING};

use crate::error::{Error, Result};

/// Allocate a read-write byte buffer.
pub fn allocate(context: &Context, byte_size: usize) -> Result<Buffer<cl_uchar>> {
    // SAFETY: no host pointer is handed to the runtime.
    unsafe { Buffer::<cl_uchar>::create(context, CL_MEM_READ_WRITE, byte_size, ptr::null_mut()) }
        .map_err(|e| Error::api("clCreateBuffer", e.0))
}

pub fn write(queue: &CommandQueue, buffer: &mut Buffer<cl_uchar>, data: &[u8]) -> Result<Event> {
    // SAFETY: the write is blocking, so `data` outlives the transfer.
    unsafe { queue.enqueue_write_buffer(buffer, CL_BLOCKING, 0, data, &[]) }
        .map_err(|e| Error::api("clEnqueueWriteBuffer", e.0))
}

pub fn read(queue: &CommandQueue, buffer: &Buffer<cl_uchar>, data: &mut [u8]) -> Result<Event> {
    // SAFETY: the read is blocking, so `data` is filled before we return.
    unsafe { queue.enqueue_read_buffer(buffer, CL_BLOCKING, 0, data, &[]) }
        .map_err(|e| Error::api("clEnqueueReadBuffer", e.0))
}
