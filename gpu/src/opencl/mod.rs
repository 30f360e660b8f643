//! OpenCL backend (via `opencl3`)

pub mod buffer_ops;
pub mod compile;
pub mod device_init;
pub mod dispatch;

use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::device::Device;
use opencl3::event::Event;
use opencl3::kernel::Kernel;
use opencl3::memory::Buffer;
use opencl3::platform::Platform;
use opencl3::program::Program;
use opencl3::types::cl_uchar;

use crate::backend::{Backend, DeviceInfo, KernelArg};
use crate::device_type::DeviceType;
use crate::error::{Error, Result};
use crate::grid::GridSize;

/// OpenCL implementation of [`Backend`]. Stateless; all state lives in the
/// handles it hands out.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenClBackend;

impl OpenClBackend {
    pub fn is_available() -> bool {
        device_init::is_available()
    }
}

impl Backend for OpenClBackend {
    type Platform = Platform;
    type Device = Device;
    type Context = Context;
    type Queue = CommandQueue;
    type Program = Program;
    type Kernel = Kernel;
    type Buffer = Buffer<cl_uchar>;
    type Event = Event;

    fn platforms(&self) -> Result<Vec<Platform>> {
        device_init::platforms()
    }

    fn devices(&self, platform: &Platform, class: DeviceType) -> Result<Vec<Device>> {
        device_init::devices(platform, class)
    }

    fn is_usable(&self, device: &Device) -> bool {
        device_init::is_usable(device)
    }

    fn describe(&self, device: &Device) -> Result<DeviceInfo> {
        device_init::describe(device)
    }

    fn create_context(&self, devices: &[Device], primary: &Device) -> Result<Context> {
        device_init::create_context(devices, primary)
    }

    fn create_queue(&self, context: &Context) -> Result<CommandQueue> {
        device_init::create_queue(context)
    }

    fn build_program(
        &self,
        context: &Context,
        devices: &[Device],
        source: &str,
        options: &str,
    ) -> Result<Program> {
        compile::build_program(context, devices, source, options)
    }

    fn create_kernel(&self, program: &Program, name: &str) -> Result<Kernel> {
        compile::create_kernel(program, name)
    }

    fn set_arg(&self, kernel: &Kernel, index: u32, arg: &KernelArg<'_, Self>) -> Result<()> {
        match arg {
            KernelArg::Scalar(value) => dispatch::set_scalar(kernel, index, *value),
            KernelArg::Buffer(buffer) => dispatch::set_buffer(kernel, index, buffer),
        }
    }

    fn enqueue_kernel(&self, queue: &CommandQueue, kernel: &Kernel, grid: GridSize) -> Result<Event> {
        dispatch::enqueue(queue, kernel, grid)
    }

    fn create_buffer(&self, context: &Context, byte_size: usize) -> Result<Buffer<cl_uchar>> {
        buffer_ops::allocate(context, byte_size)
    }

    fn write_buffer(
        &self,
        queue: &CommandQueue,
        buffer: &mut Buffer<cl_uchar>,
        data: &[u8],
    ) -> Result<Event> {
        buffer_ops::write(queue, buffer, data)
    }

    fn read_buffer(
        &self,
        queue: &CommandQueue,
        buffer: &Buffer<cl_uchar>,
        data: &mut [u8],
    ) -> Result<Event> {
        buffer_ops::read(queue, buffer, data)
    }

    fn wait(&self, event: &Event) -> Result<()> {
        event.wait().map_err(|e| Error::api("clWaitForEvents", e.0))
    }

    fn elapsed(&self, event: &Event) -> Result<u64> {
        let profiling = |e: opencl3::error_codes::ClError| Error::api("clGetEventProfilingInfo", e.0);
        let start = event.profiling_command_start().map_err(profiling)?;
        let end = event.profiling_command_end().map_err(profiling)?;
        Ok(end.saturating_sub(start))
    }
}
