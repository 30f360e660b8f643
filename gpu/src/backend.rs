//! Backend seam — the handful of compute API calls the wrapper needs.
//!
//! `Compute` is generic over [`Backend`]; the OpenCL implementation lives in
//! [`crate::opencl`]. When no backend feature is enabled, [`Unavailable`]
//! stands in so the crate still compiles and every call reports
//! [`Error::Unavailable`].

use std::convert::Infallible;

use crate::buffer::DeviceBuffer;
use crate::device_type::DeviceType;
use crate::error::{Error, Result};
use crate::grid::GridSize;

/// Descriptive properties of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub vendor: String,
    pub class: DeviceType,
    pub max_work_group_size: usize,
}

pub trait Backend {
    type Platform;
    type Device: Clone;
    type Context;
    type Queue;
    type Program;
    type Kernel;
    type Buffer;
    type Event;

    fn platforms(&self) -> Result<Vec<Self::Platform>>;

    /// Devices of `class` on `platform`. A platform without such devices
    /// yields an empty list, not an error.
    fn devices(&self, platform: &Self::Platform, class: DeviceType) -> Result<Vec<Self::Device>>;

    /// Available and able to compile programs. Failed queries count as unusable.
    fn is_usable(&self, device: &Self::Device) -> bool;

    fn describe(&self, device: &Self::Device) -> Result<DeviceInfo>;

    /// Context spanning `devices`; `primary` is the device queues bind to.
    fn create_context(
        &self,
        devices: &[Self::Device],
        primary: &Self::Device,
    ) -> Result<Self::Context>;

    /// Profiling-enabled in-order queue on the context's primary device.
    fn create_queue(&self, context: &Self::Context) -> Result<Self::Queue>;

    fn build_program(
        &self,
        context: &Self::Context,
        devices: &[Self::Device],
        source: &str,
        options: &str,
    ) -> Result<Self::Program>;

    fn create_kernel(&self, program: &Self::Program, name: &str) -> Result<Self::Kernel>;

    fn set_arg(&self, kernel: &Self::Kernel, index: u32, arg: &KernelArg<'_, Self>) -> Result<()>;

    fn enqueue_kernel(
        &self,
        queue: &Self::Queue,
        kernel: &Self::Kernel,
        grid: GridSize,
    ) -> Result<Self::Event>;

    /// Read-write device buffer of `byte_size` bytes.
    fn create_buffer(&self, context: &Self::Context, byte_size: usize) -> Result<Self::Buffer>;

    /// Blocking host → device copy at offset 0.
    fn write_buffer(
        &self,
        queue: &Self::Queue,
        buffer: &mut Self::Buffer,
        data: &[u8],
    ) -> Result<Self::Event>;

    /// Blocking device → host copy at offset 0.
    fn read_buffer(
        &self,
        queue: &Self::Queue,
        buffer: &Self::Buffer,
        data: &mut [u8],
    ) -> Result<Self::Event>;

    fn wait(&self, event: &Self::Event) -> Result<()>;

    /// Nanoseconds between command start and command end.
    fn elapsed(&self, event: &Self::Event) -> Result<u64>;
}

/// Scalar kernel argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
}

/// Positional kernel argument.
pub enum KernelArg<'a, B: Backend + ?Sized> {
    Scalar(Scalar),
    Buffer(&'a B::Buffer),
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value)
                }
            }

            impl<'a, B: Backend + ?Sized> From<$ty> for KernelArg<'a, B> {
                fn from(value: $ty) -> Self {
                    KernelArg::Scalar(Scalar::$variant(value))
                }
            }
        )*
    };
}

scalar_from! {
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl<'a, B: Backend, T> From<&'a DeviceBuffer<B, T>> for KernelArg<'a, B> {
    fn from(buffer: &'a DeviceBuffer<B, T>) -> Self {
        KernelArg::Buffer(buffer.raw())
    }
}

/// Builds an array of [`KernelArg`]s in positional order.
///
/// ```rust,ignore
/// compute.execute_kernel(&kernel, n, &kernel_args![&input, &output, n as u32])?;
/// ```
#[macro_export]
macro_rules! kernel_args {
    () => { [] };
    ($($arg:expr),+ $(,)?) => {
        [$($crate::KernelArg::from($arg)),+]
    };
}

/// Placeholder backend compiled when no backend feature is enabled.
///
/// Platform enumeration fails with [`Error::Unavailable`], so no handle of
/// this backend is ever constructed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl Backend for Unavailable {
    type Platform = Infallible;
    type Device = Infallible;
    type Context = Infallible;
    type Queue = Infallible;
    type Program = Infallible;
    type Kernel = Infallible;
    type Buffer = Infallible;
    type Event = Infallible;

    fn platforms(&self) -> Result<Vec<Infallible>> {
        Err(Error::Unavailable)
    }

    fn devices(&self, platform: &Infallible, _class: DeviceType) -> Result<Vec<Infallible>> {
        match *platform {}
    }

    fn is_usable(&self, device: &Infallible) -> bool {
        match *device {}
    }

    fn describe(&self, device: &Infallible) -> Result<DeviceInfo> {
        match *device {}
    }

    fn create_context(&self, _devices: &[Infallible], primary: &Infallible) -> Result<Infallible> {
        match *primary {}
    }

    fn create_queue(&self, context: &Infallible) -> Result<Infallible> {
        match *context {}
    }

    fn build_program(
        &self,
        context: &Infallible,
        _devices: &[Infallible],
        _source: &str,
        _options: &str,
    ) -> Result<Infallible> {
        match *context {}
    }

    fn create_kernel(&self, program: &Infallible, _name: &str) -> Result<Infallible> {
        match *program {}
    }

    fn set_arg(&self, kernel: &Infallible, _index: u32, _arg: &KernelArg<'_, Self>) -> Result<()> {
        match *kernel {}
    }

    fn enqueue_kernel(&self, queue: &Infallible, _kernel: &Infallible, _grid: GridSize) -> Result<Infallible> {
        match *queue {}
    }

    fn create_buffer(&self, context: &Infallible, _byte_size: usize) -> Result<Infallible> {
        match *context {}
    }

    fn write_buffer(&self, queue: &Infallible, _buffer: &mut Infallible, _data: &[u8]) -> Result<Infallible> {
        match *queue {}
    }

    fn read_buffer(&self, queue: &Infallible, _buffer: &Infallible, _data: &mut [u8]) -> Result<Infallible> {
        match *queue {}
    }

    fn wait(&self, event: &Infallible) -> Result<()> {
        match *event {}
    }

    fn elapsed(&self, event: &Infallible) -> Result<u64> {
        match *event {}
    }
}

/// Backend used by [`crate::Compute::native`].
#[cfg(feature = "opencl-backend")]
pub type NativeBackend = crate::opencl::OpenClBackend;

/// Backend used by [`crate::Compute::native`].
#[cfg(not(feature = "opencl-backend"))]
pub type NativeBackend = Unavailable;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Scalar::from(3i32), Scalar::I32(3));
        assert_eq!(Scalar::from(3u64), Scalar::U64(3));
        assert_eq!(Scalar::from(0.5f32), Scalar::F32(0.5));
    }

    #[test]
    fn test_kernel_args_macro_keeps_order() {
        let args: [KernelArg<'_, Unavailable>; 3] = kernel_args![1u32, 2.0f32, -3i64];
        let scalars: Vec<Scalar> = args
            .iter()
            .map(|arg| match arg {
                KernelArg::Scalar(s) => *s,
                KernelArg::Buffer(b) => match **b {},
            })
            .collect();
        assert_eq!(
            scalars,
            vec![Scalar::U32(1), Scalar::F32(2.0), Scalar::I64(-3)]
        );
    }

    #[test]
    fn test_unavailable_has_no_platforms() {
        assert!(matches!(Unavailable.platforms(), Err(Error::Unavailable)));
    }
}
