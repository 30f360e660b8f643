//! clwrap GPU compute — a thin convenience layer over OpenCL.
//!
//! [`Compute`] picks a device (accelerator, then GPU, then CPU), builds
//! programs from source, moves typed buffers between host and device and
//! dispatches kernels with an automatically sized 1-D grid. Devices, context
//! and queue are created lazily the first time something needs them.
//!
//! The OpenCL backend is behind the `opencl-backend` feature since it links
//! the system ICD loader. Without it, [`Compute::native`] still compiles but
//! every call reports [`Error::Unavailable`].
//!
//! ```rust,ignore
//! use clwrap_gpu::{kernel_args, Compute, Parameter, DeviceType};
//!
//! let mut compute = Compute::native();
//! compute.set_parameter(Parameter::TargetDevice(DeviceType::GPU))?;
//!
//! let mut data = compute.allocate_buffer::<f32>(4096)?;
//! compute.write_buffer(&mut data, &input)?;
//! compute.execute_kernel_from_file("scale.cl", "scale", 4096, &kernel_args![&data, 2.0f32])?;
//! compute.read_buffer(&data, &mut output)?;
//! ```

pub mod backend;
pub mod buffer;
pub mod compute;
pub mod device_type;
pub mod error;
pub mod grid;
pub mod select;

#[cfg(feature = "opencl-backend")]
pub mod opencl;

pub use backend::{Backend, DeviceInfo, KernelArg, NativeBackend, Scalar, Unavailable};
pub use buffer::DeviceBuffer;
pub use compute::{Compute, Parameter};
pub use device_type::{DeviceType, UnknownDeviceType};
pub use error::{status, Error, Result};
pub use grid::{GridSize, MAX_LOCAL_SIZE};
pub use select::{select_device, Selection};

#[cfg(feature = "opencl-backend")]
pub use opencl::OpenClBackend;
