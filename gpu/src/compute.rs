//! `Compute` — the convenience object over a [`Backend`].
//!
//! Devices, context and queue are created on first use, each step pulling in
//! the ones before it:
//!
//! ```text
//! devices ──> context ──> queue
//!   │            │          │
//!   │            │          └─ kernels, buffer transfers
//!   │            └─ programs, buffer allocation
//!   └─ used_device(), target lock
//! ```
//!
//! A step that fails stays uninitialized and is retried by the next call.
//! Every enqueued operation replaces the tracked "last event", which backs
//! [`Compute::wait_for_last_event`] and [`Compute::last_elapsed_time`].

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use bytemuck::Pod;
use log::{debug, info, trace, warn};

use crate::backend::{Backend, DeviceInfo, KernelArg, NativeBackend};
use crate::buffer::{byte_size_of, DeviceBuffer};
use crate::device_type::DeviceType;
use crate::error::{Error, Result};
use crate::grid::{GridSize, MAX_LOCAL_SIZE};
use crate::select::{select_device, Selection};

/// Settings accepted by [`Compute::set_parameter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// Classes of device to search. Only settable before a device is selected.
    TargetDevice(DeviceType),
    /// Options passed to every subsequent program build.
    BuildOptions(String),
}

// Field order is drop order: queue, then context, then devices.
struct Bound<B: Backend> {
    queue: Option<B::Queue>,
    context: B::Context,
}

struct Session<B: Backend> {
    bound: Option<Bound<B>>,
    selection: Selection<B::Device>,
    work_group_limit: usize,
}

pub struct Compute<B: Backend = NativeBackend> {
    last_event: Option<B::Event>,
    session: Option<Session<B>>,
    target: DeviceType,
    build_options: String,
    backend: B,
}

/// Take the value out of `slot`, or initialize it; on failure `slot` stays empty.
fn fill<T>(slot: &mut Option<T>, init: impl FnOnce() -> Result<T>) -> Result<&mut T> {
    let value = match slot.take() {
        Some(value) => value,
        None => init()?,
    };
    Ok(slot.insert(value))
}

fn open_session<'s, B: Backend>(
    backend: &B,
    target: DeviceType,
    slot: &'s mut Option<Session<B>>,
) -> Result<&'s mut Session<B>> {
    fill(slot, || {
        let selection = select_device(backend, target)?;
        let work_group_limit = match backend.describe(selection.device()) {
            Ok(info) => {
                info!(
                    "using {} device `{}` from {} (max work-group size {})",
                    selection.class, info.name, info.vendor, info.max_work_group_size
                );
                info.max_work_group_size
            }
            Err(err) => {
                warn!("could not query the selected device: {}", err);
                MAX_LOCAL_SIZE
            }
        };
        Ok(Session {
            bound: None,
            selection,
            work_group_limit,
        })
    })
}

impl<B: Backend> Session<B> {
    fn context(&mut self, backend: &B) -> Result<(&[B::Device], &mut Bound<B>)> {
        let devices = &self.selection.devices;
        let primary = self.selection.device();
        let bound = fill(&mut self.bound, || {
            debug!("creating context over {} device(s)", devices.len());
            Ok(Bound {
                queue: None,
                context: backend.create_context(devices, primary)?,
            })
        })?;
        Ok((devices.as_slice(), bound))
    }

    fn queue(&mut self, backend: &B) -> Result<&B::Queue> {
        let (_, bound) = self.context(backend)?;
        let Bound { queue, context } = bound;
        let queue = fill(queue, || {
            debug!("creating profiling command queue");
            backend.create_queue(context)
        })?;
        Ok(&*queue)
    }
}

impl Compute<NativeBackend> {
    /// Wrapper over the backend selected by cargo features.
    pub fn native() -> Self {
        Compute::new(NativeBackend::default())
    }
}

impl<B: Backend> Compute<B> {
    /// Searches every device class, with no build options.
    pub fn new(backend: B) -> Self {
        Compute {
            last_event: None,
            session: None,
            target: DeviceType::ALL,
            build_options: String::new(),
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn target(&self) -> DeviceType {
        self.target
    }

    pub fn build_options(&self) -> &str {
        &self.build_options
    }

    pub fn is_device_selected(&self) -> bool {
        self.session.is_some()
    }

    pub fn set_parameter(&mut self, parameter: Parameter) -> Result<()> {
        match parameter {
            Parameter::TargetDevice(target) => {
                if self.session.is_some() {
                    return Err(Error::TargetLocked);
                }
                debug!("target device set to {}", target);
                self.target = target;
            }
            Parameter::BuildOptions(options) => {
                debug!("build options set to `{}`", options);
                self.build_options = options;
            }
        }
        Ok(())
    }

    /// Set the target from a raw device-type mask.
    pub fn set_target_raw(&mut self, raw: u64) -> Result<()> {
        let target = DeviceType::from_raw(raw).ok_or(Error::InvalidTarget(raw))?;
        self.set_parameter(Parameter::TargetDevice(target))
    }

    /// The device computations run on, selecting it if needed.
    pub fn used_device(&mut self) -> Result<&B::Device> {
        let session = open_session(&self.backend, self.target, &mut self.session)?;
        Ok(session.selection.device())
    }

    pub fn used_device_info(&mut self) -> Result<DeviceInfo> {
        let session = open_session(&self.backend, self.target, &mut self.session)?;
        self.backend.describe(session.selection.device())
    }

    /// Grid for `size` work-items. Once a device is selected its
    /// work-group limit also applies.
    pub fn grid_size(&self, size: usize) -> Result<GridSize> {
        let limit = self
            .session
            .as_ref()
            .map_or(MAX_LOCAL_SIZE, |session| session.work_group_limit);
        GridSize::with_limit(size, limit)
    }

    fn context(&mut self) -> Result<(&B, &B::Context)> {
        let session = open_session(&self.backend, self.target, &mut self.session)?;
        let (_, bound) = session.context(&self.backend)?;
        Ok((&self.backend, &bound.context))
    }

    fn queue(&mut self) -> Result<(&B, &B::Queue)> {
        let session = open_session(&self.backend, self.target, &mut self.session)?;
        let queue = session.queue(&self.backend)?;
        Ok((&self.backend, queue))
    }

    // ========================================================================
    // Programs and kernels
    // ========================================================================

    pub fn program_from_file(&mut self, path: impl AsRef<Path>) -> Result<B::Program> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| Error::io(path.display().to_string(), err))?;
        self.program_from_source(&source)
    }

    pub fn program_from_reader<R: Read>(&mut self, mut reader: R) -> Result<B::Program> {
        let mut source = String::new();
        reader
            .read_to_string(&mut source)
            .map_err(|err| Error::io("reader", err))?;
        self.program_from_source(&source)
    }

    /// Build `source` for every selected device with the current build options.
    pub fn program_from_source(&mut self, source: &str) -> Result<B::Program> {
        let Compute {
            session,
            target,
            build_options,
            backend,
            ..
        } = self;
        let session = open_session(&*backend, *target, session)?;
        let (devices, bound) = session.context(&*backend)?;
        debug!(
            "building program ({} bytes) with options `{}`",
            source.len(),
            build_options
        );
        backend
            .build_program(&bound.context, devices, source, build_options.as_str())
            .inspect_err(|err| {
                if let Error::Build { log, .. } = err {
                    warn!("program build failed:\n{}", log);
                }
            })
    }

    pub fn kernel_from_file(&mut self, path: impl AsRef<Path>, name: &str) -> Result<B::Kernel> {
        let program = self.program_from_file(path)?;
        self.kernel_from_program(&program, name)
    }

    pub fn kernel_from_reader<R: Read>(&mut self, reader: R, name: &str) -> Result<B::Kernel> {
        let program = self.program_from_reader(reader)?;
        self.kernel_from_program(&program, name)
    }

    pub fn kernel_from_source(&mut self, source: &str, name: &str) -> Result<B::Kernel> {
        let program = self.program_from_source(source)?;
        self.kernel_from_program(&program, name)
    }

    pub fn kernel_from_program(&self, program: &B::Program, name: &str) -> Result<B::Kernel> {
        self.backend.create_kernel(program, name)
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Bind `args` to positions 0.. and enqueue `kernel` over `data_size`
    /// work-items. Does not wait for completion.
    pub fn execute_kernel(
        &mut self,
        kernel: &B::Kernel,
        data_size: usize,
        args: &[KernelArg<'_, B>],
    ) -> Result<()> {
        for (index, arg) in args.iter().enumerate() {
            self.backend.set_arg(kernel, index as u32, arg)?;
        }

        let event = {
            let Compute {
                session,
                target,
                backend,
                ..
            } = self;
            let session = open_session(&*backend, *target, session)?;
            let grid = GridSize::with_limit(data_size, session.work_group_limit)?;
            trace!(
                "dispatching {} work-items in groups of {}",
                grid.global,
                grid.local
            );
            let queue = session.queue(&*backend)?;
            backend.enqueue_kernel(queue, kernel, grid)?
        };
        self.last_event = Some(event);
        Ok(())
    }

    pub fn execute_kernel_from_file(
        &mut self,
        path: impl AsRef<Path>,
        name: &str,
        data_size: usize,
        args: &[KernelArg<'_, B>],
    ) -> Result<()> {
        let kernel = self.kernel_from_file(path, name)?;
        self.execute_kernel(&kernel, data_size, args)
    }

    pub fn execute_kernel_from_reader<R: Read>(
        &mut self,
        reader: R,
        name: &str,
        data_size: usize,
        args: &[KernelArg<'_, B>],
    ) -> Result<()> {
        let kernel = self.kernel_from_reader(reader, name)?;
        self.execute_kernel(&kernel, data_size, args)
    }

    pub fn execute_kernel_from_source(
        &mut self,
        source: &str,
        name: &str,
        data_size: usize,
        args: &[KernelArg<'_, B>],
    ) -> Result<()> {
        let kernel = self.kernel_from_source(source, name)?;
        self.execute_kernel(&kernel, data_size, args)
    }

    pub fn execute_kernel_from_program(
        &mut self,
        program: &B::Program,
        name: &str,
        data_size: usize,
        args: &[KernelArg<'_, B>],
    ) -> Result<()> {
        let kernel = self.kernel_from_program(program, name)?;
        self.execute_kernel(&kernel, data_size, args)
    }

    // ========================================================================
    // Buffers
    // ========================================================================

    /// Read-write device buffer holding `len` elements of `T`.
    pub fn allocate_buffer<T: Pod>(&mut self, len: usize) -> Result<DeviceBuffer<B, T>> {
        let byte_size = byte_size_of::<T>(len)?;
        let (backend, context) = self.context()?;
        let raw = backend.create_buffer(context, byte_size)?;
        Ok(DeviceBuffer::new(raw, len))
    }

    /// Blocking copy of `host` into the start of `buffer`.
    pub fn write_buffer<T: Pod>(&mut self, buffer: &mut DeviceBuffer<B, T>, host: &[T]) -> Result<()> {
        buffer.check_fits(host.len())?;
        let event = {
            let (backend, queue) = self.queue()?;
            backend.write_buffer(queue, buffer.raw_mut(), bytemuck::cast_slice(host))?
        };
        self.last_event = Some(event);
        Ok(())
    }

    /// Blocking copy of the first `host.len()` elements of `buffer` into `host`.
    pub fn read_buffer<T: Pod>(&mut self, buffer: &DeviceBuffer<B, T>, host: &mut [T]) -> Result<()> {
        buffer.check_fits(host.len())?;
        let event = {
            let (backend, queue) = self.queue()?;
            backend.read_buffer(queue, buffer.raw(), bytemuck::cast_slice_mut(host))?
        };
        self.last_event = Some(event);
        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Block until the most recently issued operation completes.
    pub fn wait_for_last_event(&self) -> Result<()> {
        let event = self.last_event.as_ref().ok_or(Error::NoEvent)?;
        self.backend.wait(event)
    }

    /// Device-side duration of the most recently issued operation.
    pub fn last_elapsed_time(&self) -> Result<Duration> {
        let event = self.last_event.as_ref().ok_or(Error::NoEvent)?;
        Ok(Duration::from_nanos(self.backend.elapsed(event)?))
    }
}
