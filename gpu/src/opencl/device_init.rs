//! OpenCL device discovery, context and queue creation

use std::ptr;

use opencl3::command_queue::{CommandQueue, CL_QUEUE_PROFILING_ENABLE};
use opencl3::context::Context;
use opencl3::device::{
    Device, CL_DEVICE_TYPE_ACCELERATOR, CL_DEVICE_TYPE_CPU, CL_DEVICE_TYPE_DEFAULT,
    CL_DEVICE_TYPE_GPU,
};
use opencl3::error_codes::CL_DEVICE_NOT_FOUND;
use opencl3::platform::{get_platforms, Platform};
use opencl3::types::{cl_device_id, cl_device_type};

use crate::backend::DeviceInfo;
use crate::device_type::DeviceType;
use crate::error::{Error, Result};

/// All platforms exposed by the installed ICD loader.
pub fn platforms() -> Result<Vec<Platform>> {
    get_platforms().map_err(|e| Error::api("clGetPlatformIDs", e.0))
}

/// Check if any OpenCL platform is installed.
pub fn is_available() -> bool {
    matches!(get_platforms(), Ok(platforms) if !platforms.is_empty())
}

fn raw_class(class: DeviceType) -> cl_device_type {
    class.bits() as cl_device_type
}

/// Devices of one class on `platform`; none is not an error.
pub fn devices(platform: &Platform, class: DeviceType) -> Result<Vec<Device>> {
    match platform.get_devices(raw_class(class)) {
        Ok(ids) => Ok(ids.into_iter().map(Device::new).collect()),
        Err(e) if e.0 == CL_DEVICE_NOT_FOUND => Ok(Vec::new()),
        Err(e) => Err(Error::api("clGetDeviceIDs", e.0)),
    }
}

pub fn is_usable(device: &Device) -> bool {
    let available = device.available().unwrap_or(false);
    let compiler = device.compiler_available().unwrap_or(false);
    available && compiler
}

fn device_class(raw: cl_device_type) -> DeviceType {
    let mut class = DeviceType::empty();
    for (bit, flag) in [
        (CL_DEVICE_TYPE_DEFAULT, DeviceType::DEFAULT),
        (CL_DEVICE_TYPE_CPU, DeviceType::CPU),
        (CL_DEVICE_TYPE_GPU, DeviceType::GPU),
        (CL_DEVICE_TYPE_ACCELERATOR, DeviceType::ACCELERATOR),
    ] {
        if raw & bit != 0 {
            class |= flag;
        }
    }
    class
}

pub fn describe(device: &Device) -> Result<DeviceInfo> {
    let query = |e: opencl3::error_codes::ClError| Error::api("clGetDeviceInfo", e.0);
    Ok(DeviceInfo {
        name: device.name().map_err(query)?,
        vendor: device.vendor().map_err(query)?,
        class: device_class(device.dev_type().map_err(query)?),
        max_work_group_size: device.max_work_group_size().map_err(query)?,
    })
}

/// Context over `devices` with `primary` first, so queues created with the
/// context's default device land on it.
pub fn create_context(devices: &[Device], primary: &Device) -> Result<Context> {
    let mut ids: Vec<cl_device_id> = Vec::with_capacity(devices.len());
    ids.push(primary.id());
    ids.extend(
        devices
            .iter()
            .map(Device::id)
            .filter(|id| *id != primary.id()),
    );
    Context::from_devices(&ids, &[], None, ptr::null_mut())
        .map_err(|e| Error::api("clCreateContext", e.0))
}

#[allow(deprecated)]
pub fn create_queue(context: &Context) -> Result<CommandQueue> {
    CommandQueue::create_default(context, CL_QUEUE_PROFILING_ENABLE)
        .map_err(|e| Error::api("clCreateCommandQueue", e.0))
}
