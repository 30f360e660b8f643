//! Typed device buffers.
//!
//! Backends only deal in bytes; `DeviceBuffer` remembers the element type and
//! count so host transfers can be checked and cast with `bytemuck`.

use std::fmt;
use std::marker::PhantomData;

use crate::backend::Backend;
use crate::error::{Error, Result};

pub struct DeviceBuffer<B: Backend, T> {
    raw: B::Buffer,
    len: usize,
    _elem: PhantomData<T>,
}

impl<B: Backend, T> DeviceBuffer<B, T> {
    pub(crate) fn new(raw: B::Buffer, len: usize) -> Self {
        DeviceBuffer {
            raw,
            len,
            _elem: PhantomData,
        }
    }

    /// Number of `T` elements the buffer holds.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn byte_size(&self) -> usize {
        self.len * std::mem::size_of::<T>()
    }

    pub fn raw(&self) -> &B::Buffer {
        &self.raw
    }

    pub(crate) fn raw_mut(&mut self) -> &mut B::Buffer {
        &mut self.raw
    }

    /// Fail unless `requested` elements fit.
    pub(crate) fn check_fits(&self, requested: usize) -> Result<()> {
        if requested > self.len {
            return Err(Error::BufferTooSmall {
                capacity: self.len,
                requested,
            });
        }
        Ok(())
    }
}

impl<B: Backend, T> fmt::Debug for DeviceBuffer<B, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceBuffer")
            .field("elem", &std::any::type_name::<T>())
            .field("len", &self.len)
            .finish()
    }
}

/// Byte size of `len` elements of `T`, rejecting overflow.
pub(crate) fn byte_size_of<T>(len: usize) -> Result<usize> {
    let elem_size = std::mem::size_of::<T>();
    len.checked_mul(elem_size)
        .ok_or(Error::BufferOverflow { len, elem_size })
}
