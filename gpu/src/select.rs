//! Device search.

use log::debug;

use crate::backend::Backend;
use crate::device_type::DeviceType;
use crate::error::{Error, Result};

/// The device list a search settled on and the chosen entry within it.
#[derive(Debug, Clone)]
pub struct Selection<D> {
    pub devices: Vec<D>,
    pub index: usize,
    pub class: DeviceType,
}

impl<D> Selection<D> {
    pub fn device(&self) -> &D {
        &self.devices[self.index]
    }
}

/// Find the first usable device, probing accelerators, then GPUs, then CPUs,
/// each across all platforms in enumeration order.
///
/// A platform whose device query fails counts as having no devices of that
/// class; only platform enumeration errors end the search.
///
/// The whole list of same-class devices from the winning platform is kept
/// since contexts and program builds span it.
pub fn select_device<B: Backend>(backend: &B, target: DeviceType) -> Result<Selection<B::Device>> {
    let platforms = backend.platforms()?;
    debug!("searching {} platform(s) for a {} device", platforms.len(), target);

    for class in DeviceType::SEARCH_ORDER {
        if !target.admits(class) {
            continue;
        }
        for (platform_index, platform) in platforms.iter().enumerate() {
            let devices = match backend.devices(platform, class) {
                Ok(devices) => devices,
                Err(err) => {
                    debug!(
                        "skipping {} devices on platform {}: {}",
                        class, platform_index, err
                    );
                    continue;
                }
            };
            if let Some(index) = devices.iter().position(|d| backend.is_usable(d)) {
                debug!(
                    "selected {} device {} of {} on platform {}",
                    class,
                    index,
                    devices.len(),
                    platform_index
                );
                return Ok(Selection {
                    devices,
                    index,
                    class,
                });
            }
        }
    }

    Err(Error::DeviceNotFound)
}
