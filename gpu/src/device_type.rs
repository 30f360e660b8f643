//! Device classes and the target-device mask.

use std::fmt;
use std::str::FromStr;

bitflags::bitflags! {
    /// Bit set of device classes, using the compute API's own values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceType: u64 {
        const DEFAULT = 1 << 0;
        const CPU = 1 << 1;
        const GPU = 1 << 2;
        const ACCELERATOR = 1 << 3;
        const ALL = 0xFFFF_FFFF;
    }
}

/// Largest raw mask accepted besides `ALL`.
const KNOWN_CLASSES: u64 = DeviceType::DEFAULT.bits()
    | DeviceType::CPU.bits()
    | DeviceType::GPU.bits()
    | DeviceType::ACCELERATOR.bits();

impl DeviceType {
    /// Classes are probed in this order when selecting a device.
    pub const SEARCH_ORDER: [DeviceType; 3] =
        [DeviceType::ACCELERATOR, DeviceType::GPU, DeviceType::CPU];

    /// Validate a raw mask. `ALL` and anything up to the four known bits is
    /// accepted, zero included.
    pub fn from_raw(raw: u64) -> Option<Self> {
        if raw == DeviceType::ALL.bits() || raw <= KNOWN_CLASSES {
            Some(DeviceType::from_bits_retain(raw))
        } else {
            None
        }
    }

    /// Whether a search for `class` devices is allowed by this target.
    pub fn admits(self, class: DeviceType) -> bool {
        self == DeviceType::ALL || self.intersects(DeviceType::DEFAULT | class)
    }
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::ALL
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == DeviceType::ALL {
            return f.write_str("all");
        }
        if self.is_empty() {
            return f.write_str("none");
        }
        let names = [
            (DeviceType::DEFAULT, "default"),
            (DeviceType::CPU, "cpu"),
            (DeviceType::GPU, "gpu"),
            (DeviceType::ACCELERATOR, "accelerator"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Unrecognized device class name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device type `{0}` (expected cpu, gpu or accelerator)")]
pub struct UnknownDeviceType(pub String);

impl FromStr for DeviceType {
    type Err = UnknownDeviceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(DeviceType::CPU),
            "gpu" => Ok(DeviceType::GPU),
            "accelerator" => Ok(DeviceType::ACCELERATOR),
            other => Err(UnknownDeviceType(other.to_string())),
        }
    }
}
