//! Peri-operative cardiac device programming

use crate::record::{CardiacDevice, DeviceType, PaceDependency};
use crate::tables::{ASYNCHRONOUS_PACING_RATE_BPM, BACKUP_PACING_RATE_BPM};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PacingMode {
    /// Asynchronous ventricular pacing
    Voo,
    /// Inhibited ventricular backup pacing
    Vvi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DeviceMode {
    NoDevice,
    TypeUnspecified,
    DependencyUnspecified {
        device_type: DeviceType,
    },
    Program {
        device_type: DeviceType,
        mode: PacingMode,
        rate_bpm: u32,
        disable_tachy_therapies: bool,
    },
}

/// Total over every input; unrecognized type or dependency yields an unspecified mode
pub fn select_device_mode(device: Option<&CardiacDevice>) -> DeviceMode {
    let Some(device) = device else {
        return DeviceMode::NoDevice;
    };
    if !device.device_type.is_specified() {
        return DeviceMode::TypeUnspecified;
    }

    let (mode, rate_bpm) = match device.pace_dependency {
        PaceDependency::Dependent => (PacingMode::Voo, ASYNCHRONOUS_PACING_RATE_BPM),
        PaceDependency::NotDependent => (PacingMode::Vvi, BACKUP_PACING_RATE_BPM),
        PaceDependency::Unspecified => {
            return DeviceMode::DependencyUnspecified {
                device_type: device.device_type,
            };
        }
    };

    DeviceMode::Program {
        device_type: device.device_type,
        mode,
        rate_bpm,
        disable_tachy_therapies: matches!(device.device_type, DeviceType::Icd | DeviceType::Crt),
    }
}

impl DeviceMode {
    pub fn note(&self) -> Option<String> {
        match self {
            Self::NoDevice => None,
            Self::TypeUnspecified => Some("Device: type not specified.".to_string()),
            Self::DependencyUnspecified { device_type } => Some(format!(
                "Device: {}. Pacing dependency not specified.",
                device_label(*device_type)
            )),
            Self::Program {
                device_type,
                mode,
                rate_bpm,
                disable_tachy_therapies,
            } => {
                let dependency = match mode {
                    PacingMode::Voo => "Pacing dependent",
                    PacingMode::Vvi => "Not pacing dependent",
                };
                let mode = match mode {
                    PacingMode::Voo => "VOO",
                    PacingMode::Vvi => "VVI",
                };
                let tachy = if *disable_tachy_therapies {
                    "disable tachy-therapies and "
                } else {
                    ""
                };
                Some(format!(
                    "Device: {}. {dependency}: {tachy}program {mode} {rate_bpm} bpm for the peri-operative period.",
                    device_label(*device_type)
                ))
            }
        }
    }
}

fn device_label(device_type: DeviceType) -> &'static str {
    match device_type {
        DeviceType::Pacemaker => "Permanent pacemaker",
        DeviceType::Icd => "ICD",
        DeviceType::Crt => "CRT",
        DeviceType::Unspecified => "unspecified",
    }
}
