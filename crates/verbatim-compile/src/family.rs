//! Device families with a verbatim translator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use verbatim_ir::Circuit;

use crate::error::CompileResult;
use crate::native::NativeBlock;
use crate::translate::{IonQTranslator, IqmTranslator, OqcTranslator, RigettiTranslator, Translator};

/// Hardware families whose native gate sets we can target directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFamily {
    /// Trapped-ion devices: `gpi`, `gpi2`, `ms`.
    IonQ,
    /// Superconducting devices with fixed octagon numbering: `rx`, `rz`, `cz`, `cphaseshift`, `xy`.
    Rigetti,
    /// Superconducting devices: `rz`, `v`, `x`, `ecr`.
    Oqc,
    /// Superconducting devices: `prx`, `cz`.
    Iqm,
}

static IONQ: IonQTranslator = IonQTranslator;
static RIGETTI: RigettiTranslator = RigettiTranslator;
static OQC: OqcTranslator = OqcTranslator;
static IQM: IqmTranslator = IqmTranslator;

impl DeviceFamily {
    /// All families.
    pub const ALL: [DeviceFamily; 4] = [
        DeviceFamily::IonQ,
        DeviceFamily::Rigetti,
        DeviceFamily::Oqc,
        DeviceFamily::Iqm,
    ];

    /// Detect the family from a device identifier (ARN or friendly name).
    ///
    /// Matches provider names and the device names used on Braket
    /// (`Aspen`, `Ankaa`, `Lucy`, `Garnet`).
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let id = identifier.to_lowercase();
        if id.contains("ionq") {
            Some(DeviceFamily::IonQ)
        } else if id.contains("rigetti") || id.contains("aspen") || id.contains("ankaa") {
            Some(DeviceFamily::Rigetti)
        } else if id.contains("oqc") || id.contains("lucy") {
            Some(DeviceFamily::Oqc)
        } else if id.contains("iqm") || id.contains("garnet") {
            Some(DeviceFamily::Iqm)
        } else {
            None
        }
    }

    /// The translator for this family.
    pub fn translator(self) -> &'static dyn Translator {
        match self {
            DeviceFamily::IonQ => &IONQ,
            DeviceFamily::Rigetti => &RIGETTI,
            DeviceFamily::Oqc => &OQC,
            DeviceFamily::Iqm => &IQM,
        }
    }

    /// Translate `circuit` into a verbatim block for this family.
    pub fn translate(self, circuit: &Circuit) -> CompileResult<NativeBlock> {
        self.translator().translate(circuit)
    }

    /// Whether `rz` rotations are folded into neighbouring gates rather than emitted.
    pub fn folds_phases(self) -> bool {
        matches!(self, DeviceFamily::IonQ | DeviceFamily::Iqm)
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceFamily::IonQ => write!(f, "ionq"),
            DeviceFamily::Rigetti => write!(f, "rigetti"),
            DeviceFamily::Oqc => write!(f, "oqc"),
            DeviceFamily::Iqm => write!(f, "iqm"),
        }
    }
}

impl FromStr for DeviceFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ionq" => Ok(DeviceFamily::IonQ),
            "rigetti" => Ok(DeviceFamily::Rigetti),
            "oqc" => Ok(DeviceFamily::Oqc),
            "iqm" => Ok(DeviceFamily::Iqm),
            other => Err(format!("unknown device family: {other}")),
        }
    }
}
