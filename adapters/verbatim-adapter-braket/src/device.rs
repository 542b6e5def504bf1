//! Known Braket devices and identifier helpers.
//!
//! Identifiers are either full ARNs, friendly names mapped by
//! [`arn_for_name`], or the names of in-process simulators.

use verbatim_compile::DeviceFamily;

// ──────────────────────────────────────────────────────────────────────
// Known device ARNs
// ──────────────────────────────────────────────────────────────────────

/// Rigetti Ankaa-3 (84 qubits, superconducting).
pub const RIGETTI_ANKAA_3: &str = "arn:aws:braket:us-west-1::device/qpu/rigetti/Ankaa-3";

/// Rigetti Aspen-M-3 (79 qubits, superconducting).
pub const RIGETTI_ASPEN_M_3: &str = "arn:aws:braket:us-west-1::device/qpu/rigetti/Aspen-M-3";

/// IonQ Aria (25 qubits, trapped-ion).
pub const IONQ_ARIA: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-1";

/// IonQ Aria 2 (25 qubits, trapped-ion).
pub const IONQ_ARIA_2: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-2";

/// IonQ Forte (36 qubits, trapped-ion).
pub const IONQ_FORTE: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Forte-1";

/// IQM Garnet (20 qubits, superconducting).
pub const IQM_GARNET: &str = "arn:aws:braket:eu-north-1::device/qpu/iqm/Garnet";

/// OQC Lucy (8 qubits, superconducting).
pub const OQC_LUCY: &str = "arn:aws:braket:eu-west-2::device/qpu/oqc/Lucy";

/// SV1 state vector simulator.
pub const SV1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/sv1";

/// TN1 tensor network simulator.
pub const TN1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/tn1";

/// DM1 density matrix simulator.
pub const DM1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/dm1";

/// Managed simulators that run remotely but cost no hardware time.
pub const REMOTE_SIMULATORS: [&str; 3] = [SV1, TN1, DM1];

/// Names of in-process simulators.
pub const LOCAL_SIMULATORS: [&str; 3] = ["braket_sv", "braket_dm", "braket_ahs"];

/// Prefix marking any identifier as an in-process simulator.
pub const LOCAL_PREFIX: &str = "local:";

/// Whether `identifier` names an in-process simulator.
pub fn is_local_simulator(identifier: &str) -> bool {
    identifier.starts_with(LOCAL_PREFIX) || LOCAL_SIMULATORS.contains(&identifier)
}

/// Whether `identifier` is a managed remote simulator (ARN or friendly name).
pub fn is_remote_simulator(identifier: &str) -> bool {
    let arn = resolve_arn(identifier);
    REMOTE_SIMULATORS.contains(&arn.as_str())
}

/// Map a friendly device name to its ARN.
pub fn arn_for_name(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "rigetti" | "ankaa" | "ankaa-3" | "ankaa3" => Some(RIGETTI_ANKAA_3),
        "aspen" | "aspen-m-3" => Some(RIGETTI_ASPEN_M_3),
        "ionq" | "aria" | "aria-1" => Some(IONQ_ARIA),
        "aria-2" => Some(IONQ_ARIA_2),
        "forte" | "forte-1" => Some(IONQ_FORTE),
        "iqm" | "garnet" | "iqm-garnet" => Some(IQM_GARNET),
        "oqc" | "lucy" | "oqc-lucy" => Some(OQC_LUCY),
        "sv1" | "braket-sv1" => Some(SV1),
        "tn1" | "braket-tn1" => Some(TN1),
        "dm1" | "braket-dm1" => Some(DM1),
        _ => None,
    }
}

/// The ARN for `identifier`: friendly names are mapped, anything else is
/// returned unchanged.
pub fn resolve_arn(identifier: &str) -> String {
    arn_for_name(identifier).map_or_else(|| identifier.to_string(), str::to_string)
}

/// Extract provider name from a device ARN.
pub fn provider_from_arn(device_arn: &str) -> &str {
    // ARN format: arn:aws:braket:<region>::device/<type>/<provider>/<device>
    device_arn.split('/').nth(2).unwrap_or("unknown")
}

/// Extract the region from a device or task ARN; empty for global simulators.
pub fn region_from_arn(arn: &str) -> Option<&str> {
    arn.split(':').nth(3).filter(|region| !region.is_empty())
}

/// Verbatim family of a device identifier, if any.
pub fn family_for_device(identifier: &str) -> Option<DeviceFamily> {
    DeviceFamily::from_identifier(&resolve_arn(identifier))
}
