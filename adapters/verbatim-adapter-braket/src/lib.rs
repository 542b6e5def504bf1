//! Verbatim adapter for AWS Braket
//!
//! Plans circuits for Braket devices, submits them (optionally as native
//! gates inside a `#pragma braket verbatim` box), and turns the raw samples
//! of finished tasks into typed registers.
//!
//! ```text
//!   Circuit ──→ plan ──→ ExecutionGateway ──→ QueuedCircuitRun ──poll──→ Registers
//!                │                                   │
//!        verbatim_compile                    QueuedProgramRun ──→ Measurement::evaluate
//! ```
//!
//! # Supported Devices
//!
//! | Device | Provider | Verbatim family |
//! |--------|----------|-----------------|
//! | Rigetti Ankaa-3, Aspen-M-3 | Rigetti | `rigetti` |
//! | IonQ Aria, Forte | IonQ | `ionq` |
//! | IQM Garnet | IQM | `iqm` |
//! | OQC Lucy | OQC | `oqc` |
//! | Amazon SV1, TN1, DM1 | Amazon | none |
//! | `braket_sv`, `braket_dm`, `braket_ahs`, `local:*` | local | none |
//!
//! Hardware devices are refused unless `allow_hardware` is set, and then
//! `max_shots` and `max_circuit_length` are enforced before submission.
//!
//! # Authentication
//!
//! AWS credentials are loaded from the standard AWS credential chain:
//! environment variables, shared config, SSO, or IAM role.
//!
//! Required environment variables:
//! - `VERBATIM_BRAKET_S3_BUCKET`: S3 bucket for storing task results
//!
//! Optional environment variables:
//! - `VERBATIM_BRAKET_S3_PREFIX`: S3 key prefix (default: `"verbatim-results"`)
//! - `AWS_REGION`: AWS region (default: `"us-east-1"`)
//!
//! # Example
//!
//! ```ignore
//! use verbatim_adapter_braket::{BraketBackend, BraketConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BraketConfig::load(Some("verbatim.yaml"))?;
//!     let backend = BraketBackend::connect(config).await?;
//!
//!     // Submit now, resume later.
//!     let run = backend.run_circuit_queued(&circuit).await?;
//!     std::fs::write("run.json", run.to_json()?)?;
//!
//!     let mut run = QueuedCircuitRun::from_json(&std::fs::read_to_string("run.json")?)?;
//!     if let Some(registers) = run.poll(backend.service()).await? {
//!         println!("{:?}", registers.bit["ro"]);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod assemble;
mod backend;
pub mod config;
pub mod device;
mod error;
pub mod gateway;
pub mod planner;
pub mod queued;

pub use api::BraketClient;
pub use assemble::assemble;
pub use backend::{BraketBackend, measurement_circuits};
pub use config::{BraketConfig, ConfigError, TranslationMode};
pub use error::{BraketError, BraketResult, LimitKind};
pub use gateway::{DeviceHandle, ExecutionGateway, select_device};
pub use planner::{CircuitMetadata, PlannedCircuit, Program, StaticBits, plan};
pub use queued::{PollPolicy, ProgramOutcome, QueuedCircuitRun, QueuedProgramRun, TaskRef};

// Re-export common types
pub use verbatim_hal::{Measurement, Registers, TaskService};
