//! Verbatim Hardware Abstraction Layer
//!
//! The seams between the dispatch core and the outside world:
//!
//! - [`TaskService`]: the remote execution fabric (`submit`, `submit_batch`,
//!   `state`, `fetch_raw_samples`).
//! - [`LocalExecutor`]: an in-process target that returns samples directly.
//! - [`Registers`]: the bit/float/complex register triple results are
//!   assembled into.
//! - [`Measurement`]: a program of circuits plus the evaluator reducing
//!   their registers to named values.
//!
//! # Implementing a Task Service
//!
//! ```ignore
//! use async_trait::async_trait;
//! use verbatim_hal::{HalResult, RawSamples, TaskHandle, TaskRequest, TaskService, TaskState};
//!
//! struct MyService;
//!
//! #[async_trait]
//! impl TaskService for MyService {
//!     fn name(&self) -> &str { "my_service" }
//!
//!     async fn submit(&self, request: &TaskRequest) -> HalResult<TaskHandle> {
//!         // Hand request.source to the device
//!         # todo!()
//!     }
//!
//!     async fn state(&self, handle: &TaskHandle) -> HalResult<TaskState> {
//!         # todo!()
//!     }
//!
//!     async fn fetch_raw_samples(&self, handle: &TaskHandle) -> HalResult<RawSamples> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod measurement;
pub mod registers;
pub mod service;
pub mod task;

pub use error::{HalError, HalResult};
pub use measurement::{ClassicalRegister, Measurement, MeasurementKind};
pub use registers::{BitRegisters, ComplexRegisters, FloatRegisters, Registers};
pub use service::{LocalExecutor, OfflineTaskService, TaskService};
pub use task::{BatchHandle, RawSamples, TaskHandle, TaskId, TaskRequest, TaskState};
