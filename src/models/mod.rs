//! # Data Model
//!
//! The submission record and its validated payload snapshot. The
//! [`Submission`] is the single durable entity of the pipeline: created by the
//! orchestrator at saga start, mutated only through the store's typed write
//! path, never deleted by this crate.

pub mod payload;
pub mod submission;

pub use payload::{
    Attachment, BillingInfo, ProductLine, ReferenceLink, Region, RequestCategory,
    SubmissionPayload, Submitter, ValueBracket,
};
pub use submission::{
    ErrorDetail, FolderOutput, NewSubmission, StepOutputs, Submission, TaskOutput, UploadedFile,
};
