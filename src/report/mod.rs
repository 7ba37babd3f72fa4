//! Report domain models: submitted case records, wizard drafts, attachments.

pub mod attachment;
pub mod draft;
pub mod record;

pub use attachment::{
    AttachmentPolicy, FileAttachment, FileCandidate, IntakeOutcome, MediaType, RejectReason,
    RejectedFile, MAX_ATTACHMENT_BYTES,
};
pub use draft::{
    AdverseEffectSection, DoctorSection, DraftPatch, DraftReport, FilesSection, MedicationSection,
    PatientSection,
};
pub use record::{
    CausalityAssessment, Completeness, CompletenessField, Outcome, Report, ReportStatus, Severity,
};
