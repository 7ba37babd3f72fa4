//! Session-scoped wizard controller: one draft, one state, one writer.

use tracing::{debug, info};

use crate::report::{DraftPatch, DraftReport};
use crate::wizard::state::{StepMark, WizardState, WizardStep};

/// Owns the accumulating draft and the step state for one intake session.
/// Callers validate a step before handing its patch to [`WizardController::next`];
/// matching the intake form's behavior, the merge itself is applied on every
/// submit attempt and gating lives at the call site.
#[derive(Debug, Clone, Default)]
pub struct WizardController {
    draft: DraftReport,
    state: WizardState,
}

impl WizardController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &DraftReport {
        &self.draft
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> WizardStep {
        self.state.current()
    }

    pub fn marks(&self) -> Vec<(WizardStep, StepMark)> {
        self.state.marks()
    }

    /// Merges one step's fields into the draft and moves forward. On the
    /// final step the merge still applies but the step does not advance;
    /// use [`WizardController::submit`] there.
    pub fn next(&mut self, patch: DraftPatch) {
        self.draft = self.draft.merge(&patch);
        debug!(step = self.state.current().id(), "wizard step completed");
        self.state.advance();
    }

    pub fn back(&mut self) {
        self.state.retreat();
    }

    pub fn skip_to_files(&mut self) {
        self.state.skip_to_files();
    }

    pub fn skip_to_last(&mut self) {
        self.state.skip_to_last();
    }

    pub fn go_back_to_first(&mut self) {
        self.state.go_back_to_first();
    }

    /// Finalizes the session: merges the last patch, emits the completed
    /// draft, and resets both draft and state for the next report.
    pub fn submit(&mut self, patch: DraftPatch) -> DraftReport {
        let finalized = self.draft.merge(&patch);
        info!("intake wizard submitted a draft report");
        self.draft = DraftReport::default();
        self.state.reset();
        finalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{FilesSection, PatientSection};

    fn patient_patch(name: &str) -> DraftPatch {
        DraftPatch::Patient(PatientSection {
            patient_name: Some(name.into()),
            ..PatientSection::default()
        })
    }

    #[test]
    fn next_merges_and_advances() {
        let mut controller = WizardController::new();
        controller.next(patient_patch("Иванова"));
        assert_eq!(controller.current_step(), WizardStep::Doctor);
        assert_eq!(
            controller.draft().patient.patient_name.as_deref(),
            Some("Иванова")
        );
    }

    #[test]
    fn submit_emits_the_merged_draft_and_resets() {
        let mut controller = WizardController::new();
        controller.next(patient_patch("Иванова"));
        controller.skip_to_last();

        let finalized = controller.submit(DraftPatch::Files(FilesSection {
            additional_info: Some("Без дополнений".into()),
            ..FilesSection::default()
        }));

        assert_eq!(finalized.patient.patient_name.as_deref(), Some("Иванова"));
        assert_eq!(
            finalized.files.additional_info.as_deref(),
            Some("Без дополнений")
        );
        assert_eq!(controller.current_step(), WizardStep::Patient);
        assert!(controller.state().skipped().is_empty());
        assert_eq!(controller.draft().patient.patient_name, None);
    }

    #[test]
    fn back_from_files_with_skips_restarts_the_sequence() {
        let mut controller = WizardController::new();
        controller.next(patient_patch("Иванова"));
        controller.skip_to_last();
        controller.back();
        assert_eq!(controller.current_step(), WizardStep::Patient);
        assert!(controller.state().skipped().is_empty());
        // The draft survives the undo-skip; only navigation resets.
        assert_eq!(
            controller.draft().patient.patient_name.as_deref(),
            Some("Иванова")
        );
    }
}
