//! In-memory report collection: submission handoff, status transitions,
//! confirmation, and completeness toggles.

pub mod filter;
pub mod seed;

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::errors::IntakeError;
use crate::report::{Completeness, DraftReport, Report, ReportStatus};

pub use filter::{tab_counts, visible, DateFilter, FilterCriteria, MedicationFilter, SeverityFilter};

/// Owns the dashboard's report collection. Insertion order is preserved; the
/// filter engine never re-sorts. Alongside the persisted records it tracks
/// the ephemeral "just confirmed" markers that clear when a report leaves
/// Analysis.
#[derive(Debug, Default)]
pub struct ReportRegistry {
    reports: Vec<Report>,
    just_confirmed: HashSet<String>,
    next_seq: u32,
}

impl ReportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reports(reports: Vec<Report>) -> Self {
        Self {
            reports,
            just_confirmed: HashSet::new(),
            next_seq: 1,
        }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|report| report.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Report, IntakeError> {
        self.reports
            .iter_mut()
            .find(|report| report.id == id)
            .ok_or_else(|| IntakeError::ReportNotFound(id.to_string()))
    }

    /// Unique medication names for the dashboard filter dropdown, in first
    /// appearance order.
    pub fn medication_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.reports
            .iter()
            .filter(|report| seen.insert(report.medication_name.clone()))
            .map(|report| report.medication_name.clone())
            .collect()
    }

    /// Handoff contract for a finalized wizard draft: assigns the first
    /// available opaque id, copies the draft into a new Incoming record, and
    /// appends it. The draft itself travels along as `full_data`. Returns a
    /// copy of the stored record.
    pub fn submit(&mut self, draft: DraftReport, received: NaiveDate) -> Report {
        let id = self.allocate_id(received.year());
        let patient_id = format!("P-{:04}", self.next_seq);

        let mut report = Report::new(
            id.clone(),
            ReportStatus::Incoming,
            draft.patient.patient_name.clone().unwrap_or_default(),
            patient_id,
            draft.medication.trade_name.clone().unwrap_or_default(),
            draft
                .adverse_effect
                .effect_description
                .clone()
                .unwrap_or_default(),
            received,
        );
        report.severity = draft.adverse_effect.severity;
        report.causality_assessment = draft.adverse_effect.causality_assessment;
        report.description = draft.files.additional_info.clone();
        report.completeness = completeness_of(&draft);
        report.full_data = Some(draft);

        info!(id = %id, "report submitted to the review queue");
        self.reports.push(report.clone());
        report
    }

    /// Replaces the report's status, leaving every other field untouched.
    /// A no-op when the status is unchanged. Moving away from Analysis clears
    /// the ephemeral just-confirmed marker; the persisted `confirmed` flag is
    /// part of the audit record and stays.
    pub fn set_status(&mut self, id: &str, new_status: ReportStatus) -> Result<(), IntakeError> {
        let report = self.get_mut(id)?;
        if report.status == new_status {
            return Ok(());
        }
        let previous = report.status;
        report.status = new_status;
        if new_status != ReportStatus::Analysis {
            self.just_confirmed.remove(id);
        }
        info!(id, %previous, %new_status, "report status changed");
        Ok(())
    }

    /// Confirms a report's assessment. Permitted only while the report is in
    /// Analysis; otherwise nothing changes and `false` is returned. The CLI
    /// only offers the action in Analysis, so the guard is a backstop.
    pub fn confirm(&mut self, id: &str) -> Result<bool, IntakeError> {
        let report = self.get_mut(id)?;
        if report.status != ReportStatus::Analysis {
            debug!(id, status = %report.status, "confirm ignored outside Analysis");
            return Ok(false);
        }
        report.confirmed = true;
        self.just_confirmed.insert(id.to_string());
        info!(id, "report confirmed");
        Ok(true)
    }

    /// Whether the report was confirmed and has not left Analysis since.
    pub fn just_confirmed(&self, id: &str) -> bool {
        self.just_confirmed.contains(id)
    }

    /// Flips one completeness check. Checks are independent; no cross-field
    /// validation happens here.
    pub fn toggle_completeness(
        &mut self,
        id: &str,
        field: crate::report::CompletenessField,
    ) -> Result<(), IntakeError> {
        let report = self.get_mut(id)?;
        report.completeness.toggle(field);
        Ok(())
    }

    /// Finds the lowest unused `{year}-{NNNN}` display id.
    fn allocate_id(&mut self, year: i32) -> String {
        loop {
            if self.next_seq == 0 {
                self.next_seq = 1;
            }
            let candidate = format!("{year}-{:04}", self.next_seq);
            self.next_seq = self.next_seq.wrapping_add(1);
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

/// Derives the initial review checklist from which draft fields arrived
/// filled in.
fn completeness_of(draft: &DraftReport) -> Completeness {
    let has_text = |value: &Option<String>| {
        value
            .as_deref()
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false)
    };
    Completeness {
        patient_info: has_text(&draft.patient.patient_name),
        doctor_info: has_text(&draft.doctor.doctor_name),
        medication_start_date: draft.medication.start_date.is_some(),
        medication_end_date: draft.medication.end_date.is_some(),
        medication_batch: has_text(&draft.medication.batch_number),
        effect_date: draft.adverse_effect.effect_date.is_some(),
        effect_description: has_text(&draft.adverse_effect.effect_description),
        severity: draft.adverse_effect.severity.is_some(),
        outcome: draft.adverse_effect.outcome.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    fn sample_draft() -> DraftReport {
        let mut draft = DraftReport::default();
        draft.patient.patient_name = Some("Иванова Мария Петровна".into());
        draft.doctor.doctor_name = Some("Петров П. П.".into());
        draft.medication.trade_name = Some("Парацетамол".into());
        draft.medication.batch_number = Some("A-2210".into());
        draft.adverse_effect.effect_description = Some("Кожная сыпь и зуд".into());
        draft.adverse_effect.severity = Some(Severity::Mild);
        draft
    }

    #[test]
    fn submit_assigns_sequential_ids_and_incoming_status() {
        let mut registry = ReportRegistry::new();
        let received = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        let first_id = registry.submit(sample_draft(), received).id.clone();
        let second_id = registry.submit(sample_draft(), received).id.clone();

        assert_eq!(first_id, "2025-0001");
        assert_eq!(second_id, "2025-0002");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&first_id).unwrap().status, ReportStatus::Incoming);
    }

    #[test]
    fn submit_skips_ids_already_taken_by_seed_data() {
        let received = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        let seeded = Report::new(
            "2025-0001",
            ReportStatus::Incoming,
            "Смирнов",
            "P-0001",
            "Аспирин",
            "Крапивница",
            received,
        );
        let mut registry = ReportRegistry::with_reports(vec![seeded]);
        let id = registry.submit(sample_draft(), received).id.clone();
        assert_eq!(id, "2025-0002");
    }

    #[test]
    fn submit_derives_the_completeness_checklist() {
        let mut registry = ReportRegistry::new();
        let received = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        let report = registry.submit(sample_draft(), received);
        assert!(report.completeness.patient_info);
        assert!(report.completeness.medication_batch);
        assert!(report.completeness.severity);
        assert!(!report.completeness.medication_start_date);
        assert!(!report.completeness.outcome);
    }

    #[test]
    fn set_status_touches_only_the_status_field() {
        let mut registry = ReportRegistry::new();
        let received = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        let id = registry.submit(sample_draft(), received).id.clone();
        let before = registry.get(&id).unwrap().clone();

        registry.set_status(&id, ReportStatus::Analysis).unwrap();
        let after = registry.get(&id).unwrap();
        assert_eq!(after.status, ReportStatus::Analysis);
        assert_eq!(after.patient_name, before.patient_name);
        assert_eq!(after.completeness, before.completeness);
        assert_eq!(after.confirmed, before.confirmed);
    }

    #[test]
    fn unknown_report_ids_surface_as_errors() {
        let mut registry = ReportRegistry::new();
        let result = registry.set_status("2025-9999", ReportStatus::Analysis);
        assert!(matches!(result, Err(IntakeError::ReportNotFound(_))));
    }
}
