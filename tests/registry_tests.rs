use chrono::NaiveDate;
use pharmawatch::registry::{seed::seed_reports, ReportRegistry};
use pharmawatch::report::{CompletenessField, DraftReport, ReportStatus, Severity};

fn received() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 23).unwrap()
}

fn registry_with_seed() -> ReportRegistry {
    ReportRegistry::with_reports(seed_reports(received()))
}

fn submitted_draft() -> DraftReport {
    let mut draft = DraftReport::default();
    draft.patient.patient_name = Some("Никитина Дарья Олеговна".into());
    draft.medication.trade_name = Some("Омепразол".into());
    draft.adverse_effect.effect_description = Some("Головная боль".into());
    draft.adverse_effect.severity = Some(Severity::Mild);
    draft
}

#[test]
fn confirm_is_a_no_op_outside_analysis() {
    let mut registry = registry_with_seed();
    let incoming_id = registry
        .reports()
        .iter()
        .find(|r| r.status == ReportStatus::Incoming)
        .map(|r| r.id.clone())
        .unwrap();

    let before = registry.get(&incoming_id).unwrap().clone();
    assert!(!registry.confirm(&incoming_id).unwrap());
    assert_eq!(registry.get(&incoming_id).unwrap(), &before);
    assert!(!registry.just_confirmed(&incoming_id));
}

#[test]
fn confirm_in_analysis_sets_both_flags() {
    let mut registry = registry_with_seed();
    let analysis_id = registry
        .reports()
        .iter()
        .find(|r| r.status == ReportStatus::Analysis)
        .map(|r| r.id.clone())
        .unwrap();

    assert!(registry.confirm(&analysis_id).unwrap());
    assert!(registry.get(&analysis_id).unwrap().confirmed);
    assert!(registry.just_confirmed(&analysis_id));
}

#[test]
fn leaving_analysis_resets_the_ephemeral_marker_only() {
    let mut registry = registry_with_seed();
    let analysis_id = registry
        .reports()
        .iter()
        .find(|r| r.status == ReportStatus::Analysis)
        .map(|r| r.id.clone())
        .unwrap();

    registry.confirm(&analysis_id).unwrap();
    registry
        .set_status(&analysis_id, ReportStatus::Clarification)
        .unwrap();

    let report = registry.get(&analysis_id).unwrap();
    assert_eq!(report.status, ReportStatus::Clarification);
    assert!(report.confirmed, "audit flag persists");
    assert!(!registry.just_confirmed(&analysis_id), "ephemeral marker resets");
}

#[test]
fn same_status_transition_is_a_no_op() {
    let mut registry = registry_with_seed();
    let analysis_id = registry
        .reports()
        .iter()
        .find(|r| r.status == ReportStatus::Analysis)
        .map(|r| r.id.clone())
        .unwrap();

    registry.confirm(&analysis_id).unwrap();
    registry
        .set_status(&analysis_id, ReportStatus::Analysis)
        .unwrap();
    assert!(registry.just_confirmed(&analysis_id));
}

#[test]
fn completeness_toggle_flips_exactly_one_check() {
    let mut registry = registry_with_seed();
    let id = registry.reports()[0].id.clone();
    let before = registry.get(&id).unwrap().completeness;

    registry
        .toggle_completeness(&id, CompletenessField::Outcome)
        .unwrap();
    let after = registry.get(&id).unwrap().completeness;
    assert_ne!(before.outcome, after.outcome);
    assert_eq!(before.patient_info, after.patient_info);
    assert_eq!(before.severity, after.severity);
}

#[test]
fn submission_appends_after_the_seed_ids() {
    let mut registry = registry_with_seed();
    let total_before = registry.len();
    let report = registry.submit(submitted_draft(), received());

    assert_eq!(registry.len(), total_before + 1);
    assert_eq!(report.status, ReportStatus::Incoming);
    assert_eq!(report.id, "2025-0007");
    assert_eq!(report.medication_name, "Омепразол");
    assert!(report.completeness.patient_info);
    assert!(report.completeness.severity);
    assert!(!report.completeness.doctor_info);
    assert!(report.full_data.is_some());
}

#[test]
fn medication_names_are_unique_in_first_seen_order() {
    let registry = registry_with_seed();
    let names = registry.medication_names();
    assert_eq!(names[0], "Парацетамол");
    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), names.len());
}
