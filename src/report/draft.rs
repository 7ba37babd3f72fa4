//! In-progress report drafts assembled across the wizard steps.
//!
//! Each step owns one section struct whose fields are all optional. A section
//! patch overwrites only the fields it carries; everything else keeps its
//! prior value, so partial entry and back-navigation never lose data.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::report::attachment::FileAttachment;
use crate::report::record::{CausalityAssessment, Outcome, Severity};

/// Overwrites `target` fields with the `Some` fields of `patch`.
macro_rules! adopt {
    ($target:expr, $patch:expr, [$($field:ident),+ $(,)?]) => {
        $(
            if $patch.$field.is_some() {
                $target.$field = $patch.$field.clone();
            }
        )+
    };
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientSection {
    pub patient_name: Option<String>,
    pub patient_gender: Option<String>,
    pub patient_age: Option<String>,
    pub patient_birth_date: Option<NaiveDate>,
    pub patient_weight: Option<String>,
    pub primary_diagnosis: Option<String>,
    pub comorbidities: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DoctorSection {
    pub doctor_name: Option<String>,
    pub doctor_position: Option<String>,
    pub doctor_specialty: Option<String>,
    pub medical_institution: Option<String>,
    pub doctor_phone: Option<String>,
    pub doctor_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationSection {
    pub trade_name: Option<String>,
    pub inn_name: Option<String>,
    pub dosage_form: Option<String>,
    pub dosage: Option<String>,
    pub dosage_unit: Option<String>,
    pub frequency: Option<String>,
    pub administration_route: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub prescription_reason: Option<String>,
    pub batch_number: Option<String>,
    pub manufacturer: Option<String>,
}

impl Default for MedicationSection {
    fn default() -> Self {
        Self {
            trade_name: None,
            inn_name: None,
            dosage_form: None,
            dosage: None,
            // Milligrams are pre-selected on the intake form.
            dosage_unit: Some("мг".into()),
            frequency: None,
            administration_route: None,
            start_date: None,
            end_date: None,
            prescription_reason: None,
            batch_number: None,
            manufacturer: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdverseEffectSection {
    pub effect_date: Option<NaiveDate>,
    pub effect_time: Option<NaiveTime>,
    pub effect_description: Option<String>,
    pub effect_localization: Option<String>,
    pub severity: Option<Severity>,
    pub severity_criteria: Option<String>,
    pub actions_taken: Option<Vec<String>>,
    pub treatment_description: Option<String>,
    pub outcome: Option<Outcome>,
    pub outcome_date: Option<NaiveDate>,
    /// "yes" / "no" as selected on the form.
    pub previous_reactions: Option<String>,
    pub previous_reactions_description: Option<String>,
    pub causality_assessment: Option<CausalityAssessment>,
    pub causality_factors: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilesSection {
    pub attachments: Option<Vec<FileAttachment>>,
    /// Free-text description per attached file name.
    pub file_descriptions: Option<BTreeMap<String, String>>,
    pub additional_info: Option<String>,
}

/// One step's worth of collected fields, ready to merge into the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftPatch {
    Patient(PatientSection),
    Doctor(DoctorSection),
    Medication(MedicationSection),
    AdverseEffect(AdverseEffectSection),
    Files(FilesSection),
}

/// Accumulating draft of a not-yet-submitted adverse-effect report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DraftReport {
    pub patient: PatientSection,
    pub doctor: DoctorSection,
    pub medication: MedicationSection,
    pub adverse_effect: AdverseEffectSection,
    pub files: FilesSection,
}

impl DraftReport {
    /// Returns a new draft with every field present in `patch` overwritten and
    /// every absent field retained. Never removes a value. No validation —
    /// that is the step validators' job.
    pub fn merge(&self, patch: &DraftPatch) -> DraftReport {
        let mut next = self.clone();
        match patch {
            DraftPatch::Patient(section) => {
                adopt!(
                    next.patient,
                    section,
                    [
                        patient_name,
                        patient_gender,
                        patient_age,
                        patient_birth_date,
                        patient_weight,
                        primary_diagnosis,
                        comorbidities,
                    ]
                );
            }
            DraftPatch::Doctor(section) => {
                adopt!(
                    next.doctor,
                    section,
                    [
                        doctor_name,
                        doctor_position,
                        doctor_specialty,
                        medical_institution,
                        doctor_phone,
                        doctor_email,
                    ]
                );
            }
            DraftPatch::Medication(section) => {
                adopt!(
                    next.medication,
                    section,
                    [
                        trade_name,
                        inn_name,
                        dosage_form,
                        dosage,
                        dosage_unit,
                        frequency,
                        administration_route,
                        start_date,
                        end_date,
                        prescription_reason,
                        batch_number,
                        manufacturer,
                    ]
                );
            }
            DraftPatch::AdverseEffect(section) => {
                adopt!(
                    next.adverse_effect,
                    section,
                    [
                        effect_date,
                        effect_time,
                        effect_description,
                        effect_localization,
                        severity,
                        severity_criteria,
                        actions_taken,
                        treatment_description,
                        outcome,
                        outcome_date,
                        previous_reactions,
                        previous_reactions_description,
                        causality_assessment,
                        causality_factors,
                    ]
                );
            }
            DraftPatch::Files(section) => {
                adopt!(
                    next.files,
                    section,
                    [attachments, file_descriptions, additional_info]
                );
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adopts_patch_fields_and_keeps_the_rest() {
        let mut base = DraftReport::default();
        base.patient.patient_name = Some("Иванова Мария".into());
        base.patient.patient_age = Some("34".into());

        let patch = DraftPatch::Patient(PatientSection {
            patient_age: Some("35".into()),
            primary_diagnosis: Some("Гипертония".into()),
            ..PatientSection::default()
        });

        let merged = base.merge(&patch);
        assert_eq!(merged.patient.patient_name.as_deref(), Some("Иванова Мария"));
        assert_eq!(merged.patient.patient_age.as_deref(), Some("35"));
        assert_eq!(
            merged.patient.primary_diagnosis.as_deref(),
            Some("Гипертония")
        );
        // Untouched sections survive untouched.
        assert_eq!(merged.medication.dosage_unit.as_deref(), Some("мг"));
    }

    #[test]
    fn merge_never_removes_a_value() {
        let mut base = DraftReport::default();
        base.doctor.doctor_email = Some("doc@clinic.ru".into());

        let merged = base.merge(&DraftPatch::Doctor(DoctorSection::default()));
        assert_eq!(merged.doctor.doctor_email.as_deref(), Some("doc@clinic.ru"));
    }

    #[test]
    fn merge_is_pure_and_leaves_the_original_intact() {
        let base = DraftReport::default();
        let patch = DraftPatch::Patient(PatientSection {
            patient_name: Some("Смирнов".into()),
            ..PatientSection::default()
        });
        let _ = base.merge(&patch);
        assert_eq!(base.patient.patient_name, None);
    }
}
