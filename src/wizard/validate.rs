//! Per-step required-field rules gating forward navigation.

use std::collections::BTreeMap;

use crate::report::DraftReport;
use crate::wizard::state::WizardStep;

const REQUIRED_MESSAGE: &str = "Обязательное поле";
const EMAIL_MESSAGE: &str = "Неверный формат email";

/// Outcome of validating one step against the current draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepValidation {
    errors: BTreeMap<&'static str, String>,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    fn require_text(&mut self, field: &'static str, value: &Option<String>) {
        let missing = value
            .as_deref()
            .map(|text| text.trim().is_empty())
            .unwrap_or(true);
        if missing {
            self.errors.insert(field, REQUIRED_MESSAGE.to_string());
        }
    }

    fn require_present<T>(&mut self, field: &'static str, value: &Option<T>) {
        if value.is_none() {
            self.errors.insert(field, REQUIRED_MESSAGE.to_string());
        }
    }
}

/// Validates the slice of the draft belonging to `step`. Forward navigation
/// is blocked while this returns errors; the merge itself is not validated
/// here (see [`DraftReport::merge`]).
pub fn validate_step(step: WizardStep, draft: &DraftReport) -> StepValidation {
    let mut validation = StepValidation::default();
    match step {
        WizardStep::Patient => {
            let section = &draft.patient;
            validation.require_text("patient_name", &section.patient_name);
            validation.require_text("patient_gender", &section.patient_gender);
            validation.require_text("patient_age", &section.patient_age);
            validation.require_present("patient_birth_date", &section.patient_birth_date);
            validation.require_text("patient_weight", &section.patient_weight);
            validation.require_text("primary_diagnosis", &section.primary_diagnosis);
        }
        WizardStep::Doctor => {
            let section = &draft.doctor;
            validation.require_text("doctor_name", &section.doctor_name);
            validation.require_text("doctor_position", &section.doctor_position);
            validation.require_text("doctor_specialty", &section.doctor_specialty);
            validation.require_text("medical_institution", &section.medical_institution);
            validation.require_text("doctor_phone", &section.doctor_phone);
            validation.require_text("doctor_email", &section.doctor_email);
            if let Some(email) = section.doctor_email.as_deref() {
                if !email.trim().is_empty() && !is_valid_email(email.trim()) {
                    validation
                        .errors
                        .insert("doctor_email", EMAIL_MESSAGE.to_string());
                }
            }
        }
        WizardStep::Medication => {
            let section = &draft.medication;
            validation.require_text("trade_name", &section.trade_name);
            validation.require_text("inn_name", &section.inn_name);
            validation.require_text("dosage", &section.dosage);
            validation.require_text("prescription_reason", &section.prescription_reason);
        }
        WizardStep::AdverseEffect => {
            // Only the description is enforced. previous_reactions_description
            // and causality_factors stay optional even when their trigger
            // answers are set; the review checklist covers the gap.
            validation.require_text(
                "effect_description",
                &draft.adverse_effect.effect_description,
            );
        }
        WizardStep::Files => {}
    }
    validation
}

/// Standard address shape: one `@`, non-empty local part, dotted domain, no
/// whitespace anywhere.
pub fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && !tld.is_empty() && !domain.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{AdverseEffectSection, DraftReport};
    use chrono::NaiveDate;

    fn filled_patient_draft() -> DraftReport {
        let mut draft = DraftReport::default();
        draft.patient.patient_name = Some("Иванова Мария Петровна".into());
        draft.patient.patient_gender = Some("Женский".into());
        draft.patient.patient_age = Some("34".into());
        draft.patient.patient_birth_date = NaiveDate::from_ymd_opt(1991, 3, 14);
        draft.patient.patient_weight = Some("62".into());
        draft.patient.primary_diagnosis = Some("Артериальная гипертензия".into());
        draft
    }

    #[test]
    fn patient_step_requires_all_core_fields() {
        let validation = validate_step(WizardStep::Patient, &DraftReport::default());
        assert!(!validation.is_valid());
        assert_eq!(validation.errors().len(), 6);
        assert_eq!(
            validation.error_for("patient_name"),
            Some("Обязательное поле")
        );
    }

    #[test]
    fn comorbidities_are_optional() {
        let draft = filled_patient_draft();
        assert!(validate_step(WizardStep::Patient, &draft).is_valid());
    }

    #[test]
    fn doctor_step_flags_malformed_email() {
        let mut draft = DraftReport::default();
        draft.doctor.doctor_name = Some("Петров П. П.".into());
        draft.doctor.doctor_position = Some("Врач-терапевт".into());
        draft.doctor.doctor_specialty = Some("Терапия".into());
        draft.doctor.medical_institution = Some("ГКБ №1".into());
        draft.doctor.doctor_phone = Some("+7 900 000-00-00".into());
        draft.doctor.doctor_email = Some("petrov@clinic".into());

        let validation = validate_step(WizardStep::Doctor, &draft);
        assert_eq!(
            validation.error_for("doctor_email"),
            Some("Неверный формат email")
        );

        draft.doctor.doctor_email = Some("petrov@clinic.ru".into());
        assert!(validate_step(WizardStep::Doctor, &draft).is_valid());
    }

    #[test]
    fn previous_reaction_description_is_not_enforced() {
        // "yes" with an empty description still validates; permissive by
        // product decision.
        let mut draft = DraftReport::default();
        draft.adverse_effect = AdverseEffectSection {
            effect_description: Some("Кожная сыпь".into()),
            previous_reactions: Some("yes".into()),
            previous_reactions_description: None,
            ..AdverseEffectSection::default()
        };
        assert!(validate_step(WizardStep::AdverseEffect, &draft).is_valid());
    }

    #[test]
    fn files_step_has_no_required_fields() {
        assert!(validate_step(WizardStep::Files, &DraftReport::default()).is_valid());
    }

    #[test]
    fn email_pattern_matches_the_standard_shape() {
        assert!(is_valid_email("doc@clinic.ru"));
        assert!(is_valid_email("a.b@mail.example.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@signs.ru"));
        assert!(!is_valid_email("@clinic.ru"));
        assert!(!is_valid_email("doc@clinic"));
        assert!(!is_valid_email("doc@ clinic.ru"));
        assert!(!is_valid_email("doc@clinic."));
    }
}
