//! Field descriptors for each wizard step and the conversions between form
//! values and typed draft patches.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;

use crate::cli::forms::{FieldDescriptor, FieldKind, FormDescriptor, Validator};
use crate::errors::IntakeError;
use crate::report::{
    AdverseEffectSection, CausalityAssessment, DoctorSection, DraftPatch, DraftReport,
    MedicationSection, Outcome, PatientSection, Severity,
};
use crate::wizard::WizardStep;

const GENDER_OPTIONS: [&str; 2] = ["Мужской", "Женский"];
const YES_NO_OPTIONS: [&str; 2] = ["Да", "Нет"];
const DOSAGE_UNITS: [&str; 4] = ["мг", "г", "мл", "МЕ"];

fn labels_of<T: ToString>(values: &[T]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

static PATIENT_FORM: Lazy<FormDescriptor> = Lazy::new(|| {
    FormDescriptor::new(
        "patient",
        vec![
            FieldDescriptor::new(
                "patient_name",
                "ФИО пациента",
                FieldKind::Text,
                Validator::NonEmpty,
            ),
            FieldDescriptor::new(
                "patient_gender",
                "Пол",
                FieldKind::Choice(GENDER_OPTIONS.map(String::from).to_vec()),
                Validator::OneOf(GENDER_OPTIONS.map(String::from).to_vec()),
            ),
            FieldDescriptor::new(
                "patient_age",
                "Возраст",
                FieldKind::Integer,
                Validator::Integer,
            ),
            FieldDescriptor::new(
                "patient_birth_date",
                "Дата рождения",
                FieldKind::Date,
                Validator::Date,
            )
            .with_help("Используйте формат ГГГГ-ММ-ДД, например 1991-03-14."),
            FieldDescriptor::new(
                "patient_weight",
                "Вес (кг)",
                FieldKind::Decimal,
                Validator::PositiveNumber,
            ),
            FieldDescriptor::new(
                "primary_diagnosis",
                "Основной диагноз",
                FieldKind::Text,
                Validator::NonEmpty,
            ),
            FieldDescriptor::new(
                "comorbidities",
                "Сопутствующие заболевания",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
        ],
    )
});

static DOCTOR_FORM: Lazy<FormDescriptor> = Lazy::new(|| {
    FormDescriptor::new(
        "doctor",
        vec![
            FieldDescriptor::new(
                "doctor_name",
                "ФИО врача",
                FieldKind::Text,
                Validator::NonEmpty,
            ),
            FieldDescriptor::new(
                "doctor_position",
                "Должность",
                FieldKind::Text,
                Validator::NonEmpty,
            ),
            FieldDescriptor::new(
                "doctor_specialty",
                "Специальность",
                FieldKind::Text,
                Validator::NonEmpty,
            ),
            FieldDescriptor::new(
                "medical_institution",
                "Медицинское учреждение",
                FieldKind::Text,
                Validator::NonEmpty,
            ),
            FieldDescriptor::new(
                "doctor_phone",
                "Телефон",
                FieldKind::Text,
                Validator::NonEmpty,
            ),
            FieldDescriptor::new("doctor_email", "Email", FieldKind::Text, Validator::Email),
        ],
    )
});

static MEDICATION_FORM: Lazy<FormDescriptor> = Lazy::new(|| {
    FormDescriptor::new(
        "medication",
        vec![
            FieldDescriptor::new(
                "trade_name",
                "Торговое название",
                FieldKind::Text,
                Validator::NonEmpty,
            ),
            FieldDescriptor::new(
                "inn_name",
                "МНН",
                FieldKind::Text,
                Validator::NonEmpty,
            )
            .with_help("Международное непатентованное название."),
            FieldDescriptor::new(
                "dosage_form",
                "Лекарственная форма",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
            FieldDescriptor::new("dosage", "Дозировка", FieldKind::Text, Validator::NonEmpty),
            FieldDescriptor::new(
                "dosage_unit",
                "Единица измерения",
                FieldKind::Choice(DOSAGE_UNITS.map(String::from).to_vec()),
                Validator::OneOf(DOSAGE_UNITS.map(String::from).to_vec()),
            )
            .with_optional(),
            FieldDescriptor::new(
                "frequency",
                "Кратность приема",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
            FieldDescriptor::new(
                "administration_route",
                "Путь введения",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
            FieldDescriptor::new(
                "start_date",
                "Дата начала приема",
                FieldKind::Date,
                Validator::Date,
            )
            .with_optional(),
            FieldDescriptor::new(
                "end_date",
                "Дата окончания приема",
                FieldKind::Date,
                Validator::Date,
            )
            .with_optional(),
            FieldDescriptor::new(
                "prescription_reason",
                "Причина назначения",
                FieldKind::Text,
                Validator::NonEmpty,
            ),
            FieldDescriptor::new(
                "batch_number",
                "Номер серии",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
            FieldDescriptor::new(
                "manufacturer",
                "Производитель",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
        ],
    )
});

static ADVERSE_EFFECT_FORM: Lazy<FormDescriptor> = Lazy::new(|| {
    FormDescriptor::new(
        "adverse_effect",
        vec![
            FieldDescriptor::new(
                "effect_date",
                "Дата возникновения",
                FieldKind::Date,
                Validator::Date,
            )
            .with_optional(),
            FieldDescriptor::new(
                "effect_time",
                "Время возникновения",
                FieldKind::Time,
                Validator::Time,
            )
            .with_optional(),
            FieldDescriptor::new(
                "effect_description",
                "Описание побочного эффекта",
                FieldKind::Text,
                Validator::NonEmpty,
            ),
            FieldDescriptor::new(
                "effect_localization",
                "Локализация",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
            FieldDescriptor::new(
                "severity",
                "Степень тяжести",
                FieldKind::Choice(labels_of(&Severity::ALL)),
                Validator::OneOf(labels_of(&Severity::ALL)),
            )
            .with_optional(),
            FieldDescriptor::new(
                "severity_criteria",
                "Критерии тяжести",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
            FieldDescriptor::new(
                "actions_taken",
                "Предпринятые меры",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional()
            .with_help("Перечислите меры через запятую."),
            FieldDescriptor::new(
                "treatment_description",
                "Описание лечения",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
            FieldDescriptor::new(
                "outcome",
                "Исход",
                FieldKind::Choice(labels_of(&Outcome::ALL)),
                Validator::OneOf(labels_of(&Outcome::ALL)),
            )
            .with_optional(),
            FieldDescriptor::new(
                "outcome_date",
                "Дата исхода",
                FieldKind::Date,
                Validator::Date,
            )
            .with_optional(),
            FieldDescriptor::new(
                "previous_reactions",
                "Были ли ранее реакции на препарат?",
                FieldKind::Choice(YES_NO_OPTIONS.map(String::from).to_vec()),
                Validator::OneOf(YES_NO_OPTIONS.map(String::from).to_vec()),
            )
            .with_optional(),
            FieldDescriptor::new(
                "previous_reactions_description",
                "Описание предыдущих реакций",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
            FieldDescriptor::new(
                "causality_assessment",
                "Оценка причинно-следственной связи",
                FieldKind::Choice(labels_of(&CausalityAssessment::ALL)),
                Validator::OneOf(labels_of(&CausalityAssessment::ALL)),
            )
            .with_optional(),
            FieldDescriptor::new(
                "causality_factors",
                "Факторы причинности",
                FieldKind::Text,
                Validator::None,
            )
            .with_optional(),
        ],
    )
});

/// Form descriptor for a wizard step. The files step is driven by the
/// attachment loop instead of a flat field list.
pub fn step_form(step: WizardStep) -> Option<&'static FormDescriptor> {
    match step {
        WizardStep::Patient => Some(&PATIENT_FORM),
        WizardStep::Doctor => Some(&DOCTOR_FORM),
        WizardStep::Medication => Some(&MEDICATION_FORM),
        WizardStep::AdverseEffect => Some(&ADVERSE_EFFECT_FORM),
        WizardStep::Files => None,
    }
}

fn text_value(values: &BTreeMap<String, String>, key: &str) -> Option<String> {
    values
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn date_value(
    values: &BTreeMap<String, String>,
    key: &str,
) -> Result<Option<NaiveDate>, IntakeError> {
    match text_value(values, key) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| IntakeError::Validation(format!("{key}: неверная дата `{raw}`"))),
        None => Ok(None),
    }
}

fn time_value(
    values: &BTreeMap<String, String>,
    key: &str,
) -> Result<Option<NaiveTime>, IntakeError> {
    match text_value(values, key) {
        Some(raw) => NaiveTime::parse_from_str(&raw, "%H:%M")
            .map(Some)
            .map_err(|_| IntakeError::Validation(format!("{key}: неверное время `{raw}`"))),
        None => Ok(None),
    }
}

fn label_value<T: Copy + ToString>(
    values: &BTreeMap<String, String>,
    key: &str,
    options: &[T],
) -> Result<Option<T>, IntakeError> {
    match text_value(values, key) {
        Some(label) => options
            .iter()
            .find(|option| option.to_string() == label)
            .copied()
            .map(Some)
            .ok_or_else(|| IntakeError::Validation(format!("{key}: неизвестный вариант `{label}`"))),
        None => Ok(None),
    }
}

/// Converts one step's collected values into a typed draft patch. Values are
/// expected to have passed field validation already; parse failures surface
/// as [`IntakeError::Validation`].
pub fn patch_from_values(
    step: WizardStep,
    values: &BTreeMap<String, String>,
) -> Result<DraftPatch, IntakeError> {
    match step {
        WizardStep::Patient => Ok(DraftPatch::Patient(PatientSection {
            patient_name: text_value(values, "patient_name"),
            patient_gender: text_value(values, "patient_gender"),
            patient_age: text_value(values, "patient_age"),
            patient_birth_date: date_value(values, "patient_birth_date")?,
            patient_weight: text_value(values, "patient_weight"),
            primary_diagnosis: text_value(values, "primary_diagnosis"),
            comorbidities: text_value(values, "comorbidities"),
        })),
        WizardStep::Doctor => Ok(DraftPatch::Doctor(DoctorSection {
            doctor_name: text_value(values, "doctor_name"),
            doctor_position: text_value(values, "doctor_position"),
            doctor_specialty: text_value(values, "doctor_specialty"),
            medical_institution: text_value(values, "medical_institution"),
            doctor_phone: text_value(values, "doctor_phone"),
            doctor_email: text_value(values, "doctor_email"),
        })),
        WizardStep::Medication => Ok(DraftPatch::Medication(MedicationSection {
            trade_name: text_value(values, "trade_name"),
            inn_name: text_value(values, "inn_name"),
            dosage_form: text_value(values, "dosage_form"),
            dosage: text_value(values, "dosage"),
            dosage_unit: text_value(values, "dosage_unit"),
            frequency: text_value(values, "frequency"),
            administration_route: text_value(values, "administration_route"),
            start_date: date_value(values, "start_date")?,
            end_date: date_value(values, "end_date")?,
            prescription_reason: text_value(values, "prescription_reason"),
            batch_number: text_value(values, "batch_number"),
            manufacturer: text_value(values, "manufacturer"),
        })),
        WizardStep::AdverseEffect => Ok(DraftPatch::AdverseEffect(AdverseEffectSection {
            effect_date: date_value(values, "effect_date")?,
            effect_time: time_value(values, "effect_time")?,
            effect_description: text_value(values, "effect_description"),
            effect_localization: text_value(values, "effect_localization"),
            severity: label_value(values, "severity", &Severity::ALL)?,
            severity_criteria: text_value(values, "severity_criteria"),
            actions_taken: text_value(values, "actions_taken").map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            treatment_description: text_value(values, "treatment_description"),
            outcome: label_value(values, "outcome", &Outcome::ALL)?,
            outcome_date: date_value(values, "outcome_date")?,
            previous_reactions: text_value(values, "previous_reactions").map(|answer| {
                if answer == "Да" {
                    "yes".to_string()
                } else {
                    "no".to_string()
                }
            }),
            previous_reactions_description: text_value(values, "previous_reactions_description"),
            causality_assessment: label_value(
                values,
                "causality_assessment",
                &CausalityAssessment::ALL,
            )?,
            causality_factors: text_value(values, "causality_factors"),
        })),
        WizardStep::Files => Err(IntakeError::InvalidOperation(
            "files step is collected by the attachment loop".into(),
        )),
    }
}

/// Pre-populates form values from the draft so back-navigation shows what
/// was already entered.
pub fn initial_values(step: WizardStep, draft: &DraftReport) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    let mut put = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            values.insert(key.to_string(), value);
        }
    };

    match step {
        WizardStep::Patient => {
            let section = &draft.patient;
            put("patient_name", section.patient_name.clone());
            put("patient_gender", section.patient_gender.clone());
            put("patient_age", section.patient_age.clone());
            put(
                "patient_birth_date",
                section.patient_birth_date.map(|d| d.to_string()),
            );
            put("patient_weight", section.patient_weight.clone());
            put("primary_diagnosis", section.primary_diagnosis.clone());
            put("comorbidities", section.comorbidities.clone());
        }
        WizardStep::Doctor => {
            let section = &draft.doctor;
            put("doctor_name", section.doctor_name.clone());
            put("doctor_position", section.doctor_position.clone());
            put("doctor_specialty", section.doctor_specialty.clone());
            put("medical_institution", section.medical_institution.clone());
            put("doctor_phone", section.doctor_phone.clone());
            put("doctor_email", section.doctor_email.clone());
        }
        WizardStep::Medication => {
            let section = &draft.medication;
            put("trade_name", section.trade_name.clone());
            put("inn_name", section.inn_name.clone());
            put("dosage_form", section.dosage_form.clone());
            put("dosage", section.dosage.clone());
            put("dosage_unit", section.dosage_unit.clone());
            put("frequency", section.frequency.clone());
            put("administration_route", section.administration_route.clone());
            put("start_date", section.start_date.map(|d| d.to_string()));
            put("end_date", section.end_date.map(|d| d.to_string()));
            put("prescription_reason", section.prescription_reason.clone());
            put("batch_number", section.batch_number.clone());
            put("manufacturer", section.manufacturer.clone());
        }
        WizardStep::AdverseEffect => {
            let section = &draft.adverse_effect;
            put("effect_date", section.effect_date.map(|d| d.to_string()));
            put(
                "effect_time",
                section.effect_time.map(|t| t.format("%H:%M").to_string()),
            );
            put("effect_description", section.effect_description.clone());
            put("effect_localization", section.effect_localization.clone());
            put("severity", section.severity.map(|s| s.to_string()));
            put("severity_criteria", section.severity_criteria.clone());
            put(
                "actions_taken",
                section.actions_taken.as_ref().map(|items| items.join(", ")),
            );
            put(
                "treatment_description",
                section.treatment_description.clone(),
            );
            put("outcome", section.outcome.map(|o| o.to_string()));
            put("outcome_date", section.outcome_date.map(|d| d.to_string()));
            put(
                "previous_reactions",
                section.previous_reactions.as_deref().map(|answer| {
                    if answer == "yes" { "Да" } else { "Нет" }.to_string()
                }),
            );
            put(
                "previous_reactions_description",
                section.previous_reactions_description.clone(),
            );
            put(
                "causality_assessment",
                section.causality_assessment.map(|c| c.to_string()),
            );
            put("causality_factors", section.causality_factors.clone());
        }
        WizardStep::Files => {}
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_values_round_trip_through_patch_and_back() {
        let mut values = BTreeMap::new();
        values.insert("patient_name".to_string(), "Иванова Мария".to_string());
        values.insert("patient_gender".to_string(), "Женский".to_string());
        values.insert("patient_age".to_string(), "34".to_string());
        values.insert("patient_birth_date".to_string(), "1991-03-14".to_string());
        values.insert("patient_weight".to_string(), "62".to_string());
        values.insert("primary_diagnosis".to_string(), "Гипертония".to_string());

        let patch = patch_from_values(WizardStep::Patient, &values).unwrap();
        let draft = DraftReport::default().merge(&patch);
        assert_eq!(
            draft.patient.patient_birth_date,
            NaiveDate::from_ymd_opt(1991, 3, 14)
        );

        let restored = initial_values(WizardStep::Patient, &draft);
        assert_eq!(restored.get("patient_name").unwrap(), "Иванова Мария");
        assert_eq!(restored.get("patient_birth_date").unwrap(), "1991-03-14");
        assert!(!restored.contains_key("comorbidities"));
    }

    #[test]
    fn severity_label_maps_to_the_enum() {
        let mut values = BTreeMap::new();
        values.insert("effect_description".to_string(), "Сыпь".to_string());
        values.insert("severity".to_string(), "Тяжелая".to_string());
        values.insert("previous_reactions".to_string(), "Да".to_string());

        let patch = patch_from_values(WizardStep::AdverseEffect, &values).unwrap();
        let draft = DraftReport::default().merge(&patch);
        assert_eq!(draft.adverse_effect.severity, Some(Severity::Severe));
        assert_eq!(
            draft.adverse_effect.previous_reactions.as_deref(),
            Some("yes")
        );
    }

    #[test]
    fn actions_taken_splits_on_commas() {
        let mut values = BTreeMap::new();
        values.insert("effect_description".to_string(), "Сыпь".to_string());
        values.insert(
            "actions_taken".to_string(),
            "Отмена препарата, антигистаминные".to_string(),
        );
        let patch = patch_from_values(WizardStep::AdverseEffect, &values).unwrap();
        let draft = DraftReport::default().merge(&patch);
        assert_eq!(
            draft.adverse_effect.actions_taken,
            Some(vec![
                "Отмена препарата".to_string(),
                "антигистаминные".to_string()
            ])
        );
    }

    #[test]
    fn unknown_choice_label_is_a_validation_error() {
        let mut values = BTreeMap::new();
        values.insert("effect_description".to_string(), "Сыпь".to_string());
        values.insert("severity".to_string(), "Невиданная".to_string());
        let result = patch_from_values(WizardStep::AdverseEffect, &values);
        assert!(matches!(result, Err(IntakeError::Validation(_))));
    }
}
