//! Submitted case records and their classification vocabulary.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::report::draft::DraftReport;

/// Triage lane a report currently sits in. A label, not a strict workflow:
/// any status may move to any other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Incoming,
    Clarification,
    Analysis,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Incoming,
        ReportStatus::Clarification,
        ReportStatus::Analysis,
    ];
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportStatus::Incoming => "Входящие",
            ReportStatus::Clarification => "Уточнение",
            ReportStatus::Analysis => "Анализ",
        };
        f.write_str(label)
    }
}

/// Reaction severity grading used both in intake and dashboard filters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    LifeThreatening,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Mild,
        Severity::Moderate,
        Severity::Severe,
        Severity::LifeThreatening,
    ];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Mild => "Легкая",
            Severity::Moderate => "Средняя",
            Severity::Severe => "Тяжелая",
            Severity::LifeThreatening => "Жизнеугрожающая",
        };
        f.write_str(label)
    }
}

/// Outcome of the adverse reaction at reporting time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Recovered,
    Improving,
    Unchanged,
    Worsening,
    Death,
    Unknown,
}

impl Outcome {
    pub const ALL: [Outcome; 6] = [
        Outcome::Recovered,
        Outcome::Improving,
        Outcome::Unchanged,
        Outcome::Worsening,
        Outcome::Death,
        Outcome::Unknown,
    ];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Recovered => "Выздоровление",
            Outcome::Improving => "Улучшение",
            Outcome::Unchanged => "Без изменений",
            Outcome::Worsening => "Ухудшение",
            Outcome::Death => "Смерть",
            Outcome::Unknown => "Неизвестно",
        };
        f.write_str(label)
    }
}

/// WHO-UMC style causality grading between medication and reaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CausalityAssessment {
    Certain,
    Probable,
    Possible,
    Unlikely,
    Conditional,
    Unassessable,
}

impl CausalityAssessment {
    pub const ALL: [CausalityAssessment; 6] = [
        CausalityAssessment::Certain,
        CausalityAssessment::Probable,
        CausalityAssessment::Possible,
        CausalityAssessment::Unlikely,
        CausalityAssessment::Conditional,
        CausalityAssessment::Unassessable,
    ];

    /// Causality factors are only collected for these gradings.
    pub fn wants_factors(self) -> bool {
        matches!(
            self,
            CausalityAssessment::Probable | CausalityAssessment::Possible
        )
    }
}

impl fmt::Display for CausalityAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CausalityAssessment::Certain => "Определенная",
            CausalityAssessment::Probable => "Вероятная",
            CausalityAssessment::Possible => "Возможная",
            CausalityAssessment::Unlikely => "Сомнительная",
            CausalityAssessment::Conditional => "Условная",
            CausalityAssessment::Unassessable => "Неклассифицируемая",
        };
        f.write_str(label)
    }
}

/// Independent boolean checks tracking which clinical data a reviewer has
/// confirmed present on the report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Completeness {
    pub patient_info: bool,
    pub doctor_info: bool,
    pub medication_start_date: bool,
    pub medication_end_date: bool,
    pub medication_batch: bool,
    pub effect_date: bool,
    pub effect_description: bool,
    pub severity: bool,
    pub outcome: bool,
}

/// Addressable keys of the [`Completeness`] map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessField {
    PatientInfo,
    DoctorInfo,
    MedicationStartDate,
    MedicationEndDate,
    MedicationBatch,
    EffectDate,
    EffectDescription,
    Severity,
    Outcome,
}

impl CompletenessField {
    pub const ALL: [CompletenessField; 9] = [
        CompletenessField::PatientInfo,
        CompletenessField::DoctorInfo,
        CompletenessField::MedicationStartDate,
        CompletenessField::MedicationEndDate,
        CompletenessField::MedicationBatch,
        CompletenessField::EffectDate,
        CompletenessField::EffectDescription,
        CompletenessField::Severity,
        CompletenessField::Outcome,
    ];
}

impl fmt::Display for CompletenessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CompletenessField::PatientInfo => "Информация о пациенте",
            CompletenessField::DoctorInfo => "Информация о враче",
            CompletenessField::MedicationStartDate => "Дата начала приема препарата",
            CompletenessField::MedicationEndDate => "Дата окончания приема препарата",
            CompletenessField::MedicationBatch => "Номер серии препарата",
            CompletenessField::EffectDate => "Дата возникновения побочного эффекта",
            CompletenessField::EffectDescription => "Описание побочного эффекта",
            CompletenessField::Severity => "Степень тяжести",
            CompletenessField::Outcome => "Исход побочного эффекта",
        };
        f.write_str(label)
    }
}

impl Completeness {
    pub fn get(&self, field: CompletenessField) -> bool {
        match field {
            CompletenessField::PatientInfo => self.patient_info,
            CompletenessField::DoctorInfo => self.doctor_info,
            CompletenessField::MedicationStartDate => self.medication_start_date,
            CompletenessField::MedicationEndDate => self.medication_end_date,
            CompletenessField::MedicationBatch => self.medication_batch,
            CompletenessField::EffectDate => self.effect_date,
            CompletenessField::EffectDescription => self.effect_description,
            CompletenessField::Severity => self.severity,
            CompletenessField::Outcome => self.outcome,
        }
    }

    /// Flips one check; keys are independent, no cross-field validation.
    pub fn toggle(&mut self, field: CompletenessField) {
        let slot = match field {
            CompletenessField::PatientInfo => &mut self.patient_info,
            CompletenessField::DoctorInfo => &mut self.doctor_info,
            CompletenessField::MedicationStartDate => &mut self.medication_start_date,
            CompletenessField::MedicationEndDate => &mut self.medication_end_date,
            CompletenessField::MedicationBatch => &mut self.medication_batch,
            CompletenessField::EffectDate => &mut self.effect_date,
            CompletenessField::EffectDescription => &mut self.effect_description,
            CompletenessField::Severity => &mut self.severity,
            CompletenessField::Outcome => &mut self.outcome,
        };
        *slot = !*slot;
    }

    pub fn filled_count(&self) -> usize {
        CompletenessField::ALL
            .iter()
            .filter(|field| self.get(**field))
            .count()
    }
}

/// A submitted, in-memory case record under review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: String,
    pub status: ReportStatus,
    pub patient_name: String,
    pub patient_id: String,
    pub medication_name: String,
    pub adverse_effect: String,
    pub date_received: NaiveDate,
    /// Read-only annotations produced by the intake assistant.
    pub ai_notes: Vec<String>,
    pub completeness: Completeness,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causality_assessment: Option<CausalityAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_significance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_foresight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Permanent audit flag; may only be set while the report is in Analysis.
    #[serde(default)]
    pub confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_data: Option<DraftReport>,
}

impl Report {
    pub fn new(
        id: impl Into<String>,
        status: ReportStatus,
        patient_name: impl Into<String>,
        patient_id: impl Into<String>,
        medication_name: impl Into<String>,
        adverse_effect: impl Into<String>,
        date_received: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            status,
            patient_name: patient_name.into(),
            patient_id: patient_id.into(),
            medication_name: medication_name.into(),
            adverse_effect: adverse_effect.into(),
            date_received,
            ai_notes: Vec::new(),
            completeness: Completeness::default(),
            severity: None,
            causality_assessment: None,
            clinical_significance: None,
            definition_foresight: None,
            description: None,
            confirmed: false,
            full_data: None,
        }
    }
}
