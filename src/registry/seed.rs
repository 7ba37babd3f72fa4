//! Demonstration data for the review dashboard.

use chrono::{Days, NaiveDate};

use crate::report::{CausalityAssessment, Completeness, Report, ReportStatus, Severity};

/// Builds the demo case set, with received dates anchored to `today` so the
/// date filters behave the same on any day the demo runs.
pub fn seed_reports(today: NaiveDate) -> Vec<Report> {
    let days_ago = |days: u64| today.checked_sub_days(Days::new(days)).unwrap_or(today);

    let mut reports = Vec::new();

    let mut report = Report::new(
        "2025-0001",
        ReportStatus::Incoming,
        "Иванова Мария Петровна",
        "P-1023",
        "Парацетамол",
        "Кожная сыпь и зуд",
        today,
    );
    report.severity = Some(Severity::Mild);
    report.ai_notes = vec![
        "Отсутствует номер серии препарата".into(),
        "Не указана дата окончания приема".into(),
    ];
    report.completeness = Completeness {
        patient_info: true,
        doctor_info: true,
        medication_start_date: true,
        effect_date: true,
        effect_description: true,
        severity: true,
        ..Completeness::default()
    };
    reports.push(report);

    let mut report = Report::new(
        "2025-0002",
        ReportStatus::Incoming,
        "Смирнов Алексей Иванович",
        "P-1187",
        "Амоксициллин",
        "Крапивница",
        days_ago(10),
    );
    report.severity = Some(Severity::Moderate);
    report.ai_notes = vec!["Не заполнена информация о враче".into()];
    report.completeness = Completeness {
        patient_info: true,
        medication_start_date: true,
        medication_batch: true,
        effect_date: true,
        effect_description: true,
        severity: true,
        ..Completeness::default()
    };
    reports.push(report);

    let mut report = Report::new(
        "2025-0003",
        ReportStatus::Clarification,
        "Петрова Анна Сергеевна",
        "P-1204",
        "Ибупрофен",
        "Головокружение и тошнота",
        days_ago(3),
    );
    report.severity = Some(Severity::Moderate);
    report.causality_assessment = Some(CausalityAssessment::Possible);
    report.ai_notes = vec![
        "Запрошено уточнение дозировки".into(),
        "Возможно взаимодействие с сопутствующей терапией".into(),
    ];
    report.completeness = Completeness {
        patient_info: true,
        doctor_info: true,
        medication_start_date: true,
        medication_end_date: true,
        effect_date: true,
        effect_description: true,
        severity: true,
        outcome: true,
        ..Completeness::default()
    };
    reports.push(report);

    let mut report = Report::new(
        "2025-0004",
        ReportStatus::Analysis,
        "Кузнецова Ольга Викторовна",
        "P-0956",
        "Метформин",
        "Тошнота и рвота",
        days_ago(20),
    );
    report.severity = Some(Severity::Severe);
    report.causality_assessment = Some(CausalityAssessment::Probable);
    report.clinical_significance = Some("Потребовалась отмена препарата".into());
    report.ai_notes = vec!["Все ключевые поля заполнены".into()];
    report.completeness = Completeness {
        patient_info: true,
        doctor_info: true,
        medication_start_date: true,
        medication_end_date: true,
        medication_batch: true,
        effect_date: true,
        effect_description: true,
        severity: true,
        outcome: true,
    };
    reports.push(report);

    let mut report = Report::new(
        "2025-0005",
        ReportStatus::Analysis,
        "Соколов Дмитрий Андреевич",
        "P-1311",
        "Ацетилсалициловая кислота",
        "Желудочно-кишечное кровотечение",
        days_ago(45),
    );
    report.severity = Some(Severity::LifeThreatening);
    report.causality_assessment = Some(CausalityAssessment::Certain);
    report.definition_foresight = Some("Реакция описана в инструкции".into());
    report.ai_notes = vec![
        "Тяжелая реакция: требуется приоритетное рассмотрение".into(),
        "Пациент госпитализирован".into(),
    ];
    report.completeness = Completeness {
        patient_info: true,
        doctor_info: true,
        medication_start_date: true,
        medication_batch: true,
        effect_date: true,
        effect_description: true,
        severity: true,
        outcome: true,
        ..Completeness::default()
    };
    reports.push(report);

    let mut report = Report::new(
        "2025-0006",
        ReportStatus::Incoming,
        "Волкова Екатерина Николаевна",
        "P-1342",
        "Парацетамол",
        "Отек Квинке",
        days_ago(1),
    );
    report.severity = Some(Severity::Severe);
    report.ai_notes = vec!["Срочное сообщение: ангионевротический отек".into()];
    report.completeness = Completeness {
        patient_info: true,
        effect_date: true,
        effect_description: true,
        severity: true,
        ..Completeness::default()
    };
    reports.push(report);

    reports
}
