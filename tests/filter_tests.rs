use chrono::{Days, NaiveDate};
use pharmawatch::registry::{
    tab_counts, visible, DateFilter, FilterCriteria, MedicationFilter, SeverityFilter,
};
use pharmawatch::report::{Report, ReportStatus, Severity};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 23).unwrap()
}

fn report(
    id: &str,
    status: ReportStatus,
    patient: &str,
    medication: &str,
    effect: &str,
    received: NaiveDate,
) -> Report {
    Report::new(id, status, patient, "P-0000", medication, effect, received)
}

fn sample_reports() -> Vec<Report> {
    let now = today();
    let mut reports = vec![
        report(
            "2025-0001",
            ReportStatus::Incoming,
            "Иванова Мария",
            "Парацетамол",
            "Кожная сыпь",
            now,
        ),
        report(
            "2025-0002",
            ReportStatus::Incoming,
            "Смирнов Алексей",
            "Амоксициллин",
            "Крапивница",
            now.checked_sub_days(Days::new(10)).unwrap(),
        ),
        report(
            "2025-0003",
            ReportStatus::Clarification,
            "Петрова Анна",
            "Ибупрофен",
            "Головокружение",
            now.checked_sub_days(Days::new(3)).unwrap(),
        ),
        report(
            "2025-0004",
            ReportStatus::Analysis,
            "Кузнецова Ольга",
            "Парацетамол",
            "Тошнота",
            now.checked_sub_days(Days::new(40)).unwrap(),
        ),
    ];
    reports[0].severity = Some(Severity::Mild);
    reports[1].severity = Some(Severity::Moderate);
    reports[2].severity = Some(Severity::Moderate);
    reports[3].severity = Some(Severity::Severe);
    reports
}

#[test]
fn filtering_is_idempotent_and_order_preserving() {
    let reports = sample_reports();
    let criteria = FilterCriteria::default();

    let first = visible(&reports, &criteria, today());
    let second = visible(&reports, &criteria, today());
    let first_ids: Vec<&str> = first.iter().map(|r| r.id.as_str()).collect();
    let second_ids: Vec<&str> = second.iter().map(|r| r.id.as_str()).collect();

    assert_eq!(first_ids, second_ids);
    assert_eq!(first_ids, vec!["2025-0001", "2025-0002"]);
}

#[test]
fn week_filter_admits_today_and_excludes_ten_days_ago() {
    let reports = sample_reports();
    let mut criteria = FilterCriteria::default();
    criteria.date = DateFilter::Week;

    let matched = visible(&reports, &criteria, today());
    let ids: Vec<&str> = matched.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["2025-0001"]);
}

#[test]
fn search_is_case_insensitive_for_cyrillic() {
    let reports = sample_reports();
    let mut criteria = FilterCriteria::default();
    criteria.search_text = "ПАРАЦЕТАМОЛ".into();

    let matched = visible(&reports, &criteria, today());
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, "2025-0001");

    // The same medication in the Analysis tab is reachable there.
    criteria.active_tab = ReportStatus::Analysis;
    let matched = visible(&reports, &criteria, today());
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, "2025-0004");
}

#[test]
fn all_dimensions_combine_with_and_semantics() {
    let reports = sample_reports();
    let criteria = FilterCriteria {
        search_text: "сыпь".into(),
        medication: MedicationFilter::Named("Парацетамол".into()),
        severity: SeverityFilter::Is(Severity::Mild),
        date: DateFilter::Today,
        active_tab: ReportStatus::Incoming,
    };
    let matched = visible(&reports, &criteria, today());
    assert_eq!(matched.len(), 1);

    // Flipping one dimension breaks the conjunction.
    let mut narrowed = criteria.clone();
    narrowed.severity = SeverityFilter::Is(Severity::Severe);
    assert!(visible(&reports, &narrowed, today()).is_empty());
}

#[test]
fn tab_counts_sum_to_the_total_and_ignore_other_filters() {
    let reports = sample_reports();
    let counts = tab_counts(&reports);
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    assert_eq!(total, reports.len());
    assert_eq!(counts[0], (ReportStatus::Incoming, 2));
    assert_eq!(counts[1], (ReportStatus::Clarification, 1));
    assert_eq!(counts[2], (ReportStatus::Analysis, 1));
}
