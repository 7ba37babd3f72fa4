//! Pure derivation of the visible report subset from the active filters.

use std::fmt;

use chrono::NaiveDate;

use crate::report::{Report, ReportStatus, Severity};

/// Received-date window, measured in whole days before `today`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateFilter {
    pub const ALL_OPTIONS: [DateFilter; 4] = [
        DateFilter::All,
        DateFilter::Today,
        DateFilter::Week,
        DateFilter::Month,
    ];

    /// Whole-day age limits are upper bounds only: a future-dated report has
    /// a negative age and still passes Week/Month. Surfacing a data-entry
    /// mistake beats hiding the record.
    fn admits(self, days_diff: i64) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::Today => days_diff == 0,
            DateFilter::Week => days_diff <= 7,
            DateFilter::Month => days_diff <= 30,
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DateFilter::All => "Все даты",
            DateFilter::Today => "Сегодня",
            DateFilter::Week => "За неделю",
            DateFilter::Month => "За месяц",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MedicationFilter {
    #[default]
    All,
    Named(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeverityFilter {
    #[default]
    All,
    Is(Severity),
}

/// All filter dimensions, independently settable, combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub medication: MedicationFilter,
    pub severity: SeverityFilter,
    pub date: DateFilter,
    pub active_tab: ReportStatus,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            medication: MedicationFilter::All,
            severity: SeverityFilter::All,
            date: DateFilter::All,
            active_tab: ReportStatus::Incoming,
        }
    }
}

impl FilterCriteria {
    pub fn for_tab(active_tab: ReportStatus) -> Self {
        Self {
            active_tab,
            ..Self::default()
        }
    }

    pub fn reset_filters(&mut self) {
        let tab = self.active_tab;
        *self = Self::for_tab(tab);
    }

    fn matches(&self, report: &Report, today: NaiveDate) -> bool {
        if report.status != self.active_tab {
            return false;
        }

        if !self.search_text.is_empty() {
            let query = self.search_text.to_lowercase();
            let hit = report.patient_name.to_lowercase().contains(&query)
                || report.medication_name.to_lowercase().contains(&query)
                || report.adverse_effect.to_lowercase().contains(&query)
                || report.id.to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }

        if let MedicationFilter::Named(name) = &self.medication {
            if &report.medication_name != name {
                return false;
            }
        }

        if let SeverityFilter::Is(severity) = self.severity {
            if report.severity != Some(severity) {
                return false;
            }
        }

        let days_diff = today.signed_duration_since(report.date_received).num_days();
        self.date.admits(days_diff)
    }
}

/// Derives the visible subset. Pure and order-preserving: the result keeps
/// the collection's insertion order and recomputes from scratch every call.
pub fn visible<'a>(
    reports: &'a [Report],
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> Vec<&'a Report> {
    reports
        .iter()
        .filter(|report| criteria.matches(report, today))
        .collect()
}

/// Per-status tab counts over the full collection, independent of the other
/// filter dimensions.
pub fn tab_counts(reports: &[Report]) -> [(ReportStatus, usize); 3] {
    ReportStatus::ALL.map(|status| {
        (
            status,
            reports.iter().filter(|r| r.status == status).count(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, status: ReportStatus, received: NaiveDate) -> Report {
        Report::new(
            id,
            status,
            "Иванова Мария",
            "P-0001",
            "Парацетамол",
            "Кожная сыпь",
            received,
        )
    }

    #[test]
    fn future_dated_reports_pass_week_and_month() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 23).unwrap();
        let tomorrow = today.succ_opt().unwrap();
        let reports = vec![report("2025-0001", ReportStatus::Incoming, tomorrow)];

        let mut criteria = FilterCriteria::default();
        criteria.date = DateFilter::Week;
        assert_eq!(visible(&reports, &criteria, today).len(), 1);

        criteria.date = DateFilter::Today;
        assert!(visible(&reports, &criteria, today).is_empty());
    }

    #[test]
    fn search_matches_the_report_id() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 23).unwrap();
        let reports = vec![report("2025-0042", ReportStatus::Incoming, today)];
        let mut criteria = FilterCriteria::default();
        criteria.search_text = "0042".into();
        assert_eq!(visible(&reports, &criteria, today).len(), 1);
    }

    #[test]
    fn reset_filters_keeps_the_active_tab() {
        let mut criteria = FilterCriteria::for_tab(ReportStatus::Analysis);
        criteria.search_text = "зуд".into();
        criteria.date = DateFilter::Month;
        criteria.reset_filters();
        assert_eq!(criteria, FilterCriteria::for_tab(ReportStatus::Analysis));
    }
}
