//! Review dashboard: tabbed report list, filters, and the detail view with
//! status transitions, confirmation, and completeness toggles.

use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;

use crate::cli::{io, output};
use crate::errors::IntakeError;
use crate::registry::{
    tab_counts, visible, DateFilter, FilterCriteria, MedicationFilter, ReportRegistry,
    SeverityFilter,
};
use crate::report::{CompletenessField, Report, ReportStatus, Severity};

/// Runs the list/review loop until the user goes back to the main menu.
pub fn run_dashboard(
    theme: &ColorfulTheme,
    registry: &mut ReportRegistry,
    initial_tab: ReportStatus,
    today: NaiveDate,
) -> Result<(), IntakeError> {
    let mut criteria = FilterCriteria::for_tab(initial_tab);

    loop {
        render_list(registry, &criteria, today);

        let items = vec![
            "Открыть сообщение".to_string(),
            "Сменить вкладку".to_string(),
            "Поиск".to_string(),
            "Фильтр по препарату".to_string(),
            "Фильтр по тяжести".to_string(),
            "Фильтр по дате".to_string(),
            "Сбросить фильтры".to_string(),
            "Назад".to_string(),
        ];
        match io::select(theme, "Список сообщений", &items)? {
            0 => open_report(theme, registry, &criteria, today)?,
            1 => {
                let labels: Vec<String> = ReportStatus::ALL
                    .iter()
                    .map(|status| status.to_string())
                    .collect();
                let choice = io::select(theme, "Вкладка", &labels)?;
                criteria.active_tab = ReportStatus::ALL[choice];
            }
            2 => {
                criteria.search_text =
                    io::prompt_optional_text(theme, "Поиск по пациенту, препарату, эффекту, номеру")?
                        .trim()
                        .to_string();
            }
            3 => {
                let mut labels = vec!["Все препараты".to_string()];
                labels.extend(registry.medication_names());
                let choice = io::select(theme, "Препарат", &labels)?;
                criteria.medication = if choice == 0 {
                    MedicationFilter::All
                } else {
                    MedicationFilter::Named(labels[choice].clone())
                };
            }
            4 => {
                let mut labels = vec!["Все степени".to_string()];
                labels.extend(Severity::ALL.iter().map(|s| s.to_string()));
                let choice = io::select(theme, "Степень тяжести", &labels)?;
                criteria.severity = if choice == 0 {
                    SeverityFilter::All
                } else {
                    SeverityFilter::Is(Severity::ALL[choice - 1])
                };
            }
            5 => {
                let labels: Vec<String> = DateFilter::ALL_OPTIONS
                    .iter()
                    .map(|f| f.to_string())
                    .collect();
                let choice = io::select(theme, "Дата получения", &labels)?;
                criteria.date = DateFilter::ALL_OPTIONS[choice];
            }
            6 => criteria.reset_filters(),
            _ => return Ok(()),
        }
    }
}

fn render_list(registry: &ReportRegistry, criteria: &FilterCriteria, today: NaiveDate) {
    output::section("Управление сообщениями о побочных эффектах");

    let counts = tab_counts(registry.reports());
    let tabs = counts
        .iter()
        .map(|(status, count)| {
            let label = format!("{status} ({count})");
            if *status == criteria.active_tab {
                label.bold().underline().to_string()
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join("   ");
    println!("{tabs}");

    if !criteria.search_text.is_empty() {
        println!("Поиск: {}", criteria.search_text);
    }

    let reports = visible(registry.reports(), criteria, today);
    if reports.is_empty() {
        output::info("Нет сообщений по выбранным фильтрам.");
        return;
    }
    for report in reports {
        println!("{}", summary_line(registry, report));
    }
}

fn summary_line(registry: &ReportRegistry, report: &Report) -> String {
    let severity = report
        .severity
        .map(|s| s.to_string())
        .unwrap_or_else(|| "—".to_string());
    let mut line = format!(
        "#{}  {}  {}  {}  {}  {}",
        report.id,
        report.date_received,
        report.patient_name,
        report.medication_name,
        report.adverse_effect,
        severity,
    );
    if report.confirmed {
        line.push_str("  ✓");
    }
    if registry.just_confirmed(&report.id) {
        line.push_str(" (подтверждено)");
    }
    line
}

fn open_report(
    theme: &ColorfulTheme,
    registry: &mut ReportRegistry,
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> Result<(), IntakeError> {
    let ids: Vec<String> = visible(registry.reports(), criteria, today)
        .iter()
        .map(|report| report.id.clone())
        .collect();
    if ids.is_empty() {
        output::info("Нет сообщений по выбранным фильтрам.");
        return Ok(());
    }

    let labels: Vec<String> = ids
        .iter()
        .filter_map(|id| registry.get(id))
        .map(|report| summary_line(registry, report))
        .collect();
    let choice = io::select(theme, "Выберите сообщение", &labels)?;
    let id = ids[choice].clone();
    report_details_loop(theme, registry, &id)
}

fn report_details_loop(
    theme: &ColorfulTheme,
    registry: &mut ReportRegistry,
    id: &str,
) -> Result<(), IntakeError> {
    loop {
        let report = registry
            .get(id)
            .ok_or_else(|| IntakeError::ReportNotFound(id.to_string()))?;
        render_details(registry, report);
        let in_analysis = report.status == ReportStatus::Analysis;

        let mut items = vec!["Изменить статус".to_string()];
        if in_analysis {
            // Confirmation is only offered while the report is in Analysis.
            items.push("Подтвердить оценку".to_string());
        }
        items.push("Отметить пункт полноты".to_string());
        items.push("Закрыть".to_string());

        let choice = io::select(theme, format!("Сообщение #{id}").as_str(), &items)?;
        let action = if in_analysis { choice } else { choice + usize::from(choice >= 1) };
        match action {
            0 => change_status(theme, registry, id)?,
            1 => {
                if registry.confirm(id)? {
                    output::success("Оценка подтверждена.");
                }
            }
            2 => toggle_completeness(theme, registry, id)?,
            _ => return Ok(()),
        }
    }
}

fn render_details(registry: &ReportRegistry, report: &Report) {
    output::section(format!("Детали сообщения #{}", report.id));
    println!("Получено: {}", report.date_received);
    println!("Статус: {}", report.status);
    println!("Пациент: {} ({})", report.patient_name, report.patient_id);
    println!("Препарат: {}", report.medication_name);
    println!("Побочный эффект: {}", report.adverse_effect);
    if let Some(severity) = report.severity {
        println!("Степень тяжести: {severity}");
    }
    if let Some(causality) = report.causality_assessment {
        println!("Причинно-следственная связь: {causality}");
    }
    if let Some(significance) = &report.clinical_significance {
        println!("Клиническая значимость: {significance}");
    }
    if let Some(foresight) = &report.definition_foresight {
        println!("Предвиденность: {foresight}");
    }
    if report.confirmed {
        let marker = if registry.just_confirmed(&report.id) {
            "Оценка подтверждена (только что)"
        } else {
            "Оценка подтверждена"
        };
        println!("{}", marker.green());
    }

    if !report.ai_notes.is_empty() {
        println!("Пометки от ИИ-ассистента:");
        for note in &report.ai_notes {
            println!("  • {note}");
        }
    }

    println!(
        "Полнота данных ({} из {}):",
        report.completeness.filled_count(),
        CompletenessField::ALL.len()
    );
    for field in CompletenessField::ALL {
        let mark = if report.completeness.get(field) {
            "[x]"
        } else {
            "[ ]"
        };
        println!("  {mark} {field}");
    }
}

fn change_status(
    theme: &ColorfulTheme,
    registry: &mut ReportRegistry,
    id: &str,
) -> Result<(), IntakeError> {
    let labels: Vec<String> = ReportStatus::ALL
        .iter()
        .map(|status| status.to_string())
        .collect();
    let choice = io::select(theme, "Новый статус", &labels)?;
    let new_status = ReportStatus::ALL[choice];
    let unchanged = registry.get(id).map(|r| r.status) == Some(new_status);
    registry.set_status(id, new_status)?;
    if unchanged {
        output::info("Статус не изменился.");
    } else {
        output::success("Статус изменен.");
    }
    Ok(())
}

fn toggle_completeness(
    theme: &ColorfulTheme,
    registry: &mut ReportRegistry,
    id: &str,
) -> Result<(), IntakeError> {
    let labels: Vec<String> = CompletenessField::ALL
        .iter()
        .map(|field| field.to_string())
        .collect();
    let choice = io::select(theme, "Пункт полноты", &labels)?;
    registry.toggle_completeness(id, CompletenessField::ALL[choice])?;
    Ok(())
}
