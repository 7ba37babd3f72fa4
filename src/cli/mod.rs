//! Interactive terminal front end: main menu, intake wizard, dashboard.

pub mod dashboard;
pub mod forms;
pub mod intake;
pub mod io;
pub mod output;
pub mod steps;

use chrono::Local;
use dialoguer::theme::ColorfulTheme;
use tracing::warn;

use crate::config::{Config, ConfigManager};
use crate::errors::IntakeError;
use crate::registry::seed::seed_reports;
use crate::registry::ReportRegistry;
use crate::report::{AttachmentPolicy, ReportStatus};
use crate::utils::build_info;

/// Entry point for the interactive CLI.
pub fn run_cli() -> Result<(), IntakeError> {
    let theme = ColorfulTheme::default();
    let config = load_config();
    let today = Local::now().date_naive();

    let mut registry = ReportRegistry::with_reports(seed_reports(today));
    let policy = AttachmentPolicy::with_max_bytes(config.max_attachment_bytes());
    let initial_tab = parse_tab(config.default_tab.as_deref());

    loop {
        output::section("Фармаконадзор: сообщения о побочных эффектах");
        let items = vec![
            "Список сообщений".to_string(),
            "Новое сообщение".to_string(),
            "Версия".to_string(),
            "Выход".to_string(),
        ];
        match io::select(&theme, "Главное меню", &items)? {
            0 => dashboard::run_dashboard(&theme, &mut registry, initial_tab, today)?,
            1 => intake::run_wizard(&theme, &mut registry, policy, today)?,
            2 => output::info(build_info::banner()),
            _ => return Ok(()),
        }
    }
}

fn load_config() -> Config {
    match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => config,
        Err(err) => {
            warn!(%err, "falling back to default configuration");
            output::warning(format!("Не удалось загрузить настройки: {err}"));
            Config::default()
        }
    }
}

fn parse_tab(value: Option<&str>) -> ReportStatus {
    match value {
        Some("clarification") => ReportStatus::Clarification,
        Some("analysis") => ReportStatus::Analysis,
        _ => ReportStatus::Incoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tab_falls_back_to_incoming() {
        assert_eq!(parse_tab(None), ReportStatus::Incoming);
        assert_eq!(parse_tab(Some("unknown")), ReportStatus::Incoming);
        assert_eq!(parse_tab(Some("analysis")), ReportStatus::Analysis);
    }
}
