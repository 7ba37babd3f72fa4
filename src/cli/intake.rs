//! Interactive intake flow: progress banner, step menus, the files step, and
//! the final submission handoff.

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;

use crate::cli::forms::{DialoguerInteraction, FormEngine, FormResult};
use crate::cli::steps::{initial_values, patch_from_values, step_form};
use crate::cli::{io, output};
use crate::errors::IntakeError;
use crate::registry::ReportRegistry;
use crate::report::{AttachmentPolicy, DraftPatch, FileAttachment, FileCandidate};
use crate::wizard::{validate_step, StepMark, WizardController, WizardStep};

const SUBMIT_THANKS: &str = "Спасибо за вашу информацию. Ваш отчет будет рассмотрен специалистами по фармаконадзору.";

/// Runs the five-step wizard. Returns after submission or cancellation.
pub fn run_wizard(
    theme: &ColorfulTheme,
    registry: &mut ReportRegistry,
    policy: AttachmentPolicy,
    today: NaiveDate,
) -> Result<(), IntakeError> {
    let mut controller = WizardController::new();
    let mut interaction = DialoguerInteraction::new();

    output::section("Сообщить о побочном эффекте");
    output::info("Заполните форму ниже и прикрепите файлы, если это необходимо.");

    loop {
        render_progress(&controller);
        let step = controller.current_step();

        if step == WizardStep::Files {
            match run_files_step(theme, &mut controller, registry, policy, today)? {
                FilesOutcome::Submitted => return Ok(()),
                FilesOutcome::Back => continue,
                FilesOutcome::Cancelled => {
                    output::info("Заполнение отменено.");
                    return Ok(());
                }
            }
        }

        match step_menu(theme, step)? {
            StepAction::Fill => {
                fill_step(&mut interaction, &mut controller, step)?;
            }
            StepAction::Back => controller.back(),
            StepAction::SkipToFiles => controller.skip_to_files(),
            StepAction::SkipToLast => controller.skip_to_last(),
            StepAction::Leave => {
                output::info("Заполнение отменено.");
                return Ok(());
            }
        }
    }
}

fn fill_step(
    interaction: &mut DialoguerInteraction,
    controller: &mut WizardController,
    step: WizardStep,
) -> Result<(), IntakeError> {
    let descriptor = match step_form(step) {
        Some(descriptor) => descriptor,
        None => return Ok(()),
    };
    let initial = initial_values(step, controller.draft());

    match FormEngine::new(descriptor).run(interaction, &initial) {
        FormResult::Completed(values) => {
            let patch = patch_from_values(step, &values)?;
            let candidate = controller.draft().merge(&patch);
            let validation = validate_step(step, &candidate);
            if validation.is_valid() {
                controller.next(patch);
            } else {
                for (field, message) in validation.errors() {
                    output::error(format!("{field}: {message}"));
                }
            }
        }
        FormResult::Back => controller.back(),
        FormResult::Cancelled => {
            output::warning("Шаг не сохранен.");
        }
    }
    Ok(())
}

enum StepAction {
    Fill,
    Back,
    SkipToFiles,
    SkipToLast,
    Leave,
}

fn step_menu(theme: &ColorfulTheme, step: WizardStep) -> Result<StepAction, IntakeError> {
    let mut items = vec!["Заполнить шаг".to_string()];
    let mut actions = vec![StepAction::Fill];

    if step != WizardStep::FIRST {
        items.push("Назад".to_string());
        actions.push(StepAction::Back);
    }
    if step == WizardStep::FIRST {
        items.push("Перейти к файлам".to_string());
        actions.push(StepAction::SkipToFiles);
    }
    items.push("Пропустить оставшиеся шаги".to_string());
    actions.push(StepAction::SkipToLast);
    items.push("Вернуться к списку".to_string());
    actions.push(StepAction::Leave);

    let prompt = format!("Шаг {} из 5: {}", step.id(), step.title());
    let choice = io::select(theme, &prompt, &items)?;
    Ok(actions.swap_remove(choice))
}

fn render_progress(controller: &WizardController) {
    let line = controller
        .marks()
        .into_iter()
        .map(|(step, mark)| {
            let symbol = match mark {
                StepMark::Completed => "✓",
                StepMark::Skipped => "→",
                StepMark::Current => "●",
                StepMark::Upcoming => "○",
            };
            let suffix = if mark == StepMark::Skipped {
                " (пропущено)"
            } else {
                ""
            };
            format!("[{symbol}] {}{}", step.title(), suffix)
        })
        .collect::<Vec<_>>()
        .join("  ");
    println!();
    println!("{line}");
}

enum FilesOutcome {
    Submitted,
    Back,
    Cancelled,
}

fn run_files_step(
    theme: &ColorfulTheme,
    controller: &mut WizardController,
    registry: &mut ReportRegistry,
    policy: AttachmentPolicy,
    today: NaiveDate,
) -> Result<FilesOutcome, IntakeError> {
    let mut section = controller.draft().files.clone();
    output::info("Поддерживаемые форматы: JPG, PNG, PDF, DOCX, XLSX (максимум 10 МБ на файл).");

    if io::confirm_action(theme, "Прикрепить файлы?", false)? {
        let attachments = collect_attachments(theme, policy)?;
        if !attachments.is_empty() {
            let mut descriptions = section.file_descriptions.take().unwrap_or_default();
            for attachment in &attachments {
                let prompt = format!("Описание файла {} (необязательно)", attachment.file_name);
                let description = io::prompt_optional_text(theme, &prompt)?;
                if !description.trim().is_empty() {
                    descriptions
                        .insert(attachment.file_name.clone(), description.trim().to_string());
                }
            }
            section.file_descriptions = Some(descriptions);
            let mut all = section.attachments.take().unwrap_or_default();
            all.extend(attachments);
            section.attachments = Some(all);
        }
    }

    let additional = io::prompt_optional_text(theme, "Дополнительная информация (необязательно)")?;
    if !additional.trim().is_empty() {
        section.additional_info = Some(additional.trim().to_string());
    }

    let items = vec![
        "Отправить отчет".to_string(),
        "Назад".to_string(),
        "Начать заново".to_string(),
        "Вернуться к списку".to_string(),
    ];
    match io::select(theme, "Файлы и отправка", &items)? {
        0 => {
            let draft = controller.submit(DraftPatch::Files(section));
            let report = registry.submit(draft, today);
            output::success("Отчет успешно отправлен!");
            output::info(SUBMIT_THANKS);
            output::info(format!("Номер сообщения: {}", report.id));
            Ok(FilesOutcome::Submitted)
        }
        1 => {
            controller.back();
            Ok(FilesOutcome::Back)
        }
        2 => {
            controller.go_back_to_first();
            Ok(FilesOutcome::Back)
        }
        _ => Ok(FilesOutcome::Cancelled),
    }
}

/// Gathers one batch of candidate paths and screens it through the policy.
/// Rejected files produce notices; the rest of the batch is unaffected.
fn collect_attachments(
    theme: &ColorfulTheme,
    policy: AttachmentPolicy,
) -> Result<Vec<FileAttachment>, IntakeError> {
    let mut batch = Vec::new();
    loop {
        let path = io::prompt_optional_text(theme, "Путь к файлу (пусто — завершить)")?;
        let path = path.trim();
        if path.is_empty() {
            break;
        }
        match FileCandidate::from_path(std::path::Path::new(path)) {
            Ok(candidate) => batch.push(candidate),
            Err(err) => output::error(format!("Не удалось прочитать файл {path}: {err}")),
        }
    }

    let outcome = policy.admit(batch);
    for rejected in &outcome.rejected {
        output::error(rejected.message());
    }
    if !outcome.accepted.is_empty() {
        output::success(format!("Загружено файлов: {}", outcome.accepted.len()));
    }
    Ok(outcome.accepted)
}
