//! Wizard-style form framework for the intake steps.
//!
//! Each step declares its fields once; the engine walks them in order,
//! validates answers, and supports back-navigation and cancellation. The
//! prompting side is abstracted behind [`FormInteraction`] so tests can
//! script answers without a terminal.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use dialoguer::theme::ColorfulTheme;

use crate::cli::io;
use crate::cli::output;
use crate::errors::IntakeError;
use crate::wizard::validate::is_valid_email;

pub const REQUIRED_MESSAGE: &str = "Обязательное поле";

/// Token a user can type to step back to the previous field.
pub const BACK_TOKEN: &str = "<";
/// Token a user can type to abort the wizard.
pub const CANCEL_TOKEN: &str = "!q";

/// High-level lifecycle states emitted by the form runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    /// Back requested from the first field; the caller decides what
    /// "previous" means (usually the previous wizard step).
    Back,
    Cancelled,
}

/// Describes how prompts can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// User supplied a concrete value (possibly empty).
    Value(String),
    /// User chose to keep the current value.
    Keep,
    /// Go back to the previous field.
    Back,
    /// Abort the entire wizard immediately.
    Cancel,
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Supported data kinds for form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Date,
    Time,
    Choice(Vec<String>),
}

type ValidatorCallback = dyn Fn(&str) -> Result<String, String> + Send + Sync;
type SharedValidatorCallback = Arc<ValidatorCallback>;

/// Built-in validation helpers.
#[derive(Clone)]
pub enum Validator {
    None,
    NonEmpty,
    Integer,
    PositiveNumber,
    Date,
    Time,
    Email,
    OneOf(Vec<String>),
    Custom(SharedValidatorCallback),
}

impl Validator {
    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        match self {
            Validator::None => Ok(input.to_string()),
            Validator::NonEmpty => {
                if input.trim().is_empty() {
                    Err(ValidationError::new(REQUIRED_MESSAGE))
                } else {
                    Ok(input.trim().to_string())
                }
            }
            Validator::Integer => input
                .trim()
                .parse::<i64>()
                .map(|v| v.to_string())
                .map_err(|_| ValidationError::new("Введите целое число")),
            Validator::PositiveNumber => input
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::new("Введите число"))
                .and_then(|v| {
                    if v > 0.0 {
                        Ok(v.to_string())
                    } else {
                        Err(ValidationError::new("Значение должно быть больше нуля"))
                    }
                }),
            Validator::Date => NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
                .map(|d| d.to_string())
                .map_err(|_| ValidationError::new("Используйте формат ГГГГ-ММ-ДД")),
            Validator::Time => NaiveTime::parse_from_str(input.trim(), "%H:%M")
                .map(|t| t.format("%H:%M").to_string())
                .map_err(|_| ValidationError::new("Используйте формат ЧЧ:ММ")),
            Validator::Email => {
                if is_valid_email(input.trim()) {
                    Ok(input.trim().to_string())
                } else {
                    Err(ValidationError::new("Неверный формат email"))
                }
            }
            Validator::OneOf(options) => {
                let normalized = input.trim().to_lowercase();
                options
                    .iter()
                    .find(|candidate| candidate.to_lowercase() == normalized)
                    .cloned()
                    .ok_or_else(|| {
                        ValidationError::new(format!(
                            "Выберите один из вариантов: {}",
                            options.join(", ")
                        ))
                    })
            }
            Validator::Custom(func) => func(input).map_err(ValidationError::new),
        }
    }
}

/// Declarative description of a single form field.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    pub validator: Validator,
}

impl FieldDescriptor {
    pub fn new(
        key: &'static str,
        label: &'static str,
        kind: FieldKind,
        validator: Validator,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
            help: None,
            validator,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

/// Metadata describing a full step form, including field order.
pub struct FormDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }
}

/// Everything an interaction needs to render one prompt.
pub struct PromptContext<'a> {
    pub field: &'a FieldDescriptor,
    pub position: usize,
    pub total: usize,
    pub current: Option<&'a str>,
    pub error: Option<&'a str>,
}

/// Prompting backend; the real one talks dialoguer, tests use a script.
pub trait FormInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse;
}

/// Walks a form's fields, validating answers and honoring back/cancel.
pub struct FormEngine<'a> {
    descriptor: &'a FormDescriptor,
}

impl<'a> FormEngine<'a> {
    pub fn new(descriptor: &'a FormDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn run(
        &self,
        interaction: &mut dyn FormInteraction,
        initial: &BTreeMap<String, String>,
    ) -> FormResult<BTreeMap<String, String>> {
        let mut values = initial.clone();
        let total = self.descriptor.fields.len();
        let mut index = 0usize;
        let mut error: Option<String> = None;

        while index < total {
            let field = &self.descriptor.fields[index];
            let current = values.get(field.key).filter(|v| !v.is_empty()).cloned();
            let context = PromptContext {
                field,
                position: index + 1,
                total,
                current: current.as_deref(),
                error: error.as_deref(),
            };

            match interaction.prompt_field(&context) {
                PromptResponse::Value(input) => {
                    let trimmed = input.trim();
                    if trimmed.is_empty() {
                        if current.is_some() {
                            // Blank answer keeps the existing value.
                            error = None;
                            index += 1;
                        } else if field.required {
                            error = Some(REQUIRED_MESSAGE.to_string());
                        } else {
                            values.insert(field.key.to_string(), String::new());
                            error = None;
                            index += 1;
                        }
                    } else {
                        match field.validator.validate(trimmed) {
                            Ok(normalized) => {
                                values.insert(field.key.to_string(), normalized);
                                error = None;
                                index += 1;
                            }
                            Err(failure) => error = Some(failure.message),
                        }
                    }
                }
                PromptResponse::Keep => {
                    if current.is_none() && field.required {
                        error = Some(REQUIRED_MESSAGE.to_string());
                    } else {
                        error = None;
                        index += 1;
                    }
                }
                PromptResponse::Back => {
                    if index == 0 {
                        return FormResult::Back;
                    }
                    error = None;
                    index -= 1;
                }
                PromptResponse::Cancel => return FormResult::Cancelled,
            }
        }

        FormResult::Completed(values)
    }
}

/// Terminal-backed interaction used by the real wizard.
pub struct DialoguerInteraction {
    theme: ColorfulTheme,
}

impl DialoguerInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl FormInteraction for DialoguerInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        if let Some(message) = context.error {
            output::error(message);
        }
        if let Some(help) = context.field.help {
            output::info(help);
        }

        let mut label = format!(
            "[{}/{}] {}",
            context.position, context.total, context.field.label
        );
        if let Some(current) = context.current {
            label.push_str(&format!(" (текущее: {current})"));
        } else if !context.field.required {
            label.push_str(" (необязательно)");
        }

        match &context.field.kind {
            FieldKind::Choice(options) => {
                let mut items: Vec<String> = options.clone();
                items.push("‹ Назад".to_string());
                items.push("✕ Отменить заполнение".to_string());
                match io::select(&self.theme, &label, &items) {
                    Ok(choice) if choice < options.len() => {
                        PromptResponse::Value(options[choice].clone())
                    }
                    Ok(choice) if choice == options.len() => PromptResponse::Back,
                    Ok(_) => PromptResponse::Cancel,
                    Err(_) => PromptResponse::Cancel,
                }
            }
            _ => match io::prompt_optional_text(&self.theme, &label) {
                Ok(input) if input.trim() == BACK_TOKEN => PromptResponse::Back,
                Ok(input) if input.trim() == CANCEL_TOKEN => PromptResponse::Cancel,
                Ok(input) => PromptResponse::Value(input),
                Err(IntakeError::Prompt(_)) => PromptResponse::Cancel,
                Err(_) => PromptResponse::Cancel,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct MockInteraction {
        responses: VecDeque<PromptResponse>,
    }

    impl MockInteraction {
        fn new(responses: Vec<PromptResponse>) -> Self {
            Self {
                responses: responses.into(),
            }
        }
    }

    impl FormInteraction for MockInteraction {
        fn prompt_field(&mut self, _context: &PromptContext<'_>) -> PromptResponse {
            self.responses
                .pop_front()
                .unwrap_or(PromptResponse::Cancel)
        }
    }

    fn test_form() -> FormDescriptor {
        FormDescriptor::new(
            "test",
            vec![
                FieldDescriptor::new("name", "ФИО", FieldKind::Text, Validator::NonEmpty),
                FieldDescriptor::new("age", "Возраст", FieldKind::Integer, Validator::Integer),
                FieldDescriptor::new("notes", "Примечания", FieldKind::Text, Validator::None)
                    .with_optional(),
            ],
        )
    }

    #[test]
    fn engine_completes_with_validated_values() {
        let descriptor = test_form();
        let engine = FormEngine::new(&descriptor);
        let mut interaction = MockInteraction::new(vec![
            PromptResponse::Value("Иванова Мария".into()),
            PromptResponse::Value("34".into()),
            PromptResponse::Value("".into()),
        ]);

        match engine.run(&mut interaction, &BTreeMap::new()) {
            FormResult::Completed(values) => {
                assert_eq!(values.get("name").unwrap(), "Иванова Мария");
                assert_eq!(values.get("age").unwrap(), "34");
                assert_eq!(values.get("notes").unwrap(), "");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn engine_reprompts_on_invalid_input() {
        let descriptor = test_form();
        let engine = FormEngine::new(&descriptor);
        let mut interaction = MockInteraction::new(vec![
            PromptResponse::Value("".into()), // required, rejected
            PromptResponse::Value("Петров".into()),
            PromptResponse::Value("тридцать".into()), // not an integer
            PromptResponse::Value("30".into()),
            PromptResponse::Keep,
        ]);

        match engine.run(&mut interaction, &BTreeMap::new()) {
            FormResult::Completed(values) => {
                assert_eq!(values.get("age").unwrap(), "30");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn back_on_first_field_bubbles_up() {
        let descriptor = test_form();
        let engine = FormEngine::new(&descriptor);
        let mut interaction = MockInteraction::new(vec![PromptResponse::Back]);
        assert_eq!(
            engine.run(&mut interaction, &BTreeMap::new()),
            FormResult::Back
        );
    }

    #[test]
    fn back_revisits_the_previous_field() {
        let descriptor = test_form();
        let engine = FormEngine::new(&descriptor);
        let mut interaction = MockInteraction::new(vec![
            PromptResponse::Value("Иванова".into()),
            PromptResponse::Back,
            PromptResponse::Value("Иванова Мария".into()),
            PromptResponse::Value("34".into()),
            PromptResponse::Keep,
        ]);

        match engine.run(&mut interaction, &BTreeMap::new()) {
            FormResult::Completed(values) => {
                assert_eq!(values.get("name").unwrap(), "Иванова Мария");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn blank_answer_keeps_the_prefilled_value() {
        let descriptor = test_form();
        let engine = FormEngine::new(&descriptor);
        let mut initial = BTreeMap::new();
        initial.insert("name".to_string(), "Сидорова".to_string());
        let mut interaction = MockInteraction::new(vec![
            PromptResponse::Value("".into()),
            PromptResponse::Value("41".into()),
            PromptResponse::Keep,
        ]);

        match engine.run(&mut interaction, &initial) {
            FormResult::Completed(values) => {
                assert_eq!(values.get("name").unwrap(), "Сидорова");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn cancel_aborts_immediately() {
        let descriptor = test_form();
        let engine = FormEngine::new(&descriptor);
        let mut interaction = MockInteraction::new(vec![
            PromptResponse::Value("Иванова".into()),
            PromptResponse::Cancel,
        ]);
        assert_eq!(
            engine.run(&mut interaction, &BTreeMap::new()),
            FormResult::Cancelled
        );
    }
}
