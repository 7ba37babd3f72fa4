//! Notification surface: colored, labeled terminal messages.

use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "[i]",
        MessageKind::Success => "[✓]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
    }
}

fn paint(kind: MessageKind, text: &str) -> String {
    match kind {
        MessageKind::Info => text.cyan().to_string(),
        MessageKind::Success => text.green().to_string(),
        MessageKind::Warning => text.yellow().to_string(),
        MessageKind::Error => text.red().to_string(),
    }
}

/// Emits one notification line.
pub fn notify(kind: MessageKind, message: impl fmt::Display) {
    let line = format!("{} {}", label(kind), message);
    println!("{}", paint(kind, &line));
}

pub fn info(message: impl fmt::Display) {
    notify(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    notify(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    notify(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    notify(MessageKind::Error, message);
}

/// Section header used above menus and tables.
pub fn section(title: impl fmt::Display) {
    println!();
    println!("{}", title.to_string().bold());
}
