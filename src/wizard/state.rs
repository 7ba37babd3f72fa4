//! Wizard step sequence and skip-set bookkeeping.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The five intake steps, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Patient,
    Doctor,
    Medication,
    AdverseEffect,
    Files,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Patient,
        WizardStep::Doctor,
        WizardStep::Medication,
        WizardStep::AdverseEffect,
        WizardStep::Files,
    ];
    pub const FIRST: WizardStep = WizardStep::Patient;
    pub const LAST: WizardStep = WizardStep::Files;

    /// 1-based step id.
    pub fn id(self) -> u8 {
        match self {
            WizardStep::Patient => 1,
            WizardStep::Doctor => 2,
            WizardStep::Medication => 3,
            WizardStep::AdverseEffect => 4,
            WizardStep::Files => 5,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Patient => "Информация о пациенте",
            WizardStep::Doctor => "Информация о враче",
            WizardStep::Medication => "Информация о препарате",
            WizardStep::AdverseEffect => "Информация о побочном эффекте",
            WizardStep::Files => "Файлы",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// How a step renders on the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMark {
    Completed,
    Skipped,
    Current,
    Upcoming,
}

/// Current step plus the set of step ids bypassed via skip-to-last.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WizardState {
    current: WizardStep,
    skipped: BTreeSet<u8>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            current: WizardStep::FIRST,
            skipped: BTreeSet::new(),
        }
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn skipped(&self) -> &BTreeSet<u8> {
        &self.skipped
    }

    pub fn is_skipped(&self, step: WizardStep) -> bool {
        self.skipped.contains(&step.id())
    }

    /// Moves one step forward, saturating at the final step. The final step
    /// submits instead of advancing.
    pub fn advance(&mut self) {
        if let Some(next) = WizardStep::from_id(self.current.id() + 1) {
            self.current = next;
        }
    }

    /// Moves one step back. From the final step with a non-empty skip-set this
    /// is an undo-skip: the wizard returns to the first step and the skip
    /// markers clear.
    pub fn retreat(&mut self) {
        if self.current == WizardStep::LAST && !self.skipped.is_empty() {
            self.reset();
        } else if let Some(previous) = WizardStep::from_id(self.current.id().saturating_sub(1)) {
            self.current = previous;
        }
    }

    /// Jumps straight to the files step without marking anything as skipped.
    /// Only available from the first step.
    pub fn skip_to_files(&mut self) {
        if self.current == WizardStep::FIRST {
            self.current = WizardStep::LAST;
        }
    }

    /// Jumps to the final step and marks every bypassed step (including the
    /// one active at the time of the skip) so the progress bar can render
    /// them distinctly from completed steps.
    pub fn skip_to_last(&mut self) {
        if self.current == WizardStep::LAST {
            return;
        }
        for id in self.current.id()..WizardStep::LAST.id() {
            self.skipped.insert(id);
        }
        self.current = WizardStep::LAST;
    }

    /// Restarts the full sequence from the first step.
    pub fn go_back_to_first(&mut self) {
        self.reset();
    }

    pub fn reset(&mut self) {
        self.current = WizardStep::FIRST;
        self.skipped.clear();
    }

    /// Progress-bar marks for every step. A previously skipped step that is
    /// active again renders as Current; its skip marker is not cleared by
    /// re-entry.
    pub fn marks(&self) -> Vec<(WizardStep, StepMark)> {
        WizardStep::ALL
            .into_iter()
            .map(|step| {
                let mark = if step == self.current {
                    StepMark::Current
                } else if self.is_skipped(step) {
                    StepMark::Skipped
                } else if step.id() < self.current.id() {
                    StepMark::Completed
                } else {
                    StepMark::Upcoming
                };
                (step, mark)
            })
            .collect()
    }
}
