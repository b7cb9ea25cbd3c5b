use crate::error::{DryError, Result};
use crate::process::{Invocation, Outcome, Runner};
use std::collections::{HashMap, VecDeque};

/// Runner that never starts a process. It records every invocation and replies
/// with scripted outcomes per program (`Success` when nothing is scripted).
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    pub calls: Vec<Invocation>,
    outcomes: HashMap<String, VecDeque<Outcome>>,
    missing: Vec<String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome for the next run of `program`.
    pub fn script(mut self, program: &str, outcome: Outcome) -> Self {
        self.outcomes
            .entry(program.to_string())
            .or_default()
            .push_back(outcome);
        self
    }

    /// Makes launching `program` fail as if it were not installed.
    pub fn missing(mut self, program: &str) -> Self {
        self.missing.push(program.to_string());
        self
    }

    pub fn programs(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.program.as_str()).collect()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls.iter().map(Invocation::command_line).collect()
    }
}

impl Runner for ScriptedRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<Outcome> {
        self.calls.push(invocation.clone());

        if self.missing.contains(&invocation.program) {
            return Err(DryError::Tool {
                program: invocation.program.clone(),
                message: "No such file or directory (os error 2)".to_string(),
            });
        }

        Ok(self
            .outcomes
            .get_mut(&invocation.program)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Outcome::Success))
    }
}
