/// Scripted record/undo/redo session over a key/value document.
use std::collections::BTreeMap;

use anyhow::{bail, Result};
use rewind_history::{Command, HistoryManager};

/// The document the session edits.
pub type Document = BTreeMap<String, String>;

/// Sets one property, remembering the value it replaced.
#[derive(Debug)]
pub struct SetValue {
    prop: String,
    value: String,
    previous: Option<String>,
}

impl SetValue {
    pub fn new(doc: &Document, prop: &str, value: &str) -> Self {
        Self {
            prop: prop.to_string(),
            value: value.to_string(),
            previous: doc.get(prop).cloned(),
        }
    }
}

impl Command<Document> for SetValue {
    fn apply(&mut self, doc: &mut Document) -> Result<()> {
        doc.insert(self.prop.clone(), self.value.clone());
        Ok(())
    }

    fn invert(&mut self, doc: &mut Document) -> Result<()> {
        match &self.previous {
            Some(old) => doc.insert(self.prop.clone(), old.clone()),
            None => doc.remove(&self.prop),
        };
        Ok(())
    }

    fn name(&self) -> &str {
        "set-value"
    }
}

/// Parses `key=value` into its parts.
pub fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("expected KEY=VALUE, got {raw:?}"),
    }
}

/// One line of session output: the step and the document afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub action: String,
    pub snapshot: String,
}

/// Renders a document as `{k=v, ...}`.
pub fn render(doc: &Document) -> String {
    let pairs: Vec<String> = doc.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", pairs.join(", "))
}

/// Commits each assignment as its own batch, then undoes everything
/// and redoes everything, returning a snapshot after each step.
///
/// Assignments inside one argument separated by `,` share a batch.
pub fn run(
    history: &mut HistoryManager<Document>,
    doc: &mut Document,
    batches: &[String],
) -> Result<Vec<Step>> {
    let mut steps = Vec::new();

    for batch in batches {
        // Reject the whole batch before touching the document.
        let assignments = batch
            .split(',')
            .map(|a| parse_assignment(a.trim()))
            .collect::<Result<Vec<_>>>()?;

        for (key, value) in assignments {
            let mut cmd = SetValue::new(doc, key, value);
            cmd.apply(doc)?;
            history.record(cmd);
        }
        history.save();
        steps.push(Step {
            action: format!("save {batch}"),
            snapshot: render(doc),
        });
    }

    while history.undo(doc)? {
        steps.push(Step {
            action: "undo".to_string(),
            snapshot: render(doc),
        });
    }

    while history.redo(doc)? {
        steps.push(Step {
            action: "redo".to_string(),
            snapshot: render(doc),
        });
    }

    Ok(steps)
}
