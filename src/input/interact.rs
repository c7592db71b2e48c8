use super::set::InputSet;
use crate::choices::ChoiceProvider;
use crate::phrases::Phrasebook;
use crate::traits::UserInput;
use anyhow::{Result, anyhow};

/// Prompt for every unresolved input, in declaration order.
///
/// Inputs with choices get a selection list (first entry pre-selected) and
/// store the chosen entry's key; the rest are asked for free text.
pub fn interact(
    inputs: &mut InputSet,
    provider: &mut dyn ChoiceProvider,
    prompt: &dyn UserInput,
    phrases: &Phrasebook,
) -> Result<()> {
    for name in inputs.unresolved() {
        let choices = provider.choices(name, true, inputs)?;

        if !choices.is_empty() {
            tracing::debug!(input = name, count = choices.len(), "Prompting with choices");
            let question = phrases.phrase(inputs.command(), &format!("choose_{}", name), &());
            let index = prompt.select(&question, choices.labels(), 0)?;
            let key = choices
                .key_at(index)
                .cloned()
                .ok_or_else(|| anyhow!("Choice {} is not one of the offered choices", index))?;
            inputs.set(name, key)?;
            continue;
        }

        tracing::debug!(input = name, "Prompting for free text");
        let question = phrases.phrase(inputs.command(), &format!("ask_{}", name), &());
        let answer = prompt.text(&question, None)?;
        inputs.set(name, answer)?;
    }

    Ok(())
}
