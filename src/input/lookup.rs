use super::set::InputSet;
use crate::choices::ChoiceProvider;
use crate::error::CliError;
use regex::RegexBuilder;

/// Resolve `input` from a fragment of its human-readable label.
///
/// The search is a case-insensitive regular expression, matched literally if
/// it does not compile. Exactly one label must match.
pub fn lookup_choice(
    inputs: &mut InputSet,
    provider: &mut dyn ChoiceProvider,
    input: &str,
    search: &str,
) -> Result<(), CliError> {
    let choices = provider.choices(input, false, inputs)?;

    let pattern = RegexBuilder::new(search)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(search))
                .case_insensitive(true)
                .build()
        });

    let matches: Vec<_> = match &pattern {
        Ok(regex) => choices
            .iter()
            .filter(|(_, label)| regex.is_match(label))
            .collect(),
        Err(_) => {
            let needle = search.to_lowercase();
            choices
                .iter()
                .filter(|(_, label)| label.to_lowercase().contains(&needle))
                .collect()
        }
    };

    match matches.as_slice() {
        [(key, label)] => {
            tracing::debug!(input, search, matched = %label, "Lookup resolved");
            let key = (*key).clone();
            inputs.set(input, key)
        }
        [] => Err(CliError::NoLookupMatch {
            input: input.to_string(),
            lookup: search.to_string(),
            choices: choices.labels(),
        }),
        _ => Err(CliError::LookupMatchAmbiguous {
            input: input.to_string(),
            lookup: search.to_string(),
            matches: matches.iter().map(|(_, label)| label.to_string()).collect(),
        }),
    }
}
