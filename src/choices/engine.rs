use super::pad::{field_text, pad_columns};
use super::{ChoiceKey, ChoiceProvider, ChoiceSet};
use crate::api::{Collection, Endpoint, Record};
use crate::error::{ChoiceDomain, CliError, ErrorContext};
use crate::input::{Filter, InputSet};
use crate::phrases::Phrasebook;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Where a choice list comes from, narrowed by already-resolved inputs
#[derive(Debug, Clone)]
pub struct Scope {
    pub collection: Collection,
    pub filter: Filter,
    /// Reported with `NoChoicesAvailable`
    pub context: ErrorContext,
    /// Record whose fields are added to `context` when the list is empty
    pub owner: Option<Owner>,
}

/// Parent resource of a scoped collection
#[derive(Debug, Clone)]
pub struct Owner {
    pub collection: Collection,
    pub id: String,
    pub fields: &'static [&'static str],
}

impl Scope {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filter: Filter::new(),
            context: ErrorContext::new(),
            owner: None,
        }
    }

    pub fn filter(mut self, key: &str, value: &str) -> Self {
        self.filter.insert(key.to_string(), value.to_string());
        self
    }

    pub fn context(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.context = self.context.with(key, value);
        self
    }

    pub fn owned_by(
        mut self,
        collection: Collection,
        id: impl ToString,
        fields: &'static [&'static str],
    ) -> Self {
        self.owner = Some(Owner {
            collection,
            id: id.to_string(),
            fields,
        });
        self
    }
}

/// Configuration of one resource domain's choice list
#[derive(Clone, Copy)]
pub struct ChoiceSource {
    pub domain: ChoiceDomain,
    pub scope: fn(&InputSet) -> Result<Scope, CliError>,
    /// Record field holding the machine key
    pub key_field: &'static str,
    /// Record field shown when choices are not formatted
    pub label_field: &'static str,
    /// Columns padded to equal width before rendering descriptions
    pub padded: &'static [&'static str],
    /// Phrase key of the description template
    pub description: &'static str,
}

/// Fetched records per input name, owned by a single command run
#[derive(Debug, Default)]
pub struct ChoiceCache(HashMap<String, Vec<Record>>);

impl ChoiceCache {
    pub fn get(&self, input: &str) -> Option<&[Record]> {
        self.0.get(input).map(Vec::as_slice)
    }

    pub fn insert(&mut self, input: &str, records: Vec<Record>) {
        self.0.insert(input.to_string(), records);
    }
}

/// Choice provider backed by the API.
///
/// Each input name is fetched at most once per engine; later calls, formatted
/// or not, are served from the cache.
pub struct ChoiceEngine<'a> {
    endpoint: &'a dyn Endpoint,
    phrases: &'a Phrasebook,
    sources: IndexMap<&'static str, ChoiceSource>,
    cache: ChoiceCache,
}

impl<'a> ChoiceEngine<'a> {
    pub fn new(endpoint: &'a dyn Endpoint, phrases: &'a Phrasebook) -> Self {
        Self {
            endpoint,
            phrases,
            sources: IndexMap::new(),
            cache: ChoiceCache::default(),
        }
    }

    pub fn with_source(mut self, input: &'static str, source: ChoiceSource) -> Self {
        self.sources.insert(input, source);
        self
    }

    fn records(
        &mut self,
        input: &str,
        source: &ChoiceSource,
        inputs: &InputSet,
    ) -> Result<Vec<Record>, CliError> {
        if let Some(records) = self.cache.get(input) {
            tracing::trace!(input, "Choices served from cache");
            return Ok(records.to_vec());
        }

        let scope = (source.scope)(inputs)?;
        tracing::debug!(input, collection = %scope.collection, "Fetching choices");
        let records = self.endpoint.list(&scope.collection, &scope.filter)?;

        if records.is_empty() {
            return Err(CliError::NoChoicesAvailable {
                domain: source.domain,
                context: self.describe_owner(scope.context, scope.owner.as_ref()),
            });
        }

        self.cache.insert(input, records.clone());
        Ok(records)
    }

    /// Best effort: a failed lookup leaves the context as it was
    fn describe_owner(&self, context: ErrorContext, owner: Option<&Owner>) -> ErrorContext {
        let Some(owner) = owner else {
            return context;
        };

        match self.endpoint.retrieve(&owner.collection, &owner.id) {
            Ok(record) => owner.fields.iter().fold(context, |context, field| {
                match record.get(*field) {
                    Some(value) => context.with(*field, value.clone()),
                    None => context,
                }
            }),
            Err(err) => {
                tracing::debug!(
                    collection = %owner.collection,
                    id = %owner.id,
                    error = %err,
                    "Owner lookup failed"
                );
                context
            }
        }
    }
}

impl ChoiceProvider for ChoiceEngine<'_> {
    fn choices(
        &mut self,
        input: &str,
        formatted: bool,
        inputs: &InputSet,
    ) -> Result<ChoiceSet, CliError> {
        let Some(source) = self.sources.get(input).copied() else {
            return Ok(ChoiceSet::new());
        };

        let records = self.records(input, &source, inputs)?;
        let key_of = |record: &Record| {
            let key = record.get(source.key_field).and_then(ChoiceKey::from_value);
            if key.is_none() {
                tracing::warn!(input, field = source.key_field, "Choice record has no usable key");
            }
            key
        };

        if !formatted {
            return Ok(records
                .iter()
                .filter_map(|record| Some((key_of(record)?, field_text(record, source.label_field))))
                .collect());
        }

        let padded = pad_columns(&records, source.padded);
        Ok(records
            .iter()
            .zip(&padded)
            .filter_map(|(record, row)| {
                Some((key_of(record)?, self.phrases.text(source.description, row)))
            })
            .collect())
    }
}
