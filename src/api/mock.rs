use super::{Collection, Endpoint, Record, plain_filename};
use crate::error::CliError;
use crate::input::Filter;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

fn object(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        other => panic!("mock records must be JSON objects, got {}", other),
    }
}

/// Scripted endpoint for tests.
///
/// Lists and retrieves are staged per collection; every call is recorded so
/// tests can assert on what reached the API.
#[derive(Default)]
pub struct MockEndpoint {
    lists: Mutex<HashMap<Collection, Vec<Record>>>,
    records: Mutex<HashMap<(Collection, String), VecDeque<Record>>>,
    create_responses: Mutex<HashMap<Collection, Record>>,
    failure: Mutex<Option<(u16, String)>>,
    list_calls: Mutex<Vec<(Collection, Filter)>>,
    created: Mutex<Vec<(Collection, Value)>>,
    deleted: Mutex<Vec<(Collection, String)>>,
    downloads: Mutex<Vec<(Collection, String, PathBuf)>>,
}

impl MockEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, collection: Collection, records: Vec<Value>) -> Self {
        self.lists
            .lock()
            .unwrap()
            .insert(collection, records.into_iter().map(object).collect());
        self
    }

    /// Stage a record for `retrieve`; staging the same id again queues a
    /// later state, the last one repeating once reached
    pub fn with_record(self, collection: Collection, id: &str, record: Value) -> Self {
        self.records
            .lock()
            .unwrap()
            .entry((collection, id.to_string()))
            .or_default()
            .push_back(object(record));
        self
    }

    pub fn with_created(self, collection: Collection, record: Value) -> Self {
        self.create_responses
            .lock()
            .unwrap()
            .insert(collection, object(record));
        self
    }

    /// Every call fails with an API error
    pub fn failing(self, status: u16, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some((status, message.to_string()));
        self
    }

    pub fn list_calls(&self, collection: &Collection) -> usize {
        self.list_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == collection)
            .count()
    }

    pub fn last_filter(&self, collection: &Collection) -> Option<Filter> {
        self.list_calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(called, _)| called == collection)
            .map(|(_, filter)| filter.clone())
    }

    pub fn created(&self) -> Vec<(Collection, Value)> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<(Collection, String)> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<(Collection, String, PathBuf)> {
        self.downloads.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), CliError> {
        match self.failure.lock().unwrap().as_ref() {
            Some((status, message)) => Err(CliError::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Endpoint for MockEndpoint {
    fn list(&self, collection: &Collection, filter: &Filter) -> Result<Vec<Record>, CliError> {
        self.list_calls
            .lock()
            .unwrap()
            .push((collection.clone(), filter.clone()));
        self.check_failure()?;

        Ok(self
            .lists
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn retrieve(&self, collection: &Collection, id: &str) -> Result<Record, CliError> {
        self.check_failure()?;

        let mut records = self.records.lock().unwrap();
        let queue = records
            .get_mut(&(collection.clone(), id.to_string()))
            .ok_or_else(|| CliError::Api {
                status: 404,
                message: format!("{}/{} not found", collection, id),
            })?;

        let record = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(record.unwrap_or_default())
    }

    fn create(&self, collection: &Collection, body: &Value) -> Result<Record, CliError> {
        self.created
            .lock()
            .unwrap()
            .push((collection.clone(), body.clone()));
        self.check_failure()?;

        Ok(self
            .create_responses
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn delete(&self, collection: &Collection, id: &str) -> Result<(), CliError> {
        self.check_failure()?;
        self.deleted
            .lock()
            .unwrap()
            .push((collection.clone(), id.to_string()));
        Ok(())
    }

    fn download(
        &self,
        collection: &Collection,
        id: &str,
        dir: &Path,
    ) -> Result<PathBuf, CliError> {
        self.check_failure()?;
        let target = dir.join(plain_filename(id)?);
        self.downloads
            .lock()
            .unwrap()
            .push((collection.clone(), id.to_string(), dir.to_path_buf()));
        Ok(target)
    }
}
