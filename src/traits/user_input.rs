use anyhow::Result;
#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::Mutex;

/// Canned answer for [`MockUserInput`]
#[cfg(test)]
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Pick the first option with this label
    Select(String),
    /// Pick the option at this position
    SelectIndex(usize),
    /// Accept whatever option is pre-selected
    SelectDefault,
    Text(String),
    Confirm(bool),
}

/// Prompt surface used by interactive commands
pub trait UserInput: Send + Sync {
    /// Ask the user to pick one of `options` and return its position.
    /// `default` is the pre-selected index.
    fn select(&self, prompt: &str, options: Vec<String>, default: usize) -> Result<usize>;

    /// Ask for free text
    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Ask a yes/no question
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Terminal prompts via the inquire crate
pub struct InquireUserInput;

impl UserInput for InquireUserInput {
    fn select(&self, prompt: &str, options: Vec<String>, default: usize) -> Result<usize> {
        use inquire::Select;
        let answer = Select::new(prompt, options)
            .with_starting_cursor(default)
            .raw_prompt()?;
        Ok(answer.index)
    }

    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        use inquire::Text;
        let mut text_prompt = Text::new(prompt);
        if let Some(default_val) = default {
            text_prompt = text_prompt.with_default(default_val);
        }
        let answer = text_prompt.prompt()?;
        Ok(answer)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        use inquire::Confirm;
        let answer = Confirm::new(prompt).with_default(default).prompt()?;
        Ok(answer)
    }
}

/// Scripted prompt surface for tests.
///
/// Answers are consumed in order and every prompt text is recorded, so tests
/// can assert on the order questions were asked in.
#[cfg(test)]
pub struct MockUserInput {
    responses: Mutex<VecDeque<MockResponse>>,
    prompts: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockUserInput {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Prompt texts seen so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_response(&self, prompt: &str) -> Result<MockResponse> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No more mock responses available for '{}'", prompt))
    }
}

#[cfg(test)]
impl Default for MockUserInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl UserInput for MockUserInput {
    fn select(&self, prompt: &str, options: Vec<String>, default: usize) -> Result<usize> {
        let index = match self.next_response(prompt)? {
            MockResponse::Select(answer) => options
                .iter()
                .position(|option| *option == answer)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Mock response '{}' is not in the provided options: {:?}",
                        answer,
                        options
                    )
                })?,
            MockResponse::SelectIndex(index) => index,
            MockResponse::SelectDefault => default,
            _ => anyhow::bail!("Expected Select response but got a different type"),
        };

        if index >= options.len() {
            anyhow::bail!("Select index {} out of range", index);
        }
        Ok(index)
    }
    fn text(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        match self.next_response(prompt)? {
            MockResponse::Text(answer) if answer.is_empty() => {
                Ok(default.unwrap_or_default().to_string())
            }
            MockResponse::Text(answer) => Ok(answer),
            _ => anyhow::bail!("Expected Text response but got a different type"),
        }
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        match self.next_response(prompt)? {
            MockResponse::Confirm(answer) => Ok(answer),
            _ => anyhow::bail!("Expected Confirm response but got a different type"),
        }
    }
}
