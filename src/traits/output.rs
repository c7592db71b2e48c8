#[cfg(test)]
use std::sync::Mutex;

/// Output message captured by MockOutput for testing
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum OutputMessage {
    Success(String),
    Warning(String),
    Info(String),
    Section(String),
    KeyValue(usize, String, String),
    Branch(usize, String),
    ListItem(String),
    Suggestion(String, String),
    Plain(String),
    Blank,
}

/// Terminal output surface, mockable for tests
pub trait Output: Send + Sync {
    fn success(&self, message: &str);

    fn warning(&self, message: &str);

    fn info(&self, message: &str);

    /// Print a section header
    fn section(&self, title: &str);

    /// Print a `key: value` line of a summary tree
    fn key_value(&self, depth: usize, key: &str, value: &str);

    /// Print the key of a nested summary object
    fn branch(&self, depth: usize, key: &str);

    fn list_item(&self, text: &str);

    /// Print a follow-up command hint
    fn command_suggestion(&self, description: &str, command: &str);

    /// Print unstyled text (JSON documents)
    fn plain(&self, text: &str);

    fn blank(&self);
}

/// Real terminal output implementation using the output module
pub struct TerminalOutput;

impl Output for TerminalOutput {
    fn success(&self, message: &str) {
        crate::output::success(message);
    }

    fn warning(&self, message: &str) {
        crate::output::warning(message);
    }

    fn info(&self, message: &str) {
        crate::output::info(message);
    }

    fn section(&self, title: &str) {
        crate::output::section(title);
    }

    fn key_value(&self, depth: usize, key: &str, value: &str) {
        crate::output::key_value(depth, key, value);
    }

    fn branch(&self, depth: usize, key: &str) {
        crate::output::branch(depth, key);
    }

    fn list_item(&self, text: &str) {
        crate::output::list_item(text);
    }

    fn command_suggestion(&self, description: &str, command: &str) {
        crate::output::command_suggestion(description, command);
    }

    fn plain(&self, text: &str) {
        crate::output::plain(text);
    }

    fn blank(&self) {
        crate::output::blank();
    }
}

/// Mock output implementation for testing (captures output)
#[cfg(test)]
pub struct MockOutput {
    messages: Mutex<Vec<OutputMessage>>,
}

#[cfg(test)]
impl MockOutput {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Get all captured messages
    pub fn get_messages(&self) -> Vec<OutputMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains_message(&self, message: &OutputMessage) -> bool {
        self.messages.lock().unwrap().contains(message)
    }

    pub fn has_success(&self) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| matches!(m, OutputMessage::Success(_)))
    }

    /// Everything printed through `plain`, joined by newlines
    pub fn plain_text(&self) -> String {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| match m {
                OutputMessage::Plain(text) => Some(text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get all messages formatted as text
    pub fn to_text(&self) -> String {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|msg| match msg {
                OutputMessage::Success(s) => format!("✓ {}", s),
                OutputMessage::Warning(s) => format!("⚠ {}", s),
                OutputMessage::Info(s) => s.clone(),
                OutputMessage::Section(s) => format!("\n=== {} ===", s),
                OutputMessage::KeyValue(depth, k, v) => {
                    format!("{}{}: {}", "  ".repeat(depth + 1), k, v)
                }
                OutputMessage::Branch(depth, k) => format!("{}{}:", "  ".repeat(depth + 1), k),
                OutputMessage::ListItem(s) => format!("  • {}", s),
                OutputMessage::Suggestion(d, c) => format!("  {} {}", d, c),
                OutputMessage::Plain(s) => s.clone(),
                OutputMessage::Blank => String::new(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&self, message: OutputMessage) {
        self.messages.lock().unwrap().push(message);
    }
}

#[cfg(test)]
impl Default for MockOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Output for MockOutput {
    fn success(&self, message: &str) {
        self.push(OutputMessage::Success(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(OutputMessage::Warning(message.to_string()));
    }

    fn info(&self, message: &str) {
        self.push(OutputMessage::Info(message.to_string()));
    }

    fn section(&self, title: &str) {
        self.push(OutputMessage::Section(title.to_string()));
    }

    fn key_value(&self, depth: usize, key: &str, value: &str) {
        self.push(OutputMessage::KeyValue(
            depth,
            key.to_string(),
            value.to_string(),
        ));
    }

    fn branch(&self, depth: usize, key: &str) {
        self.push(OutputMessage::Branch(depth, key.to_string()));
    }

    fn list_item(&self, text: &str) {
        self.push(OutputMessage::ListItem(text.to_string()));
    }

    fn command_suggestion(&self, description: &str, command: &str) {
        self.push(OutputMessage::Suggestion(
            description.to_string(),
            command.to_string(),
        ));
    }

    fn plain(&self, text: &str) {
        self.push(OutputMessage::Plain(text.to_string()));
    }

    fn blank(&self) {
        self.push(OutputMessage::Blank);
    }
}
