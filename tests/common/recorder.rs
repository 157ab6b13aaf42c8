//! Render sink that records what the client would have shown.

use parking_lot::Mutex;
use parlor::client::Render;
use parlor_proto::Reply;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Reply(Reply),
    Own(String),
    Status(String),
    Prompt(String),
}

#[derive(Default)]
pub struct Recorder {
    shown: Mutex<Vec<Shown>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().clone()
    }

    /// Prompts drawn after the login phase (non-empty identity).
    pub fn prompts(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter_map(|s| match s {
                Shown::Prompt(name) if !name.is_empty() => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Position of the first event matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&Shown) -> bool) -> Option<usize> {
        self.shown().iter().position(predicate)
    }
}

impl Render for Recorder {
    fn reply(&self, reply: &Reply) {
        self.shown.lock().push(Shown::Reply(reply.clone()));
    }

    fn own_message(&self, text: &str) {
        self.shown.lock().push(Shown::Own(text.to_string()));
    }

    fn status(&self, text: &str) {
        self.shown.lock().push(Shown::Status(text.to_string()));
    }

    fn prompt(&self, identity: &str) {
        self.shown.lock().push(Shown::Prompt(identity.to_string()));
    }
}
