// Test doubles shared by unit tests

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::error::{DeckError, Result};
use crate::launcher::Launcher;
use crate::sources::manifest::Transport;

/// In-memory documents keyed by location. Unknown locations answer 404.
#[derive(Clone, Default)]
pub struct MapTransport {
    docs: Rc<RefCell<HashMap<String, String>>>,
}

impl MapTransport {
    pub fn new(docs: HashMap<String, String>) -> Self {
        Self { docs: Rc::new(RefCell::new(docs)) }
    }

    pub fn insert(&self, location: &str, text: &str) {
        self.docs.borrow_mut().insert(location.to_string(), text.to_string());
    }
}

impl Transport for MapTransport {
    fn fetch_text(&self, location: &str) -> Result<String> {
        self.docs
            .borrow()
            .get(location)
            .cloned()
            .ok_or_else(|| DeckError::Transport(format!("{}: HTTP 404", location)))
    }
}

/// Records every target it is asked to present. Clones share the record.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    presented: Rc<RefCell<Vec<String>>>,
    fail_on: Option<String>,
    allowed: HashSet<String>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail for any target containing `needle` (an empty needle fails all).
    pub fn failing_on(needle: &str) -> Self {
        Self { fail_on: Some(needle.to_string()), ..Self::default() }
    }

    /// Exempt one exact target from `failing_on`.
    pub fn allow(mut self, target: &str) -> Self {
        self.allowed.insert(target.to_string());
        self
    }

    pub fn presented(&self) -> Vec<String> {
        self.presented.borrow().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn present(&self, target: &str) -> Result<()> {
        self.presented.borrow_mut().push(target.to_string());
        match &self.fail_on {
            Some(needle) if target.contains(needle.as_str()) && !self.allowed.contains(target) => {
                Err(DeckError::Launch(format!("{}: no handler", target)))
            }
            _ => Ok(()),
        }
    }
}
