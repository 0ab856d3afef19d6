use crate::{Diagnostics, Event};
use std::cell::RefCell;

/// Keeps every event it is given, for asserting on in tests.
#[derive(Default)]
pub struct Recorder(RefCell<Vec<Event>>);

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }
}

impl Diagnostics for Recorder {
    fn record(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }
}
