use crate::routes::FormKind;
use std::collections::HashSet;
use std::sync::Mutex;

/// Tracks which form instances currently have a submission being dispatched.
///
/// A form instance is identified by the `form_token` it posts, or by the registrant's email
/// address when the page did not send one.
#[derive(Debug, Default)]
pub struct SubmissionGuard {
    in_flight: Mutex<HashSet<String>>,
}

impl SubmissionGuard {
    /// Marks `key` as in flight. Returns `None` if it already was: the caller must drop the
    /// repeated submit without dispatching anything.
    pub fn acquire(&self, form: FormKind, key: &str) -> Option<InFlight<'_>> {
        let key = format!("{}:{}", form, key.trim().to_lowercase());
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if in_flight.insert(key.clone()) {
            Some(InFlight { guard: self, key })
        } else {
            None
        }
    }

    fn release(&self, key: &str) {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        in_flight.remove(key);
    }
}

/// Releases its key on drop, whatever the outcome of the submission.
#[derive(Debug)]
pub struct InFlight<'a> {
    guard: &'a SubmissionGuard,
    key: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.guard.release(&self.key);
    }
}
