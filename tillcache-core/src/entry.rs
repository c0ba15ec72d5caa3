use std::time::Instant;

/// A cached value together with its optional deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    value: String,
    deadline: Option<Instant>,
}

impl Entry {
    /// Creates a new entry. A `None` deadline means the entry never expires.
    pub fn new(value: impl Into<String>, deadline: Option<Instant>) -> Self {
        Self {
            value: value.into(),
            deadline,
        }
    }

    /// Returns the stored value as a string slice
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Checks whether this entry had expired at `now`.
    ///
    /// An entry expires only once its deadline lies strictly before `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if deadline < now)
    }

    /// Checks whether this entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
