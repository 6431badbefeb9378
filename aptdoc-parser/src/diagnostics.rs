use std::collections::{BTreeMap, BTreeSet};

/// Non-fatal findings collected during one parse.
///
/// Each distinct message is reported once per category. With `DEBUG` logging
/// enabled messages are logged as they occur; otherwise they are logged as
/// warnings by [`Diagnostics::flush`] when the parse ends.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    warnings: BTreeMap<&'static str, BTreeSet<String>>,
}

impl Diagnostics {
    pub(crate) fn warn(&mut self, category: &'static str, message: String) {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(category, "{message}");
        }
        self.warnings.entry(category).or_default().insert(message);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.warnings.values().map(BTreeSet::len).sum()
    }

    pub(crate) fn flush(self) {
        if tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        for (category, messages) in self.warnings {
            for message in messages {
                tracing::warn!(category, "{message}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_are_collapsed() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.warn("Ambiguous link", "a.html".to_string());
        diagnostics.warn("Ambiguous link", "a.html".to_string());
        diagnostics.warn("Modified invalid link", "a.html".to_string());
        assert_eq!(diagnostics.len(), 2);
    }
}
