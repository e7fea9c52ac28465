use serde::Serialize;

/// Ordered diagnostics from one validation pass. Errors mean the
/// record is unusable downstream; warnings mean usable but suspect.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_usable(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_until_an_error_lands() {
        let mut outcome = ValidationOutcome::default();
        assert!(outcome.is_usable());
        outcome.warn("suspect");
        assert!(outcome.is_usable());
        outcome.error("broken");
        assert!(!outcome.is_usable());
    }
}
