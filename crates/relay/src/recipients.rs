use tracing::error;

/// Parsed recipient list from the comma-separated `SMS_TO` setting.
///
/// Bad tokens are kept alongside the valid numbers: a dispatch still goes
/// out to every parseable recipient, but any unparseable token forces the
/// aggregate result to failure so a configuration typo cannot pass
/// silently.
#[derive(Debug, Clone, Default)]
pub struct RecipientSet {
    pub recipients: Vec<u64>,
    pub invalid: Vec<String>,
}

impl RecipientSet {
    pub fn parse(input: &str) -> Self {
        let mut set = RecipientSet::default();
        for token in input.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.parse::<u64>() {
                Ok(number) => set.recipients.push(number),
                Err(e) => {
                    error!("Incorrect SMS_TO entry {:?}: {}", token, e);
                    set.invalid.push(token.to_string());
                }
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty() && self.invalid.is_empty()
    }

    pub fn has_invalid(&self) -> bool {
        !self.invalid.is_empty()
    }
}
