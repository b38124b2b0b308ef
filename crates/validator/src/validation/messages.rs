//! Message resolution and `{Token}` rendering

use crate::foundation::{MessageToken, ValidationServices, display_value};
use serde_json::Value;

/// Everything a message may refer to.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    /// Display label of the field.
    pub label: &'a str,
    /// Current value of the field.
    pub value: Option<&'a Value>,
    /// Resolved error code of the validator.
    pub error_code: &'a str,
    /// Tokens contributed by the condition.
    pub tokens: &'a [MessageToken],
}

impl MessageContext<'_> {
    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            "Label" => Some(self.label.to_owned()),
            "Value" => Some(display_value(self.value)),
            "ErrorCode" => Some(self.error_code.to_owned()),
            _ => self
                .tokens
                .iter()
                .find(|(token, _)| *token == name)
                .map(|(_, value)| value.clone()),
        }
    }
}

/// Replaces every known `{Name}` in `template`. Unknown tokens stay as written.
pub fn render(template: &str, context: &MessageContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match context.lookup(name) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Resolved, rendered message pair of a failed validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessages {
    /// Field-level message.
    pub error_message: String,
    /// Summary message.
    pub summary_message: String,
}

/// Raw message sources of a validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageSources<'a> {
    /// Field-level message template.
    pub error_message: Option<&'a str>,
    /// Localization key of the field-level message.
    pub error_message_l10n: Option<&'a str>,
    /// Summary template.
    pub summary_message: Option<&'a str>,
    /// Localization key of the summary.
    pub summary_message_l10n: Option<&'a str>,
}

impl MessageSources<'_> {
    /// Localizes, applies fallbacks and renders tokens.
    ///
    /// The error message falls back to the default error message of the
    /// settings; the summary falls back to the error message.
    pub fn render(
        &self,
        services: &ValidationServices,
        context: &MessageContext<'_>,
    ) -> RenderedMessages {
        let error_template = services
            .localize(self.error_message_l10n, self.error_message)
            .unwrap_or_else(|| services.settings().default_error_message.clone());
        let summary_template = services
            .localize(self.summary_message_l10n, self.summary_message)
            .unwrap_or_else(|| error_template.clone());
        RenderedMessages {
            error_message: render(&error_template, context),
            summary_message: render(&summary_template, context),
        }
    }
}
