use std::fmt::Display;

/// Values for `{token}` placeholders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateArgs {
    entries: Vec<(String, String)>,
}

impl TemplateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token. A token added twice keeps its first value.
    pub fn with(mut self, token: impl Into<String>, value: impl Display) -> Self {
        let token = token.into();
        if self.get(&token).is_none() {
            self.entries.push((token, value.to_string()));
        }
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == token)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Replace every `{token}` whose token is known. Done in one pass over the
/// input, so substituted values are never scanned again.
pub fn apply_template(text: &str, args: &TemplateArgs) -> String {
    if args.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        let substituted = after_open.find('}').and_then(|close| {
            let token = &after_open[..close];
            args.get(token).map(|value| (value, close))
        });

        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after_open[close + 1..];
            }
            None => {
                // keep the brace, a later one may still open a token
                out.push('{');
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}
