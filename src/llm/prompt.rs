//! Persona prompt rendering
//!
//! A [`PromptTemplate`] holds text with `{name}` slots. Rendering is a single
//! left-to-right pass, so substituted values (which may contain JSON braces)
//! are never re-scanned for slots.

/// Default persona template. Slots: `location`, `weather_data`, `format_instructions`.
pub const DEFAULT_TEMPLATE: &str = "You are Shaggy from Scooby-Doo, reading the weather forecast \
in your usual relaxed, laid-back, informal way. Like, keep it chill, man. \
For the location {location}, provide the weather forecast for the coming days \
based on the daily summary below.\n\n\
Daily summary:\n{weather_data}\n\n\
{format_instructions}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Names of all `{slot}` placeholders, in order of appearance.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_slot_name(&after[..close]) => {
                    names.push(&after[..close]);
                    rest = &after[close + 1..];
                }
                _ => rest = after,
            }
        }
        names
    }

    /// Fill the template. Slots without a value are left verbatim.
    #[must_use]
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after.find('}').and_then(|close| {
                let name = &after[..close];
                values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value, close))
            });

            match value {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

fn is_slot_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Composes the final prompt from a location, the aggregated daily text and
/// the output format instructions.
#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    template: PromptTemplate,
}

impl PromptComposer {
    #[must_use]
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    #[must_use]
    pub fn compose(&self, location: &str, weather_data: &str, format_instructions: &str) -> String {
        self.template.render(&[
            ("location", location),
            ("weather_data", weather_data),
            ("format_instructions", format_instructions),
        ])
    }
}
