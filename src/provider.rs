use ratatui::style::Color;

/// The fixed set of AI backends the user can chat through. The variant
/// order is the selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    ChatGpt,
    Grok,
    OpenRouter,
    // Perplexity,
}

impl Provider {
    pub fn all() -> &'static [Provider] {
        &[Provider::ChatGpt, Provider::Grok, Provider::OpenRouter]
    }

    /// Lowercase identifier used on the wire and in the config file.
    pub fn id(&self) -> &'static str {
        match self {
            Provider::ChatGpt => "chatgpt",
            Provider::Grok => "grok",
            Provider::OpenRouter => "openrouter",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::ChatGpt => "ChatGPT",
            Provider::Grok => "Grok",
            Provider::OpenRouter => "OpenRouter",
        }
    }

    /// Single-character icon shown next to the provider name.
    pub fn glyph(&self) -> &'static str {
        match self {
            Provider::ChatGpt => "◈",
            Provider::Grok => "◆",
            Provider::OpenRouter => "✦",
        }
    }

    /// Color theme for the selector tab and reply annotations.
    pub fn color(&self) -> Color {
        match self {
            Provider::ChatGpt => Color::Green,
            Provider::Grok => Color::Magenta,
            Provider::OpenRouter => Color::LightRed,
        }
    }

    /// Resolve a wire id back to a provider. Unknown ids fall back to
    /// the default provider rather than failing.
    pub fn from_id(id: &str) -> Provider {
        Provider::all()
            .iter()
            .copied()
            .find(|p| p.id() == id)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id_finds_each_registered_provider() {
        for &provider in Provider::all() {
            assert_eq!(Provider::from_id(provider.id()), provider);
        }
    }

    #[test]
    fn test_unknown_id_falls_back_to_the_default_provider() {
        assert_eq!(Provider::from_id("perplexity"), Provider::ChatGpt);
        assert_eq!(Provider::from_id(""), Provider::ChatGpt);
    }

    #[test]
    fn test_wire_ids_are_lowercase() {
        for &provider in Provider::all() {
            assert_eq!(provider.id(), provider.id().to_lowercase());
        }
    }
}
