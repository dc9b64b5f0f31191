use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::summarize::prompts::truncate_chars;

// Chat platform limits, in characters.
pub const MAX_CONTENT: usize = 2000;
pub const MAX_EMBED_TITLE: usize = 256;
pub const MAX_EMBED_DESCRIPTION: usize = 4096;
pub const MAX_FIELD_NAME: usize = 256;
pub const MAX_FIELD_VALUE: usize = 1024;
pub const MAX_FIELDS: usize = 25;

pub const COLOR_BLUE: u32 = 0x3498db;
pub const COLOR_GREEN: u32 = 0x2ecc71;

/// Platform-neutral response to a command or interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    pub buttons: Vec<Button>,
    /// Visible only to the user who triggered it.
    pub ephemeral: bool,
}

impl Reply {
    pub fn text(content: impl AsRef<str>) -> Self {
        Self {
            content: Some(clamp(content.as_ref(), MAX_CONTENT)),
            ..Self::default()
        }
    }

    pub fn ephemeral(content: impl AsRef<str>) -> Self {
        Self {
            ephemeral: true,
            ..Self::text(content)
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embed: Some(embed),
            ..Self::default()
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(title: impl AsRef<str>, color: u32) -> Self {
        Self {
            title: clamp(title.as_ref(), MAX_EMBED_TITLE),
            description: None,
            color,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl AsRef<str>) -> Self {
        self.description = Some(clamp(description.as_ref(), MAX_EMBED_DESCRIPTION));
        self
    }

    /// Add a field; fields past the platform limit are dropped.
    pub fn field(mut self, name: impl AsRef<str>, value: impl AsRef<str>, inline: bool) -> Self {
        if self.fields.len() < MAX_FIELDS {
            self.fields.push(EmbedField {
                name: clamp(name.as_ref(), MAX_FIELD_NAME),
                value: clamp(value.as_ref(), MAX_FIELD_VALUE),
                inline,
            });
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// An interactive button. `custom_id` is echoed back when the button is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    pub custom_id: String,
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
fn clamp(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clamped = truncate_chars(text, max.saturating_sub(1)).to_string();
    clamped.push('…');
    clamped
}

/// Plain-text rendering, used by the console adapter.
impl Display for Reply {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(content) = &self.content {
            writeln!(f, "{}", content)?;
        }
        if let Some(embed) = &self.embed {
            writeln!(f, "== {} ==", embed.title)?;
            if let Some(description) = &embed.description {
                writeln!(f, "{}", description)?;
            }
            for field in &embed.fields {
                writeln!(f, "\n{}", field.name)?;
                writeln!(f, "{}", field.value)?;
            }
        }
        if !self.buttons.is_empty() {
            let labels: Vec<String> = self.buttons.iter().map(|b| format!("[{}]", b.label)).collect();
            writeln!(f, "\nActions: {}", labels.join(" "))?;
        }
        Ok(())
    }
}
