use super::state::{FetchState, WidgetState};
use crate::registry::DefinitionResult;

pub const NO_DEFINITION: &str = "This item does not have a definition.";
pub const SEE_MORE: &str = "see more";
pub const SEE_LESS: &str = "see less";
pub const LOADING: &str = "Loading...";
pub const POWERED_BY: &str = "Powered by the Aristotle Metadata Registry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyView {
    pub body_text: String,
    pub toggle_label: Option<&'static str>,
}

/// Body text for the current display flag and the toggle to offer, if any.
///
/// A toggle only exists when the two renditions differ in length.
pub fn render(expanded: bool, result: &DefinitionResult) -> BodyView {
    let has_more =
        result.short_definition.chars().count() != result.long_definition.chars().count();

    if expanded {
        let body_text = if result.long_definition.is_empty() {
            NO_DEFINITION.to_string()
        } else {
            result.long_definition.clone()
        };
        BodyView {
            body_text,
            toggle_label: has_more.then_some(SEE_LESS),
        }
    } else {
        BodyView {
            body_text: result.short_definition.clone(),
            toggle_label: has_more.then_some(SEE_MORE),
        }
    }
}

/// What a tooltip surface displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TooltipContent {
    Loading,
    Error(String),
    Definition(DefinitionCard),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionCard {
    pub name: String,
    /// Source link for the header's external-link marker, when enabled.
    pub external_link: Option<String>,
    pub body: BodyView,
    pub source_link: String,
}

impl TooltipContent {
    pub fn for_result(
        result: &DefinitionResult,
        expanded: bool,
        external_link_visible: bool,
    ) -> Self {
        TooltipContent::Definition(DefinitionCard {
            name: result.name.clone(),
            external_link: external_link_visible.then(|| result.source_link.clone()),
            body: render(expanded, result),
            source_link: result.source_link.clone(),
        })
    }

    pub fn for_state(state: &WidgetState, external_link_visible: bool) -> Self {
        match (state.fetch, &state.result, &state.error) {
            (FetchState::Succeeded, Some(result), _) => {
                Self::for_result(result, state.expanded, external_link_visible)
            }
            (FetchState::Failed, _, Some(err)) => TooltipContent::Error(err.to_string()),
            _ => TooltipContent::Loading,
        }
    }

    /// Lines top to bottom, each tagged with what it is.
    pub fn lines(&self) -> Vec<TooltipLine> {
        match self {
            TooltipContent::Loading => vec![TooltipLine::Status(LOADING.to_string())],
            TooltipContent::Error(message) => vec![TooltipLine::Error(message.clone())],
            TooltipContent::Definition(card) => {
                let mut lines = Vec::with_capacity(6);
                lines.push(TooltipLine::Title {
                    name: card.name.clone(),
                    external_link: card.external_link.is_some(),
                });
                lines.push(TooltipLine::Body(card.body.body_text.clone()));
                if let Some(label) = card.body.toggle_label {
                    lines.push(TooltipLine::Toggle(label));
                }
                lines.push(TooltipLine::Rule);
                lines.push(TooltipLine::Footer(format!("Source: {}", card.source_link)));
                lines.push(TooltipLine::Footer(POWERED_BY.to_string()));
                lines
            }
        }
    }
}

pub const EXTERNAL_LINK_MARKER: &str = " ↗";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TooltipLine {
    Title { name: String, external_link: bool },
    Body(String),
    Toggle(&'static str),
    Rule,
    Footer(String),
    Status(String),
    Error(String),
}

impl TooltipLine {
    /// Plain text of the line; a rule has none.
    pub fn text(&self) -> String {
        match self {
            TooltipLine::Title {
                name,
                external_link: true,
            } => format!("{}{}", name, EXTERNAL_LINK_MARKER),
            TooltipLine::Title { name, .. } => name.clone(),
            TooltipLine::Toggle(label) => format!("...{}", label),
            TooltipLine::Rule => String::new(),
            TooltipLine::Body(text)
            | TooltipLine::Footer(text)
            | TooltipLine::Status(text)
            | TooltipLine::Error(text) => text.clone(),
        }
    }
}
