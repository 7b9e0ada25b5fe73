pub mod manager;
pub mod render;
pub mod state;

pub use manager::{TooltipManager, TooltipMessage, TooltipOptions, TooltipSurface, WidgetId};
pub use render::{render, BodyView, DefinitionCard, TooltipContent, TooltipLine};
pub use state::{reduce, Command, Event, FetchState, WidgetState};
