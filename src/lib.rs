pub mod config;
pub mod registry;
pub mod text;
pub mod tooltip;
pub mod ui;

pub use config::{Config, ConfigError, ItemConfig, Placement, Theme};
pub use registry::{DefinitionFetcher, DefinitionResult, FetchError, RawDefinition, RegistryClient};
pub use text::{normalize, WordLimits};
pub use tooltip::{TooltipContent, TooltipLine, TooltipManager, TooltipSurface};
