pub mod app;
pub mod popup;

pub use app::{run, App};
pub use popup::TooltipPopup;
