use super::render::TooltipContent;
use super::state::{reduce, Command, Event, WidgetState};
use crate::registry::{DefinitionFetcher, DefinitionResult};
use crate::text::WordLimits;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub type WidgetId = String;

/// Completion of a fetch, routed back to the widget that asked for it.
#[derive(Debug, Clone)]
pub struct TooltipMessage {
    pub widget_id: WidgetId,
    pub event: Event,
}

/// Whatever draws the tooltip next to its element.
pub trait TooltipSurface {
    fn show(&mut self);
    fn hide(&mut self);
    fn set_content(&mut self, content: TooltipContent);
    /// Called after the content changed size.
    fn reposition(&mut self);
}

#[derive(Debug, Clone, Copy)]
pub struct TooltipOptions {
    pub limits: WordLimits,
    pub external_link_visible: bool,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            limits: WordLimits::default(),
            external_link_visible: true,
        }
    }
}

struct Widget {
    item_id: String,
    state: WidgetState,
}

/// Owns the state of every decorated element and runs their fetches.
pub struct TooltipManager<F: DefinitionFetcher + 'static> {
    fetcher: Arc<F>,
    options: TooltipOptions,
    widgets: HashMap<WidgetId, Widget>,
    tx: mpsc::UnboundedSender<TooltipMessage>,
}

impl<F: DefinitionFetcher + 'static> TooltipManager<F> {
    pub fn new(
        fetcher: Arc<F>,
        options: TooltipOptions,
    ) -> (Self, mpsc::UnboundedReceiver<TooltipMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let manager = Self {
            fetcher,
            options,
            widgets: HashMap::new(),
            tx,
        };
        (manager, rx)
    }

    pub fn register(&mut self, widget_id: impl Into<WidgetId>, item_id: impl Into<String>) {
        self.widgets
            .entry(widget_id.into())
            .or_insert_with(|| Widget {
                item_id: item_id.into(),
                state: WidgetState::default(),
            });
    }

    pub fn state(&self, widget_id: &str) -> Option<&WidgetState> {
        self.widgets.get(widget_id).map(|w| &w.state)
    }

    fn dispatch(&mut self, widget_id: &str, event: Event) -> Option<Command> {
        let widget = self.widgets.get_mut(widget_id)?;
        let (next, command) = reduce(std::mem::take(&mut widget.state), event);
        widget.state = next;
        command
    }

    /// Returns true when this trigger started a fetch.
    pub fn trigger(&mut self, widget_id: &str) -> bool {
        match self.dispatch(widget_id, Event::Triggered) {
            Some(Command::Fetch) => {
                self.spawn_fetch(widget_id);
                true
            }
            None => {
                debug!(widget_id, "trigger ignored");
                false
            }
        }
    }

    fn spawn_fetch(&self, widget_id: &str) {
        let Some(widget) = self.widgets.get(widget_id) else {
            return;
        };
        let item_id = widget.item_id.clone();
        let widget_id = widget_id.to_string();
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        let limits = self.options.limits;

        info!(%widget_id, %item_id, "fetching definition");
        tokio::spawn(async move {
            let event = match fetcher.fetch(&item_id).await {
                Ok(raw) => {
                    let link = fetcher.item_link(&item_id);
                    Event::FetchSucceeded(DefinitionResult::from_raw(raw, link, limits))
                }
                Err(err) => Event::FetchFailed(err),
            };
            if tx.send(TooltipMessage { widget_id, event }).is_err() {
                debug!(%item_id, "tooltip manager gone before fetch completed");
            }
        });
    }

    pub fn apply(&mut self, message: TooltipMessage) {
        self.dispatch(&message.widget_id, message.event);
    }

    pub fn toggle(&mut self, widget_id: &str) {
        self.dispatch(widget_id, Event::ToggleClicked);
    }

    pub fn content(&self, widget_id: &str) -> Option<TooltipContent> {
        self.state(widget_id)
            .map(|state| TooltipContent::for_state(state, self.options.external_link_visible))
    }

    /// Push the widget's current content into `surface`.
    pub fn present(&self, widget_id: &str, surface: &mut impl TooltipSurface) {
        if let Some(content) = self.content(widget_id) {
            surface.set_content(content);
            surface.reposition();
        }
    }
}
