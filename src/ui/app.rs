use crate::config::{Config, ItemConfig};
use crate::registry::DefinitionFetcher;
use crate::tooltip::{
    FetchState, TooltipContent, TooltipManager, TooltipMessage, TooltipSurface, WidgetId,
};
use crate::ui::popup::TooltipPopup;
use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{Event as TermEvent, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// Item list with one tooltip per entry.
pub struct App<F: DefinitionFetcher + 'static> {
    items: Vec<ItemConfig>,
    list_state: ListState,
    manager: TooltipManager<F>,
    popup: TooltipPopup,
    open_widget: Option<WidgetId>,
    external_link_visible: bool,
    should_quit: bool,
}

fn widget_id(index: usize) -> WidgetId {
    format!("item-{}", index)
}

impl<F: DefinitionFetcher + 'static> App<F> {
    pub fn new(config: &Config, fetcher: Arc<F>) -> (Self, mpsc::UnboundedReceiver<TooltipMessage>) {
        let (mut manager, rx) = TooltipManager::new(fetcher, config.tooltip_options());
        for (index, item) in config.items.iter().enumerate() {
            manager.register(widget_id(index), item.id.clone());
        }

        let mut list_state = ListState::default();
        if !config.items.is_empty() {
            list_state.select(Some(0));
        }

        let app = Self {
            items: config.items.clone(),
            list_state,
            manager,
            popup: TooltipPopup::new(config.placement, config.theme),
            open_widget: None,
            external_link_visible: config.external_link_visible,
            should_quit: false,
        };
        (app, rx)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn popup(&self) -> &TooltipPopup {
        &self.popup
    }

    fn selected_widget(&self) -> Option<WidgetId> {
        self.list_state.selected().map(widget_id)
    }

    pub fn on_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('m') | KeyCode::Char(' ') => self.toggle_open(),
            KeyCode::Char('o') => self.open_source_link(),
            KeyCode::Esc => self.close(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            _ => {}
        }
    }

    pub fn on_fetch_complete(&mut self, message: TooltipMessage) {
        let widget_id = message.widget_id.clone();
        self.manager.apply(message);
        if self.open_widget.as_deref() == Some(widget_id.as_str()) {
            self.manager.present(&widget_id, &mut self.popup);
        }
    }

    fn open_selected(&mut self) {
        let Some(widget_id) = self.selected_widget() else {
            return;
        };
        self.manager.trigger(&widget_id);
        self.popup.show();
        self.manager.present(&widget_id, &mut self.popup);
        self.open_widget = Some(widget_id);
    }

    fn toggle_open(&mut self) {
        if let Some(widget_id) = self.open_widget.clone() {
            self.manager.toggle(&widget_id);
            self.manager.present(&widget_id, &mut self.popup);
        }
    }

    fn open_source_link(&self) {
        if !self.external_link_visible || !self.popup.is_visible() {
            return;
        }
        if let TooltipContent::Definition(card) = self.popup.content() {
            if let Some(link) = &card.external_link {
                if let Err(e) = open::that(link) {
                    warn!(%link, error = %e, "failed to open item link");
                }
            }
        }
    }

    fn close(&mut self) {
        self.popup.hide();
        self.open_widget = None;
    }

    fn move_selection(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, self.items.len() as isize - 1) as usize;
        if Some(next) != self.list_state.selected() {
            self.close();
            self.list_state.select(Some(next));
        }
    }

    fn status_marker(&self, index: usize) -> (&'static str, Color) {
        match self.manager.state(&widget_id(index)).map(|s| s.fetch) {
            Some(FetchState::Fetching) => ("… ", Color::Yellow),
            Some(FetchState::Succeeded) => ("✓ ", Color::Green),
            Some(FetchState::Failed) => ("✗ ", Color::Red),
            _ => ("· ", Color::DarkGray),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let block = Block::default()
            .title(" Aristotle definitions ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let list_inner = block.inner(chunks[0]);

        if self.items.is_empty() {
            let empty = Paragraph::new("No items configured. Add [[items]] entries to the config.")
                .block(block);
            frame.render_widget(empty, chunks[0]);
        } else {
            let items: Vec<ListItem> = self
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let (marker, color) = self.status_marker(index);
                    ListItem::new(Line::from(vec![
                        Span::styled(marker, Style::default().fg(color)),
                        Span::styled(
                            item.label().to_string(),
                            Style::default().add_modifier(Modifier::UNDERLINED),
                        ),
                        Span::styled(
                            format!("  #{}", item.id),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect();

            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );
            frame.render_stateful_widget(list, chunks[0], &mut self.list_state);
        }

        let help = Paragraph::new(Line::from(Span::styled(
            "Enter: define | m/Space: see more/less | o: open item | Esc: close | j/k: move | q: quit",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(help, chunks[1]);

        if self.popup.is_visible() {
            if let Some(anchor) = self.selected_anchor(list_inner) {
                self.popup.set_anchor(anchor, frame.area());
                self.popup.reposition();
            }
            self.popup.render(frame);
        }
    }

    fn selected_anchor(&self, list_inner: Rect) -> Option<Rect> {
        let selected = self.list_state.selected()?;
        let row = selected.checked_sub(self.list_state.offset())? as u16;
        if row >= list_inner.height {
            return None;
        }
        let label_width = self
            .items
            .get(selected)
            .map(|item| item.label().chars().count() as u16 + 2)
            .unwrap_or(list_inner.width);
        Some(Rect::new(
            list_inner.x,
            list_inner.y + row,
            label_width.min(list_inner.width),
            1,
        ))
    }
}

/// Run the terminal browser until the user quits.
pub async fn run<F: DefinitionFetcher + 'static>(config: &Config, fetcher: Arc<F>) -> Result<()> {
    enable_raw_mode()?;
    let result: Result<()> = async {
        execute!(io::stdout(), EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let (app, rx) = App::new(config, fetcher);
        event_loop(&mut terminal, app, rx).await
    }
    .await;
    restore_after(result, restore_terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

/// Run `restore` whatever `result` is. An earlier error wins over a
/// failure to restore.
fn restore_after<T>(result: Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

async fn event_loop<B: Backend, F: DefinitionFetcher + 'static>(
    terminal: &mut Terminal<B>,
    mut app: App<F>,
    mut rx: mpsc::UnboundedReceiver<TooltipMessage>,
) -> Result<()> {
    let mut events = EventStream::new();

    while !app.should_quit() {
        terminal.draw(|frame| app.draw(frame))?;

        tokio::select! {
            Some(message) = rx.recv() => app.on_fetch_complete(message),
            event = events.next() => match event {
                Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    app.on_key(key.code)
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }

    Ok(())
}
