use crate::config::{Placement, Theme};
use crate::tooltip::render::EXTERNAL_LINK_MARKER;
use crate::tooltip::{TooltipContent, TooltipLine, TooltipSurface};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use textwrap::core::display_width;

const MAX_INNER_WIDTH: u16 = 48;

#[derive(Debug, Clone, Copy)]
struct Palette {
    fg: Color,
    bg: Color,
    border: Color,
    accent: Color,
    muted: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::LightBorder => Palette {
            fg: Color::Black,
            bg: Color::White,
            border: Color::Gray,
            accent: Color::Blue,
            muted: Color::DarkGray,
        },
        Theme::Light => Palette {
            fg: Color::Black,
            bg: Color::White,
            border: Color::White,
            accent: Color::Blue,
            muted: Color::DarkGray,
        },
        Theme::Material => Palette {
            fg: Color::White,
            bg: Color::Rgb(80, 83, 85),
            border: Color::Rgb(80, 83, 85),
            accent: Color::LightCyan,
            muted: Color::Gray,
        },
        Theme::Translucent => Palette {
            fg: Color::White,
            bg: Color::Reset,
            border: Color::DarkGray,
            accent: Color::LightBlue,
            muted: Color::Gray,
        },
        Theme::Dark => Palette {
            fg: Color::White,
            bg: Color::Rgb(51, 51, 51),
            border: Color::Rgb(51, 51, 51),
            accent: Color::LightBlue,
            muted: Color::Gray,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Title,
    /// Last title row, followed by the external-link marker.
    LinkedTitle,
    Body,
    Toggle,
    Rule,
    Footer,
    Error,
}

/// Terminal tooltip anchored to a row of the item list.
pub struct TooltipPopup {
    visible: bool,
    content: TooltipContent,
    placement: Placement,
    theme: Theme,
    anchor: Rect,
    bounds: Rect,
    area: Rect,
    lines: Vec<(Role, String)>,
}

impl TooltipPopup {
    pub fn new(placement: Placement, theme: Theme) -> Self {
        Self {
            visible: false,
            content: TooltipContent::Loading,
            placement,
            theme,
            anchor: Rect::default(),
            bounds: Rect::default(),
            area: Rect::default(),
            lines: Vec::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &TooltipContent {
        &self.content
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn set_anchor(&mut self, anchor: Rect, bounds: Rect) {
        self.anchor = anchor;
        self.bounds = bounds;
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible || self.area.width < 3 || self.area.height < 3 {
            return;
        }
        let colors = palette(self.theme);
        let base = Style::default().fg(colors.fg).bg(colors.bg);

        let text: Vec<Line> = self
            .lines
            .iter()
            .map(|(role, text)| match role {
                Role::Title => Line::from(Span::styled(
                    text.clone(),
                    base.add_modifier(Modifier::BOLD),
                )),
                Role::LinkedTitle => Line::from(vec![
                    Span::styled(text.clone(), base.add_modifier(Modifier::BOLD)),
                    Span::styled(EXTERNAL_LINK_MARKER, base.fg(colors.accent)),
                ]),
                Role::Body => Line::from(Span::styled(text.clone(), base)),
                Role::Toggle => Line::from(Span::styled(
                    text.clone(),
                    base.fg(colors.accent).add_modifier(Modifier::UNDERLINED),
                )),
                Role::Rule => Line::from(Span::styled(text.clone(), base.fg(colors.border))),
                Role::Footer => Line::from(Span::styled(text.clone(), base.fg(colors.muted))),
                Role::Error => Line::from(Span::styled(text.clone(), base.fg(Color::Red))),
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors.border).bg(colors.bg))
            .style(base);

        frame.render_widget(Clear, self.area);
        frame.render_widget(Paragraph::new(text).block(block), self.area);
    }

    fn layout_lines(&self, inner_width: usize) -> Vec<(Role, String)> {
        let mut out = Vec::new();
        let push_wrapped = |role: Role, text: &str, width: usize, out: &mut Vec<(Role, String)>| {
            if text.is_empty() {
                out.push((role, String::new()));
                return;
            }
            for line in textwrap::wrap(text, width.max(1)) {
                out.push((role, line.into_owned()));
            }
        };

        for line in self.content.lines() {
            match &line {
                TooltipLine::Title {
                    name,
                    external_link,
                } => {
                    if *external_link {
                        let width = inner_width.saturating_sub(display_width(EXTERNAL_LINK_MARKER));
                        push_wrapped(Role::Title, name, width, &mut out);
                        if let Some(last) = out.last_mut() {
                            last.0 = Role::LinkedTitle;
                        }
                    } else {
                        push_wrapped(Role::Title, name, inner_width, &mut out);
                    }
                }
                TooltipLine::Body(text) | TooltipLine::Status(text) => {
                    push_wrapped(Role::Body, text, inner_width, &mut out)
                }
                TooltipLine::Toggle(_) => {
                    push_wrapped(Role::Toggle, &line.text(), inner_width, &mut out)
                }
                TooltipLine::Rule => out.push((Role::Rule, String::new())),
                TooltipLine::Footer(text) => {
                    push_wrapped(Role::Footer, text, inner_width, &mut out)
                }
                TooltipLine::Error(text) => push_wrapped(Role::Error, text, inner_width, &mut out),
            }
        }
        out
    }
}

impl TooltipSurface for TooltipPopup {
    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn set_content(&mut self, content: TooltipContent) {
        self.content = content;
    }

    fn reposition(&mut self) {
        let max_inner = MAX_INNER_WIDTH
            .min(self.bounds.width.saturating_sub(2))
            .max(1) as usize;
        let mut lines = self.layout_lines(max_inner);

        let widest = lines
            .iter()
            .filter(|(role, _)| *role != Role::Rule)
            .map(|(role, text)| match role {
                Role::LinkedTitle => display_width(text) + display_width(EXTERNAL_LINK_MARKER),
                _ => display_width(text),
            })
            .max()
            .unwrap_or(0)
            .clamp(1, max_inner);
        for (role, text) in lines.iter_mut() {
            if *role == Role::Rule {
                *text = "─".repeat(widest);
            }
        }

        let width = widest as u16 + 2;
        let height = lines.len() as u16 + 2;
        self.area = place_popup(self.anchor, width, height, self.bounds, self.placement);
        self.lines = lines;
    }
}

/// Position a `width` x `height` box next to `anchor` inside `bounds`.
///
/// Flips to the opposite side when the preferred side has no room and
/// clamps into `bounds` when neither side fits.
pub fn place_popup(
    anchor: Rect,
    width: u16,
    height: u16,
    bounds: Rect,
    placement: Placement,
) -> Rect {
    let width = width.min(bounds.width);
    let height = height.min(bounds.height);

    let side = if fits(anchor, width, height, bounds, placement) {
        placement
    } else if fits(anchor, width, height, bounds, placement.opposite()) {
        placement.opposite()
    } else {
        placement
    };

    let (x, y) = match side {
        Placement::Bottom => (anchor.x, anchor.bottom()),
        Placement::Top => (anchor.x, anchor.y.saturating_sub(height)),
        Placement::Right => (anchor.right(), anchor.y),
        Placement::Left => (anchor.x.saturating_sub(width), anchor.y),
    };

    let x = x.clamp(bounds.x, bounds.right().saturating_sub(width));
    let y = y.clamp(bounds.y, bounds.bottom().saturating_sub(height));
    Rect::new(x, y, width, height)
}

fn fits(anchor: Rect, width: u16, height: u16, bounds: Rect, side: Placement) -> bool {
    match side {
        Placement::Bottom => anchor.bottom() + height <= bounds.bottom(),
        Placement::Top => anchor.y >= bounds.y + height,
        Placement::Right => anchor.right() + width <= bounds.right(),
        Placement::Left => anchor.x >= bounds.x + width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DefinitionResult;

    fn bounds() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    #[test]
    fn test_place_below_anchor() {
        let anchor = Rect::new(2, 3, 20, 1);
        let area = place_popup(anchor, 30, 8, bounds(), Placement::Bottom);
        assert_eq!(area, Rect::new(2, 4, 30, 8));
    }

    #[test]
    fn test_flip_to_top_when_no_room_below() {
        let anchor = Rect::new(2, 20, 20, 1);
        let area = place_popup(anchor, 30, 8, bounds(), Placement::Bottom);
        assert_eq!(area, Rect::new(2, 12, 30, 8));
    }

    #[test]
    fn test_flip_to_bottom_when_no_room_above() {
        let anchor = Rect::new(2, 1, 20, 1);
        let area = place_popup(anchor, 30, 8, bounds(), Placement::Top);
        assert_eq!(area, Rect::new(2, 2, 30, 8));
    }

    #[test]
    fn test_clamps_horizontally() {
        let anchor = Rect::new(70, 3, 8, 1);
        let area = place_popup(anchor, 30, 8, bounds(), Placement::Bottom);
        assert_eq!(area.x, 50);
        assert_eq!(area.right(), 80);
    }

    #[test]
    fn test_right_placement() {
        let anchor = Rect::new(2, 3, 20, 1);
        let area = place_popup(anchor, 30, 8, bounds(), Placement::Right);
        assert_eq!(area, Rect::new(22, 3, 30, 8));
    }

    #[test]
    fn test_oversized_popup_is_clamped() {
        let anchor = Rect::new(2, 10, 20, 1);
        let area = place_popup(anchor, 200, 100, bounds(), Placement::Bottom);
        assert_eq!(area, bounds());
    }

    #[test]
    fn test_reposition_sizes_to_content() {
        let mut popup = TooltipPopup::new(Placement::Bottom, Theme::LightBorder);
        popup.set_anchor(Rect::new(0, 0, 10, 1), bounds());
        popup.set_content(TooltipContent::Error("boom".to_string()));
        popup.reposition();
        assert_eq!(popup.area(), Rect::new(0, 1, 6, 3));
    }

    #[test]
    fn test_reposition_wraps_long_definitions() {
        let result = DefinitionResult {
            name: "Age".to_string(),
            short_definition: "word ".repeat(30).trim_end().to_string(),
            long_definition: String::new(),
            source_link: "https://r.example/item/1/".to_string(),
        };
        let mut popup = TooltipPopup::new(Placement::Bottom, Theme::Dark);
        popup.set_anchor(Rect::new(0, 0, 10, 1), bounds());
        popup.set_content(TooltipContent::for_result(&result, false, true));
        popup.reposition();

        let area = popup.area();
        assert!(area.width <= MAX_INNER_WIDTH + 2);
        assert!(popup.lines.iter().any(|(role, _)| *role == Role::Rule));
        assert!(popup.lines.iter().any(|(role, _)| *role == Role::Toggle));
        assert_eq!(area.height as usize, popup.lines.len() + 2);
    }

    fn roles_for(short: &str, long: &str) -> Vec<Role> {
        let result = DefinitionResult {
            name: "Age".to_string(),
            short_definition: short.to_string(),
            long_definition: long.to_string(),
            source_link: "https://r.example/item/1/".to_string(),
        };
        let mut popup = TooltipPopup::new(Placement::Bottom, Theme::LightBorder);
        popup.set_anchor(Rect::new(0, 0, 10, 1), bounds());
        popup.set_content(TooltipContent::for_result(&result, false, true));
        popup.reposition();
        popup.lines.iter().map(|(role, _)| *role).collect()
    }

    #[test]
    fn test_empty_short_definition_keeps_one_rule() {
        assert_eq!(
            roles_for("", "Years lived"),
            vec![
                Role::LinkedTitle,
                Role::Body,
                Role::Toggle,
                Role::Rule,
                Role::Footer,
                Role::Footer,
            ]
        );
    }

    #[test]
    fn test_leading_ellipsis_stays_body() {
        assert_eq!(
            roles_for("...and so on", "...and so on"),
            vec![
                Role::LinkedTitle,
                Role::Body,
                Role::Rule,
                Role::Footer,
                Role::Footer,
            ]
        );
    }

    #[test]
    fn test_linked_title_counts_marker_width() {
        let name = "N".repeat(41);
        let result = DefinitionResult {
            name: name.clone(),
            short_definition: "A".to_string(),
            long_definition: "A".to_string(),
            source_link: "s".to_string(),
        };
        let mut popup = TooltipPopup::new(Placement::Bottom, Theme::LightBorder);
        popup.set_anchor(Rect::new(0, 0, 10, 1), bounds());
        popup.set_content(TooltipContent::for_result(&result, false, true));
        popup.reposition();
        // 41 columns of name plus the marker outgrow the 42-column footer.
        assert_eq!(popup.area().width, 43 + 2);
        assert_eq!(popup.lines[0], (Role::LinkedTitle, name));
    }

    #[test]
    fn test_show_hide() {
        let mut popup = TooltipPopup::new(Placement::Bottom, Theme::Light);
        assert!(!popup.is_visible());
        popup.show();
        assert!(popup.is_visible());
        popup.hide();
        assert!(!popup.is_visible());
    }
}
