use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use serde_json::Value;

use super::app_state::App;
use crate::json;
use crate::notification::render_notification;
use crate::query::{ErrorView, RenderDecision, has_view_permission};
use crate::theme;
use crate::widgets::{popup, scrollbar};

pub const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner glyph and color for a frame; both advance every 8 frames
pub fn get_spinner(frame_count: u64) -> (char, Color) {
    let step = (frame_count / 8) as usize;
    let colors = theme::view::SPINNER_COLORS;
    (
        SPINNER_CHARS[step % SPINNER_CHARS.len()],
        colors[step % colors.len()],
    )
}

const HINTS: &[(&str, &str)] = &[("r", "Retry"), ("j/k", "Scroll"), ("q", "Quit")];

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        self.frame_count = self.frame_count.wrapping_add(1);

        let layout =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(frame.area());
        let (pane_area, help_area) = (layout[0], layout[1]);

        let decision = self.decision().map(|data| self.content_lines(&data));
        match decision {
            RenderDecision::Loading => self.render_loading(frame, pane_area),
            RenderDecision::Error(view) => self.render_error(frame, pane_area, view),
            RenderDecision::Empty => render_message(
                frame,
                pane_area,
                "No data",
                "The request succeeded but returned nothing to show.",
                theme::view::EMPTY,
            ),
            RenderDecision::Content(lines) => self.render_content(frame, pane_area, lines),
            RenderDecision::Nothing => render_message(
                frame,
                pane_area,
                "Waiting",
                "No request has produced data yet. Press r to fetch.",
                theme::view::EMPTY,
            ),
        }

        frame.render_widget(
            Paragraph::new(theme::border_hints::build_hints(HINTS, theme::palette::TEXT_MUTED)),
            help_area,
        );

        render_notification(frame, &mut self.notification);
    }

    fn pane_block(&self, border: Color) -> Block<'static> {
        let title = match self.sources.len() {
            1 => " queryview ".to_string(),
            n => format!(" queryview · {} sources ", n),
        };
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(border))
            .title(Span::styled(title, theme::view::TITLE))
            .style(Style::new().bg(theme::view::BACKGROUND))
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.pane_block(theme::view::BORDER), area);

        let (spinner, color) = get_spinner(self.frame_count);
        let pending = self.states.iter().filter(|s| s.loading).count();
        let text = Line::from(vec![
            Span::styled(format!("{} ", spinner), Style::new().fg(color)),
            Span::styled(
                format!("Loading {} of {}...", pending, self.states.len()),
                Style::new().fg(theme::palette::TEXT),
            ),
        ]);
        let inner = popup::centered_popup(area, 30, 1);
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
    }

    fn render_error(&self, frame: &mut Frame, area: Rect, view: ErrorView) {
        match view {
            ErrorView::NotFoundOrAccessDenied => {
                let denied = self
                    .states
                    .iter()
                    .filter_map(|s| s.error_object.as_ref())
                    .filter(|e| !has_view_permission(&[Some(*e)]))
                    .count();
                let detail = format!(
                    "{} of {} sources could not be found or you don't have access to them.",
                    denied,
                    self.states.len()
                );
                render_message(
                    frame,
                    area,
                    "Not found or access denied",
                    &detail,
                    theme::view::ACCESS_DENIED,
                );
            }
            ErrorView::Recalculating => render_message(
                frame,
                area,
                "Recalculating",
                "Results are out of date and being recalculated. Press r to refresh.",
                theme::view::RECALCULATING,
            ),
            ErrorView::Generic => {
                let mut detail: Vec<String> = self
                    .sources
                    .iter()
                    .zip(&self.states)
                    .filter_map(|(source, state)| {
                        state
                            .error_object
                            .as_ref()
                            .map(|e| format!("{}: {}", source.label, e))
                    })
                    .collect();
                detail.push("Press r to retry.".to_string());
                render_message(
                    frame,
                    area,
                    "Something went wrong",
                    &detail.join("\n"),
                    theme::view::GENERIC_ERROR,
                );
            }
        }
    }

    fn content_lines(&self, data: &[&Value]) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (source, value) in self.sources.iter().zip(data) {
            if self.sources.len() > 1 {
                if !lines.is_empty() {
                    lines.push(Line::raw(""));
                }
                lines.push(Line::from(Span::styled(
                    format!("▌ {}", source.label),
                    Style::new().fg(theme::view::LABEL),
                )));
            }
            lines.extend(json::pretty_lines(value));
        }
        lines
    }

    fn render_content(&mut self, frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
        let block = self.pane_block(theme::view::BORDER);
        let inner = block.inner(area);
        let total = lines.len();

        self.scroll.update_bounds(total as u32, inner.height);

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((self.scroll.offset, 0));
        frame.render_widget(paragraph, area);

        scrollbar::render_vertical_scrollbar(
            frame,
            area,
            total,
            inner.height as usize,
            self.scroll.offset as usize,
            theme::scrollbar::DEFAULT,
        );
    }
}

/// Bordered pane with a centered heading and body
fn render_message(frame: &mut Frame, area: Rect, heading: &str, body: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(color))
        .style(Style::new().bg(theme::view::BACKGROUND));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled(heading.to_string(), theme::view::HEADING.fg(color))),
        Line::raw(""),
    ];
    lines.extend(body.lines().map(|l| {
        Line::from(Span::styled(
            l.to_string(),
            Style::new().fg(theme::view::BODY),
        ))
    }));

    let height = (lines.len() as u16).min(inner.height);
    let message_area = popup::centered_popup(inner, inner.width.saturating_sub(4), height);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        message_area,
    );
}
