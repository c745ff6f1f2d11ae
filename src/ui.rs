pub mod audio;
pub mod board;
pub mod wheel;

use std::time::Instant;

use letterwheel::layout::InteractionState;
use letterwheel::ports::StartControlMode;
use letterwheel::validator::Field;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const FIELD_WIDTH: u16 = 16;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let board = self.controller.presentation();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Min(5),    // wheel
                Constraint::Length(3), // time fields
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "letterwheel",
            Style::default().patch(bold_style).fg(Color::Cyan),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        render_wheel(self, chunks[1], buf);
        render_fields(self, chunks[2], buf);

        Paragraph::new(Span::styled(
            "(enter) start/stop   (tab) switch field   (a-z) pick letter   (esc) quit",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        if board.notice_open {
            render_modal(
                "GAME OVER!",
                "Time is up.",
                Color::Yellow,
                area,
                buf,
            );
        } else if let Some(message) = &board.error {
            render_modal("Invalid times", message, Color::Red, area, buf);
        }
    }
}

fn letter_style(state: InteractionState, enabled: bool) -> Style {
    match state {
        InteractionState::Activated => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        InteractionState::Enabled if enabled => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
    }
}

fn render_wheel(app: &App, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let board = app.controller.presentation();

    for (element, view) in app.controller.elements().iter().zip(&board.letters) {
        if let Some((col, row)) = wheel::button_position(&element.slot, area) {
            buf.set_string(
                col,
                row,
                format!("[{}]", element.symbol),
                letter_style(view.state, view.enabled),
            );
        }
    }

    let hub = wheel::hub(area);
    let running = board.control == StartControlMode::Stop;
    let timer_style = if running {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let (control_label, control_color) = match board.control {
        StartControlMode::Start => ("START", Color::Blue),
        StartControlMode::Stop => ("STOP", Color::Red),
    };
    let pulse = if app.controller.audio().pulse(Instant::now()) {
        "♪"
    } else {
        " "
    };

    let lines = vec![
        Line::from(Span::styled(board.timer.clone(), timer_style)),
        Line::from(Span::raw(pulse)),
        Line::from(Span::styled(
            format!("[ {} ]", control_label),
            Style::default()
                .fg(Color::White)
                .bg(control_color)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let top_pad = hub.height.saturating_sub(lines.len() as u16) / 2;
    let inner = Rect::new(
        hub.x,
        hub.y + top_pad,
        hub.width,
        hub.height.saturating_sub(top_pad),
    );
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, buf);
}

fn render_fields(app: &App, area: Rect, buf: &mut Buffer) {
    let board = app.controller.presentation();
    let total = FIELD_WIDTH * 2 + 2;
    let start_x = area.x + area.width.saturating_sub(total) / 2;

    for (i, field) in [Field::Min, Field::Max].into_iter().enumerate() {
        let rect = Rect::new(
            start_x + i as u16 * (FIELD_WIDTH + 2),
            area.y,
            FIELD_WIDTH,
            area.height,
        )
        .intersection(area);
        if rect.is_empty() {
            continue;
        }

        let border_style = if board.field_error(field) {
            Style::default().fg(Color::Red)
        } else if app.focus == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let title = match field {
            Field::Min => "min time",
            Field::Max => "max time",
        };
        let cursor = if app.focus == field { "_" } else { "" };

        Paragraph::new(format!("{}{}", app.input(field), cursor))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            )
            .render(rect, buf);
    }
}

fn render_modal(title: &str, message: &str, color: Color, area: Rect, buf: &mut Buffer) {
    let rect = wheel::centered_rect(44, 7, area);
    Clear.render(rect, buf);

    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) OK",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title.to_string()),
    )
    .render(rect, buf);
}
