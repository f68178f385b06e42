use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::message::Sender;
use crate::provider::Provider;

/// Placeholder shown in the empty input box, reflecting the selected
/// provider.
pub fn input_placeholder(provider: Provider) -> String {
    format!("Ask {} anything...", provider.display_name())
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat log, input box, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(4),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &mut App, frame: &mut Frame, area: Rect) {
    let [title_area, tabs_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let title = Line::from(vec![
        Span::styled(
            " Multi-AI Chatbot ",
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(title).style(Style::default().bg(Color::DarkGray)),
        title_area,
    );

    // One tab per registered provider; the selected one gets the
    // provider's color theme. Tab areas feed mouse hit-testing.
    app.tab_areas.clear();
    let mut tabs: Vec<Span> = vec![Span::raw(" ")];
    let mut x = tabs_area.x + 1;

    for &provider in Provider::all() {
        let label = format!(" {} {} ", provider.glyph(), provider.display_name());
        let width = label.chars().count() as u16;

        let style = if provider == app.selected_provider {
            Style::default()
                .bg(provider.color())
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        app.tab_areas
            .push((Rect::new(x, tabs_area.y, width, 1), provider));
        tabs.push(Span::styled(label, style));
        tabs.push(Span::raw(" "));
        x += width + 1;
    }

    frame.render_widget(Paragraph::new(Line::from(tabs)), tabs_area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Chat ");

    // Cache the inner size for the scroll arithmetic
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let chat_text = if app.messages.is_empty() && !app.is_busy() {
        Text::from(Span::styled(
            "Select an AI provider and start chatting!",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for message in &app.messages {
            match message.sender {
                Sender::User => {
                    lines.push(
                        Line::from(vec![
                            Span::styled(
                                "You",
                                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                            ),
                            Span::styled(
                                format!(" · {}", message.timestamp),
                                Style::default().fg(Color::DarkGray),
                            ),
                        ])
                        .alignment(Alignment::Right),
                    );
                    for line in message.text.lines() {
                        lines.push(Line::from(line.to_string()).alignment(Alignment::Right));
                    }
                }
                Sender::Ai => {
                    let provider =
                        Provider::from_id(message.provider.as_deref().unwrap_or_default());
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("{} {}", provider.glyph(), provider.display_name()),
                            Style::default()
                                .fg(provider.color())
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!(" · {}", message.timestamp),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]));
                    for line in message.text.lines() {
                        lines.push(Line::from(line.to_string()));
                    }
                }
            }
            lines.push(Line::default());
        }

        if app.is_busy() {
            let provider = app.pending_provider().unwrap_or(app.selected_provider);
            lines.push(Line::from(Span::styled(
                format!("{} {}", provider.glyph(), provider.display_name()),
                Style::default()
                    .fg(provider.color())
                    .add_modifier(Modifier::BOLD),
            )));
            // Animated typing indicator: one to three dots
            let dots = "●".repeat(app.animation_frame as usize + 1);
            lines.push(Line::from(Span::styled(
                dots,
                Style::default().fg(Color::DarkGray),
            )));
        }

        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.is_busy() {
        Color::DarkGray
    } else {
        Color::Yellow
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Message ");

    let inner_width = area.width.saturating_sub(2) as usize;

    if app.draft.is_empty() {
        let placeholder = Paragraph::new(input_placeholder(app.selected_provider))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);

        if !app.is_busy() {
            frame.set_cursor_position((area.x + 1, area.y + 1));
        }
        return;
    }

    // Locate the cursor as (row, col) in character terms
    let draft_lines: Vec<&str> = app.draft.split('\n').collect();
    let mut row = draft_lines.len().saturating_sub(1);
    let mut col = app.draft_cursor;
    for (i, line) in draft_lines.iter().enumerate() {
        let len = line.chars().count();
        if col <= len {
            row = i;
            break;
        }
        col -= len + 1; // consume the newline
    }

    // Two visible rows; scroll so the cursor stays in view
    let top = row.saturating_sub(1);
    let col_scroll = if inner_width == 0 {
        0
    } else if col >= inner_width {
        col - inner_width + 1
    } else {
        0
    };

    let text: Vec<Line> = draft_lines
        .iter()
        .map(|line| Line::from(line.to_string()))
        .collect();

    let input = Paragraph::new(Text::from(text))
        .style(Style::default().fg(Color::Cyan))
        .block(block)
        .scroll((top as u16, col_scroll as u16));

    frame.render_widget(input, area);

    if !app.is_busy() {
        frame.set_cursor_position((
            area.x + 1 + (col - col_scroll) as u16,
            area.y + 1 + (row - top) as u16,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = vec![
        Span::styled(" Enter ", key_style),
        Span::styled(" send ", label_style),
        Span::styled(" Shift+Enter ", key_style),
        Span::styled(" newline ", label_style),
        Span::styled(" Tab ", key_style),
        Span::styled(" provider ", label_style),
        Span::styled(" ↑/↓ ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ];

    if app.is_busy() {
        hints.push(Span::styled(
            " waiting for reply... ",
            Style::default().bg(Color::Black).fg(Color::Yellow),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(hints)).style(Style::default().bg(Color::Black)),
        area,
    );
}
