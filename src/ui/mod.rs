use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::adder::Operand;
use crate::app::{App, Popup, Section};
use crate::password::{MAX_LENGTH, MIN_LENGTH};
use crate::theme::Theme;

static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),  // Info line
            Constraint::Length(7),  // Adder box
            Constraint::Min(7),     // Password box
            Constraint::Length(1),  // Footer
        ])
        .split(f.area());

    draw_info_line(f, app, chunks[0]);
    draw_adder_box(f, app, chunks[1]);
    draw_password_box(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
    }
}

/// Border and title styling shared by both boxes
fn section_block(title: &str, is_active: bool) -> Block<'_> {
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref status) = app.status_message {
        let color = if status.starts_with("Error") { danger() } else { warning() };
        Line::from(Span::styled(status, Style::default().fg(color)))
    } else {
        Line::from(Span::styled("Ready", Style::default().fg(text_dim())))
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_adder_box(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Adder;
    let block = section_block(" Adder ", is_active);

    let field_line = |label: &str, which: Operand| {
        let focused = is_active && app.adder_focus == which;
        let marker = if focused { "▶ " } else { "  " };
        let cursor = if focused { "▏" } else { "" };
        let value = app.adder.operand(which);

        let value_span = if value.is_empty() && !focused {
            Span::styled("enter a number", Style::default().fg(inactive()))
        } else {
            Span::styled(format!("{}{}", value, cursor), Style::default().fg(text()))
        };

        Line::from(vec![
            Span::styled(marker, Style::default().fg(accent())),
            Span::styled(format!("{:<8}", label), Style::default().fg(text_dim())),
            value_span,
        ])
    };

    let mut lines = vec![
        field_line("First", Operand::First),
        field_line("Second", Operand::Second),
        Line::from(""),
    ];

    // Nothing is shown until the first add
    if let Some(sum) = app.adder.sum_display() {
        let color = if app.adder.sum().is_some_and(f64::is_nan) { danger() } else { success() };
        lines.push(Line::from(vec![
            Span::styled("  Result  ", Style::default().fg(text_dim())),
            Span::styled(sum, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_password_box(f: &mut Frame, app: &App, area: Rect) {
    let is_active = app.section == Section::Password;
    let block = section_block(" Password ", is_active);
    let state = &app.password;

    let toggle = |checked: bool, key: &'static str, rest: &'static str| {
        let (mark, color) = if checked { ("[x]", success()) } else { ("[ ]", inactive()) };
        vec![
            Span::styled(mark, Style::default().fg(color)),
            Span::styled(" (", Style::default().fg(text_dim())),
            Span::styled(key, Style::default().fg(accent())),
            Span::styled(format!("){}   ", rest), Style::default().fg(text_dim())),
        ]
    };

    let mut toggles = vec![Span::raw("  ")];
    toggles.extend(toggle(state.include_digits(), "n", "umbers"));
    toggles.extend(toggle(state.include_letters(), "c", "haracters"));
    toggles.extend(toggle(state.include_symbols(), "s", "pecial"));

    let mut lines = vec![
        Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(state.password(), Style::default().fg(text()).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(length_slider(state.length()), Style::default().fg(accent())),
            Span::styled(format!(" Length: {}", state.length()), Style::default().fg(warning())),
        ]),
        Line::from(""),
        Line::from(toggles),
    ];

    if state.options().uses_fallback() {
        lines.push(Line::from(Span::styled(
            "  No class selected: using lowercase letters",
            Style::default().fg(text_dim()),
        )));
    }

    let content = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(content, area);
}

/// Text rendition of the length range control
fn length_slider(length: usize) -> String {
    let steps = MAX_LENGTH - MIN_LENGTH;
    let filled = length.saturating_sub(MIN_LENGTH).min(steps);
    format!("{}●{}", "━".repeat(filled), "─".repeat(steps - filled))
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.section {
        Section::Adder => vec![
            ("↑↓", "Field"),
            ("Enter", "Add"),
            ("Esc", "Clear"),
            ("Tab", "Next"),
            ("F1", "Help"),
        ],
        Section::Password => vec![
            ("←→", "Length"),
            ("n/c/s", "Toggle"),
            ("g", "New"),
            ("y", "Copy"),
            ("Tab", "Next"),
            ("h", "Help"),
            ("q", "Quit"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 4 } else if area.width < 80 { 5 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 30 { 95 } else { 80 },
        area
    );

    f.render_widget(Clear, popup_area);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), Style::default().fg(accent())),
            Span::raw(what),
        ])
    };
    let heading = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(header()).add_modifier(Modifier::BOLD)))
    };

    let help_text = vec![
        heading("═══ Navigation ═══"),
        key("Tab", "Switch between Adder and Password"),
        key("F1", "This help"),
        key("q", "Quit (outside the adder fields)"),
        key("Ctrl-C", "Quit"),
        Line::from(""),
        heading("═══ Adder ═══"),
        key("0-9 . e", "Type into the selected field"),
        key("↑/↓", "Select first/second field"),
        key("Enter", "Add the two fields"),
        key("Esc", "Clear both fields and the result"),
        Line::from(vec![
            Span::raw("            Blank fields count as 0, anything else non-numeric gives NaN"),
        ]),
        Line::from(""),
        heading("═══ Password ═══"),
        key("←/→ -/+", "Shorter/longer (6 to 32)"),
        key("n", "Toggle numbers"),
        key("c", "Toggle letters"),
        key("s", "Toggle special characters"),
        key("g/Space", "Generate a new password"),
        key("y/Enter", "Copy to clipboard"),
        Line::from(""),
        heading("═══ Command Line ═══"),
        key("pocketkit -g", "Print a password (-l, --digits, --symbols, --no-letters)"),
        key("pocketkit -a 3 4", "Print a sum"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" pocketkit Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
