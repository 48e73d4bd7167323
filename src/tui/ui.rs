use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph, Tabs, Wrap};

use crate::output::{format_formula_note, format_percentage};
use crate::scoring::{
    AggregateInput, AggregateResult, EducationTrack, EntryTestKind, MarkPart, ScoreField,
    A_LEVEL_BONUS,
};
use crate::tui::app::{App, FormRow, InputMode, Section};
use crate::tui::theme::ThemeColors;

const TITLE: &str = "FAST NU Aggregate Calculator";
const BAR_WIDTH: usize = 20;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Tab bar
        Constraint::Fill(1),   // Form or results
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match (&app.section, &app.result) {
        (Section::Results, Some((input, result))) => {
            render_results(frame, chunks[2], app, input, result)
        }
        _ => render_form(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, &app.theme);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(Span::styled(
        TITLE,
        Style::default().fg(app.theme.title_color).bold(),
    ));
    frame.render_widget(Paragraph::new(title), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let selected = match app.section {
        Section::Form => 0,
        Section::Results => 1,
    };

    let titles = if app.result.is_some() {
        vec!["Calculator", "Results"]
    } else {
        vec!["Calculator"]
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.focused_row();
    let track = app.draft.track();
    let mut lines: Vec<Line> = Vec::new();

    // Education system
    lines.push(heading("Education System", theme));
    let track_choices: Vec<(String, bool)> = EducationTrack::ALL
        .iter()
        .map(|t| (t.label().to_string(), *t == track))
        .collect();
    lines.push(focusable(
        choice_line(&track_choices, theme),
        focused == FormRow::Track,
        theme,
    ));
    if track.receives_bonus() {
        lines.push(hint("  A-Level students receive an additional 10% weightage", theme));
    }
    lines.push(Line::from(""));

    for field in ScoreField::ALL {
        if field == ScoreField::Test {
            lines.push(heading("Entry Test Type", theme));
            let kind = app.draft.test_kind();
            let kind_choices: Vec<(String, bool)> = EntryTestKind::ALL
                .iter()
                .map(|k| (k.label().to_string(), *k == kind))
                .collect();
            lines.push(focusable(
                choice_line(&kind_choices, theme),
                focused == FormRow::TestKind,
                theme,
            ));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            Span::styled(
                format!("{} Marks", field.label(track)),
                Style::default().fg(theme.label_color).bold(),
            ),
            Span::raw("  "),
            Span::styled(
                format!(
                    "Contributes {:.0}% to your aggregate score",
                    field.weight() * 100.0
                ),
                Style::default().fg(theme.hint_color),
            ),
        ]));
        for part in [MarkPart::Obtained, MarkPart::Total] {
            let is_focused = focused == FormRow::Mark(field, part);
            lines.push(focusable(
                mark_line(app, field, part, is_focused),
                is_focused,
                theme,
            ));
        }
        lines.push(Line::from(""));
    }

    let button = Line::from(Span::styled(" Calculate Aggregate ", theme.button_style));
    lines.push(focusable(button, focused == FormRow::Calculate, theme));

    // Keep the focused row on screen when the terminal is short
    let focus_line = lines
        .iter()
        .position(|l| l.style == theme.focus_style)
        .unwrap_or(0);
    let scroll = focus_line.saturating_sub(area.height.saturating_sub(1) as usize);

    frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), area);
}

fn heading<'a>(text: &'a str, theme: &ThemeColors) -> Line<'a> {
    Line::from(Span::styled(
        text,
        Style::default().fg(theme.label_color).bold(),
    ))
}

fn hint<'a>(text: &'a str, theme: &ThemeColors) -> Line<'a> {
    Line::from(Span::styled(text, Style::default().fg(theme.hint_color)))
}

fn focusable<'a>(line: Line<'a>, focused: bool, theme: &ThemeColors) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let mut spans = vec![Span::styled(marker, Style::default().fg(theme.title_color))];
    spans.extend(line.spans);
    let line = Line::from(spans);
    if focused {
        line.style(theme.focus_style)
    } else {
        line
    }
}

fn choice_line(choices: &[(String, bool)], theme: &ThemeColors) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (label, selected)) in choices.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if *selected {
            theme.choice_selected
        } else {
            theme.choice_idle
        };
        spans.push(Span::styled(format!(" {} ", label), style));
    }
    Line::from(spans)
}

fn mark_line(app: &App, field: ScoreField, part: MarkPart, focused: bool) -> Line<'static> {
    let theme = &app.theme;
    let label = match part {
        MarkPart::Obtained => "Obtained: ",
        MarkPart::Total => "Total:    ",
    };
    let text = app.entries.get(field, part);
    let shown = if focused {
        format!("{}|", text)
    } else if text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    };

    let mut spans = vec![
        Span::styled(label, Style::default().fg(theme.muted)),
        Span::styled(shown, theme.input_style),
    ];
    if field == ScoreField::Test && part == MarkPart::Total {
        let kind = app.draft.test_kind();
        if let Some(fixed) = kind.fixed_total() {
            spans.push(Span::styled(
                format!("  ({} is scored out of {:.0})", kind.label(), fixed),
                Style::default().fg(theme.hint_color),
            ));
        }
    }
    Line::from(spans)
}

fn render_results(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    input: &AggregateInput,
    result: &AggregateResult,
) {
    let theme = &app.theme;
    let precision = app.precision;
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Your Aggregate Score",
            Style::default().fg(theme.label_color).bold(),
        )),
        Line::from(Span::styled(
            format!("  {}", format_percentage(result.composite_score, precision)),
            Style::default().fg(theme.aggregate_color).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Score Breakdown",
            Style::default().fg(theme.label_color).bold(),
        )),
    ];

    let labels: Vec<String> = result
        .breakdown
        .contributions
        .iter()
        .map(|c| format!("{} ({:.0}%)", c.field.label(input.track), c.weight * 100.0))
        .collect();
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

    for (label, contribution) in labels.iter().zip(&result.breakdown.contributions) {
        let mut spans = vec![
            Span::styled(
                format!("  {:<width$}  ", label, width = label_width),
                Style::default().fg(theme.muted),
            ),
            Span::styled(
                format!(
                    "{:>8}  ",
                    format_percentage(contribution.percentage, precision)
                ),
                Style::default().fg(theme.percentage_color),
            ),
        ];
        spans.extend(percentage_bar(contribution.percentage, BAR_WIDTH, theme).spans);
        lines.push(Line::from(spans));
    }

    if result.breakdown.bonus_applied {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  A-Level Bonus ({:.0}%)  ", (A_LEVEL_BONUS - 1.0) * 100.0),
                Style::default().fg(theme.muted),
            ),
            Span::styled("Applied", Style::default().fg(theme.bonus_color).bold()),
        ]));
    }
    if result.breakdown.clamped {
        lines.push(hint_owned(
            format!(
                "  Capped at 100% (uncapped {})",
                format_percentage(result.breakdown.after_bonus, precision)
            ),
            theme,
        ));
    }

    lines.push(Line::from(""));
    lines.push(hint_owned(format_formula_note(input), theme));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(" Edit Information ", theme.button_style),
        Span::styled("  press e", Style::default().fg(theme.hint_color)),
    ]));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn hint_owned(text: String, theme: &ThemeColors) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(theme.hint_color)))
}

/// Horizontal bar for a 0..=100 percentage. Out-of-range and NaN values are pinned.
fn percentage_bar(pct: f64, width: usize, theme: &ThemeColors) -> Line<'static> {
    let ratio = if pct.is_nan() {
        0.0
    } else {
        (pct / 100.0).clamp(0.0, 1.0)
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(theme.percentage_color),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(theme.bar_empty),
        ));
    }
    Line::from(spans)
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Invalid") {
            theme.flash_error
        } else {
            theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints: &[(&str, &str)] = match app.section {
            Section::Form => &[
                ("j/k", ":move "),
                ("h/l", ":choose "),
                ("Enter", ":next "),
                ("c", ":calculate "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            Section::Results => &[
                ("e", ":edit "),
                ("Tab", ":calculator "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(theme.status_key_color),
            ));
            spans.push(Span::styled(*label, Style::default().fg(theme.muted)));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 15, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .border_style(Style::default().fg(theme.popup_border))
        .title(Span::styled(" Keyboard Shortcuts ", theme.popup_title));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let shortcuts = [
        ("j / Down      ", "Next field"),
        ("k / Up        ", "Previous field"),
        ("h / l         ", "Change selection"),
        ("0-9 . -       ", "Type marks"),
        ("Backspace     ", "Delete a character"),
        ("Enter         ", "Next field / press button"),
        ("c             ", "Calculate aggregate"),
        ("e             ", "Edit information"),
        ("Tab           ", "Toggle Calculator/Results"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = shortcuts
        .iter()
        .map(|(key, action)| {
            Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)])
        })
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
