use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs};

use crate::estimate::{Estimate, Field, SAMPLE_DATASET};
use crate::output::formatter::{short_header, signed_bar};
use crate::output::{format_adjustment, format_days};
use crate::tui::app::{App, InputMode, View};
use crate::tui::theme::ThemeColors;

const TITLE: &str = "Delivery Time Estimator";
const FACTOR_WIDTH: usize = 26;

pub fn draw(frame: &mut Frame, app: &mut App) {
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
        Constraint::Fill(1),   // Form/result or sample table
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_view {
        View::Estimate => render_estimate_view(frame, chunks[2], app),
        View::Sample => render_sample_view(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::Help => render_help_popup(frame, &app.colors),
        InputMode::Breakdown => {
            if let Some(result) = &app.result {
                render_breakdown_popup(frame, result, &app.colors);
            }
        }
        InputMode::Editing | InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let version = format!("v{}", env!("CARGO_PKG_VERSION"));
    let padding_len = (area.width as usize).saturating_sub(TITLE.len() + version.len());

    let title = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(app.colors.title_color).bold()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(version, Style::default().fg(app.colors.muted)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles = vec!["Estimate", "Sample Dataset"];
    let selected = match app.current_view {
        View::Estimate => 0,
        View::Sample => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.colors.tab_inactive_style)
        .highlight_style(app.colors.tab_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_estimate_view(frame: &mut Frame, area: Rect, app: &mut App) {
    // Side by side when there is room, stacked otherwise
    let chunks = if area.width >= 80 {
        Layout::horizontal([Constraint::Length(40), Constraint::Fill(1)]).split(area)
    } else {
        Layout::vertical([
            Constraint::Length(Field::ALL.len() as u16 + 3),
            Constraint::Fill(1),
        ])
        .split(area)
    };

    render_form(frame, chunks[0], app);
    render_result(frame, chunks[1], app);
}

fn render_form(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = &app.colors;
    let editing = app.input_mode == InputMode::Editing;
    let selected = app.selected_field();

    let rows: Vec<Row> = Field::ALL
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let value = if editing && *field == selected {
                Line::from(vec![
                    Span::styled(app.edit_buffer.clone(), colors.edit_style),
                    Span::styled("_", colors.edit_style.slow_blink()),
                ])
            } else {
                Line::from(app.input.value_label(*field))
            };

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(colors.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(Span::styled(
                    field.label(),
                    Style::default().fg(colors.label_color),
                )),
                Cell::from(value),
            ])
            .style(row_style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(21), Constraint::Fill(1)])
        .header(Row::new(["Parameter", "Value"]).style(colors.header_style))
        .block(Block::bordered().title(" Shipment "))
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_result(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let block = Block::bordered().title(" Estimate ");

    let Some(result) = &app.result else {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Press p to predict the delivery time",
                Style::default().fg(colors.muted),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let inner_width = block.inner(area).width as usize;
    let half_width = (inner_width.saturating_sub(FACTOR_WIDTH + 8) / 2).clamp(2, 20);

    let mut lines = vec![
        Line::from(vec![
            Span::raw("Estimated Delivery Time: "),
            Span::styled(
                format_days(result.days),
                Style::default().fg(colors.estimate_color).bold(),
            ),
        ]),
        Line::from(""),
    ];
    lines.extend(breakdown_lines(result, half_width, colors));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Factor rows with signed bars, the uncapped total, and cap/floor notes
fn breakdown_lines(result: &Estimate, half_width: usize, colors: &ThemeColors) -> Vec<Line<'static>> {
    let max = result.breakdown.max_magnitude();
    let axis = Style::default().fg(colors.bar_axis);

    let mut lines: Vec<Line> = result
        .breakdown
        .adjustments
        .iter()
        .map(|adj| {
            let (left, right) = signed_bar(adj.days, max, half_width);
            let bar = Style::default().fg(colors.bar_color(adj.days));
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", adj.factor.label(), width = FACTOR_WIDTH),
                    Style::default().fg(colors.label_color),
                ),
                Span::raw(format!("{:>6} ", format_adjustment(adj.days))),
                Span::styled(left, bar),
                Span::styled("│", axis),
                Span::styled(right, bar),
            ])
        })
        .collect();

    lines.push(Line::from(vec![
        Span::styled(
            format!("{:<width$}", "Total (before caps)", width = FACTOR_WIDTH),
            Style::default().bold(),
        ),
        Span::styled(
            format!("{:>6}", format_adjustment(result.total)),
            Style::default().bold(),
        ),
    ]));

    let note = Style::default().fg(colors.note_color);
    if result.urgent_cap_applied {
        lines.push(Line::from(Span::styled(
            "Urgent priority caps the estimate at 2 days.",
            note,
        )));
    }
    if result.floor_applied {
        lines.push(Line::from(Span::styled(
            "Estimate raised to the 1 day minimum.",
            note,
        )));
    }

    lines
}

fn render_sample_view(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(area);

    let widths: Vec<Constraint> = Field::ALL
        .iter()
        .map(|field| {
            let longest = SAMPLE_DATASET
                .iter()
                .map(|row| row.value_label(*field).chars().count())
                .chain(std::iter::once(short_header(*field).len()))
                .max()
                .unwrap_or(0);
            Constraint::Length(longest as u16)
        })
        .collect();

    let rows: Vec<Row> = SAMPLE_DATASET
        .iter()
        .enumerate()
        .map(|(idx, input)| {
            let row_style = if idx % 2 == 1 {
                Style::default().bg(colors.row_alt_bg)
            } else {
                Style::default()
            };
            Row::new(
                Field::ALL
                    .iter()
                    .map(|field| Cell::from(input.value_label(*field)))
                    .collect::<Vec<_>>(),
            )
            .style(row_style)
        })
        .collect();

    let header = Row::new(Field::ALL.iter().map(|field| short_header(*field)))
        .style(colors.header_style);

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(Block::bordered().title(" Sample Dataset "));
    frame.render_widget(table, chunks[0]);

    let footer = Paragraph::new(Span::styled(
        "Illustrative shipments. The estimator does not read them.",
        Style::default().fg(colors.muted),
    ));
    frame.render_widget(footer, chunks[1]);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;

    let text = if let Some((ref msg, _)) = app.flash_message {
        // Show flash message with color based on message type
        let msg_color = if msg.starts_with("Invalid") || msg.starts_with("No estimate") {
            colors.flash_error
        } else if msg.starts_with("Predicted") || msg.starts_with("Reset") {
            colors.flash_success
        } else {
            colors.flash_info
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        // Build hints with colored shortcut keys
        let hints: &[(&str, &str)] = match (&app.input_mode, &app.current_view) {
            (InputMode::Editing, _) => &[("Enter", ":save"), ("Esc", ":cancel")],
            (_, View::Estimate) => &[
                ("j/k", ":nav"),
                ("h/l", ":change"),
                ("Enter", ":edit"),
                ("p", ":predict"),
                ("b", ":breakdown"),
                ("r", ":reset"),
                ("Tab", ":sample"),
                ("?", ":help"),
                ("q", ":quit"),
            ],
            (_, View::Sample) => &[("Tab", ":estimate"), ("?", ":help"), ("q", ":quit")],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(colors.status_key_color),
            ));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    let status = Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg));
    frame.render_widget(status, area);
}

/// Calculate a centered rectangle with fixed dimensions
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

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, colors: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 16, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", colors.popup_title))
        .border_style(Style::default().fg(colors.popup_border))
        .style(Style::default().bg(colors.popup_bg));

    let key_style = Style::default().fg(colors.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Next field"),
        ("k / Up        ", "Previous field"),
        ("l / Right     ", "Next value"),
        ("h / Left      ", "Previous value"),
        ("Enter         ", "Edit number or next value"),
        ("p / Space     ", "Predict delivery time"),
        ("b             ", "Show breakdown details"),
        ("r             ", "Reset form to defaults"),
        ("Tab           ", "Toggle Estimate/Sample"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines).block(block), popup_area);
}

/// Per-factor table with the reason each adjustment applied
fn render_breakdown_popup(frame: &mut Frame, result: &Estimate, colors: &ThemeColors) {
    let notes = usize::from(result.urgent_cap_applied) + usize::from(result.floor_applied);
    // header + factors + total + estimate + notes + borders
    let height = (result.breakdown.adjustments.len() + notes + 5) as u16;
    let popup_area = centered_rect_fixed(72, height, frame.area());

    frame.render_widget(Clear, popup_area);

    let mut rows: Vec<Row> = result
        .breakdown
        .adjustments
        .iter()
        .map(|adj| {
            Row::new(vec![
                Cell::from(adj.factor.label()),
                Cell::from(Span::styled(
                    format_adjustment(adj.days),
                    Style::default().fg(colors.bar_color(adj.days)),
                )),
                Cell::from(Span::styled(
                    adj.reason.clone(),
                    Style::default().fg(colors.muted),
                )),
            ])
        })
        .collect();

    rows.push(
        Row::new(vec![
            Cell::from("Total (before caps)"),
            Cell::from(format_adjustment(result.total)),
            Cell::from(""),
        ])
        .style(Style::default().bold()),
    );
    rows.push(Row::new(vec![
        Cell::from("Estimated Delivery Time"),
        Cell::from(Span::styled(
            format!("{:.2}", result.days),
            Style::default().fg(colors.estimate_color).bold(),
        )),
        Cell::from("days"),
    ]));

    let note = Style::default().fg(colors.note_color);
    if result.urgent_cap_applied {
        rows.push(Row::new(vec![
            Cell::from(Span::styled("Urgent priority caps the estimate at 2 days.", note)),
        ]));
    }
    if result.floor_applied {
        rows.push(Row::new(vec![
            Cell::from(Span::styled("Estimate raised to the 1 day minimum.", note)),
        ]));
    }

    let block = Block::bordered()
        .title(Span::styled(" Breakdown ", colors.popup_title))
        .border_style(Style::default().fg(colors.popup_border))
        .style(Style::default().bg(colors.popup_bg));

    let table = Table::new(
        rows,
        [
            Constraint::Length(FACTOR_WIDTH as u16),
            Constraint::Length(6),
            Constraint::Fill(1),
        ],
    )
    .header(Row::new(["Factor", "Days", "Reason"]).style(colors.header_style))
    .block(block);

    frame.render_widget(table, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::InputSpec;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        App::new(InputSpec::default(), ThemeColors::dark())
    }

    #[test]
    fn test_form_shows_every_field() {
        let screen = render(&mut app(), 100, 30);
        for field in Field::ALL {
            assert!(screen.contains(field.label()), "missing {}", field.label());
        }
        assert!(screen.contains("Press p to predict"));
    }

    #[test]
    fn test_result_panel_after_predict() {
        let mut app = app();
        app.predict();
        let screen = render(&mut app, 120, 30);
        assert!(screen.contains("Estimated Delivery Time: 2.00 days"));
        assert!(screen.contains("Warehouse Adjustment"));
        assert!(screen.contains("Total (before caps)"));
    }

    #[test]
    fn test_sample_tab_lists_rows() {
        let mut app = app();
        app.toggle_view();
        let screen = render(&mut app, 120, 20);
        assert!(screen.contains("Sample Dataset"));
        assert!(screen.contains("Home & Kitchen"));
    }

    #[test]
    fn test_tiny_terminal() {
        let screen = render(&mut app(), 20, 4);
        assert!(screen.contains("Terminal too small"));
    }

    #[test]
    fn test_help_popup() {
        let mut app = app();
        app.show_help();
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("Keyboard Shortcuts"));
    }
}
