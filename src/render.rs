//! Terminal drawing with ratatui.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::config::Config;
use crate::heat::{HeatColor, Metric};
use crate::input::HELP;
use crate::nav::{NavState, Phase};
use crate::view::{self, RowView};

const TEXT: Color = Color::Rgb(192, 202, 245);
const MUTED: Color = Color::Rgb(65, 72, 104);
const SELECTED_BG: Color = Color::Rgb(65, 72, 104);
const TITLE: Color = Color::Rgb(14, 165, 233);

pub fn heat_color(color: HeatColor) -> Color {
    match color {
        HeatColor::Blue => Color::Rgb(14, 165, 233),
        HeatColor::Cyan => Color::Rgb(6, 182, 212),
        HeatColor::Green => Color::Rgb(16, 185, 129),
        HeatColor::Yellow => Color::Rgb(245, 158, 11),
        HeatColor::Orange => Color::Rgb(249, 115, 22),
        HeatColor::Red => Color::Rgb(239, 68, 68),
    }
}

/// First visible row so that the cursor stays on screen
fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    cursor.saturating_sub(height - 1)
}

pub fn draw(frame: &mut Frame, state: &NavState, config: &Config) {
    let area = frame.area();

    match state.phase() {
        Phase::Loading => {
            frame.render_widget(
                Paragraph::new("Scanning…").style(Style::default().fg(TEXT)),
                area,
            );
        }
        Phase::Failed(err) => {
            let lines = vec![
                Line::from(Span::styled(
                    format!("Error: {err}"),
                    Style::default().fg(heat_color(HeatColor::Red)),
                )),
                Line::from(""),
                Line::from(Span::styled("Press 'q' to quit", Style::default().fg(TEXT))),
            ];
            frame.render_widget(Paragraph::new(lines), area);
        }
        Phase::Ready(tree) => {
            let [header, legend, body, footer] = Layout::vertical([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .areas(area);

            draw_header(frame, header, &tree.root_path().display().to_string());
            draw_legend(frame, legend, state.metric(), config);
            draw_rows(frame, body, state, config);
            draw_footer(frame, footer, state);
        }
    }
}

fn draw_header(frame: &mut Frame, area: Rect, root: &str) {
    let line = Line::from(vec![
        Span::styled(
            "🔥 heatree",
            Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {root}"), Style::default().fg(TEXT)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_legend(frame: &mut Frame, area: Rect, metric: Metric, config: &Config) {
    let mut spans = vec![Span::styled(
        format!("{}: ", metric.title()),
        Style::default().fg(TEXT),
    )];

    let scheme = config.heat.scheme(metric);
    for (i, (color, label)) in scheme.legend().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("█ {label}"),
            Style::default().fg(heat_color(color)),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_rows(frame: &mut Frame, area: Rect, state: &NavState, config: &Config) {
    let rows = view::rows(state, config);
    if rows.is_empty() {
        frame.render_widget(
            Paragraph::new("No files found").style(Style::default().fg(TEXT)),
            area,
        );
        return;
    }

    let height = area.height as usize;
    let offset = scroll_offset(state.cursor(), height);
    let lines: Vec<Line> = rows
        .iter()
        .skip(offset)
        .take(height)
        .map(|row| row_line(row, state.metric(), config.view.bar_width))
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn row_line(row: &RowView, metric: Metric, bar_width: usize) -> Line<'static> {
    let (base, value_style) = if row.is_cursor {
        (
            Style::default().fg(TEXT).bg(SELECTED_BG),
            Style::default().fg(heat_color(row.color)).bg(SELECTED_BG),
        )
    } else {
        (
            Style::default().fg(TEXT),
            Style::default().fg(heat_color(row.color)),
        )
    };

    let (filled, padding) = view::bar(row.bar_len, bar_width);
    Line::from(vec![
        Span::styled(format!("{}{} {}", row.indent(), row.icon(), row.name), base),
        Span::raw("  "),
        Span::styled(filled, Style::default().fg(heat_color(row.color))),
        Span::raw(padding),
        Span::raw("  "),
        Span::styled(view::format_value(metric, row.value), value_style),
    ])
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &NavState) {
    let mut text = format!("{HELP}  |  {}", view::status_line(state));
    if let Some(stats) = state.stats() {
        text.push_str("  |  ");
        text.push_str(&view::scan_summary(stats));
    }
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(MUTED)),
        area,
    );
}
