//! Drawing. Geometry comes from [`App::panes`], so what is drawn lines up
//! with what the mouse handling hit-tests.

use diffnav_common::{ChangeStatus, IconStyle};
use diffnav_core::diff_view::DIFF_HEADER_HEIGHT;
use diffnav_core::icons;
use diffnav_core::keys::{HELP, SEARCH_HELP};
use diffnav_core::panes::Area;
use diffnav_core::tree::layout::INDENT;
use diffnav_core::tree::truncate;
use diffnav_core::{App, Panel, Row, RowKind};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::ansi::StyledDiff;

const ACCENT: Color = Color::Indexed(4);
const MUTED: Color = Color::Indexed(8);
const TITLE: Color = Color::Indexed(6);
const HIGHLIGHT: Color = Color::Rgb(0x1b, 0x1b, 0x33);

fn rect(area: Area) -> Rect {
    Rect::new(area.x, area.y, area.width, area.height)
}

fn muted() -> Style {
    Style::default().fg(MUTED)
}

fn status_color(status: ChangeStatus) -> Color {
    match status {
        ChangeStatus::Added => Color::Green,
        ChangeStatus::Deleted => Color::Red,
        ChangeStatus::Modified => Color::Yellow,
    }
}

pub fn draw(frame: &mut Frame<'_>, app: &App, styled: &mut StyledDiff) {
    let panes = app.panes();

    if let Some(header) = panes.header {
        let title = Span::styled(
            "DIFFNAV",
            Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
        );
        frame.render_widget(Paragraph::new(Line::from(title)), rect(header));
    }

    let mut rule: String = "\u{2500}".repeat(usize::from(panes.separator.width));
    if panes.border.x < panes.separator.width {
        let at = usize::from(panes.border.x) * '\u{2500}'.len_utf8();
        rule.replace_range(at..at + '\u{2500}'.len_utf8(), "\u{252c}");
    }
    frame.render_widget(Paragraph::new(rule).style(muted()), rect(panes.separator));

    let tree_focused = app.active_panel() == Panel::Tree && !app.is_searching();
    let border_style = if tree_focused && app.is_showing_tree() {
        Style::default().fg(ACCENT)
    } else {
        muted()
    };
    let border: Vec<Line> = (0..panes.border.height)
        .map(|_| Line::from("\u{2502}"))
        .collect();
    frame.render_widget(Paragraph::new(border).style(border_style), rect(panes.border));

    if let Some(search_box) = panes.search_box {
        draw_search_box(frame, app, rect(search_box));
    }
    if let Some(list) = panes.list {
        let lines = if app.is_searching() {
            search_lines(app, usize::from(list.width))
        } else {
            tree_lines(app, usize::from(list.width))
        };
        frame.render_widget(Paragraph::new(lines), rect(list));
    }

    draw_diff(frame, app, styled, rect(panes.diff));

    if let Some(footer) = panes.footer {
        draw_footer(frame, app, rect(footer));
    }
}

fn draw_search_box(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let border = if app.is_searching() {
        Style::default().fg(ACCENT)
    } else {
        muted()
    };
    let content = if app.is_searching() {
        Line::from(vec![
            Span::raw(app.search().query().to_string()),
            Span::styled("\u{2588}", Style::default().fg(ACCENT)),
        ])
    } else {
        Line::from(Span::styled("search files (t)", muted()))
    };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn tree_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let tree = app.tree();
    let color_names = app.config().color_file_names;
    tree.visible_rows()
        .iter()
        .map(|row| tree_line(row, width, tree.icons(), tree.show_stats(), color_names))
        .collect()
}

fn tree_line(
    row: &Row,
    width: usize,
    style: IconStyle,
    show_stats: bool,
    color_names: bool,
) -> Line<'static> {
    let mut spans = vec![Span::raw(" ".repeat(INDENT * row.depth))];
    match &row.kind {
        RowKind::Directory { .. } => {
            spans.push(Span::styled(
                icons::dir_prefix(style),
                Style::default().fg(ACCENT),
            ));
            spans.push(Span::raw(row.label.clone()));
        }
        RowKind::Leaf { change } => {
            let color = status_color(change.status);
            spans.push(Span::styled(
                icons::file_prefix(style, change),
                Style::default().fg(color),
            ));
            let label = if color_names {
                Style::default().fg(color)
            } else {
                Style::default()
            };
            spans.push(Span::styled(row.label.clone(), label));
            if show_stats {
                let (added, deleted) = change.stats();
                let used: usize = spans.iter().map(|s| s.content.width()).sum();
                let stats_width = icons::stats_text(added, deleted).width();
                let pad = width.saturating_sub(used + stats_width).max(1);
                spans.push(Span::raw(" ".repeat(pad)));
                spans.extend(stat_spans(added, deleted));
            }
        }
    }
    let line = Line::from(spans);
    if row.selected {
        line.style(Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD))
    } else {
        line
    }
}

fn stat_spans(added: u64, deleted: u64) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    if added > 0 {
        spans.push(Span::styled(format!("+{added}"), Style::default().fg(Color::Green)));
    }
    if deleted > 0 {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!("-{deleted}"), Style::default().fg(Color::Red)));
    }
    spans
}

fn search_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let search = app.search();
    search
        .visible_results()
        .iter()
        .enumerate()
        .map(|(idx, path)| {
            let text = truncate(&format!(" {path}"), width);
            if search.scroll() + idx == search.cursor() {
                Line::styled(text, Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD))
            } else {
                Line::raw(text)
            }
        })
        .collect()
}

fn draw_diff(frame: &mut Frame<'_>, app: &App, styled: &mut StyledDiff, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let rule_color = if app.active_panel() == Panel::Diff {
        ACCENT
    } else {
        MUTED
    };
    let mut header: Vec<Line> = Vec::new();
    if let Some((title, added, deleted)) = app.diff_header() {
        header.push(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        header.push(Line::from(vec![
            Span::styled(format!("+{added} "), Style::default().fg(Color::Green)),
            Span::styled(format!("-{deleted}"), Style::default().fg(Color::Red)),
        ]));
    }
    header.resize(DIFF_HEADER_HEIGHT - 1, Line::default());
    header.push(Line::styled(
        "\u{2500}".repeat(usize::from(area.width)),
        Style::default().fg(rule_color),
    ));
    let header_height = (DIFF_HEADER_HEIGHT as u16).min(area.height);
    let header_area = Rect::new(area.x, area.y, area.width, header_height);
    frame.render_widget(Paragraph::new(header), header_area);

    let body = Rect::new(
        area.x,
        area.y + header_height,
        area.width,
        area.height - header_height,
    );
    let view = app.diff_view();
    let text = match (view.key(), app.diff_text()) {
        (Some(key), Some(raw)) => {
            let lines = styled.lines(key, raw);
            let start = view.scroll().min(lines.len());
            let end = (start + usize::from(body.height)).min(lines.len());
            Text::from(lines[start..end].to_vec())
        }
        _ => Text::styled("rendering\u{2026}", muted()),
    };
    // no wrapping: wide lines are clipped at the pane edge
    frame.render_widget(Paragraph::new(text), body);
}

fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut lines = vec![Line::styled(
        "\u{2500}".repeat(usize::from(area.width)),
        muted(),
    )];
    if let Some(notice) = app.notice() {
        lines.push(Line::styled(notice.to_string(), Style::default().fg(Color::Red)));
    } else {
        let help = if app.is_searching() { SEARCH_HELP } else { HELP };
        let mut spans = Vec::new();
        for (idx, (key, desc)) in help.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::styled(" \u{2022} ", muted()));
            }
            spans.push(Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)));
            spans.push(Span::styled(format!(" {desc}"), muted()));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

/// Plain-text tree for headless runs: two spaces per depth level and `>`
/// in front of the selected row.
pub fn outline(app: &App) -> String {
    app.tree()
        .rows()
        .iter()
        .map(|row| {
            let marker = if row.selected { "> " } else { "" };
            format!("{}{marker}{}", " ".repeat(INDENT * row.depth), row.label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
