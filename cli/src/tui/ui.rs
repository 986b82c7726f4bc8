use chrono::Local;
use gradedesk_core::usecase::semester_stats::summarize;
use gradedesk_core::{CourseReport, SemesterCourseRepository, CATEGORIES};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Row, Table, Tabs},
    Frame,
};

use crate::report::{due_label, format_score, truncate};
use crate::tui::app::{App, Focus};

pub fn grade_color(percentage: f64) -> Color {
    if percentage >= 90.0 {
        Color::Green
    } else if percentage >= 80.0 {
        Color::LightGreen
    } else if percentage >= 70.0 {
        Color::Yellow
    } else if percentage >= 60.0 {
        Color::Magenta
    } else {
        Color::Red
    }
}

/// Fraction of the gauge to fill; `Gauge` rejects anything outside 0..=1, NaN included.
pub fn gauge_ratio(percentage: f64) -> f64 {
    if percentage.is_finite() {
        (percentage / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

pub fn draw<R: SemesterCourseRepository>(f: &mut Frame, app: &mut App<R>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer
        ])
        .split(size);

    let stats = summarize(&app.reports);
    let header = Paragraph::new(Line::from(vec![
        Span::styled("GRADEDESK", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "   {} courses | {} credits | semester GPA {:.2}",
            app.reports.len(),
            stats.total_credits,
            stats.gpa
        )),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main_chunks[1]);

    draw_course_list(f, app, content_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(content_chunks[1]);

    draw_category_tabs(f, app, right_chunks[0]);

    let detail_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(right_chunks[1]);

    draw_assignment_list(f, app, detail_chunks[0]);
    draw_stats_panel(f, app.selected_report(), detail_chunks[1]);

    let footer_text = match &app.message {
        Some(message) => message.clone(),
        None => "j/k: Move | h/l/Tab: Category | Enter: Open course | Esc: Back | s: Status | d: Delete | q: Quit"
            .to_string(),
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[2]);
}

fn draw_course_list<R: SemesterCourseRepository>(f: &mut Frame, app: &mut App<R>, area: Rect) {
    let rows: Vec<Row> = app
        .reports
        .iter()
        .map(|report| {
            let grade = if report.has_grades() {
                Span::styled(
                    format!("{:>6.1}%", report.overall.percentage),
                    Style::default().fg(grade_color(report.overall.percentage)),
                )
            } else {
                Span::raw("     -")
            };
            Row::new(vec![
                Span::styled(
                    truncate(&report.course.course.display_name(), 24),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(report.course.course.credits.to_string()),
                grade,
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Min(10), Constraint::Length(3), Constraint::Length(8)],
    )
    .header(Row::new(vec!["Course", "Cr", "Grade"]).style(Style::default().fg(Color::Yellow)))
    .block(panel(" Courses ", app.focus == Focus::Courses))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.course_state);
}

fn draw_category_tabs<R: SemesterCourseRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let report = app.selected_report();
    let titles: Vec<Line> = CATEGORIES
        .iter()
        .map(|category| {
            let grade = report.and_then(|r| r.category_grades.get(category)).copied().unwrap_or_default();
            if grade.is_graded() {
                Line::from(vec![
                    Span::raw(format!("{} ", category.label())),
                    Span::styled(
                        format!("{:.1}%", grade.percentage),
                        Style::default().fg(grade_color(grade.percentage)),
                    ),
                ])
            } else {
                Line::from(format!("{} -", category.label()))
            }
        })
        .collect();

    let selected = CATEGORIES.iter().position(|c| *c == app.category).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(panel(" Categories ", false))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
    f.render_widget(tabs, area);
}

fn draw_assignment_list<R: SemesterCourseRepository>(f: &mut Frame, app: &mut App<R>, area: Rect) {
    let today = Local::now().date_naive();
    let rows: Vec<Row> = app
        .visible_assignments()
        .into_iter()
        .map(|a| {
            let score_style = match a.grade {
                Some(grade) if a.points > 0.0 => Style::default().fg(grade_color(grade / a.points * 100.0)),
                _ => Style::default(),
            };
            Row::new(vec![
                Span::styled(truncate(&a.name, 28), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format_score(a), score_style),
                Span::raw(due_label(a.due_date, today)),
                Span::raw(a.status.label()),
            ])
        })
        .collect();

    let title = format!(" {} ", app.category.title());
    let table = Table::new(
        rows,
        [
            Constraint::Min(10),
            Constraint::Length(18),
            Constraint::Length(22),
            Constraint::Length(11),
        ],
    )
    .header(Row::new(vec!["Name", "Score", "Due", "Status"]).style(Style::default().fg(Color::Yellow)))
    .block(panel(&title, app.focus == Focus::Assignments))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.assignment_state);
}

fn draw_stats_panel(f: &mut Frame, report: Option<&CourseReport>, area: Rect) {
    let Some(report) = report else {
        let empty = Paragraph::new("No course selected.\nAdd one with `gradedesk course add`.")
            .alignment(Alignment::Center)
            .block(panel(" Stats ", false));
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);

    let course = &report.course;
    let overall = report.overall;
    let mut lines = vec![
        Line::from(Span::styled(
            course.course.display_name(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Credits: ", Style::default().fg(Color::Blue)),
            Span::raw(course.course.credits.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Overall: ", Style::default().fg(Color::Blue)),
            Span::styled(
                format!("{:.2}% ({})", overall.percentage, overall.letter),
                Style::default().fg(grade_color(overall.percentage)).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    for category in CATEGORIES {
        let grade = report.category_grades.get(&category).copied().unwrap_or_default();
        let count = report.assignment_counts.get(&category).copied().unwrap_or(0);
        let grade_span = if grade.is_graded() {
            Span::styled(
                format!("{:>7.2}%", grade.percentage),
                Style::default().fg(grade_color(grade.percentage)),
            )
        } else {
            Span::raw("       -")
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<8}", category.label()), Style::default().fg(Color::Blue)),
            Span::raw(format!("{:>3}% ", course.weights.get(category))),
            grade_span,
            Span::styled(format!("  ({})", count), Style::default().fg(Color::DarkGray)),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(panel(" Stats ", false)), chunks[0]);

    let gauge = Gauge::default()
        .block(panel(" Overall ", false))
        .gauge_style(Style::default().fg(grade_color(overall.percentage)))
        .ratio(gauge_ratio(overall.percentage))
        .label(format!("{:.1}% {}", overall.percentage, overall.letter));
    f.render_widget(gauge, chunks[1]);
}
