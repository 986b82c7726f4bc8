use chrono::{Local, NaiveDate};
use gradedesk_core::time::days_until;
use gradedesk_core::usecase::degree_progress::DegreeProgress;
use gradedesk_core::usecase::semester_stats::SemesterStats;
use gradedesk_core::{Assignment, CategoryWeights, CourseReport, Profile, CATEGORIES};
use tabled::settings::object::{Cell, Rows};
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 32;

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Course")]
    name: String,
    #[tabled(rename = "Credits")]
    credits: u32,
    #[tabled(rename = "Grade")]
    grade: String,
    #[tabled(rename = "Letter")]
    letter: String,
    #[tabled(rename = "Assignments")]
    assignments: usize,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Earned")]
    earned: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Grade")]
    grade: String,
    #[tabled(rename = "Count")]
    count: usize,
}

#[derive(Tabled)]
struct AssignmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Cat")]
    category: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct StandingRow {
    #[tabled(rename = "Course")]
    name: String,
    #[tabled(rename = "Credits")]
    credits: u32,
    #[tabled(rename = "Grade")]
    grade: String,
    #[tabled(rename = "Letter")]
    letter: String,
    #[tabled(rename = "Points")]
    points: String,
}

#[derive(Tabled)]
struct TranscriptRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Course")]
    name: String,
    #[tabled(rename = "Credits")]
    credits: f64,
    #[tabled(rename = "Grade")]
    grade: String,
    #[tabled(rename = "Points")]
    points: String,
}

/// Foreground colour for a percentage band.
pub fn grade_color(percentage: f64) -> Color {
    if percentage >= 90.0 {
        Color::FG_GREEN
    } else if percentage >= 80.0 {
        Color::FG_BRIGHT_GREEN
    } else if percentage >= 70.0 {
        Color::FG_YELLOW
    } else if percentage >= 60.0 {
        Color::FG_MAGENTA
    } else {
        Color::FG_RED
    }
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

pub fn format_weights(weights: &CategoryWeights) -> String {
    CATEGORIES
        .iter()
        .map(|c| format!("{} {}%", c.label(), weights.get(*c)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_score(assignment: &Assignment) -> String {
    match assignment.grade {
        Some(grade) if assignment.points > 0.0 => format!(
            "{}/{} ({:.1}%)",
            grade,
            assignment.points,
            grade / assignment.points * 100.0
        ),
        Some(grade) => format!("{}/{}", grade, assignment.points),
        None => format!("-/{}", assignment.points),
    }
}

pub fn due_label(due: NaiveDate, today: NaiveDate) -> String {
    let days = days_until(due, today);
    let relative = match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        d if d < 0 => format!("{}d ago", -d),
        d => format!("in {}d", d),
    };
    format!("{} ({})", due.format("%Y-%m-%d"), relative)
}

/// Builds a table in the shared style. `highlights` colours single cells,
/// addressed by data row (header excluded) and column.
fn render<T: Tabled>(rows: Vec<T>, highlights: Vec<(usize, usize, Color)>) -> Table {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));

    for (row, col, color) in highlights {
        table.with(Modify::new(Cell::new(row + 1, col)).with(color));
    }
    table
}

fn heading(text: &str) {
    println!("\n\x1b[1;36m{}\x1b[0m", text);
}

pub fn print_course_list(reports: &[CourseReport]) {
    if reports.is_empty() {
        println!("No courses found. Add one with `gradedesk course add <name> credits:3`.");
        return;
    }

    let mut highlights = Vec::new();
    let rows: Vec<CourseRow> = reports
        .iter()
        .enumerate()
        .map(|(i, report)| {
            let graded = report.has_grades();
            if graded {
                highlights.push((i, 3, grade_color(report.overall.percentage)));
                highlights.push((i, 4, grade_color(report.overall.percentage)));
            }
            CourseRow {
                id: report.course.short_id(),
                name: truncate(&report.course.course.display_name(), NAME_WIDTH),
                credits: report.course.course.credits,
                grade: if graded {
                    format!("{:.2}%", report.overall.percentage)
                } else {
                    "-".to_string()
                },
                letter: report.overall.letter.to_string(),
                assignments: report.course.assignments.len(),
            }
        })
        .collect();

    println!("{}", render(rows, highlights));
}

pub fn print_course_detail(report: &CourseReport) {
    let course = &report.course;
    heading(&course.course.display_name());
    println!("ID: {}", course.id);
    println!("Credits: {}", course.course.credits);
    if let Some(desc) = &course.course.description {
        println!("Description: {}", desc);
    }
    println!("Weights: {}", format_weights(&course.weights));
    println!(
        "Overall: {:.2}% ({})",
        report.overall.percentage, report.overall.letter
    );

    let mut highlights = Vec::new();
    let rows: Vec<CategoryRow> = CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let grade = report.category_grades.get(category).copied().unwrap_or_default();
            if grade.is_graded() {
                highlights.push((i, 4, grade_color(grade.percentage)));
            }
            CategoryRow {
                category: category.title().to_string(),
                weight: format!("{}%", course.weights.get(*category)),
                earned: format!("{}", grade.earned),
                total: format!("{}", grade.total),
                grade: if grade.is_graded() {
                    format!("{:.2}%", grade.percentage)
                } else {
                    "-".to_string()
                },
                count: report.assignment_counts.get(category).copied().unwrap_or(0),
            }
        })
        .collect();
    println!("{}", render(rows, highlights));

    if !course.assignments.is_empty() {
        let assignments: Vec<&Assignment> = course.assignments.iter().collect();
        print_assignments(&assignments);
    }
}

pub fn print_assignments(assignments: &[&Assignment]) {
    if assignments.is_empty() {
        println!("No assignments found.");
        return;
    }

    let today = Local::now().date_naive();
    let mut sorted = assignments.to_vec();
    sorted.sort_by_key(|a| (a.due_date, a.category));

    let mut highlights = Vec::new();
    let rows: Vec<AssignmentRow> = sorted
        .iter()
        .enumerate()
        .map(|(i, a)| {
            if let Some(grade) = a.grade {
                if a.points > 0.0 {
                    highlights.push((i, 3, grade_color(grade / a.points * 100.0)));
                }
            }
            AssignmentRow {
                id: a.short_id(),
                category: a.category.label().to_string(),
                name: truncate(&a.name, NAME_WIDTH),
                score: format_score(a),
                due: due_label(a.due_date, today),
                status: a.status.label().to_string(),
            }
        })
        .collect();

    println!("{}", render(rows, highlights));
}

pub fn print_semester(stats: &SemesterStats) {
    if stats.courses.is_empty() {
        println!("No courses this semester.");
        return;
    }

    let mut highlights = Vec::new();
    let rows: Vec<StandingRow> = stats
        .courses
        .iter()
        .enumerate()
        .map(|(i, c)| {
            highlights.push((i, 2, grade_color(c.percentage)));
            StandingRow {
                name: truncate(&c.name, NAME_WIDTH),
                credits: c.credits,
                grade: format!("{:.2}%", c.percentage),
                letter: c.letter.to_string(),
                points: format!("{:.1}", c.grade_point),
            }
        })
        .collect();

    println!("{}", render(rows, highlights));
    println!("Semester GPA: {:.2} over {} credits", stats.gpa, stats.total_credits);
}

pub fn print_transcript(profile: &Profile) {
    let courses = &profile.transcript.courses;
    if courses.is_empty() {
        println!("Transcript is empty. Add a course with `gradedesk transcript add <name> grade:A credits:3`.");
        return;
    }

    let rows: Vec<TranscriptRow> = courses
        .iter()
        .map(|c| TranscriptRow {
            id: c.short_id(),
            name: truncate(&c.name, NAME_WIDTH),
            credits: c.credits,
            grade: c.grade.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string()),
            points: c
                .grade
                .and_then(|g| g.grade_points())
                .map(|p| format!("{:.1}", p))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", render(rows, Vec::new()));
    println!(
        "Cumulative GPA: {:.2} | Credits completed: {}",
        profile.gpa, profile.credits_completed
    );
}

pub fn print_profile(profile: &Profile) {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let name = profile.full_name();

    heading(if name.is_empty() { "Student" } else { &name });
    println!("Email:     {}", or_dash(&profile.email));
    println!("Major:     {}", or_dash(&profile.major));
    println!("Emphasis:  {}", or_dash(&profile.emphasis));
    println!("Semester:  {}", profile.current_semester);
    println!("GPA:       {:.2}", profile.gpa);
    println!("Credits:   {}", profile.credits_completed);
}

pub fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn print_progress(progress: &DegreeProgress) {
    heading("Degree progress");
    if !progress.student.is_empty() {
        println!("Student:   {}", progress.student);
    }
    if let Some(major) = &progress.major {
        match &progress.emphasis {
            Some(emphasis) => println!("Major:     {} ({})", major, emphasis),
            None => println!("Major:     {}", major),
        }
    }
    println!("Semester:  {}", progress.current_semester);
    println!("GPA:       {:.2}", progress.gpa);
    println!(
        "Credits:   {} completed, {} remaining",
        progress.credits_completed, progress.credits_remaining
    );
    println!("{} {}%", progress_bar(progress.progress_percent, 30), progress.progress_percent);

    heading("Recommendations");
    for recommendation in &progress.recommendations {
        println!("  - {}", recommendation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_by_display_width() {
        assert_eq!(truncate("Algorithms", 10), "Algorithms");
        assert_eq!(truncate("Operating Systems", 10), "Operating…");
        assert_eq!(truncate("日本語の課題", 7), "日本語…");
    }

    #[test]
    fn test_format_score() {
        let mut a = Assignment::new("Lab".to_string(), Default::default());
        assert_eq!(format_score(&a), "-/100");
        a.grade = Some(45.0);
        a.points = 50.0;
        assert_eq!(format_score(&a), "45/50 (90.0%)");
        a.points = 0.0;
        assert_eq!(format_score(&a), "45/0");
    }

    #[test]
    fn test_due_label() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let due = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        assert_eq!(due_label(due(15), today), "2025-01-15 (today)");
        assert_eq!(due_label(due(16), today), "2025-01-16 (tomorrow)");
        assert_eq!(due_label(due(20), today), "2025-01-20 (in 5d)");
        assert_eq!(due_label(due(13), today), "2025-01-13 (2d ago)");
    }

    #[test]
    fn test_format_weights_and_progress_bar() {
        assert_eq!(
            format_weights(&CategoryWeights::default()),
            "HW 25%, Quiz 15%, Midterm 30%, Final 30%"
        );
        assert_eq!(progress_bar(50, 10), "[#####-----]");
        assert_eq!(progress_bar(130, 4), "[####]");
    }
}
