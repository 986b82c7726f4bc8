use anyhow::Result;
use crossterm::event::KeyCode;
use gradedesk_core::{
    filter_assignments, Assignment, AssignmentStatus, Category, CourseReport,
    SemesterCourseRepository, SemesterCourseService,
};
use ratatui::widgets::TableState;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Courses,
    Assignments,
}

pub struct App<R: SemesterCourseRepository> {
    service: SemesterCourseService<R>,
    pub reports: Vec<CourseReport>,
    pub course_state: TableState,
    pub assignment_state: TableState,
    pub category: Category,
    pub focus: Focus,
    pub message: Option<String>,
}

impl<R: SemesterCourseRepository> App<R> {
    pub fn new(service: SemesterCourseService<R>) -> Result<Self> {
        let reports = service.course_reports()?;
        let mut course_state = TableState::default();
        if !reports.is_empty() {
            course_state.select(Some(0));
        }

        let mut app = App {
            service,
            reports,
            course_state,
            assignment_state: TableState::default(),
            category: Category::default(),
            focus: Focus::Courses,
            message: None,
        };
        app.reset_assignment_selection();
        Ok(app)
    }

    /// Handles one key press. Returns `true` when the dashboard should close.
    pub fn on_key(&mut self, code: KeyCode) -> bool {
        self.message = None;
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.next_category(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => self.previous_category(),
            KeyCode::Enter => self.select_course(),
            KeyCode::Esc => self.focus = Focus::Courses,
            KeyCode::Char('s') => self.cycle_status(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_assignment(),
            _ => {}
        }
        false
    }

    pub fn selected_report(&self) -> Option<&CourseReport> {
        self.course_state.selected().and_then(|i| self.reports.get(i))
    }

    /// Assignments of the current category in the selected course, soonest due first.
    pub fn visible_assignments(&self) -> Vec<&Assignment> {
        let mut assignments = match self.selected_report() {
            Some(report) => filter_assignments(&report.course.assignments, Some(self.category), ""),
            None => Vec::new(),
        };
        assignments.sort_by_key(|a| a.due_date);
        assignments
    }

    pub fn selected_assignment(&self) -> Option<&Assignment> {
        let index = self.assignment_state.selected()?;
        self.visible_assignments().get(index).copied()
    }

    pub fn next(&mut self) {
        match self.focus {
            Focus::Courses => {
                step(&mut self.course_state, self.reports.len(), true);
                self.reset_assignment_selection();
            }
            Focus::Assignments => {
                let len = self.visible_assignments().len();
                step(&mut self.assignment_state, len, true);
            }
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            Focus::Courses => {
                step(&mut self.course_state, self.reports.len(), false);
                self.reset_assignment_selection();
            }
            Focus::Assignments => {
                let len = self.visible_assignments().len();
                step(&mut self.assignment_state, len, false);
            }
        }
    }

    pub fn next_category(&mut self) {
        self.category = self.category.next();
        self.reset_assignment_selection();
    }

    pub fn previous_category(&mut self) {
        self.category = self.category.previous();
        self.reset_assignment_selection();
    }

    pub fn select_course(&mut self) {
        if self.selected_report().is_some() {
            self.focus = Focus::Assignments;
            self.reset_assignment_selection();
        }
    }

    pub fn cycle_status(&mut self) {
        let Some((course_id, assignment_id, status)) = self.selected_ids() else {
            return;
        };
        match self.service.set_status(&course_id, &assignment_id, status.cycle()) {
            Ok(updated) => {
                self.message = Some(format!("{} is now {}", updated.name, updated.status.label()));
            }
            Err(e) => self.report_error(e),
        }
        self.reload();
    }

    pub fn delete_assignment(&mut self) {
        let Some((course_id, assignment_id, _)) = self.selected_ids() else {
            return;
        };
        match self.service.delete_assignment(&course_id, &assignment_id) {
            Ok(()) => self.message = Some("Assignment deleted".to_string()),
            Err(e) => self.report_error(e),
        }
        self.reload();
    }

    fn selected_ids(&self) -> Option<(Uuid, Uuid, AssignmentStatus)> {
        if self.focus != Focus::Assignments {
            return None;
        }
        let course_id = self.selected_report()?.course.id;
        let assignment = self.selected_assignment()?;
        Some((course_id, assignment.id, assignment.status))
    }

    fn reload(&mut self) {
        match self.service.course_reports() {
            Ok(reports) => self.reports = reports,
            Err(e) => self.report_error(e),
        }
        clamp(&mut self.course_state, self.reports.len());
        let len = self.visible_assignments().len();
        clamp(&mut self.assignment_state, len);
    }

    fn reset_assignment_selection(&mut self) {
        let selected = if self.visible_assignments().is_empty() { None } else { Some(0) };
        self.assignment_state.select(selected);
    }

    fn report_error(&mut self, e: anyhow::Error) {
        warn!("{:#}", e);
        self.message = Some(format!("Error: {}", e));
    }
}

/// Moves the selection one row, wrapping at both ends.
fn step(state: &mut TableState, len: usize, forward: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => (i + 1) % len,
        Some(0) => len - 1,
        Some(i) => (i - 1).min(len - 1),
        None => 0,
    };
    state.select(Some(i));
}

fn clamp(state: &mut TableState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(i) if i >= len => state.select(Some(len - 1)),
        None => state.select(Some(0)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradedesk_core::{CategoryWeights, CourseInfo, FileSemesterCourseRepository};
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn app_with_courses() -> (App<FileSemesterCourseRepository>, PathBuf) {
        let dir = env::temp_dir().join(format!("gradedesk-tui-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let service = SemesterCourseService::new(FileSemesterCourseRepository::new(&dir).unwrap());

        let course = service
            .create_course(CourseInfo::new("Compilers".to_string(), 3), CategoryWeights::default())
            .unwrap();
        for (name, category) in [("Lexer", Category::Homework), ("Parser", Category::Homework), ("Quiz 1", Category::Quiz)] {
            service.add_assignment(&course.id, Assignment::new(name.to_string(), category)).unwrap();
        }
        service
            .create_course(CourseInfo::new("Databases".to_string(), 4), CategoryWeights::default())
            .unwrap();

        (App::new(service).unwrap(), dir)
    }

    #[test]
    fn test_step_wraps() {
        let mut state = TableState::default();
        step(&mut state, 3, false);
        assert_eq!(state.selected(), Some(0));
        step(&mut state, 3, false);
        assert_eq!(state.selected(), Some(2));
        step(&mut state, 3, true);
        assert_eq!(state.selected(), Some(0));
        step(&mut state, 0, true);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_navigation_and_category_tabs() {
        let (mut app, dir) = app_with_courses();
        assert_eq!(app.selected_report().unwrap().course.course.name, "Compilers");
        assert_eq!(app.visible_assignments().len(), 2);

        app.on_key(KeyCode::Char('l'));
        assert_eq!(app.category, Category::Quiz);
        assert_eq!(app.visible_assignments().len(), 1);

        app.on_key(KeyCode::Char('j'));
        assert_eq!(app.selected_report().unwrap().course.course.name, "Databases");
        assert!(app.visible_assignments().is_empty());
        assert_eq!(app.assignment_state.selected(), None);

        assert!(app.on_key(KeyCode::Char('q')));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_status_cycle_and_delete_need_assignment_focus() {
        let (mut app, dir) = app_with_courses();

        // Course list focus leaves assignments alone
        app.on_key(KeyCode::Char('d'));
        assert_eq!(app.reports[0].course.assignments.len(), 3);

        app.on_key(KeyCode::Enter);
        assert_eq!(app.focus, Focus::Assignments);

        app.on_key(KeyCode::Char('s'));
        let first = app.selected_assignment().unwrap();
        assert_eq!(first.status, AssignmentStatus::Started);

        app.on_key(KeyCode::Char('j'));
        app.on_key(KeyCode::Char('d'));
        assert_eq!(app.reports[0].course.assignments.len(), 2);
        assert_eq!(app.visible_assignments().len(), 1);
        assert_eq!(app.assignment_state.selected(), Some(0));

        app.on_key(KeyCode::Esc);
        assert_eq!(app.focus, Focus::Courses);
        fs::remove_dir_all(&dir).ok();
    }
}
