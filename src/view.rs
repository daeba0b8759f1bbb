use std::fmt::Write;

use crate::models::{Course, CourseInstance};
use crate::state::FormState;

/// Semesters offered by the instance-listing picker. Display only: free-text
/// semesters are still accepted when adding an instance.
pub const SEMESTER_OPTIONS: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];

pub fn render_courses(courses: &[Course]) -> String {
    let rows = courses
        .iter()
        .map(|c| vec![c.title.clone(), c.code.clone(), c.id.to_string()])
        .collect::<Vec<_>>();
    render_table(&["Course Title", "Code", "Id"], &rows)
}

pub fn render_instances(instances: &[CourseInstance]) -> String {
    let rows = instances
        .iter()
        .map(|i| {
            vec![
                i.course.title.clone(),
                i.term_label(),
                i.course.code.clone(),
                i.id.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&["Course Title", "Year-Sem", "Code", "Id"], &rows)
}

pub fn render_form(state: &FormState) -> String {
    let selected = state
        .selected_course()
        .and_then(|s| s.resolve().ok())
        .map(|c| format!("{} ({})", c.title, c.code))
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "Course title:       {}", state.course_title());
    let _ = writeln!(out, "Course code:        {}", state.course_code());
    let _ = writeln!(out, "Course description: {}", state.course_description());
    let _ = writeln!(out, "Selected course:    {}", selected);
    let _ = writeln!(out, "Year:               {}", state.year());
    let _ = writeln!(out, "Semester:           {}", state.semester());
    out
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
