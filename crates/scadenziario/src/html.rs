use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::types::{CalendarView, DueDateEntry};

const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Write the calendar page for `view` to `path`
pub fn generate_html(view: &CalendarView, path: &Path) -> Result<()> {
    let html = render_page(view);
    fs::write(path, html.into_string())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn render_page(view: &CalendarView) -> Markup {
    let last_day = view.last_day();
    let visible: Vec<(&u32, &Vec<DueDateEntry>)> = view
        .due_dates
        .iter()
        .filter(|(day, entries)| **day <= last_day && !entries.is_empty())
        .collect();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Scadenziario - " (view.month_name) " " (view.year) }
                style {
                    (PreEscaped(format!(
                        ":root {{ --primary: {}; --accent: {}; }}",
                        view.primary_color, view.accent_color
                    )))
                    (PreEscaped(CSS))
                }
            }
            body {
                div.container {
                    div.header {
                        button #"prevBtn" type="button" { "<" }
                        h1 #"monthYear" { (view.month_name) " " (view.year) }
                        button #"nextBtn" type="button" { ">" }
                    }
                    div.calendar #"calendar" {
                        @for name in WEEKDAY_NAMES {
                            div.day-header { (name) }
                        }
                        @for week in &view.weeks {
                            @for slot in week {
                                @match slot {
                                    Some(day) => { (render_day_cell(*day, view.entries_for(*day))) },
                                    None => { div.day-cell.empty {} },
                                }
                            }
                        }
                    }
                    div.tasks #"tasksList" {
                        @if visible.is_empty() {
                            p.no-tasks { "No due dates this month." }
                        } @else {
                            @for (day, entries) in &visible {
                                (render_day_tasks(**day, entries))
                            }
                        }
                    }
                    (render_form())
                }
                script { (PreEscaped(JAVASCRIPT)) }
            }
        }
    }
}

fn render_day_cell(day: u32, entries: &[DueDateEntry]) -> Markup {
    html! {
        div.day-cell.has-tasks[!entries.is_empty()] data-day=(day) {
            div.day-number { (day) }
            @if !entries.is_empty() {
                div.task-indicator {
                    @for entry in entries {
                        div class=(entry_class("task-dot", entry, "done")) title=(entry.title) {}
                    }
                }
            }
        }
    }
}

fn render_day_tasks(day: u32, entries: &[DueDateEntry]) -> Markup {
    html! {
        div.day-group {
            div.day-group-header { "Day " (day) }
            @for entry in entries {
                div class=(entry_class("task-item", entry, "completed")) {
                    div.task-title { (entry.title) }
                    @if !entry.description.is_empty() {
                        div.task-description { (entry.description) }
                    }
                    span.task-priority { (entry.priority.as_str().to_uppercase()) }
                }
            }
        }
    }
}

/// CSS classes for an entry: base class, priority, and a marker when completed
fn entry_class(base: &str, entry: &DueDateEntry, completed_class: &str) -> String {
    if entry.completed {
        format!("{} {} {}", base, entry.priority, completed_class)
    } else {
        format!("{} {}", base, entry.priority)
    }
}

fn render_form() -> Markup {
    html! {
        form.task-form #"taskForm" {
            input #"taskDay" type="number" min="1" max="31" placeholder="Day" required;
            input #"taskTitle" type="text" placeholder="Title" required;
            input #"taskDesc" type="text" placeholder="Description";
            select #"taskPriority" {
                option value="low" { "Low" }
                option value="normal" selected { "Normal" }
                option value="high" { "High" }
            }
            button type="submit" { "Add due date" }
        }
    }
}

const CSS: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
    background: #f4f6f8;
    color: #2c3e50;
    min-height: 100vh;
    line-height: 1.4;
}

.container {
    max-width: 900px;
    margin: 0 auto;
    padding: 40px 24px 60px;
}

.header {
    display: flex;
    align-items: center;
    justify-content: space-between;
    margin-bottom: 24px;
}

.header h1 {
    color: var(--primary);
    font-size: 2em;
}

.header button {
    background: var(--primary);
    color: #fff;
    border: none;
    border-radius: 4px;
    font-size: 1.2em;
    padding: 6px 16px;
    cursor: pointer;
}

.calendar {
    display: grid;
    grid-template-columns: repeat(7, 1fr);
    gap: 4px;
    margin-bottom: 32px;
}

.day-header {
    text-align: center;
    font-weight: 700;
    color: var(--primary);
    padding: 8px 0;
}

.day-cell {
    min-height: 72px;
    background: #fff;
    border: 1px solid #e1e5ea;
    border-radius: 4px;
    padding: 6px;
}

.day-cell.empty {
    background: transparent;
    border: none;
}

.day-cell.has-tasks {
    border-color: var(--accent);
}

.day-number {
    font-weight: 700;
}

.task-indicator {
    display: flex;
    flex-wrap: wrap;
    gap: 3px;
    margin-top: 6px;
}

.task-dot {
    width: 8px;
    height: 8px;
    border-radius: 50%;
    background: var(--accent);
}

.task-dot.normal { background: var(--primary); }
.task-dot.low { background: #95a5a6; }
.task-dot.done { opacity: 0.3; }

.day-group {
    margin-bottom: 20px;
}

.day-group-header {
    font-weight: 700;
    color: var(--primary);
    margin-bottom: 8px;
}

.task-item {
    background: #fff;
    border-left: 4px solid var(--primary);
    padding: 10px 14px;
    margin-bottom: 8px;
}

.task-item.high { border-left-color: var(--accent); }
.task-item.low { border-left-color: #95a5a6; }

.task-item.completed {
    opacity: 0.5;
}

.task-item.completed .task-title {
    text-decoration: line-through;
}

.task-title {
    font-weight: 700;
}

.task-description {
    color: #555;
    font-size: 0.95em;
    margin-top: 2px;
}

.task-priority {
    display: inline-block;
    font-size: 0.7em;
    letter-spacing: 0.1em;
    margin-top: 6px;
    color: #777;
}

.no-tasks {
    color: #777;
    text-align: center;
    padding: 20px;
}

.task-form {
    display: flex;
    flex-wrap: wrap;
    gap: 8px;
}

.task-form input, .task-form select {
    padding: 8px;
    border: 1px solid #ccd3da;
    border-radius: 4px;
}

.task-form button {
    background: var(--accent);
    color: #fff;
    border: none;
    border-radius: 4px;
    padding: 8px 16px;
    cursor: pointer;
}
"#;

const JAVASCRIPT: &str = r#"
async function post(url, body) {
    const options = { method: 'POST' };
    if (body !== undefined) {
        options.headers = { 'Content-Type': 'application/json' };
        options.body = JSON.stringify(body);
    }
    const response = await fetch(url, options);
    if (!response.ok) {
        const error = await response.json();
        alert(error.message);
        return false;
    }
    return true;
}

document.getElementById('prevBtn').addEventListener('click', async () => {
    if (await post('/api/prev-month')) location.reload();
});

document.getElementById('nextBtn').addEventListener('click', async () => {
    if (await post('/api/next-month')) location.reload();
});

document.getElementById('taskForm').addEventListener('submit', async (e) => {
    e.preventDefault();
    const added = await post('/api/add-due-date', {
        day: parseInt(document.getElementById('taskDay').value, 10),
        title: document.getElementById('taskTitle').value,
        description: document.getElementById('taskDesc').value,
        priority: document.getElementById('taskPriority').value,
    });
    if (added) location.reload();
});
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MonthCalendar;
    use crate::types::{CalendarConfig, NewDueDate, Priority};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn february_2024() -> MonthCalendar {
        MonthCalendar::with_today(
            CalendarConfig {
                month: Some(2),
                year: Some(2024),
                ..Default::default()
            },
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_render_header_and_weekdays() {
        let page = render_page(&february_2024().to_view_model()).into_string();

        assert!(page.contains("February 2024"));
        for name in WEEKDAY_NAMES {
            assert!(page.contains(name));
        }
        assert!(page.contains("--primary: #3498db; --accent: #e74c3c;"));
    }

    #[test]
    fn test_render_grid_cells() {
        let page = render_page(&february_2024().to_view_model()).into_string();

        // Three leading and three trailing padding slots
        assert_eq!(page.matches("day-cell empty").count(), 6);
        assert!(page.contains(r#"data-day="29""#));
        assert!(!page.contains(r#"data-day="30""#));
    }

    #[test]
    fn test_render_empty_state() {
        let page = render_page(&february_2024().to_view_model()).into_string();
        assert!(page.contains("No due dates this month."));
    }

    #[test]
    fn test_render_tasks() {
        let mut cal = february_2024();
        cal.add_due_date(
            NewDueDate::new(5, "Project Proposal")
                .description("Submit to manager")
                .priority(Priority::High),
        )
        .unwrap();
        cal.add_due_date(NewDueDate::new(5, "Docs").completed(true))
            .unwrap();

        let page = render_page(&cal.to_view_model()).into_string();
        assert!(page.contains("Project Proposal"));
        assert!(page.contains("Submit to manager"));
        assert!(page.contains("task-item high"));
        assert!(page.contains("task-item normal completed"));
        assert!(page.contains("HIGH"));
        assert!(page.contains("day-cell has-tasks"));
        assert!(!page.contains("No due dates this month."));

        let first = page.find("Project Proposal").unwrap();
        let second = page.find("Docs").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_hides_days_past_month_end() {
        let mut cal = february_2024();
        cal.add_due_date(NewDueDate::new(31, "Hidden task")).unwrap();

        let page = render_page(&cal.to_view_model()).into_string();
        assert!(!page.contains("Hidden task"));
    }

    #[test]
    fn test_render_escapes_titles() {
        let mut cal = february_2024();
        cal.add_due_date(NewDueDate::new(1, "<script>alert(1)</script>"))
            .unwrap();

        let page = render_page(&cal.to_view_model()).into_string();
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_generate_html_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.html");

        generate_html(&february_2024().to_view_model(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("February 2024"));
    }

    #[test]
    fn test_generate_html_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("index.html");

        assert!(generate_html(&february_2024().to_view_model(), &path).is_err());
    }
}
