use crate::application::{App, AppMode, FormFocus, ListView, MutationKind, TeacherCard, TeacherForm};
use crate::domain::Subject;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Height of one teacher card, borders included.
pub const CARD_HEIGHT: u16 = 5;
/// Cards per grid row.
pub const GRID_COLUMNS: usize = 2;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_list(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if let Some(dialog) = app.create_dialog_view() {
        if dialog.is_open {
            let title = if dialog.is_submitting { "Create teacher (saving...)" } else { "Create teacher" };
            render_form_popup(f, title, &app.create_dialog.form, dialog.subjects, dialog.is_submitting);
        }
    }

    match &app.mode {
        AppMode::Editing(edit) => {
            let title = format!("Edit {}", edit.teacher.name);
            render_form_popup(f, &title, &edit.form, app.queries.subjects().data(), false);
        }
        AppMode::ConfirmDelete { name, .. } => render_confirm_popup(f, name),
        AppMode::Help => render_help_popup(f),
        AppMode::Browsing => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let trigger_style = if app.create_trigger_disabled() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled("Teachers", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled(" n: Create teacher + ", trigger_style),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

/// Index of the first grid row to draw so that `selected` stays visible.
pub fn first_visible_row(selected: usize, visible_rows: usize) -> usize {
    let selected_row = selected / GRID_COLUMNS;
    selected_row.saturating_sub(visible_rows.saturating_sub(1))
}

fn card_areas(area: Rect, count: usize, first_row: usize) -> Vec<(usize, Rect)> {
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let column_width = area.width / GRID_COLUMNS as u16;

    (first_row * GRID_COLUMNS..count)
        .take(visible_rows * GRID_COLUMNS)
        .map(|index| {
            let row = (index / GRID_COLUMNS - first_row) as u16;
            let col = (index % GRID_COLUMNS) as u16;
            let rect = Rect {
                x: area.x + col * column_width,
                y: area.y + row * CARD_HEIGHT,
                width: column_width,
                height: CARD_HEIGHT.min(area.height.saturating_sub(row * CARD_HEIGHT)),
            };
            (index, rect)
        })
        .collect()
}

/// Grid for loading placeholders. Rows shrink so every placeholder is drawn
/// even when the list area is shorter than the full grid.
fn skeleton_areas(area: Rect, count: usize) -> Vec<Rect> {
    let rows = count.div_ceil(GRID_COLUMNS).max(1) as u16;
    let row_height = (area.height / rows).clamp(1, CARD_HEIGHT);
    let column_width = area.width / GRID_COLUMNS as u16;

    (0..count)
        .map(|index| {
            let row = (index / GRID_COLUMNS) as u16;
            let col = (index % GRID_COLUMNS) as u16;
            Rect {
                x: area.x + col * column_width,
                y: area.y + row * row_height,
                width: column_width,
                height: row_height,
            }
            .intersection(area)
        })
        .collect()
}

fn render_list(f: &mut Frame, app: &App, area: Rect) {
    match app.list_view() {
        ListView::Loading { placeholders } => {
            for rect in skeleton_areas(area, placeholders) {
                render_skeleton(f, rect);
            }
        }
        ListView::Failed(failure) => {
            let notice = Paragraph::new(vec![
                Line::from(format!("Could not load {}: {}", failure.key, failure.cause.user_message())),
                Line::from("Press r to try again."),
            ])
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title("Error"))
            .wrap(Wrap { trim: true });
            f.render_widget(notice, Rect { height: area.height.min(4), ..area });
        }
        ListView::Empty => {
            let notice = Paragraph::new("No teachers yet")
                .style(Style::default().fg(Color::LightBlue))
                .block(Block::default().borders(Borders::ALL).title("Info"));
            f.render_widget(notice, Rect { height: area.height.min(3), ..area });
        }
        ListView::Populated(cards) => {
            let selected = app.selected.min(cards.len().saturating_sub(1));
            let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
            let first_row = first_visible_row(selected, visible_rows);
            for (index, rect) in card_areas(area, cards.len(), first_row) {
                render_card(f, &cards[index], index == selected, rect);
            }
        }
    }
}

fn render_skeleton(f: &mut Frame, area: Rect) {
    let filler = "░".repeat(area.width.saturating_sub(6) as usize);
    let short = "░".repeat(area.width.saturating_sub(6) as usize / 2);
    let skeleton = Paragraph::new(vec![Line::from(filler), Line::from(short)])
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(skeleton, area);
}

fn render_card(f: &mut Frame, card: &TeacherCard<'_>, selected: bool, area: Rect) {
    let subjects = card.subject_names();
    let subjects_line = if subjects.is_empty() {
        Span::styled("No subjects", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(subjects.join(", "))
    };

    let border = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let body = Paragraph::new(vec![
        Line::from(Span::styled(card.teacher.name.clone(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(subjects_line),
        Line::from(Span::styled(format!("#{}", card.id()), Style::default().fg(Color::DarkGray))),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(border));
    f.render_widget(body, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    const FORM_HINT: &str = "Enter: save | Tab: switch field | Space: toggle subject | Esc: cancel";

    // A pending status message (e.g. a rejected create) wins over key hints.
    let text = match (&app.mode, &app.status_message) {
        (AppMode::Editing(_), _) => FORM_HINT.to_string(),
        (AppMode::ConfirmDelete { .. }, _) => "y: delete | n/Esc: keep".to_string(),
        (AppMode::Help, _) => "Esc/q/?: close help".to_string(),
        (AppMode::Browsing, Some(message)) => message.clone(),
        (AppMode::Browsing, None) if app.create_dialog.is_open() => FORM_HINT.to_string(),
        (AppMode::Browsing, None) => "n: new | e: edit | d: delete | r: refresh | ?: help | q: quit".to_string(),
    };

    let style = if app.mutations.status(MutationKind::Create).is_failed()
        || app.mutations.status(MutationKind::Update).is_failed()
        || app.mutations.status(MutationKind::Delete).is_failed()
    {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

/// Centers a popup of the given percentage size inside `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent_y) / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_form_popup(
    f: &mut Frame,
    title: &str,
    form: &TeacherForm,
    subjects: Option<&[Subject]>,
    submitting: bool,
) {
    let popup = centered_rect(60, 70, f.area());
    f.render_widget(Clear, popup);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .style(Style::default().fg(Color::White));
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let focused = |focus: FormFocus| {
        if form.focus == focus && !submitting {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    let name = Paragraph::new(form.name.clone())
        .block(Block::default().borders(Borders::ALL).title("Name").border_style(focused(FormFocus::Name)));
    f.render_widget(name, chunks[0]);

    if form.focus == FormFocus::Name && !submitting {
        let x = chunks[0].x + 1 + form.cursor() as u16;
        f.set_cursor_position((x.min(chunks[0].right().saturating_sub(2)), chunks[0].y + 1));
    }

    let lines: Vec<Line> = match subjects {
        Some([]) => vec![Line::from("No subjects available")],
        Some(subjects) => subjects
            .iter()
            .enumerate()
            .map(|(i, subject)| {
                let mark = if form.is_selected(&subject.id) { "[x]" } else { "[ ]" };
                let style = if form.focus == FormFocus::Subjects && i == form.subject_cursor {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(format!("{} {}", mark, subject.name), style))
            })
            .collect(),
        None => vec![Line::from(Span::styled(
            "Subjects could not be loaded",
            Style::default().fg(Color::Red),
        ))],
    };

    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Subjects")
            .border_style(focused(FormFocus::Subjects)),
    );
    f.render_widget(list, chunks[1]);
}

fn render_confirm_popup(f: &mut Frame, name: &str) {
    let area = f.area();
    let popup = Rect {
        height: 5u16.min(area.height),
        ..centered_rect(50, 20, area)
    };
    f.render_widget(Clear, popup);

    let body = Paragraph::new(vec![
        Line::from(format!("Delete teacher \"{}\"?", name)),
        Line::from("y: delete   n: keep"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Confirm").style(Style::default().fg(Color::Red)));
    f.render_widget(body, popup);
}

fn render_help_popup(f: &mut Frame) {
    let popup = centered_rect(60, 60, f.area());
    f.render_widget(Clear, popup);

    let help = Paragraph::new(get_help_text())
        .block(Block::default().borders(Borders::ALL).title("Help").style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    f.render_widget(help, popup);
}

fn get_help_text() -> &'static str {
    r#"=== LIST ===
Arrow keys / hjkl   Move between teacher cards
n                   Create a teacher (needs subjects loaded)
e / Enter           Edit the selected teacher
d                   Delete the selected teacher (asks first)
r                   Reload teachers and subjects
q                   Quit

=== DIALOGS ===
Tab                 Switch between name and subjects
Up / Down           Move in the subjects checklist
Space               Toggle the highlighted subject
Enter               Save
Esc                 Close without saving

Changes are sent to the server first; the list reloads once the
server has accepted them."#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_visible_row_keeps_selection_in_view() {
        assert_eq!(first_visible_row(0, 3), 0);
        assert_eq!(first_visible_row(5, 3), 0);
        assert_eq!(first_visible_row(6, 3), 1);
        assert_eq!(first_visible_row(9, 2), 3);
        assert_eq!(first_visible_row(9, 0), 4);
    }

    #[test]
    fn test_card_areas_fill_two_columns() {
        let area = Rect::new(0, 0, 80, 15);
        let areas = card_areas(area, 6, 0);
        assert_eq!(areas.len(), 6);
        assert_eq!(areas[1].1, Rect::new(40, 0, 40, CARD_HEIGHT));
        assert_eq!(areas[4].1, Rect::new(0, 10, 40, CARD_HEIGHT));
    }

    #[test]
    fn test_card_areas_respect_scroll() {
        let area = Rect::new(0, 0, 80, 10);
        let areas = card_areas(area, 7, 2);
        let indices: Vec<_> = areas.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![4, 5, 6]);
        assert_eq!(areas[0].1.y, 0);
    }

    #[test]
    fn test_skeletons_all_drawn_in_short_area() {
        let area = Rect::new(0, 2, 80, 9);
        let areas = skeleton_areas(area, 6);
        assert_eq!(areas.len(), 6);
        assert!(areas.iter().all(|rect| rect.height == 3));
        assert_eq!(areas[5], Rect::new(40, 8, 40, 3));

        let tall = skeleton_areas(Rect::new(0, 0, 80, 40), 6);
        assert!(tall.iter().all(|rect| rect.height == CARD_HEIGHT));
    }

    #[test]
    fn test_centered_rect() {
        let popup = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(popup, Rect::new(25, 10, 50, 20));
    }
}
