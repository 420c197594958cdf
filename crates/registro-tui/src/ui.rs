//! Rendering routines for the Registro TUI.

use crate::app::{App, DraftField, Focus};
use crate::outcome::OperationKind;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

const PRIMARY: Color = Color::Rgb(236, 91, 43);
const SECONDARY: Color = Color::Rgb(238, 121, 72);
const TEXT: Color = Color::Rgb(238, 238, 238);
const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);
const BORDER: Color = Color::Rgb(60, 60, 60);
const BORDER_ACTIVE: Color = Color::Rgb(238, 121, 72);
const YELLOW: Color = Color::Rgb(229, 192, 123);
const SUCCESS: Color = Color::Rgb(120, 220, 140);
const ERROR: Color = Color::Rgb(255, 110, 110);

const HEADER_HEIGHT: u16 = 4;
const SEARCH_HEIGHT: u16 = 3;
// 5 fields + 2 border lines
const FORM_HEIGHT: u16 = 7;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let outcome_height = app.outcomes().len() as u16;
    let form_height = if app.show_form { FORM_HEIGHT } else { 0 };

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),  // header
            Constraint::Length(outcome_height), // outcome alerts
            Constraint::Length(SEARCH_HEIGHT),  // search inputs
            Constraint::Length(form_height),    // create form
            Constraint::Min(0),                 // record list
            Constraint::Length(1),              // status bar
        ])
        .split(area);

    draw_header(frame, app, root[0]);
    draw_outcomes(frame, app, root[1]);
    draw_search(frame, app, root[2]);
    if app.show_form {
        draw_form(frame, app, root[3]);
    }
    draw_records(frame, app, root[4]);
    draw_status_bar(frame, app, root[5]);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER));
    let lines = vec![
        Line::from(vec![
            Span::styled(
                " 📋 Registro Nacional",
                Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  v{VERSION}"), Style::default().fg(TEXT_MUTED)),
        ]),
        Line::from(vec![
            Span::styled("  backend ", Style::default().fg(TEXT_MUTED)),
            Span::styled(app.backend.as_str(), Style::default().fg(TEXT)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One line per settled operation, each colored by its own result.
fn draw_outcomes(frame: &mut Frame<'_>, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let lines: Vec<Line<'_>> = app
        .outcomes()
        .iter()
        .map(|outcome| {
            let color = if outcome.success { SUCCESS } else { ERROR };
            Line::from(Span::styled(
                format!(" {}", outcome.render()),
                Style::default().fg(color),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_search(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_input(
        frame,
        cols[0],
        " 🔍 Buscar por nombre ",
        &app.filter.nombre,
        app.focus == Focus::SearchNombre,
    );
    draw_input(
        frame,
        cols[1],
        " 🔍 Buscar por ciudad ",
        &app.filter.ciudad,
        app.focus == Focus::SearchCiudad,
    );
}

/// Draw a single-line input box, placing the cursor when focused.
fn draw_input(frame: &mut Frame<'_>, area: Rect, title: &str, value: &str, focused: bool) {
    let border_color = if focused { BORDER_ACTIVE } else { BORDER };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(if focused { SECONDARY } else { TEXT_MUTED }),
        ));
    let inner = block.inner(area);
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {value}"),
        Style::default().fg(TEXT),
    )));
    frame.render_widget(block, area);
    frame.render_widget(paragraph, inner);

    if focused {
        let width = value.chars().count() as u16;
        frame.set_cursor_position((inner.x + 1 + width, inner.y));
    }
}

fn draw_form(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let saving = app.is_pending(OperationKind::Create);
    let title = if saving {
        " ⏳ Guardando... "
    } else {
        " ➕ Agregar Persona (Enter guardar, Esc cancelar) "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(PRIMARY))
        .title(Span::styled(
            title,
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);

    let label_width = DraftField::ALL
        .iter()
        .map(|field| field.label().chars().count())
        .max()
        .unwrap_or(0);
    let mut lines = Vec::with_capacity(DraftField::ALL.len());
    let mut cursor = None;
    for (row, field) in DraftField::ALL.iter().enumerate() {
        let focused = app.focus == Focus::Form(*field);
        let label_style = if focused {
            Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_MUTED)
        };
        let value = app.draft_field(*field);
        let label = format!(" {:<label_width$} ", field.label());
        if focused {
            let x = inner.x + (label.chars().count() + value.chars().count()) as u16;
            cursor = Some((x, inner.y + row as u16));
        }
        lines.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(value.to_string(), Style::default().fg(TEXT)),
        ]));
    }

    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(lines), inner);
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

/// Draw the record list with border and scrollbar.
fn draw_records(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let lines = app.render_lines();
    let border_color = if app.focus == Focus::Records {
        BORDER_ACTIVE
    } else {
        BORDER
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            format!(" Personas ({}) ", app.records.len()),
            Style::default().fg(TEXT_MUTED),
        ));

    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1);
    let content_height = inner.height as usize;

    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);
    let max_scroll = total_lines.saturating_sub(content_height) as u16;
    app.update_scroll_bounds(max_scroll);
    let scroll = app.scroll;

    let list_inner = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };
    let list = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(block, area);
    frame.render_widget(list, list_inner);

    if total_lines > content_height {
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines)
            .position(scroll as usize)
            .viewport_content_length(content_height);
        let scrollbar_area = Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: inner.height,
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(BORDER))
                .thumb_style(Style::default().fg(TEXT_MUTED)),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

/// Draw the status bar at the bottom.
fn draw_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let form_hint = if app.show_form { " cancelar" } else { " agregar" };
    let shortcuts = vec![
        Span::styled(" Ctrl+C", Style::default().fg(TEXT_MUTED)),
        Span::styled(" salir", Style::default().fg(BORDER)),
        Span::styled("  Enter", Style::default().fg(TEXT_MUTED)),
        Span::styled(" buscar", Style::default().fg(BORDER)),
        Span::styled("  Ctrl+R", Style::default().fg(TEXT_MUTED)),
        Span::styled(" recargar", Style::default().fg(BORDER)),
        Span::styled("  Ctrl+N", Style::default().fg(TEXT_MUTED)),
        Span::styled(form_hint, Style::default().fg(BORDER)),
        Span::styled("  Ctrl+E", Style::default().fg(TEXT_MUTED)),
        Span::styled(" excel", Style::default().fg(BORDER)),
        Span::styled("  Tab", Style::default().fg(TEXT_MUTED)),
        Span::styled(" campo", Style::default().fg(BORDER)),
    ];

    let (right_text, status_color) = if app.is_pending(OperationKind::Export) {
        (" ⏳ Descargando... ".to_string(), YELLOW)
    } else if app.is_loading() {
        (" ⏳ Cargando... ".to_string(), YELLOW)
    } else if let Some(outcome) = app.latest_outcome() {
        let color = if outcome.success { SUCCESS } else { ERROR };
        (format!(" {} ", outcome.render()), color)
    } else {
        (" idle ".to_string(), TEXT_MUTED)
    };

    let right_len = right_text.chars().count() as u16;
    let left_area = Rect {
        width: area.width.saturating_sub(right_len),
        ..area
    };
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_len),
        width: right_len.min(area.width),
        ..area
    };

    frame.render_widget(Paragraph::new(Line::from(shortcuts)), left_area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right_text,
            Style::default().fg(status_color),
        ))),
        right_area,
    );
}

#[cfg(test)]
mod tests {
    use super::draw;
    use crate::app::App;
    use crate::event::{Completion, CompletionResult};
    use crate::test_support::persona;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let mut app = App::new();
        assert!(screen(&mut app).contains("No hay personas registradas"));
    }

    #[test]
    fn records_and_outcomes_are_rendered() {
        let mut app = App::new();
        let request = app.request_load();
        app.apply(Completion {
            ticket: request.ticket(),
            result: CompletionResult::Records(Ok(vec![persona(1, "Ana", "Lopez")])),
        });
        app.draft.nombre = "Eva".to_string();
        assert!(app.request_create().is_none());

        let text = screen(&mut app);
        assert!(text.contains("Ana Lopez"));
        assert!(text.contains("Nombre y apellido son requeridos"));
        assert!(!text.contains("No hay personas registradas"));
    }

    #[test]
    fn form_shows_draft_values() {
        let mut app = App::new();
        app.toggle_form();
        for ch in "Ana".chars() {
            app.input_char(ch);
        }
        let text = screen(&mut app);
        assert!(text.contains("Apellido *"));
        assert!(text.contains("Ana"));
    }
}
