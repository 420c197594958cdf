//! Application state for the Registro TUI.

use crate::display::format_fecha;
use crate::event::{Completion, CompletionResult, Request};
use crate::outcome::{OperationKind, Outcome};
use crate::requests::RequestTracker;
use log::{debug, info};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use registro_protocol::{Persona, PersonaDraft, SearchFilter};
use std::cmp::min;

/// Editable draft fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Nombre,
    Apellido,
    Ciudad,
    Ocupacion,
    Relato,
}

impl DraftField {
    pub const ALL: [DraftField; 5] = [
        DraftField::Nombre,
        DraftField::Apellido,
        DraftField::Ciudad,
        DraftField::Ocupacion,
        DraftField::Relato,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Nombre => "Nombre *",
            DraftField::Apellido => "Apellido *",
            DraftField::Ciudad => "Ciudad",
            DraftField::Ocupacion => "Ocupación",
            DraftField::Relato => "Relato",
        }
    }
}

/// Which input receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    SearchNombre,
    SearchCiudad,
    Records,
    Form(DraftField),
}

/// Top-level application state for the TUI.
pub struct App {
    /// Records exactly as last received from the backend.
    pub records: Vec<Persona>,
    /// Current search criteria.
    pub filter: SearchFilter,
    /// Uncommitted form values.
    pub draft: PersonaDraft,
    /// Whether the create form is shown.
    pub show_form: bool,
    /// Input with keyboard focus.
    pub focus: Focus,
    /// Backend base URL shown in the header.
    pub backend: String,
    /// Current list scroll offset.
    pub scroll: u16,
    /// Maximum list scroll offset.
    pub max_scroll: u16,
    /// Latest outcome per operation kind, oldest first.
    outcomes: Vec<Outcome>,
    requests: RequestTracker,
}

impl App {
    /// Create a new application state with defaults.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            filter: SearchFilter::default(),
            draft: PersonaDraft::default(),
            show_form: false,
            focus: Focus::SearchNombre,
            backend: String::new(),
            scroll: 0,
            max_scroll: 0,
            outcomes: Vec::new(),
            requests: RequestTracker::default(),
        }
    }

    /// True while any request is in flight.
    pub fn is_loading(&self) -> bool {
        self.requests.is_busy()
    }

    /// True while a request of this kind's lane is in flight.
    pub fn is_pending(&self, kind: OperationKind) -> bool {
        self.requests.is_pending(kind)
    }

    /// Settled outcomes, oldest first, one per kind.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Latest outcome of a given kind.
    pub fn outcome(&self, kind: OperationKind) -> Option<&Outcome> {
        self.outcomes.iter().find(|outcome| outcome.kind == kind)
    }

    /// Most recently settled outcome, for the status bar.
    pub fn latest_outcome(&self) -> Option<&Outcome> {
        self.outcomes.last()
    }

    /// Request the full record list.
    pub fn request_load(&mut self) -> Request {
        info!("loading records");
        self.clear_list_outcomes();
        Request::List(self.requests.issue(OperationKind::Load))
    }

    /// Request a filtered list; an empty filter is a plain load.
    pub fn request_search(&mut self) -> Request {
        if self.filter.is_empty() {
            return self.request_load();
        }
        info!(
            "searching records (nombre_set={}, ciudad_set={})",
            !self.filter.nombre.is_empty(),
            !self.filter.ciudad.is_empty()
        );
        self.clear_list_outcomes();
        let ticket = self.requests.issue(OperationKind::Search);
        Request::Search(ticket, self.filter.clone())
    }

    /// Request creation of the current draft. Returns `None` while a create is
    /// in flight, and also, with a failure outcome recorded, when a required
    /// field is missing.
    pub fn request_create(&mut self) -> Option<Request> {
        if self.is_pending(OperationKind::Create) {
            debug!("create ignored: previous create still in flight");
            return None;
        }
        if !self.draft.has_required_fields() {
            info!("create rejected: missing required fields");
            self.record_outcome(Outcome::missing_required());
            return None;
        }
        info!("creating record");
        self.clear_outcome(OperationKind::Create);
        let ticket = self.requests.issue(OperationKind::Create);
        Some(Request::Create(ticket, self.draft.clone()))
    }

    /// Request the spreadsheet export, unless one is already running.
    pub fn request_export(&mut self) -> Option<Request> {
        if self.is_pending(OperationKind::Export) {
            debug!("export ignored: previous export still in flight");
            return None;
        }
        info!("exporting spreadsheet");
        self.clear_outcome(OperationKind::Export);
        Some(Request::Export(self.requests.issue(OperationKind::Export)))
    }

    /// Apply a finished request. Stale completions are ignored. Returns the
    /// follow-up request to issue, which is the full reload after a create.
    pub fn apply(&mut self, completion: Completion) -> Option<Request> {
        let kind = completion.ticket.kind;
        if !self.requests.settle(completion.ticket) {
            return None;
        }
        match completion.result {
            CompletionResult::Records(Ok(records)) => {
                debug!("records applied (kind={:?}, count={})", kind, records.len());
                self.clear_list_outcomes();
                self.set_records(records);
                None
            }
            CompletionResult::Records(Err(cause)) => {
                self.record_outcome(Outcome::failure(kind, cause));
                None
            }
            CompletionResult::Created(Ok(())) => {
                self.draft.clear();
                self.show_form = false;
                if matches!(self.focus, Focus::Form(_)) {
                    self.focus = Focus::SearchNombre;
                }
                self.record_outcome(Outcome::created());
                Some(self.request_load())
            }
            CompletionResult::Created(Err(cause)) => {
                self.record_outcome(Outcome::failure(kind, cause));
                None
            }
            CompletionResult::Exported(Ok(path)) => {
                self.record_outcome(Outcome::exported(path.display()));
                None
            }
            CompletionResult::Exported(Err(cause)) => {
                self.record_outcome(Outcome::failure(kind, cause));
                None
            }
        }
    }

    /// Show or hide the create form. Hiding it discards the draft.
    pub fn toggle_form(&mut self) {
        self.show_form = !self.show_form;
        if self.show_form {
            self.focus = Focus::Form(DraftField::Nombre);
        } else {
            self.draft.clear();
            self.focus = Focus::SearchNombre;
        }
    }

    /// Mutable access to a draft field.
    pub fn draft_field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Nombre => &mut self.draft.nombre,
            DraftField::Apellido => &mut self.draft.apellido,
            DraftField::Ciudad => &mut self.draft.ciudad,
            DraftField::Ocupacion => &mut self.draft.ocupacion,
            DraftField::Relato => &mut self.draft.relato,
        }
    }

    /// Read access to a draft field.
    pub fn draft_field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Nombre => &self.draft.nombre,
            DraftField::Apellido => &self.draft.apellido,
            DraftField::Ciudad => &self.draft.ciudad,
            DraftField::Ocupacion => &self.draft.ocupacion,
            DraftField::Relato => &self.draft.relato,
        }
    }

    /// Buffer behind the focused input, if the focus is an input.
    fn focused_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::SearchNombre => Some(&mut self.filter.nombre),
            Focus::SearchCiudad => Some(&mut self.filter.ciudad),
            Focus::Records => None,
            Focus::Form(field) => Some(self.draft_field_mut(field)),
        }
    }

    /// Type a character into the focused input.
    pub fn input_char(&mut self, ch: char) {
        if let Some(buffer) = self.focused_input_mut() {
            buffer.push(ch);
        }
    }

    /// Delete the last character of the focused input.
    pub fn backspace(&mut self) {
        if let Some(buffer) = self.focused_input_mut() {
            buffer.pop();
        }
    }

    /// Move focus forward through the visible inputs.
    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let idx = order.iter().position(|focus| *focus == self.focus);
        self.focus = match idx {
            Some(idx) => order[(idx + 1) % order.len()],
            None => order[0],
        };
    }

    /// Move focus backward through the visible inputs.
    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let idx = order.iter().position(|focus| *focus == self.focus);
        self.focus = match idx {
            Some(0) | None => order[order.len() - 1],
            Some(idx) => order[idx - 1],
        };
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::SearchNombre, Focus::SearchCiudad];
        if self.show_form {
            order.extend(DraftField::ALL.iter().map(|field| Focus::Form(*field)));
        }
        order.push(Focus::Records);
        order
    }

    /// Scroll the list upward by a number of lines.
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll the list downward by a number of lines.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = min(self.scroll.saturating_add(lines), self.max_scroll);
    }

    /// Update scroll bounds after layout changes.
    pub fn update_scroll_bounds(&mut self, max_scroll: u16) {
        self.max_scroll = max_scroll;
        self.scroll = self.scroll.min(max_scroll);
    }

    /// Render the record list into styled lines for the UI.
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.is_pending(OperationKind::Load) || self.is_pending(OperationKind::Search) {
            lines.push(Line::from(Span::styled(
                " ⏳ Cargando...",
                Style::default().fg(Color::Rgb(229, 192, 123)),
            )));
        } else if self.records.is_empty() {
            lines.push(Line::from(Span::styled(
                " 📭 No hay personas registradas",
                Style::default().fg(Color::Rgb(128, 128, 128)),
            )));
            return lines;
        }

        let name_style = Style::default()
            .fg(Color::Rgb(238, 121, 72))
            .add_modifier(Modifier::BOLD);
        let label_style = Style::default().fg(Color::Rgb(128, 128, 128));
        let value_style = Style::default().fg(Color::Rgb(238, 238, 238));

        for (idx, persona) in self.records.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!(" {}", persona.full_name()),
                name_style,
            )));
            let optional = [
                ("📍 Ciudad: ", persona.ciudad()),
                ("💼 Ocupación: ", persona.ocupacion()),
                ("📝 Relato: ", persona.relato()),
            ];
            for (label, value) in optional {
                let Some(value) = value else {
                    continue;
                };
                let mut content = value.lines();
                if let Some(first) = content.next() {
                    lines.push(Line::from(vec![
                        Span::styled(format!("   {label}"), label_style),
                        Span::styled(first.to_string(), value_style),
                    ]));
                }
                for line in content {
                    lines.push(Line::from(Span::styled(format!("     {line}"), value_style)));
                }
            }
            lines.push(Line::from(Span::styled(
                format!("   📅 {}", format_fecha(persona.fecha.as_deref())),
                label_style,
            )));
            if idx + 1 < self.records.len() {
                lines.push(Line::from(Span::raw("")));
            }
        }

        lines
    }

    fn set_records(&mut self, records: Vec<Persona>) {
        self.records = records;
        self.scroll = 0;
    }

    fn record_outcome(&mut self, outcome: Outcome) {
        debug!(
            "outcome recorded (kind={:?}, success={})",
            outcome.kind, outcome.success
        );
        self.clear_outcome(outcome.kind);
        self.outcomes.push(outcome);
    }

    fn clear_outcome(&mut self, kind: OperationKind) {
        self.outcomes.retain(|outcome| outcome.kind != kind);
    }

    /// Load and search report on the same list, so either clears both.
    fn clear_list_outcomes(&mut self) {
        self.clear_outcome(OperationKind::Load);
        self.clear_outcome(OperationKind::Search);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::persona;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn complete(request: &Request, result: CompletionResult) -> Completion {
        Completion {
            ticket: request.ticket(),
            result,
        }
    }

    #[test]
    fn load_replaces_list_verbatim() {
        let mut app = App::new();
        let request = app.request_load();
        assert!(app.is_loading());

        let records = vec![persona(3, "Eva", "Paz"), persona(1, "Ana", "Lopez")];
        app.apply(complete(&request, CompletionResult::Records(Ok(records.clone()))));

        assert_eq!(app.records, records);
        assert!(!app.is_loading());
        assert!(app.outcomes().is_empty());
    }

    #[test]
    fn empty_filter_search_is_a_load() {
        let mut app = App::new();
        let request = app.request_search();
        assert!(matches!(request, Request::List(_)));
        assert_eq!(request.kind(), OperationKind::Load);
    }

    #[test]
    fn city_only_search_carries_filter() {
        let mut app = App::new();
        app.filter.ciudad = "Quito".to_string();
        let request = app.request_search();
        let Request::Search(_, filter) = request else {
            panic!("expected search request");
        };
        assert_eq!(filter.query_pairs(), vec![("ciudad", "Quito")]);
    }

    #[test]
    fn failure_keeps_list_and_records_outcome() {
        let mut app = App::new();
        let first = app.request_load();
        app.apply(complete(
            &first,
            CompletionResult::Records(Ok(vec![persona(1, "Ana", "Lopez")])),
        ));

        app.filter.nombre = "Zoe".to_string();
        let search = app.request_search();
        app.apply(complete(
            &search,
            CompletionResult::Records(Err("HTTP 500".to_string())),
        ));

        assert_eq!(app.records.len(), 1);
        let outcome = app.outcome(OperationKind::Search).expect("outcome");
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Error en búsqueda: HTTP 500");
        assert!(!app.is_loading());
    }

    #[test]
    fn stale_list_response_is_ignored() {
        let mut app = App::new();
        let load = app.request_load();
        app.filter.ciudad = "Loja".to_string();
        let search = app.request_search();

        app.apply(complete(&search, CompletionResult::Records(Ok(Vec::new()))));
        app.apply(complete(
            &load,
            CompletionResult::Records(Ok(vec![persona(1, "Ana", "Lopez")])),
        ));

        assert!(app.records.is_empty());
        assert!(!app.is_loading());
    }

    #[test]
    fn create_requires_nombre_and_apellido() {
        let mut app = App::new();
        app.draft.nombre = "Ana".to_string();

        assert_eq!(app.request_create(), None);
        assert!(!app.is_loading());
        let outcome = app.outcome(OperationKind::Create).expect("outcome");
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Nombre y apellido son requeridos");
        assert_eq!(app.draft.nombre, "Ana");
    }

    #[test]
    fn create_success_clears_draft_and_reloads() {
        let mut app = App::new();
        app.toggle_form();
        app.draft.nombre = "Ana".to_string();
        app.draft.apellido = "Lopez".to_string();

        let create = app.request_create().expect("create request");
        let followup = app.apply(complete(&create, CompletionResult::Created(Ok(()))));

        assert!(matches!(followup, Some(Request::List(_))));
        assert_eq!(app.draft, PersonaDraft::default());
        assert!(!app.show_form);
        assert_eq!(app.focus, Focus::SearchNombre);
        assert!(app.is_loading());
    }

    #[test]
    fn create_success_survives_failed_reload() {
        let mut app = App::new();
        app.draft.nombre = "Ana".to_string();
        app.draft.apellido = "Lopez".to_string();

        let create = app.request_create().expect("create request");
        let reload = app
            .apply(complete(&create, CompletionResult::Created(Ok(()))))
            .expect("reload");
        app.apply(complete(
            &reload,
            CompletionResult::Records(Err("HTTP 503".to_string())),
        ));

        let created = app.outcome(OperationKind::Create).expect("create outcome");
        assert!(created.success);
        let load = app.outcome(OperationKind::Load).expect("load outcome");
        assert_eq!(load.message, "Error al cargar: HTTP 503");
        assert_eq!(app.latest_outcome(), Some(load));
    }

    #[test]
    fn second_create_waits_for_the_first() {
        let mut app = App::new();
        app.toggle_form();
        app.draft.nombre = "Ana".to_string();
        app.draft.apellido = "Lopez".to_string();

        let first = app.request_create().expect("create request");
        assert_eq!(app.request_create(), None);
        assert_eq!(app.outcome(OperationKind::Create), None);

        app.apply(complete(
            &first,
            CompletionResult::Created(Err("HTTP 500".to_string())),
        ));
        assert!(app.request_create().is_some());
    }

    #[test]
    fn second_export_waits_for_the_first() {
        let mut app = App::new();
        let first = app.request_export().expect("export request");
        assert_eq!(app.request_export(), None);

        app.apply(complete(
            &first,
            CompletionResult::Exported(Ok(PathBuf::from("/tmp/registro-nacional.xlsx"))),
        ));
        assert!(app.request_export().is_some());
    }

    #[test]
    fn successful_reload_clears_search_failure() {
        let mut app = App::new();
        app.filter.nombre = "Zoe".to_string();
        let search = app.request_search();
        app.apply(complete(
            &search,
            CompletionResult::Records(Err("HTTP 500".to_string())),
        ));
        assert!(app.outcome(OperationKind::Search).is_some());

        let reload = app.request_load();
        app.apply(complete(
            &reload,
            CompletionResult::Records(Ok(vec![persona(1, "Ana", "Lopez")])),
        ));

        assert_eq!(app.records.len(), 1);
        assert_eq!(app.outcome(OperationKind::Search), None);
        assert_eq!(app.outcome(OperationKind::Load), None);
        assert!(app.outcomes().is_empty());
    }

    #[test]
    fn create_failure_keeps_draft() {
        let mut app = App::new();
        app.toggle_form();
        app.draft.nombre = "Ana".to_string();
        app.draft.apellido = "Lopez".to_string();

        let create = app.request_create().expect("create request");
        let followup = app.apply(complete(
            &create,
            CompletionResult::Created(Err("HTTP 400".to_string())),
        ));

        assert_eq!(followup, None);
        assert_eq!(app.draft.apellido, "Lopez");
        assert!(app.show_form);
        assert_eq!(
            app.outcome(OperationKind::Create).map(|o| o.message.as_str()),
            Some("Error al guardar: HTTP 400")
        );
    }

    #[test]
    fn export_never_touches_records() {
        let mut app = App::new();
        let load = app.request_load();
        app.apply(complete(
            &load,
            CompletionResult::Records(Ok(vec![persona(1, "Ana", "Lopez")])),
        ));

        let export = app.request_export().expect("export request");
        app.apply(complete(
            &export,
            CompletionResult::Exported(Err("HTTP 404".to_string())),
        ));
        assert_eq!(app.records.len(), 1);

        let export = app.request_export().expect("export request");
        app.apply(complete(
            &export,
            CompletionResult::Exported(Ok(PathBuf::from("/tmp/registro-nacional.xlsx"))),
        ));
        assert_eq!(app.records.len(), 1);
        let outcome = app.outcome(OperationKind::Export).expect("outcome");
        assert!(outcome.success);
        assert!(outcome.message.contains("registro-nacional.xlsx"));
    }

    #[test]
    fn hiding_form_discards_draft() {
        let mut app = App::new();
        app.toggle_form();
        app.input_char('A');
        assert_eq!(app.draft.nombre, "A");

        app.toggle_form();
        assert_eq!(app.draft, PersonaDraft::default());
        assert_eq!(app.focus, Focus::SearchNombre);
    }

    #[test]
    fn focus_cycles_through_visible_inputs() {
        let mut app = App::new();
        app.focus_next();
        assert_eq!(app.focus, Focus::SearchCiudad);
        app.focus_next();
        assert_eq!(app.focus, Focus::Records);
        app.focus_next();
        assert_eq!(app.focus, Focus::SearchNombre);
        app.focus_prev();
        assert_eq!(app.focus, Focus::Records);

        app.toggle_form();
        app.focus_prev();
        assert_eq!(app.focus, Focus::SearchCiudad);
    }

    #[test]
    fn typing_goes_to_focused_filter() {
        let mut app = App::new();
        app.focus = Focus::SearchCiudad;
        for ch in "Quitoo".chars() {
            app.input_char(ch);
        }
        app.backspace();
        assert_eq!(app.filter.ciudad, "Quito");
        assert_eq!(app.filter.nombre, "");

        app.focus = Focus::Records;
        app.input_char('x');
        assert_eq!(app.filter.ciudad, "Quito");
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let app = App::new();
        let text: Vec<String> = app
            .render_lines()
            .iter()
            .map(|line| line.to_string())
            .collect();
        assert_eq!(text, vec![" 📭 No hay personas registradas".to_string()]);
    }

    #[test]
    fn record_without_optionals_renders_name_and_date_only() {
        let mut app = App::new();
        let load = app.request_load();
        app.apply(complete(
            &load,
            CompletionResult::Records(Ok(vec![persona(1, "Ana", "Lopez")])),
        ));
        let text: Vec<String> = app
            .render_lines()
            .iter()
            .map(|line| line.to_string())
            .collect();
        assert_eq!(
            text,
            vec![" Ana Lopez".to_string(), "   📅 N/A".to_string()]
        );
    }
}
