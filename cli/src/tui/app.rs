use std::sync::Arc;

use weekplot_core::{Config, Dashboard, Graph, GraphEvent, GraphId, GraphUpdate, WeekOption};

pub enum InputMode {
    Normal,
    Editing,
}

/// Form fields in the order they are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    StartDate,
    Week,
    Count,
    YAxisMin,
    YAxisMax,
    Title,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::StartDate,
        FormField::Week,
        FormField::Count,
        FormField::YAxisMin,
        FormField::YAxisMax,
        FormField::Title,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::StartDate => "Start Date",
            FormField::Week => "Select Week",
            FormField::Count => "Production Count",
            FormField::YAxisMin => "Lowest Point",
            FormField::YAxisMax => "Highest Point",
            FormField::Title => "Title",
        }
    }

    pub fn index(self) -> usize {
        FormField::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        FormField::ALL[(self.index() + 1) % FormField::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let len = FormField::ALL.len();
        FormField::ALL[(self.index() + len - 1) % len]
    }

    /// Number inputs only take characters a number literal can contain.
    fn accepts(self, c: char) -> bool {
        match self {
            FormField::Count | FormField::YAxisMin | FormField::YAxisMax => {
                c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')
            }
            FormField::StartDate | FormField::Title => !c.is_control(),
            FormField::Week => false,
        }
    }
}

pub struct App {
    pub dashboard: Dashboard,
    pub selected: usize,
    pub field: FormField,
    pub input_mode: InputMode,
    pub date_format: String,
    pub status: Option<String>,
}

impl App {
    pub fn new(config: &Config) -> App {
        App {
            dashboard: Dashboard::new(config.defaults.clone()),
            selected: 0,
            field: FormField::StartDate,
            input_mode: InputMode::Normal,
            date_format: config.date_label_format.clone(),
            status: None,
        }
    }

    pub fn selected_graph(&self) -> Option<Arc<Graph>> {
        self.dashboard.graphs().iter().nth(self.selected).cloned()
    }

    fn selected_id(&self) -> Option<GraphId> {
        self.selected_graph().map(|g| g.id)
    }

    pub fn week_options(&self) -> Vec<WeekOption> {
        self.selected_id()
            .map(|id| self.dashboard.week_options(id, &self.date_format))
            .unwrap_or_default()
    }

    pub fn next_graph(&mut self) {
        let len = self.dashboard.graphs().len();
        if len == 0 { return; }
        self.selected = if self.selected >= len - 1 { 0 } else { self.selected + 1 };
    }

    pub fn previous_graph(&mut self) {
        let len = self.dashboard.graphs().len();
        if len == 0 { return; }
        self.selected = if self.selected == 0 { len - 1 } else { self.selected - 1 };
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn previous_field(&mut self) {
        self.field = self.field.previous();
    }

    pub fn add_graph(&mut self) {
        self.status = None;
        if self.dashboard.dispatch(GraphEvent::Add) {
            self.selected = self.dashboard.graphs().len() - 1;
        }
    }

    pub fn delete_graph(&mut self) {
        let Some(id) = self.selected_id() else { return; };
        if !self.dashboard.can_delete(id) {
            self.status = Some(format!("Graph {} cannot be deleted", id));
            return;
        }
        self.status = None;
        self.dashboard.dispatch(GraphEvent::Delete(id));

        let len = self.dashboard.graphs().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn enter_edit_mode(&mut self) {
        if self.selected_graph().is_some() {
            self.status = None;
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Text currently shown in `field` for the selected graph.
    pub fn field_value(&self, field: FormField) -> String {
        let Some(graph) = self.selected_graph() else {
            return String::new();
        };
        match field {
            FormField::StartDate => graph.start_date.clone(),
            FormField::Week => graph.selected_week.clone(),
            FormField::Count => graph.count.clone(),
            FormField::YAxisMin => graph.y_axis_min_input.clone(),
            FormField::YAxisMax => graph.y_axis_max_input.clone(),
            FormField::Title => graph.graph_title.clone(),
        }
    }

    pub fn input_char(&mut self, c: char) {
        if !self.field.accepts(c) { return; }
        let mut text = self.field_value(self.field);
        text.push(c);
        self.set_field_text(text);
    }

    pub fn delete_char(&mut self) {
        if self.field == FormField::Week { return; }
        let mut text = self.field_value(self.field);
        if text.pop().is_some() {
            self.set_field_text(text);
        }
    }

    /// Moves the week picker by one entry. The first entry is "no week".
    pub fn cycle_week(&mut self, forward: bool) {
        let Some(id) = self.selected_id() else { return; };
        let mut keys: Vec<String> = vec![String::new()];
        keys.extend(self.week_options().into_iter().map(|o| o.key));

        let current = self.field_value(FormField::Week);
        let index = keys.iter().position(|k| *k == current).unwrap_or(0);
        let next = if forward {
            (index + 1) % keys.len()
        } else {
            (index + keys.len() - 1) % keys.len()
        };
        let week = keys.swap_remove(next);
        self.dashboard
            .dispatch(GraphEvent::Update(id, GraphUpdate::SelectedWeek(week)));
    }

    // Every keystroke goes straight to the dashboard, like an input's change event.
    fn set_field_text(&mut self, text: String) {
        let Some(id) = self.selected_id() else { return; };
        let event = match self.field {
            FormField::StartDate => GraphEvent::Update(id, GraphUpdate::StartDate(text)),
            FormField::Week => GraphEvent::Update(id, GraphUpdate::SelectedWeek(text)),
            FormField::Count => GraphEvent::RecordCount(id, text),
            FormField::YAxisMin => GraphEvent::Update(id, GraphUpdate::YAxisMinInput(text)),
            FormField::YAxisMax => GraphEvent::Update(id, GraphUpdate::YAxisMaxInput(text)),
            FormField::Title => GraphEvent::Update(id, GraphUpdate::GraphTitle(text)),
        };
        self.dashboard.dispatch(event);
    }
}
