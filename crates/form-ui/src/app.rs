//! Application state for the terminal form.

use std::time::Instant;

use artifact_store::ArtifactState;
use dataset::{HouseRecord, Validator};
use regressor::EvaluationReport;

/// Active tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Form,
    Evaluation,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Form => Tab::Evaluation,
            Tab::Evaluation => Tab::Form,
        }
    }
}

/// Current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// A form field's editable value.
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Free-text numeric entry
    Numeric(String),
    /// One of a fixed level set
    Choice {
        options: &'static [&'static str],
        selected: usize,
    },
}

/// One of the twelve input widgets.
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub name: &'static str,
    pub value: FieldValue,
}

impl FormField {
    fn numeric(label: &'static str, name: &'static str, default: &str) -> Self {
        Self {
            label,
            name,
            value: FieldValue::Numeric(default.to_string()),
        }
    }

    fn choice(label: &'static str, name: &'static str, options: &'static [&'static str], selected: usize) -> Self {
        Self {
            label,
            name,
            value: FieldValue::Choice { options, selected },
        }
    }

    /// The value as displayed in the form.
    pub fn display(&self) -> &str {
        match &self.value {
            FieldValue::Numeric(text) => text,
            FieldValue::Choice { options, selected } => options[*selected],
        }
    }
}

const YES_NO: &[&str] = &["yes", "no"];
const FURNISHING: &[&str] = &["furnished", "semi-furnished", "unfurnished"];

/// Main application state.
pub struct App {
    /// Loaded artifacts, or the reason prediction is unavailable
    pub artifacts: ArtifactState,
    /// Training evaluation, when the trainer has produced one
    pub evaluation: Option<EvaluationReport>,
    /// Scatter points (actual, predicted) for the chart
    pub scatter: Vec<(f64, f64)>,
    /// Endpoints of the perfect-prediction diagonal
    pub diagonal: [(f64, f64); 2],
    pub tab: Tab,
    pub input_mode: InputMode,
    pub fields: Vec<FormField>,
    pub selected: usize,
    pub prediction: Option<f64>,
    pub status: Option<(String, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(artifacts: ArtifactState, evaluation: Option<EvaluationReport>) -> Self {
        let scatter: Vec<(f64, f64)> = evaluation
            .as_ref()
            .map(|report| {
                report
                    .points
                    .iter()
                    .map(|p| (p.actual, p.predicted))
                    .collect()
            })
            .unwrap_or_default();

        let (min, max) = scatter.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, (a, p)| {
            (acc.0.min(*a).min(*p), acc.1.max(*a).max(*p))
        });
        let diagonal = if scatter.is_empty() {
            [(0.0, 0.0), (1.0, 1.0)]
        } else {
            [(min, min), (max, max)]
        };

        Self {
            artifacts,
            evaluation,
            scatter,
            diagonal,
            tab: Tab::Form,
            input_mode: InputMode::Normal,
            fields: default_fields(),
            selected: 0,
            prediction: None,
            status: None,
            should_quit: false,
        }
    }

    /// Set a status message that will be displayed temporarily.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    /// Clear expired status messages (older than 5 seconds).
    pub fn clear_expired_status(&mut self) {
        if let Some((_, instant)) = &self.status {
            if instant.elapsed().as_secs() > 5 {
                self.status = None;
            }
        }
    }

    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % self.fields.len();
    }

    pub fn previous_field(&mut self) {
        self.selected = (self.selected + self.fields.len() - 1) % self.fields.len();
    }

    /// Cycle the selected choice field. No-op on numeric fields.
    pub fn cycle_choice(&mut self) {
        if let FieldValue::Choice { options, selected } = &mut self.fields[self.selected].value {
            *selected = (*selected + 1) % options.len();
        }
    }

    pub fn selected_is_numeric(&self) -> bool {
        matches!(self.fields[self.selected].value, FieldValue::Numeric(_))
    }

    pub fn push_char(&mut self, c: char) {
        if let FieldValue::Numeric(text) = &mut self.fields[self.selected].value {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let FieldValue::Numeric(text) = &mut self.fields[self.selected].value {
            text.pop();
        }
    }

    /// Assemble the raw record from the current form values.
    pub fn build_record(&self) -> Result<HouseRecord, String> {
        let numeric = |name: &str| -> Result<f64, String> {
            let field = self
                .fields
                .iter()
                .find(|f| f.name == name)
                .ok_or_else(|| format!("Missing field {name}"))?;
            match &field.value {
                FieldValue::Numeric(text) => text
                    .parse::<f64>()
                    .map_err(|_| format!("{}: '{}' is not a number", field.label, text)),
                FieldValue::Choice { .. } => Err(format!("{name} is not numeric")),
            }
        };
        let count = |name: &str| -> Result<u32, String> {
            let value = numeric(name)?;
            if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
                return Err(format!("{name}: '{value}' is not a whole count"));
            }
            Ok(value as u32)
        };
        let choice = |name: &str| -> String {
            self.fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.display().to_string())
                .unwrap_or_default()
        };

        let record = HouseRecord {
            area: numeric("area")?,
            bedrooms: count("bedrooms")?,
            bathrooms: count("bathrooms")?,
            stories: count("stories")?,
            parking: count("parking")?,
            mainroad: choice("mainroad"),
            guestroom: choice("guestroom"),
            basement: choice("basement"),
            hotwaterheating: choice("hotwaterheating"),
            airconditioning: choice("airconditioning"),
            prefarea: choice("prefarea"),
            furnishingstatus: choice("furnishingstatus"),
        };

        if let Some(err) = Validator::default().validate_record(&record).first() {
            return Err(err.to_string());
        }

        Ok(record)
    }

    /// Run the shared serving path on the current form values.
    pub fn predict(&mut self) {
        let Some(bundle) = self.artifacts.bundle() else {
            self.set_status("Model artifacts not found. Run house-trainer first.");
            return;
        };

        match self.build_record() {
            Ok(record) => match bundle.predict(&record) {
                Ok(price) => {
                    self.prediction = Some(price);
                    self.status = None;
                }
                Err(err) => self.set_status(err.to_string()),
            },
            Err(message) => self.set_status(message),
        }
    }
}

fn default_fields() -> Vec<FormField> {
    vec![
        FormField::numeric("Area (sq ft)", "area", "4000"),
        FormField::numeric("Bedrooms", "bedrooms", "3"),
        FormField::numeric("Bathrooms", "bathrooms", "2"),
        FormField::numeric("Stories", "stories", "2"),
        FormField::numeric("Parking Spots", "parking", "1"),
        FormField::choice("Main Road Access", "mainroad", YES_NO, 0),
        FormField::choice("Guestroom", "guestroom", YES_NO, 1),
        FormField::choice("Basement", "basement", YES_NO, 1),
        FormField::choice("Hot Water Heating", "hotwaterheating", YES_NO, 1),
        FormField::choice("Air Conditioning", "airconditioning", YES_NO, 0),
        FormField::choice("Preferred Area", "prefarea", YES_NO, 1),
        FormField::choice("Furnishing Status", "furnishingstatus", FURNISHING, 0),
    ]
}
