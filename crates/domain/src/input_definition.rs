use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

/// Workflow input parameter definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDefinition {
    /// Technical input name.
    pub name: String,
    /// User-facing display name.
    pub display_name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Variable type name.
    pub type_name: String,
    /// Whether the input carries a collection of values.
    pub is_array: bool,
    /// Category copied from the variable type.
    pub category: String,
    /// UI hint used to render the input.
    pub ui_hint: String,
    /// Storage driver type name.
    pub storage_driver_type: Option<String>,
}

/// Variable type available to workflow inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableTypeDescriptor {
    /// Type name stored on the input.
    pub type_name: String,
    /// User-facing display name.
    pub display_name: String,
    /// Grouping category.
    pub category: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Storage driver able to persist workflow input values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDriverDescriptor {
    /// Driver type name stored on the input.
    pub type_name: String,
    /// User-facing display name.
    pub display_name: String,
}

/// Editor control hint for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiHintDescriptor {
    /// Stable hint name.
    pub name: String,
    /// User-facing display name.
    pub display_name: String,
    /// Short description.
    pub description: String,
}

impl UiHintDescriptor {
    /// Creates a UI hint descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
        }
    }

    /// Returns the built-in hint list in presentation order.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        [
            ("single-line", "Single line", "A single line of text input"),
            ("multi-line", "Multi line", "Multiple lines of text input"),
            ("checkbox", "Checkbox", "A checkbox"),
            ("checklist", "Checklist", "A list of checkboxes"),
            ("radio-list", "Radio list", "A list of radio buttons"),
            ("dropdown", "Dropdown", "A dropdown list"),
            (
                "multi-text",
                "Multi text",
                "An input for multiple words, like a tagging input",
            ),
            ("code-editor", "Code editor", "A code editor"),
            ("variable-picker", "Variable picker", "A variable picker"),
            (
                "workflow-definition-picker",
                "Workflow definition picker",
                "A workflow definition picker",
            ),
            (
                "output-picker",
                "Output picker",
                "A workflow output definition picker",
            ),
            ("outcome-picker", "Outcome picker", "An outcome picker"),
            ("json-editor", "JSON editor", "A JSON editor"),
        ]
        .into_iter()
        .map(|(name, display_name, description)| Self::new(name, display_name, description))
        .collect()
    }
}

/// Returns the first `Input{n}` name not used by `existing_inputs`.
#[must_use]
pub fn next_input_name(existing_inputs: &[InputDefinition]) -> String {
    (1_usize..)
        .map(|count| format!("Input{count}"))
        .find(|candidate| existing_inputs.iter().all(|input| input.name != *candidate))
        .unwrap_or_default()
}

/// Turns an identifier such as `OrderTotal` into sentence case (`Order total`).
#[must_use]
pub fn humanize_name(name: &str) -> String {
    let words = name.to_snake_case().replace('_', " ");
    let mut characters = words.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}
