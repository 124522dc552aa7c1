use std::sync::Arc;

use runscope_core::{AppError, AppResult};
use runscope_domain::{
    InputDefinition, StorageDriverDescriptor, UiHintDescriptor, VariableTypeDescriptor,
    humanize_name, next_input_name,
};

use crate::input_editor_ports::{StorageDriverCatalog, VariableTypeCatalog};

/// Editable state of one workflow input definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDefinitionDraft {
    /// Technical input name.
    pub name: String,
    /// User-facing display name.
    pub display_name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Whether the input carries a collection.
    pub is_array: bool,
    /// Selected variable type.
    pub variable_type: VariableTypeDescriptor,
    /// Selected storage driver.
    pub storage_driver: StorageDriverDescriptor,
    /// Selected UI hint.
    pub ui_hint: UiHintDescriptor,
    variable_types: Vec<VariableTypeDescriptor>,
    storage_drivers: Vec<StorageDriverDescriptor>,
    ui_hints: Vec<UiHintDescriptor>,
}

impl InputDefinitionDraft {
    /// Returns selectable variable types.
    #[must_use]
    pub fn variable_types(&self) -> &[VariableTypeDescriptor] {
        self.variable_types.as_slice()
    }

    /// Returns selectable storage drivers.
    #[must_use]
    pub fn storage_drivers(&self) -> &[StorageDriverDescriptor] {
        self.storage_drivers.as_slice()
    }

    /// Returns selectable UI hints.
    #[must_use]
    pub fn ui_hints(&self) -> &[UiHintDescriptor] {
        self.ui_hints.as_slice()
    }

    /// Groups variable types by category, in order of first appearance.
    #[must_use]
    pub fn grouped_variable_types(&self) -> Vec<(&str, Vec<&VariableTypeDescriptor>)> {
        let mut groups: Vec<(&str, Vec<&VariableTypeDescriptor>)> = Vec::new();
        for variable_type in &self.variable_types {
            let category = variable_type.category.as_str();
            match groups.iter_mut().find(|(name, _)| *name == category) {
                Some((_, members)) => members.push(variable_type),
                None => groups.push((category, vec![variable_type])),
            }
        }

        groups
    }

    /// Selects a variable type by type name.
    pub fn select_variable_type(&mut self, type_name: &str) -> AppResult<()> {
        self.variable_type = find_by(&self.variable_types, type_name, |item| &item.type_name)
            .ok_or_else(|| AppError::NotFound(format!("variable type '{type_name}'")))?;
        Ok(())
    }

    /// Selects a storage driver by type name.
    pub fn select_storage_driver(&mut self, type_name: &str) -> AppResult<()> {
        self.storage_driver = find_by(&self.storage_drivers, type_name, |item| &item.type_name)
            .ok_or_else(|| AppError::NotFound(format!("storage driver '{type_name}'")))?;
        Ok(())
    }

    /// Selects a UI hint by name.
    pub fn select_ui_hint(&mut self, name: &str) -> AppResult<()> {
        self.ui_hint = find_by(&self.ui_hints, name, |item| &item.name)
            .ok_or_else(|| AppError::NotFound(format!("ui hint '{name}'")))?;
        Ok(())
    }

    /// Writes the draft into `target`, or into a new definition.
    ///
    /// The category always follows the selected variable type.
    #[must_use]
    pub fn apply(self, target: Option<InputDefinition>) -> InputDefinition {
        let mut input = target.unwrap_or_default();
        input.name = self.name;
        input.type_name = self.variable_type.type_name;
        input.is_array = self.is_array;
        input.storage_driver_type = Some(self.storage_driver.type_name);
        input.category = self.variable_type.category;
        input.ui_hint = self.ui_hint.name;
        input.description = self.description;
        input.display_name = self.display_name;
        input
    }
}

/// Prepares input definition drafts from the backend catalogs.
#[derive(Clone)]
pub struct InputEditorService {
    variable_type_catalog: Arc<dyn VariableTypeCatalog>,
    storage_driver_catalog: Arc<dyn StorageDriverCatalog>,
}

impl InputEditorService {
    /// Creates an input editor service.
    #[must_use]
    pub fn new(
        variable_type_catalog: Arc<dyn VariableTypeCatalog>,
        storage_driver_catalog: Arc<dyn StorageDriverCatalog>,
    ) -> Self {
        Self {
            variable_type_catalog,
            storage_driver_catalog,
        }
    }

    /// Opens a draft for `input`, or for a new input when `input` is `None`.
    ///
    /// Selections referring to entries missing from the catalogs fall back to
    /// the first catalog entry.
    pub async fn open_draft(
        &self,
        existing_inputs: &[InputDefinition],
        input: Option<&InputDefinition>,
    ) -> AppResult<InputDefinitionDraft> {
        let storage_drivers = self.storage_driver_catalog.list_storage_drivers().await?;
        let variable_types = self.variable_type_catalog.list_variable_types().await?;
        let ui_hints = UiHintDescriptor::defaults();

        let first_storage_driver = first_entry(&storage_drivers, "storage driver")?;
        let first_variable_type = first_entry(&variable_types, "variable type")?;
        let first_ui_hint = first_entry(&ui_hints, "ui hint")?;

        let draft = match input {
            None => {
                let name = next_input_name(existing_inputs);
                InputDefinitionDraft {
                    display_name: humanize_name(name.as_str()),
                    name,
                    description: None,
                    is_array: false,
                    variable_type: first_variable_type,
                    storage_driver: first_storage_driver,
                    ui_hint: first_ui_hint,
                    variable_types,
                    storage_drivers,
                    ui_hints,
                }
            }
            Some(input) => {
                let variable_type =
                    find_by(&variable_types, &input.type_name, |item| &item.type_name)
                        .unwrap_or(first_variable_type);
                let storage_driver = input
                    .storage_driver_type
                    .as_deref()
                    .and_then(|type_name| {
                        find_by(&storage_drivers, type_name, |item| &item.type_name)
                    })
                    .unwrap_or(first_storage_driver);
                let ui_hint = find_by(&ui_hints, &input.ui_hint, |item| &item.name)
                    .unwrap_or(first_ui_hint);

                InputDefinitionDraft {
                    name: input.name.clone(),
                    display_name: input.display_name.clone(),
                    description: input.description.clone(),
                    is_array: input.is_array,
                    variable_type,
                    storage_driver,
                    ui_hint,
                    variable_types,
                    storage_drivers,
                    ui_hints,
                }
            }
        };

        Ok(draft)
    }
}

fn first_entry<T: Clone>(items: &[T], kind: &str) -> AppResult<T> {
    items
        .first()
        .cloned()
        .ok_or_else(|| AppError::Validation(format!("no {kind} is available")))
}

fn find_by<T: Clone>(items: &[T], key: &str, key_of: impl Fn(&T) -> &String) -> Option<T> {
    items.iter().find(|item| key_of(item) == key).cloned()
}
