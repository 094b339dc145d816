//! Registry of forms and pages served by the admin.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::definitions::{Definition, DefinitionError, DefinitionRepository};
use crate::form::{Form, FormEntry, FormHandlers, Page, PageEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
}

/// Insertion-ordered, name-keyed store of forms and pages.
///
/// Registering a name twice replaces the earlier entry in place: the last
/// registration wins and keeps the position of the first.
#[derive(Debug, Default)]
pub struct FormRegistry {
    forms: Vec<FormEntry>,
    form_index: HashMap<String, usize>,
    pages: Vec<PageEntry>,
    page_index: HashMap<String, usize>,
}

impl FormRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from every definition in a repository.
    pub fn from_repository(repo: &DefinitionRepository) -> Result<Self, DefinitionError> {
        let mut registry = Self::new();

        for definition in repo.load_all()? {
            let replaced = match definition {
                // Repository forms are finalized on load.
                Definition::Form(form) => {
                    registry.register_form(FormEntry::new(form, FormHandlers::default()))
                }
                Definition::Page(page) => registry.register_page(page),
            };
            if replaced {
                debug!("later definition replaced an earlier one");
            }
        }

        Ok(registry)
    }

    /// Register a form. Returns `true` if an entry with the same name was
    /// replaced.
    pub fn register_form(&mut self, entry: FormEntry) -> bool {
        let name = entry.name().to_string();

        if let Some(&pos) = self.form_index.get(&name) {
            debug!(form = %name, "replacing registered form");
            self.forms[pos] = entry;
            return true;
        }

        debug!(form = %name, fields = entry.form.fields.len(), "registered form");
        self.form_index.insert(name, self.forms.len());
        self.forms.push(entry);
        false
    }

    /// Register a page. Returns `true` if an entry with the same name was
    /// replaced.
    pub fn register_page(&mut self, entry: impl Into<PageEntry>) -> bool {
        let entry = entry.into();
        let name = entry.name().to_string();

        if let Some(&pos) = self.page_index.get(&name) {
            debug!(page = %name, "replacing registered page");
            self.pages[pos] = entry;
            return true;
        }

        debug!(page = %name, "registered page");
        self.page_index.insert(name, self.pages.len());
        self.pages.push(entry);
        false
    }

    /// All forms, in registration order.
    pub fn list_forms(&self) -> Vec<Arc<Form>> {
        self.forms.iter().map(|e| Arc::clone(&e.form)).collect()
    }

    pub fn get_form(&self, name: &str) -> Result<Arc<Form>, RegistryError> {
        self.form_entry(name).map(|e| Arc::clone(&e.form))
    }

    /// Form together with its handlers.
    pub fn form_entry(&self, name: &str) -> Result<&FormEntry, RegistryError> {
        self.form_index
            .get(name)
            .map(|&pos| &self.forms[pos])
            .ok_or_else(|| RegistryError::NotFound { kind: "form", name: name.to_string() })
    }

    /// All pages, in registration order.
    pub fn list_pages(&self) -> Vec<Arc<Page>> {
        self.pages.iter().map(|e| Arc::clone(&e.page)).collect()
    }

    pub fn get_page(&self, name: &str) -> Result<Arc<Page>, RegistryError> {
        self.page_entry(name).map(|e| Arc::clone(&e.page))
    }

    pub fn page_entry(&self, name: &str) -> Result<&PageEntry, RegistryError> {
        self.page_index
            .get(name)
            .map(|&pos| &self.pages[pos])
            .ok_or_else(|| RegistryError::NotFound { kind: "page", name: name.to_string() })
    }

    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty() && self.pages.is_empty()
    }
}
