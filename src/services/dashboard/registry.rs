//! Section registry: the single entry point for reaching dashboard sections.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::section::Section;
use super::EngineError;

/// Name-to-section map, populated once at startup and read-only afterwards.
#[derive(Default)]
pub struct Registry {
    sections: HashMap<String, Arc<dyn Section>>,
}

/// Registry entry as listed by the dashboard index endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub name: String,
    pub charts: Vec<&'static str>,
    pub has_stat_card: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `section`. A name can only be bound once.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        section: Arc<dyn Section>,
    ) -> Result<(), EngineError> {
        let name = name.into();
        if self.sections.contains_key(&name) {
            return Err(EngineError::DuplicateSection(name));
        }
        tracing::debug!(
            section = %name,
            charts = ?section.charts().keys().collect::<Vec<_>>(),
            stat_card = section.has_stat_card(),
            "Registered dashboard section"
        );
        self.sections.insert(name, section);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Section>> {
        self.sections.get(name).cloned()
    }

    /// Registered section names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Sorted overview of every section's charts and stat-card capability.
    pub fn summaries(&self) -> Vec<SectionSummary> {
        self.names()
            .into_iter()
            .filter_map(|name| {
                let section = self.sections.get(name)?;
                Some(SectionSummary {
                    name: name.to_string(),
                    charts: section.charts().keys().copied().collect(),
                    has_stat_card: section.has_stat_card(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("sections", &self.names())
            .finish()
    }
}
