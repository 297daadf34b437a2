use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContainerError>;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("No bean named '{name}' is defined")]
    NoSuchBean { name: String },

    #[error("Bean '{name}' is of type '{actual}' but '{expected}' was requested")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to construct bean '{name}': {source}")]
    Construction {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Bean '{name}' is currently in creation: circular reference")]
    CircularReference { name: String },

    #[error("Bean definition '{name}' is already registered and overriding is disabled")]
    DefinitionOverride { name: String },

    #[error("Cannot register alias '{alias}' for '{name}': already bound to '{existing}'")]
    AliasConflict {
        alias: String,
        name: String,
        existing: String,
    },

    #[error("Registering alias '{alias}' for '{name}' would create a cycle")]
    AliasCycle { alias: String, name: String },

    #[error("Expected exactly one lifecycle callback processor, found {found}")]
    LifecycleProcessorCount { found: usize },

    #[error("Container is closed")]
    ContainerClosed,
}

impl ContainerError {
    pub(crate) fn type_mismatch<T>(name: impl Into<String>, actual: impl Into<String>) -> Self {
        ContainerError::TypeMismatch {
            name: name.into(),
            expected: std::any::type_name::<T>().to_string(),
            actual: actual.into(),
        }
    }

    pub(crate) fn no_such_bean(name: impl Into<String>) -> Self {
        ContainerError::NoSuchBean { name: name.into() }
    }
}
