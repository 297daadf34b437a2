//! # fnbeans
//!
//! Functional bean registration on top of a dependency injection container.
//!
//! Configuration code registers plain closures as managed beans, names them, aliases
//! them, picks their scope and attaches init/destroy callbacks, all without derive
//! macros or annotations.
//!
//! ## Features
//!
//! - **Named beans**: registered by name, resolved by name and explicit type
//! - **Scopes**: singleton (cached) or prototype (new instance per lookup)
//! - **Aliases** and **generated names** for anonymous beans
//! - **Lifecycle callbacks**: `init` transforms each new instance, `destroy` runs on close
//! - **Parent containers** for layered lookups
//!
//! ## Quick Start
//!
//! ```rust
//! use fnbeans::{Application, BeanOptions, FunctionalConfig, Result};
//!
//! struct Pool {
//!     size: usize,
//! }
//!
//! fn database(beans: &FunctionalConfig) -> Result<()> {
//!     let pool = beans.bean(BeanOptions::named("pool").alias("db"), || Ok(Pool { size: 4 }))?;
//!     beans.init(&pool, |mut pool| {
//!         pool.size *= 2;
//!         pool
//!     })?;
//!     beans.destroy(&pool, |pool| tracing::info!("Closing pool of {}", pool.size))?;
//!     Ok(())
//! }
//!
//! let app = Application::builder().configuration(database).build().unwrap();
//! assert_eq!(app.beans().get_bean::<Pool>("db").unwrap().size, 8);
//! app.shutdown();
//! ```

pub mod config;
pub mod di;
pub mod error;
pub mod functional;
pub mod lifecycle;

// Re-export core types
pub use config::{ConfigService, ContainerSettings};
pub use di::{BeanDefinition, BeanDescriptor, BeanPostProcessor, Container, ContainerBuilder, Scope};
pub use error::{ContainerError, Result};
pub use functional::{BeanOptions, BeanRef, Configuration, FunctionalConfig};
pub use lifecycle::{Application, ApplicationBuilder, LifecycleCallbacks, ShutdownHandler};

/// Prelude module for convenient imports
///
/// ```
/// use fnbeans::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ConfigService, ContainerSettings};
    pub use crate::di::{BeanDefinition, BeanPostProcessor, Container, ContainerBuilder, Scope};
    pub use crate::error::{ContainerError, Result};
    pub use crate::functional::{BeanOptions, BeanRef, Configuration, FunctionalConfig};
    pub use crate::lifecycle::{
        Application, ApplicationBuilder, LifecycleCallbacks, ShutdownHandler, shutdown_signal,
    };
    pub use std::sync::Arc;
}
