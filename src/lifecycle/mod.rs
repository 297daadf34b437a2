//! Lifecycle Module
//!
//! Init and destroy callbacks for beans, application bootstrap and graceful shutdown.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Settings Loading
//!    ↓
//! 2. Container Creation
//!    ↓
//! 3. LifecycleCallbacks installed
//!    ↓
//! 4. Configuration units register beans, aliases and callbacks
//!    ↓
//! 5. Refresh: non-lazy singletons created, init callbacks applied
//!    ↓
//! [Running...]
//!    ↓
//! 6. Shutdown Signal (SIGTERM/SIGINT)
//!    ↓
//! 7. Close: destroy callbacks, reverse creation order
//! ```

mod application;
mod callbacks;
mod shutdown;

pub use application::{Application, ApplicationBuilder};
pub use callbacks::LifecycleCallbacks;
pub use shutdown::{ShutdownHandler, shutdown_signal};
