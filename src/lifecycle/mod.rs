//! # System Lifecycle & Orchestration
//!
//! Individual actors are simple; wiring them together is where the
//! complexity lives. This module is the conductor:
//!
//! 1. **Actor Creation** - instantiate the router, query sync, and search
//!    controller together with their handles
//! 2. **Dependency Wiring** - connect the sync actor to the router's
//!    navigation channel and both observers to the route watch
//! 3. **Lifecycle Management** - spawn each actor in its own Tokio task
//! 4. **Graceful Shutdown** - drop the handles so every command channel
//!    closes, then await all task handles
//! 5. **Observability Setup** - initialize the tracing infrastructure
//!
//! See [`CatalogSystem`] for the orchestrator and [`setup_tracing`] for the
//! logging bootstrap.

pub mod system;
pub mod tracing;

pub use system::*;
pub use tracing::*;
