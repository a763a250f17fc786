//! Module discovery through the external resolver.
//!
//! - `resolver`: how resolver processes are invoked ([`ResolverCommand`])
//! - `reader`: streaming decode of the resolver output ([`ModuleReader`])
//! - `record`: the decoded [`ModuleRecord`] and the directory filter

mod error;
mod reader;
mod record;
mod resolver;

pub use error::{CloseError, PullError, ReaderError, ReaderResult};
pub use reader::{list_modules, ModuleReader, Pull, DEFAULT_SHUTDOWN_TIMEOUT};
pub use record::{filter_modules, ModuleRecord};
pub use resolver::{GoEnv, GoListCommand, ResolverCommand, DEFAULT_GO_BINARY};
