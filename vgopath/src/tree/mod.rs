//! Module path tree.
//!
//! Reconciles the flat module list into one tree per top-level path segment.
//!
//! ```text
//! github.com                      (no module)
//! └── foo                         (no module)
//!     ├── bar    [github.com/foo/bar]      module + children
//!     │   └── v2 [github.com/foo/bar/v2]   collapsible leaf
//!     └── baz    [github.com/foo/baz]      collapsible leaf
//! ```

mod builder;
mod error;
mod node;

pub use builder::build_forest;
pub use error::{TreeError, TreeResult};
pub use node::Node;
