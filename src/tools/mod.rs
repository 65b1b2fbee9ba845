//! 工具层：Tool 契约、注册表、执行器与内置工具（search / database / echo）

pub mod database;
pub mod echo;
pub mod executor;
pub mod registry;
pub mod search;

pub use database::{DatabaseTool, QueryBackend, SqliteBackend};
pub use echo::EchoTool;
pub use executor::ToolExecutor;
pub use registry::{Tool, ToolRegistry};
pub use search::{CannedSearchBackend, SearchBackend, SearchHit, SearchTool};
