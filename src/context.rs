//! Application context: everything handlers need, built once at startup.
//!
//! Replaces module-level singletons with an explicit object injected into
//! the dispatcher as a dptree dependency.

use crate::config::Config;
use crate::db::SharedConn;
use crate::llm::PostGenerator;

pub struct AppContext {
    pub config: Config,
    pub db: SharedConn,
    /// Present only when YandexGPT credentials are configured.
    pub generator: Option<PostGenerator>,
}
