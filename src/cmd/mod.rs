//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module    | Commands handled       |
//! |-----------|------------------------|
//! | `build`   | `Build`                |
//! | `stages`  | `Stages`               |
//! | `chat`    | `Chat`, `Recommend`    |
//! | `serve`   | `Serve`                |
//! | `config`  | `Config`               |

pub mod build;
pub mod chat;
pub mod config;
pub mod serve;
pub mod stages;

pub use build::cmd_build;
pub use chat::cmd_chat;
pub use config::cmd_config;
pub use serve::cmd_serve;
pub use stages::cmd_stages;
