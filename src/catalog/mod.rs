//! Demo parts catalog: an offline compatibility service.
//!
//! Answers the same `GET /api/parts/{stage}` queries the configurator sends,
//! from a small static catalog, so a build can be walked end to end without
//! the real service.
//!
//! ```text
//! ┌──────────────┐  HTTP  ┌───────────────────────────────────────────┐
//! │ buildmate    │ ─────> │  server.rs  (Router, ServeConfig, CORS)   │
//! │ build / curl │ <───── │    └─ api.rs  (handlers, ApiError, rules) │
//! └──────────────┘        │         └─ data.rs  (static entries)      │
//!                         └───────────────────────────────────────────┘
//! ```
//!
//! | Module   | Responsibility                                          |
//! |----------|---------------------------------------------------------|
//! | `data`   | `CatalogEntry` records, three per stage                 |
//! | `api`    | Route handlers, parameter checks, socket/wattage rules  |
//! | `server` | Router assembly, bind address, graceful shutdown        |

pub mod api;
pub mod data;
pub mod server;

pub use api::{ApiError, compatible_parts};
pub use data::CatalogEntry;
pub use server::{ServeConfig, build_router, start_server};
