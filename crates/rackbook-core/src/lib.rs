//! Session and data layer between `rackbook-api` and UI consumers (CLI / TUI).
//!
//! This crate owns the business logic for the rackbook workspace:
//!
//! - **[`Workspace`]** — Central facade wrapping the API client and the
//!   optional signed-in [`Session`]. Reads are anonymous; writes are gated
//!   on a session with editor rights before any network traffic happens.
//!
//! - **[`Session`]** — Bearer token plus the [`UserProfile`](model::UserProfile)
//!   it belongs to. The two travel together by construction, so a present
//!   session always knows who it is.
//!
//! - **[`WorkspaceConfig`]** — Runtime connection settings (URL, TLS,
//!   timeout). Built by the CLI/TUI from their config layers; core never
//!   reads config files itself.
//!
//! - **[`CoreError`]** — User-facing error type. Raw HTTP and JSON
//!   failures from `rackbook-api` are translated into domain variants.

pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod workspace;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{TlsVerification, WorkspaceConfig};
pub use error::CoreError;
pub use session::Session;
pub use workspace::Workspace;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Company,
    CompanyId,
    Datacenter,
    DatacenterId,
    Document,
    DocumentId,
    DocumentKind,
    Incident,
    IncidentId,
    InventoryTree,
    NewDocument,
    NodeGroup,
    ObjectDetail,
    ObjectId,
    ObjectKind,
    ObjectRecord,
    ObjectStatus,
    Page,
    PageId,
    Relation,
    RelationId,
    Role,
    Section,
    TreeNode,
    UserId,
    UserProfile,
};
