// ── Domain model ──
//
// The Rackbook API serves the domain model directly: the wire types map
// one-to-one onto what the UIs render, so they are re-exported here
// rather than duplicated into a parallel set of structs.

pub use rackbook_api::types::{
    Company, CompanyId, Datacenter, DatacenterId, Document, DocumentId, DocumentKind, Incident,
    IncidentId, InventoryTree, LoginResponse, NewDocument, NodeGroup, ObjectDetail, ObjectId,
    ObjectKind, ObjectRecord, ObjectStatus, Page, PageId, Relation, RelationId, Role, Section,
    TreeNode, UserId, UserProfile,
};
