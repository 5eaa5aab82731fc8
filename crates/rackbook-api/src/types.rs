//! Wire types for the Rackbook HTTP API.
//!
//! All types match the JSON payloads served under `/api/`. The backend
//! emits snake_case field names, so renaming is only needed for `type`
//! fields (a Rust keyword). Timestamps arrive as naive ISO 8601 strings
//! without an offset.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

/// Identifier of a company (top grouping level of the tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub i64);

/// Identifier of a datacenter within a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatacenterId(pub i64);

/// Identifier of an inventory object (service, server, or network gear).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub i64);

/// Identifier of a runbook page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub i64);

/// Identifier of a relation between two objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationId(pub i64);

/// Identifier of an attached document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

/// Identifier of a recorded incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(pub i64);

/// Identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

macro_rules! impl_id_traits {
    ($name:ident) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

impl_id_traits!(CompanyId);
impl_id_traits!(DatacenterId);
impl_id_traits!(ObjectId);
impl_id_traits!(PageId);
impl_id_traits!(RelationId);
impl_id_traits!(DocumentId);
impl_id_traits!(IncidentId);
impl_id_traits!(UserId);

// ── Users & roles ────────────────────────────────────────────────────

/// Access role of a user account.
///
/// `admin` and `editor` may save pages and upload documents;
/// `viewer` is read-only. An absent role falls back to `viewer`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    #[default]
    Viewer,
}

impl Role {
    pub fn can_edit(self) -> bool {
        matches!(self, Self::Admin | Self::Editor)
    }
}

/// Authenticated user profile, from `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Role,
}

impl UserProfile {
    pub fn can_edit(&self) -> bool {
        self.role.can_edit()
    }

    /// Preferred display name: full name when set, username otherwise.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

/// Response of `POST /api/auth/login`.
///
/// `role` and `full_name` ride along with the token so clients can show
/// the signed-in identity without a second round-trip; both are lenient
/// because older backends only send the bare token.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub full_name: String,
}

// ── Inventory objects ────────────────────────────────────────────────

/// Kind of an inventory object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ObjectKind {
    Service,
    Server,
    Network,
}

/// Health status of an object.
///
/// The backend stores free-form strings; anything other than the three
/// well-known values maps to `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStatus {
    Ok,
    Warn,
    Bad,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ObjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warn => "warn",
            Self::Bad => "bad",
            Self::Unknown => "unknown",
        }
    }
}

/// Full object record, as embedded in [`ObjectDetail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: ObjectId,
    pub dc_id: DatacenterId,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub name: String,
    #[serde(default)]
    pub status: ObjectStatus,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub fqdn: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ObjectRecord {
    /// Split the comma-separated tag string into trimmed, non-empty tags.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

// ── Inventory tree ───────────────────────────────────────────────────

/// Leaf entry of the inventory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: ObjectId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    #[serde(default)]
    pub status: ObjectStatus,
    #[serde(default)]
    pub ip: Option<String>,
}

/// The three fixed groups each datacenter is divided into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeGroup {
    Services,
    Servers,
    Network,
}

impl NodeGroup {
    pub const ALL: [NodeGroup; 3] = [Self::Services, Self::Servers, Self::Network];

    pub fn label(self) -> &'static str {
        match self {
            Self::Services => "Services",
            Self::Servers => "Servers",
            Self::Network => "Network",
        }
    }
}

/// One datacenter with its three object groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datacenter {
    pub id: DatacenterId,
    pub name: String,
    #[serde(default)]
    pub services: Vec<TreeNode>,
    #[serde(default)]
    pub servers: Vec<TreeNode>,
    #[serde(default)]
    pub network: Vec<TreeNode>,
}

impl Datacenter {
    /// The three groups in display order, with their labels.
    pub fn groups(&self) -> [(NodeGroup, &[TreeNode]); 3] {
        [
            (NodeGroup::Services, self.services.as_slice()),
            (NodeGroup::Servers, self.servers.as_slice()),
            (NodeGroup::Network, self.network.as_slice()),
        ]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.services
            .iter()
            .chain(self.servers.iter())
            .chain(self.network.iter())
    }
}

/// One company with its datacenters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default, rename = "dcs")]
    pub datacenters: Vec<Datacenter>,
}

/// The full inventory tree, from `GET /api/tree`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryTree {
    #[serde(default)]
    pub companies: Vec<Company>,
}

impl InventoryTree {
    /// Iterate over every leaf node in the tree.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.companies
            .iter()
            .flat_map(|c| c.datacenters.iter())
            .flat_map(Datacenter::nodes)
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Find the leaf with the given id.
    pub fn find(&self, id: ObjectId) -> Option<&TreeNode> {
        self.nodes().find(|n| n.id == id)
    }

    /// Locate the (company index, datacenter index) holding the given id.
    pub fn locate(&self, id: ObjectId) -> Option<(usize, usize)> {
        self.companies.iter().enumerate().find_map(|(ci, company)| {
            company
                .datacenters
                .iter()
                .position(|dc| dc.nodes().any(|n| n.id == id))
                .map(|di| (ci, di))
        })
    }
}

// ── Runbook pages ────────────────────────────────────────────────────

/// The six fixed runbook sections every object carries.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    #[default]
    Overview,
    Links,
    Arch,
    Net,
    Inc,
    Docs,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Self::Overview,
        Self::Links,
        Self::Arch,
        Self::Net,
        Self::Inc,
        Self::Docs,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Links => "Links",
            Self::Arch => "Architecture",
            Self::Net => "Network",
            Self::Inc => "Incidents",
            Self::Docs => "Documents",
        }
    }

    /// Next section in display order, wrapping around.
    pub fn next(self) -> Section {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous section in display order, wrapping around.
    pub fn prev(self) -> Section {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// One markdown runbook page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub section: Section,
    pub content_md: String,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_by: Option<UserId>,
}

// ── Relations ────────────────────────────────────────────────────────

/// Directed relation between two objects (`depends_on`, `runs_on`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,
    pub relation_type: String,
    #[serde(default)]
    pub note: String,
    pub src_object_id: ObjectId,
    pub dst_object_id: ObjectId,
}

impl Relation {
    /// The object on the far side of this relation, seen from `from`.
    pub fn other_end(&self, from: ObjectId) -> ObjectId {
        if self.src_object_id == from {
            self.dst_object_id
        } else {
            self.src_object_id
        }
    }

    /// Whether `from` is the source of this relation.
    pub fn is_outgoing(&self, from: ObjectId) -> bool {
        self.src_object_id == from
    }
}

// ── Documents ────────────────────────────────────────────────────────

/// Storage kind of an attached document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Link,
    File,
}

/// Document attached to an object, either an external link or an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub object_id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub kind: DocumentKind,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<NaiveDateTime>,
}

impl Document {
    /// Where the document lives: its URL for links, its server path for files.
    pub fn location(&self) -> Option<&str> {
        match self.kind {
            DocumentKind::Link => self.url.as_deref(),
            DocumentKind::File => self.file_path.as_deref(),
        }
    }
}

/// Payload for `POST /api/objects/{id}/documents`.
///
/// `file` carries (filename, content) and is required for `kind = file`.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub kind: DocumentKind,
    pub url: Option<String>,
    pub file: Option<(String, Vec<u8>)>,
}

// ── Incidents ────────────────────────────────────────────────────────

/// Recorded incident with its postmortem fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: IncidentId,
    pub object_id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub symptom: String,
    #[serde(default)]
    pub cause: String,
    #[serde(default)]
    pub check: String,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

// ── Object detail ────────────────────────────────────────────────────

/// Everything known about one object, from `GET /api/objects/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDetail {
    pub object: ObjectRecord,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

impl ObjectDetail {
    /// The runbook page for the given section, if one exists.
    pub fn page(&self, section: Section) -> Option<&Page> {
        self.pages.iter().find(|p| p.section == section)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn node(id: i64, name: &str) -> TreeNode {
        TreeNode {
            id: ObjectId(id),
            name: name.to_owned(),
            kind: ObjectKind::Server,
            status: ObjectStatus::Ok,
            ip: None,
        }
    }

    fn sample_tree() -> InventoryTree {
        InventoryTree {
            companies: vec![
                Company {
                    id: CompanyId(1),
                    name: "Acme".to_owned(),
                    datacenters: vec![Datacenter {
                        id: DatacenterId(10),
                        name: "FRA-1".to_owned(),
                        services: vec![node(100, "billing")],
                        servers: vec![node(101, "web-01"), node(102, "db-01")],
                        network: vec![],
                    }],
                },
                Company {
                    id: CompanyId(2),
                    name: "Globex".to_owned(),
                    datacenters: vec![Datacenter {
                        id: DatacenterId(20),
                        name: "AMS-1".to_owned(),
                        services: vec![],
                        servers: vec![],
                        network: vec![node(200, "core-sw")],
                    }],
                },
            ],
        }
    }

    #[test]
    fn tree_node_count() {
        assert_eq!(sample_tree().node_count(), 4);
    }

    #[test]
    fn tree_locate_finds_company_and_dc() {
        let tree = sample_tree();
        assert_eq!(tree.locate(ObjectId(102)), Some((0, 0)));
        assert_eq!(tree.locate(ObjectId(200)), Some((1, 0)));
        assert_eq!(tree.locate(ObjectId(999)), None);
    }

    #[test]
    fn tree_find_returns_node() {
        let tree = sample_tree();
        assert_eq!(tree.find(ObjectId(200)).unwrap().name, "core-sw");
        assert!(tree.find(ObjectId(5)).is_none());
    }

    #[test]
    fn section_parse_and_display_round_trip() {
        for section in Section::ALL {
            let token = section.to_string();
            assert_eq!(token.parse::<Section>().unwrap(), section);
        }
    }

    #[test]
    fn section_rejects_unknown_token() {
        assert!("hardware".parse::<Section>().is_err());
    }

    #[test]
    fn section_cycle_wraps() {
        assert_eq!(Section::Docs.next(), Section::Overview);
        assert_eq!(Section::Overview.prev(), Section::Docs);
        assert_eq!(Section::Arch.next(), Section::Net);
    }

    #[test]
    fn role_edit_rights() {
        assert!(Role::Admin.can_edit());
        assert!(Role::Editor.can_edit());
        assert!(!Role::Viewer.can_edit());
    }

    #[test]
    fn unknown_status_deserializes_to_unknown() {
        let node: TreeNode = serde_json::from_str(
            r#"{"id": 7, "name": "edge-fw", "type": "network", "status": "degraded"}"#,
        )
        .unwrap();
        assert_eq!(node.status, ObjectStatus::Unknown);
    }

    #[test]
    fn tree_company_uses_dcs_key() {
        let tree: InventoryTree = serde_json::from_str(
            r#"{"companies": [{"id": 1, "name": "Acme", "dcs": [
                {"id": 2, "name": "FRA-1", "services": [], "servers": [], "network": []}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(tree.companies[0].datacenters.len(), 1);
    }

    #[test]
    fn relation_other_end() {
        let rel = Relation {
            id: RelationId(1),
            relation_type: "depends_on".to_owned(),
            note: String::new(),
            src_object_id: ObjectId(1),
            dst_object_id: ObjectId(2),
        };
        assert_eq!(rel.other_end(ObjectId(1)), ObjectId(2));
        assert_eq!(rel.other_end(ObjectId(2)), ObjectId(1));
        assert!(rel.is_outgoing(ObjectId(1)));
    }

    #[test]
    fn tag_list_splits_and_trims() {
        let record = ObjectRecord {
            id: ObjectId(1),
            dc_id: DatacenterId(1),
            kind: ObjectKind::Service,
            name: "billing".to_owned(),
            status: ObjectStatus::Ok,
            ip: None,
            fqdn: None,
            tags: Some("prod, critical,,payments ".to_owned()),
            description: None,
        };
        assert_eq!(record.tag_list(), vec!["prod", "critical", "payments"]);
    }

    #[test]
    fn login_response_tolerates_bare_token() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "bearer"}"#).unwrap();
        assert_eq!(resp.role, Role::Viewer);
        assert!(resp.full_name.is_empty());
    }

    #[test]
    fn display_name_prefers_full_name() {
        let mut user = UserProfile {
            id: UserId(1),
            username: "jdoe".to_owned(),
            full_name: "Jane Doe".to_owned(),
            role: Role::Editor,
        };
        assert_eq!(user.display_name(), "Jane Doe");
        user.full_name.clear();
        assert_eq!(user.display_name(), "jdoe");
    }
}
