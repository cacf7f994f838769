//! Stable rule identifiers.
//!
//! Rule ids are dotted namespaces: the first segment names the owning
//! category (`files`, `schema`, `layout`, `lang`, `pkg`), the rest names the
//! individual rule. Ids never change once published; downstream consumers key
//! suppressions and trend lines on them.

// Required files (rhodium preset)
pub const RULE_FILES_README: &str = "files.readme";
pub const RULE_FILES_LICENSE: &str = "files.license";
pub const RULE_FILES_SECURITY: &str = "files.security_policy";
pub const RULE_FILES_CONTRIBUTING: &str = "files.contributing";
pub const RULE_FILES_CODE_OF_CONDUCT: &str = "files.code_of_conduct";
pub const RULE_FILES_ASSISTANT_GUIDE: &str = "files.assistant_guide";
pub const RULE_FILES_STATE_DOC: &str = "files.state_document";
pub const RULE_FILES_META_DOC: &str = "files.meta_document";
pub const RULE_FILES_ECOSYSTEM_DOC: &str = "files.ecosystem_document";

// Structured documents
pub const RULE_SCHEMA_PARSE: &str = "schema.parse_error";
pub const RULE_SCHEMA_KIND: &str = "schema.document_kind";
pub const RULE_SCHEMA_MISSING_KEY: &str = "schema.missing_key";
pub const RULE_SCHEMA_KEY_TYPE: &str = "schema.key_type";
pub const RULE_SCHEMA_VERSION: &str = "schema.version_format";

// Directory layout (rhodium preset)
pub const RULE_LAYOUT_WORKFLOWS_DIR: &str = "layout.workflows_dir";
pub const RULE_LAYOUT_WORKFLOW_COUNT: &str = "layout.workflow_count";
pub const RULE_LAYOUT_WORKFLOW_EXTENSION: &str = "layout.workflow_extension";
pub const RULE_LAYOUT_NO_NODE_MODULES: &str = "layout.no_node_modules";
pub const RULE_LAYOUT_NO_VENDOR: &str = "layout.no_vendor";

// Language policy / banned package managers: one rule per banned tag.
pub const RULE_PREFIX_LANG: &str = "lang.banned.";
pub const RULE_PREFIX_PKG: &str = "pkg.banned.";

pub fn banned_language_rule_id(tag: &str) -> String {
    format!("{RULE_PREFIX_LANG}{tag}")
}

pub fn banned_manager_rule_id(tag: &str) -> String {
    format!("{RULE_PREFIX_PKG}{tag}")
}
