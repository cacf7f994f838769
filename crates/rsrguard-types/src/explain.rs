//! Explain registry for rules.
//!
//! Maps stable rule ids to human-readable explanations with remediation
//! guidance. Tag-derived ids (`lang.banned.*`, `pkg.banned.*`) resolve through
//! their prefix so new policy tags get guidance without a registry edit.

use crate::ids;

/// Explanation entry for a rule.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule checks and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after examples.
    pub examples: ExamplePair,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// A tree or document that would trigger a violation.
    pub before: &'static str,
    /// A tree or document that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule id.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    if identifier.starts_with(ids::RULE_PREFIX_LANG) {
        return Some(explain_banned_language());
    }
    if identifier.starts_with(ids::RULE_PREFIX_PKG) {
        return Some(explain_banned_manager());
    }

    match identifier {
        ids::RULE_FILES_README => Some(explain_readme()),
        ids::RULE_FILES_LICENSE => Some(explain_license()),
        ids::RULE_FILES_STATE_DOC | ids::RULE_FILES_META_DOC | ids::RULE_FILES_ECOSYSTEM_DOC => {
            Some(explain_metadata_documents())
        }
        ids::RULE_SCHEMA_PARSE => Some(explain_parse_error()),
        ids::RULE_SCHEMA_MISSING_KEY | ids::RULE_SCHEMA_KIND | ids::RULE_SCHEMA_KEY_TYPE => {
            Some(explain_document_shape())
        }
        ids::RULE_SCHEMA_VERSION => Some(explain_version_format()),
        ids::RULE_LAYOUT_WORKFLOWS_DIR | ids::RULE_LAYOUT_WORKFLOW_COUNT => {
            Some(explain_workflows())
        }
        _ => None,
    }
}

/// List the rule ids with dedicated explanations.
pub fn all_explained_ids() -> &'static [&'static str] {
    &[
        ids::RULE_FILES_README,
        ids::RULE_FILES_LICENSE,
        ids::RULE_FILES_STATE_DOC,
        ids::RULE_SCHEMA_PARSE,
        ids::RULE_SCHEMA_MISSING_KEY,
        ids::RULE_SCHEMA_VERSION,
        ids::RULE_LAYOUT_WORKFLOWS_DIR,
    ]
}

fn explain_readme() -> Explanation {
    Explanation {
        title: "AsciiDoc README",
        description: "\
Every RSR repository carries a top-level `README.adoc`.

The README is the entry point for humans and for fleet bots that surface
repository summaries. The RSR standard settled on AsciiDoc so cross-repo
tooling can rely on a single markup dialect.",
        remediation: "\
Add a `README.adoc` at the repository root. If the repository currently has a
`README.md`, convert it (the content matters more than a mechanical
translation; start from the template repository's skeleton).",
        examples: ExamplePair {
            before: "repo/\n  src/\n  Cargo.toml",
            after: "repo/\n  README.adoc\n  src/\n  Cargo.toml",
        },
    }
}

fn explain_license() -> Explanation {
    Explanation {
        title: "License File",
        description: "\
A `LICENSE.txt` must be present at the repository root.

Without a license file downstream consumers have no usage rights at all, and
the fleet's governance tooling cannot classify the repository.",
        remediation: "\
Add `LICENSE.txt` containing the full license text. RSR-approved licenses:
AGPL-3.0, Apache-2.0, MIT, MPL-2.0, LGPL-3.0.",
        examples: ExamplePair {
            before: "repo/\n  README.adoc",
            after: "repo/\n  README.adoc\n  LICENSE.txt",
        },
    }
}

fn explain_metadata_documents() -> Explanation {
    Explanation {
        title: "RSR Metadata Documents",
        description: "\
RSR repositories declare machine-readable state in three S-expression
documents at the root: `STATE.scm` (project status), `META.scm` (ownership and
provenance), and `ECOSYSTEM.scm` (position in the fleet).

Fleet bots read these documents before doing any deeper analysis; a missing
document blocks the whole verifier tier for the repository.",
        remediation: "\
Copy the document skeletons from the template repository and fill in the
required keys. Each document is a single top-level form:

    (state
      (version \"1.0.0\")
      (status \"active\"))",
        examples: ExamplePair {
            before: "repo/\n  README.adoc",
            after: "repo/\n  README.adoc\n  STATE.scm\n  META.scm\n  ECOSYSTEM.scm",
        },
    }
}

fn explain_parse_error() -> Explanation {
    Explanation {
        title: "Malformed Metadata Document",
        description: "\
A recognized metadata document exists but is not well-formed: unbalanced
parentheses, an unterminated string, or a top-level form that is not a list
headed by the document kind.

A malformed document degrades to this single critical violation for that file;
it never aborts the rest of the scan.",
        remediation: "\
Fix the syntax error at the reported line. The documents are plain
S-expressions; the most common mistakes are a missing closing parenthesis and
an unescaped quote inside a string.",
        examples: ExamplePair {
            before: "(state\n  (version \"1.0.0\"",
            after: "(state\n  (version \"1.0.0\"))",
        },
    }
}

fn explain_document_shape() -> Explanation {
    Explanation {
        title: "Metadata Document Shape",
        description: "\
The document parsed, but its structure does not match the declared shape:
the top-level kind symbol is wrong, a required key is absent, or a key holds
the wrong type of value.

Each failed shape rule is reported separately so one scan surfaces every
problem in the document.",
        remediation: "\
Add the missing keys (one `(key value)` pair per entry) and make sure the
top-level form is headed by the expected kind symbol (`state`, `meta`, or
`ecosystem`).",
        examples: ExamplePair {
            before: "(state\n  (status \"active\"))",
            after: "(state\n  (version \"1.0.0\")\n  (status \"active\"))",
        },
    }
}

fn explain_version_format() -> Explanation {
    Explanation {
        title: "Version Format",
        description: "\
The document's version key must hold a well-formed semantic version string
(`MAJOR.MINOR.PATCH`, optional pre-release/build suffix).

Fleet tooling orders document revisions by this field; a malformed version
makes the repository unsortable.",
        remediation: "\
Set the version key to a semantic version string:

    (version \"1.4.0\")",
        examples: ExamplePair {
            before: "(version \"v1\")",
            after: "(version \"1.0.0\")",
        },
    }
}

fn explain_workflows() -> Explanation {
    Explanation {
        title: "CI Workflows",
        description: "\
RSR repositories run CI through `.github/workflows`. The directory must exist
and contain at least the configured number of workflow files with a
`.yml`/`.yaml` extension.",
        remediation: "\
Create `.github/workflows/` and add at least one workflow, e.g. a `ci.yml`
running the repository's build and test entry points.",
        examples: ExamplePair {
            before: "repo/\n  src/",
            after: "repo/\n  .github/workflows/ci.yml\n  src/",
        },
    }
}

fn explain_banned_language() -> Explanation {
    Explanation {
        title: "Banned Language",
        description: "\
A source file was classified (by exact extension or toolchain-manifest name)
into a language the policy bans.

Classification never inspects file contents, so this rule is precise by
construction: every reported file really does carry a banned extension or
manifest name.",
        remediation: "\
Port the offending sources to an approved language, or remove them. If the
file is vendored or generated and genuinely must stay, the policy owner can
drop the language tag from `banned_languages` in the policy file.",
        examples: ExamplePair {
            before: "repo/\n  main.go\n  go.mod",
            after: "repo/\n  src/main.rs\n  Cargo.toml",
        },
    }
}

fn explain_banned_manager() -> Explanation {
    Explanation {
        title: "Banned Package Manager Artifact",
        description: "\
A lockfile or config artifact of a banned package manager is present
somewhere in the tree.

This rule is independent of language classification: a stray
`package-lock.json` is a violation even in a repository with no JavaScript at
all, because its presence re-introduces the banned toolchain.",
        remediation: "\
Delete the artifact and migrate to the approved toolchain (for the JavaScript
ecosystem the RSR standard uses Deno, which needs no lockfile of this kind).",
        examples: ExamplePair {
            before: "repo/\n  package-lock.json\n  src/",
            after: "repo/\n  deno.json\n  src/",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_rule_id() {
        assert!(lookup_explanation(ids::RULE_FILES_README).is_some());
        assert!(lookup_explanation(ids::RULE_SCHEMA_PARSE).is_some());
        assert!(lookup_explanation(ids::RULE_LAYOUT_WORKFLOWS_DIR).is_some());
    }

    #[test]
    fn lookup_by_tag_prefix() {
        assert!(lookup_explanation("lang.banned.go").is_some());
        assert!(lookup_explanation("pkg.banned.npm").is_some());
        assert!(lookup_explanation("pkg.banned.some_future_manager").is_some());
    }

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup_explanation("unknown.rule").is_none());
        assert!(lookup_explanation("").is_none());
    }

    #[test]
    fn all_explained_ids_resolve() {
        for id in all_explained_ids() {
            assert!(lookup_explanation(id).is_some(), "rule id {id} should resolve");
        }
    }
}
