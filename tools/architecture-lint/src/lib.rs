//! Repo-local lint that keeps the Pawprint backend hexagonal.
//!
//! The backend is split into `domain` (entities, services and ports),
//! `inbound` (HTTP handlers), `middleware` (request plumbing shared by the
//! HTTP stack) and `outbound` (Diesel, the in-memory store, credential and
//! upload adapters). Each layer may only reach the layers and crates listed
//! in [`Layer::rules`]; anything else is reported as a [`Violation`].
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

/// Name under which integration tests and binaries import the backend.
const CRATE_NAME: &str = "pawprint";

const WEB_CRATES: &[&str] = &[
    "actix",
    "actix_http",
    "actix_multipart",
    "actix_service",
    "actix_web",
    "utoipa_swagger_ui",
];
const STORAGE_CRATES: &[&str] = &[
    "bb8",
    "diesel",
    "diesel_async",
    "diesel_migrations",
    "postgres",
];
const ADAPTER_CRATES: &[&str] = &["argon2", "cap_std", "jsonwebtoken"];

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: Utf8PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    Io(io::Error),
    /// A path was not valid UTF-8 or could not be parsed as Rust.
    Parse { file: Utf8PathBuf, message: String },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error while linting architecture: {err}"),
            Self::Parse { file, message } => {
                write!(f, "cannot lint {file}: {message}")
            }
            Self::Violations(violations) => {
                writeln!(f, "Architecture boundary violations:")?;
                for violation in violations {
                    writeln!(f, "- {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: Utf8PathBuf,
    pub contents: String,
}

impl LintSource {
    /// Convenience constructor used by tests.
    pub fn new(file: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            contents: contents.into(),
        }
    }
}

/// Architectural layer, inferred from the first directory under `src/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Domain,
    Inbound,
    Middleware,
    Outbound,
}

/// What one layer must not touch.
struct Rules {
    modules: &'static [&'static str],
    crate_groups: &'static [&'static [&'static str]],
}

impl Layer {
    const ALL: [Self; 4] = [Self::Domain, Self::Inbound, Self::Middleware, Self::Outbound];

    fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Middleware => "middleware",
            Self::Outbound => "outbound",
        }
    }

    fn from_path(relative: &Utf8Path) -> Option<Self> {
        let first = relative.components().next()?.as_str();
        let first = first.strip_suffix(".rs").unwrap_or(first);
        Self::ALL.into_iter().find(|layer| layer.dir() == first)
    }

    fn rules(self) -> Rules {
        match self {
            Self::Domain => Rules {
                modules: &["inbound", "middleware", "outbound"],
                crate_groups: &[WEB_CRATES, STORAGE_CRATES, ADAPTER_CRATES],
            },
            Self::Inbound => Rules {
                modules: &["outbound"],
                crate_groups: &[STORAGE_CRATES, ADAPTER_CRATES],
            },
            Self::Middleware => Rules {
                modules: &["inbound", "outbound"],
                crate_groups: &[STORAGE_CRATES, ADAPTER_CRATES],
            },
            Self::Outbound => Rules {
                modules: &["inbound", "middleware"],
                crate_groups: &[WEB_CRATES],
            },
        }
    }

    fn forbids_module(self, root: &str) -> bool {
        self.rules().modules.contains(&root)
    }

    fn forbids_crate(self, root: &str) -> bool {
        self.rules()
            .crate_groups
            .iter()
            .any(|group| group.contains(&root))
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// Lint the backend crate sources on disk.
///
/// `backend_dir` must be the `backend/` directory at the repository root.
pub fn lint_backend_sources(backend_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src = Dir::open_ambient_dir(backend_dir.join("src"), ambient_authority())?;
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let module_file = format!("{}.rs", layer.dir());
        if src.is_file(&module_file) {
            sources.push(read_source(&src, Utf8PathBuf::from(module_file))?);
        }
        if src.is_dir(layer.dir()) {
            collect_sources(&src, Utf8PathBuf::from(layer.dir()), &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint the provided Rust sources.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::from_path(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is outside the domain, inbound, middleware and outbound layers"
                .to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check_file(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

fn check_file(file: &Utf8Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let mut paths = PathCollector::default();
    paths.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &paths.seen {
        match classify(segments) {
            Some(Reference::Module(root)) if layer.forbids_module(root) => {
                messages.insert(format!("{layer} module must not depend on crate::{root}"));
            }
            Some(Reference::Crate(root)) if layer.forbids_crate(root) => {
                messages.insert(format!(
                    "{layer} module must not depend on external crate `{root}`"
                ));
            }
            _ => {}
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_owned(),
            message,
        })
        .collect()
}

/// What a path's leading segments point at.
#[derive(Debug, PartialEq, Eq)]
enum Reference<'a> {
    /// A top-level module of the backend crate.
    Module(&'a str),
    /// Another crate.
    Crate(&'a str),
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn is_layer_root(segment: &str) -> bool {
    Layer::ALL.iter().any(|layer| layer.dir() == segment)
}

fn classify(segments: &[String]) -> Option<Reference<'_>> {
    let first = segments.first()?.as_str();
    if is_layer_root(first) {
        return Some(Reference::Module(first));
    }
    if is_relative(first) {
        let module = segments.iter().find(|segment| !is_relative(segment))?;
        return Some(Reference::Module(module.as_str()));
    }
    if first == CRATE_NAME {
        return segments
            .get(1)
            .map(|segment| Reference::Module(segment.as_str()));
    }
    Some(Reference::Crate(first))
}

/// Every path mentioned in a file, including expanded `use` trees.
#[derive(Default)]
struct PathCollector {
    seen: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.seen.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.seen.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.seen.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.seen.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn read_source(src: &Dir, file: Utf8PathBuf) -> Result<LintSource, ArchitectureLintError> {
    let contents = src.read_to_string(&file)?;
    Ok(LintSource { file, contents })
}

fn collect_sources(
    src: &Dir,
    dir: Utf8PathBuf,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in src.read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            return Err(ArchitectureLintError::Parse {
                file: dir.clone(),
                message: format!("non UTF-8 entry {name:?}"),
            });
        };
        let path = dir.join(name);
        if entry.file_type()?.is_dir() {
            collect_sources(src, path, sources)?;
        } else if path.extension() == Some("rs") {
            sources.push(read_source(src, path)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
