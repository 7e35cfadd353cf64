use std::path::Path;

use tracing::{info, warn};

use crate::io::mapping_read::{self, EmailTable};

/// Domain used by the original deployment; kept as the default and
/// overridable per run.
pub const DEFAULT_DOMAIN: &str = "epfl.ch";

/// Local part of the sentinel address generated for empty names.
const UNKNOWN_LOCAL_PART: &str = "unknown";

/// Resolves member display names to email addresses.
///
/// Resolution is an ordered chain of total strategies: exact-case table
/// lookup, then case-folded table lookup, then deterministic generation.
/// Generation never fails, so every name resolves to some address.
#[derive(Debug, Clone)]
pub struct EmailResolver {
    table: EmailTable,
    domain: String,
}

impl EmailResolver {
    /// Creates a resolver with no mapping table; every name is generated.
    pub fn new(domain: impl Into<String>) -> Self {
        Self::with_table(EmailTable::new(), domain)
    }

    /// Creates a resolver backed by an already-loaded mapping table.
    pub fn with_table(table: EmailTable, domain: impl Into<String>) -> Self {
        Self {
            table,
            domain: domain.into(),
        }
    }

    /// Loads the mapping workbook when a path is given. A missing or
    /// unreadable workbook is non-fatal: the run proceeds with generation
    /// only and the failure is logged.
    pub fn from_mapping_file(path: Option<&Path>, domain: &str) -> Self {
        match path {
            None => {
                info!("no email mapping file provided; addresses will be generated from names");
                Self::new(domain)
            }
            Some(path) => match mapping_read::read_mapping(path) {
                Ok(table) => {
                    info!(
                        entries = table.len() / 2,
                        path = %path.display(),
                        "loaded email mapping"
                    );
                    Self::with_table(table, domain)
                }
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        %error,
                        "failed to load email mapping; falling back to generated addresses"
                    );
                    Self::new(domain)
                }
            },
        }
    }

    /// Resolves a display name to an email address. Total: falls through to
    /// [`EmailResolver::generate`] when the table has no entry.
    pub fn resolve(&self, name: &str) -> String {
        if let Some(email) = self.table.get(name) {
            return email.clone();
        }
        if let Some(email) = self.table.get(&name.to_lowercase()) {
            return email.clone();
        }
        self.generate(name)
    }

    /// Generates a deterministic address from a display name: the first and
    /// last whitespace-separated tokens, case-folded, joined by a dot.
    /// Middle tokens are ignored. An empty name yields the sentinel address.
    pub fn generate(&self, name: &str) -> String {
        let tokens: Vec<&str> = name.split_whitespace().collect();
        match tokens.as_slice() {
            [] => format!("{UNKNOWN_LOCAL_PART}@{}", self.domain),
            [only] => format!("{}@{}", only.to_lowercase(), self.domain),
            [first, .., last] => {
                format!("{}.{}@{}", first.to_lowercase(), last.to_lowercase(), self.domain)
            }
        }
    }
}
