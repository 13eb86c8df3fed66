//! Summary reducer: per-section counts of what changed.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::breaking;
use crate::diff::{CollectionDiff, Diff, Empty, SecurityDiff};

/// Top-level areas of a document that a summary reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Paths,
    /// Operations within paths present on both sides.
    Endpoints,
    Security,
    Servers,
    Tags,
    Extensions,
    Schemas,
    Parameters,
    Headers,
    RequestBodies,
    Responses,
    SecuritySchemes,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Paths => "paths",
            Section::Endpoints => "endpoints",
            Section::Security => "security",
            Section::Servers => "servers",
            Section::Tags => "tags",
            Section::Extensions => "extensions",
            Section::Schemas => "schemas",
            Section::Parameters => "parameters",
            Section::Headers => "headers",
            Section::RequestBodies => "request_bodies",
            Section::Responses => "responses",
            Section::SecuritySchemes => "security_schemes",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryDetails {
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
}

impl SummaryDetails {
    fn of<K, D>(diff: &CollectionDiff<K, D>) -> Self {
        SummaryDetails {
            added: diff.added.len(),
            deleted: diff.deleted.len(),
            modified: diff.modified.len(),
        }
    }

    fn is_zero(&self) -> bool {
        *self == SummaryDetails::default()
    }
}

impl std::ops::AddAssign for SummaryDetails {
    fn add_assign(&mut self, other: Self) {
        self.added += other.added;
        self.deleted += other.deleted;
        self.modified += other.modified;
    }
}

/// Aggregate view of a [`Diff`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    /// The documents differ at all.
    pub diff: bool,
    /// At least one of the differences is breaking.
    pub breaking: bool,
    /// Only sections with a non-zero count appear, in [`Section`] order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub details: IndexMap<Section, SummaryDetails>,
}

impl Summary {
    fn record(&mut self, section: Section, details: SummaryDetails) {
        if !details.is_zero() {
            self.details.insert(section, details);
        }
    }

    fn record_collection<K, D>(&mut self, section: Section, diff: Option<&CollectionDiff<K, D>>) {
        if let Some(diff) = diff {
            self.record(section, SummaryDetails::of(diff));
        }
    }
}

fn security_details(diff: &SecurityDiff) -> SummaryDetails {
    SummaryDetails {
        added: diff.added.len(),
        deleted: diff.deleted.len(),
        modified: diff.modified.len(),
    }
}

impl Diff {
    /// Reduce the diff to per-section counts.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            diff: !self.is_empty(),
            breaking: breaking::is_breaking(self),
            details: IndexMap::new(),
        };

        summary.record_collection(Section::Paths, self.paths_diff.as_ref());

        let mut endpoints = SummaryDetails::default();
        for path in self.paths_diff.iter().flat_map(|paths| paths.modified.values()) {
            if let Some(operations) = &path.operations_diff {
                endpoints += SummaryDetails::of(operations);
            }
        }
        summary.record(Section::Endpoints, endpoints);

        if let Some(security) = &self.security_diff {
            summary.record(Section::Security, security_details(security));
        }
        summary.record_collection(Section::Servers, self.servers_diff.as_ref());
        summary.record_collection(Section::Tags, self.tags_diff.as_ref());
        summary.record_collection(Section::Extensions, self.extensions_diff.as_ref());

        if let Some(components) = &self.components_diff {
            summary.record_collection(Section::Schemas, components.schemas_diff.as_ref());
            summary.record_collection(Section::Parameters, components.parameters_diff.as_ref());
            summary.record_collection(Section::Headers, components.headers_diff.as_ref());
            summary
                .record_collection(Section::RequestBodies, components.request_bodies_diff.as_ref());
            summary.record_collection(Section::Responses, components.responses_diff.as_ref());
            summary.record_collection(
                Section::SecuritySchemes,
                components.security_schemes_diff.as_ref(),
            );
        }

        summary
    }
}
