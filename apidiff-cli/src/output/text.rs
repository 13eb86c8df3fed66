//! Markdown changelog report.
//!
//! Used as-is for `--format text` and rendered to HTML for `--format html`.

use std::fmt::{self, Display, Write};

use apidiff_core::diff::{CollectionDiff, OperationDiff, ParametersDiff, PathDiff, SecurityDiff};
use apidiff_core::summary::Section;
use apidiff_core::{classify, Diff, Empty, Summary};

const TITLE: &str = "# API Changelog";

/// Component sections reported as a count table.
const COMPONENT_SECTIONS: [Section; 6] = [
    Section::Schemas,
    Section::Parameters,
    Section::Headers,
    Section::RequestBodies,
    Section::Responses,
    Section::SecuritySchemes,
];

/// Markdown text formatter
pub struct TextOutput;

impl TextOutput {
    /// Changelog for a full diff.
    pub fn diff(diff: &Diff) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{}\n", TITLE)?;

        if diff.is_empty() {
            writeln!(out, "No changes.")?;
            return Ok(out);
        }

        let changes = classify(diff);
        if !changes.is_empty() {
            writeln!(out, "## Breaking Changes: {}\n", changes.len())?;
            for change in &changes {
                writeln!(out, "- `{}`: {}", change.location, change.message)?;
            }
            writeln!(out)?;
        }

        if let Some(version) = diff.info_diff.as_ref().and_then(|info| info.version_diff.as_ref()) {
            writeln!(out, "## Version\n\n`{}` → `{}`\n", version.from, version.to)?;
        }

        if let Some(paths) = &diff.paths_diff {
            keys(&mut out, "New Paths", &paths.added)?;
            keys(&mut out, "Deleted Paths", &paths.deleted)?;
            if !paths.modified.is_empty() {
                writeln!(out, "## Modified Paths: {}\n", paths.modified.len())?;
                for (path, path_diff) in &paths.modified {
                    modified_path(&mut out, path, path_diff)?;
                }
            }
        }

        if let Some(security) = &diff.security_diff {
            security_section(&mut out, security)?;
        }
        if let Some(servers) = &diff.servers_diff {
            collection(&mut out, "Servers", servers)?;
        }
        if let Some(tags) = &diff.tags_diff {
            collection(&mut out, "Tags", tags)?;
        }

        let summary = diff.summary();
        let components: Vec<_> = COMPONENT_SECTIONS
            .iter()
            .filter_map(|section| summary.details.get(section).map(|details| (section, details)))
            .collect();
        if !components.is_empty() {
            writeln!(out, "## Components\n")?;
            table_header(&mut out)?;
            for (section, details) in components {
                writeln!(
                    out,
                    "| {} | {} | {} | {} |",
                    section, details.added, details.deleted, details.modified
                )?;
            }
            writeln!(out)?;
        }

        Ok(out)
    }

    /// Count table for a summary.
    pub fn summary(summary: &Summary) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{} Summary\n", TITLE)?;
        writeln!(out, "- Changes: {}", yes_no(summary.diff))?;
        writeln!(out, "- Breaking changes: {}\n", yes_no(summary.breaking))?;

        if summary.details.is_empty() {
            writeln!(out, "No changes.")?;
            return Ok(out);
        }

        table_header(&mut out)?;
        for (section, details) in &summary.details {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                section, details.added, details.deleted, details.modified
            )?;
        }
        Ok(out)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn table_header(out: &mut String) -> fmt::Result {
    writeln!(out, "| Section | Added | Deleted | Modified |")?;
    writeln!(out, "|---|---:|---:|---:|")
}

fn keys<K: Display>(out: &mut String, heading: &str, keys: &[K]) -> fmt::Result {
    if keys.is_empty() {
        return Ok(());
    }
    writeln!(out, "## {}: {}\n", heading, keys.len())?;
    for key in keys {
        writeln!(out, "- `{}`", key)?;
    }
    writeln!(out)
}

fn collection<D>(out: &mut String, heading: &str, diff: &CollectionDiff<String, D>) -> fmt::Result {
    writeln!(out, "## {}\n", heading)?;
    for key in &diff.added {
        writeln!(out, "- Added `{}`", key)?;
    }
    for key in &diff.deleted {
        writeln!(out, "- Deleted `{}`", key)?;
    }
    for key in diff.modified.keys() {
        writeln!(out, "- Modified `{}`", key)?;
    }
    writeln!(out)
}

fn security_section(out: &mut String, security: &SecurityDiff) -> fmt::Result {
    writeln!(out, "## Security Requirements\n")?;
    for line in security_lines(security) {
        writeln!(out, "- {}", line)?;
    }
    writeln!(out)
}

fn security_lines(security: &SecurityDiff) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(required) = &security.required_diff {
        lines.push(if required.to {
            "authentication is now required".to_string()
        } else {
            "authentication is now optional".to_string()
        });
    }
    lines.extend(security.added.iter().map(|id| format!("added requirement `{}`", id)));
    lines.extend(security.deleted.iter().map(|id| format!("deleted requirement `{}`", id)));
    for (id, scopes) in &security.modified {
        for (scheme, change) in &scopes.0 {
            if !change.added.is_empty() {
                lines.push(format!(
                    "`{}`: scopes added to `{}`: {}",
                    id,
                    scheme,
                    change.added.join(", ")
                ));
            }
            if !change.deleted.is_empty() {
                lines.push(format!(
                    "`{}`: scopes removed from `{}`: {}",
                    id,
                    scheme,
                    change.deleted.join(", ")
                ));
            }
        }
    }
    lines
}

fn modified_path(out: &mut String, path: &str, diff: &PathDiff) -> fmt::Result {
    writeln!(out, "### `{}`\n", path)?;
    if diff.summary_diff.is_some() || diff.description_diff.is_some() {
        writeln!(out, "- Description changed")?;
    }
    if let Some(params) = &diff.parameters_diff {
        for line in parameter_lines(params) {
            writeln!(out, "- Path-level {}", line)?;
        }
    }
    if diff.servers_diff.is_some() {
        writeln!(out, "- Servers changed")?;
    }
    if diff.extensions_diff.is_some() {
        writeln!(out, "- Extensions changed")?;
    }
    if let Some(operations) = &diff.operations_diff {
        for method in &operations.added {
            writeln!(out, "- New operation `{} {}`", method, path)?;
        }
        for method in &operations.deleted {
            writeln!(out, "- Deleted operation `{} {}`", method, path)?;
        }
        for (method, operation) in &operations.modified {
            writeln!(out, "- Modified operation `{} {}`", method, path)?;
            for line in operation_lines(operation) {
                writeln!(out, "  - {}", line)?;
            }
        }
    }
    writeln!(out)
}

fn operation_lines(operation: &OperationDiff) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(deprecated) = &operation.deprecated_diff {
        let state = if deprecated.to { "deprecated" } else { "no longer deprecated" };
        lines.push(state.to_string());
    }
    if operation.summary_diff.is_some() || operation.description_diff.is_some() {
        lines.push("description changed".to_string());
    }
    if let Some(id) = &operation.operation_id_diff {
        lines.push(format!(
            "operationId changed from `{}` to `{}`",
            id.from.as_deref().unwrap_or("none"),
            id.to.as_deref().unwrap_or("none")
        ));
    }
    if let Some(tags) = &operation.tags_diff {
        lines.extend(tags.added.iter().map(|tag| format!("tag `{}` added", tag)));
        lines.extend(tags.deleted.iter().map(|tag| format!("tag `{}` removed", tag)));
    }
    if let Some(params) = &operation.parameters_diff {
        lines.extend(parameter_lines(params));
    }
    if let Some(body) = &operation.request_body_diff {
        let change = if body.body_added {
            "request body added"
        } else if body.body_deleted {
            "request body deleted"
        } else {
            "request body changed"
        };
        lines.push(change.to_string());
    }
    if let Some(responses) = &operation.responses_diff {
        lines.extend(responses.added.iter().map(|code| format!("response `{}` added", code)));
        lines.extend(responses.deleted.iter().map(|code| format!("response `{}` deleted", code)));
        lines.extend(responses.modified.keys().map(|code| format!("response `{}` changed", code)));
    }
    if let Some(security) = &operation.security_diff {
        lines.extend(security_lines(security).into_iter().map(|line| format!("security: {}", line)));
    }
    if operation.servers_diff.is_some() {
        lines.push("servers changed".to_string());
    }
    if operation.external_docs_diff.is_some() {
        lines.push("external docs changed".to_string());
    }
    if operation.extensions_diff.is_some() {
        lines.push("extensions changed".to_string());
    }
    lines
}

fn parameter_lines(params: &ParametersDiff) -> Vec<String> {
    let mut lines = Vec::new();
    for (location, names) in &params.added {
        let required = params.added_required.get(location);
        for name in names {
            let is_required = required.is_some_and(|required| required.contains(name));
            lines.push(format!(
                "{}{} parameter `{}` added",
                if is_required { "required " } else { "" },
                location,
                name
            ));
        }
    }
    for (location, names) in &params.deleted {
        lines.extend(names.iter().map(|name| format!("{} parameter `{}` deleted", location, name)));
    }
    for (location, changed) in &params.modified {
        lines.extend(changed.keys().map(|name| format!("{} parameter `{}` changed", location, name)));
    }
    lines
}
