// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Parsing of the node's `help` output into browsable sections and arguments.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::CoreApi;
use crate::errors::ExplorerError;
use crate::rpc::NodeRpc;

/// `N. "name" (type, constraint, ...) description`
static ARGUMENT_LINE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r#"^([0-9]+)\.\s*"?(\w+)"?\s*\(([^,)]*),?\s*([^,)]*),?\s*([^,)]*),?\s*([^,)]*)?\s*\)\s*(.+)?$"#,
    )
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpMethod {
    pub name: String,
    /// The full synopsis line
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpSection {
    pub name: String,
    pub methods: Vec<HelpMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpArgument {
    pub name: String,
    /// Type and constraints from the parenthesized list, e.g. `string`, `required`
    pub properties: Vec<String>,
    pub description: Option<String>,
    /// Continuation lines following the numbered line
    pub details_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodHelp {
    /// The unparsed help text
    pub string: String,
    pub args: Vec<HelpArgument>,
}

/// Splits `help` output into sections.
///
/// A line starting with `==` opens a section (`== Blockchain ==`); every other
/// non-blank line is a method synopsis whose first word is the method name.
/// Synopsis lines before the first section header are ignored.
pub fn parse_help(text: &str) -> Vec<HelpSection> {
    let mut sections: Vec<HelpSection> = Vec::new();

    for line in text.lines() {
        if let Some(header) = line.strip_prefix("==") {
            let name = header.strip_suffix("==").unwrap_or(header).trim();
            sections.push(HelpSection {
                name: name.to_string(),
                methods: Vec::new(),
            });
            continue;
        }

        let content = line.trim();
        if content.is_empty() {
            continue;
        }
        if let Some(section) = sections.last_mut() {
            let name = content.split(' ').next().unwrap_or(content);
            section.methods.push(HelpMethod {
                name: name.to_string(),
                content: content.to_string(),
            });
        }
    }

    sections
}

/// Extracts the numbered argument list following the `Arguments:` heading of
/// a `help <method>` text.
pub fn parse_method_help(text: &str) -> Result<MethodHelp, ExplorerError> {
    let pattern = ARGUMENT_LINE
        .as_ref()
        .map_err(|e| ExplorerError::invalid_argument(format!("argument pattern: {e}")))?;

    let mut argument_lines = Vec::new();
    let mut in_arguments = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            in_arguments = false;
        }
        if in_arguments {
            argument_lines.push(line);
        }
        if trimmed == "Arguments:" || trimmed == "Arguments" {
            in_arguments = true;
        }
    }

    let mut args: Vec<HelpArgument> = Vec::new();
    for line in argument_lines {
        match pattern.captures(line) {
            Some(captures) => {
                let group = |i: usize| {
                    captures
                        .get(i)
                        .map(|m| m.as_str())
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                };
                args.push(HelpArgument {
                    name: group(2).unwrap_or_default(),
                    properties: (3..=6).filter_map(group).collect(),
                    description: group(7),
                    details_lines: Vec::new(),
                });
            }
            None => {
                if let Some(last) = args.last_mut() {
                    last.details_lines.push(line.to_string());
                }
            }
        }
    }

    Ok(MethodHelp {
        string: text.to_string(),
        args,
    })
}

impl<R: NodeRpc> CoreApi<R> {
    /// Node RPC methods grouped by help section.
    pub async fn get_help(&self) -> Result<Vec<HelpSection>, ExplorerError> {
        let text = self.get_help_text().await?;
        Ok(parse_help(&text))
    }

    /// Parsed help for one RPC method.
    pub async fn get_rpc_method_help(&self, method: &str) -> Result<MethodHelp, ExplorerError> {
        let text = self.get_rpc_method_help_text(method).await?;
        parse_method_help(&text)
    }
}
