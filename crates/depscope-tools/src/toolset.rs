//! Toolset grouping.
//!
//! Tools are organised into named toolsets that can be enabled one by one.
//! A group in read-only mode only ever exposes read tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use depscope_core::{Tool, Translator};
use depscope_github::ClientProvider;
use thiserror::Error;
use tracing::info;

use crate::dependency_review::DependencyReviewCompareTool;

/// Name that enables every registered toolset.
pub const ALL_TOOLSETS: &str = "all";

pub const DEPENDENCY_GRAPH_TOOLSET: &str = "dependency_graph";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolsetError {
    #[error("toolset {0} does not exist")]
    UnknownToolset(String),

    #[error("tool {tool} cannot be added to toolset {toolset}: {reason}")]
    MisannotatedTool {
        tool: String,
        toolset: String,
        reason: &'static str,
    },
}

/// A named collection of read and write tools.
pub struct Toolset {
    name: String,
    description: String,
    enabled: bool,
    read_only: bool,
    read_tools: Vec<Arc<dyn Tool>>,
    write_tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for Toolset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |tools: &[Arc<dyn Tool>]| -> Vec<String> {
            tools.iter().map(|t| t.name().to_string()).collect()
        };
        f.debug_struct("Toolset")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("read_only", &self.read_only)
            .field("read_tools", &names(&self.read_tools))
            .field("write_tools", &names(&self.write_tools))
            .finish()
    }
}

impl Toolset {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            enabled: false,
            read_only: false,
            read_tools: Vec::new(),
            write_tools: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_read_only(&mut self) {
        self.read_only = true;
    }

    /// Add tools that must be annotated read-only.
    pub fn add_read_tools(
        mut self,
        tools: impl IntoIterator<Item = Arc<dyn Tool>>,
    ) -> Result<Self, ToolsetError> {
        for tool in tools {
            if !tool.descriptor().is_read_only() {
                return Err(self.misannotated(tool.as_ref(), "read tools must be read-only"));
            }
            self.read_tools.push(tool);
        }
        Ok(self)
    }

    /// Add tools that must not be annotated read-only.
    pub fn add_write_tools(
        mut self,
        tools: impl IntoIterator<Item = Arc<dyn Tool>>,
    ) -> Result<Self, ToolsetError> {
        for tool in tools {
            if tool.descriptor().is_read_only() {
                return Err(self.misannotated(tool.as_ref(), "write tools must not be read-only"));
            }
            self.write_tools.push(tool);
        }
        Ok(self)
    }

    fn misannotated(&self, tool: &dyn Tool, reason: &'static str) -> ToolsetError {
        ToolsetError::MisannotatedTool {
            tool: tool.name().to_string(),
            toolset: self.name.clone(),
            reason,
        }
    }

    /// Tools this toolset exposes in its current mode. Empty when disabled.
    pub fn active_tools(&self) -> Vec<Arc<dyn Tool>> {
        if !self.enabled {
            return Vec::new();
        }
        let mut tools = self.read_tools.clone();
        if !self.read_only {
            tools.extend(self.write_tools.iter().cloned());
        }
        tools
    }
}

/// All toolsets known to a server.
#[derive(Debug, Default)]
pub struct ToolsetGroup {
    read_only: bool,
    toolsets: BTreeMap<String, Toolset>,
}

impl ToolsetGroup {
    pub fn new(read_only: bool) -> Self {
        Self {
            read_only,
            toolsets: BTreeMap::new(),
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Register a toolset, forcing it read-only when the group is.
    pub fn add_toolset(&mut self, mut toolset: Toolset) {
        if self.read_only {
            toolset.set_read_only();
        }
        self.toolsets.insert(toolset.name.clone(), toolset);
    }

    pub fn toolset(&self, name: &str) -> Option<&Toolset> {
        self.toolsets.get(name)
    }

    pub fn toolset_names(&self) -> Vec<&str> {
        self.toolsets.keys().map(String::as_str).collect()
    }

    /// Enable the named toolsets. `all` enables every toolset.
    ///
    /// Names are validated before anything is enabled.
    pub fn enable_toolsets<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), ToolsetError> {
        let names: Vec<&str> = names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .collect();

        if names.contains(&ALL_TOOLSETS) {
            for toolset in self.toolsets.values_mut() {
                toolset.set_enabled(true);
            }
            info!(count = self.toolsets.len(), "Enabled all toolsets");
            return Ok(());
        }

        if let Some(unknown) = names.iter().find(|n| !self.toolsets.contains_key(**n)) {
            return Err(ToolsetError::UnknownToolset(unknown.to_string()));
        }
        for name in names {
            if let Some(toolset) = self.toolsets.get_mut(name) {
                toolset.set_enabled(true);
                info!(toolset = name, "Enabled toolset");
            }
        }
        Ok(())
    }

    /// Tools of every enabled toolset, in toolset name order.
    pub fn active_tools(&self) -> Vec<Arc<dyn Tool>> {
        self.toolsets
            .values()
            .flat_map(Toolset::active_tools)
            .collect()
    }
}

/// Group containing every toolset this crate provides, all disabled.
pub fn default_toolset_group(
    clients: Arc<dyn ClientProvider>,
    translator: &dyn Translator,
    read_only: bool,
) -> Result<ToolsetGroup, ToolsetError> {
    let dependency_graph = Toolset::new(
        DEPENDENCY_GRAPH_TOOLSET,
        translator.translate(
            "TOOLSET_DEPENDENCY_GRAPH_DESCRIPTION",
            "Dependency graph and dependency review",
        ),
    )
    .add_read_tools([
        Arc::new(DependencyReviewCompareTool::new(clients, translator)) as Arc<dyn Tool>
    ])?;

    let mut group = ToolsetGroup::new(read_only);
    group.add_toolset(dependency_graph);
    Ok(group)
}
