// Node Registry - Stores node definitions and their executors
//
// The registry holds every available array node type. Each node type has a
// definition (pins, category, etc.) and an executor function.

use std::collections::HashMap;
use std::sync::Arc;

use array_types::NodeDef;

use super::executor::{NodeContext, NodeOutput};

// ─────────────────────────────────────────────────────────────────────────────
// Node Executor Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for node execution
///
/// Execution is synchronous: a node runs to completion on the calling thread.
pub trait NodeExecutor: Send + Sync {
    /// Execute the node with the given context
    fn execute(&self, ctx: &mut NodeContext) -> NodeOutput;
}

/// Function-based node executor
pub struct FnNodeExecutor<F>
where
    F: Fn(&mut NodeContext) -> NodeOutput + Send + Sync,
{
    func: F,
}

impl<F> FnNodeExecutor<F>
where
    F: Fn(&mut NodeContext) -> NodeOutput + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> NodeExecutor for FnNodeExecutor<F>
where
    F: Fn(&mut NodeContext) -> NodeOutput + Send + Sync,
{
    fn execute(&self, ctx: &mut NodeContext) -> NodeOutput {
        (self.func)(ctx)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Entry in the node registry
struct NodeEntry {
    definition: NodeDef,
    executor: Arc<dyn NodeExecutor>,
}

/// Registry of all available node types
pub struct NodeRegistry {
    nodes: HashMap<String, NodeEntry>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Register a node type with its executor
    pub fn register(&mut self, definition: NodeDef, executor: Arc<dyn NodeExecutor>) {
        let id = definition.id.clone();
        self.nodes.insert(
            id,
            NodeEntry {
                definition,
                executor,
            },
        );
    }

    /// Register a node with a function executor
    pub fn register_fn<F>(&mut self, definition: NodeDef, func: F)
    where
        F: Fn(&mut NodeContext) -> NodeOutput + Send + Sync + 'static,
    {
        self.register(definition, Arc::new(FnNodeExecutor::new(func)));
    }

    /// Run the node registered under `id`
    pub fn execute(&self, id: &str, ctx: &mut NodeContext) -> NodeOutput {
        match self.nodes.get(id) {
            Some(entry) => entry.executor.execute(ctx),
            None => {
                tracing::warn!("Unknown node type: {}", id);
                NodeOutput::error(format!("Unknown node type: {}", id))
            }
        }
    }

    /// Get a node definition by ID
    pub fn get_definition(&self, id: &str) -> Option<&NodeDef> {
        self.nodes.get(id).map(|e| &e.definition)
    }

    /// Get all node definitions
    pub fn definitions(&self) -> impl Iterator<Item = &NodeDef> {
        self.nodes.values().map(|e| &e.definition)
    }

    /// Export all node definitions as JSON, ordered by ID
    pub fn definitions_json(&self) -> serde_json::Result<String> {
        let mut definitions: Vec<_> = self.definitions().collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        serde_json::to_string_pretty(&definitions)
    }

    /// Get nodes by category
    pub fn nodes_in_category(&self, category: &str) -> Vec<&NodeDef> {
        self.nodes
            .values()
            .filter(|e| e.definition.category == category)
            .map(|e| &e.definition)
            .collect()
    }

    /// Get all categories
    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<_> = self
            .nodes
            .values()
            .map(|e| e.definition.category.clone())
            .collect();
        cats.sort();
        cats.dedup();
        cats
    }

    /// Check if a node is registered
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get node count
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
