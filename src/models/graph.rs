//! Module graph produced by the scanner
//!
//! Modules live in an arena indexed by [`ModuleId`]; edges refer to modules by
//! index, so import cycles need no special ownership handling.

use super::import_record::{ImportRecord, ImportSyntax};
use super::loader::Loader;
use super::module::{Module, ModuleId, OutputAsset};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::DfsPostOrder;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A validated reference: `record` is an index into the source module's records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub source: ModuleId,
    pub record: usize,
    pub target: ModuleId,
}

/// Complete module graph of one build
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    entry_points: Vec<ModuleId>,
    modules: Vec<Module>,
    edges: Vec<Edge>,
    assets: Vec<OutputAsset>,
    #[serde(skip)]
    index: HashMap<PathBuf, ModuleId>,
    #[serde(skip)]
    outgoing: Vec<Vec<usize>>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the module for `path`, creating it if needed
    ///
    /// The boolean is true when the module was created by this call.
    pub fn insert_module(&mut self, path: PathBuf, loader: Loader, external: bool) -> (ModuleId, bool) {
        if let Some(id) = self.index.get(&path) {
            return (*id, false);
        }

        let id = ModuleId(self.modules.len() as u32);
        let sequence = self.modules.len();
        self.index.insert(path.clone(), id);
        self.modules.push(Module::new(id, path, loader, external, sequence));
        self.outgoing.push(Vec::new());
        (id, true)
    }

    pub fn add_entry_point(&mut self, id: ModuleId) {
        if !self.entry_points.contains(&id) {
            self.entry_points.push(id);
        }
    }

    pub fn add_edge(&mut self, source: ModuleId, record: usize, target: ModuleId) {
        self.outgoing[source.index()].push(self.edges.len());
        self.edges.push(Edge { source, record, target });
    }

    pub fn add_asset(&mut self, asset: OutputAsset) {
        if !self.assets.iter().any(|a| a.source == asset.source) {
            self.assets.push(asset);
        }
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.index()]
    }

    pub fn id_of(&self, path: &Path) -> Option<ModuleId> {
        self.index.get(path).copied()
    }

    pub fn get(&self, path: &Path) -> Option<&Module> {
        self.id_of(path).map(|id| self.module(id))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    pub fn entry_points(&self) -> &[ModuleId] {
        &self.entry_points
    }

    /// Modules in discovery order
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn assets(&self) -> &[OutputAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// The record an edge was created from
    pub fn record(&self, edge: &Edge) -> &ImportRecord {
        &self.module(edge.source).records[edge.record]
    }

    /// Outgoing edges of `id` in record order
    pub fn edges_from(&self, id: ModuleId) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing[id.index()].iter().map(move |i| &self.edges[*i])
    }

    /// Edges pointing at `id`
    pub fn edges_to(&self, id: ModuleId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |edge| edge.target == id)
    }

    fn to_petgraph(&self) -> DiGraph<ModuleId, usize> {
        let mut graph = DiGraph::with_capacity(self.modules.len(), self.edges.len());
        for module in &self.modules {
            graph.add_node(module.id);
        }
        for (i, edge) in self.edges.iter().enumerate() {
            graph.add_edge(
                NodeIndex::new(edge.source.index()),
                NodeIndex::new(edge.target.index()),
                i,
            );
        }
        graph
    }

    /// Modules reachable from the entry points, dependencies before dependents
    pub fn dependency_order(&self) -> Vec<ModuleId> {
        let graph = self.to_petgraph();
        let mut order = Vec::with_capacity(self.modules.len());
        let Some(first) = self.entry_points.first() else {
            return order;
        };

        let mut dfs = DfsPostOrder::new(&graph, NodeIndex::new(first.index()));
        for entry in &self.entry_points {
            dfs.move_to(NodeIndex::new(entry.index()));
            while let Some(node) = dfs.next(&graph) {
                order.push(graph[node]);
            }
        }
        order
    }

    /// True if any chain of edges returns to its start
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.to_petgraph())
    }

    /// Flattened `@import` order starting at a CSS entry
    ///
    /// Depth first in source order with each file placed once, at its first
    /// occurrence; imported files come before the file importing them.
    /// External imports are not part of the order.
    pub fn css_import_order(&self, entry: ModuleId) -> Vec<ModuleId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        self.visit_css_imports(entry, &mut visited, &mut order);
        order
    }

    fn visit_css_imports(&self, id: ModuleId, visited: &mut HashSet<ModuleId>, order: &mut Vec<ModuleId>) {
        if !visited.insert(id) {
            return;
        }

        let imports: Vec<ModuleId> = self
            .edges_from(id)
            .filter(|edge| self.record(edge).syntax == ImportSyntax::AtImport)
            .map(|edge| edge.target)
            .filter(|target| {
                let module = self.module(*target);
                module.loader == Loader::Css && !module.external
            })
            .collect();

        for target in imports {
            self.visit_css_imports(target, visited, order);
        }
        order.push(id);
    }
}
