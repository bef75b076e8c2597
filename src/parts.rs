//! Resolves a loaded model's sub-objects to anatomical parts.
//!
//! Strategies run in order and the first one producing a binding wins:
//! name matching against the part table, spatial clustering of mesh leaves
//! into anatomical sectors, then arbitrary grouping into virtual parts.

use std::collections::HashSet;

use crate::config::{ViewerConfig, REFERENCE_SEPARATION};
use crate::model::{AnatomicalPart, Vec3};
use crate::scene::{NodeId, SceneTree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingStrategy {
    NameMatch,
    SpatialCluster,
    VirtualGroup,
}

impl MappingStrategy {
    pub const ORDER: [MappingStrategy; 3] =
        [MappingStrategy::NameMatch, MappingStrategy::SpatialCluster, MappingStrategy::VirtualGroup];

    pub fn label(self) -> &'static str {
        match self {
            MappingStrategy::NameMatch => "name match",
            MappingStrategy::SpatialCluster => "spatial clusters",
            MappingStrategy::VirtualGroup => "virtual groups",
        }
    }
}

/// A part bound to a live node, with the rest position captured at bind time.
#[derive(Clone, Debug, PartialEq)]
pub struct PartBinding {
    pub part_id: String,
    pub node: NodeId,
    pub original_local_position: Vec3,
}

/// Bindings in the order they were resolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartBindings {
    entries: Vec<PartBinding>,
}

impl PartBindings {
    pub fn get(&self, part_id: &str) -> Option<&PartBinding> {
        self.entries.iter().find(|b| b.part_id == part_id)
    }

    pub fn contains(&self, part_id: &str) -> bool {
        self.get(part_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartBinding> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|b| b.part_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn retain(&mut self, keep: impl FnMut(&PartBinding) -> bool) {
        self.entries.retain(keep);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn bind<S: SceneTree>(&mut self, model: &S, part_id: impl Into<String>, node: NodeId) {
        self.entries.push(PartBinding {
            part_id: part_id.into(),
            node,
            original_local_position: model.position(node),
        });
    }
}

#[derive(Clone, Debug, Default)]
pub struct PartMapping {
    pub strategy: Option<MappingStrategy>,
    pub bindings: PartBindings,
    /// Parts invented by the fallback strategies.
    pub synthetic_parts: Vec<AnatomicalPart>,
}

struct Sector {
    name: &'static str,
    /// Known part this sector stands in for.
    part_id: &'static str,
    /// Offset from the model center as a fraction of its size.
    factor: Vec3,
}

// Viewer-left is the patient's right.
const SECTORS: [Sector; 5] = [
    Sector { name: "upper_left", part_id: "right_atrium", factor: Vec3::new(-0.25, 0.25, 0.0) },
    Sector { name: "upper_right", part_id: "left_atrium", factor: Vec3::new(0.25, 0.25, 0.0) },
    Sector { name: "lower_left", part_id: "right_ventricle", factor: Vec3::new(-0.25, -0.25, 0.0) },
    Sector { name: "lower_right", part_id: "left_ventricle", factor: Vec3::new(0.25, -0.25, 0.0) },
    Sector { name: "top", part_id: "aorta", factor: Vec3::new(0.0, 0.45, 0.0) },
];

const VIRTUAL_GROUPS: usize = 4;
const VIRTUAL_DIRECTIONS: [Vec3; VIRTUAL_GROUPS] = [
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
];

fn normalize_name(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).flat_map(|c| c.to_lowercase()).collect()
}

/// Synthetic parts carry offsets at the reference separation; the animator
/// scales every offset to the configured distance.
#[derive(Debug, Clone)]
pub struct PartMapper {
    pub cluster_radius_divisor: f64,
}

impl Default for PartMapper {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl PartMapper {
    pub fn new(config: &ViewerConfig) -> Self {
        Self { cluster_radius_divisor: config.cluster_radius_divisor }
    }

    /// Runs the strategies in order and returns the first non-empty mapping.
    /// Only a model without mesh leaves yields an empty mapping.
    pub fn resolve_parts<S: SceneTree>(&self, model: &mut S, known_parts: &[AnatomicalPart]) -> PartMapping {
        for strategy in MappingStrategy::ORDER {
            let mapping = self.run(strategy, model, known_parts);
            if !mapping.bindings.is_empty() {
                log::info!("bound {} parts via {}", mapping.bindings.len(), strategy.label());
                return mapping;
            }
            log::debug!("{} produced no bindings", strategy.label());
        }
        PartMapping::default()
    }

    /// Runs a single strategy. Fallback strategies restructure the model only
    /// when they produce bindings.
    pub fn run<S: SceneTree>(&self, strategy: MappingStrategy, model: &mut S, known_parts: &[AnatomicalPart]) -> PartMapping {
        let (bindings, synthetic_parts) = match strategy {
            MappingStrategy::NameMatch => (self.match_names(model, known_parts), Vec::new()),
            MappingStrategy::SpatialCluster => self.cluster_spatially(model, known_parts),
            MappingStrategy::VirtualGroup => self.group_virtually(model),
        };
        PartMapping { strategy: Some(strategy), bindings, synthetic_parts }
    }

    fn match_names<S: SceneTree>(&self, model: &S, known_parts: &[AnatomicalPart]) -> PartBindings {
        let hints: Vec<(usize, String)> = known_parts
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.mesh_name_hint.as_deref().map(|h| (i, normalize_name(h))))
            .filter(|(_, h)| !h.is_empty())
            .collect();
        let mut bindings = PartBindings::default();
        let mut taken: HashSet<usize> = HashSet::new();

        // Pre-order walk; a bound node's subtree moves with it and is not searched.
        let mut stack: Vec<NodeId> = model.children(model.root()).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            let name = normalize_name(model.name(node));
            let hit = if name.is_empty() {
                None
            } else {
                hints
                    .iter()
                    .find(|(i, h)| !taken.contains(i) && (name.contains(h.as_str()) || h.contains(name.as_str())))
                    .map(|(i, _)| *i)
            };
            match hit {
                Some(i) => {
                    taken.insert(i);
                    bindings.bind(model, known_parts[i].id.clone(), node);
                }
                None => stack.extend(model.children(node).into_iter().rev()),
            }
        }
        bindings
    }

    fn cluster_spatially<S: SceneTree>(&self, model: &mut S, known_parts: &[AnatomicalPart]) -> (PartBindings, Vec<AnatomicalPart>) {
        let root = model.root();
        let Some(bounds) = model.world_bounds(root) else {
            return (PartBindings::default(), Vec::new());
        };
        let center = bounds.center();
        let size = bounds.size();
        let radius = size.x.max(size.y) / self.cluster_radius_divisor;
        let sector_centers: Vec<Vec3> = SECTORS
            .iter()
            .map(|s| center + Vec3::new(size.x * s.factor.x, size.y * s.factor.y, size.z * s.factor.z))
            .collect();

        let mut members: Vec<Vec<NodeId>> = vec![Vec::new(); SECTORS.len()];
        for leaf in model.mesh_leaves() {
            let wp = model.world_position(leaf);
            let nearest = sector_centers
                .iter()
                .enumerate()
                .map(|(i, c)| (i, wp.distance(*c)))
                .filter(|(_, d)| *d <= radius)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((i, _)) = nearest {
                members[i].push(leaf);
            }
        }

        let mut bindings = PartBindings::default();
        let mut synthetic = Vec::new();
        for (sector, meshes) in SECTORS.iter().zip(members) {
            if meshes.is_empty() {
                continue;
            }
            let group = model.create_group(root, &format!("sector_{}", sector.name));
            for mesh in meshes {
                model.clone_into(mesh, group);
                model.set_visible(mesh, false);
            }
            if known_parts.iter().any(|p| p.id == sector.part_id) {
                bindings.bind(model, sector.part_id, group);
            } else {
                let id = format!("sector_{}", sector.name);
                let dir = Vec3::new(sector.factor.x, sector.factor.y, 0.0).normalized();
                synthetic.push(AnatomicalPart::synthetic(id.clone(), sector.name.replace('_', " "), dir * REFERENCE_SEPARATION));
                bindings.bind(model, id, group);
            }
        }
        (bindings, synthetic)
    }

    fn group_virtually<S: SceneTree>(&self, model: &mut S) -> (PartBindings, Vec<AnatomicalPart>) {
        let leaves = model.mesh_leaves();
        if leaves.is_empty() {
            return (PartBindings::default(), Vec::new());
        }
        let root = model.root();
        let chunk = leaves.len().div_ceil(VIRTUAL_GROUPS);
        let mut bindings = PartBindings::default();
        let mut synthetic = Vec::new();
        for (i, meshes) in leaves.chunks(chunk).enumerate() {
            let id = format!("virtual_part_{i}");
            let group = model.create_group(root, &id);
            for mesh in meshes {
                model.reparent(*mesh, group);
            }
            let offset = VIRTUAL_DIRECTIONS[i % VIRTUAL_GROUPS] * REFERENCE_SEPARATION;
            synthetic.push(AnatomicalPart::synthetic(id.clone(), format!("Section {}", i + 1), offset));
            bindings.bind(model, id, group);
        }
        (bindings, synthetic)
    }
}
