//! Core data models for the heart viewer.
//! Geometry primitives plus the anatomical part table the slicing view works from.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f64 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len <= f64::EPSILON { Vec3::ZERO } else { self * (1.0 / len) }
    }

    pub fn lerp(self, to: Vec3, t: f64) -> Vec3 {
        self + (to - self) * t
    }

    pub fn min(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x.min(o.x), self.y.min(o.y), self.z.min(o.z))
    }

    pub fn max(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x.max(o.x), self.y.max(o.y), self.z.max(o.z))
    }

    pub fn approx_eq(self, o: Vec3, eps: f64) -> bool {
        (self.x - o.x).abs() <= eps && (self.y - o.y).abs() <= eps && (self.z - o.z).abs() <= eps
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, o: Vec3) -> Vec3 { Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z) }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, o: Vec3) { *self = *self + o; }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, o: Vec3) -> Vec3 { Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z) }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f64) -> Vec3 { Vec3::new(self.x * s, self.y * s, self.z * s) }
}

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self { min: center - half, max: center + half }
    }

    pub fn union(self, o: Aabb) -> Aabb {
        Aabb { min: self.min.min(o.min), max: self.max.max(o.max) }
    }

    pub fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(self) -> Vec3 {
        self.max - self.min
    }
}

/// One educational region of an organ model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnatomicalPart {
    /// Stable semantic key, e.g. `left_ventricle`.
    pub id: String,
    pub display_name: String,
    /// Substring matched (case-insensitive, either direction) against model node names.
    pub mesh_name_hint: Option<String>,
    /// Assembled local position as authored in the part table. The live binding
    /// captures the model's actual rest position instead.
    pub rest_position: Vec3,
    /// Displacement added to the bound rest position when sliced. Never an absolute target.
    pub exploded_offset: Vec3,
    pub color: String,
    pub description: String,
    pub function_text: String,
    /// Related conditions shown by the education panels; opaque to the animation core.
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl AnatomicalPart {
    /// A part generated by a fallback mapping strategy, with no education content.
    pub fn synthetic(id: impl Into<String>, display_name: impl Into<String>, exploded_offset: Vec3) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            mesh_name_hint: None,
            rest_position: Vec3::ZERO,
            exploded_offset,
            color: "#8b949e".to_string(),
            description: String::new(),
            function_text: String::new(),
            conditions: Vec::new(),
        }
    }
}

struct PartDef {
    id: &'static str,
    name: &'static str,
    hint: &'static str,
    rest: (f64, f64, f64),
    offset: (f64, f64, f64),
    color: &'static str,
    description: &'static str,
    function: &'static str,
    conditions: &'static [&'static str],
}

const HEART_PART_DEFS: &[PartDef] = &[
    PartDef {
        id: "left_ventricle",
        name: "Left Ventricle",
        hint: "leftventricle",
        rest: (0.12, -0.15, 0.0),
        offset: (0.3, -0.2, 0.0),
        color: "#e5534b",
        description: "The thick-walled lower left chamber.",
        function: "Pumps oxygenated blood through the aorta to the whole body.",
        conditions: &["Left ventricular hypertrophy", "Heart failure"],
    },
    PartDef {
        id: "right_ventricle",
        name: "Right Ventricle",
        hint: "rightventricle",
        rest: (-0.12, -0.15, 0.0),
        offset: (-0.3, -0.2, 0.0),
        color: "#6cb6ff",
        description: "The lower right chamber, thinner than the left.",
        function: "Pumps deoxygenated blood into the pulmonary artery toward the lungs.",
        conditions: &["Pulmonary hypertension"],
    },
    PartDef {
        id: "left_atrium",
        name: "Left Atrium",
        hint: "leftatrium",
        rest: (0.12, 0.12, -0.05),
        offset: (0.3, 0.25, -0.1),
        color: "#f69d50",
        description: "Upper left chamber receiving blood from the pulmonary veins.",
        function: "Collects oxygenated blood from the lungs and fills the left ventricle.",
        conditions: &["Atrial fibrillation"],
    },
    PartDef {
        id: "right_atrium",
        name: "Right Atrium",
        hint: "rightatrium",
        rest: (-0.12, 0.12, -0.05),
        offset: (-0.3, 0.25, -0.1),
        color: "#8ddb8c",
        description: "Upper right chamber receiving blood from the venae cavae.",
        function: "Collects deoxygenated blood from the body and houses the sinoatrial node.",
        conditions: &["Atrial flutter"],
    },
    PartDef {
        id: "aorta",
        name: "Aorta",
        hint: "aorta",
        rest: (0.02, 0.3, 0.0),
        offset: (0.05, 0.35, 0.0),
        color: "#dcbdfb",
        description: "The largest artery, arching up out of the left ventricle.",
        function: "Distributes oxygenated blood to the systemic circulation.",
        conditions: &["Aortic aneurysm", "Aortic stenosis"],
    },
    PartDef {
        id: "pulmonary_artery",
        name: "Pulmonary Artery",
        hint: "pulmonary",
        rest: (-0.04, 0.26, 0.08),
        offset: (-0.1, 0.3, 0.2),
        color: "#96d0ff",
        description: "Trunk leaving the right ventricle and splitting toward each lung.",
        function: "Carries deoxygenated blood to the lungs for gas exchange.",
        conditions: &["Pulmonary embolism"],
    },
    PartDef {
        id: "superior_vena_cava",
        name: "Superior Vena Cava",
        hint: "vena",
        rest: (-0.18, 0.3, -0.05),
        offset: (-0.2, 0.3, -0.1),
        color: "#539bf5",
        description: "Large vein returning blood from the upper body.",
        function: "Drains the head, neck and arms into the right atrium.",
        conditions: &["Superior vena cava syndrome"],
    },
    PartDef {
        id: "septum",
        name: "Interventricular Septum",
        hint: "septum",
        rest: (0.0, -0.1, 0.0),
        offset: (0.0, 0.0, 0.3),
        color: "#c69026",
        description: "Muscular wall separating the two ventricles.",
        function: "Keeps oxygenated and deoxygenated blood apart and conducts the heartbeat.",
        conditions: &["Ventricular septal defect"],
    },
];

/// The built-in heart part table.
pub fn heart_parts() -> Vec<AnatomicalPart> {
    HEART_PART_DEFS
        .iter()
        .map(|d| AnatomicalPart {
            id: d.id.to_string(),
            display_name: d.name.to_string(),
            mesh_name_hint: Some(d.hint.to_string()),
            rest_position: Vec3::new(d.rest.0, d.rest.1, d.rest.2),
            exploded_offset: Vec3::new(d.offset.0, d.offset.1, d.offset.2),
            color: d.color.to_string(),
            description: d.description.to_string(),
            function_text: d.function.to_string(),
            conditions: d.conditions.iter().map(|c| c.to_string()).collect(),
        })
        .collect()
}

/// Parts kept when a constrained device prunes the binding set: four chambers and two great vessels.
pub const ESSENTIAL_PART_IDS: [&str; 6] = [
    "left_ventricle",
    "right_ventricle",
    "left_atrium",
    "right_atrium",
    "aorta",
    "pulmonary_artery",
];
