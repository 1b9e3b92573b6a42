use super::body::{BodyId, BodyParams, CelestialBody, TextureHandle};
use super::clock::TickContext;
use super::description::{parse_description, BodyDeclaration};
use super::error::{LoadError, LoadResult, LoadWarning};
use std::collections::HashMap;
use std::ops::Index;

/// Registers surface textures on behalf of the loader.
///
/// `None` means the texture could not be registered and the body falls back to its color.
pub trait TextureLoader {
    fn register(&mut self, source: &str) -> Option<TextureHandle>;
}

impl<F> TextureLoader for F
where
    F: FnMut(&str) -> Option<TextureHandle>,
{
    fn register(&mut self, source: &str) -> Option<TextureHandle> {
        self(source)
    }
}

/// Loader for builds without a GPU. Every texture is reported unavailable.
pub struct NoTextures;

impl TextureLoader for NoTextures {
    fn register(&mut self, _source: &str) -> Option<TextureHandle> {
        None
    }
}

/// Owns every body, in declaration order. The topology is fixed once loaded.
#[derive(Debug)]
pub struct OrbitHierarchy {
    bodies: Vec<CelestialBody>,
    ancestors: Vec<Vec<BodyId>>,
    update_order: Vec<BodyId>,
    warnings: Vec<LoadWarning>,
}

impl OrbitHierarchy {
    pub fn from_json(
        text: &str,
        textures: &mut dyn TextureLoader,
        world_scale: f32,
    ) -> LoadResult<Self> {
        let declarations = parse_description(text)?;
        Self::load(declarations, textures, world_scale)
    }

    /// Builds the hierarchy from validated declarations.
    ///
    /// Parents must be declared above their children. A reference to an undeclared body is
    /// a warning and leaves that body without a parent.
    pub fn load(
        declarations: Vec<BodyDeclaration>,
        textures: &mut dyn TextureLoader,
        world_scale: f32,
    ) -> LoadResult<Self> {
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        for (index, decl) in declarations.iter().enumerate() {
            if by_name.insert(decl.name.as_str(), index).is_some() {
                return Err(LoadError::DuplicateName {
                    index,
                    name: decl.name.clone(),
                });
            }
        }

        let mut bodies: Vec<CelestialBody> = Vec::with_capacity(declarations.len());
        let mut warnings = Vec::new();

        for (index, decl) in declarations.iter().enumerate() {
            let parent = match decl.parent.as_deref() {
                None => None,
                Some(parent_name) => match by_name.get(parent_name) {
                    Some(&parent_index) if parent_index < index => {
                        Some((BodyId(parent_index), &bodies[parent_index]))
                    }
                    _ => {
                        warnings.push(LoadWarning::UnresolvedParent {
                            body: decl.name.clone(),
                            parent: parent_name.to_string(),
                        });
                        None
                    }
                },
            };

            if decl.orbital_period == Some(0.0) {
                warnings.push(LoadWarning::ZeroOrbitalPeriod { body: decl.name.clone() });
            }
            if decl.self_rotation_period == 0.0 {
                warnings.push(LoadWarning::ZeroRotationPeriod { body: decl.name.clone() });
            }

            let texture = decl.texture.as_deref().and_then(|source| {
                let handle = textures.register(source);
                if handle.is_none() {
                    warnings.push(LoadWarning::TextureUnavailable {
                        body: decl.name.clone(),
                        source_ref: source.to_string(),
                    });
                }
                handle
            });

            let params = BodyParams {
                name: decl.name.clone(),
                radius_au: decl.radius,
                orbital_period_days: decl.orbital_period.unwrap_or(0.0),
                parent_distance_au: decl.parent_distance.unwrap_or(0.0),
                solar_tilt_deg: decl.solar_tilt,
                self_rotation_period_days: decl.self_rotation_period,
            };
            let mut body = CelestialBody::new(params, world_scale, parent, texture);
            let [r, g, b] = decl.color;
            body.colorize(r, g, b);
            bodies.push(body);
        }

        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        let ancestors: Vec<Vec<BodyId>> = (0..bodies.len())
            .map(|index| ancestor_chain(&bodies, BodyId(index)))
            .collect();

        let mut update_order: Vec<BodyId> = (0..bodies.len()).map(BodyId).collect();
        update_order.sort_by_key(|id| ancestors[id.0].len());

        tracing::info!(
            bodies = bodies.len(),
            warnings = warnings.len(),
            "orbit hierarchy loaded"
        );

        Ok(OrbitHierarchy {
            bodies,
            ancestors,
            update_order,
            warnings,
        })
    }

    /// Advances every body once, parents strictly before their children.
    pub fn advance(&mut self, ctx: &TickContext) {
        for &id in &self.update_order {
            let parent_position = self.bodies[id.0]
                .parent()
                .map(|parent| self.bodies[parent.0].position());
            self.bodies[id.0].advance(ctx, parent_position);
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.name() == name).map(BodyId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &CelestialBody)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    /// Body names in declaration order, for menus.
    pub fn names(&self) -> Vec<&str> {
        self.bodies.iter().map(CelestialBody::name).collect()
    }

    /// Cached ancestors of `id`, nearest first. Empty for roots and unknown ids.
    pub fn ancestors(&self, id: BodyId) -> &[BodyId] {
        self.ancestors.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn update_order(&self) -> &[BodyId] {
        &self.update_order
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }
}

impl Index<BodyId> for OrbitHierarchy {
    type Output = CelestialBody;

    fn index(&self, id: BodyId) -> &Self::Output {
        &self.bodies[id.0]
    }
}

/// Walks parent links up to the root, nearest ancestor first.
pub fn ancestor_chain(bodies: &[CelestialBody], id: BodyId) -> Vec<BodyId> {
    let mut chain = Vec::new();
    let mut cursor = bodies.get(id.0).and_then(CelestialBody::parent);
    while let Some(parent) = cursor {
        chain.push(parent);
        cursor = bodies.get(parent.0).and_then(CelestialBody::parent);
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orrery::math::AU_TO_WORLD;
    use std::f32::consts::PI;

    const SYSTEM: &str = r#"[
        { "name": "A", "radius": 1, "self_rotation_period": 27, "solar_tilt": 10,
          "color": [255, 255, 0] },
        { "name": "B", "radius": 0.1, "orbital_period": 100, "parent": "A",
          "parent_distance": 1.0, "solar_tilt": 20, "color": [0, 0, 255],
          "self_rotation_period": 1 },
        { "name": "C", "radius": 0.01, "orbital_period": 10, "parent": "B",
          "parent_distance": 0.1, "solar_tilt": 5, "color": [90, 90, 90],
          "self_rotation_period": 10 }
    ]"#;

    fn load(text: &str) -> OrbitHierarchy {
        OrbitHierarchy::from_json(text, &mut NoTextures, AU_TO_WORLD).unwrap()
    }

    #[test]
    fn ancestor_chains_are_nearest_first() {
        let h = load(SYSTEM);
        let (a, b, c) = (BodyId(0), BodyId(1), BodyId(2));
        assert_eq!(h.ancestors(c), &[b, a]);
        assert_eq!(h.ancestors(b), &[a]);
        assert!(h.ancestors(a).is_empty());
    }

    #[test]
    fn global_tilt_accumulates() {
        let h = load(SYSTEM);
        assert_eq!(h[BodyId(0)].global_solar_tilt(), 10.0);
        assert_eq!(h[BodyId(1)].global_solar_tilt(), 30.0);
        assert_eq!(h[BodyId(2)].global_solar_tilt(), 35.0);
    }

    #[test]
    fn forward_reference_is_a_warning() {
        let text = r#"[
            { "name": "Moon", "radius": 0.001, "orbital_period": 27, "parent": "Earth",
              "parent_distance": 0.05, "solar_tilt": 5, "color": [200, 200, 200],
              "self_rotation_period": 27 },
            { "name": "Earth", "radius": 0.01, "self_rotation_period": 1, "solar_tilt": 0,
              "color": [0, 0, 255] }
        ]"#;
        let h = load(text);
        assert_eq!(h.len(), 2);
        assert_eq!(h[BodyId(0)].parent(), None);
        assert_eq!(
            h.warnings(),
            &[LoadWarning::UnresolvedParent {
                body: "Moon".to_string(),
                parent: "Earth".to_string()
            }]
        );
    }

    #[test]
    fn self_reference_does_not_resolve() {
        let text = r#"[{ "name": "Loop", "radius": 1, "orbital_period": 3, "parent": "Loop",
            "parent_distance": 1, "solar_tilt": 0, "color": [1, 1, 1],
            "self_rotation_period": 1 }]"#;
        let h = load(text);
        assert_eq!(h[BodyId(0)].parent(), None);
        assert_eq!(h.warnings().len(), 1);
    }

    #[test]
    fn missing_parent_distance_fails_closed() {
        let text = r#"[
            { "name": "Sun", "radius": 1, "self_rotation_period": 27, "solar_tilt": 0,
              "color": [255, 255, 0] },
            { "name": "Earth", "radius": 0.01, "orbital_period": 365, "parent": "Sun",
              "solar_tilt": 0, "color": [0, 0, 255], "self_rotation_period": 1,
              "texture": "earth.jpg" }
        ]"#;
        let mut registered = 0;
        let mut loader = |_: &str| {
            registered += 1;
            Some(TextureHandle(0))
        };
        let result = OrbitHierarchy::from_json(text, &mut loader, AU_TO_WORLD);
        assert!(matches!(
            result,
            Err(LoadError::InvalidField { field: "parent_distance", index: 1, .. })
        ));
        assert_eq!(registered, 0);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let text = r#"[
            { "name": "Sun", "radius": 1, "self_rotation_period": 27, "solar_tilt": 0,
              "color": [255, 255, 0] },
            { "name": "Sun", "radius": 1, "self_rotation_period": 27, "solar_tilt": 0,
              "color": [255, 255, 0] }
        ]"#;
        let result = OrbitHierarchy::from_json(text, &mut NoTextures, AU_TO_WORLD);
        assert!(matches!(result, Err(LoadError::DuplicateName { index: 1, .. })));
    }

    #[test]
    fn zero_period_and_texture_failures_warn() {
        let text = r#"[
            { "name": "Sun", "radius": 1, "self_rotation_period": 27, "solar_tilt": 0,
              "color": [255, 255, 0], "texture": "sun.jpg" },
            { "name": "Rock", "radius": 0.01, "orbital_period": 0, "parent": "Sun",
              "parent_distance": 2, "solar_tilt": 0, "color": [90, 90, 90],
              "self_rotation_period": 0 }
        ]"#;
        let h = load(text);
        assert_eq!(h.warnings().len(), 3);
        assert!(!h[BodyId(0)].has_texture());
        assert_eq!(h[BodyId(0)].color(), [255, 255, 0]);
        assert_eq!(h[BodyId(1)].angular_velocity(), 0.0);
        assert_eq!(h[BodyId(1)].self_angular_velocity(), 0.0);
    }

    #[test]
    fn registered_textures_force_white() {
        let text = r#"[{ "name": "Sun", "radius": 1, "self_rotation_period": 27,
            "solar_tilt": 0, "color": [255, 77, 0], "texture": "sun.jpg" }]"#;
        let mut loader = |source: &str| {
            assert_eq!(source, "sun.jpg");
            Some(TextureHandle(7))
        };
        let h = OrbitHierarchy::from_json(text, &mut loader, AU_TO_WORLD).unwrap();
        assert_eq!(h[BodyId(0)].texture(), Some(TextureHandle(7)));
        assert_eq!(h[BodyId(0)].color(), [255, 255, 255]);
        assert!(h.warnings().is_empty());
    }

    #[test]
    fn update_order_puts_parents_first() {
        let h = load(SYSTEM);
        let order = h.update_order();
        for (position, &id) in order.iter().enumerate() {
            for ancestor in h.ancestors(id) {
                let ancestor_position = order.iter().position(|o| o == ancestor).unwrap();
                assert!(ancestor_position < position);
            }
        }
    }

    #[test]
    fn advance_composes_parent_positions() {
        let mut h = load(SYSTEM);
        let ctx = TickContext { speed_factor: 1.0, elapsed_hours: 100.0 * 24.0 / 4.0 };
        h.advance(&ctx);

        let b = &h[BodyId(1)];
        assert!((b.parametric_angle() - (-PI / 2.0)).abs() < 1e-4);

        let c = &h[BodyId(2)];
        let tilt = c.global_solar_tilt().to_radians();
        let (s, co) = c.parametric_angle().sin_cos();
        let local = crate::orrery::math::Vec3::new(
            co * c.parent_distance() * tilt.cos(),
            co * c.parent_distance() * tilt.sin(),
            s * c.parent_distance(),
        );
        assert!((c.position() - (b.position() + local)).norm() < 1e-3);
    }

    #[test]
    fn names_follow_declaration_order() {
        let h = load(SYSTEM);
        assert_eq!(h.names(), vec!["A", "B", "C"]);
        assert_eq!(h.find("C"), Some(BodyId(2)));
        assert_eq!(h.find("Pluto"), None);
    }
}
