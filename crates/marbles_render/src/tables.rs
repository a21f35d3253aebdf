//! Scene export as per-material parameter tables.
//!
//! The external shader consumes the scene as flat constant arrays:
//! one geometry row per sphere, one parameter table per material
//! kind, and a reference table mapping each sphere to its row in the
//! right parameter table.

use crate::{Material, Sphere};
use std::io::{self, Write};

/// Material classification used by the export tables.
///
/// Metal splits in two: zero fuzz is exported as a distinct "mirror"
/// kind so the shader can skip the perturbation entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Diffuse,
    Mirror,
    Metal,
    Dielectric,
}

impl MaterialKind {
    /// The tag name used in the exported GLSL.
    pub fn glsl_tag(self) -> &'static str {
        match self {
            MaterialKind::Diffuse => "MT_LAMBERTIAN",
            MaterialKind::Mirror => "MT_MIRROR",
            MaterialKind::Metal => "MT_METAL",
            MaterialKind::Dielectric => "MT_DIELECTRIC",
        }
    }
}

/// Where a sphere's material parameters live: a kind tag plus the row
/// index within that kind's table.
///
/// Indices are assigned per sphere occurrence in generation order, not
/// per distinct material instance; two spheres sharing one material
/// get two duplicate rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialRef {
    pub kind: MaterialKind,
    pub index: usize,
}

impl MaterialRef {
    /// Safe default for a material that fits no table: the first
    /// diffuse row. Keeps the reference table aligned with the
    /// geometry table no matter what.
    pub const FALLBACK: MaterialRef = MaterialRef {
        kind: MaterialKind::Diffuse,
        index: 0,
    };
}

/// The flat tables exported for the external shader.
#[derive(Debug, Default)]
pub struct SceneTables {
    /// (x, y, z, radius) per sphere, in generation order
    pub geometry: Vec<[f32; 4]>,
    /// One entry per sphere, aligned with `geometry`
    pub refs: Vec<MaterialRef>,
    /// Diffuse albedo rows
    pub diffuse: Vec<[f32; 3]>,
    /// Zero-fuzz metal albedo rows
    pub mirror: Vec<[f32; 3]>,
    /// (albedo, fuzz) rows for fuzzy metal
    pub metal: Vec<[f32; 4]>,
    /// (1, 1, 1, ir) rows for glass
    pub dielectric: Vec<[f32; 4]>,
}

impl SceneTables {
    /// Partition the generated spheres into export tables.
    pub fn build(spheres: &[Sphere]) -> Self {
        let mut tables = Self::default();

        for sphere in spheres {
            let c = sphere.center();
            tables.geometry.push([c.x, c.y, c.z, sphere.radius()]);

            let mat_ref = tables
                .classify(sphere.material())
                .unwrap_or(MaterialRef::FALLBACK);
            tables.refs.push(mat_ref);
        }

        tables
    }

    /// Append the material's parameter row to the table for its kind
    /// and return the reference to it.
    ///
    /// Returns `None` for a material that belongs in no table; the
    /// caller substitutes [`MaterialRef::FALLBACK`] so the sphere
    /// never loses its reference entry.
    fn classify(&mut self, material: &Material) -> Option<MaterialRef> {
        match *material {
            Material::Lambertian { albedo } => {
                let index = self.diffuse.len();
                self.diffuse.push([albedo.x, albedo.y, albedo.z]);
                Some(MaterialRef {
                    kind: MaterialKind::Diffuse,
                    index,
                })
            }
            Material::Metal { albedo, fuzz } if fuzz == 0.0 => {
                let index = self.mirror.len();
                self.mirror.push([albedo.x, albedo.y, albedo.z]);
                Some(MaterialRef {
                    kind: MaterialKind::Mirror,
                    index,
                })
            }
            Material::Metal { albedo, fuzz } => {
                let index = self.metal.len();
                self.metal.push([albedo.x, albedo.y, albedo.z, fuzz]);
                Some(MaterialRef {
                    kind: MaterialKind::Metal,
                    index,
                })
            }
            Material::Dielectric { ir } => {
                let index = self.dielectric.len();
                self.dielectric.push([1.0, 1.0, 1.0, ir]);
                Some(MaterialRef {
                    kind: MaterialKind::Dielectric,
                    index,
                })
            }
        }
    }

    /// Write the tables as GLSL constant array literals.
    ///
    /// Field order and grouping are part of the wire format the
    /// external shader expects; do not reorder.
    pub fn write_glsl<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "// Our scene (a sphere is {{x,y,z,radius}}):")?;
        writeln!(w, "const vec4 spheres[] = {{")?;
        for g in &self.geometry {
            writeln!(w, "    {{{}f, {}f, {}f, {}f}},", g[0], g[1], g[2], g[3])?;
        }
        writeln!(w, "}};")?;
        writeln!(w)?;

        writeln!(
            w,
            "const MaterialRef sphere_materials[spheres.length()] = {{"
        )?;
        for r in &self.refs {
            writeln!(w, "    {{{}, {}us}},", r.kind.glsl_tag(), r.index)?;
        }
        writeln!(w, "}};")?;
        writeln!(w)?;

        writeln!(w, "const vec3 lambertian_params[] = {{")?;
        for row in &self.diffuse {
            writeln!(w, "    {{{}f, {}f, {}f}},", row[0], row[1], row[2])?;
        }
        writeln!(w, "}};")?;
        writeln!(w)?;

        writeln!(w, "const vec3 mirror_params[] = {{")?;
        for row in &self.mirror {
            writeln!(w, "    {{{}f, {}f, {}f}},", row[0], row[1], row[2])?;
        }
        writeln!(w, "}};")?;
        writeln!(w)?;

        writeln!(w, "/// {{R,G,B,Fuzziness}}")?;
        writeln!(w, "const vec4 metal_params[] = {{")?;
        for row in &self.metal {
            writeln!(
                w,
                "    {{{}f, {}f, {}f, {}f}},",
                row[0], row[1], row[2], row[3]
            )?;
        }
        writeln!(w, "}};")?;
        writeln!(w)?;

        writeln!(w, "/// {{R,G,B, Index of Refraction}}")?;
        writeln!(w, "const vec4 dielectric_params[] = {{")?;
        for row in &self.dielectric {
            writeln!(
                w,
                "    {{{}f, {}f, {}f, {}f}},",
                row[0], row[1], row[2], row[3]
            )?;
        }
        writeln!(w, "}};")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate, Color, SceneConfig, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn sphere(x: f32, material: Arc<Material>) -> Sphere {
        Sphere::new(Vec3::new(x, 0.2, 0.0), 0.2, material)
    }

    /// Look up a sphere's exported parameters through its reference.
    fn resolve(tables: &SceneTables, r: MaterialRef) -> [f32; 4] {
        match r.kind {
            MaterialKind::Diffuse => {
                let [a, b, c] = tables.diffuse[r.index];
                [a, b, c, f32::NAN]
            }
            MaterialKind::Mirror => {
                let [a, b, c] = tables.mirror[r.index];
                [a, b, c, f32::NAN]
            }
            MaterialKind::Metal => tables.metal[r.index],
            MaterialKind::Dielectric => tables.dielectric[r.index],
        }
    }

    #[test]
    fn test_classification_by_kind() {
        let spheres = vec![
            sphere(0.0, Arc::new(Material::Lambertian { albedo: Color::new(0.1, 0.2, 0.3) })),
            sphere(1.0, Arc::new(Material::Metal { albedo: Color::new(0.9, 0.8, 0.7), fuzz: 0.0 })),
            sphere(2.0, Arc::new(Material::Metal { albedo: Color::new(0.6, 0.5, 0.4), fuzz: 0.25 })),
            sphere(3.0, Arc::new(Material::Dielectric { ir: 1.5 })),
        ];

        let tables = SceneTables::build(&spheres);

        assert_eq!(tables.geometry.len(), 4);
        assert_eq!(tables.refs.len(), 4);
        assert_eq!(
            tables.refs,
            vec![
                MaterialRef { kind: MaterialKind::Diffuse, index: 0 },
                MaterialRef { kind: MaterialKind::Mirror, index: 0 },
                MaterialRef { kind: MaterialKind::Metal, index: 0 },
                MaterialRef { kind: MaterialKind::Dielectric, index: 0 },
            ]
        );

        assert_eq!(tables.diffuse, vec![[0.1, 0.2, 0.3]]);
        assert_eq!(tables.mirror, vec![[0.9, 0.8, 0.7]]);
        assert_eq!(tables.metal, vec![[0.6, 0.5, 0.4, 0.25]]);
        assert_eq!(tables.dielectric, vec![[1.0, 1.0, 1.0, 1.5]]);
    }

    #[test]
    fn test_shared_material_gets_row_per_occurrence() {
        // Two spheres sharing one material instance still get two
        // rows and two distinct indices
        let shared = Arc::new(Material::Lambertian {
            albedo: Color::new(0.4, 0.4, 0.4),
        });
        let spheres = vec![sphere(0.0, shared.clone()), sphere(1.0, shared)];

        let tables = SceneTables::build(&spheres);

        assert_eq!(tables.diffuse, vec![[0.4, 0.4, 0.4], [0.4, 0.4, 0.4]]);
        assert_eq!(tables.refs[0].index, 0);
        assert_eq!(tables.refs[1].index, 1);
    }

    #[test]
    fn test_fallback_points_at_first_diffuse_row() {
        assert_eq!(MaterialRef::FALLBACK.kind, MaterialKind::Diffuse);
        assert_eq!(MaterialRef::FALLBACK.index, 0);
    }

    #[test]
    fn test_generated_scene_round_trips() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let scene = generate(&config, &mut rng);
        let tables = SceneTables::build(&scene.spheres);

        assert_eq!(tables.geometry.len(), scene.spheres.len());
        assert_eq!(tables.refs.len(), scene.spheres.len());

        for (sphere, (geo, r)) in scene
            .spheres
            .iter()
            .zip(tables.geometry.iter().zip(&tables.refs))
        {
            let c = sphere.center();
            assert_eq!(*geo, [c.x, c.y, c.z, sphere.radius()]);

            // Every reference must resolve to that sphere's material
            // parameters
            let row = resolve(&tables, *r);
            match **sphere.material() {
                Material::Lambertian { albedo } => {
                    assert_eq!(r.kind, MaterialKind::Diffuse);
                    assert_eq!([row[0], row[1], row[2]], [albedo.x, albedo.y, albedo.z]);
                }
                Material::Metal { albedo, fuzz } if fuzz == 0.0 => {
                    assert_eq!(r.kind, MaterialKind::Mirror);
                    assert_eq!([row[0], row[1], row[2]], [albedo.x, albedo.y, albedo.z]);
                }
                Material::Metal { albedo, fuzz } => {
                    assert_eq!(r.kind, MaterialKind::Metal);
                    assert_eq!(row, [albedo.x, albedo.y, albedo.z, fuzz]);
                }
                Material::Dielectric { ir } => {
                    assert_eq!(r.kind, MaterialKind::Dielectric);
                    assert_eq!(row, [1.0, 1.0, 1.0, ir]);
                }
            }
        }

        // Row counts add up: every sphere lands in exactly one table
        let total = tables.diffuse.len()
            + tables.mirror.len()
            + tables.metal.len()
            + tables.dielectric.len();
        assert_eq!(total, scene.spheres.len());
    }

    #[test]
    fn test_glsl_output_shape() {
        let spheres = vec![
            sphere(0.0, Arc::new(Material::Lambertian { albedo: Color::new(0.5, 0.5, 0.5) })),
            sphere(1.0, Arc::new(Material::Metal { albedo: Color::new(0.7, 0.6, 0.5), fuzz: 0.0 })),
            sphere(2.0, Arc::new(Material::Dielectric { ir: 1.5 })),
        ];
        let tables = SceneTables::build(&spheres);

        let mut out = Vec::new();
        tables.write_glsl(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // The exported arrays, in wire order
        let headers = [
            "const vec4 spheres[] = {",
            "const MaterialRef sphere_materials[spheres.length()] = {",
            "const vec3 lambertian_params[] = {",
            "const vec3 mirror_params[] = {",
            "const vec4 metal_params[] = {",
            "const vec4 dielectric_params[] = {",
        ];
        let mut last = 0;
        for header in headers {
            let pos = text[last..]
                .find(header)
                .unwrap_or_else(|| panic!("missing or out of order: {header}"));
            last += pos;
        }

        assert!(text.contains("{MT_LAMBERTIAN, 0us}"));
        assert!(text.contains("{MT_MIRROR, 0us}"));
        assert!(text.contains("{MT_DIELECTRIC, 0us}"));
        assert!(text.contains("{1f, 1f, 1f, 1.5f}"));
    }
}
