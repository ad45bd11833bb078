//! Surface sampling of mesh assets into normalized point clouds.
//!
//! A model is reduced to world-space triangles per primitive ("submesh"), points
//! are spread over the submeshes in proportion to their surface area, and the
//! resulting cloud is centred and scaled to a fixed size so every model fits the
//! same space inside the bagua ring.

use crate::error::{Result, SceneError};
use glam::{Mat4, Vec3};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    pub fn area(&self) -> f32 {
        0.5 * (self.b - self.a).cross(self.c - self.a).length()
    }

    /// Uniformly distributed point on the triangle.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let r1 = rng.gen::<f32>().sqrt();
        let r2 = rng.gen::<f32>();
        self.a * (1.0 - r1) + self.b * (r1 * (1.0 - r2)) + self.c * (r1 * r2)
    }
}

/// World-space triangles of one renderable primitive.
#[derive(Clone, Debug, Default)]
pub struct SurfaceMesh {
    pub name: String,
    pub triangles: Vec<Triangle>,
}

impl SurfaceMesh {
    pub fn surface_area(&self) -> f32 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    fn sampler(&self) -> Option<TriangleSampler<'_>> {
        let mut acc = 0.0;
        let cumulative: Vec<f32> = self
            .triangles
            .iter()
            .map(|t| {
                acc += t.area();
                acc
            })
            .collect();
        (acc > 0.0).then_some(TriangleSampler {
            triangles: &self.triangles,
            cumulative,
            total: acc,
        })
    }
}

struct TriangleSampler<'a> {
    triangles: &'a [Triangle],
    cumulative: Vec<f32>,
    total: f32,
}

impl TriangleSampler<'_> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let pick = rng.gen::<f32>() * self.total;
        let idx = self
            .cumulative
            .partition_point(|&c| c <= pick)
            .min(self.triangles.len() - 1);
        self.triangles[idx].sample(rng)
    }
}

/// Parse a binary glTF asset into world-space submeshes.
///
/// Only the embedded binary chunk is read; external buffer URIs are reported
/// as missing data and their primitives skipped.
pub fn load_glb(bytes: &[u8]) -> Result<Vec<SurfaceMesh>> {
    let gltf = gltf::Gltf::from_slice(bytes)
        .map_err(|e| SceneError::Asset(format!("Failed to parse glTF: {}", e)))?;
    let blob = gltf.blob.as_deref();

    let scene = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
        Some(s) => s,
        None => {
            log::warn!("[sampler] asset has no scene");
            return Ok(Vec::new());
        }
    };

    let mut meshes = Vec::new();
    let mut stack: Vec<(gltf::Node, Mat4)> =
        scene.nodes().map(|n| (n, Mat4::IDENTITY)).collect();

    while let Some((node, parent)) = stack.pop() {
        let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

        if let Some(mesh) = node.mesh() {
            let mesh_name = mesh
                .name()
                .map(String::from)
                .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    continue;
                }
                let reader = primitive.reader(|buffer| match buffer.source() {
                    gltf::buffer::Source::Bin => blob,
                    gltf::buffer::Source::Uri(_) => None,
                });
                let positions: Vec<Vec3> = match reader.read_positions() {
                    Some(iter) => iter
                        .map(|p| world.transform_point3(Vec3::from_array(p)))
                        .collect(),
                    None => {
                        log::warn!("[sampler] {} has no readable positions", mesh_name);
                        continue;
                    }
                };
                let indices: Vec<u32> = reader
                    .read_indices()
                    .map(|iter| iter.into_u32().collect())
                    .unwrap_or_else(|| (0..positions.len() as u32).collect());

                let triangles = indices
                    .chunks_exact(3)
                    .filter_map(|tri| {
                        let a = *positions.get(tri[0] as usize)?;
                        let b = *positions.get(tri[1] as usize)?;
                        let c = *positions.get(tri[2] as usize)?;
                        Some(Triangle::new(a, b, c))
                    })
                    .collect::<Vec<_>>();

                if !triangles.is_empty() {
                    meshes.push(SurfaceMesh {
                        name: format!("{}#{}", mesh_name, primitive.index()),
                        triangles,
                    });
                }
            }
        }

        stack.extend(node.children().map(|child| (child, world)));
    }

    Ok(meshes)
}

/// Split `count` across weights so the parts sum to exactly `count`.
fn allocate_by_area(areas: &[f32], count: usize) -> Vec<usize> {
    let total: f32 = areas.iter().sum();
    if total <= 0.0 || count == 0 {
        return vec![0; areas.len()];
    }
    let exact: Vec<f64> = areas
        .iter()
        .map(|a| count as f64 * (*a as f64 / total as f64))
        .collect();
    let mut parts: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let assigned: usize = parts.iter().sum();

    // largest remainder first
    let mut order: Vec<usize> = (0..areas.len()).collect();
    order.sort_by(|&i, &j| {
        let ri = exact[i] - exact[i].floor();
        let rj = exact[j] - exact[j].floor();
        rj.partial_cmp(&ri).unwrap_or(std::cmp::Ordering::Equal)
    });
    for &i in order.iter().take(count.saturating_sub(assigned)) {
        parts[i] += 1;
    }
    parts
}

/// Area-weighted raw samples in world space (not normalized).
pub fn sample_points<R: Rng + ?Sized>(
    meshes: &[SurfaceMesh],
    count: usize,
    rng: &mut R,
) -> Vec<Vec3> {
    let samplers: Vec<Option<TriangleSampler>> = meshes.iter().map(SurfaceMesh::sampler).collect();
    let areas: Vec<f32> = samplers
        .iter()
        .map(|s| s.as_ref().map_or(0.0, |s| s.total))
        .collect();
    let parts = allocate_by_area(&areas, count);

    let mut out = Vec::with_capacity(count);
    for (sampler, n) in samplers.iter().zip(parts) {
        if let Some(sampler) = sampler {
            out.extend((0..n).map(|_| sampler.sample(rng)));
        }
    }
    out
}

/// Centre the bounding box on the origin and scale its longest side to `target_size`.
pub fn normalize_points(points: &mut [Vec3], target_size: f32) {
    if points.is_empty() {
        return;
    }
    let (min, max) = points
        .iter()
        .fold((Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    let center = (min + max) * 0.5;
    let max_dim = (max - min).max_element();
    let scale = if max_dim > f32::EPSILON {
        target_size / max_dim
    } else {
        1.0
    };
    for p in points.iter_mut() {
        *p = (*p - center) * scale;
    }
}

/// Flatten points into the `[x, y, z, x, y, z, ...]` layout the particle field consumes.
pub fn flatten(points: &[Vec3]) -> Vec<f32> {
    points.iter().flat_map(|p| p.to_array()).collect()
}

/// Sample and normalize: empty when the meshes have no area.
pub fn sample_surfaces<R: Rng + ?Sized>(
    meshes: &[SurfaceMesh],
    count: usize,
    target_size: f32,
    rng: &mut R,
) -> Vec<f32> {
    let mut points = sample_points(meshes, count, rng);
    normalize_points(&mut points, target_size);
    flatten(&points)
}

/// Load a GLB asset and sample it into a normalized, flat point buffer.
pub fn sample_model<R: Rng + ?Sized>(
    bytes: &[u8],
    count: usize,
    target_size: f32,
    rng: &mut R,
) -> Result<Vec<f32>> {
    let meshes = load_glb(bytes)?;
    if meshes.is_empty() {
        log::warn!("[sampler] asset has no renderable surfaces");
        return Ok(Vec::new());
    }
    let points = sample_surfaces(&meshes, count, target_size, rng);
    log::info!(
        "[sampler] {} submeshes -> {} points",
        meshes.len(),
        points.len() / 3
    );
    Ok(points)
}
