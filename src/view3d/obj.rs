//! OBJ model import
//!
//! Supports the subset furniture exports use: positions (v), texture
//! coordinates (vt), normals (vn) and polygonal faces (f). Everything else
//! (o, g, s, usemtl, mtllib) is ignored.

use super::assets::AssetLoadError;
use super::mesh::Mesh;
use crate::rasterizer::{Face, Vec2, Vec3, Vertex};
use std::collections::HashMap;

/// Sentinel for an omitted vt or vn index
const MISSING: usize = usize::MAX;

pub struct ObjImporter;

impl ObjImporter {
    /// Parse OBJ text into a triangle mesh
    pub fn parse(contents: &str) -> Result<Mesh, AssetLoadError> {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut tex_coords: Vec<Vec2> = Vec::new();
        let mut normals: Vec<Vec3> = Vec::new();

        let mut vertices: Vec<Vertex> = Vec::new();
        let mut faces: Vec<Face> = Vec::new();

        // (pos, uv, normal) index triple -> vertex index
        let mut vertex_cache: HashMap<(usize, usize, usize), usize> = HashMap::new();

        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => {
                    if parts.len() < 4 {
                        return Err(parse_error(line_num, "vertex position needs 3 values"));
                    }
                    positions.push(Vec3::new(
                        parse_float(parts[1], line_num)?,
                        parse_float(parts[2], line_num)?,
                        parse_float(parts[3], line_num)?,
                    ));
                }
                "vt" => {
                    if parts.len() < 3 {
                        return Err(parse_error(line_num, "texture coordinate needs 2 values"));
                    }
                    // OBJ puts v = 0 at the bottom of the image
                    let u = parse_float(parts[1], line_num)?;
                    let v = parse_float(parts[2], line_num)?;
                    tex_coords.push(Vec2::new(u, 1.0 - v));
                }
                "vn" => {
                    if parts.len() < 4 {
                        return Err(parse_error(line_num, "normal needs 3 values"));
                    }
                    normals.push(Vec3::new(
                        parse_float(parts[1], line_num)?,
                        parse_float(parts[2], line_num)?,
                        parse_float(parts[3], line_num)?,
                    ));
                }
                "f" => {
                    if parts.len() < 4 {
                        return Err(parse_error(line_num, "face needs at least 3 vertices"));
                    }
                    let mut face_verts = Vec::with_capacity(parts.len() - 1);
                    for spec in &parts[1..] {
                        let key = parse_face_vertex(spec, line_num, &positions, &tex_coords, &normals)?;
                        let index = *vertex_cache.entry(key).or_insert_with(|| {
                            let (p, t, n) = key;
                            let uv = if t == MISSING { Vec2::default() } else { tex_coords[t] };
                            let normal = if n == MISSING { Vec3::ZERO } else { normals[n] };
                            vertices.push(Vertex::new(positions[p], uv, normal));
                            vertices.len() - 1
                        });
                        face_verts.push(index);
                    }
                    // Fan triangulation keeps the file's counter-clockwise winding
                    for i in 1..face_verts.len() - 1 {
                        faces.push(Face::new(face_verts[0], face_verts[i], face_verts[i + 1]));
                    }
                }
                _ => {}
            }
        }

        if vertices.is_empty() {
            return Err(AssetLoadError::Parse("no vertices in OBJ file".to_string()));
        }
        if faces.is_empty() {
            return Err(AssetLoadError::Parse("no faces in OBJ file".to_string()));
        }

        Ok(Mesh::new(vertices, faces))
    }
}

fn parse_error(line_num: usize, msg: &str) -> AssetLoadError {
    AssetLoadError::Parse(format!("line {}: {}", line_num + 1, msg))
}

/// Parse "1", "1/2", "1//3" or "1/2/3" into resolved indices
fn parse_face_vertex(
    spec: &str,
    line_num: usize,
    positions: &[Vec3],
    tex_coords: &[Vec2],
    normals: &[Vec3],
) -> Result<(usize, usize, usize), AssetLoadError> {
    let mut fields = spec.split('/');
    let pos = match fields.next() {
        Some(p) if !p.is_empty() => parse_index(p, positions.len(), line_num)?,
        _ => return Err(parse_error(line_num, "missing position index in face")),
    };
    let tex = match fields.next() {
        Some(t) if !t.is_empty() => parse_index(t, tex_coords.len(), line_num)?,
        _ => MISSING,
    };
    let norm = match fields.next() {
        Some(n) if !n.is_empty() => parse_index(n, normals.len(), line_num)?,
        _ => MISSING,
    };
    Ok((pos, tex, norm))
}

fn parse_float(s: &str, line_num: usize) -> Result<f32, AssetLoadError> {
    s.parse()
        .map_err(|_| AssetLoadError::Parse(format!("line {}: invalid number '{}'", line_num + 1, s)))
}

/// 1-based index, or negative relative to the current count
fn parse_index(s: &str, count: usize, line_num: usize) -> Result<usize, AssetLoadError> {
    let idx: i64 = s
        .parse()
        .map_err(|_| AssetLoadError::Parse(format!("line {}: invalid index '{}'", line_num + 1, s)))?;

    let resolved = match idx {
        0 => return Err(parse_error(line_num, "index cannot be 0")),
        i if i > 0 => i - 1,
        i => count as i64 + i,
    };
    if resolved < 0 || resolved as usize >= count {
        return Err(AssetLoadError::Parse(format!(
            "line {}: index {} out of range (have {})",
            line_num + 1,
            idx,
            count
        )));
    }
    Ok(resolved as usize)
}
