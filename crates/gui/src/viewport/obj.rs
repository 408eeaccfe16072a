//! Wavefront OBJ loading.
//!
//! Only geometry is read: `v`, `vn` and `f`. Texture coordinates, groups,
//! smoothing groups and material statements are skipped. Polygons are
//! fan-triangulated. Corners without a normal get an area-weighted vertex
//! normal computed from the faces that share the position.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;

use super::mesh::MeshData;

/// Error type for OBJ loading.
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: expected 3 coordinates")]
    MissingCoordinates { line: usize },

    #[error("line {line}: malformed face vertex '{token}'")]
    MalformedVertex { line: usize, token: String },

    #[error("line {line}: {kind} index {index} out of range")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
    },

    #[error("line {line}: face needs at least 3 vertices")]
    DegenerateFace { line: usize },

    #[error("no faces found")]
    NoFaces,
}

/// One face corner: resolved position index and optional normal index
type Corner = (usize, Option<usize>);

/// Read and parse an OBJ file, painting every vertex with `color`.
pub fn load_obj(path: impl AsRef<Path>, color: [f32; 3]) -> Result<MeshData, ObjError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ObjError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_obj(&source, color)
}

/// Parse OBJ text into an indexed triangle mesh.
pub fn parse_obj(source: &str, color: [f32; 3]) -> Result<MeshData, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut triangles: Vec<[Corner; 3]> = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        let mut tokens = content.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => positions.push(parse_vec3(&mut tokens, line)?),
            "vn" => normals.push(parse_vec3(&mut tokens, line)?),
            "f" => {
                let corners = tokens
                    .map(|token| parse_corner(token, line, positions.len(), normals.len()))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(ObjError::DegenerateFace { line });
                }
                for k in 1..corners.len() - 1 {
                    triangles.push([corners[0], corners[k], corners[k + 1]]);
                }
            }
            _ => {}
        }
    }

    if triangles.is_empty() {
        return Err(ObjError::NoFaces);
    }

    let smooth = smooth_normals(&positions, &triangles);

    let mut mesh = MeshData::default();
    let mut emitted: HashMap<Corner, u32> = HashMap::new();
    for triangle in &triangles {
        for &corner in triangle {
            let index = *emitted.entry(corner).or_insert_with(|| {
                let (p, n) = corner;
                let normal = match n {
                    Some(n) => normals[n].normalize_or_zero(),
                    None => smooth[p],
                };
                mesh.push_vertex(positions[p], normal, color)
            });
            mesh.indices.push(index);
        }
    }

    tracing::debug!(
        "Parsed OBJ: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

fn parse_vec3<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Vec3, ObjError> {
    let mut coords = [0.0_f32; 3];
    for coord in coords.iter_mut() {
        let token = tokens.next().ok_or(ObjError::MissingCoordinates { line })?;
        *coord = token.parse().map_err(|_| ObjError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(Vec3::from_array(coords))
}

/// Parse `v`, `v/vt`, `v//vn` or `v/vt/vn`.
fn parse_corner(
    token: &str,
    line: usize,
    position_count: usize,
    normal_count: usize,
) -> Result<Corner, ObjError> {
    let malformed = || ObjError::MalformedVertex {
        line,
        token: token.to_string(),
    };
    // v, v/vt, v//vn or v/vt/vn; the shape is checked before any index
    let parts: Vec<&str> = token.split('/').collect();
    if parts.len() > 3 || parts[0].is_empty() {
        return Err(malformed());
    }

    let position = resolve_index(parts[0], line, position_count, "position")?;
    let normal = match parts.get(2) {
        Some(n) if !n.is_empty() => Some(resolve_index(n, line, normal_count, "normal")?),
        _ => None,
    };
    Ok((position, normal))
}

/// OBJ indices are 1-based; negative values count back from the last element.
fn resolve_index(
    token: &str,
    line: usize,
    count: usize,
    kind: &'static str,
) -> Result<usize, ObjError> {
    let index: i64 = token.parse().map_err(|_| ObjError::InvalidNumber {
        line,
        token: token.to_string(),
    })?;
    let resolved = if index > 0 {
        index - 1
    } else {
        count as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(ObjError::IndexOutOfRange { line, kind, index });
    }
    Ok(resolved as usize)
}

fn smooth_normals(positions: &[Vec3], triangles: &[[Corner; 3]]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for [(a, _), (b, _), (c, _)] in triangles {
        // Cross product length is twice the area, so larger faces weigh more
        let face = (positions[*b] - positions[*a]).cross(positions[*c] - positions[*a]);
        acc[*a] += face;
        acc[*b] += face;
        acc[*c] += face;
    }
    acc.into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            if n == Vec3::ZERO {
                Vec3::Y
            } else {
                n
            }
        })
        .collect()
}
