use std::path::{Path, PathBuf};

use blockforge_geom::Vec3;
use blockforge_voxelize::{TexturedMesh, Texture};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshLoadError {
    #[error("cannot load mesh {}: {source}", path.display())]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("cannot load texture {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Loads a Wavefront OBJ as one triangulated mesh. Models are concatenated;
/// vertices of models without texture coordinates get NaN UVs.
pub fn load_obj_mesh(path: impl AsRef<Path>) -> Result<TexturedMesh, MeshLoadError> {
    let path = path.as_ref();
    let opts = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };
    let (models, _materials) = tobj::load_obj(path, &opts).map_err(|source| MeshLoadError::Obj {
        path: path.to_path_buf(),
        source,
    })?;

    let mut mesh = TexturedMesh::default();
    for model in &models {
        let m = &model.mesh;
        let base = mesh.positions.len() as u32;
        let n = m.positions.len() / 3;
        for v in m.positions.chunks_exact(3) {
            mesh.positions
                .push(Vec3::new(v[0] as f64, v[1] as f64, v[2] as f64));
        }
        if m.texcoords.len() >= n * 2 {
            for t in m.texcoords.chunks_exact(2).take(n) {
                mesh.uvs.push([t[0] as f64, t[1] as f64]);
            }
        } else {
            log::warn!("model '{}' has no texture coordinates", model.name);
            mesh.uvs.extend(std::iter::repeat_n([f64::NAN; 2], n));
        }
        for tri in m.indices.chunks_exact(3) {
            mesh.faces.push([base + tri[0], base + tri[1], base + tri[2]]);
        }
    }
    log::info!(
        "loaded {} ({} models, {} vertices, {} faces)",
        path.display(),
        models.len(),
        mesh.positions.len(),
        mesh.face_count()
    );
    Ok(mesh)
}

pub fn load_texture(path: impl AsRef<Path>) -> Result<Texture, MeshLoadError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| MeshLoadError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let tex = Texture::from_image(img);
    log::info!(
        "loaded texture {} ({}x{}, {} channels)",
        path.display(),
        tex.width(),
        tex.height(),
        tex.channels()
    );
    Ok(tex)
}
