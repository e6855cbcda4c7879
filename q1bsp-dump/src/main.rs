use std::{env, path::Path, process::ExitCode};

use glam::Vec3;
use q1bsp::prelude::*;
use thiserror::Error;

const CONFIG_PATH: &str = "conf.ini";

#[derive(Debug, Error)]
enum DumpError {
    #[error("usage: q1bsp-dump <map.bsp> [conf.ini]")]
    Usage,
    #[error(transparent)]
    Import(#[from] BspError),
}

fn load_config(path: Option<&str>) -> Result<ImportConfig, BspError> {
    let path = match path {
        Some(path) => path,
        None if Path::new(CONFIG_PATH).exists() => CONFIG_PATH,
        None => return Ok(ImportConfig::default()),
    };
    ImportConfig::load(Path::new(path))
}

fn dump(result: &ImportResult) {
    println!("BSP version {}", result.version);
    println!(
        "{} bytes of entities, {} texture slots",
        result.entities.len(),
        result.texture_slots.len()
    );

    for (bin, atlas) in result.textures.iter().enumerate() {
        println!(
            "atlas {bin}: {}x{} x{} layers, {} mips{}",
            atlas.width,
            atlas.height,
            atlas.layers,
            atlas.mip_count(),
            if atlas.corrupt { " (corrupt)" } else { "" }
        );
        for name in &atlas.names {
            println!("    {name}");
        }
    }

    println!(
        "lightmap: {}x{}{}",
        result.lightmap.width,
        result.lightmap.height,
        if result.lightmap.fullbright {
            " (fullbright)"
        } else {
            ""
        }
    );

    let mut mins = Vec3::MAX;
    let mut maxs = Vec3::MIN;
    for mesh in &result.models {
        mins = mins.min(mesh.mins + mesh.origin);
        maxs = maxs.max(mesh.maxs + mesh.origin);
        println!(
            "model {}: {} vertices, {} triangles, {} submeshes",
            mesh.model,
            mesh.vertices.len(),
            mesh.tri_count(),
            mesh.submeshes.len()
        );
    }
    if !result.models.is_empty() {
        println!("bounds: {mins} .. {maxs}");
    }

    if !result.warnings.is_empty() {
        println!("{} warnings", result.warnings.len());
    }
}

fn run() -> Result<(), DumpError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (map, config) = match args.as_slice() {
        [map] => (map, None),
        [map, config] => (map, Some(config.as_str())),
        _ => return Err(DumpError::Usage),
    };

    let config = load_config(config)?;
    log::info!("{config:?}");

    let result = import_file(map, &config)?;
    dump(&result);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod dump_tests {
    use std::fs;

    use super::*;

    #[test]
    fn explicit_config_is_loaded() {
        let path = env::temp_dir().join(format!("q1bsp-dump-{}.ini", std::process::id()));
        fs::write(&path, "[import]\nscale = 2\nvertex_sharing = per_face\n").unwrap();
        let config = load_config(path.to_str());
        fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.scale, 2.0);
        assert_eq!(config.vertex_sharing, VertexSharing::PerFace);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        assert!(matches!(
            load_config(Some("/nonexistent/q1bsp/conf.ini")),
            Err(BspError::Config(_))
        ));
    }
}
