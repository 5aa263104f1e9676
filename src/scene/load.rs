use crate::{
    foundation::error::{BakeError, BakeResult},
    scene::model::Scene,
    scene::walker::PreparedScene,
    storage::StreamStorage,
};

/// Read a JSON [`Scene`] from `storage`.
pub fn load_scene(storage: &dyn StreamStorage, path: &str) -> BakeResult<Scene> {
    let reader = storage.create_input_stream(path)?;
    let scene: Scene = serde_json::from_reader(reader)
        .map_err(|e| BakeError::serde(format!("parse scene '{path}': {e}")))?;
    tracing::debug!(
        path,
        symbols = scene.symbols.len(),
        bitmaps = scene.bitmaps.len(),
        "scene loaded"
    );
    Ok(scene)
}

/// Read, validate and prepare a scene for baking.
pub fn load_prepared_scene(storage: &dyn StreamStorage, path: &str) -> BakeResult<PreparedScene> {
    PreparedScene::prepare(load_scene(storage, path)?)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/load.rs"]
mod tests;
