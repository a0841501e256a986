use squisher_cache::definitions::{Shader, ShaderModel};
use squisher_cache::{CacheFile, TagGroup, TagId, TagReference};
use zerocopy::IntoBytes;

use super::{invalid_tag, set_f32, set_u16};
use crate::Result;

/// Truncate corrupted shader types and make them agree with the tag's group.
pub fn fix_shader(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let primary = cache.record(tag_id).and_then(|record| record.primary());
    let Some(shader) = cache.tag_mut::<Shader>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };

    let mut shader_type = shader.shader_type.get();
    if shader_type >= 0xFF00 {
        shader_type &= 0x00FF;
    }
    if let Some(expected) = primary.and_then(Shader::type_for) {
        shader_type = expected;
    }
    Ok(set_u16(&mut shader.shader_type, shader_type))
}

/// Reset the reflection bump map fields, which the compilers copy without
/// byte swapping.
pub fn fix_shader_model(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let Some(model) = cache.tag_mut::<ShaderModel>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };

    let mut changed = set_f32(&mut model.reflection_bump_map_scale, 1.0);
    let null = TagReference::null(TagGroup::Bitmap);
    if model.reflection_bump_map.as_bytes() != null.as_bytes() {
        model.reflection_bump_map = null;
        changed = true;
    }
    Ok(changed)
}
