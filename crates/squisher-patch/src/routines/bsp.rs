use squisher_cache::definitions::{vertex_type, StructureBsp, StructureLightmap, StructureMaterial};
use squisher_cache::{CacheFile, CachedBsp, TagId};

use super::{out_of_bounds, set_u16};
use crate::Result;

/// Reset the vertex types of every lightmap material in every cached BSP.
pub fn fix_cached_bsps(cache: &mut CacheFile) -> Result<bool> {
    let mut changed = false;
    for bsp in cache.cached_bsps()? {
        changed |= fix_cached_bsp(cache, &bsp)?;
    }
    Ok(changed)
}

fn fix_cached_bsp(cache: &mut CacheFile, bsp: &CachedBsp) -> Result<bool> {
    let tag_id = TagId::from_raw(bsp.reference.structure_bsp.tag_id.get());
    let space = bsp.space;
    let lightmaps = cache
        .block::<StructureBsp>(&space, bsp.structure_bsp_address())
        .ok_or_else(|| out_of_bounds(cache, tag_id, "structure BSP".to_owned()))?
        .lightmaps;

    let mut changed = false;
    for l in 0..lightmaps.count() {
        let materials = cache
            .element::<StructureLightmap>(&space, &lightmaps, l)
            .ok_or_else(|| out_of_bounds(cache, tag_id, format!("lightmap {l}")))?
            .materials;

        for m in 0..materials.count() {
            let Some(material) = cache.element_mut::<StructureMaterial>(&space, &materials, m) else {
                return Err(out_of_bounds(cache, tag_id, format!("material {m} of lightmap {l}")));
            };
            changed |= set_u16(&mut material.vertices.vertex_type, vertex_type::ENVIRONMENT_UNCOMPRESSED);
            if material.lightmap_vertices.count.get() != 0 {
                changed |= set_u16(
                    &mut material.lightmap_vertices.vertex_type,
                    vertex_type::ENVIRONMENT_LIGHTMAP_UNCOMPRESSED,
                );
            }
        }
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use squisher_cache::builder::CacheFileBuilder;
    use squisher_cache::Reflexive;
    use zerocopy::{FromZeros, IntoBytes};

    const BASE: u32 = 0x4200_0000;

    /// BSP contents laid out from `BASE + 24`: the structure BSP, one
    /// lightmap, then `materials`.
    fn bsp_contents(materials: &[StructureMaterial], material_count: u32) -> Vec<u8> {
        let structure_bsp_address = BASE + 24;
        let lightmap_address = structure_bsp_address + std::mem::size_of::<StructureBsp>() as u32;
        let materials_address = lightmap_address + std::mem::size_of::<StructureLightmap>() as u32;

        let mut structure_bsp = StructureBsp::new_zeroed();
        structure_bsp.lightmaps = reflexive(1, lightmap_address);
        let mut lightmap = StructureLightmap::new_zeroed();
        lightmap.materials = reflexive(material_count, materials_address);

        let mut contents = structure_bsp.as_bytes().to_vec();
        contents.extend_from_slice(lightmap.as_bytes());
        for material in materials {
            contents.extend_from_slice(material.as_bytes());
        }
        contents
    }

    fn reflexive(count: u32, address: u32) -> Reflexive {
        let mut reflexive = Reflexive::new_zeroed();
        reflexive.count.set(count);
        reflexive.address.set(address);
        reflexive
    }

    #[test]
    fn test_vertex_types_reset() {
        let mut unlit = StructureMaterial::new_zeroed();
        unlit.vertices.vertex_type.set(7);
        unlit.lightmap_vertices.vertex_type.set(7);
        let mut lit = StructureMaterial::new_zeroed();
        lit.vertices.vertex_type.set(1);
        lit.lightmap_vertices.vertex_type.set(3);
        lit.lightmap_vertices.count.set(12);

        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        builder.add_bsp("levels\\test\\test", BASE, &bsp_contents(&[unlit, lit], 2));

        let mut cache = CacheFile::load(builder.build()).unwrap();
        assert!(fix_cached_bsps(&mut cache).unwrap());
        assert!(!fix_cached_bsps(&mut cache).unwrap());

        let bsp = cache.cached_bsps().unwrap()[0];
        let structure_bsp = cache.block::<StructureBsp>(&bsp.space, bsp.structure_bsp_address()).unwrap();
        let lightmap = cache
            .element::<StructureLightmap>(&bsp.space, &structure_bsp.lightmaps, 0)
            .unwrap();
        let materials = lightmap.materials;

        let unlit = cache.element::<StructureMaterial>(&bsp.space, &materials, 0).unwrap();
        assert_eq!(unlit.vertices.vertex_type.get(), 0);
        assert_eq!(unlit.lightmap_vertices.vertex_type.get(), 7);
        let lit = cache.element::<StructureMaterial>(&bsp.space, &materials, 1).unwrap();
        assert_eq!(lit.vertices.vertex_type.get(), 0);
        assert_eq!(lit.lightmap_vertices.vertex_type.get(), 2);
    }

    #[test]
    fn test_material_out_of_bounds() {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let material = StructureMaterial::new_zeroed();
        builder.add_bsp("levels\\test\\test", BASE, &bsp_contents(&[material], 2));

        let mut cache = CacheFile::load(builder.build()).unwrap();
        let error = fix_cached_bsps(&mut cache).unwrap_err();
        assert_eq!(
            error.to_string(),
            "material 1 of lightmap 0 in \"levels\\test\\test.scenario_structure_bsp\" is out of bounds"
        );
    }

    #[test]
    fn test_no_bsps() {
        let mut builder = CacheFileBuilder::new();
        builder.add_scenario("levels\\test\\test");
        let mut cache = CacheFile::load(builder.build()).unwrap();
        assert!(!fix_cached_bsps(&mut cache).unwrap());
    }
}
