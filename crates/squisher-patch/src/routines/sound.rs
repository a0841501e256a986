use squisher_cache::definitions::Sound;
use squisher_cache::{CacheFile, TagId};

use super::invalid_tag;
use crate::Result;

/// Default (minimum, maximum) distances for a sound class.
fn default_distances(sound_class: u16) -> Option<(f32, f32)> {
    Some(match sound_class {
        // projectile impact, vehicle collision, vehicle engine
        0 | 22 | 23 => (1.4, 8.0),
        // projectile detonation
        1 => (8.0, 120.0),
        // weapon fire
        4 => (4.0, 70.0),
        // weapon ready, reload, empty, charge, overheat, idle
        5..=10 => (1.0, 9.0),
        // object and particle impacts, computers, first person damage
        13 | 14 | 15 | 30 | 35 | 39 => (0.5, 3.0),
        // unit footsteps
        18 => (0.9, 10.0),
        // dialog and game events
        19 | 44 | 46 | 47 | 50 => (3.0, 20.0),
        // devices, music, ambience
        26..=29 | 32 | 33 | 34 => (0.9, 5.0),
        // scripted effect
        45 => (2.0, 5.0),
        _ => return None,
    })
}

/// Fill in unset distance bounds from the sound class.
pub fn fix_sound(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let Some(sound) = cache.tag_mut::<Sound>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };

    let minimum = sound.minimum_distance.get();
    let maximum = sound.maximum_distance.get();
    if minimum > 0.0 && maximum > 0.0 {
        return Ok(false);
    }
    let Some((default_minimum, default_maximum)) = default_distances(sound.sound_class.get()) else {
        return Ok(false);
    };

    let mut changed = false;
    if minimum <= 0.0 {
        sound.minimum_distance.set(default_minimum);
        changed = true;
    }
    if maximum <= 0.0 {
        sound.maximum_distance.set(default_maximum);
        changed = true;
    }
    Ok(changed)
}
