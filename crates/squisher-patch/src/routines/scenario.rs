use memchr::memmem;
use tracing::warn;

use squisher_cache::definitions::{AiConversation, ConversationLine, ConversationParticipant, Scenario};
use squisher_cache::{CacheFile, TagId};

use super::{invalid_tag, out_of_bounds, set_u16};
use crate::Result;

/// Variant number of an unused dialogue slot.
const NO_VARIANT: u16 = 0xFFFF;

/// Dialogue path fragments and the variant number they select. Checked in
/// order, so `sarge2` must precede `sarge`.
const VARIANT_NUMBERS: [(&[u8], u16); 9] = [
    (b"bisenti", 2),
    (b"fitzgerald", 4),
    (b"jenkins", 4),
    (b"aussie", 5),
    (b"mendoza", 6),
    (b"sarge2", 101),
    (b"sarge", 100),
    (b"johnson", 100),
    (b"lehto", 101),
];

fn variant_number(dialogue_path: &[u8]) -> u16 {
    VARIANT_NUMBERS
        .iter()
        .find(|(fragment, _)| memmem::find(dialogue_path, fragment).is_some())
        .map_or(0, |&(_, number)| number)
}

/// Recompute conversation participant variant numbers and drop Xbox-only
/// scavenger hunt objects.
pub fn fix_scenario(cache: &mut CacheFile, tag_id: TagId) -> Result<bool> {
    let Some(scenario) = cache.tag_mut::<Scenario>(tag_id) else {
        return Err(invalid_tag(cache, tag_id));
    };

    let mut changed = false;
    let hunt = &mut scenario.scavenger_hunt_objects;
    let had_scavenger_hunt = !hunt.is_empty();
    if had_scavenger_hunt {
        hunt.count.set(0);
        hunt.address.set(0);
        hunt.definition.set(0);
        changed = true;
    }
    let conversations = scenario.ai_conversations;

    if had_scavenger_hunt {
        warn!(
            "\"{}\" had scavenger hunt objects, which are not supported on PC; they were removed",
            cache.get_extension_or_placeholder(tag_id)
        );
    }

    let space = cache.tag_space();
    for c in 0..conversations.count() {
        let conversation = *cache
            .element::<AiConversation>(&space, &conversations, c)
            .ok_or_else(|| out_of_bounds(cache, tag_id, format!("AI conversation {c}")))?;
        let lines = conversation.lines;
        let participants = conversation.participants;

        for p in 0..participants.count() {
            let mut variants = [NO_VARIANT; 6];

            // Later lines win when several target the same participant
            for l in 0..lines.count() {
                let line = *cache
                    .element::<ConversationLine>(&space, &lines, l)
                    .ok_or_else(|| {
                        out_of_bounds(cache, tag_id, format!("line {l} of AI conversation {c}"))
                    })?;
                if u32::from(line.participant.get()) != p {
                    continue;
                }
                for (slot, dialogue) in variants.iter_mut().zip(&line.variants) {
                    let dialogue = dialogue.tag_id();
                    if !dialogue.is_null() {
                        *slot = cache.get_tag_path(dialogue).map_or(0, variant_number);
                    }
                }
            }

            let Some(participant) = cache.element_mut::<ConversationParticipant>(&space, &participants, p)
            else {
                return Err(out_of_bounds(
                    cache,
                    tag_id,
                    format!("participant {p} of AI conversation {c}"),
                ));
            };
            for (field, variant) in participant.variant_numbers.iter_mut().zip(variants) {
                changed |= set_u16(field, variant);
            }
        }
    }

    Ok(changed)
}
