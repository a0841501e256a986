//! Halo CE tag groups.

use std::borrow::Cow;
use std::fmt;

/// Group code stored in unused group slots.
pub const GROUP_NONE: u32 = 0xFFFF_FFFF;

macro_rules! tag_groups {
    ($($variant:ident => $fourcc:literal, $extension:literal;)+) => {
        /// A tag group known to Halo CE.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TagGroup {
            $($variant,)+
        }

        impl TagGroup {
            /// Every known group.
            pub const ALL: &'static [TagGroup] = &[$(TagGroup::$variant,)+];

            /// The group's four-character code as stored in tag data.
            pub const fn fourcc(self) -> u32 {
                match self {
                    $(TagGroup::$variant => u32::from_be_bytes(*$fourcc),)+
                }
            }

            /// File extension used for tags of this group.
            pub const fn extension(self) -> &'static str {
                match self {
                    $(TagGroup::$variant => $extension,)+
                }
            }

            /// Look a group up by its four-character code.
            pub fn from_fourcc(fourcc: u32) -> Option<TagGroup> {
                match &fourcc.to_be_bytes() {
                    $($fourcc => Some(TagGroup::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

tag_groups! {
    Actor => b"actr", "actor";
    ActorVariant => b"actv", "actor_variant";
    Antenna => b"ant!", "antenna";
    ModelAnimations => b"antr", "model_animations";
    Biped => b"bipd", "biped";
    Bitmap => b"bitm", "bitmap";
    Spheroid => b"boom", "spheroid";
    ContinuousDamageEffect => b"cdmg", "continuous_damage_effect";
    ModelCollisionGeometry => b"coll", "model_collision_geometry";
    ColorTable => b"colo", "color_table";
    Contrail => b"cont", "contrail";
    DeviceControl => b"ctrl", "device_control";
    Decal => b"deca", "decal";
    UiWidgetDefinition => b"DeLa", "ui_widget_definition";
    InputDeviceDefaults => b"devc", "input_device_defaults";
    Device => b"devi", "device";
    DetailObjectCollection => b"dobc", "detail_object_collection";
    Effect => b"effe", "effect";
    Lightning => b"elec", "lightning";
    Equipment => b"eqip", "equipment";
    Flag => b"flag", "flag";
    Fog => b"fog ", "fog";
    Font => b"font", "font";
    MaterialEffects => b"foot", "material_effects";
    Garbage => b"garb", "garbage";
    Glow => b"glw!", "glow";
    GrenadeHudInterface => b"grhi", "grenade_hud_interface";
    HudMessageText => b"hmt ", "hud_message_text";
    HudNumber => b"hud#", "hud_number";
    HudGlobals => b"hudg", "hud_globals";
    Item => b"item", "item";
    ItemCollection => b"itmc", "item_collection";
    DamageEffect => b"jpt!", "damage_effect";
    LensFlare => b"lens", "lens_flare";
    DeviceLightFixture => b"lifi", "device_light_fixture";
    Light => b"ligh", "light";
    SoundLooping => b"lsnd", "sound_looping";
    DeviceMachine => b"mach", "device_machine";
    Globals => b"matg", "globals";
    Meter => b"metr", "meter";
    LightVolume => b"mgs2", "light_volume";
    Gbxmodel => b"mod2", "gbxmodel";
    Model => b"mode", "model";
    MultiplayerScenarioDescription => b"mply", "multiplayer_scenario_description";
    PreferencesNetworkGame => b"ngpr", "preferences_network_game";
    Object => b"obje", "object";
    Particle => b"part", "particle";
    ParticleSystem => b"pctl", "particle_system";
    Physics => b"phys", "physics";
    Placeholder => b"plac", "placeholder";
    PointPhysics => b"pphy", "point_physics";
    Projectile => b"proj", "projectile";
    WeatherParticleSystem => b"rain", "weather_particle_system";
    ScenarioStructureBsp => b"sbsp", "scenario_structure_bsp";
    Scenery => b"scen", "scenery";
    ShaderTransparentChicagoExtended => b"scex", "shader_transparent_chicago_extended";
    ShaderTransparentChicago => b"schi", "shader_transparent_chicago";
    Scenario => b"scnr", "scenario";
    ShaderEnvironment => b"senv", "shader_environment";
    ShaderTransparentGlass => b"sgla", "shader_transparent_glass";
    Shader => b"shdr", "shader";
    Sky => b"sky ", "sky";
    ShaderTransparentMeter => b"smet", "shader_transparent_meter";
    Sound => b"snd!", "sound";
    SoundEnvironment => b"snde", "sound_environment";
    ShaderModel => b"soso", "shader_model";
    ShaderTransparentGeneric => b"sotr", "shader_transparent_generic";
    UiWidgetCollection => b"Soul", "ui_widget_collection";
    ShaderTransparentPlasma => b"spla", "shader_transparent_plasma";
    SoundScenery => b"ssce", "sound_scenery";
    StringList => b"str#", "string_list";
    ShaderTransparentWater => b"swat", "shader_transparent_water";
    TagCollection => b"tagc", "tag_collection";
    CameraTrack => b"trak", "camera_track";
    Dialogue => b"udlg", "dialogue";
    UnitHudInterface => b"unhi", "unit_hud_interface";
    Unit => b"unit", "unit";
    UnicodeStringList => b"ustr", "unicode_string_list";
    VirtualKeyboard => b"vcky", "virtual_keyboard";
    Vehicle => b"vehi", "vehicle";
    Weapon => b"weap", "weapon";
    Wind => b"wind", "wind";
    WeaponHudInterface => b"wphi", "weapon_hud_interface";
}

impl TagGroup {
    /// Size of the group's base struct in tag data, when the layout is known.
    ///
    /// Tag dereferencing uses this as the length to resolve, so a group
    /// without a known size cannot be dereferenced.
    pub const fn base_struct_size(self) -> Option<usize> {
        Some(match self {
            TagGroup::ActorVariant => 568,
            TagGroup::Bitmap => 108,
            TagGroup::Decal => 268,
            TagGroup::GrenadeHudInterface => 504,
            TagGroup::HudGlobals => 1104,
            TagGroup::LensFlare => 240,
            TagGroup::Meter => 172,
            TagGroup::Gbxmodel => 232,
            TagGroup::Object => 380,
            TagGroup::Scenario => 1456,
            TagGroup::ScenarioStructureBsp => 648,
            TagGroup::Shader => 40,
            TagGroup::ShaderModel => 440,
            TagGroup::Sound => 164,
            TagGroup::Unit => 752,
            TagGroup::UnitHudInterface => 1388,
            TagGroup::WeaponHudInterface => 380,
            _ => return None,
        })
    }
}

impl fmt::Display for TagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Render a raw group code for diagnostics.
///
/// Known groups print their extension, [`GROUP_NONE`] prints `none`, and
/// anything else prints its four characters.
pub fn fourcc_to_extension(fourcc: u32) -> Cow<'static, str> {
    if fourcc == GROUP_NONE {
        return Cow::Borrowed("none");
    }
    match TagGroup::from_fourcc(fourcc) {
        Some(group) => Cow::Borrowed(group.extension()),
        None => Cow::Owned(String::from_utf8_lossy(&fourcc.to_be_bytes()).into_owned()),
    }
}

/// Whether a group slot holds a known group or the empty marker.
pub fn is_known_or_none(fourcc: u32) -> bool {
    fourcc == GROUP_NONE || TagGroup::from_fourcc(fourcc).is_some()
}
