//! The built-in tweak catalog.
//!
//! Order here is the order tweaks are listed and applied in. Names must stay
//! unique: they select the patch recipe in [`crate::recipes`].

use crate::persistence::LEGACY_HDR_SECTION;
use crate::state::{Category, Control, Parameter, Rgb, Tweak};

fn text_box(data_name: &str, name: &str, value: f64, default: f64, min: f64, max: f64) -> Parameter {
    Parameter::number(data_name, name, value, default, min, max, Control::TextBox)
}

fn enhanced_atmospherics() -> Vec<Tweak> {
    let sky = Tweak::new(
        "ENHANCED_ATMOSPHERICS_ATMOSPHERE",
        Category::EnhancedAtmospherics,
        "Enhanced Atmospherics Atmosphere",
        "",
    )
    .with_param(text_box("SkyOzoneEffectDay", "Sky Ozone Effect Day", 0.125, 1.0, 0.01, 5.0))
    .with_param(text_box("SkyOzoneEffectTwilight", "Sky Ozone Effect Twilight", 0.325, 0.0, 0.01, 5.0))
    .with_param(text_box("SkyOzoneEffectNight", "Sky Ozone Effect Night", 0.125, 1.0, 0.01, 5.0))
    .with_param(text_box("SkyBrightnessDay", "Sky Brightness Day", 1.0, 1.0, 0.1, 5.0))
    .with_param(text_box("SkyBrightnessTwilight", "Sky Brightness Twilight", 3.25, 1.0, 0.01, 5.0))
    .with_param(text_box("SkyBrightnessNight", "Sky Brightness Night", 0.5, 1.0, 0.01, 5.0))
    .with_param(text_box("SkySaturationDay", "Sky Saturation Day", 1.0, 1.0, 0.1, 5.0))
    .with_param(text_box("SkySaturationtwilight", "Sky Saturation twilight", 0.875, 1.0, 0.01, 5.0))
    .with_param(text_box("SkySaturationNight", "Sky Saturation Night", 1.0, 1.0, 0.01, 5.0));

    let clouds = Tweak::new(
        "ENHANCED_ATMOSPHERICS_Clouds",
        Category::EnhancedAtmospherics,
        "Enhanced Atmospherics Clouds",
        "",
    )
    .with_param(text_box("CloudOzoneEffectDay", "Cloud Ozone Effect Day", 0.0, 1.0, 0.01, 5.0))
    .with_param(text_box("CloudOzoneEffectTwilight", "Cloud Ozone Effect Twilight", 0.325, 1.0, 0.01, 5.0))
    .with_param(text_box("CloudOzoneEffectNight", "Cloud Ozone Effect Night", 0.125, 1.0, 0.01, 5.0))
    .with_param(text_box("CloudBrightnessDay", "Cloud Brightness Day", 1.0, 1.0, 0.01, 5.0))
    .with_param(text_box("CloudBrightnessTwilight", "Cloud Brightness Twilight", 1.0, 1.0, 0.01, 5.0))
    .with_param(text_box("CloudBrightnessNight", "Cloud Brightness Night", 0.5, 1.0, 0.01, 5.0))
    .with_param(text_box("CloudSaturationDay", "Cloud Saturation Day", 1.0, 1.0, 0.01, 5.0))
    .with_param(text_box("CloudSaturationTwilight", "Cloud Saturation Twilight", 0.325, 1.0, 0.01, 5.0))
    .with_param(text_box("CloudSaturationNight", "Cloud Saturation Night", 1.0, 1.0, 0.01, 51.0));

    vec![sky, clouds]
}

fn clouds() -> Vec<Tweak> {
    let c = Category::Clouds;
    vec![
        Tweak::new("CLOUDS_POPCORN_MODIFICATOR", c, "'No popcorn' clouds", "")
            .with_param(text_box("CloudDistanceFactor", "Distance factor", 0.0000000005, 0.0000000005, 0.0000000001, 0.000000001))
            .with_param(text_box("CloudOpacity", "Opacity at far range", 1.0, 1.0, 0.1, 1.0)),
        Tweak::new("CLOUDS_CLOUD_ALTERNATE_LIGHTING", c, "Alternate lighting for cloud groups", ""),
        Tweak::new("CLOUDS_CIRRUS_LIGHTING", c, "Cirrus lighting", "")
            .with_param(text_box("LightingRatio", "Lighting", 1.0, 1.0, 0.0, 2.0))
            .with_param(text_box("SaturateRatio", "Saturation", 1.0, 1.0, 0.0, 2.0)),
        Tweak::new("CLOUDS_CLOUD_VOLUME", c, "Cloud light scattering", "")
            .with_param(text_box("ScatteringFactor", "Scattering factor", 0.5, 0.5, 0.1, 3.0))
            .with_param(text_box("LightingFactor", "Lighting factor", 0.5, 0.5, 0.01, 2.0))
            .with_param(Parameter::checkbox("NoPattern", "Don't use cloud lighting patterns", false, false)),
        Tweak::new("CLOUDS_CLOUDS_LIGHTING_TUNING", c, "Cloud lighting tuning", "")
            .with_param(text_box("CloudLightFactor", "Lighting factor", 0.85, 0.85, 0.1, 5.0))
            .with_param(text_box("CloudSaturateFactor", "Saturation factor", 0.33, 0.33, 0.1, 5.0)),
        Tweak::new("CLOUDS_CLOUD_SATURATION", c, "Cloud saturation", "")
            .with_param(text_box("ShadeFactor", "Saturation", 1.0, 1.0, 0.0, 3.0)),
        Tweak::new("CLOUDS_CLOUD_SHADOWS_DEPTH_NEW", c, "Cloud shadow depth", "")
            .with_param(text_box("FDepthFactor", "Shadow depth", 0.15, 0.15, 0.01, 100.0)),
        Tweak::new("CLOUDS_CLOUD_SHADOWS_SIZE", c, "Cloud shadow extended size", ""),
        Tweak::new("CLOUDS_CLOUD_BRIGHTNESS_TWILIGHT", c, "Reduce cloud brightness at dawn/dusk/night", ""),
        Tweak::new("CLOUDS_CLOUD_SIZE", c, "Cloud puffs width and height scaling", "")
            .with_param(text_box("CloudSizeHCoeff", "Horizontal", 0.5, 0.5, 0.3, 1.0))
            .with_param(text_box("CloudSizeVCoeff", "Vertical", 0.5, 0.5, 0.3, 1.0)),
    ]
}

fn atmosphere() -> Vec<Tweak> {
    let c = Category::Atmosphere;
    vec![
        Tweak::new(
            "ATMOSPHERE_HAZE_EFFECT",
            c,
            "Atmospheres Haze Effect",
            "Requires 'Atmospheres Fog Fix' to be enabled.",
        )
        .with_param(text_box("HazeEffectPower", "Power", 1.0, 1.0, 1.0, 1.0))
        .with_param(text_box("HazeEffectDensity", "Density", 0.0000000005, 0.0000000005, 0.0000000005, 0.0000000005))
        .with_param(text_box("HazeEffectColorRed", "Color Tone Red", 1.0, 1.0, 1.0, 1.0))
        .with_param(text_box("HazeEffectColorGreen", "Color Tone Green", 1.0, 1.0, 1.0, 1.0))
        .with_param(text_box("HazeEffectColorBlue", "Color Tone Blue", 1.0, 1.0, 1.0, 1.0))
        .with_param(Parameter::checkbox("HazeEffectDensityDependsOnAltitude", "Density depends on altitude", true, true))
        .with_param(text_box("HazeEffectAltitudeZero", "Altitude when density reaches zero", 15000.0, 15000.0, 15000.0, 15000.0)),
        Tweak::new("ATMOSPHERE_RAYLEIGH_SCATTERING", c, "Atmosphere Rayleigh Scattering", "")
            .with_param(text_box("RayleighScatteringPower", "Power", 2.75, 2.75, 2.75, 2.75))
            .with_param(text_box("RayleighScatteringDensity", "Density", 0.00000002, 0.00000002, 0.00000002, 0.00000002))
            .with_param(text_box("RayleighScatteringColorGreen", "Color Green", 0.06, 0.06, 0.06, 0.06))
            .with_param(text_box("RayleighScatteringColorBlue", "Color Blue", 0.19, 0.19, 0.19, 0.19))
            .with_param(Parameter::checkbox("RayleighScatteringDependsOnAltitude", "Density depends on altitude", true, true))
            .with_param(text_box(
                "RayleighScatteringAltitudeDensityZero",
                "Altitude when density reaches zero",
                15000.0,
                15000.0,
                15000.0,
                15000.0,
            )),
        Tweak::new("ATMOSPHERE_CLOUD_FOG", c, "Cloud Fog", "")
            .with_param(text_box("Fog Influence", "Power", 1.0, 1.0, 1.0, 1.0)),
        Tweak::new("ATMOSPHERE_FOG_FIX", c, "Atmospheres Fog Fix", ""),
        Tweak::new("ATMOSPHERE_SKY_SATURATION", c, "Sky Saturation", "")
            .with_param(text_box("SkySaturaion", "Sky Saturation", 1.0, 1.0, 0.01, 5.0)),
        Tweak::new("ATMOSPHERE_PRECIP_OPACITY", c, "Precipitation Opacity", "")
            .with_param(text_box("SnowOpacity", "Snow Opacity", 1.0, 1.0, 1.0, 1.0))
            .with_param(text_box("RainOpacity", "Rain Opacity", 1.0, 1.0, 1.0, 1.0)),
    ]
}

fn lighting() -> Vec<Tweak> {
    let c = Category::Lighting;
    vec![
        Tweak::new("LIGHTING_OBJECT_LIGHTING", c, "Object Lighting", "")
            .with_param(text_box("ObjectDiffuse", "Object Diffuse", 1.0, 1.0, 0.01, 5.0))
            .with_param(text_box("ObjectAmbient", "Object Ambient", 1.0, 1.0, 0.01, 5.0))
            .with_param(text_box("ObjectDiffuseMoon", "Object Diffuse Moon", 1.0, 1.0, 0.01, 5.0)),
        Tweak::new("LIGHTING_COCKPIT_LIGHTING", c, "Cockpit Lighting", "")
            .with_param(text_box("CockpitDiffuse", "Cockpit Diffuse", 1.0, 1.0, 0.01, 5.0))
            .with_param(text_box("CockpitAmbient", "Cockpit Ambient", 1.0, 1.0, 0.01, 5.0))
            .with_param(text_box("CockpitSaturation", "Cockpit Saturation", 1.0, 1.0, 0.01, 5.0)),
        Tweak::new("LIGHTING_AUTOGEN_LIGHTING", c, "Autogen Lighting", "")
            .with_param(text_box("AutogenLightsBrightness", "Autogen Lights Brightness", 1.0, 1.0, 1.0, 1.0))
            .with_param(text_box("AutogenLightsSaturation", "Autogen Lights Saturation", 1.0, 1.0, 1.0, 1.0)),
    ]
}

const TERRAIN_LIGHTING_HELP: &str = "Terrain Lighting Diffuse - Diffuse Lighting Factor of the terrain\n\
Terrain Lighting Ambient - Ambient Lighting Factor of the terrain\n\
Terrain Lighting Moon - This value defines how much the moonlight affects the terrain at night\n\n\
Pro Tip: Use Expressions to darken the ambient/diffuse only at a given time\n\
Something like this  saturate(0.5 + cb_mSun.mDiffuse.g/0.33)";

fn terrain() -> Vec<Tweak> {
    let c = Category::Terrain;
    vec![
        Tweak::new(
            "TERRAIN_REFLECTANCE",
            c,
            "Terrain Reflectance",
            "Adjust how much the terrain reflects, 0.25 is the default p3d pbr terrain reflectance",
        )
        .with_param(text_box("TerrainReflectance", "Terrain Reflectance", 0.02, 0.02, 0.001, 1.0)),
        Tweak::new("TERRAIN_LIGHTING", c, "Terrain Lighting", TERRAIN_LIGHTING_HELP)
            .with_param(text_box("TerrainLightingDiffuse", "Terrain Lighting Diffuse", 1.0, 1.0, 0.01, 5.0))
            .with_param(text_box("TerrainLightingAmbient", "Terrain Lighting Ambient", 1.0, 1.0, 0.01, 5.0))
            .with_param(text_box("TerrainLightingMoon", "Terrain Lighting Moon", 1.0, 1.0, 0.01, 5.0)),
        Tweak::new(
            "TERRAIN_Saturation",
            c,
            "Terrain Saturation",
            "Saturates the terrain, 1.0 is the default p3d saturation\nIncrease or decrease as you like",
        )
        .with_param(text_box("TerrainSaturation", "Terrain Saturation", 1.0, 1.0, 0.01, 5.0)),
        Tweak::new("TERRAIN_EMISSIVE_LIGHTING", c, "Terrain Emissive Lighting", "Changes the terrain emissive lighting")
            .with_param(text_box("TerrainEmissiveBrightness", "Terrain Emissive Brightness", 1.0, 1.0, 0.01, 5.0))
            .with_param(text_box("TerrainEmissiveSaturation", "Terrain Emissive Saturation", 1.0, 1.0, 0.01, 5.0)),
    ]
}

fn pbr() -> Vec<Tweak> {
    let c = Category::Pbr;
    let fixed = |data_name: &str, name: &str, v: f64| text_box(data_name, name, v, v, v, v);
    vec![
        Tweak::new(
            "ADVANCED_PBR",
            c,
            "Advanced PBR",
            "A more advanced PBR approach implemented in P3D using Diffuse Image Based Lighting",
        )
        .with_param(fixed("AdvancedPBRDiffuseColor", "Diffuse Color Brightness", 1.5))
        .with_param(fixed("AdvancedPBRIBLSaturation", "IBL Saturation", 0.9))
        .with_param(fixed("AdvancedPBRIBLSpecular", "IBL Specular Intensity", 0.7))
        .with_param(fixed("AdvancedPBRAircraftAmbientLighting", "Aircraft Ambient Lighting", 1.3))
        .with_param(fixed("AdvancedPBROverallAmbientDay", "Ambient Lighting Day", 0.3))
        .with_param(fixed("AdvancedPBROverallAmbientNight", "Ambient Lighting Night", 0.1))
        .with_param(fixed("AdvancedPBRCockpitAmbientLighting", "Cockpit Ambient Lighting", 2.0))
        .with_param(fixed("AdvancedPBRAircraftReflectance", "Aircraft Reflectance Intensity", 0.2))
        .with_param(Parameter::checkbox("VCIBL", "Cockpit IBL", true, true))
        .with_param(fixed("AdvancedPBRAircraftAmbientLightingNight", "Aircraft Ambient Lighting Night", 0.5))
        .with_param(fixed("DynamicLightIntensityNight", "Dynamic Lighting Intensity", 1.0))
        .with_param(fixed("AdvancedPBRAircraftDirectLightingDuskDawn", "Dusk/Dawn Highlights", 6.5))
        .with_param(fixed("AdvancedPBRAircraftOcclusionFactor", "PBR Aircraft Occlusion Factor", 1.0)),
        Tweak::new(
            "PBR_BRIGHTNESS",
            c,
            "PBR Brightness",
            "Restricts image based ambient lighting to aircraft objects.",
        ),
    ]
}

fn hdr() -> Vec<Tweak> {
    vec![Tweak::new(
        "HDR_TONEMAP",
        Category::Hdr,
        "Alternate tonemap adjustment",
        "This tweak replaces the default P3D tonemapper with a new tonemapper.",
    )
    .with_param(text_box("toneMapExposure", "Tonemap Exposure", 1.2, 1.2, 1.2, 1.2))]
}

fn post_process() -> Vec<Tweak> {
    let c = Category::PostProcess;
    let neutral = Rgb::new(1.0, 1.0, 1.0);
    vec![
        Tweak::new(
            "HDR_CONTRAST",
            c,
            "Contrast tuning",
            "0 keeps the stock tone curve, 1 gives the flattest contrast.",
        )
        .with_param(Parameter::number("Contrast", "Contrast", 0.0, 0.0, 0.0, 1.0, Control::Text)),
        Tweak::new("HDR_SCENE_TONE", c, "Scene tone adjustment", "Multiplies the final scene color per channel.")
            .with_param(Parameter::rgb(
                "SceneToneRed,SceneToneGreen,SceneToneBlue",
                "Tone",
                neutral,
                neutral,
                0.0,
                2.0,
            )),
        Tweak::new(
            "HDR_LUMINANCE_ADAPTATION",
            c,
            "Turn off HDR luminance adaptation effect",
            "Replaces eye adaptation with a fixed exposure that follows time of day.",
        ),
        Tweak::new(
            LEGACY_HDR_SECTION,
            c,
            "Disable HDR with post-processes",
            "Bypasses bloom and tone mapping while keeping post-process effects.",
        ),
    ]
}

/// Build a fresh catalog, every tweak disabled with its default baseline.
pub fn generate_tweaks() -> Vec<Tweak> {
    let mut tweaks = Vec::new();
    tweaks.extend(enhanced_atmospherics());
    tweaks.extend(clouds());
    tweaks.extend(atmosphere());
    tweaks.extend(lighting());
    tweaks.extend(terrain());
    tweaks.extend(pbr());
    tweaks.extend(hdr());
    tweaks.extend(post_process());
    tweaks
}
