//! Patch recipes: the fixed list of text patches each catalog tweak makes.
//!
//! A recipe is looked up by tweak name and built from the tweak's current
//! parameter values, which are pasted verbatim into the inserted code. Anchors
//! are exact lines from the stock shader sources.

use crate::patch::{PatchError, Patcher};
use crate::shaders::{ShaderBuffers, ShaderFile};
use crate::state::{format_number, Tweak};

const LUMA: &str = "float3(0.299, 0.587, 0.114)";

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    AddBefore { file: ShaderFile, anchor: &'static str, insert: String },
    AddAfter { file: ShaderFile, anchor: &'static str, insert: String },
    ReplaceFirst { file: ShaderFile, anchor: &'static str, new: String },
    ReplaceAll { file: ShaderFile, anchor: &'static str, new: String },
    ReplaceSecond { file: ShaderFile, anchor: &'static str, new: String },
    CommentOut { file: ShaderFile, start: &'static str, end: &'static str, inclusive: bool },
}

impl Step {
    pub fn file(&self) -> ShaderFile {
        match self {
            Step::AddBefore { file, .. }
            | Step::AddAfter { file, .. }
            | Step::ReplaceFirst { file, .. }
            | Step::ReplaceAll { file, .. }
            | Step::ReplaceSecond { file, .. }
            | Step::CommentOut { file, .. } => *file,
        }
    }

    fn run(&self, p: &mut Patcher<'_>) {
        match self {
            Step::AddBefore { file, anchor, insert } => p.add_before(*file, anchor, insert),
            Step::AddAfter { file, anchor, insert } => p.add_after(*file, anchor, insert),
            Step::ReplaceFirst { file, anchor, new } => p.replace_first(*file, anchor, new),
            Step::ReplaceAll { file, anchor, new } => p.replace_all(*file, anchor, new),
            Step::ReplaceSecond { file, anchor, new } => p.replace_second(*file, anchor, new),
            Step::CommentOut { file, start, end, inclusive } => p.comment_out(*file, start, end, *inclusive),
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Name of a tweak that must be enabled for this one to apply
    pub requires: Option<&'static str>,
    pub steps: Vec<Step>,
}

impl Recipe {
    fn new(steps: Vec<Step>) -> Self {
        Self { requires: None, steps }
    }

    fn requiring(mut self, name: &'static str) -> Self {
        self.requires = Some(name);
        self
    }

    /// Run every step. All steps run even after a failure; the first failure is returned.
    pub fn run(&self, buffers: &mut ShaderBuffers) -> Result<(), (ShaderFile, PatchError)> {
        let mut patcher = Patcher::new(buffers);
        for step in &self.steps {
            step.run(&mut patcher);
        }
        patcher.finish()
    }
}

fn add_before(file: ShaderFile, anchor: &'static str, insert: String) -> Step {
    Step::AddBefore { file, anchor, insert }
}

fn add_after(file: ShaderFile, anchor: &'static str, insert: String) -> Step {
    Step::AddAfter { file, anchor, insert }
}

fn replace_first(file: ShaderFile, anchor: &'static str, new: String) -> Step {
    Step::ReplaceFirst { file, anchor, new }
}

fn replace_all(file: ShaderFile, anchor: &'static str, new: String) -> Step {
    Step::ReplaceAll { file, anchor, new }
}

/// Blend three time-of-day values on the day/night interpolant.
fn day_twilight_night(day: &str, twilight: &str, night: &str) -> String {
    format!(
        "lerp(lerp({night}, {twilight}, saturate(cb_mDayNightInterpolant * 2)), {day}, saturate(cb_mDayNightInterpolant * 2 - 1))"
    )
}

fn saturate_expr(var: &str, amount: &str) -> String {
    format!("{var} = lerp(dot({var}, {LUMA}), {var}, {amount});")
}

// General.fx
const SKY_RETURN: &str = "return float4(skyColor, 1.0f);";
const OBJECT_DIFFUSE: &str = "float3 diffuse = cb_mSun.mDiffuse.rgb;";
const OBJECT_AMBIENT: &str = "float3 ambient = cb_mSun.mAmbient.rgb;";
const VCOCKPIT: &str = "#if defined(SHD_VCOCKPIT)";
const EMISSIVE_RETURN: &str = "return cEmissive;";

// Cloud.fx
const CLOUD_RETURN: &str = "return float4(litColor, fAlpha);";
const CLOUD_ALPHA: &str = "float fAlpha = saturate(fDistance * cb_fCloudDistanceFactor);";
const CLOUD_LIGHTING: &str = "float3 cloudLighting = cb_mSun.mDiffuse.rgb;";
const CIRRUS_RETURN: &str = "return float4(cirrusColor, cirrusAlpha);";
const CLOUD_SCATTERING: &str = "float scattering = ComputeScattering(cosAngle);";
const CLOUD_LIT: &str = "float3 litColor = cloudLighting * scattering;";
const CLOUD_PATTERN_START: &str = "// Cloud lighting pattern";
const CLOUD_PATTERN_END: &str = "// End cloud lighting pattern";
const CLOUD_PUFF_SIZE: &str = "float2 puffSize = In.vSize.xy;";
const CLOUD_FOG: &str = "return FogCloud(cColor, In.fFogDistance);";

// Shadow.fxh
const SHADOW_DEPTH: &str = "const float fDepthFactor = 0.15f;";
const SHADOW_EXTENT: &str = "const float fShadowMapExtent = 1.0f;";

// FuncLibrary.fxh
const FOG_RETURN: &str = "return fogColor;";
const FOG_FACTOR: &str = "float fogFactor = exp(-fogDensity * distance);";

// PrecipParticle.fx
const PRECIP_ALPHA: &str = "float alpha = In.cColor.a;";

// Terrain.fx
const TERRAIN_REFLECTANCE: &str = "const float fTerrainReflectance = 0.25f;";
const TERRAIN_DIFFUSE: &str = "float3 terrainDiffuse = cb_mSun.mDiffuse.rgb;";
const TERRAIN_AMBIENT: &str = "float3 terrainAmbient = cb_mSun.mAmbient.rgb;";
const TERRAIN_RETURN: &str = "return float4(terrainColor, 1.0f);";
const TERRAIN_EMISSIVE: &str = "float3 emissive = SampleEmissive(In.vTexCoord);";

// PBRBase.fx
const PBR_AMBIENT: &str = "float3 ambient = (iblDiffuse + iblSpecular * pbrMaterial.fIBLRadianceScale) * occlusion;";
const PBR_REFLECTANCE: &str = "float fReflectance = pbrMaterial.fReflectance;";
const PBR_DYNAMIC: &str = "float3 dynamicLight = ComputeDynamicLights(pbrMaterial, In);";
const PBR_DIRECT: &str = "float3 directLight = ComputeSunLight(pbrMaterial, In);";

// HDR.hlsl
const TONEMAP_FN: &str = "float3 ToneMap(float3 color)";
const TONEMAP_DOC: &str = "// Applies exposure and tone mapping to the input, and combines it with the";
const CONTRAST_CURVE: &str = "color = (color * (6.2f * color + 0.5f)) / (color * (6.2f * color + 1.7f) + 0.06f);";
const HDR_RETURN: &str = "return float4(finalColor, alpha);";
const LUMINANCE_ADAPT: &str = "return max(exp(lumTex.Sample(samClamp, texCoord).x), 0.1f);";
const BLOOM_START: &str = "//Calculate the bloom.";
const BLOOM_END: &str = "float3 finalColor = lerp(luminance, color.rgb, SaturationScalar);";
const HDR_SAMPLE: &str = "float4 color = srcTex.Sample(samClamp, vert.texcoord);";
const HDR_ALPHA: &str = "float alpha = color.a;";

/// Build the recipe for `tweak` from its current values. `None` means the
/// tweak has no recipe and is reported as unsupported.
pub fn recipe_for(tweak: &Tweak) -> Option<Recipe> {
    use ShaderFile::*;
    let v = |i: usize| tweak.value(i);

    let recipe = match tweak.name.as_str() {
        "Enhanced Atmospherics Atmosphere" => Recipe::new(vec![add_before(
            General,
            SKY_RETURN,
            format!(
                "float skyOzone = {};\r\n    float skyBrightness = {};\r\n    float skySaturation = {};\r\n    {}\r\n    skyColor *= skyBrightness;\r\n    skyColor.rb *= float2(1 - skyOzone * 0.1, 1 + skyOzone * 0.1);\r\n    ",
                day_twilight_night(v(0), v(1), v(2)),
                day_twilight_night(v(3), v(4), v(5)),
                day_twilight_night(v(6), v(7), v(8)),
                saturate_expr("skyColor", "skySaturation"),
            ),
        )]),

        "Enhanced Atmospherics Clouds" => Recipe::new(vec![add_before(
            Cloud,
            CLOUD_RETURN,
            format!(
                "float cloudOzone = {};\r\n    float cloudBrightness = {};\r\n    float cloudSaturation = {};\r\n    {}\r\n    litColor *= cloudBrightness;\r\n    litColor.rb *= float2(1 - cloudOzone * 0.1, 1 + cloudOzone * 0.1);\r\n    ",
                day_twilight_night(v(0), v(1), v(2)),
                day_twilight_night(v(3), v(4), v(5)),
                day_twilight_night(v(6), v(7), v(8)),
                saturate_expr("litColor", "cloudSaturation"),
            ),
        )]),

        "'No popcorn' clouds" => Recipe::new(vec![replace_first(
            Cloud,
            CLOUD_ALPHA,
            format!("float fAlpha = saturate(fDistance * {}) * {};", v(0), v(1)),
        )]),

        "Alternate lighting for cloud groups" => Recipe::new(vec![replace_first(
            Cloud,
            CLOUD_LIGHTING,
            "float3 cloudLighting = lerp(cb_mSun.mAmbient.rgb, cb_mSun.mDiffuse.rgb, In.fGroupLighting);".to_string(),
        )]),

        "Cirrus lighting" => Recipe::new(vec![add_before(
            Cloud,
            CIRRUS_RETURN,
            format!("{}\r\n    cirrusColor = saturate(cirrusColor * {});\r\n    ", saturate_expr("cirrusColor", v(1)), v(0)),
        )]),

        "Cloud light scattering" => {
            let mut steps = vec![
                replace_first(
                    Cloud,
                    CLOUD_SCATTERING,
                    format!("float scattering = ComputeScattering(cosAngle) * {};", v(0)),
                ),
                add_after(Cloud, CLOUD_LIT, format!("\r\n    litColor *= {};", v(1))),
            ];
            if tweak.parameters.get(2).is_some_and(|p| p.is_checked()) {
                steps.push(Step::CommentOut {
                    file: Cloud,
                    start: CLOUD_PATTERN_START,
                    end: CLOUD_PATTERN_END,
                    inclusive: false,
                });
            }
            Recipe::new(steps)
        }

        "Cloud lighting tuning" => Recipe::new(vec![add_before(
            Cloud,
            CLOUD_RETURN,
            format!("{}\r\n    litColor *= {};\r\n    ", saturate_expr("litColor", v(1)), v(0)),
        )]),

        "Cloud saturation" => Recipe::new(vec![add_before(
            Cloud,
            CLOUD_RETURN,
            format!("{}\r\n    ", saturate_expr("litColor", v(0))),
        )]),

        "Cloud shadow depth" => Recipe::new(vec![replace_all(
            Shadow,
            SHADOW_DEPTH,
            format!("const float fDepthFactor = {};", v(0)),
        )]),

        "Cloud shadow extended size" => Recipe::new(vec![replace_first(
            Shadow,
            SHADOW_EXTENT,
            "const float fShadowMapExtent = 2.0f;".to_string(),
        )]),

        "Reduce cloud brightness at dawn/dusk/night" => Recipe::new(vec![add_before(
            Cloud,
            CLOUD_RETURN,
            "litColor *= saturate(cb_mDayNightInterpolant + 0.25);\r\n    ".to_string(),
        )]),

        "Cloud puffs width and height scaling" => Recipe::new(vec![replace_first(
            Cloud,
            CLOUD_PUFF_SIZE,
            format!("float2 puffSize = In.vSize.xy * float2({}, {});", v(0), v(1)),
        )]),

        "Atmospheres Haze Effect" => {
            let altitude = if tweak.parameters.get(5).is_some_and(|p| p.is_checked()) {
                format!(" * saturate(1 - cb_mEyePoint.y / {})", v(6))
            } else {
                String::new()
            };
            Recipe::new(vec![add_before(
                FuncLibrary,
                FOG_RETURN,
                format!(
                    "float hazeDensity = {}{};\r\n    fogColor.rgb = lerp(fogColor.rgb, fogColor.rgb * float3({}, {}, {}), saturate(pow(distance * hazeDensity, {})));\r\n    ",
                    v(1),
                    altitude,
                    v(2),
                    v(3),
                    v(4),
                    v(0)
                ),
            )])
            .requiring("Atmospheres Fog Fix")
        }

        "Atmosphere Rayleigh Scattering" => {
            let altitude = if tweak.parameters.get(4).is_some_and(|p| p.is_checked()) {
                format!(" * saturate(1 - cb_mEyePoint.y / {})", v(5))
            } else {
                String::new()
            };
            Recipe::new(vec![add_before(
                FuncLibrary,
                FOG_RETURN,
                format!(
                    "float rayleighDensity = {}{};\r\n    fogColor.rgb += float3(0, {}, {}) * pow(saturate(distance * rayleighDensity), {});\r\n    ",
                    v(1),
                    altitude,
                    v(2),
                    v(3),
                    v(0)
                ),
            )])
        }

        "Cloud Fog" => Recipe::new(vec![replace_first(
            Cloud,
            CLOUD_FOG,
            format!("return FogCloud(cColor, In.fFogDistance * {});", v(0)),
        )]),

        "Atmospheres Fog Fix" => Recipe::new(vec![replace_first(
            FuncLibrary,
            FOG_FACTOR,
            "float fogFactor = saturate(exp(-fogDensity * distance));".to_string(),
        )]),

        "Sky Saturation" => Recipe::new(vec![add_before(
            General,
            SKY_RETURN,
            format!("{}\r\n    ", saturate_expr("skyColor", v(0))),
        )]),

        "Precipitation Opacity" => Recipe::new(vec![replace_first(
            PrecipParticle,
            PRECIP_ALPHA,
            format!("float alpha = In.cColor.a * (cb_bIsSnow ? {} : {});", v(0), v(1)),
        )]),

        "Object Lighting" => Recipe::new(vec![
            add_after(
                General,
                OBJECT_DIFFUSE,
                format!("\r\n    diffuse *= lerp({}, {}, cb_mDayNightInterpolant);", v(2), v(0)),
            ),
            add_after(General, OBJECT_AMBIENT, format!("\r\n    ambient *= {};", v(1))),
        ]),

        "Cockpit Lighting" => Recipe::new(vec![add_after(
            General,
            VCOCKPIT,
            format!(
                "\r\n    diffuse *= {};\r\n    ambient *= {};\r\n    {}",
                v(0),
                v(1),
                saturate_expr("diffuse", v(2))
            ),
        )]),

        "Autogen Lighting" => Recipe::new(vec![add_before(
            General,
            EMISSIVE_RETURN,
            format!("{}\r\n    cEmissive.rgb *= {};\r\n    ", saturate_expr("cEmissive.rgb", v(1)), v(0)),
        )]),

        "Terrain Reflectance" => Recipe::new(vec![replace_all(
            Terrain,
            TERRAIN_REFLECTANCE,
            format!("const float fTerrainReflectance = {};", v(0)),
        )]),

        "Terrain Lighting" => Recipe::new(vec![
            add_after(
                Terrain,
                TERRAIN_DIFFUSE,
                format!("\r\n    terrainDiffuse *= lerp({}, {}, cb_mDayNightInterpolant);", v(2), v(0)),
            ),
            add_after(Terrain, TERRAIN_AMBIENT, format!("\r\n    terrainAmbient *= {};", v(1))),
        ]),

        "Terrain Saturation" => Recipe::new(vec![add_before(
            Terrain,
            TERRAIN_RETURN,
            format!("{}\r\n    ", saturate_expr("terrainColor", v(0))),
        )]),

        "Terrain Emissive Lighting" => Recipe::new(vec![add_after(
            Terrain,
            TERRAIN_EMISSIVE,
            format!("\r\n    {}\r\n    emissive *= {};", saturate_expr("emissive", v(1)), v(0)),
        )]),

        "Advanced PBR" => {
            let mut steps = vec![
                add_before(
                    Pbr,
                    PBR_AMBIENT,
                    format!(
                        "{}\r\n    iblDiffuse *= {};\r\n    iblSpecular *= {};\r\n    occlusion = pow(occlusion, {});\r\n    ",
                        saturate_expr("iblDiffuse", v(1)),
                        v(0),
                        v(2),
                        v(12)
                    ),
                ),
                add_after(
                    Pbr,
                    PBR_AMBIENT,
                    format!(
                        "\r\n    ambient *= lerp({}, {}, cb_mDayNightInterpolant);\r\n    if (cb_mObjectType == 19) ambient *= lerp({}, {}, cb_mDayNightInterpolant);",
                        v(5),
                        v(4),
                        v(9),
                        v(3)
                    ),
                ),
                replace_first(
                    Pbr,
                    PBR_REFLECTANCE,
                    format!("float fReflectance = pbrMaterial.fReflectance * {};", v(7)),
                ),
                add_after(
                    Pbr,
                    PBR_DYNAMIC,
                    format!("\r\n    dynamicLight *= lerp({}, 1, cb_mDayNightInterpolant);", v(10)),
                ),
                add_after(
                    Pbr,
                    PBR_DIRECT,
                    format!(
                        "\r\n    directLight *= 1 + {} * 0.1 * saturate(1 - abs(cb_mDayNightInterpolant * 2 - 1));",
                        v(11)
                    ),
                ),
            ];
            let cockpit_ibl = tweak.parameters.get(8).is_some_and(|p| p.is_checked());
            let cockpit = if cockpit_ibl {
                format!("\r\n    ambient *= {};", v(6))
            } else {
                "\r\n    ambient = 0;".to_string()
            };
            steps.push(add_after(Pbr, VCOCKPIT, cockpit));
            Recipe::new(steps)
        }

        "PBR Brightness" => Recipe::new(vec![add_after(
            Pbr,
            PBR_AMBIENT,
            "\r\nif (cb_mObjectType == 19)".to_string(),
        )]),

        "Alternate tonemap adjustment" => Recipe::new(vec![
            replace_all(Hdr, TONEMAP_FN, "float3 ToneMapACES(float3 color)".to_string()),
            add_before(
                Hdr,
                TONEMAP_DOC,
                "\r\n float3 ToneMap(float3 color) \r\n { \r\n return color / (color + 1.0); \r\n  } \r\n".to_string(),
            ),
        ]),

        "Contrast tuning" => {
            let (low, high) = match tweak.parameters.first().and_then(|p| p.numeric()) {
                Some(t) => (format_number(1.0 + (0.0 - 1.0) * t), format_number(2.2 + (1.2 - 2.2) * t)),
                None => (format!("(1 - ({}))", v(0)), format!("(2.2 - ({}))", v(0))),
            };
            Recipe::new(vec![replace_all(
                Hdr,
                CONTRAST_CURVE,
                format!("color = (color * (6.2f * color + {low})) / (color * (6.2f * color + {high}) + 0.06);"),
            )])
        }

        "Scene tone adjustment" => Recipe::new(vec![add_before(
            Hdr,
            HDR_RETURN,
            format!("finalColor.rgb = saturate(finalColor.rgb * float3({}))\r\n;", v(0)),
        )]),

        "Turn off HDR luminance adaptation effect" => Recipe::new(vec![replace_all(
            Hdr,
            LUMINANCE_ADAPT,
            "return max((1-cb_mDayNightInterpolant) * 0.35, 0.1);".to_string(),
        )]),

        "Disable HDR with post-processes" => Recipe::new(vec![
            Step::CommentOut { file: Hdr, start: BLOOM_START, end: BLOOM_END, inclusive: true },
            Step::ReplaceSecond {
                file: Hdr,
                anchor: HDR_SAMPLE,
                new: "float4 finalColor = srcTex.Sample(samClamp, vert.texcoord);".to_string(),
            },
            replace_all(Hdr, HDR_ALPHA, "float alpha = finalColor.a;".to_string()),
        ]),

        _ => return None,
    };

    Some(recipe)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::generate_tweaks;

    /// Shader buffers holding exactly the anchors `recipes` need, in order.
    pub(crate) fn fixture_for<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> ShaderBuffers {
        let mut buffers = ShaderBuffers::default();
        for recipe in recipes {
            for step in &recipe.steps {
                let text = buffers.get_mut(step.file());
                match step {
                    Step::AddBefore { anchor, .. }
                    | Step::AddAfter { anchor, .. }
                    | Step::ReplaceFirst { anchor, .. }
                    | Step::ReplaceAll { anchor, .. } => {
                        text.push_str(anchor);
                        text.push('\n');
                    }
                    Step::ReplaceSecond { anchor, .. } => {
                        text.push_str(&format!("{anchor}\n{anchor}\n"));
                    }
                    Step::CommentOut { start, end, .. } => {
                        text.push_str(&format!("{start}\nbody();\n{end}\n"));
                    }
                }
            }
        }
        buffers
    }

    #[test]
    fn every_catalog_tweak_has_a_recipe() {
        for tweak in generate_tweaks() {
            assert!(recipe_for(&tweak).is_some(), "no recipe for {}", tweak.name);
        }
    }

    #[test]
    fn every_recipe_applies_against_its_anchors() {
        for tweak in generate_tweaks() {
            let recipe = recipe_for(&tweak).unwrap();
            let mut buffers = fixture_for([&recipe]);
            assert_eq!(recipe.run(&mut buffers), Ok(()), "{}", tweak.name);
        }
    }

    #[test]
    fn unknown_name_has_no_recipe() {
        let t = Tweak::new("X", crate::state::Category::Hdr, "Mystery", "");
        assert!(recipe_for(&t).is_none());
    }

    #[test]
    fn haze_requires_fog_fix() {
        let tweaks = generate_tweaks();
        let haze = tweaks.iter().find(|t| t.name == "Atmospheres Haze Effect").unwrap();
        assert_eq!(recipe_for(haze).unwrap().requires, Some("Atmospheres Fog Fix"));
    }

    #[test]
    fn contrast_interpolates_curve_constants() {
        let mut tweaks = generate_tweaks();
        let t = tweaks.iter_mut().find(|t| t.name == "Contrast tuning").unwrap();
        t.parameters[0].set_value("0.5");
        let recipe = recipe_for(t).unwrap();
        let mut buffers = fixture_for([&recipe]);
        recipe.run(&mut buffers).unwrap();
        assert!(buffers
            .get(ShaderFile::Hdr)
            .contains("color = (color * (6.2f * color + 0.5)) / (color * (6.2f * color + 1.7) + 0.06);"));
    }

    #[test]
    fn contrast_accepts_expression() {
        let mut tweaks = generate_tweaks();
        let t = tweaks.iter_mut().find(|t| t.name == "Contrast tuning").unwrap();
        t.parameters[0].set_value("cb_mDayNightInterpolant");
        let recipe = recipe_for(t).unwrap();
        let Step::ReplaceAll { new, .. } = &recipe.steps[0] else {
            panic!("unexpected step");
        };
        assert!(new.contains("(1 - (cb_mDayNightInterpolant))"));
    }

    #[test]
    fn scene_tone_inserts_rgb_triple() {
        let mut tweaks = generate_tweaks();
        let t = tweaks.iter_mut().find(|t| t.name == "Scene tone adjustment").unwrap();
        t.parameters[0].set_rgb_channel(0, 0.8);
        let recipe = recipe_for(t).unwrap();
        let mut buffers = fixture_for([&recipe]);
        recipe.run(&mut buffers).unwrap();
        let hdr = buffers.get(ShaderFile::Hdr);
        assert!(hdr.starts_with("finalColor.rgb = saturate(finalColor.rgb * float3(0.80,1.00,1.00))\r\n;"));
        assert!(hdr.contains(HDR_RETURN));
    }

    #[test]
    fn disable_hdr_comments_out_bloom_and_rewires_alpha() {
        let tweaks = generate_tweaks();
        let t = tweaks.iter().find(|t| t.name == "Disable HDR with post-processes").unwrap();
        let recipe = recipe_for(t).unwrap();
        let mut buffers = fixture_for([&recipe]);
        recipe.run(&mut buffers).unwrap();
        let hdr = buffers.get(ShaderFile::Hdr);
        assert!(hdr.starts_with("/*//Calculate the bloom."));
        assert!(hdr.contains("float4 color = srcTex.Sample(samClamp, vert.texcoord);\nfloat4 finalColor = srcTex"));
        assert!(hdr.contains("float alpha = finalColor.a;"));
    }

    #[test]
    fn missing_anchor_reports_file() {
        let tweaks = generate_tweaks();
        let t = tweaks.iter().find(|t| t.name == "Cloud shadow depth").unwrap();
        let mut buffers = ShaderBuffers::default();
        let (file, _) = recipe_for(t).unwrap().run(&mut buffers).unwrap_err();
        assert_eq!(file, ShaderFile::Shadow);
    }
}
