use std::path::{Path, PathBuf};

use crate::activity::ActivityLog;
use crate::error::Result;
use crate::shaders::ShaderFile;
use crate::state::{Control, CustomTweak, Tweak};

use super::ini::IniFile;

pub const COMMENT_SECTION: &str = "PRESET COMMENTS";
pub const COMMENT_KEY: &str = "Comment";
/// Stands in for a line break inside single-line INI values.
pub const NEWLINE_SENTINEL: &str = "~^#";

const ENABLED_KEY: &str = "IsActive";
/// Older presets store the HDR switch under its own key.
pub const LEGACY_HDR_SECTION: &str = "HDR & POST-PROCESSING_POSTPROCESS";
const LEGACY_HDR_KEY: &str = "NoHDR";

const CUSTOM_PREFIX: &str = "CUSTOM_TWEAK_";

fn encode_multiline(s: &str) -> String {
    s.replace("\r\n", NEWLINE_SENTINEL).replace('\n', NEWLINE_SENTINEL)
}

fn decode_multiline(s: &str) -> String {
    s.replace(NEWLINE_SENTINEL, "\n")
}

fn flag(b: bool) -> &'static str {
    if b { "1" } else { "0" }
}

/// Load enabled flags and parameter values into `tweaks`.
///
/// With `monitor_changes` the values held before loading stay as baselines,
/// so the UI shows what the preset changed. Without it the loaded values
/// become the baselines. A missing key stops loading that tweak only.
pub fn load_tweaks(tweaks: &mut [Tweak], preset: &IniFile, monitor_changes: bool, log: &mut ActivityLog) {
    for tweak in tweaks.iter_mut() {
        let enabled_key = if tweak.key == LEGACY_HDR_SECTION {
            LEGACY_HDR_KEY
        } else {
            ENABLED_KEY
        };

        match preset.read(enabled_key, &tweak.key) {
            Some(v) => tweak.is_enabled = v == "1",
            None => {
                log.warn(format!("Missing entry '{}' for tweak [{}]", enabled_key, tweak.key));
                continue;
            }
        }
        if !monitor_changes {
            tweak.was_enabled = tweak.is_enabled;
        }

        for param in tweak.parameters.iter_mut() {
            param.old_value = param.value.clone();

            if param.control == Control::Rgb {
                let Some(keys) = param.rgb_keys() else {
                    log.warn(format!("Malformed RGB entry '{}' for tweak [{}]", param.data_name, tweak.key));
                    break;
                };
                let mut channels = Vec::with_capacity(3);
                for key in keys {
                    match preset.read(key, &tweak.key) {
                        Some(v) => channels.push(v.to_string()),
                        None => {
                            log.warn(format!("Missing entry '{}' for tweak [{}]", key, tweak.key));
                            break;
                        }
                    }
                }
                if channels.len() < 3 {
                    break;
                }
                param.value = channels.join(",");
            } else {
                match preset.read(&param.data_name, &tweak.key) {
                    Some(v) => param.value = v.to_string(),
                    None => {
                        log.warn(format!("Missing entry '{}' for tweak [{}]", param.data_name, tweak.key));
                        break;
                    }
                }
            }

            if !monitor_changes {
                param.old_value = param.value.clone();
            }
        }
    }
}

pub fn load_comments(preset: &IniFile) -> String {
    preset
        .read(COMMENT_KEY, COMMENT_SECTION)
        .map(decode_multiline)
        .unwrap_or_default()
}

pub fn load_custom_tweaks(preset: &IniFile, log: &mut ActivityLog) -> Vec<CustomTweak> {
    let mut out = Vec::new();
    for section in preset.sections() {
        if !section.starts_with(CUSTOM_PREFIX) {
            continue;
        }
        let shader = match preset.read("Shader", section).map(ShaderFile::from_file_name) {
            Some(Ok(s)) => s,
            Some(Err(e)) => {
                log.warn(format!("Custom tweak [{}] skipped: {}", section, e));
                continue;
            }
            None => {
                log.warn(format!("Missing entry 'Shader' for custom tweak [{}]", section));
                continue;
            }
        };
        let name = preset.read("Name", section).unwrap_or(section);
        let mut custom = CustomTweak::new(section, name, shader);
        custom.index = preset
            .read("Index", section)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        custom.old_code = preset.read("OldCode", section).map(decode_multiline).unwrap_or_default();
        custom.new_code = preset.read("NewCode", section).map(decode_multiline).unwrap_or_default();
        custom.is_enabled = preset.read(ENABLED_KEY, section) == Some("1");
        out.push(custom);
    }
    out
}

/// Write every tweak, custom tweak and the comment into `preset`, then save it.
pub fn save_preset(tweaks: &[Tweak], custom_tweaks: &[CustomTweak], comment: &str, preset: &mut IniFile) -> Result<()> {
    for tweak in tweaks {
        preset.write(ENABLED_KEY, flag(tweak.is_enabled), &tweak.key);
        if tweak.key == LEGACY_HDR_SECTION {
            preset.write(LEGACY_HDR_KEY, flag(tweak.is_enabled), &tweak.key);
        }

        for param in &tweak.parameters {
            match (param.control, param.rgb_keys(), param.rgb_value()) {
                (Control::Rgb, Some(keys), Some(rgb)) => {
                    for (i, key) in keys.iter().enumerate() {
                        preset.write(key, &format!("{:.2}", rgb.channel(i)), &tweak.key);
                    }
                }
                _ => preset.write(&param.data_name, &param.value, &tweak.key),
            }
        }
    }

    let stale: Vec<String> = preset
        .sections()
        .filter(|s| s.starts_with(CUSTOM_PREFIX))
        .map(str::to_string)
        .collect();
    for section in stale {
        preset.remove_section(&section);
    }
    for custom in custom_tweaks {
        let s = custom.key.as_str();
        preset.write("Name", &custom.name, s);
        preset.write("Shader", custom.shader.file_name(), s);
        preset.write("Index", &custom.index.to_string(), s);
        preset.write("OldCode", &encode_multiline(&custom.old_code), s);
        preset.write("NewCode", &encode_multiline(&custom.new_code), s);
        preset.write(ENABLED_KEY, flag(custom.is_enabled), s);
    }

    preset.write(COMMENT_KEY, &encode_multiline(comment), COMMENT_SECTION);
    preset.save()
}

/// `custom_preset.ini`, then `custom_preset_2.ini`, `custom_preset_3.ini`, ...
pub fn next_preset_path(dir: &Path) -> PathBuf {
    let first = dir.join("custom_preset.ini");
    if !first.exists() {
        return first;
    }
    (2..)
        .map(|i| dir.join(format!("custom_preset_{}.ini", i)))
        .find(|p| !p.exists())
        .unwrap_or(first)
}
