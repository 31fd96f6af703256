//! Minimal INI store with Windows profile-file semantics: ordered sections,
//! case-insensitive section and key lookup, last write wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

fn section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([^\]]*)\]$").expect("valid section regex"))
}

fn entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^=]+?)(\s*)=(.*)$").expect("valid entry regex"))
}

#[derive(Debug, Clone, PartialEq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IniFile {
    path: PathBuf,
    sections: Vec<Section>,
}

impl IniFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sections: Vec::new(),
        }
    }

    /// Open an existing file, or bind an empty store to a path that does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::new(path));
        }
        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: impl Into<PathBuf>) -> Result<Self> {
        let mut ini = Self::new(path);
        let mut current: Option<usize> = None;

        for (i, raw) in text.lines().enumerate() {
            let line = raw
                .trim_start_matches('\u{feff}')
                .trim_start()
                .trim_end_matches('\r');
            let trimmed = line.trim_end();
            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }
            if let Some(caps) = section_re().captures(trimmed) {
                let name = caps[1].trim();
                current = Some(ini.section_index_or_insert(name));
            } else if let Some(caps) = entry_re().captures(line) {
                let idx = match current {
                    Some(idx) => idx,
                    None => {
                        let idx = ini.section_index_or_insert("");
                        current = Some(idx);
                        idx
                    }
                };
                let key = caps[1].trim().to_string();
                // `key = value` drops the single space after `=`; `key=value` keeps the value verbatim
                let value = match caps[3].strip_prefix(' ') {
                    Some(rest) if !caps[2].is_empty() => rest,
                    _ => &caps[3],
                };
                ini.set_in(idx, key, value.to_string());
            } else {
                log::warn!("{}: skipping line {}: {}", ini.path.display(), i + 1, trimmed);
            }
        }

        Ok(ini)
    }

    fn section_index(&self, name: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        match self.section_index(name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        }
    }

    fn set_in(&mut self, idx: usize, key: String, value: String) {
        let section = &mut self.sections[idx];
        match section
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(entry) => entry.1 = value,
            None => section.entries.push((key, value)),
        }
    }

    pub fn read(&self, key: &str, section: &str) -> Option<&str> {
        let idx = self.section_index(section)?;
        self.sections[idx]
            .entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn key_exists(&self, key: &str, section: &str) -> bool {
        self.read(key, section).is_some()
    }

    pub fn write(&mut self, key: &str, value: &str, section: &str) {
        let idx = self.section_index_or_insert(section);
        self.set_in(idx, key.to_string(), value.to_string());
    }

    /// Section names in file order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn remove_section(&mut self, name: &str) {
        self.sections.retain(|s| !s.name.eq_ignore_ascii_case(name));
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if !section.name.is_empty() || !out.is_empty() {
                out.push_str(&format!("[{}]\n", section.name));
            }
            for (k, v) in &section.entries {
                out.push_str(&format!("{}={}\n", k, v));
            }
            out.push('\n');
        }
        out
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&self.path, self.to_text()).map_err(|e| Error::io(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
; preset
[HDR_TONEMAP]
IsActive=1
toneMapExposure = 1.4

[PRESET COMMENTS]
Comment=Line one~^#Line two
";

    #[test]
    fn parse_and_read_case_insensitive() {
        let ini = IniFile::parse(SAMPLE, "p.ini").unwrap();
        assert_eq!(ini.read("isactive", "hdr_tonemap"), Some("1"));
        assert_eq!(ini.read("toneMapExposure", "HDR_TONEMAP"), Some("1.4"));
        assert!(!ini.key_exists("Missing", "HDR_TONEMAP"));
        assert_eq!(ini.sections().collect::<Vec<_>>(), vec!["HDR_TONEMAP", "PRESET COMMENTS"]);
    }

    #[test]
    fn write_overwrites_existing_key() {
        let mut ini = IniFile::parse(SAMPLE, "p.ini").unwrap();
        ini.write("ISACTIVE", "0", "HDR_TONEMAP");
        assert_eq!(ini.read("IsActive", "HDR_TONEMAP"), Some("0"));
        ini.write("New", "x", "NEW_SECTION");
        let text = ini.to_text();
        assert!(text.contains("[NEW_SECTION]\nNew=x\n"));
    }

    #[test]
    fn skips_garbage_lines() {
        let ini = IniFile::parse("[A]\nnot an entry\nKey=1\n", "bad.ini").unwrap();
        assert_eq!(ini.read("Key", "A"), Some("1"));
        assert_eq!(ini.sections().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn values_keep_leading_indentation() {
        let mut ini = IniFile::new("c.ini");
        ini.write("NewCode", "    float x = 1;", "CUSTOM_TWEAK_1");
        ini.write("Trailing", "a  ", "CUSTOM_TWEAK_1");
        let reparsed = IniFile::parse(&ini.to_text().replace('\n', "\r\n"), "c.ini").unwrap();
        assert_eq!(reparsed.read("NewCode", "CUSTOM_TWEAK_1"), Some("    float x = 1;"));
        assert_eq!(reparsed.read("Trailing", "CUSTOM_TWEAK_1"), Some("a  "));
    }

    #[test]
    fn open_missing_file_is_empty_and_save_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom_preset.ini");
        let mut ini = IniFile::open(&path).unwrap();
        assert_eq!(ini.sections().count(), 0);
        assert_eq!(ini.filename(), "custom_preset.ini");
        ini.write("IsActive", "1", "CLOUDS_CLOUD_SIZE");
        ini.save().unwrap();
        let reopened = IniFile::open(&path).unwrap();
        assert_eq!(reopened.read("IsActive", "CLOUDS_CLOUD_SIZE"), Some("1"));
    }

    #[test]
    fn section_names_may_contain_spaces_and_symbols() {
        let ini = IniFile::parse("[HDR & POST-PROCESSING_POSTPROCESS]\nNoHDR=1\n", "p.ini").unwrap();
        assert_eq!(ini.read("NoHDR", "HDR & POST-PROCESSING_POSTPROCESS"), Some("1"));
    }
}
