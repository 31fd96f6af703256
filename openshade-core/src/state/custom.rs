use serde::{Deserialize, Serialize};

use crate::patch::{self, PatchResult};
use crate::shaders::ShaderFile;

/// A user-authored replacement in one shader file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTweak {
    pub key: String,
    pub name: String,
    pub shader: ShaderFile,
    /// 0 replaces every occurrence, n replaces the n-th
    pub index: usize,
    pub old_code: String,
    pub new_code: String,
    pub is_enabled: bool,
}

impl CustomTweak {
    pub fn new(key: &str, name: &str, shader: ShaderFile) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            shader,
            index: 0,
            old_code: String::new(),
            new_code: String::new(),
            is_enabled: true,
        }
    }

    pub fn patch(&self, text: &str) -> PatchResult {
        if self.index == 0 {
            patch::replace_all(text, &self.old_code, &self.new_code)
        } else {
            patch::replace_nth(text, &self.old_code, &self.new_code, self.index)
        }
    }
}

/// Key for the next custom tweak, `CUSTOM_TWEAK_<n>` with the lowest unused n.
pub fn next_custom_key(existing: &[CustomTweak]) -> String {
    let mut n = existing.len() + 1;
    loop {
        let key = format!("CUSTOM_TWEAK_{}", n);
        if !existing.iter().any(|c| c.key == key) {
            return key;
        }
        n += 1;
    }
}
