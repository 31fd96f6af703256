use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The shader sources OpenShade patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderFile {
    General,
    Cloud,
    Terrain,
    TerrainHeader,
    FuncLibrary,
    Shadow,
    Hdr,
    Pbr,
    Composite,
    PrecipParticle,
}

impl ShaderFile {
    pub const ALL: [ShaderFile; 10] = [
        ShaderFile::General,
        ShaderFile::Cloud,
        ShaderFile::Terrain,
        ShaderFile::TerrainHeader,
        ShaderFile::FuncLibrary,
        ShaderFile::Shadow,
        ShaderFile::Hdr,
        ShaderFile::Pbr,
        ShaderFile::Composite,
        ShaderFile::PrecipParticle,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ShaderFile::General => "General.fx",
            ShaderFile::Cloud => "Cloud.fx",
            ShaderFile::Terrain => "Terrain.fx",
            ShaderFile::TerrainHeader => "Terrain.fxh",
            ShaderFile::FuncLibrary => "FuncLibrary.fxh",
            ShaderFile::Shadow => "Shadow.fxh",
            ShaderFile::Hdr => "HDR.hlsl",
            ShaderFile::Pbr => "PBRBase.fx",
            ShaderFile::Composite => "DeferredComposite.fx",
            ShaderFile::PrecipParticle => "PrecipParticle.fx",
        }
    }

    /// Sub-folder of the live shader directory, if the file does not sit at its root.
    /// Backups are always flat.
    pub fn live_subdir(&self) -> Option<&'static str> {
        match self {
            ShaderFile::Hdr => Some("PostProcess"),
            _ => None,
        }
    }

    pub fn backup_path(&self, backup_dir: &Path) -> PathBuf {
        backup_dir.join(self.file_name())
    }

    pub fn live_path(&self, shader_dir: &Path) -> PathBuf {
        match self.live_subdir() {
            Some(sub) => shader_dir.join(sub).join(self.file_name()),
            None => shader_dir.join(self.file_name()),
        }
    }

    /// Look up by file name, case-insensitive (`hdr.hlsl` → `Hdr`).
    pub fn from_file_name(name: &str) -> Result<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.file_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownShader(name.to_string()))
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ShaderFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// In-memory copy of every shader source, reloaded from the backup before each apply.
#[derive(Debug, Clone, Default)]
pub struct ShaderBuffers {
    texts: [String; 10],
}

impl ShaderBuffers {
    pub fn load(backup_dir: &Path) -> Result<Self> {
        let mut buffers = Self::default();
        for file in ShaderFile::ALL {
            let path = file.backup_path(backup_dir);
            let bytes = fs::read(&path).map_err(|e| Error::io(&path, e))?;
            let text = String::from_utf8_lossy(&bytes);
            if let Cow::Owned(_) = text {
                log::warn!("{}: invalid UTF-8 replaced", path.display());
            }
            buffers.texts[file.index()] = text.into_owned();
        }
        Ok(buffers)
    }

    pub fn get(&self, file: ShaderFile) -> &str {
        &self.texts[file.index()]
    }

    pub fn get_mut(&mut self, file: ShaderFile) -> &mut String {
        &mut self.texts[file.index()]
    }

    /// Write every buffer to its live location. Stops at the first failure;
    /// files already written stay written.
    pub fn write_live(&self, shader_dir: &Path) -> Result<()> {
        for file in ShaderFile::ALL {
            let path = file.live_path(shader_dir);
            fs::write(&path, self.get(file)).map_err(|e| Error::io(&path, e))?;
        }
        Ok(())
    }
}
