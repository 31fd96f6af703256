use std::fmt;

use serde::{Deserialize, Serialize};

use super::param::Parameter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    EnhancedAtmospherics,
    Clouds,
    Atmosphere,
    Lighting,
    Terrain,
    Pbr,
    Hdr,
    PostProcess,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::EnhancedAtmospherics => "Enhanced Atmospherics",
            Category::Clouds => "Clouds",
            Category::Atmosphere => "Atmosphere",
            Category::Lighting => "Lighting",
            Category::Terrain => "Terrain",
            Category::Pbr => "PBR",
            Category::Hdr => "HDR",
            Category::PostProcess => "Post-processing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweak {
    /// Preset section name
    pub key: String,
    /// Unique display name; also selects the patch recipe
    pub name: String,
    pub description: String,
    pub category: Category,
    pub is_enabled: bool,
    pub was_enabled: bool,
    pub parameters: Vec<Parameter>,
}

impl Tweak {
    pub fn new(key: &str, category: Category, name: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category,
            is_enabled: false,
            was_enabled: false,
            parameters: Vec::new(),
        }
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Switched on or off since the last baseline.
    pub fn state_changed(&self) -> bool {
        self.is_enabled != self.was_enabled
    }

    pub fn contains_changes(&self) -> bool {
        self.parameters.iter().any(|p| p.has_changed())
    }

    pub fn is_dirty(&self) -> bool {
        self.state_changed() || self.contains_changes()
    }

    pub fn commit(&mut self) {
        self.was_enabled = self.is_enabled;
        for p in &mut self.parameters {
            p.commit();
        }
    }

    pub fn reset_defaults(&mut self) {
        for p in &mut self.parameters {
            p.reset_default();
        }
    }

    pub fn reset_previous(&mut self) {
        for p in &mut self.parameters {
            p.reset_previous();
        }
    }

    pub fn param(&self, data_name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.data_name == data_name)
    }

    /// Current value of the parameter at `idx`, empty if out of range.
    pub fn value(&self, idx: usize) -> &str {
        self.parameters.get(idx).map(|p| p.value.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::param::{Control, Parameter};

    fn sample() -> Tweak {
        Tweak::new("CLOUDS_CLOUD_SATURATION", Category::Clouds, "Cloud saturation", "")
            .with_param(Parameter::number("ShadeFactor", "Saturation", 1.0, 1.0, 0.0, 3.0, Control::TextBox))
    }

    #[test]
    fn tracks_enable_and_param_changes_independently() {
        let mut t = sample();
        assert!(!t.is_dirty());
        t.is_enabled = true;
        assert!(t.state_changed());
        assert!(!t.contains_changes());
        t.parameters[0].set_value("2");
        assert!(t.contains_changes());
        t.commit();
        assert!(!t.is_dirty());
    }

    #[test]
    fn reset_helpers() {
        let mut t = sample();
        t.parameters[0].set_value("2");
        t.commit();
        t.parameters[0].set_value("3");
        t.reset_previous();
        assert_eq!(t.value(0), "2");
        t.reset_defaults();
        assert_eq!(t.value(0), "1");
        assert_eq!(t.value(5), "");
    }

    #[test]
    fn categories_sort_in_catalog_order() {
        assert!(Category::Clouds < Category::Hdr);
        assert_eq!(Category::Pbr.to_string(), "PBR");
    }
}
