//! Shader composition through named injection slots
//!
//! A template marks extension points with lines of the form `// @slot <name>`.
//! Extensions contribute code to those slots; [`compose`] splices them in
//! order and reports the extra per-instance vertex attributes they need.

use std::collections::HashSet;
use thiserror::Error;

/// Marker prefix recognized in templates
pub const SLOT_MARKER: &str = "// @slot ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("extension '{extension}' targets unknown slot '{slot}'")]
    UnknownSlot { extension: String, slot: String },
    #[error("slot '{0}' is declared more than once in the template")]
    DuplicateMarker(String),
    #[error("extension '{0}' is applied more than once")]
    DuplicateExtension(String),
}

/// Code destined for one named slot
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderFragment {
    pub slot: String,
    pub code: String,
}

impl ShaderFragment {
    pub fn new(slot: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            code: code.into(),
        }
    }
}

/// A named bundle of fragments plus what it needs from the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderExtension {
    pub name: String,
    pub fragments: Vec<ShaderFragment>,
    /// Extra per-instance attributes read from the instance buffer
    pub instance_attributes: Vec<wgpu::VertexAttribute>,
    /// Whether the code reads the shared expansion binding
    pub uses_expansion: bool,
}

/// Final shader source and the pipeline requirements gathered from extensions
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedShader {
    pub source: String,
    pub instance_attributes: Vec<wgpu::VertexAttribute>,
    pub uses_expansion: bool,
    pub extensions: Vec<String>,
}

/// Names of every slot marker in a template, in order of appearance
pub fn template_slots(template: &str) -> Result<Vec<String>, ComposeError> {
    let mut seen = HashSet::new();
    let mut slots = Vec::new();
    for line in template.lines() {
        if let Some(name) = slot_name(line) {
            if !seen.insert(name) {
                return Err(ComposeError::DuplicateMarker(name.to_string()));
            }
            slots.push(name.to_string());
        }
    }
    Ok(slots)
}

/// Splice extensions into a template. Slots no extension fills become empty.
pub fn compose(template: &str, extensions: &[ShaderExtension]) -> Result<ComposedShader, ComposeError> {
    let slots = template_slots(template)?;

    let mut names = HashSet::new();
    for extension in extensions {
        if !names.insert(extension.name.as_str()) {
            return Err(ComposeError::DuplicateExtension(extension.name.clone()));
        }
        for fragment in &extension.fragments {
            if !slots.iter().any(|s| *s == fragment.slot) {
                return Err(ComposeError::UnknownSlot {
                    extension: extension.name.clone(),
                    slot: fragment.slot.clone(),
                });
            }
        }
    }

    let mut source = String::with_capacity(template.len());
    for line in template.lines() {
        match slot_name(line) {
            Some(slot) => {
                for extension in extensions {
                    for fragment in extension.fragments.iter().filter(|f| f.slot == slot) {
                        source.push_str(&format!("// {} -> {}\n", extension.name, slot));
                        source.push_str(fragment.code.trim_end_matches('\n'));
                        source.push('\n');
                    }
                }
            }
            None => {
                source.push_str(line);
                source.push('\n');
            }
        }
    }

    Ok(ComposedShader {
        source,
        instance_attributes: extensions
            .iter()
            .flat_map(|e| e.instance_attributes.iter().copied())
            .collect(),
        uses_expansion: extensions.iter().any(|e| e.uses_expansion),
        extensions: extensions.iter().map(|e| e.name.clone()).collect(),
    })
}

fn slot_name(line: &str) -> Option<&str> {
    line.trim_start()
        .strip_prefix(SLOT_MARKER)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "fn main() {\n    var x = 1;\n    // @slot body\n    return;\n}\n// @slot tail\n";

    fn extension(name: &str, slot: &str, code: &str) -> ShaderExtension {
        ShaderExtension {
            name: name.into(),
            fragments: vec![ShaderFragment::new(slot, code)],
            instance_attributes: Vec::new(),
            uses_expansion: false,
        }
    }

    #[test]
    fn lists_slots_in_order() {
        assert_eq!(template_slots(TEMPLATE).unwrap(), vec!["body", "tail"]);
    }

    #[test]
    fn empty_composition_strips_markers() {
        let composed = compose(TEMPLATE, &[]).unwrap();
        assert!(!composed.source.contains("@slot"));
        assert!(composed.source.contains("var x = 1;"));
        assert!(!composed.uses_expansion);
        assert!(composed.instance_attributes.is_empty());
    }

    #[test]
    fn fragments_land_in_their_slot() {
        let composed = compose(
            TEMPLATE,
            &[
                extension("a", "body", "    x = x + 2;"),
                extension("b", "body", "    x = x * 3;"),
            ],
        )
        .unwrap();
        let add = composed.source.find("x = x + 2;").unwrap();
        let mul = composed.source.find("x = x * 3;").unwrap();
        let ret = composed.source.find("return;").unwrap();
        assert!(add < mul && mul < ret);
        assert_eq!(composed.extensions, vec!["a", "b"]);
    }

    #[test]
    fn unknown_slot_is_rejected() {
        let err = compose(TEMPLATE, &[extension("a", "missing", "")]).unwrap_err();
        assert_eq!(
            err,
            ComposeError::UnknownSlot {
                extension: "a".into(),
                slot: "missing".into()
            }
        );
    }

    #[test]
    fn duplicate_marker_is_rejected() {
        let template = "// @slot body\n// @slot body\n";
        assert_eq!(
            compose(template, &[]).unwrap_err(),
            ComposeError::DuplicateMarker("body".into())
        );
    }

    #[test]
    fn duplicate_extension_is_rejected() {
        let ext = extension("a", "body", "");
        assert_eq!(
            compose(TEMPLATE, &[ext.clone(), ext]).unwrap_err(),
            ComposeError::DuplicateExtension("a".into())
        );
    }

    #[test]
    fn attributes_and_expansion_are_collected() {
        let mut ext = extension("a", "tail", "");
        ext.uses_expansion = true;
        ext.instance_attributes = vec![wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32,
            offset: 4,
            shader_location: 9,
        }];
        let composed = compose(TEMPLATE, &[ext]).unwrap();
        assert!(composed.uses_expansion);
        assert_eq!(composed.instance_attributes[0].shader_location, 9);
    }
}
