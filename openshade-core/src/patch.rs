//! Anchor-based text patching.
//!
//! Every operation searches for an exact substring and splices new text around
//! it. Nothing here understands HLSL; patches are authored against the stock
//! shader sources and break when those change.

use thiserror::Error;

use crate::shaders::{ShaderBuffers, ShaderFile};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("anchor not found: `{anchor}`")]
    AnchorNotFound { anchor: String },
    #[error("expected occurrence {wanted} of `{anchor}`, found {found}")]
    NotEnoughOccurrences {
        anchor: String,
        wanted: usize,
        found: usize,
    },
    #[error("`{end}` does not follow `{start}`")]
    EndBeforeStart { start: String, end: String },
    #[error("span starting at `{start}` already contains a block comment end")]
    NestedComment { start: String },
    #[error("empty anchor")]
    EmptyAnchor,
}

pub type PatchResult = Result<String, PatchError>;

fn locate(text: &str, anchor: &str) -> Result<usize, PatchError> {
    if anchor.is_empty() {
        return Err(PatchError::EmptyAnchor);
    }
    text.find(anchor).ok_or_else(|| PatchError::AnchorNotFound {
        anchor: anchor.to_string(),
    })
}

fn splice(text: &str, start: usize, end: usize, with: &str) -> String {
    let mut out = String::with_capacity(text.len() + with.len());
    out.push_str(&text[..start]);
    out.push_str(with);
    out.push_str(&text[end..]);
    out
}

/// Insert `insert` right before the first occurrence of `anchor`.
pub fn add_before(text: &str, anchor: &str, insert: &str) -> PatchResult {
    let at = locate(text, anchor)?;
    Ok(splice(text, at, at, insert))
}

/// Insert `insert` right after the first occurrence of `anchor`.
pub fn add_after(text: &str, anchor: &str, insert: &str) -> PatchResult {
    let at = locate(text, anchor)? + anchor.len();
    Ok(splice(text, at, at, insert))
}

pub fn replace_first(text: &str, anchor: &str, new: &str) -> PatchResult {
    replace_nth(text, anchor, new, 1)
}

/// Replace every occurrence; at least one must exist.
pub fn replace_all(text: &str, anchor: &str, new: &str) -> PatchResult {
    locate(text, anchor)?;
    Ok(text.replace(anchor, new))
}

pub fn replace_second(text: &str, anchor: &str, new: &str) -> PatchResult {
    replace_nth(text, anchor, new, 2)
}

/// Replace the `n`-th (1-based) non-overlapping occurrence of `anchor`.
pub fn replace_nth(text: &str, anchor: &str, new: &str, n: usize) -> PatchResult {
    locate(text, anchor)?;
    let found = text.matches(anchor).count();
    match text.match_indices(anchor).nth(n.saturating_sub(1)) {
        Some((at, _)) if n > 0 => Ok(splice(text, at, at + anchor.len(), new)),
        _ => Err(PatchError::NotEnoughOccurrences {
            anchor: anchor.to_string(),
            wanted: n,
            found,
        }),
    }
}

/// Wrap the span from `start` to the next `end` in a block comment.
///
/// With `inclusive` the anchors themselves end up inside the comment,
/// otherwise only the text between them does.
pub fn comment_out(text: &str, start: &str, end: &str, inclusive: bool) -> PatchResult {
    let s = locate(text, start)?;
    if end.is_empty() {
        return Err(PatchError::EmptyAnchor);
    }
    let search_from = s + start.len();
    let e = match text[search_from..].find(end) {
        Some(rel) => search_from + rel,
        None if text.contains(end) => {
            return Err(PatchError::EndBeforeStart {
                start: start.to_string(),
                end: end.to_string(),
            })
        }
        None => {
            return Err(PatchError::AnchorNotFound {
                anchor: end.to_string(),
            })
        }
    };

    let (from, to) = if inclusive {
        (s, e + end.len())
    } else {
        (search_from, e)
    };
    let span = &text[from..to];
    if span.contains("*/") {
        return Err(PatchError::NestedComment {
            start: start.to_string(),
        });
    }
    Ok(splice(text, from, to, &format!("/*{}*/", span)))
}

/// Runs a tweak's patch list against the shader buffers.
///
/// Patches keep running after a failure so the log reports the tweak once;
/// the first failure is kept along with the file it happened in.
pub struct Patcher<'a> {
    buffers: &'a mut ShaderBuffers,
    failure: Option<(ShaderFile, PatchError)>,
    applied: usize,
}

impl<'a> Patcher<'a> {
    pub fn new(buffers: &'a mut ShaderBuffers) -> Self {
        Self {
            buffers,
            failure: None,
            applied: 0,
        }
    }

    fn run(&mut self, file: ShaderFile, op: impl FnOnce(&str) -> PatchResult) -> &mut Self {
        let text = self.buffers.get_mut(file);
        match op(text) {
            Ok(patched) => {
                *text = patched;
                self.applied += 1;
            }
            Err(e) => {
                log::debug!("patch failed in {}: {}", file.file_name(), e);
                if self.failure.is_none() {
                    self.failure = Some((file, e));
                }
            }
        }
        self
    }

    pub fn add_before(&mut self, file: ShaderFile, anchor: &str, insert: &str) -> &mut Self {
        self.run(file, |t| add_before(t, anchor, insert))
    }

    pub fn add_after(&mut self, file: ShaderFile, anchor: &str, insert: &str) -> &mut Self {
        self.run(file, |t| add_after(t, anchor, insert))
    }

    pub fn replace_first(&mut self, file: ShaderFile, anchor: &str, new: &str) -> &mut Self {
        self.run(file, |t| replace_first(t, anchor, new))
    }

    pub fn replace_all(&mut self, file: ShaderFile, anchor: &str, new: &str) -> &mut Self {
        self.run(file, |t| replace_all(t, anchor, new))
    }

    pub fn replace_second(&mut self, file: ShaderFile, anchor: &str, new: &str) -> &mut Self {
        self.run(file, |t| replace_second(t, anchor, new))
    }

    pub fn replace_nth(&mut self, file: ShaderFile, anchor: &str, new: &str, n: usize) -> &mut Self {
        self.run(file, |t| replace_nth(t, anchor, new, n))
    }

    pub fn comment_out(&mut self, file: ShaderFile, start: &str, end: &str, inclusive: bool) -> &mut Self {
        self.run(file, |t| comment_out(t, start, end, inclusive))
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn finish(self) -> Result<(), (ShaderFile, PatchError)> {
        match self.failure {
            Some(f) => Err(f),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "float a = 1;\nfloat b = 2;\nfloat a = 1;\n";

    #[test]
    fn add_before_and_after_use_first_occurrence() {
        let out = add_before(SRC, "float a", "// x\n").unwrap();
        assert!(out.starts_with("// x\nfloat a = 1;"));
        assert_eq!(out.matches("// x").count(), 1);

        let out = add_after(SRC, "float b = 2;", " // y").unwrap();
        assert!(out.contains("float b = 2; // y\n"));
    }

    #[test]
    fn missing_anchor_fails() {
        assert_eq!(
            add_before(SRC, "float c", "x"),
            Err(PatchError::AnchorNotFound { anchor: "float c".into() })
        );
        assert_eq!(replace_all(SRC, "", "x"), Err(PatchError::EmptyAnchor));
    }

    #[test]
    fn replace_variants() {
        let first = replace_first(SRC, "float a = 1;", "A").unwrap();
        assert_eq!(first, "A\nfloat b = 2;\nfloat a = 1;\n");

        let second = replace_second(SRC, "float a = 1;", "A").unwrap();
        assert_eq!(second, "float a = 1;\nfloat b = 2;\nA\n");

        let all = replace_all(SRC, "float a = 1;", "A").unwrap();
        assert_eq!(all, "A\nfloat b = 2;\nA\n");
    }

    #[test]
    fn replace_second_needs_two_occurrences() {
        let err = replace_second(SRC, "float b = 2;", "B").unwrap_err();
        assert_eq!(
            err,
            PatchError::NotEnoughOccurrences { anchor: "float b = 2;".into(), wanted: 2, found: 1 }
        );
    }

    #[test]
    fn comment_out_inclusive_and_exclusive() {
        let text = "x;\n//begin\nbody;\n//end\ny;";
        let inc = comment_out(text, "//begin", "//end", true).unwrap();
        assert_eq!(inc, "x;\n/*//begin\nbody;\n//end*/\ny;");

        let exc = comment_out(text, "//begin", "//end", false).unwrap();
        assert_eq!(exc, "x;\n//begin/*\nbody;\n*///end\ny;");
    }

    #[test]
    fn comment_out_rejects_reversed_anchors() {
        let text = "//end\nbody;\n//begin";
        assert_eq!(
            comment_out(text, "//begin", "//end", true),
            Err(PatchError::EndBeforeStart { start: "//begin".into(), end: "//end".into() })
        );
    }

    #[test]
    fn comment_out_rejects_nested_block_comment() {
        let text = "//begin\n/* old */\n//end";
        assert!(matches!(
            comment_out(text, "//begin", "//end", true),
            Err(PatchError::NestedComment { .. })
        ));
    }

    #[test]
    fn patcher_keeps_first_failure_and_continues() {
        let mut buffers = ShaderBuffers::default();
        *buffers.get_mut(ShaderFile::Hdr) = "one two".to_string();
        let mut p = Patcher::new(&mut buffers);
        p.replace_all(ShaderFile::Hdr, "missing", "x")
            .replace_all(ShaderFile::Hdr, "one", "1");
        assert_eq!(p.applied(), 1);
        let (file, err) = p.finish().unwrap_err();
        assert_eq!(file, ShaderFile::Hdr);
        assert!(matches!(err, PatchError::AnchorNotFound { .. }));
        assert_eq!(buffers.get(ShaderFile::Hdr), "1 two");
    }
}
