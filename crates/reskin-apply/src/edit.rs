//! Anchored text edits.
//!
//! Pure functions over file contents; the applier decides whether to write.

use regex::Captures;
use reskin_manifest::{Edit, Palette, Patch};

/// Result of applying a patch to some text.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The text changed; `replacements` anchors were edited
    Changed { text: String, replacements: usize },

    /// Anchors matched but the edit produced identical text
    Unchanged { matches: usize },

    /// The guard text is already present
    AlreadyApplied,

    /// No anchor match
    AnchorMissing,

    /// The edit recreates its own anchor and has no guard, so every run
    /// would apply it again
    Reapplies,
}

/// Apply a patch to `content`.
///
/// An unguarded edit whose output would be edited again on the next run is
/// refused with [`EditOutcome::Reapplies`] instead of stacking.
pub fn apply_patch(content: &str, patch: &Patch) -> EditOutcome {
    if let Some(guard) = &patch.guard {
        if content.contains(guard.as_str()) {
            return EditOutcome::AlreadyApplied;
        }
    }

    let Some((text, matches)) = rewrite(content, patch) else {
        return EditOutcome::AnchorMissing;
    };

    if text == content {
        return EditOutcome::Unchanged { matches };
    }

    if patch.guard.is_none() {
        if let Some((again, _)) = rewrite(&text, patch) {
            if again != text {
                return EditOutcome::Reapplies;
            }
        }
    }

    EditOutcome::Changed {
        text,
        replacements: matches,
    }
}

/// Run the edit once. `None` when the anchor does not match.
fn rewrite(content: &str, patch: &Patch) -> Option<(String, usize)> {
    let re = patch.anchor.pattern();
    let limit = patch.occurrences.limit();

    let matches = if limit == 0 {
        re.find_iter(content).count()
    } else {
        re.find_iter(content).take(limit).count()
    };
    if matches == 0 {
        return None;
    }

    let expand = !patch.anchor.is_literal();
    let text = re
        .replacen(content, limit, |caps: &Captures<'_>| {
            let matched = caps.get(0).map_or("", |m| m.as_str());
            let mut out = String::new();
            match &patch.edit {
                Edit::Replace(replacement) if expand => caps.expand(replacement, &mut out),
                Edit::Replace(replacement) => out.push_str(replacement),
                Edit::InsertBefore(insert) => {
                    out.push_str(insert);
                    out.push_str(matched);
                }
                Edit::InsertAfter(insert) => {
                    out.push_str(matched);
                    out.push_str(insert);
                }
            }
            out
        })
        .into_owned();

    Some((text, matches))
}

/// Result of applying a palette: the new text and per-key match counts.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteOutcome {
    pub text: String,
    pub counts: Vec<(String, usize)>,
}

impl PaletteOutcome {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Apply every palette entry in order.
pub fn apply_palette(content: &str, palette: &Palette) -> PaletteOutcome {
    let mut text = content.to_string();
    let mut counts = Vec::with_capacity(palette.entries.len());

    for entry in &palette.entries {
        let count = match apply_patch(&text, &entry.patch) {
            EditOutcome::Changed {
                text: patched,
                replacements,
            } => {
                text = patched;
                replacements
            }
            EditOutcome::Unchanged { matches } => matches,
            EditOutcome::AlreadyApplied
            | EditOutcome::AnchorMissing
            | EditOutcome::Reapplies => 0,
        };
        counts.push((entry.key.clone(), count));
    }

    PaletteOutcome { text, counts }
}
