//! Built-in manifest and starter assets written by `reskin init`.

/// Default manifest: the green "fisheater" rebrand of a scratch-gui checkout.
pub const DEFAULT_MANIFEST: &str = r##"# reskin manifest

[project]
# External checkout, relative to this file
root = "scratch-gui"

# Generated output, relative to root
build_dir = "build"

# Directory listing logged before prebuild (0 disables it)
tree_depth = 1

[vars]
resources = "https://fisheater.peterdance.com/resources"
accent = "#00aa00"
accent_dark = "hsla(120, 42%, 51%, 1)"

# ---------------------------------------------------------------- prebuild

[[assets]]
from = "custom/site_icon.png"
to = "src/lib/gui/assets/icon.png"

[[assets]]
from = "custom/site_icon.png"
to = "static/icon.png"

[[assets]]
url = "{{ resources }}/cursor.png"
to = "src/lib/gui/assets/cursor.png"

[[assets]]
url = "{{ resources }}/cursor_select.png"
to = "src/lib/gui/assets/cursor_select.png"

[[assets]]
from = "custom/default-project.sb3"
to = "src/lib/default-project/default-project.sb3"

[[assets]]
from = "custom/default-project.sb3"
to = "src/lib/default-project/override-default-project.sb3"

[[assets]]
from = "custom/overrides.css"
to = "static/overrides.css"

[[rules]]
name = "accent palette"
files = "src/lib/themes/accent/red.js"

[rules.palette]
looks-secondary = "{{ accent }}"
looks-transparent = "{{ accent }}59"
looks-light-transparent = "{{ accent }}26"
looks-secondary-dark = "{{ accent_dark }}"

[[rules]]
name = "template head links"
files = [
    "src/playground/index.ejs",
    "src/playground/embed.ejs",
    "src/playground/simple.ejs",
]
anchor = { regex = "<head[^>]*>" }
insert_after = """

    <link rel="icon" href="<%= root %>static/icon.png">
    <link rel="stylesheet" href="<%= root %>static/overrides.css">"""
unless_contains = "static/overrides.css"

# ------------------------------------------------------------------ inject

[[assets]]
phase = "inject"
from = "custom/site_icon.png"
to = "build/favicon.ico"

[[rules]]
name = "overrides stylesheet link"
phase = "inject"
files = "build/*.html"
anchor = { literal = "</head>" }
insert_before = """
  <link rel="stylesheet" href="static/overrides.css">
"""
unless_contains = "static/overrides.css"
"##;

/// Starter stylesheet: custom cursors and the accent colour.
pub const DEFAULT_OVERRIDES_CSS: &str = r#"/* reskin overrides */

html, body, * {
  cursor: url("https://fisheater.peterdance.com/resources/cursor.png"), auto !important;
}

*:hover {
  cursor: url("https://fisheater.peterdance.com/resources/cursor_select.png"), auto !important;
}

:root {
  --looks-secondary: #00aa00 !important;
}
"#;
