// SPDX-License-Identifier: Apache-2.0
//! Component module assembly.
//!
//! Wraps a transformed markup body in a complete TSX module: toolkit import
//! preamble, a props-interface placeholder, a functional component whose body
//! returns the markup, and a default export. The body is embedded as-is apart
//! from indentation; nothing checks whether it is already a module, so
//! assembling an assembled module nests a second preamble and shell inside
//! the first.

use crate::tables::TagMap;

/// Package the component imports come from.
pub const TOOLKIT_PACKAGE: &str = "@mui/material";

/// Styles entry point of the toolkit.
pub const TOOLKIT_STYLES_PACKAGE: &str = "@mui/material/styles";

/// Components always imported, in preamble order.
pub const BASE_COMPONENTS: [&str; 12] = [
    "Box",
    "Card",
    "CardContent",
    "Button",
    "TextField",
    "Typography",
    "Container",
    "Paper",
    "Grid",
    "Chip",
    "Avatar",
    "IconButton",
];

pub const DEFAULT_COMPONENT_NAME: &str = "V0Component";
const DEFAULT_PROPS_NAME: &str = "ComponentProps";

const BODY_INDENT: &str = "    ";

/// Base components followed by any table target not already among them.
#[must_use]
pub fn import_components(tags: &TagMap) -> Vec<String> {
    let mut components: Vec<String> = BASE_COMPONENTS.iter().map(|c| (*c).to_string()).collect();
    for target in tags.targets() {
        if !components.iter().any(|existing| existing == target) {
            components.push(target.to_string());
        }
    }
    components
}

/// A usable component identifier: ASCII letter first (upper case, as JSX
/// requires for components), then letters, digits or `_`.
#[must_use]
pub fn is_component_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_uppercase())
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Re-indent every non-blank line of `body` by four spaces. Trailing line
/// breaks are dropped so the closing `);` follows the last markup line.
#[must_use]
pub fn indent_body(body: &str) -> String {
    body.trim_end_matches(['\n', '\r'])
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{BODY_INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `ComponentProps` for the default component, `<Name>Props` otherwise.
#[must_use]
pub fn props_interface_name(component_name: &str) -> String {
    if component_name == DEFAULT_COMPONENT_NAME {
        DEFAULT_PROPS_NAME.to_string()
    } else {
        format!("{component_name}Props")
    }
}

#[must_use]
pub fn assemble_module(body: &str, tags: &TagMap, component_name: &str) -> String {
    let props = props_interface_name(component_name);
    let mut lines: Vec<String> = Vec::new();

    lines.push("import {".into());
    for component in import_components(tags) {
        lines.push(format!("  {component},"));
    }
    lines.push(format!("}} from '{TOOLKIT_PACKAGE}';"));
    lines.push(format!(
        "import {{ alpha, useTheme }} from '{TOOLKIT_STYLES_PACKAGE}';"
    ));
    lines.push(String::new());

    lines.push(format!("interface {props} {{"));
    lines.push("  // Add your prop types here".into());
    lines.push("}".into());
    lines.push(String::new());

    lines.push(format!(
        "const {component_name}: React.FC<{props}> = () => {{"
    ));
    lines.push("  const theme = useTheme();".into());
    lines.push(String::new());
    lines.push("  return (".into());
    let indented = indent_body(body);
    if !indented.is_empty() {
        lines.push(indented);
    }
    lines.push("  );".into());
    lines.push("};".into());
    lines.push(String::new());
    lines.push(format!("export default {component_name};"));

    let mut module = lines.join("\n");
    module.push('\n');
    module
}
