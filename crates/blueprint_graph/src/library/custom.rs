// SPDX-License-Identifier: MIT OR Apache-2.0
//! User-defined node types.
//!
//! Custom nodes declare pins only. Without a behavior they pass control
//! through and resolve to `Null`.

use crate::node::{NodeCategory, NodeRegistry, NodeType};
use crate::pin::{PinSpec, PinType};

/// Add the user-defined node types to `registry`
pub fn register_custom_nodes(registry: &mut NodeRegistry) {
    registry.register(
        NodeType::new("my_macro", "My Custom Function", NodeCategory::Custom)
            .with_inputs(vec![PinSpec::new("Input A", PinType::String)])
            .with_outputs(vec![PinSpec::new("Output", PinType::String)]),
    );
}
