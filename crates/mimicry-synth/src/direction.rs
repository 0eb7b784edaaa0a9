use mimicry_core::SchemaNode;

use crate::state::GenerationState;

/// Whether a field may appear in the content currently being generated.
///
/// `readOnly` fields belong to responses and `writeOnly` fields to requests.
/// A missing schema or state, or a schema with neither flag, always matches.
pub fn is_match_schema_read_write_to_state(
    schema: Option<&SchemaNode>,
    state: Option<&GenerationState>,
) -> bool {
    let Some(schema) = schema else {
        return true;
    };
    if !schema.read_only && !schema.write_only {
        return true;
    }
    let Some(state) = state else {
        return true;
    };

    if schema.read_only && !state.is_content_read_only {
        return false;
    }
    if schema.write_only && !state.is_content_write_only {
        return false;
    }
    true
}
