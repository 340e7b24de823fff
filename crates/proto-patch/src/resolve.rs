//! Container resolution: walk a directive's container steps from a root
//! object down to the object that holds the target field.

use proto_data::{FieldValue, GameDatabase, ObjectHandle};
use proto_patch_path::{format_steps, PathStep};
use tracing::trace;

use crate::error::PatchError;

/// Follow `steps` from `root`. Every step must land on an embedded object.
pub fn resolve_container(db: &GameDatabase, root: ObjectHandle, steps: &[PathStep]) -> Result<ObjectHandle, PatchError> {
    let mut current = root;
    for (depth, step) in steps.iter().enumerate() {
        let walked = || format_steps(&steps[..=depth]);
        trace!(object = %current, step = %step, "resolving path step");

        let field = db.field(current, &step.field).ok_or_else(|| {
            PatchError::path_resolution(
                walked(),
                format!(
                    "no field '{}' on '{}', available: {}",
                    step.field,
                    db.class_of(current).name,
                    db.available_fields(current).join(", ")
                ),
            )
        })?;
        let value = db.read(field);

        current = match step.index {
            Some(index) => {
                let items: &[FieldValue] = match value {
                    FieldValue::List(items) => items.as_slice(),
                    FieldValue::Null => &[],
                    _ => return Err(PatchError::path_resolution(walked(), format!("'{}' is not a list", step.field))),
                };
                let item = items.get(index).ok_or_else(|| {
                    PatchError::path_resolution(walked(), format!("index {index} out of range for {} elements", items.len()))
                })?;
                item.as_object()
                    .ok_or_else(|| PatchError::path_resolution(walked(), format!("element {index} is not an object")))?
            }
            None => value.as_object().ok_or_else(|| {
                let reason = if value.is_null() { "field is null" } else { "field is not an object" };
                PatchError::path_resolution(walked(), reason)
            })?,
        };
    }
    Ok(current)
}
