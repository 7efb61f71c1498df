//! Merged catalog of every operation the client knows.

use facility_core::Operation;

/// Operation tables per resource, in a stable order.
pub const RESOURCES: &[(&str, &[&Operation])] = &[
    ("AlternativeTMs", facility_executions::alternative_tms::OPERATIONS),
    ("Blocks", facility_buildings::blocks::OPERATIONS),
    ("Buildings", facility_buildings::buildings::OPERATIONS),
    ("Executions", facility_executions::executions::OPERATIONS),
    ("Files", facility_files::files::OPERATIONS),
    ("Icons", facility_files::icons::OPERATIONS),
    ("UiComponents", facility_ui::components::OPERATIONS),
];

/// Every operation, grouped by resource.
#[must_use]
pub fn operations() -> Vec<&'static Operation> {
    RESOURCES
        .iter()
        .flat_map(|(_, operations)| operations.iter().copied())
        .collect()
}

/// Look up an operation by its identifier, e.g. `Buildings_GetById`.
#[must_use]
pub fn find_operation(id: &str) -> Option<&'static Operation> {
    RESOURCES
        .iter()
        .flat_map(|(_, operations)| operations.iter().copied())
        .find(|operation| operation.id == id)
}
