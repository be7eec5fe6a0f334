//! Event type catalogue.
//!
//! Event types follow `<domain>.<action>_<object>`, with
//! `<domain>.changed` and `<domain>.structure_changed` as the generic forms.
//! Broad listeners subscribe to the generic form; panels that need detail
//! subscribe to the specific one. [`default_hierarchy`] wires the two
//! together so publishers only ever emit the specific event.

/// Application-wide events
pub mod app {
    pub const CLOSING: &str = "app.closing";
}

/// Dataset data events
pub mod dataset {
    /// Generic dataset change, for broad awareness.
    pub const CHANGED: &str = "dataset.changed";
    /// Columns or rows were added, removed or reordered.
    pub const STRUCTURE_CHANGED: &str = "dataset.structure_changed";
    /// Cell values changed.
    pub const DATA_CHANGED: &str = "dataset.data_changed";
    pub const SELECTED: &str = "dataset.selected";

    pub const CREATED: &str = "dataset.created";
    pub const UPDATED: &str = "dataset.updated";
    pub const DELETED: &str = "dataset.deleted";

    pub const COLUMN_ADDED: &str = "dataset.column_added";
    pub const COLUMN_REMOVED: &str = "dataset.column_removed";
    pub const COLUMN_RENAMED: &str = "dataset.column_renamed";
    pub const COLUMN_REORDERED: &str = "dataset.column_reordered";

    pub const ROW_ADDED: &str = "dataset.row_added";
    pub const ROW_REMOVED: &str = "dataset.row_removed";
    pub const ROW_UPDATED: &str = "dataset.row_updated";

    pub const BULK_UPDATE: &str = "dataset.bulk_update";
    pub const IMPORTED: &str = "dataset.imported";
    pub const EXPORTED: &str = "dataset.exported";
}

/// Analysis events
pub mod analysis {
    pub const STARTED: &str = "analysis.started";
    pub const COMPLETED: &str = "analysis.completed";
    pub const FAILED: &str = "analysis.failed";
    pub const COLUMN_ADDED: &str = "analysis.column_added";
    pub const CONFIG_CHANGED: &str = "analysis.config_changed";
}

/// Chart events
pub mod chart {
    pub const CREATED: &str = "chart.created";
    pub const UPDATED: &str = "chart.updated";
    pub const DELETED: &str = "chart.deleted";
    pub const STYLE_CHANGED: &str = "chart.style_changed";
    pub const DATA_UPDATED: &str = "chart.data_updated";
    pub const SELECTED: &str = "chart.selected";
    pub const PREVIEW_REQUESTED: &str = "chart.preview_requested";
}

/// User interface events
pub mod ui {
    pub const TAB_CHANGED: &str = "ui.tab_changed";
    pub const TAB_CREATED: &str = "ui.tab_created";
    pub const TAB_CLOSED: &str = "ui.tab_closed";
    pub const TAB_TITLE_CHANGED: &str = "ui.tab_title_changed";
    pub const PANEL_VISIBILITY_CHANGED: &str = "ui.panel_visibility_changed";
    pub const SIDEBAR_PANEL_SELECTED: &str = "ui.sidebar_panel_selected";
}

/// Curve fitting events
pub mod fit {
    pub const STARTED: &str = "fit.started";
    pub const COMPLETED: &str = "fit.completed";
    pub const APPLIED: &str = "fit.applied";
    pub const FAILED: &str = "fit.failed";
}

/// Project events, agnostic of item type
pub mod project {
    pub const CREATED: &str = "project.created";
    pub const LOADED: &str = "project.loaded";
    pub const SAVED: &str = "project.saved";
    pub const CLOSED: &str = "project.closed";
    pub const SAVING: &str = "project.saving";
    pub const FIRST_LOADED: &str = "first_project_loaded";

    /// Generic project change, for broad awareness.
    pub const CHANGED: &str = "project.changed";
    pub const ITEM_ADDED: &str = "project.item_added";
    pub const ITEM_REMOVED: &str = "project.item_removed";
    pub const ITEM_RENAMED: &str = "project.item_renamed";
    pub const ITEM_MOVED: &str = "project.item_moved";
    pub const STRUCTURE_CHANGED: &str = "project.structure_changed";
}

/// Folder item events
pub mod folder {
    pub const CREATED: &str = "folder.created";
    pub const RENAMED: &str = "folder.renamed";
    pub const DELETED: &str = "folder.deleted";
    pub const MOVED: &str = "folder.moved";
}

/// Note item events
pub mod note {
    pub const CREATED: &str = "note.created";
    pub const RENAMED: &str = "note.renamed";
    pub const DELETED: &str = "note.deleted";
    pub const MOVED: &str = "note.moved";
    pub const CONTENT_CHANGED: &str = "note.content_changed";
}

/// Dataset items in the project tree (as opposed to dataset contents)
pub mod dataset_item {
    pub const CREATED: &str = "dataset_item.created";
    pub const IMPORTED: &str = "dataset_item.imported";
    pub const REMOVED: &str = "dataset_item.removed";
    pub const RENAMED: &str = "dataset_item.renamed";
    pub const MOVED: &str = "dataset_item.moved";
}

/// The application's built-in hierarchy table.
///
/// Each entry is `(event type, chain)`, with the chain ordered specific to
/// generic and starting with the event type itself. Types that only map to
/// themselves are listed so the table doubles as a catalogue of known events.
pub fn default_hierarchy() -> Vec<(&'static str, Vec<&'static str>)> {
    use self::{
        analysis as an, app as ap, chart as ch, dataset as ds, dataset_item as di, folder as fo,
        note as no, project as pr, ui as u,
    };

    let project_item = |event: &'static str, level: &'static str| {
        (event, vec![event, level, pr::CHANGED])
    };
    let structure = |event: &'static str| {
        (event, vec![event, ds::STRUCTURE_CHANGED, ds::CHANGED])
    };
    let data = |event: &'static str| (event, vec![event, ds::DATA_CHANGED, ds::CHANGED]);
    let own = |event: &'static str| (event, vec![event]);

    vec![
        own(ap::CLOSING),
        // Folder, note and dataset item events roll up into the project.
        project_item(fo::CREATED, pr::ITEM_ADDED),
        project_item(fo::RENAMED, pr::ITEM_RENAMED),
        project_item(fo::DELETED, pr::ITEM_REMOVED),
        project_item(fo::MOVED, pr::ITEM_MOVED),
        project_item(no::CREATED, pr::ITEM_ADDED),
        project_item(no::RENAMED, pr::ITEM_RENAMED),
        project_item(no::DELETED, pr::ITEM_REMOVED),
        project_item(no::MOVED, pr::ITEM_MOVED),
        (no::CONTENT_CHANGED, vec![no::CONTENT_CHANGED, pr::CHANGED]),
        project_item(di::CREATED, pr::ITEM_ADDED),
        project_item(di::IMPORTED, pr::ITEM_ADDED),
        project_item(di::REMOVED, pr::ITEM_REMOVED),
        project_item(di::RENAMED, pr::ITEM_RENAMED),
        project_item(di::MOVED, pr::ITEM_MOVED),
        // Dataset operations roll up into structure/data changes.
        structure(ds::COLUMN_ADDED),
        structure(ds::COLUMN_REMOVED),
        structure(ds::COLUMN_RENAMED),
        structure(ds::COLUMN_REORDERED),
        structure(ds::ROW_ADDED),
        structure(ds::ROW_REMOVED),
        data(ds::ROW_UPDATED),
        data(ds::BULK_UPDATE),
        (ds::IMPORTED, vec![ds::IMPORTED, ds::CHANGED]),
        own(ds::EXPORTED),
        // A completed analysis adds a result column to its dataset.
        (
            an::COMPLETED,
            vec![
                an::COMPLETED,
                ds::COLUMN_ADDED,
                ds::STRUCTURE_CHANGED,
                ds::CHANGED,
            ],
        ),
        own(an::FAILED),
        own(an::STARTED),
        own(an::CONFIG_CHANGED),
        own(ch::CREATED),
        own(ch::UPDATED),
        own(ch::DELETED),
        own(ch::STYLE_CHANGED),
        own(ch::DATA_UPDATED),
        own(ch::SELECTED),
        own(u::TAB_CHANGED),
        own(u::TAB_CREATED),
        own(u::TAB_CLOSED),
        own(u::TAB_TITLE_CHANGED),
        own(u::PANEL_VISIBILITY_CHANGED),
        own(u::SIDEBAR_PANEL_SELECTED),
        own(pr::CREATED),
        own(pr::LOADED),
        own(pr::SAVED),
        own(pr::CLOSED),
        own(pr::SAVING),
        own(pr::FIRST_LOADED),
        own(pr::CHANGED),
        (pr::ITEM_ADDED, vec![pr::ITEM_ADDED, pr::CHANGED]),
        (pr::ITEM_REMOVED, vec![pr::ITEM_REMOVED, pr::CHANGED]),
        (pr::ITEM_RENAMED, vec![pr::ITEM_RENAMED, pr::CHANGED]),
        (pr::ITEM_MOVED, vec![pr::ITEM_MOVED, pr::CHANGED]),
        (pr::STRUCTURE_CHANGED, vec![pr::STRUCTURE_CHANGED, pr::CHANGED]),
    ]
}
