//! Hierarchical value selection with tri-state groups.
//!
//! A group's state is `Some(true)` when every descendant item is selected,
//! `Some(false)` when none is, and `None` (indeterminate) otherwise. Setting a
//! group's state pushes it down to every descendant; changing an item
//! re-derives the states of the groups above it.
//!
//! Batches of item changes go through a [`BulkUpdate`] guard, which holds off
//! re-derivation until it is dropped and then recomputes the tree once.

use std::ops::{Deref, DerefMut};

use gridfilter_model::models::CellValue;
use serde::Serialize;

use crate::metadata::ValueKey;

/// A selectable leaf value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterValueItem {
    pub value: CellValue,
    pub display_text: String,
    /// How many rows hold this value.
    pub count: usize,
    pub selected: bool,
}

impl FilterValueItem {
    pub fn new(value: CellValue, display_text: impl Into<String>, count: usize) -> Self {
        Self {
            value,
            display_text: display_text.into(),
            count,
            selected: false,
        }
    }
}

/// A child of a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterValueNode {
    Item(FilterValueItem),
    Group(FilterValueGroup),
}

impl FilterValueNode {
    fn selection(&self) -> Option<bool> {
        match self {
            FilterValueNode::Item(item) => Some(item.selected),
            FilterValueNode::Group(group) => group.selection,
        }
    }

    fn set_selected(&mut self, selected: bool) {
        match self {
            FilterValueNode::Item(item) => item.selected = selected,
            FilterValueNode::Group(group) => group.set_selected(selected),
        }
    }
}

/// A group of items and nested groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterValueGroup {
    pub display_text: String,
    children: Vec<FilterValueNode>,
    selection: Option<bool>,
    #[serde(skip)]
    bulk_depth: usize,
}

impl FilterValueGroup {
    /// Creates an empty, unselected group.
    pub fn new(display_text: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            children: Vec::new(),
            selection: Some(false),
            bulk_depth: 0,
        }
    }

    pub fn children(&self) -> &[FilterValueNode] {
        &self.children
    }

    /// The group's tri-state selection.
    pub fn is_selected(&self) -> Option<bool> {
        self.selection
    }

    /// Appends an item.
    pub fn push_item(&mut self, item: FilterValueItem) {
        self.children.push(FilterValueNode::Item(item));
        self.refresh();
    }

    /// Appends a nested group.
    pub fn push_group(&mut self, group: FilterValueGroup) {
        self.children.push(FilterValueNode::Group(group));
        self.refresh();
    }

    /// The nested group at `index`.
    pub fn group(&self, index: usize) -> Option<&FilterValueGroup> {
        match self.children.get(index) {
            Some(FilterValueNode::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Runs `f` on the nested group at `index`, then re-derives this group's
    /// state. Returns `None` when `index` is not a group.
    pub fn update_group<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut FilterValueGroup) -> R,
    ) -> Option<R> {
        let result = match self.children.get_mut(index) {
            Some(FilterValueNode::Group(group)) => f(group),
            _ => return None,
        };
        self.refresh();
        Some(result)
    }

    /// Sets this group and every descendant to `selected`.
    pub fn set_selected(&mut self, selected: bool) {
        for child in &mut self.children {
            child.set_selected(selected);
        }
        self.selection = Some(selected);
    }

    /// Sets the node at `path` (child indices from this group down).
    ///
    /// An empty path addresses this group. Returns false when the path does
    /// not lead to a node.
    pub fn set_selected_at(&mut self, path: &[usize], selected: bool) -> bool {
        let Some((&first, rest)) = path.split_first() else {
            self.set_selected(selected);
            return true;
        };
        let changed = match self.children.get_mut(first) {
            Some(FilterValueNode::Item(item)) if rest.is_empty() => {
                item.selected = selected;
                true
            }
            Some(FilterValueNode::Group(group)) => group.set_selected_at(rest, selected),
            _ => false,
        };
        if changed {
            self.refresh();
        }
        changed
    }

    /// Sets every item holding `value`, at any depth. Returns how many matched.
    pub fn set_value_selected(&mut self, value: &CellValue, selected: bool) -> usize {
        let key = ValueKey::new(value);
        self.set_matching(&|item: &FilterValueItem| ValueKey::new(&item.value) == key, selected)
    }

    /// Sets every item accepted by `filter`, at any depth. Returns how many matched.
    pub fn set_matching(&mut self, filter: &dyn Fn(&FilterValueItem) -> bool, selected: bool) -> usize {
        let mut matched = 0;
        for child in &mut self.children {
            match child {
                FilterValueNode::Item(item) if filter(item) => {
                    item.selected = selected;
                    matched += 1;
                }
                FilterValueNode::Item(_) => {}
                FilterValueNode::Group(group) => matched += group.set_matching(filter, selected),
            }
        }
        if matched > 0 {
            self.refresh();
        }
        matched
    }

    /// Starts a batch of changes; the tree is recomputed once when the guard drops.
    pub fn bulk_update(&mut self) -> BulkUpdate<'_> {
        self.bulk_depth += 1;
        BulkUpdate { group: self }
    }

    /// Re-derives every group state from the items, bottom-up.
    pub fn recompute(&mut self) {
        for child in &mut self.children {
            if let FilterValueNode::Group(group) = child {
                group.recompute();
            }
        }
        self.selection = derive(&self.children, self.selection);
    }

    /// Derives this group's state from its children unless a batch is open.
    fn refresh(&mut self) {
        if self.bulk_depth == 0 {
            self.selection = derive(&self.children, self.selection);
        }
    }

    /// Every item, depth first.
    pub fn items(&self) -> Vec<&FilterValueItem> {
        let mut out = Vec::new();
        self.collect_items(&mut out);
        out
    }

    fn collect_items<'a>(&'a self, out: &mut Vec<&'a FilterValueItem>) {
        for child in &self.children {
            match child {
                FilterValueNode::Item(item) => out.push(item),
                FilterValueNode::Group(group) => group.collect_items(out),
            }
        }
    }

    /// Values of the selected items, depth first.
    pub fn selected_values(&self) -> Vec<CellValue> {
        self.items()
            .into_iter()
            .filter(|item| item.selected)
            .map(|item| item.value.clone())
            .collect()
    }
}

/// Tri-state of a set of children; a childless group keeps its last state.
fn derive(children: &[FilterValueNode], current: Option<bool>) -> Option<bool> {
    if children.is_empty() {
        return current;
    }
    let first = children[0].selection();
    if children.iter().all(|c| c.selection() == first) {
        first
    } else {
        None
    }
}

/// Guard returned by [`FilterValueGroup::bulk_update`].
///
/// Dereferences to the group. While any guard on a group is alive the group
/// does not re-derive its own state; dropping the last one recomputes the
/// whole subtree.
pub struct BulkUpdate<'a> {
    group: &'a mut FilterValueGroup,
}

impl Deref for BulkUpdate<'_> {
    type Target = FilterValueGroup;

    fn deref(&self) -> &FilterValueGroup {
        self.group
    }
}

impl DerefMut for BulkUpdate<'_> {
    fn deref_mut(&mut self) -> &mut FilterValueGroup {
        self.group
    }
}

impl Drop for BulkUpdate<'_> {
    fn drop(&mut self) {
        self.group.bulk_depth = self.group.bulk_depth.saturating_sub(1);
        if self.group.bulk_depth == 0 {
            self.group.recompute();
        }
    }
}
