//! Positional decorations around a field's input.
//!
//! Two structures live here. The *row* holds add-ons beside the input,
//! ordered by weight (negative weights to the left). The *side groups* hold
//! add-ins drawn inside the input slot (prefix, suffix, error), addressed by
//! slot index with slot 0 reserved for the input itself.
//!
//! Widths are measured in terminal columns. Any change to what is visible
//! keeps the input width constant and grows or shrinks the outer width.

use tracing::warn;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn of(weight: i32) -> Self {
        if weight < 0 { Side::Left } else { Side::Right }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    AddOn,
    AddIn,
}

#[derive(Debug, Clone)]
pub struct Decoration {
    id: DecorationId,
    weight: i32,
    content: String,
    class: Option<String>,
    visible: bool,
    fixed: bool,
    placement: Placement,
}

impl Decoration {
    pub fn id(&self) -> DecorationId {
        self.id
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class
            .as_deref()
            .is_some_and(|class| class.split_whitespace().any(|token| token == name))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn width(&self) -> usize {
        self.content.width()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowItem {
    Input,
    AddOn(DecorationId),
}

/// How `toggle_add_in` finds its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddInSelector {
    /// Exact slot on the side the weight's sign selects.
    Weight(i32),
    Id(DecorationId),
    /// First add-in carrying the class token.
    Class(String),
}

impl From<i32> for AddInSelector {
    fn from(weight: i32) -> Self {
        AddInSelector::Weight(weight)
    }
}

impl From<DecorationId> for AddInSelector {
    fn from(id: DecorationId) -> Self {
        AddInSelector::Id(id)
    }
}

impl From<&str> for AddInSelector {
    fn from(class: &str) -> Self {
        AddInSelector::Class(class.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Placeholder,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    content: String,
    visible: bool,
}

impl Layer {
    fn hidden(content: &str) -> Self {
        Self {
            content: content.to_string(),
            visible: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[derive(Debug, Clone)]
struct Tooltip {
    add_on: DecorationId,
    text: String,
    open: bool,
}

#[derive(Debug, Clone)]
struct SideGroup {
    slots: Vec<Option<DecorationId>>,
    fixed: Vec<usize>,
}

impl Default for SideGroup {
    fn default() -> Self {
        Self {
            slots: vec![None],
            fixed: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Decorations {
    items: Vec<Decoration>,
    row: Vec<RowItem>,
    first: RowItem,
    left: Option<SideGroup>,
    right: Option<SideGroup>,
    outer_width: usize,
    saved_width: usize,
    label: Option<String>,
    placeholder: Option<Layer>,
    placeholder_view: String,
    notice: Option<Layer>,
    tooltip: Option<Tooltip>,
    prefix: Option<DecorationId>,
    suffix: Option<DecorationId>,
    error: Option<DecorationId>,
}

impl Decorations {
    pub fn new(input_width: usize) -> Self {
        Self {
            items: Vec::new(),
            row: vec![RowItem::Input],
            first: RowItem::Input,
            left: None,
            right: None,
            outer_width: input_width,
            saved_width: input_width,
            label: None,
            placeholder: None,
            placeholder_view: String::new(),
            notice: None,
            tooltip: None,
            prefix: None,
            suffix: None,
            error: None,
        }
    }

    pub fn get(&self, id: DecorationId) -> Option<&Decoration> {
        self.items.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.items.iter()
    }

    pub fn row(&self) -> &[RowItem] {
        &self.row
    }

    /// The row item carrying the `first` marker (leftmost item).
    pub fn first(&self) -> RowItem {
        self.first
    }

    pub fn input_width(&self) -> usize {
        self.outer_width.saturating_sub(self.decorated_width())
    }

    pub fn outer_width(&self) -> usize {
        self.outer_width
    }

    /// Add-ins on one side, from the input outward.
    pub fn add_ins(&self, side: Side) -> Vec<&Decoration> {
        self.group(side)
            .map(|group| {
                group
                    .slots
                    .iter()
                    .flatten()
                    .filter_map(|id| self.get(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Adds an element to the row beside the input. Weight `< 0` goes to the
    /// left; the row reads in non-decreasing weight order left to right.
    pub fn add_on(
        &mut self,
        weight: i32,
        content: impl Into<String>,
        class: Option<&str>,
    ) -> DecorationId {
        self.save_input_width();
        let id = self.push(weight, content.into(), class, false, Placement::AddOn);

        let mut before_input = true;
        let mut insert_at = None;
        for (index, item) in self.row.iter().enumerate() {
            let existing = match item {
                RowItem::Input => {
                    before_input = false;
                    continue;
                }
                RowItem::AddOn(other) => self.items[other.0].weight,
            };
            let fits_left = before_input && weight < 0 && weight <= existing;
            let fits_right = !before_input && weight >= 0 && weight <= existing;
            if fits_left || fits_right {
                insert_at = Some(index);
                break;
            }
        }

        match insert_at {
            Some(index) => self.row.insert(index, RowItem::AddOn(id)),
            None if weight < 0 => {
                let input = self.input_position();
                self.row.insert(input, RowItem::AddOn(id));
            }
            None => self.row.push(RowItem::AddOn(id)),
        }
        self.restore_input_width();

        if weight < 0 {
            self.refresh_first();
        }
        id
    }

    /// Adds an element inside the input slot on the side `weight` selects,
    /// at slot `|weight|`. Unless `fixed`, slots already reserved by fixed
    /// add-ins are skipped; a fixed add-in reserves the slot it lands in.
    pub fn add_in(
        &mut self,
        content: impl Into<String>,
        weight: i32,
        class: Option<&str>,
        fixed: bool,
    ) -> DecorationId {
        self.save_input_width();
        let id = self.push(weight, content.into(), class, fixed, Placement::AddIn);
        let group = self.group_mut(Side::of(weight));

        let mut index = weight.unsigned_abs() as usize;
        while index == 0 || (!fixed && group.fixed.contains(&index)) {
            index += 1;
        }
        let index = index.min(group.slots.len());
        group.slots.insert(index, Some(id));
        if fixed {
            group.fixed.push(index);
        }
        self.restore_input_width();
        id
    }

    /// Shows or hides an add-in, or flips it when `visible` is `None`.
    /// Returns the add-in that changed; already matching or unresolvable
    /// selectors change nothing.
    pub fn toggle_add_in(
        &mut self,
        selector: impl Into<AddInSelector>,
        visible: Option<bool>,
    ) -> Option<DecorationId> {
        if self.left.is_none() && self.right.is_none() {
            return None;
        }
        let selector = selector.into();
        let Some(id) = self.resolve(&selector) else {
            warn!(?selector, "add-in selector does not match any add-in");
            return None;
        };

        let current = self.items[id.0].visible;
        if visible.is_some_and(|wanted| wanted == current) {
            return None;
        }

        self.save_input_width();
        self.items[id.0].visible = visible.unwrap_or(!current);
        self.restore_input_width();
        Some(id)
    }

    pub fn set_content(&mut self, id: DecorationId, content: impl Into<String>) {
        if id.0 >= self.items.len() {
            return;
        }
        self.save_input_width();
        self.items[id.0].content = content.into();
        self.restore_input_width();
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    pub fn set_placeholder(&mut self, text: &str) {
        match &mut self.placeholder {
            Some(layer) => layer.content = text.to_string(),
            None => self.placeholder = Some(Layer::hidden(text)),
        }
        self.reposition_placeholder();
    }

    pub fn clear_placeholder(&mut self) {
        self.placeholder = None;
        self.placeholder_view.clear();
    }

    pub fn set_notice(&mut self, text: &str) {
        match &mut self.notice {
            Some(layer) => layer.content = text.to_string(),
            None => self.notice = Some(Layer::hidden(text)),
        }
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        match kind {
            LayerKind::Placeholder => self.placeholder.as_ref(),
            LayerKind::Notice => self.notice.as_ref(),
        }
    }

    /// Missing layers are ignored. Showing the placeholder re-fits it to the
    /// current input width.
    pub fn set_layer_visible(&mut self, kind: LayerKind, visible: bool) {
        let layer = match kind {
            LayerKind::Placeholder => self.placeholder.as_mut(),
            LayerKind::Notice => self.notice.as_mut(),
        };
        let Some(layer) = layer else {
            return;
        };
        layer.visible = visible;
        if visible && kind == LayerKind::Placeholder {
            self.reposition_placeholder();
        }
    }

    /// Placeholder text as drawn: clipped to the input width, `None` while
    /// hidden.
    pub fn placeholder_view(&self) -> Option<&str> {
        self.placeholder
            .as_ref()
            .filter(|layer| layer.visible)
            .map(|_| self.placeholder_view.as_str())
    }

    pub fn prefix(&self) -> Option<DecorationId> {
        self.prefix
    }

    pub fn suffix(&self) -> Option<DecorationId> {
        self.suffix
    }

    pub fn error(&self) -> Option<DecorationId> {
        self.error
    }

    pub fn set_prefix(&mut self, text: &str) -> DecorationId {
        match self.prefix {
            Some(id) => {
                self.set_content(id, text);
                id
            }
            None => {
                let id = self.add_in(text, -1, Some("prefix-overlay noselect"), true);
                self.prefix = Some(id);
                id
            }
        }
    }

    pub fn set_suffix(&mut self, text: &str) -> DecorationId {
        match self.suffix {
            Some(id) => {
                self.set_content(id, text);
                id
            }
            None => {
                let id = self.add_in(text, 1, Some("suffix-overlay noselect"), true);
                self.suffix = Some(id);
                id
            }
        }
    }

    /// The error add-in, created on first use just outside the suffix.
    pub fn ensure_error(&mut self) -> DecorationId {
        if let Some(id) = self.error {
            return id;
        }
        let weight = if self.suffix.is_some() { 2 } else { 1 };
        let id = self.add_in("", weight, Some("error-overlay noselect"), true);
        self.error = Some(id);
        id
    }

    pub fn set_tooltip(&mut self, text: &str) -> DecorationId {
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.text = text.to_string();
            return tooltip.add_on;
        }
        let add_on = self.add_on(1000, "?", Some("tooltip clickable"));
        self.tooltip = Some(Tooltip {
            add_on,
            text: text.to_string(),
            open: false,
        });
        add_on
    }

    pub fn tooltip_text(&self) -> Option<&str> {
        self.tooltip.as_ref().map(|tooltip| tooltip.text.as_str())
    }

    pub fn is_tooltip_open(&self) -> bool {
        self.tooltip.as_ref().is_some_and(|tooltip| tooltip.open)
    }

    /// Flips the tooltip popover; returns the new state.
    pub fn toggle_tooltip(&mut self) -> bool {
        match &mut self.tooltip {
            Some(tooltip) => {
                tooltip.open = !tooltip.open;
                tooltip.open
            }
            None => false,
        }
    }

    fn push(
        &mut self,
        weight: i32,
        content: String,
        class: Option<&str>,
        fixed: bool,
        placement: Placement,
    ) -> DecorationId {
        let id = DecorationId(self.items.len());
        self.items.push(Decoration {
            id,
            weight,
            content,
            class: class.map(str::to_string),
            visible: true,
            fixed,
            placement,
        });
        id
    }

    fn resolve(&self, selector: &AddInSelector) -> Option<DecorationId> {
        match selector {
            AddInSelector::Weight(weight) => self
                .group(Side::of(*weight))?
                .slots
                .get(weight.unsigned_abs() as usize)
                .copied()
                .flatten(),
            AddInSelector::Id(id) => self
                .get(*id)
                .filter(|item| item.placement == Placement::AddIn)
                .map(Decoration::id),
            AddInSelector::Class(class) => self
                .items
                .iter()
                .find(|item| item.placement == Placement::AddIn && item.has_class(class))
                .map(Decoration::id),
        }
    }

    fn group(&self, side: Side) -> Option<&SideGroup> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    fn group_mut(&mut self, side: Side) -> &mut SideGroup {
        match side {
            Side::Left => self.left.get_or_insert_with(SideGroup::default),
            Side::Right => self.right.get_or_insert_with(SideGroup::default),
        }
    }

    fn input_position(&self) -> usize {
        self.row
            .iter()
            .position(|item| *item == RowItem::Input)
            .unwrap_or(0)
    }

    fn refresh_first(&mut self) {
        self.first = self.row.first().copied().unwrap_or(RowItem::Input);
    }

    fn decorated_width(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.visible)
            .map(Decoration::width)
            .sum()
    }

    fn save_input_width(&mut self) {
        self.saved_width = self.input_width();
    }

    fn restore_input_width(&mut self) {
        let wanted = self.saved_width + self.decorated_width();
        self.outer_width = wanted;
        self.reposition_placeholder();
    }

    fn reposition_placeholder(&mut self) {
        let Some(layer) = &self.placeholder else {
            return;
        };
        let limit = self.input_width();
        let mut used = 0;
        let mut view = String::new();
        for ch in layer.content.chars() {
            let width = ch.width().unwrap_or(0);
            if used + width > limit {
                break;
            }
            used += width;
            view.push(ch);
        }
        self.placeholder_view = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_weights(decorations: &Decorations) -> Vec<Option<i32>> {
        decorations
            .row()
            .iter()
            .map(|item| match item {
                RowItem::Input => None,
                RowItem::AddOn(id) => decorations.get(*id).map(Decoration::weight),
            })
            .collect()
    }

    #[test]
    fn add_ons_sort_around_the_input() {
        let mut decorations = Decorations::new(10);
        decorations.add_on(1, "b", None);
        decorations.add_on(-1, "a", None);
        decorations.add_on(-3, "c", None);
        decorations.add_on(0, "d", None);
        decorations.add_on(5, "e", None);
        assert_eq!(
            row_weights(&decorations),
            vec![Some(-3), Some(-1), None, Some(0), Some(1), Some(5)]
        );
    }

    #[test]
    fn first_marker_follows_left_insertions() {
        let mut decorations = Decorations::new(10);
        assert_eq!(decorations.first(), RowItem::Input);
        decorations.add_on(2, "r", None);
        assert_eq!(decorations.first(), RowItem::Input);
        let left = decorations.add_on(-2, "l", None);
        assert_eq!(decorations.first(), RowItem::AddOn(left));
        let further = decorations.add_on(-5, "ll", None);
        assert_eq!(decorations.first(), RowItem::AddOn(further));
    }

    #[test]
    fn fixed_slots_are_not_reassigned() {
        let mut decorations = Decorations::new(10);
        let suffix = decorations.add_in("kg", 1, Some("suffix"), true);
        let loose = decorations.add_in("x", 1, None, false);
        let right: Vec<_> = decorations
            .add_ins(Side::Right)
            .iter()
            .map(|item| item.id())
            .collect();
        assert_eq!(right, vec![suffix, loose]);
        assert_eq!(decorations.toggle_add_in(1, Some(false)), Some(suffix));
    }

    #[test]
    fn toggling_keeps_the_input_width() {
        let mut decorations = Decorations::new(12);
        let prefix = decorations.set_prefix("$");
        assert_eq!(decorations.input_width(), 12);
        assert_eq!(decorations.outer_width(), 13);

        assert_eq!(decorations.toggle_add_in(prefix, Some(false)), Some(prefix));
        assert_eq!(decorations.input_width(), 12);
        assert_eq!(decorations.outer_width(), 12);

        assert_eq!(decorations.toggle_add_in(prefix, Some(false)), None);
        assert_eq!(decorations.toggle_add_in(prefix, None), Some(prefix));
        assert_eq!(decorations.outer_width(), 13);
    }

    #[test]
    fn unknown_weight_is_ignored() {
        let mut decorations = Decorations::new(8);
        decorations.set_suffix("%");
        assert_eq!(decorations.toggle_add_in(4, Some(false)), None);
        assert_eq!(decorations.toggle_add_in(-1, Some(false)), None);
        assert_eq!(decorations.toggle_add_in(0, None), None);
    }

    #[test]
    fn class_selector_finds_add_in() {
        let mut decorations = Decorations::new(8);
        let error = decorations.ensure_error();
        assert_eq!(
            decorations.toggle_add_in("error-overlay", Some(false)),
            Some(error)
        );
        assert_eq!(decorations.get(error).map(Decoration::weight), Some(1));
    }

    #[test]
    fn error_sits_outside_the_suffix() {
        let mut decorations = Decorations::new(8);
        decorations.set_suffix("%");
        let error = decorations.ensure_error();
        assert_eq!(decorations.get(error).map(Decoration::weight), Some(2));
        assert_eq!(decorations.ensure_error(), error);
    }

    #[test]
    fn placeholder_is_clipped_to_input() {
        let mut decorations = Decorations::new(5);
        decorations.set_placeholder("MM/DD/YYYY");
        assert_eq!(decorations.placeholder_view(), None);
        decorations.set_layer_visible(LayerKind::Placeholder, true);
        assert_eq!(decorations.placeholder_view(), Some("MM/DD"));
        decorations.set_layer_visible(LayerKind::Notice, true);
        assert!(decorations.layer(LayerKind::Notice).is_none());
    }

    #[test]
    fn tooltip_lives_at_the_far_right() {
        let mut decorations = Decorations::new(8);
        decorations.add_on(3, "x", None);
        let tip = decorations.set_tooltip("Format: MM/DD/YYYY");
        assert_eq!(decorations.row().last(), Some(&RowItem::AddOn(tip)));
        assert!(decorations.toggle_tooltip());
        assert!(decorations.is_tooltip_open());
        assert_eq!(decorations.tooltip_text(), Some("Format: MM/DD/YYYY"));
    }
}
