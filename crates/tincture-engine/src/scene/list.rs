use super::{ShapeStyleRecord, SortKey, ZIndex};

/// A single draw item: sort key + styled shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub record: ShapeStyleRecord,
}

/// Recorded draw stream for a frame.
///
/// - `push()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no per-frame allocation once warmed
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every record. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn push(&mut self, z: ZIndex, record: ShapeStyleRecord) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            record,
        });
        self.sorted_dirty = true;
    }

    /// Indices into `items` in paint order (back-to-front).
    pub fn indices_in_paint_order(&mut self) -> &[usize] {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        &self.sorted_indices
    }

    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    /// Visits items mutably in paint order, stopping at the first error.
    pub fn try_for_each_in_paint_order<E>(
        &mut self,
        mut f: impl FnMut(&mut DrawItem) -> Result<(), E>,
    ) -> Result<(), E> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        for n in 0..self.sorted_indices.len() {
            let i = self.sorted_indices[n];
            f(&mut self.items[i])?;
        }
        Ok(())
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());
        self.sorted_indices
            .sort_by(|&a, &b| self.items[a].key.cmp(&self.items[b].key));
        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Rgb24;
    use crate::scene::Shape;

    fn record(color: u32) -> ShapeStyleRecord {
        let shape = Shape::Rectangle(Rect::new(0.0, 0.0, 1.0, 1.0)).into_ref();
        ShapeStyleRecord::filled(shape, Rgb24::new(color), 1.0)
    }

    fn colors(list: &mut DrawList) -> Vec<u32> {
        list.iter_in_paint_order().map(|i| i.record.fill_color.value()).collect()
    }

    #[test]
    fn paint_order_is_z_then_insertion() {
        let mut list = DrawList::new();
        list.push(ZIndex(1), record(1));
        list.push(ZIndex(0), record(2));
        list.push(ZIndex(1), record(3));
        list.push(ZIndex(-1), record(4));

        assert_eq!(colors(&mut list), vec![4, 2, 1, 3]);
        assert_eq!(list.indices_in_paint_order(), &[3, 1, 0, 2]);
    }

    #[test]
    fn clear_drops_records_and_restarts_order() {
        let mut list = DrawList::new();
        list.push(ZIndex(0), record(1));
        list.push(ZIndex(0), record(2));
        list.clear();
        assert!(list.is_empty());

        list.push(ZIndex(0), record(3));
        assert_eq!(list.items()[0].key.order, 0);
        assert_eq!(colors(&mut list), vec![3]);
    }

    #[test]
    fn mutable_visit_stops_at_error() {
        let mut list = DrawList::new();
        list.push(ZIndex(2), record(1));
        list.push(ZIndex(1), record(2));

        let mut seen = Vec::new();
        let result: Result<(), &str> = list.try_for_each_in_paint_order(|item| {
            seen.push(item.record.fill_color.value());
            item.record.fill_alpha = 0.5;
            Err("stop")
        });
        assert!(result.is_err());
        assert_eq!(seen, vec![2]);
        assert_eq!(list.items()[1].record.fill_alpha, 0.5);
        assert_eq!(list.items()[0].record.fill_alpha, 1.0);
    }
}
