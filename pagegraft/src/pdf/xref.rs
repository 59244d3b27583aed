use fnv::FnvHashMap;

use super::ObjectId;

/// A single line of an xref subsection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefEntry {
    pub number: ObjectId,
    /// Position of the object header, counted from the start of the source.
    pub byte_offset: u64,
    pub generation: u32,
    /// Marks objects that are not in use/deleted as free.
    pub free: bool,
}

/// Merged object id to byte offset table of all xref sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XrefTable(FnvHashMap<ObjectId, u64>);

impl XrefTable {
    /// Record an in-use entry unless its id is already known. Free entries are
    /// ignored. Returns whether the entry was recorded.
    pub fn insert_if_absent(&mut self, entry: &XrefEntry) -> bool {
        if entry.free || self.0.contains_key(&entry.number) {
            return false;
        }
        self.0.insert(entry.number, entry.byte_offset);
        true
    }

    pub fn get(&self, id: ObjectId) -> Option<u64> {
        self.0.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(id, offset)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, u64)> {
        let mut entries: Vec<(ObjectId, u64)> = self.0.iter().map(|(&id, &offset)| (id, offset)).collect();
        entries.sort_unstable();
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(number: ObjectId, byte_offset: u64, free: bool) -> XrefEntry {
        XrefEntry {
            number,
            byte_offset,
            generation: 0,
            free,
        }
    }

    #[test]
    fn first_seen_wins() {
        let mut table = XrefTable::default();
        assert!(table.insert_if_absent(&entry(5, 900, false)));
        assert!(!table.insert_if_absent(&entry(5, 100, false)));
        assert!(!table.insert_if_absent(&entry(6, 0, true)));
        assert_eq!(table.get(5), Some(900));
        assert_eq!(table.get(6), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn sorted_iteration() {
        let mut table = XrefTable::default();
        for id in [9, 3, 7] {
            table.insert_if_absent(&entry(id, u64::from(id) * 10, false));
        }
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![(3, 30), (7, 70), (9, 90)]);
    }
}
