//! Recursive reconciliation of two map trees.

use super::options::MergeOptions;
use crate::object::{Flags, MapType, Object, Payload, Result};
use std::collections::btree_map::Entry;
use tracing::{debug, trace};

/// Counts of what a merge did, reported through tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MergeStats {
    inserted: usize,
    overwritten: usize,
    recursed: usize,
    skipped: usize,
}

impl<'a> Object<'a> {
    /// Moves the entries of the map `source` into this map.
    ///
    /// Missing keys are moved in. When both sides hold a map for a key and
    /// `max_depth` is not exhausted the two maps are merged one level down;
    /// otherwise the entry is replaced. `source` is left as an empty map.
    pub fn merge_move(&mut self, source: &mut Object<'a>, max_depth: u32) -> Result<&mut Self> {
        let mut stats = MergeStats::default();
        merge_move_maps(self.as_map_mut()?, source.as_map_mut()?, max_depth, &mut stats);

        debug!(
            "merge_move: {} inserted, {} overwritten, {} recursed",
            stats.inserted, stats.overwritten, stats.recursed
        );
        Ok(self)
    }

    /// Copies the entries of the map `source` into this map.
    ///
    /// Follows the same policy as [`Object::merge_move`], except that an
    /// entry is left alone when either its source or its existing
    /// destination flags intersect `skip_mask`.
    pub fn merge_copy(
        &mut self,
        source: &Object<'a>,
        skip_mask: impl Into<Flags>,
        max_depth: u32,
    ) -> Result<&mut Self> {
        let mut stats = MergeStats::default();
        merge_copy_maps(
            self.as_map_mut()?,
            source.as_map()?,
            skip_mask.into(),
            max_depth,
            &mut stats,
        );

        debug!(
            "merge_copy: {} inserted, {} overwritten, {} recursed, {} skipped",
            stats.inserted, stats.overwritten, stats.recursed, stats.skipped
        );
        Ok(self)
    }

    /// [`Object::merge_copy`] configured by `options`.
    pub fn merge_copy_with(&mut self, source: &Object<'a>, options: &MergeOptions) -> Result<&mut Self> {
        self.merge_copy(source, options.get_skip_mask(), options.get_max_depth())
    }
}

fn merge_move_maps<'a>(
    dest: &mut MapType<'a>,
    source: &mut MapType<'a>,
    depth: u32,
    stats: &mut MergeStats,
) {
    for (key, mut src_entry) in std::mem::take(source) {
        let dst_entry = match dest.entry(key) {
            Entry::Vacant(e) => {
                e.insert(src_entry);
                stats.inserted += 1;
                continue;
            }
            Entry::Occupied(e) => e.into_mut(),
        };

        match (&mut dst_entry.payload, &mut src_entry.payload) {
            (Payload::Map(d), Payload::Map(s)) if depth > 0 => {
                stats.recursed += 1;
                merge_move_maps(d, s, depth - 1, stats);
            }
            _ => {
                dst_entry.take_from(&mut src_entry);
                stats.overwritten += 1;
            }
        }
    }
}

fn merge_copy_maps<'a>(
    dest: &mut MapType<'a>,
    source: &MapType<'a>,
    skip_mask: Flags,
    depth: u32,
    stats: &mut MergeStats,
) {
    for (key, src_entry) in source {
        if src_entry.flags().intersects(skip_mask) {
            trace!("merge_copy: skipping protected source entry {}", String::from_utf8_lossy(key));
            stats.skipped += 1;
            continue;
        }

        let Some(dst_entry) = dest.get_mut(key.as_slice()) else {
            dest.insert(key.clone(), src_entry.clone());
            stats.inserted += 1;
            continue;
        };

        if dst_entry.flags().intersects(skip_mask) {
            trace!("merge_copy: keeping protected entry {}", String::from_utf8_lossy(key));
            stats.skipped += 1;
            continue;
        }

        match (&mut dst_entry.payload, &src_entry.payload) {
            (Payload::Map(d), Payload::Map(s)) if depth > 0 => {
                stats.recursed += 1;
                merge_copy_maps(d, s, skip_mask, depth - 1, stats);
            }
            _ => {
                *dst_entry = src_entry.clone();
                stats.overwritten += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_requires_maps() {
        let mut list = Object::create_list();
        let mut map = Object::create_map();

        assert!(list.merge_move(&mut map, 1).unwrap_err().is_type_mismatch());
        assert!(map.merge_move(&mut list, 1).unwrap_err().is_type_mismatch());
        assert!(map.merge_copy(&list, Flags::NONE, 1).unwrap_err().is_type_mismatch());
        assert!(Object::from(1).merge_copy(&map, Flags::NONE, 1).is_err());
    }

    #[test]
    fn test_stats_count_each_outcome() {
        let mut dest = Object::create_map();
        dest.insert_key("a", &Object::from(1)).unwrap();
        dest.insert_key("m", &Object::create_map()).unwrap();
        let mut src = Object::create_map();
        src.insert_key("a", &Object::from(2)).unwrap();
        src.insert_key("b", &Object::from(3)).unwrap();
        src.insert_key("m", &Object::create_map()).unwrap();
        let mut protected = Object::from(4);
        protected.set_flags(Flags::STATIC_DATA);
        src.insert_key("p", &protected).unwrap();

        let mut stats = MergeStats::default();
        merge_copy_maps(
            dest.as_map_mut().unwrap(),
            src.as_map().unwrap(),
            Flags::STATIC_DATA,
            8,
            &mut stats,
        );

        assert_eq!(
            stats,
            MergeStats {
                inserted: 1,
                overwritten: 1,
                recursed: 1,
                skipped: 1,
            }
        );
    }
}
