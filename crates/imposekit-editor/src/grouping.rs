//! Row/column clustering used by the spacing and alignment operations.
//!
//! This is a single-pass agglomerative clustering over slot centers: each
//! slot attaches to the nearest existing cluster whose running center is
//! close enough, else starts a new one. It is not globally optimal and it
//! depends on insertion order (first cluster wins on a tie) - that is
//! intentional, matching how operators build up rows incrementally.
//!
//! Clustering reads the rendered (rotation-aware) boxes, consistent with
//! how snapping reasons about visible edges.

use crate::model::{Slot, SlotId};

/// Extra slack added to the half-extent threshold when deciding whether a
/// slot belongs to an existing cluster.
pub const CLUSTER_MARGIN_MM: f64 = 2.0;

/// A row or column of slots, ordered along the cross axis.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Running average of member centers on the clustering axis.
    pub center: f64,
    /// Largest member extent on the clustering axis.
    pub max_extent: f64,
    /// Member ids, sorted along the flow axis once clustering finishes.
    pub members: Vec<SlotId>,
    center_sum: f64,
}

impl Cluster {
    fn new(center: f64, extent: f64, id: SlotId) -> Self {
        Self {
            center,
            max_extent: extent,
            members: vec![id],
            center_sum: center,
        }
    }

    fn absorb(&mut self, center: f64, extent: f64, id: SlotId) {
        self.members.push(id);
        self.center_sum += center;
        self.center = self.center_sum / self.members.len() as f64;
        self.max_extent = self.max_extent.max(extent);
    }
}

/// Clusters slots into rows by vertical center.
///
/// Rows come back sorted bottom-to-top; members within a row are sorted by
/// X ascending. A slot joins a row when the distance from its center to the
/// row's running center is within `max(row.max_height, slot.h)/2 + 2 mm`.
pub fn group_by_row(slots: &[&Slot]) -> Vec<Cluster> {
    cluster(slots, |b| (b.center().y, b.h), |b| b.x)
}

/// Clusters slots into columns by horizontal center; the transpose of
/// [`group_by_row`]. Columns are sorted left-to-right, members by Y.
pub fn group_by_column(slots: &[&Slot]) -> Vec<Cluster> {
    cluster(slots, |b| (b.center().x, b.w), |b| b.y)
}

fn cluster(
    slots: &[&Slot],
    key: impl Fn(&imposekit_core::geometry::Rect) -> (f64, f64),
    flow: impl Fn(&imposekit_core::geometry::Rect) -> f64,
) -> Vec<Cluster> {
    let mut ordered: Vec<&Slot> = slots.to_vec();
    ordered.sort_by(|a, b| {
        let ka = key(&a.render_box()).0;
        let kb = key(&b.render_box()).0;
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut clusters: Vec<Cluster> = Vec::new();
    for slot in ordered {
        let b = slot.render_box();
        let (center, extent) = key(&b);

        let mut best: Option<(usize, f64)> = None;
        for (i, c) in clusters.iter().enumerate() {
            let d = (c.center - center).abs();
            let threshold = c.max_extent.max(extent) / 2.0 + CLUSTER_MARGIN_MM;
            if d <= threshold && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }

        match best {
            Some((i, _)) => clusters[i].absorb(center, extent, slot.id),
            None => clusters.push(Cluster::new(center, extent, slot.id)),
        }
    }

    clusters.sort_by(|a, b| {
        a.center
            .partial_cmp(&b.center)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for c in clusters.iter_mut() {
        let mut keyed: Vec<(f64, SlotId)> = c
            .members
            .iter()
            .filter_map(|&id| {
                let slot = slots.iter().find(|s| s.id == id)?;
                Some((flow(&slot.render_box()), id))
            })
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        c.members = keyed.into_iter().map(|(_, id)| id).collect();
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Face;

    fn slot(id: SlotId, x: f64, y: f64, w: f64, h: f64) -> Slot {
        let mut s = Slot::new(Face::Front, x, y, w, h);
        s.id = id;
        s
    }

    #[test]
    fn three_slots_cluster_into_two_rows() {
        // y=0 and y=2 share a row (50 mm heights, 2 mm cluster margin);
        // y=60 starts its own.
        let a = slot(1, 0.0, 0.0, 40.0, 50.0);
        let b = slot(2, 50.0, 2.0, 40.0, 50.0);
        let c = slot(3, 0.0, 60.0, 40.0, 50.0);

        let rows = group_by_row(&[&a, &b, &c]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].members, vec![1, 2]);
        assert_eq!(rows[1].members, vec![3]);
    }

    #[test]
    fn row_members_are_ordered_by_x() {
        let a = slot(1, 80.0, 0.0, 40.0, 50.0);
        let b = slot(2, 0.0, 1.0, 40.0, 50.0);

        let rows = group_by_row(&[&a, &b]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].members, vec![2, 1]);
    }

    #[test]
    fn columns_are_the_transpose() {
        let a = slot(1, 0.0, 0.0, 40.0, 50.0);
        let b = slot(2, 1.0, 70.0, 40.0, 50.0);
        let c = slot(3, 100.0, 0.0, 40.0, 50.0);

        let cols = group_by_column(&[&a, &b, &c]);
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].members, vec![1, 2]);
        assert_eq!(cols[1].members, vec![3]);
    }

    #[test]
    fn running_center_updates_incrementally() {
        // The second slot pulls the row center up; the third only joins
        // because the center moved.
        let a = slot(1, 0.0, 0.0, 40.0, 20.0);
        let b = slot(2, 50.0, 10.0, 40.0, 20.0);
        let c = slot(3, 100.0, 15.0, 40.0, 20.0);

        let rows = group_by_row(&[&a, &b, &c]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].members, vec![1, 2, 3]);
    }

    #[test]
    fn sideways_slots_cluster_by_rendered_extent() {
        // 20x50 rotated 90° renders 50x20, so it rows up with flat slots.
        let a = slot(1, 0.0, 0.0, 40.0, 20.0);
        let mut b = slot(2, 50.0, 0.0, 20.0, 50.0);
        b.rotation = imposekit_core::geometry::Rotation::R90;
        // Shift b so its (rotation-invariant) center sits level with a's.
        b.y_mm = -15.0;

        let rows = group_by_row(&[&a, &b]);
        assert_eq!(rows.len(), 1);
    }
}
