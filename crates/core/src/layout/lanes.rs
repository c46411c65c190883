use std::cmp::Reverse;
use std::collections::BinaryHeap;

use lineage_protocol::Person;

/// Anything with a lifespan in whole years that can be packed into lanes.
///
/// `end() == None` means the interval is still open (a living person). The
/// packer closes it at a caller-supplied reference year for occupancy only.
pub trait TimedEntity {
    /// Stable identifier. Never used for layout math.
    fn id(&self) -> &str;
    /// First year of the interval, inclusive.
    fn start(&self) -> i32;
    fn end(&self) -> Option<i32>;

    fn resolved_end(&self, reference_year: i32) -> i32 {
        self.end().unwrap_or(reference_year)
    }
}

impl TimedEntity for Person {
    fn id(&self) -> &str {
        &self.id
    }

    fn start(&self) -> i32 {
        self.born
    }

    fn end(&self) -> Option<i32> {
        self.died
    }
}

/// An entity paired with the display lane it was packed into.
#[derive(Debug, PartialEq)]
pub struct LaneAssignment<'a, T> {
    pub entity: &'a T,
    pub lane: usize,
}

impl<T> Clone for LaneAssignment<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LaneAssignment<'_, T> {}

/// Assign every entity to the lowest-numbered lane it fits in.
///
/// Entities are visited in order of `start` (stable, so equal starts keep
/// their input order). A lane is free for an entity when its previous
/// occupant ended at or before the entity's start: intervals that merely
/// touch share a lane. Open-ended entities occupy their lane through
/// `reference_year`.
///
/// The result holds one assignment per input entity, in visiting order
/// (sorted by start, not input order). `end < start` is not rejected; such
/// an entity takes a lane that is already free again for the next entity.
///
/// Lanes are tracked with two heaps: occupied lanes keyed by end year, and
/// released lane indices. Starts never decrease, so once a lane is released
/// it stays free, and the smallest released index is exactly the lowest free
/// lane a linear scan would find.
pub fn pack_lanes<T: TimedEntity>(entities: &[T], reference_year: i32) -> Vec<LaneAssignment<'_, T>> {
    let mut sorted: Vec<&T> = entities.iter().collect();
    sorted.sort_by_key(|e| e.start());

    let mut occupied: BinaryHeap<Reverse<(i32, usize)>> = BinaryHeap::new();
    let mut released: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    let mut lanes_opened = 0;

    let assignments: Vec<_> = sorted
        .into_iter()
        .map(|entity| {
            let start = entity.start();
            while let Some(&Reverse((end, lane))) = occupied.peek() {
                if end > start {
                    break;
                }
                occupied.pop();
                released.push(Reverse(lane));
            }

            let lane = match released.pop() {
                Some(Reverse(lane)) => lane,
                None => {
                    lanes_opened += 1;
                    lanes_opened - 1
                }
            };
            occupied.push(Reverse((entity.resolved_end(reference_year), lane)));
            LaneAssignment { entity, lane }
        })
        .collect();

    log::debug!(
        "packed {} entities into {lanes_opened} lanes (reference year {reference_year})",
        assignments.len()
    );
    assignments
}

/// Number of lanes an assignment uses (`0` for an empty one).
pub fn lane_count<T>(assignments: &[LaneAssignment<'_, T>]) -> usize {
    assignments.iter().map(|a| a.lane + 1).max().unwrap_or(0)
}
