//! Region rotation policy.
//!
//! A campaign is one pass over every region: the order is shuffled once,
//! a visited set fills up as regions are actually toured, and the cursor
//! can be navigated forward, backward, jumped, or sent somewhere random
//! and unvisited. When the visited set covers the whole order, the sweep
//! is complete and the campaign can reset (same order; only the region
//! on screen starts the new sweep already visited).

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use wanderlens_world::RegionCode;

/// Shuffled campaign order with a visited set and a cursor.
///
/// Every operation is a no-op (or `None`) on an empty order; nothing
/// here panics.
#[derive(Debug, Clone)]
pub struct RegionRotation {
    order: Vec<RegionCode>,
    visited: HashSet<RegionCode>,
    current_index: usize,
}

impl RegionRotation {
    /// Builds a new campaign: shuffles `regions` once and points the
    /// cursor at the first entry.
    pub fn new(mut regions: Vec<RegionCode>, rng: &mut impl Rng) -> Self {
        regions.shuffle(rng);
        Self {
            order: regions,
            visited: HashSet::new(),
            current_index: 0,
        }
    }

    /// The region the cursor points at.
    pub fn current(&self) -> Option<&RegionCode> {
        self.order.get(self.current_index)
    }

    /// Previews the region `step` places away without moving the cursor.
    pub fn peek(&self, step: i64) -> Option<&RegionCode> {
        if self.order.is_empty() {
            return None;
        }
        let len = self.order.len() as i64;
        let index = (self.current_index as i64 + step).rem_euclid(len);
        self.order.get(index as usize)
    }

    /// Moves the cursor by `step`, wrapping in either direction.
    ///
    /// Navigation alone never marks a region visited - only actually
    /// activating one does.
    pub fn advance(&mut self, step: i64) -> Option<&RegionCode> {
        if self.order.is_empty() {
            return None;
        }
        let len = self.order.len() as i64;
        let index = (self.current_index as i64 + step).rem_euclid(len);
        self.current_index = index as usize;
        self.current()
    }

    /// Jumps the cursor to the named region.
    ///
    /// Unknown codes are appended to the order and then selected, so a
    /// host asking for a region the directory doesn't know still gets a
    /// deterministic slot.
    pub fn force(&mut self, code: RegionCode) -> &RegionCode {
        match self.order.iter().position(|c| *c == code) {
            Some(index) => self.current_index = index,
            None => {
                self.order.push(code);
                self.current_index = self.order.len() - 1;
            }
        }
        &self.order[self.current_index]
    }

    /// Moves the cursor to a uniformly random unvisited region.
    ///
    /// Returns `None` when every region has been visited (sweep complete).
    pub fn random_unvisited(&mut self, rng: &mut impl Rng) -> Option<RegionCode> {
        let candidates: Vec<usize> = self
            .order
            .iter()
            .enumerate()
            .filter(|(_, code)| !self.visited.contains(*code))
            .map(|(index, _)| index)
            .collect();

        let &index = candidates.choose(rng)?;
        self.current_index = index;
        self.current().cloned()
    }

    /// Records that a region was actually toured.
    ///
    /// Codes outside the order are ignored so `visited` stays a subset
    /// of `order`.
    pub fn mark_visited(&mut self, code: &RegionCode) {
        if self.order.iter().any(|c| c == code) {
            self.visited.insert(code.clone());
        }
    }

    /// True once every region in the order has been visited.
    pub fn sweep_complete(&self) -> bool {
        !self.order.is_empty() && self.visited.len() >= self.order.len()
    }

    /// Starts a fresh sweep: clears the visited set down to just the
    /// region the cursor is on, keeping the shuffled order. The region
    /// already on screen is not re-picked until everything else has been
    /// toured again.
    pub fn reset_campaign(&mut self) {
        self.visited.clear();
        if let Some(current) = self.current().cloned() {
            self.visited.insert(current);
        }
    }

    /// True if the region has been toured this campaign.
    pub fn is_visited(&self, code: &RegionCode) -> bool {
        self.visited.contains(code)
    }

    /// Number of regions toured this campaign.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of regions in the campaign.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the campaign has no regions at all.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The campaign order (stable for the life of the rotation).
    pub fn order(&self) -> &[RegionCode] {
        &self.order
    }
}
