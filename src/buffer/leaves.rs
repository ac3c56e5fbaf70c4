//! Side table linking tokens to the grammar engine's parse-tree leaves.
//!
//! Tokens never point into the tree. A token holds a [`LeafId`]; the table
//! maps the id to the `(line, token index)` the leaf currently belongs to.
//! Ids are generational so an id held by the engine after its token was
//! re-lexed away is detected as stale instead of aliasing a new token.

use crate::lexer::Token;

/// Handle to a parse-tree leaf record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafId {
    index: u32,
    generation: u32,
}

/// Where a leaf's token lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafPosition {
    pub line: usize,
    pub token: usize,
}

impl LeafPosition {
    pub fn new(line: usize, token: usize) -> Self {
        Self { line, token }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    position: Option<LeafPosition>,
}

#[derive(Debug, Clone, Default)]
pub struct LeafTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl LeafTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live leaves
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Allocate a leaf record at `position`.
    pub fn allocate(&mut self, position: LeafPosition) -> LeafId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.position = Some(position);
            return LeafId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            position: Some(position),
        });
        LeafId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    /// Attach `tokens[token]` on `line` to a leaf, reusing its current leaf
    /// when that one is still live.
    pub fn attach(&mut self, tokens: &mut [Token], line: usize, token: usize) -> Option<LeafId> {
        let slot = tokens.get_mut(token)?;
        let position = LeafPosition::new(line, token);
        if let Some(id) = slot.leaf {
            if self.set(id, position) {
                return Some(id);
            }
        }
        let id = self.allocate(position);
        slot.leaf = Some(id);
        Some(id)
    }

    pub fn get(&self, id: LeafId) -> Option<LeafPosition> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.position
    }

    pub fn is_live(&self, id: LeafId) -> bool {
        self.get(id).is_some()
    }

    /// Move a live leaf; returns false for stale ids.
    pub fn set(&mut self, id: LeafId, position: LeafPosition) -> bool {
        match self.slots.get_mut(id.index as usize) {
            Some(slot) if slot.generation == id.generation && slot.position.is_some() => {
                slot.position = Some(position);
                true
            }
            _ => false,
        }
    }

    /// Free a leaf. Stale ids are ignored.
    pub fn release(&mut self, id: LeafId) -> bool {
        match self.slots.get_mut(id.index as usize) {
            Some(slot) if slot.generation == id.generation && slot.position.is_some() => {
                slot.position = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                self.live -= 1;
                true
            }
            _ => false,
        }
    }

    /// Release the leaves of every token and clear their references.
    pub fn release_tokens(&mut self, tokens: &mut [Token]) {
        for token in tokens {
            if let Some(id) = token.leaf.take() {
                self.release(id);
            }
        }
    }

    /// Renumber leaves on lines `>= from_line` by `delta` lines.
    pub fn shift_lines(&mut self, from_line: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        for position in self.slots.iter_mut().filter_map(|s| s.position.as_mut()) {
            if position.line >= from_line {
                position.line = position.line.saturating_add_signed(delta);
            }
        }
    }

    /// Live leaves in slot order
    pub fn iter(&self) -> impl Iterator<Item = (LeafId, LeafPosition)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.position.map(|position| {
                (
                    LeafId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    position,
                )
            })
        })
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}
