//! Auxiliary exercise rotation across blocks and programs

use serde::{Deserialize, Serialize};

use crate::lifts::{Block, Lift};

/// Ordered candidate accessories for one lift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryPool {
    pub lift: Lift,
    pub exercises: Vec<String>,
}

/// Pair of accessories assigned to a lift for one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryAssignment {
    pub lift: Lift,
    pub block: Block,
    pub exercises: [String; 2],
}

/// Pool positions consumed by a block: `[2(b-1), 2(b-1)+1] + offset`, wrapped.
///
/// `None` for pools with fewer than two exercises.
pub fn assign_for_block(pool: &[String], block: Block, offset: usize) -> Option<[String; 2]> {
    let n = pool.len();
    if n < 2 {
        return None;
    }
    let start = 2 * (block.number() as usize - 1) + offset;
    Some([pool[start % n].clone(), pool[(start + 1) % n].clone()])
}

/// Assignments for every block and pool, block-major.
pub fn assign_auxiliaries(pools: &[AuxiliaryPool], offset: usize) -> Vec<AuxiliaryAssignment> {
    let mut assignments = Vec::with_capacity(Block::ALL.len() * pools.len());
    for block in Block::ALL {
        for pool in pools {
            match assign_for_block(&pool.exercises, block, offset) {
                Some(exercises) => assignments.push(AuxiliaryAssignment {
                    lift: pool.lift,
                    block,
                    exercises,
                }),
                None => tracing::debug!(
                    "Skipping {} auxiliary pool with {} exercises",
                    pool.lift,
                    pool.exercises.len()
                ),
            }
        }
    }
    assignments
}

/// Rotation offset after `completed_blocks` more blocks
pub fn advance_offset(offset: usize, completed_blocks: usize) -> usize {
    offset + 2 * completed_blocks
}
