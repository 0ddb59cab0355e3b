// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Carry-select arithmetic for a single chunk.
//!
//! A worker owns `T` token pairs indexed `0..T` (0 = most significant within
//! the chunk, `T-1` = adjacent to the right neighbour's chunk). Everything in
//! this module is pure and synchronous; the message exchange around it lives
//! in [`crate::engine::worker`].
//!
//! # Carry-select
//!
//! The only way an incoming carry can change more than the chunk's last digit
//! is a *boundary tie*: `a[T-1] + b[T-1] == B-1`. Then a carry-in of 1 wraps
//! that digit to 0 and pushes a carry into `T-2`, which may cascade further
//! left through other `B-1` positions. For a tied chunk both answers are
//! computed up front and the true carry only selects between them:
//!
//! ```text
//!   a      = [ 000000001 | 999999999 ]
//!   b      = [ 000000000 | 000000000 ]
//!   carry0 = [ 000000001 | 999999999 ]  carry_out 0
//!   carry1 = [ 000000002 | 000000000 ]  carry_out 0
//! ```
//!
//! Without a tie the carry-in is absorbed by the last digit without
//! overflowing, and the chunk's carry-out does not depend on it at all.

use crate::codec::Token;
use crate::config::NumberingScheme;
use crate::protocol::CarryBit;

/// Digits and carry-out of a chunk for one known carry-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChunk {
    pub digits: Vec<Token>,
    pub carry_out: CarryBit,
}

/// A worker's per-run outcome before the true carry-in is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// No boundary tie. A carry-in of 1 only increments the last digit and
    /// `carry_out` holds for either carry-in.
    Resolved(ResolvedChunk),
    /// Boundary tie: one precomputed answer per possible carry-in.
    Tied {
        carry0: ResolvedChunk,
        carry1: ResolvedChunk,
    },
}

impl ChunkOutcome {
    /// Carry-out that is already certain before the carry-in arrives.
    pub fn known_carry_out(&self) -> Option<CarryBit> {
        match self {
            ChunkOutcome::Resolved(chunk) => Some(chunk.carry_out),
            ChunkOutcome::Tied { .. } => None,
        }
    }

    /// Collapse the outcome once the true carry-in is known.
    pub fn resolve(self, carry_in: CarryBit) -> ResolvedChunk {
        match (self, carry_in) {
            (ChunkOutcome::Resolved(chunk), CarryBit::Zero) => chunk,
            (ChunkOutcome::Resolved(mut chunk), CarryBit::One) => {
                if let Some(last) = chunk.digits.last_mut() {
                    *last += 1;
                }
                chunk
            }
            (ChunkOutcome::Tied { carry0, .. }, CarryBit::Zero) => carry0,
            (ChunkOutcome::Tied { carry1, .. }, CarryBit::One) => carry1,
        }
    }
}

/// Chunk arithmetic parameterised by the run's numbering scheme.
#[derive(Debug, Clone, Copy)]
pub struct CarryEngine {
    scheme: NumberingScheme,
}

impl CarryEngine {
    pub fn new(scheme: NumberingScheme) -> Self {
        Self { scheme }
    }

    /// Local reduction: add the chunk right to left assuming carry-in 0.
    ///
    /// Never blocks and needs no coordination. The returned carry-out is the
    /// chunk's intrinsic carry-out.
    ///
    /// `a` and `b` must have the same length. Debug builds assert it; release
    /// builds only add the positions both slices have, aligned from the left.
    pub fn reduce(&self, a: &[Token], b: &[Token]) -> ResolvedChunk {
        debug_assert_eq!(a.len(), b.len(), "operand chunks must have equal length");
        let mut digits = vec![0; a.len()];
        let carry_out = self.propagate(a, b, &mut digits, 0);
        ResolvedChunk { digits, carry_out }
    }

    /// True when the chunk's own boundary pair sums to exactly `B-1`.
    pub fn has_boundary_tie(&self, a: &[Token], b: &[Token]) -> bool {
        match (a.last(), b.last()) {
            (Some(&x), Some(&y)) => u64::from(x) + u64::from(y) == u64::from(self.scheme.max_token()),
            _ => false,
        }
    }

    /// Speculative branch: the chunk's answer if the carry-in is 1.
    ///
    /// Position `T-1` is forced to wrap to 0 and a carry of 1 is injected at
    /// `T-2`, then propagated left with the same rule as [`reduce`]. Only
    /// meaningful for a tied chunk. For `T = 1` the result is `[0]` with
    /// carry-out 1. Same length precondition as [`reduce`].
    ///
    /// [`reduce`]: CarryEngine::reduce
    pub fn speculate(&self, a: &[Token], b: &[Token]) -> ResolvedChunk {
        debug_assert_eq!(a.len(), b.len(), "operand chunks must have equal length");
        let Some(boundary) = a.len().checked_sub(1) else {
            return self.reduce(a, b);
        };

        let mut digits = vec![0; a.len()];
        let carry_out = self.propagate(
            &a[..boundary],
            &b[..boundary],
            &mut digits[..boundary],
            1,
        );
        ResolvedChunk { digits, carry_out }
    }

    /// Run local reduction, tie detection and (on a tie) speculation in sequence.
    pub fn evaluate(&self, a: &[Token], b: &[Token]) -> ChunkOutcome {
        let reduced = self.reduce(a, b);
        if self.has_boundary_tie(a, b) {
            ChunkOutcome::Tied {
                carry0: reduced,
                carry1: self.speculate(a, b),
            }
        } else {
            ChunkOutcome::Resolved(reduced)
        }
    }

    /// Add `a + b + carry` into `digits`, right to left; returns the carry-out.
    fn propagate(&self, a: &[Token], b: &[Token], digits: &mut [Token], carry: u64) -> CarryBit {
        let base = u64::from(self.scheme.base());
        let mut carry = carry;

        for ((&x, &y), digit) in a.iter().zip(b).zip(digits.iter_mut()).rev() {
            let local_sum = u64::from(x) + u64::from(y) + carry;
            if local_sum >= base {
                *digit = (local_sum - base) as Token;
                carry = 1;
            } else {
                *digit = local_sum as Token;
                carry = 0;
            }
        }

        CarryBit::from(carry == 1)
    }
}
