//! The merge reducer
//!
//! Two-phase by contract, not accident: `on_contact` may run any number of
//! times while the physics step is still resolving, so it only locks and
//! enqueues. `drain_merges` runs at the next safe point (from `on_tick`)
//! and is the sole producer of removals and creations.

use std::collections::HashSet;

use super::commands::{Command, EngineOutput, Notification};
use super::state::{PendingMerge, PieceId, PieceSnapshot, Session};

impl Session {
    /// Contact-pair onset callback
    ///
    /// Preconditions, in order: equal ranks, neither piece already claimed
    /// by a pending merge, rank below the maximum. Anything else - wall
    /// contacts, mixed ranks, unknown ranks, repeat reports of the same
    /// pair - is ignored. Locks both pieces synchronously: the same physics
    /// step can report more contacts before the queue drains.
    pub fn on_contact(&mut self, a: &PieceSnapshot, b: &PieceSnapshot) {
        if self.over {
            return;
        }
        if a.id == b.id || a.rank != b.rank {
            return;
        }
        if self.tiers.get(a.rank).is_none() {
            return;
        }
        if self.locked.contains(&a.id) || self.locked.contains(&b.id) {
            return;
        }
        if self.tiers.is_max(a.rank) {
            // Top of the ladder; the winning piece never merges away
            return;
        }

        self.locked.insert(a.id);
        self.locked.insert(b.id);
        self.pending.push_back(PendingMerge {
            a: a.id,
            b: b.id,
            rank: a.rank,
            midpoint: (a.pos + b.pos) * 0.5,
        });
    }

    /// Drain the pending queue, FIFO, against the given live-id set
    ///
    /// `live` is updated in place as bodies are removed and created so that
    /// later records referencing an already-consumed piece are detected and
    /// dropped. Dropped records unlock both ids: a surviving partner must
    /// become mergeable again.
    pub(crate) fn drain_merges(&mut self, live: &mut HashSet<PieceId>, output: &mut EngineOutput) {
        while let Some(merge) = self.pending.pop_front() {
            self.locked.remove(&merge.a);
            self.locked.remove(&merge.b);

            if !live.contains(&merge.a) || !live.contains(&merge.b) {
                continue;
            }
            // Rank was validated at enqueue time
            let Some(value) = self.tiers.score(merge.rank) else {
                continue;
            };

            live.remove(&merge.a);
            live.remove(&merge.b);
            self.ages.remove(&merge.a);
            self.ages.remove(&merge.b);
            output
                .commands
                .push(Command::RemoveBodies(vec![merge.a, merge.b]));

            let result_rank = merge.rank + 1;
            let id = self.next_piece_id();
            output.commands.push(Command::CreateBody {
                id,
                rank: result_rank,
                pos: merge.midpoint,
                held: false,
            });
            live.insert(id);
            self.ages.insert(id, self.tick);
            self.best_rank = self.best_rank.max(result_rank);

            self.score += u64::from(value);
            output
                .notifications
                .push(Notification::ScoreChanged(self.score));
            if self.tiers.is_max(result_rank) {
                output.notifications.push(Notification::MaxTierReached);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn piece(id: u64, rank: u8, x: f32, y: f32) -> PieceSnapshot {
        PieceSnapshot {
            id: PieceId(id),
            rank,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            held: false,
        }
    }

    #[test]
    fn test_same_tier_contact_queues_one_merge() {
        let mut session = Session::with_seed(1);
        let a = piece(1, 2, 100.0, 500.0);
        let b = piece(2, 2, 130.0, 500.0);

        session.on_contact(&a, &b);
        assert_eq!(session.pending.len(), 1);
        assert!(session.locked.contains(&a.id));
        assert!(session.locked.contains(&b.id));
    }

    #[test]
    fn test_locked_piece_cannot_join_second_merge() {
        let mut session = Session::with_seed(1);
        let a = piece(1, 2, 100.0, 500.0);
        let b = piece(2, 2, 130.0, 500.0);
        let c = piece(3, 2, 160.0, 500.0);

        session.on_contact(&a, &b);
        // Three-way pileup: c touches b in the same step
        session.on_contact(&b, &c);
        assert_eq!(session.pending.len(), 1);
        assert!(!session.locked.contains(&c.id));
    }

    #[test]
    fn test_mismatched_tiers_ignored() {
        let mut session = Session::with_seed(1);
        session.on_contact(&piece(1, 2, 100.0, 500.0), &piece(2, 3, 130.0, 500.0));
        assert!(session.pending.is_empty());
        assert!(session.locked.is_empty());
    }

    #[test]
    fn test_self_and_unknown_rank_contacts_ignored() {
        let mut session = Session::with_seed(1);
        let a = piece(1, 2, 100.0, 500.0);
        session.on_contact(&a, &a);
        // Rank 99 is not in the table (e.g. a mislabeled wall body)
        session.on_contact(&piece(2, 99, 0.0, 0.0), &piece(3, 99, 1.0, 0.0));
        assert!(session.pending.is_empty());
        assert!(session.locked.is_empty());
    }

    #[test]
    fn test_max_rank_contact_is_noop_and_leaves_pieces_unlocked() {
        let mut session = Session::with_seed(1);
        let a = piece(1, 11, 100.0, 500.0);
        let b = piece(2, 11, 160.0, 500.0);

        session.on_contact(&a, &b);
        assert!(session.pending.is_empty());
        assert!(!session.locked.contains(&a.id));
        assert!(!session.locked.contains(&b.id));
    }

    #[test]
    fn test_contact_after_game_over_is_ignored() {
        let mut session = Session::with_seed(1);
        session.over = true;

        session.on_contact(&piece(1, 2, 100.0, 500.0), &piece(2, 2, 130.0, 500.0));
        assert!(session.pending.is_empty());
        assert!(session.locked.is_empty());
    }

    #[test]
    fn test_drain_merges_empty_queue_changes_nothing() {
        let mut session = Session::with_seed(1);
        let mut live: HashSet<PieceId> = [PieceId(1), PieceId(2)].into();
        let mut output = EngineOutput::default();

        session.drain_merges(&mut live, &mut output);
        assert!(output.is_empty());
        assert_eq!(session.score, 0);
        assert_eq!(live.len(), 2);
    }

    #[test]
    fn test_drain_executes_merge_at_midpoint() {
        let mut session = Session::with_seed(1);
        let a = piece(101, 1, 100.0, 500.0);
        let b = piece(102, 1, 104.0, 500.0);
        session.on_contact(&a, &b);

        let mut live: HashSet<PieceId> = [a.id, b.id].into();
        let mut output = EngineOutput::default();
        session.drain_merges(&mut live, &mut output);

        // Tier-1 merge: +2 points, one tier-2 piece at the midpoint
        assert_eq!(session.score, 2);
        assert!(session.pending.is_empty());
        assert!(session.locked.is_empty());
        assert!(!live.contains(&a.id));
        assert!(!live.contains(&b.id));

        assert_eq!(output.commands.len(), 2);
        assert_eq!(output.commands[0], Command::RemoveBodies(vec![a.id, b.id]));
        match &output.commands[1] {
            Command::CreateBody {
                rank, pos, held, ..
            } => {
                assert_eq!(*rank, 2);
                assert_eq!(*pos, Vec2::new(102.0, 500.0));
                assert!(!*held);
            }
            other => panic!("expected CreateBody, got {other:?}"),
        }
        assert_eq!(
            output.notifications,
            vec![Notification::ScoreChanged(2)]
        );
    }

    #[test]
    fn test_stale_record_dropped_and_partner_unlocked() {
        let mut session = Session::with_seed(1);
        let a = piece(1, 1, 100.0, 500.0);
        let b = piece(2, 1, 104.0, 500.0);
        session.on_contact(&a, &b);

        // b vanished before the drain (host removed it out from under us)
        let mut live: HashSet<PieceId> = [a.id].into();
        let mut output = EngineOutput::default();
        session.drain_merges(&mut live, &mut output);

        assert!(output.is_empty());
        assert_eq!(session.score, 0);
        assert!(live.contains(&a.id));
        // a must be claimable by a future merge
        assert!(!session.locked.contains(&a.id));
    }

    #[test]
    fn test_merge_ladder_to_max_rank_scores_2046() {
        // Merge a fresh pair at every rank 1..=10; the rank-11 result is
        // created but never merged. 2 + 4 + ... + 1024 = 2046.
        let mut session = Session::with_seed(1);
        let mut next_host_id = 1000u64;

        for rank in 1..=10u8 {
            let a = piece(next_host_id, rank, 100.0, 500.0);
            let b = piece(next_host_id + 1, rank, 110.0, 500.0);
            next_host_id += 2;

            session.on_contact(&a, &b);
            let mut live: HashSet<PieceId> = [a.id, b.id].into();
            let mut output = EngineOutput::default();
            session.drain_merges(&mut live, &mut output);

            if rank == 10 {
                assert!(output.notifications.contains(&Notification::MaxTierReached));
            } else {
                assert!(!output.notifications.contains(&Notification::MaxTierReached));
            }
        }
        assert_eq!(session.score, 2046);

        // The rank-11 piece itself never merges
        let a = piece(2000, 11, 100.0, 500.0);
        let b = piece(2001, 11, 110.0, 500.0);
        session.on_contact(&a, &b);
        assert!(session.pending.is_empty());
        assert_eq!(session.score, 2046);
    }

    proptest::proptest! {
        #[test]
        fn prop_repeat_contacts_queue_at_most_one_merge(
            rank in 1u8..=11,
            reports in 1usize..8,
        ) {
            let mut session = Session::with_seed(3);
            let a = piece(1, rank, 100.0, 500.0);
            let b = piece(2, rank, 110.0, 500.0);

            for _ in 0..reports {
                session.on_contact(&a, &b);
                session.on_contact(&b, &a);
            }

            let expected = usize::from(rank < 11);
            proptest::prop_assert_eq!(session.pending.len(), expected);
        }
    }
}
