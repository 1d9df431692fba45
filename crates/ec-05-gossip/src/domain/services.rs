//! Peer selection for push rounds and relays.

use rand::seq::SliceRandom;
use rand::Rng;
use shared_types::PeerId;

/// Pick up to `fanout` distinct peers uniformly at random, never `exclude`.
pub fn select_targets<R: Rng + ?Sized>(
    peers: &[PeerId],
    fanout: usize,
    exclude: Option<&PeerId>,
    rng: &mut R,
) -> Vec<PeerId> {
    let eligible: Vec<PeerId> = peers
        .iter()
        .filter(|peer| Some(*peer) != exclude)
        .copied()
        .collect();
    eligible.choose_multiple(rng, fanout).copied().collect()
}
