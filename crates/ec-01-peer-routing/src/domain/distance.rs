//! Kademlia distance calculations.

use crate::domain::Distance;
use shared_types::{NodeId, NODE_ID_LEN};

/// Calculate the XOR distance between two NodeIds
///
/// # Properties
/// - Symmetric: `xor_distance(a, b) == xor_distance(b, a)`
/// - Self is zero: `xor_distance(a, a) == Distance::ZERO`
pub fn xor_distance(a: &NodeId, b: &NodeId) -> Distance {
    let mut out = [0u8; NODE_ID_LEN];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = a.0[i] ^ b.0[i];
    }
    Distance(out)
}

/// Bucket index for a remote node relative to the local node.
#[inline]
pub fn calculate_bucket_index(local: &NodeId, remote: &NodeId) -> usize {
    xor_distance(local, remote).bucket_index()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(bytes: [u8; NODE_ID_LEN]) -> NodeId {
        NodeId::new(bytes)
    }

    #[test]
    fn test_self_distance_is_zero() {
        let a = NodeId::derive(b"a");
        assert!(xor_distance(&a, &a).is_zero());
        assert_eq!(calculate_bucket_index(&a, &a), 0);
    }

    #[test]
    fn test_first_bit_difference_is_last_bucket() {
        let local = id([0u8; NODE_ID_LEN]);
        let mut far = [0u8; NODE_ID_LEN];
        far[0] = 0x80;
        assert_eq!(calculate_bucket_index(&local, &id(far)), 159);
    }

    proptest! {
        #[test]
        fn prop_symmetric(a in any::<[u8; NODE_ID_LEN]>(), b in any::<[u8; NODE_ID_LEN]>()) {
            prop_assert_eq!(xor_distance(&id(a), &id(b)), xor_distance(&id(b), &id(a)));
        }

        #[test]
        fn prop_zero_iff_equal(a in any::<[u8; NODE_ID_LEN]>(), b in any::<[u8; NODE_ID_LEN]>()) {
            prop_assert_eq!(xor_distance(&id(a), &id(b)).is_zero(), a == b);
        }
    }
}
